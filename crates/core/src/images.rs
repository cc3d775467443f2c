//! Image-preserving stripping and image inventory.
//!
//! The stripper deletes every element carrying no image descendant and
//! collapses image-bearing wrappers down to just their images, so a post's
//! body can be emptied of text without losing a single `img`. The inventory
//! side reports and validates the images a document carries.
//!
//! Guarantees: every `img` present before stripping is present after it,
//! and no text survives outside `figcaption`.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::normalize::strip_empty_tag_pairs;
use crate::parse::Document;

/// Tags serialized verbatim by the stripper.
const PRESERVED_TAGS: &[&str] = &["img", "figure", "figcaption", "picture", "source"];

/// Paragraphs shorter than this don't count as description content.
const MIN_DESCRIPTION_TEXT_LEN: usize = 20;

/// Default number of substantive paragraphs kept as the description.
pub const DEFAULT_DESCRIPTION_PARAGRAPHS: usize = 2;

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// The attributes of one `img` occurrence.
///
/// Identity is structural equality of the attributes; occurrences are never
/// deduplicated — two identical tags are two images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    pub src: String,
    pub alt: String,
    pub title: String,
    pub width: String,
    pub height: String,
    pub classes: Vec<String>,
}

impl ImageReference {
    /// A usable image has a non-empty `src` that is absolute or
    /// site-rooted.
    pub fn is_valid(&self) -> bool {
        !self.src.is_empty() && (self.src.starts_with("http") || self.src.starts_with('/'))
    }
}

/// Validation counts over a document's images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageValidation {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Description and image halves of a post, separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatedContent {
    /// The first substantive paragraphs, re-emitted text-only.
    pub description_content: String,
    /// Every image in document order.
    pub images_content: String,
}

/// Lists every image in the document, in order.
pub fn collect_images(html: &str) -> Vec<ImageReference> {
    let doc = Document::parse_fragment(html);
    let Ok(images) = doc.select("img") else { return Vec::new() };

    images
        .iter()
        .map(|img| ImageReference {
            src: img.attr("src").unwrap_or_default().to_string(),
            alt: img.attr("alt").unwrap_or_default().to_string(),
            title: img.attr("title").unwrap_or_default().to_string(),
            width: img.attr("width").unwrap_or_default().to_string(),
            height: img.attr("height").unwrap_or_default().to_string(),
            classes: img
                .attr("class")
                .map(|c| c.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// Counts total, valid, and invalid images in the document.
pub fn validate_images(html: &str) -> ImageValidation {
    let images = collect_images(html);
    let valid = images.iter().filter(|img| img.is_valid()).count();
    let validation = ImageValidation { total: images.len(), valid, invalid: images.len() - valid };

    if validation.invalid > 0 {
        warn!(invalid = validation.invalid, total = validation.total, "document carries invalid image sources");
    }

    validation
}

/// Deletes all text content while keeping every image.
///
/// Elements with no image descendant are removed entirely; elements with
/// image descendants are collapsed to just those images; the preserve-list
/// tags pass through verbatim.
pub fn strip_text_keep_images(html: &str) -> String {
    let doc = Document::parse_fragment(html);
    let before = doc.select("img").map(|imgs| imgs.len()).unwrap_or(0);

    let parts: Vec<String> = doc.root().children().filter_map(keep_images_node).collect();
    let stripped = strip_empty_tag_pairs(&parts.join("\n"));

    debug!(images = before, removed_text = html.len().saturating_sub(stripped.len()), "stripped text from content");

    stripped.trim().to_string()
}

/// One node of the stripping walk.
fn keep_images_node(node: NodeRef<'_, Node>) -> Option<String> {
    let Node::Element(el) = node.value() else {
        return None;
    };

    let tag = el.name().to_lowercase();
    let el_ref = ElementRef::wrap(node)?;

    if PRESERVED_TAGS.contains(&tag.as_str()) {
        return Some(el_ref.html());
    }

    let images: Vec<String> = el_ref.select(&IMG_SELECTOR).map(|img| img.html()).collect();
    if images.is_empty() {
        None
    } else {
        Some(format!("<{}>{}</{}>", tag, images.join(""), tag))
    }
}

/// Splits a post into its description paragraphs and its images.
///
/// The description is the first `max_paragraphs` paragraphs whose text
/// exceeds the substantive floor, re-emitted without inline markup; the
/// image half is every `img` in the document, wherever it sat.
pub fn separate_description_and_images(html: &str, max_paragraphs: usize) -> SeparatedContent {
    let doc = Document::parse_fragment(html);

    let description: Vec<String> = doc
        .select("p")
        .unwrap_or_default()
        .iter()
        .filter_map(|p| {
            let text = p.text().trim().to_string();
            if text.chars().count() > MIN_DESCRIPTION_TEXT_LEN { Some(format!("<p>{}</p>", text)) } else { None }
        })
        .take(max_paragraphs)
        .collect();

    let images: Vec<String> = doc
        .select("img")
        .unwrap_or_default()
        .iter()
        .map(|img| img.outer_html())
        .collect();

    SeparatedContent {
        description_content: description.join("\n"),
        images_content: images.join("\n"),
    }
}
