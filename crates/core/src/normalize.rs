//! Content normalization.
//!
//! Takes a located content region and rebuilds it as clean, minimal HTML:
//! boilerplate subtrees removed, wrapper tags outside the allow-list
//! flattened into their children, structured record runs re-extracted, and
//! markup-free text blobs re-segmented into paragraphs.
//!
//! Every pass works on its own parsed copy of the region and rebuilds output
//! strings; nothing the caller holds is ever mutated.

use ego_tree::NodeRef;
use regex::Regex;
use scraper::ElementRef;
use scraper::node::Node;
use std::sync::LazyLock;
use tracing::warn;

use crate::parse::Document;
use crate::segment::smart_paragraph_split;
use crate::records;

/// Tags kept (with their structure, minus attributes) by the clean walk.
const ALLOWED_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "br", "strong", "b", "em", "i", "u", "ul", "ol", "li", "blockquote",
    "div", "span",
];

/// Tags whose whole subtree is discarded.
const REMOVED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Class names marking boilerplate subtrees to discard.
const REMOVED_CLASSES: &[&str] = &[
    "advertisement",
    "ads",
    "social-share",
    "comments",
    "related-posts",
    "sidebar",
    "navigation",
    "menu",
];

/// Tags swept by the empty-pair cleanup.
const EMPTY_PAIR_TAGS: &[&str] = &[
    "p", "div", "span", "strong", "em", "b", "i", "u", "li", "ul", "ol", "blockquote", "h1", "h2", "h3", "h4", "h5",
    "h6", "section", "article", "header", "footer",
];

/// Maximum passes of the empty-pair sweep (nested empties collapse one
/// level per pass).
const MAX_EMPTY_PAIR_PASSES: usize = 10;

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").unwrap());

/// Configuration for content normalization.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Minimum text length for a block rescued by the defensive deep scan.
    pub min_rescue_text_length: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { min_rescue_text_length: 20 }
    }
}

/// The outcome of a lossy transformation: either a proper transform or an
/// explicit degraded fallback. Callers keep the distinction instead of
/// receiving a silently-downgraded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// The transformation succeeded.
    Transformed(String),
    /// The transformation could not be applied; the payload is the best
    /// available substitute.
    Fallback(String),
}

impl TransformOutcome {
    /// Borrows the resulting HTML, whichever variant produced it.
    pub fn html(&self) -> &str {
        match self {
            TransformOutcome::Transformed(html) | TransformOutcome::Fallback(html) => html,
        }
    }

    /// Consumes the outcome, returning the HTML.
    pub fn into_html(self) -> String {
        match self {
            TransformOutcome::Transformed(html) | TransformOutcome::Fallback(html) => html,
        }
    }

    /// True when this outcome is a degraded fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, TransformOutcome::Fallback(_))
    }
}

/// Normalizes a content region into clean semantic HTML.
///
/// Dispatches between the structured-record path and the generic allow-list
/// walk; the `Fallback` variant is returned only when structured markers are
/// present but neither record pass can parse them, in which case the raw
/// text survives as a single paragraph.
pub fn normalize(region_html: &str, config: &NormalizeConfig) -> TransformOutcome {
    let doc = Document::parse_fragment(region_html);
    let text = clean_text(*doc.root());

    if records::looks_structured(&text) {
        return match records::format_structured(&text) {
            Some(html) => TransformOutcome::Transformed(postprocess(&html)),
            None => {
                warn!("structured markers present but no records parsed, emitting raw paragraph");
                TransformOutcome::Fallback(format!("<p>{}</p>", text.trim()))
            }
        };
    }

    let mut parts: Vec<String> = doc
        .root()
        .children()
        .filter_map(clean_node)
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        warn!("clean walk produced no output, rescuing blocks from deep scan");
        parts = rescue_blocks(&doc, config);
    }

    TransformOutcome::Transformed(postprocess(&parts.join("\n\n")))
}

/// Checks whether an element's subtree is boilerplate to discard.
fn is_removed(el: &scraper::node::Element) -> bool {
    let tag = el.name().to_lowercase();
    REMOVED_TAGS.contains(&tag.as_str()) || el.classes().any(|class| REMOVED_CLASSES.contains(&class))
}

/// Recursively cleans a node: allow-listed tags are kept (attributes
/// dropped), other tags are unwrapped around their cleaned children, and
/// elements left childless — `br` excepted — vanish.
fn clean_node(node: NodeRef<'_, Node>) -> Option<String> {
    match node.value() {
        Node::Text(text) => {
            let raw = text.to_string();
            if raw.trim().is_empty() { None } else { Some(raw) }
        }
        Node::Element(el) => {
            if is_removed(el) {
                return None;
            }

            let tag = el.name().to_lowercase();
            let children: String = node.children().filter_map(clean_node).collect();

            if ALLOWED_TAGS.contains(&tag.as_str()) {
                if tag == "br" {
                    Some("<br>".to_string())
                } else if children.trim().is_empty() {
                    None
                } else {
                    Some(format!("<{}>{}</{}>", tag, children, tag))
                }
            } else if children.trim().is_empty() {
                None
            } else {
                Some(children)
            }
        }
        _ => None,
    }
}

/// Collects descendant text, skipping boilerplate subtrees — the text the
/// structured-record detector should see.
fn clean_text(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => text.to_string(),
        Node::Element(el) => {
            if is_removed(el) {
                String::new()
            } else {
                node.children().map(clean_text).collect()
            }
        }
        _ => String::new(),
    }
}

/// Defensive deep scan: when the clean walk yields nothing, pull out any
/// paragraph, heading, or div with enough text, smart-splitting the
/// non-heading blocks.
fn rescue_blocks(doc: &Document, config: &NormalizeConfig) -> Vec<String> {
    let Ok(elements) = doc.select("p, div, h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    elements
        .iter()
        .filter(|el| !has_removed_ancestor(el.as_ref()))
        .filter_map(|el| {
            let text = el.text().trim().to_string();
            if text.chars().count() <= config.min_rescue_text_length {
                return None;
            }

            let tag = el.tag_name();
            if tag.starts_with('h') {
                Some(format!("<{}>{}</{}>", tag, text, tag))
            } else {
                Some(smart_paragraph_split(&text))
            }
        })
        .collect()
}

fn has_removed_ancestor(el: ElementRef<'_>) -> bool {
    el.ancestors().any(|node| match node.value() {
        Node::Element(parent) => is_removed(parent),
        _ => false,
    })
}

/// Shared post-pass: drop tag pairs left empty and collapse runs of blank
/// lines down to a single separator.
pub(crate) fn postprocess(html: &str) -> String {
    let cleaned = strip_empty_tag_pairs(html);
    collapse_blank_lines(&cleaned).trim().to_string()
}

/// Removes empty (or whitespace-only) tag pairs, iterating because removing
/// an inner pair can empty its parent.
pub(crate) fn strip_empty_tag_pairs(html: &str) -> String {
    let mut result = html.to_string();

    for _ in 0..MAX_EMPTY_PAIR_PASSES {
        let before = result.clone();
        for tag in EMPTY_PAIR_TAGS {
            let re = Regex::new(&format!(r"<{}(?:\s[^>]*)?>\s*</{}>", tag, tag)).unwrap();
            result = re.replace_all(&result, "").to_string();
        }
        if result == before {
            break;
        }
    }

    result
}

/// Collapses three or more consecutive newlines to one blank line.
pub(crate) fn collapse_blank_lines(html: &str) -> String {
    BLANK_LINES.replace_all(html, "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowlist_walk_keeps_structure() {
        let html = r#"<div><script>var x = 1;</script><p>Hello <span class="hi">world</span></p></div>"#;
        let result = normalize(html, &NormalizeConfig::default());

        assert!(!result.is_fallback());
        assert_eq!(result.html(), "<div><p>Hello <span>world</span></p></div>");
    }

    #[test]
    fn test_unknown_tags_unwrapped() {
        let html = "<main><p>kept</p><custom>inline text</custom></main>";
        let result = normalize(html, &NormalizeConfig::default());

        assert_eq!(result.html(), "<p>kept</p>inline text");
    }

    #[test]
    fn test_boilerplate_classes_removed() {
        let html = r#"<div><p>article body text</p><div class="sidebar"><p>widget</p></div><div class="social-share">share</div></div>"#;
        let result = normalize(html, &NormalizeConfig::default());

        assert!(result.html().contains("article body text"));
        assert!(!result.html().contains("widget"));
        assert!(!result.html().contains("share"));
    }

    #[test]
    fn test_br_survives_without_children() {
        let html = "<p>line one<br>line two</p>";
        let result = normalize(html, &NormalizeConfig::default());
        assert_eq!(result.html(), "<p>line one<br>line two</p>");
    }

    #[test]
    fn test_structured_path() {
        let text = "Ada Origin: German Meaning: noble Popularity: #1 Bea Origin: Latin Meaning: blessed Popularity: #2 Cleo Origin: Greek Meaning: glory Popularity: #3";
        let html = format!("<div><p>{}</p></div>", text);
        let result = normalize(&html, &NormalizeConfig::default());

        assert!(!result.is_fallback());
        assert_eq!(result.html().matches("<h3>").count(), 3);
        assert!(result.html().contains("<em>noble</em>"));
    }

    #[test]
    fn test_structured_markers_without_records_fall_back() {
        // Markers pass the frequency gate but nothing is parseable: every
        // marker is fenced so no name token precedes Origin and the field
        // order never completes a record.
        let text = "Popularity: Meaning: Origin: Popularity: Meaning: Origin: Popularity: Meaning: Origin:";
        let html = format!("<div>{}</div>", text);
        let result = normalize(&html, &NormalizeConfig::default());

        assert!(result.is_fallback());
        assert!(result.html().starts_with("<p>"));
    }

    #[test]
    fn test_rescue_blocks() {
        let html = "<div><p>This paragraph easily clears the rescue length floor.</p><h2>A heading with enough text</h2></div>";
        let doc = Document::parse_fragment(html);
        let blocks = rescue_blocks(&doc, &NormalizeConfig::default());

        assert_eq!(blocks.len(), 3);
        assert!(blocks[2].starts_with("<h2>"));
    }

    #[test]
    fn test_strip_empty_tag_pairs_nested() {
        let html = "<div><p></p><span>   </span></div><p>keep</p>";
        assert_eq!(strip_empty_tag_pairs(html), "<p>keep</p>");
    }

    #[test]
    fn test_collapse_blank_lines() {
        let html = "<p>a</p>\n\n\n\n<p>b</p>";
        assert_eq!(collapse_blank_lines(html), "<p>a</p>\n\n<p>b</p>");
    }

    #[test]
    fn test_roundtrip_stability() {
        let html = r#"<div><article><p>First block of text.</p></article><aside>note</aside></div>"#;
        let once = normalize(html, &NormalizeConfig::default()).into_html();
        let twice = normalize(&once, &NormalizeConfig::default()).into_html();
        assert_eq!(once, twice);
    }
}
