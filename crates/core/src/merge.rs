//! Content merging.
//!
//! Combines a target post's retained description and images with a source
//! article's normalized body into one document: description first, then the
//! body (optionally with the images distributed through it at a computed
//! interval), then whatever images were not placed.
//!
//! The merger conserves images exactly: the output contains each supplied
//! image once, no more, no fewer.

use std::collections::VecDeque;

use ego_tree::NodeRef;
use scraper::ElementRef;
use scraper::node::Node;
use tracing::{debug, warn};

use crate::normalize::TransformOutcome;
use crate::parse::Document;

/// Heading over images appended after the body.
const RELATED_IMAGES_HEADING: &str = "Related images";

/// Bare text nodes shorter than this are not promoted to blocks.
const MIN_BARE_TEXT_LEN: usize = 10;

/// Configuration for content merging.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Distribute images through the body instead of appending them all at
    /// the end.
    pub interleave_images: bool,
    /// Floor for the interleave interval.
    pub min_image_interval: usize,
    /// Minimum items per list chunk when splitting long lists.
    pub min_list_chunk: usize,
    /// Maximum chunks a single list is split into.
    pub max_list_chunks: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            interleave_images: true,
            min_image_interval: 3,
            min_list_chunk: 5,
            max_list_chunks: 3,
        }
    }
}

/// Merges a target's description and images with a source body.
///
/// The `Fallback` variant carries the naive concatenation and is returned
/// when assembly fails; assembly never loses the supplied images either
/// way.
pub fn merge_with_description(
    description: &str, source_body: &str, images_html: &str, config: &MergeConfig,
) -> TransformOutcome {
    match assemble(description, source_body, images_html, config) {
        Some(merged) => TransformOutcome::Transformed(merged),
        None => {
            warn!("merge assembly failed, falling back to naive concatenation");
            TransformOutcome::Fallback(naive_concat(description, source_body, images_html))
        }
    }
}

/// The degraded merge: plain concatenation in document order.
pub(crate) fn naive_concat(description: &str, source_body: &str, images_html: &str) -> String {
    [description, source_body, images_html]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn assemble(description: &str, source_body: &str, images_html: &str, config: &MergeConfig) -> Option<String> {
    let description_blocks = top_level_blocks(description);
    let source_blocks = collect_blocks(source_body, config);
    let mut images: VecDeque<String> = {
        let doc = Document::parse_fragment(images_html);
        doc.select("img").ok()?.iter().map(|img| img.outer_html()).collect()
    };

    let mut out: Vec<String> = description_blocks;
    if !out.is_empty() && (!source_blocks.is_empty() || !images.is_empty()) {
        out.push("<hr>".to_string());
    }

    if config.interleave_images && !images.is_empty() && !source_blocks.is_empty() {
        let interval = interleave_interval(source_blocks.len(), images.len(), config);
        debug!(blocks = source_blocks.len(), images = images.len(), interval, "interleaving images into body");

        let block_count = source_blocks.len();
        for (i, block) in source_blocks.into_iter().enumerate() {
            out.push(block);
            let is_last = i + 1 == block_count;
            if !is_last && (i + 1) % interval == 0
                && let Some(image) = images.pop_front()
            {
                out.push(image);
            }
        }

        // One pass only: whatever did not land in the body trails the last
        // block without ceremony.
        out.extend(images.drain(..));
    } else {
        out.extend(source_blocks);

        if !images.is_empty() {
            out.push("<hr>".to_string());
            out.push(format!("<h3>{}</h3>", RELATED_IMAGES_HEADING));
            out.extend(images.drain(..));
        }
    }

    Some(out.join("\n"))
}

/// Interval between interleaved images: at least the configured floor, and
/// wide enough to spread the images across the available blocks.
fn interleave_interval(blocks: usize, images: usize, config: &MergeConfig) -> usize {
    config
        .min_image_interval
        .max(blocks / (images + 1))
        .max(blocks / images)
}

/// Serializes a fragment's top-level nodes: elements verbatim, bare text
/// as-is.
fn top_level_blocks(html: &str) -> Vec<String> {
    let doc = Document::parse_fragment(html);
    doc.root()
        .children()
        .filter_map(|node| match node.value() {
            Node::Element(_) => ElementRef::wrap(node).map(|el| el.html()),
            Node::Text(text) => {
                let trimmed = text.trim().to_string();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }
            _ => None,
        })
        .collect()
}

/// Collects the source body's content blocks. Paragraphs, headings, and
/// other elements each stand alone; long lists are split into chunks so an
/// image can land between them; stray text long enough to matter becomes a
/// paragraph.
fn collect_blocks(html: &str, config: &MergeConfig) -> Vec<String> {
    let doc = Document::parse_fragment(html);
    let mut blocks = Vec::new();

    for node in doc.root().children() {
        match node.value() {
            Node::Element(el) => {
                let tag = el.name().to_lowercase();
                if tag == "ul" || tag == "ol" {
                    blocks.extend(chunk_list(node, &tag, config));
                } else if let Some(el_ref) = ElementRef::wrap(node) {
                    blocks.push(el_ref.html());
                }
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.chars().count() > MIN_BARE_TEXT_LEN {
                    blocks.push(format!("<p>{}</p>", trimmed));
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Splits a list into up to `max_list_chunks` chunks of at least
/// `min_list_chunk` items; short lists stay whole.
fn chunk_list(node: NodeRef<'_, Node>, tag: &str, config: &MergeConfig) -> Vec<String> {
    let items: Vec<String> = node
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name().eq_ignore_ascii_case("li"))
        .map(|el| el.html())
        .collect();

    let chunks = config.max_list_chunks.min(items.len() / config.min_list_chunk);
    if chunks <= 1 {
        return ElementRef::wrap(node).map(|el| vec![el.html()]).unwrap_or_default();
    }

    let base = items.len() / chunks;
    let remainder = items.len() % chunks;

    let mut blocks = Vec::with_capacity(chunks);
    let mut cursor = 0usize;
    for i in 0..chunks {
        let size = base + usize::from(i < remainder);
        let chunk = &items[cursor..cursor + size];
        cursor += size;
        blocks.push(format!("<{}>{}</{}>", tag, chunk.join(""), tag));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_images(html: &str) -> usize {
        Document::parse_fragment(html).select("img").unwrap().len()
    }

    fn paragraphs(n: usize) -> String {
        (0..n).map(|i| format!("<p>Source paragraph number {}.</p>", i)).collect::<Vec<_>>().join("\n")
    }

    fn images(n: usize) -> String {
        (0..n).map(|i| format!(r#"<img src="/img-{}.jpg">"#, i)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_merge_order_without_interleaving() {
        let config = MergeConfig { interleave_images: false, ..Default::default() };
        let result = merge_with_description("<p>Description.</p>", &paragraphs(2), &images(2), &config);

        assert!(!result.is_fallback());
        let html = result.html();

        let desc = html.find("Description").unwrap();
        let body = html.find("Source paragraph number 0").unwrap();
        let heading = html.find("Related images").unwrap();
        let image = html.find("img-0").unwrap();

        assert!(desc < body && body < heading && heading < image);
        assert_eq!(html.matches("<hr>").count(), 2);
    }

    #[test]
    fn test_image_conservation() {
        for (blocks, imgs) in [(7, 2), (4, 3), (1, 5), (12, 1)] {
            let result = merge_with_description("<p>Desc.</p>", &paragraphs(blocks), &images(imgs), &MergeConfig::default());
            assert_eq!(count_images(result.html()), imgs, "blocks={} imgs={}", blocks, imgs);
        }
    }

    #[test]
    fn test_interleave_positions() {
        // 7 blocks, 2 images: interval = max(3, 7/3, 7/2) = 3, so images
        // land after blocks 3 and 6.
        let result = merge_with_description("", &paragraphs(7), &images(2), &MergeConfig::default());
        let lines: Vec<&str> = result.html().lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[3].contains("img-0"));
        assert!(lines[7].contains("img-1"));
        assert!(!result.html().contains("Related images"));
    }

    #[test]
    fn test_no_image_directly_after_last_block_when_spread_fits() {
        let result = merge_with_description("", &paragraphs(6), &images(1), &MergeConfig::default());
        let html = result.html();

        // interval = max(3, 6/2, 6/1) = 6; the image may not follow block 6
        // mid-pass, so it trails as a leftover instead.
        assert_eq!(count_images(html), 1);
        assert!(html.ends_with(r#"<img src="/img-0.jpg">"#));
    }

    #[test]
    fn test_no_separator_for_empty_description() {
        let result = merge_with_description("", &paragraphs(2), "", &MergeConfig::default());
        assert!(!result.html().contains("<hr>"));
    }

    #[test]
    fn test_images_only_merge() {
        let result = merge_with_description("", "", &images(2), &MergeConfig::default());
        let html = result.html();

        assert_eq!(count_images(html), 2);
        assert!(html.contains("Related images"));
    }

    #[test]
    fn test_long_list_chunked() {
        let items: String = (0..12).map(|i| format!("<li>item {}</li>", i)).collect();
        let body = format!("<p>Intro paragraph.</p><ul>{}</ul>", items);
        let blocks = collect_blocks(&body, &MergeConfig::default());

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].matches("<li>").count(), 6);
        assert_eq!(blocks[2].matches("<li>").count(), 6);
    }

    #[test]
    fn test_short_list_stays_whole() {
        let body = "<ul><li>a</li><li>b</li><li>c</li></ul>";
        let blocks = collect_blocks(body, &MergeConfig::default());

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].matches("<li>").count(), 3);
    }

    #[test]
    fn test_naive_concat_shape() {
        let result = naive_concat("<p>a</p>", "", "<img src=\"/x.jpg\">");
        assert_eq!(result, "<p>a</p>\n\n<img src=\"/x.jpg\">");
    }
}
