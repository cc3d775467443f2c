//! Keyword-anchored content slicing.
//!
//! Finds a caller-supplied marker string inside already-extracted content
//! and returns only the content from that marker onward, preserving element
//! boundaries. `None` means the keyword is absent — an explicit "not found"
//! the caller answers with the unsliced content, not an error.

use ego_tree::NodeRef;
use scraper::ElementRef;
use scraper::node::Node;
use tracing::debug;

use crate::normalize::{collapse_blank_lines, strip_empty_tag_pairs};
use crate::parse::{Document, node_text, serialize_node};
use crate::segment::smart_paragraph_split;

/// Inline wrappers climbed through when looking for the containing block.
const INLINE_WRAPPERS: &[&str] = &["span", "strong", "em", "b", "i"];

/// Bare text nodes shorter than this are dropped rather than wrapped.
const MIN_BARE_TEXT_LEN: usize = 10;

/// Returns the content from the first occurrence of `keyword` onward, or
/// `None` when the keyword does not occur. Matching is a case-sensitive
/// verbatim substring check; only the first depth-first match is used.
pub fn slice_from(html: &str, keyword: &str) -> Option<String> {
    let doc = Document::parse_fragment(html);

    let matched = doc
        .root()
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.text().collect::<String>().contains(keyword))?;

    debug!(tag = matched.value().name(), keyword, "keyword located");

    if let Some(result) = slice_structured(&doc, keyword) {
        return Some(result);
    }

    slice_generic(matched, keyword)
}

/// Structured-document path: the keyword names a record, so the anchor is
/// the paragraph whose emphasis-marker child equals the keyword exactly.
/// Everything from that paragraph's top-level position onward is collected
/// verbatim.
fn slice_structured(doc: &Document, keyword: &str) -> Option<String> {
    let paragraphs = doc.select("p").ok()?;
    let target = paragraphs.iter().find(|p| {
        p.select("strong, em")
            .map(|markers| markers.iter().any(|m| m.text().trim() == keyword))
            .unwrap_or(false)
    })?;

    let target_id = target.as_ref().id();
    let top_level: Vec<ElementRef<'_>> = doc.root().children().filter_map(ElementRef::wrap).collect();
    let position = top_level
        .iter()
        .position(|el| el.id() == target_id || el.descendants().any(|n| n.id() == target_id))?;

    let collected: Vec<String> = top_level[position..].iter().map(|el| el.html()).collect();
    Some(cleanup(&collected.join("\n\n")))
}

/// Generic path: climb out of inline wrappers to the containing block, find
/// the sibling holding the keyword, re-segment its remainder, and carry all
/// later siblings through unchanged.
fn slice_generic(matched: ElementRef<'_>, keyword: &str) -> Option<String> {
    let mut container: NodeRef<'_, Node> = matched.parent()?;
    while let Node::Element(el) = container.value() {
        if !INLINE_WRAPPERS.contains(&el.name().to_lowercase().as_str()) {
            break;
        }
        match container.parent() {
            Some(parent) => container = parent,
            None => break,
        }
    }

    let children: Vec<NodeRef<'_, Node>> = container.children().collect();
    let position = children.iter().position(|child| node_text(*child).contains(keyword))?;

    let mut collected = Vec::new();

    let anchor_text = node_text(children[position]);
    match anchor_text.find(keyword) {
        Some(offset) => collected.push(smart_paragraph_split(&anchor_text[offset..])),
        None => {
            if let Some(serialized) = serialize_node(children[position]) {
                collected.push(serialized);
            }
        }
    }

    for child in &children[position + 1..] {
        match child.value() {
            Node::Element(_) => {
                if let Some(serialized) = serialize_node(*child) {
                    collected.push(serialized);
                }
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.chars().count() > MIN_BARE_TEXT_LEN {
                    collected.push(format!("<p>{}</p>", trimmed));
                }
            }
            _ => {}
        }
    }

    Some(cleanup(&collected.join("\n\n")))
}

fn cleanup(html: &str) -> String {
    collapse_blank_lines(&strip_empty_tag_pairs(html)).trim().to_string()
}
