//! Content region location.
//!
//! Given a parsed page, finds the element most likely to contain the main
//! article body: first by probing a fixed list of well-known container
//! selectors, then by a density/paragraph heuristic over generic containers,
//! and finally by falling back to the document body wholesale.
//!
//! Location never fails on ordinary pages — only a document with no `<body>`
//! at all yields `None`.

use tracing::{debug, warn};

use crate::parse::Document;

/// Selectors for containers that commonly hold the article body, probed in
/// order. First match with enough text wins.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".post-content",
    ".entry-content",
    ".content",
    ".article-content",
    ".post-body",
    ".story-body",
    ".main-content",
    "#content",
    "#main-content",
    ".text-content",
    ".article-text",
    ".post",
    ".single-post",
    ".blog-post",
    ".page-content",
    "main",
    "[role=\"main\"]",
    ".container .content",
    ".wrapper .content",
];

/// Tags scanned by the heuristic fallback.
const CANDIDATE_TAGS: &[&str] = &["div", "section", "main", "article", "aside"];

/// Configuration for content location.
///
/// The thresholds are named here (rather than inlined) so they stay
/// independently tunable; the defaults are load-bearing for behavioral
/// parity with the selector probe and heuristic scan.
#[derive(Debug, Clone)]
pub struct LocateConfig {
    /// Minimum trimmed text length for a region to qualify.
    pub min_content_length: usize,
    /// Minimum text-to-markup density for heuristic candidates.
    pub min_text_density: f64,
    /// Candidates with more paragraphs than this qualify regardless of density.
    pub min_paragraph_count: usize,
    /// Per-paragraph score bonus weight.
    pub paragraph_weight: f64,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            min_text_density: 0.05,
            min_paragraph_count: 3,
            paragraph_weight: 0.1,
        }
    }
}

/// A located content region, detached from the source document.
///
/// The region owns its serialized markup so later passes can parse their own
/// isolated copies.
#[derive(Debug, Clone)]
pub struct ContentRegion {
    /// Outer HTML of the located container.
    pub html: String,
    /// Tag name of the located container.
    pub tag_name: String,
    /// Trimmed text length of the region.
    pub text_length: usize,
}

/// Locates the element most likely to contain the article body.
///
/// Returns `None` only when the document has no body element; any other page
/// degrades gracefully down the selector → heuristic → body chain.
pub fn locate(doc: &Document, config: &LocateConfig) -> Option<ContentRegion> {
    for selector in CONTENT_SELECTORS {
        if let Ok(Some(element)) = doc.select_first(selector) {
            let text_length = element.text().trim().chars().count();
            if text_length > config.min_content_length {
                debug!(selector, text_length, "content region matched known selector");
                return Some(ContentRegion {
                    html: element.outer_html(),
                    tag_name: element.tag_name(),
                    text_length,
                });
            }
        }
    }

    if let Some(region) = locate_heuristic(doc, config) {
        return Some(region);
    }

    warn!("heuristic scan found no content candidates, falling back to body");
    let body = doc.select_first("body").ok().flatten()?;
    let text_length = body.text().trim().chars().count();
    Some(ContentRegion { html: body.outer_html(), tag_name: "body".to_string(), text_length })
}

/// Heuristic scan: score every generic container by text length and
/// paragraph count, keep those above the density or paragraph floor, and
/// return the best scorer.
fn locate_heuristic(doc: &Document, config: &LocateConfig) -> Option<ContentRegion> {
    let mut best: Option<(f64, ContentRegion)> = None;
    let mut candidates = 0usize;

    for tag in CANDIDATE_TAGS {
        let Ok(elements) = doc.select(tag) else { continue };
        for element in elements {
            let text = element.text();
            let text_length = text.trim().chars().count();
            if text_length <= config.min_content_length {
                continue;
            }

            let html = element.outer_html();
            let html_length = html.chars().count();
            let text_density = if html_length > 0 { text_length as f64 / html_length as f64 } else { 0.0 };
            let paragraph_count = element.select("p").map(|p| p.len()).unwrap_or(0);

            if text_density > config.min_text_density || paragraph_count > config.min_paragraph_count {
                candidates += 1;
                let score = text_length as f64 + config.paragraph_weight * paragraph_count as f64 * 100.0;
                if best.as_ref().is_none_or(|(top, _)| score > *top) {
                    best = Some((
                        score,
                        ContentRegion { html, tag_name: element.tag_name(), text_length },
                    ));
                }
            }
        }
    }

    best.map(|(score, region)| {
        debug!(candidates, score, tag = %region.tag_name, "heuristic scan selected content region");
        region
    })
}
