//! Trailing boilerplate truncation.
//!
//! Articles scraped from the open web trail off into author bios, comment
//! prompts, and "read next" funnels. This pass scans for a fixed set of
//! marker phrases, cuts the content immediately before the first hit, and
//! repairs whatever the cut left unbalanced.

use regex::RegexBuilder;
use tracing::debug;

use crate::normalize::strip_empty_tag_pairs;
use crate::parse::Document;

/// Marker phrases that begin trailing boilerplate, checked in this order.
pub const BOILERPLATE_MARKERS: &[&str] = &[
    "Wrapping Up",
    "Read Next",
    "Conclusion",
    "Final Thoughts",
    "In Summary",
    "To Conclude",
    "Bottom Line",
    "Related Posts",
    "More Reading",
    "Further Reading",
    "Check Out",
    "Don't Miss",
    "Popular Posts",
    "Recent Posts",
    "About the Author",
    "Author Bio",
    "Comments",
    "Leave a Reply",
    "Share this",
    "Follow us",
];

/// Cuts the content before the first boilerplate marker found, repairing
/// any tags the cut left open. Content without markers passes through
/// unchanged.
pub fn truncate(html: &str) -> String {
    for marker in BOILERPLATE_MARKERS {
        let re = RegexBuilder::new(&regex::escape(marker))
            .case_insensitive(true)
            .build();
        let Ok(re) = re else { continue };

        if let Some(hit) = re.find(html) {
            debug!(marker, position = hit.start(), "truncating at boilerplate marker");
            return repair(&html[..hit.start()]);
        }
    }

    html.to_string()
}

/// Re-parses the truncated string so the parser closes dangling tags, then
/// sweeps out any pairs the cut emptied.
fn repair(truncated: &str) -> String {
    let balanced = Document::parse_fragment(truncated).content_html();
    strip_empty_tag_pairs(&balanced).trim().to_string()
}
