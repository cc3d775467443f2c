//! Smart paragraph segmentation.
//!
//! Long text blobs that lost their markup (scraped pages love to flatten
//! whole articles into one text node) are re-segmented here: either as a
//! detected "name list" — capitalized entries run together without
//! separators — or as plain prose grouped two sentences to a paragraph.

use fancy_regex::Regex as FancyRegex;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum length for a capital-run part to count as a name entry.
const MIN_NAME_ENTRY_LEN: usize = 10;

/// Minimum number of name entries before the text is treated as a name list.
const MIN_NAME_ENTRIES: usize = 3;

/// Sentences grouped into each paragraph on the prose path.
const SENTENCES_PER_PARAGRAPH: usize = 2;

/// Prose shorter than this many sentences stays a single paragraph.
const MIN_SENTENCES_TO_SPLIT: usize = 3;

/// Zero-width boundary before a capitalized word that runs directly into
/// another capital — the seam between two concatenated name entries.
static NAME_BOUNDARY: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?=[A-Z][a-z]+[A-Z])").unwrap());

static NAME_ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+[A-Z]").unwrap());

static NAME_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z][a-z]+)(.*)$").unwrap());

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+\s+").unwrap());

/// Re-segments a long text blob into semantic HTML.
///
/// Tries the name-list shape first (each entry becomes `<h3>` + `<p>`);
/// otherwise falls back to sentence grouping. Never fails — unsplittable
/// text comes back as a single paragraph.
pub fn smart_paragraph_split(text: &str) -> String {
    let entries = name_entries(text);

    if entries.len() >= MIN_NAME_ENTRIES {
        tracing::debug!(entries = entries.len(), "detected name list format");
        let formatted: Vec<String> = entries
            .iter()
            .filter_map(|entry| {
                let caps = NAME_PREFIX.captures(entry)?;
                let name = caps.get(1)?.as_str();
                let description = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                if description.is_empty() {
                    Some(format!("<h3>{}</h3>", name))
                } else {
                    Some(format!("<h3>{}</h3>\n<p>{}</p>", name, description))
                }
            })
            .collect();

        if !formatted.is_empty() {
            return formatted.join("\n\n");
        }
    }

    split_into_sentence_groups(text)
}

/// Splits text at capital-run boundaries and keeps the parts that look like
/// name entries.
fn name_entries(text: &str) -> Vec<String> {
    let mut boundaries: Vec<usize> = NAME_BOUNDARY
        .find_iter(text)
        .filter_map(|m| m.ok())
        .map(|m| m.start())
        .collect();
    boundaries.push(text.len());

    let mut parts = Vec::new();
    let mut prev = 0usize;
    for &pos in &boundaries {
        if pos > prev {
            parts.push(&text[prev..pos]);
        }
        prev = pos;
    }

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| part.chars().count() > MIN_NAME_ENTRY_LEN && NAME_ENTRY.is_match(part))
        .map(str::to_string)
        .collect()
}

/// Groups sentences two to a paragraph, restoring the trailing period the
/// split consumed.
fn split_into_sentence_groups(text: &str) -> String {
    let sentences: Vec<&str> = SENTENCE_END.split(text).map(str::trim).filter(|s| !s.is_empty()).collect();

    if sentences.len() <= MIN_SENTENCES_TO_SPLIT {
        return format!("<p>{}</p>", text.trim());
    }

    let mut paragraphs = Vec::new();
    for group in sentences.chunks(SENTENCES_PER_PARAGRAPH) {
        let mut paragraph_text = group.join(". ").trim().to_string();
        if !paragraph_text.is_empty() {
            if !paragraph_text.ends_with('.') {
                paragraph_text.push('.');
            }
            paragraphs.push(format!("<p>{}</p>", paragraph_text));
        }
    }

    paragraphs.join("\n\n")
}
