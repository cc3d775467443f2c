//! Structured record detection and extraction.
//!
//! Some scraped pages carry list-like name data flattened into freeform
//! text: a name followed by fixed `Origin:` / `Meaning:` / `Popularity:`
//! attribute fields, repeated record after record with no markup between
//! them. This module detects that shape, re-extracts the records, and
//! renders them back as semantic HTML (heading + attribute list).
//!
//! Extraction runs a fixed fallback chain whose order is intentional and
//! must not be reordered: the anchored scan first, then the `Origin:` split
//! with looser per-segment patterns, then the raw text as a single
//! paragraph. The loose pass is lossy around capitalized words inside field
//! values; that risk is accepted in exchange for never dropping a page.

use fancy_regex::Regex as FancyRegex;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// The three attribute markers, in record order.
pub const RECORD_FIELD_MARKERS: &[&str] = &["Origin:", "Meaning:", "Popularity:"];

/// Each marker must appear at least this many times for a region to be
/// treated as structured.
const MIN_MARKER_OCCURRENCES: usize = 3;

/// Maximum allowed difference between the most and least frequent marker.
const MAX_MARKER_SPREAD: usize = 2;

/// Anchored record scan: name, then the three fields, each value running
/// non-greedily to the next marker; the record ends at the next
/// name-plus-`Origin:` anchor or end of input. Case-sensitive.
static RECORD_SCAN: LazyLock<FancyRegex> = LazyLock::new(|| {
    FancyRegex::new(
        r"(?s)([A-Z][a-zA-Z]*)\s+Origin:\s*(.+?)\s*Meaning:\s*(.+?)\s*Popularity:\s*(.+?)(?=\s+[A-Z][a-zA-Z]*\s+Origin:|\z)",
    )
    .unwrap()
});

static TRAILING_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z][a-zA-Z]*)\s*$").unwrap());
static LOOSE_ORIGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^(.*?)Meaning:").unwrap());
static LOOSE_MEANING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)Meaning:\s*(.*?)Popularity:").unwrap());
static LOOSE_POPULARITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)Popularity:\s*(.*)$").unwrap());

/// A detected name record. All four fields are required; a record missing
/// any of them is dropped rather than emitted partially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredRecord {
    pub name: String,
    pub origin: String,
    pub meaning: String,
    pub popularity: String,
}

/// Checks whether text looks like a run of structured records: every field
/// marker appears at least three times, with the three counts close
/// together.
pub fn looks_structured(text: &str) -> bool {
    let counts: Vec<usize> = RECORD_FIELD_MARKERS.iter().map(|m| text.matches(m).count()).collect();

    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);

    min >= MIN_MARKER_OCCURRENCES && max - min <= MAX_MARKER_SPREAD
}

/// Extracts records with the anchored scan.
pub fn extract_records(text: &str) -> Vec<StructuredRecord> {
    RECORD_SCAN
        .captures_iter(text)
        .filter_map(|caps| caps.ok())
        .filter_map(|caps| {
            build_record(
                caps.get(1)?.as_str(),
                caps.get(2)?.as_str(),
                caps.get(3)?.as_str(),
                caps.get(4)?.as_str(),
            )
        })
        .collect()
}

/// Loose fallback: split on the literal `Origin:` and pull fields out of
/// each segment with forgiving patterns. The record name is the capitalized
/// token trailing the previous segment.
pub fn extract_records_loose(text: &str) -> Vec<StructuredRecord> {
    let parts: Vec<&str> = text.split("Origin:").collect();
    if parts.len() < 2 {
        return Vec::new();
    }

    let mut records = Vec::new();
    for i in 1..parts.len() {
        let Some(name) = TRAILING_NAME.captures(parts[i - 1]).and_then(|c| c.get(1)) else {
            continue;
        };

        let segment = parts[i];
        let origin = LOOSE_ORIGIN.captures(segment).and_then(|c| c.get(1)).map(|m| m.as_str());
        let meaning = LOOSE_MEANING.captures(segment).and_then(|c| c.get(1)).map(|m| m.as_str());
        let popularity = LOOSE_POPULARITY
            .captures(segment)
            .and_then(|c| c.get(1))
            .map(|m| {
                // Every segment except the last carries the next record's
                // name at its tail; shear it off.
                if i + 1 < parts.len() {
                    TRAILING_NAME.replace(m.as_str(), "").into_owned()
                } else {
                    m.as_str().to_string()
                }
            });

        if let (Some(origin), Some(meaning), Some(popularity)) = (origin, meaning, popularity)
            && let Some(record) = build_record(name.as_str(), origin, meaning, &popularity)
        {
            records.push(record);
        }
    }

    records
}

/// Cleans fields and assembles a record; `None` when any field cleans down
/// to nothing.
fn build_record(name: &str, origin: &str, meaning: &str, popularity: &str) -> Option<StructuredRecord> {
    let name = name.trim();
    let origin = clean_origin(origin);
    let meaning = clean_meaning(meaning);
    let popularity = clean_popularity(popularity);

    if name.is_empty() || origin.is_empty() || meaning.is_empty() || popularity.is_empty() {
        return None;
    }

    Some(StructuredRecord {
        name: name.to_string(),
        origin,
        meaning,
        popularity,
    })
}

/// Origin values keep word, space, comma, period, and hyphen characters.
fn clean_origin(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || matches!(*c, ',' | '.' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Meaning values shed markdown-style emphasis markers.
fn clean_meaning(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(*c, '*' | '_')).collect::<String>().trim().to_string()
}

/// Popularity values keep word, space, `#`, and `>` characters.
fn clean_popularity(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || matches!(*c, '#' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Renders records as a heading plus a three-item attribute list each.
pub fn render_records(records: &[StructuredRecord]) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "<h3>{}</h3>\n<ul>\n<li><strong>Origin:</strong> {}</li>\n<li><strong>Meaning:</strong> <em>{}</em></li>\n<li><strong>Popularity:</strong> {}</li>\n</ul>",
                record.name, record.origin, record.meaning, record.popularity
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Runs the full extraction chain on structured-looking text.
///
/// Returns the rendered records, or `None` when both passes come up empty —
/// the caller decides what the raw-paragraph fallback looks like.
pub fn format_structured(text: &str) -> Option<String> {
    let records = extract_records(text);
    if !records.is_empty() {
        debug!(records = records.len(), "anchored record scan matched");
        return Some(render_records(&records));
    }

    let records = extract_records_loose(text);
    if !records.is_empty() {
        warn!(records = records.len(), "anchored scan failed, loose split recovered records");
        return Some(render_records(&records));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = "Alice Origin: Greek Meaning: *pure* Popularity: #1 in 2020 Bob Origin: Latin Meaning: strong Popularity: #5";

    #[test]
    fn test_looks_structured() {
        let text = "Origin: a Meaning: b Popularity: c ".repeat(3);
        assert!(looks_structured(&text));
    }

    #[test]
    fn test_not_structured_below_threshold() {
        assert!(!looks_structured(TWO_RECORDS));
        assert!(!looks_structured("plain prose with no markers at all"));
    }

    #[test]
    fn test_not_structured_when_counts_diverge() {
        let text = format!("{} {}", "Origin: x ".repeat(6), "Meaning: y Popularity: z ".repeat(3));
        assert!(!looks_structured(&text));
    }

    #[test]
    fn test_extract_two_records() {
        let records = extract_records(TWO_RECORDS);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name, "Alice");
        assert_eq!(records[0].origin, "Greek");
        assert_eq!(records[0].meaning, "pure");
        assert_eq!(records[0].popularity, "#1 in 2020");

        assert_eq!(records[1].name, "Bob");
        assert_eq!(records[1].origin, "Latin");
        assert_eq!(records[1].meaning, "strong");
        assert_eq!(records[1].popularity, "#5");
    }

    #[test]
    fn test_incomplete_record_dropped() {
        let text = "Alice Origin: Greek Meaning: pure Popularity: #1 Bob Origin: Latin Meaning: strong";
        let records = extract_records(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alice");
    }

    #[test]
    fn test_loose_fallback() {
        let text = "Alice Origin: Greek, pre-classical Meaning: pure Popularity: #1 Bob Origin: Latin Meaning: strong Popularity: #5";
        let records = extract_records_loose(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alice");
        assert_eq!(records[0].origin, "Greek, pre-classical");
        assert_eq!(records[1].popularity, "#5");
    }

    #[test]
    fn test_render_shape() {
        let records = extract_records(TWO_RECORDS);
        let html = render_records(&records);

        assert_eq!(html.matches("<h3>").count(), 2);
        assert_eq!(html.matches("<ul>").count(), 2);
        assert_eq!(html.matches("<li>").count(), 6);
        assert!(html.contains("<em>pure</em>"));
    }

    #[test]
    fn test_format_structured_chain() {
        assert!(format_structured(TWO_RECORDS).is_some());
        assert!(format_structured("nothing structured here").is_none());
    }

    #[test]
    fn test_field_cleaning() {
        let record = build_record("Ada", "Old High German!", "_the *adorned* one_", "#3 (rising)").unwrap();
        assert_eq!(record.origin, "Old High German");
        assert_eq!(record.meaning, "the adorned one");
        assert_eq!(record.popularity, "#3 rising");
    }
}
