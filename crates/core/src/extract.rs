//! End-to-end article extraction.
//!
//! Wires the pipeline together: fetch a page, locate the content region,
//! normalize it, resolve relative URLs, optionally slice from a start
//! keyword, cut trailing boilerplate, and stamp the source attribution.

use url::Url;

use tracing::{info, warn};

use crate::fetch::{FetchConfig, fetch_url};
use crate::locate::{LocateConfig, locate};
use crate::normalize::{NormalizeConfig, normalize};
use crate::parse::Document;
use crate::slice::slice_from;
use crate::truncate::truncate;
use crate::{Result, RetexoError};

/// Title selectors probed in order before falling back to `<title>`.
const TITLE_SELECTORS: &[&str] = &["h1", ".post-title", ".entry-title", ".article-title", ".headline", "title"];

/// Titles at or below this length are considered noise and skipped.
const MIN_TITLE_LEN: usize = 5;

/// Title of last resort.
const UNTITLED: &str = "Untitled";

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    pub fetch: FetchConfig,
    pub locate: LocateConfig,
    pub normalize: NormalizeConfig,
}

/// The result of extracting one page.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The page URL the content came from.
    pub url: String,
    /// Best-effort page title.
    pub title: String,
    /// Host of the page URL.
    pub domain: String,
    /// Normalized article content, standalone-parseable HTML.
    pub content: String,
}

/// Extracts and normalizes the article content of an already-fetched page.
///
/// # Errors
///
/// Returns [`RetexoError::NoContent`] when the page has no body element;
/// every other page degrades through the locator's fallback chain instead.
pub fn extract_from_html(html: &str, url: &str, config: &ExtractorConfig) -> Result<ExtractionResult> {
    let doc = Document::parse(html);
    let title = extract_title(&doc);

    let region = locate(&doc, &config.locate).ok_or(RetexoError::NoContent)?;
    info!(tag = %region.tag_name, text_length = region.text_length, "located content region");

    let normalized = normalize(&region.html, &config.normalize);
    if normalized.is_fallback() {
        warn!(url, "normalization degraded to fallback output");
    }

    let parsed_url = Url::parse(url).ok();
    let domain = parsed_url
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or_default()
        .to_string();

    let content = match parsed_url {
        Some(base) => resolve_relative_urls(&normalized.into_html(), &base),
        None => normalized.into_html(),
    };

    Ok(ExtractionResult { url: url.to_string(), title, domain, content })
}

/// Fetches a page and formats its article content for republication.
///
/// With a start keyword, content before the keyword is dropped — unless the
/// keyword is absent, in which case the full content is used. Trailing
/// boilerplate is always cut, and the content ends with a source
/// attribution line.
pub async fn extract_and_format(url: &str, start_keyword: Option<&str>, config: &ExtractorConfig) -> Result<String> {
    let html = fetch_url(url, &config.fetch).await?;
    let result = extract_from_html(&html, url, config)?;
    Ok(format_for_republication(&result, start_keyword))
}

/// The formatting half of [`extract_and_format`], separated so it can run
/// on pre-extracted content.
pub fn format_for_republication(result: &ExtractionResult, start_keyword: Option<&str>) -> String {
    let mut content = match start_keyword {
        Some(keyword) => match slice_from(&result.content, keyword) {
            Some(sliced) => sliced,
            None => {
                warn!(keyword, "start keyword not found, using full content");
                result.content.clone()
            }
        },
        None => result.content.clone(),
    };

    content = truncate(&content);

    content.push_str(&format!(
        "\n\n<p><em>Source: <a href=\"{}\" target=\"_blank\">{}</a></em></p>",
        result.url, result.domain
    ));

    content
}

/// Probes the title selector chain, skipping matches too short to mean
/// anything, then falls back to the document title.
fn extract_title(doc: &Document) -> String {
    for selector in TITLE_SELECTORS {
        if let Ok(Some(element)) = doc.select_first(selector) {
            let title = element.text().trim().to_string();
            if title.chars().count() > MIN_TITLE_LEN {
                return title;
            }
        }
    }

    match doc.title().map(|t| t.trim().to_string()) {
        Some(title) if !title.is_empty() => title,
        _ => UNTITLED.to_string(),
    }
}

/// Rewrites `a[href]` and `img[src]` against the page URL so republished
/// content carries absolute links.
fn resolve_relative_urls(html: &str, base_url: &Url) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href")
                        && let Ok(absolute) = base_url.join(&href)
                    {
                        el.set_attribute("href", absolute.as_str()).ok();
                    }
                    Ok(())
                }),
                lol_html::element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src")
                        && let Ok(absolute) = base_url.join(&src)
                    {
                        el.set_attribute("src", absolute.as_str()).ok();
                    }
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |chunk: &[u8]| output.push_str(&String::from_utf8_lossy(chunk)),
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }
    if rewriter.end().is_err() {
        return html.to_string();
    }

    if output.is_empty() { html.to_string() } else { output }
}
