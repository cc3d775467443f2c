//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors, plus the low-level
//! node helpers used by the transformation walks (normalizer, stripper,
//! slicer, merger).
//!
//! Every transformation step parses its own [`Document`]; parsed trees are
//! never shared across operations, so no pass can observe another's
//! mutations.
//!
//! # Example
//!
//! ```rust
//! use retexo_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let title = doc.title();
//! let paragraphs = doc.select("p.content").unwrap();
//! ```

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::{Result, RetexoError};

/// Represents a parsed HTML document or fragment.
///
/// A Document wraps an HTML page and provides methods for querying elements
/// using CSS selectors and extracting text. Parsing is lenient: malformed
/// markup is auto-corrected by the underlying html5ever parser, never
/// rejected.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a complete HTML document from a string.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses an HTML fragment (body content without the surrounding
    /// document scaffolding).
    ///
    /// Use this for content that has already been extracted — the fragment's
    /// top-level nodes become the children of the synthetic root element.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Gets the raw parsed tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the root element of the parsed tree.
    ///
    /// For fragments this is the synthetic wrapper element whose children
    /// are the fragment's top-level nodes.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Re-serializes the document's content.
    ///
    /// For fragments this returns the fragment itself, with every tag the
    /// parser auto-closed now balanced — the repair step after a mid-tag
    /// truncation cut.
    pub fn content_html(&self) -> String {
        self.root().inner_html()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RetexoError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| RetexoError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| RetexoError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the title of the document.
    ///
    /// Returns the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

/// A wrapper around scraper's ElementRef for easier DOM navigation.
///
/// Element represents a single node in the HTML document tree and provides
/// methods for accessing its attributes, text content, and children.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element, including its own tags.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the concatenated text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute, or `None` if absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Gets the underlying `ElementRef` for tree walking.
    pub fn as_ref(&self) -> ElementRef<'a> {
        self.element
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RetexoError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel =
            Selector::parse(selector).map_err(|e| RetexoError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}

/// Serializes an arbitrary node: elements as outer HTML, text nodes as their
/// raw payload. Comments, doctypes, and processing instructions serialize to
/// `None`.
pub(crate) fn serialize_node(node: NodeRef<'_, Node>) -> Option<String> {
    match node.value() {
        Node::Element(_) => ElementRef::wrap(node).map(|el| el.html()),
        Node::Text(text) => Some(text.to_string()),
        _ => None,
    }
}

/// Collects the concatenated descendant text of a node.
pub(crate) fn node_text(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => text.to_string(),
        Node::Element(_) => ElementRef::wrap(node)
            .map(|el| el.text().collect())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
