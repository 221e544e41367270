//! HTML parsing and read-only DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the tree using CSS selectors. The parsed tree is never
//! mutated: every extractor copies the text and attributes it needs out of
//! the document, so the document can be dropped as soon as extraction returns.
//!
//! # Example
//!
//! ```rust
//! use depeche_core::parse::Document;
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
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{DepecheError, Result};

/// Compiles a CSS selector, mapping failures to [`DepecheError::HtmlParseError`].
pub(crate) fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DepecheError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Represents a parsed HTML document or fragment.
///
/// Parsing is lenient: malformed markup never fails, unknown elements simply
/// produce empty selector results.
pub struct Document {
    html: Html,
}

/// A top-level node of a parsed fragment.
#[derive(Debug, Clone)]
pub enum FragmentNode<'a> {
    Element(Element<'a>),
    Text(String),
}

impl Document {
    /// Parses a full HTML document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depeche_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>");
    /// assert!(doc.exists("h1").unwrap());
    /// ```
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses a small HTML fragment, such as the content of a live post.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`DepecheError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depeche_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(Element::new))
    }

    /// Returns true when at least one element matches the selector.
    pub fn exists(&self, selector: &str) -> Result<bool> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().is_some())
    }

    /// Returns the trimmed text of the first match, or an empty string.
    pub fn first_text(&self, selector: &str) -> Result<String> {
        Ok(self
            .select_first(selector)?
            .map(|el| el.text().trim().to_string())
            .unwrap_or_default())
    }

    /// Lists the top-level nodes of a fragment in document order.
    ///
    /// Element nodes are wrapped as [`FragmentNode::Element`], text nodes as
    /// [`FragmentNode::Text`]. Comments and other node types are skipped.
    pub fn top_level_nodes(&'_ self) -> Vec<FragmentNode<'_>> {
        self.html
            .root_element()
            .children()
            .filter_map(|node| {
                if let Some(element) = ElementRef::wrap(node) {
                    Some(FragmentNode::Element(Element::new(element)))
                } else {
                    node.value().as_text().map(|text| FragmentNode::Text(text.to_string()))
                }
            })
            .collect()
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use depeche_core::parse::Document;
///
/// let html = r#"<a class="link" href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// assert!(link.has_class("link"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content while skipping every descendant `tag` subtree.
    ///
    /// Used to drop embedded date spans from comment author lines without
    /// touching the parsed tree.
    pub fn text_excluding(&self, tag: &str) -> String {
        let mut out = String::new();
        collect_text_excluding(self.element, tag, &mut out);
        out
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Returns true when the element's class list contains `name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.element.value().classes().any(|class| class == name)
    }

    /// Returns true when the element's class list contains any of `names`.
    pub fn has_any_class(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_class(name))
    }

    /// Direct element children, in document order.
    pub fn children(&self) -> Vec<Element<'a>> {
        self.element.children().filter_map(ElementRef::wrap).map(Element::new).collect()
    }

    /// The next sibling that is an element, skipping text and comments.
    pub fn next_element_sibling(&self) -> Option<Element<'a>> {
        self.element.next_siblings().find_map(ElementRef::wrap).map(Element::new)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`DepecheError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }

    /// Selects the first descendant matching a CSS selector.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).next().map(Element::new))
    }
}

fn collect_text_excluding(element: ElementRef<'_>, tag: &str, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child)
            && !child_element.value().name().eq_ignore_ascii_case(tag)
        {
            collect_text_excluding(child_element, tag, out);
        }
    }
}
