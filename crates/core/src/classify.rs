//! Layout classification.
//!
//! A news page uses one of three known structures. Classification is an
//! ordered first-match test: a page carrying both a live hero and a
//! long-form article is a live page.

use serde::Serialize;

use crate::Result;
use crate::parse::Document;

/// Marks a live-blog page.
pub const LIVE_HERO_SELECTOR: &str = "section.hero__live-content";

/// Marks a long-form article.
pub const LONG_FORM_SELECTOR: &str = "article.article--longform";

/// The article layouts the pipeline knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Standard,
    LongForm,
    Live,
}

const RULES: [(&str, Layout); 2] = [(LIVE_HERO_SELECTOR, Layout::Live), (LONG_FORM_SELECTOR, Layout::LongForm)];

/// Returns the layout of a parsed document, falling back to [`Layout::Standard`].
///
/// # Example
///
/// ```rust
/// use depeche_core::{Document, Layout, classify};
///
/// let doc = Document::parse(r#"<section class="hero__live-content"></section>"#);
/// assert_eq!(classify(&doc), Layout::Live);
/// assert_eq!(classify(&Document::parse("<p>hi</p>")), Layout::Standard);
/// ```
pub fn classify(doc: &Document) -> Layout {
    for (selector, layout) in RULES {
        match doc.exists(selector) {
            Ok(true) => return layout,
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, selector, "Skipping classification rule"),
        }
    }
    Layout::Standard
}

/// Like [`classify`] but propagates selector errors.
pub fn try_classify(doc: &Document) -> Result<Layout> {
    for (selector, layout) in RULES {
        if doc.exists(selector)? {
            return Ok(layout);
        }
    }
    Ok(Layout::Standard)
}
