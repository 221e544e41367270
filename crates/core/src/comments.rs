//! Reader comment extraction for standard articles.
//!
//! The article page only links to its comments through a data attribute on
//! the reactions element. The linked page is fetched separately and every
//! comment becomes an author block followed by a content block. Any failure
//! along the way yields an empty list: comments never break an article.

use url::Url;

use crate::Result;
use crate::block::{CommentBlock, CommentPart, ContentBlock};
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::parse::{Document, Element};
use crate::text::html_to_text;

pub const REACTIONS_SELECTOR: &str = "#reactions";
pub const COMMENTS_URI_ATTRIBUTE: &str = "data-ajax-uri";
pub const COMMENT_SELECTOR: &str = ".comment";
pub const REPLY_CLASS: &str = "reponse";

const COMMENT_HEADER_SELECTOR: &str = ".comment__header";

/// Resolves the comments page linked from an article, if any.
///
/// # Example
///
/// ```rust
/// use depeche_core::{Config, Document, comments_uri};
///
/// let doc = Document::parse(r#"<section id="reactions" data-ajax-uri="/reactions/123.html"></section>"#);
/// let uri = comments_uri(&doc, &Config::default());
/// assert_eq!(uri.as_deref(), Some("https://www.lemonde.fr/reactions/123.html"));
/// ```
pub fn comments_uri(doc: &Document, config: &Config) -> Option<String> {
    let reactions = match doc.select_first(REACTIONS_SELECTOR) {
        Ok(Some(reactions)) => reactions,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid reactions selector");
            return None;
        }
    };

    let Some(raw) = reactions.attr(COMMENTS_URI_ATTRIBUTE).map(str::trim).filter(|raw| !raw.is_empty()) else {
        tracing::debug!("Reactions element has no comments link");
        return None;
    };

    match Url::parse(&config.site_url).and_then(|base| base.join(raw)) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!(error = %e, uri = raw, "Cannot resolve comments link");
            None
        }
    }
}

/// Fetches a comments page and parses it.
///
/// Fetch and parse failures are logged and produce an empty list.
pub async fn fetch_comments(fetcher: &dyn Fetcher, uri: &str) -> Vec<ContentBlock> {
    let html = match fetcher.fetch(uri).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(error = %e, %uri, "Comments fetch failed");
            return Vec::new();
        }
    };

    match parse_comments(&html) {
        Ok(blocks) => blocks,
        Err(e) => {
            tracing::warn!(error = %e, %uri, "Comments page could not be parsed");
            Vec::new()
        }
    }
}

/// Parses a comments page into (author, content) block pairs.
///
/// # Example
///
/// ```rust
/// use depeche_core::parse_comments;
///
/// let html = r#"<div class="comment"><p class="comment__header">Léa <span>hier</span></p><p>Bravo</p></div>"#;
/// let blocks = parse_comments(html).unwrap();
/// assert_eq!(blocks[0].as_text(), Some("Léa"));
/// assert_eq!(blocks[1].as_text(), Some("Bravo"));
/// ```
pub fn parse_comments(html: &str) -> Result<Vec<ContentBlock>> {
    let doc = Document::parse(html);
    let mut blocks = Vec::new();

    for comment in doc.select(COMMENT_SELECTOR)? {
        if let Some((author, content)) = comment_pair(&comment)? {
            blocks.push(author);
            blocks.push(content);
        }
    }

    Ok(blocks)
}

fn comment_pair(comment: &Element<'_>) -> Result<Option<(ContentBlock, ContentBlock)>> {
    let Some(header) = comment.select_first(COMMENT_HEADER_SELECTOR)? else {
        tracing::debug!("Skipping comment without header");
        return Ok(None);
    };

    let reply = comment.has_class(REPLY_CLASS);
    let author = collapse(&header.text_excluding("span"));
    let text = header.next_element_sibling().map(|body| html_to_text(&body.inner_html())).unwrap_or_default();

    Ok(Some((
        ContentBlock::Comment(CommentBlock { part: CommentPart::Author, text: author, reply }),
        ContentBlock::Comment(CommentBlock { part: CommentPart::Content, text, reply }),
    )))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
