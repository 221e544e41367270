//! Live-blog page extraction.
//!
//! A live page yields its headline and description, the optional facts
//! panel, and one [`LiveBlock`] per post rendered inline in the markup.
//! Posts published after the page was rendered come from a JSON feed whose
//! identifier is embedded in a bootstrap script; see [`find_live_event_id`]
//! and the [`posts`](crate::posts) module.

use std::sync::LazyLock;

use regex::Regex;

use crate::Result;
use crate::block::{ContentBlock, FactBlock, LiveBlock, SubBlock, TextStyle};
use crate::config::{Config, LiveApiConfig};
use crate::extract::{DESCRIPTION_STYLE, HEADLINE_STYLE};
use crate::parse::{Document, Element};
use crate::text::unwrap_anchors;

pub const LIVE_TITLE_SELECTOR: &str = "h1.hero__live-title";
pub const LIVE_DESCRIPTION_SELECTOR: &str = "p.hero__live-desc";
pub const FACTS_PANEL_SELECTOR: &str = "section.live__facts";
pub const INLINE_POST_SELECTOR: &str = "section.post";

const POST_AUTHOR_SELECTOR: &str = ".post__author-name";
const POST_AVATAR_SELECTOR: &str = "img.post__author-avatar";
const POST_DATE_SELECTOR: &str = ".post__date";
const POST_CONTENT_SELECTOR: &str = ".post__content";

/// Bootstrap call of the live provider: `base.start(provider, '<digits>')`.
static LIVE_BOOTSTRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"base\.start\(\s*[^,()]+,\s*'(\d+)'\s*\)").expect("valid bootstrap pattern"));

/// Extracts the blocks of a live page, excluding feed posts.
///
/// # Example
///
/// ```rust
/// use depeche_core::{Config, Document, extract_live};
///
/// let html = r#"<section class="hero__live-content"><h1 class="hero__live-title">Direct</h1></section>"#;
/// let blocks = extract_live(&Document::parse(html), &Config::default()).unwrap();
/// assert_eq!(blocks[0].as_text(), Some("Direct"));
/// assert_eq!(blocks.len(), 2);
/// ```
pub fn extract_live(doc: &Document, config: &Config) -> Result<Vec<ContentBlock>> {
    let mut blocks = vec![
        ContentBlock::text(doc.first_text(LIVE_TITLE_SELECTOR)?, HEADLINE_STYLE),
        ContentBlock::text(doc.first_text(LIVE_DESCRIPTION_SELECTOR)?, DESCRIPTION_STYLE),
    ];
    blocks.extend(fact_blocks(doc, config)?);
    blocks.extend(inline_posts(doc)?);
    Ok(blocks)
}

/// The facts header followed by one Fact per `<ul>` of the facts panel.
///
/// Nothing is emitted, not even the header, when the panel is missing or
/// holds no list.
pub fn fact_blocks(doc: &Document, config: &Config) -> Result<Vec<ContentBlock>> {
    let Some(panel) = doc.select_first(FACTS_PANEL_SELECTOR)? else {
        return Ok(Vec::new());
    };

    let facts: Vec<ContentBlock> = panel
        .select("ul")?
        .iter()
        .map(|list| {
            let items = list
                .select("li")
                .unwrap_or_default()
                .iter()
                .map(|item| item.text().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            ContentBlock::Fact(FactBlock { items })
        })
        .collect();

    if facts.is_empty() {
        return Ok(facts);
    }

    let mut blocks = Vec::with_capacity(facts.len() + 1);
    blocks.push(ContentBlock::text(config.labels.facts.clone(), TextStyle::BODY.bold()));
    blocks.extend(facts);
    Ok(blocks)
}

/// One [`LiveBlock`] per post rendered in the page markup.
pub fn inline_posts(doc: &Document) -> Result<Vec<ContentBlock>> {
    doc.select(INLINE_POST_SELECTOR)?
        .iter()
        .map(|post| live_block(post).map(ContentBlock::Live))
        .collect()
}

fn live_block(post: &Element<'_>) -> Result<LiveBlock> {
    let text_of = |selector: &str| -> Result<String> {
        Ok(post.select_first(selector)?.map(|el| el.text().trim().to_string()).unwrap_or_default())
    };

    let avatar_url = post
        .select_first(POST_AVATAR_SELECTOR)?
        .and_then(|img| img.attr("src"))
        .map(str::to_string);

    let sub_blocks = match post.select_first(POST_CONTENT_SELECTOR)? {
        Some(content) => content.children().iter().filter_map(sub_block).collect(),
        None => Vec::new(),
    };

    Ok(LiveBlock { author: text_of(POST_AUTHOR_SELECTOR)?, avatar_url, date: text_of(POST_DATE_SELECTOR)?, sub_blocks })
}

// Blockquotes stay paragraphs: no live markup produces `SubBlock::Quote` yet.
fn sub_block(element: &Element<'_>) -> Option<SubBlock> {
    match element.tag_name().as_str() {
        "img" => element.attr("src").map(SubBlock::image),
        "figure" => element.select_first("img").ok().flatten().and_then(|img| img.attr("src")).map(SubBlock::image),
        "p" => Some(SubBlock::paragraph(unwrap_anchors(element.inner_html().trim()))),
        _ => Some(SubBlock::paragraph(unwrap_anchors(element.outer_html().trim()))),
    }
}

/// Reads the live event identifier from a script body.
///
/// # Example
///
/// ```rust
/// use depeche_core::event_id_from_script;
///
/// assert_eq!(event_id_from_script("base.start(SCRBBL, '2854032');"), Some("2854032".to_string()));
/// assert_eq!(event_id_from_script("base.init()"), None);
/// ```
pub fn event_id_from_script(script: &str) -> Option<String> {
    LIVE_BOOTSTRAP.captures(script).and_then(|caps| caps.get(1)).map(|id| id.as_str().to_string())
}

/// Finds the live event identifier in the page's scripts.
///
/// `None` means the page has no linked post stream; this is not an error.
pub fn find_live_event_id(doc: &Document) -> Result<Option<String>> {
    Ok(doc.select("script")?.iter().find_map(|script| event_id_from_script(&script.text())))
}

/// A request for one page of a live post feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFeedRequest {
    pub event_id: String,
    pub page: u32,
}

impl LiveFeedRequest {
    /// Request for the first page of an event.
    pub fn new(event_id: impl Into<String>) -> Self {
        Self { event_id: event_id.into(), page: 0 }
    }

    /// Request for the page after this one.
    pub fn next_page(&self) -> Self {
        Self { event_id: self.event_id.clone(), page: self.page + 1 }
    }

    /// Builds the feed URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depeche_core::{LiveApiConfig, LiveFeedRequest};
    ///
    /// let api = LiveApiConfig { base_url: "https://api.example.com".into(), token: "T".into(), page_size: 20 };
    /// assert_eq!(
    ///     LiveFeedRequest::new("42").url(&api),
    ///     "https://api.example.com/event/42/page/0?Token=T&format=json&pageSize=20"
    /// );
    /// ```
    pub fn url(&self, api: &LiveApiConfig) -> String {
        format!(
            "{}/event/{}/page/{}?Token={}&format=json&pageSize={}",
            api.base_url.trim_end_matches('/'),
            self.event_id,
            self.page,
            api.token,
            api.page_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use pretty_assertions::assert_eq;

    const LIVE_PAGE: &str = r#"
        <html><body>
        <section class="hero__live-content">
            <h1 class="hero__live-title">Coronavirus : suivez la situation en direct</h1>
            <p class="hero__live-desc">Les dernières informations.</p>
        </section>
        <section class="live__facts">
            <ul><li>Premier fait</li><li>Deuxième fait</li></ul>
            <ul><li>Troisième fait</li></ul>
        </section>
        <script>window.foo = 1;</script>
        <script>
            require(['live'], function (base) { base.start(SCRIBBLE, '2854032'); });
        </script>
        </body></html>
    "#;

    #[test]
    fn test_live_page_with_facts() {
        let blocks = extract_live(&Document::parse(LIVE_PAGE), &Config::default()).unwrap();

        assert_eq!(
            blocks.iter().map(ContentBlock::kind).collect::<Vec<_>>(),
            vec![BlockKind::Text, BlockKind::Text, BlockKind::Text, BlockKind::Fact, BlockKind::Fact]
        );
        assert_eq!(blocks[0].as_text(), Some("Coronavirus : suivez la situation en direct"));
        assert_eq!(blocks[1].as_text(), Some("Les dernières informations."));
        assert_eq!(blocks[2].as_text(), Some("Les faits essentiels"));
        assert_eq!(
            blocks[3],
            ContentBlock::Fact(FactBlock { items: vec!["Premier fait".into(), "Deuxième fait".into()] })
        );
    }

    #[test]
    fn test_facts_header_withheld_without_lists() {
        let html = r#"<section class="hero__live-content"></section><section class="live__facts"><p>Rien</p></section>"#;
        let blocks = extract_live(&Document::parse(html), &Config::default()).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_inline_posts() {
        let html = r#"
            <section class="post">
                <img class="post__author-avatar" src="https://img.example.com/a.png">
                <span class="post__author-name">Marie</span>
                <span class="post__date">10:42</span>
                <div class="post__content">
                    <p>Un <a href="/z">lien</a> ici</p>
                    <figure><img src="https://img.example.com/p.jpg"></figure>
                    <blockquote>Citation</blockquote>
                </div>
            </section>
            <section class="post"><div class="post__content"></div></section>
        "#;
        let blocks = inline_posts(&Document::parse(html)).unwrap();

        assert_eq!(blocks.len(), 2);
        let ContentBlock::Live(first) = &blocks[0] else { panic!("expected live block") };
        assert_eq!(first.author, "Marie");
        assert_eq!(first.date, "10:42");
        assert_eq!(first.avatar_url.as_deref(), Some("https://img.example.com/a.png"));
        assert_eq!(
            first.sub_blocks,
            vec![
                SubBlock::paragraph("Un lien ici"),
                SubBlock::image("https://img.example.com/p.jpg"),
                SubBlock::paragraph("<blockquote>Citation</blockquote>"),
            ]
        );

        let ContentBlock::Live(second) = &blocks[1] else { panic!("expected live block") };
        assert!(second.sub_blocks.is_empty());
        assert_eq!(second.author, "");
        assert_eq!(second.avatar_url, None);
    }

    #[test]
    fn test_find_live_event_id() {
        let id = find_live_event_id(&Document::parse(LIVE_PAGE)).unwrap();
        assert_eq!(id, Some("2854032".to_string()));
    }

    #[test]
    fn test_event_id_absent() {
        let doc = Document::parse("<script>base.start(SCRIBBLE, 'abc');</script>");
        assert_eq!(find_live_event_id(&doc).unwrap(), None);
    }

    #[test]
    fn test_feed_request_pagination() {
        let api = LiveApiConfig::default();
        let request = LiveFeedRequest::new("7").next_page();

        assert_eq!(request.page, 1);
        let url = request.url(&api);
        assert!(url.starts_with("https://apiv1.scribblelive.com/event/7/page/1?Token="));
        assert!(url.ends_with("&format=json&pageSize=20"));
    }
}
