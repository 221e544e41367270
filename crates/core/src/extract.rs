//! Standard and long-form article extraction.
//!
//! Both layouts produce five header blocks (headline, description, author,
//! date, read time) followed by one block per direct child of the content
//! container. Children are classified by an ordered rule table where the
//! first matching rule decides the block, so every rule can be tested in
//! isolation from rendering.

use crate::Result;
use crate::block::{ContentBlock, Icon, Padding, TextBlock, TextSize, TextStyle};
use crate::classify::Layout;
use crate::config::{Config, Theme};
use crate::parse::{Document, Element};
use crate::text::{html_to_text, unwrap_anchors};

/// Class of the "À lire" further-reading callout, never emitted.
pub const FURTHER_READING_CLASS: &str = "article__paragraph--lire";

/// Classes of body elements rendered as text.
pub const PARAGRAPH_CLASSES: [&str; 3] = ["article__paragraph", "article__status", "article__cite"];

/// Class of embedded tweets.
pub const TWEET_CLASS: &str = "twitter-tweet";

const CITE_CLASS: &str = "article__cite";

pub const HEADLINE_STYLE: TextStyle = TextStyle::BODY.bold().serif().size(TextSize::Headline).padding(Padding::Header);
pub const DESCRIPTION_STYLE: TextStyle = TextStyle::BODY.size(TextSize::Large).padding(Padding::Header);
pub const META_STYLE: TextStyle = TextStyle::BODY.size(TextSize::Small).padding(Padding::Header);
pub const SUBTITLE_STYLE: TextStyle = TextStyle::BODY.bold().serif().size(TextSize::Large).padding(Padding::Subtitle);

/// Selectors locating the header fields and body of one article layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSelectors {
    pub title: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub published: &'static str,
    pub modified: &'static str,
    pub read_time: &'static str,
    pub content: &'static str,
}

pub const STANDARD_SELECTORS: LayoutSelectors = LayoutSelectors {
    title: "h1.article__title",
    description: "p.article__desc",
    author: ".meta__author",
    published: ".meta__date--published",
    modified: ".meta__date--modified",
    read_time: ".meta__reading-time",
    content: "section.article__content",
};

pub const LONG_FORM_SELECTORS: LayoutSelectors = LayoutSelectors {
    title: "h1.article__heading",
    description: "p.article__standfirst",
    author: ".article__author-link",
    published: ".article__date--published",
    modified: ".article__date--modified",
    read_time: ".article__reading-time",
    content: "section.article__content--longform",
};

impl LayoutSelectors {
    /// Returns the selector table of an article layout; live pages have none.
    pub fn for_layout(layout: Layout) -> Option<&'static LayoutSelectors> {
        match layout {
            Layout::Standard => Some(&STANDARD_SELECTORS),
            Layout::LongForm => Some(&LONG_FORM_SELECTORS),
            Layout::Live => None,
        }
    }
}

/// State available to rule handlers.
pub(crate) struct RuleContext<'c> {
    pub config: &'c Config,
    /// Index of the element among its container's element children.
    pub position: usize,
}

/// A (predicate, handler) pair. A handler returning `None` consumes the
/// element without emitting a block.
pub(crate) struct Rule {
    pub name: &'static str,
    pub matches: fn(&Element<'_>) -> bool,
    pub build: fn(&Element<'_>, &RuleContext<'_>) -> Option<ContentBlock>,
}

/// Rules for direct children of an article's content container.
pub(crate) const BODY_RULES: &[Rule] = &[
    Rule { name: "figure", matches: is_figure, build: lead_aware_figure },
    Rule { name: "subtitle", matches: is_subtitle, build: subtitle_block },
    Rule { name: "further_reading", matches: is_further_reading, build: skip },
    Rule { name: "paragraph", matches: is_paragraph, build: paragraph_block },
    Rule { name: "tweet", matches: is_tweet, build: tweet_block },
];

/// Rules for top-level elements of a live post HTML fragment.
pub(crate) const FRAGMENT_RULES: &[Rule] = &[
    Rule { name: "tweet", matches: is_tweet, build: tweet_block },
    Rule { name: "image", matches: is_image, build: image_block },
    Rule { name: "text", matches: any_element, build: plain_text_block },
];

/// Applies the first matching rule; unmatched elements yield nothing.
pub(crate) fn apply_rules(rules: &[Rule], element: &Element<'_>, ctx: &RuleContext<'_>) -> Option<ContentBlock> {
    match rules.iter().find(|rule| (rule.matches)(element)) {
        Some(rule) => {
            let block = (rule.build)(element, ctx);
            if block.is_none() {
                tracing::debug!(rule = rule.name, position = ctx.position, "Rule produced no block");
            }
            block
        }
        None => {
            tracing::debug!(tag = %element.tag_name(), position = ctx.position, "Ignoring unrecognized element");
            None
        }
    }
}

fn is_figure(element: &Element<'_>) -> bool {
    element.tag_name() == "figure"
}

fn is_image(element: &Element<'_>) -> bool {
    matches!(element.tag_name().as_str(), "figure" | "img")
}

fn is_subtitle(element: &Element<'_>) -> bool {
    element.tag_name() == "h2"
}

fn is_further_reading(element: &Element<'_>) -> bool {
    element.has_class(FURTHER_READING_CLASS)
}

fn is_paragraph(element: &Element<'_>) -> bool {
    element.has_any_class(&PARAGRAPH_CLASSES)
}

fn is_tweet(element: &Element<'_>) -> bool {
    element.has_class(TWEET_CLASS)
}

fn any_element(_: &Element<'_>) -> bool {
    true
}

fn skip(_: &Element<'_>, _: &RuleContext<'_>) -> Option<ContentBlock> {
    None
}

/// The first figure of the body duplicates the page's lead image.
fn lead_aware_figure(element: &Element<'_>, ctx: &RuleContext<'_>) -> Option<ContentBlock> {
    if ctx.position == 0 {
        return None;
    }
    image_block(element, ctx)
}

fn image_block(element: &Element<'_>, _: &RuleContext<'_>) -> Option<ContentBlock> {
    let src = if element.tag_name() == "img" {
        element.attr("src")
    } else {
        element.select_first("img").ok().flatten().and_then(|img| img.attr("src"))
    };
    src.filter(|src| !src.trim().is_empty()).map(|src| ContentBlock::image(src.trim()))
}

fn subtitle_block(element: &Element<'_>, _: &RuleContext<'_>) -> Option<ContentBlock> {
    Some(ContentBlock::Subtitle(TextBlock::new(element.text().trim(), SUBTITLE_STYLE)))
}

fn paragraph_block(element: &Element<'_>, _: &RuleContext<'_>) -> Option<ContentBlock> {
    let style = if element.has_class(CITE_CLASS) { TextStyle::BODY.italic() } else { TextStyle::BODY };
    text_block_from_html(&element.inner_html(), style)
}

fn plain_text_block(element: &Element<'_>, _: &RuleContext<'_>) -> Option<ContentBlock> {
    text_block_from_html(&element.outer_html(), TextStyle::BODY)
}

fn tweet_block(element: &Element<'_>, ctx: &RuleContext<'_>) -> Option<ContentBlock> {
    ctx.config.display_tweets.then(|| ContentBlock::tweet(element.outer_html()))
}

/// Builds a text block from markup: anchors unwrapped, then converted to text.
///
/// Returns `None` when the fragment holds no visible text.
pub(crate) fn text_block_from_html(html: &str, style: TextStyle) -> Option<ContentBlock> {
    let markup = unwrap_anchors(html);
    let text = html_to_text(&markup);
    if text.is_empty() {
        return None;
    }
    Some(ContentBlock::Text(TextBlock::new(text, style).with_markup(markup.trim())))
}

/// Extracts a standard or long-form article.
///
/// # Example
///
/// ```rust
/// use depeche_core::{Config, Document, STANDARD_SELECTORS, extract_article};
///
/// let doc = Document::parse(r#"<h1 class="article__title">Title</h1>"#);
/// let blocks = extract_article(&doc, &STANDARD_SELECTORS, &Config::default()).unwrap();
/// assert_eq!(blocks.len(), 5);
/// assert_eq!(blocks[0].as_text(), Some("Title"));
/// ```
pub fn extract_article(doc: &Document, selectors: &LayoutSelectors, config: &Config) -> Result<Vec<ContentBlock>> {
    let mut blocks = header_blocks(doc, selectors, config)?;
    blocks.extend(body_blocks(doc, selectors, config)?);
    Ok(blocks)
}

/// The five header blocks, always present even when their fields are missing.
pub fn header_blocks(doc: &Document, selectors: &LayoutSelectors, config: &Config) -> Result<Vec<ContentBlock>> {
    let labels = &config.labels;

    let headline = doc.first_text(selectors.title)?;
    let description = doc.first_text(selectors.description)?;

    let author = doc.first_text(selectors.author)?;
    let author_line = if author.is_empty() { String::new() } else { format!("{} {}", labels.by, author) };

    let published = doc.first_text(selectors.published)?;
    let modified = doc.first_text(selectors.modified)?;
    let mut date_line = String::new();
    if !published.is_empty() {
        date_line = format!("{} {}", labels.published, published);
    }
    if !modified.is_empty() {
        date_line.push_str(&format!("{} {}", labels.modified, modified));
    }

    let read_time = doc.first_text(selectors.read_time)?;
    let icon = match config.theme {
        Theme::Light => Icon::ClockDark,
        Theme::Dark => Icon::ClockLight,
    };

    Ok(vec![
        ContentBlock::text(headline, HEADLINE_STYLE),
        ContentBlock::text(description, DESCRIPTION_STYLE),
        ContentBlock::text(author_line, META_STYLE.bold()),
        ContentBlock::text(date_line.trim(), META_STYLE),
        ContentBlock::Text(TextBlock::new(read_time, META_STYLE).with_icon(icon)),
    ])
}

/// One block per recognized direct child of the content container.
pub fn body_blocks(doc: &Document, selectors: &LayoutSelectors, config: &Config) -> Result<Vec<ContentBlock>> {
    let Some(container) = doc.select_first(selectors.content)? else {
        tracing::debug!(selector = selectors.content, "No content container");
        return Ok(Vec::new());
    };

    let blocks = container
        .children()
        .iter()
        .enumerate()
        .filter_map(|(position, child)| apply_rules(BODY_RULES, child, &RuleContext { config, position }))
        .collect();

    Ok(blocks)
}
