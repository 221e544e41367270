//! Live post feed decoding and expansion.
//!
//! The feed backing a live page is a JSON object with a `Posts` array. Each
//! post expands, in order, into an optional date block, one tag block per
//! icon, and its content blocks.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{DepecheError, Result};
use crate::block::{Color, ContentBlock, Padding, TagColors, TextBlock, TextStyle};
use crate::config::Config;
use crate::extract::{FRAGMENT_RULES, RuleContext, TWEET_CLASS, apply_rules};
use crate::parse::{Document, FragmentNode};
use crate::text::{html_to_text, unwrap_anchors};

/// `/Date(<millis>+0000)/`, the feed's timestamp encoding.
static FEED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Date\((-?\d+)(?:[+-]\d{4})?\)/").expect("valid date pattern"));

/// Leading text followed by an embedded quote.
static QUOTED_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(.*?)<blockquote([^>]*)>(.*?)</blockquote>").expect("valid blockquote pattern")
});

pub const LIVE_DATE_STYLE: TextStyle = TextStyle::BODY.bold().padding(Padding::LiveDate);
pub const LIVE_TAG_STYLE: TextStyle = TextStyle::BODY.bold().padding(Padding::Tag);

/// A decoded page of the live post feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LiveFeed {
    #[serde(default)]
    pub posts: Vec<LivePost>,
}

/// Post identifiers are numeric in practice but tolerated as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LivePost {
    #[serde(default)]
    pub id: Option<PostId>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub icons: Option<Vec<PostIcon>>,
}

impl LivePost {
    fn is_html(&self) -> bool {
        self.kind.as_deref().is_some_and(|kind| kind.eq_ignore_ascii_case("html"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostIcon {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub name: String,
}

/// Decodes a feed page.
///
/// # Errors
///
/// Returns [`DepecheError::DecodeError`] for malformed JSON.
pub fn decode_posts(json: &str) -> Result<LiveFeed> {
    Ok(serde_json::from_str(json)?)
}

/// Decodes a feed page and expands every post.
///
/// # Example
///
/// ```rust
/// use depeche_core::{Config, expand_feed_json};
///
/// let json = r#"{"Posts": [{"Id": 1, "Content": "Bonjour", "Type": "TEXT"}]}"#;
/// let blocks = expand_feed_json(json, &Config::default()).unwrap();
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].as_text(), Some("Bonjour"));
/// ```
pub fn expand_feed_json(json: &str, config: &Config) -> Result<Vec<ContentBlock>> {
    let feed = decode_posts(json)?;
    Ok(expand_posts(&feed, config))
}

/// Expands every post of a feed, in feed order.
pub fn expand_posts(feed: &LiveFeed, config: &Config) -> Vec<ContentBlock> {
    feed.posts.iter().flat_map(|post| expand_post(post, config)).collect()
}

/// Expands one post: date, tags, then content.
pub fn expand_post(post: &LivePost, config: &Config) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    if let Some(raw) = post.last_modified.as_deref() {
        match format_feed_date(raw, config) {
            Ok(date) => blocks.push(ContentBlock::text(date, LIVE_DATE_STYLE)),
            Err(e) => tracing::debug!(error = %e, post = ?post.id, "Skipping post date"),
        }
    }

    for icon in post.icons.iter().flatten() {
        match tag_colors(icon) {
            Ok(colors) => {
                blocks.push(ContentBlock::Text(TextBlock::new(icon.name.trim(), LIVE_TAG_STYLE).with_colors(colors)))
            }
            Err(e) => tracing::warn!(error = %e, tag = %icon.name, "Skipping post tag"),
        }
    }

    blocks.extend(content_blocks(post, config));
    blocks
}

fn tag_colors(icon: &PostIcon) -> Result<TagColors> {
    Ok(TagColors { background: Color::from_hex(&icon.color)?, foreground: Color::from_hex(&icon.text_color)? })
}

/// Formats a `/Date(<millis>+0000)/` value with the configured format and offset.
///
/// # Example
///
/// ```rust
/// use depeche_core::{Config, format_feed_date};
///
/// let date = format_feed_date("/Date(1583230500000+0000)/", &Config::default()).unwrap();
/// assert_eq!(date, "03/03/2020 10:15");
/// ```
pub fn format_feed_date(raw: &str, config: &Config) -> Result<String> {
    let millis: i64 = FEED_DATE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| DepecheError::InvalidDate(raw.to_string()))?;

    let shifted = i128::from(millis) + i128::from(config.utc_offset_hours) * 3_600_000;
    let datetime = OffsetDateTime::from_unix_timestamp_nanos(shifted * 1_000_000)
        .map_err(|e| DepecheError::InvalidDate(format!("{}: {}", raw, e)))?;

    let format = time::format_description::parse(&config.date_format)
        .map_err(|e| DepecheError::ConfigError(format!("invalid date format: {}", e)))?;
    datetime.format(&format).map_err(|e| DepecheError::InvalidDate(e.to_string()))
}

fn content_blocks(post: &LivePost, config: &Config) -> Vec<ContentBlock> {
    // Tweet embeds are blockquotes too; they go through the tweet rule.
    if let Some(caps) = QUOTED_CONTENT.captures(&post.content)
        && !caps.get(2).is_some_and(|attrs| attrs.as_str().contains(TWEET_CLASS))
    {
        let leading = caps.get(1).map_or("", |m| m.as_str());
        let quote = caps.get(3).map_or("", |m| m.as_str());
        return quoted_blocks(leading, quote);
    }

    if post.is_html() {
        return fragment_blocks(&post.content, config);
    }

    vec![ContentBlock::text(post.content.clone(), TextStyle::BODY)]
}

/// Leading text (when any) and the quote in italics.
fn quoted_blocks(leading: &str, quote: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::with_capacity(2);

    let markup = unwrap_anchors(leading);
    let text = html_to_text(&markup);
    if !text.is_empty() {
        blocks.push(ContentBlock::Text(TextBlock::new(text, TextStyle::BODY).with_markup(markup.trim())));
    }

    let quote_markup = unwrap_anchors(quote);
    blocks.push(ContentBlock::Text(
        TextBlock::new(html_to_text(&quote_markup), TextStyle::BODY.italic()).with_markup(quote_markup.trim()),
    ));
    blocks
}

fn fragment_blocks(html: &str, config: &Config) -> Vec<ContentBlock> {
    let fragment = Document::parse_fragment(html);

    fragment
        .top_level_nodes()
        .iter()
        .enumerate()
        .filter_map(|(position, node)| match node {
            FragmentNode::Element(element) => apply_rules(FRAGMENT_RULES, element, &RuleContext { config, position }),
            FragmentNode::Text(text) => {
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                (!text.is_empty()).then(|| ContentBlock::text(text, TextStyle::BODY))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use pretty_assertions::assert_eq;

    fn post(content: &str, kind: &str) -> LivePost {
        LivePost { content: content.to_string(), kind: Some(kind.to_string()), ..Default::default() }
    }

    fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
        blocks.iter().map(ContentBlock::kind).collect()
    }

    #[test]
    fn test_decode_feed() {
        let json = r##"{
            "Posts": [
                {
                    "Id": 123,
                    "Content": "Texte",
                    "Type": "TEXT",
                    "LastModified": "/Date(1583230500000+0000)/",
                    "Icons": [{"Color": "#E30613", "TextColor": "#FFFFFF", "Name": "Urgent"}]
                },
                {"Id": "abc", "Content": "Autre", "Icons": null}
            ],
            "Total": 2
        }"##;
        let feed = decode_posts(json).unwrap();

        assert_eq!(feed.posts.len(), 2);
        assert_eq!(feed.posts[0].id, Some(PostId::Number(123)));
        assert_eq!(feed.posts[1].id, Some(PostId::Text("abc".into())));
        assert_eq!(feed.posts[0].icons.as_ref().unwrap()[0].name, "Urgent");
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        assert!(matches!(decode_posts("{\"Posts\": [}"), Err(DepecheError::DecodeError(_))));
        assert!(matches!(decode_posts("{\"Posts\": 3}"), Err(DepecheError::DecodeError(_))));
    }

    #[test]
    fn test_missing_posts_is_empty_feed() {
        assert!(decode_posts("{}").unwrap().posts.is_empty());
    }

    #[test]
    fn test_full_post_expansion_order() {
        let json = r##"{"Posts": [{
            "Content": "Le point",
            "Type": "TEXT",
            "LastModified": "/Date(1583230500000+0000)/",
            "Icons": [
                {"Color": "#E30613", "TextColor": "#FFFFFF", "Name": "Urgent"},
                {"Color": "1A1A1A", "TextColor": "FFFFFF", "Name": "Vidéo"}
            ]
        }]}"##;
        let blocks = expand_feed_json(json, &Config::default()).unwrap();

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].as_text(), Some("03/03/2020 10:15"));
        assert_eq!(blocks[1].as_text(), Some("Urgent"));
        assert_eq!(blocks[2].as_text(), Some("Vidéo"));
        assert_eq!(blocks[3].as_text(), Some("Le point"));

        let ContentBlock::Text(tag) = &blocks[1] else { panic!("expected tag block") };
        let colors = tag.colors.unwrap();
        assert_eq!(colors.background, Color { alpha: 255, red: 0xE3, green: 0x06, blue: 0x13 });
        assert_eq!(colors.foreground, Color { alpha: 255, red: 255, green: 255, blue: 255 });
    }

    #[test]
    fn test_date_offset_and_absence() {
        let config = Config::builder().utc_offset_hours(1).date_format("[hour]h[minute]").build();
        assert_eq!(format_feed_date("/Date(1583230500000+0000)/", &config).unwrap(), "11h15");
        assert!(matches!(format_feed_date("yesterday", &config), Err(DepecheError::InvalidDate(_))));

        let mut undated = post("Sans date", "TEXT");
        undated.last_modified = Some("garbage".into());
        assert_eq!(kinds(&expand_post(&undated, &config)), vec![BlockKind::Text]);
    }

    #[test]
    fn test_invalid_tag_color_drops_only_that_tag() {
        let mut tagged = post("Texte", "TEXT");
        tagged.icons = Some(vec![
            PostIcon { color: "red".into(), text_color: "#FFFFFF".into(), name: "Cassé".into() },
            PostIcon { color: "#000000".into(), text_color: "#FFFFFF".into(), name: "Direct".into() },
        ]);
        let blocks = expand_post(&tagged, &Config::default());

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_text(), Some("Direct"));
    }

    #[test]
    fn test_blockquote_content_yields_two_blocks() {
        let blocks = expand_post(&post("Il a déclaré :<blockquote>« Nous tiendrons »</blockquote>", "HTML"), &Config::default());

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_text(), Some("Il a déclaré :"));
        assert_eq!(blocks[1].as_text(), Some("« Nous tiendrons »"));
        assert!(matches!(&blocks[1], ContentBlock::Text(b) if b.style.italic));
        assert!(matches!(&blocks[0], ContentBlock::Text(b) if !b.style.italic));
    }

    #[test]
    fn test_blockquote_without_leading_text_yields_one_block() {
        let blocks = expand_post(&post("  <blockquote class=\"q\">Seule citation</blockquote>", "TEXT"), &Config::default());

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].as_text(), Some("Seule citation"));
        assert!(matches!(&blocks[0], ContentBlock::Text(b) if b.style.italic));
    }

    #[test]
    fn test_html_content_classification() {
        let content = r#"Introduction <p>Un paragraphe avec <a href="/x">lien</a></p><figure><img src="https://img.example.com/1.jpg"></figure><div class="twitter-tweet">tweet</div>"#;

        let hidden = expand_post(&post(content, "HTML"), &Config::default());
        assert_eq!(kinds(&hidden), vec![BlockKind::Text, BlockKind::Text, BlockKind::Image]);
        assert_eq!(hidden[0].as_text(), Some("Introduction"));
        assert_eq!(hidden[1].as_text(), Some("Un paragraphe avec lien"));
        assert_eq!(hidden[2], ContentBlock::image("https://img.example.com/1.jpg"));

        let shown = expand_post(&post(content, "html"), &Config::builder().display_tweets(true).build());
        assert_eq!(kinds(&shown), vec![BlockKind::Text, BlockKind::Text, BlockKind::Image, BlockKind::Tweet]);
    }

    #[test]
    fn test_tweet_embed_follows_tweet_gate() {
        let content = r#"<p>Réaction :</p><blockquote class="twitter-tweet"><p>Texte du tweet</p>&mdash; @x</blockquote>"#;

        let hidden = expand_post(&post(content, "HTML"), &Config::default());
        assert_eq!(kinds(&hidden), vec![BlockKind::Text]);
        assert_eq!(hidden[0].as_text(), Some("Réaction :"));

        let shown = expand_post(&post(content, "HTML"), &Config::builder().display_tweets(true).build());
        assert_eq!(kinds(&shown), vec![BlockKind::Text, BlockKind::Tweet]);
        assert!(matches!(&shown[1], ContentBlock::Tweet(t) if t.html.contains("Texte du tweet")));
    }

    #[test]
    fn test_html_first_figure_is_kept() {
        let blocks = expand_post(&post(r#"<img src="a.jpg">"#, "HTML"), &Config::default());
        assert_eq!(blocks, vec![ContentBlock::image("a.jpg")]);
    }

    #[test]
    fn test_non_html_content_is_verbatim() {
        let blocks = expand_post(&post("Texte <b>brut</b>", "TEXT"), &Config::default());
        assert_eq!(blocks, vec![ContentBlock::text("Texte <b>brut</b>", TextStyle::BODY)]);
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let json = r#"{"Posts": [{"Content": "a<blockquote>b</blockquote>", "LastModified": "/Date(0+0000)/"}]}"#;
        let config = Config::default();
        assert_eq!(expand_feed_json(json, &config).unwrap(), expand_feed_json(json, &config).unwrap());
    }
}
