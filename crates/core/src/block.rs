//! Content block model.
//!
//! This module defines [`ContentBlock`], the unit of output of every
//! extractor. A block list is ordered: rendering collaborators must display
//! blocks in exactly the order they were produced. Blocks own all of their
//! data, so they outlive the [`Document`](crate::parse::Document) they were
//! extracted from.

use serde::Serialize;

use crate::{DepecheError, Result};

/// The kind of a [`ContentBlock`], used by renderers to pick a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Subtitle,
    Image,
    Tweet,
    Fact,
    Live,
    Comment,
    Blank,
}

/// One renderable unit produced by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(TextBlock),
    Subtitle(TextBlock),
    Image(ImageBlock),
    Tweet(TweetBlock),
    Fact(FactBlock),
    Live(LiveBlock),
    Comment(CommentBlock),
    Blank,
}

impl ContentBlock {
    /// Returns the kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Text(_) => BlockKind::Text,
            ContentBlock::Subtitle(_) => BlockKind::Subtitle,
            ContentBlock::Image(_) => BlockKind::Image,
            ContentBlock::Tweet(_) => BlockKind::Tweet,
            ContentBlock::Fact(_) => BlockKind::Fact,
            ContentBlock::Live(_) => BlockKind::Live,
            ContentBlock::Comment(_) => BlockKind::Comment,
            ContentBlock::Blank => BlockKind::Blank,
        }
    }

    /// Shorthand for a plain text block with the given style.
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        ContentBlock::Text(TextBlock::new(text, style))
    }

    /// Shorthand for an image block.
    pub fn image(url: impl Into<String>) -> Self {
        ContentBlock::Image(ImageBlock { url: url.into() })
    }

    /// Shorthand for a tweet block holding the embed markup.
    pub fn tweet(html: impl Into<String>) -> Self {
        ContentBlock::Tweet(TweetBlock { html: html.into() })
    }

    /// Returns the text of Text, Subtitle and Comment blocks.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(block) | ContentBlock::Subtitle(block) => Some(&block.text),
            ContentBlock::Comment(comment) => Some(&comment.text),
            _ => None,
        }
    }
}

/// Relative text size hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
    Headline,
}

/// Padding class hint, mapped to concrete dimensions by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    #[default]
    Body,
    Header,
    Subtitle,
    LiveDate,
    Tag,
}

/// Light formatting hints attached to text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub serif: bool,
    pub size: TextSize,
    pub padding: Padding,
}

impl TextStyle {
    pub const BODY: TextStyle =
        TextStyle { bold: false, italic: false, serif: false, size: TextSize::Normal, padding: Padding::Body };

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn serif(mut self) -> Self {
        self.serif = true;
        self
    }

    pub const fn size(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    pub const fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }
}

/// Icon hint for text blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Light clock glyph, drawn on dark backgrounds.
    ClockLight,
    /// Dark clock glyph, drawn on light backgrounds.
    ClockDark,
}

/// An ARGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Parses `#RRGGBB`, `RRGGBB` or `#AARRGGBB`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depeche_core::Color;
    ///
    /// let color = Color::from_hex("#ff8000").unwrap();
    /// assert_eq!((color.alpha, color.red, color.green, color.blue), (255, 255, 128, 0));
    /// assert!(Color::from_hex("orange").is_err());
    /// ```
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        let invalid = || DepecheError::InvalidColor(value.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self { alpha: 0xff, red: byte(0)?, green: byte(2)?, blue: byte(4)? }),
            8 => Ok(Self { alpha: byte(0)?, red: byte(2)?, green: byte(4)?, blue: byte(6)? }),
            _ => Err(invalid()),
        }
    }
}

/// Background and text colors of a live post tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagColors {
    pub background: Color,
    pub foreground: Color,
}

/// Payload of Text and Subtitle blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    /// Plain text, ready for display.
    pub text: String,
    /// Anchor-free HTML the text was converted from, when there was any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    pub style: TextStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<TagColors>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self { text: text.into(), markup: None, style, icon: None, colors: None }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_colors(mut self, colors: TagColors) -> Self {
        self.colors = Some(colors);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetBlock {
    /// Raw embed markup copied out of the source document.
    pub html: String,
}

/// One entry of a live page's facts panel: the items of one `<ul>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactBlock {
    pub items: Vec<String>,
}

/// A post rendered inline in a live page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveBlock {
    pub author: String,
    pub avatar_url: Option<String>,
    pub date: String,
    pub sub_blocks: Vec<SubBlock>,
}

/// Nested content owned by a [`LiveBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubBlock {
    Paragraph { html: String },
    Image { url: String },
    /// Reserved: no extractor produces quotes yet.
    Quote { html: String },
}

impl SubBlock {
    pub fn paragraph(html: impl Into<String>) -> Self {
        SubBlock::Paragraph { html: html.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        SubBlock::Image { url: url.into() }
    }

    pub fn quote(html: impl Into<String>) -> Self {
        SubBlock::Quote { html: html.into() }
    }
}

/// Which half of a comment pair a [`CommentBlock`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentPart {
    Author,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentBlock {
    pub part: CommentPart,
    pub text: String,
    /// Replies are rendered with extra left padding.
    pub reply: bool,
}
