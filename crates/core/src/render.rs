//! Output formats for block lists.
//!
//! JSON keeps the full block model (kind tag, styles, colors). Text is a
//! readable terminal rendering: one paragraph per block, optional wrapping.

use serde::Serialize;

use crate::Result;
use crate::block::{CommentPart, ContentBlock, SubBlock, TextBlock};
use crate::classify::Layout;
use crate::text::html_to_text;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
    /// Wrap the blocks in an object carrying the layout
    pub include_layout: bool,
}

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    layout: Layout,
    blocks: &'a [ContentBlock],
}

/// Serializes blocks as a JSON array.
///
/// # Example
///
/// ```rust
/// use depeche_core::{ContentBlock, to_json};
///
/// let json = to_json(&[ContentBlock::image("https://img.example.com/a.jpg")], false).unwrap();
/// assert_eq!(json, r#"[{"kind":"image","url":"https://img.example.com/a.jpg"}]"#);
/// ```
pub fn to_json(blocks: &[ContentBlock], pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(blocks)?) } else { Ok(serde_json::to_string(blocks)?) }
}

/// Serializes blocks with the given configuration.
pub fn convert_to_json(blocks: &[ContentBlock], layout: Layout, config: &JsonConfig) -> Result<String> {
    if !config.include_layout {
        return to_json(blocks, config.pretty);
    }

    let output = JsonOutput { layout, blocks };
    if config.pretty { Ok(serde_json::to_string_pretty(&output)?) } else { Ok(serde_json::to_string(&output)?) }
}

/// Renders blocks as plain text without wrapping.
pub fn to_text(blocks: &[ContentBlock]) -> String {
    convert_to_text(blocks, &TextConfig::default())
}

/// Renders blocks as plain text, separated by blank lines.
pub fn convert_to_text(blocks: &[ContentBlock], config: &TextConfig) -> String {
    blocks
        .iter()
        .map(|block| render_block(block, config.line_width))
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

fn render_block(block: &ContentBlock, width: usize) -> String {
    match block {
        ContentBlock::Text(text) => wrap_text(&text_with_markers(text), width),
        ContentBlock::Subtitle(text) => format!("## {}", text.text),
        ContentBlock::Image(image) => format!("[image] {}", image.url),
        ContentBlock::Tweet(tweet) => wrap_text(&format!("[tweet] {}", html_to_text(&tweet.html)), width),
        ContentBlock::Fact(fact) => fact.items.iter().map(|item| format!("* {}", item)).collect::<Vec<_>>().join("\n"),
        ContentBlock::Live(live) => {
            let mut lines = vec![format!("[{}] {}", live.date, live.author).trim().to_string()];
            lines.extend(live.sub_blocks.iter().map(|sub| render_sub_block(sub, width)));
            lines.join("\n")
        }
        ContentBlock::Comment(comment) => {
            let indent = if comment.reply { "    " } else { "" };
            let line = match comment.part {
                CommentPart::Author => format!("@ {}", comment.text),
                CommentPart::Content => comment.text.clone(),
            };
            line.lines().map(|l| format!("{}{}", indent, l)).collect::<Vec<_>>().join("\n")
        }
        ContentBlock::Blank => "---".to_string(),
    }
}

fn render_sub_block(sub: &SubBlock, width: usize) -> String {
    match sub {
        SubBlock::Paragraph { html } => wrap_text(&html_to_text(html), width),
        SubBlock::Image { url } => format!("[image] {}", url),
        SubBlock::Quote { html } => format!("> {}", html_to_text(html)),
    }
}

fn text_with_markers(text: &TextBlock) -> String {
    if text.style.italic { format!("\"{}\"", text.text) } else { text.text.clone() }
}

/// Wrap text to specified line width
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() { String::new() } else { wrap_words(&words, width) }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a slice of words to specified width
fn wrap_words(words: &[&str], width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = 0;

    for &word in words {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}
