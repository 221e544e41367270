//! HTML fragment cleaning and HTML-to-text conversion.

use scraper::ElementRef;

use crate::parse::Document;

const BLOCK_ELEMENTS: [&str; 14] = [
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "li",
    "ul",
    "ol",
    "blockquote",
    "figcaption",
    "section",
];

/// Unwraps every `<a>` element of a fragment, keeping its content.
///
/// Links therefore never render as clickable, but their text survives.
/// If the rewriter fails the input is returned unchanged.
pub fn unwrap_anchors(html: &str) -> String {
    let mut output: Vec<u8> = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("a", |el| {
                el.remove_and_keep_content();
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            output.extend_from_slice(c);
        },
    );

    match rewriter.write(html.as_bytes()) {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    match rewriter.end() {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    String::from_utf8_lossy(&output).into_owned()
}

/// Converts an HTML fragment to display text.
///
/// `<br>` and block boundaries become newlines, every other whitespace run
/// collapses to a single space, and lines are trimmed. Script and style
/// content is dropped.
pub fn html_to_text(html: &str) -> String {
    let doc = Document::parse_fragment(html);
    let mut raw = String::new();
    collect_text(doc.html().root_element(), &mut raw);

    raw.split('\n')
        .map(collapse_spaces)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        } else if let Some(child_element) = ElementRef::wrap(child) {
            match child_element.value().name() {
                "br" => out.push('\n'),
                "script" | "style" => {}
                name => {
                    let block = BLOCK_ELEMENTS.contains(&name);
                    if block {
                        out.push('\n');
                    }
                    collect_text(child_element, out);
                    if block {
                        out.push('\n');
                    }
                }
            }
        }
    }
}

fn collapse_spaces(line: &str) -> String {
    line.split(' ').filter(|word| !word.is_empty()).collect::<Vec<_>>().join(" ")
}
