//! Flattening of the HTML-like fragments used as message content.
//!
//! Markup is parsed with `scraper` and never interpreted beyond what a
//! terminal can show: elements are either turned into line breaks and
//! bullets or dropped, leaving their text.

use crate::constants::ERROR_NOTICE_HTML;
use scraper::{ElementRef, Html};

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote",
    "section", "article", "header", "footer", "table", "tr",
];

/// Text of a fragment with every tag removed, like a DOM `textContent`.
pub fn text_content(markup: &str) -> String {
    Html::parse_fragment(markup).root_element().text().collect()
}

/// Display lines for a fragment. Block elements start new lines, list
/// items get a bullet and blank lines are dropped. A tag still being
/// streamed at the end of the input is hidden.
pub fn to_lines(markup: &str) -> Vec<String> {
    // The parser already drops an unterminated tag, but a lone `<` or `</`
    // at the very end would come back as text.
    let markup = markup
        .strip_suffix("</")
        .or_else(|| markup.strip_suffix('<'))
        .unwrap_or(markup);

    let fragment = Html::parse_fragment(markup);
    let mut text = String::new();
    flatten(fragment.root_element(), &mut text);

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

fn flatten(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child.value().name();
        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push('\n');
        }
        if name == "li" {
            out.push_str("• ");
        }
        flatten(child, out);
        if block {
            out.push('\n');
        }
    }
}

/// Escapes text so it displays literally when embedded in markup.
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

pub fn is_error_notice(content: &str) -> bool {
    content == ERROR_NOTICE_HTML
}
