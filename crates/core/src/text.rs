// ABOUTME: Cell text handling: browser-style visible text and annotation glyph stripping.
// ABOUTME: rendered_text mirrors innerText line structure; normalize keeps only the last line.

use ego_tree::NodeRef;
use scraper::node::Element;
use scraper::{ElementRef, Node};

/// Elements whose content is never rendered as text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// Elements that start and end on their own line when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "caption",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "tfoot",
    "thead",
    "tr",
    "ul",
];

/// Keep only the text after the last line break.
///
/// QuickFacts renders some values with an annotation glyph on its own line
/// above the number; the final line is the value. Text without a line break
/// is returned unchanged.
pub fn normalize(text: &str) -> &str {
    match text.rfind('\n') {
        Some(idx) => &text[idx + 1..],
        None => text,
    }
}

/// Visible text of an element, laid out the way a browser reports `innerText`.
///
/// Whitespace runs collapse to a single space, `<br>` and block elements
/// produce line breaks, hidden and non-rendered elements are dropped, and
/// empty lines are removed.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for child in element.children() {
        collect_text(child, &mut raw);
    }

    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            // Source line breaks are not rendered; only structure produces them.
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        }
        Node::Element(el) => {
            let name = el.name();
            if SKIPPED_TAGS.contains(&name) || is_hidden(el) {
                return;
            }
            if name == "br" {
                out.push('\n');
                return;
            }

            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            if is_cell(name) && follows_cell(node) {
                out.push(' ');
            }
            for child in node.children() {
                collect_text(child, out);
            }
            if block {
                out.push('\n');
            }
        }
        _ => {}
    }
}

fn is_cell(name: &str) -> bool {
    name == "td" || name == "th"
}

fn follows_cell(node: NodeRef<'_, Node>) -> bool {
    node.prev_siblings()
        .filter_map(|sibling| sibling.value().as_element())
        .any(|el| is_cell(el.name()))
}

/// Hidden by markup alone: the `hidden` attribute or an inline
/// `display:none`/`visibility:hidden` style. Stylesheet rules are not
/// evaluated, so text hidden through a class is still collected.
fn is_hidden(el: &Element) -> bool {
    if el.attr("hidden").is_some() {
        return true;
    }
    el.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}
