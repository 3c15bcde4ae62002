use log::debug;
use scraper::{ElementRef, Html, Node, Selector};

use super::{ScanCategory, ScanResult};

/// Elements that start a new line in rendered text
const BLOCK_ELEMENTS: [&str; 24] = [
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "ol", "p", "section",
    "tr", "ul",
];

impl ScanCategory {
    /// CSS selector group matching elements whose class hints at this category
    pub fn selector(self) -> &'static str {
        match self {
            ScanCategory::Ingredients => "[class*='ingredient'], [class*='ingr']",
            ScanCategory::Steps => "[class*='step']",
            ScanCategory::Instructions => "[class*='instruction']",
            ScanCategory::Directions => "[class*='direction'], [class*='dir']",
        }
    }
}

/// Text of the first element in document order matching the category, one line per
/// rendered line
pub fn first_match_text(document: &Html, category: ScanCategory) -> String {
    let Ok(selector) = Selector::parse(category.selector()) else {
        return String::new();
    };

    match document.select(&selector).next() {
        Some(element) => {
            let text = inner_text(element);
            debug!(
                "Found {} list with {} lines",
                category.name(),
                text.lines().count()
            );
            text
        }
        None => String::new(),
    }
}

/// Run every category against a parsed page. Read-only.
pub fn extract_lists(document: &Html) -> ScanResult {
    let mut result = ScanResult::default();
    for category in ScanCategory::ALL {
        result.set(category, first_match_text(document, category));
    }
    result
}

/// Approximation of a browser's rendered inner text: block elements and `<br>` break
/// lines, runs of whitespace collapse, blank lines are dropped.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(out, text),
            Node::Element(el) => {
                let name = el.name();
                if name == "script" || name == "style" {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_text_breaks_on_blocks() {
        let document = Html::parse_fragment(
            r#"<ul class="x"><li>2 <b>cups</b> flour</li>
                 <li>1   egg</li><li>salt<br>pepper</li></ul>"#,
        );
        let selector = Selector::parse("ul").unwrap();
        let ul = document.select(&selector).next().unwrap();
        assert_eq!(inner_text(ul), "2 cups flour\n1 egg\nsalt\npepper");
    }

    #[test]
    fn test_inner_text_skips_scripts() {
        let document =
            Html::parse_fragment(r#"<div><script>var a = 1;</script><p>Stir well</p></div>"#);
        let selector = Selector::parse("div").unwrap();
        let div = document.select(&selector).next().unwrap();
        assert_eq!(inner_text(div), "Stir well");
    }

    #[test]
    fn test_first_match_wins() {
        let document = Html::parse_document(
            r#"<html><body>
                <div class="recipe-ingredients"><p>flour</p></div>
                <div class="more-ingredients"><p>sugar</p></div>
            </body></html>"#,
        );
        assert_eq!(
            first_match_text(&document, ScanCategory::Ingredients),
            "flour"
        );
    }

    #[test]
    fn test_short_marker_matches() {
        let document = Html::parse_document(
            r#"<html><body><section class="ingr-box"><p>butter</p></section></body></html>"#,
        );
        assert_eq!(
            first_match_text(&document, ScanCategory::Ingredients),
            "butter"
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        let document = Html::parse_document("<html><body><p>Hello</p></body></html>");
        let result = extract_lists(&document);
        assert!(result.is_empty());
    }
}
