//! Removes script/style subtrees, flattens lists, and collapses whitespace.
//! CPU-bound, so the parse itself runs on the blocking-task pool while the
//! async wrapper just awaits the join handle.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};

use crate::domain::models::TaskResult;
use crate::domain::ports::TaskResultMutator;
use crate::error::PersistError;

pub struct HtmlNormalizer;

impl HtmlNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parses `html` and returns the normalized plain text. Empty or absent
    /// input yields empty output.
    pub fn parse(html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }
        let document = Html::parse_document(html);
        let body_selector = Selector::parse("body").expect("static selector is valid");
        let root = document
            .select(&body_selector)
            .next()
            .unwrap_or_else(|| document.root_element());

        let raw = extract_text(*root);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for HtmlNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_text(node: ElementRef) -> String {
    let mut out = String::new();
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text.text);
                out.push(' ');
            }
            Node::Element(el) => {
                let Some(el_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "script" | "style" => {}
                    "ol" => {
                        out.push_str(&format_list(el_ref, true));
                        out.push(' ');
                    }
                    "ul" => {
                        out.push_str(&format_list(el_ref, false));
                        out.push(' ');
                    }
                    _ => {
                        out.push_str(&extract_text(el_ref));
                        out.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn format_list(list: ElementRef, ordered: bool) -> String {
    let mut items = Vec::new();
    for child in list.children() {
        if let Node::Element(el) = child.value() {
            if el.name() == "li" {
                if let Some(li_ref) = ElementRef::wrap(child) {
                    let text = extract_text(li_ref);
                    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    items.push(collapsed);
                }
            }
        }
    }
    if ordered {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        items
            .into_iter()
            .map(|item| format!("• {item}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl TaskResultMutator for HtmlNormalizer {
    async fn call(&self, value: TaskResult) -> Result<Option<TaskResult>, PersistError> {
        let content = value.content.clone();
        let text = tokio::task::spawn_blocking(move || Self::parse(&content))
            .await
            .expect("html normalization task panicked");
        Ok(Some(TaskResult {
            content: text,
            ..value
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style() {
        let out = HtmlNormalizer::parse("<script>bad()</script><style>.x{}</style><p>Good</p>");
        assert_eq!(out, "Good");
    }

    #[test]
    fn converts_ordered_list() {
        let out = HtmlNormalizer::parse("<ol><li>First</li><li>Second</li></ol>");
        assert!(out.contains("1. First 2. Second"));
    }

    #[test]
    fn converts_unordered_list() {
        let out = HtmlNormalizer::parse("<ul><li>Item 1</li><li>Item 2</li></ul>");
        assert!(out.contains("• Item 1 • Item 2"));
    }

    #[test]
    fn collapses_whitespace_runs() {
        let out = HtmlNormalizer::parse("<p>Multiple   spaces    here</p>");
        assert_eq!(out, "Multiple spaces here");
    }

    #[test]
    fn extracts_nested_inline_markup() {
        let out = HtmlNormalizer::parse("<body><p>Hello <b>world</b></p></body>");
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(HtmlNormalizer::parse(""), "");
    }

    #[test]
    fn falls_back_to_root_when_no_body() {
        let out = HtmlNormalizer::parse("<div><span>Text in span</span></div>");
        assert_eq!(out, "Text in span");
    }

    #[tokio::test]
    async fn mutator_replaces_content_in_place() {
        let normalizer = HtmlNormalizer::new();
        let result = TaskResult {
            title: "t".into(),
            url: "u".into(),
            status_code: 200,
            headers: Default::default(),
            content: "<p>Hello <b>world</b></p>".into(),
            hash: "h".into(),
            language: Default::default(),
            difficulty: Default::default(),
            temperature: 0.7,
        };
        let mutated = normalizer.call(result).await.unwrap().unwrap();
        assert_eq!(mutated.content, "Hello world");
    }
}
