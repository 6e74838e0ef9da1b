//! Inline formatting: text runs with format bits and font classes.

use super::{is_safe_url, Transformer};
use crate::ast;
use crate::detect::classify;
use crate::model::{LinkNode, Node, StyleClass, TextFormat, TextNode};

impl Transformer<'_> {
    /// Format inline nodes into text runs and links.
    pub(super) fn format_inline(&mut self, nodes: &[ast::Node]) -> Vec<Node> {
        let mut out = Vec::new();
        self.inline_into(nodes, TextFormat::PLAIN, None, &mut out);
        out
    }

    /// `class` is fixed by the outermost styled run; plain text classifies
    /// itself.
    fn inline_into(
        &mut self,
        nodes: &[ast::Node],
        format: TextFormat,
        class: Option<StyleClass>,
        out: &mut Vec<Node>,
    ) {
        for node in nodes {
            match node {
                ast::Node::Text { value } => {
                    if value.is_empty() {
                        continue;
                    }
                    let class = class.unwrap_or_else(|| classify(value));
                    self.stats.count_text(value);
                    out.push(Node::Text(TextNode::new(value.clone(), format, class)));
                }
                ast::Node::Strong { children } => {
                    let class = class.or_else(|| Some(classify(&node.plain_text())));
                    self.inline_into(children, format | TextFormat::BOLD, class, out);
                }
                ast::Node::Emphasis { children } => {
                    let class = class.or_else(|| Some(classify(&node.plain_text())));
                    self.inline_into(children, format | TextFormat::ITALIC, class, out);
                }
                ast::Node::Link {
                    url,
                    title,
                    children,
                } => {
                    if let Some(link) = self.link(url, title.as_deref(), children, format, class) {
                        out.push(link);
                    }
                }
                other => {
                    log::debug!("Skipping inline {} node", other.kind());
                    self.stats.skip_inline();
                }
            }
        }
    }

    /// Build a link node, or `None` when the URL is unsafe.
    pub(super) fn link(
        &mut self,
        url: &str,
        title: Option<&str>,
        children: &[ast::Node],
        format: TextFormat,
        class: Option<StyleClass>,
    ) -> Option<Node> {
        if !is_safe_url(url) {
            log::warn!("Dropping link with unsafe URL scheme");
            self.stats.add_unsafe_link();
            return None;
        }

        let mut inner = Vec::new();
        self.inline_into(children, format, class, &mut inner);
        self.stats.add_link();
        Some(Node::Link(LinkNode::new(
            url,
            title.map(str::to_string),
            inner,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertOptions;

    fn format(nodes: Vec<ast::Node>) -> Vec<Node> {
        let options = ConvertOptions::default();
        let mut transformer = Transformer::new(&options);
        transformer.format_inline(&nodes)
    }

    fn texts(nodes: &[Node]) -> Vec<(String, u32, StyleClass)> {
        nodes
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some((t.text.clone(), t.format.bits(), t.style_class)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bold_plain_italic() {
        let out = format(vec![
            ast::Node::strong(vec![ast::Node::text("bold")]),
            ast::Node::text(" and "),
            ast::Node::emphasis(vec![ast::Node::text("italic")]),
        ]);
        assert_eq!(
            texts(&out),
            vec![
                ("bold".to_string(), 1, StyleClass::FontSans),
                (" and ".to_string(), 0, StyleClass::FontSans),
                ("italic".to_string(), 2, StyleClass::FontSans),
            ]
        );
    }

    #[test]
    fn test_nested_styles_combine() {
        let out = format(vec![ast::Node::strong(vec![
            ast::Node::text("a"),
            ast::Node::emphasis(vec![ast::Node::text("b")]),
        ])]);
        let formats: Vec<u32> = texts(&out).into_iter().map(|(_, f, _)| f).collect();
        assert_eq!(formats, vec![1, 3]);
    }

    #[test]
    fn test_run_class_uses_aggregate_text() {
        // "x" alone is Latin, but the whole bold run is Korean.
        let out = format(vec![ast::Node::strong(vec![
            ast::Node::text("안녕하세요 "),
            ast::Node::emphasis(vec![ast::Node::text("x")]),
        ])]);
        let classes: Vec<StyleClass> = texts(&out).into_iter().map(|(_, _, c)| c).collect();
        assert_eq!(classes, vec![StyleClass::FontKr, StyleClass::FontKr]);
    }

    #[test]
    fn test_unknown_inline_dropped() {
        let options = ConvertOptions::default();
        let mut transformer = Transformer::new(&options);
        let out = transformer.format_inline(&[
            ast::Node::text("a"),
            ast::Node::InlineCode {
                value: "code".to_string(),
            },
            ast::Node::Unknown,
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(transformer.stats.skipped_inline_count, 2);
    }

    #[test]
    fn test_inline_link() {
        let out = format(vec![
            ast::Node::text("see "),
            ast::Node::link(
                "https://example.com",
                vec![ast::Node::strong(vec![ast::Node::text("here")])],
            ),
        ]);
        assert_eq!(out.len(), 2);
        match &out[1] {
            Node::Link(link) => {
                assert_eq!(link.url, "https://example.com");
                assert_eq!(texts(&link.element.children)[0].1, 1);
            }
            other => panic!("expected link, got {:?}", other),
        }
    }

    #[test]
    fn test_unsafe_inline_link_dropped() {
        let options = ConvertOptions::default();
        let mut transformer = Transformer::new(&options);
        let out = transformer.format_inline(&[ast::Node::link(
            "javascript:alert(1)",
            vec![ast::Node::text("click")],
        )]);
        assert!(out.is_empty());
        assert_eq!(transformer.stats.unsafe_link_count, 1);
    }
}
