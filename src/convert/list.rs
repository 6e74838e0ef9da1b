//! Nested list materialization.

use super::Transformer;
use crate::ast;
use crate::model::{ListItemNode, ListNode, ListType, Node, ParagraphNode};

impl Transformer<'_> {
    /// Materialize a list at `indent`; nested lists go one level deeper.
    pub(super) fn list(
        &mut self,
        ordered: bool,
        start: Option<u32>,
        items: &[ast::Node],
        indent: u32,
    ) -> ListNode {
        let list_type = if ordered {
            ListType::Number
        } else {
            ListType::Bullet
        };

        let mut materialized = Vec::with_capacity(items.len());
        for item in items {
            let ast::Node::ListItem { checked, children } = item else {
                log::debug!("Skipping {} node inside list", item.kind());
                self.stats.skip_block();
                continue;
            };
            let value = materialized.len() as u32 + 1;
            let mut node = ListItemNode::new(value, self.list_item_children(children, indent), indent);
            node.checked = *checked;
            self.stats.add_list_item();
            materialized.push(node);
        }

        self.stats.add_list();
        let mut list = ListNode::new(list_type, materialized, indent);
        if ordered {
            list.start = start.unwrap_or(1);
        }
        list
    }

    fn list_item_children(&mut self, children: &[ast::Node], indent: u32) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match child {
                ast::Node::Paragraph { children } => {
                    let inline = self.format_inline(children);
                    self.stats.add_paragraph();
                    out.push(Node::Paragraph(ParagraphNode::new(inline, indent)));
                }
                ast::Node::List {
                    ordered,
                    start,
                    children,
                } => {
                    let nested = self.list(*ordered, *start, children, indent + 1);
                    out.push(Node::List(nested));
                }
                other => {
                    log::debug!("Skipping {} node inside list item", other.kind());
                    self.stats.skip_block();
                }
            }
        }
        out
    }
}
