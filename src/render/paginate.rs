//! Document pagination.

use serde::Serialize;

use super::{to_json, JsonFormat};
use crate::error::Result;
use crate::model::{EditorState, RootNode};

/// A contiguous slice of a document's top-level blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 0-based page index
    pub index: usize,
    /// Synthetic root holding the page's blocks
    pub root: RootNode,
}

#[derive(Serialize)]
struct PageState<'a> {
    root: &'a RootNode,
}

impl Page {
    /// Number of top-level blocks on this page.
    pub fn len(&self) -> usize {
        self.root.children().len()
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Serialize the page as a standalone editor state.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        to_json(&PageState { root: &self.root }, format)
    }

    /// Convert the page into a standalone editor state.
    pub fn into_state(self) -> EditorState {
        EditorState::new(self.root)
    }
}

/// Number of pages needed for `block_count` blocks.
pub fn page_count(block_count: usize, page_size: usize) -> usize {
    block_count.div_ceil(page_size.max(1))
}

/// Split a root's children into pages of `page_size` blocks.
///
/// Every page root carries the document root's attributes. An empty
/// document has no pages. A `page_size` of zero is treated as 1.
pub fn paginate(root: &RootNode, page_size: usize) -> Vec<Page> {
    root.children()
        .chunks(page_size.max(1))
        .enumerate()
        .map(|(index, blocks)| Page {
            index,
            root: root.with_children(blocks.to_vec()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, TextNode};

    fn root(blocks: usize) -> RootNode {
        RootNode::new(
            (0..blocks)
                .map(|i| Node::Text(TextNode::plain(i.to_string())))
                .collect(),
        )
    }

    #[test]
    fn test_paginate_sizes() {
        for (blocks, size) in [(0, 5), (1, 5), (5, 5), (6, 5), (12, 5), (7, 1), (3, 10)] {
            let pages = paginate(&root(blocks), size);
            assert_eq!(pages.len(), page_count(blocks, size));
            assert_eq!(pages.iter().map(Page::len).sum::<usize>(), blocks);
            assert!(pages.iter().enumerate().all(|(i, p)| p.index == i));
        }
    }

    #[test]
    fn test_paginate_keeps_order() {
        let pages = paginate(&root(7), 3);
        let texts: Vec<String> = pages
            .iter()
            .flat_map(|p| p.root.children().iter().map(Node::plain_text))
            .collect();
        assert_eq!(texts, vec!["0", "1", "2", "3", "4", "5", "6"]);
        assert_eq!(pages[2].len(), 1);
    }

    #[test]
    fn test_zero_page_size() {
        assert_eq!(paginate(&root(3), 0).len(), 3);
        assert_eq!(page_count(3, 0), 3);
    }

    #[test]
    fn test_page_json_is_editor_state() {
        let pages = paginate(&root(2), 5);
        let json = pages[0].to_json(JsonFormat::Compact).unwrap();
        let state: EditorState = serde_json::from_str(&json).unwrap();
        assert_eq!(state.root.children().len(), 2);
        assert_eq!(pages[0].clone().into_state(), state);
    }
}
