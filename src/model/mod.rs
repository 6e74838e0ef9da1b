//! Document model types for the rich-text viewer.
//!
//! This module defines the node tree produced from a Markdown syntax tree.
//! It serializes to the editor-state JSON consumed by the viewer widget:
//! a single `root` whose children are paragraphs, headings, lists, links
//! and code blocks, with text runs as leaves.

mod code;
mod node;
mod text;

pub use code::{CodeBlockId, CodeBlockNode};
pub use node::{
    Direction, EditorState, Element, HeadingNode, HeadingTag, LinkNode, ListItemNode, ListNode,
    ListTag, ListType, Node, ParagraphNode, RootNode, LINK_REL,
};
pub use text::{StyleClass, TextFormat, TextMode, TextNode};

/// Format revision written into every node.
pub const NODE_VERSION: u32 = 1;

fn default_version() -> u32 {
    NODE_VERSION
}
