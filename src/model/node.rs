//! Element (container) nodes and the document node sum type.

use serde::{Deserialize, Serialize};

use super::{CodeBlockId, CodeBlockNode, TextNode, NODE_VERSION};

/// Text direction of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left
    Rtl,
}

/// Attributes shared by every container node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Child nodes in document order
    #[serde(default)]
    pub children: Vec<Node>,

    /// Text direction
    #[serde(default)]
    pub direction: Direction,

    /// Alignment format string (always empty)
    #[serde(default)]
    pub format: String,

    /// Nesting depth
    #[serde(default)]
    pub indent: u32,

    /// Node format revision
    #[serde(default = "super::default_version")]
    pub version: u32,
}

impl Element {
    /// Create an element with children at the given indent.
    pub fn new(children: Vec<Node>, indent: u32) -> Self {
        Self {
            children,
            direction: Direction::Ltr,
            format: String::new(),
            indent,
            version: NODE_VERSION,
        }
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RootTag {
    #[default]
    Root,
}

/// The single top-level container of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
    #[serde(rename = "type", default)]
    kind: RootTag,

    #[serde(flatten)]
    pub element: Element,
}

impl RootNode {
    /// Create a root holding the given top-level nodes.
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            kind: RootTag::Root,
            element: Element::new(children, 0),
        }
    }

    /// Top-level nodes.
    pub fn children(&self) -> &[Node] {
        &self.element.children
    }

    /// Mutable top-level nodes.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.element.children
    }

    /// Check if the root has no children.
    pub fn is_empty(&self) -> bool {
        self.element.children.is_empty()
    }

    /// Create a root sharing this root's attributes but holding other children.
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        let mut element = self.element.clone();
        element.children = children;
        Self {
            kind: RootTag::Root,
            element,
        }
    }

    /// Find a code block by identity anywhere in the tree.
    pub fn find_code_block_mut(&mut self, id: CodeBlockId) -> Option<&mut CodeBlockNode> {
        self.element
            .children
            .iter_mut()
            .find_map(|child| child.find_code_block_mut(id))
    }

    /// Concatenated text of the document.
    pub fn plain_text(&self) -> String {
        self.element
            .children
            .iter()
            .map(Node::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Serialized editor state: `{"root": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    /// Document root
    pub root: RootNode,
}

impl EditorState {
    /// Wrap a root node.
    pub fn new(root: RootNode) -> Self {
        Self { root }
    }

    /// A state holding one paragraph with a message, shown in place of content.
    pub fn placeholder(message: &str) -> Self {
        let paragraph = Node::Paragraph(ParagraphNode::new(
            vec![Node::Text(TextNode::plain(message))],
            0,
        ));
        Self::new(RootNode::new(vec![paragraph]))
    }

    /// Check if the root has no children.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// A document node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Paragraph of inline nodes
    Paragraph(ParagraphNode),
    /// Heading of inline nodes
    Heading(HeadingNode),
    /// Bullet or numbered list
    List(ListNode),
    /// Item of a list
    ListItem(ListItemNode),
    /// Hyperlink wrapping inline nodes
    Link(LinkNode),
    /// Leaf text run
    Text(TextNode),
    /// Code block carrying sanitized markup
    CodeBlock(CodeBlockNode),
}

impl Node {
    /// Type tag as it appears in JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Paragraph(_) => "paragraph",
            Node::Heading(_) => "heading",
            Node::List(_) => "list",
            Node::ListItem(_) => "listitem",
            Node::Link(_) => "link",
            Node::Text(_) => "text",
            Node::CodeBlock(_) => "codeblock",
        }
    }

    /// Container attributes, or `None` for leaves.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Node::Paragraph(n) => Some(&n.element),
            Node::Heading(n) => Some(&n.element),
            Node::List(n) => Some(&n.element),
            Node::ListItem(n) => Some(&n.element),
            Node::Link(n) => Some(&n.element),
            Node::Text(_) | Node::CodeBlock(_) => None,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[Node] {
        self.element().map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Check if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        self.element().is_none()
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(t) => t.text.clone(),
            Node::CodeBlock(c) => c.text.clone(),
            _ => self.children().iter().map(Node::plain_text).collect(),
        }
    }

    /// Find a code block by identity in this subtree.
    pub fn find_code_block_mut(&mut self, id: CodeBlockId) -> Option<&mut CodeBlockNode> {
        match self {
            Node::CodeBlock(code) => (code.id == id).then_some(code),
            Node::Text(_) => None,
            Node::Paragraph(ParagraphNode { element })
            | Node::Heading(HeadingNode { element, .. })
            | Node::List(ListNode { element, .. })
            | Node::ListItem(ListItemNode { element, .. })
            | Node::Link(LinkNode { element, .. }) => element
                .children
                .iter_mut()
                .find_map(|child| child.find_code_block_mut(id)),
        }
    }
}

/// A paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphNode {
    #[serde(flatten)]
    pub element: Element,
}

impl ParagraphNode {
    /// Create a paragraph at the given indent.
    pub fn new(children: Vec<Node>, indent: u32) -> Self {
        Self {
            element: Element::new(children, indent),
        }
    }
}

/// Heading tag `h1`..`h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    /// Tag for a source depth, clamped to the valid range.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => HeadingTag::H1,
            2 => HeadingTag::H2,
            3 => HeadingTag::H3,
            4 => HeadingTag::H4,
            5 => HeadingTag::H5,
            _ => HeadingTag::H6,
        }
    }

    /// Heading level 1-6.
    pub fn level(self) -> u8 {
        match self {
            HeadingTag::H1 => 1,
            HeadingTag::H2 => 2,
            HeadingTag::H3 => 3,
            HeadingTag::H4 => 4,
            HeadingTag::H5 => 5,
            HeadingTag::H6 => 6,
        }
    }
}

/// A heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingNode {
    /// Heading tag
    pub tag: HeadingTag,

    #[serde(flatten)]
    pub element: Element,
}

impl HeadingNode {
    /// Create a heading.
    pub fn new(tag: HeadingTag, children: Vec<Node>) -> Self {
        Self {
            tag,
            element: Element::new(children, 0),
        }
    }
}

/// Kind of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Unordered
    Bullet,
    /// Ordered
    Number,
}

/// HTML tag used to render a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListTag {
    Ul,
    Ol,
}

/// A list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    /// Bullet or numbered
    pub list_type: ListType,

    /// First item number
    #[serde(default = "default_start")]
    pub start: u32,

    /// Rendering tag
    pub tag: ListTag,

    #[serde(flatten)]
    pub element: Element,
}

fn default_start() -> u32 {
    1
}

impl ListNode {
    /// Create a list of items at the given indent.
    pub fn new(list_type: ListType, items: Vec<ListItemNode>, indent: u32) -> Self {
        let tag = match list_type {
            ListType::Bullet => ListTag::Ul,
            ListType::Number => ListTag::Ol,
        };
        Self {
            list_type,
            start: 1,
            tag,
            element: Element::new(items.into_iter().map(Node::ListItem).collect(), indent),
        }
    }

    /// Iterate over the list's items.
    pub fn items(&self) -> impl Iterator<Item = &ListItemNode> {
        self.element.children.iter().filter_map(|child| match child {
            Node::ListItem(item) => Some(item),
            _ => None,
        })
    }
}

/// An item of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemNode {
    /// 1-based position among sibling items
    pub value: u32,

    /// Task state; `None` for plain items
    #[serde(default)]
    pub checked: Option<bool>,

    #[serde(flatten)]
    pub element: Element,
}

impl ListItemNode {
    /// Create an item.
    pub fn new(value: u32, children: Vec<Node>, indent: u32) -> Self {
        Self {
            value,
            checked: None,
            element: Element::new(children, indent),
        }
    }
}

/// `rel` attribute carried by every link.
pub const LINK_REL: &str = "noopener noreferrer";

/// A hyperlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    /// Target URL (never a script-executing scheme)
    pub url: String,

    /// Link relationship
    pub rel: String,

    /// Browsing context (always null)
    #[serde(default)]
    pub target: Option<String>,

    /// Tooltip
    #[serde(default)]
    pub title: Option<String>,

    #[serde(flatten)]
    pub element: Element,
}

impl LinkNode {
    /// Create a link. Callers are responsible for vetting `url`.
    pub fn new(url: impl Into<String>, title: Option<String>, children: Vec<Node>) -> Self {
        Self {
            url: url.into(),
            rel: LINK_REL.to_string(),
            target: None,
            title,
            element: Element::new(children, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_json_shape() {
        let state = EditorState::new(RootNode::new(vec![]));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "root": {
                    "type": "root",
                    "children": [],
                    "direction": "ltr",
                    "format": "",
                    "indent": 0,
                    "version": 1
                }
            })
        );
    }

    #[test]
    fn test_heading_tag_clamp() {
        assert_eq!(HeadingTag::from_depth(0), HeadingTag::H1);
        assert_eq!(HeadingTag::from_depth(3), HeadingTag::H3);
        assert_eq!(HeadingTag::from_depth(9), HeadingTag::H6);
        assert_eq!(HeadingTag::from_depth(9).level(), 6);
    }

    #[test]
    fn test_list_json_shape() {
        let item = ListItemNode::new(1, vec![], 2);
        let list = Node::List(ListNode::new(ListType::Number, vec![item], 2));
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["type"], "list");
        assert_eq!(json["listType"], "number");
        assert_eq!(json["tag"], "ol");
        assert_eq!(json["start"], 1);
        assert_eq!(json["indent"], 2);
        assert_eq!(json["children"][0]["type"], "listitem");
        assert_eq!(json["children"][0]["value"], 1);
    }

    #[test]
    fn test_link_json_shape() {
        let link = Node::Link(LinkNode::new(
            "https://example.com",
            None,
            vec![Node::Text(TextNode::plain("x"))],
        ));
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["rel"], "noopener noreferrer");
        assert_eq!(json["url"], "https://example.com");
    }

    #[test]
    fn test_round_trip_through_json() {
        let state = EditorState::placeholder("No content available");
        let json = serde_json::to_string(&state).unwrap();
        let back: EditorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_root_rejects_wrong_type() {
        let json = r#"{"root": {"type": "paragraph", "children": []}}"#;
        assert!(serde_json::from_str::<EditorState>(json).is_err());
    }

    #[test]
    fn test_with_children_keeps_attributes() {
        let root = RootNode::new(vec![Node::Text(TextNode::plain("a"))]);
        let page = root.with_children(vec![]);
        assert!(page.is_empty());
        assert_eq!(page.element.version, root.element.version);
        assert_eq!(page.element.direction, Direction::Ltr);
    }
}
