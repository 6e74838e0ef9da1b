//! Markdown syntax tree consumed by the conversion pipeline.
//!
//! The node shapes follow mdast, so a tree produced by any mdast-compatible
//! parser can be deserialized directly with [`Root::from_json`]. Node kinds
//! the pipeline has no use for collapse into [`Node::Unknown`] instead of
//! failing the whole document.

mod markdown;

pub use markdown::parse_markdown;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Root of a parsed Markdown document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Top-level block nodes in source order
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Root {
    /// Create a root from block nodes.
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Deserialize an mdast JSON tree.
    ///
    /// Extra keys such as `position` or `data` are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check if the document has no block nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node of the Markdown syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// A paragraph of inline content
    Paragraph {
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A heading; `depth` is 1 for `#`
    Heading {
        depth: u8,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A fenced or indented code block
    Code {
        #[serde(default)]
        lang: Option<String>,
        value: String,
    },

    /// An ordered or unordered list of `ListItem` nodes
    List {
        #[serde(default)]
        ordered: bool,
        #[serde(default)]
        start: Option<u32>,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A list item holding paragraphs and nested lists
    ListItem {
        #[serde(default)]
        checked: Option<bool>,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// A hyperlink
    Link {
        url: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        children: Vec<Node>,
    },

    /// Plain text
    Text { value: String },

    /// Bold run
    Strong {
        #[serde(default)]
        children: Vec<Node>,
    },

    /// Italic run
    Emphasis {
        #[serde(default)]
        children: Vec<Node>,
    },

    /// Inline code span
    InlineCode { value: String },

    /// Hard line break
    Break,

    /// Horizontal rule
    ThematicBreak,

    /// Block quote
    Blockquote {
        #[serde(default)]
        children: Vec<Node>,
    },

    /// Raw HTML
    Html { value: String },

    /// Any node kind not listed above
    #[serde(other)]
    Unknown,
}

impl Node {
    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Create a paragraph node.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    /// Create a heading node.
    pub fn heading(depth: u8, children: Vec<Node>) -> Self {
        Node::Heading { depth, children }
    }

    /// Create a bold run.
    pub fn strong(children: Vec<Node>) -> Self {
        Node::Strong { children }
    }

    /// Create an italic run.
    pub fn emphasis(children: Vec<Node>) -> Self {
        Node::Emphasis { children }
    }

    /// Create a code block.
    pub fn code(lang: Option<&str>, value: impl Into<String>) -> Self {
        Node::Code {
            lang: lang.map(str::to_string),
            value: value.into(),
        }
    }

    /// Create a link.
    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Link {
            url: url.into(),
            title: None,
            children,
        }
    }

    /// Create a list from item contents.
    pub fn list(ordered: bool, items: Vec<Vec<Node>>) -> Self {
        Node::List {
            ordered,
            start: None,
            children: items
                .into_iter()
                .map(|children| Node::ListItem {
                    checked: None,
                    children,
                })
                .collect(),
        }
    }

    /// Check if this node is phrasing (inline) content.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Text { .. }
                | Node::Strong { .. }
                | Node::Emphasis { .. }
                | Node::Link { .. }
                | Node::InlineCode { .. }
                | Node::Break
                | Node::Html { .. }
        )
    }

    /// mdast type name, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::Code { .. } => "code",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "listItem",
            Node::Link { .. } => "link",
            Node::Text { .. } => "text",
            Node::Strong { .. } => "strong",
            Node::Emphasis { .. } => "emphasis",
            Node::InlineCode { .. } => "inlineCode",
            Node::Break => "break",
            Node::ThematicBreak => "thematicBreak",
            Node::Blockquote { .. } => "blockquote",
            Node::Html { .. } => "html",
            Node::Unknown => "unknown",
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text { value } | Node::InlineCode { value } | Node::Code { value, .. } => {
                value.clone()
            }
            Node::Break => "\n".to_string(),
            Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Link { children, .. }
            | Node::Strong { children }
            | Node::Emphasis { children }
            | Node::Blockquote { children } => children.iter().map(Node::plain_text).collect(),
            Node::ThematicBreak | Node::Html { .. } | Node::Unknown => String::new(),
        }
    }
}
