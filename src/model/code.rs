//! Code block nodes.

use serde::{Deserialize, Serialize};

use super::NODE_VERSION;

/// Stable identity of a code block within one conversion.
///
/// Highlighting results are spliced back into the tree by this id, so the
/// final order always matches source order regardless of completion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeBlockId(pub usize);

impl std::fmt::Display for CodeBlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code#{}", self.0)
    }
}

/// A code block.
///
/// While highlighting is in flight `html` is `None`. Once resolved, `html`
/// holds sanitized markup: highlighted when `highlighted` is set, otherwise
/// the escaped raw code in bare `<pre><code>` markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlockNode {
    #[serde(skip)]
    pub id: CodeBlockId,

    /// Declared language (defaults to "text")
    pub language: String,

    /// Raw code
    pub text: String,

    /// Sanitized markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Whether `html` came from the highlighter
    #[serde(default)]
    pub highlighted: bool,

    /// Nesting depth
    #[serde(default)]
    pub indent: u32,

    /// Node format revision
    #[serde(default = "super::default_version")]
    pub version: u32,
}

impl CodeBlockNode {
    /// Create a code block awaiting highlighting.
    pub fn pending(id: CodeBlockId, language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            language: language.into(),
            text: text.into(),
            html: None,
            highlighted: false,
            indent: 0,
            version: NODE_VERSION,
        }
    }

    /// Check if highlighting has not resolved yet.
    pub fn is_pending(&self) -> bool {
        self.html.is_none()
    }

    /// Store highlighted markup.
    pub fn resolve_highlighted(&mut self, html: String) {
        self.html = Some(html);
        self.highlighted = true;
    }

    /// Store fallback markup.
    pub fn resolve_plain(&mut self, html: String) {
        self.html = Some(html);
        self.highlighted = false;
    }
}
