//! Leaf text nodes and their styling.

use serde::{Deserialize, Serialize};

use super::NODE_VERSION;

/// Bitmask of inline text formats.
///
/// Bit 0 is bold, bit 1 is italic; `0` is plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextFormat(u32);

impl TextFormat {
    /// No formatting
    pub const PLAIN: TextFormat = TextFormat(0);
    /// Bold text
    pub const BOLD: TextFormat = TextFormat(1);
    /// Italic text
    pub const ITALIC: TextFormat = TextFormat(1 << 1);

    /// Raw bitmask value.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Build a format from a raw bitmask.
    pub fn from_bits(bits: u32) -> Self {
        TextFormat(bits)
    }

    /// Check if every bit of `other` is set.
    pub fn contains(self, other: TextFormat) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if bold is set.
    pub fn is_bold(self) -> bool {
        self.contains(TextFormat::BOLD)
    }

    /// Check if italic is set.
    pub fn is_italic(self) -> bool {
        self.contains(TextFormat::ITALIC)
    }

    /// Check if no format bit is set.
    pub fn is_plain(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for TextFormat {
    type Output = TextFormat;

    fn bitor(self, rhs: TextFormat) -> TextFormat {
        TextFormat(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TextFormat {
    fn bitor_assign(&mut self, rhs: TextFormat) {
        self.0 |= rhs.0;
    }
}

/// Font class chosen from the language of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleClass {
    /// Korean font
    #[serde(rename = "font-kr")]
    FontKr,
    /// Japanese font
    #[serde(rename = "font-jp")]
    FontJp,
    /// Simplified Chinese font
    #[serde(rename = "font-sc")]
    FontSc,
    /// Default sans-serif font
    #[default]
    #[serde(rename = "font-sans")]
    FontSans,
}

impl StyleClass {
    /// CSS class name.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::FontKr => "font-kr",
            StyleClass::FontJp => "font-jp",
            StyleClass::FontSc => "font-sc",
            StyleClass::FontSans => "font-sans",
        }
    }
}

impl std::fmt::Display for StyleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editing mode of a text node. The viewer only produces `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Normal,
    Token,
    Segmented,
}

/// A run of text with a single format and font class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    /// The text content
    pub text: String,

    /// Format bitmask
    #[serde(default)]
    pub format: TextFormat,

    /// Font class
    #[serde(default)]
    pub style_class: StyleClass,

    /// Editing mode
    #[serde(default)]
    pub mode: TextMode,

    /// Inline CSS (always empty)
    #[serde(default)]
    pub style: String,

    /// Lexical detail flags (always 0)
    #[serde(default)]
    pub detail: u32,

    /// Node format revision
    #[serde(default = "super::default_version")]
    pub version: u32,
}

impl TextNode {
    /// Create a text node.
    pub fn new(text: impl Into<String>, format: TextFormat, style_class: StyleClass) -> Self {
        Self {
            text: text.into(),
            format,
            style_class,
            mode: TextMode::Normal,
            style: String::new(),
            detail: 0,
            version: NODE_VERSION,
        }
    }

    /// Create an unformatted sans text node.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextFormat::PLAIN, StyleClass::FontSans)
    }

    /// Check if this node has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
