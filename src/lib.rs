//! # mdlex
//!
//! Markdown to rich-text editor state conversion with windowed rendering.
//!
//! This library turns a parsed Markdown syntax tree into the node tree a
//! Lexical-style rich-text viewer loads, highlights code blocks through an
//! allow-list sanitizer, and splits the result into pages that a viewport
//! materializes a few at a time as the reader scrolls.
//!
//! ## Quick Start
//!
//! ```
//! fn main() -> mdlex::Result<()> {
//!     let result = mdlex::convert_markdown("**bold** and *italic*");
//!     println!("{}", result.to_json()?);
//!
//!     for page in result.pages() {
//!         println!("page {} has {} blocks", page.index, page.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Lexical JSON**: paragraphs, headings, nested lists, links, code blocks
//! - **Script-aware fonts**: Korean, Japanese and Chinese runs get their own font class
//! - **Safe output**: script links dropped, highlighter markup allow-listed
//! - **Parallel highlighting**: code blocks resolved on the Rayon pool
//! - **Windowed rendering**: bounded page window driven by visibility signals

pub mod ast;
pub mod convert;
pub mod detect;
pub mod error;
pub mod ffi;
pub mod highlight;
pub mod model;
pub mod render;
pub mod session;
pub mod store;
pub mod viewer;

// Re-export commonly used types
pub use ast::parse_markdown;
pub use convert::{ConversionStats, ConvertOptions, ConvertResult, Transformer};
pub use detect::{classify, detect_language, DetectedLanguage};
pub use error::{Error, Result};
pub use highlight::{CodeBlockProcessor, Highlighter, HighlighterHandle, Sanitizer, SyntaxHighlighter};
pub use model::{
    CodeBlockNode, EditorState, HeadingNode, LinkNode, ListItemNode, ListNode, Node,
    ParagraphNode, RootNode, StyleClass, TextFormat, TextNode,
};
pub use render::{
    JsonFormat, Page, PageSink, RenderOptions, Viewport, WindowChange, WindowConfig,
    WindowManager,
};
pub use session::Session;
pub use store::{FileRecord, FileStore, JsonFileStore, MemoryStore};
pub use viewer::{load_editor_state, ViewState};

use std::sync::Arc;

/// Convert a syntax tree with default options.
///
/// Code blocks are highlighted with the process-wide highlighter.
///
/// # Example
///
/// ```
/// use mdlex::ast::{Node, Root};
///
/// let root = Root::new(vec![Node::heading(1, vec![Node::text("Title")])]);
/// let result = mdlex::convert_ast(&root);
/// assert_eq!(result.stats.heading_count, 1);
/// ```
pub fn convert_ast(root: &ast::Root) -> ConvertResult {
    Mdlex::new().convert_ast(root)
}

/// Convert a syntax tree with custom options.
pub fn convert_ast_with_options(root: &ast::Root, options: &ConvertOptions) -> ConvertResult {
    Mdlex::new().with_options(options.clone()).convert_ast(root)
}

/// Parse and convert Markdown text.
///
/// # Example
///
/// ```
/// let result = mdlex::convert_markdown("# Title\n\nBody\n");
/// assert_eq!(result.state.root.children().len(), 2);
/// ```
pub fn convert_markdown(markdown: &str) -> ConvertResult {
    Mdlex::new().convert_markdown(markdown)
}

/// Convert an mdast JSON tree.
///
/// # Example
///
/// ```
/// let json = r#"{"type": "root", "children": [
///     {"type": "paragraph", "children": [{"type": "text", "value": "hi"}]}
/// ]}"#;
/// let result = mdlex::convert_json(json)?;
/// assert_eq!(result.stats.paragraph_count, 1);
/// # Ok::<(), mdlex::Error>(())
/// ```
pub fn convert_json(mdast: &str) -> Result<ConvertResult> {
    Mdlex::new().convert_json(mdast)
}

/// Convert Markdown text straight to editor state JSON.
///
/// # Example
///
/// ```
/// use mdlex::{to_json, JsonFormat};
///
/// let json = to_json("Hello", JsonFormat::Compact)?;
/// assert!(json.starts_with("{\"root\":"));
/// # Ok::<(), mdlex::Error>(())
/// ```
pub fn to_json(markdown: &str, format: JsonFormat) -> Result<String> {
    convert_markdown(markdown).to_json_with(format)
}

/// Builder for converting Markdown documents.
///
/// # Example
///
/// ```
/// use mdlex::Mdlex;
///
/// let result = Mdlex::new()
///     .with_highlight(false)
///     .with_page_size(2)
///     .sequential()
///     .convert_markdown("# A\n\nB\n\nC\n");
///
/// assert_eq!(result.pages().len(), 2);
/// ```
pub struct Mdlex {
    options: ConvertOptions,
    render_options: RenderOptions,
    handle: Option<Arc<HighlighterHandle>>,
}

impl Mdlex {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            render_options: RenderOptions::default(),
            handle: None,
        }
    }

    /// Replace the conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Enable or disable highlighting.
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.options = self.options.with_highlight(highlight);
        self
    }

    /// Set the language for code blocks that declare none.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.options = self.options.with_default_language(language);
        self
    }

    /// Resolve code blocks one after another.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.with_parallel(false);
        self
    }

    /// Set blocks per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.render_options = self.render_options.with_page_size(page_size);
        self
    }

    /// Set the JSON output format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.render_options = self.render_options.with_json_format(format);
        self
    }

    /// Set the viewport window shape.
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.render_options = self.render_options.with_window(window);
        self
    }

    /// Use a specific highlighter instead of the process-wide one.
    pub fn with_highlighter(mut self, handle: Arc<HighlighterHandle>) -> Self {
        self.handle = Some(handle);
        self
    }

    fn processor(&self) -> CodeBlockProcessor {
        let handle = self
            .handle
            .clone()
            .unwrap_or_else(HighlighterHandle::global);
        CodeBlockProcessor::new(handle).with_highlighting(self.options.highlight)
    }

    /// Convert a syntax tree.
    pub fn convert_ast(&self, root: &ast::Root) -> ConvertResult {
        let conversion = Transformer::new(&self.options).transform(root);
        conversion
            .resolve(&self.processor(), self.options.parallel)
            .with_render_options(self.render_options.clone())
    }

    /// Parse and convert Markdown text.
    pub fn convert_markdown(&self, markdown: &str) -> ConvertResult {
        self.convert_ast(&parse_markdown(markdown))
    }

    /// Convert an mdast JSON tree.
    pub fn convert_json(&self, mdast: &str) -> Result<ConvertResult> {
        Ok(self.convert_ast(&ast::Root::from_json(mdast)?))
    }

    /// Open a session with this builder's configuration.
    pub fn session(&self) -> Session {
        Session::with_processor(Arc::new(self.processor()))
            .with_options(self.options.clone())
            .with_render_options(self.render_options.clone())
    }
}

impl Default for Mdlex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = Mdlex::default();
        assert!(builder.options.highlight);
        assert!(builder.options.parallel);
        assert_eq!(builder.render_options.page_size, 5);
        assert!(builder.handle.is_none());
    }

    #[test]
    fn test_builder_chained() {
        let builder = Mdlex::new()
            .with_highlight(false)
            .with_default_language("rust")
            .sequential()
            .with_page_size(0)
            .with_json_format(JsonFormat::Pretty);

        assert!(!builder.options.highlight);
        assert!(!builder.options.parallel);
        assert_eq!(builder.options.default_language, "rust");
        assert_eq!(builder.render_options.page_size, 1);
        assert_eq!(builder.render_options.json_format, JsonFormat::Pretty);
    }

    #[test]
    fn test_convert_markdown_scenario() {
        let result = Mdlex::new()
            .with_highlight(false)
            .convert_markdown("**bold** and *italic*");
        let children = result.state.root.children();
        assert_eq!(children.len(), 1);

        let runs: Vec<(String, u32)> = children[0]
            .children()
            .iter()
            .map(|n| match n {
                Node::Text(t) => (t.text.clone(), t.format.bits()),
                other => panic!("unexpected node {:?}", other),
            })
            .collect();
        assert_eq!(
            runs,
            vec![
                ("bold".to_string(), 1),
                (" and ".to_string(), 0),
                ("italic".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_convert_json_malformed() {
        assert!(matches!(convert_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_to_json_shape() {
        let json = to_json("", JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"root":{"type":"root","children":[],"direction":"ltr","format":"","indent":0,"version":1}}"#
        );
    }
}
