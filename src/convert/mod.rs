//! Markdown syntax tree to document tree conversion.
//!
//! The [`Transformer`] walks the syntax tree once, synchronously, and
//! builds the complete document tree. Code blocks are emitted as pending
//! placeholders, each paired with a [`CodeJob`]; resolving the jobs writes
//! sanitized markup back into the placeholders by id, so the finished tree
//! keeps source order no matter when each block completes.
//!
//! # Example
//!
//! ```
//! use mdlex::ast::parse_markdown;
//! use mdlex::convert::{ConvertOptions, Transformer};
//!
//! let ast = parse_markdown("# Title\n\n```rust\nfn main() {}\n```\n");
//! let options = ConvertOptions::default();
//! let conversion = Transformer::new(&options).transform(&ast);
//!
//! assert_eq!(conversion.root.children().len(), 2);
//! assert_eq!(conversion.jobs.len(), 1);
//! ```

mod block;
mod inline;
mod link;
mod list;
mod options;
mod stats;

pub use link::is_safe_url;
pub use options::{ConvertOptions, DEFAULT_LANGUAGE};
pub use stats::ConversionStats;

use crate::error::Result;
use crate::highlight::CodeBlockProcessor;
use crate::model::{CodeBlockId, EditorState, RootNode};
use crate::render::{self, JsonFormat, Page, RenderOptions};

/// A code block waiting for highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeJob {
    /// Placeholder the result belongs to
    pub id: CodeBlockId,
    /// Declared or default language
    pub language: String,
    /// Raw code
    pub code: String,
}

impl CodeJob {
    /// Create a job.
    pub fn new(id: CodeBlockId, language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            language: language.into(),
            code: code.into(),
        }
    }
}

/// Builds a document tree from a syntax tree.
pub struct Transformer<'a> {
    options: &'a ConvertOptions,
    stats: ConversionStats,
    jobs: Vec<CodeJob>,
}

/// A converted tree whose code blocks may still be pending.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Document root
    pub root: RootNode,
    /// Highlighting work for the pending code blocks
    pub jobs: Vec<CodeJob>,
    /// Conversion statistics
    pub stats: ConversionStats,
}

impl Conversion {
    /// Resolve every code block and finish the document.
    pub fn resolve(mut self, processor: &CodeBlockProcessor, parallel: bool) -> ConvertResult {
        let jobs = std::mem::take(&mut self.jobs);
        let resolved = processor.resolve(&mut self.root, jobs, parallel);
        self.stats.record_resolve(resolved);
        ConvertResult::new(EditorState::new(self.root), self.stats)
    }

    /// Resolve every code block on tokio's blocking pool.
    #[cfg(feature = "async")]
    pub async fn resolve_async(
        mut self,
        processor: std::sync::Arc<CodeBlockProcessor>,
    ) -> Result<ConvertResult> {
        let jobs = std::mem::take(&mut self.jobs);
        let resolved = processor.resolve_async(&mut self.root, jobs).await?;
        self.stats.record_resolve(resolved);
        Ok(ConvertResult::new(EditorState::new(self.root), self.stats))
    }
}

/// A finished document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Editor state with every code block resolved
    pub state: EditorState,

    /// Conversion statistics
    pub stats: ConversionStats,

    /// Options for pagination and JSON output
    pub render: RenderOptions,
}

impl ConvertResult {
    /// Create a result with default render options.
    pub fn new(state: EditorState, stats: ConversionStats) -> Self {
        Self {
            state,
            stats,
            render: RenderOptions::default(),
        }
    }

    /// Set render options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Split the document into pages.
    pub fn pages(&self) -> Vec<Page> {
        render::paginate(&self.state.root, self.render.page_size)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        render::page_count(self.state.root.children().len(), self.render.page_size)
    }

    /// Serialize the whole document.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.state, self.render.json_format)
    }

    /// Serialize the whole document in a specific format.
    pub fn to_json_with(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.state, format)
    }
}
