//! Code highlighting: the highlighter seam, its init-once handle, the
//! allow-list sanitizer and the per-block processor.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mdlex::highlight::{CodeBlockProcessor, HighlighterHandle};
//! use mdlex::model::{CodeBlockId, CodeBlockNode};
//! use mdlex::convert::CodeJob;
//!
//! let processor = CodeBlockProcessor::new(Arc::new(HighlighterHandle::syntect()));
//! let job = CodeJob::new(CodeBlockId(0), "rust", "fn main() {}");
//! let html = processor.render(&job);
//! assert!(html.markup.starts_with("<pre>"));
//! ```

mod processor;
mod sanitize;
mod syntax;

pub use processor::{CodeBlockProcessor, RenderedCode, ResolveStats};
pub(crate) use processor::splice;
pub use sanitize::{escape_html, Sanitizer};
pub use syntax::{SyntaxHighlighter, DEFAULT_THEME};

use crate::error::Result;
use std::sync::{Arc, OnceLock};

/// A syntax-highlighting service.
///
/// Implementations return HTML markup for a piece of code. The markup is
/// treated as untrusted and always passes through a [`Sanitizer`] before
/// it reaches a document.
pub trait Highlighter: Send + Sync {
    /// Name of this highlighter.
    fn name(&self) -> &str;

    /// Check if the highlighter has a grammar for `language`.
    fn supports(&self, language: &str) -> bool;

    /// Highlight `code` written in `language`.
    fn highlight(&self, code: &str, language: &str) -> Result<String>;
}

type HighlighterFactory = Box<dyn Fn() -> Arc<dyn Highlighter> + Send + Sync>;

/// Lazily created, shared highlighter instance.
///
/// The factory runs on first use and at most once; every later call gets
/// the same instance.
pub struct HighlighterHandle {
    factory: HighlighterFactory,
    instance: OnceLock<Arc<dyn Highlighter>>,
}

impl HighlighterHandle {
    /// Create a handle around a factory.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Highlighter> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            instance: OnceLock::new(),
        }
    }

    /// Create a handle around an existing highlighter.
    pub fn from_highlighter(highlighter: Arc<dyn Highlighter>) -> Self {
        let instance = OnceLock::new();
        let _ = instance.set(highlighter.clone());
        Self {
            factory: Box::new(move || highlighter.clone()),
            instance,
        }
    }

    /// Create a handle that loads the bundled syntect grammars on first use.
    pub fn syntect() -> Self {
        Self::new(|| Arc::new(SyntaxHighlighter::new()) as Arc<dyn Highlighter>)
    }

    /// The process-wide handle.
    pub fn global() -> Arc<HighlighterHandle> {
        static GLOBAL: OnceLock<Arc<HighlighterHandle>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(HighlighterHandle::syntect()))
            .clone()
    }

    /// Get the highlighter, creating it on first use.
    pub fn get(&self) -> &Arc<dyn Highlighter> {
        self.instance.get_or_init(|| {
            log::debug!("Initializing highlighter");
            (self.factory)()
        })
    }

    /// Check if the highlighter has been created.
    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl std::fmt::Debug for HighlighterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlighterHandle")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
