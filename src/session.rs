//! Document session with background code highlighting.
//!
//! A [`Session`] holds the document currently on screen. Loading a
//! document builds its tree immediately, with code blocks pending, and
//! hands the highlighting jobs to the rayon pool. Results come back over a
//! channel tagged with the generation of the document that asked for them;
//! results for a document that has since been replaced are counted and
//! dropped, never written into the new tree.
//!
//! # Example
//!
//! ```
//! use mdlex::Session;
//!
//! let mut session = Session::new();
//! session.load_markdown("# Notes\n\n```rust\nfn main() {}\n```\n");
//! session.wait();
//!
//! assert!(session.is_settled());
//! assert_eq!(session.pages().len(), 1);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::ast::{self, parse_markdown};
use crate::convert::{ConversionStats, ConvertOptions, Transformer};
use crate::error::Result;
use crate::highlight::{splice, CodeBlockProcessor, HighlighterHandle, RenderedCode};
use crate::model::{CodeBlockId, EditorState, RootNode};
use crate::render::{paginate, Page, PageSink, RenderOptions, Viewport};

/// Identity of one loaded document.
pub type Generation = u64;

#[derive(Debug)]
struct Outcome {
    generation: Generation,
    id: CodeBlockId,
    rendered: RenderedCode,
}

#[derive(Debug)]
struct LoadedDocument {
    root: RootNode,
    stats: ConversionStats,
    pending: usize,
}

/// The document currently open in a viewer.
pub struct Session {
    options: ConvertOptions,
    render: RenderOptions,
    processor: Arc<CodeBlockProcessor>,
    generation: Generation,
    document: Option<LoadedDocument>,
    sender: Sender<Outcome>,
    receiver: Receiver<Outcome>,
    discarded: usize,
}

impl Session {
    /// Create a session using the process-wide highlighter.
    pub fn new() -> Self {
        Self::with_processor(Arc::new(CodeBlockProcessor::new(HighlighterHandle::global())))
    }

    /// Create a session around a specific processor.
    pub fn with_processor(processor: Arc<CodeBlockProcessor>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            options: ConvertOptions::default(),
            render: RenderOptions::default(),
            processor,
            generation: 0,
            document: None,
            sender,
            receiver,
            discarded: 0,
        }
    }

    /// Set conversion options for later loads.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Load a syntax tree, replacing the current document.
    ///
    /// Returns the new document's generation. Highlighting still in flight
    /// for the previous document is discarded when it arrives.
    pub fn load(&mut self, root: &ast::Root) -> Generation {
        self.generation += 1;
        let generation = self.generation;

        let conversion = Transformer::new(&self.options).transform(root);
        let mut document = LoadedDocument {
            root: conversion.root,
            stats: conversion.stats,
            pending: 0,
        };

        let processor = if self.options.highlight {
            Arc::clone(&self.processor)
        } else {
            Arc::new(CodeBlockProcessor::clone(&self.processor).with_highlighting(false))
        };

        if self.options.parallel {
            document.pending = conversion.jobs.len();
            for job in conversion.jobs {
                let processor = Arc::clone(&processor);
                let sender = self.sender.clone();
                rayon::spawn(move || {
                    let rendered = processor.render(&job);
                    // The session may be gone; nothing to deliver to then.
                    let _ = sender.send(Outcome {
                        generation,
                        id: job.id,
                        rendered,
                    });
                });
            }
        } else {
            let resolved = processor.resolve(&mut document.root, conversion.jobs, false);
            document.stats.record_resolve(resolved);
        }

        log::debug!(
            "Loaded document generation {} ({} blocks, {} code blocks pending)",
            generation,
            document.root.children().len(),
            document.pending
        );
        self.document = Some(document);
        generation
    }

    /// Parse Markdown text and load it.
    pub fn load_markdown(&mut self, markdown: &str) -> Generation {
        self.load(&parse_markdown(markdown))
    }

    /// Close the current document. In-flight results are discarded.
    pub fn close(&mut self) {
        self.generation += 1;
        self.document = None;
    }

    /// Apply every outcome that has arrived. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.receiver.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until every code block of the current document is resolved.
    pub fn wait(&mut self) {
        while !self.is_settled() {
            match self.receiver.recv() {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(_) => break,
            }
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    /// Returns whether the document settled.
    pub fn wait_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_settled() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(_) => break,
            }
        }
        self.is_settled()
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        let document = match self.document.as_mut() {
            Some(document) if outcome.generation == self.generation => document,
            _ => {
                log::debug!(
                    "Discarding {} from superseded generation {}",
                    outcome.id,
                    outcome.generation
                );
                self.discarded += 1;
                return false;
            }
        };

        let resolved = splice(&mut document.root, [(outcome.id, outcome.rendered)]);
        document.stats.record_resolve(resolved);
        document.pending = document.pending.saturating_sub(1);
        true
    }

    /// Generation of the current document.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Check if a document is loaded.
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Check if no code block of the current document is pending.
    pub fn is_settled(&self) -> bool {
        self.document.as_ref().map_or(true, |d| d.pending == 0)
    }

    /// Code blocks of the current document still pending.
    pub fn pending_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.pending)
    }

    /// Outcomes dropped because their document was replaced.
    pub fn discarded_count(&self) -> usize {
        self.discarded
    }

    /// Root of the current document.
    pub fn root(&self) -> Option<&RootNode> {
        self.document.as_ref().map(|d| &d.root)
    }

    /// Editor state of the current document.
    pub fn state(&self) -> Option<EditorState> {
        self.root().cloned().map(EditorState::new)
    }

    /// Statistics of the current document.
    pub fn stats(&self) -> Option<&ConversionStats> {
        self.document.as_ref().map(|d| &d.stats)
    }

    /// Render options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Pages of the current document as it stands now.
    pub fn pages(&self) -> Vec<Page> {
        self.root()
            .map(|root| paginate(root, self.render.page_size))
            .unwrap_or_default()
    }

    /// Attach a viewer sink to the current pages.
    pub fn viewport<S: PageSink>(&self, sink: S) -> Result<Viewport<S>> {
        Viewport::attach(
            self.pages(),
            self.render.window,
            self.render.json_format,
            sink,
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn plain_session() -> Session {
        Session::new().with_options(ConvertOptions::default().with_highlight(false))
    }

    #[test]
    fn test_empty_session() {
        let session = plain_session();
        assert!(!session.is_loaded());
        assert!(session.is_settled());
        assert!(session.pages().is_empty());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_load_and_wait() {
        let mut session = plain_session();
        let generation = session.load_markdown("```\na\n```\n\n```\nb\n```\n");
        assert_eq!(generation, 1);

        session.wait();
        assert!(session.is_settled());
        let root = session.root().unwrap();
        for child in root.children() {
            match child {
                Node::CodeBlock(code) => assert!(!code.is_pending()),
                other => panic!("unexpected node {:?}", other),
            }
        }
        assert_eq!(session.stats().unwrap().fallback_code_count, 2);
    }

    #[test]
    fn test_sequential_load_resolves_immediately() {
        let mut session = Session::new().with_options(
            ConvertOptions::default()
                .with_highlight(false)
                .with_parallel(false),
        );
        session.load_markdown("```\nx\n```\n");
        assert!(session.is_settled());
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_close_discards_in_flight() {
        let mut session = plain_session();
        session.load_markdown("```\nx\n```\n");
        session.close();
        assert!(!session.is_loaded());

        let deadline = Instant::now() + Duration::from_secs(5);
        while session.discarded_count() == 0 && Instant::now() < deadline {
            session.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(session.discarded_count(), 1);
    }
}
