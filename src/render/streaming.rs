//! Streaming renderer yielding one page of JSON at a time.
//!
//! Pages are serialized lazily as the iterator advances, so a caller can
//! forward each fragment to the viewer without holding every page's JSON
//! in memory.
//!
//! # Example
//!
//! ```
//! use mdlex::render::{RenderEvent, RenderOptions, StreamingRenderer};
//!
//! fn main() -> mdlex::Result<()> {
//!     let result = mdlex::convert_markdown("# Title\n\nBody\n");
//!     let renderer = StreamingRenderer::new(&result.state.root, RenderOptions::default());
//!
//!     for event in renderer {
//!         match event? {
//!             RenderEvent::DocumentStart { page_count, .. } => assert_eq!(page_count, 1),
//!             RenderEvent::Page { index, json } => println!("page {}: {}", index, json),
//!             RenderEvent::DocumentEnd => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use super::{page_count, Page, RenderOptions};
use crate::error::Result;
use crate::model::RootNode;

/// Events emitted during streaming rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Rendering has started.
    DocumentStart {
        /// Total number of pages
        page_count: usize,
        /// Total number of top-level blocks
        block_count: usize,
    },

    /// One page as a standalone editor state.
    Page {
        /// 0-based page index
        index: usize,
        /// Page JSON
        json: String,
    },

    /// Rendering has completed.
    DocumentEnd,
}

impl RenderEvent {
    /// Get the JSON if this is a page event.
    pub fn json(&self) -> Option<&str> {
        match self {
            RenderEvent::Page { json, .. } => Some(json),
            _ => None,
        }
    }

    /// Check if this is a document boundary event.
    pub fn is_document_boundary(&self) -> bool {
        matches!(
            self,
            RenderEvent::DocumentStart { .. } | RenderEvent::DocumentEnd
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// Before any output
    Initial,
    /// Emitting pages
    InPages { next_page: usize },
    /// All pages emitted, waiting to emit document end
    PagesComplete,
    /// Rendering complete
    Done,
}

/// Iterator over a document's render events.
pub struct StreamingRenderer<'a> {
    root: &'a RootNode,
    options: RenderOptions,
    state: StreamState,
}

impl<'a> StreamingRenderer<'a> {
    /// Create a new streaming renderer.
    pub fn new(root: &'a RootNode, options: RenderOptions) -> Self {
        Self {
            root,
            options,
            state: StreamState::Initial,
        }
    }

    /// Number of pages the renderer will emit.
    pub fn page_count(&self) -> usize {
        page_count(self.root.children().len(), self.options.page_size)
    }

    /// Check if rendering is complete.
    pub fn is_done(&self) -> bool {
        self.state == StreamState::Done
    }

    fn render_page(&self, index: usize) -> Result<String> {
        let size = self.options.page_size.max(1);
        let blocks = self.root.children();
        let start = index * size;
        let end = (start + size).min(blocks.len());
        let page = Page {
            index,
            root: self.root.with_children(blocks[start..end].to_vec()),
        };
        page.to_json(self.options.json_format)
    }
}

impl Iterator for StreamingRenderer<'_> {
    type Item = Result<RenderEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            StreamState::Initial => {
                self.state = StreamState::InPages { next_page: 0 };
                Some(Ok(RenderEvent::DocumentStart {
                    page_count: self.page_count(),
                    block_count: self.root.children().len(),
                }))
            }

            StreamState::InPages { next_page } => {
                if next_page >= self.page_count() {
                    self.state = StreamState::Done;
                    return Some(Ok(RenderEvent::DocumentEnd));
                }

                self.state = StreamState::InPages {
                    next_page: next_page + 1,
                };
                match self.render_page(next_page) {
                    Ok(json) => Some(Ok(RenderEvent::Page {
                        index: next_page,
                        json,
                    })),
                    Err(e) => {
                        self.state = StreamState::PagesComplete;
                        Some(Err(e))
                    }
                }
            }

            StreamState::PagesComplete => {
                self.state = StreamState::Done;
                Some(Ok(RenderEvent::DocumentEnd))
            }

            StreamState::Done => None,
        }
    }
}

/// Collect every page's JSON from a streaming renderer.
pub fn collect_pages(renderer: StreamingRenderer<'_>) -> Result<Vec<String>> {
    let mut pages = Vec::new();
    for event in renderer {
        if let RenderEvent::Page { json, .. } = event? {
            pages.push(json);
        }
    }
    Ok(pages)
}
