//! Per-block highlighting with sanitization and plain fallback.

use std::sync::Arc;

use rayon::prelude::*;

use super::{escape_html, HighlighterHandle, Sanitizer};
use crate::convert::CodeJob;
use crate::model::{CodeBlockId, CodeBlockNode, RootNode};

/// Sanitized markup for one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCode {
    /// Markup confined to the sanitizer's allow-list
    pub markup: String,
    /// Whether the markup came from the highlighter
    pub highlighted: bool,
}

impl RenderedCode {
    /// Write this result into a code block node.
    pub fn apply(self, node: &mut CodeBlockNode) {
        if self.highlighted {
            node.resolve_highlighted(self.markup);
        } else {
            node.resolve_plain(self.markup);
        }
    }
}

/// Outcome counts of a resolve pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Blocks rendered with highlighter markup
    pub highlighted: usize,
    /// Blocks rendered with the plain fallback
    pub fallback: usize,
    /// Outcomes whose block was not found in the tree
    pub missing: usize,
}

/// Turns code jobs into sanitized code block markup.
///
/// Rendering never fails: an unsupported language, a disabled highlighter
/// or a highlighter error all produce the escaped raw code in bare
/// `<pre><code>` markup.
#[derive(Debug, Clone)]
pub struct CodeBlockProcessor {
    handle: Arc<HighlighterHandle>,
    sanitizer: Sanitizer,
    highlight: bool,
}

impl CodeBlockProcessor {
    /// Create a processor using the given highlighter handle.
    pub fn new(handle: Arc<HighlighterHandle>) -> Self {
        Self {
            handle,
            sanitizer: Sanitizer::code_block(),
            highlight: true,
        }
    }

    /// Enable or disable highlighting.
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Use a different sanitizer.
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// The highlighter handle.
    pub fn handle(&self) -> &Arc<HighlighterHandle> {
        &self.handle
    }

    /// Render one job to sanitized markup.
    pub fn render(&self, job: &CodeJob) -> RenderedCode {
        if self.highlight {
            let highlighter = self.handle.get();
            if highlighter.supports(&job.language) {
                match highlighter.highlight(&job.code, &job.language) {
                    Ok(markup) => {
                        return RenderedCode {
                            markup: self.sanitizer.sanitize(&markup),
                            highlighted: true,
                        };
                    }
                    Err(e) => {
                        log::warn!(
                            "Highlighting {} ({}) failed, using plain block: {}",
                            job.id,
                            job.language,
                            e
                        );
                    }
                }
            } else {
                log::debug!(
                    "{} has no grammar for '{}', using plain block",
                    highlighter.name(),
                    job.language
                );
            }
        }

        RenderedCode {
            markup: self.plain_markup(&job.code),
            highlighted: false,
        }
    }

    fn plain_markup(&self, code: &str) -> String {
        self.sanitizer
            .sanitize(&format!("<pre><code>{}</code></pre>", escape_html(code)))
    }

    /// Render one job into a finished code block node.
    pub fn process(&self, job: &CodeJob) -> CodeBlockNode {
        let mut node = CodeBlockNode::pending(job.id, job.language.clone(), job.code.clone());
        self.render(job).apply(&mut node);
        node
    }

    /// Render every job and splice the results into `root` by block id.
    pub fn resolve(&self, root: &mut RootNode, jobs: Vec<CodeJob>, parallel: bool) -> ResolveStats {
        let outcomes: Vec<(CodeBlockId, RenderedCode)> = if parallel {
            jobs.par_iter().map(|job| (job.id, self.render(job))).collect()
        } else {
            jobs.iter().map(|job| (job.id, self.render(job))).collect()
        };
        splice(root, outcomes)
    }

    /// Render every job on tokio's blocking pool and splice the results.
    #[cfg(feature = "async")]
    pub async fn resolve_async(
        self: Arc<Self>,
        root: &mut RootNode,
        jobs: Vec<CodeJob>,
    ) -> crate::Result<ResolveStats> {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let processor = Arc::clone(&self);
                tokio::task::spawn_blocking(move || (job.id, processor.render(&job)))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = handle
                .await
                .map_err(|e| crate::Error::Highlight(e.to_string()))?;
            outcomes.push(outcome);
        }
        Ok(splice(root, outcomes))
    }
}

/// Write outcomes into their blocks. Order of `outcomes` does not matter.
pub(crate) fn splice(
    root: &mut RootNode,
    outcomes: impl IntoIterator<Item = (CodeBlockId, RenderedCode)>,
) -> ResolveStats {
    let mut stats = ResolveStats::default();
    for (id, rendered) in outcomes {
        match root.find_code_block_mut(id) {
            Some(node) => {
                if rendered.highlighted {
                    stats.highlighted += 1;
                } else {
                    stats.fallback += 1;
                }
                rendered.apply(node);
            }
            None => {
                log::debug!("No code block {} in document", id);
                stats.missing += 1;
            }
        }
    }
    stats
}
