//! Viewport window management.
//!
//! Only a bounded window of pages around the visible one is materialized
//! in the viewer at any time. [`WindowManager`] is the pure state machine:
//! it turns visibility signals into [`WindowChange`]s. [`Viewport`] applies
//! those changes to a [`PageSink`], the viewer-side surface that mounts
//! and unmounts page JSON.

use std::ops::Range;

use super::{JsonFormat, Page};
use crate::error::{Error, Result};

/// Shape of the materialized window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Pages kept before the visible one
    pub before: usize,
    /// Pages kept after the visible one
    pub after: usize,
    /// Pages materialized before any visibility signal
    pub initial: usize,
}

impl WindowConfig {
    /// Maximum number of materialized pages.
    pub fn capacity(&self) -> usize {
        self.before + self.after + 1
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            before: 2,
            after: 2,
            initial: 3,
        }
    }
}

/// Materialization state of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Not rendered in the viewer
    Unmaterialized,
    /// Rendered in the viewer
    Materialized,
}

/// Pages entering and leaving the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowChange {
    /// Pages to render, ascending
    pub materialize: Vec<usize>,
    /// Pages to tear down, ascending
    pub dematerialize: Vec<usize>,
}

impl WindowChange {
    /// Check if nothing changes.
    pub fn is_empty(&self) -> bool {
        self.materialize.is_empty() && self.dematerialize.is_empty()
    }

    fn between(old: &Range<usize>, new: &Range<usize>) -> Self {
        Self {
            materialize: new.clone().filter(|i| !old.contains(i)).collect(),
            dematerialize: old.clone().filter(|i| !new.contains(i)).collect(),
        }
    }
}

/// Sliding window of materialized pages for one open document.
#[derive(Debug, Clone)]
pub struct WindowManager {
    page_count: usize,
    config: WindowConfig,
    window: Range<usize>,
    visible: Option<usize>,
}

impl WindowManager {
    /// Create a manager with the initial window materialized.
    pub fn new(page_count: usize, config: WindowConfig) -> Self {
        let initial = config.initial.min(config.capacity()).min(page_count);
        Self {
            page_count,
            config,
            window: 0..initial,
            visible: None,
        }
    }

    /// Change that brings an empty viewer to the current window.
    pub fn initial_change(&self) -> WindowChange {
        WindowChange::between(&(0..0), &self.window)
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Currently materialized pages.
    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    /// Last page reported visible.
    pub fn visible(&self) -> Option<usize> {
        self.visible
    }

    /// State of a page.
    pub fn state(&self, index: usize) -> PageState {
        if self.window.contains(&index) {
            PageState::Materialized
        } else {
            PageState::Unmaterialized
        }
    }

    /// Check if a page is materialized.
    pub fn is_materialized(&self, index: usize) -> bool {
        self.state(index) == PageState::Materialized
    }

    /// Number of materialized pages.
    pub fn materialized_count(&self) -> usize {
        self.window.len()
    }

    /// Window around `index`, shifted inward at the document edges so it
    /// holds as many pages as the document allows.
    pub fn window_for(&self, index: usize) -> Range<usize> {
        let size = self.config.capacity().min(self.page_count);
        let mut start = index.saturating_sub(self.config.before);
        let mut end = start + size;
        if end > self.page_count {
            end = self.page_count;
            start = end - size;
        }
        start..end
    }

    /// Handle a visibility signal for a page.
    ///
    /// Only `visible = true` moves the window; hidden signals return an
    /// empty change.
    pub fn on_visibility(&mut self, index: usize, visible: bool) -> Result<WindowChange> {
        if index >= self.page_count {
            return Err(Error::PageOutOfRange(index, self.page_count));
        }
        if !visible {
            return Ok(WindowChange::default());
        }

        let window = self.window_for(index);
        let change = WindowChange::between(&self.window, &window);
        log::trace!(
            "Page {} visible, window {:?} -> {:?}",
            index,
            self.window,
            window
        );
        self.window = window;
        self.visible = Some(index);
        Ok(change)
    }
}

/// Viewer-side surface that renders page JSON.
pub trait PageSink {
    /// Render a page.
    fn materialize(&mut self, index: usize, json: &str);

    /// Tear a page down.
    fn dematerialize(&mut self, index: usize);
}

/// A window manager driving a page sink.
///
/// Visibility signals are applied one at a time, each to completion:
/// pages leaving the window are torn down before new ones are rendered.
pub struct Viewport<S: PageSink> {
    pages: Vec<Page>,
    manager: WindowManager,
    format: JsonFormat,
    sink: S,
}

impl<S: PageSink> Viewport<S> {
    /// Attach a sink and render the initial window.
    pub fn attach(pages: Vec<Page>, config: WindowConfig, format: JsonFormat, sink: S) -> Result<Self> {
        let manager = WindowManager::new(pages.len(), config);
        let mut viewport = Self {
            pages,
            manager,
            format,
            sink,
        };
        let initial = viewport.manager.initial_change();
        viewport.apply(&initial)?;
        Ok(viewport)
    }

    /// Handle a visibility signal and update the sink.
    pub fn on_visibility(&mut self, index: usize, visible: bool) -> Result<WindowChange> {
        let change = self.manager.on_visibility(index, visible)?;
        self.apply(&change)?;
        Ok(change)
    }

    fn apply(&mut self, change: &WindowChange) -> Result<()> {
        for &index in &change.dematerialize {
            self.sink.dematerialize(index);
        }
        for &index in &change.materialize {
            let json = self.pages[index].to_json(self.format)?;
            self.sink.materialize(index, &json);
        }
        Ok(())
    }

    /// The window state.
    pub fn manager(&self) -> &WindowManager {
        &self.manager
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Tear down every materialized page and return the sink.
    pub fn detach(mut self) -> S {
        for index in self.manager.window() {
            self.sink.dematerialize(index);
        }
        self.sink
    }
}
