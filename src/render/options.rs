//! Rendering options and configuration.

use super::{JsonFormat, WindowConfig};

/// Top-level blocks per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Options for paginating and serializing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Top-level blocks per page (at least 1)
    pub page_size: usize,

    /// JSON output format
    pub json_format: JsonFormat,

    /// Viewport window shape
    pub window: WindowConfig,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size; zero is raised to 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the viewport window shape.
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            json_format: JsonFormat::default(),
            window: WindowConfig::default(),
        }
    }
}
