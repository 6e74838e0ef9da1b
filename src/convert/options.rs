//! Conversion options.

/// Language recorded on code blocks without a declared language.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Options for converting a Markdown syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Language used when a code block declares none
    pub default_language: String,

    /// Run the highlighter on code blocks
    pub highlight: bool,

    /// Resolve code blocks in parallel
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create new conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback code language.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Enable or disable highlighting.
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Enable or disable parallel code block resolution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            highlight: true,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.default_language, "text");
        assert!(options.highlight);
        assert!(options.parallel);
    }

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new()
            .with_default_language("rust")
            .with_highlight(false)
            .with_parallel(false);

        assert_eq!(options.default_language, "rust");
        assert!(!options.highlight);
        assert!(!options.parallel);
    }
}
