//! Statistics collected during conversion.

use serde::{Deserialize, Serialize};

use crate::highlight::ResolveStats;

/// Counts of what a conversion produced and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Top-level nodes emitted
    pub block_count: u32,

    /// Paragraphs emitted (top-level and inside list items)
    pub paragraph_count: u32,

    /// Headings emitted
    pub heading_count: u32,

    /// Lists emitted, nested ones included
    pub list_count: u32,

    /// List items emitted
    pub list_item_count: u32,

    /// Code blocks emitted
    pub code_block_count: u32,

    /// Code blocks rendered with highlighter markup
    pub highlighted_code_count: u32,

    /// Code blocks rendered with the plain fallback
    pub fallback_code_count: u32,

    /// Links kept
    pub link_count: u32,

    /// Links dropped for an unsafe scheme
    pub unsafe_link_count: u32,

    /// Block nodes skipped as unrecognized
    pub skipped_block_count: u32,

    /// Inline nodes skipped as unrecognized
    pub skipped_inline_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_block(&mut self) {
        self.block_count += 1;
    }

    pub(crate) fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    pub(crate) fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    pub(crate) fn add_list(&mut self) {
        self.list_count += 1;
    }

    pub(crate) fn add_list_item(&mut self) {
        self.list_item_count += 1;
    }

    pub(crate) fn add_code_block(&mut self) {
        self.code_block_count += 1;
    }

    pub(crate) fn add_link(&mut self) {
        self.link_count += 1;
    }

    pub(crate) fn add_unsafe_link(&mut self) {
        self.unsafe_link_count += 1;
    }

    pub(crate) fn skip_block(&mut self) {
        self.skipped_block_count += 1;
    }

    pub(crate) fn skip_inline(&mut self) {
        self.skipped_inline_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Record how code blocks were resolved.
    pub fn record_resolve(&mut self, resolved: ResolveStats) {
        self.highlighted_code_count += resolved.highlighted as u32;
        self.fallback_code_count += resolved.fallback as u32;
    }

    /// Code blocks not yet resolved.
    pub fn pending_code_count(&self) -> u32 {
        self.code_block_count
            .saturating_sub(self.highlighted_code_count + self.fallback_code_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = ConversionStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_record_resolve() {
        let mut stats = ConversionStats::new();
        stats.add_code_block();
        stats.add_code_block();
        stats.add_code_block();
        assert_eq!(stats.pending_code_count(), 3);

        stats.record_resolve(ResolveStats {
            highlighted: 2,
            fallback: 1,
            missing: 0,
        });
        assert_eq!(stats.highlighted_code_count, 2);
        assert_eq!(stats.fallback_code_count, 1);
        assert_eq!(stats.pending_code_count(), 0);
    }
}
