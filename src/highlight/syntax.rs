//! Highlighter backed by syntect's bundled grammars.

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::{escape_html, Highlighter};
use crate::error::{Error, Result};

/// Theme used for generated stylesheets unless another is requested.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Class prefix for highlight spans, keeps them clear of page CSS.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Language tags that mean "no highlighting".
const PLAIN_LANGUAGES: &[&str] = &["", "text", "plaintext", "plain", "txt"];

/// Highlighter producing class-annotated `<span>` markup.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
}

impl SyntaxHighlighter {
    /// Load the bundled grammars.
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let language = language.trim().to_lowercase();
        if PLAIN_LANGUAGES.contains(&language.as_str()) {
            return None;
        }
        self.syntax_set.find_syntax_by_token(syntax_token(&language))
    }

    /// CSS rules for the highlight classes under a bundled theme.
    pub fn stylesheet(theme: &str) -> Result<String> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(theme)
            .ok_or_else(|| Error::Highlight(format!("Unknown theme: {}", theme)))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| Error::Highlight(e.to_string()))
    }

    /// Names of the bundled themes.
    pub fn theme_names() -> Vec<String> {
        ThemeSet::load_defaults().themes.into_keys().collect()
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntaxHighlighter {
    fn name(&self) -> &str {
        "syntect"
    }

    fn supports(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| Error::UnsupportedLanguage(language.to_string()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| Error::Highlight(e.to_string()))?;
        }

        Ok(format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(&language.trim().to_lowercase()),
            generator.finalize()
        ))
    }
}

/// Map common fence tags to the tokens syntect registers.
fn syntax_token(language: &str) -> &str {
    match language {
        "javascript" | "jsx" | "mjs" => "js",
        "typescript" | "tsx" => "ts",
        "python" | "py3" => "py",
        "rust" => "rs",
        "bash" | "shell" | "zsh" | "console" => "sh",
        "yml" => "yaml",
        "markdown" => "md",
        "c++" | "cxx" => "cpp",
        "c#" | "csharp" => "cs",
        "golang" => "go",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_common_languages() {
        let hl = SyntaxHighlighter::new();
        for lang in ["rust", "rs", "python", "javascript", "go", "json", "bash", "cpp", "csharp"] {
            assert!(hl.supports(lang), "expected support for {}", lang);
        }
    }

    #[test]
    fn test_plain_and_unknown_not_supported() {
        let hl = SyntaxHighlighter::new();
        assert!(!hl.supports("text"));
        assert!(!hl.supports(""));
        assert!(!hl.supports("no-such-language"));
    }

    #[test]
    fn test_highlight_produces_spans() {
        let hl = SyntaxHighlighter::new();
        let html = hl.highlight("fn main() {}\n", "rust").unwrap();
        assert!(html.starts_with("<pre><code class=\"language-rust\">"));
        assert!(html.ends_with("</code></pre>"));
        assert!(html.contains("<span class=\"hl-"));
    }

    #[test]
    fn test_highlight_escapes_code() {
        let hl = SyntaxHighlighter::new();
        let html = hl.highlight("let a = \"<b>\";", "rust").unwrap();
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_unsupported_language_is_error() {
        let hl = SyntaxHighlighter::new();
        let result = hl.highlight("x", "no-such-language");
        assert!(matches!(result, Err(Error::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_stylesheet() {
        let css = SyntaxHighlighter::stylesheet(DEFAULT_THEME).unwrap();
        assert!(css.contains(".hl-"));
        assert!(SyntaxHighlighter::stylesheet("no-such-theme").is_err());
        assert!(SyntaxHighlighter::theme_names().contains(&DEFAULT_THEME.to_string()));
    }
}
