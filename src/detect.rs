//! Script-based language detection for picking a font class.
//!
//! Text runs are classified by the Unicode scripts they contain. Only the
//! CJK languages get dedicated font classes; everything else, including
//! text with no letters at all, renders with the default sans font.

use crate::model::StyleClass;
use regex::Regex;
use std::sync::OnceLock;

/// Language inferred from the scripts used in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedLanguage {
    /// Hangul dominated
    Korean,
    /// Kana present alongside (or instead of) Han
    Japanese,
    /// Han without kana
    Chinese,
    /// Predominantly non-CJK letters
    Other,
}

impl DetectedLanguage {
    /// Font class used to render text in this language.
    pub fn style_class(self) -> StyleClass {
        match self {
            DetectedLanguage::Korean => StyleClass::FontKr,
            DetectedLanguage::Japanese => StyleClass::FontJp,
            DetectedLanguage::Chinese => StyleClass::FontSc,
            DetectedLanguage::Other => StyleClass::FontSans,
        }
    }
}

impl std::fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            DetectedLanguage::Korean => "kor",
            DetectedLanguage::Japanese => "jpn",
            DetectedLanguage::Chinese => "cmn",
            DetectedLanguage::Other => "und",
        };
        f.write_str(code)
    }
}

/// Per-script letter counts for a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    /// Hangul syllables and jamo
    pub hangul: usize,
    /// Hiragana and katakana
    pub kana: usize,
    /// Han ideographs
    pub han: usize,
    /// Alphabetic characters of any other script
    pub other: usize,
}

impl ScriptCounts {
    /// Count the letters of each script in `text`.
    pub fn from_text(text: &str) -> Self {
        let patterns = script_patterns();
        let hangul = patterns.hangul.find_iter(text).count();
        let kana = patterns.kana.find_iter(text).count();
        let han = patterns.han.find_iter(text).count();
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();

        Self {
            hangul,
            kana,
            han,
            other: letters.saturating_sub(hangul + kana + han),
        }
    }

    /// Total CJK letters.
    pub fn cjk(&self) -> usize {
        self.hangul + self.kana + self.han
    }
}

struct ScriptPatterns {
    hangul: Regex,
    kana: Regex,
    han: Regex,
}

fn script_patterns() -> &'static ScriptPatterns {
    static PATTERNS: OnceLock<ScriptPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ScriptPatterns {
        hangul: Regex::new(r"\p{Hangul}").expect("valid Hangul pattern"),
        kana: Regex::new(r"[\p{Hiragana}\p{Katakana}]").expect("valid kana pattern"),
        han: Regex::new(r"\p{Han}").expect("valid Han pattern"),
    })
}

/// Detect the language of `text` from its script mix.
///
/// Returns `None` when the text contains no letters.
pub fn detect_language(text: &str) -> Option<DetectedLanguage> {
    let counts = ScriptCounts::from_text(text);
    let cjk = counts.cjk();

    if cjk == 0 {
        return (counts.other > 0).then_some(DetectedLanguage::Other);
    }
    if counts.other > cjk {
        return Some(DetectedLanguage::Other);
    }

    let language = if counts.kana > 0 && counts.kana + counts.han > counts.hangul {
        DetectedLanguage::Japanese
    } else if counts.hangul >= counts.han {
        DetectedLanguage::Korean
    } else {
        DetectedLanguage::Chinese
    };
    Some(language)
}

/// Pick the font class for a run of text.
///
/// Unclassifiable text maps to [`StyleClass::FontSans`].
pub fn classify(text: &str) -> StyleClass {
    detect_language(text)
        .map(DetectedLanguage::style_class)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_korean() {
        assert_eq!(classify("안녕하세요"), StyleClass::FontKr);
    }

    #[test]
    fn test_classify_japanese() {
        assert_eq!(classify("こんにちは世界"), StyleClass::FontJp);
        assert_eq!(classify("カタカナ"), StyleClass::FontJp);
    }

    #[test]
    fn test_classify_chinese() {
        assert_eq!(classify("你好世界"), StyleClass::FontSc);
    }

    #[test]
    fn test_classify_latin_and_empty() {
        assert_eq!(classify("Hello, world"), StyleClass::FontSans);
        assert_eq!(classify(""), StyleClass::FontSans);
        assert_eq!(classify("12345 !?"), StyleClass::FontSans);
    }

    #[test]
    fn test_mostly_latin_with_cjk_word() {
        assert_eq!(classify("The word for hello is 안녕"), StyleClass::FontSans);
    }

    #[test]
    fn test_korean_with_hanja() {
        assert_eq!(classify("대한민국 韓國"), StyleClass::FontKr);
    }

    #[test]
    fn test_detect_language_none_without_letters() {
        assert_eq!(detect_language("  \n 42"), None);
        assert_eq!(detect_language("abc"), Some(DetectedLanguage::Other));
    }

    #[test]
    fn test_script_counts() {
        let counts = ScriptCounts::from_text("ひらがな漢字abc");
        assert_eq!(counts.kana, 4);
        assert_eq!(counts.han, 2);
        assert_eq!(counts.other, 3);
        assert_eq!(counts.hangul, 0);
    }

    #[test]
    fn test_display_codes() {
        assert_eq!(DetectedLanguage::Korean.to_string(), "kor");
        assert_eq!(DetectedLanguage::Other.to_string(), "und");
    }
}
