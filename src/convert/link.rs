//! Link URL policy.

/// Schemes that execute script or smuggle inline content.
const BLOCKED_SCHEMES: &[&str] = &["javascript", "vbscript", "livescript", "data"];

/// Check if a link URL may appear in a document.
///
/// Leading whitespace and control characters are ignored, as are control
/// characters inside the URL, the same way browsers parse `href`. Scheme
/// comparison is case-insensitive. URLs without a scheme are relative and
/// always allowed.
pub fn is_safe_url(url: &str) -> bool {
    let normalized: String = url
        .trim_start_matches(|c: char| c.is_whitespace() || c.is_control())
        .chars()
        .filter(|c| !c.is_control())
        .collect();

    match url_scheme(&normalized) {
        Some(scheme) => !BLOCKED_SCHEMES
            .iter()
            .any(|blocked| scheme.eq_ignore_ascii_case(blocked)),
        None => true,
    }
}

/// The scheme of an absolute URL.
fn url_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}
