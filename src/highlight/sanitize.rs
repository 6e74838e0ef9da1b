//! Allow-list HTML sanitizer for code block markup.
//!
//! Parsing and cleaning are delegated to `ammonia`, which runs markup
//! through html5ever's tree builder. This wrapper only fixes the allow-list:
//! allowed tags survive with allowed attributes, other tags are unwrapped,
//! and elements whose content is executable or invisible (`script`,
//! `style`, ...) are dropped whole.

use std::collections::HashSet;
use std::sync::Arc;

use ammonia::Builder;

/// Elements dropped together with their content.
const DROP_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea", "title",
];

/// Allow-list sanitizer.
#[derive(Clone)]
pub struct Sanitizer {
    tags: Vec<&'static str>,
    builder: Arc<Builder<'static>>,
}

impl Sanitizer {
    /// Create a sanitizer from allowed tags and per-tag allowed attributes.
    pub fn new<T, A>(allowed_tags: T, allowed_attributes: A) -> Self
    where
        T: IntoIterator<Item = &'static str>,
        A: IntoIterator<Item = (&'static str, &'static [&'static str])>,
    {
        let tags: Vec<&'static str> = allowed_tags.into_iter().collect();
        let attributes: Vec<(&'static str, &'static [&'static str])> =
            allowed_attributes.into_iter().collect();

        // ammonia rejects a tag that is both kept and dropped
        let drop_content: HashSet<&'static str> = DROP_CONTENT
            .iter()
            .copied()
            .filter(|tag| !tags.contains(tag) && !attributes.iter().any(|(t, _)| t == tag))
            .collect();

        let mut builder = Builder::empty();
        builder
            .add_tags(tags.iter().copied())
            .clean_content_tags(drop_content)
            .strip_comments(true)
            .link_rel(None);
        for (tag, attrs) in &attributes {
            builder.add_tag_attributes(*tag, attrs.iter().copied());
        }

        Self {
            tags,
            builder: Arc::new(builder),
        }
    }

    /// Sanitizer for code blocks: `pre`, `code` and `span`, with `class`
    /// allowed on `code` and `span`.
    pub fn code_block() -> Self {
        const CLASS: &[&str] = &["class"];
        Self::new(["pre", "code", "span"], [("code", CLASS), ("span", CLASS)])
    }

    /// Check if a tag is allowed.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Sanitize a markup fragment. Sanitizing twice gives the same result.
    pub fn sanitize(&self, markup: &str) -> String {
        self.builder.clean(markup).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::code_block()
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer").field("tags", &self.tags).finish()
    }
}

/// Escape every HTML special character.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(markup: &str) -> String {
        Sanitizer::code_block().sanitize(markup)
    }

    #[test]
    fn test_keeps_allowed_markup() {
        let html = r#"<pre><code class="language-rust"><span class="hl-keyword">fn</span> main</code></pre>"#;
        assert_eq!(sanitize(html), html);
    }

    #[test]
    fn test_strips_disallowed_attributes() {
        assert_eq!(
            sanitize(r#"<pre style="color:red" class="x"><span onclick="alert(1)" class="a">x</span></pre>"#),
            r#"<pre><span class="a">x</span></pre>"#
        );
    }

    #[test]
    fn test_drops_script_with_content() {
        assert_eq!(
            sanitize("<pre>a<script>alert('x')</script>b</pre>"),
            "<pre>ab</pre>"
        );
        assert_eq!(
            sanitize("<style>p { color: red }</style><code>x</code>"),
            "<code>x</code>"
        );
        assert_eq!(sanitize("<SCRIPT>x</script >y"), "y");
    }

    #[test]
    fn test_unwraps_other_disallowed_tags() {
        assert_eq!(sanitize("<div><b>bold</b></div>"), "bold");
        assert_eq!(
            sanitize(r#"<a href="javascript:alert(1)">link</a>"#),
            "link"
        );
        assert_eq!(sanitize("<img src=x onerror=alert(1)>after"), "after");
    }

    #[test]
    fn test_closes_unclosed_and_drops_unmatched() {
        assert_eq!(sanitize("<pre><code>x"), "<pre><code>x</code></pre>");
        assert_eq!(sanitize("x</span>y"), "xy");
        assert_eq!(sanitize("<pre><code>x</pre>"), "<pre><code>x</code></pre>");
    }

    #[test]
    fn test_escapes_stray_characters() {
        assert_eq!(sanitize("a < b > c"), "a &lt; b &gt; c");
        assert_eq!(sanitize("fish & chips"), "fish &amp; chips");
        assert_eq!(sanitize("&lt;tag&gt; &amp;"), "&lt;tag&gt; &amp;");
    }

    #[test]
    fn test_drops_comments() {
        assert_eq!(sanitize("<!-- hi --><code>x</code>"), "<code>x</code>");
        assert_eq!(sanitize("a<!-- unterminated"), "a");
    }

    #[test]
    fn test_attribute_values_stay_quoted() {
        let html = sanitize(r#"<span class='x" onload="y'>t</span>"#);
        assert!(html.starts_with("<span class=\"x&quot; onload=&quot;y\">"));
        assert!(html.ends_with(">t</span>"));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            r#"<pre><code class="language-rust"><span class="hl-source">let x = &amp;y;</span></code></pre>"#,
            "<pre>a<script>bad()</script><img src=x onerror=alert(1)>b & c < d",
            "<div><span class='x'>1</span></div></span><code",
            "&notanentity &amp; &#x41; \"quoted\" <!-- c --> <? pi ?>",
            "<SPAN CLASS=\"Upper\">t</SPAN><span/>",
            "<style><style>nested</style>still</style>after",
            "<SCRIPT>x</script >y",
            "<span class='x\">y'>",
            "&lt<span>",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_custom_allow_list() {
        const HREF: &[&str] = &["href"];
        let sanitizer = Sanitizer::new(["a", "br"], [("a", HREF)]);
        assert_eq!(
            sanitizer.sanitize(r#"<a href="/x?a=1&b=2" id="y">l</a><br>"#),
            r#"<a href="/x?a=1&amp;b=2">l</a><br>"#
        );
        assert!(sanitizer.allows_tag("A"));
        assert!(!sanitizer.allows_tag("span"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">'&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
