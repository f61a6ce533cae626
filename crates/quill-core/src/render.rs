//! Markdown rendering and HTML sanitization.

use pulldown_cmark::{Options, Parser, html};

/// Convert markdown source into HTML safe for direct embedding.
///
/// Malformed markup is passed through the conversion untouched rather than
/// rejected; an empty string renders to an empty string.
pub fn render_markdown(source: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, opts);
    let mut out = String::new();
    html::push_html(&mut out, parser);

    sanitize(&out)
}

/// Strip unsafe markup from an HTML fragment.
///
/// Sanitizing already-sanitized output is a no-op, so rendered content can
/// pass through this function any number of times without double-escaping.
pub fn sanitize(html: &str) -> String {
    ammonia::clean(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_emphasis() {
        let html = render_markdown("Hello *world*");
        assert_eq!(html.trim(), "<p>Hello <em>world</em></p>");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn script_tags_are_stripped() {
        let html = render_markdown("safe <script>alert('x')</script> text");
        assert!(!html.contains("<script>"));
        assert!(html.contains("safe"));
        assert!(html.contains("text"));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let rendered = render_markdown("# Title\n\nA <b>bold</b> claim with a [link](https://example.com).");
        assert_eq!(sanitize(&rendered), rendered);
    }

    #[test]
    fn malformed_markup_passes_through() {
        let html = render_markdown("an *unclosed emphasis and a stray ] bracket");
        assert!(html.contains("unclosed emphasis"));
    }
}
