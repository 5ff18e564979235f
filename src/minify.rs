use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<style([^>]*)>(.*?)</style>").expect("style"));
static CSS_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("css comment"));
static CSS_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{};:,>])\s*").expect("css punct"));
static AFTER_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">[ \t\r]*\n\s*").expect("after tag"));
static BEFORE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\n[ \t\r]*<").expect("before tag"));
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("space run"));
static KEEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<pre\b.*?</pre>|<textarea\b.*?</textarea>|<script\b.*?</script>")
        .expect("keep")
});
static RESTORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<vitae-keep-(\d+)/>").expect("restore"));

/// Whitespace and comment minifier for the generated documents.
///
/// Line breaks next to tags are template layout and are dropped; any other
/// whitespace run collapses to a single space so inline text keeps its word
/// boundaries. The embedded stylesheet is compacted separately, and
/// `<pre>`, `<textarea>` and `<script>` elements are copied through as is.
pub fn minify_html(html: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    let html = KEEP_RE.replace_all(html, |caps: &Captures<'_>| {
        kept.push(caps[0].to_string());
        format!("<vitae-keep-{}/>", kept.len() - 1)
    });
    let html = COMMENT_RE.replace_all(&html, "");
    let html = STYLE_RE.replace_all(&html, |caps: &Captures<'_>| {
        format!("<style{}>{}</style>", &caps[1], minify_css(&caps[2]))
    });
    let html = AFTER_TAG_RE.replace_all(&html, ">");
    let html = BEFORE_TAG_RE.replace_all(&html, "<");
    let html = SPACE_RUN_RE.replace_all(&html, " ");
    let html = RESTORE_RE.replace_all(html.trim(), |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|n| kept.get(n))
            .map_or_else(|| caps[0].to_string(), Clone::clone)
    });
    html.into_owned()
}

pub fn minify_css(css: &str) -> String {
    let css = CSS_COMMENT_RE.replace_all(css, "");
    let css = SPACE_RUN_RE.replace_all(&css, " ");
    let css = CSS_PUNCT_RE.replace_all(&css, "$1");
    css.replace(";}", "}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_layout_whitespace_and_comments() {
        let src = "<div>\n  <!-- header -->\n  <h1>Ada   Lovelace</h1>\n  <p>Built <strong>fast</strong> tools</p>\n</div>\n";
        assert_eq!(
            minify_html(src),
            "<div><h1>Ada Lovelace</h1><p>Built <strong>fast</strong> tools</p></div>"
        );
    }

    #[test]
    fn preformatted_content_is_left_alone() {
        let src = "<pre>a\n    b</pre><textarea>x   y</textarea>";
        assert_eq!(minify_html(src), src);

        let src = "<div>\n  <PRE class=\"code\">fn main() {\n    run();\n}</PRE>\n  <p>a   b</p>\n  <script>\n  let x =  1;\n</script>\n</div>";
        assert_eq!(
            minify_html(src),
            "<div><PRE class=\"code\">fn main() {\n    run();\n}</PRE><p>a b</p><script>\n  let x =  1;\n</script></div>"
        );
    }

    #[test]
    fn compacts_style_blocks() {
        let src = "<style>\n/* base */\nbody {\n  color : red;\n  margin: 0 auto;\n}\n</style>";
        assert_eq!(minify_html(src), "<style>body{color:red;margin:0 auto}</style>");
    }
}
