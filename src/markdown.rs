use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// Converts markdown to HTML that can sit inside a single flow element.
///
/// Block structure is flattened: headings and paragraphs keep only their
/// inline content, list items are run together, rules and hard breaks
/// disappear. Inline formatting, links and raw HTML are kept.
pub fn inline_html(md: &str) -> String {
    if md.trim().is_empty() {
        return String::new();
    }
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut pending_gap = false;
    for ev in Parser::new_ext(md, opts) {
        match ev {
            Event::Start(Tag::Heading { .. })
            | Event::Start(Tag::Paragraph)
            | Event::Start(Tag::List(_))
            | Event::Start(Tag::Item) => {}
            Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::List(_)) => pending_gap = true,
            Event::Rule | Event::HardBreak => {}
            Event::SoftBreak => events.push(Event::Text(" ".into())),
            other => {
                if pending_gap && !events.is_empty() {
                    events.push(Event::Text(" ".into()));
                }
                pending_gap = false;
                events.push(other);
            }
        }
    }

    let mut out = String::with_capacity(md.len() + md.len() / 4);
    html::push_html(&mut out, events.into_iter());
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::inline_html;

    #[test]
    fn keeps_inline_formatting() {
        assert_eq!(
            inline_html("Built **fast** [tools](https://x.com)"),
            r#"Built <strong>fast</strong> <a href="https://x.com">tools</a>"#
        );
    }

    #[test]
    fn flattens_block_structure() {
        let out = inline_html("# Title\n\n---\n\n- one\n- two\n\nend");
        assert_eq!(out, "Title one two end");
        assert!(!out.contains("<h1"));
        assert!(!out.contains("<li"));
        assert!(!out.contains("<hr"));
        assert!(!out.contains("<p>"));
    }

    #[test]
    fn empty_input() {
        assert_eq!(inline_html("  \n"), "");
    }
}
