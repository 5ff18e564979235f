//! Placeholder mini-language over the XML parts of a DOCX package.
//!
//! Grammar, inside any text node:
//!
//! - `{name}` / `{a.b}` scalar substitution, `{.}` for the current item;
//! - `{#name}` ... `{/name}` section: repeated per array item, rendered once
//!   for any other truthy value, dropped when falsy.
//!
//! Word happily splits one typed tag over several `w:t` runs, so tags are
//! first merged back into the run where they start. When a section's open and
//! close tags each sit alone in their own paragraph, those two paragraphs are
//! removed and everything between them becomes the repeated unit.
//!
//! Problems are never reported one at a time: parsing and rendering collect
//! every offending tag and return them together.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::docx::xml::{XmlEvent, XmlPart};

const RUN_TEXT: &str = "w:t";
const PARAGRAPH: &str = "w:p";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateErrorKind {
    UnterminatedTag,
    UnopenedTag,
    EmptyTag,
    UnclosedSection,
    UnopenedSection,
    MismatchedSection { expected: String },
    UnresolvedField,
    NonScalarValue,
    UnbalancedSection,
}

impl fmt::Display for TemplateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedTag => write!(f, "tag is never closed with `}}`"),
            Self::UnopenedTag => write!(f, "`}}` without an opening `{{`"),
            Self::EmptyTag => write!(f, "empty tag"),
            Self::UnclosedSection => write!(f, "section is never closed"),
            Self::UnopenedSection => write!(f, "closing tag without an open section"),
            Self::MismatchedSection { expected } => {
                write!(f, "closing tag does not match open section `{expected}`")
            }
            Self::UnresolvedField => write!(f, "no value for this field"),
            Self::NonScalarValue => write!(f, "value is a list or object, not text"),
            Self::UnbalancedSection => write!(f, "section body has unbalanced XML"),
        }
    }
}

/// One offending placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{part}: `{tag}`: {kind}")]
pub struct TemplateError {
    pub part: String,
    /// The tag as written, braces included.
    pub tag: String,
    pub kind: TemplateErrorKind,
}

impl TemplateError {
    fn new(part: &str, tag: impl Into<String>, kind: TemplateErrorKind) -> Self {
        Self {
            part: part.to_string(),
            tag: tag.into(),
            kind,
        }
    }

    /// Field name the tag refers to, without braces or section sigils.
    pub fn field(&self) -> &str {
        self.tag
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim()
            .trim_start_matches(['#', '/'])
            .trim()
    }
}

/// Every placeholder problem found in a package.
#[derive(Clone, Debug, Error)]
#[error("Template rendering error:{}", list(.errors))]
pub struct TemplateErrors {
    pub errors: Vec<TemplateError>,
}

impl TemplateErrors {
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(TemplateError::field).collect()
    }
}

fn list(errors: &[TemplateError]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}

#[derive(Clone, Debug, PartialEq)]
enum Tag {
    Var(String),
    Open(String),
    Close(String),
}

#[derive(Debug)]
enum Token {
    Xml(XmlEvent),
    Text(String),
    Tag {
        tag: Tag,
        raw: String,
        in_run: bool,
        para: Option<usize>,
    },
}

#[derive(Debug)]
enum Node {
    Xml(XmlEvent),
    Text(String),
    Var {
        name: String,
        raw: String,
        in_run: bool,
    },
    Section {
        name: String,
        raw: String,
        body: Vec<Node>,
    },
}

/// A parsed XML part, ready to be rendered against any data.
#[derive(Debug)]
pub struct Template {
    part: String,
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(part: XmlPart) -> Result<Self, Vec<TemplateError>> {
        let XmlPart { name, mut events } = part;
        merge_split_tags(&mut events);

        let mut errors = Vec::new();
        let (tokens, paragraphs) = tokenize(&name, events, &mut errors);
        let pairs = match_sections(&name, &tokens, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        let tokens = hoist_paragraph_sections(tokens, &pairs, &paragraphs);
        let nodes = build_tree(&name, tokens, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self { part: name, nodes })
    }

    /// Renders against `data`; the result is a complete event list for the
    /// part.
    pub fn render(&self, data: &Value) -> Result<Vec<XmlEvent>, Vec<TemplateError>> {
        let mut r = Renderer {
            part: &self.part,
            out: Vec::new(),
            errors: Vec::new(),
        };
        let mut scopes = vec![data];
        r.render(&self.nodes, &mut scopes);
        if !r.errors.is_empty() {
            return Err(r.errors);
        }
        let mut out = r.out;
        preserve_run_spaces(&mut out);
        Ok(out)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Slot {
    RunText,
    ParaBoundary,
    Other,
}

fn classify(events: &[XmlEvent]) -> Vec<Slot> {
    let mut stack: Vec<&str> = Vec::new();
    let mut slots = Vec::with_capacity(events.len());
    for ev in events {
        let slot = match ev {
            XmlEvent::Start { name, .. } => {
                stack.push(name.as_str());
                if name == PARAGRAPH {
                    Slot::ParaBoundary
                } else {
                    Slot::Other
                }
            }
            XmlEvent::End { name } => {
                stack.pop();
                if name == PARAGRAPH {
                    Slot::ParaBoundary
                } else {
                    Slot::Other
                }
            }
            XmlEvent::Text { .. } if stack.last() == Some(&RUN_TEXT) => Slot::RunText,
            _ => Slot::Other,
        };
        slots.push(slot);
    }
    slots
}

fn has_open_tail(s: &str) -> bool {
    s.rfind('{').is_some_and(|p| !s[p..].contains('}'))
}

/// Moves the pieces of a tag spread over several runs of one paragraph into
/// the run where the tag starts.
fn merge_split_tags(events: &mut [XmlEvent]) {
    let slots = classify(events);
    let mut pending: Option<usize> = None;
    for i in 0..events.len() {
        match slots[i] {
            Slot::ParaBoundary => pending = None,
            Slot::Other => {}
            Slot::RunText => {
                let mut rest = match &mut events[i] {
                    XmlEvent::Text { text } => std::mem::take(text),
                    _ => continue,
                };
                if let Some(o) = pending {
                    let (cut, closed) = match rest.find('}') {
                        Some(p) => (p + 1, true),
                        None => (rest.len(), false),
                    };
                    let moved: String = rest.drain(..cut).collect();
                    if let XmlEvent::Text { text } = &mut events[o] {
                        text.push_str(&moved);
                    }
                    if closed {
                        pending = None;
                    }
                }
                if pending.is_none() && has_open_tail(&rest) {
                    pending = Some(i);
                }
                if let XmlEvent::Text { text } = &mut events[i] {
                    *text = rest;
                }
            }
        }
    }
}

enum Piece {
    Lit(String),
    Tag(String),
}

fn split_tags(part: &str, text: &str, errors: &mut Vec<TemplateError>) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let open = rest.find('{');
        if let Some(c) = rest.find('}').filter(|c| open.map_or(true, |o| *c < o)) {
            errors.push(TemplateError::new(
                part,
                &rest[..=c],
                TemplateErrorKind::UnopenedTag,
            ));
            pieces.push(Piece::Lit(rest[..=c].to_string()));
            rest = &rest[c + 1..];
            continue;
        }
        let Some(o) = open else {
            pieces.push(Piece::Lit(rest.to_string()));
            break;
        };
        if o > 0 {
            pieces.push(Piece::Lit(rest[..o].to_string()));
        }
        match rest[o..].find('}') {
            Some(len) => {
                pieces.push(Piece::Tag(rest[o..=o + len].to_string()));
                rest = &rest[o + len + 1..];
            }
            None => {
                errors.push(TemplateError::new(
                    part,
                    &rest[o..],
                    TemplateErrorKind::UnterminatedTag,
                ));
                pieces.push(Piece::Lit(rest[o..].to_string()));
                break;
            }
        }
    }
    pieces
}

fn parse_tag(raw: &str) -> Option<Tag> {
    let inner = raw[1..raw.len() - 1].trim();
    let (ctor, name): (fn(String) -> Tag, &str) = if let Some(n) = inner.strip_prefix('#') {
        (Tag::Open, n.trim())
    } else if let Some(n) = inner.strip_prefix('/') {
        (Tag::Close, n.trim())
    } else {
        (Tag::Var, inner)
    };
    if name.is_empty() {
        None
    } else {
        Some(ctor(name.to_string()))
    }
}

type ParagraphSpans = HashMap<usize, (usize, usize)>;

fn tokenize(
    part: &str,
    events: Vec<XmlEvent>,
    errors: &mut Vec<TemplateError>,
) -> (Vec<Token>, ParagraphSpans) {
    let mut tokens = Vec::with_capacity(events.len());
    let mut stack: Vec<String> = Vec::new();
    let mut open_paras: Vec<(usize, usize)> = Vec::new();
    let mut spans: ParagraphSpans = HashMap::new();
    let mut next_para = 0usize;

    for ev in events {
        match ev {
            XmlEvent::Start { ref name, .. } => {
                if name == PARAGRAPH {
                    open_paras.push((next_para, tokens.len()));
                    next_para += 1;
                }
                stack.push(name.clone());
                tokens.push(Token::Xml(ev));
            }
            XmlEvent::End { ref name } => {
                let closes_para = name == PARAGRAPH;
                stack.pop();
                tokens.push(Token::Xml(ev));
                if closes_para {
                    if let Some((id, start)) = open_paras.pop() {
                        spans.insert(id, (start, tokens.len() - 1));
                    }
                }
            }
            XmlEvent::Text { text } => {
                let in_run = stack.last().map(String::as_str) == Some(RUN_TEXT);
                let para = open_paras.last().map(|(id, _)| *id);
                for piece in split_tags(part, &text, errors) {
                    match piece {
                        Piece::Lit(s) => tokens.push(Token::Text(s)),
                        Piece::Tag(raw) => match parse_tag(&raw) {
                            Some(tag) => tokens.push(Token::Tag {
                                tag,
                                raw,
                                in_run,
                                para,
                            }),
                            None => {
                                errors.push(TemplateError::new(
                                    part,
                                    raw,
                                    TemplateErrorKind::EmptyTag,
                                ));
                            }
                        },
                    }
                }
            }
            other => tokens.push(Token::Xml(other)),
        }
    }
    (tokens, spans)
}

/// Pairs every open tag with its close tag, as token indices.
fn match_sections(
    part: &str,
    tokens: &[Token],
    errors: &mut Vec<TemplateError>,
) -> Vec<(usize, usize)> {
    let mut stack: Vec<(&str, &str, usize)> = Vec::new();
    let mut pairs = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        let Token::Tag { tag, raw, .. } = tok else {
            continue;
        };
        match tag {
            Tag::Open(name) => stack.push((name.as_str(), raw.as_str(), i)),
            Tag::Close(name) => match stack.last() {
                None => errors.push(TemplateError::new(
                    part,
                    raw.as_str(),
                    TemplateErrorKind::UnopenedSection,
                )),
                Some((open, _, _)) if *open != name.as_str() => {
                    errors.push(TemplateError::new(
                        part,
                        raw.as_str(),
                        TemplateErrorKind::MismatchedSection {
                            expected: open.to_string(),
                        },
                    ));
                }
                Some(&(_, _, start)) => {
                    stack.pop();
                    pairs.push((start, i));
                }
            },
            Tag::Var(_) => {}
        }
    }
    for (_, raw, _) in stack {
        errors.push(TemplateError::new(
            part,
            raw,
            TemplateErrorKind::UnclosedSection,
        ));
    }
    pairs
}

fn tag_para(tok: &Token) -> Option<usize> {
    match tok {
        Token::Tag { para, .. } => *para,
        _ => None,
    }
}

/// True when the paragraph's only visible content is a single tag.
fn tag_only(tokens: &[Token], span: (usize, usize)) -> bool {
    let mut tags = 0;
    for tok in &tokens[span.0..=span.1] {
        match tok {
            Token::Tag { in_run: true, .. } => tags += 1,
            Token::Tag { in_run: false, .. } => return false,
            Token::Text(t) if !t.trim().is_empty() => {
                // Whitespace outside runs is layout; anything else is content.
                return false;
            }
            _ => {}
        }
    }
    tags == 1
}

/// Replaces each tag-only paragraph of a multi-paragraph section by the bare
/// tag, so the section body is the run of whole paragraphs between them.
fn hoist_paragraph_sections(
    tokens: Vec<Token>,
    pairs: &[(usize, usize)],
    spans: &ParagraphSpans,
) -> Vec<Token> {
    let mut drop = vec![false; tokens.len()];
    let mut moves: HashMap<usize, usize> = HashMap::new();
    for &(open, close) in pairs {
        let (Some(po), Some(pc)) = (tag_para(&tokens[open]), tag_para(&tokens[close])) else {
            continue;
        };
        if po == pc {
            continue;
        }
        let (Some(&so), Some(&sc)) = (spans.get(&po), spans.get(&pc)) else {
            continue;
        };
        if !tag_only(&tokens, so) || !tag_only(&tokens, sc) {
            continue;
        }
        for (span, tag_idx) in [(so, open), (sc, close)] {
            drop[span.0..=span.1].iter_mut().for_each(|d| *d = true);
            moves.insert(span.0, tag_idx);
        }
    }
    if moves.is_empty() {
        return tokens;
    }

    let mut slots: Vec<Option<Token>> = tokens.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(slots.len());
    for i in 0..slots.len() {
        if let Some(&tag_idx) = moves.get(&i) {
            if let Some(Token::Tag { tag, raw, .. }) = slots[tag_idx].take() {
                out.push(Token::Tag {
                    tag,
                    raw,
                    in_run: false,
                    para: None,
                });
            }
        }
        if !drop[i] {
            if let Some(tok) = slots[i].take() {
                out.push(tok);
            }
        }
    }
    out
}

/// A section body may close elements it did not open only if it reopens the
/// same ones, so that repeating it keeps the document well formed.
fn balanced(body: &[Node]) -> bool {
    let mut opened: Vec<&str> = Vec::new();
    let mut closed_first: Vec<&str> = Vec::new();
    for node in body {
        match node {
            Node::Xml(XmlEvent::Start { name, .. }) => opened.push(name),
            Node::Xml(XmlEvent::End { name }) => match opened.last() {
                Some(top) if top == name => {
                    opened.pop();
                }
                Some(_) => return false,
                None => closed_first.push(name),
            },
            _ => {}
        }
    }
    opened.reverse();
    opened == closed_first
}

fn build_tree(part: &str, tokens: Vec<Token>, errors: &mut Vec<TemplateError>) -> Vec<Node> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<(String, String, Vec<Node>)> = Vec::new();

    fn push(root: &mut Vec<Node>, stack: &mut [(String, String, Vec<Node>)], node: Node) {
        match stack.last_mut() {
            Some((_, _, body)) => body.push(node),
            None => root.push(node),
        }
    }

    for tok in tokens {
        match tok {
            Token::Xml(ev) => push(&mut root, &mut stack, Node::Xml(ev)),
            Token::Text(t) => push(&mut root, &mut stack, Node::Text(t)),
            Token::Tag { tag, raw, in_run, .. } => match tag {
                Tag::Var(name) => push(&mut root, &mut stack, Node::Var { name, raw, in_run }),
                Tag::Open(name) => stack.push((name, raw, Vec::new())),
                Tag::Close(_) => {
                    if let Some((name, raw, body)) = stack.pop() {
                        if !balanced(&body) {
                            errors.push(TemplateError::new(
                                part,
                                raw.as_str(),
                                TemplateErrorKind::UnbalancedSection,
                            ));
                        }
                        push(&mut root, &mut stack, Node::Section { name, raw, body });
                    }
                }
            },
        }
    }
    root
}

fn lookup<'v>(scopes: &[&'v Value], name: &str) -> Option<&'v Value> {
    if name == "." {
        return scopes.last().copied();
    }
    let mut segments = name.split('.').map(str::trim);
    let first = segments.next()?;
    let mut found = scopes.iter().rev().find_map(|scope| scope.get(first))?;
    for seg in segments {
        found = found.get(seg)?;
    }
    Some(found)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

struct Renderer<'a> {
    part: &'a str,
    out: Vec<XmlEvent>,
    errors: Vec<TemplateError>,
}

impl Renderer<'_> {
    fn error(&mut self, raw: &str, kind: TemplateErrorKind) {
        self.errors.push(TemplateError::new(self.part, raw, kind));
    }

    fn render<'v>(&mut self, nodes: &[Node], scopes: &mut Vec<&'v Value>) {
        for node in nodes {
            match node {
                Node::Xml(ev) => self.out.push(ev.clone()),
                Node::Text(t) => self.out.push(XmlEvent::text(t.as_str())),
                Node::Var { name, raw, in_run } => {
                    let text = match lookup(scopes, name) {
                        None => {
                            self.error(raw, TemplateErrorKind::UnresolvedField);
                            continue;
                        }
                        Some(Value::Null) => String::new(),
                        Some(Value::String(s)) => s.clone(),
                        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
                        Some(_) => {
                            self.error(raw, TemplateErrorKind::NonScalarValue);
                            continue;
                        }
                    };
                    self.emit_text(&text, *in_run);
                }
                Node::Section { name, raw, body } => match lookup(scopes, name) {
                    None => self.error(raw, TemplateErrorKind::UnresolvedField),
                    Some(Value::Array(items)) => {
                        for item in items {
                            scopes.push(item);
                            self.render(body, scopes);
                            scopes.pop();
                        }
                    }
                    Some(v) if truthy(v) => {
                        scopes.push(v);
                        self.render(body, scopes);
                        scopes.pop();
                    }
                    Some(_) => {}
                },
            }
        }
    }

    /// Newlines inside a run become `<w:br/>`.
    fn emit_text(&mut self, text: &str, in_run: bool) {
        if !in_run || !text.contains('\n') {
            self.out.push(XmlEvent::text(text));
            return;
        }
        let normalized = text.replace("\r\n", "\n");
        for (i, line) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.out.push(XmlEvent::end(RUN_TEXT));
                self.out.push(XmlEvent::empty("w:br"));
                self.out.push(XmlEvent::start(RUN_TEXT));
            }
            if !line.is_empty() {
                self.out.push(XmlEvent::text(line));
            }
        }
    }
}

/// Substituted values routinely start or end with spaces; Word drops those
/// unless the run text asks to keep them.
fn preserve_run_spaces(events: &mut [XmlEvent]) {
    for ev in events {
        if let XmlEvent::Start { name, attrs } = ev {
            if name == RUN_TEXT && !attrs.iter().any(|(k, _)| k == "xml:space") {
                attrs.push(("xml:space".to_string(), "preserve".to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::xml::{parse_xml_part, write_events};
    use serde_json::json;

    fn doc(body: &str) -> XmlPart {
        let xml = format!(
            r#"<w:document xmlns:w="urn:w"><w:body>{body}</w:body></w:document>"#
        );
        parse_xml_part("word/document.xml", xml.as_bytes()).expect("parse")
    }

    fn render(body: &str, data: Value) -> String {
        let tpl = Template::parse(doc(body)).expect("template");
        let events = tpl.render(&data).expect("render");
        let xml = String::from_utf8(write_events(&events)).expect("utf8");
        let start = xml.find("<w:body>").expect("body") + "<w:body>".len();
        let end = xml.find("</w:body>").expect("body end");
        xml[start..end].to_string()
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    fn parse_errors(body: &str) -> Vec<TemplateError> {
        Template::parse(doc(body)).expect_err("must fail")
    }

    #[test]
    fn substitutes_and_escapes_scalars() {
        let out = render(&para("Hi {name}!"), json!({"name": "A & <B>"}));
        assert_eq!(
            out,
            r#"<w:p><w:r><w:t xml:space="preserve">Hi A &amp; &lt;B&gt;!</w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn merges_tags_split_across_runs() {
        let body = "<w:p><w:r><w:t>Dear {na</w:t></w:r><w:r><w:t>m</w:t></w:r><w:r><w:t>e}, hi</w:t></w:r></w:p>";
        let out = render(body, json!({"name": "Ada"}));
        assert!(out.contains(">Dear Ada</w:t>"), "{out}");
        assert!(out.contains(">, hi</w:t>"), "{out}");
        assert!(!out.contains('{'));
    }

    #[test]
    fn inline_sections_loop_and_gate() {
        let body = para("{#items}[{.}]{/items}{#flag} yes{/flag}{#off} no{/off}");
        let out = render(&body, json!({"items": ["a", "b"], "flag": true, "off": ""}));
        assert!(out.contains(">[a][b] yes</w:t>"), "{out}");
    }

    #[test]
    fn paragraph_sections_repeat_whole_paragraphs() {
        let body = format!(
            "{}{}{}{}",
            para("{#work}"),
            para("{position}, {name}"),
            para("{/work}"),
            para("end")
        );
        let out = render(
            &body,
            json!({"work": [{"position": "Dev", "name": "Acme"}, {"position": "Lead", "name": "Initech"}]}),
        );
        assert_eq!(out.matches("<w:p>").count(), 3, "{out}");
        assert!(out.contains(">Dev, Acme</w:t>"));
        assert!(out.contains(">Lead, Initech</w:t>"));
        assert!(!out.contains("work"));

        let empty = render(&body, json!({"work": []}));
        assert_eq!(empty.matches("<w:p>").count(), 1);
    }

    #[test]
    fn body_level_tags_wrap_paragraphs() {
        let body = format!("{{#label}}{}{{/label}}", para("{label}"));
        assert_eq!(render(&body, json!({"label": ""})), "");
        assert!(render(&body, json!({"label": "Engineer"})).contains(">Engineer</w:t>"));
    }

    #[test]
    fn inner_scopes_fall_back_to_outer_names() {
        let body = para("{#jobs}{name}@{company}{/jobs}");
        let out = render(&body, json!({"company": "Acme", "jobs": [{"name": "x"}]}));
        assert!(out.contains(">x@Acme</w:t>"));
    }

    #[test]
    fn newlines_become_breaks() {
        let out = render(&para("{summary}"), json!({"summary": "one\ntwo"}));
        assert!(out.contains(r#"one</w:t><w:br/><w:t xml:space="preserve">two"#), "{out}");
    }

    #[test]
    fn unmatched_open_is_reported_by_name() {
        let errs = parse_errors(&format!("{}{}", para("{#work}"), para("{name}")));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, TemplateErrorKind::UnclosedSection);
        assert_eq!(errs[0].field(), "work");
    }

    #[test]
    fn syntax_errors_are_collected_together() {
        let errs = parse_errors(&format!(
            "{}{}{}",
            para("{}"),
            para("{/skills}"),
            para("oops {name")
        ));
        let kinds: Vec<TemplateErrorKind> = errs.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TemplateErrorKind::EmptyTag,
                TemplateErrorKind::UnterminatedTag,
                TemplateErrorKind::UnopenedSection,
            ]
        );
    }

    #[test]
    fn mismatched_close_names_the_open_section() {
        let errs = parse_errors(&para("{#a}{#b}{/a}{/b}"));
        assert!(errs.iter().any(|e| e.kind
            == TemplateErrorKind::MismatchedSection {
                expected: "b".into()
            }));
    }

    #[test]
    fn render_errors_are_aggregated() {
        let tpl = Template::parse(doc(&para("{missing} {list} {other}"))).expect("template");
        let errs = tpl.render(&json!({"list": [1, 2]})).expect_err("must fail");
        let fields: Vec<&str> = errs.iter().map(TemplateError::field).collect();
        assert_eq!(fields, vec!["missing", "list", "other"]);
        assert_eq!(errs[1].kind, TemplateErrorKind::NonScalarValue);

        let all = TemplateErrors { errors: errs };
        let msg = all.to_string();
        assert!(msg.starts_with("Template rendering error:"));
        assert_eq!(msg.lines().count(), 4);
    }

    #[test]
    fn unbalanced_inline_body_is_rejected() {
        let body = "<w:p><w:r><w:t>{#a}</w:t></w:r></w:p><w:p><w:pPr/><w:r><w:t>x{/a}</w:t></w:r><w:r/></w:p>";
        // Open paragraph holds only the tag but the close one does not, so the
        // body is inline and crosses a paragraph boundary evenly.
        assert!(Template::parse(doc(body)).is_ok());

        let body = "<w:p><w:r><w:t>{#a}</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>x {/a}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        let errs = parse_errors(body);
        assert_eq!(errs[0].kind, TemplateErrorKind::UnbalancedSection);
    }
}
