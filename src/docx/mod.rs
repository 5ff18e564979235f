pub mod package;
pub mod skeleton;
pub mod template;
pub mod xml;

use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::i18n::Locale;
use crate::normalize::docx_resume;
use crate::profile::Profile;

use self::package::DocxPackage;
use self::template::{Template, TemplateErrors};
use self::xml::{find_attr, parse_xml_part, write_events, XmlEvent};

/// Parts that may carry placeholders: the body, headers, footers and the
/// document properties.
pub fn is_templated_part(name: &str) -> bool {
    if !name.ends_with(".xml") {
        return false;
    }
    name == "word/document.xml"
        || name.starts_with("word/header")
        || name.starts_with("word/footer")
        || name.starts_with("docProps/")
}

/// Fills `skeleton` with `view` and returns the new package bytes.
///
/// Placeholder problems from every part are gathered first; if there are any
/// the call fails with one [`TemplateErrors`] and nothing is produced.
pub fn render_docx(skeleton: &[u8], view: &impl Serialize) -> anyhow::Result<Vec<u8>> {
    let data = serde_json::to_value(view).context("serialize docx view")?;
    let mut pkg = DocxPackage::from_bytes(skeleton).context("read docx skeleton")?;

    let mut rendered = Vec::new();
    let mut errors = Vec::new();
    for entry in pkg.entries().iter().filter(|e| is_templated_part(&e.name)) {
        let part = parse_xml_part(&entry.name, &entry.data)?;
        match Template::parse(part).and_then(|tpl| tpl.render(&data)) {
            Ok(events) => rendered.push((entry.name.clone(), write_events(&events))),
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    if !errors.is_empty() {
        return Err(TemplateErrors { errors }.into());
    }
    log::debug!("docx: templated {} parts", rendered.len());
    for (name, bytes) in rendered {
        pkg.replace(&name, bytes)?;
    }
    pkg.to_bytes()
}

/// Resume DOCX from a profile, using `skeleton_path` or the built-in skeleton.
pub fn render_resume_docx(
    profile: &Profile,
    locale: Locale,
    skeleton_path: Option<&Path>,
) -> anyhow::Result<Vec<u8>> {
    let skeleton: Cow<'_, [u8]> = match skeleton_path {
        Some(p) => Cow::Owned(
            std::fs::read(p).with_context(|| format!("read docx skeleton: {}", p.display()))?,
        ),
        None => Cow::Borrowed(skeleton::builtin()),
    };
    let view = docx_resume(profile, locale);
    render_docx(&skeleton, &view)
}

/// Visible text of `word/document.xml`, one string per paragraph. Tabs and
/// line breaks inside a paragraph come out as `\t` and `\n`.
pub fn paragraph_texts(docx: &[u8]) -> anyhow::Result<Vec<String>> {
    let pkg = DocxPackage::from_bytes(docx)?;
    let entry = pkg
        .entry("word/document.xml")
        .context("missing word/document.xml")?;
    let part = parse_xml_part(&entry.name, &entry.data)?;

    let mut paras = Vec::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut cur: Option<String> = None;
    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, .. } => {
                if name == "w:p" {
                    cur = Some(String::new());
                }
                stack.push(name);
            }
            XmlEvent::End { name } => {
                stack.pop();
                if name == "w:p" {
                    paras.extend(cur.take());
                }
            }
            XmlEvent::Empty { name, attrs } => {
                if name == "w:p" {
                    paras.push(String::new());
                    continue;
                }
                let Some(buf) = cur.as_mut() else { continue };
                // Tab stops and other property children are not content.
                if !stack.contains(&"w:r") {
                    continue;
                }
                match name.as_str() {
                    "w:tab" => buf.push('\t'),
                    "w:cr" => buf.push('\n'),
                    "w:br" if find_attr(attrs, "w:type").unwrap_or("textWrapping") == "textWrapping" => {
                        buf.push('\n')
                    }
                    _ => {}
                }
            }
            XmlEvent::Text { text } if stack.last() == Some(&"w:t") => {
                if let Some(buf) = cur.as_mut() {
                    buf.push_str(text);
                }
            }
            _ => {}
        }
    }
    Ok(paras)
}
