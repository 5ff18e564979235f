use std::io::{Cursor, Write};

use serde_json::json;
use vitae::docx::template::{TemplateErrorKind, TemplateErrors};
use vitae::docx::{paragraph_texts, render_docx, render_resume_docx, skeleton};
use vitae::i18n::Locale;
use vitae::profile::Profile;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn profile() -> Profile {
    Profile::from_value(json!({
        "basics": {
            "name": "Grace Hopper",
            "label": "Rear Admiral",
            "email": "grace@navy.mil",
            "phone": "555-0100",
            "url": "https://grace.dev",
            "location": {"city": "Arlington", "region": "VA"}
        },
        "work": [
            {"name": "US Navy", "position": "Officer", "startDate": "1943-12",
             "highlights": ["COBOL", "Compilers & <linkers>"]},
            {"name": "Remington Rand", "position": "Engineer", "startDate": "1949-01",
             "endDate": "1967-08"}
        ],
        "projects": [],
        "education": [{"institution": "Yale", "studyType": "PhD", "area": "Mathematics",
                       "startDate": "1930", "endDate": "1934"}]
    }))
}

fn skeleton_with_document(body: &str) -> Vec<u8> {
    let doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut zout = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    zout.start_file("word/document.xml", opts).expect("start");
    zout.write_all(doc.as_bytes()).expect("write");
    zout.start_file("word/styles.xml", opts).expect("start");
    zout.write_all(b"<w:styles>{notATag</w:styles>").expect("write");
    zout.finish().expect("finish").into_inner()
}

#[test]
fn resume_docx_has_one_line_per_position() {
    let out = render_resume_docx(&profile(), Locale::En, None).expect("render");
    let paras = paragraph_texts(&out).expect("text");

    let positions: Vec<&String> = paras
        .iter()
        .filter(|p| p.starts_with("Officer") || p.starts_with("Engineer"))
        .collect();
    assert_eq!(positions.len(), 2, "{paras:?}");
    assert_eq!(positions[0], "Officer, US Navy\tDec 1943 – Present");
    assert_eq!(positions[1], "Engineer, Remington Rand\tJan 1949 – Aug 1967");

    assert!(paras.iter().any(|p| p == "• Compilers & <linkers>"));
    assert!(!paras.iter().any(|p| p == "Projects"));
    assert!(paras.iter().any(|p| p == "Education"));
    assert!(paras.iter().all(|p| !p.contains('{') && !p.contains('}')), "{paras:?}");
}

#[test]
fn contact_line_packs_four_items_into_three_slots() {
    let out = render_resume_docx(&profile(), Locale::En, None).expect("render");
    let paras = paragraph_texts(&out).expect("text");
    assert!(
        paras
            .iter()
            .any(|p| p == "grace@navy.mil | 555-0100 | Arlington, VA | https://grace.dev"),
        "{paras:?}"
    );
}

#[test]
fn sparse_profile_renders_without_placeholders() {
    let profile = Profile::from_value(json!({"basics": {"name": "Solo", "email": "s@o.lo"}}));
    let out = render_resume_docx(&profile, Locale::En, None).expect("render");
    let paras = paragraph_texts(&out).expect("text");
    assert!(paras.iter().any(|p| p == "Solo"));
    assert!(paras.iter().any(|p| p == "s@o.lo"), "{paras:?}");
    assert!(paras.iter().all(|p| !p.contains('{')));
    assert!(!paras.iter().any(|p| p.contains(" | ")));
}

#[test]
fn generated_skeleton_renders_like_builtin() {
    let generated = skeleton::generate().expect("generate");
    let view = json!({"name": "X"});
    let a = render_docx(&generated, &vitae::normalize::docx_resume(&profile(), Locale::En))
        .expect("generated");
    let b = render_docx(skeleton::builtin(), &vitae::normalize::docx_resume(&profile(), Locale::En))
        .expect("builtin");
    assert_eq!(paragraph_texts(&a).expect("a"), paragraph_texts(&b).expect("b"));
    // A view missing most fields is a template error, not silent output.
    assert!(render_docx(&generated, &view).is_err());
}

#[test]
fn malformed_template_reports_every_placeholder() {
    let body = concat!(
        "<w:p><w:r><w:t>{#work}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>{position}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>{/wrok}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>{nickname</w:t></w:r></w:p>",
    );
    let skeleton = skeleton_with_document(body);
    let err = render_docx(&skeleton, &json!({"work": []})).expect_err("malformed");
    let errors = err.downcast_ref::<TemplateErrors>().expect("template errors");

    let fields = errors.fields();
    assert!(fields.contains(&"work"), "{fields:?}");
    assert!(errors
        .errors
        .iter()
        .any(|e| matches!(&e.kind, TemplateErrorKind::MismatchedSection { expected } if expected == "work")));
    assert!(errors
        .errors
        .iter()
        .any(|e| e.kind == TemplateErrorKind::UnterminatedTag));

    let msg = err.to_string();
    assert!(msg.starts_with("Template rendering error:"), "{msg}");
    assert!(msg.lines().count() > 2, "{msg}");
}

#[test]
fn non_template_parts_pass_through() {
    let skeleton = skeleton_with_document("<w:p><w:r><w:t>{name}</w:t></w:r></w:p>");
    let out = render_docx(&skeleton, &json!({"name": "Ada"})).expect("render");
    assert_eq!(paragraph_texts(&out).expect("text"), vec!["Ada".to_string()]);
    let pkg = vitae::docx::package::DocxPackage::from_bytes(&out).expect("read");
    assert_eq!(
        pkg.entry("word/styles.xml").expect("styles").data,
        b"<w:styles>{notATag</w:styles>".to_vec()
    );
}
