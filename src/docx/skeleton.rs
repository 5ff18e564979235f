//! The resume skeleton: a fixed package of hand-written XML parts carrying
//! placeholder markup.
//!
//! [`generate`] zips the parts; its output is checked in as
//! `assets/resume-skeleton.docx` and served by [`builtin`], so rendering never
//! rebuilds it.

use super::package::DocxPackage;

const BUILTIN: &[u8] = include_bytes!("../../assets/resume-skeleton.docx");

pub const PARTS: &[(&str, &str)] = &[
    (
        "[Content_Types].xml",
        include_str!("../../assets/docx/content_types.xml"),
    ),
    ("_rels/.rels", include_str!("../../assets/docx/rels.xml")),
    (
        "word/document.xml",
        include_str!("../../assets/docx/document.xml"),
    ),
    (
        "word/_rels/document.xml.rels",
        include_str!("../../assets/docx/document.xml.rels"),
    ),
    ("word/styles.xml", include_str!("../../assets/docx/styles.xml")),
    ("docProps/core.xml", include_str!("../../assets/docx/core.xml")),
    ("docProps/app.xml", include_str!("../../assets/docx/app.xml")),
];

pub fn builtin() -> &'static [u8] {
    BUILTIN
}

pub fn generate() -> anyhow::Result<Vec<u8>> {
    let mut pkg = DocxPackage::new();
    for (name, xml) in PARTS {
        pkg.push(name, *xml);
    }
    pkg.to_bytes()
}
