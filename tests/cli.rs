use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn vitae(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vitae").expect("binary");
    cmd.current_dir(dir).env_remove("VITAE_CONFIG");
    cmd
}

fn write_profile(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("resume.json");
    fs::write(
        &path,
        r#"{ "basics": { "name": "Ada Lovelace", "email": "ada@example.com" },
             "work": [{ "name": "Babbage", "position": "Programmer", "startDate": "1842-09" }],
             "paragraphs": ["Hello."] }"#,
    )
    .expect("write profile");
    path
}

#[test]
fn html_only_build() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_profile(dir.path());
    vitae(dir.path())
        .arg(&input)
        .arg("--no-pdf")
        .assert()
        .success()
        .stderr(predicate::str::contains("Building resume from:"))
        .stderr(predicate::str::contains("HTML:"));
    let html = fs::read_to_string(dir.path().join("resume.html")).expect("html");
    assert!(html.contains("Ada Lovelace"));
    assert!(!dir.path().join("resume.pdf").exists());
}

#[test]
fn letter_with_custom_name_and_out_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_profile(dir.path());
    vitae(dir.path())
        .arg(&input)
        .args(["--letter", "--no-pdf", "--name", "to-charles", "--out-dir", "out"])
        .assert()
        .success();
    let html = fs::read_to_string(dir.path().join("out").join("to-charles.html")).expect("html");
    assert!(html.contains("Hello."));
}

#[test]
fn boring_writes_docx() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_profile(dir.path());
    vitae(dir.path())
        .arg(&input)
        .args(["--boring", "--lang", "fr"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DOCX:"));
    let bytes = fs::read(dir.path().join("resume.docx")).expect("docx");
    let paras = vitae::docx::paragraph_texts(&bytes).expect("text");
    assert!(paras.iter().any(|p| p == "Expérience"), "{paras:?}");
    assert!(!dir.path().join("resume.html").exists());
}

#[test]
fn boring_and_letter_conflict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_profile(dir.path());
    vitae(dir.path())
        .arg(&input)
        .args(["--boring", "--letter"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Build failed:"));
}

#[test]
fn boring_rejects_a_pdf_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_profile(dir.path());
    vitae(dir.path())
        .arg(&input)
        .args(["--boring", "--pdf", "resume.pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Build failed:").and(predicate::str::contains("--pdf")));
    assert!(!dir.path().join("resume.docx").exists());
    assert!(!dir.path().join("resume.pdf").exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    vitae(dir.path())
        .args(["nope.json", "--no-pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Build failed:").and(predicate::str::contains("nope.json")));
}

#[test]
fn invalid_json_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.json"), "{ \"basics\": ").expect("write");
    vitae(dir.path())
        .args(["bad.json", "--no-pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Build failed:"));
}

#[test]
fn config_file_disables_pdf_and_sets_language() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_profile(dir.path());
    fs::write(
        dir.path().join("vitae.toml"),
        "[render]\nlanguage = \"fr\"\n[pdf]\nenabled = false\n",
    )
    .expect("config");
    vitae(dir.path()).arg(&input).assert().success();
    let html = fs::read_to_string(dir.path().join("resume.html")).expect("html");
    assert!(html.contains("Actuellement"));
}

#[test]
fn init_config_then_write_skeleton() {
    let dir = tempfile::tempdir().expect("tempdir");
    vitae(dir.path())
        .args(["--init-config", "--init-config-dir", "cfg"])
        .assert()
        .success();
    assert!(dir.path().join("cfg").join("vitae.toml").is_file());

    vitae(dir.path())
        .args(["--write-skeleton", "skeleton.docx"])
        .assert()
        .success();
    let bytes = fs::read(dir.path().join("skeleton.docx")).expect("skeleton");
    let paras = vitae::docx::paragraph_texts(&bytes).expect("text");
    assert!(paras.iter().any(|p| p == "{name}"));
}
