//! One call per CLI mode: render the loaded profile and write the artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::config::Settings;
use crate::docx::render_resume_docx;
use crate::html::{render_letter, render_resume, Helpers};
use crate::normalize::{cover_letter, html_resume};
use crate::pdf::{export_pdf, ChromeEngine, PdfOptions, RenderEngine};
use crate::profile::Profile;
use crate::progress::ConsoleProgress;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Resume,
    CoverLetter,
    /// Plain word-processor resume.
    DocxResume,
}

impl Mode {
    /// `pdf` is whether an explicit PDF path was asked for; DOCX output has
    /// no PDF counterpart.
    pub fn from_flags(letter: bool, boring: bool, pdf: bool) -> anyhow::Result<Self> {
        if boring && pdf {
            return Err(anyhow!("--pdf cannot be combined with --boring"));
        }
        match (letter, boring) {
            (true, true) => Err(anyhow!("--boring cannot be combined with --letter")),
            (true, false) => Ok(Self::CoverLetter),
            (false, true) => Ok(Self::DocxResume),
            (false, false) => Ok(Self::Resume),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::CoverLetter => "cover letter",
            Self::DocxResume => "DOCX resume",
        }
    }

    pub fn default_stem(self) -> &'static str {
        match self {
            Self::Resume | Self::DocxResume => "resume",
            Self::CoverLetter => "cover-letter",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BuildRequest {
    pub input: PathBuf,
    pub mode: Mode,
    /// Defaults to the input's directory.
    pub out_dir: Option<PathBuf>,
    /// File stem for the outputs; defaults per mode.
    pub name: Option<String>,
    /// Explicit PDF location; implies PDF output.
    pub pdf_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Artifacts {
    pub html: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
    pub docx: Option<PathBuf>,
}

impl BuildRequest {
    fn out_path(&self, ext: &str) -> PathBuf {
        let dir = match &self.out_dir {
            Some(d) => d.clone(),
            None => self
                .input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let stem = self.name.as_deref().unwrap_or(self.mode.default_stem());
        dir.join(format!("{stem}.{ext}"))
    }
}

pub fn chrome_engine(settings: &Settings) -> ChromeEngine {
    ChromeEngine {
        chrome_path: settings.chrome_path.clone(),
        load_timeout: settings.timeout_secs.map(Duration::from_secs),
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("create output dir: {}", dir.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write output: {}", path.display()))
}

/// Runs one build. Artifacts written before a failure stay on disk.
pub fn run<E: RenderEngine>(
    req: &BuildRequest,
    profile: &Profile,
    settings: &Settings,
    engine: &E,
    progress: &ConsoleProgress,
) -> anyhow::Result<Artifacts> {
    progress.info(format!(
        "Building {} from: {}",
        req.mode.label(),
        req.input.display()
    ));
    let locale = settings.locale;
    log::debug!("locale={} page={}", locale.code(), settings.page_size.name());

    let mut artifacts = Artifacts::default();
    if req.mode == Mode::DocxResume {
        let bytes = render_resume_docx(profile, locale, settings.docx_skeleton.as_deref())?;
        let path = req.out_path("docx");
        write_output(&path, &bytes)?;
        progress.artifact("DOCX", &path);
        artifacts.docx = Some(path);
        return Ok(artifacts);
    }

    let helpers = Helpers::standard(locale);
    let (html, pdf_opts) = match req.mode {
        Mode::CoverLetter => (
            render_letter(&cover_letter(profile, locale), &helpers)?,
            PdfOptions::cover_letter(),
        ),
        _ => (
            render_resume(&html_resume(profile, locale), &helpers)?,
            PdfOptions {
                margins: settings.margins,
                ..PdfOptions::resume(settings.media)
            },
        ),
    };
    let html_path = req.out_path("html");
    write_output(&html_path, html.as_bytes())?;
    progress.artifact("HTML", &html_path);
    artifacts.html = Some(html_path);

    if req.pdf_path.is_none() && !settings.pdf_enabled {
        return Ok(artifacts);
    }
    let pdf_path = req.pdf_path.clone().unwrap_or_else(|| req.out_path("pdf"));
    let written = export_pdf(engine, &html, &pdf_path, settings.page_size, &pdf_opts)?;
    progress.artifact("PDF", &written);
    artifacts.pdf = Some(written);
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, Overrides};
    use crate::pdf::{EngineSession, MediaType, PrintRequest, Viewport};

    struct NoBrowser;
    struct NoSession;

    impl RenderEngine for NoBrowser {
        type Session = NoSession;

        fn launch(&self, _viewport: Option<Viewport>) -> anyhow::Result<NoSession> {
            Err(anyhow!("chrome not installed"))
        }
    }

    impl EngineSession for NoSession {
        fn emulate_media(&mut self, _media: MediaType) -> anyhow::Result<()> {
            Ok(())
        }
        fn load_html(&mut self, _html: &str) -> anyhow::Result<()> {
            Ok(())
        }
        fn print_pdf(&mut self, _request: &PrintRequest) -> anyhow::Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn close(self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn settings(no_pdf: bool) -> Settings {
        AppConfig::default()
            .resolve(
                &Overrides {
                    no_pdf,
                    ..Overrides::default()
                },
                None,
            )
            .expect("settings")
    }

    fn request(dir: &Path, mode: Mode) -> (BuildRequest, Profile) {
        let input = dir.join("profile.json");
        fs::write(
            &input,
            r#"{ "basics": { "name": "Ada" }, // comment
                "work": [{ "name": "Acme", "position": "Dev", "startDate": "2020-01" }] }"#,
        )
        .expect("write input");
        let profile = Profile::from_path(&input).expect("profile");
        let req = BuildRequest {
            input,
            mode,
            out_dir: None,
            name: None,
            pdf_path: None,
        };
        (req, profile)
    }

    #[test]
    fn mode_flags_are_exclusive() {
        assert!(Mode::from_flags(true, true, false).is_err());
        assert_eq!(Mode::from_flags(false, true, false).expect("mode"), Mode::DocxResume);
        let err = Mode::from_flags(false, true, true).expect_err("docx has no pdf");
        assert!(err.to_string().contains("--pdf"));
        assert_eq!(Mode::from_flags(true, false, true).expect("mode"), Mode::CoverLetter);
    }

    #[test]
    fn html_only_build_writes_beside_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (req, profile) = request(dir.path(), Mode::Resume);
        let progress = ConsoleProgress::new(false);
        let out = run(&req, &profile, &settings(true), &NoBrowser, &progress).expect("build");
        assert_eq!(progress.written(), 1);
        assert_eq!(out.html, Some(dir.path().join("resume.html")));
        assert_eq!(out.pdf, None);
        let html = fs::read_to_string(dir.path().join("resume.html")).expect("html");
        assert!(html.contains("Jan 2020 – Present"));
    }

    #[test]
    fn pdf_failure_keeps_html() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut req, profile) = request(dir.path(), Mode::CoverLetter);
        req.name = Some("letter".into());
        let err = run(&req, &profile, &settings(false), &NoBrowser, &ConsoleProgress::new(false))
            .expect_err("no browser");
        assert!(format!("{err:#}").starts_with("PDF generation failed"));
        assert!(dir.path().join("letter.html").exists());
        assert!(!dir.path().join("letter.pdf").exists());
    }

    #[test]
    fn docx_mode_writes_docx_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut req, profile) = request(dir.path(), Mode::DocxResume);
        req.out_dir = Some(dir.path().join("out"));
        let out = run(&req, &profile, &settings(false), &NoBrowser, &ConsoleProgress::new(false))
            .expect("build");
        assert_eq!(out.docx, Some(dir.path().join("out").join("resume.docx")));
        assert_eq!(out.html, None);
    }
}
