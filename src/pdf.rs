//! Paginated PDF export through a headless browser.
//!
//! The browser sits behind [`RenderEngine`] / [`EngineSession`] so the stage
//! sequence in [`export_pdf`] can be driven by a fake engine in tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use headless_chrome::protocol::cdp::Emulation;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" => Some(Self::Letter),
            "a4" => Some(Self::A4),
            _ => None,
        }
    }

    /// Paper width and height in inches.
    pub fn inches(self) -> (f64, f64) {
        match self {
            Self::Letter => (8.5, 11.0),
            Self::A4 => (8.27, 11.69),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Letter => "Letter",
            Self::A4 => "A4",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MediaType {
    Screen,
    #[default]
    Print,
}

impl MediaType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "screen" => Some(Self::Screen),
            "print" => Some(Self::Print),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Print => "print",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// US Letter at 96 dpi, the cover letter's design size.
pub const LETTER_VIEWPORT: Viewport = Viewport {
    width: 816,
    height: 1056,
};

/// Page margins in inches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(inches: f64) -> Self {
        Self {
            top: inches,
            right: inches,
            bottom: inches,
            left: inches,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PdfOptions {
    pub media: MediaType,
    /// `None` keeps the half-inch default.
    pub margins: Option<Margins>,
    pub print_background: bool,
    pub landscape: bool,
    pub viewport: Option<Viewport>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            media: MediaType::Print,
            margins: None,
            print_background: true,
            landscape: false,
            viewport: None,
        }
    }
}

impl PdfOptions {
    /// Options used for resumes.
    pub fn resume(media: MediaType) -> Self {
        Self {
            media,
            ..Self::default()
        }
    }

    /// Options used for cover letters: screen media, no margins and a fixed
    /// Letter-sized viewport so the single-page design lays out exactly.
    pub fn cover_letter() -> Self {
        Self {
            media: MediaType::Screen,
            margins: Some(Margins::uniform(0.0)),
            viewport: Some(LETTER_VIEWPORT),
            ..Self::default()
        }
    }
}

/// What the session is asked to print.
#[derive(Clone, Debug, PartialEq)]
pub struct PrintRequest {
    pub paper_width_in: f64,
    pub paper_height_in: f64,
    pub margins: Margins,
    pub print_background: bool,
    pub landscape: bool,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF generation failed: could not launch the rendering engine: {0:#}")]
    Launch(anyhow::Error),
    #[error("PDF generation failed: could not load the document: {0:#}")]
    Load(anyhow::Error),
    #[error("PDF generation failed: export failed: {0:#}")]
    Export(anyhow::Error),
    #[error("PDF generation failed: could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait RenderEngine {
    type Session: EngineSession;

    /// Starts an isolated rendering context. A viewport, when given, is fixed
    /// before any layout happens.
    fn launch(&self, viewport: Option<Viewport>) -> anyhow::Result<Self::Session>;
}

pub trait EngineSession {
    fn emulate_media(&mut self, media: MediaType) -> anyhow::Result<()>;
    /// Loads a complete HTML document and waits until it has finished loading.
    fn load_html(&mut self, html: &str) -> anyhow::Result<()>;
    fn print_pdf(&mut self, request: &PrintRequest) -> anyhow::Result<Vec<u8>>;
    fn close(self) -> anyhow::Result<()>;
}

/// Renders `html` to a PDF at `path`.
///
/// Stages run in order (launch, media emulation, load, print) and the session
/// is closed on every path. Bytes go to a temporary file next to `path` that is
/// persisted only once the export succeeded.
pub fn export_pdf<E: RenderEngine>(
    engine: &E,
    html: &str,
    path: &Path,
    page: PageSize,
    opts: &PdfOptions,
) -> Result<PathBuf, ExportError> {
    let mut session = engine.launch(opts.viewport).map_err(ExportError::Launch)?;
    let printed = run_stages(&mut session, html, page, opts);
    if let Err(e) = session.close() {
        log::warn!("closing rendering engine: {e:#}");
    }
    let bytes = printed?;
    log::debug!("pdf export produced {} bytes ({})", bytes.len(), page.name());
    write_atomic(path, &bytes)?;
    Ok(path.to_path_buf())
}

fn run_stages<S: EngineSession>(
    session: &mut S,
    html: &str,
    page: PageSize,
    opts: &PdfOptions,
) -> Result<Vec<u8>, ExportError> {
    session
        .emulate_media(opts.media)
        .map_err(ExportError::Load)?;
    session.load_html(html).map_err(ExportError::Load)?;
    let (w, h) = page.inches();
    let request = PrintRequest {
        paper_width_in: w,
        paper_height_in: h,
        margins: opts.margins.unwrap_or_default(),
        print_background: opts.print_background,
        landscape: opts.landscape,
    };
    session.print_pdf(&request).map_err(ExportError::Export)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_err = |source: std::io::Error| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(write_err)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".vitae-")
        .suffix(".pdf.part")
        .tempfile_in(&dir)
        .map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Headless Chromium through the DevTools protocol.
#[derive(Clone, Debug, Default)]
pub struct ChromeEngine {
    /// Explicit browser binary; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    pub load_timeout: Option<Duration>,
}

pub struct ChromeSession {
    browser: Browser,
    tab: Arc<Tab>,
    // Keeps the loaded document alive until the session is closed.
    page_file: Option<tempfile::NamedTempFile>,
}

impl RenderEngine for ChromeEngine {
    type Session = ChromeSession;

    fn launch(&self, viewport: Option<Viewport>) -> anyhow::Result<ChromeSession> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(self.chrome_path.clone())
            .window_size(viewport.map(|v| (v.width, v.height)))
            .build()
            .map_err(|e| anyhow!("chrome launch options: {e}"))?;
        let browser = Browser::new(options).context("start chrome")?;
        let tab = browser.new_tab().context("open tab")?;
        if let Some(t) = self.load_timeout {
            tab.set_default_timeout(t);
        }
        Ok(ChromeSession {
            browser,
            tab,
            page_file: None,
        })
    }
}

impl EngineSession for ChromeSession {
    fn emulate_media(&mut self, media: MediaType) -> anyhow::Result<()> {
        self.tab
            .call_method(Emulation::SetEmulatedMedia {
                media: Some(media.as_str().to_string()),
                features: None,
            })
            .with_context(|| format!("emulate media: {}", media.as_str()))?;
        Ok(())
    }

    fn load_html(&mut self, html: &str) -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("vitae-")
            .suffix(".html")
            .tempfile()
            .context("create page file")?;
        file.write_all(html.as_bytes()).context("write page file")?;
        file.flush().context("flush page file")?;
        let url = format!("file://{}", file.path().display());
        self.tab
            .navigate_to(&url)
            .with_context(|| format!("navigate: {url}"))?
            .wait_until_navigated()
            .context("wait for load")?;
        self.page_file = Some(file);
        Ok(())
    }

    fn print_pdf(&mut self, request: &PrintRequest) -> anyhow::Result<Vec<u8>> {
        let opts = PrintToPdfOptions {
            landscape: Some(request.landscape),
            print_background: Some(request.print_background),
            paper_width: Some(request.paper_width_in),
            paper_height: Some(request.paper_height_in),
            margin_top: Some(request.margins.top),
            margin_right: Some(request.margins.right),
            margin_bottom: Some(request.margins.bottom),
            margin_left: Some(request.margins.left),
            ..Default::default()
        };
        self.tab.print_to_pdf(Some(opts)).context("print to pdf")
    }

    fn close(self) -> anyhow::Result<()> {
        let closed = self.tab.close(true).map(|_| ()).context("close tab");
        drop(self.browser);
        closed
    }
}
