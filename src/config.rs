use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::i18n::Locale;
use crate::pdf::{Margins, MediaType, PageSize};

pub const CONFIG_FILENAME: &str = "vitae.toml";
pub const CONFIG_ENV: &str = "VITAE_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub pdf: PdfSection,
    #[serde(default)]
    pub docx: DocxSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct RenderSection {
    /// Locale code, e.g. "en" or "fr".
    #[serde(default)]
    pub language: Option<String>,
    /// "letter" or "a4".
    #[serde(default)]
    pub page_size: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PdfSection {
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Chrome/Chromium binary; auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
    /// "print" or "screen" for resumes. Cover letters always use screen.
    #[serde(default)]
    pub media: Option<String>,
    /// Uniform resume margin in inches.
    #[serde(default)]
    pub margin_in: Option<f64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct DocxSection {
    /// Alternate skeleton package, relative to the config file.
    #[serde(default)]
    pub skeleton: Option<PathBuf>,
}

/// Command-line values that override the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub page_size: Option<PageSize>,
    pub no_pdf: bool,
}

/// Settings after merging flags, file, profile and defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub locale: Locale,
    pub page_size: PageSize,
    pub pdf_enabled: bool,
    pub chrome_path: Option<PathBuf>,
    pub media: MediaType,
    pub margins: Option<Margins>,
    pub timeout_secs: Option<u64>,
    pub docx_skeleton: Option<PathBuf>,
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config(workdir: &Path, filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, filename, 8) {
            return Some(p);
        }
    }
    find_file_upwards(workdir, filename, 8)
}

/// Explicit path, then `VITAE_CONFIG`, then an upward search from the current
/// directory and from `workdir`.
pub fn locate_config(explicit: Option<&Path>, workdir: &Path) -> anyhow::Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        if !p.is_file() {
            return Err(anyhow!("config not found: {}", p.display()));
        }
        return Ok(Some(p.to_path_buf()));
    }
    if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        let p = PathBuf::from(p);
        if !p.is_file() {
            return Err(anyhow!("config not found ({CONFIG_ENV}): {}", p.display()));
        }
        return Ok(Some(p));
    }
    Ok(find_default_config(workdir, CONFIG_FILENAME))
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let mut cfg: AppConfig = toml::from_str(&text)
        .with_context(|| format!("parse config toml: {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    if let Some(s) = cfg.docx.skeleton.as_mut() {
        if s.is_relative() {
            *s = base.join(&*s);
        }
    }
    Ok(cfg)
}

impl AppConfig {
    /// Merges with precedence flag > file > profile `meta.language` > default.
    pub fn resolve(
        &self,
        overrides: &Overrides,
        profile_language: Option<&str>,
    ) -> anyhow::Result<Settings> {
        let language = overrides
            .language
            .as_deref()
            .or(self.render.language.as_deref())
            .or(profile_language)
            .unwrap_or("en");

        let page_size = match (overrides.page_size, self.render.page_size.as_deref()) {
            (Some(p), _) => p,
            (None, Some(s)) => PageSize::parse(s)
                .ok_or_else(|| anyhow!("invalid [render] page_size: {s:?} (letter|a4)"))?,
            (None, None) => PageSize::default(),
        };

        let media = match self.pdf.media.as_deref() {
            Some(s) => MediaType::parse(s)
                .ok_or_else(|| anyhow!("invalid [pdf] media: {s:?} (screen|print)"))?,
            None => MediaType::Print,
        };

        let margins = match self.pdf.margin_in {
            Some(m) if !(0.0..=3.0).contains(&m) => {
                return Err(anyhow!("invalid [pdf] margin_in: {m} (0..=3 inches)"));
            }
            Some(m) => Some(Margins::uniform(m)),
            None => None,
        };

        Ok(Settings {
            locale: Locale::parse(language),
            page_size,
            pdf_enabled: !overrides.no_pdf && self.pdf.enabled.unwrap_or(true),
            chrome_path: self.pdf.chrome_path.clone(),
            media,
            margins,
            timeout_secs: self.pdf.timeout_secs,
            docx_skeleton: self.docx.skeleton.clone(),
        })
    }
}

const DEFAULT_CONFIG_TOML: &str = r#"# vitae configuration. Every key is optional; command-line flags win.

[render]
# language = "en"      # en | fr (falls back to the profile's meta.language)
# page_size = "letter" # letter | a4

[pdf]
# enabled = true
# chrome_path = "/usr/bin/chromium"
# media = "print"      # print | screen (resumes only)
# margin_in = 0.5
# timeout_secs = 30

[docx]
# skeleton = "my-skeleton.docx"
"#;

pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let cfg_path = dir.join(CONFIG_FILENAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}
