pub mod build;
pub mod config;
pub mod docx;
pub mod format;
pub mod html;
pub mod i18n;
pub mod icons;
pub mod markdown;
pub mod minify;
pub mod normalize;
pub mod pdf;
pub mod profile;
pub mod progress;
