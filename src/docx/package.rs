//! In-memory OOXML package: an ordered list of zip entries.

use std::io::{Cursor, Read, Write};

use anyhow::{anyhow, Context};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

#[derive(Clone, Debug)]
pub struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
    modified: DateTime,
    unix_mode: Option<u32>,
}

impl PackageEntry {
    fn options(&self) -> SimpleFileOptions {
        let opts = SimpleFileOptions::default()
            .compression_method(self.compression)
            .last_modified_time(self.modified);
        match self.unix_mode {
            Some(mode) => opts.unix_permissions(mode),
            None => opts,
        }
    }
}

/// Directory entries are dropped on read; OOXML consumers do not need them.
#[derive(Clone, Debug, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let mut zip = ZipArchive::new(Cursor::new(bytes)).context("read zip")?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).context("zip entry")?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)
                .with_context(|| format!("read zip entry: {}", file.name()))?;
            entries.push(PackageEntry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
                modified: file.last_modified().unwrap_or_default(),
                unix_mode: file.unix_mode(),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&PackageEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Appends a DEFLATE-compressed part.
    pub fn push(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        self.entries.push(PackageEntry {
            name: name.to_string(),
            data: data.into(),
            compression: CompressionMethod::Deflated,
            modified: DateTime::default(),
            unix_mode: Some(0o644),
        });
    }

    /// Swaps the bytes of an existing part, keeping its position and zip
    /// metadata.
    pub fn replace(&mut self, name: &str, data: Vec<u8>) -> anyhow::Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| anyhow!("no such package part: {name}"))?;
        entry.data = data;
        Ok(())
    }

    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let mut zout = ZipWriter::new(Cursor::new(Vec::new()));
        for ent in &self.entries {
            zout.start_file(ent.name.as_str(), ent.options())
                .with_context(|| format!("start zip file: {}", ent.name))?;
            zout.write_all(&ent.data)
                .with_context(|| format!("write zip file: {}", ent.name))?;
        }
        Ok(zout.finish().context("finish zip")?.into_inner())
    }
}
