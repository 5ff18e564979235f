use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Invalid JSON in {}: {message}", path.display())]
    InvalidJson { path: PathBuf, message: String },
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only view over a resume or cover-letter document.
///
/// The raw JSON tree is kept as-is; every accessor degrades to an empty value
/// when a field is missing or has an unexpected shape.
#[derive(Clone, Debug)]
pub struct Profile {
    root: Value,
}

impl Profile {
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProfileError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ProfileError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json_str(&text).map_err(|err| ProfileError::InvalidJson {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let stripped = strip_json_comments(text);
        let root: Value = serde_json::from_str(&stripped)?;
        Ok(Self { root })
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn basics(&self) -> &Value {
        self.root.get("basics").unwrap_or(&Value::Null)
    }

    pub fn section(&self, key: &str) -> &[Value] {
        entries(&self.root, key)
    }

    /// Language requested by the document itself (`meta.language`, then `language`).
    pub fn language(&self) -> Option<String> {
        let meta = self.root.get("meta").unwrap_or(&Value::Null);
        let lang = text(meta, "language");
        let lang = if lang.is_empty() {
            text(&self.root, "language")
        } else {
            lang
        };
        Some(lang).filter(|s| !s.trim().is_empty())
    }
}

pub fn text(v: &Value, key: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

pub fn strings(v: &Value, key: &str) -> Vec<String> {
    match v.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn entries<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    match v.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Removes `//` line comments and `/* */` block comments that sit outside
/// string literals. Newlines inside comments are kept so parse errors still
/// point at the right line.
pub fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
