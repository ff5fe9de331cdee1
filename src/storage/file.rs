//! Document file
//!
//! Loads and saves the whole document as a single JSON snapshot.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::Result;

/// Single-file snapshot persistence for the document
#[derive(Debug)]
pub struct DocumentFile {
    /// Location of the JSON file
    path: PathBuf,

    /// fsync after each save
    sync_writes: bool,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>, sync_writes: bool) -> Self {
        Self {
            path: path.into(),
            sync_writes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document.
    ///
    /// A missing or empty file yields an empty document. Anything else that
    /// fails to parse is an error; it is never replaced by `{}`.
    pub fn load(&self) -> Result<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::trace!("No document at {}, starting empty", self.path.display());
                return Ok(Document::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        let value = serde_json::from_slice(&bytes)?;
        Document::from_value(value)
    }

    /// Overwrite the file with `document`.
    ///
    /// Truncate-and-write, not an atomic rename: a crash mid-write can leave
    /// a partial file behind.
    pub fn save(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec(document.root())?;

        let mut file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        if self.sync_writes {
            file.sync_all()?;
        }

        tracing::trace!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}
