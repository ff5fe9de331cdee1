//! Guarded store
//!
//! The one reader/writer lock in the process. Every access to the document
//! file goes through here.

use parking_lot::RwLock;

use crate::document::Document;
use crate::error::Result;
use super::DocumentFile;

/// Document file behind a process-wide reader/writer lock
///
/// ## Locking discipline
///
/// - **Reads**: the read lock is held only while the file is loaded. The
///   caller then works on its private snapshot, so a write committing right
///   after may not be visible to it.
///
/// - **Updates**: the write lock is held across load → check → mutate →
///   save. Capacity and lookup checks are made against the same snapshot
///   that gets written back, so concurrent writers cannot lose each other's
///   changes or overshoot the capacity limit together.
#[derive(Debug)]
pub struct GuardedStore {
    file: RwLock<DocumentFile>,
}

impl GuardedStore {
    pub fn new(file: DocumentFile) -> Self {
        Self {
            file: RwLock::new(file),
        }
    }

    /// Load a snapshot under the read lock, then run `f` on it unlocked
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> Result<T>,
    {
        let document = {
            let file = self.file.read();
            file.load()?
        };
        f(&document)
    }

    /// Run `f` against the current document inside one write critical
    /// section. The document is saved only if `f` succeeds.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let file = self.file.write();
        let mut document = file.load()?;
        let out = f(&mut document)?;
        file.save(&document)?;
        Ok(out)
    }
}
