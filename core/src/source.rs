//! Where documents come from.
//!
//! The engine only ever sees a [`DocumentSource`]; [`DirectorySource`] is the
//! filesystem adapter used by the command line and HTTP front ends.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SearchError};
use crate::DocumentId;

pub const DEFAULT_EXTENSION: &str = "txt";

/// Materializes a collection of `(id, content)` pairs.
pub trait DocumentSource {
    /// Fails only when the source as a whole is unreachable; unreadable items
    /// may be skipped. An empty vector is a valid answer.
    fn documents(&self) -> Result<Vec<(DocumentId, String)>>;
}

/// Fixed in-memory pairs.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pairs: Vec<(DocumentId, String)>,
}

impl MemorySource {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<DocumentId>,
        V: Into<String>,
    {
        Self { pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl DocumentSource for MemorySource {
    fn documents(&self) -> Result<Vec<(DocumentId, String)>> { Ok(self.pairs.clone()) }
}

/// Plain-text files directly inside one directory (no recursion), filtered by extension.
/// Symlinks are followed, so a linked file counts like a regular one.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf(), extension: DEFAULT_EXTENSION.to_string() }
    }

    /// Extension without the leading dot, e.g. `md`.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    fn unavailable(&self, reason: impl ToString) -> SearchError {
        SearchError::SourceUnavailable {
            source_name: self.root.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl DocumentSource for DirectorySource {
    fn documents(&self) -> Result<Vec<(DocumentId, String)>> {
        let meta = fs::metadata(&self.root).map_err(|e| self.unavailable(e))?;
        if !meta.is_dir() {
            return Err(self.unavailable("not a directory"));
        }

        let mut out = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let p = entry.path();
            if !entry.file_type().is_file() { continue; }
            if p.extension().and_then(|s| s.to_str()) != Some(self.extension.as_str()) { continue; }
            let Some(name) = p.file_name().and_then(|s| s.to_str()) else { continue };
            match fs::read_to_string(p) {
                Ok(text) => out.push((name.to_string(), text)),
                Err(e) => tracing::warn!(path = %p.display(), error = %e, "skipping unreadable document"),
            }
        }
        tracing::debug!(root = %self.root.display(), count = out.len(), "enumerated directory");
        Ok(out)
    }
}
