//! Tree state persistence
//!
//! Keeps the current tree between invocations as a single document file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Document;
use crate::infrastructure::traits::FileSystem;

/// Reads and writes the tree document file.
pub struct StateStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    pretty: bool,
}

impl StateStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf, pretty: bool) -> Self {
        Self { fs, path, pretty }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored document; a missing file is an empty tree.
    pub fn load(&self) -> ApplicationResult<Document<i64>> {
        if !self.fs.exists(&self.path) {
            debug!("load: no state at {}", self.path.display());
            return Ok(Document::empty());
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read state", &self.path)?;
        if content.trim().is_empty() {
            return Ok(Document::empty());
        }
        Document::from_json_str(&content).map_err(|source| ApplicationError::InvalidDocument {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, document: &Document<i64>) -> ApplicationResult<()> {
        let json = document
            .to_json_string(self.pretty)
            .with_path_context("serialize state", &self.path)?;
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create state directory", &self.path)?;
        self.fs
            .write(&self.path, &json)
            .with_path_context("write state", &self.path)?;
        debug!("save: wrote {}", self.path.display());
        Ok(())
    }
}
