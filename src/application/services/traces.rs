//! Trace file persistence
//!
//! One JSON file per traced operation, named `<operation>_<value>_<n>.json`
//! inside the label directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::TraceRecord;
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// Trace of a single operation as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFile {
    pub label: String,
    pub operation: String,
    pub value: i64,
    pub steps: Vec<TraceRecord<i64>>,
}

/// Stores trace files under one label directory.
pub struct TraceStore {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
    pretty: bool,
}

impl TraceStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: PathBuf, pretty: bool) -> Self {
        Self { fs, dir, pretty }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(operation: &str, value: i64, sequence: usize) -> String {
        format!("{operation}_{value}_{sequence}.json")
    }

    #[instrument(level = "debug", skip(self, trace), fields(operation = %trace.operation, steps = trace.steps.len()))]
    pub fn save(&self, trace: &TraceFile, sequence: usize) -> ApplicationResult<PathBuf> {
        let path = self
            .dir
            .join(Self::file_name(&trace.operation, trace.value, sequence));
        let json = if self.pretty {
            serde_json::to_string_pretty(trace)
        } else {
            serde_json::to_string(trace)
        }
        .with_path_context("serialize trace", &path)?;

        self.fs
            .create_dir_all(&self.dir)
            .with_path_context("create trace directory", &self.dir)?;
        self.fs
            .write(&path, &json)
            .with_path_context("write trace", &path)?;
        debug!("saved trace {}", path.display());
        Ok(path)
    }

    /// Trace file names in the label directory, sorted.
    pub fn list(&self) -> ApplicationResult<Vec<String>> {
        if !self.fs.is_dir(&self.dir) {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = self
            .fs
            .list_dir(&self.dir)
            .with_path_context("list traces", &self.dir)?
            .iter()
            .filter(|p| p.is_json_file())
            .map(|p| p.file_name_lossy())
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> ApplicationResult<TraceFile> {
        let path = self.dir.join(name);
        if !self.fs.exists(&path) {
            return Err(ApplicationError::TraceNotFound(path));
        }
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read trace", &path)?;
        serde_json::from_str::<TraceFile>(&content).with_path_context("parse trace", &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RedBlackTree;
    use crate::infrastructure::traits::RealFileSystem;
    use tempfile::TempDir;

    fn sample_trace() -> TraceFile {
        let mut tree = RedBlackTree::new();
        tree.enable_tracing("live");
        tree.insert(3_i64);
        TraceFile {
            label: "live".into(),
            operation: "insert".into(),
            value: 3,
            steps: tree.flush_trace(),
        }
    }

    #[test]
    fn given_trace_when_saved_then_listed_and_loadable() {
        let tmp = TempDir::new().unwrap();
        let store = TraceStore::new(Arc::new(RealFileSystem), tmp.path().join("live"), true);
        let trace = sample_trace();

        let path = store.save(&trace, 1).unwrap();

        assert!(path.ends_with("insert_3_1.json"));
        assert_eq!(store.list().unwrap(), vec!["insert_3_1.json".to_string()]);
        assert_eq!(store.load("insert_3_1.json").unwrap(), trace);
    }

    #[test]
    fn given_missing_directory_when_list_then_empty() {
        let tmp = TempDir::new().unwrap();
        let store = TraceStore::new(Arc::new(RealFileSystem), tmp.path().join("nope"), false);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn given_unknown_name_when_load_then_trace_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = TraceStore::new(Arc::new(RealFileSystem), tmp.path().to_path_buf(), false);
        assert!(matches!(
            store.load("insert_1_1.json"),
            Err(ApplicationError::TraceNotFound(_))
        ));
    }

    #[test]
    fn given_non_json_files_when_list_then_ignored() {
        let tmp = TempDir::new().unwrap();
        RealFileSystem.write(&tmp.path().join("notes.txt"), "x").unwrap();
        RealFileSystem.write(&tmp.path().join("remove_2_2.json"), "{}").unwrap();
        let store = TraceStore::new(Arc::new(RealFileSystem), tmp.path().to_path_buf(), false);

        assert_eq!(store.list().unwrap(), vec!["remove_2_2.json".to_string()]);
    }
}
