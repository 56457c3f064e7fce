//! Tree service
//!
//! Drives the tree engine for one persisted tree: applies operations, records
//! and stores their traces, and reports the resulting state.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::services::{StateStore, TraceFile, TraceStore};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{Document, RedBlackTree};
use crate::infrastructure::traits::FileSystem;

/// Result of one service operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    pub tree_state: Document<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_file: Option<PathBuf>,
}

/// Service owning one tree and its persistence.
pub struct TreeService {
    tree: RedBlackTree<i64>,
    state: StateStore,
    traces: TraceStore,
    settings: Arc<Settings>,
    operation_counter: usize,
}

impl TreeService {
    /// Create a service over an empty tree.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        let state = StateStore::new(fs.clone(), settings.state_path(), settings.pretty);
        let traces = TraceStore::new(fs, settings.trace_path(), settings.pretty);
        Self {
            tree: RedBlackTree::new(),
            state,
            traces,
            settings,
            operation_counter: 0,
        }
    }

    /// Create a service seeded from the persisted state file.
    ///
    /// The trace counter continues after the traces already on disk.
    pub fn load(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> ApplicationResult<Self> {
        let mut service = Self::new(fs, settings);
        let document = service.state.load()?;
        service.tree = RedBlackTree::from_document(document);
        service.operation_counter = service.traces.list()?.len();
        debug!(
            nodes = service.tree.len(),
            counter = service.operation_counter,
            "loaded tree state"
        );
        Ok(service)
    }

    pub fn tree(&self) -> &RedBlackTree<i64> {
        &self.tree
    }

    pub fn traces(&self) -> &TraceStore {
        &self.traces
    }

    pub fn state_store(&self) -> &StateStore {
        &self.state
    }

    /// Persist the current tree document.
    pub fn save(&self) -> ApplicationResult<()> {
        self.state.save(&self.tree.to_document())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: i64) -> ApplicationResult<OperationReport> {
        self.begin_trace();
        self.tree.insert(value);
        let trace_file = self.finish_trace("insert", value)?;
        info!(value, "inserted");

        Ok(OperationReport {
            success: true,
            message: "Element inserted successfully".to_string(),
            value: Some(value),
            tree_state: self.tree.to_document(),
            trace_file,
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, value: i64) -> ApplicationResult<OperationReport> {
        self.begin_trace();
        let removed = self.tree.remove(&value);
        let trace_file = if removed {
            self.finish_trace("remove", value)?
        } else {
            self.tree.disable_tracing();
            None
        };
        info!(value, removed, "remove");

        Ok(OperationReport {
            success: removed,
            message: if removed {
                "Element removed successfully".to_string()
            } else {
                "Element not found".to_string()
            },
            value: Some(value),
            tree_state: self.tree.to_document(),
            trace_file,
        })
    }

    pub fn state(&self) -> OperationReport {
        OperationReport {
            success: true,
            message: format!("{} nodes", self.tree.len()),
            value: None,
            tree_state: self.tree.to_document(),
            trace_file: None,
        }
    }

    /// Drop every node and restart trace numbering.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) -> OperationReport {
        self.tree.clear();
        self.operation_counter = 0;
        info!("tree cleared");

        OperationReport {
            success: true,
            message: "Tree cleared successfully".to_string(),
            value: None,
            tree_state: self.tree.to_document(),
            trace_file: None,
        }
    }

    fn begin_trace(&mut self) {
        if self.settings.trace {
            self.tree.enable_tracing(self.settings.label.clone());
        }
    }

    fn finish_trace(&mut self, operation: &str, value: i64) -> ApplicationResult<Option<PathBuf>> {
        if !self.tree.is_tracing() {
            return Ok(None);
        }
        let steps = self.tree.flush_trace();
        self.tree.disable_tracing();
        self.operation_counter += 1;

        let trace = TraceFile {
            label: self.settings.label.clone(),
            operation: operation.to_string(),
            value,
            steps,
        };
        let path = self.traces.save(&trace, self.operation_counter)?;
        Ok(Some(path))
    }
}
