//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::{ApplicationResult, StateStore, TraceStore, TreeService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding the settings and I/O boundaries all services share.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Tree service seeded from the persisted state.
    pub fn tree_service(&self) -> ApplicationResult<TreeService> {
        TreeService::load(self.fs.clone(), self.settings.clone())
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(
            self.fs.clone(),
            self.settings.state_path(),
            self.settings.pretty,
        )
    }

    pub fn trace_store(&self) -> TraceStore {
        TraceStore::new(
            self.fs.clone(),
            self.settings.trace_path(),
            self.settings.pretty,
        )
    }
}
