//! Application services
//!
//! Concrete service implementations that orchestrate the tree engine.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod state;
mod traces;
mod tree;

pub use state::StateStore;
pub use traces::{TraceFile, TraceStore};
pub use tree::{OperationReport, TreeService};
