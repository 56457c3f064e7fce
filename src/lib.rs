//! rbtrace: red-black tree engine with step-by-step rebalancing traces.
//!
//! Layers, from the inside out:
//! - `domain`: the arena-backed tree, balancing, tracing and the JSON document format
//! - `application`: services persisting tree state and trace files
//! - `infrastructure`: I/O boundaries and the service container
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{Color, Document, DocumentNode, RedBlackTree, TraceOp, TraceRecord};
