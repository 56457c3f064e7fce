//! Domain layer: the red-black tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

mod balance;
pub mod document;
pub mod error;
pub mod invariants;
pub mod node;
pub mod render;
pub mod trace;
pub mod tree;

pub use document::{Document, DocumentNode};
pub use error::{DomainError, DomainResult};
pub use invariants::{verify, InvariantViolation};
pub use node::{Color, Node, Side};
pub use render::TreeRender;
pub use trace::{TraceOp, TraceRecord, Tracer};
pub use tree::RedBlackTree;
