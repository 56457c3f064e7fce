//! Step recorder for tree mutations.
//!
//! A [`Tracer`] is attached to a tree by `enable_tracing` and collects one
//! [`TraceRecord`] per structural decision, each carrying a full document
//! snapshot of the tree at that instant.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::document::Document;

/// Kind of step recorded in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOp {
    Insert,
    CreateRoot,
    Descend,
    Link,
    Duplicate,
    /// Insert fixup: red uncle, recolor and move up.
    RedUncle,
    /// Insert fixup: inner grandchild, rotate the parent first.
    Triangle,
    /// Insert fixup: outer grandchild, recolor and rotate the grandparent.
    Line,
    RotateLeft,
    RotateRight,
    RecolorRoot,
    Remove,
    NotFound,
    Successor,
    Unlink,
    /// The unlinked node was red, no fixup needed.
    RedUnlinked,
    /// Delete fixup case 1.
    RedSibling,
    /// Delete fixup case 2.
    BlackNephews,
    /// Delete fixup case 3.
    NearNephew,
    /// Delete fixup case 4.
    FarNephew,
    /// Residual deficiency absorbed by painting `x` black.
    Absorb,
    Clear,
}

impl TraceOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::CreateRoot => "create_root",
            Self::Descend => "descend",
            Self::Link => "link",
            Self::Duplicate => "duplicate",
            Self::RedUncle => "red_uncle",
            Self::Triangle => "triangle",
            Self::Line => "line",
            Self::RotateLeft => "rotate_left",
            Self::RotateRight => "rotate_right",
            Self::RecolorRoot => "recolor_root",
            Self::Remove => "remove",
            Self::NotFound => "not_found",
            Self::Successor => "successor",
            Self::Unlink => "unlink",
            Self::RedUnlinked => "red_unlinked",
            Self::RedSibling => "red_sibling",
            Self::BlackNephews => "black_nephews",
            Self::NearNephew => "near_nephew",
            Self::FarNephew => "far_nephew",
            Self::Absorb => "absorb",
            Self::Clear => "clear",
        }
    }
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: DeserializeOwned"
))]
pub struct TraceRecord<T> {
    pub operation: TraceOp,
    pub description: String,
    pub tree: Document<T>,
    /// Microseconds since tracing was enabled; never decreases.
    pub elapsed_us: u64,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<T>,
}

/// Collects trace records for one tree.
#[derive(Debug)]
pub struct Tracer<T> {
    label: String,
    started: Instant,
    records: Vec<TraceRecord<T>>,
}

impl<T> Tracer<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
            records: Vec::new(),
        }
    }

    /// Caller-supplied routing label; not interpreted by the engine.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TraceRecord<T>] {
        &self.records
    }

    pub fn record(
        &mut self,
        operation: TraceOp,
        description: String,
        tree: Document<T>,
        highlight: Option<T>,
    ) {
        let elapsed_us = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        tracing::trace!(%operation, %description, "trace step");
        self.records.push(TraceRecord {
            operation,
            description,
            tree,
            elapsed_us,
            recorded_at: Utc::now(),
            highlight,
        });
    }

    /// Takes all records collected so far, leaving the tracer enabled and empty.
    pub fn drain(&mut self) -> Vec<TraceRecord<T>> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_records_when_drained_then_tracer_is_empty_and_keeps_label() {
        let mut tracer: Tracer<i32> = Tracer::new("live");
        tracer.record(TraceOp::Insert, "insert 1".into(), Document::empty(), Some(1));
        tracer.record(TraceOp::CreateRoot, "root 1".into(), Document::leaf(1, crate::domain::Color::Black), Some(1));

        let records = tracer.drain();

        assert_eq!(records.len(), 2);
        assert!(tracer.is_empty());
        assert_eq!(tracer.label(), "live");
        assert!(records[0].elapsed_us <= records[1].elapsed_us);
    }

    #[test]
    fn given_record_without_highlight_when_serialized_then_omits_field() {
        let mut tracer: Tracer<i32> = Tracer::new("t");
        tracer.record(TraceOp::Clear, "clear".into(), Document::empty(), None);

        let json = serde_json::to_value(&tracer.records()[0]).unwrap();

        assert_eq!(json["operation"], "clear");
        assert!(json["tree"].is_null());
        assert!(json.get("highlight").is_none());
    }
}
