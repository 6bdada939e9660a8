//! Structured error metadata.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::ErrorKind;

/// Positional and contextual metadata attached to a parse failure.
///
/// Keys are sorted (the map is a `BTreeMap`), which keeps both the rendered
/// text block and the JSON form stable.
pub type MetaMap = BTreeMap<String, Vec<String>>;

/// A parse failure wrapped with positional context: line, column, the runes
/// around the failure, call counters, and the innermost directive's state.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct MetaError {
    kind: ErrorKind,
    meta: MetaMap,
}

impl MetaError {
    pub(crate) fn new(kind: ErrorKind, meta: MetaMap) -> Self {
        Self { kind, meta }
    }

    /// The underlying failure.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The attached metadata.
    #[must_use]
    pub fn meta(&self) -> &MetaMap {
        &self.meta
    }

    /// Metadata rendered one `key: [v1, v2]` line at a time, sorted by key.
    #[must_use]
    pub fn meta_string(&self) -> String {
        let mut out = String::new();
        for (key, values) in &self.meta {
            let _ = writeln!(out, "{key}: [{}]", values.join(", "));
        }
        out
    }

    /// Machine-readable report: `{"error": ..., "meta": {...}}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "meta": self.meta,
        })
    }
}
