//! Error types shared by the graph, catalog, and scan layers.

use thiserror::Error;

use crate::catalog::IssueCategory;
use crate::graph::NodeId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Error type returned by external collaborators (artifact enumerators,
/// dependency closure providers).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum AuditError {
    /// A referencer key was passed to `intern` before it was interned itself.
    #[error("cannot link '{key}': referencer '{referencer}' was never interned")]
    UnknownReferencer { key: String, referencer: String },

    #[error("descriptor '{descriptor}' belongs to {actual:?}, not {expected:?}")]
    DescriptorMismatch {
        descriptor: String,
        expected: IssueCategory,
        actual: IssueCategory,
    },

    #[error("node {0:?} is not part of this registry")]
    UnknownNode(NodeId),

    #[error("node registry is full ({0} nodes)")]
    RegistryFull(usize),

    #[error("duplicate descriptor id: {0}")]
    DuplicateDescriptor(String),

    #[error("invalid match pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Failure reported by an external collaborator, surfaced as-is.
    #[error("{operation} failed for '{path}': {source}")]
    Collaborator {
        operation: &'static str,
        path: String,
        #[source]
        source: CollaboratorError,
    },

    #[error("scan cancelled")]
    Cancelled,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("msgpack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

impl AuditError {
    pub(crate) fn collaborator(
        operation: &'static str,
        path: impl Into<String>,
        source: CollaboratorError,
    ) -> Self {
        Self::Collaborator {
            operation,
            path: path.into(),
            source,
        }
    }
}
