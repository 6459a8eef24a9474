//! Error types for Flowstudio.
//!
//! All errors in Flowstudio are represented by the `FlowError` enum.
//! Structural edits that would break a graph invariant are reported as
//! [`FlowError::InvalidOperation`] carrying a [`Rejection`], so callers can
//! tell "nothing changed because the edit was invalid" apart from a no-op.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a structural edit was refused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// The start/end node cannot be deleted, relabeled or reconfigured.
    TerminalNode,
    /// Only `test` and `condition` nodes may be added.
    TerminalKind,
    /// No node with the given id.
    UnknownNode,
    /// No connection with the given id.
    UnknownConnection,
    /// A connection may not start and end at the same node.
    SelfLoop,
    /// The ordered pair is already connected.
    DuplicateConnection,
    /// The config variant does not belong to the node's kind.
    ConfigMismatch,
}

/// Unified error type for all Flowstudio operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// A graph edit was refused; the snapshot is unchanged.
    #[error("invalid operation: {0}")]
    InvalidOperation(Rejection),

    /// A node's config cannot be exported.
    #[error("export failed at node '{node_id}', field '{field}': {message}")]
    Export {
        node_id: String,
        field: String,
        message: String,
    },

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, YAML).
    #[error("{0}")]
    Convert(String),

    /// Exchange model errors (missing terminals, duplicate ids, bad config).
    #[error("{0}")]
    Model(String),

    /// Metrics monitor errors.
    #[error("{0}")]
    Monitor(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),

    /// Message queue errors.
    #[error("{0}")]
    Queue(String),
}

impl FlowError {
    /// Returns the rejection reason if this error is a refused edit.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            FlowError::InvalidOperation(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<Rejection> for FlowError {
    fn from(rejection: Rejection) -> Self {
        FlowError::InvalidOperation(rejection)
    }
}

impl From<std::io::Error> for FlowError {
    fn from(error: std::io::Error) -> Self {
        FlowError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(error: serde_json::Error) -> Self {
        FlowError::Convert(error.to_string())
    }
}

impl From<serde_yaml::Error> for FlowError {
    fn from(error: serde_yaml::Error) -> Self {
        FlowError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for FlowError {
    fn from(error: toml::de::Error) -> Self {
        FlowError::Config(error.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: FlowError = Rejection::SelfLoop.into();
        assert_eq!(err.rejection(), Some(Rejection::SelfLoop));
        assert_eq!(err.to_string(), "invalid operation: self_loop");

        let err: FlowError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(matches!(err, FlowError::Convert(_)));
        let err: FlowError = serde_yaml::from_str::<u8>("[").unwrap_err().into();
        assert!(matches!(err, FlowError::Convert(_)));
        let err: FlowError = std::io::Error::other("gone").into();
        assert_eq!(err, FlowError::IoError("gone".to_string()));
        assert_eq!(err.rejection(), None);
    }
}
