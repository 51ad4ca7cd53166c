// ── Layer error types ──
//
// One enum for the whole wrapper layer. "Multiple instances matched" is
// deliberately NOT here: it is a logged warning plus a deterministic
// first-match choice, and the call still succeeds. Nothing in this layer
// retries — retry cadence belongs to the caller's polling loop.

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the wrapper layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A selector matched zero remote instances.
    #[error("no {class} instance matches selector {selector}")]
    NotFound { class: &'static str, selector: String },

    /// A dynamic fetch returned no record — typically the remote object
    /// disappeared between enumeration and the read. Transient: callers
    /// polling a value should treat this as "no value this tick".
    #[error("failed to retrieve {class} attribute(s) {attributes:?}")]
    AttributeUnavailable {
        class: &'static str,
        attributes: Vec<String>,
    },

    /// The requested class name is not registered in this namespace.
    #[error("class {0:?} is not registered in this namespace")]
    UnknownClass(String),

    /// An adapter asked for an attribute the class never declared.
    #[error("class {class} declares no attribute {attribute:?}")]
    UnknownAttribute {
        class: &'static str,
        attribute: String,
    },

    /// A typed accessor could not convert the raw attribute value.
    #[error("attribute {attribute} of {class}: expected {expected}, got {value}")]
    TypeMismatch {
        class: &'static str,
        attribute: String,
        expected: &'static str,
        value: Value,
    },

    /// The transport could not be reached or was lost (construct/refresh).
    #[error("transport connection failed: {0}")]
    Connection(#[from] TransportError),

    /// The namespace has been torn down; only construction of a new one
    /// is valid from here.
    #[error("namespace is closed")]
    Closed,
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for failures worth trying again next poll tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::AttributeUnavailable { .. } | Self::Connection(_))
    }
}
