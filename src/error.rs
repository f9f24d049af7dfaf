//! Error types for conductor network analysis.
//!
//! This module provides a unified error type [`BfemError`] that covers
//! loading an exported network, building segments, and running the
//! topology and capacitance analyses.
//!
//! Degenerate geometry met while measuring segment distances is *not* an
//! error: it is resolved locally and recorded on the distance result (see
//! [`crate::geometry::ClosestApproach`]).

use thiserror::Error;

/// Result type alias using [`BfemError`].
pub type Result<T> = std::result::Result<T, BfemError>;

/// Unified error type for all analysis operations.
#[derive(Error, Debug)]
pub enum BfemError {
    // ============ Input Errors ============
    /// Unexpected schema identifier, unit tag, or document shape
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Structurally valid input that is semantically degenerate
    #[error("Data error: {message}")]
    Data { message: String },

    /// Invalid analysis parameter
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // ============ I/O Errors ============
    /// Error reading a network file
    #[error("Failed to read network file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    Wasm { message: String },
}

impl BfemError {
    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a data error
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether this is a schema error.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Whether this is a data error.
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }
}
