//! Campus Insight Library
//!
//! A Rust library for ingesting university course-section and campus-room
//! archives and answering a structured JSON query language over them.
//!
//! This library provides tools for:
//! - Parsing zip+JSON course-section archives into typed Section rows
//! - Parsing zip+HTML campus-room archives, including address geocoding
//! - Persisting datasets as self-describing JSON documents on disk
//! - Validating and evaluating queries: filtering, grouping, aggregation,
//!   multi-key ordering, projection and result-size bounding
//! - Serving the above over HTTP

pub mod config;
pub mod constants;
pub mod server;

// Core application modules
pub mod app {
    pub mod facade;
    pub mod models;
    pub mod services {
        pub mod id_codec;
        pub mod query;
        pub mod room_ingest;
        pub mod section_ingest;
        pub mod store;
    }
}

// Re-export commonly used types
pub use app::facade::DatasetManager;
pub use app::models::{Dataset, DatasetKind, Room, Section};
pub use config::Config;

/// Result type alias for campus-insight operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ingest, storage and query operations
///
/// The client-facing kinds (`InvalidId`, `InvalidContent`, `InvalidQuery`,
/// `NotFound`, `ResultTooLarge`) are distinct variants and must stay
/// distinct: the HTTP layer maps each to its own status code and callers
/// pattern-match on them.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Dataset id is empty, whitespace-only, or contains an underscore
    #[error("invalid dataset id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    /// Archive payload could not be ingested
    #[error("invalid dataset content: {message}")]
    InvalidContent { message: String },

    /// Query failed shape or semantic validation
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    /// Referenced dataset id is absent from the store
    #[error("dataset not found: '{id}'")]
    NotFound { id: String },

    /// Well-formed query whose result exceeds the row cap
    #[error("query produced {rows} rows, exceeding the limit of {limit}")]
    ResultTooLarge { rows: usize, limit: usize },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal fault (corrupt document, join failure, ...)
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create an invalid-id error with the rejection reason
    pub fn invalid_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-content error
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create an invalid-query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a not-found error for a dataset id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a result-too-large error against the configured row cap
    pub fn result_too_large(rows: usize) -> Self {
        Self::ResultTooLarge {
            rows,
            limit: constants::MAX_RESULT_ROWS,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Internal {
            message: format!("worker task failed: {error}"),
        }
    }
}
