//! Error types for html_harvest.
//!
//! Malformed HTML is never an error. These variants cover selector compilation
//! and the host boundary in [`crate::ffi`].

/// Error type for harvest operations.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// The CSS selector could not be compiled.
    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String, reason: String },

    /// A required pointer argument was null.
    #[error("{0} is null")]
    NullPointer(&'static str),

    /// Input bytes were not valid UTF-8.
    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// The request JSON did not match [`crate::ExtractionRequest`].
    #[error("Failed to parse request JSON: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    /// The result could not be serialized.
    #[error("Failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Serialized output contained an interior NUL byte.
    #[error("Result JSON contains null bytes")]
    NulByte,
}

/// Result type alias for harvest operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
