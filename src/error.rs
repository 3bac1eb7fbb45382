//! Errors for jwtscan
//!
//! Analysis findings are reported as [`Diagnostic`](crate::report::Diagnostic)
//! values inside the stage reports. This enum only covers the fallible helpers
//! around the pipeline, such as segment decoding and rule configuration.

use thiserror::Error;

/// jwtscan errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Base64URL decoding of {segment} failed: {reason}")]
    FormatInvalidBase64 { segment: String, reason: String },

    #[error("{segment} is not valid UTF-8: {reason}")]
    FormatInvalidUtf8 { segment: String, reason: String },

    #[error("JSON parsing of {segment} failed: {reason}")]
    FormatInvalidJson { segment: String, reason: String },

    #[error("{segment} must be a JSON object, found {found}")]
    FormatNotObject { segment: String, found: String },

    // ============================================================================
    // Encoding Errors
    // ============================================================================
    #[error("JSON encoding failed: {0}")]
    FormatEncodeJson(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

/// Result type alias for jwtscan operations
pub type Result<T> = std::result::Result<T, Error>;
