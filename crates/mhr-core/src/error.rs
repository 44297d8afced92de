//! # Error Types
//!
//! Root error type for the registry crates. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! Validation *diagnostics* are not errors: they are collected values
//! owned by `mhr-validation`. The types here cover malformed input that
//! cannot be turned into a domain value at all.

use thiserror::Error;

/// Top-level error type for the registry crates.
#[derive(Error, Debug)]
pub enum MhrError {
    /// An identifier did not match its required format.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A code string did not name a known enum variant.
    #[error("unknown code: {0}")]
    UnknownCode(String),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
