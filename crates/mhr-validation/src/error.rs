//! # Engine Errors
//!
//! Aborting failures of the validation engine. Rule violations are never
//! errors: they are [`crate::Diagnostic`] values. The variants here cover
//! missing context (no asset to validate against), bad configuration and
//! collaborator failures, which the engine converts into `External`
//! diagnostics before they reach a caller.

use thiserror::Error;

use mhr_core::MhrNumber;

/// Error that stops a request from being evaluated at all.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request names an asset whose history could not be loaded.
    #[error("asset {0} not found")]
    AssetNotFound(MhrNumber),

    /// The supplied history belongs to a different asset.
    #[error("asset history is for {actual}, request names {expected}")]
    AssetMismatch {
        /// MHR number named by the request.
        expected: MhrNumber,
        /// MHR number of the supplied history.
        actual: MhrNumber,
    },

    /// Engine configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error reading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by an external lookup collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backing service could not be reached.
    #[error("{0} lookup unavailable")]
    Unavailable(String),
}
