//! Common types and utilities shared across Polytag crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used throughout the Polytag workspace. It is intentionally lightweight
//! so that every crate can depend on it without pulling in the HTTP or
//! HTML stacks.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PolytagError`] and [`Result`]: Shared error handling for glue code
//!
//! # Examples
//!
//! ```rust
//! use polytag_common::PolytagError;
//!
//! let err = PolytagError::Config("missing inference.auth_token".into());
//! assert_eq!(err.to_string(), "Configuration error: missing inference.auth_token");
//! ```

pub mod observability;

/// Error types used by crates that glue the pipeline together.
///
/// Library crates keep their own typed errors (`HttpError`, `LlmError`,
/// `PipelineError`); this type is where they meet the binary.
#[derive(thiserror::Error, Debug)]
pub enum PolytagError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An HTTP client could not be constructed or a request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The pipeline could not be assembled.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// Convenient alias for results that use [`PolytagError`].
pub type Result<T> = std::result::Result<T, PolytagError>;
