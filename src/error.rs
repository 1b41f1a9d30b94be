//! Error types for distill.

/// Errors that can surface from the summarization pipeline.
///
/// Two conditions are deliberately *not* errors: an indivisible chunk or
/// batch item that exceeds its budget, and a collapse loop that exhausts
/// its iteration cap. Both are tolerated, logged via `tracing::warn!`,
/// and processing continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No documents (or no summarizable content) were supplied.
    #[error("no documents supplied")]
    EmptyInput,

    /// A completion or token-count call failed (network, rate limit,
    /// timeout). Aborts the enclosing wave; retry policy belongs to the
    /// service implementation, not the core.
    #[error("service call failed: {0}")]
    Service(String),

    /// A structured response did not match the expected shape.
    #[error("malformed structured response: {0}")]
    MalformedResponse(String),
}

/// Result type for distill operations.
pub type Result<T> = std::result::Result<T, Error>;
