//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// The declared charset is not known.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),

    /// No content is defined for this media type.
    #[error("No content handler for {0}")]
    NoContentHandler(String),

    /// Content was requested from a multipart container.
    #[error("Multipart container has no content of its own: {0}")]
    NotLeaf(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
