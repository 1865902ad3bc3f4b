//! Error types for scanning.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the scan of a file.
#[derive(Debug, Error)]
pub enum Error {
    /// The message could not be parsed.
    #[error("MIME error: {0}")]
    Mime(#[from] mailprobe_mime::Error),

    /// A message file could not be read.
    ///
    /// The path is not part of the message; [`Error::File`] adds it.
    #[error("Failed to read message: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing a report line failed.
    #[error("Failed to write report: {0}")]
    Write(#[from] std::io::Error),

    /// The message has no Subject header.
    #[error("Message has no Subject header")]
    MissingSubject,

    /// The Subject header does not start with a `[N] tag`.
    #[error("Subject does not start with a [N] tag: {0:?}")]
    SubjectMismatch(String),

    /// Scanning a file failed.
    #[error("{}: {source}", path.display())]
    File {
        /// File being scanned.
        path: PathBuf,
        /// What went wrong.
        source: Box<Error>,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_error_names_path_once() {
        let path = PathBuf::from("/tmp/samples/missing.eml");
        let err = Error::File {
            path: path.clone(),
            source: Box::new(Error::Read {
                path,
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            }),
        };
        let text = err.to_string();
        assert_eq!(text, "/tmp/samples/missing.eml: Failed to read message: not found");
        assert_eq!(text.matches("missing.eml").count(), 1);
    }
}
