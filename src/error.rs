//! Error types for mdlex library.

use std::io;
use thiserror::Error;

/// Result type alias for mdlex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting and displaying documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored document could not be parsed back into an editor state.
    #[error("Document parse error: {0}")]
    Parse(String),

    /// The highlighting service failed for a code block.
    #[error("Highlighting error: {0}")]
    Highlight(String),

    /// The highlighting service has no grammar for the language.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Error during rendering (JSON, page fragments).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// A file record was added without a usable filename.
    #[error("Filename must be a non-empty string")]
    InvalidFilename,

    /// No file record exists with the given id.
    #[error("Record not found: {0}")]
    RecordNotFound(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidFilename;
        assert_eq!(err.to_string(), "Filename must be a non-empty string");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
