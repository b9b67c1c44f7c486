//! Error types for unblank library.

use std::io;
use thiserror::Error;

/// Result type alias for unblank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while scanning or rewriting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The container cannot be read as a ZIP package.
    #[error("Not an archive: {0}")]
    NotAnArchive(String),

    /// The container is readable but a required entry is missing or unreadable.
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// The body XML is not well-formed or has no body element.
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),

    /// An edit would break the body's required structure.
    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    /// The final structural check before write-back failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A scan report could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// Writing the output or backup file failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// A filename or selection supplied by the user is not usable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Taxonomy name of the error, used in CLI messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Io(_) => "IoError",
            Error::NotAnArchive(_) => "NotAnArchive",
            Error::CorruptArchive(_) => "CorruptArchive",
            Error::MalformedMarkup(_) => "MalformedMarkup",
            Error::StructuralViolation(_) => "StructuralViolation",
            Error::Serialization(_) => "SerializationError",
            Error::Render(_) => "RenderError",
            Error::WriteFailure(_) => "WriteFailure",
            Error::InvalidInput(_) => "UserInputInvalid",
        }
    }

    /// Whether the caller can recover by asking the user again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::CorruptArchive("required entry not found".to_string())
            }
            zip::result::ZipError::InvalidArchive(_) => Error::NotAnArchive(err.to_string()),
            _ => Error::CorruptArchive(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedMarkup(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("segment 9 does not exist".to_string());
        assert_eq!(err.to_string(), "Invalid input: segment 9 does not exist");

        let err = Error::StructuralViolation("no terminal section".to_string());
        assert_eq!(
            err.to_string(),
            "Structural violation: no terminal section"
        );
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Error::NotAnArchive(String::new()).kind_name(), "NotAnArchive");
        assert_eq!(
            Error::Serialization(String::new()).kind_name(),
            "SerializationError"
        );
        assert_eq!(
            Error::InvalidInput(String::new()).kind_name(),
            "UserInputInvalid"
        );
        assert_eq!(Error::Render(String::new()).kind_name(), "RenderError");
    }

    #[test]
    fn test_only_input_errors_are_recoverable() {
        assert!(Error::InvalidInput("bad".into()).is_recoverable());
        assert!(!Error::WriteFailure("disk full".into()).is_recoverable());
        assert!(!Error::MalformedMarkup("eof".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
