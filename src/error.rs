//! Error types for reflow.

use std::io;
use thiserror::Error;

/// Result type alias for reflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by [`Error::DocumentParse`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types that can occur while turning an upload into text.
///
/// Every variant is terminal for a conversion: nothing is retried and no
/// partial text is returned alongside an error.
#[derive(Error, Debug)]
pub enum Error {
    /// The input type is neither `application/pdf` nor `text/plain`.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The bytes could not be parsed as a valid document.
    #[error("Failed to parse document: {source}")]
    DocumentParse {
        #[source]
        source: BoxedCause,
    },

    /// Parsing succeeded but no page carried a single text fragment.
    #[error("No extractable text found in document")]
    EmptyExtraction,

    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The rewrite service failed or answered with nothing.
    #[error("Rewrite failed: {0}")]
    Rewrite(String),
}

impl Error {
    /// Wrap any error as a document parse failure.
    pub fn parse<E>(cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        Error::DocumentParse {
            source: cause.into(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::parse(err)
    }
}
