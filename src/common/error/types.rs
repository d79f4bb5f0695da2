//! Error types for spreadsheet writing.
use thiserror::Error;

/// Main error type for workbook operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A builder or sheet argument was outside its accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed in the writer's current state
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML formatting error
    #[error("XML error: {0}")]
    Xml(String),

    /// A fallible row source yielded an error
    #[error("Row source error: {0}")]
    RowSource(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn illegal_state(msg: impl Into<String>) -> Self {
        Error::IllegalState(msg.into())
    }
}

/// Result type for workbook operations.
pub type Result<T> = std::result::Result<T, Error>;
