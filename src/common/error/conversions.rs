//! Error conversion implementations.
//!
//! From impls mapping library errors onto the unified [`Error`].

use super::types::Error;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::Zip(other.to_string()),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(format!("XML write error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_io_error_keeps_io_variant() {
        let err: Error =
            zip::result::ZipError::Io(std::io::Error::other("sink closed")).into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_fmt_error_maps_to_xml() {
        let err: Error = std::fmt::Error.into();
        assert!(matches!(err, Error::Xml(_)));
        assert!(err.to_string().contains("XML write error"));
    }
}
