use std::io;
use std::result;

use serenity::prelude::SerenityError;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("A command named `{0}` is already registered.")]
    DuplicateName(String),
    #[error("The `{0}` event already has a bound handler.")]
    DuplicateBinding(String),
    #[error("No command matching `{0}` was found.")]
    NotFound(String),
    #[error("Invalid command definition: {0}")]
    InvalidDefinition(String),
    #[error("The required argument `{0}` is missing.")]
    MissingArgument(String),
    #[error("The argument `{0}` has an unexpected type.")]
    InvalidArgument(String),
    #[error("{0}")]
    Handler(String),
    #[error("{0}")]
    Connector(String),
    #[error("{0}")]
    Storage(String),
    #[error("{0}")]
    Config(String),
}

impl From<SerenityError> for Error {
    fn from(err: SerenityError) -> Error {
        let description = err.to_string();
        Error::Connector(description)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Storage(format!("I/O failure: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Storage(format!("Malformed JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::error::Error;

    #[test]
    fn test_io_error_becomes_storage_error() {
        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err, Error::Storage(format!("I/O failure: denied")));
    }

    #[test]
    fn test_not_found_message_names_the_command() {
        let err = Error::NotFound("foo".to_string());
        assert_eq!(err.to_string(), "No command matching `foo` was found.");
    }
}
