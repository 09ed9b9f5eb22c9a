//! Error types for prompt resolution.

use std::error::Error as StdError;
use std::io;

use crate::reader::LineReader;
use crate::request::PromptRequest;
use crate::Answer;

/// Message of the configuration error raised for a non-string default.
pub(crate) const NON_STRING_DEFAULT: &str = "The default option value must be a string";

/// Errors that can occur while resolving a prompt.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The prompt options are malformed. Raised before any I/O.
    #[error("{0}")]
    Config(String),

    /// The countdown expired and no usable default was configured.
    #[error("timed out")]
    Timeout,

    /// A validator rejected the input and automatic retry was disabled.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The input stream ended before a line was entered.
    #[error("Prompt cancelled by user.")]
    Cancelled,

    /// Reading from or writing to the terminal failed.
    #[error("Prompt failed: {0}")]
    Io(#[from] io::Error),
}

impl PromptError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Error returned by a [`Validator`](crate::Validator).
///
/// The message is what gets shown to the user when the prompt retries, so it
/// should read as a complete sentence or a short label such as
/// `Invalid choice: bleh`. An empty message retries silently.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ValidationError {
    /// Create a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary error raised inside a validator.
    ///
    /// The error's display form becomes the message.
    pub fn from_error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A validator rejected the input of a request that does not retry.
///
/// Keeps the request so the caller can ask the same question again with
/// [`retry`](Self::retry).
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ValidationFailure {
    #[source]
    error: ValidationError,
    request: PromptRequest,
}

impl ValidationFailure {
    pub(crate) fn new(error: ValidationError, request: PromptRequest) -> Self {
        Self { error, request }
    }

    /// The error returned by the failing validator.
    pub fn error(&self) -> &ValidationError {
        &self.error
    }

    /// The request whose input was rejected.
    pub fn request(&self) -> &PromptRequest {
        &self.request
    }

    /// Resolve the identical request again.
    pub async fn retry<R>(&self, reader: &mut R) -> Result<Answer, PromptError>
    where
        R: LineReader + ?Sized,
    {
        crate::resolver::resolve(&self.request, reader).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_is_exact() {
        assert_eq!(PromptError::Timeout.to_string(), "timed out");
    }

    #[test]
    fn config_error_displays_message_only() {
        let err = PromptError::config(NON_STRING_DEFAULT);
        assert_eq!(err.to_string(), "The default option value must be a string");
    }

    #[test]
    fn wrapped_errors_keep_their_source() {
        let io = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let err = ValidationError::from_error(io);
        assert_eq!(err.message(), "disk on fire");
        assert!(err.source().is_some());
    }

    #[test]
    fn failure_displays_and_chains_the_validator_error() {
        let request = PromptRequest::new("p: ", crate::PromptOptions::new()).unwrap();
        let failure = ValidationFailure::new(ValidationError::new("Invalid choice: bleh"), request);
        assert_eq!(failure.to_string(), "Invalid choice: bleh");
        let source = failure.source().unwrap();
        assert_eq!(source.to_string(), "Invalid choice: bleh");

        let err = PromptError::from(failure);
        assert_eq!(err.to_string(), "Invalid choice: bleh");
    }

    #[test]
    fn plain_validation_error_has_no_source() {
        let err = ValidationError::new("bla");
        assert_eq!(err.to_string(), "bla");
        assert!(err.source().is_none());
    }
}
