//! Error raised for responses carrying an error status word

use std::fmt;

use super::ResponseApdu;
use super::status::StatusWord;

/// A card answered with a status word classified as an error
///
/// Displays as the status word in hex, a colon and the classification text,
/// e.g. `6A82: File not found`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionError {
    /// Classification text
    message: String,
    /// Response that caused the error
    response: ResponseApdu,
}

impl TransmissionError {
    /// Create a new transmission error for the given response
    pub fn new<S: Into<String>>(message: S, response: ResponseApdu) -> Self {
        Self {
            message: message.into(),
            response,
        }
    }

    /// Classification text without the status word prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The response that caused this error
    pub const fn response(&self) -> &ResponseApdu {
        &self.response
    }

    /// Status word of the causing response
    pub fn status(&self) -> StatusWord {
        self.response.status()
    }
}

impl fmt::Display for TransmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status().to_hex_string(), self.message)
    }
}

impl std::error::Error for TransmissionError {}
