//! Core error type for all cardshell operations
//!
//! Failures fall into three families:
//!
//! - validation failures, raised when a buffer or an operator input violates an
//!   invariant (overflowing writes, responses shorter than the status word, bad hex)
//! - transmission failures, raised when a card answers with an error status word
//! - state failures, raised when a required selection is missing or the transport
//!   reports that a reader, card or channel is unavailable
//!
//! Nothing in this crate retries or recovers silently; every failure reaches the caller.

use crate::response::error::TransmissionError;
use crate::transport::TransportError;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    //
    // Validation errors
    //
    /// A write or length change would exceed the buffer capacity
    #[error("Buffer overflow: {requested} bytes requested, capacity is {capacity}")]
    BufferOverflow {
        /// Length the operation needed
        requested: usize,
        /// Capacity of the buffer
        capacity: usize,
    },

    /// Response APDU shorter than the two status bytes
    #[error("Invalid response APDU - length has to be at least 2 bytes, got {0}")]
    InvalidResponse(usize),

    /// Malformed hex input
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Malformed file identifier
    #[error("Invalid file identifier: {0}")]
    InvalidFileId(String),

    //
    // Transmission errors
    //
    /// The card answered with an error status word
    #[error(transparent)]
    Transmission(#[from] TransmissionError),

    //
    // State errors
    //
    /// An operation needs a prior selection that is missing
    #[error("No {0} selected")]
    NotSelected(&'static str),

    /// The transport cannot provide another resource, e.g. a logical channel
    #[error("{0}")]
    ResourceExhausted(String),

    /// The card terminal disappeared while being queried
    #[error("Card terminal {0} no longer available")]
    TerminalUnavailable(String),

    /// Transport level fault
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    //
    // General errors
    //
    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

/// Result alias using the core [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is a validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self.root(),
            Self::BufferOverflow { .. }
                | Self::InvalidResponse(_)
                | Self::InvalidHex(_)
                | Self::InvalidFileId(_)
        )
    }

    /// Whether this is a transmission failure
    pub fn is_transmission(&self) -> bool {
        matches!(self.root(), Self::Transmission(_))
    }

    /// Whether this is a state failure
    pub fn is_state(&self) -> bool {
        matches!(
            self.root(),
            Self::NotSelected(_)
                | Self::ResourceExhausted(_)
                | Self::TerminalUnavailable(_)
                | Self::Transport(_)
        )
    }

    /// The transmission failure carried by this error, if any
    pub fn as_transmission(&self) -> Option<&TransmissionError> {
        match self.root() {
            Self::Transmission(e) => Some(e),
            _ => None,
        }
    }
}

/// Extension trait for Result with core Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseApdu;

    #[test]
    fn test_classification_sees_through_context() {
        let err = Error::NotSelected("card").with_context("Opening channel");
        assert!(err.is_state());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Opening channel: No card selected");
    }

    #[test]
    fn test_transmission_accessor() {
        let response = ResponseApdu::new(&[0x6A, 0x82]).unwrap();
        let err: Error = TransmissionError::new("File not found", response).into();
        assert!(err.is_transmission());
        assert_eq!(err.to_string(), "6A82: File not found");
        assert_eq!(err.as_transmission().unwrap().response().sw(), 0x6A82);
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::InvalidResponse(1));
        let err = result.context("Reading response").unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err.root(), Error::InvalidResponse(1)));
    }
}
