//! Response interpretation
//!
//! Every command builder implements [`ResponseInterpreter`]. The provided
//! [`ResponseInterpreter::interpret`] applies the generic status word tables first
//! and only falls back to the command specific logic when those tables have
//! nothing to say about the status word.

use std::fmt;

use tracing::{debug, info};

use super::ResponseApdu;
use super::error::TransmissionError;
use super::status::Classification;

/// Outcome of a response that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Normal processing; carries the status word in hex, e.g. `9000`
    Success(String),
    /// Processing completed with a warning
    Warning(String),
}

impl Interpretation {
    /// The text describing this outcome
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Warning(message) => message,
        }
    }

    /// The warning text, or `None` for a clean success
    pub fn into_warning(self) -> Option<String> {
        match self {
            Self::Warning(message) => Some(message),
            Self::Success(_) => None,
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Something able to judge the responses to the commands it issues
pub trait ResponseInterpreter {
    /// Interpret a response
    ///
    /// Warnings are returned, errors are raised as [`TransmissionError`]. Status
    /// words the generic tables do not know are passed to
    /// [`Self::interpret_specific`].
    fn interpret(&self, response: &ResponseApdu) -> Result<Interpretation, TransmissionError> {
        let status = response.status();
        match status.classify() {
            Classification::Success => {
                match status.remaining_bytes() {
                    Some(remaining) => {
                        debug!(status = %status, remaining, "More response data available")
                    }
                    None => debug!(status = %status, "Normal processing"),
                }
                Ok(Interpretation::Success(status.to_hex_string()))
            }
            Classification::Warning(message) => {
                info!(status = %status, warning = %message, "Card reported a warning");
                Ok(Interpretation::Warning(message.into_owned()))
            }
            Classification::Error(message) => {
                debug!(status = %status, error = message, "Card reported an error");
                Err(TransmissionError::new(message, response.clone()))
            }
            Classification::Unclassified => {
                debug!(status = %status, "Status word not covered by generic tables");
                self.interpret_specific(response)
            }
        }
    }

    /// Command specific interpretation of status words the generic tables skip
    fn interpret_specific(
        &self,
        response: &ResponseApdu,
    ) -> Result<Interpretation, TransmissionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Interpreter whose fallback accepts everything as a warning
    struct Lenient;

    impl ResponseInterpreter for Lenient {
        fn interpret_specific(
            &self,
            response: &ResponseApdu,
        ) -> Result<Interpretation, TransmissionError> {
            Ok(Interpretation::Warning(format!(
                "specific {}",
                response.status().to_hex_string()
            )))
        }
    }

    fn response(bytes: &[u8]) -> ResponseApdu {
        ResponseApdu::new(bytes).unwrap()
    }

    #[test]
    fn test_success_echoes_status_word() {
        let result = Lenient.interpret(&response(&[0x01, 0x02, 0x90, 0x00])).unwrap();
        assert_eq!(result, Interpretation::Success("9000".to_string()));
        assert_eq!(result.message(), "9000");
        assert_eq!(result.into_warning(), None);

        let result = Lenient.interpret(&response(&[0x61, 0x1A])).unwrap();
        assert_eq!(result.message(), "611A");
    }

    #[test]
    fn test_display_shows_message() {
        assert_eq!(Interpretation::Success("9000".into()).to_string(), "9000");
        assert_eq!(Interpretation::Warning("Counter = 2".into()).to_string(), "Counter = 2");
    }

    #[test]
    fn test_warning_returned_without_failure() {
        let result = Lenient.interpret(&response(&[0x62, 0x83])).unwrap();
        assert!(matches!(result, Interpretation::Warning(_)));
        assert_eq!(result.into_warning().as_deref(), Some("Selected file invalidated"));
    }

    #[test]
    fn test_error_raises_with_response() {
        let err = Lenient.interpret(&response(&[0x6A, 0x82])).unwrap_err();
        assert_eq!(err.message(), "File not found");
        assert!(err.to_string().contains("File not found"));
        assert_eq!(err.to_string(), "6A82: File not found");
        assert_eq!(err.response().sw(), 0x6A82);
    }

    #[test]
    fn test_unclassified_delegates_to_command() {
        let result = Lenient.interpret(&response(&[0x62, 0x99])).unwrap();
        assert_eq!(result, Interpretation::Warning("specific 6299".to_string()));

        let result = Lenient.interpret(&response(&[0x93, 0x00])).unwrap();
        assert_eq!(result.message(), "specific 9300");
    }
}
