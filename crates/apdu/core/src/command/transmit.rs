//! Raw transmission of an operator supplied APDU

use crate::command::{ApduCommand, CommandApdu};
use crate::error::Result;
use crate::response::ResponseApdu;
use crate::response::error::TransmissionError;
use crate::response::interpreter::{Interpretation, ResponseInterpreter};

/// Arbitrary command given as hex
///
/// Carries no command specific semantics: any status word the generic tables do
/// not classify is reported as an unknown response code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmit {
    apdu: CommandApdu,
}

impl Transmit {
    /// Parse the command from its hex representation
    pub fn from_hex(apdu: &str) -> Result<Self> {
        CommandApdu::from_hex(apdu).map(Self::new)
    }

    /// Wrap an already built command
    pub const fn new(apdu: CommandApdu) -> Self {
        Self { apdu }
    }
}

impl ApduCommand for Transmit {
    fn apdu(&self) -> &CommandApdu {
        &self.apdu
    }
}

impl ResponseInterpreter for Transmit {
    fn interpret_specific(
        &self,
        response: &ResponseApdu,
    ) -> Result<Interpretation, TransmissionError> {
        Err(TransmissionError::new(
            "Unknown response code",
            response.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_from_hex() {
        let transmit = Transmit::from_hex("00A4040008A000000003000000").unwrap();
        assert_eq!(transmit.apdu().len(), 13);
        assert_eq!(transmit.apdu().byte(1), Some(0xA4));

        assert!(Transmit::from_hex("00A40").unwrap_err().is_validation());
        assert!(Transmit::from_hex("").is_err());
    }

    #[test]
    fn test_transmit_interpretation() {
        let transmit = Transmit::from_hex("00B0000000").unwrap();

        let ok = ResponseApdu::new(&[0x01, 0x90, 0x00]).unwrap();
        assert_eq!(transmit.interpret(&ok).unwrap().message(), "9000");

        let warning = ResponseApdu::new(&[0x63, 0xC2]).unwrap();
        assert_eq!(
            transmit.interpret(&warning).unwrap(),
            Interpretation::Warning("Counter = 2".to_string())
        );

        let unknown = ResponseApdu::new(&[0x62, 0x10]).unwrap();
        let err = transmit.interpret(&unknown).unwrap_err();
        assert_eq!(err.to_string(), "6210: Unknown response code");
    }
}
