//! SELECT FILE by file identifier

use crate::command::{ApduCommand, CommandApdu};
use crate::file::FileId;
use crate::response::ResponseApdu;
use crate::response::error::TransmissionError;
use crate::response::interpreter::{Interpretation, ResponseInterpreter};

/// SELECT instruction byte
pub const INS_SELECT: u8 = 0xA4;

/// SELECT FILE command addressing a file by its two byte identifier
///
/// Layout: `[channel, A4, 00, 00, 02, id0, id1]`. The channel number is placed
/// in the class byte as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectFile {
    apdu: CommandApdu,
    file: FileId,
}

impl SelectFile {
    /// Build a SELECT FILE for `file` on the given channel
    pub fn new(channel: u8, file: FileId) -> Self {
        let [id0, id1] = file.bytes();
        let apdu = CommandApdu::from_bytes(&[channel, INS_SELECT, 0x00, 0x00, 0x02, id0, id1]);
        Self { apdu, file }
    }

    /// Identifier of the file to select
    pub const fn file(&self) -> FileId {
        self.file
    }
}

impl ApduCommand for SelectFile {
    fn apdu(&self) -> &CommandApdu {
        &self.apdu
    }
}

impl ResponseInterpreter for SelectFile {
    fn interpret_specific(
        &self,
        response: &ResponseApdu,
    ) -> Result<Interpretation, TransmissionError> {
        let sw2 = response.sw2();
        match response.sw1() {
            0x62 => {
                let warning = match sw2 {
                    0x83 => "Selected file invalidated".to_string(),
                    0x84 => "FCI not formatted according to specification".to_string(),
                    _ => unknown_sw2(sw2),
                };
                Ok(Interpretation::Warning(warning))
            }
            0x6A => {
                let error = match sw2 {
                    0x81 => "Function not supported".to_string(),
                    0x82 => "File not found".to_string(),
                    0x86 => "Incorrect parameters P1-P2".to_string(),
                    0x87 => "Lc inconsistent with P1-P2".to_string(),
                    _ => unknown_sw2(sw2),
                };
                Err(TransmissionError::new(error, response.clone()))
            }
            _ => Err(TransmissionError::new(
                "Unknown response code",
                response.clone(),
            )),
        }
    }
}

fn unknown_sw2(sw2: u8) -> String {
    format!("Unknown status word 2 [{sw2:02X}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MASTER_FILE;

    fn response(bytes: &[u8]) -> ResponseApdu {
        ResponseApdu::new(bytes).unwrap()
    }

    #[test]
    fn test_select_file_layout() {
        let select = SelectFile::new(0x01, MASTER_FILE);
        assert_eq!(
            select.apdu().as_slice(),
            &[0x01, 0xA4, 0x00, 0x00, 0x02, 0x3F, 0x00]
        );
        assert_eq!(select.apdu().capacity(), 7);
        assert_eq!(select.file(), MASTER_FILE);

        let select = SelectFile::new(0x00, FileId::new([0x2F, 0x01]));
        assert_eq!(select.apdu().to_string(), "00A40000022F01");
    }

    #[test]
    fn test_generic_tables_take_precedence() {
        let select = SelectFile::new(0x00, MASTER_FILE);

        let result = select.interpret(&response(&[0x90, 0x00])).unwrap();
        assert_eq!(result, Interpretation::Success("9000".to_string()));

        let err = select.interpret(&response(&[0x6A, 0x82])).unwrap_err();
        assert_eq!(err.to_string(), "6A82: File not found");

        let err = select.interpret(&response(&[0x69, 0x82])).unwrap_err();
        assert_eq!(err.message(), "Security status not satisfied");
    }

    #[test]
    fn test_unmapped_warning_falls_back() {
        let select = SelectFile::new(0x00, MASTER_FILE);
        let result = select.interpret(&response(&[0x62, 0x85])).unwrap();
        assert_eq!(
            result,
            Interpretation::Warning("Unknown status word 2 [85]".to_string())
        );
    }

    #[test]
    fn test_unmapped_error_falls_back() {
        let select = SelectFile::new(0x00, MASTER_FILE);
        let err = select.interpret(&response(&[0x6A, 0x8A])).unwrap_err();
        assert_eq!(err.message(), "Unknown status word 2 [8A]");
        assert_eq!(err.response().sw(), 0x6A8A);
    }

    #[test]
    fn test_unknown_response_code() {
        let select = SelectFile::new(0x00, MASTER_FILE);
        for status in [[0x64, 0x00], [0x63, 0x01], [0x93, 0x00]] {
            let err = select.interpret(&response(&status)).unwrap_err();
            assert_eq!(err.message(), "Unknown response code");
        }
    }

    #[test]
    fn test_specific_table_directly() {
        let select = SelectFile::new(0x00, MASTER_FILE);
        let result = select.interpret_specific(&response(&[0x62, 0x84])).unwrap();
        assert_eq!(
            result.message(),
            "FCI not formatted according to specification"
        );
        let err = select
            .interpret_specific(&response(&[0x6A, 0x87]))
            .unwrap_err();
        assert_eq!(err.message(), "Lc inconsistent with P1-P2");
    }
}
