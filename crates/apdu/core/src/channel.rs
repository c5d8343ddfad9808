//! Logical channels on a card

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::command::{ApduCommand, CommandApdu, SelectFile, Transmit};
use crate::error::Result;
use crate::file::FileId;
use crate::response::ResponseApdu;
use crate::response::interpreter::Interpretation;
use crate::transport::ChannelTransport;

/// A logical communication path on a card
///
/// Name and number are fixed at creation. The selected file only changes
/// through [`Channel::select_card_file`] calls the card accepted, with or
/// without a warning.
pub struct Channel {
    /// Human readable name, `Channel-<n>`
    name: String,
    /// Logical channel number
    number: u8,
    /// Transport bound to this channel
    transport: Box<dyn ChannelTransport>,
    /// Currently selected file, if any
    selected_file: RwLock<Option<FileId>>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("number", &self.number)
            .field("selected_file", &*self.selected_file.read())
            .finish()
    }
}

impl Channel {
    /// Create a channel on top of a channel transport
    pub fn new(transport: Box<dyn ChannelTransport>) -> Self {
        let number = transport.number();
        Self {
            name: format!("Channel-{number}"),
            number,
            transport,
            selected_file: RwLock::new(None),
        }
    }

    /// Human readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical channel number
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// The file currently selected within this channel
    pub fn selected_file(&self) -> Option<FileId> {
        *self.selected_file.read()
    }

    /// Send a command and return the uninterpreted response
    pub fn transmit(&self, command: &CommandApdu) -> Result<ResponseApdu> {
        let bytes = self.transport.transmit_raw(command.as_slice())?;
        ResponseApdu::new(&bytes)
    }

    /// Send a command and interpret the response with the command's own rules
    pub fn execute<C: ApduCommand + ?Sized>(&self, command: &C) -> Result<Interpretation> {
        let response = self.transmit(command.apdu())?;
        Ok(command.interpret(&response)?)
    }

    /// Select a file by identifier
    ///
    /// Returns the warning text if the card accepted the selection with a
    /// warning, `None` on a clean success. On failure the previously selected
    /// file stays selected.
    #[instrument(level = "debug", skip(self), fields(channel = %self.name))]
    pub fn select_card_file(&self, file: FileId) -> Result<Option<String>> {
        let command = SelectFile::new(self.number, file);
        let outcome = self.execute(&command)?;

        *self.selected_file.write() = Some(file);
        info!(channel = %self.name, file = %file, "Selected file");

        Ok(outcome.into_warning())
    }

    /// Send an APDU given as hex and interpret the response
    ///
    /// A clean success carries the status word as its message, a warning its
    /// text. Error status words are raised as transmission failures.
    pub fn transmit_hex(&self, apdu: &str) -> Result<Interpretation> {
        let command = Transmit::from_hex(apdu)?;
        debug!(channel = %self.name, command = %command.apdu(), "Transmitting APDU");
        self.execute(&command)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
