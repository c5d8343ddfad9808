//! PC/SC readers as card terminals

use std::ffi::CString;
use std::fmt;

use cardshell_apdu_core::transport::{
    CardConnection, Protocol, TerminalConnector, TransportError,
};
use pcsc::{Context, ReaderState, State};
use tracing::debug;

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscCard;

/// A PC/SC reader
pub struct PcscTerminal {
    /// PC/SC context
    context: Context,
    /// Reader name as given by the driver
    reader: CString,
    /// Lossy UTF-8 rendition of the reader name
    name: String,
    /// Configuration applied to card connections
    config: PcscConfig,
}

impl fmt::Debug for PcscTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTerminal")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTerminal {
    pub(crate) fn new(context: Context, reader: CString, config: PcscConfig) -> Self {
        let name = reader.to_string_lossy().into_owned();
        Self {
            context,
            reader,
            name,
            config,
        }
    }

    /// Query the current state of the reader
    pub fn status(&self) -> Result<PcscReader, PcscError> {
        let mut reader_states = [ReaderState::new(self.reader.as_c_str(), State::UNAWARE)];
        self.context
            .get_status_change(None, &mut reader_states)
            .map_err(|e| PcscError::for_reader(e, &self.name))?;
        Ok(PcscReader::from_reader_state(&reader_states[0]))
    }
}

impl TerminalConnector for PcscTerminal {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_card_present(&self) -> Result<bool, TransportError> {
        let reader = self.status().map_err(|e| match e {
            PcscError::Pcsc(_) => TransportError::ReaderUnavailable(self.name.clone()),
            other => other.into(),
        })?;
        debug!(
            reader = reader.name(),
            atr = ?reader.atr().map(hex::encode_upper),
            "Reader state"
        );
        Ok(reader.has_card())
    }

    fn connect(&self, protocol: Protocol) -> Result<Box<dyn CardConnection>, TransportError> {
        let card = PcscCard::connect(
            self.context.clone(),
            self.reader.clone(),
            protocol,
            self.config.clone(),
        )?;
        Ok(Box::new(card))
    }
}
