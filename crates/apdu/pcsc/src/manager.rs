//! Device manager for PC/SC operations

use std::fmt;

use cardshell_apdu_core::transport::{TerminalConnector, TerminalRegistry, TransportError};
use pcsc::{Context, Scope};
use tracing::debug;

use crate::config::PcscConfig;
use crate::error::PcscError;
use crate::terminal::PcscTerminal;

/// Manager for PC/SC device operations
pub struct PcscDeviceManager {
    /// PC/SC context
    context: Context,
    /// Configuration handed to every terminal
    config: PcscConfig,
}

impl fmt::Debug for PcscDeviceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscDeviceManager")
            .field("config", &self.config)
            .finish()
    }
}

impl PcscDeviceManager {
    /// Create a new PC/SC device manager
    pub fn new() -> Result<Self, PcscError> {
        Self::with_config(PcscConfig::default())
    }

    /// Create a new PC/SC device manager with custom configuration
    pub fn with_config(config: PcscConfig) -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context, config })
    }

    /// Configuration applied to card connections
    pub const fn config(&self) -> &PcscConfig {
        &self.config
    }

    /// List all card readers
    pub fn terminals(&self) -> Result<Vec<PcscTerminal>, PcscError> {
        let readers = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(count = readers.len(), "Listed readers");

        Ok(readers
            .into_iter()
            .map(|reader| PcscTerminal::new(self.context.clone(), reader, self.config.clone()))
            .collect())
    }
}

impl TerminalRegistry for PcscDeviceManager {
    fn list_terminals(&self) -> Result<Vec<Box<dyn TerminalConnector>>, TransportError> {
        Ok(self
            .terminals()?
            .into_iter()
            .map(|t| Box::new(t) as Box<dyn TerminalConnector>)
            .collect())
    }
}
