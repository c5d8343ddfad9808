//! Card terminals (readers)

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::card::Card;
use crate::error::{Error, Result};
use crate::transport::{Protocol, TerminalConnector};

/// Protocols tried when connecting, in order
const PROTOCOLS: [Protocol; 2] = [Protocol::T1, Protocol::T0];

/// A card terminal as seen by the shell
pub struct Terminal {
    name: String,
    connector: Box<dyn TerminalConnector>,
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("name", &self.name)
            .field("connector", &self.connector)
            .finish()
    }
}

impl Terminal {
    /// Wrap a transport connector
    ///
    /// Spaces in the driver's name are replaced by underscores so the name can
    /// be typed as a single shell argument.
    pub fn new(connector: Box<dyn TerminalConnector>) -> Self {
        Self {
            name: connector.name().replace(' ', "_"),
            connector,
        }
    }

    /// Name with spaces replaced by underscores
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as reported by the driver
    pub fn reader_name(&self) -> &str {
        self.connector.name()
    }

    /// Check whether a card is inserted
    pub fn is_card_present(&self) -> Result<bool> {
        self.connector.is_card_present().map_err(|e| {
            warn!(terminal = %self.name, error = %e, "Presence check failed");
            Error::TerminalUnavailable(self.name.clone())
        })
    }

    /// Connect to the inserted card
    ///
    /// Yields no card when the terminal is empty or neither T=1 nor T=0 could
    /// be negotiated. Each call creates a fresh connection.
    #[instrument(level = "debug", skip(self), fields(terminal = %self.name))]
    pub fn cards(&self) -> Result<Vec<Arc<Card>>> {
        if !self.is_card_present()? {
            debug!("No card present");
            return Ok(Vec::new());
        }

        for protocol in PROTOCOLS {
            match self.connector.connect(protocol) {
                Ok(connection) => return Ok(vec![Arc::new(Card::new(connection))]),
                Err(e) => debug!(%protocol, error = %e, "Connect failed"),
            }
        }

        Ok(Vec::new())
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCard, MockTerminal};

    #[test]
    fn test_name_normalisation() {
        let terminal = Terminal::new(Box::new(MockTerminal::empty("ACS ACR122U 00 00")));
        assert_eq!(terminal.name(), "ACS_ACR122U_00_00");
        assert_eq!(terminal.reader_name(), "ACS ACR122U 00 00");
    }

    #[test]
    fn test_empty_terminal_has_no_cards() {
        let mock = MockTerminal::empty("Reader");
        let terminal = Terminal::new(Box::new(mock.clone()));
        assert!(terminal.cards().unwrap().is_empty());
        assert!(mock.attempts().is_empty());
    }

    #[test]
    fn test_prefers_t1() {
        let mock = MockTerminal::with_inserted("Reader", MockCard::new(Protocol::T1));
        let terminal = Terminal::new(Box::new(mock.clone()));

        let cards = terminal.cards().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name(), "Card-T=1");
        assert_eq!(mock.attempts(), vec![Protocol::T1]);
    }

    #[test]
    fn test_falls_back_to_t0() {
        let mock = MockTerminal::with_inserted("Reader", MockCard::new(Protocol::T0))
            .accepting(&[Protocol::T0]);
        let terminal = Terminal::new(Box::new(mock.clone()));

        let cards = terminal.cards().unwrap();
        assert_eq!(cards[0].name(), "Card-T=0");
        assert_eq!(mock.attempts(), vec![Protocol::T1, Protocol::T0]);
    }

    #[test]
    fn test_no_protocol_yields_no_card() {
        let mock =
            MockTerminal::with_inserted("Reader", MockCard::new(Protocol::T1)).accepting(&[]);
        let terminal = Terminal::new(Box::new(mock));
        assert!(terminal.cards().unwrap().is_empty());
    }

    #[test]
    fn test_unplugged_terminal_is_state_failure() {
        let mock = MockTerminal::with_inserted("My Reader", MockCard::new(Protocol::T1));
        let terminal = Terminal::new(Box::new(mock.clone()));
        mock.unplug();

        let err = terminal.cards().unwrap_err();
        assert!(err.is_state());
        assert_eq!(err.to_string(), "Card terminal My_Reader no longer available");
    }
}
