//! Selection context of an interactive card session
//!
//! [`CardShell`] remembers the terminal, card and channel the operator is working
//! with. The three selections are independent: replacing one never clears the
//! others, even when they no longer belong together.

use std::sync::Arc;

use tracing::{info, warn};

use crate::card::Card;
use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::file::FileId;
use crate::response::interpreter::Interpretation;
use crate::terminal::Terminal;
use crate::transport::TerminalRegistry;

/// Current terminal, card and channel of a session
#[derive(Debug)]
pub struct CardShell {
    registry: Box<dyn TerminalRegistry>,
    terminal: Option<Arc<Terminal>>,
    card: Option<Arc<Card>>,
    channel: Option<Arc<Channel>>,
}

impl CardShell {
    /// Create a session with nothing selected
    pub fn new(registry: Box<dyn TerminalRegistry>) -> Self {
        Self {
            registry,
            terminal: None,
            card: None,
            channel: None,
        }
    }

    /// Terminals currently attached, sorted by name
    ///
    /// A failing registry is logged and reported as no terminals.
    pub fn terminals(&self) -> Vec<Arc<Terminal>> {
        let connectors = match self.registry.list_terminals() {
            Ok(connectors) => connectors,
            Err(e) => {
                warn!(error = %e, "Failed to list card terminals");
                return Vec::new();
            }
        };

        let mut terminals: Vec<_> = connectors
            .into_iter()
            .map(|connector| Arc::new(Terminal::new(connector)))
            .collect();
        terminals.sort_by(|a, b| a.name().cmp(b.name()));
        terminals
    }

    /// Cards in the selected terminal
    pub fn cards(&self) -> Result<Vec<Arc<Card>>> {
        self.require_terminal()?.cards()
    }

    /// Channels open on the selected card
    pub fn channels(&self) -> Result<Arc<Vec<Arc<Channel>>>> {
        Ok(self.require_card()?.channels())
    }

    /// Terminal with the given (normalised) name
    pub fn find_terminal(&self, name: &str) -> Option<Arc<Terminal>> {
        self.terminals().into_iter().find(|t| t.name() == name)
    }

    /// Card with the given name in the selected terminal
    pub fn find_card(&self, name: &str) -> Result<Option<Arc<Card>>> {
        Ok(self.cards()?.into_iter().find(|c| c.name() == name))
    }

    /// Open channel with the given name on the selected card
    pub fn find_channel(&self, name: &str) -> Result<Option<Arc<Channel>>> {
        Ok(self.channels()?.iter().find(|c| c.name() == name).cloned())
    }

    /// Replace the selected terminal, `None` unselects
    pub fn select_terminal(&mut self, terminal: Option<Arc<Terminal>>) {
        info!(terminal = ?terminal.as_ref().map(|t| t.name()), "Terminal selection changed");
        self.terminal = terminal;
    }

    /// Replace the selected card, `None` unselects
    pub fn select_card(&mut self, card: Option<Arc<Card>>) {
        info!(card = ?card.as_ref().map(|c| c.name()), "Card selection changed");
        self.card = card;
    }

    /// Replace the selected channel, `None` unselects
    pub fn select_channel(&mut self, channel: Option<Arc<Channel>>) {
        info!(channel = ?channel.as_ref().map(|c| c.name()), "Channel selection changed");
        self.channel = channel;
    }

    /// The selected terminal
    pub fn selected_terminal(&self) -> Option<&Arc<Terminal>> {
        self.terminal.as_ref()
    }

    /// The selected card
    pub fn selected_card(&self) -> Option<&Arc<Card>> {
        self.card.as_ref()
    }

    /// The selected channel
    pub fn selected_channel(&self) -> Option<&Arc<Channel>> {
        self.channel.as_ref()
    }

    /// The file selected in the selected channel
    pub fn selected_file(&self) -> Option<FileId> {
        self.channel.as_ref().and_then(|c| c.selected_file())
    }

    /// Select a file in the selected channel
    ///
    /// Returns the card's warning, if any.
    pub fn select_file(&self, file: FileId) -> Result<Option<String>> {
        self.require_channel()?.select_card_file(file)
    }

    /// Open a new channel on the selected card
    ///
    /// The channel is not selected automatically.
    pub fn open_channel(&self) -> Result<Arc<Channel>> {
        self.require_card()?.open_channel()
    }

    /// Send a hex APDU on the selected channel
    pub fn transmit(&self, apdu: &str) -> Result<Interpretation> {
        self.require_channel()?.transmit_hex(apdu)
    }

    fn require_terminal(&self) -> Result<&Arc<Terminal>> {
        self.terminal.as_ref().ok_or(Error::NotSelected("card terminal"))
    }

    fn require_card(&self) -> Result<&Arc<Card>> {
        self.card.as_ref().ok_or(Error::NotSelected("card"))
    }

    fn require_channel(&self) -> Result<&Arc<Channel>> {
        self.channel.as_ref().ok_or(Error::NotSelected("card channel"))
    }
}
