//! Cards and their open channels

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::transport::{CardConnection, Protocol, TransportError};

/// A card reached through a terminal with a fixed protocol
///
/// Channels are only ever appended. The first channel opened is the basic
/// channel, every later one is a logical channel requested from the card.
pub struct Card {
    name: String,
    connection: Box<dyn CardConnection>,
    /// Copy-on-append snapshot so readers never block an open in progress
    channels: RwLock<Arc<Vec<Arc<Channel>>>>,
    /// Serialises channel opens
    open_lock: Mutex<()>,
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("name", &self.name)
            .field("channels", &self.channels.read().len())
            .finish()
    }
}

impl Card {
    /// Wrap an established connection
    pub fn new(connection: Box<dyn CardConnection>) -> Self {
        Self {
            name: format!("Card-{}", connection.protocol()),
            connection,
            channels: RwLock::new(Arc::new(Vec::new())),
            open_lock: Mutex::new(()),
        }
    }

    /// Human readable name, `Card-<protocol>`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Protocol of the underlying session
    pub fn protocol(&self) -> Protocol {
        self.connection.protocol()
    }

    /// Channels opened so far, in opening order
    pub fn channels(&self) -> Arc<Vec<Arc<Channel>>> {
        Arc::clone(&self.channels.read())
    }

    /// Open the next channel on the card
    ///
    /// The basic channel comes first, later calls request logical channels.
    /// Fails with a state error when the card has no channel left to give.
    #[instrument(level = "debug", skip(self), fields(card = %self.name))]
    pub fn open_channel(&self) -> Result<Arc<Channel>> {
        let _guard = self.open_lock.lock();

        let basic = self.channels.read().is_empty();
        let requested = if basic {
            debug!("Requesting basic channel");
            self.connection.basic_channel()
        } else {
            debug!("Requesting logical channel");
            self.connection.open_logical_channel()
        };
        let transport = requested.map_err(|e| match e {
            TransportError::ChannelsExhausted => {
                Error::ResourceExhausted(format!("Failed to open card channel: {e}"))
            }
            other => Error::from(other).with_context("Failed to open card channel"),
        })?;

        let channel = Arc::new(Channel::new(transport));
        let mut channels = self.channels.write();
        let mut next = Vec::clone(&channels);
        next.push(Arc::clone(&channel));
        *channels = Arc::new(next);

        info!(card = %self.name, channel = %channel.name(), "Opened card channel");
        Ok(channel)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
