//! Transport traits for reaching terminals, cards and channels
//!
//! The core never talks to hardware itself. A transport binding (PC/SC, a test
//! double, ...) implements the four traits below and the core drives them:
//!
//! - [`TerminalRegistry`] lists the terminals currently attached
//! - [`TerminalConnector`] checks card presence and connects with a protocol
//! - [`CardConnection`] hands out the basic channel and opens logical channels
//! - [`ChannelTransport`] moves raw APDU bytes over one channel

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Transmission protocol negotiated with a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Protocol {
    /// Character oriented half-duplex protocol
    #[display("T=0")]
    T0,
    /// Block oriented half-duplex protocol
    #[display("T=1")]
    T1,
}

/// Source of the terminals attached to the host
pub trait TerminalRegistry: fmt::Debug + Send + Sync {
    /// List the terminals currently available, in any order
    fn list_terminals(&self) -> Result<Vec<Box<dyn TerminalConnector>>, TransportError>;
}

/// A single card terminal (reader)
pub trait TerminalConnector: fmt::Debug + Send + Sync {
    /// Name reported by the driver
    fn name(&self) -> &str;

    /// Check whether a card is inserted
    fn is_card_present(&self) -> Result<bool, TransportError>;

    /// Connect to the inserted card using the given protocol
    fn connect(&self, protocol: Protocol) -> Result<Box<dyn CardConnection>, TransportError>;
}

/// An established card session
pub trait CardConnection: fmt::Debug + Send + Sync {
    /// Protocol in use for this session
    fn protocol(&self) -> Protocol;

    /// The always available basic channel (channel 0)
    fn basic_channel(&self) -> Result<Box<dyn ChannelTransport>, TransportError>;

    /// Ask the card for a new logical channel
    ///
    /// Returns [`TransportError::ChannelsExhausted`] when the card cannot allocate
    /// another one.
    fn open_logical_channel(&self) -> Result<Box<dyn ChannelTransport>, TransportError>;
}

/// Raw APDU transport bound to one logical channel
///
/// A transport is responsible for sending and receiving raw APDU bytes.
/// It has no knowledge of command structure or status word semantics.
pub trait ChannelTransport: fmt::Debug + Send + Sync {
    /// Logical channel number
    fn number(&self) -> u8;

    /// Send raw APDU bytes to the card and return the response bytes
    fn transmit_raw(&self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(
            channel = self.number(),
            command = %hex::encode_upper(command),
            "Transmitting raw command"
        );
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(
                    channel = self.number(),
                    response = %hex::encode_upper(response),
                    "Received raw response"
                );
            }
            Err(e) => {
                debug!(channel = self.number(), error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&self, command: &[u8]) -> Result<Bytes, TransportError>;
}
