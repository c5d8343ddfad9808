//! In-memory transport for tests
//!
//! Every mock is a cheap handle over shared state, so a test can keep a clone,
//! hand the other one to the code under test, and inspect what happened
//! afterwards.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::transport::{
    CardConnection, ChannelTransport, Protocol, TerminalConnector, TerminalRegistry,
    TransportError,
};

/// Scripted channel transport
#[derive(Debug, Clone)]
pub struct MockChannel {
    number: u8,
    state: Arc<Mutex<MockChannelState>>,
}

#[derive(Debug, Default)]
struct MockChannelState {
    responses: VecDeque<Bytes>,
    commands: Vec<Vec<u8>>,
    failure: Option<TransportError>,
}

impl MockChannel {
    /// Create a channel with no scripted responses
    pub fn new(number: u8) -> Self {
        Self {
            number,
            state: Arc::default(),
        }
    }

    /// Queue responses, returned one per transmission in order
    pub fn with_responses<I, B>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        for response in responses {
            self.push_response(response);
        }
        self
    }

    /// Make every transmission fail with `error`
    pub fn with_failure(self, error: TransportError) -> Self {
        self.state.lock().failure = Some(error);
        self
    }

    /// Queue one more response
    pub fn push_response<B: AsRef<[u8]>>(&self, response: B) {
        self.state
            .lock()
            .responses
            .push_back(Bytes::copy_from_slice(response.as_ref()));
    }

    /// Commands received so far
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.state.lock().commands.clone()
    }
}

impl ChannelTransport for MockChannel {
    fn number(&self) -> u8 {
        self.number
    }

    fn do_transmit_raw(&self, command: &[u8]) -> Result<Bytes, TransportError> {
        let mut state = self.state.lock();
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        state.commands.push(command.to_vec());
        state
            .responses
            .pop_front()
            .ok_or(TransportError::Transmission)
    }
}

/// Kind of channel a card was asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRequest {
    /// The basic channel 0
    Basic,
    /// A new logical channel
    Logical,
}

/// Scripted card connection
#[derive(Debug, Clone)]
pub struct MockCard {
    protocol: Protocol,
    state: Arc<Mutex<MockCardState>>,
}

#[derive(Debug)]
struct MockCardState {
    logical_channels: u8,
    requests: Vec<ChannelRequest>,
    channels: Vec<MockChannel>,
}

impl MockCard {
    /// Create a card supporting three logical channels besides the basic one
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            state: Arc::new(Mutex::new(MockCardState {
                logical_channels: 3,
                requests: Vec::new(),
                channels: Vec::new(),
            })),
        }
    }

    /// Limit the number of logical channels the card can open
    pub fn with_logical_channels(self, count: u8) -> Self {
        self.state.lock().logical_channels = count;
        self
    }

    /// Same card state, seen through a session with another protocol
    fn connected(&self, protocol: Protocol) -> Self {
        Self {
            protocol,
            state: Arc::clone(&self.state),
        }
    }

    /// Channel requests received so far
    pub fn requests(&self) -> Vec<ChannelRequest> {
        self.state.lock().requests.clone()
    }

    /// Handle to the `index`-th channel handed out, to script its responses
    pub fn channel(&self, index: usize) -> Option<MockChannel> {
        self.state.lock().channels.get(index).cloned()
    }
}

impl CardConnection for MockCard {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn basic_channel(&self) -> Result<Box<dyn ChannelTransport>, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(ChannelRequest::Basic);
        let channel = MockChannel::new(0);
        state.channels.push(channel.clone());
        Ok(Box::new(channel))
    }

    fn open_logical_channel(&self) -> Result<Box<dyn ChannelTransport>, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(ChannelRequest::Logical);
        let opened = state
            .requests
            .iter()
            .filter(|r| **r == ChannelRequest::Logical)
            .count();
        if opened > usize::from(state.logical_channels) {
            return Err(TransportError::ChannelsExhausted);
        }
        let channel = MockChannel::new(opened as u8);
        state.channels.push(channel.clone());
        Ok(Box::new(channel))
    }
}

/// Scripted card terminal
#[derive(Debug, Clone)]
pub struct MockTerminal {
    name: String,
    state: Arc<Mutex<MockTerminalState>>,
}

#[derive(Debug)]
struct MockTerminalState {
    presence: Result<bool, TransportError>,
    protocols: Vec<Protocol>,
    attempts: Vec<Protocol>,
    card: MockCard,
}

impl MockTerminal {
    /// A terminal without a card
    pub fn empty(name: &str) -> Self {
        Self::with_card(name, MockCard::new(Protocol::T1), false)
    }

    /// A terminal holding `card`, accepting T=0 and T=1
    pub fn with_inserted(name: &str, card: MockCard) -> Self {
        Self::with_card(name, card, true)
    }

    fn with_card(name: &str, card: MockCard, present: bool) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(MockTerminalState {
                presence: Ok(present),
                protocols: vec![Protocol::T1, Protocol::T0],
                attempts: Vec::new(),
                card,
            })),
        }
    }

    /// Restrict the protocols the inserted card negotiates
    pub fn accepting(self, protocols: &[Protocol]) -> Self {
        self.state.lock().protocols = protocols.to_vec();
        self
    }

    /// Make presence queries fail, as if the reader was unplugged
    pub fn unplug(&self) {
        self.state.lock().presence = Err(TransportError::ReaderUnavailable(self.name.clone()));
    }

    /// Protocols tried by `connect`, in order
    pub fn attempts(&self) -> Vec<Protocol> {
        self.state.lock().attempts.clone()
    }
}

impl TerminalConnector for MockTerminal {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_card_present(&self) -> Result<bool, TransportError> {
        self.state.lock().presence.clone()
    }

    fn connect(&self, protocol: Protocol) -> Result<Box<dyn CardConnection>, TransportError> {
        let mut state = self.state.lock();
        state.attempts.push(protocol);
        if !matches!(state.presence, Ok(true)) {
            return Err(TransportError::NoCard);
        }
        if !state.protocols.contains(&protocol) {
            return Err(TransportError::Protocol(protocol.to_string()));
        }
        Ok(Box::new(state.card.connected(protocol)))
    }
}

/// Scripted terminal registry
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    terminals: Vec<MockTerminal>,
    failure: Option<TransportError>,
}

impl MockRegistry {
    /// Registry listing the given terminals
    pub fn new(terminals: Vec<MockTerminal>) -> Self {
        Self {
            terminals,
            failure: None,
        }
    }

    /// Registry whose listing always fails
    pub fn failing(error: TransportError) -> Self {
        Self {
            terminals: Vec::new(),
            failure: Some(error),
        }
    }
}

impl TerminalRegistry for MockRegistry {
    fn list_terminals(&self) -> Result<Vec<Box<dyn TerminalConnector>>, TransportError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self
            .terminals
            .iter()
            .cloned()
            .map(|t| Box::new(t) as Box<dyn TerminalConnector>)
            .collect())
    }
}
