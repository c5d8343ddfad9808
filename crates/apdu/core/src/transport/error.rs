//! Error types specific to card transports

/// Transport error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection error
    #[error("Failed to connect to device")]
    Connection,

    /// Transmission error
    #[error("Failed to transmit data")]
    Transmission,

    /// No card in the reader
    #[error("No card present")]
    NoCard,

    /// Card was reset or removed during the operation
    #[error("Card was reset or removed")]
    CardLost,

    /// The reader is gone or cannot be queried
    #[error("Reader unavailable: {0}")]
    ReaderUnavailable(String),

    /// The card refuses to open another logical channel
    #[error("No more logical channels available")]
    ChannelsExhausted,

    /// The requested protocol could not be negotiated
    #[error("Protocol {0} not supported")]
    Protocol(String),

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a general other error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }
}
