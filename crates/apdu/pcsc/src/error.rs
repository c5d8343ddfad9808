//! Error types for PC/SC transport

use std::fmt;

use cardshell_apdu_core::transport::TransportError;

/// PC/SC-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    Pcsc(#[from] pcsc::Error),

    /// Reader not found
    ReaderNotFound(String),

    /// No card present in reader
    NoCard(String),

    /// Card was reset
    CardReset,

    /// Card was removed
    CardRemoved,

    /// MANAGE CHANNEL was refused, carries the raw reply
    ChannelRefused(Vec<u8>),
}

impl fmt::Display for PcscError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pcsc(e) => write!(f, "PC/SC error: {}", e),
            Self::ReaderNotFound(r) => write!(f, "Reader not found: {}", r),
            Self::NoCard(r) => write!(f, "No card present in reader: {}", r),
            Self::CardReset => write!(f, "Card was reset"),
            Self::CardRemoved => write!(f, "Card was removed"),
            Self::ChannelRefused(reply) => {
                write!(f, "MANAGE CHANNEL refused: {}", hex::encode_upper(reply))
            }
        }
    }
}

impl PcscError {
    /// Attach the reader name to errors that concern a specific reader
    pub(crate) fn for_reader(error: pcsc::Error, reader: &str) -> Self {
        match error {
            pcsc::Error::NoSmartcard => Self::NoCard(reader.to_string()),
            pcsc::Error::UnknownReader => Self::ReaderNotFound(reader.to_string()),
            e => Self::Pcsc(e),
        }
    }
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(pcsc::Error::NoSmartcard) | PcscError::NoCard(_) => Self::NoCard,
            PcscError::Pcsc(pcsc::Error::ResetCard | pcsc::Error::RemovedCard)
            | PcscError::CardReset
            | PcscError::CardRemoved => Self::CardLost,
            PcscError::Pcsc(
                e @ (pcsc::Error::UnknownReader
                | pcsc::Error::ReaderUnavailable
                | pcsc::Error::NoReadersAvailable),
            ) => Self::ReaderUnavailable(e.to_string()),
            PcscError::ReaderNotFound(reader) => Self::ReaderUnavailable(reader),
            PcscError::Pcsc(e @ pcsc::Error::ProtoMismatch) => Self::Protocol(e.to_string()),
            PcscError::ChannelRefused(_) => Self::ChannelsExhausted,
            PcscError::Pcsc(e) => Self::other(e.to_string()),
        }
    }
}
