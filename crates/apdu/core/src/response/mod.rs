//! APDU response definitions
//!
//! This module provides the response APDU type, the status word tables and the
//! interpretation logic that turns status words into warnings or failures.

pub mod error;
pub mod interpreter;
pub mod status;

use std::fmt;

use bytes::Bytes;
use derive_more::Deref;
use tracing::trace;

use crate::buffer::ApduBuffer;
use crate::error::{Error, Result};
use status::StatusWord;

/// Response APDU as delivered by a card
///
/// The last two bytes are always the status word; a response shorter than that
/// cannot be constructed. The buffer is read-only once built, so the invariant
/// holds for the whole lifetime of the value.
#[derive(Clone, PartialEq, Eq, Hash, Deref)]
pub struct ResponseApdu(ApduBuffer);

impl ResponseApdu {
    /// Build a response from raw bytes, including the status word
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::InvalidResponse(bytes.len()));
        }
        let response = Self(ApduBuffer::from_bytes(bytes));

        trace!(
            sw1 = format_args!("{:#04x}", response.sw1()),
            sw2 = format_args!("{:#04x}", response.sw2()),
            payload_len = response.len() - 2,
            "Parsed APDU response"
        );

        Ok(response)
    }

    /// Copy of the data field, i.e. everything except the status word
    pub fn data(&self) -> Vec<u8> {
        self.payload().to_vec()
    }

    /// Borrowed data field
    pub fn payload(&self) -> &[u8] {
        &self.0.as_slice()[..self.len() - 2]
    }

    /// First status byte
    pub fn sw1(&self) -> u8 {
        self.0.as_slice()[self.len() - 2]
    }

    /// Second status byte
    pub fn sw2(&self) -> u8 {
        self.0.as_slice()[self.len() - 1]
    }

    /// Status word as a 16 bit value
    pub fn sw(&self) -> u16 {
        self.status().to_u16()
    }

    /// Status word
    pub fn status(&self) -> StatusWord {
        StatusWord::new(self.sw1(), self.sw2())
    }
}

impl TryFrom<&[u8]> for ResponseApdu {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        Self::new(data)
    }
}

impl TryFrom<Bytes> for ResponseApdu {
    type Error = Error;

    fn try_from(data: Bytes) -> Result<Self> {
        Self::new(&data)
    }
}

impl From<ResponseApdu> for Bytes {
    fn from(response: ResponseApdu) -> Self {
        response.to_bytes()
    }
}

impl fmt::Debug for ResponseApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseApdu")
            .field("data", &hex::encode_upper(self.payload()))
            .field("status", &self.status())
            .finish()
    }
}

impl fmt::Display for ResponseApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
