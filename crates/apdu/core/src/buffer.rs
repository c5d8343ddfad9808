//! Fixed-capacity APDU byte buffer
//!
//! [`ApduBuffer`] is the storage shared by command and response APDUs. It owns a
//! byte array of fixed capacity and tracks a logical length inside it. Reads and
//! in-place writes are restricted to the logical range; growing the range is only
//! possible through [`ApduBuffer::append`], [`ApduBuffer::append_slice`] or
//! [`ApduBuffer::set_len`].

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::utils;

/// Mutable byte buffer holding one APDU
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApduBuffer {
    /// Backing storage; its length is the capacity of the buffer
    storage: Box<[u8]>,
    /// Logical length of the APDU currently in the buffer
    len: usize,
}

impl ApduBuffer {
    /// Create an empty buffer able to hold `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Create a buffer holding exactly `bytes`; capacity equals the input length
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            storage: bytes.into(),
            len: bytes.len(),
        }
    }

    /// Wrap existing storage whose first `len` bytes hold an APDU
    pub fn from_buffer(storage: Vec<u8>, len: usize) -> Result<Self> {
        if len > storage.len() {
            return Err(Error::BufferOverflow {
                requested: len,
                capacity: storage.len(),
            });
        }
        Ok(Self {
            storage: storage.into_boxed_slice(),
            len,
        })
    }

    /// Logical length of the buffered APDU
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical range is empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the backing storage
    pub const fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Append a single byte
    pub fn append(&mut self, byte: u8) -> Result<()> {
        self.ensure_room(1)?;
        self.storage[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a byte slice; the buffer is left untouched if it does not fit
    pub fn append_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        self.storage[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Byte at `index`, or `None` when `index` is outside the logical range
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    /// Overwrite the byte at `index`
    ///
    /// Writes outside the logical range are ignored; use [`Self::append`] to extend.
    pub fn set_byte(&mut self, index: usize, value: u8) {
        if index < self.len {
            self.storage[index] = value;
        }
    }

    /// Set the logical length
    ///
    /// Shrinking cuts the APDU off. Growing exposes whatever the storage holds past
    /// the old length; the caller is expected to fill it.
    pub fn set_len(&mut self, len: usize) -> Result<()> {
        if len > self.capacity() {
            return Err(Error::BufferOverflow {
                requested: len,
                capacity: self.capacity(),
            });
        }
        self.len = len;
        Ok(())
    }

    /// The logical range
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Copy of the logical range
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }

    /// Whole backing storage, for manipulations such as MAC calculation
    pub fn buffer(&self) -> &[u8] {
        &self.storage
    }

    /// Mutable access to the whole backing storage
    ///
    /// If such a manipulation changes the APDU length, [`Self::set_len`] has to be
    /// used afterwards.
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Hex dump of the logical range, rebuilt on every call
    pub fn to_hex_string(&self) -> String {
        utils::to_hex_string(self.as_slice())
    }

    fn ensure_room(&self, additional: usize) -> Result<()> {
        let requested = self.len + additional;
        if requested > self.capacity() {
            return Err(Error::BufferOverflow {
                requested,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ApduBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApduBuffer")
            .field("apdu", &self.to_hex_string())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl fmt::Display for ApduBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl AsRef<[u8]> for ApduBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
