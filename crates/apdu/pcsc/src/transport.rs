//! PC/SC card sessions and channels

use std::ffi::{CStr, CString};
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use cardshell_apdu_core::transport::{CardConnection, ChannelTransport, Protocol, TransportError};
use parking_lot::Mutex;
use pcsc::{Context, Protocols};
use tracing::{debug, trace, warn};

use crate::{config::PcscConfig, error::PcscError};

/// MANAGE CHANNEL asking the card to open the next free logical channel
pub const MANAGE_CHANNEL_OPEN: [u8; 5] = [0x00, 0x70, 0x00, 0x00, 0x01];

/// Map a negotiated protocol to the PC/SC protocol mask
pub(crate) const fn protocols_for(protocol: Protocol) -> Protocols {
    match protocol {
        Protocol::T0 => Protocols::T0,
        Protocol::T1 => Protocols::T1,
    }
}

/// Extract the channel number from a MANAGE CHANNEL open reply (`[n, 90, 00]`)
pub fn parse_manage_channel(reply: &[u8]) -> Result<u8, PcscError> {
    match reply {
        [number, 0x90, 0x00] if *number != 0 => Ok(*number),
        _ => Err(PcscError::ChannelRefused(reply.to_vec())),
    }
}

/// Decide whether a lost card session may be replaced by a fresh connection
///
/// Only a reset card is reconnected, and only with auto-reconnect enabled.
/// Otherwise the loss is reported again on every later transmit.
pub(crate) fn check_reconnect(lost: &PcscError, auto_reconnect: bool) -> Result<(), PcscError> {
    match lost {
        PcscError::CardReset if auto_reconnect => Ok(()),
        _ => Err(lost.clone()),
    }
}

fn open_session(
    context: &Context,
    reader: &CStr,
    protocol: Protocol,
    config: &PcscConfig,
) -> Result<pcsc::Card, PcscError> {
    context
        .connect(reader, config.share_mode.into(), protocols_for(protocol))
        .map_err(|e| PcscError::for_reader(e, &reader.to_string_lossy()))
}

/// Card handle shared by all channels of one session
struct CardHandle {
    /// PC/SC context
    context: Context,
    /// Reader name
    reader: CString,
    /// Protocol requested at connect time
    protocol: Protocol,
    /// Configuration
    config: PcscConfig,
    /// Card connection, or the reason it was lost
    card: Mutex<Result<pcsc::Card, PcscError>>,
}

impl fmt::Debug for CardHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardHandle")
            .field("reader", &self.reader)
            .field("protocol", &self.protocol)
            .field("has_card", &self.card.lock().is_ok())
            .field("config", &self.config)
            .finish()
    }
}

impl CardHandle {
    fn connect(
        context: Context,
        reader: CString,
        protocol: Protocol,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let card = open_session(&context, &reader, protocol, &config)?;
        Ok(Self {
            context,
            reader,
            protocol,
            config,
            card: Mutex::new(Ok(card)),
        })
    }

    fn connect_card(&self) -> Result<pcsc::Card, PcscError> {
        open_session(&self.context, &self.reader, self.protocol, &self.config)
    }

    fn reader_name(&self) -> String {
        self.reader.to_string_lossy().into_owned()
    }

    fn transmit_on(&self, card: &pcsc::Card, command: &[u8]) -> Result<Bytes, pcsc::Error> {
        let mut response_buffer = vec![0u8; self.config.response_buffer_size];
        card.transmit(command, &mut response_buffer)
            .map(Bytes::copy_from_slice)
    }

    /// Transmit a command to the card
    fn transmit(&self, command: &[u8]) -> Result<Bytes, PcscError> {
        let mut slot = self.card.lock();
        if let Err(lost) = slot.as_ref() {
            check_reconnect(lost, self.config.auto_reconnect)?;
            debug!(reader = %self.reader_name(), "Reconnecting to reset card");
            *slot = Ok(self.connect_card()?);
        }
        let card = match slot.as_ref() {
            Ok(card) => card,
            Err(lost) => return Err(lost.clone()),
        };

        match self.transmit_on(card, command) {
            Ok(response) => Ok(response),
            Err(e @ (pcsc::Error::ResetCard | pcsc::Error::RemovedCard)) => {
                let lost = if e == pcsc::Error::ResetCard {
                    PcscError::CardReset
                } else {
                    PcscError::CardRemoved
                };

                if check_reconnect(&lost, self.config.auto_reconnect).is_ok() {
                    debug!(reader = %self.reader_name(), "Card was reset, reconnecting");
                    if let Ok(card) = self.connect_card() {
                        let result = self.transmit_on(&card, command);
                        *slot = Ok(card);
                        return result.map_err(Into::into);
                    }
                }

                warn!(reader = %self.reader_name(), error = %e, "Lost card");
                *slot = Err(lost.clone());
                Err(lost)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Card session established through PC/SC
#[derive(Debug)]
pub struct PcscCard {
    handle: Arc<CardHandle>,
}

impl PcscCard {
    /// Connect to the card in `reader` with the given protocol
    pub(crate) fn connect(
        context: Context,
        reader: CString,
        protocol: Protocol,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let handle = CardHandle::connect(context, reader, protocol, config)?;
        debug!(reader = %handle.reader_name(), %protocol, "Connected to card");
        Ok(Self {
            handle: Arc::new(handle),
        })
    }

    fn channel(&self, number: u8) -> Box<dyn ChannelTransport> {
        Box::new(PcscChannel {
            number,
            handle: Arc::clone(&self.handle),
        })
    }
}

impl CardConnection for PcscCard {
    fn protocol(&self) -> Protocol {
        self.handle.protocol
    }

    fn basic_channel(&self) -> Result<Box<dyn ChannelTransport>, TransportError> {
        Ok(self.channel(0))
    }

    fn open_logical_channel(&self) -> Result<Box<dyn ChannelTransport>, TransportError> {
        let reply = self.handle.transmit(&MANAGE_CHANNEL_OPEN)?;
        trace!(reply = %hex::encode_upper(&reply), "MANAGE CHANNEL reply");
        let number = parse_manage_channel(&reply)?;
        debug!(number, "Opened logical channel");
        Ok(self.channel(number))
    }
}

/// One logical channel of a PC/SC card session
#[derive(Debug)]
pub struct PcscChannel {
    number: u8,
    handle: Arc<CardHandle>,
}

impl ChannelTransport for PcscChannel {
    fn number(&self) -> u8 {
        self.number
    }

    fn do_transmit_raw(&self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.handle.transmit(command).map_err(TransportError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_channel_reply() {
        assert_eq!(parse_manage_channel(&[0x01, 0x90, 0x00]).unwrap(), 1);
        assert_eq!(parse_manage_channel(&[0x13, 0x90, 0x00]).unwrap(), 0x13);

        let refused: [&[u8]; 5] = [
            &[0x68, 0x81],
            &[0x6A, 0x81],
            &[0x00, 0x90, 0x00],
            &[0x01, 0x62, 0x00],
            &[],
        ];
        for reply in refused {
            assert_eq!(
                parse_manage_channel(reply).unwrap_err(),
                PcscError::ChannelRefused(reply.to_vec())
            );
        }
    }

    #[test]
    fn test_refusal_means_exhausted() {
        let err: TransportError = parse_manage_channel(&[0x68, 0x81]).unwrap_err().into();
        assert_eq!(err, TransportError::ChannelsExhausted);
    }

    #[test]
    fn test_lost_session_stays_lost_without_auto_reconnect() {
        assert_eq!(check_reconnect(&PcscError::CardReset, false), Err(PcscError::CardReset));
        assert_eq!(
            check_reconnect(&PcscError::CardRemoved, false),
            Err(PcscError::CardRemoved)
        );

        let err: TransportError = check_reconnect(&PcscError::CardReset, false)
            .unwrap_err()
            .into();
        assert_eq!(err, TransportError::CardLost);
    }

    #[test]
    fn test_only_reset_card_reconnects() {
        assert_eq!(check_reconnect(&PcscError::CardReset, true), Ok(()));
        assert_eq!(
            check_reconnect(&PcscError::CardRemoved, true),
            Err(PcscError::CardRemoved)
        );
    }

    #[test]
    fn test_protocol_mask() {
        assert_eq!(protocols_for(Protocol::T0), Protocols::T0);
        assert_eq!(protocols_for(Protocol::T1), Protocols::T1);
        assert_eq!(MANAGE_CHANNEL_OPEN, [0x00, 0x70, 0x00, 0x00, 0x01]);
    }
}
