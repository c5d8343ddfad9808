//! PC/SC transport implementation for cardshell
//!
//! This crate implements the transport traits of `cardshell-apdu-core` on top of
//! the PC/SC API, so the selection context can drive real card readers.
//!
//! Logical channels beyond the basic channel are opened with MANAGE CHANNEL
//! (`00 70 00 00 01`). All channels of a card share one PC/SC card handle.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cardshell_apdu_core::CardShell;
//! use cardshell_apdu_core::file::MASTER_FILE;
//! use cardshell_transport_pcsc::PcscDeviceManager;
//!
//! let mut shell = CardShell::new(Box::new(PcscDeviceManager::new()?));
//!
//! let Some(terminal) = shell.terminals().into_iter().next() else {
//!     println!("No readers found");
//!     return Ok(());
//! };
//! let card = terminal.cards()?.into_iter().next();
//! shell.select_terminal(Some(terminal));
//! shell.select_card(card);
//!
//! let channel = shell.open_channel()?;
//! shell.select_channel(Some(channel));
//! shell.select_file(MASTER_FILE)?;
//! println!("{}", shell.transmit("00B0000000")?);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

// Core modules
mod config;
mod error;
mod manager;
mod reader;
mod terminal;
mod transport;

// Public exports
pub use config::{DEFAULT_RESPONSE_BUFFER_SIZE, PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use terminal::PcscTerminal;
pub use transport::{MANAGE_CHANNEL_OPEN, PcscCard, PcscChannel, parse_manage_channel};
