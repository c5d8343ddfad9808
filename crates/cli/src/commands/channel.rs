//! Commands working on card channels

use cardshell_apdu_core::response::interpreter::Interpretation;
use cardshell_apdu_core::{CardShell, Result};
use tracing::info;

use super::Reply;

/// Open a new channel on the selected card
pub fn open_channel_command(shell: &CardShell) -> Result<Reply> {
    let channel = shell.open_channel()?;
    Ok(Reply::Message(format!("Opened {}", channel.name())))
}

/// Transmit a hex APDU on the selected channel and print the interpretation
pub fn transmit_command(shell: &CardShell, apdu: &str) -> Result<Reply> {
    info!(apdu, "Transmitting APDU");
    Ok(match shell.transmit(apdu)? {
        Interpretation::Success(status) => Reply::Message(status),
        Interpretation::Warning(warning) => Reply::Warning(warning),
    })
}
