//! Changing the current selection

use cardshell_apdu_core::{CardShell, Result};

use super::{Reply, SelectTarget};
use crate::utils;

/// Select a terminal, card, channel or file by name
pub fn select_command(shell: &mut CardShell, target: SelectTarget) -> Result<Reply> {
    match target {
        SelectTarget::Terminal { name } => Ok(select_terminal_by_name(shell, &name)),
        SelectTarget::Card { name } => Ok(match shell.find_card(&name)? {
            Some(card) => {
                shell.select_card(Some(card));
                Reply::Silent
            }
            None => not_found("Card", &name),
        }),
        SelectTarget::Channel { name } => Ok(match shell.find_channel(&name)? {
            Some(channel) => {
                shell.select_channel(Some(channel));
                Reply::Silent
            }
            None => not_found("Card channel", &name),
        }),
        SelectTarget::File { file } => Ok(shell
            .select_file(file)?
            .map_or(Reply::Silent, Reply::Warning)),
    }
}

/// Select the terminal whose name matches `name`, spaces read as underscores
pub fn select_terminal_by_name(shell: &mut CardShell, name: &str) -> Reply {
    match shell.find_terminal(&utils::terminal_name(name)) {
        Some(terminal) => {
            shell.select_terminal(Some(terminal));
            Reply::Silent
        }
        None => not_found("Card terminal", name),
    }
}

fn not_found(kind: &str, name: &str) -> Reply {
    Reply::Message(format!("{kind} {name} not found"))
}
