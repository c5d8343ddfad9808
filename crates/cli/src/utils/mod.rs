//! Utility functions and types for the shell

pub mod display;
pub mod session;

use cardshell_apdu_core::CardShell;
use cardshell_transport_pcsc::ShareMode;
use clap::ValueEnum;

/// PC/SC share mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShareModeArg {
    /// Exclusive access to the card
    Exclusive,
    /// Shared access to the card
    Shared,
    /// Direct connection to the reader
    Direct,
}

impl From<ShareModeArg> for ShareMode {
    fn from(mode: ShareModeArg) -> Self {
        match mode {
            ShareModeArg::Exclusive => Self::Exclusive,
            ShareModeArg::Shared => Self::Shared,
            ShareModeArg::Direct => Self::Direct,
        }
    }
}

/// Build the prompt from the current selections
///
/// Starts with `>` and appends ` <name> >` for the selected terminal, card,
/// channel and the file selected in that channel.
pub fn prompt(shell: &CardShell) -> String {
    let mut prompt = String::from(">");
    let mut push = |name: &str| {
        prompt.push(' ');
        prompt.push_str(name);
        prompt.push_str(" >");
    };

    if let Some(terminal) = shell.selected_terminal() {
        push(terminal.name());
    }
    if let Some(card) = shell.selected_card() {
        push(card.name());
    }
    if let Some(channel) = shell.selected_channel() {
        push(channel.name());
        if let Some(file) = channel.selected_file() {
            push(&file.to_string());
        }
    }
    prompt
}

/// Normalise a reader name the way terminal names are shown
pub fn terminal_name(reader: &str) -> String {
    reader.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardshell_apdu_core::file::MASTER_FILE;
    use cardshell_apdu_core::mock::{MockCard, MockRegistry, MockTerminal};
    use cardshell_apdu_core::transport::Protocol;

    #[test]
    fn test_prompt_follows_selection() {
        let mock = MockCard::new(Protocol::T1);
        let mut shell = CardShell::new(Box::new(MockRegistry::new(vec![
            MockTerminal::with_inserted("Reader 0", mock.clone()),
        ])));
        assert_eq!(prompt(&shell), ">");

        shell.select_terminal(shell.find_terminal("Reader_0"));
        assert_eq!(prompt(&shell), "> Reader_0 >");

        shell.select_card(shell.find_card("Card-T=1").unwrap());
        let channel = shell.open_channel().unwrap();
        shell.select_channel(Some(channel));
        assert_eq!(prompt(&shell), "> Reader_0 > Card-T=1 > Channel-0 >");

        mock.channel(0).unwrap().push_response([0x90, 0x00]);
        shell.select_file(MASTER_FILE).unwrap();
        assert_eq!(prompt(&shell), "> Reader_0 > Card-T=1 > Channel-0 > 3F00 >");
    }

    #[test]
    fn test_terminal_name() {
        assert_eq!(terminal_name("Gemalto PC Twin Reader 00 00"), "Gemalto_PC_Twin_Reader_00_00");
    }
}
