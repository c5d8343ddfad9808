//! Shell command lines and their handlers

use cardshell_apdu_core::{CardShell, FileId, Result};
use clap::{Parser, Subcommand};

mod channel;
mod select;
mod show;

pub use channel::*;
pub use select::*;
pub use show::*;

/// One line typed at the prompt
#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "Commands:\n{subcommands}"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

/// Commands available at the prompt
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Shows a list of entities
    Show {
        #[command(subcommand)]
        target: ShowTarget,
    },

    /// Selects a chosen entity
    Select {
        #[command(subcommand)]
        target: SelectTarget,
    },

    /// Opens a new entity
    Open {
        #[command(subcommand)]
        target: OpenTarget,
    },

    /// Transmits an APDU on the selected card channel
    Transmit {
        /// Command APDU in hex, spaces between digits allowed
        #[arg(required = true, num_args = 1..)]
        apdu: Vec<String>,
    },

    /// Leaves the shell
    #[command(alias = "quit")]
    Exit,
}

/// Entities `show` can list
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ShowTarget {
    /// Shows a list of card terminals
    Terminals,
    /// Shows a list of cards in the selected card terminal
    Cards,
    /// Shows a list of open channels on the selected card
    Channels,
}

/// Entities `select` can pick
#[derive(Debug, Subcommand)]
pub enum SelectTarget {
    /// Selects a card terminal
    Terminal {
        /// Terminal name as shown by `show terminals`
        name: String,
    },
    /// Selects a card from the selected card terminal
    Card {
        /// Card name as shown by `show cards`
        name: String,
    },
    /// Selects a card channel from the selected card
    Channel {
        /// Channel name as shown by `show channels`
        name: String,
    },
    /// Selects a file in the selected card channel
    File {
        /// Four hex digits or a well-known name (MF, ATR, ...)
        file: FileId,
    },
}

/// Entities `open` can create
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum OpenTarget {
    /// Opens a new channel on the selected card
    Channel,
}

/// Outcome of a handled command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print
    Silent,
    /// Plain output
    Message(String),
    /// The card accepted the command with a warning
    Warning(String),
    /// The operator asked to leave
    Exit,
}

/// Parse one prompt line into a command
pub fn parse_line(line: &str) -> Result<Commands, clap::Error> {
    ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
}

/// Run a parsed command against the session
pub fn execute(shell: &mut CardShell, command: Commands) -> Result<Reply> {
    match command {
        Commands::Show { target } => show_command(shell, target),
        Commands::Select { target } => select_command(shell, target),
        Commands::Open {
            target: OpenTarget::Channel,
        } => open_channel_command(shell),
        Commands::Transmit { apdu } => transmit_command(shell, &apdu.join(" ")),
        Commands::Exit => Ok(Reply::Exit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardshell_apdu_core::file::{ATR_FILE, MASTER_FILE};
    use cardshell_apdu_core::mock::{MockCard, MockRegistry, MockTerminal};
    use cardshell_apdu_core::transport::Protocol;
    use clap::error::ErrorKind;

    fn run(shell: &mut CardShell, line: &str) -> Result<Reply> {
        execute(shell, parse_line(line).unwrap())
    }

    fn message(text: &str) -> Reply {
        Reply::Message(text.to_string())
    }

    #[test]
    fn test_parse_lines() {
        assert!(matches!(
            parse_line("show terminals").unwrap(),
            Commands::Show {
                target: ShowTarget::Terminals
            }
        ));
        assert!(matches!(
            parse_line("select file MF").unwrap(),
            Commands::Select {
                target: SelectTarget::File { file }
            } if file == MASTER_FILE
        ));
        assert!(matches!(
            parse_line("select file 2f01").unwrap(),
            Commands::Select {
                target: SelectTarget::File { file }
            } if file == ATR_FILE
        ));
        assert!(matches!(parse_line("quit").unwrap(), Commands::Exit));

        let Commands::Transmit { apdu } = parse_line("transmit 00 A4 00 00").unwrap() else {
            panic!("expected transmit");
        };
        assert_eq!(apdu.join(" "), "00 A4 00 00");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_line("help").unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert!(parse_line("select file 3F").is_err());
        assert!(parse_line("show everything").is_err());
        assert!(parse_line("transmit").is_err());
    }

    #[test]
    fn test_session_flow() {
        let mock = MockCard::new(Protocol::T1);
        let mut shell = CardShell::new(Box::new(MockRegistry::new(vec![
            MockTerminal::with_inserted("Reader B", mock.clone()),
            MockTerminal::empty("Reader A"),
        ])));

        assert_eq!(run(&mut shell, "show terminals").unwrap(), message("Reader_A\nReader_B"));
        assert_eq!(
            run(&mut shell, "show cards").unwrap_err().to_string(),
            "No card terminal selected"
        );

        assert_eq!(run(&mut shell, "select terminal Reader_A").unwrap(), Reply::Silent);
        assert_eq!(run(&mut shell, "show cards").unwrap(), message("No card available"));

        run(&mut shell, "select terminal Reader_B").unwrap();
        assert_eq!(run(&mut shell, "show cards").unwrap(), message("Card-T=1"));
        run(&mut shell, "select card Card-T=1").unwrap();

        assert_eq!(
            run(&mut shell, "show channels").unwrap(),
            message("No open card channels available")
        );
        assert_eq!(run(&mut shell, "open channel").unwrap(), message("Opened Channel-0"));
        assert_eq!(run(&mut shell, "open channel").unwrap(), message("Opened Channel-1"));
        assert_eq!(
            run(&mut shell, "show channels").unwrap(),
            message("Channel-0\nChannel-1")
        );

        run(&mut shell, "select channel Channel-1").unwrap();
        let transport = mock.channel(1).unwrap();
        transport.push_response([0x62, 0x83]);
        transport.push_response([0xAB, 0x90, 0x00]);
        transport.push_response([0x63, 0xC2]);

        assert_eq!(
            run(&mut shell, "select file MF").unwrap(),
            Reply::Warning("Selected file invalidated".to_string())
        );
        assert_eq!(run(&mut shell, "transmit 00B0 0000 01").unwrap(), message("9000"));
        assert_eq!(
            run(&mut shell, "transmit 0020000000").unwrap(),
            Reply::Warning("Counter = 2".to_string())
        );
        assert_eq!(
            transport.commands(),
            vec![
                vec![0x01, 0xA4, 0x00, 0x00, 0x02, 0x3F, 0x00],
                vec![0x00, 0xB0, 0x00, 0x00, 0x01],
                vec![0x00, 0x20, 0x00, 0x00, 0x00]
            ]
        );

        assert_eq!(run(&mut shell, "exit").unwrap(), Reply::Exit);
    }

    #[test]
    fn test_unknown_names() {
        let mut shell = CardShell::new(Box::new(MockRegistry::new(vec![
            MockTerminal::empty("Reader"),
        ])));

        assert_eq!(
            run(&mut shell, "select terminal Nope").unwrap(),
            message("Card terminal Nope not found")
        );
        assert!(shell.selected_terminal().is_none());

        assert_eq!(
            run(&mut shell, "select channel Channel-0").unwrap_err().to_string(),
            "No card selected"
        );
        assert_eq!(
            run(&mut shell, "transmit 00A4000000").unwrap_err().to_string(),
            "No card channel selected"
        );
    }
}
