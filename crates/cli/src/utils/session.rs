//! Read-eval-print loop of the shell

use std::io::{self, BufRead, Write};

use cardshell_apdu_core::CardShell;
use clap::error::ErrorKind;
use tracing::debug;

use crate::commands::{self, Reply};
use crate::utils::{self, display};

/// Read lines from `input` until end of input or `exit`, writing replies to `output`
///
/// Command failures are printed and the session goes on.
pub fn run<R: BufRead, W: Write>(
    shell: &mut CardShell,
    input: R,
    mut output: W,
) -> io::Result<()> {
    write_prompt(shell, &mut output)?;

    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() && !handle_line(shell, &line, &mut output)? {
            return Ok(());
        }
        write_prompt(shell, &mut output)?;
    }

    writeln!(output)
}

/// Handle one line, returning `false` when the shell should stop
fn handle_line<W: Write>(shell: &mut CardShell, line: &str, output: &mut W) -> io::Result<bool> {
    let command = match commands::parse_line(line) {
        Ok(command) => command,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            write!(output, "{e}")?;
            return Ok(true);
        }
        Err(e) => {
            write!(output, "{}", display::failure(&e.to_string()))?;
            return Ok(true);
        }
    };

    match commands::execute(shell, command) {
        Ok(Reply::Exit) => return Ok(false),
        Ok(Reply::Silent) => {}
        Ok(Reply::Message(message)) => writeln!(output, "{message}")?,
        Ok(Reply::Warning(warning)) => writeln!(output, "{}", display::warning(&warning))?,
        Err(e) => {
            debug!(error = ?e, "Command failed");
            writeln!(output, "{}", display::failure(&e.to_string()))?;
        }
    }
    Ok(true)
}

fn write_prompt<W: Write>(shell: &CardShell, output: &mut W) -> io::Result<()> {
    write!(output, "{} ", utils::prompt(shell))?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardshell_apdu_core::mock::{MockCard, MockRegistry, MockTerminal};
    use cardshell_apdu_core::transport::Protocol;

    fn session(script: &str) -> (CardShell, String) {
        colored::control::set_override(false);

        let mut shell = CardShell::new(Box::new(MockRegistry::new(vec![
            MockTerminal::with_inserted("Reader", MockCard::new(Protocol::T1)),
        ])));
        let mut output = Vec::new();
        run(&mut shell, script.as_bytes(), &mut output).unwrap();
        (shell, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_failures_keep_session_alive() {
        let (shell, output) = session("open channel\nselect terminal Reader\nshow cards\n");

        assert!(output.contains("No card selected\n"));
        assert!(output.contains("> Reader > Card-T=1\n"));
        assert!(shell.selected_terminal().is_some());
    }

    #[test]
    fn test_exit_stops_reading() {
        let (shell, output) = session("exit\nselect terminal Reader\n");
        assert_eq!(output, "> ");
        assert!(shell.selected_terminal().is_none());
    }

    #[test]
    fn test_blank_lines_and_help() {
        let (_, output) = session("\n   \nhelp\n");
        assert!(output.starts_with("> > > "));
        assert!(output.contains("transmit"));
        assert!(output.ends_with("> \n"));
    }
}
