//! Listing terminals, cards and channels

use cardshell_apdu_core::{CardShell, Result};
use tracing::debug;

use super::{Reply, ShowTarget};

/// List the requested entities, sorted by name
pub fn show_command(shell: &CardShell, target: ShowTarget) -> Result<Reply> {
    let (names, empty): (Vec<String>, _) = match target {
        ShowTarget::Terminals => (
            shell.terminals().iter().map(|t| t.name().to_string()).collect(),
            "No card terminal available",
        ),
        ShowTarget::Cards => (
            shell.cards()?.iter().map(|c| c.name().to_string()).collect(),
            "No card available",
        ),
        ShowTarget::Channels => (
            shell.channels()?.iter().map(|c| c.name().to_string()).collect(),
            "No open card channels available",
        ),
    };
    debug!(?target, count = names.len(), "Listing entities");

    Ok(Reply::Message(listing(names, empty)))
}

fn listing(mut names: Vec<String>, empty: &str) -> String {
    if names.is_empty() {
        return empty.to_string();
    }
    names.sort();
    names.join("\n")
}
