//! Display utilities for the shell

use colored::Colorize;

/// Shown once when the shell starts
pub const BANNER: &str = r"
    ___              _   __ _          _ _
   / __\__ _ _ __ __| | / _\ |__   ___| | |
  / /  / _` | '__/ _` | \ \| '_ \ / _ \ | |
 / /__| (_| | | | (_| | _\ \ | | |  __/ | |
 \____/\__,_|_|  \__,_| \__/_| |_|\___|_|_|
 __________________________________________
";

/// Welcome line printed below the banner
pub const WELCOME: &str = "Welcome to the Card Shell. For assistance type \"help\".";

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("{}", message.yellow().bold())
}

/// Format a failure message
pub fn failure(message: &str) -> String {
    format!("{}", message.red())
}
