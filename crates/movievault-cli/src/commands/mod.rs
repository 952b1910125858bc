pub mod config;
pub mod context;
pub mod login;
pub mod movies;
pub mod profile;
pub mod prompts;
pub mod search;

use crate::output::{Output, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Spinner on stderr; hidden for JSON output, quiet mode, or when not on a terminal
pub fn spinner(output: &Output, msg: &str) -> ProgressBar {
    if output.is_quiet() || output.format() != OutputFormat::Human || !is_interactive() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
