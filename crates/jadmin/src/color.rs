use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Set the global color override from the CLI choice and environment
pub fn init(choice: ColorChoice) {
    let should_color = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        // NO_COLOR wins, otherwise color only when stdout is a terminal
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
    };

    colored::control::set_override(should_color);
}
