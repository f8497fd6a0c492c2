//! Command system for address bar
//!
//! - `!plugins on`: enable plugins, anything else disables them
//! - `!bookmark <text>`: append `<text>` to the bookmarks file

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Enable or disable plugins, then reload
    SetPlugins(bool),
    /// Append an entry to the bookmarks file
    AddBookmark(String),
}

impl Command {
    /// Parse a command string (must start with `!`).
    ///
    /// Returns `None` for input that is not a recognized command, including
    /// `!bookmark` without an alphanumeric argument.
    pub fn parse(input: &str) -> Option<Self> {
        let without_prefix = input.strip_prefix('!')?;
        let (name, arg) = match without_prefix.split_once(' ') {
            Some((name, arg)) => (name, Some(arg)),
            None => (without_prefix, None),
        };

        match name {
            "plugins" => Some(Command::SetPlugins(
                arg.map(str::trim_end).is_some_and(|v| v == "on"),
            )),
            "bookmark" => {
                let arg = arg?;
                if !arg.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
                    return None;
                }
                let entry = arg.lines().next().unwrap_or(arg).trim_end();
                Some(Command::AddBookmark(entry.to_string()))
            }
            _ => None,
        }
    }
}
