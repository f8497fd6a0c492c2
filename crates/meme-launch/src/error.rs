//! Launch error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown placeholder {{{0}}} in command")]
    UnknownPlaceholder(String),
}
