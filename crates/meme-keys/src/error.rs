//! Key binding error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Unknown key action: {0}")]
    UnknownAction(String),

    #[error("Unknown key name: {0}")]
    UnknownKey(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Invalid chord: {0:?}")]
    InvalidChord(String),
}
