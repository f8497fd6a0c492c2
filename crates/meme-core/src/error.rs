//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] meme_navigation::NavigationError),

    #[error("Key binding error: {0}")]
    Keys(#[from] meme_keys::KeyError),

    #[error("Storage error: {0}")]
    Storage(#[from] meme_storage::StorageError),

    #[error("Launch error: {0}")]
    Launch(#[from] meme_launch::LaunchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}
