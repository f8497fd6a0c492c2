//! Meme Core
//!
//! Central coordination layer for the Meme browser shell. The page engine
//! and the window toolkit are collaborators behind the [`Engine`] and [`Ui`]
//! traits; [`Browser`] routes address bar input and key chords to them and
//! owns the local files (bookmarks, cookies, scripts).

mod browser;
mod config;
mod engine;
mod error;
mod state;

pub use browser::Browser;
pub use config::{Config, KeyConfig, ScriptKeyConfig};
pub use engine::{Engine, FindOptions, Frame, NavigationReason, PolicyDecision, Ui};
pub use error::CoreError;
pub use state::UiState;

// Re-export core components
pub use meme_keys::{Chord, KeyAction, KeyCode, KeyError, KeyMap, Modifiers};
pub use meme_launch::{CommandTemplate, DownloadRequest, LaunchError, Launcher};
pub use meme_navigation::{Command, InputResolution, InputResolver, NavigationError};
pub use meme_storage::{BookmarkFile, Cookie, CookieJar, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging on stderr
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
