//! Meme Launcher
//!
//! Downloads and new windows are handed to separate processes:
//! - downloads run a configurable command (an `xterm` running `wget` by default)
//! - new windows start another copy of the browser
//!
//! Children are detached into their own process group and reaped without
//! blocking.

mod error;
mod launcher;
mod request;
mod template;

pub use error::LaunchError;
pub use launcher::Launcher;
pub use request::DownloadRequest;
pub use template::CommandTemplate;

pub type Result<T> = std::result::Result<T, LaunchError>;
