//! Meme Navigation
//!
//! Address bar input routing:
//!   1. `/term` → find text in page
//!   2. `!command` → administrative command
//!   3. `about:bookmarks` → show the bookmarks file
//!   4. text with spaces, or without a dot → search
//!   5. anything else → navigate
//!
//! Supported commands:
//! - `!plugins on|off`: toggle plugins and reload
//! - `!bookmark <uri>`: add a bookmark

mod command;
mod completion;
mod error;
mod input;

pub use command::Command;
pub use completion::{complete, matches_completion};
pub use error::NavigationError;
pub use input::{encode_search_term, InputResolution, InputResolver, DEFAULT_SEARCH_TEMPLATE};

pub type Result<T> = std::result::Result<T, NavigationError>;
