//! Meme Storage Layer
//!
//! Flat-file persistence shared with other processes:
//! - a sorted, duplicate-free bookmarks file
//! - a text cookie jar, written under an exclusive advisory lock
//!
//! Rewrites go through a temporary file and a rename, so readers in other
//! processes never see a half-written file.

mod bookmarks;
mod cookies;
mod error;
mod replace;

pub use bookmarks::BookmarkFile;
pub use cookies::{Cookie, CookieJar};
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
