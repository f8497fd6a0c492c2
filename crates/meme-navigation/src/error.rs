//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid search template (expected exactly one %s): {0}")]
    InvalidTemplate(String),
}
