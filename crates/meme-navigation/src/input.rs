//! Input resolution for address bar
//!
//! Rules are applied in order; the first one that applies wins:
//! 1. `/term` → find text
//! 2. `!command` → command (unknown commands are ignored)
//! 3. `about:bookmarks` → show bookmarks file
//! 4. no `localhost`, and a space or no dot → search
//! 5. otherwise → navigate, adding `http://` when no scheme is present

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::NavigationError;
use crate::Result;

pub const DEFAULT_SEARCH_TEMPLATE: &str = "http://duckduckgo.com/?q=%s";

const BOOKMARKS_PAGE: &str = "about:bookmarks";

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputResolution {
    /// Search the current page for a term
    FindText(String),
    /// Execute a command
    Command(Command),
    /// `!`-prefixed input that names no known command
    Ignored(String),
    /// Load the bookmarks file as a page
    ShowBookmarks,
    /// Navigate to a URI
    Navigate(String),
    /// Perform a search engine query
    Search { query: String, url: String },
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Result<Self> {
        let mut resolver = Self::new();
        resolver.set_search_engine(template)?;
        Ok(resolver)
    }

    pub fn set_search_engine(&mut self, template: String) -> Result<()> {
        if template.matches("%s").count() != 1 {
            return Err(NavigationError::InvalidTemplate(template));
        }
        self.search_template = template;
        Ok(())
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    /// Resolve user input into an action
    pub fn resolve(&self, input: &str) -> InputResolution {
        if let Some(term) = input.strip_prefix('/') {
            return InputResolution::FindText(term.to_string());
        }

        if input.starts_with('!') {
            return match Command::parse(input) {
                Some(command) => InputResolution::Command(command),
                None => {
                    tracing::debug!(input = %input, "Unrecognized command");
                    InputResolution::Ignored(input.to_string())
                }
            };
        }

        if input == BOOKMARKS_PAGE {
            return InputResolution::ShowBookmarks;
        }

        if Self::looks_like_search(input) {
            return InputResolution::Search {
                query: input.to_string(),
                url: self.build_search_url(input),
            };
        }

        if input.contains("://") {
            InputResolution::Navigate(input.to_string())
        } else {
            InputResolution::Navigate(format!("http://{}", input))
        }
    }

    /// Non-fqdn input becomes a search term, except anything on localhost
    fn looks_like_search(input: &str) -> bool {
        !input.contains("localhost") && (input.contains(' ') || !input.contains('.'))
    }

    /// Build search URL from query
    fn build_search_url(&self, query: &str) -> String {
        self.search_template
            .replacen("%s", &encode_search_term(query), 1)
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-encode every byte that is not ASCII alphanumeric, using lowercase hex.
pub fn encode_search_term(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() {
            result.push(byte as char);
        } else {
            result.push_str(&format!("%{:02x}", byte));
        }
    }
    result
}
