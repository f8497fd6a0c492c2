//! Command templates
//!
//! A command is an argument vector. Each argument may contain `{name}`
//! placeholders which are replaced before the process starts; nothing is
//! interpreted by a shell.

use serde::{Deserialize, Serialize};

use crate::error::LaunchError;
use crate::Result;

pub const PLACEHOLDERS: &[&str] = &["uri", "file", "referer", "dir", "cookie_file", "user_agent"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTemplate(Vec<String>);

impl CommandTemplate {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    /// `xterm -e wget ...` into `{dir}/{file}`
    pub fn default_download() -> Self {
        Self::new([
            "xterm",
            "-e",
            "wget",
            "--load-cookies",
            "{cookie_file}",
            "--user-agent={user_agent}",
            "--referer={referer}",
            "-O",
            "{dir}/{file}",
            "{uri}",
        ])
    }

    /// Another browser process on `{uri}`
    pub fn default_new_window() -> Self {
        Self::new(["meme", "{uri}"])
    }

    pub fn args(&self) -> &[String] {
        &self.0
    }

    /// Check that the command is non-empty and only names known placeholders
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(LaunchError::EmptyCommand);
        }
        for arg in &self.0 {
            for name in placeholders(arg) {
                if !PLACEHOLDERS.contains(&name) {
                    return Err(LaunchError::UnknownPlaceholder(name.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Substitute placeholders; `lookup` returns the value for a name
    pub fn render<'a, F>(&self, lookup: F) -> Result<Vec<String>>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.validate()?;
        Ok(self.0.iter().map(|arg| substitute(arg, &lookup)).collect())
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single pass, so substituted values are never scanned again
fn substitute<'a, F>(arg: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                out.push_str(lookup(&after[..end]).unwrap_or(""));
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Names of `{name}` placeholders in an argument
fn placeholders(arg: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = arg;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            _ => rest = after,
        }
    }
    names
}
