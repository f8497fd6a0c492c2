//! Download request data structure

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub uri: String,
    /// File name proposed by the engine; may be empty
    pub suggested_file_name: String,
    /// Page the download was started from
    pub referer: Option<String>,
    /// Directory to save into
    pub dir: PathBuf,
}

impl DownloadRequest {
    pub fn new(uri: String, suggested_file_name: String, dir: PathBuf) -> Self {
        Self {
            uri,
            suggested_file_name,
            referer: None,
            dir,
        }
    }

    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    /// A bare file name safe to join onto `dir`
    pub fn file_name(&self) -> String {
        let from_uri = self
            .uri
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or("");

        [self.suggested_file_name.as_str(), from_uri]
            .into_iter()
            .map(sanitize_file_name)
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| "download".to_string())
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("")
        .trim();

    if name == "." || name == ".." {
        String::new()
    } else {
        name.to_string()
    }
}
