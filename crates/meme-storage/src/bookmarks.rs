//! Bookmarks file
//!
//! One URI per line, UTF-8, no header. Every insertion re-reads the whole
//! file and rewrites it sorted and de-duplicated, so entries added by other
//! processes are kept.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::StorageError;
use crate::replace::replace_file;
use crate::Result;

#[derive(Debug, Clone)]
pub struct BookmarkFile {
    path: PathBuf,
}

impl BookmarkFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `file://` URI of the bookmarks file, for viewing it as a page
    pub fn uri(&self) -> String {
        Url::from_file_path(&self.path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("file://{}", self.path.display()))
    }

    /// Read all bookmarks, sorted and without duplicates or blank lines.
    /// A missing file has no bookmarks.
    pub fn load(&self) -> Result<Vec<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Ok(Self::normalize(&contents).into_iter().collect())
    }

    /// Append an entry, then rewrite the file sorted and unique.
    ///
    /// Returns the bookmarks as persisted.
    pub fn add(&self, entry: &str) -> Result<Vec<String>> {
        let entry = entry.trim_end();
        if entry.is_empty() || entry.contains('\n') {
            return Err(StorageError::InvalidBookmark(entry.to_string()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                writeln!(file, "{}", entry)?;
                Ok(file)
            })
            .map_err(|source| self.write_error(source))?;
        file.flush().map_err(|source| self.write_error(source))?;
        drop(file);

        let bookmarks = self.load()?;
        self.rewrite(&bookmarks)?;

        tracing::info!(path = %self.path.display(), bookmark = %entry, "Added bookmark");

        Ok(bookmarks)
    }

    fn normalize(contents: &str) -> BTreeSet<String> {
        contents
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Replace the file (or the target of a symlink) with the sorted list
    fn rewrite(&self, bookmarks: &[String]) -> Result<()> {
        let mut contents = String::new();
        for bookmark in bookmarks {
            contents.push_str(bookmark);
            contents.push('\n');
        }

        replace_file(&self.path, &contents).map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
