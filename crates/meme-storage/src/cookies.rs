//! Text cookie jar shared between processes
//!
//! Netscape `cookies.txt` format, one cookie per line:
//!
//! ```text
//! domain <TAB> TRUE|FALSE <TAB> path <TAB> TRUE|FALSE <TAB> expires <TAB> name <TAB> value
//! ```
//!
//! Readers take no lock. Every read-modify-write holds `flock(LOCK_EX)` on
//! a sibling `<jar>.lock` file, so writers in other processes are
//! serialized, and replaces the jar with a rename, so readers never see a
//! partly written jar.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use nix::fcntl::{Flock, FlockArg};
use url::Url;

use crate::error::StorageError;
use crate::replace::replace_file;
use crate::Result;

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";
const HEADER: &str = "# HTTP Cookie File\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// A leading dot matches subdomains too
    pub domain: String,
    pub path: String,
    /// Unix seconds; `None` for a session cookie
    pub expires: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn domain_matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = self.domain.to_ascii_lowercase();
        match domain.strip_prefix('.') {
            Some(bare) => host == bare || host.ends_with(&domain),
            None => host == domain,
        }
    }

    pub fn path_matches(&self, path: &str) -> bool {
        if path == self.path {
            return true;
        }
        path.starts_with(&self.path)
            && (self.path.ends_with('/') || path[self.path.len()..].starts_with('/'))
    }

    /// Would this cookie be sent with a request to `url`?
    pub fn matches_url(&self, url: &Url, now: i64) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        !self.is_expired(now)
            && (!self.secure || url.scheme() == "https")
            && self.domain_matches(host)
            && self.path_matches(url.path())
    }

    /// Same name, domain and path: a newer cookie replaces an older one
    fn replaces(&self, other: &Cookie) -> bool {
        self.name == other.name
            && self.domain.eq_ignore_ascii_case(&other.domain)
            && self.path == other.path
    }

    fn parse_line(line: &str) -> Option<Cookie> {
        let (line, http_only) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
            Some(rest) => (rest, true),
            None if line.starts_with('#') => return None,
            None => (line, false),
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            return None;
        }

        let expires = match fields[4].parse::<i64>().ok()? {
            0 => None,
            expires => Some(expires),
        };

        Some(Cookie {
            domain: fields[0].to_string(),
            path: fields[2].to_string(),
            secure: fields[3].eq_ignore_ascii_case("TRUE"),
            expires,
            name: fields[5].to_string(),
            value: fields[6].to_string(),
            http_only,
        })
    }

    fn to_line(&self) -> String {
        let flag = |b: bool| if b { "TRUE" } else { "FALSE" };
        format!(
            "{}{}\t{}\t{}\t{}\t{}\t{}\t{}",
            if self.http_only { HTTP_ONLY_PREFIX } else { "" },
            self.domain,
            flag(self.domain.starts_with('.')),
            self.path,
            flag(self.secure),
            self.expires.unwrap_or(0),
            self.name,
            self.value,
        )
    }
}

#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
    /// Lifetime in seconds given to cookies that arrive without an expiry
    session_time: u64,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>, session_time: u64) -> Self {
        Self {
            path: path.into(),
            session_time,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Advisory lock file held by writers
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Read every cookie in the jar; a missing jar is empty
    pub fn load(&self) -> Result<Vec<Cookie>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(parse_jar(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Value for a `Cookie` request header, if any cookie applies to `url`
    pub fn cookie_header(&self, url: &Url) -> Result<Option<String>> {
        let now = Utc::now().timestamp();
        let mut cookies: Vec<Cookie> = self
            .load()?
            .into_iter()
            .filter(|cookie| cookie.matches_url(url, now))
            .collect();

        if cookies.is_empty() {
            return Ok(None);
        }

        // Most specific path first
        cookies.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        let header = cookies
            .iter()
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(Some(header))
    }

    /// Store a cookie from a response.
    ///
    /// A cookie without an expiry lives for the configured session time; if
    /// that is zero it is a session cookie and is not persisted. An already
    /// expired cookie deletes any stored cookie it replaces.
    pub fn add(&self, mut cookie: Cookie) -> Result<()> {
        let now = Utc::now().timestamp();
        if cookie.expires.is_none() && self.session_time > 0 {
            cookie.expires = Some(now.saturating_add(self.session_time as i64));
        }
        if cookie.expires.is_none() {
            tracing::debug!(name = %cookie.name, domain = %cookie.domain, "Skipping session cookie");
            return Ok(());
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| StorageError::Write {
                path: lock_path.clone(),
                source,
            })?;

        let lock = Flock::lock(lock_file, FlockArg::LockExclusive).map_err(|(_, source)| {
            StorageError::Lock {
                path: lock_path.clone(),
                source,
            }
        })?;

        let mut cookies = self.load()?;
        cookies.retain(|stored| !stored.is_expired(now) && !cookie.replaces(stored));
        if !cookie.is_expired(now) {
            tracing::debug!(name = %cookie.name, domain = %cookie.domain, "Storing cookie");
            cookies.push(cookie);
        }

        let mut out = String::from(HEADER);
        for cookie in &cookies {
            out.push_str(&cookie.to_line());
            out.push('\n');
        }

        replace_file(&self.path, &out).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;

        // Dropping the guard releases the lock
        drop(lock);
        Ok(())
    }
}

fn parse_jar(contents: &str) -> Vec<Cookie> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter_map(Cookie::parse_line)
        .collect()
}
