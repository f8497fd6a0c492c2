//! Process launcher

use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use crate::error::LaunchError;
use crate::request::DownloadRequest;
use crate::template::CommandTemplate;
use crate::Result;

pub struct Launcher {
    download_command: CommandTemplate,
    new_window_command: CommandTemplate,
    /// Passed to download tools so they share the browser's cookies
    cookie_file: Option<PathBuf>,
    user_agent: String,
    /// Children not yet reaped
    children: Vec<Child>,
}

impl Launcher {
    pub fn new(download_command: CommandTemplate, new_window_command: CommandTemplate) -> Self {
        Self {
            download_command,
            new_window_command,
            cookie_file: None,
            user_agent: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_cookie_file(mut self, cookie_file: Option<PathBuf>) -> Self {
        self.cookie_file = cookie_file;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Hand a download to the download command
    pub fn download(&mut self, request: &DownloadRequest) -> Result<u32> {
        let file = request.file_name();
        let dir = request.dir.to_string_lossy().to_string();
        let cookie_file = self
            .cookie_file
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "/dev/null".to_string());
        let referer = request.referer.clone().unwrap_or_default();

        let args = self.download_command.render(|name| match name {
            "uri" => Some(request.uri.as_str()),
            "file" => Some(file.as_str()),
            "dir" => Some(dir.as_str()),
            "referer" => Some(referer.as_str()),
            "cookie_file" => Some(cookie_file.as_str()),
            "user_agent" => Some(self.user_agent.as_str()),
            _ => None,
        })?;

        let pid = self.spawn(&args)?;
        tracing::info!(pid, uri = %request.uri, file = %file, "Started download");
        Ok(pid)
    }

    /// Open `uri` in a separate browser process
    pub fn open_window(&mut self, uri: &str) -> Result<u32> {
        let args = self
            .new_window_command
            .render(|name| (name == "uri").then_some(uri))?;

        let pid = self.spawn(&args)?;
        tracing::info!(pid, uri = %uri, "Opened new window");
        Ok(pid)
    }

    /// Start a detached child in its own process group
    pub fn spawn(&mut self, args: &[String]) -> Result<u32> {
        self.reap();

        let (program, rest) = args.split_first().ok_or(LaunchError::EmptyCommand)?;
        let child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;

        let pid = child.id();
        self.children.push(child);
        Ok(pid)
    }

    /// Collect exited children without blocking; returns how many were reaped
    pub fn reap(&mut self) -> usize {
        let before = self.children.len();
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(pid = child.id(), %status, "Child exited");
                false
            }
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(pid = child.id(), error = %e, "Failed to poll child");
                false
            }
        });
        before - self.children.len()
    }

    /// Children started and not yet reaped
    pub fn running(&self) -> usize {
        self.children.len()
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(
            CommandTemplate::default_download(),
            CommandTemplate::default_new_window(),
        )
    }
}
