//! Headless front end: a console engine and window driven from stdin
//!
//! Each input line activates the address bar. `\ctrl+r` presses a chord and
//! `:` lines press toolbar buttons.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use meme_core::{Browser, Chord, Engine, FindOptions, Frame, PolicyDecision, Ui};
use url::Url;

/// Notifications the console engine queues for the browser
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A top-level load was requested and awaits the MIME policy
    Request(String),
    LoadCommitted,
    TitleChanged(Option<String>),
    ProgressChanged(f64),
    WindowObjectCleared(Frame),
}

/// Page engine without rendering: keeps history and settings, logs the rest
#[derive(Debug)]
pub struct ConsoleEngine {
    history: Vec<String>,
    position: usize,
    zoom: f64,
    view_source: bool,
    plugins: bool,
    user_agent: String,
    events: VecDeque<EngineEvent>,
}

impl ConsoleEngine {
    const ZOOM_STEP: f64 = 0.1;

    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            position: 0,
            zoom: 1.0,
            view_source: false,
            plugins: false,
            user_agent: String::new(),
            events: VecDeque::new(),
        }
    }

    pub fn next_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }

    /// Accept a requested load into history
    pub fn commit(&mut self, uri: &str) {
        if !self.history.is_empty() {
            self.history.truncate(self.position + 1);
        }
        self.history.push(uri.to_string());
        self.position = self.history.len() - 1;
        self.queue_load();
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom
    }

    pub fn plugins_enabled(&self) -> bool {
        self.plugins
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn queue_load(&mut self) {
        self.events.push_back(EngineEvent::ProgressChanged(0.0));
        self.events.push_back(EngineEvent::LoadCommitted);
        self.events
            .push_back(EngineEvent::WindowObjectCleared(Frame::Main));
        self.events.push_back(EngineEvent::TitleChanged(self.title()));
        self.events.push_back(EngineEvent::ProgressChanged(1.0));
    }
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for ConsoleEngine {
    fn load_uri(&mut self, uri: &str) {
        self.events.push_back(EngineEvent::Request(uri.to_string()));
    }

    fn current_uri(&self) -> Option<String> {
        self.history.get(self.position).cloned()
    }

    /// Host name of the current page, or the last path segment for local files
    fn title(&self) -> Option<String> {
        let url = Url::parse(self.history.get(self.position)?).ok()?;
        match url.host_str() {
            Some(host) => Some(host.to_string()),
            None => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(str::to_string),
        }
    }

    fn progress(&self) -> f64 {
        1.0
    }

    fn reload(&mut self) {
        if self.current_uri().is_some() {
            tracing::info!(uri = ?self.current_uri(), "Reload");
            self.queue_load();
        }
    }

    fn reload_bypass_cache(&mut self) {
        if self.current_uri().is_some() {
            tracing::info!(uri = ?self.current_uri(), "Reload bypassing cache");
            self.queue_load();
        }
    }

    fn go_back_or_forward(&mut self, steps: i32) {
        let target = self.position as i64 + i64::from(steps);
        if target < 0 || target >= self.history.len() as i64 {
            tracing::debug!(steps, "No history in that direction");
            return;
        }
        self.position = target as usize;
        self.queue_load();
    }

    fn can_go_back(&self) -> bool {
        self.position > 0
    }

    fn search_text(&mut self, text: &str, options: FindOptions) {
        tracing::info!(text = %text, case_sensitive = options.case_sensitive, "Find in page");
    }

    fn zoom_in(&mut self) {
        self.zoom += Self::ZOOM_STEP;
        tracing::info!(zoom = self.zoom, "Zoom");
    }

    fn zoom_out(&mut self) {
        self.zoom = (self.zoom - Self::ZOOM_STEP).max(Self::ZOOM_STEP);
        tracing::info!(zoom = self.zoom, "Zoom");
    }

    fn set_zoom_level(&mut self, level: f64) {
        self.zoom = level;
        tracing::info!(zoom = self.zoom, "Zoom");
    }

    fn view_source_mode(&self) -> bool {
        self.view_source
    }

    fn set_view_source_mode(&mut self, enabled: bool) {
        self.view_source = enabled;
    }

    fn run_script(&mut self, frame: Frame, script: &str) {
        tracing::info!(?frame, bytes = script.len(), "Run script");
    }

    fn print(&mut self) {
        tracing::info!(uri = ?self.current_uri(), "Print");
    }

    fn set_user_agent(&mut self, user_agent: &str) {
        self.user_agent = user_agent.to_string();
    }

    fn set_plugins_enabled(&mut self, enabled: bool) {
        self.plugins = enabled;
    }

    fn set_user_stylesheet(&mut self, uri: &str) {
        tracing::debug!(uri = %uri, "User style sheet");
    }

    fn can_show_mime_type(&self, mime_type: &str) -> bool {
        mime_type.starts_with("text/")
            || mime_type.starts_with("image/")
            || matches!(
                mime_type,
                "application/xhtml+xml" | "application/xml" | "application/json"
            )
    }
}

/// Guess a MIME type from the path extension
pub fn mime_type_for(uri: &str) -> &'static str {
    let path = Url::parse(uri)
        .map(|url| url.path().to_ascii_lowercase())
        .unwrap_or_default();
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

    match extension {
        "txt" => "text/plain",
        "css" => "text/css",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "iso" | "bin" | "exe" => "application/octet-stream",
        _ => "text/html",
    }
}

/// Window with a title and an address bar
#[derive(Debug, Default)]
pub struct ConsoleUi {
    title: String,
    entry: String,
    focused: bool,
    completions: Vec<String>,
    quit: bool,
}

impl ConsoleUi {
    pub fn new(width: u32, height: u32) -> Self {
        tracing::debug!(width, height, "Window created");
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn completions(&self) -> &[String] {
        &self.completions
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }
}

impl Ui for ConsoleUi {
    fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
            tracing::debug!(title = %title, "Title");
        }
    }

    fn entry_text(&self) -> String {
        self.entry.clone()
    }

    fn set_entry_text(&mut self, text: &str) {
        self.entry = text.to_string();
    }

    fn focus_entry(&mut self) {
        self.focused = true;
    }

    fn select_entry_from(&mut self, _start: usize) {}

    fn move_cursor_to_end(&mut self) {}

    fn set_completions(&mut self, entries: &[String]) {
        self.completions = entries.to_vec();
    }

    fn quit(&mut self) {
        self.quit = true;
    }
}

pub type ConsoleBrowser = Browser<ConsoleEngine, ConsoleUi>;

/// Feed queued engine notifications to the browser
pub fn pump(browser: &mut ConsoleBrowser) {
    while let Some(event) = browser.engine_mut().next_event() {
        match event {
            EngineEvent::Request(uri) => match browser.on_mime_type_policy(mime_type_for(&uri)) {
                PolicyDecision::Download => browser.on_download_requested(&uri, ""),
                PolicyDecision::Ignore => {}
                PolicyDecision::Default => {
                    if let Some(cookies) = browser.on_request_started(&uri) {
                        tracing::debug!(uri = %uri, cookies = %cookies, "Sending cookies");
                    }
                    browser.engine_mut().commit(&uri);
                }
            },
            EngineEvent::LoadCommitted => browser.on_load_committed(),
            EngineEvent::TitleChanged(title) => browser.on_title_changed(title),
            EngineEvent::ProgressChanged(progress) => browser.on_progress_changed(progress),
            EngineEvent::WindowObjectCleared(frame) => browser.on_window_object_cleared(frame),
        }
    }
}

/// Handle one input line; output for the user goes to `out`
pub fn handle_line<W: Write>(browser: &mut ConsoleBrowser, line: &str, out: &mut W) -> io::Result<()> {
    if let Some(chord) = line.strip_prefix('\\') {
        match chord.parse::<Chord>() {
            Ok(chord) => {
                if !browser.key_press(chord) {
                    writeln!(out, "unbound: {}", chord)?;
                }
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
    } else if let Some(command) = line.strip_prefix(':') {
        let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
        match name {
            "back" => browser.go_back(),
            "forward" => browser.go_forward(),
            "reload" => browser.reload(),
            "home" => browser.go_home(),
            "focus" => {
                browser.ui_mut().focus_entry();
                browser.on_entry_focus();
            }
            "complete" => {
                for entry in browser.completions(arg) {
                    writeln!(out, "{}", entry)?;
                }
            }
            "entry" => writeln!(out, "{}", browser.ui().entry_text())?,
            "enter" => {
                browser.activate_entry();
            }
            "quit" => browser.ui_mut().quit(),
            _ => writeln!(out, "unknown command: :{}", name)?,
        }
    } else {
        browser.ui_mut().set_entry_text(line);
        browser.activate_entry();
    }

    pump(browser);
    Ok(())
}

/// Read lines until `:quit`, toolbar back without history, or end of input
pub fn run<R: BufRead, W: Write>(browser: &mut ConsoleBrowser, input: R, out: &mut W) -> io::Result<()> {
    pump(browser);
    let mut title = String::new();

    for line in input.lines() {
        let line = line?;
        handle_line(browser, &line, out)?;

        if browser.ui().title() != title {
            title = browser.ui().title().to_string();
            writeln!(out, "{}", title)?;
        }
        if browser.ui().has_quit() {
            break;
        }
    }

    Ok(())
}
