//! Browser shell state container
//!
//! Owns the configuration, the key map, the local files and the spawned
//! children. The engine and the window are driven through [`Engine`] and
//! [`Ui`]; toolkit callbacks are forwarded to the `on_*` methods.

use std::path::{Path, PathBuf};

use meme_keys::{Binding, Chord, KeyAction, KeyMap};
use meme_launch::{DownloadRequest, Launcher};
use meme_navigation::{complete, Command, InputResolution, InputResolver};
use meme_storage::{BookmarkFile, Cookie, CookieJar};
use url::Url;

use crate::config::Config;
use crate::engine::{Engine, FindOptions, Frame, NavigationReason, PolicyDecision, Ui};
use crate::state::UiState;
use crate::Result;

const BOOKMARK_PREFIX: &str = "!bookmark ";

pub struct Browser<E: Engine, U: Ui> {
    config: Config,
    /// Address bar router
    resolver: InputResolver,
    keymap: KeyMap,
    bookmarks: Option<BookmarkFile>,
    /// Completion source, rebuilt from the bookmarks file
    bookmark_list: Vec<String>,
    cookies: Option<CookieJar>,
    launcher: Launcher,
    state: UiState,
    engine: E,
    ui: U,
}

impl<E: Engine, U: Ui> Browser<E, U> {
    /// Build a browser around an engine and a window.
    ///
    /// Fails if the configured key table or search template is invalid.
    pub fn new(config: Config, engine: E, ui: U) -> Result<Self> {
        let resolver = config.input_resolver()?;
        let keymap = config.keymap()?;
        let bookmarks = config.bookmark_file.as_ref().map(BookmarkFile::new);
        let cookies = config
            .cookie_file
            .as_ref()
            .map(|path| CookieJar::new(path, config.session_time));
        let launcher = config.launcher();
        let state = UiState::new(config.plugins);

        Ok(Self {
            config,
            resolver,
            keymap,
            bookmarks,
            bookmark_list: Vec::new(),
            cookies,
            launcher,
            state,
            engine,
            ui,
        })
    }

    /// Apply engine settings and load `initial`, or the home page
    pub fn open(&mut self, initial: Option<&str>) {
        self.engine.set_user_agent(&self.config.user_agent);
        self.engine.set_plugins_enabled(self.state.plugins());

        if let Some(style) = self.config.style_file.as_deref().filter(|p| p.exists()) {
            let uri = file_uri(style);
            tracing::debug!(uri = %uri, "Applying user style sheet");
            self.engine.set_user_stylesheet(&uri);
        }

        self.refresh_title();
        let uri = initial.unwrap_or(&self.config.homepage).to_string();
        tracing::info!(uri = %uri, "Opening");
        self.engine.load_uri(&uri);
    }

    /// The entry was activated (Enter)
    pub fn activate_entry(&mut self) -> InputResolution {
        let text = self.ui.entry_text();
        self.activate(&text)
    }

    /// Route address bar text and carry it out
    pub fn activate(&mut self, text: &str) -> InputResolution {
        let resolution = self.resolver.resolve(text);
        self.execute(&resolution);
        resolution
    }

    pub fn execute(&mut self, resolution: &InputResolution) {
        match resolution {
            InputResolution::FindText(text) => {
                self.engine.search_text(text, FindOptions::default());
            }
            InputResolution::Command(Command::SetPlugins(enabled)) => {
                tracing::info!(enabled, "Setting plugins");
                self.engine.set_plugins_enabled(*enabled);
                self.state.set_plugins(*enabled);
                self.reset_entry();
                self.engine.reload();
            }
            InputResolution::Command(Command::AddBookmark(entry)) => {
                self.add_bookmark(entry);
                self.reset_entry();
            }
            InputResolution::Ignored(text) => {
                tracing::debug!(input = %text, "Ignoring unknown command");
            }
            InputResolution::ShowBookmarks => match &self.bookmarks {
                Some(bookmarks) => {
                    let uri = bookmarks.uri();
                    self.engine.load_uri(&uri);
                }
                None => tracing::warn!("No bookmarks file configured"),
            },
            InputResolution::Navigate(uri) => self.engine.load_uri(uri),
            InputResolution::Search { query, url } => {
                tracing::debug!(query = %query, "Searching");
                self.engine.load_uri(url);
            }
        }
    }

    /// Dispatch a key press; returns whether a binding consumed it
    pub fn key_press(&mut self, chord: Chord) -> bool {
        match self.keymap.resolve(chord) {
            Some(Binding::Action(action)) => {
                self.run_action(action);
                true
            }
            Some(Binding::Script(script)) => {
                tracing::debug!(chord = %chord, "Running bound script");
                self.engine.run_script(Frame::Main, script);
                true
            }
            None => false,
        }
    }

    pub fn run_action(&mut self, action: KeyAction) {
        tracing::debug!(action = %action, "Key action");

        match action {
            KeyAction::GoHome => self.go_home(),
            KeyAction::GoBack => self.engine.go_back_or_forward(-1),
            KeyAction::GoForward => self.engine.go_back_or_forward(1),
            KeyAction::ZoomIn => self.engine.zoom_in(),
            KeyAction::ZoomOut => self.engine.zoom_out(),
            KeyAction::ZoomReset => self.engine.set_zoom_level(1.0),
            KeyAction::ToggleSource => {
                let enabled = !self.engine.view_source_mode();
                self.engine.set_view_source_mode(enabled);
                self.engine.reload();
            }
            KeyAction::ReloadNoCache => self.engine.reload_bypass_cache(),
            KeyAction::RunScriptFile => {
                let path = self.config.script_file.clone();
                self.run_script_file(path.as_deref(), Frame::Main);
            }
            KeyAction::FocusNavbar => {
                self.focus_entry();
                self.ui.select_entry_from(0);
            }
            KeyAction::NewWindow => {
                let uri = self.config.homepage.clone();
                self.open_window(&uri);
            }
            KeyAction::PrintPage => self.engine.print(),
            KeyAction::FindText => {
                self.focus_entry();
                self.ui.set_entry_text("/");
                self.ui.move_cursor_to_end();
            }
            KeyAction::BookmarkPage => {
                self.focus_entry();
                let text = format!("{}{}", BOOKMARK_PREFIX, self.ui.entry_text());
                self.ui.set_entry_text(&text);
                self.ui.select_entry_from(BOOKMARK_PREFIX.chars().count());
            }
        }
    }

    // Toolbar

    /// Back one step; with no history, leave the application
    pub fn go_back(&mut self) {
        if self.engine.can_go_back() {
            self.engine.go_back_or_forward(-1);
        } else {
            tracing::info!("No history, quitting");
            self.ui.quit();
        }
    }

    pub fn go_forward(&mut self) {
        self.engine.go_back_or_forward(1);
    }

    pub fn reload(&mut self) {
        self.engine.reload_bypass_cache();
    }

    pub fn go_home(&mut self) {
        let uri = self.config.homepage.clone();
        self.engine.load_uri(&uri);
    }

    // Engine notifications

    pub fn on_title_changed(&mut self, title: Option<String>) {
        self.state.set_title(title);
        self.refresh_title();
    }

    /// `progress` is a fraction in `0.0..=1.0`
    pub fn on_progress_changed(&mut self, progress: f64) {
        self.state.set_progress(progress * 100.0);
        self.refresh_title();
    }

    pub fn on_load_committed(&mut self) {
        self.state.set_title(self.engine.title());
        self.refresh_title();
        self.reset_entry();
        self.focus_entry();
        self.ui.select_entry_from(0);
    }

    /// Show a hovered link in the entry; `None` when the pointer leaves it
    pub fn on_link_hover(&mut self, link: Option<&str>) {
        match link {
            Some(link) => self.ui.set_entry_text(link),
            None => self.reset_entry(),
        }
    }

    pub fn on_entry_focus(&mut self) {
        self.refresh_bookmarks();
    }

    /// Bookmarks offered for the typed key
    pub fn completions(&self, key: &str) -> Vec<String> {
        complete(&self.bookmark_list, key)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn on_completion_selected(&mut self, entry: &str) -> InputResolution {
        self.ui.set_entry_text(entry);
        self.activate(entry)
    }

    /// A frame got a fresh window object; run the onload script in it
    pub fn on_window_object_cleared(&mut self, frame: Frame) {
        let path = self.config.onload_file.clone();
        self.run_script_file(path.as_deref(), frame);
    }

    pub fn on_download_requested(&mut self, uri: &str, suggested_file_name: &str) {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let request = DownloadRequest::new(uri.to_string(), suggested_file_name.to_string(), dir)
            .with_referer(self.engine.current_uri());

        if let Err(e) = self.launcher.download(&request) {
            tracing::error!(uri = %uri, error = %e, "Failed to start download");
        }
    }

    pub fn on_mime_type_policy(&mut self, mime_type: &str) -> PolicyDecision {
        if self.engine.can_show_mime_type(mime_type) {
            PolicyDecision::Default
        } else {
            tracing::debug!(mime_type = %mime_type, "Cannot show, downloading");
            PolicyDecision::Download
        }
    }

    /// Links that want a new window open in a separate process
    pub fn on_new_window_policy(&mut self, uri: &str, reason: NavigationReason) -> PolicyDecision {
        if reason == NavigationReason::LinkClicked {
            self.open_window(uri);
            PolicyDecision::Ignore
        } else {
            PolicyDecision::Default
        }
    }

    /// The page asked for a new web view; open the entry text in a new process
    pub fn on_create_web_view(&mut self) {
        let uri = self.ui.entry_text();
        self.open_window(&uri);
    }

    /// Value for the `Cookie` header of an outgoing request.
    ///
    /// The caller drops any `Cookie` header the engine set.
    pub fn on_request_started(&mut self, uri: &str) -> Option<String> {
        let jar = self.cookies.as_ref()?;
        let url = Url::parse(uri).ok()?;

        match jar.cookie_header(&url) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cookies");
                None
            }
        }
    }

    /// Cookies set by a response
    pub fn on_response_cookies(&mut self, cookies: Vec<Cookie>) {
        let Some(jar) = &self.cookies else {
            return;
        };

        for cookie in cookies {
            if let Err(e) = jar.add(cookie) {
                tracing::warn!(error = %e, "Failed to store cookie");
            }
        }
    }

    pub fn on_print_requested(&mut self) {
        self.engine.print();
    }

    /// Collect exited children; call before exit
    pub fn reap_children(&mut self) -> usize {
        self.launcher.reap()
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bookmarks(&self) -> &[String] {
        &self.bookmark_list
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    fn refresh_title(&mut self) {
        let title = self.state.window_title();
        self.ui.set_title(&title);
    }

    /// Put the current URI back in the entry
    fn reset_entry(&mut self) {
        let uri = self.engine.current_uri().unwrap_or_default();
        self.ui.set_entry_text(&uri);
    }

    fn focus_entry(&mut self) {
        self.ui.focus_entry();
        self.refresh_bookmarks();
    }

    fn refresh_bookmarks(&mut self) {
        let Some(bookmarks) = &self.bookmarks else {
            return;
        };

        match bookmarks.load() {
            Ok(list) => {
                self.bookmark_list = list;
                self.ui.set_completions(&self.bookmark_list);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to load bookmarks"),
        }
    }

    fn add_bookmark(&mut self, entry: &str) {
        let Some(bookmarks) = &self.bookmarks else {
            tracing::warn!("No bookmarks file configured");
            return;
        };

        match bookmarks.add(entry) {
            Ok(list) => {
                self.bookmark_list = list;
                self.ui.set_completions(&self.bookmark_list);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to add bookmark"),
        }
    }

    fn run_script_file(&mut self, path: Option<&Path>, frame: Frame) {
        let Some(path) = path else {
            return;
        };

        match std::fs::read_to_string(path) {
            Ok(script) => self.engine.run_script(frame, &script),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read script")
            }
        }
    }

    fn open_window(&mut self, uri: &str) {
        if let Err(e) = self.launcher.open_window(uri) {
            tracing::error!(uri = %uri, error = %e, "Failed to open window");
        }
    }
}

fn file_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("file://{}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meme_keys::{KeyCode, Modifiers};
    use meme_launch::CommandTemplate;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        LoadUri(String),
        Reload,
        ReloadBypassCache,
        GoBackOrForward(i32),
        SearchText(String, FindOptions),
        ZoomIn,
        ZoomOut,
        SetZoomLevel(f64),
        SetViewSourceMode(bool),
        RunScript(Frame, String),
        Print,
        SetUserAgent(String),
        SetPluginsEnabled(bool),
        SetUserStylesheet(String),
    }

    #[derive(Default)]
    struct FakeEngine {
        calls: Vec<Call>,
        uri: Option<String>,
        title: Option<String>,
        history: bool,
        view_source: bool,
    }

    impl Engine for FakeEngine {
        fn load_uri(&mut self, uri: &str) {
            self.uri = Some(uri.to_string());
            self.calls.push(Call::LoadUri(uri.to_string()));
        }

        fn current_uri(&self) -> Option<String> {
            self.uri.clone()
        }

        fn title(&self) -> Option<String> {
            self.title.clone()
        }

        fn progress(&self) -> f64 {
            1.0
        }

        fn reload(&mut self) {
            self.calls.push(Call::Reload);
        }

        fn reload_bypass_cache(&mut self) {
            self.calls.push(Call::ReloadBypassCache);
        }

        fn go_back_or_forward(&mut self, steps: i32) {
            self.calls.push(Call::GoBackOrForward(steps));
        }

        fn can_go_back(&self) -> bool {
            self.history
        }

        fn search_text(&mut self, text: &str, options: FindOptions) {
            self.calls.push(Call::SearchText(text.to_string(), options));
        }

        fn zoom_in(&mut self) {
            self.calls.push(Call::ZoomIn);
        }

        fn zoom_out(&mut self) {
            self.calls.push(Call::ZoomOut);
        }

        fn set_zoom_level(&mut self, level: f64) {
            self.calls.push(Call::SetZoomLevel(level));
        }

        fn view_source_mode(&self) -> bool {
            self.view_source
        }

        fn set_view_source_mode(&mut self, enabled: bool) {
            self.view_source = enabled;
            self.calls.push(Call::SetViewSourceMode(enabled));
        }

        fn run_script(&mut self, frame: Frame, script: &str) {
            self.calls.push(Call::RunScript(frame, script.to_string()));
        }

        fn print(&mut self) {
            self.calls.push(Call::Print);
        }

        fn set_user_agent(&mut self, user_agent: &str) {
            self.calls.push(Call::SetUserAgent(user_agent.to_string()));
        }

        fn set_plugins_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::SetPluginsEnabled(enabled));
        }

        fn set_user_stylesheet(&mut self, uri: &str) {
            self.calls.push(Call::SetUserStylesheet(uri.to_string()));
        }

        fn can_show_mime_type(&self, mime_type: &str) -> bool {
            mime_type.starts_with("text/") || mime_type.starts_with("image/")
        }
    }

    #[derive(Default)]
    struct FakeUi {
        title: String,
        entry: String,
        focused: usize,
        selection: Option<usize>,
        cursor_at_end: bool,
        completions: Vec<String>,
        quit: bool,
    }

    impl Ui for FakeUi {
        fn set_title(&mut self, title: &str) {
            self.title = title.to_string();
        }

        fn entry_text(&self) -> String {
            self.entry.clone()
        }

        fn set_entry_text(&mut self, text: &str) {
            self.entry = text.to_string();
            self.selection = None;
            self.cursor_at_end = false;
        }

        fn focus_entry(&mut self) {
            self.focused += 1;
        }

        fn select_entry_from(&mut self, start: usize) {
            self.selection = Some(start);
        }

        fn move_cursor_to_end(&mut self) {
            self.cursor_at_end = true;
        }

        fn set_completions(&mut self, entries: &[String]) {
            self.completions = entries.to_vec();
        }

        fn quit(&mut self) {
            self.quit = true;
        }
    }

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::new(dir.to_path_buf());
        config.homepage = "http://home.test/".to_string();
        config.download_command = CommandTemplate::new(["true", "{dir}/{file}"]);
        config.new_window_command = CommandTemplate::new(["true", "{uri}"]);
        config
    }

    fn browser(dir: &Path) -> Browser<FakeEngine, FakeUi> {
        Browser::new(test_config(dir), FakeEngine::default(), FakeUi::default()).unwrap()
    }

    fn ctrl(c: char) -> Chord {
        Chord::new(Modifiers::CONTROL, KeyCode::from_char(c))
    }

    #[test]
    fn test_open_applies_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();
        let mut browser = browser(dir.path());

        browser.open(None);

        let calls = &browser.engine().calls;
        assert!(calls.contains(&Call::SetPluginsEnabled(false)));
        assert!(calls.contains(&Call::SetUserAgent(browser.config().user_agent.clone())));
        assert!(calls.iter().any(|c| matches!(c, Call::SetUserStylesheet(uri) if uri.ends_with("/style.css"))));
        assert_eq!(calls.last(), Some(&Call::LoadUri("http://home.test/".to_string())));
        assert_eq!(browser.ui().title, "untitled (0%) - Meme");
    }

    #[test]
    fn test_open_initial_uri() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.open(Some("http://example.com/"));

        assert_eq!(
            browser.engine().calls.last(),
            Some(&Call::LoadUri("http://example.com/".to_string()))
        );
    }

    #[test]
    fn test_activate_navigates_and_searches() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.activate("example.com");
        browser.activate("how to boil eggs");

        assert_eq!(
            browser.engine().calls,
            vec![
                Call::LoadUri("http://example.com".to_string()),
                Call::LoadUri("http://duckduckgo.com/?q=how%20to%20boil%20eggs".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.activate("/needle");

        assert_eq!(
            browser.engine().calls,
            vec![Call::SearchText("needle".to_string(), FindOptions::default())]
        );
    }

    #[test]
    fn test_plugins_command_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());
        browser.engine_mut().uri = Some("http://page.test/".to_string());

        browser.activate("!plugins on");
        assert!(browser.state().plugins());
        assert_eq!(browser.ui().entry, "http://page.test/");

        browser.activate("!plugins online");
        assert!(!browser.state().plugins());

        assert_eq!(
            browser.engine().calls,
            vec![
                Call::SetPluginsEnabled(true),
                Call::Reload,
                Call::SetPluginsEnabled(false),
                Call::Reload,
            ]
        );
    }

    #[test]
    fn test_bookmark_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.activate("!bookmark http://b.test/");
        browser.activate("!bookmark http://a.test/");
        browser.activate("!bookmark http://b.test/");

        let expected = vec!["http://a.test/".to_string(), "http://b.test/".to_string()];
        assert_eq!(browser.bookmarks(), expected.as_slice());
        assert_eq!(browser.ui().completions, expected);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("bookmarks")).unwrap(),
            "http://a.test/\nhttp://b.test/\n"
        );
        assert!(browser.engine().calls.is_empty());
    }

    #[test]
    fn test_bookmark_needs_alphanumeric() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        let resolution = browser.activate("!bookmark  x");

        assert!(matches!(resolution, InputResolution::Ignored(_)));
        assert!(!dir.path().join("bookmarks").exists());
    }

    #[test]
    fn test_unknown_command_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());
        browser.ui_mut().entry = "!frobnicate".to_string();

        let resolution = browser.activate_entry();

        assert_eq!(resolution, InputResolution::Ignored("!frobnicate".to_string()));
        assert!(browser.engine().calls.is_empty());
        assert_eq!(browser.ui().entry, "!frobnicate");
    }

    #[test]
    fn test_show_bookmarks() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.activate("about:bookmarks");

        let expected = format!("file://{}", dir.path().join("bookmarks").display());
        assert_eq!(browser.engine().calls, vec![Call::LoadUri(expected)]);
    }

    #[test]
    fn test_reload_nocache_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        assert!(browser.key_press(ctrl('r')));
        assert_eq!(browser.engine().calls, vec![Call::ReloadBypassCache]);
    }

    #[test]
    fn test_key_press_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        let chord = Chord::new(
            Modifiers::CONTROL | Modifiers::MOD2,
            KeyCode::from_char('R'),
        );
        assert!(browser.key_press(chord));
        assert_eq!(browser.engine().calls, vec![Call::ReloadBypassCache]);
    }

    #[test]
    fn test_unbound_key_not_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        assert!(!browser.key_press(ctrl('q')));
        assert!(!browser.key_press(Chord::new(Modifiers::default(), KeyCode::from_char('r'))));
        assert!(browser.engine().calls.is_empty());
    }

    #[test]
    fn test_navigation_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.key_press("alt+Left".parse().unwrap());
        browser.key_press("alt+Right".parse().unwrap());
        browser.key_press("alt+Home".parse().unwrap());
        browser.key_press(ctrl('='));
        browser.key_press(ctrl('-'));
        browser.key_press(ctrl('0'));
        browser.key_press(ctrl('p'));

        assert_eq!(
            browser.engine().calls,
            vec![
                Call::GoBackOrForward(-1),
                Call::GoBackOrForward(1),
                Call::LoadUri("http://home.test/".to_string()),
                Call::ZoomIn,
                Call::ZoomOut,
                Call::SetZoomLevel(1.0),
                Call::Print,
            ]
        );
    }

    #[test]
    fn test_toggle_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.key_press(ctrl('s'));
        browser.key_press(ctrl('s'));

        assert_eq!(
            browser.engine().calls,
            vec![
                Call::SetViewSourceMode(true),
                Call::Reload,
                Call::SetViewSourceMode(false),
                Call::Reload,
            ]
        );
    }

    #[test]
    fn test_find_text_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.key_press(ctrl('f'));

        let ui = browser.ui();
        assert_eq!(ui.entry, "/");
        assert_eq!(ui.focused, 1);
        assert!(ui.cursor_at_end);
    }

    #[test]
    fn test_bookmark_page_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());
        browser.ui_mut().entry = "http://page.test/".to_string();

        browser.key_press(ctrl('b'));

        assert_eq!(browser.ui().entry, "!bookmark http://page.test/");
        assert_eq!(browser.ui().selection, Some(10));

        browser.activate_entry();
        assert_eq!(browser.bookmarks(), ["http://page.test/".to_string()]);
    }

    #[test]
    fn test_focus_navbar_reloads_bookmarks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bookmarks"), "b\na\n\na\n").unwrap();
        let mut browser = browser(dir.path());

        browser.key_press(ctrl('l'));

        assert_eq!(browser.ui().selection, Some(0));
        assert_eq!(browser.ui().completions, vec!["a", "b"]);
    }

    #[test]
    fn test_script_file_action() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("script.js"), "alert(1)").unwrap();
        let mut browser = browser(dir.path());

        browser.key_press(ctrl('j'));

        assert_eq!(
            browser.engine().calls,
            vec![Call::RunScript(Frame::Main, "alert(1)".to_string())]
        );
    }

    #[test]
    fn test_missing_script_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.key_press(ctrl('j'));
        browser.on_window_object_cleared(Frame::Child(3));

        assert!(browser.engine().calls.is_empty());
    }

    #[test]
    fn test_script_binding() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        assert!(browser.key_press(ctrl('n')));
        assert_eq!(
            browser.engine().calls,
            vec![Call::RunScript(Frame::Main, "window.meme.links()".to_string())]
        );
    }

    #[test]
    fn test_onload_script_runs_in_frame() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("onload.js"), "init()").unwrap();
        let mut browser = browser(dir.path());

        browser.on_window_object_cleared(Frame::Child(7));

        assert_eq!(
            browser.engine().calls,
            vec![Call::RunScript(Frame::Child(7), "init()".to_string())]
        );
    }

    #[test]
    fn test_toolbar_back_without_history_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.go_back();
        assert!(browser.ui().quit);
        assert!(browser.engine().calls.is_empty());

        browser.ui_mut().quit = false;
        browser.engine_mut().history = true;
        browser.go_back();
        assert!(!browser.ui().quit);
        assert_eq!(browser.engine().calls, vec![Call::GoBackOrForward(-1)]);
    }

    #[test]
    fn test_toolbar_reload_bypasses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.reload();
        browser.go_forward();
        browser.go_home();

        assert_eq!(
            browser.engine().calls,
            vec![
                Call::ReloadBypassCache,
                Call::GoBackOrForward(1),
                Call::LoadUri("http://home.test/".to_string()),
            ]
        );
    }

    #[test]
    fn test_title_and_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        browser.on_title_changed(Some("Rust".to_string()));
        browser.on_progress_changed(0.427);
        assert_eq!(browser.ui().title, "Rust (42%) - Meme");

        browser.on_progress_changed(1.0);
        assert_eq!(browser.ui().title, "Rust - Meme");
    }

    #[test]
    fn test_load_committed() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());
        browser.engine_mut().uri = Some("http://page.test/".to_string());
        browser.engine_mut().title = Some("Page".to_string());

        browser.on_load_committed();

        let ui = browser.ui();
        assert_eq!(ui.entry, "http://page.test/");
        assert_eq!(ui.selection, Some(0));
        assert_eq!(ui.focused, 1);
        assert_eq!(ui.title, "Page (0%) - Meme");
    }

    #[test]
    fn test_link_hover() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());
        browser.engine_mut().uri = Some("http://page.test/".to_string());

        browser.on_link_hover(Some("http://link.test/"));
        assert_eq!(browser.ui().entry, "http://link.test/");

        browser.on_link_hover(None);
        assert_eq!(browser.ui().entry, "http://page.test/");
    }

    #[test]
    fn test_completions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bookmarks"),
            "http://rust-lang.org/\nhttp://example.com/\n",
        )
        .unwrap();
        let mut browser = browser(dir.path());
        browser.on_entry_focus();

        assert_eq!(browser.completions("rust"), vec!["http://rust-lang.org/"]);
        assert_eq!(browser.completions("http").len(), 2);
        assert!(browser.completions("!plugins").is_empty());
        assert!(browser.completions("").is_empty());

        browser.on_completion_selected("http://example.com/");
        assert_eq!(browser.ui().entry, "http://example.com/");
        assert_eq!(
            browser.engine().calls,
            vec![Call::LoadUri("http://example.com/".to_string())]
        );
    }

    #[test]
    fn test_mime_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        assert_eq!(browser.on_mime_type_policy("text/html"), PolicyDecision::Default);
        assert_eq!(
            browser.on_mime_type_policy("application/zip"),
            PolicyDecision::Download
        );
    }

    #[test]
    fn test_new_window_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        assert_eq!(
            browser.on_new_window_policy("http://a.test/", NavigationReason::LinkClicked),
            PolicyDecision::Ignore
        );
        assert_eq!(
            browser.on_new_window_policy("http://a.test/", NavigationReason::Other),
            PolicyDecision::Default
        );
        assert!(browser.engine().calls.is_empty());
    }

    #[test]
    fn test_cookies_round_trip_through_jar() {
        let dir = tempfile::tempdir().unwrap();
        let mut browser = browser(dir.path());

        assert_eq!(browser.on_request_started("http://site.test/"), None);

        browser.on_response_cookies(vec![Cookie::new("sid", "42", "site.test")]);

        assert_eq!(
            browser.on_request_started("http://site.test/page"),
            Some("sid=42".to_string())
        );
        assert_eq!(browser.on_request_started("http://other.test/"), None);
        assert_eq!(browser.on_request_started("not a uri"), None);
    }

    #[test]
    fn test_session_cookie_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.session_time = 0;
        let mut browser =
            Browser::new(config, FakeEngine::default(), FakeUi::default()).unwrap();

        browser.on_response_cookies(vec![Cookie::new("sid", "42", "site.test")]);

        assert_eq!(browser.on_request_started("http://site.test/"), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.search_url = "http://search.test/?q=%s&r=%s".to_string();

        assert!(Browser::new(config, FakeEngine::default(), FakeUi::default()).is_err());
    }
}
