//! Collaborator boundaries
//!
//! [`Engine`] is the embedded page engine (rendering, scripting, network).
//! [`Ui`] is the toolkit side: the window and the address bar entry.
//! Both are driven from the single UI thread.

/// A frame in the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Main,
    /// Engine-assigned id of a sub-frame
    Child(u64),
}

/// In-page search behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub forward: bool,
    pub wrap: bool,
    pub highlight_all: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            forward: true,
            wrap: true,
            highlight_all: true,
        }
    }
}

/// Why the engine wants to navigate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationReason {
    LinkClicked,
    FormSubmitted,
    Other,
}

/// Answer to an engine policy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Let the engine apply its default
    Default,
    /// Hand the resource to the download command
    Download,
    /// Drop the request; the browser handled it
    Ignore,
}

pub trait Engine {
    fn load_uri(&mut self, uri: &str);
    fn current_uri(&self) -> Option<String>;
    fn title(&self) -> Option<String>;
    /// Load progress as a fraction in `0.0..=1.0`
    fn progress(&self) -> f64;

    fn reload(&mut self);
    fn reload_bypass_cache(&mut self);
    /// Negative steps go back
    fn go_back_or_forward(&mut self, steps: i32);
    fn can_go_back(&self) -> bool;

    fn search_text(&mut self, text: &str, options: FindOptions);

    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn set_zoom_level(&mut self, level: f64);

    fn view_source_mode(&self) -> bool;
    fn set_view_source_mode(&mut self, enabled: bool);

    fn run_script(&mut self, frame: Frame, script: &str);
    fn print(&mut self);

    fn set_user_agent(&mut self, user_agent: &str);
    fn set_plugins_enabled(&mut self, enabled: bool);
    fn set_user_stylesheet(&mut self, uri: &str);
    fn can_show_mime_type(&self, mime_type: &str) -> bool;
}

/// Window and address bar.
///
/// Focus changes the browser initiates itself need not be reported back
/// through [`Browser::on_entry_focus`](crate::Browser::on_entry_focus).
pub trait Ui {
    fn set_title(&mut self, title: &str);

    fn entry_text(&self) -> String;
    fn set_entry_text(&mut self, text: &str);
    fn focus_entry(&mut self);
    /// Select from the character offset `start` to the end
    fn select_entry_from(&mut self, start: usize);
    fn move_cursor_to_end(&mut self);
    /// Replace the completion candidates of the entry
    fn set_completions(&mut self, entries: &[String]);

    /// Leave the main loop
    fn quit(&mut self);
}
