//! Window state driven by engine notifications

const APP_NAME: &str = "Meme";

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Page title, as last reported by the engine
    title: Option<String>,
    /// Load progress in percent
    progress: f64,
    /// Whether plugins are enabled
    plugins: bool,
}

impl UiState {
    pub fn new(plugins: bool) -> Self {
        Self {
            title: None,
            progress: 0.0,
            plugins,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn set_progress(&mut self, percent: f64) {
        self.progress = percent.clamp(0.0, 100.0);
    }

    pub fn plugins(&self) -> bool {
        self.plugins
    }

    pub fn set_plugins(&mut self, enabled: bool) {
        self.plugins = enabled;
    }

    /// `"<title> (42%) - Meme"`, the percentage only while loading
    pub fn window_title(&self) -> String {
        let mut title = match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => "untitled".to_string(),
        };
        if self.progress < 100.0 {
            title.push_str(&format!(" ({}%)", self.progress as u32));
        }
        title.push_str(" - ");
        title.push_str(APP_NAME);
        title
    }
}
