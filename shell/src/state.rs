//! Application state management
use std::path::PathBuf;

use meme_core::{Browser, Config, Result};

use crate::cli::ParsedArgs;
use crate::console::{pump, ConsoleBrowser, ConsoleEngine, ConsoleUi};

/// The browser and where its configuration came from
pub struct AppState {
    browser: ConsoleBrowser,
    config_path: PathBuf,
}

impl AppState {
    pub fn new(args: &ParsedArgs) -> Result<Self> {
        let data_dir = Config::data_dir();
        let config_path = args
            .config
            .clone()
            .unwrap_or_else(|| Config::path(&data_dir));

        let mut config = load_config(&config_path, data_dir);
        if args.plugins {
            config.plugins = true;
        }

        if let Some(dir) = config.bookmark_file.as_deref().and_then(|p| p.parent()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to create data directory");
            }
        }

        let ui = ConsoleUi::new(config.width, config.height);
        let browser = Browser::new(config, ConsoleEngine::new(), ui)?;

        Ok(Self {
            browser,
            config_path,
        })
    }

    /// Load the initial page
    pub fn open(&mut self, uri: Option<&str>) {
        self.browser.open(uri);
        pump(&mut self.browser);
    }

    pub fn browser(&self) -> &ConsoleBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut ConsoleBrowser {
        &mut self.browser
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn shutdown(&mut self) {
        let reaped = self.browser.reap_children();
        tracing::info!(reaped, "Meme stopped");
    }
}

/// Read the configuration; a broken file is reported and defaults are used
fn load_config(path: &std::path::Path, data_dir: PathBuf) -> Config {
    let config = match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            return Config::new(data_dir);
        }
    };

    let errors = config.validate();
    if errors.is_empty() {
        return config;
    }
    for error in &errors {
        tracing::warn!(path = %path.display(), error = %error, "Invalid config value, using default");
    }
    config.with_defaults_for_invalid()
}
