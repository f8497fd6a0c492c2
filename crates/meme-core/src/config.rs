//! Browser configuration, persisted as `config.toml` in the data directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use meme_keys::KeyMap;
use meme_launch::{CommandTemplate, Launcher};
use meme_navigation::{InputResolver, DEFAULT_SEARCH_TEMPLATE};

use crate::Result;

pub const DEFAULT_HOMEPAGE: &str = "http://aerosuidae.net/meme.html";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; x86_64) AppleWebKit (KHTML, like Gecko) Chrome";
/// Default cookie lifetime in seconds
pub const DEFAULT_SESSION_TIME: u64 = 86400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    pub chord: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptKeyConfig {
    pub chord: String,
    pub script: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Home page URI
    pub homepage: String,
    /// Search engine URL template, with one `%s`
    pub search_url: String,
    pub user_agent: String,
    /// Lifetime given to cookies that arrive without one; 0 keeps them per session
    pub session_time: u64,
    /// Script run in the main frame by the `run-scriptfile` action
    pub script_file: Option<PathBuf>,
    /// Script run in every frame when its window object is created
    pub onload_file: Option<PathBuf>,
    /// User style sheet
    pub style_file: Option<PathBuf>,
    pub cookie_file: Option<PathBuf>,
    pub bookmark_file: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    /// Enable plugins at startup
    pub plugins: bool,
    pub download_command: CommandTemplate,
    pub new_window_command: CommandTemplate,
    /// Ordered key table, first match wins
    pub keys: Vec<KeyConfig>,
    /// Chords that run a script in the main frame
    pub script_keys: Vec<ScriptKeyConfig>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let standard = KeyMap::standard();

        Self {
            homepage: DEFAULT_HOMEPAGE.to_string(),
            search_url: DEFAULT_SEARCH_TEMPLATE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session_time: DEFAULT_SESSION_TIME,
            script_file: Some(data_dir.join("script.js")),
            onload_file: Some(data_dir.join("onload.js")),
            style_file: Some(data_dir.join("style.css")),
            cookie_file: Some(data_dir.join("cookies")),
            bookmark_file: Some(data_dir.join("bookmarks")),
            width: 1024,
            height: 768,
            plugins: false,
            download_command: CommandTemplate::default_download(),
            new_window_command: CommandTemplate::default_new_window(),
            keys: standard
                .bindings()
                .iter()
                .map(|b| KeyConfig {
                    chord: b.chord.to_string(),
                    action: b.action.to_string(),
                })
                .collect(),
            script_keys: standard
                .scripts()
                .iter()
                .map(|b| ScriptKeyConfig {
                    chord: b.chord.to_string(),
                    script: b.script.clone(),
                })
                .collect(),
        }
    }

    /// `$MEME_DIR`, else `~/.meme`
    pub fn data_dir() -> PathBuf {
        std::env::var_os("MEME_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".meme")))
            .unwrap_or_else(|| PathBuf::from(".meme"))
    }

    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file.
    ///
    /// Keys missing from the file keep their defaults, with data files in the
    /// directory holding the config file. A missing file gives all defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let defaults = Self::new(data_dir);
        if !path.exists() {
            return Ok(defaults);
        }

        let content = std::fs::read_to_string(path)?;
        let overrides: toml::Table = toml::from_str(&content)?;
        let mut table: toml::Table = toml::from_str(&toml::to_string(&defaults)?)?;
        for (key, value) in overrides {
            table.insert(key, value);
        }

        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = self.input_resolver() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.keymap() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.download_command.validate() {
            errors.push(format!("download_command: {}", e));
        }
        if let Err(e) = self.new_window_command.validate() {
            errors.push(format!("new_window_command: {}", e));
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::new(Self::data_dir());
        let mut config = self.clone();

        if self.input_resolver().is_err() {
            config.search_url = defaults.search_url;
        }
        if self.keymap().is_err() {
            config.keys = defaults.keys;
            config.script_keys = defaults.script_keys;
        }
        if self.download_command.validate().is_err() {
            config.download_command = defaults.download_command;
        }
        if self.new_window_command.validate().is_err() {
            config.new_window_command = defaults.new_window_command;
        }

        config
    }

    /// The configured key table; unknown action names are an error here
    pub fn keymap(&self) -> Result<KeyMap> {
        Ok(KeyMap::from_names(
            self.keys.iter().map(|k| (k.chord.as_str(), k.action.as_str())),
            self.script_keys
                .iter()
                .map(|k| (k.chord.as_str(), k.script.as_str())),
        )?)
    }

    pub fn input_resolver(&self) -> Result<InputResolver> {
        Ok(InputResolver::with_search_engine(self.search_url.clone())?)
    }

    pub fn launcher(&self) -> Launcher {
        Launcher::new(
            self.download_command.clone(),
            self.new_window_command.clone(),
        )
        .with_cookie_file(self.cookie_file.clone())
        .with_user_agent(self.user_agent.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::new(PathBuf::from("/home/user/.meme"));

        assert!(config.validate().is_empty());
        assert_eq!(config.keymap().unwrap(), KeyMap::standard());
        assert_eq!(
            config.bookmark_file,
            Some(PathBuf::from("/home/user/.meme/bookmarks"))
        );
        assert_eq!(config.session_time, 86400);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&Config::path(dir.path())).unwrap();

        assert_eq!(config.homepage, DEFAULT_HOMEPAGE);
        assert_eq!(config.cookie_file, Some(dir.path().join("cookies")));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::path(dir.path());
        std::fs::write(
            &path,
            r#"
homepage = "http://localhost:8000/"
plugins = true

[[keys]]
chord = "ctrl+r"
action = "reload-nocache"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.homepage, "http://localhost:8000/");
        assert_eq!(config.bookmark_file, Some(dir.path().join("bookmarks")));
        assert_eq!(config.cookie_file, Some(dir.path().join("cookies")));
        assert_eq!(config.onload_file, Some(dir.path().join("onload.js")));
        assert!(config.plugins);
        assert_eq!(config.keymap().unwrap().bindings().len(), 1);
        assert_eq!(config.search_url, DEFAULT_SEARCH_TEMPLATE);
    }

    #[test]
    fn test_partial_and_missing_file_share_data_dir() {
        let partial = tempfile::tempdir().unwrap();
        let missing = tempfile::tempdir().unwrap();
        std::fs::write(Config::path(partial.path()), "homepage = \"http://h.test/\"\n").unwrap();

        let from_partial = Config::load(&Config::path(partial.path())).unwrap();
        let from_missing = Config::load(&Config::path(missing.path())).unwrap();

        assert_eq!(
            from_partial.bookmark_file.unwrap().strip_prefix(partial.path()).unwrap(),
            from_missing.bookmark_file.unwrap().strip_prefix(missing.path()).unwrap()
        );
        assert_eq!(from_partial.width, from_missing.width);
    }

    #[test]
    fn test_explicit_paths_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::path(dir.path());
        std::fs::write(&path, "cookie_file = \"/var/lib/meme/cookies\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.cookie_file, Some(PathBuf::from("/var/lib/meme/cookies")));
        assert_eq!(config.bookmark_file, Some(dir.path().join("bookmarks")));
    }

    #[test]
    fn test_unknown_action_caught_at_load() {
        let mut config = Config::new(PathBuf::from("/tmp/meme"));
        config.keys.push(KeyConfig {
            chord: "ctrl+q".to_string(),
            action: "quit-everything".to_string(),
        });

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("quit-everything"));

        let fixed = config.with_defaults_for_invalid();
        assert!(fixed.validate().is_empty());
        assert_eq!(fixed.keymap().unwrap(), KeyMap::standard());
    }

    #[test]
    fn test_invalid_search_url_replaced() {
        let mut config = Config::new(PathBuf::from("/tmp/meme"));
        config.search_url = "https://search.example/".to_string();

        assert_eq!(config.validate().len(), 1);
        assert_eq!(
            config.with_defaults_for_invalid().search_url,
            DEFAULT_SEARCH_TEMPLATE
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::path(dir.path());
        let mut config = Config::new(dir.path().to_path_buf());
        config.width = 800;
        config.plugins = true;

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded.width, 800);
        assert!(loaded.plugins);
        assert_eq!(loaded.script_file, Some(dir.path().join("script.js")));
        assert_eq!(loaded.keymap().unwrap(), KeyMap::standard());
    }
}
