//! Named actions a key binding can trigger

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Load the home page
    GoHome,
    GoBack,
    GoForward,
    ZoomIn,
    ZoomOut,
    /// Zoom level back to 1.0
    ZoomReset,
    /// Flip view-source mode and reload
    ToggleSource,
    /// Reload bypassing the cache
    ReloadNoCache,
    /// Run the configured script file in the main frame
    RunScriptFile,
    /// Focus the address bar and select its text
    FocusNavbar,
    /// Open the home page in a new process
    NewWindow,
    PrintPage,
    /// Start a `/` find in the address bar
    FindText,
    /// Start a `!bookmark ` command in the address bar
    BookmarkPage,
}

impl KeyAction {
    pub const ALL: [KeyAction; 14] = [
        KeyAction::GoHome,
        KeyAction::GoBack,
        KeyAction::GoForward,
        KeyAction::ZoomIn,
        KeyAction::ZoomOut,
        KeyAction::ZoomReset,
        KeyAction::ToggleSource,
        KeyAction::ReloadNoCache,
        KeyAction::RunScriptFile,
        KeyAction::FocusNavbar,
        KeyAction::NewWindow,
        KeyAction::PrintPage,
        KeyAction::FindText,
        KeyAction::BookmarkPage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::GoHome => "go-home",
            KeyAction::GoBack => "go-back",
            KeyAction::GoForward => "go-forward",
            KeyAction::ZoomIn => "zoom-in",
            KeyAction::ZoomOut => "zoom-out",
            KeyAction::ZoomReset => "zoom-reset",
            KeyAction::ToggleSource => "toggle-source",
            KeyAction::ReloadNoCache => "reload-nocache",
            KeyAction::RunScriptFile => "run-scriptfile",
            KeyAction::FocusNavbar => "focus-navbar",
            KeyAction::NewWindow => "new-window",
            KeyAction::PrintPage => "print-page",
            KeyAction::FindText => "find-text",
            KeyAction::BookmarkPage => "bookmark-page",
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeyAction {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyAction::ALL
            .iter()
            .find(|action| action.as_str() == s)
            .copied()
            .ok_or_else(|| KeyError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_and_parse_back() {
        for action in KeyAction::ALL {
            assert_eq!(action.as_str().parse::<KeyAction>().unwrap(), action);
        }
        let mut names: Vec<_> = KeyAction::ALL.iter().map(KeyAction::as_str).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), KeyAction::ALL.len());
    }

    #[test]
    fn test_unknown_action() {
        assert_eq!(
            "reload".parse::<KeyAction>(),
            Err(KeyError::UnknownAction("reload".to_string()))
        );
        // Names are case sensitive
        assert!("Go-Home".parse::<KeyAction>().is_err());
    }
}
