//! Key chords: a modifier mask plus a key, considered as one event

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;
use crate::key::KeyCode;
use crate::modifiers::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub key: KeyCode,
}

impl Chord {
    pub fn new(modifiers: Modifiers, key: KeyCode) -> Self {
        Self { modifiers, key }
    }

    /// The chord as it is compared against bindings
    pub fn normalized(&self) -> Self {
        Self {
            modifiers: self.modifiers.normalized(),
            key: self.key.to_lower(),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers == Modifiers::NONE {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

impl FromStr for Chord {
    type Err = KeyError;

    /// Parses `ctrl+r`, `alt+Left`, `ctrl++` or a bare key name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyError::InvalidChord(s.to_string()));
        }

        let (mods, key) = if s.len() > 1 && s.ends_with("++") {
            (&s[..s.len() - 2], "+")
        } else {
            match s.rsplit_once('+') {
                Some((mods, key)) if !key.is_empty() => (mods, key),
                Some(_) if s == "+" => ("", "+"),
                Some(_) => return Err(KeyError::InvalidChord(s.to_string())),
                None => ("", s),
            }
        };

        let mut modifiers = Modifiers::NONE;
        for name in mods.split('+').filter(|m| !m.is_empty()) {
            modifiers = modifiers | Modifiers::from_name(name.trim())?;
        }

        Ok(Chord::new(modifiers, KeyCode::from_name(key)?))
    }
}
