//! Ordered key binding table
//!
//! Bindings are scanned in order and the first match wins, so an earlier
//! entry shadows any later entry for the same chord. Action bindings are
//! checked before script bindings.

use crate::action::KeyAction;
use crate::chord::Chord;
use crate::key::KeyCode;
use crate::modifiers::Modifiers;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub chord: Chord,
    pub action: KeyAction,
}

/// Runs a JavaScript snippet in the main frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBinding {
    pub chord: Chord,
    pub script: String,
}

/// What a matched chord asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<'a> {
    Action(KeyAction),
    Script(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    bindings: Vec<KeyBinding>,
    scripts: Vec<ScriptBinding>,
}

impl KeyMap {
    pub fn new(bindings: Vec<KeyBinding>, scripts: Vec<ScriptBinding>) -> Self {
        Self { bindings, scripts }
    }

    /// Build a key map from `(chord, action-name)` and `(chord, script)` pairs.
    ///
    /// Fails on the first unparseable chord or unknown action name.
    pub fn from_names<'a, A, S>(bindings: A, scripts: S) -> Result<Self>
    where
        A: IntoIterator<Item = (&'a str, &'a str)>,
        S: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let bindings = bindings
            .into_iter()
            .map(|(chord, action)| -> Result<KeyBinding> {
                Ok(KeyBinding {
                    chord: chord.parse()?,
                    action: action.parse()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let scripts = scripts
            .into_iter()
            .map(|(chord, script)| -> Result<ScriptBinding> {
                Ok(ScriptBinding {
                    chord: chord.parse()?,
                    script: script.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(bindings, scripts))
    }

    /// The reference binding table
    pub fn standard() -> Self {
        let ctl = Modifiers::CONTROL;
        let alt = Modifiers::MOD1;
        let key = KeyCode::from_char;
        let bind = |modifiers, key, action| KeyBinding {
            chord: Chord::new(modifiers, key),
            action,
        };

        Self::new(
            vec![
                bind(alt, KeyCode::HOME, KeyAction::GoHome),
                bind(alt, KeyCode::LEFT, KeyAction::GoBack),
                bind(alt, KeyCode::RIGHT, KeyAction::GoForward),
                bind(ctl, key('='), KeyAction::ZoomIn),
                bind(ctl, key('-'), KeyAction::ZoomOut),
                bind(ctl, key('0'), KeyAction::ZoomReset),
                bind(ctl, key('s'), KeyAction::ToggleSource),
                bind(ctl, key('r'), KeyAction::ReloadNoCache),
                bind(ctl, key('j'), KeyAction::RunScriptFile),
                bind(ctl, key('l'), KeyAction::FocusNavbar),
                bind(ctl, key('t'), KeyAction::NewWindow),
                bind(ctl, key('p'), KeyAction::PrintPage),
                bind(ctl, key('f'), KeyAction::FindText),
                bind(ctl, key('b'), KeyAction::BookmarkPage),
            ],
            vec![ScriptBinding {
                chord: Chord::new(ctl, key('n')),
                script: "window.meme.links()".to_string(),
            }],
        )
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    pub fn scripts(&self) -> &[ScriptBinding] {
        &self.scripts
    }

    /// First action bound to the pressed chord
    pub fn lookup(&self, pressed: Chord) -> Option<KeyAction> {
        let chord = pressed.normalized();
        self.bindings
            .iter()
            .find(|binding| binding.chord == chord)
            .map(|binding| binding.action)
    }

    /// First action or script bound to the pressed chord
    pub fn resolve(&self, pressed: Chord) -> Option<Binding<'_>> {
        if let Some(action) = self.lookup(pressed) {
            return Some(Binding::Action(action));
        }

        let chord = pressed.normalized();
        self.scripts
            .iter()
            .find(|binding| binding.chord == chord)
            .map(|binding| Binding::Script(binding.script.as_str()))
    }
}
