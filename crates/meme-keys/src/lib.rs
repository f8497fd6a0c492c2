//! Meme Key Bindings
//!
//! A keypress is a [`Chord`]: a modifier mask and a key code. Chords are
//! normalized (NumLock ignored, key lower-cased) and looked up in an ordered
//! [`KeyMap`]; the first binding that matches wins.

mod action;
mod chord;
mod error;
mod key;
mod keymap;
mod modifiers;

pub use action::KeyAction;
pub use chord::Chord;
pub use error::KeyError;
pub use key::KeyCode;
pub use keymap::{Binding, KeyBinding, KeyMap, ScriptBinding};
pub use modifiers::Modifiers;

pub type Result<T> = std::result::Result<T, KeyError>;
