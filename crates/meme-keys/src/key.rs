//! Key codes, using X11 keysym values

use std::fmt;

use crate::error::KeyError;

const UNICODE_OFFSET: u32 = 0x0100_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(u32);

impl KeyCode {
    pub const SPACE: KeyCode = KeyCode(0x0020);
    pub const BACKSPACE: KeyCode = KeyCode(0xff08);
    pub const TAB: KeyCode = KeyCode(0xff09);
    pub const RETURN: KeyCode = KeyCode(0xff0d);
    pub const ESCAPE: KeyCode = KeyCode(0xff1b);
    pub const HOME: KeyCode = KeyCode(0xff50);
    pub const LEFT: KeyCode = KeyCode(0xff51);
    pub const UP: KeyCode = KeyCode(0xff52);
    pub const RIGHT: KeyCode = KeyCode(0xff53);
    pub const DOWN: KeyCode = KeyCode(0xff54);
    pub const PAGE_UP: KeyCode = KeyCode(0xff55);
    pub const PAGE_DOWN: KeyCode = KeyCode(0xff56);
    pub const END: KeyCode = KeyCode(0xff57);
    pub const INSERT: KeyCode = KeyCode(0xff63);
    pub const F1: KeyCode = KeyCode(0xffbe);
    pub const DELETE: KeyCode = KeyCode(0xffff);

    const NAMED: &'static [(&'static str, KeyCode)] = &[
        ("space", KeyCode::SPACE),
        ("BackSpace", KeyCode::BACKSPACE),
        ("Tab", KeyCode::TAB),
        ("Return", KeyCode::RETURN),
        ("Escape", KeyCode::ESCAPE),
        ("Home", KeyCode::HOME),
        ("Left", KeyCode::LEFT),
        ("Up", KeyCode::UP),
        ("Right", KeyCode::RIGHT),
        ("Down", KeyCode::DOWN),
        ("Page_Up", KeyCode::PAGE_UP),
        ("Page_Down", KeyCode::PAGE_DOWN),
        ("End", KeyCode::END),
        ("Insert", KeyCode::INSERT),
        ("Delete", KeyCode::DELETE),
    ];

    pub const fn from_keysym(keysym: u32) -> Self {
        KeyCode(keysym)
    }

    pub const fn keysym(&self) -> u32 {
        self.0
    }

    /// Key code for a printable character
    pub fn from_char(c: char) -> Self {
        let cp = c as u32;
        if (0x20..=0x7e).contains(&cp) || (0xa0..=0xff).contains(&cp) {
            KeyCode(cp)
        } else {
            KeyCode(UNICODE_OFFSET + cp)
        }
    }

    /// The character this key types, if it is printable
    pub fn to_char(&self) -> Option<char> {
        match self.0 {
            cp @ (0x20..=0x7e | 0xa0..=0xff) => char::from_u32(cp),
            cp if cp > UNICODE_OFFSET => char::from_u32(cp - UNICODE_OFFSET),
            _ => None,
        }
    }

    /// Lower-case (unshifted) form of the key
    pub fn to_lower(&self) -> Self {
        match self.0 {
            // ASCII A-Z
            cp @ 0x41..=0x5a => KeyCode(cp + 0x20),
            // Latin-1 upper case, except the multiplication sign
            cp @ 0xc0..=0xde if cp != 0xd7 => KeyCode(cp + 0x20),
            cp if cp > UNICODE_OFFSET => match self.to_char() {
                Some(c) => {
                    let mut lower = c.to_lowercase();
                    match (lower.next(), lower.next()) {
                        (Some(l), None) => KeyCode::from_char(l),
                        _ => *self,
                    }
                }
                None => *self,
            },
            _ => *self,
        }
    }

    /// Parse a key name: a single character, or a keysym name like `Home` or `F5`
    pub fn from_name(name: &str) -> Result<Self, KeyError> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyCode::from_char(c));
        }

        if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(KeyCode(KeyCode::F1.0 + n - 1));
            }
        }

        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, k)| *k)
            .ok_or_else(|| KeyError::UnknownKey(name.to_string()))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = Self::NAMED.iter().find(|(_, k)| k == self) {
            return f.write_str(name);
        }
        if (KeyCode::F1.0..KeyCode::F1.0 + 12).contains(&self.0) {
            return write!(f, "F{}", self.0 - KeyCode::F1.0 + 1);
        }
        match self.to_char() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}
