//! Modifier masks, bit-compatible with the X11/GDK event state

use std::fmt;
use std::ops::BitOr;

use crate::error::KeyError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1 << 0);
    pub const LOCK: Modifiers = Modifiers(1 << 1);
    pub const CONTROL: Modifiers = Modifiers(1 << 2);
    /// Usually Alt
    pub const MOD1: Modifiers = Modifiers(1 << 3);
    /// Usually NumLock; never part of a binding
    pub const MOD2: Modifiers = Modifiers(1 << 4);
    pub const MOD3: Modifiers = Modifiers(1 << 5);
    pub const MOD4: Modifiers = Modifiers(1 << 6);
    pub const MOD5: Modifiers = Modifiers(1 << 7);
    pub const SUPER: Modifiers = Modifiers(1 << 26);

    const NAMES: &'static [(&'static str, Modifiers)] = &[
        ("shift", Modifiers::SHIFT),
        ("lock", Modifiers::LOCK),
        ("ctrl", Modifiers::CONTROL),
        ("alt", Modifiers::MOD1),
        ("mod2", Modifiers::MOD2),
        ("mod3", Modifiers::MOD3),
        ("mod4", Modifiers::MOD4),
        ("mod5", Modifiers::MOD5),
        ("super", Modifiers::SUPER),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Modifiers(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Drop the bits no binding ever uses
    pub const fn normalized(&self) -> Self {
        Modifiers(self.0 & !Modifiers::MOD2.0)
    }

    pub fn from_name(name: &str) -> Result<Self, KeyError> {
        match name.to_ascii_lowercase().as_str() {
            "control" => Ok(Modifiers::CONTROL),
            "mod1" => Ok(Modifiers::MOD1),
            lower => Self::NAMES
                .iter()
                .find(|(n, _)| *n == lower)
                .map(|(_, m)| *m)
                .ok_or_else(|| KeyError::UnknownModifier(name.to_string())),
        }
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    /// `ctrl+alt`; unnamed bits are skipped
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, modifier) in Self::NAMES {
            if self.contains(*modifier) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
