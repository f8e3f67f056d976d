#![forbid(unsafe_code)]

//! Canonical keyboard events consumed by the input dispatcher.
//!
//! The host translates whatever its platform delivers into [`KeyEvent`]
//! values. With the `crossterm` feature enabled, [`KeyEvent::from_crossterm`]
//! performs that translation for terminal hosts.
//!
//! # Invariants
//! 1. A `KeyEvent` always carries a physical key and the full modifier set
//!    that was active when it was produced.
//! 2. `KeyEventKind::Repeat` marks host auto-repeat; consumers that implement
//!    their own repeat timing are expected to ignore it.

use std::fmt;

/// Physical key identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character. Letters are stored as typed.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key `F1..=F24`.
    F(u8),
}

impl KeyCode {
    /// Parse a key name as written in key binding strings.
    ///
    /// Accepts named keys (`Up`, `Enter`, `Esc`, `PageDown`, ...), function
    /// keys (`F1`..`F24`), `Space`, and single characters.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let code = match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "backspace" => Self::Backspace,
            "tab" => Self::Tab,
            "backtab" => Self::BackTab,
            "delete" | "del" => Self::Delete,
            "insert" | "ins" => Self::Insert,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" | "pgup" => Self::PageUp,
            "pagedown" | "pgdn" => Self::PageDown,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "space" => Self::Char(' '),
            lower => {
                if let Some(n) = lower
                    .strip_prefix('f')
                    .and_then(|s| s.parse::<u8>().ok())
                    .filter(|n| (1..=24).contains(n))
                {
                    return Some(Self::F(n));
                }
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Returns the character for printable keys.
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => f.write_str("Space"),
            Self::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Escape"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Tab => f.write_str("Tab"),
            Self::BackTab => f.write_str("BackTab"),
            Self::Delete => f.write_str("Delete"),
            Self::Insert => f.write_str("Insert"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
            Self::F(n) => write!(f, "F{n}"),
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held while a key event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Parse a single modifier name (`Ctrl`, `Shift`, `Alt`, `Super`).
    #[must_use]
    pub fn parse_one(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::CTRL),
            "shift" => Some(Self::SHIFT),
            "alt" | "option" => Some(Self::ALT),
            "super" | "cmd" | "meta" | "win" => Some(Self::SUPER),
            _ => None,
        }
    }
}

impl fmt::Display for Modifiers {
    /// Writes `Ctrl+Alt+Shift+Super+` style prefixes, empty for none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Self::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.contains(Self::ALT) {
            f.write_str("Alt+")?;
        }
        if self.contains(Self::SHIFT) {
            f.write_str("Shift+")?;
        }
        if self.contains(Self::SUPER) {
            f.write_str("Super+")?;
        }
        Ok(())
    }
}

/// Whether a key went down, auto-repeated, or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A single keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// A key release with no modifiers.
    #[must_use]
    pub const fn release(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Release,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    #[inline]
    #[must_use]
    pub fn is_release(&self) -> bool {
        self.kind == KeyEventKind::Release
    }

    /// Convert a crossterm key event. Keys with no counterpart (media keys,
    /// lock keys, `Null`) return `None`.
    #[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::KeyEvent) -> Option<Self> {
        use crossterm::event::{KeyCode as Ck, KeyEventKind as Ckind, KeyModifiers as Cm};

        let code = match event.code {
            Ck::Char(c) => KeyCode::Char(c),
            Ck::Enter => KeyCode::Enter,
            Ck::Esc => KeyCode::Escape,
            Ck::Backspace => KeyCode::Backspace,
            Ck::Tab => KeyCode::Tab,
            Ck::BackTab => KeyCode::BackTab,
            Ck::Delete => KeyCode::Delete,
            Ck::Insert => KeyCode::Insert,
            Ck::Home => KeyCode::Home,
            Ck::End => KeyCode::End,
            Ck::PageUp => KeyCode::PageUp,
            Ck::PageDown => KeyCode::PageDown,
            Ck::Up => KeyCode::Up,
            Ck::Down => KeyCode::Down,
            Ck::Left => KeyCode::Left,
            Ck::Right => KeyCode::Right,
            Ck::F(n) => KeyCode::F(n),
            _ => return None,
        };

        let mut modifiers = Modifiers::NONE;
        if event.modifiers.contains(Cm::SHIFT) {
            modifiers |= Modifiers::SHIFT;
        }
        if event.modifiers.contains(Cm::ALT) {
            modifiers |= Modifiers::ALT;
        }
        if event.modifiers.contains(Cm::CONTROL) {
            modifiers |= Modifiers::CTRL;
        }
        if event.modifiers.intersects(Cm::SUPER | Cm::META | Cm::HYPER) {
            modifiers |= Modifiers::SUPER;
        }

        let kind = match event.kind {
            Ckind::Press => KeyEventKind::Press,
            Ckind::Repeat => KeyEventKind::Repeat,
            Ckind::Release => KeyEventKind::Release,
        };

        Some(Self {
            code,
            modifiers,
            kind,
        })
    }
}
