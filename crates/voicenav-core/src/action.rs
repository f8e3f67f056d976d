#![forbid(unsafe_code)]

//! Abstract navigation actions.
//!
//! Raw keys are mapped to a [`NavAction`] by a [`KeyMap`](crate::keymap::KeyMap);
//! everything downstream of the key map only ever sees actions.

use std::fmt;

/// An abstract user intention, independent of the physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NavAction {
    /// Previous option.
    Up,
    /// Next option.
    Down,
    /// Decrease the current option's value.
    Left,
    /// Increase the current option's value.
    Right,
    /// Activate the current option.
    Confirm,
    /// Leave the focused surface.
    Back,
    /// Describe the available keys.
    Help,
    /// Jump to the first option.
    First,
    /// Jump to the last option.
    Last,
    /// Re-read the current option.
    ReadCurrent,
}

impl NavAction {
    pub const ALL: &'static [Self] = &[
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Confirm,
        Self::Back,
        Self::Help,
        Self::First,
        Self::Last,
        Self::ReadCurrent,
    ];

    /// Stable identifier used in configuration strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Confirm => "confirm",
            Self::Back => "back",
            Self::Help => "help",
            Self::First => "first",
            Self::Last => "last",
            Self::ReadCurrent => "read",
        }
    }

    /// Parse a configuration identifier (see [`as_str`](Self::as_str)).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(name))
    }

    /// Short spoken description for help narration.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Up => "previous item",
            Self::Down => "next item",
            Self::Left => "decrease",
            Self::Right => "increase",
            Self::Confirm => "activate",
            Self::Back => "go back",
            Self::Help => "help",
            Self::First => "first item",
            Self::Last => "last item",
            Self::ReadCurrent => "repeat current item",
        }
    }

    /// Whether holding the key re-issues the action.
    ///
    /// Only directional actions repeat; confirming or leaving a surface
    /// repeatedly while a key is held would be destructive.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
