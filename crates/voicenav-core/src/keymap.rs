#![forbid(unsafe_code)]

//! Static key-to-action table.
//!
//! A [`KeyMap`] maps a physical key plus an exact modifier set to a
//! [`NavAction`]. Lookup is exact: `Shift+Up` does not fall back to `Up`
//! unless the host binds it.
//!
//! Bindings are written as `Mod+Mod+Key`, e.g. `Ctrl+Shift+Up`, `F1`,
//! `Alt+q`. A binding list joins `binding=action` pairs with `;`:
//!
//! ```
//! use voicenav_core::keymap::KeyMap;
//!
//! let mut map = KeyMap::default();
//! map.extend_from_str("Ctrl+Up=first; Ctrl+Down=last; F2=read").unwrap();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::action::NavAction;
use crate::event::{KeyCode, KeyEvent, Modifiers};

/// Errors from parsing binding strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyBindingParseError {
    /// The binding text was empty.
    Empty,
    /// A `+`-separated prefix was not a modifier name.
    UnknownModifier(String),
    /// The final segment was not a key name.
    UnknownKey(String),
    /// The right-hand side of `binding=action` was not an action name.
    UnknownAction(String),
    /// A list entry had no `=`.
    MissingAction(String),
}

impl fmt::Display for KeyBindingParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty key binding"),
            Self::UnknownModifier(m) => write!(f, "unknown modifier: {m}"),
            Self::UnknownKey(k) => write!(f, "unknown key: {k}"),
            Self::UnknownAction(a) => write!(f, "unknown action: {a}"),
            Self::MissingAction(entry) => write!(f, "expected binding=action, got: {entry}"),
        }
    }
}

impl std::error::Error for KeyBindingParseError {}

/// A physical key together with the exact modifier set it requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyBinding {
    /// Character keys are stored lowercase; `Shift` is carried by modifiers.
    #[must_use]
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { code, modifiers }
    }

    /// Unmodified binding.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    #[must_use]
    pub fn from_event(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifiers, self.code)
    }
}

impl FromStr for KeyBinding {
    type Err = KeyBindingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyBindingParseError::Empty);
        }
        // A trailing "+" names the plus key itself ("Ctrl++").
        let (prefix, key) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None if s == "+" => ("", "+"),
            None => match s.rfind('+') {
                Some(idx) => (&s[..idx], &s[idx + 1..]),
                None => ("", s),
            },
        };

        let mut modifiers = Modifiers::NONE;
        for part in prefix.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            modifiers |= Modifiers::parse_one(part)
                .ok_or_else(|| KeyBindingParseError::UnknownModifier(part.to_string()))?;
        }

        let key = key.trim();
        if key.is_empty() {
            return Err(KeyBindingParseError::Empty);
        }
        let code =
            KeyCode::parse(key).ok_or_else(|| KeyBindingParseError::UnknownKey(key.to_string()))?;
        Ok(Self::new(code, modifiers))
    }
}

/// Parse a `binding=action;binding=action` list.
pub fn parse_binding_list(
    list: &str,
) -> Result<Vec<(KeyBinding, NavAction)>, KeyBindingParseError> {
    list.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (binding, action) = entry
                .rsplit_once('=')
                .ok_or_else(|| KeyBindingParseError::MissingAction(entry.to_string()))?;
            let binding = binding.parse::<KeyBinding>()?;
            let action = NavAction::parse(action)
                .ok_or_else(|| KeyBindingParseError::UnknownAction(action.trim().to_string()))?;
            Ok((binding, action))
        })
        .collect()
}

/// Key-to-action lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<KeyBinding, NavAction>,
}

impl Default for KeyMap {
    /// Arrow keys navigate, Enter confirms, Escape goes back, F1 is help,
    /// Home/End jump to the ends of the list.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KeyBinding::key(KeyCode::Up), NavAction::Up);
        map.bind(KeyBinding::key(KeyCode::Down), NavAction::Down);
        map.bind(KeyBinding::key(KeyCode::Left), NavAction::Left);
        map.bind(KeyBinding::key(KeyCode::Right), NavAction::Right);
        map.bind(KeyBinding::key(KeyCode::Enter), NavAction::Confirm);
        map.bind(KeyBinding::key(KeyCode::Escape), NavAction::Back);
        map.bind(KeyBinding::key(KeyCode::F(1)), NavAction::Help);
        map.bind(KeyBinding::key(KeyCode::Home), NavAction::First);
        map.bind(KeyBinding::key(KeyCode::End), NavAction::Last);
        map
    }
}

impl KeyMap {
    /// A map with no bindings.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a key, returning the action it replaced.
    pub fn bind(&mut self, binding: KeyBinding, action: NavAction) -> Option<NavAction> {
        self.bindings.insert(binding, action)
    }

    /// Remove a binding.
    pub fn unbind(&mut self, binding: &KeyBinding) -> Option<NavAction> {
        self.bindings.remove(binding)
    }

    /// Builder form of [`bind`](Self::bind).
    #[must_use]
    pub fn with_binding(mut self, binding: KeyBinding, action: NavAction) -> Self {
        self.bind(binding, action);
        self
    }

    /// Merge a `binding=action;...` list over the current bindings.
    pub fn extend_from_str(&mut self, list: &str) -> Result<(), KeyBindingParseError> {
        for (binding, action) in parse_binding_list(list)? {
            self.bind(binding, action);
        }
        Ok(())
    }

    /// Resolve a key event to an action. Unmapped keys return `None`.
    #[must_use]
    pub fn resolve(&self, event: &KeyEvent) -> Option<NavAction> {
        let action = self.bindings.get(&KeyBinding::from_event(event)).copied();
        #[cfg(feature = "tracing")]
        tracing::trace!(key = %KeyBinding::from_event(event), ?action, "key map lookup");
        action
    }

    /// All bindings for an action, in stable display order.
    #[must_use]
    pub fn bindings_for(&self, action: NavAction) -> Vec<KeyBinding> {
        let mut keys: Vec<KeyBinding> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_by_key(|k| (k.modifiers.bits(), k.to_string()));
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Spoken key summary, e.g. `"Up: previous item. Down: next item."`.
    ///
    /// Actions appear in [`NavAction::ALL`] order; unbound actions are
    /// skipped.
    #[must_use]
    pub fn help_summary(&self) -> String {
        let mut parts = Vec::new();
        for action in NavAction::ALL {
            let keys = self.bindings_for(*action);
            if keys.is_empty() {
                continue;
            }
            let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
            parts.push(format!("{}: {}.", keys.join(" or "), action.describe()));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_table_covers_core_actions() {
        let map = KeyMap::default();
        let cases = [
            (KeyCode::Up, NavAction::Up),
            (KeyCode::Down, NavAction::Down),
            (KeyCode::Left, NavAction::Left),
            (KeyCode::Right, NavAction::Right),
            (KeyCode::Enter, NavAction::Confirm),
            (KeyCode::Escape, NavAction::Back),
            (KeyCode::F(1), NavAction::Help),
        ];
        for (code, action) in cases {
            assert_eq!(map.resolve(&KeyEvent::new(code)), Some(action), "{code}");
        }
    }

    #[test]
    fn lookup_requires_exact_modifiers() {
        let map = KeyMap::default();
        let shifted = KeyEvent::new(KeyCode::Up).with_modifiers(Modifiers::SHIFT);
        assert_eq!(map.resolve(&shifted), None);
        assert_eq!(map.resolve(&KeyEvent::new(KeyCode::Char('x'))), None);
    }

    #[test]
    fn modifier_qualified_binding() {
        let mut map = KeyMap::default();
        map.extend_from_str("Ctrl+Up=first").unwrap();
        let ev = KeyEvent::new(KeyCode::Up).with_modifiers(Modifiers::CTRL);
        assert_eq!(map.resolve(&ev), Some(NavAction::First));
        assert_eq!(map.resolve(&KeyEvent::new(KeyCode::Up)), Some(NavAction::Up));
    }

    #[test]
    fn char_bindings_ignore_case() {
        let map = KeyMap::empty().with_binding("Shift+r".parse().unwrap(), NavAction::ReadCurrent);
        let ev = KeyEvent::new(KeyCode::Char('R')).with_modifiers(Modifiers::SHIFT);
        assert_eq!(map.resolve(&ev), Some(NavAction::ReadCurrent));
    }

    #[test]
    fn parse_binding_variants() {
        let b: KeyBinding = "Ctrl+Alt+Delete".parse().unwrap();
        assert_eq!(b.code, KeyCode::Delete);
        assert_eq!(b.modifiers, Modifiers::CTRL | Modifiers::ALT);

        let plus: KeyBinding = "Ctrl++".parse().unwrap();
        assert_eq!(plus.code, KeyCode::Char('+'));
        assert_eq!(plus.modifiers, Modifiers::CTRL);

        assert_eq!(
            "Hyper+Up".parse::<KeyBinding>(),
            Err(KeyBindingParseError::UnknownModifier("Hyper".into()))
        );
        assert_eq!(
            "Ctrl+Banana".parse::<KeyBinding>(),
            Err(KeyBindingParseError::UnknownKey("Banana".into()))
        );
        assert_eq!("  ".parse::<KeyBinding>(), Err(KeyBindingParseError::Empty));
        assert_eq!("Ctrl+".parse::<KeyBinding>(), Err(KeyBindingParseError::Empty));
    }

    #[test]
    fn parse_list_errors() {
        assert_eq!(
            parse_binding_list("F2"),
            Err(KeyBindingParseError::MissingAction("F2".into()))
        );
        assert_eq!(
            parse_binding_list("F2=jump"),
            Err(KeyBindingParseError::UnknownAction("jump".into()))
        );
        assert_eq!(parse_binding_list(" ; ;").unwrap(), Vec::new());
    }

    #[test]
    fn failed_extend_leaves_map_untouched() {
        let mut map = KeyMap::default();
        let before = map.clone();
        assert!(map.extend_from_str("F2=read; Bogus+Up=first").is_err());
        assert_eq!(map, before);
    }

    #[test]
    fn unbind_removes_binding() {
        let mut map = KeyMap::default();
        assert_eq!(
            map.unbind(&KeyBinding::key(KeyCode::F(1))),
            Some(NavAction::Help)
        );
        assert_eq!(map.resolve(&KeyEvent::new(KeyCode::F(1))), None);
    }

    #[test]
    fn help_summary_lists_bound_actions_in_order() {
        let map = KeyMap::empty()
            .with_binding(KeyBinding::key(KeyCode::Escape), NavAction::Back)
            .with_binding(KeyBinding::key(KeyCode::Up), NavAction::Up)
            .with_binding("Ctrl+p".parse().unwrap(), NavAction::Up);
        assert_eq!(
            map.help_summary(),
            "Up or Ctrl+P: previous item. Escape: go back."
        );
    }

    fn arb_modifiers() -> impl Strategy<Value = Modifiers> {
        (0u8..16).prop_map(Modifiers::from_bits_truncate)
    }

    fn arb_code() -> impl Strategy<Value = KeyCode> {
        prop_oneof![
            Just(KeyCode::Up),
            Just(KeyCode::Down),
            Just(KeyCode::Enter),
            Just(KeyCode::Escape),
            Just(KeyCode::Home),
            (1u8..=24).prop_map(KeyCode::F),
            proptest::char::range('a', 'z').prop_map(KeyCode::Char),
        ]
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(code in arb_code(), mods in arb_modifiers()) {
            let binding = KeyBinding::new(code, mods);
            let parsed: KeyBinding = binding.to_string().parse().unwrap();
            prop_assert_eq!(parsed, binding);
        }
    }
}
