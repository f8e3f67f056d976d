#![forbid(unsafe_code)]

//! Core: key events, abstract navigation actions, and key maps.
//!
//! # Role in voicenav
//! `voicenav-core` is the input vocabulary. It owns the normalized
//! [`KeyEvent`](event::KeyEvent) type hosts feed in, the
//! [`NavAction`](action::NavAction) set everything downstream understands,
//! and the [`KeyMap`](keymap::KeyMap) that connects the two.
//!
//! # How it fits in the system
//! `voicenav-widgets` implements menus and focus without knowing about keys
//! at all. `voicenav-runtime` owns the dispatcher that consumes key events,
//! resolves them through a key map, and drives the focused surface.

pub mod action;
pub mod event;
pub mod keymap;

pub use action::NavAction;
pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use keymap::{KeyBinding, KeyBindingParseError, KeyMap};
