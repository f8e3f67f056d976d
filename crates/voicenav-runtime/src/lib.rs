#![forbid(unsafe_code)]

//! Input dispatch for voicenav.
//!
//! # Role in voicenav
//! [`InputDispatcher`] is the one place raw key events enter. It maps them to
//! [`NavAction`](voicenav_core::NavAction)s through the configured key map,
//! routes them to whatever the
//! [`FocusManager`](voicenav_widgets::FocusManager) reports as the current
//! focus target, and synthesizes repeats for held direction keys.
//!
//! The host owns the loop: feed key events to
//! [`InputDispatcher::handle_key`] and call [`InputDispatcher::tick`] once per
//! frame with the elapsed time.
//!
//! ```
//! use std::time::Duration;
//! use voicenav_core::{KeyCode, KeyEvent};
//! use voicenav_runtime::InputDispatcher;
//! use voicenav_widgets::{FocusManager, RecordingSink};
//!
//! let mut dispatcher = InputDispatcher::default();
//! let mut focus = FocusManager::new();
//! let mut sink = RecordingSink::new();
//!
//! // No focus target yet: input is dropped.
//! assert!(dispatcher
//!     .handle_key(&KeyEvent::new(KeyCode::Down), &mut focus, &mut sink)
//!     .is_none());
//! dispatcher.tick(Duration::from_millis(16), &mut focus, &mut sink);
//! assert!(sink.is_empty());
//! ```

pub mod config;
pub mod dispatcher;
pub mod key_repeat;
pub mod logging;

pub use config::{DispatcherConfig, DispatcherConfigError, DispatcherConfigParse};
pub use dispatcher::InputDispatcher;
pub use key_repeat::KeyRepeat;
