#![forbid(unsafe_code)]

//! Input dispatcher: raw key events in, menu actions and speech out.
//!
//! # Flow
//! 1. A key press is resolved through the [`KeyMap`](voicenav_core::KeyMap).
//! 2. Unmapped printable keys are tried as hotkeys on the focused menu;
//!    anything else unmapped is ignored.
//! 3. The focus target is resolved from the [`FocusManager`] at dispatch
//!    time, never cached.
//! 4. Directional actions drive the target's menu and narrate the result.
//!    Back and Help go to the surface hooks first and fall back to popping
//!    the overlay or speaking the key summary.
//! 5. Focus requests posted by callbacks are applied once the action is
//!    done.
//!
//! # Failure Modes
//! | Condition | Behavior |
//! |-----------|----------|
//! | Unmapped key | ignored, trace event |
//! | No focus target | ignored, trace event |
//! | Empty menu | action is a no-op, nothing spoken |
//! | Back on a screen without a handler | nothing happens |

use std::time::Duration;

use tracing::{debug, trace, warn};
use voicenav_core::{KeyCode, KeyEvent, KeyEventKind, Modifiers, NavAction};
use voicenav_widgets::{AnnouncementSink, FocusManager, NavigableMenu};

use crate::config::DispatcherConfig;
use crate::key_repeat::KeyRepeat;

/// Turns key events and ticks into actions on the current focus target.
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    config: DispatcherConfig,
    repeat: KeyRepeat,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl InputDispatcher {
    /// Build a dispatcher. Invalid repeat timing is logged and replaced by
    /// the default for that field, so a zero delay or interval never turns
    /// a held key into a burst every tick.
    #[must_use]
    pub fn new(mut config: DispatcherConfig) -> Self {
        if let Err(errors) = config.validate() {
            for error in &errors {
                warn!(%error, "invalid dispatcher setting");
            }
            let defaults = DispatcherConfig::default();
            if config.repeat_delay.is_zero() {
                config.repeat_delay = defaults.repeat_delay;
            }
            if config.repeat_interval.is_zero() {
                config.repeat_interval = defaults.repeat_interval;
            }
            if config.max_repeats_per_tick == 0 {
                config.max_repeats_per_tick = defaults.max_repeats_per_tick;
            }
        }
        let repeat = KeyRepeat::new(
            config.repeat_delay,
            config.repeat_interval,
            config.max_repeats_per_tick,
        );
        Self { config, repeat }
    }

    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Number of keys currently tracked for repeat.
    #[must_use]
    pub fn held_keys(&self) -> usize {
        self.repeat.held_count()
    }

    /// Forget every held key, e.g. when the host window loses focus.
    pub fn release_all(&mut self) {
        self.repeat.clear();
    }

    /// Handle one key event. Returns the action that reached a focus target.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        focus: &mut FocusManager,
        sink: &mut dyn AnnouncementSink,
    ) -> Option<NavAction> {
        match event.kind {
            KeyEventKind::Release => {
                if self.repeat.release(event.code) {
                    trace!(key = %event.code, "repeat cleared");
                }
                return None;
            }
            // Repeat timing is ours; host auto-repeat would double it.
            KeyEventKind::Repeat => return None,
            KeyEventKind::Press => {}
        }

        let Some(action) = self.config.keymap.resolve(event) else {
            self.try_hotkey(event, focus, sink);
            return None;
        };

        let dispatched = self.dispatch(action, focus, sink);
        if action.is_repeatable() {
            self.repeat
                .press(event.code, event.modifiers, focus.generation());
        }
        dispatched.then_some(action)
    }

    /// Advance repeat timers by `dt`, apply pending focus requests, and
    /// rebuild a dirty focus target. Returns how many repeats fired.
    pub fn tick(
        &mut self,
        dt: Duration,
        focus: &mut FocusManager,
        sink: &mut dyn AnnouncementSink,
    ) -> usize {
        focus.apply_requests(sink);
        focus.refresh_dirty();

        let generation = focus.generation();
        let mut fired = 0;
        for event in self.repeat.tick(dt, generation) {
            let Some(action) = self.config.keymap.resolve(&event) else {
                continue;
            };
            if !action.is_repeatable() {
                continue;
            }
            if self.dispatch(action, focus, sink) {
                fired += 1;
            }
            if focus.generation() != generation {
                // The repeat itself moved focus; nothing further may land on
                // the new target this tick.
                self.repeat.rearm(focus.generation());
                break;
            }
        }
        fired
    }

    /// Send an action to the current focus target. Returns `false` when
    /// there is no target.
    pub fn dispatch(
        &mut self,
        action: NavAction,
        focus: &mut FocusManager,
        sink: &mut dyn AnnouncementSink,
    ) -> bool {
        let Some(target) = focus.current_focus_target() else {
            trace!(%action, "no focus target");
            return false;
        };
        let on_overlay = focus.overlay_count() > 0;
        let wrap = self.config.wrap_navigation;

        // Popping needs the manager, so it waits until the surface borrow ends.
        let pop_overlay = {
            let mut surface = target.borrow_mut();
            debug!(%action, surface = %surface.name(), "dispatch");
            match action {
                NavAction::Up => {
                    let menu = surface.menu_mut();
                    if !menu.move_up() && wrap {
                        menu.move_last();
                    }
                    menu.narrate(sink, true);
                    false
                }
                NavAction::Down => {
                    let menu = surface.menu_mut();
                    if !menu.move_down() && wrap {
                        menu.move_first();
                    }
                    menu.narrate(sink, true);
                    false
                }
                NavAction::First => {
                    let menu = surface.menu_mut();
                    menu.move_first();
                    menu.narrate(sink, true);
                    false
                }
                NavAction::Last => {
                    let menu = surface.menu_mut();
                    menu.move_last();
                    menu.narrate(sink, true);
                    false
                }
                NavAction::Left => {
                    adjust_and_narrate(surface.menu_mut(), -1, sink);
                    false
                }
                NavAction::Right => {
                    adjust_and_narrate(surface.menu_mut(), 1, sink);
                    false
                }
                NavAction::Confirm => {
                    surface.menu_mut().confirm();
                    false
                }
                NavAction::ReadCurrent => {
                    surface.menu_mut().narrate(sink, true);
                    false
                }
                NavAction::Back => !surface.on_back(sink) && on_overlay,
                NavAction::Help => {
                    if !surface.on_help(sink) {
                        let help =
                            format!("{}. {}", surface.name(), self.config.keymap.help_summary());
                        sink.speak(&help, true);
                    }
                    false
                }
            }
        };

        if pop_overlay {
            focus.pop_overlay(sink);
        }
        focus.apply_requests(sink);
        true
    }

    fn try_hotkey(
        &self,
        event: &KeyEvent,
        focus: &mut FocusManager,
        sink: &mut dyn AnnouncementSink,
    ) {
        let hotkey = match event.code {
            KeyCode::Char(c)
                if !c.is_whitespace()
                    && !event
                        .modifiers
                        .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER) =>
            {
                c.to_string()
            }
            _ => {
                trace!(key = %event.code, modifiers = ?event.modifiers, "unmapped key");
                return;
            }
        };
        let Some(target) = focus.current_focus_target() else {
            return;
        };
        let mut surface = target.borrow_mut();
        let menu = surface.menu_mut();
        if menu.select_hotkey(&hotkey) {
            debug!(%hotkey, "hotkey selected option");
            menu.narrate(sink, true);
        } else {
            trace!(%hotkey, "no option for hotkey");
        }
    }
}

fn adjust_and_narrate(menu: &mut NavigableMenu, delta: i32, sink: &mut dyn AnnouncementSink) {
    let adjusted = if delta < 0 {
        menu.adjust_left()
    } else {
        menu.adjust_right()
    };
    if adjusted {
        menu.narrate(sink, true);
    }
}
