#![forbid(unsafe_code)]

//! Held-key repeat timing driven by host tick deltas.
//!
//! Each held key accumulates elapsed tick time. The first repeat fires once
//! `delay` has elapsed, later ones every `interval`. Timers are tagged with
//! the focus generation they were armed under; when the generation moves on
//! the timer restarts from the full delay instead of firing at the new
//! focus target.
//!
//! No wall clock is read here. Time only advances through [`KeyRepeat::tick`].

use std::time::Duration;

use voicenav_core::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldKey {
    code: KeyCode,
    modifiers: Modifiers,
    since_fire: Duration,
    repeating: bool,
    generation: u64,
}

/// Repeat state for every currently held key, in press order.
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    delay: Duration,
    interval: Duration,
    max_per_tick: u32,
    held: Vec<HeldKey>,
}

impl KeyRepeat {
    #[must_use]
    pub fn new(delay: Duration, interval: Duration, max_per_tick: u32) -> Self {
        Self {
            delay,
            interval,
            max_per_tick: max_per_tick.max(1),
            held: Vec::new(),
        }
    }

    /// Start tracking a key. Pressing an already held key restarts its
    /// timer with the new modifiers.
    pub fn press(&mut self, code: KeyCode, modifiers: Modifiers, generation: u64) {
        let key = HeldKey {
            code,
            modifiers,
            since_fire: Duration::ZERO,
            repeating: false,
            generation,
        };
        match self.held.iter_mut().find(|k| k.code == code) {
            Some(existing) => *existing = key,
            None => self.held.push(key),
        }
    }

    /// Stop tracking a key. Returns whether it was held.
    pub fn release(&mut self, code: KeyCode) -> bool {
        let before = self.held.len();
        self.held.retain(|k| k.code != code);
        self.held.len() != before
    }

    /// Restart every timer from the full delay under `generation`.
    pub fn rearm(&mut self, generation: u64) {
        for key in &mut self.held {
            key.since_fire = Duration::ZERO;
            key.repeating = false;
            key.generation = generation;
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    #[must_use]
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.iter().any(|k| k.code == code)
    }

    #[must_use]
    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Advance time by `dt` and return the repeat events now due, as
    /// `KeyEventKind::Repeat` events in press order.
    pub fn tick(&mut self, dt: Duration, generation: u64) -> Vec<KeyEvent> {
        let mut due = Vec::new();
        for key in &mut self.held {
            if key.generation != generation {
                key.generation = generation;
                key.since_fire = Duration::ZERO;
                key.repeating = false;
                continue;
            }

            key.since_fire = key.since_fire.saturating_add(dt);
            let mut fired = 0;
            while fired < self.max_per_tick {
                let threshold = if key.repeating {
                    self.interval
                } else {
                    self.delay
                };
                if key.since_fire < threshold {
                    break;
                }
                key.since_fire -= threshold;
                key.repeating = true;
                fired += 1;
                due.push(
                    KeyEvent::new(key.code)
                        .with_modifiers(key.modifiers)
                        .with_kind(KeyEventKind::Repeat),
                );
            }
            // A capped burst drops the backlog rather than replaying it later.
            if fired == self.max_per_tick {
                key.since_fire = Duration::ZERO;
            }
        }
        due
    }
}
