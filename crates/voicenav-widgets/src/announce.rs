#![forbid(unsafe_code)]

//! Speech output boundary.
//!
//! Everything the engine wants the user to hear goes through an
//! [`AnnouncementSink`]. The text-to-speech engine lives on the other side of
//! that trait; this module only ships sinks that are useful without one.
//!
//! # Interrupt semantics
//! `interrupt = true` is used for context changes (screen and overlay titles,
//! user-driven moves) and should cut off in-progress speech.
//! `interrupt = false` is incidental narration queued after whatever is
//! already being spoken.

use std::collections::VecDeque;

/// A single utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// The text to speak.
    pub text: String,
    /// Whether this should cut off in-progress speech.
    pub interrupt: bool,
}

impl Announcement {
    /// An announcement that cuts off in-progress speech.
    #[must_use]
    pub fn interrupting(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            interrupt: true,
        }
    }

    /// An announcement queued behind in-progress speech.
    #[must_use]
    pub fn queued(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            interrupt: false,
        }
    }
}

/// Consumer of narration strings. Delivery is fire-and-forget.
pub trait AnnouncementSink {
    fn speak(&mut self, text: &str, interrupt: bool);
}

/// Keeps every announcement in order. Useful for tests and transcripts.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    spoken: Vec<Announcement>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All announcements so far.
    #[must_use]
    pub fn announcements(&self) -> &[Announcement] {
        &self.spoken
    }

    /// Just the spoken text, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.spoken.iter().map(|a| a.text.as_str()).collect()
    }

    /// The most recent text, if anything was spoken.
    #[must_use]
    pub fn last_text(&self) -> Option<&str> {
        self.spoken.last().map(|a| a.text.as_str())
    }

    /// Take and clear the transcript.
    pub fn take(&mut self) -> Vec<Announcement> {
        std::mem::take(&mut self.spoken)
    }

    pub fn clear(&mut self) {
        self.spoken.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spoken.is_empty()
    }
}

impl AnnouncementSink for RecordingSink {
    fn speak(&mut self, text: &str, interrupt: bool) {
        self.spoken.push(Announcement {
            text: text.to_string(),
            interrupt,
        });
    }
}

/// Bounded FIFO of pending speech, drained by the host once per frame.
///
/// An interrupting announcement discards everything still pending. When the
/// queue is full the oldest entry is dropped.
#[derive(Debug, Clone)]
pub struct AnnouncementQueue {
    pending: VecDeque<Announcement>,
    capacity: usize,
    dropped: u64,
}

impl Default for AnnouncementQueue {
    fn default() -> Self {
        Self::new(16)
    }
}

impl AnnouncementQueue {
    /// Create a queue holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Next announcement to hand to the speech engine.
    pub fn pop(&mut self) -> Option<Announcement> {
        self.pending.pop_front()
    }

    /// Drain everything pending, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Announcement> + '_ {
        self.pending.drain(..)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Entries discarded by interrupts or overflow since creation.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl AnnouncementSink for AnnouncementQueue {
    fn speak(&mut self, text: &str, interrupt: bool) {
        if interrupt && !self.pending.is_empty() {
            self.dropped += self.pending.len() as u64;
            tracing::trace!(discarded = self.pending.len(), "speech interrupted");
            self.pending.clear();
        }
        if self.pending.len() >= self.capacity {
            self.pending.pop_front();
            self.dropped += 1;
        }
        self.pending.push_back(Announcement {
            text: text.to_string(),
            interrupt,
        });
    }
}

/// Emits every announcement as an `info` tracing event.
///
/// Stand-in for a speech engine when running headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnnouncementSink for TracingSink {
    fn speak(&mut self, text: &str, interrupt: bool) {
        tracing::info!(interrupt, "{text}");
    }
}
