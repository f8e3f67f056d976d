#![forbid(unsafe_code)]

//! Focus manager coordinating the active screen and the overlay stack.
//!
//! # Invariants
//! 1. The focus target is the top overlay, else the screen, else none.
//! 2. At most one screen is active; setting a screen empties the overlay
//!    stack.
//! 3. `generation` increases on every change of focus target and never
//!    otherwise.
//!
//! # Failure Modes
//! None. Popping an empty stack, hiding an overlay that is not shown, or
//! setting the same screen twice are all well-defined degenerate cases.

use std::fmt;

use tracing::{debug, trace, warn};

use super::{FocusRequest, FocusRequests, SurfaceRef, same_surface};
use crate::announce::AnnouncementSink;

/// Upper bound on request rounds per [`FocusManager::apply_requests`] call.
/// A round is every request queued when it starts, so batch size is
/// unbounded; hooks that keep posting new requests are cut off here.
const MAX_REQUEST_ROUNDS: usize = 64;

/// Focus change events emitted by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    ScreenChanged { name: String },
    OverlayShown { name: String },
    OverlayHidden { name: String },
    Cleared,
}

/// Owner of the focus stack. Construct one per UI root and pass it
/// explicitly; there is no global instance.
#[derive(Default)]
pub struct FocusManager {
    screen: Option<SurfaceRef>,
    overlays: Vec<SurfaceRef>,
    generation: u64,
    requests: FocusRequests,
    last_event: Option<FocusEvent>,
}

impl FocusManager {
    /// Create a manager with no screen and no overlays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current focus target.
    #[inline]
    #[must_use]
    pub fn current_focus_target(&self) -> Option<SurfaceRef> {
        self.overlays.last().or(self.screen.as_ref()).cloned()
    }

    /// The active screen, regardless of overlays.
    #[must_use]
    pub fn screen(&self) -> Option<SurfaceRef> {
        self.screen.clone()
    }

    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    #[must_use]
    pub fn has_overlay(&self, overlay: &SurfaceRef) -> bool {
        self.overlays.iter().any(|o| same_surface(o, overlay))
    }

    /// Overlays from bottom to top.
    pub fn overlays(&self) -> impl Iterator<Item = &SurfaceRef> {
        self.overlays.iter()
    }

    /// Check whether `surface` is the focus target.
    #[must_use]
    pub fn is_focused(&self, surface: &SurfaceRef) -> bool {
        self.overlays
            .last()
            .or(self.screen.as_ref())
            .is_some_and(|target| same_surface(target, surface))
    }

    /// Counter bumped on every change of focus target.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handle for posting deferred transitions from callbacks.
    #[must_use]
    pub fn requests(&self) -> FocusRequests {
        self.requests.clone()
    }

    /// Replace the active screen.
    ///
    /// Every overlay is removed top to bottom (each gets `on_focus_lost`),
    /// the previous screen gets `on_focus_lost` if it differs, then the new
    /// screen gets `on_focus_gained`, `build_menu`, and its title and
    /// current option are announced.
    pub fn set_screen(&mut self, screen: SurfaceRef, sink: &mut dyn AnnouncementSink) {
        self.drop_overlays();
        if let Some(previous) = self.screen.take()
            && !same_surface(&previous, &screen)
        {
            previous.borrow_mut().on_focus_lost();
        }
        self.screen = Some(screen.clone());
        self.generation += 1;

        let name = Self::enter(&screen, sink);
        debug!(screen = %name, generation = self.generation, "screen set");
        self.last_event = Some(FocusEvent::ScreenChanged { name });
    }

    /// Push an overlay and give it focus.
    pub fn show_overlay(&mut self, overlay: SurfaceRef, sink: &mut dyn AnnouncementSink) {
        self.overlays.push(overlay.clone());
        self.generation += 1;

        let name = Self::enter(&overlay, sink);
        debug!(
            overlay = %name,
            depth = self.overlays.len(),
            generation = self.generation,
            "overlay shown"
        );
        self.last_event = Some(FocusEvent::OverlayShown { name });
    }

    /// Remove `overlay` wherever it sits in the stack.
    ///
    /// Removing the top hands focus to whatever is now underneath, which gets
    /// `on_focus_gained` and a rebuild but no title announcement. Removing a
    /// covered overlay leaves focus untouched. Returns `false` if the
    /// overlay was not shown.
    pub fn hide_overlay(&mut self, overlay: &SurfaceRef, sink: &mut dyn AnnouncementSink) -> bool {
        let Some(index) = self.overlays.iter().rposition(|o| same_surface(o, overlay)) else {
            trace!("hide_overlay: overlay not shown");
            return false;
        };
        let was_top = index + 1 == self.overlays.len();
        let removed = self.overlays.remove(index);
        self.leave(&removed, was_top, sink);
        true
    }

    /// Remove the top overlay. No-op on an empty stack.
    pub fn pop_overlay(&mut self, sink: &mut dyn AnnouncementSink) -> Option<SurfaceRef> {
        let Some(removed) = self.overlays.pop() else {
            trace!("pop_overlay: stack empty");
            return None;
        };
        self.leave(&removed, true, sink);
        Some(removed)
    }

    /// Drop the screen and every overlay.
    pub fn clear(&mut self) {
        let had_focus = self.current_focus_target().is_some();
        self.drop_overlays();
        if let Some(screen) = self.screen.take() {
            screen.borrow_mut().on_focus_lost();
        }
        self.requests.clear();
        if had_focus {
            self.generation += 1;
            self.last_event = Some(FocusEvent::Cleared);
        }
    }

    /// Rebuild the focus target's menu if it reports itself dirty.
    pub fn refresh_dirty(&mut self) -> bool {
        let Some(target) = self.current_focus_target() else {
            return false;
        };
        let mut surface = target.borrow_mut();
        if !surface.take_dirty() {
            return false;
        }
        surface.build_menu();
        trace!(surface = %surface.name(), "dirty surface rebuilt");
        true
    }

    /// Apply queued [`FocusRequest`]s in order. Returns how many were applied.
    ///
    /// Each round applies everything queued when the round started; requests
    /// posted by hooks during a round run in the next one. After
    /// [`MAX_REQUEST_ROUNDS`] rounds anything still queued is discarded.
    pub fn apply_requests(&mut self, sink: &mut dyn AnnouncementSink) -> usize {
        let mut applied = 0;
        for _ in 0..MAX_REQUEST_ROUNDS {
            let batch = self.requests.len();
            if batch == 0 {
                return applied;
            }
            for _ in 0..batch {
                let Some(request) = self.requests.next() else {
                    break;
                };
                self.apply_request(request, sink);
                applied += 1;
            }
        }
        if !self.requests.is_empty() {
            warn!(
                remaining = self.requests.len(),
                rounds = MAX_REQUEST_ROUNDS,
                "focus request limit reached; discarding the rest"
            );
            self.requests.clear();
        }
        applied
    }

    fn apply_request(&mut self, request: FocusRequest, sink: &mut dyn AnnouncementSink) {
        trace!(?request, "applying focus request");
        match request {
            FocusRequest::SetScreen(screen) => self.set_screen(screen, sink),
            FocusRequest::ShowOverlay(overlay) => self.show_overlay(overlay, sink),
            FocusRequest::HideOverlay(overlay) => {
                self.hide_overlay(&overlay, sink);
            }
            FocusRequest::PopOverlay => {
                self.pop_overlay(sink);
            }
        }
    }

    /// Get the last focus event.
    #[must_use]
    pub fn focus_event(&self) -> Option<&FocusEvent> {
        self.last_event.as_ref()
    }

    /// Take and clear the last focus event.
    pub fn take_focus_event(&mut self) -> Option<FocusEvent> {
        self.last_event.take()
    }

    /// Gain-focus sequence for a newly installed surface. Returns its name.
    fn enter(surface: &SurfaceRef, sink: &mut dyn AnnouncementSink) -> String {
        let mut surface = surface.borrow_mut();
        surface.on_focus_gained(sink);
        surface.build_menu();
        let name = surface.name();
        sink.speak(&name, true);
        surface.menu_mut().announce_current(sink);
        name
    }

    fn leave(&mut self, removed: &SurfaceRef, was_top: bool, sink: &mut dyn AnnouncementSink) {
        let name = {
            let mut surface = removed.borrow_mut();
            surface.on_focus_lost();
            surface.name()
        };
        debug!(overlay = %name, was_top, depth = self.overlays.len(), "overlay hidden");
        self.last_event = Some(FocusEvent::OverlayHidden { name });

        if !was_top {
            return;
        }
        self.generation += 1;
        if let Some(target) = self.current_focus_target() {
            let mut surface = target.borrow_mut();
            surface.on_focus_gained(sink);
            surface.build_menu();
        }
    }

    fn drop_overlays(&mut self) {
        while let Some(overlay) = self.overlays.pop() {
            overlay.borrow_mut().on_focus_lost();
        }
    }
}

impl fmt::Debug for FocusManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |s: &SurfaceRef| s.try_borrow().map(|s| s.name()).unwrap_or_default();
        f.debug_struct("FocusManager")
            .field("screen", &self.screen.as_ref().map(name))
            .field("overlays", &self.overlays.iter().map(name).collect::<Vec<_>>())
            .field("generation", &self.generation)
            .field("requests", &self.requests)
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================
