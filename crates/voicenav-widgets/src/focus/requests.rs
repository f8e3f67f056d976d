#![forbid(unsafe_code)]

//! Deferred focus transitions.
//!
//! Option callbacks run while the dispatcher is already driving the focus
//! manager, so they cannot call it directly. They post a [`FocusRequest`]
//! through a cloned [`FocusRequests`] handle instead; the manager applies
//! queued requests in order once the current action has finished.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::SurfaceRef;

/// A focus transition waiting to be applied.
pub enum FocusRequest {
    SetScreen(SurfaceRef),
    ShowOverlay(SurfaceRef),
    HideOverlay(SurfaceRef),
    PopOverlay,
}

impl fmt::Debug for FocusRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |s: &SurfaceRef| s.try_borrow().map(|s| s.name()).unwrap_or_default();
        match self {
            Self::SetScreen(s) => f.debug_tuple("SetScreen").field(&name(s)).finish(),
            Self::ShowOverlay(s) => f.debug_tuple("ShowOverlay").field(&name(s)).finish(),
            Self::HideOverlay(s) => f.debug_tuple("HideOverlay").field(&name(s)).finish(),
            Self::PopOverlay => f.write_str("PopOverlay"),
        }
    }
}

/// Clonable queue of pending focus requests shared with a [`FocusManager`](super::FocusManager).
#[derive(Clone, Default)]
pub struct FocusRequests {
    queue: Rc<RefCell<VecDeque<FocusRequest>>>,
}

impl FocusRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: FocusRequest) {
        self.queue.borrow_mut().push_back(request);
    }

    pub fn set_screen(&self, screen: SurfaceRef) {
        self.push(FocusRequest::SetScreen(screen));
    }

    pub fn show_overlay(&self, overlay: SurfaceRef) {
        self.push(FocusRequest::ShowOverlay(overlay));
    }

    pub fn hide_overlay(&self, overlay: SurfaceRef) {
        self.push(FocusRequest::HideOverlay(overlay));
    }

    pub fn pop_overlay(&self) {
        self.push(FocusRequest::PopOverlay);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub(crate) fn next(&self) -> Option<FocusRequest> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}

impl fmt::Debug for FocusRequests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRequests")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::testing::make;

    #[test]
    fn clones_share_one_queue() {
        let requests = FocusRequests::new();
        let posted_from_callback = requests.clone();
        let (dialog, _) = make("Dialog", &[]);

        posted_from_callback.show_overlay(dialog);
        posted_from_callback.pop_overlay();
        assert_eq!(requests.len(), 2);

        assert!(matches!(requests.next(), Some(FocusRequest::ShowOverlay(_))));
        assert!(matches!(requests.next(), Some(FocusRequest::PopOverlay)));
        assert!(requests.next().is_none());
        assert!(posted_from_callback.is_empty());
    }

    #[test]
    fn debug_names_surfaces() {
        let (dialog, _) = make("Dialog", &[]);
        let request = FocusRequest::HideOverlay(dialog);
        assert_eq!(format!("{request:?}"), "HideOverlay(\"Dialog\")");
    }
}
