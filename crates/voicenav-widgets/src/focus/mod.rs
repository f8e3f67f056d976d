#![forbid(unsafe_code)]

//! Focus management: one active screen plus a stack of overlays.
//!
//! Any type implementing [`Surface`] can act as a screen or an overlay; the
//! role is decided by how it is handed to the [`FocusManager`]. Surfaces are
//! constructed by the host and shared as [`SurfaceRef`] handles, compared by
//! identity.

mod manager;
mod requests;

pub use manager::{FocusEvent, FocusManager};
pub use requests::{FocusRequest, FocusRequests};

use std::cell::RefCell;
use std::rc::Rc;

use crate::announce::AnnouncementSink;
use crate::menu::NavigableMenu;

/// Capability contract for screens and overlays.
///
/// Only `name`, menu access, and `build_menu` are required. Every hook has a
/// no-op default.
pub trait Surface {
    /// Title spoken when the surface is shown.
    fn name(&self) -> String;

    fn menu(&self) -> &NavigableMenu;

    fn menu_mut(&mut self) -> &mut NavigableMenu;

    /// Populate the owned menu. Called every time the surface gains focus and
    /// whenever it reports itself dirty.
    fn build_menu(&mut self);

    /// Called before `build_menu` whenever the surface becomes the focus
    /// target.
    fn on_focus_gained(&mut self, _sink: &mut dyn AnnouncementSink) {}

    /// Called when the surface is removed from the manager.
    fn on_focus_lost(&mut self) {}

    /// Handle Back. Return `true` if handled; an unhandled Back on an overlay
    /// dismisses it.
    fn on_back(&mut self, _sink: &mut dyn AnnouncementSink) -> bool {
        false
    }

    /// Handle Help. Return `true` if handled; otherwise the key summary is
    /// spoken.
    fn on_help(&mut self, _sink: &mut dyn AnnouncementSink) -> bool {
        false
    }

    /// Report and clear a pending rebuild request.
    fn take_dirty(&mut self) -> bool {
        false
    }
}

/// Shared handle to a host-owned surface.
pub type SurfaceRef = Rc<RefCell<dyn Surface>>;

/// Wrap a surface in a shared handle.
pub fn surface_ref<S: Surface + 'static>(surface: S) -> SurfaceRef {
    Rc::new(RefCell::new(surface))
}

/// Identity comparison of two handles.
#[inline]
#[must_use]
pub fn same_surface(a: &SurfaceRef, b: &SurfaceRef) -> bool {
    Rc::ptr_eq(a, b)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable surface used by the focus tests.

    use super::*;
    use crate::menu::MenuOption;

    #[derive(Debug, Default)]
    pub struct Hooks {
        pub gained: usize,
        pub lost: usize,
        pub builds: usize,
    }

    /// Names of surfaces in the order they lost focus.
    pub type LostLog = Rc<RefCell<Vec<String>>>;

    pub struct TestSurface {
        pub name: String,
        pub items: Vec<String>,
        pub menu: NavigableMenu,
        pub hooks: Rc<RefCell<Hooks>>,
        pub handles_back: bool,
        pub announce_on_gain: bool,
        pub dirty: bool,
        pub lost_log: LostLog,
    }

    impl TestSurface {
        pub fn new(name: &str, items: &[&str]) -> Self {
            Self {
                name: name.to_string(),
                items: items.iter().map(ToString::to_string).collect(),
                menu: NavigableMenu::new(),
                hooks: Rc::default(),
                handles_back: false,
                announce_on_gain: false,
                dirty: false,
                lost_log: Rc::default(),
            }
        }
    }

    impl Surface for TestSurface {
        fn name(&self) -> String {
            self.name.clone()
        }

        fn menu(&self) -> &NavigableMenu {
            &self.menu
        }

        fn menu_mut(&mut self) -> &mut NavigableMenu {
            &mut self.menu
        }

        fn build_menu(&mut self) {
            self.hooks.borrow_mut().builds += 1;
            let options: Vec<MenuOption> = self.items.iter().map(MenuOption::label).collect();
            self.menu.rebuild(options);
        }

        fn on_focus_gained(&mut self, sink: &mut dyn AnnouncementSink) {
            self.hooks.borrow_mut().gained += 1;
            if self.announce_on_gain {
                sink.speak(&format!("Back to {}", self.name), true);
            }
        }

        fn on_focus_lost(&mut self) {
            self.hooks.borrow_mut().lost += 1;
            self.lost_log.borrow_mut().push(self.name.clone());
        }

        fn on_back(&mut self, sink: &mut dyn AnnouncementSink) -> bool {
            if self.handles_back {
                sink.speak("Cannot leave", true);
            }
            self.handles_back
        }

        fn take_dirty(&mut self) -> bool {
            std::mem::take(&mut self.dirty)
        }
    }

    /// A surface plus its concrete handle for inspecting state in tests.
    pub fn make(name: &str, items: &[&str]) -> (SurfaceRef, Rc<RefCell<TestSurface>>) {
        let concrete = Rc::new(RefCell::new(TestSurface::new(name, items)));
        let handle: SurfaceRef = concrete.clone();
        (handle, concrete)
    }
}
