#![forbid(unsafe_code)]

//! Navigable menus, surfaces, and focus for voicenav.
//!
//! # Role in voicenav
//! This crate holds the state the user navigates: [`menu::NavigableMenu`]
//! lists of [`menu::MenuOption`] commands, the [`focus::Surface`] contract
//! host views implement, and the [`focus::FocusManager`] that decides which
//! surface receives input. Speech leaves through
//! [`announce::AnnouncementSink`].
//!
//! Nothing here renders or reads the keyboard; the dispatcher in
//! `voicenav-runtime` drives these types with abstract actions.

pub mod announce;
pub mod focus;
pub mod menu;

pub use announce::{Announcement, AnnouncementQueue, AnnouncementSink, RecordingSink, TracingSink};
pub use focus::{
    FocusEvent, FocusManager, FocusRequest, FocusRequests, Surface, SurfaceRef, same_surface,
    surface_ref,
};
pub use menu::{MenuOption, NavigableMenu};
