#![forbid(unsafe_code)]

//! Ordered option lists with positional narration.
//!
//! A [`NavigableMenu`] is the one navigable structure shared by every screen
//! and overlay. Its owner fills it from a build step and replaces it wholesale
//! on rebuild.
//!
//! # Invariants
//! 1. When the menu is non-empty, `0 <= current < len`.
//! 2. When the menu is empty there is no current option and every action is
//!    a silent no-op.
//! 3. `rebuild` resets the current index to 0; `rebuild_preserving` clamps
//!    the old index into the new range.
//!
//! # Boundary policy
//! Movement clamps at the ends by default. [`NavigableMenu::with_wrap`]
//! switches to wraparound.

mod option;

pub use option::MenuOption;

use crate::announce::AnnouncementSink;

/// Ordered, mutable collection of [`MenuOption`]s plus a cursor.
#[derive(Debug, Default)]
pub struct NavigableMenu {
    options: Vec<MenuOption>,
    current: usize,
    wrap: bool,
}

impl NavigableMenu {
    /// Create an empty, clamping menu.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable wraparound at the ends.
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    #[must_use]
    pub fn wraps(&self) -> bool {
        self.wrap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Index of the current option, `None` when empty.
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (!self.options.is_empty()).then_some(self.current)
    }

    #[must_use]
    pub fn current(&self) -> Option<&MenuOption> {
        self.options.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut MenuOption> {
        self.options.get_mut(self.current)
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&MenuOption> {
        self.options.get(index)
    }

    pub fn options(&self) -> impl Iterator<Item = &MenuOption> {
        self.options.iter()
    }

    /// Append an option. The first option added becomes current.
    pub fn add_option(&mut self, option: MenuOption) {
        if self.options.is_empty() {
            self.current = 0;
        }
        self.options.push(option);
    }

    /// Builder form of [`add_option`](Self::add_option).
    #[must_use]
    pub fn with_option(mut self, option: MenuOption) -> Self {
        self.add_option(option);
        self
    }

    /// Remove every option.
    pub fn clear(&mut self) {
        self.options.clear();
        self.current = 0;
    }

    /// Replace all options and reset the cursor to the first one.
    pub fn rebuild(&mut self, options: impl IntoIterator<Item = MenuOption>) {
        self.options = options.into_iter().collect();
        self.current = 0;
    }

    /// Replace all options, keeping the cursor where it was (clamped).
    pub fn rebuild_preserving(&mut self, options: impl IntoIterator<Item = MenuOption>) {
        let previous = self.current;
        self.options = options.into_iter().collect();
        self.current = previous.min(self.options.len().saturating_sub(1));
    }

    /// Select an option directly. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.options.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    /// Move to the previous option. Returns whether the index changed.
    pub fn move_up(&mut self) -> bool {
        let len = self.options.len();
        if len == 0 {
            return false;
        }
        if self.current > 0 {
            self.current -= 1;
            true
        } else if self.wrap && len > 1 {
            self.current = len - 1;
            true
        } else {
            false
        }
    }

    /// Move to the next option. Returns whether the index changed.
    pub fn move_down(&mut self) -> bool {
        let len = self.options.len();
        if len == 0 {
            return false;
        }
        if self.current + 1 < len {
            self.current += 1;
            true
        } else if self.wrap && len > 1 {
            self.current = 0;
            true
        } else {
            false
        }
    }

    pub fn move_first(&mut self) -> bool {
        self.select(0)
    }

    pub fn move_last(&mut self) -> bool {
        match self.options.len() {
            0 => false,
            len => self.select(len - 1),
        }
    }

    /// Move to the first option whose hotkey matches `key`, ignoring case.
    pub fn select_hotkey(&mut self, key: &str) -> bool {
        let found = self.options.iter().position(|option| {
            option
                .hotkey()
                .is_some_and(|hotkey| hotkey.eq_ignore_ascii_case(key))
        });
        match found {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Call the current option's adjust handler with `-1`.
    pub fn adjust_left(&mut self) -> bool {
        self.current_mut().is_some_and(|option| option.adjust(-1))
    }

    /// Call the current option's adjust handler with `+1`.
    pub fn adjust_right(&mut self) -> bool {
        self.current_mut().is_some_and(|option| option.adjust(1))
    }

    /// Call the current option's confirm handler.
    pub fn confirm(&mut self) -> bool {
        self.current_mut().is_some_and(MenuOption::confirm)
    }

    /// Default narration for the current option:
    /// `"{text}, item {n} of {count}"`.
    #[must_use]
    pub fn narration(&self) -> Option<String> {
        let option = self.current()?;
        Some(format!(
            "{}, item {} of {}",
            option.text(),
            self.current + 1,
            self.options.len()
        ))
    }

    /// Speak the current option as incidental narration.
    pub fn announce_current(&mut self, sink: &mut dyn AnnouncementSink) -> bool {
        self.narrate(sink, false)
    }

    /// Speak the current option. A custom read handler takes over entirely;
    /// otherwise the default narration is spoken with `interrupt`.
    pub fn narrate(&mut self, sink: &mut dyn AnnouncementSink, interrupt: bool) -> bool {
        let Some(option) = self.options.get_mut(self.current) else {
            return false;
        };
        if option.read(sink) {
            return true;
        }
        match self.narration() {
            Some(text) => {
                sink.speak(&text, interrupt);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::RecordingSink;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn labels(names: &[&str]) -> NavigableMenu {
        let mut menu = NavigableMenu::new();
        for name in names {
            menu.add_option(MenuOption::label(*name));
        }
        menu
    }

    #[test]
    fn empty_menu_is_inert() {
        let mut menu = NavigableMenu::new();
        let mut sink = RecordingSink::new();
        assert_eq!(menu.current_index(), None);
        assert!(!menu.move_up());
        assert!(!menu.move_down());
        assert!(!menu.move_first());
        assert!(!menu.move_last());
        assert!(!menu.confirm());
        assert!(!menu.adjust_left());
        assert!(!menu.adjust_right());
        assert!(!menu.announce_current(&mut sink));
        assert_eq!(menu.narration(), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn first_option_becomes_current() {
        let mut menu = NavigableMenu::new();
        menu.add_option(MenuOption::label("Play"));
        assert_eq!(menu.current_index(), Some(0));
        menu.add_option(MenuOption::label("Quit"));
        assert_eq!(menu.current_index(), Some(0));
    }

    #[test]
    fn play_options_quit_clamps_at_end() {
        let mut menu = labels(&["Play", "Options", "Quit"]);
        assert!(menu.move_down());
        assert!(menu.move_down());
        assert_eq!(menu.current_index(), Some(2));
        assert_eq!(menu.narration().as_deref(), Some("Quit, item 3 of 3"));
        assert!(!menu.move_down());
        assert_eq!(menu.current_index(), Some(2));
    }

    #[test]
    fn clamps_at_start() {
        let mut menu = labels(&["Play", "Quit"]);
        assert!(!menu.move_up());
        assert_eq!(menu.current_index(), Some(0));
    }

    #[test]
    fn wraparound_when_enabled() {
        let mut menu = labels(&["a", "b", "c"]).with_wrap(true);
        assert!(menu.move_up());
        assert_eq!(menu.current_index(), Some(2));
        assert!(menu.move_down());
        assert_eq!(menu.current_index(), Some(0));
    }

    #[test]
    fn wrap_with_single_option_stays_put() {
        let mut menu = labels(&["only"]).with_wrap(true);
        assert!(!menu.move_down());
        assert!(!menu.move_up());
    }

    #[test]
    fn first_and_last() {
        let mut menu = labels(&["a", "b", "c"]);
        assert!(menu.move_last());
        assert_eq!(menu.current_index(), Some(2));
        assert!(!menu.move_last());
        assert!(menu.move_first());
        assert_eq!(menu.current_index(), Some(0));
    }

    #[test]
    fn rebuild_resets_index_and_narration() {
        let mut menu = labels(&["a", "b", "c"]);
        menu.move_last();
        menu.rebuild(vec![MenuOption::label("Resume"), MenuOption::label("Exit")]);
        assert_eq!(menu.current_index(), Some(0));
        assert_eq!(menu.narration().as_deref(), Some("Resume, item 1 of 2"));
    }

    #[test]
    fn rebuild_preserving_clamps() {
        let mut menu = labels(&["a", "b", "c", "d"]);
        menu.select(3);
        menu.rebuild_preserving(vec![MenuOption::label("x"), MenuOption::label("y")]);
        assert_eq!(menu.current_index(), Some(1));

        menu.rebuild_preserving(Vec::new());
        assert_eq!(menu.current_index(), None);
        menu.add_option(MenuOption::label("z"));
        assert_eq!(menu.current_index(), Some(0));
    }

    #[test]
    fn slider_text_reflects_adjustment() {
        let value = Rc::new(Cell::new(50));
        let (read, write) = (Rc::clone(&value), Rc::clone(&value));
        let mut menu = NavigableMenu::new().with_option(
            MenuOption::new(move || format!("{}%", read.get()))
                .with_adjust(move |d| write.set((write.get() + d).clamp(0, 100))),
        );
        let mut sink = RecordingSink::new();

        assert!(menu.adjust_right());
        menu.announce_current(&mut sink);
        assert_eq!(sink.last_text(), Some("51%, item 1 of 1"));

        assert!(menu.adjust_left());
        assert!(menu.adjust_left());
        menu.announce_current(&mut sink);
        assert_eq!(sink.last_text(), Some("49%, item 1 of 1"));
    }

    #[test]
    fn custom_read_replaces_default_narration() {
        let mut menu = NavigableMenu::new().with_option(
            MenuOption::label("Card").with_read(|sink: &mut dyn AnnouncementSink| {
                sink.speak("Strike, costs 1", true)
            }),
        );
        let mut sink = RecordingSink::new();
        assert!(menu.announce_current(&mut sink));
        assert_eq!(sink.texts(), vec!["Strike, costs 1"]);
        assert!(sink.announcements()[0].interrupt);
    }

    #[test]
    fn narrate_uses_requested_interrupt_flag() {
        let mut menu = labels(&["Play"]);
        let mut sink = RecordingSink::new();
        menu.narrate(&mut sink, true);
        menu.announce_current(&mut sink);
        let flags: Vec<bool> = sink.announcements().iter().map(|a| a.interrupt).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn confirm_targets_current_option() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let mut menu = NavigableMenu::new();
        for name in ["Play", "Quit"] {
            let log = Rc::clone(&fired);
            menu.add_option(MenuOption::label(name).with_confirm(move || log.borrow_mut().push(name)));
        }
        menu.move_down();
        assert!(menu.confirm());
        assert_eq!(*fired.borrow(), vec!["Quit"]);
    }

    #[test]
    fn hotkey_selection_is_case_insensitive() {
        let mut menu = NavigableMenu::new()
            .with_option(MenuOption::label("Play").with_hotkey("p"))
            .with_option(MenuOption::label("Quit").with_hotkey("Q"));
        assert!(menu.select_hotkey("q"));
        assert_eq!(menu.current_index(), Some(1));
        assert!(!menu.select_hotkey("x"));
        assert_eq!(menu.current_index(), Some(1));
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut menu = labels(&["a", "b"]);
        assert!(!menu.select(5));
        assert!(menu.select(1));
        assert!(!menu.select(1));
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Up,
        Down,
        First,
        Last,
        Rebuild(usize),
        Preserve(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Up),
            Just(Op::Down),
            Just(Op::First),
            Just(Op::Last),
            (0usize..6).prop_map(Op::Rebuild),
            (0usize..6).prop_map(Op::Preserve),
        ]
    }

    fn options(n: usize) -> Vec<MenuOption> {
        (0..n).map(|i| MenuOption::label(format!("item {i}"))).collect()
    }

    proptest! {
        #[test]
        fn index_stays_in_bounds(
            start in 1usize..8,
            wrap in any::<bool>(),
            ops in proptest::collection::vec(arb_op(), 0..64),
        ) {
            let mut menu = NavigableMenu::new().with_wrap(wrap);
            menu.rebuild(options(start));
            for op in ops {
                match op {
                    Op::Up => { menu.move_up(); }
                    Op::Down => { menu.move_down(); }
                    Op::First => { menu.move_first(); }
                    Op::Last => { menu.move_last(); }
                    Op::Rebuild(n) => menu.rebuild(options(n)),
                    Op::Preserve(n) => menu.rebuild_preserving(options(n)),
                }
                match menu.current_index() {
                    Some(i) => prop_assert!(i < menu.len()),
                    None => prop_assert!(menu.is_empty()),
                }
            }
        }
    }
}
