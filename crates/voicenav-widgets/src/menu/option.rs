#![forbid(unsafe_code)]

//! A single navigable command.

use std::fmt;

use crate::announce::AnnouncementSink;

type TextFn = Box<dyn Fn() -> String>;
type ConfirmFn = Box<dyn FnMut()>;
type AdjustFn = Box<dyn FnMut(i32)>;
type ReadFn = Box<dyn FnMut(&mut dyn AnnouncementSink)>;

/// One entry in a [`NavigableMenu`](super::NavigableMenu).
///
/// The text provider runs on every read so values that change between reads
/// (a slider level, a toggle state) are always spoken fresh. Every behavior
/// slot is optional; invoking an absent one is a no-op.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use voicenav_widgets::menu::MenuOption;
///
/// let volume = Rc::new(Cell::new(50));
/// let (read, write) = (Rc::clone(&volume), Rc::clone(&volume));
/// let mut option = MenuOption::new(move || format!("Volume {}%", read.get()))
///     .with_adjust(move |delta| write.set((write.get() + delta).clamp(0, 100)));
///
/// option.adjust(1);
/// assert_eq!(option.text(), "Volume 51%");
/// ```
pub struct MenuOption {
    text: TextFn,
    on_confirm: Option<ConfirmFn>,
    on_adjust: Option<AdjustFn>,
    on_read: Option<ReadFn>,
    hotkey: Option<String>,
}

impl Default for MenuOption {
    fn default() -> Self {
        Self {
            text: Box::new(String::new),
            on_confirm: None,
            on_adjust: None,
            on_read: None,
            hotkey: None,
        }
    }
}

impl MenuOption {
    /// Option whose text is computed by `text` on every read.
    #[must_use]
    pub fn new(text: impl Fn() -> String + 'static) -> Self {
        Self {
            text: Box::new(text),
            ..Self::default()
        }
    }

    /// Option with fixed text.
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move || text.clone())
    }

    #[must_use]
    pub fn with_confirm(mut self, on_confirm: impl FnMut() + 'static) -> Self {
        self.on_confirm = Some(Box::new(on_confirm));
        self
    }

    /// Adjust handler; receives `-1` or `+1`.
    #[must_use]
    pub fn with_adjust(mut self, on_adjust: impl FnMut(i32) + 'static) -> Self {
        self.on_adjust = Some(Box::new(on_adjust));
        self
    }

    /// Custom read handler. It replaces default narration entirely and is
    /// responsible for speaking through the sink it is given.
    #[must_use]
    pub fn with_read(
        mut self,
        on_read: impl FnMut(&mut dyn AnnouncementSink) + 'static,
    ) -> Self {
        self.on_read = Some(Box::new(on_read));
        self
    }

    #[must_use]
    pub fn with_hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkey = Some(hotkey.into());
        self
    }

    /// Current text. Never cached.
    #[must_use]
    pub fn text(&self) -> String {
        (self.text)()
    }

    #[must_use]
    pub fn hotkey(&self) -> Option<&str> {
        self.hotkey.as_deref()
    }

    #[must_use]
    pub fn has_confirm(&self) -> bool {
        self.on_confirm.is_some()
    }

    #[must_use]
    pub fn has_adjust(&self) -> bool {
        self.on_adjust.is_some()
    }

    #[must_use]
    pub fn has_read(&self) -> bool {
        self.on_read.is_some()
    }

    /// Run the confirm handler. Returns whether one was present.
    pub fn confirm(&mut self) -> bool {
        match self.on_confirm.as_mut() {
            Some(on_confirm) => {
                on_confirm();
                true
            }
            None => false,
        }
    }

    /// Run the adjust handler with the sign of `delta`. A zero delta or a
    /// missing handler does nothing and returns `false`.
    pub fn adjust(&mut self, delta: i32) -> bool {
        let delta = delta.signum();
        if delta == 0 {
            return false;
        }
        match self.on_adjust.as_mut() {
            Some(on_adjust) => {
                on_adjust(delta);
                true
            }
            None => false,
        }
    }

    /// Run the custom read handler. Returns whether one was present.
    pub fn read(&mut self, sink: &mut dyn AnnouncementSink) -> bool {
        match self.on_read.as_mut() {
            Some(on_read) => {
                on_read(sink);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuOption")
            .field("text", &self.text())
            .field("confirm", &self.has_confirm())
            .field("adjust", &self.has_adjust())
            .field("read", &self.has_read())
            .field("hotkey", &self.hotkey)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::RecordingSink;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn default_text_is_empty() {
        let option = MenuOption::default();
        assert_eq!(option.text(), "");
        assert!(!option.has_confirm());
        assert!(!option.has_adjust());
        assert!(!option.has_read());
        assert_eq!(option.hotkey(), None);
    }

    #[test]
    fn absent_handlers_are_noops() {
        let mut option = MenuOption::label("Quit");
        let mut sink = RecordingSink::new();
        assert!(!option.confirm());
        assert!(!option.adjust(1));
        assert!(!option.read(&mut sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn text_is_recomputed_each_read() {
        let level = Rc::new(Cell::new(1));
        let reader = Rc::clone(&level);
        let option = MenuOption::new(move || format!("Level {}", reader.get()));
        assert_eq!(option.text(), "Level 1");
        level.set(2);
        assert_eq!(option.text(), "Level 2");
    }

    #[test]
    fn adjust_passes_unit_deltas() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut option =
            MenuOption::label("Speed").with_adjust(move |d| log.borrow_mut().push(d));
        assert!(option.adjust(-1));
        assert!(option.adjust(5));
        assert!(!option.adjust(0));
        assert_eq!(*seen.borrow(), vec![-1, 1]);
    }

    #[test]
    fn confirm_fires_handler() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut option = MenuOption::label("Play").with_confirm(move || counter.set(counter.get() + 1));
        assert!(option.confirm());
        assert!(option.confirm());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn read_handler_speaks_through_sink() {
        let mut option = MenuOption::label("Hand")
            .with_read(|sink: &mut dyn AnnouncementSink| sink.speak("Three cards", false));
        let mut sink = RecordingSink::new();
        assert!(option.read(&mut sink));
        assert_eq!(sink.texts(), vec!["Three cards"]);
    }

    #[test]
    fn debug_shows_current_text() {
        let option = MenuOption::label("Options").with_hotkey("o");
        let debug = format!("{option:?}");
        assert!(debug.contains("Options"));
        assert!(debug.contains("hotkey: Some(\"o\")"));
    }
}
