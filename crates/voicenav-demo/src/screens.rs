//! Demo surfaces: a title screen, a credits screen, and two dialogs.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use voicenav_widgets::{
    AnnouncementSink, FocusManager, FocusRequests, MenuOption, NavigableMenu, Surface, SurfaceRef,
};

/// Shared state the host loop watches.
#[derive(Debug, Default)]
pub struct DemoState {
    pub quit: Cell<bool>,
    pub plays: Cell<u32>,
    pub volume: Cell<i32>,
    pub hints: Cell<bool>,
}

/// Everything the host needs after construction.
pub struct Demo {
    pub state: Rc<DemoState>,
    pub title: SurfaceRef,
}

/// Wire up every surface. Callbacks reach the focus manager only through
/// its request queue.
pub fn build(focus: &FocusManager) -> Demo {
    let requests = focus.requests();
    let state = Rc::new(DemoState {
        volume: Cell::new(70),
        hints: Cell::new(true),
        ..DemoState::default()
    });

    let options: SurfaceRef = Rc::new(RefCell::new(OptionsDialog {
        state: state.clone(),
        requests: requests.clone(),
        menu: NavigableMenu::new(),
    }));
    let confirm_quit: SurfaceRef = Rc::new(RefCell::new(QuitDialog {
        state: state.clone(),
        requests: requests.clone(),
        menu: NavigableMenu::new(),
    }));
    let credits = Rc::new(RefCell::new(Credits {
        requests: requests.clone(),
        home: Weak::<RefCell<TitleScreen>>::new(),
        menu: NavigableMenu::new(),
    }));
    let credits_ref: SurfaceRef = credits.clone();

    let title: SurfaceRef = Rc::new(RefCell::new(TitleScreen {
        state: state.clone(),
        requests,
        options,
        confirm_quit,
        credits: credits_ref,
        menu: NavigableMenu::new().with_wrap(true),
    }));
    credits.borrow_mut().home = Rc::downgrade(&title);

    Demo { state, title }
}

struct TitleScreen {
    state: Rc<DemoState>,
    requests: FocusRequests,
    options: SurfaceRef,
    confirm_quit: SurfaceRef,
    credits: SurfaceRef,
    menu: NavigableMenu,
}

impl Surface for TitleScreen {
    fn name(&self) -> String {
        "Voicenav demo".to_string()
    }

    fn menu(&self) -> &NavigableMenu {
        &self.menu
    }

    fn menu_mut(&mut self) -> &mut NavigableMenu {
        &mut self.menu
    }

    fn build_menu(&mut self) {
        let shown = self.state.clone();
        let played = self.state.clone();
        let requests = self.requests.clone();
        let options = self.options.clone();
        let credits_requests = self.requests.clone();
        let credits = self.credits.clone();
        let quit_requests = self.requests.clone();
        let confirm_quit = self.confirm_quit.clone();

        self.menu.rebuild_preserving([
            MenuOption::new(move || match shown.plays.get() {
                0 => "Play".to_string(),
                1 => "Play, played once".to_string(),
                n => format!("Play, played {n} times"),
            })
            .with_hotkey("p")
            .with_confirm(move || played.plays.set(played.plays.get() + 1)),
            MenuOption::label("Options")
                .with_hotkey("o")
                .with_confirm(move || requests.show_overlay(options.clone())),
            MenuOption::label("Credits")
                .with_hotkey("c")
                .with_confirm(move || credits_requests.set_screen(credits.clone())),
            MenuOption::label("Quit")
                .with_hotkey("q")
                .with_confirm(move || quit_requests.show_overlay(confirm_quit.clone())),
        ]);
    }

    fn on_help(&mut self, sink: &mut dyn AnnouncementSink) -> bool {
        if !self.state.hints.get() {
            return false;
        }
        sink.speak(
            "Title screen. Up and Down move, Enter chooses, letters jump to an item.",
            true,
        );
        true
    }

    fn on_back(&mut self, sink: &mut dyn AnnouncementSink) -> bool {
        sink.speak("Already at the title screen.", true);
        true
    }
}

struct OptionsDialog {
    state: Rc<DemoState>,
    requests: FocusRequests,
    menu: NavigableMenu,
}

impl Surface for OptionsDialog {
    fn name(&self) -> String {
        "Options".to_string()
    }

    fn menu(&self) -> &NavigableMenu {
        &self.menu
    }

    fn menu_mut(&mut self) -> &mut NavigableMenu {
        &mut self.menu
    }

    fn build_menu(&mut self) {
        let volume = self.state.clone();
        let adjust_volume = self.state.clone();
        let hints = self.state.clone();
        let toggle_hints = self.state.clone();
        let requests = self.requests.clone();

        self.menu.rebuild([
            MenuOption::new(move || format!("Volume {}%", volume.volume.get())).with_adjust(
                move |delta| {
                    let next = (adjust_volume.volume.get() + delta * 5).clamp(0, 100);
                    adjust_volume.volume.set(next);
                },
            ),
            MenuOption::new(move || {
                let state = if hints.hints.get() { "on" } else { "off" };
                format!("Spoken hints, {state}")
            })
            .with_confirm(move || toggle_hints.hints.set(!toggle_hints.hints.get())),
            MenuOption::label("Close").with_confirm(move || requests.pop_overlay()),
        ]);
    }

    fn on_help(&mut self, sink: &mut dyn AnnouncementSink) -> bool {
        sink.speak(
            "Options. Left and Right change the volume. Enter toggles hints. Escape closes.",
            true,
        );
        true
    }
}

struct QuitDialog {
    state: Rc<DemoState>,
    requests: FocusRequests,
    menu: NavigableMenu,
}

impl Surface for QuitDialog {
    fn name(&self) -> String {
        "Quit the demo?".to_string()
    }

    fn menu(&self) -> &NavigableMenu {
        &self.menu
    }

    fn menu_mut(&mut self) -> &mut NavigableMenu {
        &mut self.menu
    }

    fn build_menu(&mut self) {
        let state = self.state.clone();
        let requests = self.requests.clone();
        self.menu.rebuild([
            MenuOption::label("No")
                .with_hotkey("n")
                .with_confirm(move || requests.pop_overlay()),
            MenuOption::label("Yes")
                .with_hotkey("y")
                .with_confirm(move || state.quit.set(true)),
        ]);
    }
}

struct Credits {
    requests: FocusRequests,
    home: Weak<RefCell<dyn Surface>>,
    menu: NavigableMenu,
}

impl Surface for Credits {
    fn name(&self) -> String {
        "Credits".to_string()
    }

    fn menu(&self) -> &NavigableMenu {
        &self.menu
    }

    fn menu_mut(&mut self) -> &mut NavigableMenu {
        &mut self.menu
    }

    fn build_menu(&mut self) {
        self.menu.rebuild([
            MenuOption::label("Written in Rust"),
            MenuOption::label("Speech goes to your terminal"),
            MenuOption::label("Press Escape to return").with_read(
                |sink: &mut dyn AnnouncementSink| {
                    sink.speak("Press Escape to return to the title screen.", true);
                },
            ),
        ]);
    }

    fn on_back(&mut self, _sink: &mut dyn AnnouncementSink) -> bool {
        match self.home.upgrade() {
            Some(home) => {
                self.requests.set_screen(home);
                true
            }
            None => false,
        }
    }
}
