mod screens;
mod speech;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode as CtKeyCode, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voicenav_core::KeyEvent;
use voicenav_runtime::logging::ENV_LOG;
use voicenav_runtime::{DispatcherConfig, InputDispatcher};
use voicenav_widgets::FocusManager;

use speech::ConsoleSink;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> io::Result<()> {
    // Logs go to stderr so speech on stdout stays readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env(ENV_LOG))
        .with_writer(io::stderr)
        .try_init();

    let parsed = DispatcherConfig::from_env_with_diagnostics();
    for error in &parsed.errors {
        warn!(%error, "ignoring invalid setting");
    }

    terminal::enable_raw_mode()?;
    // Key release events need the kitty keyboard protocol.
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
    info!(enhanced, "terminal ready");

    let result = run(InputDispatcher::new(parsed.config), enhanced);

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    terminal::disable_raw_mode()?;
    result
}

fn run(mut dispatcher: InputDispatcher, enhanced: bool) -> io::Result<()> {
    let mut focus = FocusManager::new();
    let mut sink = ConsoleSink::new(io::stdout());
    let demo = screens::build(&focus);

    focus.set_screen(demo.title.clone(), &mut sink);

    let mut last = Instant::now();
    while !demo.state.quit.get() {
        if event::poll(FRAME)?
            && let Event::Key(key) = event::read()?
        {
            if key.code == CtKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if let Some(key) = KeyEvent::from_crossterm(key) {
                dispatcher.handle_key(&key, &mut focus, &mut sink);
                // Without release events a held key would never stop
                // repeating; the terminal's own auto-repeat covers it.
                if !enhanced && key.is_press() {
                    dispatcher.release_all();
                }
            }
        }

        let now = Instant::now();
        dispatcher.tick(now.duration_since(last), &mut focus, &mut sink);
        last = now;
    }

    sink.speak_now("Goodbye.");
    info!(
        plays = demo.state.plays.get(),
        volume = demo.state.volume.get(),
        "demo finished"
    );
    Ok(())
}
