//! Console stand-in for a screen reader.

use std::io::Write;

use tracing::warn;
use voicenav_widgets::AnnouncementSink;

/// Prints each announcement on its own line. Interrupting speech is marked
/// with `>>`, queued speech is indented.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn speak_now(&mut self, text: &str) {
        self.speak(text, true);
    }
}

impl<W: Write> AnnouncementSink for ConsoleSink<W> {
    fn speak(&mut self, text: &str, interrupt: bool) {
        let marker = if interrupt { ">>" } else { "  " };
        // Raw mode: carriage return is not implied by newline.
        let written = write!(self.out, "{marker} {text}\r\n").and_then(|()| self.out.flush());
        if let Err(error) = written {
            warn!(%error, "speech output failed");
        }
    }
}
