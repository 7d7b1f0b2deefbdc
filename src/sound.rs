//! Best-effort sound cues
//!
//! Sinks are fire-and-forget: a cue that cannot be played is logged at debug
//! level and dropped, never reported back to the game.

use std::io::Write;

use crate::game::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
}

impl From<&GameEvent> for SoundCue {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::Ate => SoundCue::Eat,
            GameEvent::GameOver(_) => SoundCue::GameOver,
        }
    }
}

pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Rings the terminal bell
///
/// Eating rings once; game over rings twice.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SoundSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        let bells: &[u8] = match cue {
            SoundCue::Eat => b"\x07",
            SoundCue::GameOver => b"\x07\x07",
        };
        if let Err(err) = self.out.write_all(bells).and_then(|_| self.out.flush()) {
            tracing::debug!(error = %err, ?cue, "sound cue dropped");
        }
    }
}

/// Plays nothing
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Sink for the configured sound setting
pub fn sink(enabled: bool) -> Box<dyn SoundSink> {
    if enabled {
        Box::new(TerminalBell::new(std::io::stdout()))
    } else {
        Box::new(Silent)
    }
}
