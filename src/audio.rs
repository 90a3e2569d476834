//! Sound cues.  Playback is best effort: a failing device is logged by the
//! caller and the game carries on.

use std::io::Write;

use crate::compute::GameEvent;
use crate::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Fire,
    Pickup,
    Hit,
    Explosion,
    GameOver,
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Jumped => Some(Cue::Jump),
            GameEvent::Fired => Some(Cue::Fire),
            GameEvent::Pickup(_) => Some(Cue::Pickup),
            GameEvent::Hit => Some(Cue::Hit),
            GameEvent::HazardShot | GameEvent::Explosion => Some(Cue::Explosion),
            GameEvent::GameOver { .. } => Some(Cue::GameOver),
            GameEvent::RoundStarted { .. } => None,
        }
    }
}

pub trait Audio {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
}

impl<A: Audio + ?Sized> Audio for Box<A> {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        (**self).play(cue)
    }
}

#[derive(Debug, Default)]
pub struct Silent;

impl Audio for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Rings the terminal bell on hits and game over; other cues are dropped.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Audio for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        match cue {
            Cue::Hit | Cue::GameOver => {
                self.out.write_all(b"\x07")?;
                self.out.flush()?;
                Ok(())
            }
            Cue::Jump | Cue::Fire | Cue::Pickup | Cue::Explosion => Ok(()),
        }
    }
}
