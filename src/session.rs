//! One running game: simulation state plus the ports it talks to.
//!
//! The frame loop feeds key events in with [`Session::key_event`] and calls
//! [`Session::frame`] once per animation frame.  Everything with side effects
//! (sound, leaderboard) is dispatched here from the events `compute::tick`
//! returns, so the compute layer stays free of I/O.

use std::time::Duration;

use crossterm::event::KeyEvent;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::audio::{Audio, Cue};
use crate::compute::{self, round, GameEvent};
use crate::entities::{GameState, Hud, Phase, Playfield};
use crate::input::{Command, InputFrame, InputRouter};
use crate::leaderboard::{LeaderboardClient, Request, Response};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<A: Audio> {
    state: GameState,
    router: InputRouter,
    rng: StdRng,
    audio: A,
    leaderboard: LeaderboardClient,
    hud: Hud,
}

impl<A: Audio> Session<A> {
    pub fn new(field: Playfield, rng: StdRng, audio: A, leaderboard: LeaderboardClient) -> Self {
        let state = GameState::new(field);
        let hud = state.hud();
        leaderboard.send(Request::Best);
        Self {
            state,
            router: InputRouter::new(),
            rng,
            audio,
            leaderboard,
            hud,
        }
    }

    pub fn with_router(mut self, router: InputRouter) -> Self {
        self.router = router;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for headless drivers that stage a scene.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Display copy of score/lives/fuel as of the last completed frame.
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn key_event(&mut self, key: KeyEvent) -> Flow {
        match self.router.handle_key(key) {
            Some(command) => self.command(command),
            None => Flow::Continue,
        }
    }

    pub fn command(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::Back => match self.state.phase {
                Phase::Idle => return Flow::Quit,
                Phase::GameOver(_) => {
                    round::exit(&mut self.state);
                    self.router.clear();
                }
                Phase::Ready { .. } | Phase::Countdown { .. } | Phase::Playing => {}
            },
            Command::Start => {
                if round::start(&mut self.state) {
                    self.router.clear();
                }
            }
            Command::Replay => {
                if round::replay(&mut self.state) {
                    self.router.clear();
                }
            }
            Command::NameChar(c) => {
                round::push_name_char(&mut self.state, c);
            }
            Command::NameBackspace => round::pop_name_char(&mut self.state),
            Command::NameSubmit => {
                if let Some(initials) = round::take_submission(&mut self.state) {
                    info!(round = self.state.round, %initials, "submitting score");
                    self.leaderboard.send(Request::Submit {
                        round: self.state.round,
                        initials,
                        score: self.state.score,
                    });
                }
            }
        }
        self.sync_capture();
        Flow::Continue
    }

    /// Advance one animation frame by `dt` seconds.
    pub fn frame(&mut self, dt: f32) {
        let input = self.router.sample();
        self.step(&input, dt);
    }

    /// Same as [`Session::frame`] with an explicit input sample.
    pub fn step(&mut self, input: &InputFrame, dt: f32) {
        if self.state.phase == Phase::Idle && input.any_pressed() {
            round::start(&mut self.state);
        }

        let events = compute::tick(&mut self.state, input, dt, &mut self.rng);
        for event in &events {
            self.dispatch(event);
        }

        self.poll_leaderboard();
        self.sync_capture();
        self.hud = self.state.hud();
    }

    pub fn resize(&mut self, field: Playfield) {
        round::resize(&mut self.state, field);
    }

    fn dispatch(&mut self, event: &GameEvent) {
        if let Some(cue) = Cue::for_event(event) {
            if let Err(e) = self.audio.play(cue) {
                debug!(error = %e, ?cue, "sound cue failed");
            }
        }
        if let GameEvent::GameOver { round, score } = *event {
            self.router.clear();
            self.leaderboard.send(Request::Standing { round, score });
        }
    }

    /// Apply every leaderboard answer that has arrived.  Never blocks.
    pub fn poll_leaderboard(&mut self) {
        while let Some(response) = self.leaderboard.try_recv() {
            self.apply(response);
        }
    }

    /// Wait up to `timeout` for one answer and apply it.  For headless
    /// drivers; the interactive loop only polls.
    pub fn await_leaderboard(&mut self, timeout: Duration) -> bool {
        match self.leaderboard.recv_timeout(timeout) {
            Some(response) => {
                self.apply(response);
                self.sync_capture();
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, response: Response) {
        match response {
            Response::Standing {
                round,
                top,
                qualifies,
            } => {
                round::apply_standing(&mut self.state, round, top, qualifies);
            }
            Response::Submitted { round, ok, top } => {
                if let Some(best) = top.first() {
                    self.state.best_score = self.state.best_score.max(best.score);
                }
                round::apply_submitted(&mut self.state, round, ok, top);
            }
            Response::Best(best) => {
                if let Some(best) = best {
                    self.state.best_score = self.state.best_score.max(best);
                }
            }
        }
    }

    fn sync_capture(&mut self) {
        let open = self
            .state
            .game_over()
            .map(|over| over.name_entry_open())
            .unwrap_or(false);
        self.router.set_text_capture(open);
    }
}
