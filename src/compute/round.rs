//! Round state machine: idle → ready → countdown → playing → gameover → idle.
//!
//! The fall-in and countdown are counted in ticks so a whole intro is
//! deterministic and needs no wall-clock timers.

use tracing::{debug, info};

use crate::compute::GameEvent;
use crate::constants::{
    AERIAL_INTERVAL_MIN, COUNTDOWN_STEPS, COUNTDOWN_STEP_TICKS, FALL_IN_TICKS, INITIALS_LEN,
    INITIAL_LIVES, PLAYER_H,
};
use crate::entities::{GameOverState, GameState, Phase, Player, Playfield, Standing};
use crate::leaderboard::{Initials, LeaderboardEntry};

/// Wipe every piece of per-round data and bump the round id.
pub fn reset_round(state: &mut GameState) {
    state.round = state.round.wrapping_add(1);
    state.player = Player::grounded(&state.field);
    state.entities.clear();
    state.projectiles.clear();
    state.particles.clear();
    state.explosions.clear();
    state.score = 0;
    state.lives = INITIAL_LIVES;
    state.speed_multiplier = 1.0;
    state.collected = 0;
    state.spawn_timer = 0.0;
    state.aerial_timer = 0.0;
    state.next_aerial_in = AERIAL_INTERVAL_MIN;
    state.elapsed = 0.0;
}

/// idle → ready.  Returns false (and does nothing) outside `Idle`.
pub fn start(state: &mut GameState) -> bool {
    if state.phase != Phase::Idle {
        return false;
    }
    reset_round(state);
    state.player.y = fall_in_start();
    state.player.on_ground = false;
    state.phase = Phase::Ready { ticks: 0 };
    info!(round = state.round, "round ready");
    true
}

fn fall_in_start() -> f32 {
    -PLAYER_H
}

/// Step the fall-in and the countdown by one tick.
pub fn advance_intro(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.phase {
        Phase::Ready { ticks } => {
            let ticks = ticks + 1;
            let floor = state.field.player_floor();
            if ticks >= FALL_IN_TICKS {
                state.player.y = floor;
                state.player.on_ground = true;
                state.phase = Phase::Countdown {
                    step: COUNTDOWN_STEPS - 1,
                    ticks: 0,
                };
                debug!(round = state.round, "countdown");
            } else {
                // Ease-in: slow at the top, fast on landing.
                let t = ticks as f32 / FALL_IN_TICKS as f32;
                let start = fall_in_start();
                state.player.y = start + (floor - start) * t * t;
                state.phase = Phase::Ready { ticks };
            }
        }
        Phase::Countdown { step, ticks } => {
            let ticks = ticks + 1;
            if ticks < COUNTDOWN_STEP_TICKS {
                state.phase = Phase::Countdown { step, ticks };
            } else if step > 0 {
                state.phase = Phase::Countdown {
                    step: step - 1,
                    ticks: 0,
                };
            } else {
                state.phase = Phase::Playing;
                info!(round = state.round, "round playing");
                events.push(GameEvent::RoundStarted { round: state.round });
            }
        }
        Phase::Idle | Phase::Playing | Phase::GameOver(_) => {}
    }
}

/// playing → gameover.  Power-up flags are dropped so the frozen frame shows
/// no thrust.
pub fn enter_game_over(state: &mut GameState) -> GameEvent {
    state.player.jetpack_active = false;
    state.player.charge = None;
    state.player.diving = false;
    state.phase = Phase::GameOver(GameOverState::new());
    info!(round = state.round, score = state.score, "game over");
    GameEvent::GameOver {
        round: state.round,
        score: state.score,
    }
}

/// gameover → idle.  Returns false outside `GameOver`.
pub fn exit(state: &mut GameState) -> bool {
    if state.game_over().is_none() {
        return false;
    }
    reset_round(state);
    state.phase = Phase::Idle;
    info!(round = state.round, "back to idle");
    true
}

/// gameover → idle → ready in one step.
pub fn replay(state: &mut GameState) -> bool {
    exit(state) && start(state)
}

/// Playfield changed size.  Out-of-bounds entities are culled on the next tick.
pub fn resize(state: &mut GameState, field: Playfield) {
    state.field = field;
    let player = &mut state.player;
    player.x = player.x.clamp(0.0, field.max_player_x());
    let floor = field.player_floor();
    if player.on_ground || player.y > floor {
        player.y = floor;
    }
    debug!(width = field.width, height = field.height, "playfield resized");
}

// ── Name entry ────────────────────────────────────────────────────────────────

/// Append an uppercase letter to the name buffer while entry is open.
pub fn push_name_char(state: &mut GameState, c: char) -> bool {
    let Some(over) = state.game_over_mut() else {
        return false;
    };
    if !over.name_entry_open() || over.name.len() >= INITIALS_LEN || !c.is_ascii_alphabetic() {
        return false;
    }
    over.name.push(c.to_ascii_uppercase());
    true
}

pub fn pop_name_char(state: &mut GameState) {
    if let Some(over) = state.game_over_mut() {
        if over.name_entry_open() {
            over.name.pop();
        }
    }
}

/// Close name entry and hand back the initials to submit.  `None` unless
/// entry is open and exactly three letters were typed; after a successful
/// call the round can never submit again.
pub fn take_submission(state: &mut GameState) -> Option<Initials> {
    let over = state.game_over_mut()?;
    if !over.name_entry_open() {
        return None;
    }
    let initials = Initials::parse(&over.name).ok()?;
    over.standing = Standing::Submitted;
    Some(initials)
}

// ── Leaderboard answers ───────────────────────────────────────────────────────

fn current_game_over(state: &mut GameState, round: u32) -> Option<&mut GameOverState> {
    if state.round != round {
        return None;
    }
    state.game_over_mut()
}

/// Apply a top-N answer.  Ignored when the round has moved on.
pub fn apply_standing(
    state: &mut GameState,
    round: u32,
    top: Vec<LeaderboardEntry>,
    qualifies: Option<bool>,
) -> bool {
    let Some(over) = current_game_over(state, round) else {
        debug!(round, "stale leaderboard standing dropped");
        return false;
    };
    if over.standing != Standing::Pending {
        return false;
    }
    over.top = top;
    over.standing = match qualifies {
        Some(true) => Standing::Qualifies,
        Some(false) => Standing::NotQualifying,
        None => Standing::Unavailable,
    };
    true
}

/// Apply a submission result.  A failure is shown as unavailable; the score
/// itself is unaffected.  On success the refreshed top-N replaces the old one.
pub fn apply_submitted(
    state: &mut GameState,
    round: u32,
    ok: bool,
    top: Vec<LeaderboardEntry>,
) -> bool {
    let Some(over) = current_game_over(state, round) else {
        return false;
    };
    if ok {
        if !top.is_empty() {
            over.top = top;
        }
    } else if over.standing == Standing::Submitted {
        over.standing = Standing::Unavailable;
    }
    true
}
