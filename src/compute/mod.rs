//! Game logic.
//!
//! `tick` takes the whole `GameState` by exclusive reference and advances it
//! by `dt` seconds.  Side effects are limited to the injected RNG; everything
//! the outside world should react to (sounds, leaderboard calls) comes back
//! as a list of `GameEvent`s.

pub mod collision;
pub mod effects;
pub mod physics;
pub mod round;
pub mod score;
pub mod spawn;

use rand::Rng;

use crate::entities::{EntityKind, GameState, Phase};
use crate::input::InputFrame;

/// Something that happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped,
    Fired,
    Pickup(EntityKind),
    /// Player lost a life.
    Hit,
    /// A projectile destroyed a hazard.
    HazardShot,
    /// An aerial hazard reached the ground.
    Explosion,
    /// Countdown reached GO.
    RoundStarted { round: u32 },
    GameOver { round: u32, score: u32 },
}

/// Advance the simulation by one frame.
pub fn tick(
    state: &mut GameState,
    input: &InputFrame,
    dt: f32,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    state.frame += 1;
    let mut events = Vec::new();

    match state.phase {
        Phase::Idle => {}
        Phase::Ready { .. } | Phase::Countdown { .. } => {
            round::advance_intro(state, &mut events);
        }
        Phase::Playing => simulate(state, input, dt, rng, &mut events),
        Phase::GameOver(_) => {
            // Entities stay frozen; let the last bursts play out.
            effects::update_particles(&mut state.particles, &state.field, dt);
            effects::update_explosions(&mut state.explosions, dt);
        }
    }

    events
}

fn simulate(
    state: &mut GameState,
    input: &InputFrame,
    dt: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    state.elapsed += dt;

    // ── 1. Player control & motion ───────────────────────────────────────────
    physics::steer_player(state, input, dt, events);
    physics::integrate_player(state, dt, rng);
    physics::fire(state, input, dt, events);

    // ── 2. Spawning ──────────────────────────────────────────────────────────
    spawn::tick_spawner(state, dt, rng);
    spawn::tick_aerial_spawner(state, dt, rng);

    // ── 3. Move everything else ──────────────────────────────────────────────
    physics::integrate_entities(state, dt, rng, events);
    physics::integrate_projectiles(state, dt);
    effects::update_particles(&mut state.particles, &state.field, dt);
    effects::update_explosions(&mut state.explosions, dt);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    collision::resolve_projectiles(state, rng, events);
    collision::resolve_player_entities(state, rng, events);
    collision::resolve_explosions(state, rng, events);

    // ── 5. Game over ─────────────────────────────────────────────────────────
    if state.lives == 0 {
        events.push(round::enter_game_over(state));
    }
}
