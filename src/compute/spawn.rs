//! Entity spawner: lane entities on a shrinking interval, plus aerial hazards
//! once the score is high enough.

use std::f32::consts::TAU;

use rand::Rng;
use tracing::debug;

use crate::constants::{
    AERIAL_DRIFT_SPEED, AERIAL_H, AERIAL_INTERVAL_MAX, AERIAL_INTERVAL_MIN,
    AERIAL_SCORE_THRESHOLD, AERIAL_W, DIAGONAL_SCORE_THRESHOLD, ENTITY_H, ENTITY_SPEED, ENTITY_W,
    FLOAT_AMPLITUDE, LANE_COUNT, PICKUP_SPEED, SPAWN_INTERVAL_BASE, SPAWN_INTERVAL_FLOOR,
    SPAWN_INTERVAL_STEP, SPAWN_WEIGHTS, SPEED_JITTER,
};
use crate::entities::{Entity, EntityKind, GameState, Motion};

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Seconds between lane spawns for a given speed multiplier.
pub fn spawn_interval(multiplier: f32) -> f32 {
    (SPAWN_INTERVAL_BASE - (multiplier - 1.0) * SPAWN_INTERVAL_STEP).max(SPAWN_INTERVAL_FLOOR)
}

fn weight_total() -> u32 {
    SPAWN_WEIGHTS.iter().sum()
}

/// Map a roll in `0..weight_total()` onto the weighted spawn table.
pub fn kind_for_roll(roll: u32) -> EntityKind {
    let mut acc = 0;
    for (kind, weight) in EntityKind::SPAWN_TABLE.iter().zip(SPAWN_WEIGHTS) {
        acc += weight;
        if roll < acc {
            return *kind;
        }
    }
    EntityKind::Collectible
}

// ── Lane spawner ─────────────────────────────────────────────────────────────

pub fn tick_spawner(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    state.spawn_timer += dt;
    if state.spawn_timer > spawn_interval(state.speed_multiplier) {
        state.spawn_timer = 0.0;
        let kind = kind_for_roll(rng.gen_range(0..weight_total()));
        let lane = rng.gen_range(0..LANE_COUNT);
        spawn_lane_entity(state, kind, lane, rng);
    }
}

/// Place `kind` at the right edge of the playfield in `lane`.
pub fn spawn_lane_entity(state: &mut GameState, kind: EntityKind, lane: usize, rng: &mut impl Rng) {
    let x = state.field.width;
    let y = state.field.lane_y(lane);

    let (y, speed, motion) = if kind.is_floating_pickup() {
        // The lowest point of the bob stays inside the field.
        let base_y = y.min(state.field.height - ENTITY_H - FLOAT_AMPLITUDE);
        let phase = rng.gen_range(0.0..TAU);
        (base_y, PICKUP_SPEED, Motion::Float { base_y, phase })
    } else {
        let jitter = rng.gen_range(-SPEED_JITTER..=SPEED_JITTER);
        (y, ENTITY_SPEED + jitter, Motion::Drift)
    };

    debug!(?kind, lane, speed, "spawn");
    state.entities.push(Entity {
        kind,
        x,
        y,
        width: ENTITY_W,
        height: ENTITY_H,
        speed,
        motion,
    });
}

// ── Aerial spawner ───────────────────────────────────────────────────────────

pub fn next_aerial_interval(rng: &mut impl Rng) -> f32 {
    rng.gen_range(AERIAL_INTERVAL_MIN..=AERIAL_INTERVAL_MAX)
}

pub fn tick_aerial_spawner(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    if state.score < AERIAL_SCORE_THRESHOLD {
        return;
    }
    state.aerial_timer += dt;
    if state.aerial_timer >= state.next_aerial_in {
        state.aerial_timer = 0.0;
        state.next_aerial_in = next_aerial_interval(rng);
        spawn_aerial(state, rng);
    }
}

/// Drop an aerial hazard from the top.  Past the diagonal threshold about
/// half of them come in from a side edge instead of straight down.
pub fn spawn_aerial(state: &mut GameState, rng: &mut impl Rng) {
    let field = state.field;
    let y = field.ceiling();
    let max_x = (field.width - AERIAL_W).max(0.0);

    let diagonal = state.score >= DIAGONAL_SCORE_THRESHOLD && rng.gen_bool(0.5);
    let (x, vx) = if diagonal {
        if rng.gen_bool(0.5) {
            (0.0, AERIAL_DRIFT_SPEED)
        } else {
            (max_x, -AERIAL_DRIFT_SPEED)
        }
    } else {
        (rng.gen_range(0.0..=max_x), 0.0)
    };

    debug!(x, vx, "spawn aerial hazard");
    state.entities.push(Entity {
        kind: EntityKind::HazardAerial,
        x,
        y,
        width: AERIAL_W,
        height: AERIAL_H,
        speed: 0.0,
        motion: Motion::Fall { vx, vy: 0.0 },
    });
}
