//! Score & lives controller.  Every change to score, lives, power-ups or the
//! speed multiplier caused by a collision goes through here.

use crate::constants::{
    COLLECTIBLE_SCORE, MAX_FUEL, MAX_GUNS, MAX_LIVES, MIN_MULTIPLIER, MULTIPLIER_STEP,
    SHOT_BONUS, SLOW_STEP,
};
use crate::entities::{EntityKind, GameState};

/// Hazard contact: strip power-ups and take one life.  Returns `true` only on
/// the hit that brings lives to zero; once at zero further hits are no-ops.
pub fn lose_life(state: &mut GameState) -> bool {
    if state.lives == 0 {
        return false;
    }
    state.player.guns = 0;
    state.player.fuel = 0.0;
    state.player.jetpack_active = false;
    state.lives -= 1;
    state.lives == 0
}

pub fn collect(state: &mut GameState) {
    state.score = state.score.saturating_add(COLLECTIBLE_SCORE);
    state.collected += 1;
    state.speed_multiplier += MULTIPLIER_STEP;
}

pub fn award_shot(state: &mut GameState) {
    state.score = state.score.saturating_add(SHOT_BONUS);
}

/// Apply a non-hazard pickup.  Lives are never reduced here.
pub fn apply_pickup(state: &mut GameState, kind: EntityKind) {
    match kind {
        EntityKind::Collectible => collect(state),
        EntityKind::Heart => state.lives = (state.lives + 1).min(MAX_LIVES),
        EntityKind::GunPickup => state.player.guns = (state.player.guns + 1).min(MAX_GUNS),
        EntityKind::JetpackPickup => state.player.fuel = MAX_FUEL,
        EntityKind::SlowPickup => {
            state.speed_multiplier = (state.speed_multiplier - SLOW_STEP).max(MIN_MULTIPLIER);
        }
        EntityKind::HazardGround | EntityKind::HazardAerial => {}
    }
}
