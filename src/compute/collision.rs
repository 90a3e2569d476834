//! Hit testing.  Boxes for player ↔ entity, circles for projectile ↔ hazard
//! and ground explosion ↔ player.

use rand::Rng;
use tracing::debug;

use crate::compute::{effects, score, GameEvent};
use crate::constants::{
    HIT_BURST, PLAYER_H, PLAYER_HIT_RADIUS, PLAYER_W, PROJECTILE_HIT_RADIUS, SHOT_BURST,
};
use crate::entities::{Entity, GameState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn of_entity(e: &Entity) -> Self {
        Self {
            x: e.x,
            y: e.y,
            w: e.width,
            h: e.height,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

pub fn within(ax: f32, ay: f32, bx: f32, by: f32, radius: f32) -> bool {
    let (dx, dy) = (ax - bx, ay - by);
    dx * dx + dy * dy < radius * radius
}

fn player_rect(state: &GameState) -> Rect {
    Rect {
        x: state.player.x,
        y: state.player.y,
        w: PLAYER_W,
        h: PLAYER_H,
    }
}

/// Player against every live entity.  Anything touched is consumed this tick.
/// After the hit that empties the last life, remaining entities are left
/// untouched.
pub fn resolve_player_entities(
    state: &mut GameState,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let hitbox = player_rect(state);
    let mut entities = std::mem::take(&mut state.entities);

    entities.retain(|e| {
        if state.lives == 0 || !hitbox.overlaps(&Rect::of_entity(e)) {
            return true;
        }
        if e.kind.is_hazard() {
            score::lose_life(state);
            let (cx, cy) = state.player.center();
            effects::burst(&mut state.particles, rng, cx, cy, HIT_BURST, effects::HIT_RED);
            debug!(kind = ?e.kind, lives = state.lives, "player hit");
            events.push(GameEvent::Hit);
        } else {
            score::apply_pickup(state, e.kind);
            events.push(GameEvent::Pickup(e.kind));
        }
        false
    });

    state.entities = entities;
}

/// Projectiles against hazards.  The first hazard within range absorbs the
/// projectile; both disappear.
pub fn resolve_projectiles(state: &mut GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let mut projectiles = std::mem::take(&mut state.projectiles);

    projectiles.retain(|p| {
        let target = state.entities.iter().position(|e| {
            let (cx, cy) = e.center();
            e.kind.is_hazard() && within(p.x, p.y, cx, cy, PROJECTILE_HIT_RADIUS)
        });
        let Some(index) = target else {
            return true;
        };
        let hazard = state.entities.remove(index);
        let (cx, cy) = hazard.center();
        score::award_shot(state);
        effects::burst(&mut state.particles, rng, cx, cy, SHOT_BURST, effects::SPARK_YELLOW);
        events.push(GameEvent::HazardShot);
        false
    });

    state.projectiles = projectiles;
}

/// Ground explosions against the player.  Each explosion deducts at most one
/// life and is expired on the spot.
pub fn resolve_explosions(state: &mut GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let (px, py) = state.player.center();
    let mut explosions = std::mem::take(&mut state.explosions);

    explosions.retain(|ex| {
        if state.lives == 0 || !within(px, py, ex.x, ex.y, ex.radius() + PLAYER_HIT_RADIUS) {
            return true;
        }
        score::lose_life(state);
        effects::burst(&mut state.particles, rng, px, py, HIT_BURST, effects::HIT_RED);
        debug!(lives = state.lives, "caught by ground explosion");
        events.push(GameEvent::Hit);
        false
    });

    state.explosions = explosions;
}
