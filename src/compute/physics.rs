//! Player control, gravity/jetpack integration, entity and projectile motion.

use rand::Rng;

use crate::compute::{effects, GameEvent};
use crate::constants::{
    AERIAL_GRAVITY, DIVE_GRAVITY_FACTOR, DOUBLE_JUMP_VELOCITY, EXPLOSION_BURST, FIRE_COOLDOWN,
    FLOAT_AMPLITUDE, FLOAT_FREQUENCY, GRAVITY, JETPACK_DRAIN, JETPACK_MAX_RISE, JETPACK_THRUST,
    JUMP_CHARGE_BONUS, JUMP_CHARGE_WINDOW, JUMP_VELOCITY, PLAYER_H, PLAYER_SPEED, PLAYER_W,
    PROJECTILE_SPEED, SPRINT_FACTOR,
};
use crate::entities::{Entity, GameState, Motion, Player, Projectile};
use crate::input::{Edge, InputFrame, Intent};

// ── Player control ───────────────────────────────────────────────────────────

/// Initial upward speed for a jump launched after `charge` seconds.
pub fn launch_velocity(charge: f32) -> f32 {
    let t = (charge / JUMP_CHARGE_WINDOW).clamp(0.0, 1.0);
    JUMP_VELOCITY + JUMP_CHARGE_BONUS * t
}

fn launch(player: &mut Player, events: &mut Vec<GameEvent>) {
    let charge = player.charge.take().unwrap_or(0.0);
    player.vy = -launch_velocity(charge);
    player.on_ground = false;
    events.push(GameEvent::Jumped);
}

/// Apply this tick's intents: horizontal movement, jump charge/double jump,
/// jetpack on/off and dive.
pub fn steer_player(state: &mut GameState, input: &InputFrame, dt: f32, events: &mut Vec<GameEvent>) {
    let max_x = state.field.max_player_x();
    let player = &mut state.player;

    let mut direction = 0.0;
    if input.held(Intent::MoveLeft) {
        direction -= 1.0;
    }
    if input.held(Intent::MoveRight) {
        direction += 1.0;
    }
    let speed = if input.held(Intent::Sprint) {
        PLAYER_SPEED * SPRINT_FACTOR
    } else {
        PLAYER_SPEED
    };
    player.x = (player.x + direction * speed * dt).clamp(0.0, max_x);

    for edge in &input.edges {
        match *edge {
            Edge::Pressed(Intent::Jump) => {
                if player.on_ground {
                    if player.charge.is_none() {
                        player.charge = Some(0.0);
                    }
                } else if player.fuel > 0.0 {
                    player.jetpack_active = true;
                } else if !player.double_jumped {
                    player.double_jumped = true;
                    player.vy = -DOUBLE_JUMP_VELOCITY;
                    events.push(GameEvent::Jumped);
                }
            }
            Edge::Released(Intent::Jump) => {
                if player.charge.is_some() {
                    launch(player, events);
                }
                player.jetpack_active = false;
            }
            Edge::Pressed(Intent::Dive) => {
                if !player.on_ground {
                    player.diving = true;
                    player.jetpack_active = false;
                }
            }
            Edge::Released(Intent::Dive) => player.diving = false,
            Edge::Pressed(_) | Edge::Released(_) => {}
        }
    }

    if let Some(charge) = player.charge {
        let charge = charge + dt;
        player.charge = Some(charge);
        if charge >= JUMP_CHARGE_WINDOW {
            launch(player, events);
        }
    }
}

/// Gravity, jetpack thrust, ceiling and landing.
pub fn integrate_player(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let floor = state.field.player_floor();
    let ceiling = state.field.ceiling();
    let player = &mut state.player;

    if player.on_ground {
        player.y = floor;
        player.vy = 0.0;
        return;
    }

    if player.jetpack_active && player.fuel > 0.0 {
        player.vy = (player.vy - JETPACK_THRUST * dt).max(-JETPACK_MAX_RISE);
        player.fuel = (player.fuel - JETPACK_DRAIN * dt).max(0.0);
        if player.fuel <= 0.0 {
            player.jetpack_active = false;
        }
        let (cx, _) = player.center();
        effects::thrust_trail(&mut state.particles, rng, cx, player.y + PLAYER_H);
    } else {
        player.jetpack_active = false;
        let factor = if player.diving { DIVE_GRAVITY_FACTOR } else { 1.0 };
        player.vy += GRAVITY * factor * dt;
    }

    player.y += player.vy * dt;

    if player.y < ceiling {
        player.y = ceiling;
        player.vy = player.vy.max(0.0);
    }

    if player.y >= floor {
        player.y = floor;
        player.vy = 0.0;
        player.on_ground = true;
        player.double_jumped = false;
        player.diving = false;
        player.charge = None;
        player.jetpack_active = false;
    }
}

// ── Shooting ─────────────────────────────────────────────────────────────────

/// Seconds between shots for a given gun count; `None` without guns.
pub fn fire_cooldown(guns: u8) -> Option<f32> {
    (guns > 0).then(|| FIRE_COOLDOWN / guns as f32)
}

/// Fire while the shoot intent is held, rate-limited by gun count.
pub fn fire(state: &mut GameState, input: &InputFrame, dt: f32, events: &mut Vec<GameEvent>) {
    let player = &mut state.player;
    player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);

    if !input.held(Intent::Shoot) || player.fire_cooldown > 0.0 {
        return;
    }
    let Some(cooldown) = fire_cooldown(player.guns) else {
        return;
    };
    let (_, cy) = player.center();
    state.projectiles.push(Projectile {
        x: player.x + PLAYER_W,
        y: cy,
    });
    player.fire_cooldown = cooldown;
    events.push(GameEvent::Fired);
}

// ── Entities & projectiles ───────────────────────────────────────────────────

/// Move every entity.  Lane entities leaving the field are dropped; aerial
/// hazards hitting the ground or a side edge turn into a ground explosion.
pub fn integrate_entities(
    state: &mut GameState,
    dt: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let field = state.field;
    let ground = field.ground_y();
    let multiplier = state.speed_multiplier;
    let elapsed = state.elapsed;

    let mut impacts: Vec<(f32, f32)> = Vec::new();

    state.entities.retain_mut(|e| {
        match &mut e.motion {
            Motion::Drift => e.x -= e.speed * multiplier * dt,
            Motion::Float { base_y, phase } => {
                e.x -= e.speed * dt;
                e.y = *base_y + (elapsed * FLOAT_FREQUENCY + *phase).sin() * FLOAT_AMPLITUDE;
            }
            Motion::Fall { vx, vy } => {
                *vy += AERIAL_GRAVITY * dt;
                e.x += *vx * dt;
                e.y += *vy * dt;
            }
        }

        if let Motion::Fall { .. } = e.motion {
            let landed = e.y + e.height >= ground;
            let outside = e.x + e.width < 0.0 || e.x > field.width;
            if landed || outside {
                let (cx, _) = e.center();
                impacts.push((cx.clamp(0.0, field.width), ground));
                return false;
            }
            return true;
        }

        in_bounds(e, field.width, field.height)
    });

    for (x, y) in impacts {
        state.explosions.push(effects::ground_explosion(x, y));
        effects::burst(&mut state.particles, rng, x, y, EXPLOSION_BURST, effects::FIRE_ORANGE);
        events.push(GameEvent::Explosion);
    }
}

/// Lane entities live from the right edge until fully past the left edge.
fn in_bounds(e: &Entity, width: f32, height: f32) -> bool {
    e.x + e.width >= 0.0 && e.x <= width && e.y + e.height <= height
}

pub fn integrate_projectiles(state: &mut GameState, dt: f32) {
    let width = state.field.width;
    state.projectiles.retain_mut(|p| {
        p.x += PROJECTILE_SPEED * dt;
        p.x <= width
    });
}
