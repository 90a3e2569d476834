//! Particle bursts, thrust trails and ground explosions.

use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::{EXPLOSION_LIFE, EXPLOSION_RADIUS, MAX_PARTICLES, PARTICLE_GRAVITY};
use crate::entities::{GroundExplosion, Particle, Playfield, Rgb};

pub const FIRE_ORANGE: Rgb = Rgb(255, 140, 40);
pub const HIT_RED: Rgb = Rgb(255, 70, 70);
pub const SPARK_YELLOW: Rgb = Rgb(255, 230, 110);
pub const THRUST_BLUE: Rgb = Rgb(120, 200, 255);

/// Spray `count` particles outward from `(x, y)` in random directions.
pub fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    x: f32,
    y: f32,
    count: usize,
    color: Rgb,
) {
    for _ in 0..count {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(80.0..320.0);
        let life = rng.gen_range(0.25..0.7);
        particles.push(Particle {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life,
            max_life: life,
            size: rng.gen_range(2.0..5.0),
            color,
        });
    }
    cap(particles);
}

/// A short puff under the jetpack, pushed downward.
pub fn thrust_trail(particles: &mut Vec<Particle>, rng: &mut impl Rng, x: f32, y: f32) {
    let life = rng.gen_range(0.15..0.35);
    particles.push(Particle {
        x: x + rng.gen_range(-3.0..3.0),
        y,
        vx: rng.gen_range(-30.0..30.0),
        vy: rng.gen_range(120.0..220.0),
        life,
        max_life: life,
        size: 2.0,
        color: THRUST_BLUE,
    });
    cap(particles);
}

/// Keep the newest particles when a burst overflows the pool.
fn cap(particles: &mut Vec<Particle>) {
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

pub fn ground_explosion(x: f32, y: f32) -> GroundExplosion {
    GroundExplosion {
        x,
        y,
        life: EXPLOSION_LIFE,
        max_life: EXPLOSION_LIFE,
        max_radius: EXPLOSION_RADIUS,
    }
}

/// Integrate particles; drop the spent ones and anything outside the field.
pub fn update_particles(particles: &mut Vec<Particle>, field: &Playfield, dt: f32) {
    particles.retain_mut(|p| {
        p.x += p.vx * dt;
        p.y += p.vy * dt;
        p.vy += PARTICLE_GRAVITY * dt;
        p.life -= dt;
        p.life > 0.0 && p.x >= 0.0 && p.x <= field.width && p.y <= field.height
    });
}

pub fn update_explosions(explosions: &mut Vec<GroundExplosion>, dt: f32) {
    explosions.retain_mut(|e| {
        e.life -= dt;
        e.life > 0.0
    });
}
