//! Tuning tables for the simulation.  Distances are logical pixels, times are
//! seconds unless the name says `TICKS`.

// ── Playfield geometry ────────────────────────────────────────────────────────

/// Logical pixels per terminal column.
pub const CELL_W: f32 = 8.0;
/// Logical pixels per terminal row.
pub const CELL_H: f32 = 16.0;

/// Height of the ground strip at the bottom of the playfield.
pub const GROUND_DEPTH: f32 = 2.0 * CELL_H;
/// Height reserved for the HUD row at the top.
pub const HUD_DEPTH: f32 = CELL_H;

/// Vertical gap between the four spawn lanes.
pub const LANE_SPACING: f32 = 2.5 * CELL_H;
pub const LANE_COUNT: usize = 4;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_W: f32 = 2.0 * CELL_W;
pub const PLAYER_H: f32 = 2.0 * CELL_H;
/// Radius used for circular tests against ground explosions.
pub const PLAYER_HIT_RADIUS: f32 = 12.0;
/// Horizontal start position as a fraction of the playfield width.
pub const PLAYER_START_X: f32 = 0.2;

pub const PLAYER_SPEED: f32 = 260.0;
pub const SPRINT_FACTOR: f32 = 1.6;

pub const GRAVITY: f32 = 1800.0;
pub const JUMP_VELOCITY: f32 = 560.0;
pub const JUMP_CHARGE_BONUS: f32 = 220.0;
pub const JUMP_CHARGE_WINDOW: f32 = 0.25;
pub const DOUBLE_JUMP_VELOCITY: f32 = 520.0;
pub const DIVE_GRAVITY_FACTOR: f32 = 2.0;

pub const JETPACK_THRUST: f32 = 2400.0;
pub const JETPACK_MAX_RISE: f32 = 420.0;
/// Fuel burned per second of thrust.
pub const JETPACK_DRAIN: f32 = 30.0;

pub const INITIAL_LIVES: u32 = 3;
pub const MAX_LIVES: u32 = 5;
pub const MAX_GUNS: u8 = 3;
pub const MAX_FUEL: f32 = 100.0;

// ── Entities ──────────────────────────────────────────────────────────────────

pub const ENTITY_W: f32 = 2.0 * CELL_W;
pub const ENTITY_H: f32 = CELL_H;
pub const ENTITY_SPEED: f32 = 200.0;
pub const SPEED_JITTER: f32 = 40.0;
pub const PICKUP_SPEED: f32 = ENTITY_SPEED * 0.5;

pub const FLOAT_AMPLITUDE: f32 = 10.0;
pub const FLOAT_FREQUENCY: f32 = 3.0;

/// Spawn weights, in the order of `EntityKind::SPAWN_TABLE`.
pub const SPAWN_WEIGHTS: [u32; 6] = [58, 23, 8, 6, 3, 2];

pub const SPAWN_INTERVAL_BASE: f32 = 2.4;
pub const SPAWN_INTERVAL_STEP: f32 = 0.1;
pub const SPAWN_INTERVAL_FLOOR: f32 = 2.0;

pub const AERIAL_SCORE_THRESHOLD: u32 = 100;
pub const DIAGONAL_SCORE_THRESHOLD: u32 = 250;
pub const AERIAL_INTERVAL_MIN: f32 = 3.0;
pub const AERIAL_INTERVAL_MAX: f32 = 5.0;
pub const AERIAL_GRAVITY: f32 = 420.0;
pub const AERIAL_DRIFT_SPEED: f32 = 140.0;
pub const AERIAL_W: f32 = 2.0 * CELL_W;
pub const AERIAL_H: f32 = CELL_H;

// ── Scoring ───────────────────────────────────────────────────────────────────

pub const COLLECTIBLE_SCORE: u32 = 10;
pub const SHOT_BONUS: u32 = 25;
pub const MULTIPLIER_STEP: f32 = 0.15;
pub const SLOW_STEP: f32 = 0.5;
pub const MIN_MULTIPLIER: f32 = 0.5;

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const PROJECTILE_SPEED: f32 = 600.0;
pub const PROJECTILE_HIT_RADIUS: f32 = 20.0;
pub const PROJECTILE_LENGTH: f32 = 12.0;
/// Cooldown with a single gun; divided by the gun count.
pub const FIRE_COOLDOWN: f32 = 0.6;

// ── Effects ───────────────────────────────────────────────────────────────────

pub const EXPLOSION_RADIUS: f32 = 64.0;
pub const EXPLOSION_LIFE: f32 = 0.6;

pub const EXPLOSION_BURST: usize = 24;
pub const HIT_BURST: usize = 16;
pub const SHOT_BURST: usize = 10;

pub const PARTICLE_GRAVITY: f32 = 300.0;
pub const MAX_PARTICLES: usize = 600;

// ── Round flow ────────────────────────────────────────────────────────────────

pub const FALL_IN_TICKS: u32 = 45;
pub const COUNTDOWN_STEP_TICKS: u32 = 40;
/// 3, 2, 1, GO.
pub const COUNTDOWN_STEPS: u8 = 4;

/// Leaderboard size.
pub const TOP_N: usize = 10;
pub const INITIALS_LEN: usize = 3;
