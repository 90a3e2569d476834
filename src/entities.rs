//! Simulation types: pure data, no logic beyond trivial accessors.

use crate::constants::{
    CELL_H, ENTITY_H, GROUND_DEPTH, HUD_DEPTH, INITIAL_LIVES, LANE_SPACING, PLAYER_H, PLAYER_W,
};
use crate::leaderboard::LeaderboardEntry;

// ── Colour ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Visible simulation area in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top edge of the ground strip.
    pub fn ground_y(&self) -> f32 {
        (self.height - GROUND_DEPTH).max(HUD_DEPTH + PLAYER_H)
    }

    /// Player `y` (top edge) when standing on the ground.
    pub fn player_floor(&self) -> f32 {
        self.ground_y() - PLAYER_H
    }

    /// Highest `y` a player may reach (just under the HUD).
    pub fn ceiling(&self) -> f32 {
        HUD_DEPTH
    }

    /// Top edge of an entity resting in `lane` (0 = ground lane).
    pub fn lane_y(&self, lane: usize) -> f32 {
        (self.ground_y() - ENTITY_H - lane as f32 * LANE_SPACING).max(self.ceiling() + CELL_H)
    }

    pub fn max_player_x(&self) -> f32 {
        (self.width - PLAYER_W).max(0.0)
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Approaches along a lane; costs a life on contact.
    HazardGround,
    /// Falls from the top; leaves a ground explosion on impact.
    HazardAerial,
    Heart,
    GunPickup,
    JetpackPickup,
    SlowPickup,
    /// Plain score item; every one raises the speed multiplier.
    Collectible,
}

impl EntityKind {
    /// Kinds the lane spawner can produce, matching `SPAWN_WEIGHTS`.
    pub const SPAWN_TABLE: [EntityKind; 6] = [
        EntityKind::Collectible,
        EntityKind::HazardGround,
        EntityKind::GunPickup,
        EntityKind::JetpackPickup,
        EntityKind::Heart,
        EntityKind::SlowPickup,
    ];

    pub fn is_hazard(self) -> bool {
        match self {
            EntityKind::HazardGround | EntityKind::HazardAerial => true,
            EntityKind::Heart
            | EntityKind::GunPickup
            | EntityKind::JetpackPickup
            | EntityKind::SlowPickup
            | EntityKind::Collectible => false,
        }
    }

    /// Power-ups drift at half speed and bob up and down.
    pub fn is_floating_pickup(self) -> bool {
        match self {
            EntityKind::Heart
            | EntityKind::GunPickup
            | EntityKind::JetpackPickup
            | EntityKind::SlowPickup => true,
            EntityKind::HazardGround | EntityKind::HazardAerial | EntityKind::Collectible => false,
        }
    }
}

/// How an entity moves each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Straight leftward drift at `speed` times the global multiplier.
    Drift,
    /// Leftward drift at `speed` with a sine bob around `base_y`.
    Float { base_y: f32, phase: f32 },
    /// Free fall under aerial gravity with an optional sideways component.
    Fall { vx: f32, vy: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Per-instance horizontal speed (before the global multiplier).
    pub speed: f32,
    pub motion: Motion,
}

impl Entity {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Projectiles & effects ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Rgb,
}

impl Particle {
    /// Remaining life as a fraction in `0.0..=1.0`, used as render alpha.
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Damage zone left by an aerial hazard hitting the ground.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundExplosion {
    pub x: f32,
    pub y: f32,
    pub life: f32,
    pub max_life: f32,
    pub max_radius: f32,
}

impl GroundExplosion {
    /// Radius grows linearly from 0 to `max_radius` as life runs out.
    pub fn radius(&self) -> f32 {
        if self.max_life <= 0.0 {
            return self.max_radius;
        }
        let elapsed = (self.max_life - self.life).clamp(0.0, self.max_life);
        self.max_radius * elapsed / self.max_life
    }

    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Vertical velocity, positive = downward.
    pub vy: f32,
    pub on_ground: bool,
    /// Seconds of jump charge accumulated while the jump key is held on the ground.
    pub charge: Option<f32>,
    pub double_jumped: bool,
    pub diving: bool,
    pub jetpack_active: bool,
    pub guns: u8,
    pub fuel: f32,
    /// Seconds until the next shot is allowed.
    pub fire_cooldown: f32,
}

impl Player {
    pub fn grounded(field: &Playfield) -> Self {
        Self {
            x: field.width * crate::constants::PLAYER_START_X,
            y: field.player_floor(),
            vy: 0.0,
            on_ground: true,
            charge: None,
            double_jumped: false,
            diving: false,
            jetpack_active: false,
            guns: 0,
            fuel: 0.0,
            fire_cooldown: 0.0,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + PLAYER_W / 2.0, self.y + PLAYER_H / 2.0)
    }
}

// ── Round state ───────────────────────────────────────────────────────────────

/// Where the finished round stands with respect to the leaderboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Standing {
    /// Waiting for the gateway to answer.
    Pending,
    /// Score makes the top N; name entry is open.
    Qualifies,
    NotQualifying,
    /// Initials were sent; no further submission is possible.
    Submitted,
    /// Gateway failed; treated as not qualifying.
    Unavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameOverState {
    pub standing: Standing,
    pub top: Vec<LeaderboardEntry>,
    /// Uppercase letters typed so far (at most three).
    pub name: String,
}

impl GameOverState {
    pub fn new() -> Self {
        Self {
            standing: Standing::Pending,
            top: Vec::new(),
            name: String::new(),
        }
    }

    pub fn name_entry_open(&self) -> bool {
        self.standing == Standing::Qualifies
    }
}

impl Default for GameOverState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    /// Player falling into the playfield; `ticks` counts up to `FALL_IN_TICKS`.
    Ready { ticks: u32 },
    /// `step` counts down 3, 2, 1, 0 (= GO); `ticks` elapsed within the step.
    Countdown { step: u8, ticks: u32 },
    Playing,
    GameOver(GameOverState),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Ready { .. } => "ready",
            Phase::Countdown { .. } => "countdown",
            Phase::Playing => "playing",
            Phase::GameOver(_) => "gameover",
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state, owned by the frame loop and mutated in place
/// by `compute::tick`.
#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: Phase,
    /// Bumped on every reset so late leaderboard answers can be discarded.
    pub round: u32,
    pub player: Player,
    pub entities: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub explosions: Vec<GroundExplosion>,
    pub score: u32,
    pub lives: u32,
    pub speed_multiplier: f32,
    /// Collectibles gathered this round.
    pub collected: u32,
    pub spawn_timer: f32,
    pub aerial_timer: f32,
    /// Interval drawn for the next aerial hazard.
    pub next_aerial_in: f32,
    /// Seconds of play this round; drives pickup oscillation.
    pub elapsed: f32,
    /// Best persisted score, for display only.
    pub best_score: u32,
    pub frame: u64,
    pub field: Playfield,
}

impl GameState {
    pub fn new(field: Playfield) -> Self {
        Self {
            phase: Phase::Idle,
            round: 0,
            player: Player::grounded(&field),
            entities: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            explosions: Vec::new(),
            score: 0,
            lives: INITIAL_LIVES,
            speed_multiplier: 1.0,
            collected: 0,
            spawn_timer: 0.0,
            aerial_timer: 0.0,
            next_aerial_in: crate::constants::AERIAL_INTERVAL_MAX,
            elapsed: 0.0,
            best_score: 0,
            frame: 0,
            field,
        }
    }

    pub fn game_over(&self) -> Option<&GameOverState> {
        match &self.phase {
            Phase::GameOver(over) => Some(over),
            _ => None,
        }
    }

    pub fn game_over_mut(&mut self) -> Option<&mut GameOverState> {
        match &mut self.phase {
            Phase::GameOver(over) => Some(over),
            _ => None,
        }
    }

    /// Display-only copy of the player-visible numbers.
    pub fn hud(&self) -> Hud {
        Hud {
            phase: self.phase.name(),
            score: self.score,
            best: self.best_score.max(self.score),
            lives: self.lives,
            guns: self.player.guns,
            fuel: self.player.fuel,
            multiplier: self.speed_multiplier,
        }
    }
}

/// Snapshot mirrored out of the simulation after each tick.  Never read back.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub phase: &'static str,
    pub score: u32,
    pub best: u32,
    pub lives: u32,
    pub guns: u8,
    pub fuel: f32,
    pub multiplier: f32,
}
