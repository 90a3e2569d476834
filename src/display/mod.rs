//! Rendering layer.
//!
//! `render` reads the game state and draws it onto a [`Surface`]; nothing in
//! here mutates the simulation.  Coordinates are logical pixels, the same
//! space the physics runs in.  Backends that cannot draw a sprite return
//! `false` and the renderer falls back to a plain rectangle.

pub mod terminal;

use crate::constants::{CELL_H, CELL_W, MAX_FUEL, MAX_GUNS, PLAYER_H, PLAYER_W, PROJECTILE_LENGTH};
use crate::entities::{EntityKind, GameOverState, GameState, Phase, Rgb, Standing};

// ── Surface ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Entity(EntityKind),
}

/// A 2D raster target.
pub trait Surface {
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb);
    /// Circle outline; `alpha` in `0.0..=1.0`.
    fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32);
    fn dot(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32);
    /// Single-line text with its top-left corner at `(x, y)`.
    fn text(&mut self, x: f32, y: f32, text: &str, color: Rgb);
    /// Returns false when the sprite is not available.
    fn sprite(&mut self, sprite: Sprite, x: f32, y: f32, w: f32, h: f32) -> bool;
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Rgb = Rgb(14, 16, 26);
const C_GROUND: Rgb = Rgb(58, 46, 38);
const C_GROUND_EDGE: Rgb = Rgb(120, 96, 70);
const C_PLAYER: Rgb = Rgb(235, 235, 240);
const C_PROJECTILE: Rgb = Rgb(90, 220, 255);
const C_EXPLOSION: Rgb = Rgb(255, 120, 40);
const C_HUD: Rgb = Rgb(250, 210, 80);
const C_HUD_LIVES: Rgb = Rgb(230, 60, 70);
const C_HUD_FUEL: Rgb = Rgb(90, 170, 255);
const C_TITLE: Rgb = Rgb(255, 255, 255);
const C_HINT: Rgb = Rgb(120, 120, 140);
const C_PANEL: Rgb = Rgb(28, 30, 46);
const C_ACCENT: Rgb = Rgb(120, 230, 140);

pub fn entity_color(kind: EntityKind) -> Rgb {
    match kind {
        EntityKind::HazardGround => Rgb(220, 60, 60),
        EntityKind::HazardAerial => Rgb(255, 140, 40),
        EntityKind::Heart => Rgb(255, 90, 140),
        EntityKind::GunPickup => Rgb(200, 200, 210),
        EntityKind::JetpackPickup => Rgb(90, 170, 255),
        EntityKind::SlowPickup => Rgb(160, 110, 255),
        EntityKind::Collectible => Rgb(250, 210, 80),
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    surface.clear(C_BACKGROUND);
    draw_ground(surface, state);

    for e in &state.entities {
        if !surface.sprite(Sprite::Entity(e.kind), e.x, e.y, e.width, e.height) {
            surface.fill_rect(e.x, e.y, e.width, e.height, entity_color(e.kind));
        }
    }
    draw_player(surface, state);

    for p in &state.particles {
        surface.dot(p.x, p.y, p.size, p.color, p.alpha());
    }
    for p in &state.projectiles {
        surface.line(p.x - PROJECTILE_LENGTH, p.y, p.x, p.y, C_PROJECTILE);
    }
    for ex in &state.explosions {
        surface.circle(ex.x, ex.y, ex.radius(), C_EXPLOSION, ex.alpha());
    }

    draw_hud(surface, state);

    match &state.phase {
        Phase::Idle => draw_title(surface, state),
        Phase::Ready { .. } => centered(surface, state, middle_y(state), "GET READY", C_TITLE),
        Phase::Countdown { step, .. } => {
            let label = if *step == 0 { "GO!".to_string() } else { step.to_string() };
            centered(surface, state, middle_y(state), &label, C_TITLE);
        }
        Phase::Playing => {}
        Phase::GameOver(over) => draw_game_over(surface, state, over),
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

fn draw_ground<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    let field = &state.field;
    let top = field.ground_y();
    surface.fill_rect(0.0, top, field.width, field.height - top, C_GROUND);
    surface.line(0.0, top, field.width, top, C_GROUND_EDGE);
}

fn draw_player<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    let p = &state.player;
    if !surface.sprite(Sprite::Player, p.x, p.y, PLAYER_W, PLAYER_H) {
        surface.fill_rect(p.x, p.y, PLAYER_W, PLAYER_H, C_PLAYER);
    }
}

// ── HUD (top row) ─────────────────────────────────────────────────────────────

pub fn hud_line(state: &GameState) -> String {
    let hud = state.hud();
    let guns: String = (0..MAX_GUNS)
        .map(|i| if i < hud.guns { '▮' } else { '▯' })
        .collect();
    format!(
        "SCORE {:>6}  BEST {:>6}  GUNS {}  x{:.2}",
        hud.score, hud.best, guns, hud.multiplier
    )
}

fn draw_hud<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    let hud = state.hud();
    let line = hud_line(state);
    surface.text(CELL_W, 0.0, &line, C_HUD);

    let mut x = CELL_W * (line.chars().count() as f32 + 3.0);
    let hearts = "♥".repeat(hud.lives as usize);
    surface.text(x, 0.0, &hearts, C_HUD_LIVES);
    x += CELL_W * (hud.lives as f32 + 2.0);

    if hud.fuel > 0.0 {
        const GAUGE: usize = 10;
        let filled = ((hud.fuel / MAX_FUEL) * GAUGE as f32).ceil() as usize;
        let gauge: String = (0..GAUGE)
            .map(|i| if i < filled { '█' } else { '·' })
            .collect();
        surface.text(x, 0.0, &format!("FUEL {gauge}"), C_HUD_FUEL);
    }
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn middle_y(state: &GameState) -> f32 {
    ((state.field.height / 2.0) / CELL_H).floor() * CELL_H - CELL_H
}

fn centered<S: Surface + ?Sized>(surface: &mut S, state: &GameState, y: f32, text: &str, color: Rgb) {
    let w = text.chars().count() as f32 * CELL_W;
    let x = ((state.field.width - w) / 2.0).max(0.0);
    surface.text((x / CELL_W).floor() * CELL_W, y, text, color);
}

fn draw_title<S: Surface + ?Sized>(surface: &mut S, state: &GameState) {
    let y = middle_y(state) - 2.0 * CELL_H;
    centered(surface, state, y, "DOWNTIME DASH", C_TITLE);
    centered(surface, state, y + CELL_H, "the service is down, the runner is not", C_HINT);
    centered(surface, state, y + 3.0 * CELL_H, "press any key to start", C_ACCENT);
    centered(
        surface,
        state,
        y + 5.0 * CELL_H,
        "←/→ A/D move   ↑/Space jump   ↓/S dive   F shoot   Shift sprint",
        C_HINT,
    );
    centered(surface, state, y + 6.0 * CELL_H, "Esc quit", C_HINT);
}

fn standing_line(over: &GameOverState) -> String {
    match over.standing {
        Standing::Pending => "checking leaderboard...".to_string(),
        Standing::Qualifies => {
            let mut name = over.name.clone();
            while name.chars().count() < crate::constants::INITIALS_LEN {
                name.push('_');
            }
            format!("NEW HIGH SCORE!  initials: {name}  (Enter to save)")
        }
        Standing::NotQualifying => String::new(),
        Standing::Submitted => "score submitted".to_string(),
        Standing::Unavailable => "leaderboard unavailable".to_string(),
    }
}

fn draw_game_over<S: Surface + ?Sized>(surface: &mut S, state: &GameState, over: &GameOverState) {
    let rows = 8 + over.top.len();
    let panel_h = rows as f32 * CELL_H;
    let panel_w = (48.0 * CELL_W).min(state.field.width);
    let px = ((state.field.width - panel_w) / 2.0).max(0.0);
    let py = ((state.field.height - panel_h) / 2.0).max(CELL_H);
    let py = (py / CELL_H).floor() * CELL_H;
    surface.fill_rect(px, py, panel_w, panel_h, C_PANEL);

    let mut y = py + CELL_H;
    centered(surface, state, y, "GAME OVER", C_TITLE);
    y += CELL_H;
    centered(surface, state, y, &format!("score {}", state.score), C_HUD);
    y += 2.0 * CELL_H;

    let standing = standing_line(over);
    if !standing.is_empty() {
        centered(surface, state, y, &standing, C_ACCENT);
    }
    y += CELL_H;

    for (i, entry) in over.top.iter().enumerate() {
        let line = format!("{:>2}. {}  {:>7}", i + 1, entry.initials, entry.score);
        centered(surface, state, y, &line, C_TITLE);
        y += CELL_H;
    }

    y += CELL_H;
    let hint = if over.name_entry_open() {
        "type 3 letters   Backspace erase   Esc exit"
    } else {
        "R replay   Esc exit"
    };
    centered(surface, state, y, hint, C_HINT);
}
