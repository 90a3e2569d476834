//! Character-cell backend.  One cell covers `CELL_W` × `CELL_H` logical
//! pixels; the grid is rebuilt every frame and written out with crossterm.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::constants::{CELL_H, CELL_W};
use crate::display::{entity_color, Sprite, Surface};
use crate::entities::{EntityKind, Playfield, Rgb};

/// Below this alpha nothing is drawn.
pub const MIN_VISIBLE_ALPHA: f32 = 0.15;

const SHADES: [char; 4] = ['█', '▓', '▒', '░'];
const DOTS: [char; 3] = ['●', '•', '·'];

const C_PLAYER: Rgb = Rgb(235, 235, 240);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    fn blank(bg: Rgb) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

/// Pick a glyph from `ramp` (densest first) for `alpha`.
pub fn glyph_for(alpha: f32, ramp: &[char]) -> Option<char> {
    if !(alpha >= MIN_VISIBLE_ALPHA) || ramp.is_empty() {
        return None;
    }
    let alpha = alpha.min(1.0);
    let index = ((1.0 - alpha) * ramp.len() as f32) as usize;
    Some(ramp[index.min(ramp.len() - 1)])
}

fn sprite_rows(sprite: Sprite) -> &'static [&'static str] {
    match sprite {
        Sprite::Player => &["()", "/\\"],
        Sprite::Entity(kind) => match kind {
            EntityKind::HazardGround => &["▲▲"],
            EntityKind::HazardAerial => &["◆◆"],
            EntityKind::Heart => &["<3"],
            EntityKind::GunPickup => &["=¬"],
            EntityKind::JetpackPickup => &["JP"],
            EntityKind::SlowPickup => &["<<"],
            EntityKind::Collectible => &["$$"],
        },
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

#[derive(Clone, Debug)]
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::blank(Rgb(0, 0, 0)); cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Self::new(cols, rows);
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Playfield that exactly covers the grid.
    pub fn field(&self) -> Playfield {
        field_for(self.cols, self.rows)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    /// One grid row as plain text.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.cell(col, row).map(|c| c.ch))
            .collect()
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(index)
    }

    fn put(&mut self, x: f32, y: f32, ch: char, fg: Rgb) {
        let (col, row) = to_cell(x, y);
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    /// Write the grid to `out`, changing colours only where they differ.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let Some(cell) = self.cell(col, row) else {
                    continue;
                };
                if current != Some((cell.fg, cell.bg)) {
                    out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                    out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        out.flush()
    }
}

pub fn field_for(cols: u16, rows: u16) -> Playfield {
    Playfield::new(cols as f32 * CELL_W, rows as f32 * CELL_H)
}

fn to_cell(x: f32, y: f32) -> (i32, i32) {
    ((x / CELL_W).floor() as i32, (y / CELL_H).floor() as i32)
}

impl Surface for TerminalSurface {
    fn clear(&mut self, color: Rgb) {
        self.cells.fill(Cell::blank(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (c0, r0) = to_cell(x, y);
        let (c1, r1) = to_cell(x + w - 0.01, y + h - 0.01);
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ' ';
                    cell.fg = color;
                    cell.bg = color;
                }
            }
        }
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb) {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let glyph = if dy.abs() * CELL_W <= dx.abs() * CELL_H * 0.5 {
            '─'
        } else if dx.abs() * CELL_H <= dy.abs() * CELL_W * 0.5 {
            '│'
        } else if (dx > 0.0) == (dy > 0.0) {
            '╲'
        } else {
            '╱'
        };
        let steps = ((dx.abs() / CELL_W).max(dy.abs() / CELL_H) * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.put(x0 + dx * t, y0 + dy * t, glyph, color);
        }
    }

    fn circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        let Some(glyph) = glyph_for(alpha, &SHADES[1..]) else {
            return;
        };
        if radius < CELL_W {
            self.put(cx, cy, glyph, color);
            return;
        }
        let steps = ((std::f32::consts::TAU * radius / CELL_W) * 2.0).ceil() as usize;
        for i in 0..steps {
            let a = std::f32::consts::TAU * i as f32 / steps as f32;
            self.put(cx + radius * a.cos(), cy + radius * a.sin(), glyph, color);
        }
    }

    fn dot(&mut self, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
        let ramp: &[char] = if size >= CELL_W { &SHADES } else { &DOTS };
        if let Some(glyph) = glyph_for(alpha, ramp) {
            self.put(x, y, glyph, color);
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Rgb) {
        let (col, row) = to_cell(x, y);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i as i32, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }

    fn sprite(&mut self, sprite: Sprite, x: f32, y: f32, _w: f32, _h: f32) -> bool {
        let color = match sprite {
            Sprite::Player => C_PLAYER,
            Sprite::Entity(kind) => entity_color(kind),
        };
        let (col, row) = to_cell(x, y);
        for (dr, line) in sprite_rows(sprite).iter().enumerate() {
            for (dc, ch) in line.chars().enumerate() {
                if let Some(cell) = self.cell_mut(col + dc as i32, row + dr as i32) {
                    cell.ch = ch;
                    cell.fg = color;
                }
            }
        }
        true
    }
}
