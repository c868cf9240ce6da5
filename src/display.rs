//! Terminal renderer.
//!
//! Every function takes a writer and a read-only view of the run.  World
//! coordinates are scaled onto whatever grid of cells the terminal offers,
//! so the simulation never needs to know the window size.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use elemental_barrage::compute::BossHud;
use elemental_barrage::entities::{Difficulty, GameState, GameStatus, ItemKind};
use elemental_barrage::{hud, Hud};
use glam::Vec2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_CHARGES: Color = Color::Cyan;
const C_HUD_POWER: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PLAYER_BLINK: Color = Color::DarkGrey;
const C_PLAYER_BULLET: Color = Color::Rgb { r: 0xff, g: 0xf9, b: 0xc4 };
const C_FIELD: Color = Color::DarkMagenta;
const C_PARTICLE: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD above the top border.
const HUD_ROWS: u16 = 2;

fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps world coordinates onto the cells inside the border.
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    scale: Vec2,
}

impl Viewport {
    fn new(state: &GameState, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(HUD_ROWS + 3).max(1);
        let area = state.config.play_area;
        Viewport {
            left: 1,
            top: HUD_ROWS + 1,
            cols,
            rows,
            scale: Vec2::new(cols as f32 / area.width, rows as f32 / area.height),
        }
    }

    /// Cell for a world position, or `None` when it falls outside the field.
    fn cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        let x = (pos.x * self.scale.x).floor();
        let y = (pos.y * self.scale.y).floor();
        if x < 0.0 || y < 0.0 || x >= self.cols as f32 || y >= self.rows as f32 {
            return None;
        }
        Some((self.left + x as u16, self.top + y as u16))
    }

    fn put<W: Write>(&self, out: &mut W, pos: Vec2, glyph: &str, color: Color) -> std::io::Result<()> {
        if let Some((col, row)) = self.cell(pos) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame sized to the current terminal.
pub fn render<W: Write>(out: &mut W, state: &GameState, paused: bool) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(state, width, height);
    let info = hud(state);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, state.difficulty, &info, width)?;
    if let Some(boss) = &info.boss {
        draw_boss_bar(out, boss, width)?;
    }

    draw_area_effect(out, &view, state)?;
    draw_particles(out, &view, state)?;
    draw_items(out, &view, state)?;
    draw_enemies(out, &view, state)?;
    draw_boss(out, &view, state)?;
    draw_bullets(out, &view, state)?;
    draw_player(out, &view, state)?;
    draw_controls_hint(out, height)?;

    match state.status {
        GameStatus::GameOver => draw_overlay(out, &view, "GAME  OVER", Color::Red, &info)?,
        GameStatus::Cleared => draw_overlay(out, &view, "ALL CLEAR!", Color::Yellow, &info)?,
        GameStatus::Playing if paused => draw_pause(out, &view)?,
        GameStatus::Playing => {}
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let inner = view.cols as usize;
    let top = view.top - 1;
    let bottom = view.top + view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in view.top..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.left + view.cols, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (rows 0-1) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    difficulty: Difficulty,
    info: &Hud,
    width: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>8}  Hi:{:>8}",
        info.score, info.high_score
    )))?;

    let stage = format!("[ STAGE {} | {} | {} ]", info.stage, difficulty.label(), info.time);
    let stage_color = match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Normal => Color::Yellow,
        Difficulty::Hard => Color::Red,
    };
    let sx = (width / 2).saturating_sub(stage.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(stage_color))?;
    out.queue(Print(&stage))?;

    let lives = format!("Lives:{} ", "♥".repeat(info.lives as usize));
    let charges = format!("Bombs:{} ", "◆".repeat(info.charges as usize));
    let cells = info.power_cells.min(10) as usize;
    let power = format!("Power:{}{}", "█".repeat(cells), "░".repeat(10 - cells));

    let right_len = (lives.chars().count() + charges.chars().count() + power.chars().count()) as u16;
    out.queue(cursor::MoveTo(width.saturating_sub(right_len + 1), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives))?;
    out.queue(style::SetForegroundColor(C_HUD_CHARGES))?;
    out.queue(Print(&charges))?;
    out.queue(style::SetForegroundColor(C_HUD_POWER))?;
    out.queue(Print(&power))?;
    Ok(())
}

fn draw_boss_bar<W: Write>(out: &mut W, boss: &BossHud, width: u16) -> std::io::Result<()> {
    let pattern = boss.pattern.replace('_', " ");
    let label = format!("{}  P{} {} ", boss.name, boss.phase, pattern);
    let bar_len = (width as usize).saturating_sub(label.chars().count() + 4).min(60);
    let filled = ((boss.health_ratio.clamp(0.0, 1.0) * bar_len as f32).ceil() as usize).min(bar_len);

    out.queue(cursor::MoveTo(1, 1))?;
    out.queue(style::SetForegroundColor(Color::Magenta))?;
    out.queue(Print(&label))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print("▰".repeat(filled)))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("▱".repeat(bar_len - filled)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    // Blink while invulnerable.
    let color = if p.invulnerable > 0.0 && state.frame % 4 < 2 {
        C_PLAYER_BLINK
    } else {
        C_PLAYER
    };
    view.put(out, p.pos, "▶", color)?;
    view.put(out, p.pos - Vec2::new(p.radius, 0.0), "=", rgb(p.element.color()))
}

fn draw_enemies<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    for enemy in state.enemies.iter().filter(|e| e.hp > 0.0) {
        view.put(out, enemy.pos, "◀", rgb(enemy.element.color()))?;
    }
    Ok(())
}

fn draw_boss<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let Some(boss) = &state.boss else {
        return Ok(());
    };
    let color = rgb(boss.color);
    // A 3x3 block so the boss reads as larger than a grunt.
    let step = Vec2::new(1.0 / view.scale.x, 1.0 / view.scale.y);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let glyph = if dx == 0 && dy == 0 { "◉" } else { "▓" };
            view.put(out, boss.pos + step * Vec2::new(dx as f32, dy as f32), glyph, color)?;
        }
    }
    Ok(())
}

fn draw_bullets<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    for b in state.player_bullets.iter() {
        view.put(out, b.pos, "-", C_PLAYER_BULLET)?;
    }
    for b in state.enemy_bullets.iter() {
        view.put(out, b.pos, "•", rgb(b.color))?;
    }
    Ok(())
}

fn draw_items<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    for item in state.items.iter() {
        let (glyph, color) = match item.kind {
            ItemKind::Power => ("P", Color::Red),
            ItemKind::Charge => ("B", Color::Cyan),
            ItemKind::Life => ("♥", Color::Magenta),
        };
        view.put(out, item.pos, glyph, color)?;
    }
    Ok(())
}

fn draw_particles<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    for p in state.particles.iter() {
        view.put(out, p.pos, "·", C_PARTICLE)?;
    }
    Ok(())
}

/// Outline of the suction field, drawn as a ring of cells.
fn draw_area_effect<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let Some(field) = &state.area_effect else {
        return Ok(());
    };
    const SEGMENTS: usize = 32;
    for i in 0..SEGMENTS {
        let angle = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
        let at = field.center + Vec2::from_angle(angle) * field.radius;
        view.put(out, at, "∘", C_FIELD)?;
    }
    view.put(out, field.center, "@", C_FIELD)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Arrows/WASD: Move  Z/Space: Shoot  X: Ability  C: Focus  Esc: Pause  Q: Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn centred<W: Write>(out: &mut W, cx: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(cx.saturating_sub(text.chars().count() as u16 / 2), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_overlay<W: Write>(
    out: &mut W,
    view: &Viewport,
    title: &str,
    title_color: Color,
    info: &Hud,
) -> std::io::Result<()> {
    let cx = view.left + view.cols / 2;
    let start = (view.top + view.rows / 2).saturating_sub(3);
    let new_best = info.score >= info.high_score && info.score > 0;

    centred(out, cx, start, "╔════════════════════╗", title_color)?;
    centred(out, cx, start + 1, &format!("║{:^20}║", title), title_color)?;
    centred(out, cx, start + 2, "╚════════════════════╝", title_color)?;
    centred(
        out,
        cx,
        start + 3,
        &format!("Final Score: {:>8}", info.score),
        C_HUD_SCORE,
    )?;
    let (best, best_color) = if new_best {
        (format!("★ NEW BEST: {:>8} ★", info.high_score), Color::Yellow)
    } else {
        (format!("Best Score:  {:>8}", info.high_score), Color::DarkGrey)
    };
    centred(out, cx, start + 4, &best, best_color)?;
    centred(out, cx, start + 5, "R - Play Again  Q - Quit", Color::White)
}

fn draw_pause<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let cx = view.left + view.cols / 2;
    let row = view.top + view.rows / 2;
    centred(out, cx, row, "── PAUSED ──", Color::White)?;
    centred(out, cx, row + 1, "Esc - Resume  Q - Quit", C_HINT)
}
