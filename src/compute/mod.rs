//! Per-frame simulation.
//!
//! [`step_frame`] takes ownership of the current [`GameState`], advances it by
//! one clamped delta in a fixed order, and hands it back.  All randomness
//! comes through the injected `rng`, so a seeded RNG plus the same input
//! sequence reproduces a run exactly.

mod collisions;
mod hostiles;
mod player;

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use crate::boss;
use crate::config::GameConfig;
use crate::entities::{Difficulty, Element, GameEvent, GameState, GameStatus};
use crate::factory;
use crate::input::FrameInput;
use crate::pool::Pool;

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Largest delta a single step will simulate.
pub const MAX_DT: f32 = 0.05;

pub const FIRST_BOSS_DELAY: f32 = 90.0;
pub const NEXT_BOSS_DELAY: f32 = 60.0;
/// Beating this stage's boss wins the run.
pub const FINAL_STAGE: u32 = 9;
/// Seconds between the final boss falling and the run ending.
pub const CLEAR_DELAY: f32 = 2.0;

pub const SCORE_ENEMY_HIT: u64 = 5;
pub const SCORE_BOSS_HIT: u64 = 100;
pub const SCORE_BOSS_DEFEAT: u64 = 10_000;
pub const SCORE_ENEMY_KILL: u64 = 200;
pub const PENALTY_PLAYER_HIT: u64 = 100;

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Build a fresh run.  Unknown tables fall back to defaults (see
/// [`GameConfig::character`] and [`GameConfig::profile`]).
pub fn initialize_run(
    config: Arc<GameConfig>,
    difficulty: Difficulty,
    character: Element,
    high_score: u64,
) -> GameState {
    let profile = config.profile(difficulty);
    let character = config.character(character);
    let player = factory::player(&character, &profile, &config.play_area);

    log::info!(
        "new run: {} on {} ({} hp, {} charges)",
        character.name,
        difficulty.label(),
        profile.player_hp,
        profile.player_charges
    );

    GameState {
        config,
        difficulty,
        profile,
        character,
        player,
        enemies: Pool::with_capacity(32),
        boss: None,
        player_bullets: Pool::with_capacity(128),
        enemy_bullets: Pool::with_capacity(512),
        items: Pool::new(),
        particles: Pool::with_capacity(256),
        area_effect: None,
        stage: 1,
        wave_count: 0,
        wave_timer: 0.0,
        boss_timer: FIRST_BOSS_DELAY,
        bosses_defeated: 0,
        clear_timer: None,
        elapsed: 0.0,
        frame: 0,
        score: 0,
        high_score,
        high_score_announced: false,
        status: GameStatus::Playing,
        events: Vec::new(),
    }
}

pub fn is_run_over(state: &GameState) -> bool {
    state.status != GameStatus::Playing
}

/// Negative and NaN deltas become zero; spikes are capped at [`MAX_DT`].
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.clamp(0.0, MAX_DT)
    }
}

/// Advance the simulation by one frame.
///
/// A finished run is returned untouched.  The event queue only ever holds
/// the events of the latest step.
pub fn step_frame(
    mut state: GameState,
    input: &FrameInput,
    dt: f32,
    rng: &mut impl Rng,
) -> GameState {
    if is_run_over(&state) {
        return state;
    }
    state.events.clear();

    // ── 1. Clock ─────────────────────────────────────────────────────────────
    let dt = clamp_dt(dt);
    state.frame += 1;
    state.elapsed += dt;

    // ── 2–4. Player ──────────────────────────────────────────────────────────
    player::steer(&mut state, input, dt);
    player::shoot(&mut state, input, dt);
    if input.ability {
        player::activate_ability(&mut state, rng);
        settle_boss_defeat(&mut state, rng);
    }

    // ── 5–8. World ───────────────────────────────────────────────────────────
    hostiles::advance_projectiles(&mut state, dt);
    hostiles::update_area_effect(&mut state, dt, rng);
    hostiles::update_enemies(&mut state, dt, rng);
    hostiles::orchestrate(&mut state, dt, rng);

    // ── 9–11. Resolution ─────────────────────────────────────────────────────
    collisions::player_bullets(&mut state, rng);
    settle_boss_defeat(&mut state, rng);
    collisions::remove_fallen(&mut state, rng);
    collisions::enemy_bullets(&mut state, dt, rng);

    // ── 12–13. Pickups and cosmetics ─────────────────────────────────────────
    // A player who died this step collects nothing.
    if !is_run_over(&state) {
        player::update_items(&mut state, dt);
    }
    age_particles(&mut state, dt);

    finish_step(&mut state, dt);
    state
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Spawn a particle burst unless particles are switched off.
fn emit_particles(state: &mut GameState, at: Vec2, count: usize, rng: &mut impl Rng) {
    if state.config.particles_enabled && count > 0 {
        state.particles.extend(factory::particles(at, count, rng));
    }
}

fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

/// Terminal transition for a boss at or below zero health.  Runs at most
/// once per boss because the boss is removed here.
fn settle_boss_defeat(state: &mut GameState, rng: &mut impl Rng) {
    let defeated = matches!(&state.boss, Some(b) if b.hp <= 0.0);
    if !defeated {
        return;
    }
    let Some(fallen) = state.boss.take() else {
        return;
    };

    state.score += SCORE_BOSS_DEFEAT;
    state.bosses_defeated += 1;
    state.boss_timer = NEXT_BOSS_DELAY;
    emit_particles(state, fallen.pos, 100, rng);
    state.events.push(GameEvent::BossDefeated {
        stage: fallen.stage,
        element: fallen.element,
    });
    log::info!(
        "stage {} boss {} defeated at {:.1}s",
        fallen.stage,
        fallen.name,
        state.elapsed
    );

    if fallen.stage >= FINAL_STAGE {
        state.clear_timer = Some(CLEAR_DELAY);
    }
}

fn age_particles(state: &mut GameState, dt: f32) {
    for p in state.particles.iter_mut() {
        p.age += dt;
    }
    state.particles.kill_where(|p| p.age >= 1.0);
}

/// Victory countdown, high-score tracking and pool compaction.
fn finish_step(state: &mut GameState, dt: f32) {
    if state.status == GameStatus::Playing {
        if let Some(remaining) = state.clear_timer.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                state.status = GameStatus::Cleared;
                state.events.push(GameEvent::RunCleared { score: state.score });
                log::info!("run cleared with {} points", state.score);
            }
        }
    }

    if state.score > state.high_score {
        state.high_score = state.score;
        if !state.high_score_announced {
            state.high_score_announced = true;
            state.events.push(GameEvent::NewHighScore { score: state.score });
        }
    }

    state.enemies.compact();
    state.player_bullets.compact();
    state.enemy_bullets.compact();
    state.items.compact();
    state.particles.compact();
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Display values derived from the state after a step.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub charges: u32,
    /// Power bar fill, 0..=10 cells.
    pub power_cells: u32,
    pub stage: u32,
    /// Elapsed time as `m:ss`.
    pub time: String,
    pub boss: Option<BossHud>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossHud {
    pub name: String,
    pub health_ratio: f32,
    pub phase: usize,
    /// Label of the pattern the boss is firing.
    pub pattern: &'static str,
}

pub fn hud(state: &GameState) -> Hud {
    let p = &state.player;
    let fill = if p.max_power > 0.0 {
        (p.power / p.max_power * 10.0).round().clamp(0.0, 10.0)
    } else {
        0.0
    };
    let secs = state.elapsed.max(0.0) as u64;

    Hud {
        score: state.score,
        high_score: state.high_score.max(state.score),
        lives: p.hp,
        charges: p.charges,
        power_cells: fill as u32,
        stage: state.stage,
        time: format!("{}:{:02}", secs / 60, secs % 60),
        boss: state.boss.as_ref().map(|b| BossHud {
            name: b.name.clone(),
            health_ratio: boss::health_ratio(b).max(0.0),
            phase: b.phase,
            pattern: boss::current_phase(b).map_or("", |p| p.pattern.name()),
        }),
    }
}
