//! Per-difficulty numeric knobs and the stage/time scaling built on them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::{Difficulty, Item, ItemKind};
use crate::factory;

/// Balance table for one difficulty tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    pub enemy_hp_base: f32,
    pub boss_hp_base: f32,
    /// Pixels per second.
    pub enemy_bullet_speed: f32,
    /// Seconds between shots, before jitter.
    pub enemy_shot_interval: f32,
    /// Seconds between waves.
    pub spawn_interval: f32,
    pub max_per_wave: u32,
    pub drop_rate: f32,
    pub player_hp: u32,
    pub player_charges: u32,
    #[serde(default = "default_max_power")]
    pub max_power: f32,
}

fn default_max_power() -> f32 {
    100.0
}

// ── Built-in tables ───────────────────────────────────────────────────────────

impl DifficultyProfile {
    pub fn builtin(difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => DifficultyProfile {
                difficulty,
                enemy_hp_base: 30.0,
                boss_hp_base: 500.0,
                enemy_bullet_speed: 100.0,
                enemy_shot_interval: 2.0,
                spawn_interval: 4.0,
                max_per_wave: 1,
                drop_rate: 0.4,
                player_hp: 5,
                player_charges: 4,
                max_power: 100.0,
            },
            Difficulty::Normal => DifficultyProfile {
                difficulty,
                enemy_hp_base: 60.0,
                boss_hp_base: 1000.0,
                enemy_bullet_speed: 140.0,
                enemy_shot_interval: 1.5,
                spawn_interval: 2.5,
                max_per_wave: 2,
                drop_rate: 0.25,
                player_hp: 3,
                player_charges: 2,
                max_power: 100.0,
            },
            Difficulty::Hard => DifficultyProfile {
                difficulty,
                enemy_hp_base: 100.0,
                boss_hp_base: 2000.0,
                enemy_bullet_speed: 200.0,
                enemy_shot_interval: 1.0,
                spawn_interval: 1.5,
                max_per_wave: 4,
                drop_rate: 0.1,
                player_hp: 2,
                player_charges: 1,
                max_power: 100.0,
            },
        }
    }

    // ── Scaling ───────────────────────────────────────────────────────────────

    /// Enemy HP: +15 % per stage past the first, +8 % per elapsed minute.
    pub fn enemy_hp(&self, stage: u32, elapsed: f32) -> f32 {
        scaled(self.enemy_hp_base, stage, elapsed, 0.15, 0.08)
    }

    /// Boss HP: +20 % per stage past the first, +10 % per elapsed minute.
    pub fn boss_hp(&self, stage: u32, elapsed: f32) -> f32 {
        scaled(self.boss_hp_base, stage, elapsed, 0.2, 0.1)
    }

    /// Enemies in the next wave.  Grows with the wave counter and never
    /// exceeds `max_per_wave`.
    pub fn wave_size(&self, wave_count: u32) -> u32 {
        let growth = (wave_count as f32 * 0.3).floor() as u32;
        self.max_per_wave.min(1 + growth)
    }

    // ── Drops ─────────────────────────────────────────────────────────────────

    /// Three independent rolls for a kill at `pos`: power at `rate × 1.2`,
    /// charge at `rate × 0.6`, life at `rate × 0.4`.
    pub fn roll_drops(&self, rng: &mut impl Rng, pos: Vec2) -> Vec<Item> {
        let table = [
            (ItemKind::Power, 1.2),
            (ItemKind::Charge, 0.6),
            (ItemKind::Life, 0.4),
        ];
        table
            .iter()
            .filter(|&&(_, factor)| rng.gen::<f32>() < self.drop_rate * factor)
            .map(|&(kind, _)| factory::item(pos, kind))
            .collect()
    }
}

fn scaled(base: f32, stage: u32, elapsed: f32, per_stage: f32, per_minute: f32) -> f32 {
    let stage_mult = 1.0 + stage.saturating_sub(1) as f32 * per_stage;
    let time_mult = 1.0 + (elapsed.max(0.0) / 60.0) * per_minute;
    (base * stage_mult * time_mult).round()
}
