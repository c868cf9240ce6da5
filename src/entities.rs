//! Simulation entity types.  Pure data, no logic beyond key lookups.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{CharacterConfig, GameConfig};
use crate::difficulty::DifficultyProfile;
use crate::patterns::{PatternFn, PatternId};
use crate::pool::Pool;

// ── Elements ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Wind,
    Earth,
    Light,
    Dark,
    Ice,
    Lightning,
    /// Final-stage element.  Has no affinity entries in either direction.
    God,
}

impl Element {
    /// The eight playable elements, in stage order.
    pub const BASE: [Element; 8] = [
        Element::Fire,
        Element::Water,
        Element::Wind,
        Element::Earth,
        Element::Light,
        Element::Dark,
        Element::Ice,
        Element::Lightning,
    ];

    pub fn from_key(key: &str) -> Option<Element> {
        match key.trim().to_ascii_lowercase().as_str() {
            "fire" => Some(Element::Fire),
            "water" => Some(Element::Water),
            "wind" => Some(Element::Wind),
            "earth" => Some(Element::Earth),
            "light" => Some(Element::Light),
            "dark" => Some(Element::Dark),
            "ice" => Some(Element::Ice),
            "lightning" => Some(Element::Lightning),
            "god" => Some(Element::God),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Wind => "wind",
            Element::Earth => "earth",
            Element::Light => "light",
            Element::Dark => "dark",
            Element::Ice => "ice",
            Element::Lightning => "lightning",
            Element::God => "god",
        }
    }

    /// Element of the enemies and boss of a stage: stages 1–8 walk
    /// [`Element::BASE`], anything later is the god stage.
    pub fn for_stage(stage: u32) -> Element {
        match stage {
            0 => Element::Fire,
            s if s <= 8 => Element::BASE[(s - 1) as usize],
            _ => Element::God,
        }
    }

    /// Body colour used for enemies and their bullets (0xRRGGBB).
    pub fn color(self) -> u32 {
        match self {
            Element::Fire => 0xff6b6b,
            Element::Water => 0x4a90e2,
            Element::Wind => 0x7cb342,
            Element::Earth => 0xa1887f,
            Element::Light => 0xffeb3b,
            Element::Dark => 0x5e35b1,
            Element::Ice => 0x4dd0e1,
            Element::Lightning => 0xffea00,
            Element::God => 0xffffff,
        }
    }
}

// ── Run-level enums ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn from_key(key: &str) -> Option<Difficulty> {
        match key.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
    /// The final boss fell and the post-victory delay elapsed.
    Cleared,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per second before the focus modifier.
    pub speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    /// Special-ability charges ("bombs").
    pub charges: u32,
    pub max_charges: u32,
    /// 0..=max_power; scales outgoing damage by `1 + power × 0.01`.
    pub power: f32,
    pub max_power: f32,
    /// Seconds of remaining invulnerability.  Any value > 0 blocks bullet damage.
    pub invulnerable: f32,
    pub shot_cooldown: f32,
    pub element: Element,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovePattern {
    Linear,
    Wave,
    Zigzag,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub element: Element,
    pub speed: f32,
    pub move_pattern: MovePattern,
    pub move_timer: f32,
    pub shot_timer: f32,
}

// ── Boss ──────────────────────────────────────────────────────────────────────

/// One tier of a boss's behaviour, with its pattern generator already resolved.
#[derive(Clone, Debug)]
pub struct BossPhase {
    /// Health ratio at or below which this phase applies.
    pub threshold: f32,
    pub pattern: PatternId,
    pub generator: PatternFn,
    pub shot_interval: f32,
    pub bullet_count: usize,
    pub bullet_speed: f32,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub name: String,
    pub element: Element,
    pub color: u32,
    pub stage: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Ordered by strictly decreasing threshold.
    pub phases: Vec<BossPhase>,
    /// 1-based; never decreases.
    pub phase: usize,
    pub shot_timer: f32,
    /// Monotonic seconds since spawn, read by time-parameterised patterns.
    pub pattern_timer: f32,
    /// +1.0 moving down, −1.0 moving up.
    pub move_dir: f32,
    pub move_speed: f32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Per-bullet movement modifier applied after plain velocity integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletBehavior {
    Plain,
    /// Steers velocity toward the player every frame.
    Homing,
    /// Cosmetic afterimage; moves like `Plain`.
    Trailing,
    /// Sinusoidal vertical offset driven by the bullet's own clock.
    Zigzag { clock: f32 },
    /// Cosmetic halo on the god element's cardinal burst.
    Divine,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per second.
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    /// Only meaningful for player-owned bullets.
    pub damage: f32,
    pub behavior: BulletBehavior,
}

// ── Drops, fields, particles ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Power,
    Charge,
    Life,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
}

/// The suction field left by the dark element's special ability.
#[derive(Clone, Debug)]
pub struct AreaEffect {
    pub center: Vec2,
    pub radius: f32,
    pub remaining: f32,
    pub duration: f32,
    /// Damage per second dealt to captured enemies (applied doubled).
    pub damage: f32,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    /// 0 at spawn; removed once it reaches 1.
    pub age: f32,
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Discrete happenings of a single step, for audio / persistence collaborators.
/// Cleared at the start of every step.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    AbilityActivated { element: Element },
    PlayerHit { hp_left: u32 },
    EnemyKilled { element: Element, pos: Vec2 },
    ItemCollected { kind: ItemKind },
    BossSpawned { stage: u32, element: Element },
    BossPhaseChanged { stage: u32, phase: usize },
    BossDefeated { stage: u32, element: Element },
    NewHighScore { score: u64 },
    GameOver { score: u64 },
    RunCleared { score: u64 },
}

// ── Master simulation state ───────────────────────────────────────────────────

/// The whole simulation snapshot.  Owned by the step while it runs; every
/// other consumer reads it between steps.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: Arc<GameConfig>,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub character: CharacterConfig,

    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub boss: Option<Boss>,
    pub player_bullets: Pool<Projectile>,
    pub enemy_bullets: Pool<Projectile>,
    pub items: Pool<Item>,
    pub particles: Pool<Particle>,
    /// At most one suction field exists at a time.
    pub area_effect: Option<AreaEffect>,

    /// 1-based stage; advances when the next boss spawns.
    pub stage: u32,
    pub wave_count: u32,
    pub wave_timer: f32,
    /// Countdown to the next boss while none is on screen.
    pub boss_timer: f32,
    pub bosses_defeated: u32,
    /// Set once the final boss falls; counts down to [`GameStatus::Cleared`].
    pub clear_timer: Option<f32>,

    pub elapsed: f32,
    pub frame: u64,
    pub score: u64,
    pub high_score: u64,
    pub high_score_announced: bool,
    pub status: GameStatus,
    pub events: Vec<GameEvent>,
}
