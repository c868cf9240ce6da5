//! Static game tables: characters, bosses, difficulty profiles.
//!
//! The simulation only ever reads these.  `GameConfig::default()` carries the
//! built-in tables; a TOML file of the same shape can replace them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyProfile;
use crate::entities::{Difficulty, Element};
use crate::error::{ConfigError, Result};
use crate::patterns::PatternId;

// ── Characters ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotConfig {
    pub damage: f32,
    /// Seconds between volleys.
    pub fire_rate: f32,
    pub speed: f32,
    pub count: u32,
    /// Degrees between neighbouring bullets of one volley.
    pub spread_deg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Blast,
    Shield,
    Dash,
    Wall,
    Laser,
    /// Leaves a suction field instead of hitting everything at once.
    Blackhole,
    Freeze,
    Chain,
}

impl AbilityKind {
    /// Cosmetic particles spawned at the player on activation.
    pub fn particle_burst(self) -> usize {
        match self {
            AbilityKind::Blast => 50,
            _ => 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityConfig {
    pub name: String,
    pub kind: AbilityKind,
    /// Flat damage to every enemy and the boss, or the suction field's
    /// damage per second for [`AbilityKind::Blackhole`].
    pub damage: f32,
    pub duration: f32,
    pub radius: f32,
    pub clear_bullets: bool,
    #[serde(default)]
    pub grants_invulnerability: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub element: Element,
    pub name: String,
    pub shot: ShotConfig,
    pub ability: AbilityConfig,
}

// ── Bosses ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Health ratio at or below which the phase applies.
    pub threshold: f32,
    pub pattern: PatternId,
    pub shot_interval: f32,
    pub bullet_count: usize,
    pub bullet_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    pub element: Element,
    pub name: String,
    pub color: u32,
    pub radius: f32,
    pub spawn: [f32; 2],
    /// Ordered by strictly decreasing threshold.
    pub phases: Vec<PhaseConfig>,
}

// ── Top level ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        PlayArea {
            width: 640.0,
            height: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "enabled")]
    pub particles_enabled: bool,
    #[serde(default)]
    pub play_area: PlayArea,
    pub characters: Vec<CharacterConfig>,
    pub bosses: Vec<BossConfig>,
    pub difficulties: Vec<DifficultyProfile>,
}

fn enabled() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            particles_enabled: true,
            play_area: PlayArea::default(),
            characters: Element::BASE.iter().map(|&e| builtin_character(e)).collect(),
            bosses: Element::BASE
                .iter()
                .chain(std::iter::once(&Element::God))
                .map(|&e| builtin_boss(e))
                .collect(),
            difficulties: Difficulty::ALL
                .iter()
                .map(|&d| DifficultyProfile::builtin(d))
                .collect(),
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tables the simulation cannot run on.
    pub fn validate(&self) -> Result<()> {
        if self.play_area.width <= 0.0 || self.play_area.height <= 0.0 {
            return Err(invalid("play area must have positive size"));
        }
        if self.characters.is_empty() {
            return Err(invalid("no characters defined"));
        }
        if self.bosses.is_empty() {
            return Err(invalid("no bosses defined"));
        }
        if self.difficulties.is_empty() {
            return Err(invalid("no difficulties defined"));
        }

        for c in &self.characters {
            if c.shot.count == 0 {
                return Err(invalid(format!("{}: shot count is zero", c.element.key())));
            }
            if c.shot.fire_rate <= 0.0 {
                return Err(invalid(format!("{}: fire rate must be positive", c.element.key())));
            }
        }

        for b in &self.bosses {
            let key = b.element.key();
            if b.phases.is_empty() {
                return Err(invalid(format!("boss {key}: no phases")));
            }
            if b.phases.windows(2).any(|w| w[1].threshold >= w[0].threshold) {
                return Err(invalid(format!(
                    "boss {key}: phase thresholds must strictly decrease"
                )));
            }
            for p in &b.phases {
                if p.bullet_count == 0 {
                    return Err(invalid(format!("boss {key}: phase with zero bullets")));
                }
                if p.shot_interval <= 0.0 {
                    return Err(invalid(format!("boss {key}: shot interval must be positive")));
                }
            }
        }

        for d in &self.difficulties {
            if d.spawn_interval <= 0.0 || d.enemy_shot_interval <= 0.0 {
                return Err(invalid(format!(
                    "{}: intervals must be positive",
                    d.difficulty.label()
                )));
            }
        }
        Ok(())
    }

    // ── Lookups (never fail) ──────────────────────────────────────────────────

    /// The character for `element`, falling back to fire, then to the
    /// built-in fire character.
    pub fn character(&self, element: Element) -> CharacterConfig {
        if let Some(c) = self.characters.iter().find(|c| c.element == element) {
            return c.clone();
        }
        log::warn!("no character for {}, using fire", element.key());
        self.characters
            .iter()
            .find(|c| c.element == Element::Fire)
            .cloned()
            .unwrap_or_else(|| builtin_character(Element::Fire))
    }

    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        if let Some(p) = self.difficulties.iter().find(|p| p.difficulty == difficulty) {
            return p.clone();
        }
        log::warn!("no profile for {}, using normal", difficulty.label());
        self.difficulties
            .iter()
            .find(|p| p.difficulty == Difficulty::Normal)
            .cloned()
            .unwrap_or_else(|| DifficultyProfile::builtin(Difficulty::Normal))
    }

    /// Stages 1–8 map onto the base elements in order; 9 and later are the
    /// god boss.  Missing entries fall back to the first table row.
    pub fn boss_for_stage(&self, stage: u32) -> BossConfig {
        let element = Element::for_stage(stage);
        if let Some(b) = self.bosses.iter().find(|b| b.element == element) {
            return b.clone();
        }
        log::warn!("no boss for stage {stage} ({}), using first entry", element.key());
        self.bosses
            .first()
            .cloned()
            .unwrap_or_else(|| builtin_boss(element))
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

// ── Built-in tables ───────────────────────────────────────────────────────────

fn shot(damage: f32, fire_rate: f32, speed: f32, count: u32, spread_deg: f32) -> ShotConfig {
    ShotConfig {
        damage,
        fire_rate,
        speed,
        count,
        spread_deg,
    }
}

fn ability(
    name: &str,
    kind: AbilityKind,
    damage: f32,
    duration: f32,
    radius: f32,
    clear_bullets: bool,
) -> AbilityConfig {
    AbilityConfig {
        name: name.to_string(),
        kind,
        damage,
        duration,
        radius,
        clear_bullets,
        grants_invulnerability: false,
    }
}

pub fn builtin_character(element: Element) -> CharacterConfig {
    use AbilityKind::*;
    let (name, shot_cfg, ability_cfg) = match element {
        Element::Fire => (
            "Ignis",
            shot(3.5, 0.15, 400.0, 1, 0.0),
            ability("Magma Core Explosion", Blast, 30.0, 1.5, 80.0, true),
        ),
        Element::Water => (
            "Aquaris",
            shot(2.2, 0.12, 350.0, 2, 15.0),
            ability("Purifying Blue Veil", Shield, 20.0, 2.0, 100.0, false),
        ),
        Element::Wind => (
            "Ventus",
            shot(1.8, 0.10, 450.0, 3, 20.0),
            AbilityConfig {
                grants_invulnerability: true,
                ..ability("Gale Trajectory Sweep", Dash, 25.0, 0.8, 60.0, false)
            },
        ),
        Element::Earth => (
            "Terraon",
            shot(2.8, 0.14, 380.0, 1, 0.0),
            ability("Compressed Terra Wall", Wall, 50.0, 2.5, 120.0, false),
        ),
        Element::Light => (
            "Lumine",
            shot(2.5, 0.11, 420.0, 2, 10.0),
            ability("Divine Flash Purge", Laser, 35.0, 2.0, 200.0, true),
        ),
        Element::Dark => (
            "Nocturna",
            shot(2.3, 0.13, 400.0, 1, 0.0),
            ability("Shadow Soul Capture", Blackhole, 45.0, 1.5, 90.0, false),
        ),
        Element::Ice => (
            "Friga",
            shot(2.0, 0.16, 360.0, 1, 0.0),
            ability("Absolute Zero Freeze", Freeze, 0.0, 3.0, 200.0, false),
        ),
        Element::Lightning => (
            "Zeuson",
            shot(2.5, 0.12, 420.0, 1, 0.0),
            ability("Chain Lightning Judgment", Chain, 30.0, 1.2, 150.0, false),
        ),
        Element::God => return builtin_character(Element::Fire),
    };
    CharacterConfig {
        element,
        name: name.to_string(),
        shot: shot_cfg,
        ability: ability_cfg,
    }
}

fn phase(
    threshold: f32,
    pattern: PatternId,
    shot_interval: f32,
    bullet_count: usize,
    bullet_speed: f32,
) -> PhaseConfig {
    PhaseConfig {
        threshold,
        pattern,
        shot_interval,
        bullet_count,
        bullet_speed,
    }
}

pub fn builtin_boss(element: Element) -> BossConfig {
    use PatternId::*;
    let (color, radius, phases) = match element {
        Element::Fire => (
            0xff4500,
            45.0,
            [
                phase(1.0, FlameSpiral, 1.2, 8, 120.0),
                phase(0.66, FireRain, 0.8, 12, 140.0),
                phase(0.33, InfernoBurst, 0.6, 16, 160.0),
            ],
        ),
        Element::Water => (
            0x4a90e2,
            40.0,
            [
                phase(1.0, WaveCascade, 1.0, 6, 100.0),
                phase(0.66, TidalWave, 0.7, 10, 120.0),
                phase(0.33, Tsunami, 0.5, 20, 150.0),
            ],
        ),
        Element::Wind => (
            0x7cb342,
            32.0,
            [
                phase(1.0, WindSpiral, 0.8, 12, 180.0),
                phase(0.66, Tornado, 0.6, 16, 200.0),
                phase(0.33, Hurricane, 0.4, 24, 220.0),
            ],
        ),
        Element::Earth => (
            0xa1887f,
            55.0,
            [
                phase(1.0, RockShower, 1.5, 8, 80.0),
                phase(0.66, Earthquake, 1.0, 12, 100.0),
                phase(0.33, Avalanche, 0.7, 20, 120.0),
            ],
        ),
        Element::Light => (
            0xffeb3b,
            48.0,
            [
                phase(1.0, HolyRay, 1.0, 8, 150.0),
                phase(0.66, DivineCross, 0.8, 12, 170.0),
                phase(0.33, Judgement, 0.6, 16, 190.0),
            ],
        ),
        Element::Dark => (
            0x5e35b1,
            52.0,
            [
                phase(1.0, DarkSpiral, 1.1, 10, 130.0),
                phase(0.66, VoidBurst, 0.9, 14, 150.0),
                phase(0.33, BlackHole, 0.7, 18, 170.0),
            ],
        ),
        Element::Ice => (
            0x4dd0e1,
            36.0,
            [
                phase(1.0, IceShard, 1.2, 6, 110.0),
                phase(0.66, Blizzard, 0.8, 12, 130.0),
                phase(0.33, AbsoluteZero, 0.6, 24, 160.0),
            ],
        ),
        Element::Lightning => (
            0xffea00,
            50.0,
            [
                phase(1.0, LightningBolt, 0.9, 10, 200.0),
                phase(0.66, ThunderStorm, 0.7, 16, 220.0),
                phase(0.33, DivineThunder, 0.5, 32, 250.0),
            ],
        ),
        Element::God => (
            0xffffff,
            70.0,
            [
                phase(1.0, DivineCross, 0.8, 12, 180.0),
                phase(0.66, Judgement, 0.6, 20, 200.0),
                phase(0.33, DivineThunder, 0.4, 40, 250.0),
            ],
        ),
    };
    BossConfig {
        element,
        name: format!("{} Sovereign", capitalised(element.key())),
        color,
        radius,
        spawn: [500.0, 240.0],
        phases: phases.to_vec(),
    }
}

fn capitalised(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
