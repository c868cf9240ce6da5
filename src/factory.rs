//! Record constructors.  Every entity enters the simulation through here,
//! fully populated, with its runtime timers seeded.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::config::{BossConfig, CharacterConfig, PlayArea};
use crate::difficulty::DifficultyProfile;
use crate::entities::{
    Boss, BossPhase, BulletBehavior, Element, Enemy, Item, ItemKind, MovePattern, Particle,
    Player, Projectile,
};

// ── Constants ─────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 12.0;
pub const PLAYER_SPEED: f32 = 140.0;
pub const PLAYER_BULLET_RADIUS: f32 = 3.0;
pub const PLAYER_BULLET_COLOR: u32 = 0xfff9c4;
/// Player bullets leave the muzzle this far ahead of the ship's centre.
pub const MUZZLE_OFFSET: f32 = 12.0;

pub const ENEMY_RADIUS: f32 = 18.0;
pub const ENEMY_SPEED: f32 = 20.0;
pub const ENEMY_FIRST_SHOT: f32 = 1.2;
/// Upper bound of the uniform delay added to every enemy shot timer.
pub const SHOT_JITTER: f32 = 0.5;
pub const ENEMY_BULLET_RADIUS: f32 = 4.0;

pub const BOSS_MOVE_SPEED: f32 = 50.0;

/// Particles scatter uniformly within ±this many pixels of their origin.
pub const PARTICLE_SPREAD: f32 = 30.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Fresh player on the left of the field, facing right.
pub fn player(character: &CharacterConfig, profile: &DifficultyProfile, area: &PlayArea) -> Player {
    Player {
        pos: Vec2::new(area.width * 0.125, area.height * 0.5),
        radius: PLAYER_RADIUS,
        speed: PLAYER_SPEED,
        hp: profile.player_hp,
        max_hp: profile.player_hp,
        charges: profile.player_charges,
        max_charges: profile.player_charges,
        power: 0.0,
        max_power: profile.max_power,
        invulnerable: 0.0,
        shot_cooldown: 0.0,
        element: character.element,
    }
}

/// One volley from the player's gun.  Bullet `i` of `n` is rotated by
/// `(i − (n−1)/2) × spread` degrees off the forward axis.
pub fn player_volley(player: &Player, character: &CharacterConfig) -> Vec<Projectile> {
    let shot = &character.shot;
    let damage = shot.damage * (1.0 + player.power * 0.01);
    let origin = player.pos + Vec2::new(MUZZLE_OFFSET, 0.0);
    let centre = (shot.count as f32 - 1.0) / 2.0;

    (0..shot.count)
        .map(|i| {
            let offset = (i as f32 - centre) * shot.spread_deg.to_radians();
            Projectile {
                pos: origin,
                vel: Vec2::new(offset.cos(), offset.sin()) * shot.speed,
                radius: PLAYER_BULLET_RADIUS,
                color: PLAYER_BULLET_COLOR,
                damage,
                behavior: BulletBehavior::Plain,
            }
        })
        .collect()
}

// ── Enemies ───────────────────────────────────────────────────────────────────

pub fn enemy(
    pos: Vec2,
    element: Element,
    hp: f32,
    move_pattern: MovePattern,
    rng: &mut impl Rng,
) -> Enemy {
    Enemy {
        pos,
        radius: ENEMY_RADIUS,
        hp,
        max_hp: hp,
        element,
        speed: ENEMY_SPEED,
        move_pattern,
        move_timer: 0.0,
        shot_timer: ENEMY_FIRST_SHOT + rng.gen::<f32>() * SHOT_JITTER,
    }
}

/// A wave of `count` enemies entering from the right edge.
///
/// From stage 3 an enemy has a 30 % chance to weave; from stage 5 a further
/// 20 % roll turns it into a zigzagger regardless of the first roll.
pub fn wave(
    count: u32,
    element: Element,
    hp: f32,
    stage: u32,
    area: &PlayArea,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let x = area.width - area.width * 0.09375;
    let margin = area.height / 12.0;

    (0..count)
        .map(|_| {
            let y = margin + rng.gen::<f32>() * (area.height - 2.0 * margin);
            let mut pattern = MovePattern::Linear;
            if stage >= 3 && rng.gen::<f32>() < 0.3 {
                pattern = MovePattern::Wave;
            }
            if stage >= 5 && rng.gen::<f32>() < 0.2 {
                pattern = MovePattern::Zigzag;
            }
            enemy(Vec2::new(x, y), element, hp, pattern, rng)
        })
        .collect()
}

/// The element-specific shot of an enemy aiming along unit vector `dir`.
pub fn enemy_volley(enemy: &Enemy, dir: Vec2, speed: f32, rng: &mut impl Rng) -> Vec<Projectile> {
    let color = enemy.element.color();
    let aimed = |scale: f32, radius: f32, behavior: BulletBehavior| Projectile {
        behavior,
        ..projectile(enemy.pos, dir * speed * scale, radius, color)
    };

    match enemy.element {
        Element::Fire => vec![aimed(1.0, ENEMY_BULLET_RADIUS, BulletBehavior::Plain)],
        // Three shots a tenth of a second apart, laid out along the aim line.
        Element::Water => (0..3)
            .map(|i| {
                let mut bullet = aimed(1.0, ENEMY_BULLET_RADIUS, BulletBehavior::Plain);
                bullet.pos -= bullet.vel * 0.1 * i as f32;
                bullet
            })
            .collect(),
        Element::Wind => {
            let mut bullet = aimed(1.0, ENEMY_BULLET_RADIUS, BulletBehavior::Plain);
            bullet.vel.x += (rng.gen::<f32>() - 0.5) * 0.3;
            vec![bullet]
        }
        Element::Earth => vec![aimed(0.8, ENEMY_BULLET_RADIUS + 2.0, BulletBehavior::Plain)],
        Element::Light => vec![aimed(1.3, ENEMY_BULLET_RADIUS - 1.0, BulletBehavior::Plain)],
        Element::Dark => vec![aimed(0.7, ENEMY_BULLET_RADIUS, BulletBehavior::Homing)],
        Element::Ice => vec![aimed(1.0, ENEMY_BULLET_RADIUS, BulletBehavior::Trailing)],
        Element::Lightning => vec![aimed(
            1.0,
            ENEMY_BULLET_RADIUS,
            BulletBehavior::Zigzag { clock: 0.0 },
        )],
        Element::God => [0.0, PI / 2.0, PI, PI * 1.5]
            .iter()
            .map(|&angle| Projectile {
                behavior: BulletBehavior::Divine,
                ..projectile(
                    enemy.pos,
                    Vec2::new(angle.cos(), angle.sin()) * speed,
                    ENEMY_BULLET_RADIUS + 1.0,
                    color,
                )
            })
            .collect(),
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

/// Instantiate a boss from its table entry.  Phase generators are resolved
/// here, once.
pub fn boss(config: &BossConfig, stage: u32, max_hp: f32) -> Boss {
    let phases = config
        .phases
        .iter()
        .map(|p| BossPhase {
            threshold: p.threshold,
            pattern: p.pattern,
            generator: p.pattern.generator(),
            shot_interval: p.shot_interval,
            bullet_count: p.bullet_count,
            bullet_speed: p.bullet_speed,
        })
        .collect();

    Boss {
        name: config.name.clone(),
        element: config.element,
        color: config.color,
        stage,
        pos: Vec2::from(config.spawn),
        radius: config.radius,
        hp: max_hp,
        max_hp,
        phases,
        phase: 1,
        shot_timer: 0.0,
        pattern_timer: 0.0,
        move_dir: 1.0,
        move_speed: BOSS_MOVE_SPEED,
    }
}

// ── Projectiles, items, particles ─────────────────────────────────────────────

/// A plain enemy-owned bullet.
pub fn projectile(pos: Vec2, vel: Vec2, radius: f32, color: u32) -> Projectile {
    Projectile {
        pos,
        vel,
        radius,
        color,
        damage: 0.0,
        behavior: BulletBehavior::Plain,
    }
}

pub fn item(pos: Vec2, kind: ItemKind) -> Item {
    Item { pos, kind }
}

pub fn particles(center: Vec2, count: usize, rng: &mut impl Rng) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            pos: center
                + Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
            age: 0.0,
        })
        .collect()
}
