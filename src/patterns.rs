//! Boss attack patterns.
//!
//! Every pattern is a plain function with the [`PatternFn`] signature.  A
//! [`PatternId`] is resolved to its function once, when the boss is built,
//! so firing never dispatches on a name.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::PlayArea;
use crate::entities::Projectile;
use crate::factory::projectile;

/// Everything a pattern may read when it fires.
#[derive(Clone, Copy, Debug)]
pub struct PatternContext {
    /// Boss centre.
    pub origin: Vec2,
    /// Boss pattern timer: seconds since spawn.
    pub timer: f32,
    /// Player centre.
    pub target: Vec2,
    pub count: usize,
    pub speed: f32,
    pub area: PlayArea,
}

pub type PatternFn = fn(&PatternContext, &mut Vec<Projectile>, &mut dyn RngCore);

// ── Identifiers ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    FlameSpiral,
    FireRain,
    InfernoBurst,
    WaveCascade,
    TidalWave,
    Tsunami,
    WindSpiral,
    Tornado,
    Hurricane,
    RockShower,
    Earthquake,
    Avalanche,
    HolyRay,
    DivineCross,
    Judgement,
    DarkSpiral,
    VoidBurst,
    BlackHole,
    IceShard,
    Blizzard,
    AbsoluteZero,
    LightningBolt,
    ThunderStorm,
    DivineThunder,
    /// Any name not listed above.  Fires nothing.
    #[serde(other)]
    Unknown,
}

impl PatternId {
    pub const ALL: [PatternId; 24] = [
        PatternId::FlameSpiral,
        PatternId::FireRain,
        PatternId::InfernoBurst,
        PatternId::WaveCascade,
        PatternId::TidalWave,
        PatternId::Tsunami,
        PatternId::WindSpiral,
        PatternId::Tornado,
        PatternId::Hurricane,
        PatternId::RockShower,
        PatternId::Earthquake,
        PatternId::Avalanche,
        PatternId::HolyRay,
        PatternId::DivineCross,
        PatternId::Judgement,
        PatternId::DarkSpiral,
        PatternId::VoidBurst,
        PatternId::BlackHole,
        PatternId::IceShard,
        PatternId::Blizzard,
        PatternId::AbsoluteZero,
        PatternId::LightningBolt,
        PatternId::ThunderStorm,
        PatternId::DivineThunder,
    ];

    pub fn generator(self) -> PatternFn {
        match self {
            PatternId::FlameSpiral => flame_spiral,
            PatternId::FireRain => fire_rain,
            PatternId::InfernoBurst => inferno_burst,
            PatternId::WaveCascade => wave_cascade,
            PatternId::TidalWave => tidal_wave,
            PatternId::Tsunami => tsunami,
            PatternId::WindSpiral => wind_spiral,
            PatternId::Tornado => tornado,
            PatternId::Hurricane => hurricane,
            PatternId::RockShower => rock_shower,
            PatternId::Earthquake => earthquake,
            PatternId::Avalanche => avalanche,
            PatternId::HolyRay => holy_ray,
            PatternId::DivineCross => divine_cross,
            PatternId::Judgement => judgement,
            PatternId::DarkSpiral => dark_spiral,
            PatternId::VoidBurst => void_burst,
            PatternId::BlackHole => black_hole,
            PatternId::IceShard => ice_shard,
            PatternId::Blizzard => blizzard,
            PatternId::AbsoluteZero => absolute_zero,
            PatternId::LightningBolt => lightning_bolt,
            PatternId::ThunderStorm => thunder_storm,
            PatternId::DivineThunder => divine_thunder,
            PatternId::Unknown => silent,
        }
    }

    /// Label shown on the boss bar.
    pub fn name(self) -> &'static str {
        match self {
            PatternId::FlameSpiral => "flame_spiral",
            PatternId::FireRain => "fire_rain",
            PatternId::InfernoBurst => "inferno_burst",
            PatternId::WaveCascade => "wave_cascade",
            PatternId::TidalWave => "tidal_wave",
            PatternId::Tsunami => "tsunami",
            PatternId::WindSpiral => "wind_spiral",
            PatternId::Tornado => "tornado",
            PatternId::Hurricane => "hurricane",
            PatternId::RockShower => "rock_shower",
            PatternId::Earthquake => "earthquake",
            PatternId::Avalanche => "avalanche",
            PatternId::HolyRay => "holy_ray",
            PatternId::DivineCross => "divine_cross",
            PatternId::Judgement => "judgement",
            PatternId::DarkSpiral => "dark_spiral",
            PatternId::VoidBurst => "void_burst",
            PatternId::BlackHole => "black_hole",
            PatternId::IceShard => "ice_shard",
            PatternId::Blizzard => "blizzard",
            PatternId::AbsoluteZero => "absolute_zero",
            PatternId::LightningBolt => "lightning_bolt",
            PatternId::ThunderStorm => "thunder_storm",
            PatternId::DivineThunder => "divine_thunder",
            PatternId::Unknown => "unknown",
        }
    }
}

// ── Shared geometry ───────────────────────────────────────────────────────────

fn polar(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * length
}

fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// `count / parts` rounded up: how many times `i < count / parts` holds.
fn share(count: usize, parts: usize) -> usize {
    (count + parts - 1) / parts
}

/// Uniform in `[-0.5, 0.5)`.
fn jitter(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>() - 0.5
}

/// `count` bullets evenly around a circle, rotated by `offset`.
fn ring(
    ctx: &PatternContext,
    out: &mut Vec<Projectile>,
    offset: f32,
    radius: f32,
    color: u32,
) {
    for i in 0..ctx.count {
        let angle = TAU * i as f32 / ctx.count as f32 + offset;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), radius, color));
    }
}

fn silent(_: &PatternContext, _: &mut Vec<Projectile>, _: &mut dyn RngCore) {}

// ── Fire ──────────────────────────────────────────────────────────────────────

fn flame_spiral(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    ring(ctx, out, ctx.timer, 4.0, 0xff4500);
}

fn fire_rain(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    let aim = angle_to(ctx.origin, ctx.target);
    for _ in 0..ctx.count {
        let angle = aim + PI / 4.0 * jitter(rng);
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 4.0, 0xff6b6b));
    }
}

fn inferno_burst(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    ring(ctx, out, 0.0, 5.0, 0xff0000);
}

// ── Water ─────────────────────────────────────────────────────────────────────

fn wave_cascade(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    let lift = (ctx.timer * 3.0).sin() * 30.0;
    let half = ctx.count as f32 / 2.0;
    for i in 0..ctx.count {
        let angle = PI + (i as f32 - half) * 0.2;
        let vel = polar(angle, ctx.speed) + Vec2::new(0.0, lift);
        out.push(projectile(ctx.origin, vel, 4.0, 0x4a90e2));
    }
}

fn tidal_wave(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    for i in 0..ctx.count {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let angle = PI + side * PI / 6.0;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 4.0, 0x66ddff));
    }
}

fn tsunami(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    for i in 0..ctx.count {
        let angle = PI * (0.5 + i as f32 / ctx.count as f32);
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 6.0, 0x0066cc));
    }
}

// ── Wind ──────────────────────────────────────────────────────────────────────

fn wind_spiral(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    ring(ctx, out, ctx.timer * 2.0, 3.0, 0x7cb342);
}

/// Emission points on a widening helix, each firing tangentially.
fn tornado(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    for i in 0..ctx.count {
        let radius = 50.0 + i as f32 * 10.0;
        let angle = ctx.timer * 3.0 + i as f32 * 0.5;
        let pos = ctx.origin + polar(angle, radius);
        out.push(projectile(pos, polar(angle + PI / 2.0, ctx.speed), 3.0, 0x90ee90));
    }
}

fn hurricane(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    let radius = 30.0 + (ctx.timer * 2.0).sin() * 20.0;
    for i in 0..ctx.count {
        let angle = TAU * i as f32 / ctx.count as f32 + ctx.timer * 4.0;
        let pos = ctx.origin + polar(angle, radius);
        let vel = polar(angle + PI / 2.0, ctx.speed * 1.5);
        out.push(projectile(pos, vel, 4.0, 0x66cc66));
    }
}

// ── Earth ─────────────────────────────────────────────────────────────────────

/// Rocks dropped straight down from the top edge around the boss column.
fn rock_shower(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    for _ in 0..ctx.count {
        let pos = Vec2::new(ctx.origin.x + jitter(rng) * 200.0, 0.0);
        out.push(projectile(pos, Vec2::new(0.0, ctx.speed), 6.0, 0xa1887f));
    }
}

fn earthquake(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    for _ in 0..ctx.count {
        let angle = PI / 2.0 + jitter(rng) * PI / 3.0;
        let vel = Vec2::new(angle.cos() * ctx.speed * 0.5, angle.sin() * ctx.speed);
        let pos = ctx.origin + Vec2::new(jitter(rng) * 100.0, 50.0);
        out.push(projectile(pos, vel, 5.0, 0x8d6e63));
    }
}

/// Aimed at the floor line below the player, spread ±50 px.
fn avalanche(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    let floor = ctx.area.height * 5.0 / 6.0;
    for _ in 0..ctx.count {
        let landing = Vec2::new(ctx.target.x + jitter(rng) * 100.0, floor);
        let angle = angle_to(ctx.origin, landing);
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 7.0, 0x795548));
    }
}

// ── Light ─────────────────────────────────────────────────────────────────────

fn holy_ray(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    ring(ctx, out, 0.0, 4.0, 0xffeb3b);
}

/// A quarter of the volley down each cardinal axis.  Bullets on one axis
/// overlap exactly and read as a single heavy stream.
fn divine_cross(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    for dir in [0.0, PI / 2.0, PI, PI * 3.0 / 2.0] {
        for _ in 0..share(ctx.count, 4) {
            out.push(projectile(ctx.origin, polar(dir, ctx.speed), 4.0, 0xfff59d));
        }
    }
}

fn judgement(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    let aim = angle_to(ctx.origin, ctx.target);
    let half = ctx.count as f32 / 2.0;
    for i in 0..ctx.count {
        let angle = aim + (i as f32 - half) * 0.1;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 5.0, 0xfdd835));
    }
}

// ── Dark ──────────────────────────────────────────────────────────────────────

fn dark_spiral(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    ring(ctx, out, -ctx.timer, 4.0, 0x5e35b1);
}

fn void_burst(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    for _ in 0..ctx.count {
        let angle = rng.gen::<f32>() * TAU;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 5.0, 0x7e57c2));
    }
}

/// A spinning ring 80 px out, every bullet fired back through the centre.
fn black_hole(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    for i in 0..ctx.count {
        let angle = TAU * i as f32 / ctx.count as f32 + ctx.timer * 5.0;
        let pos = ctx.origin + polar(angle, 80.0);
        out.push(projectile(pos, polar(angle + PI, ctx.speed), 4.0, 0x4a148c));
    }
}

// ── Ice ───────────────────────────────────────────────────────────────────────

fn ice_shard(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    for i in 0..ctx.count {
        let angle = TAU * i as f32 / ctx.count as f32 + rng.gen::<f32>() * 0.3;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 4.0, 0x4dd0e1));
    }
}

fn blizzard(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    for i in 0..ctx.count {
        let angle = rng.gen::<f32>() * TAU;
        let wobble = (ctx.timer * 3.0 + i as f32).sin() * 30.0;
        let vel = polar(angle, ctx.speed) + Vec2::splat(wobble);
        out.push(projectile(ctx.origin, vel, 3.0, 0x80deea));
    }
}

/// Three concentric rings, each 30 px/s slower than the last.
fn absolute_zero(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    const RINGS: usize = 3;
    let per_ring = ctx.count as f32 / RINGS as f32;
    for layer in 0..RINGS {
        let speed = ctx.speed - layer as f32 * 30.0;
        for i in 0..share(ctx.count, RINGS) {
            let angle = TAU * i as f32 / per_ring;
            out.push(projectile(ctx.origin, polar(angle, speed), 5.0, 0x00bcd4));
        }
    }
}

// ── Lightning ─────────────────────────────────────────────────────────────────

fn lightning_bolt(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    let aim = angle_to(ctx.origin, ctx.target);
    for i in 0..ctx.count {
        let angle = aim + (i as f32 * 0.5).sin() * 0.3;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 3.0, 0xffea00));
    }
}

fn thunder_storm(ctx: &PatternContext, out: &mut Vec<Projectile>, rng: &mut dyn RngCore) {
    for _ in 0..ctx.count {
        let angle = rng.gen::<f32>() * TAU;
        let erratic = jitter(rng) * ctx.speed * 0.5;
        let vel = polar(angle, ctx.speed) + Vec2::splat(erratic);
        let pos = ctx.origin + Vec2::new(jitter(rng), jitter(rng)) * 50.0;
        out.push(projectile(pos, vel, 4.0, 0xffc107));
    }
}

/// Half the volley as a tight aimed fan, half as a fast rotating ring.
fn divine_thunder(ctx: &PatternContext, out: &mut Vec<Projectile>, _: &mut dyn RngCore) {
    let aim = angle_to(ctx.origin, ctx.target);
    let half = ctx.count as f32 / 2.0;
    let quarter = ctx.count as f32 / 4.0;
    let per_group = share(ctx.count, 2);

    for i in 0..per_group {
        let angle = aim + (i as f32 - quarter) * 0.05;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed), 6.0, 0xff6f00));
    }
    for i in 0..per_group {
        let angle = TAU * i as f32 / half + ctx.timer * 3.0;
        out.push(projectile(ctx.origin, polar(angle, ctx.speed * 1.2), 5.0, 0xff8f00));
    }
}
