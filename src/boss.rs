//! Boss phase machine: health-ratio phase selection, movement and firing.

use glam::Vec2;
use rand::Rng;

use crate::config::PlayArea;
use crate::entities::{Boss, BossPhase, Projectile};
use crate::patterns::PatternContext;

/// Distance the boss keeps from the top and bottom edges while patrolling.
const PATROL_MARGIN: f32 = 100.0;

/// Remaining health as a fraction of maximum.
pub fn health_ratio(boss: &Boss) -> f32 {
    if boss.max_hp > 0.0 {
        boss.hp / boss.max_hp
    } else {
        0.0
    }
}

/// 1-based phase for a health ratio: the deepest phase whose threshold the
/// ratio has fallen to.  With thresholds `[1.0, 0.66, 0.33]` a ratio of 0.7
/// stays in phase 1, 0.6 selects phase 2 and 0.2 phase 3.
///
/// A pure function of its inputs, so calling it twice is harmless.
pub fn select_phase(phases: &[BossPhase], ratio: f32) -> usize {
    phases
        .iter()
        .rposition(|p| ratio <= p.threshold)
        .map(|i| i + 1)
        .unwrap_or(1)
}

pub fn current_phase(boss: &Boss) -> Option<&BossPhase> {
    boss.phases.get(boss.phase.saturating_sub(1))
}

/// Advance one boss by `dt`: patrol, re-select the phase, tick the timers,
/// and fire the active pattern into `out` when the shot timer runs out.
///
/// Returns the new phase number when it changed this step.
pub fn update_boss(
    boss: &mut Boss,
    target: Vec2,
    dt: f32,
    area: &PlayArea,
    out: &mut Vec<Projectile>,
    rng: &mut impl Rng,
) -> Option<usize> {
    patrol(boss, area, dt);

    // Never step back to an earlier phase, even if health is restored.
    let selected = select_phase(&boss.phases, health_ratio(boss)).max(boss.phase);
    let changed = (selected != boss.phase).then(|| {
        log::debug!("{} enters phase {}", boss.name, selected);
        boss.phase = selected;
        selected
    });

    boss.shot_timer -= dt;
    boss.pattern_timer += dt;

    if boss.shot_timer <= 0.0 {
        if let Some(interval) = fire(boss, target, area, out, rng) {
            boss.shot_timer = interval;
        }
    }

    changed
}

/// Run the active phase's pattern once; returns that phase's shot interval.
fn fire(
    boss: &Boss,
    target: Vec2,
    area: &PlayArea,
    out: &mut Vec<Projectile>,
    rng: &mut impl Rng,
) -> Option<f32> {
    let phase = current_phase(boss)?;
    let ctx = PatternContext {
        origin: boss.pos,
        timer: boss.pattern_timer,
        target,
        count: phase.bullet_count,
        speed: phase.bullet_speed,
        area: *area,
    };
    (phase.generator)(&ctx, out, rng);
    Some(phase.shot_interval)
}

/// Vertical bounce between the patrol margins.
fn patrol(boss: &mut Boss, area: &PlayArea, dt: f32) {
    let top = PATROL_MARGIN.min(area.height / 2.0);
    let bottom = (area.height - PATROL_MARGIN).max(top);

    boss.pos.y += boss.move_dir * boss.move_speed * dt;
    if boss.pos.y <= top {
        boss.pos.y = top;
        boss.move_dir = 1.0;
    } else if boss.pos.y >= bottom {
        boss.pos.y = bottom;
        boss.move_dir = -1.0;
    }
}
