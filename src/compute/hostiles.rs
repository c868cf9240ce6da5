//! Everything that moves against the player: projectiles, the suction field,
//! enemies, bosses and wave spawning.

use glam::Vec2;
use rand::Rng;

use super::emit_particles;
use crate::boss;
use crate::config::PlayArea;
use crate::entities::{BulletBehavior, Element, GameEvent, GameState, MovePattern, Projectile};
use crate::factory;

/// Player bullets are culled this far outside the play area.
const PLAYER_BULLET_MARGIN: f32 = 10.0;
/// Enemy bullets get more slack so curving and homing shots can come back.
const ENEMY_BULLET_MARGIN: f32 = 80.0;

const HOMING_FORCE: f32 = 50.0;

const FIELD_PULL_ENEMY: f32 = 200.0;
const FIELD_PULL_BULLET: f32 = 250.0;
const FIELD_CAPTURE_ENEMY: f32 = 10.0;
const FIELD_CAPTURE_BULLET: f32 = 15.0;

// ── 5. Projectiles ────────────────────────────────────────────────────────────

pub(super) fn advance_projectiles(state: &mut GameState, dt: f32) {
    let area = state.config.play_area;
    let target = state.player.pos;

    for bullet in state.player_bullets.iter_mut() {
        bullet.pos += bullet.vel * dt;
    }
    state
        .player_bullets
        .kill_where(|b| !inside(b.pos, &area, PLAYER_BULLET_MARGIN));

    for bullet in state.enemy_bullets.iter_mut() {
        advance_enemy_bullet(bullet, target, dt);
    }
    state
        .enemy_bullets
        .kill_where(|b| !inside(b.pos, &area, ENEMY_BULLET_MARGIN));
}

/// Integrate velocity, then apply the bullet's own behaviour.
fn advance_enemy_bullet(bullet: &mut Projectile, target: Vec2, dt: f32) {
    bullet.pos += bullet.vel * dt;

    match &mut bullet.behavior {
        BulletBehavior::Homing => {
            let to_target = target - bullet.pos;
            let distance = to_target.length();
            if distance > 0.0 {
                bullet.vel += to_target / distance * HOMING_FORCE * dt;
            }
        }
        BulletBehavior::Zigzag { clock } => {
            *clock += dt;
            bullet.pos.y += (*clock * 10.0).sin() * 30.0 * dt;
        }
        BulletBehavior::Plain | BulletBehavior::Trailing | BulletBehavior::Divine => {}
    }
}

fn inside(pos: Vec2, area: &PlayArea, margin: f32) -> bool {
    pos.x > -margin
        && pos.x < area.width + margin
        && pos.y > -margin
        && pos.y < area.height + margin
}

// ── 6. Suction field ──────────────────────────────────────────────────────────

pub(super) fn update_area_effect(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let Some(mut field) = state.area_effect.take() else {
        return;
    };
    field.remaining -= dt;

    let mut bursts: Vec<(Vec2, usize)> = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.hp > 0.0) {
        let to_center = field.center - enemy.pos;
        let distance = to_center.length();
        if distance >= field.radius {
            continue;
        }
        if distance > 0.0 {
            enemy.pos += to_center / distance * FIELD_PULL_ENEMY * dt;
        }
        if distance < FIELD_CAPTURE_ENEMY {
            enemy.hp -= field.damage * dt * 2.0;
            bursts.push((enemy.pos, 2));
        }
    }

    for index in 0..state.enemy_bullets.slots() {
        let Some(bullet) = state.enemy_bullets.get_mut(index) else {
            continue;
        };
        let to_center = field.center - bullet.pos;
        let distance = to_center.length();
        if distance >= field.radius {
            continue;
        }
        if distance > 0.0 {
            bullet.pos += to_center / distance * FIELD_PULL_BULLET * dt;
        }
        if distance < FIELD_CAPTURE_BULLET {
            let at = bullet.pos;
            state.enemy_bullets.kill(index);
            bursts.push((at, 1));
        }
    }

    for (at, count) in bursts {
        emit_particles(state, at, count, rng);
    }

    if field.remaining > 0.0 {
        state.area_effect = Some(field);
    }
}

// ── 7. Enemies ────────────────────────────────────────────────────────────────

pub(super) fn update_enemies(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let target = state.player.pos;
    let bullet_speed = state.profile.enemy_bullet_speed;
    let interval = state.profile.enemy_shot_interval;
    let mut fired = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.hp > 0.0) {
        enemy.move_timer += dt;
        enemy.pos.x -= enemy.speed * dt;
        match enemy.move_pattern {
            MovePattern::Linear => {}
            MovePattern::Wave => enemy.pos.y += (enemy.move_timer * 3.0).sin() * 30.0 * dt,
            MovePattern::Zigzag => enemy.pos.y += (enemy.move_timer * 5.0).sin() * 50.0 * dt,
        }

        enemy.shot_timer -= dt;
        if enemy.shot_timer <= 0.0 {
            let aim = target - enemy.pos;
            let distance = aim.length();
            if distance > 0.0 {
                fired.extend(factory::enemy_volley(enemy, aim / distance, bullet_speed, rng));
            }
            enemy.shot_timer = interval + rng.gen::<f32>() * factory::SHOT_JITTER;
        }
    }

    state.enemy_bullets.extend(fired);
}

// ── 8. Boss and wave orchestration ────────────────────────────────────────────

pub(super) fn orchestrate(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    state.wave_timer -= dt;
    let run_won = state.clear_timer.is_some();

    if state.boss.is_none() && !run_won {
        state.boss_timer -= dt;
        if state.boss_timer <= 0.0 {
            spawn_boss(state);
        }
    }

    drive_boss(state, dt, rng);

    if state.boss.is_none() && !run_won && state.wave_timer <= 0.0 {
        spawn_wave(state, rng);
    }
}

fn spawn_boss(state: &mut GameState) {
    let stage = state.bosses_defeated + 1;
    let config = state.config.boss_for_stage(stage);
    let max_hp = state.profile.boss_hp(stage, state.elapsed);
    let boss = factory::boss(&config, stage, max_hp);

    log::info!(
        "stage {} boss {} appears with {} hp",
        stage,
        boss.name,
        max_hp
    );
    state.stage = stage;
    state.events.push(GameEvent::BossSpawned {
        stage,
        element: boss.element,
    });
    state.boss = Some(boss);
}

fn drive_boss(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let target = state.player.pos;
    let area = state.config.play_area;
    let Some(current) = state.boss.as_mut() else {
        return;
    };

    let mut fired = Vec::new();
    let changed = boss::update_boss(current, target, dt, &area, &mut fired, rng);
    let stage = current.stage;

    state.enemy_bullets.extend(fired);
    if let Some(phase) = changed {
        state.events.push(GameEvent::BossPhaseChanged { stage, phase });
    }
}

fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) {
    let count = state.profile.wave_size(state.wave_count);
    let hp = state.profile.enemy_hp(state.stage, state.elapsed);
    let element = Element::for_stage(state.stage);
    let area = state.config.play_area;

    let wave = factory::wave(count, element, hp, state.stage, &area, rng);
    log::debug!(
        "wave {}: {} {} enemies, {} hp each",
        state.wave_count,
        count,
        element.key(),
        hp
    );
    state.enemies.extend(wave);
    state.wave_count += 1;
    state.wave_timer = state.profile.spawn_interval;
}
