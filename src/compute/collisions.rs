//! Hit resolution and removal of fallen entities.

use glam::Vec2;
use rand::Rng;

use super::{
    circles_overlap, emit_particles, PENALTY_PLAYER_HIT, SCORE_BOSS_HIT, SCORE_ENEMY_HIT,
    SCORE_ENEMY_KILL,
};
use crate::affinity;
use crate::entities::{GameEvent, GameState, GameStatus};

/// Seconds of invulnerability after taking a hit.
const HIT_INVULNERABILITY: f32 = 1.5;
/// Enemies past this x have left through the trailing edge.
const ENEMY_CULL_X: f32 = -50.0;

// ── 9. Player bullets ─────────────────────────────────────────────────────────

/// Each bullet damages the first live enemy it overlaps, or failing that the
/// boss, and is consumed.  A consumed bullet is never checked again.
pub(super) fn player_bullets(state: &mut GameState, rng: &mut impl Rng) {
    let attacker = state.player.element;
    let mut bursts: Vec<(Vec2, usize)> = Vec::new();

    for bi in 0..state.player_bullets.slots() {
        let Some(bullet) = state.player_bullets.get(bi) else {
            continue;
        };
        let (pos, radius, damage) = (bullet.pos, bullet.radius, bullet.damage);

        let enemy_hit = state
            .enemies
            .iter_mut()
            .filter(|e| e.hp > 0.0)
            .find(|e| circles_overlap(pos, radius, e.pos, e.radius));

        let consumed = if let Some(enemy) = enemy_hit {
            enemy.hp -= affinity::final_damage(attacker, enemy.element, damage);
            state.score += SCORE_ENEMY_HIT;
            bursts.push((pos, 8));
            true
        } else if let Some(boss) = state
            .boss
            .as_mut()
            .filter(|b| b.hp > 0.0 && circles_overlap(pos, radius, b.pos, b.radius))
        {
            boss.hp -= affinity::final_damage(attacker, boss.element, damage);
            state.score += SCORE_BOSS_HIT;
            bursts.push((pos, 15));
            true
        } else {
            false
        };

        if consumed {
            state.player_bullets.kill(bi);
        }
    }

    for (at, count) in bursts {
        emit_particles(state, at, count, rng);
    }
}

// ── 10. Removal ───────────────────────────────────────────────────────────────

/// Kill enemies whose health ran out (score, particles, drops) and enemies
/// that drifted off the trailing edge (nothing).
pub(super) fn remove_fallen(state: &mut GameState, rng: &mut impl Rng) {
    for ei in 0..state.enemies.slots() {
        let Some(enemy) = state.enemies.get(ei) else {
            continue;
        };
        let (pos, element, dead) = (enemy.pos, enemy.element, enemy.hp <= 0.0);

        if dead {
            if state.enemies.kill(ei) {
                state.score += SCORE_ENEMY_KILL;
                emit_particles(state, pos, 20, rng);
                let drops = state.profile.roll_drops(rng, pos);
                state.items.extend(drops);
                state.events.push(GameEvent::EnemyKilled { element, pos });
            }
        } else if pos.x <= ENEMY_CULL_X {
            state.enemies.kill(ei);
        }
    }
}

// ── 11. Enemy bullets ─────────────────────────────────────────────────────────

/// Tick invulnerability, then test every enemy bullet against the player.
/// A hit wipes the whole enemy-bullet population.
pub(super) fn enemy_bullets(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let player = &mut state.player;
    if player.invulnerable > 0.0 {
        player.invulnerable -= dt;
    }
    if player.invulnerable > 0.0 {
        return;
    }

    let (pos, radius) = (player.pos, player.radius);
    let hit = state
        .enemy_bullets
        .iter()
        .any(|b| circles_overlap(pos, radius, b.pos, b.radius));
    if !hit {
        return;
    }

    let player = &mut state.player;
    player.hp = player.hp.saturating_sub(1);
    player.invulnerable = HIT_INVULNERABILITY;
    let hp_left = player.hp;

    state.enemy_bullets.clear();
    emit_particles(state, pos, 30, rng);
    state.score = state.score.saturating_sub(PENALTY_PLAYER_HIT);
    state.events.push(GameEvent::PlayerHit { hp_left });
    log::debug!("player hit, {} hp left", hp_left);

    if hp_left == 0 {
        state.status = GameStatus::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "game over on stage {} after {:.1}s with {} points",
            state.stage,
            state.elapsed,
            state.score
        );
    }
}
