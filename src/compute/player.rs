//! Player-driven steps: movement, shooting, special ability, pickups.

use glam::Vec2;
use rand::Rng;

use super::emit_particles;
use crate::config::AbilityKind;
use crate::entities::{AreaEffect, GameEvent, GameState, ItemKind};
use crate::factory;
use crate::input::FrameInput;

/// Speed multiplier while focus is held.
const FOCUS_FACTOR: f32 = 0.45;
/// The player's centre stays this far inside every edge.
const EDGE_MARGIN: f32 = 10.0;

/// The suction field opens this far in front of the player.
const FIELD_OFFSET: Vec2 = Vec2::new(80.0, 0.0);
const FIELD_RADIUS_SCALE: f32 = 1.5;

const MAGNET_RANGE: f32 = 80.0;
const MAGNET_SPEED: f32 = 250.0;
const ITEM_DRIFT: f32 = 60.0;
/// Pickup distance beyond the player's own radius.
const PICKUP_REACH: f32 = 15.0;
const ITEM_CULL_X: f32 = -50.0;

const POWER_PER_ITEM: f32 = 10.0;

// ── Movement ──────────────────────────────────────────────────────────────────

/// Axis-aligned movement.  Diagonals are deliberately not normalised.
pub(super) fn steer(state: &mut GameState, input: &FrameInput, dt: f32) {
    let area = state.config.play_area;
    let p = &mut state.player;
    let speed = if input.focus {
        p.speed * FOCUS_FACTOR
    } else {
        p.speed
    };
    let step = speed * dt;

    if input.up {
        p.pos.y -= step;
    }
    if input.down {
        p.pos.y += step;
    }
    if input.left {
        p.pos.x -= step;
    }
    if input.right {
        p.pos.x += step;
    }

    p.pos.x = p.pos.x.clamp(EDGE_MARGIN, (area.width - EDGE_MARGIN).max(EDGE_MARGIN));
    p.pos.y = p.pos.y.clamp(EDGE_MARGIN, (area.height - EDGE_MARGIN).max(EDGE_MARGIN));
}

// ── Shooting ──────────────────────────────────────────────────────────────────

/// Fire when the cooldown has run out, then tick the cooldown.
pub(super) fn shoot(state: &mut GameState, input: &FrameInput, dt: f32) {
    if input.fire && state.player.shot_cooldown <= 0.0 {
        let volley = factory::player_volley(&state.player, &state.character);
        state.player_bullets.extend(volley);
        state.player.shot_cooldown = state.character.shot.fire_rate;
    }
    if state.player.shot_cooldown > 0.0 {
        state.player.shot_cooldown -= dt;
    }
}

// ── Special ability ───────────────────────────────────────────────────────────

/// Spend one charge on the character's ability.  Does nothing without a
/// charge, so the counter can never underflow.
pub(super) fn activate_ability(state: &mut GameState, rng: &mut impl Rng) {
    if state.player.charges == 0 {
        return;
    }
    state.player.charges -= 1;

    let ability = state.character.ability.clone();
    if ability.clear_bullets {
        state.enemy_bullets.clear();
    }

    match ability.kind {
        AbilityKind::Blackhole => {
            state.area_effect = Some(AreaEffect {
                center: state.player.pos + FIELD_OFFSET,
                radius: ability.radius * FIELD_RADIUS_SCALE,
                remaining: ability.duration,
                duration: ability.duration,
                damage: ability.damage,
            });
        }
        _ => {
            for enemy in state.enemies.iter_mut() {
                enemy.hp -= ability.damage;
            }
            if let Some(boss) = state.boss.as_mut() {
                boss.hp -= ability.damage;
            }
        }
    }

    if ability.grants_invulnerability {
        state.player.invulnerable = state.player.invulnerable.max(ability.duration);
    }

    let at = state.player.pos;
    emit_particles(state, at, ability.kind.particle_burst(), rng);
    state.events.push(GameEvent::AbilityActivated {
        element: state.player.element,
    });
    log::debug!(
        "{} used, {} charges left",
        ability.name,
        state.player.charges
    );
}

// ── Items ─────────────────────────────────────────────────────────────────────

/// Drift, magnetism and pickup.
pub(super) fn update_items(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let reach = state.player.radius + PICKUP_REACH;
    let mut collected = Vec::new();

    for index in 0..state.items.slots() {
        let Some(item) = state.items.get_mut(index) else {
            continue;
        };
        let to_player = target - item.pos;
        let distance = to_player.length();

        if distance < MAGNET_RANGE {
            if distance > 0.0 {
                item.pos += to_player / distance * MAGNET_SPEED * dt;
            }
            if distance < reach {
                let kind = item.kind;
                if state.items.kill(index) {
                    collected.push(kind);
                }
                continue;
            }
        } else {
            item.pos.x -= ITEM_DRIFT * dt;
        }

        if item.pos.x < ITEM_CULL_X {
            state.items.kill(index);
        }
    }

    for kind in collected {
        apply_pickup(state, kind);
    }
}

fn apply_pickup(state: &mut GameState, kind: ItemKind) {
    let p = &mut state.player;
    let bonus = match kind {
        ItemKind::Power => {
            p.power = (p.power + POWER_PER_ITEM).min(p.max_power);
            50
        }
        ItemKind::Charge => {
            p.charges = (p.charges + 1).min(p.max_charges);
            100
        }
        ItemKind::Life => {
            p.hp = (p.hp + 1).min(p.max_hp);
            200
        }
    };
    state.score += bonus;
    state.events.push(GameEvent::ItemCollected { kind });
}
