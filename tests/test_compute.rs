use std::sync::Arc;

use approx::assert_relative_eq;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use elemental_barrage::compute::*;
use elemental_barrage::config::{builtin_boss, GameConfig};
use elemental_barrage::entities::*;
use elemental_barrage::factory;
use elemental_barrage::input::FrameInput;

fn make_state() -> GameState {
    make_state_as(Element::Fire)
}

/// A normal-difficulty run with wave spawning pushed far into the future,
/// so tests control exactly which enemies exist.
fn make_state_as(character: Element) -> GameState {
    let mut s = initialize_run(
        Arc::new(GameConfig::default()),
        Difficulty::Normal,
        character,
        0,
    );
    s.wave_timer = 1_000.0;
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn step(state: GameState, input: FrameInput, dt: f32) -> GameState {
    step_frame(state, &input, dt, &mut seeded_rng())
}

fn idle(state: GameState) -> GameState {
    step(state, FrameInput::idle(), 0.01)
}

fn still_bullet(pos: Vec2, damage: f32) -> Projectile {
    Projectile {
        damage,
        ..factory::projectile(pos, Vec2::ZERO, 3.0, 0xffffff)
    }
}

fn add_enemy(state: &mut GameState, pos: Vec2, hp: f32) {
    let enemy = factory::enemy(pos, Element::Fire, hp, MovePattern::Linear, &mut seeded_rng());
    state.enemies.spawn(enemy);
}

/// A silent enemy (no shots for a long while) with the given movement.
fn add_mover(state: &mut GameState, pos: Vec2, hp: f32, pattern: MovePattern) {
    let mut enemy = factory::enemy(pos, Element::Fire, hp, pattern, &mut seeded_rng());
    enemy.shot_timer = 100.0;
    state.enemies.spawn(enemy);
}

fn count_events(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
    state.events.iter().filter(|e| pred(*e)).count()
}

// ── initialize_run ────────────────────────────────────────────────────────────

#[test]
fn init_player_from_profile_and_area() {
    let s = initialize_run(Arc::new(GameConfig::default()), Difficulty::Normal, Element::Fire, 0);
    assert_eq!(s.player.pos, Vec2::new(80.0, 240.0));
    assert_eq!(s.player.hp, 3);
    assert_eq!(s.player.max_hp, 3);
    assert_eq!(s.player.charges, 2);
    assert_eq!(s.player.power, 0.0);
    assert_eq!(s.player.element, Element::Fire);
}

#[test]
fn init_empty_world() {
    let s = initialize_run(Arc::new(GameConfig::default()), Difficulty::Hard, Element::Ice, 0);
    assert!(s.enemies.is_empty());
    assert!(s.player_bullets.is_empty());
    assert!(s.enemy_bullets.is_empty());
    assert!(s.items.is_empty());
    assert!(s.boss.is_none());
    assert!(s.area_effect.is_none());
    assert_eq!(s.stage, 1);
    assert_eq!(s.boss_timer, FIRST_BOSS_DELAY);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(!is_run_over(&s));
}

#[test]
fn init_hard_profile() {
    let s = initialize_run(Arc::new(GameConfig::default()), Difficulty::Hard, Element::Ice, 500);
    assert_eq!(s.player.hp, 2);
    assert_eq!(s.player.charges, 1);
    assert_eq!(s.high_score, 500);
    assert_eq!(s.character.name, "Friga");
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[test]
fn clamp_dt_bounds() {
    assert_eq!(clamp_dt(-1.0), 0.0);
    assert_eq!(clamp_dt(f32::NAN), 0.0);
    assert_eq!(clamp_dt(1.0), MAX_DT);
    assert_eq!(clamp_dt(0.016), 0.016);
}

#[test]
fn step_clamps_lag_spike() {
    let s = step(make_state(), FrameInput::idle(), 2.0);
    assert_relative_eq!(s.elapsed, MAX_DT);
    assert_eq!(s.frame, 1);
}

#[test]
fn step_never_runs_time_backwards() {
    let s = step(make_state(), FrameInput::idle(), -0.5);
    assert_eq!(s.elapsed, 0.0);
    assert_eq!(s.frame, 1);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn move_right_full_speed() {
    let input = FrameInput { right: true, ..FrameInput::idle() };
    let s = step(make_state(), input, 0.05);
    assert_relative_eq!(s.player.pos.x, 87.0, epsilon = 1e-4);
    assert_relative_eq!(s.player.pos.y, 240.0);
}

#[test]
fn focus_slows_movement() {
    let input = FrameInput { right: true, focus: true, ..FrameInput::idle() };
    let s = step(make_state(), input, 0.05);
    assert_relative_eq!(s.player.pos.x, 80.0 + 140.0 * 0.45 * 0.05, epsilon = 1e-4);
}

#[test]
fn diagonal_is_not_normalised() {
    let input = FrameInput { right: true, down: true, ..FrameInput::idle() };
    let s = step(make_state(), input, 0.05);
    assert_relative_eq!(s.player.pos.x, 87.0, epsilon = 1e-4);
    assert_relative_eq!(s.player.pos.y, 247.0, epsilon = 1e-4);
}

#[test]
fn movement_clamped_to_play_area() {
    let mut s = make_state();
    s.player.pos = Vec2::new(10.0, 10.0);
    let input = FrameInput { up: true, left: true, ..FrameInput::idle() };
    let s = step(s, input, 0.05);
    assert_eq!(s.player.pos, Vec2::new(10.0, 10.0));

    let mut s = s;
    s.player.pos = Vec2::new(630.0, 470.0);
    let input = FrameInput { down: true, right: true, ..FrameInput::idle() };
    let s = step(s, input, 0.05);
    assert_eq!(s.player.pos, Vec2::new(630.0, 470.0));
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn fire_emits_volley_and_sets_cooldown() {
    let input = FrameInput { fire: true, ..FrameInput::idle() };
    let s = step(make_state(), input, 0.05);
    assert_eq!(s.player_bullets.len(), 1);
    assert_relative_eq!(s.player.shot_cooldown, 0.15 - 0.05, epsilon = 1e-5);

    let b = s.player_bullets.iter().next().unwrap();
    assert_relative_eq!(b.damage, 3.5);
    assert!(b.vel.x > 0.0);
}

#[test]
fn fire_respects_cooldown() {
    let input = FrameInput { fire: true, ..FrameInput::idle() };
    let s = step(make_state(), input, 0.05);
    let mut s = step(s, input, 0.05);
    assert_eq!(s.player_bullets.len(), 1);

    s.player.shot_cooldown = 0.0;
    let s = step(s, input, 0.05);
    assert_eq!(s.player_bullets.len(), 2);
}

#[test]
fn power_scales_bullet_damage() {
    let mut s = make_state();
    s.player.power = 50.0;
    let s = step(s, FrameInput { fire: true, ..FrameInput::idle() }, 0.01);
    let b = s.player_bullets.iter().next().unwrap();
    assert_relative_eq!(b.damage, 3.5 * 1.5, epsilon = 1e-5);
}

#[test]
fn wind_fires_three_way_spread() {
    let s = step(
        make_state_as(Element::Wind),
        FrameInput { fire: true, ..FrameInput::idle() },
        0.01,
    );
    assert_eq!(s.player_bullets.len(), 3);
}

#[test]
fn player_bullets_culled_off_screen() {
    let mut s = make_state();
    s.player_bullets.spawn(factory::projectile(
        Vec2::new(645.0, 100.0),
        Vec2::new(400.0, 0.0),
        3.0,
        0,
    ));
    let s = step(s, FrameInput::idle(), 0.05);
    assert!(s.player_bullets.is_empty());
}

// ── Player bullets vs enemies and boss ────────────────────────────────────────

#[test]
fn bullet_damages_enemy_and_is_consumed_once() {
    let mut s = make_state();
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 100.0);
    s.player_bullets.spawn(still_bullet(Vec2::new(300.0, 240.0), 10.0));

    let s = idle(s);
    let hp = s.enemies.iter().next().unwrap().hp;
    assert_relative_eq!(hp, 90.0);
    assert_eq!(s.score, SCORE_ENEMY_HIT);
    assert!(s.player_bullets.is_empty());

    let s = idle(s);
    assert_relative_eq!(s.enemies.iter().next().unwrap().hp, 90.0);
    assert_eq!(s.score, SCORE_ENEMY_HIT);
}

#[test]
fn bullet_hits_only_first_overlapping_enemy() {
    let mut s = make_state();
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 100.0);
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 100.0);
    s.player_bullets.spawn(still_bullet(Vec2::new(300.0, 240.0), 10.0));

    let s = idle(s);
    let hps: Vec<f32> = s.enemies.iter().map(|e| e.hp).collect();
    assert_eq!(hps, vec![90.0, 100.0]);
}

#[test]
fn affinity_applies_to_player_bullets() {
    // Fire attacking an ice enemy: 1.5x.
    let mut s = make_state();
    let ice = factory::enemy(
        Vec2::new(300.0, 240.0),
        Element::Ice,
        100.0,
        MovePattern::Linear,
        &mut seeded_rng(),
    );
    s.enemies.spawn(ice);
    s.player_bullets.spawn(still_bullet(Vec2::new(300.0, 240.0), 10.0));
    let s = idle(s);
    assert_relative_eq!(s.enemies.iter().next().unwrap().hp, 85.0);
}

#[test]
fn killed_enemy_scores_and_drops() {
    let mut s = make_state();
    s.profile.drop_rate = 10.0; // every roll succeeds
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 5.0);
    s.player_bullets.spawn(still_bullet(Vec2::new(300.0, 240.0), 10.0));

    let s = idle(s);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, SCORE_ENEMY_HIT + SCORE_ENEMY_KILL);
    assert_eq!(s.items.len(), 3);
    assert_eq!(
        count_events(&s, |e| matches!(e, GameEvent::EnemyKilled { element: Element::Fire, .. })),
        1
    );
}

#[test]
fn enemy_leaving_trailing_edge_removed_without_score() {
    let mut s = make_state();
    add_enemy(&mut s, Vec2::new(-49.9, 240.0), 50.0);
    let s = idle(s);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, 0);
    assert!(s.events.is_empty());
}

#[test]
fn bullet_damages_boss() {
    let mut s = make_state();
    s.boss = Some(factory::boss(&builtin_boss(Element::Fire), 1, 1000.0));
    s.player_bullets.spawn(still_bullet(Vec2::new(500.0, 240.0), 10.0));

    let s = idle(s);
    assert_relative_eq!(s.boss.as_ref().unwrap().hp, 990.0);
    assert_eq!(s.score, SCORE_BOSS_HIT);
    assert!(s.player_bullets.is_empty());
}

// ── Boss lifecycle ────────────────────────────────────────────────────────────

#[test]
fn boss_spawns_when_timer_expires() {
    let mut s = make_state();
    s.boss_timer = 0.01;
    let s = step(s, FrameInput::idle(), 0.05);

    let boss = s.boss.as_ref().expect("boss should spawn");
    assert_eq!(boss.stage, 1);
    assert_eq!(boss.element, Element::Fire);
    assert_relative_eq!(boss.max_hp, 1000.0);
    assert_eq!(boss.phase, 1);
    assert_eq!(s.stage, 1);
    assert_eq!(
        count_events(&s, |e| *e == GameEvent::BossSpawned { stage: 1, element: Element::Fire }),
        1
    );
}

#[test]
fn next_boss_advances_stage() {
    let mut s = make_state();
    s.bosses_defeated = 1;
    s.boss_timer = 0.0;
    let s = idle(s);
    assert_eq!(s.stage, 2);
    assert_eq!(s.boss.as_ref().unwrap().element, Element::Water);
}

#[test]
fn waves_suppressed_while_boss_active() {
    let mut s = make_state();
    s.wave_timer = 0.0;
    s.boss = Some(factory::boss(&builtin_boss(Element::Fire), 1, 1000.0));
    let s = idle(s);
    assert!(s.enemies.is_empty());
}

#[test]
fn boss_defeated_exactly_once() {
    let mut s = make_state();
    let mut boss = factory::boss(&builtin_boss(Element::Fire), 1, 1000.0);
    boss.hp = 5.0;
    s.boss = Some(boss);
    s.player_bullets.spawn(still_bullet(Vec2::new(500.0, 240.0), 10.0));
    s.player_bullets.spawn(still_bullet(Vec2::new(500.0, 240.0), 10.0));

    let s = idle(s);
    assert!(s.boss.is_none());
    assert_eq!(s.bosses_defeated, 1);
    assert_eq!(s.score, SCORE_BOSS_HIT + SCORE_BOSS_DEFEAT);
    assert_eq!(s.boss_timer, NEXT_BOSS_DELAY);
    assert_eq!(
        count_events(&s, |e| matches!(e, GameEvent::BossDefeated { .. })),
        1
    );
    assert!(s.clear_timer.is_none());

    let s = idle(s);
    assert_eq!(s.bosses_defeated, 1);
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::BossDefeated { .. })), 0);
}

#[test]
fn final_boss_clears_run_after_delay() {
    let mut s = make_state();
    let mut boss = factory::boss(&builtin_boss(Element::God), FINAL_STAGE, 1000.0);
    boss.hp = 1.0;
    boss.shot_timer = 10.0;
    s.stage = FINAL_STAGE;
    s.boss = Some(boss);
    s.player_bullets.spawn(still_bullet(Vec2::new(500.0, 240.0), 10.0));

    let mut s = idle(s);
    assert!(s.clear_timer.is_some());
    assert_eq!(s.status, GameStatus::Playing);

    let mut steps = 0;
    while !is_run_over(&s) && steps < 100 {
        s = step(s, FrameInput::idle(), 0.05);
        steps += 1;
    }
    assert_eq!(s.status, GameStatus::Cleared);
    assert!(steps >= 39, "cleared too early after {steps} steps");
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::RunCleared { .. })), 1);
    assert!(s.boss.is_none());
}

// ── Enemy bullets vs player ───────────────────────────────────────────────────

#[test]
fn invulnerable_player_is_untouched() {
    let mut s = make_state();
    s.player.invulnerable = 1.0;
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));

    let s = idle(s);
    assert_eq!(s.player.hp, 3);
    assert_eq!(s.enemy_bullets.len(), 1);
    assert_relative_eq!(s.player.invulnerable, 0.99, epsilon = 1e-5);
}

#[test]
fn hit_wipes_every_enemy_bullet() {
    let mut s = make_state();
    s.score = 150;
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));
    s.enemy_bullets.spawn(factory::projectile(Vec2::new(400.0, 50.0), Vec2::ZERO, 4.0, 0));

    let s = idle(s);
    assert_eq!(s.player.hp, 2);
    assert!(s.enemy_bullets.is_empty());
    assert_relative_eq!(s.player.invulnerable, 1.5);
    assert_eq!(s.score, 50);
    assert_eq!(count_events(&s, |e| *e == GameEvent::PlayerHit { hp_left: 2 }), 1);
}

#[test]
fn hit_penalty_floors_at_zero() {
    let mut s = make_state();
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));
    let s = idle(s);
    assert_eq!(s.score, 0);
}

#[test]
fn last_life_ends_run() {
    let mut s = make_state();
    s.player.hp = 1;
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));

    let s = idle(s);
    assert_eq!(s.status, GameStatus::GameOver);
    assert!(is_run_over(&s));
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::GameOver { .. })), 1);

    let frame = s.frame;
    let s = idle(s);
    assert_eq!(s.frame, frame);
}

#[test]
fn dying_player_collects_nothing() {
    let mut s = make_state();
    s.player.hp = 1;
    let at = s.player.pos;
    s.enemy_bullets.spawn(factory::projectile(at, Vec2::ZERO, 4.0, 0));
    s.items.spawn(factory::item(at, ItemKind::Life));

    let s = idle(s);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.player.hp, 0);
    assert_eq!(s.score, 0);
    assert_eq!(s.items.len(), 1);
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::ItemCollected { .. })), 0);
}

#[test]
fn zigzag_bullet_sways_with_its_clock() {
    let mut s = make_state();
    s.enemy_bullets.spawn(Projectile {
        behavior: BulletBehavior::Zigzag { clock: 0.0 },
        ..factory::projectile(Vec2::new(500.0, 100.0), Vec2::new(-100.0, 0.0), 4.0, 0)
    });

    let (mut x, mut y, mut clock) = (500.0_f32, 100.0_f32, 0.0_f32);
    for _ in 0..3 {
        s = step(s, FrameInput::idle(), 0.02);
        x += -100.0 * 0.02;
        clock += 0.02;
        y += (clock * 10.0).sin() * 30.0 * 0.02;
    }

    let b = s.enemy_bullets.iter().next().unwrap();
    assert_relative_eq!(b.pos.x, x, epsilon = 1e-4);
    assert_relative_eq!(b.pos.y, y, epsilon = 1e-4);
    assert!(b.pos.y > 100.0);
    let BulletBehavior::Zigzag { clock: advanced } = b.behavior else {
        panic!("behaviour changed: {:?}", b.behavior);
    };
    assert_relative_eq!(advanced, 0.06, epsilon = 1e-6);
}

#[test]
fn homing_bullet_turns_toward_player() {
    let mut s = make_state();
    s.enemy_bullets.spawn(Projectile {
        behavior: BulletBehavior::Homing,
        ..factory::projectile(Vec2::new(300.0, 100.0), Vec2::new(-100.0, 0.0), 4.0, 0)
    });
    let s = idle(s);
    let b = s.enemy_bullets.iter().next().unwrap();
    assert!(b.vel.y > 0.0);
}

#[test]
fn enemy_bullets_have_wider_cull_margin() {
    let mut s = make_state();
    s.enemy_bullets
        .spawn(factory::projectile(Vec2::new(-70.0, 100.0), Vec2::ZERO, 4.0, 0));
    s.enemy_bullets
        .spawn(factory::projectile(Vec2::new(-90.0, 100.0), Vec2::ZERO, 4.0, 0));
    let s = idle(s);
    assert_eq!(s.enemy_bullets.len(), 1);
}

// ── Enemies and waves ─────────────────────────────────────────────────────────

#[test]
fn first_step_spawns_opening_wave() {
    let mut s = make_state();
    s.wave_timer = 0.0;
    let s = step(s, FrameInput::idle(), 0.05);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.wave_count, 1);
    assert_relative_eq!(s.wave_timer, 2.5);
    assert!(s.enemies.iter().all(|e| e.element == Element::Fire));
}

#[test]
fn enemy_drifts_left() {
    let mut s = make_state();
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 50.0);
    let s = step(s, FrameInput::idle(), 0.05);
    assert_relative_eq!(s.enemies.iter().next().unwrap().pos.x, 299.0, epsilon = 1e-4);
}

#[test]
fn weaving_enemies_follow_their_sine() {
    let mut s = make_state();
    add_mover(&mut s, Vec2::new(400.0, 150.0), 50.0, MovePattern::Wave);
    add_mover(&mut s, Vec2::new(400.0, 330.0), 50.0, MovePattern::Zigzag);

    let (mut t, mut wave_y, mut zigzag_y) = (0.0_f32, 150.0_f32, 330.0_f32);
    for _ in 0..4 {
        s = step(s, FrameInput::idle(), 0.05);
        t += 0.05;
        wave_y += (t * 3.0).sin() * 30.0 * 0.05;
        zigzag_y += (t * 5.0).sin() * 50.0 * 0.05;
    }

    let ys: Vec<f32> = s.enemies.iter().map(|e| e.pos.y).collect();
    assert_relative_eq!(ys[0], wave_y, epsilon = 1e-4);
    assert_relative_eq!(ys[1], zigzag_y, epsilon = 1e-4);
    assert!(ys[0] > 150.0 && ys[1] > 330.0);
    for e in s.enemies.iter() {
        assert_relative_eq!(e.pos.x, 396.0, epsilon = 1e-3);
        assert_relative_eq!(e.move_timer, 0.2, epsilon = 1e-5);
    }
}

#[test]
fn water_enemy_fires_triple_volley() {
    let mut s = make_state();
    let mut enemy = factory::enemy(
        Vec2::new(300.0, 240.0),
        Element::Water,
        50.0,
        MovePattern::Linear,
        &mut seeded_rng(),
    );
    enemy.shot_timer = 0.005;
    s.enemies.spawn(enemy);

    let s = idle(s);
    assert_eq!(s.enemy_bullets.len(), 3);
    let e = s.enemies.iter().next().unwrap();
    assert!(e.shot_timer >= 1.5 && e.shot_timer <= 2.0);
}

// ── Special ability ───────────────────────────────────────────────────────────

#[test]
fn ability_without_charges_is_noop() {
    let mut s = make_state();
    s.player.charges = 0;
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 100.0);
    let s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    assert_eq!(s.player.charges, 0);
    assert_relative_eq!(s.enemies.iter().next().unwrap().hp, 100.0);
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::AbilityActivated { .. })), 0);
}

#[test]
fn fire_blast_hits_everything_and_clears_bullets() {
    let mut s = make_state();
    add_enemy(&mut s, Vec2::new(300.0, 100.0), 100.0);
    s.boss = Some(factory::boss(&builtin_boss(Element::Fire), 1, 1000.0));
    s.enemy_bullets
        .spawn(factory::projectile(Vec2::new(400.0, 50.0), Vec2::ZERO, 4.0, 0));

    let s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    assert_eq!(s.player.charges, 1);
    assert_relative_eq!(s.enemies.iter().next().unwrap().hp, 70.0);
    assert_relative_eq!(s.boss.as_ref().unwrap().hp, 970.0);
    // Only the boss's own opening volley may be in flight.
    assert!(s.enemy_bullets.iter().all(|b| b.pos.distance(Vec2::new(400.0, 50.0)) > 1.0));
    assert_eq!(
        count_events(&s, |e| *e == GameEvent::AbilityActivated { element: Element::Fire }),
        1
    );
}

#[test]
fn water_ability_keeps_bullets() {
    let mut s = make_state_as(Element::Water);
    s.enemy_bullets
        .spawn(factory::projectile(Vec2::new(400.0, 50.0), Vec2::ZERO, 4.0, 0));
    let s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    assert_eq!(s.enemy_bullets.len(), 1);
}

#[test]
fn wind_dash_grants_invulnerability() {
    let s = step(
        make_state_as(Element::Wind),
        FrameInput { ability: true, ..FrameInput::idle() },
        0.01,
    );
    assert!(s.player.invulnerable > 0.7);
}

#[test]
fn dark_ability_opens_suction_field() {
    let mut s = make_state_as(Element::Dark);
    s.enemy_bullets
        .spawn(factory::projectile(Vec2::new(170.0, 240.0), Vec2::ZERO, 4.0, 0));

    let s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    let field = s.area_effect.as_ref().expect("field should be active");
    assert_eq!(field.center, Vec2::new(160.0, 240.0));
    assert_relative_eq!(field.radius, 135.0);
    assert_relative_eq!(field.remaining, 1.49, epsilon = 1e-5);
    assert!(s.enemy_bullets.is_empty(), "bullet inside capture distance is absorbed");
}

#[test]
fn suction_field_pulls_and_expires() {
    let mut s = make_state_as(Element::Dark);
    add_enemy(&mut s, Vec2::new(160.0, 300.0), 100.0);
    let mut s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    let y = s.enemies.iter().next().unwrap().pos.y;
    assert!(y < 300.0);

    for _ in 0..40 {
        s = step(s, FrameInput::idle(), 0.05);
    }
    assert!(s.area_effect.is_none());
}

#[test]
fn suction_field_drains_captured_enemy() {
    let mut s = make_state_as(Element::Dark);
    add_mover(&mut s, Vec2::new(160.0, 240.0), 100.0, MovePattern::Linear);
    s.enemies.iter_mut().for_each(|e| e.speed = 0.0);

    let mut s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    assert_eq!(s.area_effect.as_ref().map(|f| f.damage), Some(45.0));
    let mut hp = 100.0 - 45.0 * 0.01 * 2.0;
    assert_relative_eq!(s.enemies.iter().next().unwrap().hp, hp, epsilon = 1e-4);

    for _ in 0..4 {
        s = step(s, FrameInput::idle(), 0.05);
        hp -= 45.0 * 0.05 * 2.0;
        assert_relative_eq!(s.enemies.iter().next().unwrap().hp, hp, epsilon = 1e-3);
    }
    assert_relative_eq!(hp, 81.1, epsilon = 1e-3);
}

#[test]
fn suction_field_kill_scores_like_any_kill() {
    let mut s = make_state_as(Element::Dark);
    add_mover(&mut s, Vec2::new(160.0, 240.0), 1.0, MovePattern::Linear);
    s.enemies.iter_mut().for_each(|e| e.speed = 0.0);

    let s = step(s, FrameInput { ability: true, ..FrameInput::idle() }, 0.01);
    assert_eq!(s.enemies.len(), 1);
    let before = s.score;

    let s = step(s, FrameInput::idle(), 0.05);
    assert!(s.enemies.is_empty());
    assert_eq!(s.score, before + SCORE_ENEMY_KILL);
    assert_eq!(
        count_events(&s, |e| matches!(e, GameEvent::EnemyKilled { element: Element::Fire, .. })),
        1
    );
}

// ── Items ─────────────────────────────────────────────────────────────────────

#[test]
fn life_item_collected_within_reach() {
    let mut s = make_state();
    s.player.hp = 2;
    let at = s.player.pos + Vec2::new(10.0, 0.0);
    s.items.spawn(factory::item(at, ItemKind::Life));

    let s = idle(s);
    assert!(s.items.is_empty());
    assert_eq!(s.player.hp, 3);
    assert_eq!(s.score, 200);
    assert_eq!(count_events(&s, |e| *e == GameEvent::ItemCollected { kind: ItemKind::Life }), 1);
}

#[test]
fn pickups_are_capped() {
    let mut s = make_state();
    s.player.power = 95.0;
    let at = s.player.pos;
    s.items.spawn(factory::item(at, ItemKind::Power));
    s.items.spawn(factory::item(at, ItemKind::Charge));

    let s = idle(s);
    assert_relative_eq!(s.player.power, 100.0);
    assert_eq!(s.player.charges, 2);
    assert_eq!(s.score, 150);
}

#[test]
fn item_magnet_and_drift() {
    let mut s = make_state();
    let near = s.player.pos + Vec2::new(50.0, 0.0);
    s.items.spawn(factory::item(near, ItemKind::Power));
    s.items.spawn(factory::item(Vec2::new(400.0, 100.0), ItemKind::Power));

    let s = idle(s);
    let xs: Vec<f32> = s.items.iter().map(|i| i.pos.x).collect();
    assert_relative_eq!(xs[0], near.x - 2.5, epsilon = 1e-4);
    assert_relative_eq!(xs[1], 400.0 - 0.6, epsilon = 1e-4);
}

// ── Events, score, HUD ────────────────────────────────────────────────────────

#[test]
fn events_only_hold_latest_step() {
    let mut s = make_state();
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));
    let s = idle(s);
    assert!(!s.events.is_empty());
    let s = idle(s);
    assert!(s.events.is_empty());
}

#[test]
fn new_high_score_announced_once() {
    let mut s = make_state();
    add_enemy(&mut s, Vec2::new(300.0, 240.0), 100.0);
    s.player_bullets.spawn(still_bullet(Vec2::new(300.0, 240.0), 1.0));
    let mut s = idle(s);
    assert_eq!(s.high_score, SCORE_ENEMY_HIT);
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::NewHighScore { .. })), 1);

    s.player_bullets.spawn(still_bullet(Vec2::new(299.0, 240.0), 1.0));
    let s = idle(s);
    assert_eq!(s.high_score, 2 * SCORE_ENEMY_HIT);
    assert_eq!(count_events(&s, |e| matches!(e, GameEvent::NewHighScore { .. })), 0);
}

#[test]
fn particles_can_be_disabled() {
    let config = GameConfig {
        particles_enabled: false,
        ..GameConfig::default()
    };
    let mut s = initialize_run(Arc::new(config), Difficulty::Normal, Element::Fire, 0);
    s.wave_timer = 1_000.0;
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));
    let s = idle(s);
    assert_eq!(s.player.hp, 2);
    assert!(s.particles.is_empty());
}

#[test]
fn particles_age_out() {
    let mut s = make_state();
    s.enemy_bullets.spawn(factory::projectile(s.player.pos, Vec2::ZERO, 4.0, 0));
    let mut s = idle(s);
    assert_eq!(s.particles.len(), 30);
    for _ in 0..25 {
        s = step(s, FrameInput::idle(), 0.05);
    }
    assert!(s.particles.is_empty());
}

#[test]
fn hud_reflects_state() {
    let mut s = make_state();
    s.elapsed = 75.4;
    s.player.power = 50.0;
    s.boss = Some(factory::boss(&builtin_boss(Element::Water), 2, 1000.0));
    s.boss.as_mut().unwrap().hp = 500.0;

    let h = hud(&s);
    assert_eq!(h.time, "1:15");
    assert_eq!(h.power_cells, 5);
    assert_eq!(h.lives, 3);
    assert_eq!(h.charges, 2);
    let boss = h.boss.expect("boss hud");
    assert_eq!(boss.name, "Water Sovereign");
    assert_relative_eq!(boss.health_ratio, 0.5);
    assert_eq!(boss.phase, 1);
    assert_eq!(boss.pattern, "wave_cascade");
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut s = initialize_run(Arc::new(GameConfig::default()), Difficulty::Hard, Element::Wind, 0);
        let mut rng = seeded_rng();
        let input = FrameInput { fire: true, up: true, ..FrameInput::idle() };
        for _ in 0..300 {
            s = step_frame(s, &input, 1.0 / 60.0, &mut rng);
        }
        (s.score, s.player.pos, s.enemies.len(), s.enemy_bullets.len(), s.player.hp)
    };
    assert_eq!(run(), run());
}
