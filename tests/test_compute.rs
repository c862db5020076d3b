use gravity_shooter::compute::*;
use gravity_shooter::config::GameConfig;
use gravity_shooter::entities::*;
use gravity_shooter::geometry::Rect;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Initial state with the spawn timer pushed far out so tests control
/// exactly which enemies exist.
fn make_state() -> GameState {
    let mut s = init_state(GameConfig::default());
    s.spawn_countdown = 10_000;
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn no_keys() -> KeyState {
    KeyState::default()
}

fn run(state: &GameState, frames: usize) -> GameState {
    let mut rng = seeded_rng();
    let mut s = state.clone();
    for _ in 0..frames {
        s = tick(&s, &no_keys(), &mut rng);
    }
    s
}

fn stationary_bomb(cx: f32, cy: f32) -> Bomb {
    Bomb::new(cx, cy, 10.0, (0.0, 1.0), 0.0, BombColor::Red)
}

fn enemy_at(cx: f32, cy: f32, config: &GameConfig) -> Enemy {
    let mut e = Enemy::new(cx, 1_000.0, 300, 1, config);
    e.rect = Rect::from_center(cx, cy, e.rect.w, e.rect.h);
    e
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = init_state(GameConfig::default());
    assert_eq!(s.player.rect.center(), (900.0, 400.0));
    assert_eq!(s.player.facing, Facing::Right);
    assert_eq!(s.player.state, PlayerState::Normal);
}

#[test]
fn init_state_empty_collections() {
    let s = init_state(GameConfig::default());
    assert!(s.enemies.is_empty());
    assert!(s.bombs.is_empty());
    assert!(s.beams.is_empty());
    assert!(s.explosions.is_empty());
    assert!(s.pulses.is_empty());
    assert!(s.fields.is_empty());
    assert_eq!(s.score.value, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

// ── apply_input ───────────────────────────────────────────────────────────────

#[test]
fn move_right_by_speed() {
    let s = make_state();
    let keys = KeyState { right: true, ..KeyState::default() };
    let s2 = apply_input(&s, &keys);
    assert_eq!(s2.player.rect.center(), (910.0, 400.0));
    assert_eq!(s2.player.facing, Facing::Right);
}

#[test]
fn diagonal_move_is_not_renormalized() {
    let s = make_state();
    let keys = KeyState { up: true, left: true, ..KeyState::default() };
    let s2 = apply_input(&s, &keys);
    assert_eq!(s2.player.rect.center(), (890.0, 390.0));
    assert_eq!(s2.player.facing, Facing::UpLeft);
}

#[test]
fn opposite_keys_cancel_and_keep_facing() {
    let s = make_state();
    let keys = KeyState { left: true, right: true, ..KeyState::default() };
    let s2 = apply_input(&s, &keys);
    assert_eq!(s2.player.rect, s.player.rect);
    assert_eq!(s2.player.facing, Facing::Right);
}

#[test]
fn move_out_of_bounds_is_fully_reverted() {
    let mut s = make_state();
    // Flush against the right edge; moving up-right must not slide upwards.
    s.player.rect = Rect::new(1010.0, 300.0, 90.0, 90.0);
    let keys = KeyState { up: true, right: true, ..KeyState::default() };
    let s2 = apply_input(&s, &keys);
    assert_eq!(s2.player.rect, s.player.rect);
    // Facing still follows the attempted direction.
    assert_eq!(s2.player.facing, Facing::UpRight);
}

#[test]
fn moving_clears_victory_pose() {
    let mut s = make_state();
    s.player.pose = PlayerPose::Victory;
    let idle = apply_input(&s, &no_keys());
    assert_eq!(idle.player.pose, PlayerPose::Victory);
    let moved = apply_input(&s, &KeyState { down: true, ..KeyState::default() });
    assert_eq!(moved.player.pose, PlayerPose::Normal);
}

#[test]
fn apply_input_does_not_mutate_original() {
    let s = make_state();
    let _ = apply_input(&s, &KeyState { left: true, ..KeyState::default() });
    assert_eq!(s.player.rect.center(), (900.0, 400.0));
}

// ── invulnerability ───────────────────────────────────────────────────────────

#[test]
fn invulnerability_costs_100_and_lasts_500() {
    let mut s = make_state();
    s.score.value = 150;
    let s2 = activate_invulnerability(&s);
    assert_eq!(s2.score.value, 50);
    assert_eq!(s2.player.state, PlayerState::Invulnerable { remaining: 500 });
    assert!(s2.events.contains(&GameEvent::InvulnerabilityActivated));
}

#[test]
fn invulnerability_key_through_apply_input() {
    let mut s = make_state();
    s.score.value = 150;
    let keys = KeyState { invulnerability: true, ..KeyState::default() };
    let s2 = apply_input(&s, &keys);
    assert_eq!(s2.score.value, 50);
    assert_eq!(s2.player.state, PlayerState::Invulnerable { remaining: 500 });
}

#[test]
fn invulnerability_unaffordable() {
    let mut s = make_state();
    s.score.value = 99;
    let s2 = activate_invulnerability(&s);
    assert_eq!(s2.score.value, 99);
    assert_eq!(s2.player.state, PlayerState::Normal);
}

#[test]
fn invulnerability_not_recharged_while_active() {
    let mut s = make_state();
    s.score.value = 300;
    s.player.state = PlayerState::Invulnerable { remaining: 20 };
    let s2 = activate_invulnerability(&s);
    assert_eq!(s2.score.value, 300);
    assert_eq!(s2.player.state, PlayerState::Invulnerable { remaining: 20 });
}

#[test]
fn invulnerability_counts_down_to_normal() {
    let mut s = make_state();
    s.player.state = PlayerState::Invulnerable { remaining: 2 };
    let s2 = apply_input(&s, &no_keys());
    assert_eq!(s2.player.state, PlayerState::Invulnerable { remaining: 1 });
    let s3 = apply_input(&s2, &no_keys());
    assert_eq!(s3.player.state, PlayerState::Normal);
}

// ── fire_beam ─────────────────────────────────────────────────────────────────

#[test]
fn beam_starts_ahead_of_player_along_facing() {
    let s = make_state();
    let s2 = fire_beam(&s);
    assert_eq!(s2.beams.len(), 1);
    let beam = &s2.beams[0];
    assert_eq!(beam.dir, (1.0, 0.0));
    assert_eq!(beam.rect.center(), (990.0, 400.0));
    assert!(s.beams.is_empty());
}

#[test]
fn beam_moves_and_leaves_screen() {
    let mut s = make_state();
    s.player.facing = Facing::Up;
    s.player.rect = Rect::from_center(500.0, 150.0, 90.0, 90.0);
    let s = fire_beam(&s);
    let y0 = s.beams[0].rect.center().1;
    let s2 = run(&s, 1);
    assert_eq!(s2.beams[0].rect.center().1, y0 - 10.0);
    let s3 = run(&s, 10);
    assert!(s3.beams.is_empty());
}

// ── area pulse ────────────────────────────────────────────────────────────────

#[test]
fn pulse_neutralizes_current_enemies_and_bombs() {
    let mut s = make_state();
    s.score.value = 25;
    s.enemies.push(enemy_at(100.0, 100.0, &s.config));
    s.bombs.push(Bomb::new(300.0, 300.0, 10.0, (0.0, 1.0), 6.0, BombColor::Blue));
    let s2 = activate_pulse(&s);
    assert_eq!(s2.score.value, 5);
    assert_eq!(s2.pulses.len(), 1);
    assert!(s2.enemies[0].neutralized);
    assert_eq!(s2.enemies[0].fire_interval, None);
    assert!(s2.bombs[0].neutralized);
    assert_eq!(s2.bombs[0].speed, 3.0);
    assert!(s2.events.contains(&GameEvent::PulseActivated { neutralized: 2 }));
}

#[test]
fn pulse_unaffordable_does_nothing() {
    let mut s = make_state();
    s.score.value = 19;
    s.enemies.push(enemy_at(100.0, 100.0, &s.config));
    let s2 = activate_pulse(&s);
    assert_eq!(s2.score.value, 19);
    assert!(s2.pulses.is_empty());
    assert!(!s2.enemies[0].neutralized);
}

#[test]
fn pulse_is_idempotent_per_entity() {
    let mut s = make_state();
    s.score.value = 40;
    s.enemies.push(enemy_at(100.0, 100.0, &s.config));
    s.bombs.push(Bomb::new(300.0, 300.0, 10.0, (0.0, 1.0), 6.0, BombColor::Blue));
    let s2 = activate_pulse(&activate_pulse(&s));
    // Each activation is paid for, but nothing is neutralized twice.
    assert_eq!(s2.score.value, 0);
    assert_eq!(s2.bombs[0].speed, 3.0);
    assert_eq!(s2.enemies[0].fire_interval, None);
    assert!(s2.events.contains(&GameEvent::PulseActivated { neutralized: 0 }));
}

#[test]
fn pulse_does_not_touch_later_enemies() {
    let mut s = make_state();
    s.score.value = 20;
    let mut s2 = activate_pulse(&s);
    s2.enemies.push(enemy_at(100.0, 100.0, &s2.config));
    assert!(!s2.enemies[0].neutralized);
    assert!(s2.enemies[0].fire_interval.is_some());
}

#[test]
fn pulse_overlay_expires() {
    let mut s = make_state();
    s.score.value = 20;
    let s = activate_pulse(&s);
    let s1 = run(&s, 1);
    assert_eq!(s1.pulses.len(), 1);
    let s2 = run(&s, 2);
    assert!(s2.pulses.is_empty());
}

// ── gravity field ─────────────────────────────────────────────────────────────

#[test]
fn field_costs_200() {
    let mut s = make_state();
    s.score.value = 250;
    let s2 = activate_field(&s);
    assert_eq!(s2.score.value, 50);
    assert_eq!(s2.fields.len(), 1);
    assert_eq!(s2.fields[0].life, 400);
}

#[test]
fn field_unaffordable_does_nothing() {
    let mut s = make_state();
    s.score.value = 199;
    let s2 = activate_field(&s);
    assert_eq!(s2.score.value, 199);
    assert!(s2.fields.is_empty());
}

#[test]
fn field_captures_bomb_once() {
    let mut s = make_state();
    s.fields.push(GravityField::new(400, &s.config));
    s.bombs.push(stationary_bomb(200.0, 200.0));

    let s1 = run(&s, 1);
    assert!(s1.bombs.is_empty());
    assert_eq!(s1.score.value, 1);
    assert_eq!(s1.explosions.len(), 1);

    let s5 = run(&s, 5);
    assert_eq!(s5.score.value, 1);
}

#[test]
fn field_captures_enemies_for_ten() {
    let mut s = make_state();
    s.fields.push(GravityField::new(400, &s.config));
    s.enemies.push(enemy_at(200.0, 100.0, &s.config));
    s.enemies.push(enemy_at(600.0, 100.0, &s.config));
    let s2 = run(&s, 1);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score.value, 20);
    assert_eq!(
        s2.events.iter().filter(|e| **e == GameEvent::EnemyCaptured).count(),
        2
    );
}

#[test]
fn field_expires_after_life_goes_negative() {
    let mut s = make_state();
    s.fields.push(GravityField::new(1, &s.config));
    assert_eq!(run(&s, 1).fields.len(), 1);
    assert!(run(&s, 2).fields.is_empty());
}

// ── tick: enemies ─────────────────────────────────────────────────────────────

#[test]
fn tick_spawns_enemy_when_timer_runs_out() {
    let mut s = make_state();
    s.spawn_countdown = 0;
    let s2 = run(&s, 1);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.spawn_countdown, 199);
    assert!(matches!(s2.events[0], GameEvent::EnemySpawned { .. }));
}

#[test]
fn tick_no_spawn_before_timer() {
    let mut s = make_state();
    s.spawn_countdown = 2;
    let s2 = run(&s, 1);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.spawn_countdown, 1);
}

#[test]
fn first_enemy_appears_on_frame_zero() {
    let s = init_state(GameConfig::default());
    let s2 = run(&s, 1);
    assert_eq!(s2.enemies.len(), 1);
    let e = &s2.enemies[0];
    assert!((50.0..=325.0).contains(&e.stop_depth));
    assert!((50..=300).contains(&e.fire_interval.unwrap()));
    assert!((1..=3).contains(&e.variant));
}

#[test]
fn enemy_descends_then_holds_exactly_once() {
    let mut s = make_state();
    s.enemies.push(Enemy::new(500.0, 50.0, 300, 1, &s.config));

    let mut rng = seeded_rng();
    let mut holding_events = 0;
    let mut depths = Vec::new();
    for _ in 0..30 {
        s = tick(&s, &no_keys(), &mut rng);
        holding_events += s
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyHolding { .. }))
            .count();
        depths.push(s.enemies[0].rect.center().1);
    }

    assert_eq!(holding_events, 1);
    assert_eq!(s.enemies[0].state, EnemyState::Holding);
    assert_eq!(s.enemies[0].vy, 0.0);
    // Six pixels per frame until the centre passes 50, then stationary.
    assert_eq!(depths[0], 6.0);
    assert_eq!(depths[8], 54.0);
    assert!(depths[9..].iter().all(|&d| d == 54.0));
}

#[test]
fn holding_enemy_fires_at_player() {
    let mut s = make_state();
    let mut e = Enemy::new(900.0, 50.0, 120, 2, &s.config);
    e.rect = Rect::from_center(900.0, 100.0, e.rect.w, e.rect.h);
    e.state = EnemyState::Holding;
    e.vy = 0.0;
    e.fire_countdown = 1;
    s.enemies.push(e);

    let s2 = run(&s, 1);
    assert_eq!(s2.bombs.len(), 1);
    // Straight below the enemy, aimed at the player beneath it.
    assert_eq!(s2.bombs[0].dir, (0.0, 1.0));
    assert_eq!(s2.enemies[0].fire_countdown, 120);
    assert!(s2.events.contains(&GameEvent::BombFired));
}

#[test]
fn neutralized_enemy_never_fires() {
    let mut s = make_state();
    let mut e = enemy_at(300.0, 100.0, &s.config);
    e.state = EnemyState::Holding;
    e.vy = 0.0;
    e.fire_countdown = 1;
    e.neutralize();
    s.enemies.push(e);
    let s2 = run(&s, 50);
    assert!(s2.bombs.is_empty());
}

// ── tick: beams ───────────────────────────────────────────────────────────────

/// Player facing right at (500, 300); the beam it fires touches an enemy
/// whose wreck is clear of the player.
fn beam_meets_enemy(parting_shot: bool) -> GameState {
    let mut s = make_state();
    s.config.parting_shot = parting_shot;
    s.player.rect = Rect::from_center(500.0, 300.0, 90.0, 90.0);
    let mut s = fire_beam(&s);
    s.enemies.push(enemy_at(650.0, 300.0, &s.config));
    s
}

#[test]
fn beam_kills_enemy_with_parting_shot() {
    let s = beam_meets_enemy(true);
    let s2 = run(&s, 1);
    assert!(s2.enemies.is_empty());
    assert!(s2.beams.is_empty());
    assert_eq!(s2.score.value, 1000);
    assert_eq!(s2.bombs.len(), 1);
    assert_eq!(s2.bombs[0].dir, (-1.0, 0.0));
    assert_eq!(s2.player.pose, PlayerPose::Victory);
    assert_eq!(s2.status, GameStatus::Playing);
    assert!(s2.events.contains(&GameEvent::EnemyShot));
}

#[test]
fn beam_kills_enemy_without_parting_shot() {
    let s = beam_meets_enemy(false);
    let s2 = run(&s, 1);
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score.value, 1000);
    assert!(s2.bombs.is_empty());
}

#[test]
fn beam_destroys_bomb_for_one_point() {
    let mut s = make_state();
    s.player.rect = Rect::from_center(500.0, 300.0, 90.0, 90.0);
    let mut s = fire_beam(&s);
    s.bombs.push(stationary_bomb(600.0, 300.0));
    let s2 = run(&s, 1);
    assert!(s2.bombs.is_empty());
    assert!(s2.beams.is_empty());
    assert_eq!(s2.score.value, 1);
    assert_eq!(s2.explosions.len(), 1);
    assert_eq!(s2.explosions[0].life, 49);
}

#[test]
fn field_capture_wins_over_beam() {
    let mut s = make_state();
    s.player.rect = Rect::from_center(500.0, 300.0, 90.0, 90.0);
    let mut s = fire_beam(&s);
    s.bombs.push(stationary_bomb(600.0, 300.0));
    s.fields.push(GravityField::new(400, &s.config));
    let s2 = run(&s, 1);
    // Captured by the field first; the beam finds nothing left to hit.
    assert_eq!(s2.score.value, 1);
    assert_eq!(s2.beams.len(), 1);
    assert!(s2.events.contains(&GameEvent::BombCaptured));
    assert!(!s2.events.contains(&GameEvent::BombShot));
}

// ── tick: bombs vs player ────────────────────────────────────────────────────

#[test]
fn bomb_hit_ends_game() {
    let mut s = make_state();
    s.bombs.push(stationary_bomb(900.0, 400.0));
    let s2 = run(&s, 1);
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.player.pose, PlayerPose::Defeated);
    assert!(s2.events.contains(&GameEvent::PlayerHit));
}

#[test]
fn finished_game_is_frozen() {
    let mut s = make_state();
    s.bombs.push(stationary_bomb(900.0, 400.0));
    let over = run(&s, 1);
    let later = run(&over, 10);
    assert_eq!(later.frame, over.frame);
    assert!(later.events.is_empty());
}

#[test]
fn invulnerable_player_absorbs_bombs() {
    let mut s = make_state();
    s.score.value = 7;
    s.player.state = PlayerState::Invulnerable { remaining: 100 };
    s.bombs.push(stationary_bomb(900.0, 400.0));
    let s2 = run(&s, 1);
    assert_eq!(s2.status, GameStatus::Playing);
    assert!(s2.bombs.is_empty());
    assert_eq!(s2.explosions.len(), 1);
    assert_eq!(s2.score.value, 7);
    assert!(s2.events.contains(&GameEvent::BombAbsorbed));
}

#[test]
fn bomb_leaving_screen_is_dropped() {
    let mut s = make_state();
    s.bombs.push(Bomb::new(100.0, 630.0, 10.0, (0.0, 1.0), 6.0, BombColor::Green));
    let s2 = run(&s, 2);
    assert!(s2.bombs.is_empty());
}

// ── tick: effects & bookkeeping ──────────────────────────────────────────────

#[test]
fn explosion_expires_after_its_life() {
    let mut s = make_state();
    s.explosions.push(Explosion::at(&Rect::new(10.0, 10.0, 5.0, 5.0), 3, &s.config));
    assert_eq!(run(&s, 3).explosions.len(), 1);
    assert!(run(&s, 4).explosions.is_empty());
}

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    let s2 = run(&s, 1);
    assert_eq!(s2.frame, 6);
}

#[test]
fn tick_does_not_mutate_original() {
    let mut s = make_state();
    s.bombs.push(Bomb::new(100.0, 100.0, 10.0, (0.0, 1.0), 6.0, BombColor::Green));
    let _ = run(&s, 1);
    assert_eq!(s.bombs[0].rect.center(), (100.0, 100.0));
    assert_eq!(s.frame, 0);
}
