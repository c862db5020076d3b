/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use log::debug;
use rand::Rng;

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{
    Beam, Bomb, Enemy, EnemyState, GameEvent, GameState, GameStatus, GravityField, KeyState,
    Player, Pulse, Score, Sprite,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state.
pub fn init_state(config: GameConfig) -> GameState {
    GameState {
        player: Player::new(&config),
        enemies: Vec::new(),
        bombs: Vec::new(),
        beams: Vec::new(),
        explosions: Vec::new(),
        pulses: Vec::new(),
        fields: Vec::new(),
        score: Score::default(),
        status: GameStatus::Playing,
        frame: 0,
        spawn_countdown: 0,
        events: Vec::new(),
        config,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Fire a beam along the player's current facing.
pub fn fire_beam(state: &GameState) -> GameState {
    let mut next = state.clone();
    let beam = Beam::from_player(&next.player, &next.config);
    next.events.push(GameEvent::BeamFired { facing: beam.facing });
    next.beams.push(beam);
    next
}

/// Spend points on an area pulse that neutralizes every enemy and bomb
/// currently on screen. Does nothing if the score does not cover the cost.
pub fn activate_pulse(state: &GameState) -> GameState {
    let mut next = state.clone();
    if !next.score.try_spend(next.config.pulse_cost) {
        return next;
    }
    let (pulse, neutralized) = Pulse::activate(&mut next.enemies, &mut next.bombs, &next.config);
    debug!("pulse neutralized {neutralized} entities");
    next.pulses.push(pulse);
    next.events.push(GameEvent::PulseActivated { neutralized });
    next
}

/// Spend points on a gravity field. Does nothing if the score does not
/// cover the cost.
pub fn activate_field(state: &GameState) -> GameState {
    let mut next = state.clone();
    if !next.score.try_spend(next.config.field_cost) {
        return next;
    }
    debug!("gravity field up for {} frames", next.config.field_frames);
    next.fields
        .push(GravityField::new(next.config.field_frames, &next.config));
    next.events.push(GameEvent::FieldActivated);
    next
}

/// Spend points to make the player invulnerable. Only allowed while the
/// player is in the normal state.
pub fn activate_invulnerability(state: &GameState) -> GameState {
    let mut next = state.clone();
    activate_invulnerability_in_place(&mut next);
    next
}

/// Move the player from the held keys, count down any active
/// invulnerability and honour a held invulnerability key.
pub fn apply_input(state: &GameState, keys: &KeyState) -> GameState {
    let mut next = state.clone();
    apply_input_in_place(&mut next, keys);
    next
}

fn activate_invulnerability_in_place(state: &mut GameState) {
    let cost = state.config.invulnerability_cost;
    let frames = state.config.invulnerability_frames;
    if state
        .player
        .activate_invulnerability(&mut state.score, cost, frames)
    {
        debug!("invulnerable for {frames} frames");
        state.events.push(GameEvent::InvulnerabilityActivated);
    }
}

fn apply_input_in_place(state: &mut GameState, keys: &KeyState) {
    let (width, height) = (state.config.width, state.config.height);
    state.player.apply_input(keys, width, height);
    state.player.tick_invulnerability();
    if keys.invulnerability {
        activate_invulnerability_in_place(state);
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ─────────────────────────

/// Advance every live entity one step and drop the expired ones.
fn advance_all<T: Sprite>(items: &mut Vec<T>, width: f32, height: f32) {
    for item in items.iter_mut() {
        item.advance();
    }
    items.retain(|item| !item.is_expired(width, height));
}

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A finished game is returned unchanged.
pub fn tick(state: &GameState, keys: &KeyState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.events.clear();
    if next.status == GameStatus::GameOver {
        return next;
    }
    let (width, height) = (next.config.width, next.config.height);

    // ── 1. Spawn a new enemy ─────────────────────────────────────────────────
    if next.spawn_countdown == 0 {
        let enemy = Enemy::spawn(&next.config, rng);
        next.events.push(GameEvent::EnemySpawned { x: enemy.rect.center().0 });
        next.enemies.push(enemy);
        next.spawn_countdown = next.config.enemy_spawn_interval;
    }
    next.spawn_countdown = next.spawn_countdown.saturating_sub(1);

    // ── 2. Holding enemies fire at the player ────────────────────────────────
    let mut fired = Vec::new();
    for enemy in next.enemies.iter_mut() {
        if enemy.ready_to_fire() {
            fired.push(Bomb::aimed(&enemy.rect, &next.player.rect, &next.config, rng));
        }
    }
    for bomb in fired {
        next.bombs.push(bomb);
        next.events.push(GameEvent::BombFired);
    }

    // ── 3. Collisions, scoring, lethal contact ───────────────────────────────
    collision::resolve(&mut next, rng);
    if next.status == GameStatus::GameOver {
        debug!("player hit on frame {}", next.frame);
        return next;
    }

    // ── 4. Player input ──────────────────────────────────────────────────────
    apply_input_in_place(&mut next, keys);

    // ── 5. Move everything else ──────────────────────────────────────────────
    advance_all(&mut next.fields, width, height);
    advance_all(&mut next.beams, width, height);

    let before: Vec<EnemyState> = next.enemies.iter().map(|e| e.state).collect();
    advance_all(&mut next.enemies, width, height);
    for (enemy, was) in next.enemies.iter().zip(before) {
        if was == EnemyState::Descending && enemy.state == EnemyState::Holding {
            next.events.push(GameEvent::EnemyHolding { y: enemy.rect.center().1 });
        }
    }

    advance_all(&mut next.bombs, width, height);
    advance_all(&mut next.explosions, width, height);
    advance_all(&mut next.pulses, width, height);

    next.frame += 1;
    next
}
