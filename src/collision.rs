/// Cross-collection collision resolution and scoring.
///
/// Each step takes the collections it works on explicitly and runs in the
/// order fixed by `resolve`. An entity removed by an earlier step is simply
/// absent for the later ones.

use log::debug;
use rand::Rng;

use crate::entities::{
    Bomb, Explosion, GameEvent, GameState, GameStatus, PlayerPose, PlayerState, Sprite,
};
use crate::geometry::Rect;

// ── Generic group tests ──────────────────────────────────────────────────────

/// Remove and return every item overlapping `rect`.
pub fn take_colliding<T: Sprite>(rect: &Rect, items: &mut Vec<T>) -> Vec<T> {
    let (hit, kept): (Vec<T>, Vec<T>) = items
        .drain(..)
        .partition(|item| item.rect().intersects(rect));
    *items = kept;
    hit
}

/// Mutual destruction between two groups. Every member of `a` touching any
/// member of `b` is removed along with all the `b` members it touches.
/// Members of `b` consumed by one `a` are no longer available to the next.
///
/// Returns the destroyed members of `a`.
pub fn collide_groups<A: Sprite, B: Sprite>(a: &mut Vec<A>, b: &mut Vec<B>) -> Vec<A> {
    let mut destroyed = Vec::new();
    let mut survivors = Vec::with_capacity(a.len());
    for item in a.drain(..) {
        if take_colliding(item.rect(), b).is_empty() {
            survivors.push(item);
        } else {
            destroyed.push(item);
        }
    }
    *a = survivors;
    destroyed
}

// ── Resolver steps ───────────────────────────────────────────────────────────

/// Live gravity fields capture overlapping bombs, then overlapping enemies.
pub fn resolve_fields(state: &mut GameState) {
    let config = &state.config;
    for field in &state.fields {
        for bomb in take_colliding(&field.rect, &mut state.bombs) {
            state
                .explosions
                .push(Explosion::at(&bomb.rect, config.bomb_explosion_frames, config));
            state.score.add(config.score_bomb_captured);
            state.events.push(GameEvent::BombCaptured);
        }
        for enemy in take_colliding(&field.rect, &mut state.enemies) {
            state
                .explosions
                .push(Explosion::at(&enemy.rect, config.enemy_explosion_frames, config));
            state.score.add(config.score_enemy_captured);
            state.events.push(GameEvent::EnemyCaptured);
        }
    }
}

/// Beams destroy enemies. Each kill flashes the victory pose and, when the
/// parting shot is enabled, releases one bomb from the wreck at the player.
pub fn resolve_beams_vs_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let config = &state.config;
    for enemy in collide_groups(&mut state.enemies, &mut state.beams) {
        state
            .explosions
            .push(Explosion::at(&enemy.rect, config.enemy_explosion_frames, config));
        state.score.add(config.score_enemy_shot);
        state.player.pose = PlayerPose::Victory;
        state.events.push(GameEvent::EnemyShot);
        debug!("enemy shot down, score {}", state.score.value);

        if config.parting_shot {
            let bomb = Bomb::aimed(&enemy.rect, &state.player.rect, config, rng);
            state.bombs.push(bomb);
            state.events.push(GameEvent::BombFired);
        }
    }
}

/// Beams destroy bombs.
pub fn resolve_beams_vs_bombs(state: &mut GameState) {
    let config = &state.config;
    for bomb in collide_groups(&mut state.bombs, &mut state.beams) {
        state
            .explosions
            .push(Explosion::at(&bomb.rect, config.bomb_explosion_frames, config));
        state.score.add(config.score_bomb_shot);
        state.events.push(GameEvent::BombShot);
    }
}

/// Bombs against the player: fatal while normal, harmless (and destroyed)
/// while invulnerable.
pub fn resolve_player(state: &mut GameState) {
    match state.player.state {
        PlayerState::Normal => {
            if state.player.take_damage_check(&state.bombs) {
                state.player.pose = PlayerPose::Defeated;
                state.status = GameStatus::GameOver;
                state.events.push(GameEvent::PlayerHit);
            }
        }
        PlayerState::Invulnerable { .. } => {
            let config = &state.config;
            for bomb in take_colliding(&state.player.rect, &mut state.bombs) {
                state
                    .explosions
                    .push(Explosion::at(&bomb.rect, config.bomb_explosion_frames, config));
                state.events.push(GameEvent::BombAbsorbed);
            }
        }
    }
}

/// Run every resolver step for one frame, in order.
pub fn resolve(state: &mut GameState, rng: &mut impl Rng) {
    resolve_fields(state);
    resolve_beams_vs_enemies(state, rng);
    resolve_beams_vs_bombs(state);
    resolve_player(state);
}
