/// Game constants, gathered into one immutable struct that is handed to
/// `init_state` and carried inside the game state.

use std::ops::RangeInclusive;

/// Screen width in world pixels.
pub const WIDTH: f32 = 1100.0;
/// Screen height in world pixels.
pub const HEIGHT: f32 = 650.0;
/// Simulation steps per second.
pub const FPS: u32 = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub fps: u32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_start: (f32, f32),
    pub player_size: (f32, f32),
    pub player_speed: f32,
    pub invulnerability_cost: u32,
    pub invulnerability_frames: u32,

    // ── Enemies ──────────────────────────────────────────────────────────────
    /// Frames between enemy spawns. The first enemy appears on frame 0.
    pub enemy_spawn_interval: u64,
    pub enemy_size: (f32, f32),
    pub enemy_speed: f32,
    pub enemy_stop_depth: RangeInclusive<u32>,
    pub enemy_fire_interval: RangeInclusive<u32>,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub bomb_speed: f32,
    pub bomb_radius: RangeInclusive<u32>,
    pub beam_speed: f32,
    /// Beam size when travelling along the x axis. Swapped for vertical beams.
    pub beam_size: (f32, f32),

    // ── Effects ──────────────────────────────────────────────────────────────
    pub explosion_size: (f32, f32),
    pub bomb_explosion_frames: i32,
    pub enemy_explosion_frames: i32,
    pub pulse_cost: u32,
    pub pulse_frames: i32,
    pub field_cost: u32,
    pub field_frames: i32,

    // ── Scoring ──────────────────────────────────────────────────────────────
    pub score_bomb_captured: u32,
    pub score_enemy_captured: u32,
    pub score_enemy_shot: u32,
    pub score_bomb_shot: u32,

    /// An enemy destroyed by a beam releases one last bomb at the player.
    pub parting_shot: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,

            player_start: (900.0, 400.0),
            player_size: (90.0, 90.0),
            player_speed: 10.0,
            invulnerability_cost: 100,
            invulnerability_frames: 500,

            enemy_spawn_interval: 200,
            enemy_size: (70.0, 60.0),
            enemy_speed: 6.0,
            enemy_stop_depth: 50..=(HEIGHT as u32 / 2),
            enemy_fire_interval: 50..=300,

            bomb_speed: 6.0,
            bomb_radius: 10..=50,
            beam_speed: 10.0,
            beam_size: (60.0, 20.0),

            explosion_size: (60.0, 60.0),
            bomb_explosion_frames: 50,
            enemy_explosion_frames: 100,
            // 0.05 s of overlay at the nominal frame rate
            pulse_frames: (0.05 * FPS as f32) as i32,
            pulse_cost: 20,
            field_cost: 200,
            field_frames: 400,

            score_bomb_captured: 1,
            score_enemy_captured: 10,
            score_enemy_shot: 1000,
            score_bomb_shot: 1,

            parting_shot: true,
        }
    }
}
