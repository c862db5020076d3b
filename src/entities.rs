/// All game entity types and their per-frame motion rules.
///
/// Entities know how to move themselves and when they have expired; every
/// cross-entity interaction lives in `collision`, and the order in which
/// things happen within a frame lives in `compute`.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::{direction_vector, fully_inside, Rect};

// ── Shared capability ─────────────────────────────────────────────────────────

/// What every collection-managed entity provides to the frame loop.
pub trait Sprite {
    fn rect(&self) -> &Rect;

    /// Advance one simulation step.
    fn advance(&mut self);

    /// True once the entity should be dropped from its collection.
    fn is_expired(&self, width: f32, height: f32) -> bool;
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Snapshot of the held keys for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub invulnerability: bool,
}

impl KeyState {
    /// Net movement as a sum of unit deltas. Diagonals are not renormalized.
    pub fn delta(&self) -> (i8, i8) {
        let mut dx = 0;
        let mut dy = 0;
        if self.up {
            dy -= 1;
        }
        if self.down {
            dy += 1;
        }
        if self.left {
            dx -= 1;
        }
        if self.right {
            dx += 1;
        }
        (dx, dy)
    }
}

// ── Facing ────────────────────────────────────────────────────────────────────

/// One of the eight compass directions the player can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::Right,
        Facing::UpRight,
        Facing::Up,
        Facing::UpLeft,
        Facing::Left,
        Facing::DownLeft,
        Facing::Down,
        Facing::DownRight,
    ];

    /// `None` for the zero delta.
    pub fn from_delta(dx: i8, dy: i8) -> Option<Facing> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Facing::Right),
            (1, -1) => Some(Facing::UpRight),
            (0, -1) => Some(Facing::Up),
            (-1, -1) => Some(Facing::UpLeft),
            (-1, 0) => Some(Facing::Left),
            (-1, 1) => Some(Facing::DownLeft),
            (0, 1) => Some(Facing::Down),
            (1, 1) => Some(Facing::DownRight),
            _ => None,
        }
    }

    /// Raw grid delta, e.g. `(1, -1)` for up-right.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Facing::Right => (1, 0),
            Facing::UpRight => (1, -1),
            Facing::Up => (0, -1),
            Facing::UpLeft => (-1, -1),
            Facing::Left => (-1, 0),
            Facing::DownLeft => (-1, 1),
            Facing::Down => (0, 1),
            Facing::DownRight => (1, 1),
        }
    }

    /// Unit-length direction.
    pub fn unit(self) -> (f32, f32) {
        let (dx, dy) = self.delta();
        let (dx, dy) = (dx as f32, dy as f32);
        let norm = dx.hypot(dy);
        (dx / norm, dy / norm)
    }
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    pub value: u32,
}

impl Score {
    pub fn add(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
    }

    /// Deduct `cost` if the balance covers it.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if self.value >= cost {
            self.value -= cost;
            true
        } else {
            false
        }
    }

    pub fn text(&self) -> String {
        format!("Score: {}", self.value)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerState {
    Normal,
    /// Bombs are destroyed on contact instead of ending the run.
    Invulnerable { remaining: u32 },
}

/// Which sprite variant the player shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerPose {
    Normal,
    /// Shown after a beam kill until the player next moves.
    Victory,
    Defeated,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub facing: Facing,
    pub speed: f32,
    pub state: PlayerState,
    pub pose: PlayerPose,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (cx, cy) = config.player_start;
        let (w, h) = config.player_size;
        Self {
            rect: Rect::from_center(cx, cy, w, h),
            facing: Facing::Right,
            speed: config.player_speed,
            state: PlayerState::Normal,
            pose: PlayerPose::Normal,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        matches!(self.state, PlayerState::Invulnerable { .. })
    }

    /// Move according to the held keys. A move that would leave the screen is
    /// reverted on both axes.
    pub fn apply_input(&mut self, keys: &KeyState, width: f32, height: f32) {
        let (dx, dy) = keys.delta();
        let (mx, my) = (self.speed * dx as f32, self.speed * dy as f32);
        self.rect.move_by(mx, my);
        if !fully_inside(&self.rect, width, height) {
            self.rect.move_by(-mx, -my);
        }
        if let Some(facing) = Facing::from_delta(dx, dy) {
            self.facing = facing;
            self.pose = PlayerPose::Normal;
        }
    }

    /// Spend `cost` points to become invulnerable for `frames` frames.
    /// Only allowed from the normal state.
    pub fn activate_invulnerability(&mut self, score: &mut Score, cost: u32, frames: u32) -> bool {
        if self.state != PlayerState::Normal || !score.try_spend(cost) {
            return false;
        }
        self.state = PlayerState::Invulnerable { remaining: frames };
        true
    }

    /// Count down an active invulnerability, reverting to normal at zero.
    pub fn tick_invulnerability(&mut self) {
        if let PlayerState::Invulnerable { remaining } = self.state {
            let remaining = remaining.saturating_sub(1);
            self.state = if remaining == 0 {
                PlayerState::Normal
            } else {
                PlayerState::Invulnerable { remaining }
            };
        }
    }

    /// Does any bomb overlap the player?
    pub fn take_damage_check(&self, bombs: &[Bomb]) -> bool {
        bombs.iter().any(|b| b.rect.intersects(&self.rect))
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyState {
    Descending,
    /// Reached its stop depth; fires periodically.
    Holding,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    pub vy: f32,
    /// Centre depth at which the enemy stops descending.
    pub stop_depth: f32,
    pub state: EnemyState,
    /// Frames between shots. `None` once neutralized: never fires again.
    pub fire_interval: Option<u32>,
    /// Frames left until the next shot while holding.
    pub fire_countdown: u32,
    pub neutralized: bool,
    /// Sprite variant, 1 to 3.
    pub variant: u8,
}

impl Enemy {
    pub fn new(cx: f32, stop_depth: f32, fire_interval: u32, variant: u8, config: &GameConfig) -> Self {
        let (w, h) = config.enemy_size;
        Self {
            rect: Rect::from_center(cx, 0.0, w, h),
            vy: config.enemy_speed,
            stop_depth,
            state: EnemyState::Descending,
            fire_interval: Some(fire_interval),
            fire_countdown: fire_interval,
            neutralized: false,
            variant,
        }
    }

    /// A fresh enemy at a random column along the top edge.
    pub fn spawn(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let cx = rng.gen_range(0.0..=config.width);
        let stop_depth = rng.gen_range(config.enemy_stop_depth.clone()) as f32;
        let interval = rng.gen_range(config.enemy_fire_interval.clone());
        let variant = rng.gen_range(1..=3);
        Self::new(cx, stop_depth, interval, variant, config)
    }

    /// Count down towards the next shot. Returns `true` on the frame the
    /// enemy should fire.
    pub fn ready_to_fire(&mut self) -> bool {
        if self.state != EnemyState::Holding || self.neutralized {
            return false;
        }
        let Some(interval) = self.fire_interval else {
            return false;
        };
        self.fire_countdown = self.fire_countdown.saturating_sub(1);
        if self.fire_countdown == 0 {
            self.fire_countdown = interval;
            true
        } else {
            false
        }
    }

    /// Disable firing for good. Returns `false` if already neutralized.
    pub fn neutralize(&mut self) -> bool {
        if self.neutralized {
            return false;
        }
        self.neutralized = true;
        self.fire_interval = None;
        true
    }
}

impl Sprite for Enemy {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn advance(&mut self) {
        let (_, cy) = self.rect.center();
        if cy > self.stop_depth {
            self.vy = 0.0;
            self.state = EnemyState::Holding;
        }
        self.rect.move_by(0.0, self.vy);
    }

    /// Enemies leave only by being destroyed.
    fn is_expired(&self, _width: f32, _height: f32) -> bool {
        false
    }
}

// ── Bomb ──────────────────────────────────────────────────────────────────────

/// Cosmetic bomb colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BombColor {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl BombColor {
    pub const ALL: [BombColor; 6] = [
        BombColor::Red,
        BombColor::Green,
        BombColor::Blue,
        BombColor::Yellow,
        BombColor::Magenta,
        BombColor::Cyan,
    ];
}

#[derive(Clone, Debug)]
pub struct Bomb {
    pub rect: Rect,
    /// Unit direction, fixed at creation.
    pub dir: (f32, f32),
    pub speed: f32,
    pub radius: f32,
    pub color: BombColor,
    pub neutralized: bool,
}

impl Bomb {
    pub fn new(cx: f32, cy: f32, radius: f32, dir: (f32, f32), speed: f32, color: BombColor) -> Self {
        Self {
            rect: Rect::from_center(cx, cy, 2.0 * radius, 2.0 * radius),
            dir,
            speed,
            radius,
            color,
            neutralized: false,
        }
    }

    /// Drop a bomb from just below `from`'s centre, aimed at `target` as it
    /// stands right now. The aim is never updated afterwards.
    pub fn aimed(from: &Rect, target: &Rect, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let dir = direction_vector(from, target).unwrap_or_else(|err| {
            debug!("{err}; dropping bomb straight down");
            (0.0, 1.0)
        });
        let radius = rng.gen_range(config.bomb_radius.clone()) as f32;
        let color = *BombColor::ALL.choose(rng).unwrap_or(&BombColor::Red);
        let (cx, cy) = from.center();
        Self::new(cx, cy + from.h / 2.0, radius, dir, config.bomb_speed, color)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.dir.0 * self.speed, self.dir.1 * self.speed)
    }

    /// Halve the speed once. Returns `false` if already neutralized.
    pub fn neutralize(&mut self) -> bool {
        if self.neutralized {
            return false;
        }
        self.neutralized = true;
        self.speed *= 0.5;
        true
    }
}

impl Sprite for Bomb {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn advance(&mut self) {
        let (vx, vy) = self.velocity();
        self.rect.move_by(vx, vy);
    }

    fn is_expired(&self, width: f32, height: f32) -> bool {
        !fully_inside(&self.rect, width, height)
    }
}

// ── Beam ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Beam {
    pub rect: Rect,
    pub facing: Facing,
    pub dir: (f32, f32),
    pub speed: f32,
}

impl Beam {
    /// Fire along the player's current facing, starting one body length ahead.
    pub fn from_player(player: &Player, config: &GameConfig) -> Self {
        let dir = player.facing.unit();
        let (bw, bh) = config.beam_size;
        // Bounding box of the beam rotated onto `dir`.
        let w = dir.0.abs() * bw + dir.1.abs() * bh;
        let h = dir.1.abs() * bw + dir.0.abs() * bh;
        let (px, py) = player.rect.center();
        let cx = px + player.rect.w * dir.0;
        let cy = py + player.rect.h * dir.1;
        Self {
            rect: Rect::from_center(cx, cy, w, h),
            facing: player.facing,
            dir,
            speed: config.beam_speed,
        }
    }
}

impl Sprite for Beam {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn advance(&mut self) {
        self.rect.move_by(self.speed * self.dir.0, self.speed * self.dir.1);
    }

    fn is_expired(&self, width: f32, height: f32) -> bool {
        !fully_inside(&self.rect, width, height)
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Explosion {
    pub rect: Rect,
    /// Remaining frames; the explosion is dropped once this goes negative.
    pub life: i32,
}

impl Explosion {
    pub fn at(anchor: &Rect, life: i32, config: &GameConfig) -> Self {
        let (cx, cy) = anchor.center();
        let (w, h) = config.explosion_size;
        Self {
            rect: Rect::from_center(cx, cy, w, h),
            life,
        }
    }

    /// Animation frame, alternating every ten frames.
    pub fn frame(&self) -> usize {
        (self.life.max(0) / 10 % 2) as usize
    }
}

impl Sprite for Explosion {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn advance(&mut self) {
        self.life -= 1;
    }

    fn is_expired(&self, _width: f32, _height: f32) -> bool {
        self.life < 0
    }
}

// ── Area pulse ────────────────────────────────────────────────────────────────

/// Short full-screen flash. Its effect happens once, on activation.
#[derive(Clone, Debug)]
pub struct Pulse {
    pub rect: Rect,
    pub life: i32,
}

impl Pulse {
    /// Neutralize every enemy and bomb currently alive. Returns the pulse
    /// overlay and how many entities it newly neutralized.
    pub fn activate(enemies: &mut [Enemy], bombs: &mut [Bomb], config: &GameConfig) -> (Self, usize) {
        let hit_enemies = enemies.iter_mut().map(Enemy::neutralize).filter(|&hit| hit).count();
        let hit_bombs = bombs.iter_mut().map(Bomb::neutralize).filter(|&hit| hit).count();
        let pulse = Self {
            rect: Rect::new(0.0, 0.0, config.width, config.height),
            life: config.pulse_frames,
        };
        (pulse, hit_enemies + hit_bombs)
    }
}

impl Sprite for Pulse {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn advance(&mut self) {
        self.life -= 1;
    }

    fn is_expired(&self, _width: f32, _height: f32) -> bool {
        self.life <= 0
    }
}

// ── Gravity field ─────────────────────────────────────────────────────────────

/// Full-screen field that captures overlapping bombs and enemies every frame.
#[derive(Clone, Debug)]
pub struct GravityField {
    pub rect: Rect,
    pub life: i32,
}

impl GravityField {
    pub fn new(life: i32, config: &GameConfig) -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, config.width, config.height),
            life,
        }
    }
}

impl Sprite for GravityField {
    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn advance(&mut self) {
        self.life -= 1;
    }

    fn is_expired(&self, _width: f32, _height: f32) -> bool {
        self.life < 0
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Things that happened during the last step, for logging and tests.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemySpawned { x: f32 },
    EnemyHolding { y: f32 },
    BombFired,
    EnemyShot,
    BombShot,
    BombCaptured,
    EnemyCaptured,
    /// An invulnerable player destroyed a bomb on contact.
    BombAbsorbed,
    BeamFired { facing: Facing },
    PulseActivated { neutralized: usize },
    FieldActivated,
    InvulnerabilityActivated,
    PlayerHit,
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// The entire game state. Cloneable so the step functions in `compute` can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bombs: Vec<Bomb>,
    pub beams: Vec<Beam>,
    pub explosions: Vec<Explosion>,
    pub pulses: Vec<Pulse>,
    pub fields: Vec<GravityField>,
    pub score: Score,
    pub status: GameStatus,
    pub frame: u64,
    /// Frames until the next enemy spawn.
    pub spawn_countdown: u64,
    /// Events raised since the last `tick` began.
    pub events: Vec<GameEvent>,
    pub config: GameConfig,
}
