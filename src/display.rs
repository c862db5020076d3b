/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world coordinates onto the terminal grid and state into glyph sprites.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use gravity_shooter::entities::{
    Beam, Bomb, BombColor, Enemy, Explosion, Facing, GameState, GameStatus, PlayerPose,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BG: Color = Color::Reset;
const C_BG_PULSE: Color = Color::DarkYellow;
const C_BG_FIELD: Color = Color::DarkGrey;
const C_SCORE: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_PLAYER_VICTORY: Color = Color::Yellow;
const C_PLAYER_DEFEATED: Color = Color::Blue;
/// Invulnerable players cycle between these, one per frame.
const C_PLAYER_INVULNERABLE: [Color; 2] = [Color::Magenta, Color::Cyan];
const C_ENEMY_NEUTRALIZED: Color = Color::DarkGrey;
const C_BEAM: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const EXPLOSION_FRAMES: [(&str, Color); 2] = [("✹", Color::Red), ("✺", Color::Yellow)];

const HINT: &str = "←↑→↓/WASD: Move  SPACE: Beam  E: Pulse(20)  ENTER: Field(200)  I: Shield(100)  Q: Quit";

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Maps world pixels onto the terminal grid. The last row is kept for the
/// controls hint.
#[derive(Clone, Copy)]
struct Viewport {
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(state: &GameState, (cols, rows): (u16, u16)) -> Self {
        let rows = rows.saturating_sub(1).max(1);
        let cols = cols.max(1);
        Self {
            cols,
            rows,
            sx: cols as f32 / state.config.width,
            sy: rows as f32 / state.config.height,
        }
    }

    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let col = (x * self.sx).clamp(0.0, (self.cols - 1) as f32) as u16;
        let row = (y * self.sy).clamp(0.0, (self.rows - 1) as f32) as u16;
        (col, row)
    }
}

/// Print `text` centred on the world point `(x, y)`, clipped to the grid.
fn draw_at<W: Write>(
    out: &mut W,
    view: &Viewport,
    (x, y): (f32, f32),
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let (col, row) = view.cell(x, y);
    let len = text.chars().count() as u16;
    let start = col
        .saturating_sub(len / 2)
        .min(view.cols.saturating_sub(len));
    let visible: String = text
        .chars()
        .take(view.cols.saturating_sub(start) as usize)
        .collect();
    out.queue(cursor::MoveTo(start, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(visible))?;
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a terminal of `size` (columns, rows).
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    size: (u16, u16),
) -> std::io::Result<()> {
    let view = Viewport::new(state, size);

    // Overlays tint the whole screen while they are alive.
    let bg = if !state.pulses.is_empty() {
        C_BG_PULSE
    } else if !state.fields.is_empty() {
        C_BG_FIELD
    } else {
        C_BG
    };
    out.queue(style::SetBackgroundColor(bg))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for enemy in &state.enemies {
        draw_enemy(out, &view, enemy)?;
    }
    for bomb in &state.bombs {
        draw_bomb(out, &view, bomb)?;
    }
    for beam in &state.beams {
        draw_beam(out, &view, beam)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, &view, explosion)?;
    }

    draw_player(out, &view, state)?;
    draw_score(out, &view, state)?;
    draw_controls_hint(out, size)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, &view, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, size.1.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn facing_arrow(facing: Facing) -> &'static str {
    match facing {
        Facing::Right => "▶",
        Facing::UpRight => "◥",
        Facing::Up => "▲",
        Facing::UpLeft => "◤",
        Facing::Left => "◀",
        Facing::DownLeft => "◣",
        Facing::Down => "▼",
        Facing::DownRight => "◢",
    }
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let sprite = match p.pose {
        PlayerPose::Normal => format!("[{}]", facing_arrow(p.facing)),
        PlayerPose::Victory => "\\o/".to_string(),
        PlayerPose::Defeated => "x_x".to_string(),
    };
    let color = match p.pose {
        PlayerPose::Defeated => C_PLAYER_DEFEATED,
        _ if p.is_invulnerable() => C_PLAYER_INVULNERABLE[(state.frame % 2) as usize],
        PlayerPose::Victory => C_PLAYER_VICTORY,
        PlayerPose::Normal => C_PLAYER,
    };
    draw_at(out, view, p.rect.center(), &sprite, color)
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let (sprite, color) = match enemy.variant {
        1 => ("«▼»", Color::Green),
        2 => ("(◎)", Color::Red),
        _ => ("<Ö>", Color::Magenta),
    };
    let color = if enemy.neutralized {
        C_ENEMY_NEUTRALIZED
    } else {
        color
    };
    draw_at(out, view, enemy.rect.center(), sprite, color)
}

fn draw_bomb<W: Write>(out: &mut W, view: &Viewport, bomb: &Bomb) -> std::io::Result<()> {
    let color = match bomb.color {
        BombColor::Red => Color::Red,
        BombColor::Green => Color::Green,
        BombColor::Blue => Color::Blue,
        BombColor::Yellow => Color::Yellow,
        BombColor::Magenta => Color::Magenta,
        BombColor::Cyan => Color::Cyan,
    };
    let sprite = if bomb.radius > 30.0 { "(●)" } else { "●" };
    draw_at(out, view, bomb.rect.center(), sprite, color)
}

fn draw_beam<W: Write>(out: &mut W, view: &Viewport, beam: &Beam) -> std::io::Result<()> {
    let sprite = match beam.facing {
        Facing::Left | Facing::Right => "━━",
        Facing::Up | Facing::Down => "┃",
        Facing::UpRight | Facing::DownLeft => "╱",
        Facing::UpLeft | Facing::DownRight => "╲",
    };
    draw_at(out, view, beam.rect.center(), sprite, C_BEAM)
}

fn draw_explosion<W: Write>(
    out: &mut W,
    view: &Viewport,
    explosion: &Explosion,
) -> std::io::Result<()> {
    let (sprite, color) = EXPLOSION_FRAMES[explosion.frame()];
    draw_at(out, view, explosion.rect.center(), sprite, color)
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_score<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let anchor = (100.0, state.config.height - 50.0);
    draw_at(out, view, anchor, &state.score.text(), C_SCORE)
}

fn draw_controls_hint<W: Write>(out: &mut W, (cols, rows): (u16, u16)) -> std::io::Result<()> {
    let hint: String = HINT.chars().take(cols.saturating_sub(1) as usize).collect();
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score.value);
    let lines: [(&str, Color); 4] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
