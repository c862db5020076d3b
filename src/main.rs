mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        ModifierKeyCode, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, info, trace};
use rand::thread_rng;

use gravity_shooter::compute::{activate_field, activate_pulse, fire_beam, init_state, tick};
use gravity_shooter::entities::{GameState, GameStatus, KeyState};
use gravity_shooter::GameConfig;

const TITLE: &str = "Gravity Shooter";

/// How long the final frame stays up after a fatal hit.
const GAME_OVER_PAUSE: Duration = Duration::from_secs(2);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 5 frames (100 ms at
/// 50 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 5;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: KeyCode, frame: u64) -> bool {
    key_frame
        .get(&key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|&k| is_held(key_frame, k, frame))
}

/// Collapse the per-key timestamps into this frame's key-state table.
fn held_keys(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> KeyState {
    KeyState {
        up: any_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: any_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
        left: any_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: any_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        invulnerability: any_held(
            key_frame,
            &[
                KeyCode::Modifier(ModifierKeyCode::RightShift),
                KeyCode::Char('i'),
                KeyCode::Char('I'),
            ],
            frame,
        ),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs one session until the player quits or is hit.
///
/// Held keys (movement, invulnerability) are tracked in a `key_frame` map
/// that records the frame of the last press/repeat for every key, so several
/// keys can be held at once.  One-shot actions (beam, pulse, field, quit)
/// fire on the press event itself.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(state.config.fps));

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            info!("quit with score {}", state.score.value);
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            info!("interrupted with score {}", state.score.value);
                            return Ok(());
                        }
                        KeyCode::Char(' ') => *state = fire_beam(state),
                        KeyCode::Char('e') | KeyCode::Char('E') => *state = activate_pulse(state),
                        KeyCode::Enter => *state = activate_field(state),
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let keys = held_keys(&key_frame, frame);
        *state = tick(state, &keys, &mut rng);
        for event in &state.events {
            trace!("frame {}: {:?}", state.frame, event);
        }

        display::render(out, state, terminal::size()?)?;

        if state.status == GameStatus::GameOver {
            info!("game over with score {}", state.score.value);
            thread::sleep(GAME_OVER_PAUSE);
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();
    info!("{TITLE} starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle(TITLE))?;
    out.execute(cursor::Hide)?;

    // Request key-release events (and bare modifier keys, for Right Shift).
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES,
        ))
        .is_ok();
    debug!("keyboard enhancement: {keyboard_enhanced}");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut state = init_state(GameConfig::default());
    let result = game_loop(&mut out, &mut state, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if result.is_ok() {
        println!("Final score: {}", state.score.value);
    }
    result
}
