mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use elemental_barrage::input::AbilityLatch;
use elemental_barrage::{
    initialize_run, is_run_over, step_frame, Difficulty, Element, FrameInput, GameConfig,
    GameState,
};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Optional TOML file that replaces the built-in tables.
const CONFIG_ENV: &str = "BARRAGE_CONFIG";
/// Optional file that receives log output; the terminal is busy rendering.
const LOG_ENV: &str = "BARRAGE_LOG";

/// A key counts as held if its last press/repeat arrived within this many
/// frames.  Covers terminals that never report key releases: OS key repeat
/// runs at 15 Hz or more, so 8 frames (≈133 ms) is refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Sample the held keys into one step's input.
fn sample_input(key_frame: &HashMap<KeyCode, u64>, frame: u64, ability: bool) -> FrameInput {
    use KeyCode::{Char, Down, Left, Right, Up};
    FrameInput {
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        focus: any_held(key_frame, &[Char('c'), Char('C')], frame),
        fire: any_held(key_frame, &[Char('z'), Char('Z'), Char(' ')], frame),
        ability,
    }
}

// ── Logging and configuration ─────────────────────────────────────────────────

/// Route `log` records to the file named by `BARRAGE_LOG`, if any.
/// `RUST_LOG` picks the level as usual.
fn init_logging() {
    let Ok(path) = std::env::var(LOG_ENV) else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            )
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
        }
        Err(err) => eprintln!("cannot open log file {}: {}", path, err),
    }
}

fn load_config() -> GameConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return GameConfig::default();
    };
    match GameConfig::load(&path) {
        Ok(config) => {
            log::info!("loaded game tables from {}", path);
            config
        }
        Err(err) => {
            log::warn!("{}: {}, using built-in tables", path, err);
            GameConfig::default()
        }
    }
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".elemental_barrage_score")
}

fn load_high_score() -> u64 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u64) {
    if let Err(err) = std::fs::write(high_score_path(), score.to_string()) {
        log::warn!("could not save high score: {}", err);
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

enum MenuResult<T> {
    Pick(T),
    Quit,
}

/// Draw a numbered option list and block until one is chosen.
fn show_menu<W: Write, T: Copy>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    heading: &str,
    high_score: u64,
    options: &[(T, String, Color, String)],
) -> std::io::Result<MenuResult<T>> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let top = (height / 2).saturating_sub(options.len() as u16 / 2 + 5);
    let left = cx.saturating_sub(18);

    let title = "◆  ELEMENTAL  BARRAGE  ◆";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        top,
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs.chars().count() as u16 / 2),
            top + 1,
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs))?;
    }

    out.queue(cursor::MoveTo(left, top + 3))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(heading))?;

    for (i, (_, label, color, desc)) in options.iter().enumerate() {
        out.queue(cursor::MoveTo(left, top + 5 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<10}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", desc)))?;
    }

    out.queue(cursor::MoveTo(left, top + 6 + options.len() as u16))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Q : Quit"))?;
    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Char(c) => {
                if let Some(pick) = c
                    .to_digit(10)
                    .and_then(|d| (d as usize).checked_sub(1))
                    .and_then(|i| options.get(i))
                {
                    return Ok(MenuResult::Pick(pick.0));
                }
                if c == 'q' || c == 'Q' {
                    return Ok(MenuResult::Quit);
                }
            }
            KeyCode::Esc => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

fn difficulty_options() -> Vec<(Difficulty, String, Color, String)> {
    Difficulty::ALL
        .iter()
        .map(|&d| {
            let (color, desc) = match d {
                Difficulty::Easy => (Color::Green, "Slower bullets, generous drops"),
                Difficulty::Normal => (Color::Yellow, "The intended challenge"),
                Difficulty::Hard => (Color::Red, "Dense patterns, two lives"),
            };
            (d, d.label().to_string(), color, desc.to_string())
        })
        .collect()
}

fn character_options(config: &GameConfig) -> Vec<(Element, String, Color, String)> {
    Element::BASE
        .iter()
        .map(|&e| {
            let character = config.character(e);
            let hex = e.color();
            let color = Color::Rgb {
                r: (hex >> 16) as u8,
                g: (hex >> 8) as u8,
                b: hex as u8,
            };
            let desc = format!("{} / {}", e.key(), character.ability.name);
            (e, character.name, color, desc)
        })
        .collect()
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Plays one run.  Returns the final state and `true` when the player asked
/// to quit the program, `false` to go back to the menu.
///
/// Input model: `key_frame` records the frame of the last press/repeat for
/// every key, and each step samples which keys are still fresh.  Terminals
/// with keyboard enhancement also report releases, which drop keys at once.
/// The ability key is edge-triggered: one press queues exactly one use.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<(GameState, bool)> {
    let mut rng = thread_rng();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut paused = false;
    let mut ability = AbilityLatch::default();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok((state, true)),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok((state, true));
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if is_run_over(&state) => {
                            return Ok((state, false));
                        }
                        KeyCode::Esc if !is_run_over(&state) => {
                            paused = !paused;
                            ability.cancel();
                            // Time spent paused must not reach the simulation.
                            last = Instant::now();
                        }
                        KeyCode::Char('x') | KeyCode::Char('X') => {
                            ability.press(!paused && !is_run_over(&state));
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !paused && !is_run_over(&state) {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            let input = sample_input(&key_frame, frame, ability.take());
            state = step_frame(state, &input, dt, &mut rng);
        }

        display::render(out, &state, paused)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let config = Arc::new(load_config());

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without support fall back to
    // the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, config);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: Arc<GameConfig>,
) -> std::io::Result<()> {
    let mut high_score = load_high_score();
    let difficulties = difficulty_options();
    let characters = character_options(&config);

    loop {
        let difficulty = match show_menu(out, rx, "Select difficulty:", high_score, &difficulties)? {
            MenuResult::Pick(d) => d,
            MenuResult::Quit => break,
        };
        let element = match show_menu(out, rx, "Select character:", high_score, &characters)? {
            MenuResult::Pick(e) => e,
            MenuResult::Quit => break,
        };

        let state = initialize_run(Arc::clone(&config), difficulty, element, high_score);
        let (state, quit) = game_loop(out, state, rx)?;

        if state.high_score > high_score {
            high_score = state.high_score;
            save_high_score(high_score);
        }
        if quit {
            break;
        }
    }
    Ok(())
}
