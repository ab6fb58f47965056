mod app;
mod render;
mod save;
mod theme;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use app::{App, AppAction};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rustdoku_core::{Difficulty, GameSession};
use save::SaveState;
use theme::Theme;

/// Terminal Sudoku with a transformation-based generator.
#[derive(Parser)]
#[command(name = "rustdoku", version, about)]
struct Args {
    /// Difficulty for a fresh game (easy, medium, hard)
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Seed the generator for a reproducible board
    #[arg(long)]
    seed: Option<u64>,

    /// Use the light color theme
    #[arg(long)]
    light: bool,

    /// Ignore any saved game and start fresh
    #[arg(long)]
    fresh: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let app = build_app(&args);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn build_app(args: &Args) -> App {
    let theme = if args.light {
        Theme::light()
    } else {
        Theme::dark()
    };

    // A saved game takes precedence unless the user opted out or asked for
    // a specific seed.
    if !args.fresh && args.seed.is_none() {
        if let Some(saved) = SaveState::load() {
            if let Some(session) = saved.into_session() {
                let elapsed = Duration::from_secs(saved.elapsed_secs());
                return App::new(session, elapsed, theme, !args.light);
            }
        }
    }

    let session = match args.seed {
        Some(seed) => GameSession::with_seed(args.difficulty, seed),
        None => GameSession::new(args.difficulty),
    };
    App::new(session, Duration::ZERO, theme, !args.light)
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        render::render(stdout, &app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }
                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    // Keep an unfinished game for next launch; drop a finished one.
    if app.finished {
        SaveState::remove();
    } else {
        let _ = SaveState::capture(&app.session, app.elapsed().as_secs()).store();
    }

    Ok(())
}
