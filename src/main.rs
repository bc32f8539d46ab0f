//! QUADFALL - a falling-block puzzle for the terminal

mod board;
mod event;
mod game;
mod input;
mod leaderboard;
mod lock;
mod menu;
mod mode;
mod piece;
mod queue;
mod score;
mod settings;
mod srs;
mod tetromino;
mod ui;

use crossterm::{
    event::{Event, KeyCode, KeyEventKind, poll, read},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use event::GameEvent;
use game::{Game, GameState};
use input::InputHandler;
use leaderboard::Submission;
use menu::{Menu, MenuAction};
use mode::GameMode;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Input delay after game over to prevent accidental menu return
const GAME_OVER_INPUT_DELAY: Duration = Duration::from_secs(2);

/// How long transient announcement text stays on screen
const FLASH_DURATION: Duration = Duration::from_secs(2);

/// Application state
enum AppState {
    Menu(Menu),
    Playing(Game, InputHandler),
}

fn main() -> io::Result<()> {
    // Session id keys the per-run log file
    let session_id: u32 = rand::random();
    let log_dir = std::env::temp_dir().join("quadfall");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file = format!("{:08x}.log", session_id);

    // The terminal belongs to the TUI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quadfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "quadfall starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    match &result {
        Ok(Some(game)) => {
            println!("\nThanks for playing QUADFALL!");
            println!("Mode: {}", game.mode().name());
            println!("Final Score: {}", game.score.points);
            println!("Level: {} | Lines: {}", game.score.level, game.score.lines);
            if game.mode() == GameMode::Sprint {
                println!("Time: {}", game.clock.format_elapsed());
            }
        }
        Ok(None) => {
            println!("\nThanks for playing QUADFALL!");
        }
        Err(_) => {}
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
) -> io::Result<Option<Game>> {
    let mut state = AppState::Menu(Menu::new());
    let mut last_game: Option<Game> = None;
    let mut game_started = Instant::now();
    let mut game_over_at: Option<Instant> = None;
    let mut flash: Option<(String, Instant)> = None;

    loop {
        if flash
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= FLASH_DURATION)
        {
            flash = None;
        }

        terminal.draw(|frame| match &state {
            AppState::Menu(menu) => ui::render_menu(frame, menu, settings),
            AppState::Playing(game, _) => ui::render_game(
                frame,
                game,
                settings,
                flash.as_ref().map(|(text, _)| text.as_str()),
            ),
        })?;

        if poll(FRAME_DURATION)? {
            if let Event::Key(key) = read()? {
                if key.kind != KeyEventKind::Press {
                    if key.kind == KeyEventKind::Release {
                        if let AppState::Playing(_, input) = &mut state {
                            input.key_up(key);
                        }
                    }
                } else {
                    match &mut state {
                        AppState::Menu(menu) => match key.code {
                            KeyCode::Up => menu.move_up(),
                            KeyCode::Down => menu.move_down(),
                            KeyCode::Left => menu.cycle_left(),
                            KeyCode::Right => menu.cycle_right(),
                            KeyCode::Enter => {
                                if let Some(action) = menu.select() {
                                    match action {
                                        MenuAction::StartGame(mode) => {
                                            tracing::info!(mode = mode.name(), "starting game");
                                            let game = Game::new(mode);
                                            let input = InputHandler::from_settings(settings);
                                            game_started = Instant::now();
                                            game_over_at = None;
                                            flash = None;
                                            state = AppState::Playing(game, input);
                                        }
                                        MenuAction::Quit => return Ok(last_game),
                                    }
                                }
                            }
                            KeyCode::Char('q') | KeyCode::Esc => {
                                if !menu.back() {
                                    return Ok(last_game);
                                }
                            }
                            _ => {}
                        },
                        AppState::Playing(game, input) => {
                            if game.state.is_over() {
                                // Only allow return to menu after a short delay
                                if game_over_at
                                    .is_some_and(|at| at.elapsed() >= GAME_OVER_INPUT_DELAY)
                                {
                                    last_game = Some(std::mem::replace(
                                        game,
                                        Game::new(GameMode::Marathon),
                                    ));
                                    state = AppState::Menu(Menu::new());
                                    game_over_at = None;
                                }
                            } else {
                                for action in input.key_down(key) {
                                    game.process_action(action);
                                }
                            }
                        }
                    }
                }
            }
        }

        // Per-frame simulation update; terminal states stop the simulation
        if let AppState::Playing(game, input) = &mut state {
            if !game.state.is_over() {
                for action in input.update() {
                    game.process_action(action);
                }
                game.tick(game_started.elapsed().as_millis() as u64);
            }
            handle_events(game, input, &mut flash);

            if game.state.is_over() && game_over_at.is_none() {
                game_over_at = Some(Instant::now());
                finalize_game(game, settings);
            }
        }
    }
}

/// Drain engine events into presentation side effects
fn handle_events(game: &mut Game, input: &mut InputHandler, flash: &mut Option<(String, Instant)>) {
    for event in game.drain_events() {
        tracing::debug!(?event, "engine event");
        match event {
            GameEvent::LineClear { count, t_spin } => {
                *flash = Some((clear_name(count, t_spin), Instant::now()));
            }
            GameEvent::PerfectClear => {
                *flash = Some(("ALL CLEAR!".to_string(), Instant::now()));
            }
            GameEvent::LevelUp { level } => {
                *flash = Some((format!("Level {}", level), Instant::now()));
            }
            // Forget held keys so nothing repeats across the pause
            GameEvent::PauseToggled { .. } => input.clear(),
            _ => {}
        }
    }
}

fn clear_name(count: u8, t_spin: bool) -> String {
    let name = if t_spin {
        match count {
            1 => "T-Spin Single",
            2 => "T-Spin Double",
            _ => "T-Spin Triple",
        }
    } else {
        match count {
            1 => "Single",
            2 => "Double",
            3 => "Triple",
            _ => "Tetris",
        }
    };
    name.to_string()
}

/// Persist a finished game: stats, local high scores, leaderboard payload
fn finalize_game(game: &Game, settings: &mut Settings) {
    let score = &game.score;
    let mode = game.mode();
    tracing::info!(
        mode = mode.name(),
        points = score.points,
        lines = score.lines,
        level = score.level,
        "game finished"
    );

    settings.record_game(score, game.clock.elapsed_ms);
    let previous_best = settings.best_for(mode).map(|entry| entry.score);
    // Sprint ranks by completion time; an abandoned sprint has none
    let sprint_time = (mode == GameMode::Sprint && game.state == GameState::Complete)
        .then_some(game.clock.elapsed_ms);
    settings.add_score(mode, score.points, score.lines, score.level, sprint_time);
    if previous_best.is_none_or(|best| score.points > best) && mode != GameMode::Zen {
        tracing::info!("new local best for {}", mode.name());
    }

    if !settings.username.is_empty() {
        match Submission::new(&settings.username, score.points, mode, score.level, score.lines) {
            Ok(submission) => match submission.to_json() {
                Ok(payload) => tracing::info!(%payload, "leaderboard payload ready"),
                Err(e) => tracing::warn!("could not serialize leaderboard payload: {}", e),
            },
            Err(e) => tracing::info!("score not eligible for the leaderboard: {}", e),
        }
    }

    if let Err(e) = settings.save() {
        tracing::warn!("failed to save settings: {}", e);
    }
}
