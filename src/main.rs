//! Linkboard - Entry Point
//!
//! Initializes the terminal, loads settings and the board, and runs the
//! main loop.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use linkboard::{App, Settings};

/// Target frames per second for the UI loop
const TARGET_FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);

fn main() -> Result<()> {
    let settings = Settings::load();
    init_logging(&settings.log_file);

    log::info!("Starting Linkboard v{}", env!("CARGO_PKG_VERSION"));

    // An explicit path on the command line wins over settings
    let cli_path = std::env::args().nth(1).map(PathBuf::from);
    let load_on_start = settings.load_on_start || cli_path.is_some();
    let board_path = cli_path.unwrap_or_else(|| settings.board_path());
    log::info!("Board file: {}", board_path.display());

    let mut app = App::new(settings, board_path);
    if load_on_start && app.board_path().exists() {
        if let Err(e) = app.load() {
            log::warn!("Failed to load board: {:#}", e);
            app.show_error(&e);
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = app.on_exit() {
        log::error!("Failed to save board on exit: {:#}", e);
        eprintln!("Error: {:#}", e);
    }

    // Report any errors
    if let Err(ref e) = result {
        log::error!("Linkboard exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Linkboard shut down cleanly");
    result
}

/// Log to a file so output does not interfere with the TUI
fn init_logging(path: &Path) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

/// Main UI loop
fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // Handle all pending input
        while event::poll(Duration::from_millis(0))? {
            let handled = match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    app.handle_resize(width, height);
                    Ok(false)
                }
                _ => Ok(false),
            };

            match handled {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Input handling error: {:#}", e);
                    app.show_error(&e);
                }
            }
        }

        // Render
        terminal.draw(|frame| {
            app.sync_geometry(frame.area());
            app.render(frame);
        })?;

        // Frame rate limiting
        let frame_time = frame_start.elapsed();
        if frame_time < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - frame_time);
        }
    }
}
