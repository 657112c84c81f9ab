use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{FileProbe, RodioBackend};
use crate::library::load_tracks;
use crate::player::{Controller, PlayerOptions};
use crate::view::SharedView;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();

    match logging::init(&settings.log) {
        Ok(path) => tracing::info!(log = %path.display(), "cassette starting"),
        Err(e) => eprintln!("cassette: logging disabled: {e}"),
    }
    if let Some(msg) = config_problem {
        eprintln!("cassette: {msg}");
        tracing::warn!("{msg}");
    }

    let dir = env::args_os().nth(1).map(PathBuf::from);
    let tracks = load_tracks(&settings.library, dir.as_deref())?;
    tracing::info!(tracks = tracks.len(), "track list ready");

    let audio = RodioBackend::open()?;
    let view = SharedView::new();
    let mut controller = Controller::new(
        tracks,
        audio,
        Arc::new(FileProbe),
        Arc::new(view.clone()),
        PlayerOptions::from(&settings.playback),
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut controller, &view);

    // Audio and the monitor go first; the terminal is restored last.
    controller.shutdown();
    let stragglers = controller.live_monitors();
    if stragglers > 0 {
        tracing::warn!(stragglers, "progress monitors still running at exit");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
