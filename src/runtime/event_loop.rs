use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioBackend;
use crate::config;
use crate::library::Direction;
use crate::player::Controller;
use crate::ui;
use crate::view::SharedView;

/// What a key press asks the player to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    TogglePlay,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    Mute,
    MaxVolume,
    Quit,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Action::TogglePlay),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::Next),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::Prev),
        KeyCode::Char('k') | KeyCode::Char('+') | KeyCode::Up => Some(Action::VolumeUp),
        KeyCode::Char('j') | KeyCode::Char('-') | KeyCode::Down => Some(Action::VolumeDown),
        KeyCode::Char('0') => Some(Action::Mute),
        KeyCode::Char('m') => Some(Action::MaxVolume),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Apply `action`. Returns `true` when the app should exit.
///
/// Playback errors were already logged and shown by the controller.
pub fn apply<A: AudioBackend>(
    action: Action,
    settings: &config::Settings,
    controller: &mut Controller<A>,
) -> bool {
    let step = settings.playback.volume_step;
    match action {
        Action::TogglePlay => {
            let _ = controller.toggle_play_pause();
        }
        Action::Next => {
            let _ = controller.skip(Direction::Forward);
        }
        Action::Prev => {
            let _ = controller.skip(Direction::Backward);
        }
        Action::VolumeUp => {
            controller.nudge_volume(step);
        }
        Action::VolumeDown => {
            controller.nudge_volume(-step);
        }
        Action::Mute => {
            controller.set_volume(0.0);
        }
        Action::MaxVolume => {
            controller.set_volume(1.0);
        }
        Action::Quit => return true,
    }
    false
}

/// Main terminal event loop: draws the view, checks for the end of the
/// track and dispatches key presses. Returns `Ok(())` when quit is requested.
pub fn run<A: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller<A>,
    view: &SharedView,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Err(e) = controller.tick() {
            // Already logged and shown by the controller.
            tracing::debug!(error = %e, "advancing to the next track failed");
        }

        let snapshot = view.snapshot();
        let position = (controller.state().index, controller.tracks().len());
        terminal.draw(|f| ui::draw(f, &snapshot, &settings.ui, position))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = action_for(key) {
                    if apply(action, settings, controller) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
