//! UI rendering helpers for the terminal user interface.
//!
//! This module renders a `ViewState` snapshot using `ratatui`: cover, track
//! name, progress bar, transport buttons and volume.

use std::path::Path;
use std::str::FromStr;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::config::UiSettings;
use crate::view::ViewState;

const CONTROLS: [(&str, &str); 6] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("j/k", "volume -/+"),
    ("0", "mute"),
    ("m", "max volume"),
    ("q", "quit"),
];

/// Render the controls help text.
fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Parse the configured progress colour, falling back to green.
fn progress_color(spec: &str) -> Color {
    Color::from_str(spec.trim()).unwrap_or(Color::Green)
}

/// What to show in the cover panel: the image's file name.
fn cover_caption(cover: Option<&Path>) -> String {
    match cover {
        Some(p) => p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string()),
        None => "(no cover)".to_string(),
    }
}

fn percent(fraction: f32) -> String {
    format!("{:.0}%", (fraction.clamp(0.0, 1.0) * 100.0).round())
}

/// Render the whole screen. `position` is the zero-based track index and the list length.
pub fn draw(frame: &mut Frame, view: &ViewState, ui: &UiSettings, position: (usize, usize)) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.title.as_str())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    // Cover panel
    let (index, total) = position;
    let cover_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" cover {}/{} ", index + 1, total))
        .title_alignment(Alignment::Center)
        .padding(Padding::uniform(1));
    let cover = Paragraph::new(cover_caption(view.cover.as_deref()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(cover_block);
    frame.render_widget(cover, chunks[1]);

    let label = Paragraph::new(Line::from(Span::styled(
        view.track_label.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(label, chunks[2]);

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(progress_color(&ui.progress_color)))
        .ratio(f64::from(view.progress.clamp(0.0, 1.0)))
        .label(percent(view.progress));
    frame.render_widget(progress, chunks[3]);

    let transport = Paragraph::new(format!("◄    [ {} ]    ►", view.button_label))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(transport, chunks[4]);

    let volume = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" volume "))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(f64::from(view.volume.clamp(0.0, 1.0)))
        .label(percent(view.volume));
    frame.render_widget(volume, chunks[5]);

    if let Some(status) = &view.status {
        let status = Paragraph::new(status.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(status, chunks[6]);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[7]);
}
