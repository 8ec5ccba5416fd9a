//! UI rendering module for the Fredericksburg directory
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components, plus a plain-text renderer
//! for non-interactive output.

pub mod details;
pub mod directory;
pub mod help_overlay;
pub mod plain;
pub mod saved;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState};
use crate::data::Category;

pub use help_overlay::render as render_help_overlay;
pub use plain::render_page as render_plain_page;

/// Terminal color of a category's marker
pub fn category_color(category: Category) -> Color {
    let (r, g, b) = category.color();
    Color::Rgb(r, g, b)
}

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    match &app.state {
        AppState::Loading => render_loading(frame),
        AppState::Directory => directory::render(frame, app),
        AppState::Details(id) => details::render(frame, app, id),
        AppState::Saved(tab) => saved::render(frame, app, *tab),
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders a loading message while listings are being fetched
fn render_loading(frame: &mut Frame) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading Fredericksburg businesses...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}
