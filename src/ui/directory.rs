//! Directory screen rendering
//!
//! Renders the main view: category tabs and search box on top, the filters of
//! the active category on the left, the current page of businesses on the
//! right and a key hint / status bar at the bottom.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::category_color;
use crate::app::{App, InputMode};
use crate::data::geo::{format_distance, format_price_range};
use crate::data::{Business, CategoryFilter};

/// Width of the filter sidebar when the category has filters
const FILTER_PANEL_WIDTH: u16 = 28;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Length(3), // Search box
            Constraint::Min(3),    // Filters + list
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);

    if app.filter_options().is_empty() {
        render_list(frame, app, chunks[2]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(FILTER_PANEL_WIDTH), Constraint::Min(20)])
            .split(chunks[2]);
        render_filters(frame, app, body[0]);
        render_list(frame, app, body[1]);
    }

    render_help(frame, chunks[3], app);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let choices = CategoryFilter::choices();
    let titles: Vec<Line> = choices
        .iter()
        .enumerate()
        .map(|(i, choice)| Line::from(format!("{} {}", i, choice.label())))
        .collect();
    let selected = choices
        .iter()
        .position(|c| *c == app.pipeline.category())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .title(" Fredericksburg, TX ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );

    frame.render_widget(tabs, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let term = app.pipeline.search();

    let content = if term.is_empty() && !editing {
        Span::styled("Press / to search", Style::default().fg(Color::DarkGray))
    } else if editing {
        Span::styled(format!("{}\u{2588}", term), Style::default().fg(Color::White)) // █ cursor
    } else {
        Span::styled(term.to_string(), Style::default().fg(Color::White))
    };

    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let paragraph = Paragraph::new(Line::from(content)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );

    frame.render_widget(paragraph, area);
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let criteria = app.pipeline.criteria();
    let mut lines: Vec<Line> = Vec::new();
    let mut last_label = "";

    for (index, option) in app.filter_options().iter().enumerate() {
        if option.definition.label != last_label {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                option.definition.label,
                Style::default().add_modifier(Modifier::BOLD),
            )));
            last_label = option.definition.label;
        }

        let checked = criteria
            .get(option.definition.attribute)
            .is_some_and(|value| value.selects(option.value));
        let mark = if checked { "[x]" } else { "[ ]" };
        let is_cursor = index == app.filter_cursor;
        let style = if is_cursor {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };

        lines.push(Line::from(Span::styled(
            format!(" {} {}", mark, option.label),
            style,
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Filters ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(paragraph, area);
}

/// One row of the business list
fn business_line(app: &App, business: &Business, is_selected: bool) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space
    let (r, g, b) = business.category.color();
    let favorite = if app.favorites.is_favorite(&business.id) {
        "\u{2605}" // ★
    } else {
        " "
    };

    let name_style = if is_selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled("\u{25CF} ", Style::default().fg(Color::Rgb(r, g, b))), // ●
        Span::styled(format!("{:<28}", business.name), name_style),
        Span::styled(format!(" {:<5}", format_price_range(business.price_range)), Style::default().fg(Color::Green)),
        Span::styled(favorite.to_string(), Style::default().fg(Color::Yellow)),
    ];

    if let Some(rating) = business.rating {
        spans.push(Span::styled(
            format!(" {:.1}\u{2606}", rating), // ☆
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(distance) = business.distance {
        spans.push(Span::styled(
            format!("  {}", format_distance(distance)),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(summary) = business
        .short_description
        .as_deref()
        .or(business.description.as_deref())
    {
        spans.push(Span::styled(
            format!("  {}", summary),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.current_page();

    let lines: Vec<Line> = if let Some(error) = app.load_error.as_deref().filter(|_| app.businesses.is_empty()) {
        vec![
            Line::from(Span::styled(
                "Could not load businesses",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(error.to_string(), Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
        ]
    } else if page.items.is_empty() {
        vec![Line::from(Span::styled(
            "No businesses match your filters",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        page.items
            .iter()
            .enumerate()
            .map(|(index, business)| business_line(app, business, index == app.selected_index))
            .collect()
    };

    let category = app.pipeline.category();
    let border_color = match category {
        CategoryFilter::All => Color::Cyan,
        CategoryFilter::Only(c) => category_color(c),
    };
    let title = format!(
        " {} \u{2502} {} results \u{2502} Page {}/{} ",
        category.label(),
        page.total_items,
        page.page,
        page.total_pages
    );

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    frame.render_widget(paragraph, area);
}

/// Renders the help text at the bottom of the screen with data freshness
fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(status) = &app.status {
        let style = if app.stale {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Green)
        };
        frame.render_widget(Paragraph::new(Span::styled(status.clone(), style)), area);
        return;
    }

    let mut help_spans = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Category  "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(" Search  "),
        Span::styled("n/N", Style::default().fg(Color::Yellow)),
        Span::raw(" Page  "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(" Favorite  "),
        Span::styled("v", Style::default().fg(Color::Yellow)),
        Span::raw(" Saved  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    // Add data freshness indicator
    if let Some(last_refresh) = app.last_refresh {
        let mins_ago = (Local::now() - last_refresh).num_minutes();
        let freshness_text = if mins_ago < 1 {
            " \u{2502} Data: just now".to_string()
        } else {
            format!(" \u{2502} Data: {}m ago", mins_ago)
        };
        help_spans.push(Span::styled(freshness_text, Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
