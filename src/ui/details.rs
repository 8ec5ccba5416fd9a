//! Business detail screen rendering

use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::category_color;
use crate::app::App;
use crate::data::geo::{format_distance, format_price_range};
use crate::data::Business;

pub fn render(frame: &mut Frame, app: &App, business_id: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let (title, lines, color) = match app.business_by_id(business_id) {
        Some(business) => (
            format!(" {} ", business.name),
            detail_lines(app, business),
            category_color(business.category),
        ),
        None => (
            " Not found ".to_string(),
            vec![Line::from("This business is no longer in the loaded area.")],
            Color::Gray,
        ),
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, chunks[0]);

    let help = Line::from(vec![
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(" Favorite  "),
        Span::styled("a", Style::default().fg(Color::Yellow)),
        Span::raw(" Add to itinerary  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);
    let status = app
        .status
        .as_ref()
        .map(|s| Line::from(Span::styled(s.clone(), Style::default().fg(Color::Green))))
        .unwrap_or(help);
    frame.render_widget(Paragraph::new(status).style(Style::default().fg(Color::DarkGray)), chunks[1]);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Weekly opening hours, "Closed" for days without an entry
fn hours_lines(hours: &BTreeMap<String, String>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "Hours",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for day in WEEKDAYS {
        let time = hours
            .get(day.to_lowercase().as_str())
            .cloned()
            .unwrap_or_else(|| "Closed".to_string());
        lines.push(field(day, time));
    }
    lines
}

fn detail_lines(app: &App, business: &Business) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("Category", business.category.label().to_string()),
        field("Price", format_price_range(business.price_range)),
    ];

    if let Some(rating) = business.rating {
        let reviews = business
            .review_count
            .map(|n| format!(" ({} reviews)", n))
            .unwrap_or_default();
        lines.push(field("Rating", format!("{:.1}/5{}", rating, reviews)));
    }
    if let Some(distance) = business.distance {
        lines.push(field("Distance", format_distance(distance)));
    }
    for (label, value) in [
        ("Address", &business.address),
        ("Phone", &business.phone),
        ("Website", &business.website),
        ("Cuisine", &business.cuisine),
        ("Lodging", &business.lodging_type),
    ] {
        if let Some(value) = value {
            lines.push(field(label, value.clone()));
        }
    }
    for (label, values) in [
        ("Wines", &business.wine_types),
        ("Features", &business.features),
        ("Amenities", &business.amenities),
    ] {
        if let Some(values) = values.as_ref().filter(|v| !v.is_empty()) {
            lines.push(field(label, values.join(", ")));
        }
    }

    if let Some(hours) = &business.hours {
        lines.push(Line::from(""));
        lines.extend(hours_lines(hours));
    }

    if let Some(description) = &business.description {
        lines.push(Line::from(""));
        lines.push(Line::from(description.clone()));
    }

    lines.push(Line::from(""));
    let mut badges = Vec::new();
    if app.favorites.is_favorite(&business.id) {
        badges.push(Span::styled(
            "\u{2605} Favorite  ", // ★
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if app.itinerary.contains(&business.id) {
        badges.push(Span::styled(
            "In your itinerary",
            Style::default().fg(Color::Green),
        ));
    }
    lines.push(Line::from(badges));

    lines
}
