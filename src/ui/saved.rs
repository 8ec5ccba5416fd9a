//! Saved items screen rendering
//!
//! One tab each for favorites, the recently viewed history and the itinerary.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::category_color;
use crate::app::{App, SavedTab};
use crate::data::Category;

pub fn render(frame: &mut Frame, app: &App, tab: SavedTab) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let tabs = SavedTab::all();
    let titles: Vec<Line> = tabs
        .iter()
        .map(|t| Line::from(format!("{} ({})", t.label(), app.saved_ids(*t).len())))
        .collect();
    let selected = tabs.iter().position(|t| *t == tab).unwrap_or(0);
    frame.render_widget(
        Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .title(" Saved ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED)),
        chunks[0],
    );

    let rows: Vec<(String, Category, String)> = match tab {
        SavedTab::Favorites => app
            .favorites
            .items()
            .iter()
            .map(|e| (e.name.clone(), e.category, format!("added {}", e.added_at.format("%b %d"))))
            .collect(),
        SavedTab::Recent => app
            .recent
            .items()
            .iter()
            .map(|e| (e.name.clone(), e.category, format!("viewed {}", e.viewed_at.format("%b %d %H:%M"))))
            .collect(),
        SavedTab::Itinerary => app
            .itinerary
            .items()
            .iter()
            .map(|item| {
                (
                    format!("{}. {}", item.order, item.name),
                    item.category,
                    item.address.clone().unwrap_or_default(),
                )
            })
            .collect(),
    };

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "Nothing here yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows.into_iter()
            .enumerate()
            .map(|(index, (name, category, note))| {
                let is_selected = index == app.saved_cursor;
                let cursor = if is_selected { "\u{25B8} " } else { "  " };
                let name_style = if is_selected {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(cursor, Style::default().fg(Color::Cyan)),
                    Span::styled("\u{25CF} ", Style::default().fg(category_color(category))),
                    Span::styled(format!("{:<32}", name), name_style),
                    Span::styled(note, Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect()
    };

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(format!(" {} ", tab.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        chunks[1],
    );

    let mut help = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Switch  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Open  "),
    ];
    match tab {
        SavedTab::Favorites => {
            help.push(Span::styled("d", Style::default().fg(Color::Yellow)));
            help.push(Span::raw(" Remove  "));
        }
        SavedTab::Recent => {
            help.push(Span::styled("c", Style::default().fg(Color::Yellow)));
            help.push(Span::raw(" Clear history  "));
        }
        SavedTab::Itinerary => {
            help.push(Span::styled("d", Style::default().fg(Color::Yellow)));
            help.push(Span::raw(" Remove  "));
            help.push(Span::styled("c", Style::default().fg(Color::Yellow)));
            help.push(Span::raw(" Clear  "));
        }
    }
    help.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
    help.push(Span::raw(" Back"));

    frame.render_widget(
        Paragraph::new(Line::from(help)).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}
