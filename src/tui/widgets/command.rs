use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::db::Storage;
use crate::tui::App;

pub fn draw<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let input = app.command.as_deref().unwrap_or_default();

    let text = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Magenta)),
            Span::styled(input, Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Magenta)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "No commands yet. ^n creates a quest, ^f searches.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Command palette ")
        .title_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(block), area);
}
