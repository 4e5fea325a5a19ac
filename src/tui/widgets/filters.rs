use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::db::Storage;
use crate::tui::theme::difficulty_color;
use crate::tui::{App, FilterEntry, Focus};

pub fn draw<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let active = app.board.filters();
    let entries = app.filter_entries();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let (on, label, count, color) = match entry {
                FilterEntry::Tag(tag, count) => {
                    (active.tags.contains(tag), format!("#{}", tag), *count, Color::Cyan)
                }
                FilterEntry::Difficulty(d, count) => (
                    active.difficulties.contains(d),
                    d.label().to_string(),
                    *count,
                    difficulty_color(*d),
                ),
            };
            let check = if on { "[x] " } else { "[ ] " };
            let style = if on {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            ListItem::new(Line::from(vec![
                Span::styled(check, Style::default().fg(Color::Gray)),
                Span::styled(label, style),
                Span::styled(format!(" ({})", count), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let focused = app.focus == Focus::Filters;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Filters ")
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused && !entries.is_empty() {
        state.select(Some(app.filter_cursor.min(entries.len() - 1)));
    }

    f.render_stateful_widget(list, area, &mut state);
}
