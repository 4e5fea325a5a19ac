use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::widgets::{board, command, detail, filters, week};
use super::{App, Focus};
use crate::db::Storage;

pub fn draw<S: Storage>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + search
            Constraint::Length(7), // Week strip
            Constraint::Min(0),    // Board
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    week::draw(f, app, chunks[1]);
    draw_main(f, app, chunks[2]);
    draw_help_bar(f, app, chunks[3]);

    if app.detail.is_some() {
        detail::draw(f, app, centered_rect(70, 80, f.area()));
    }
    if app.command.is_some() {
        command::draw(f, app, centered_rect(50, 20, f.area()));
    }
}

fn draw_header<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let searching = app.focus == Focus::Search && app.detail.is_none();
    let term = app.board.search_term();

    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(Color::Gray)),
        Span::styled(
            if term.is_empty() && !searching {
                "press / to search".to_string()
            } else {
                term.to_string()
            },
            if term.is_empty() && !searching {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            },
        ),
    ];
    if searching {
        spans.push(Span::styled("█", Style::default().fg(Color::Magenta)));
    }
    if app.board.search_pending() {
        spans.push(Span::styled(" ...", Style::default().fg(Color::DarkGray)));
    }

    let active = app.board.filters();
    if !active.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!(
                "{} filter(s) active",
                active.tags.len() + active.difficulties.len()
            ),
            Style::default().fg(Color::Yellow),
        ));
    }

    let border = if searching {
        Color::Magenta
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Neon Quest Board ")
        .title_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_main<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    if app.show_filters {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(area);
        filters::draw(f, app, chunks[0]);
        board::draw(f, app, chunks[1]);
    } else {
        board::draw(f, app, area);
    }
}

fn key(k: &str) -> Span<'_> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    if let Some(message) = &app.message {
        let bar = Paragraph::new(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        )))
        .style(Style::default().bg(Color::DarkGray));
        f.render_widget(bar, area);
        return;
    }

    let mut spans = Vec::new();

    if app.command.is_some() {
        spans.extend(vec![key("<CR>/<Esc>"), Span::raw(" Close  ")]);
    } else if app.detail.is_some() {
        spans.extend(vec![
            key("Tab"),
            Span::raw(" Field  "),
            key("h/l"),
            Span::raw(" Change  "),
            key("<CR>"),
            Span::raw(" Add  "),
            key("<Del>"),
            Span::raw(" Remove  "),
            key("^d"),
            Span::raw(" Delete quest  "),
            key("<Esc>"),
            Span::raw(" Close"),
        ]);
    } else {
        match app.focus {
            Focus::Search => {
                spans.extend(vec![key("<CR>"), Span::raw(" Done  ")]);
            }
            Focus::Filters => {
                spans.extend(vec![
                    key("j/k"),
                    Span::raw(" Nav  "),
                    key("<Space>"),
                    Span::raw(" Toggle  "),
                    key("c"),
                    Span::raw(" Clear  "),
                    key("Tab"),
                    Span::raw(" Board  "),
                ]);
            }
            Focus::Board => {
                spans.extend(vec![
                    key("h/l"),
                    Span::raw(" Column  "),
                    key("j/k"),
                    Span::raw(" Nav  "),
                    key("<CR>"),
                    Span::raw(" Open  "),
                    key("<Space>"),
                    Span::raw(if app.carrying.is_some() {
                        " Drop  "
                    } else {
                        " Grab  "
                    }),
                    key("/"),
                    Span::raw(" Search  "),
                    key("f"),
                    Span::raw(" Filters  "),
                    key("[/]"),
                    Span::raw(" Week  "),
                ]);
            }
        }
        spans.extend(vec![
            key("^n"),
            Span::raw(" New  "),
            key("^k"),
            Span::raw(" Commands  "),
            key("q"),
            Span::raw(" Quit"),
        ]);
    }

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(help, area);
}

/// A rect of `percent_x` by `percent_y` centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
