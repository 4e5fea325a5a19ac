use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::db::Storage;
use crate::tui::theme::{status_accent, truncate};
use crate::tui::App;
use crate::week::{week_days, week_range_label, WeekDay, MAX_PER_DAY};

pub fn draw<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let today = Utc::now().date_naive();
    let days = match week_days(app.board.quests(), today, app.week_offset) {
        Ok(days) => days,
        Err(e) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Week ")
                .title_style(Style::default().fg(Color::Cyan));
            let hint = Paragraph::new(Span::styled(
                format!("{} (press t for this week)", e),
                Style::default().fg(Color::LightRed),
            ))
            .block(block);
            f.render_widget(hint, area);
            return;
        }
    };

    let title = if app.week_offset == 0 {
        format!(" This week · {} ", week_range_label(&days))
    } else {
        format!(" {} ", week_range_label(&days))
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(inner);

    for (day, cell) in days.iter().zip(cells.iter()) {
        draw_day(f, day, *cell);
    }
}

fn draw_day(f: &mut Frame, day: &WeekDay<'_>, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = day
        .quests
        .iter()
        .take(MAX_PER_DAY)
        .map(|q| {
            Line::from(Span::styled(
                truncate(&q.title, width),
                Style::default().fg(status_accent(q.status)),
            ))
        })
        .collect();
    if day.quests.is_empty() {
        lines.push(Line::from(Span::styled(
            "No quests",
            Style::default().fg(Color::DarkGray),
        )));
    } else if day.overflow() > 0 {
        lines.push(Line::from(Span::styled(
            format!("+{} more", day.overflow()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let (border, title_style) = if day.is_today {
        (
            Style::default().fg(Color::Magenta),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Gray),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(format!(" {} ", day.date.format("%a %-d")))
        .title_style(title_style);

    f.render_widget(Paragraph::new(lines).block(block), area);
}
