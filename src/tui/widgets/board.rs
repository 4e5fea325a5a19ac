use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::db::Storage;
use crate::models::{Quest, QuestStatus};
use crate::tui::theme::{difficulty_color, progress_bar, status_accent, truncate};
use crate::tui::{App, Focus};
use crate::week::due_label;

const TAGS_SHOWN: usize = 3;

pub fn draw<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let grouped = app.board.grouped();
    for (status, column_area) in QuestStatus::ALL.into_iter().zip(columns.iter()) {
        draw_column(f, app, status, grouped.get(status), *column_area);
    }
}

fn draw_column<S: Storage>(
    f: &mut Frame,
    app: &App<S>,
    status: QuestStatus,
    quests: &[&Quest],
    area: Rect,
) {
    let accent = status_accent(status);
    let focused = app.column == status && app.focus == Focus::Board;
    let drop_target = focused && app.carrying.is_some();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if drop_target {
            BorderType::Double
        } else if focused {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(if focused {
            Style::default().fg(accent)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(format!(" {} ({}) ", status.label().to_uppercase(), quests.len()))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    if quests.is_empty() {
        let hint = Paragraph::new("Drop quests here")
            .alignment(Alignment::Center)
            .style(if drop_target {
                Style::default().fg(accent)
            } else {
                Style::default().fg(Color::DarkGray)
            })
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = quests
        .iter()
        .map(|quest| card(quest, app.carrying.as_deref() == Some(quest.id.as_str()), width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 20, 60))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▌");

    let mut state = ListState::default();
    if app.column == status {
        state.select(Some(app.selected[status.index()]));
    }

    f.render_stateful_widget(list, area, &mut state);
}

fn card(quest: &Quest, carried: bool, width: usize) -> ListItem<'static> {
    let title_style = if carried {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let marker = if carried { "» " } else { "" };
    let title = Line::from(Span::styled(
        format!("{}{}", marker, truncate(&quest.title, width.saturating_sub(2))),
        title_style,
    ));

    let mut meta = vec![Span::styled(
        quest.difficulty.label(),
        Style::default()
            .fg(difficulty_color(quest.difficulty))
            .add_modifier(Modifier::BOLD),
    )];
    for tag in quest.tags.iter().take(TAGS_SHOWN) {
        meta.push(Span::styled(
            format!(" #{}", tag),
            Style::default().fg(Color::Cyan),
        ));
    }
    if quest.tags.len() > TAGS_SHOWN {
        meta.push(Span::styled(
            format!(" +{}", quest.tags.len() - TAGS_SHOWN),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut progress = vec![
        Span::styled(progress_bar(quest.progress, 10), Style::default().fg(Color::Magenta)),
        Span::styled(
            format!(" {:>3}%", quest.progress),
            Style::default().fg(Color::Gray),
        ),
    ];
    if !quest.checklist.is_empty() {
        progress.push(Span::styled(
            format!("  ☑ {}/{}", quest.completed_count(), quest.checklist.len()),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(due) = quest.due_date {
        let label = due_label(due, crate::models::timestamp_now());
        let color = if label.is_urgent() {
            Color::LightRed
        } else {
            Color::Gray
        };
        progress.push(Span::styled(
            format!("  {}", label.text()),
            Style::default().fg(color),
        ));
    }

    ListItem::new(vec![
        title,
        Line::from(meta),
        Line::from(progress),
        Line::from(""),
    ])
}
