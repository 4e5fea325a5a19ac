use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::db::Storage;
use crate::models::{ActivityKind, Quest};
use crate::tui::theme::{difficulty_color, progress_bar, status_accent};
use crate::tui::{App, DetailField, DetailState};
use crate::week::due_label;

const CURSOR: &str = "█";

pub fn draw<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let Some(quest) = detail.editor.quest(&app.board) else {
        return;
    };

    let mut lines = Vec::new();

    let mut title = vec![label("Title", detail, DetailField::Title)];
    title.extend(text_value(
        &detail.editor.title,
        detail.field == DetailField::Title,
    ));
    lines.push(Line::from(title));

    let mut description = vec![label("Description", detail, DetailField::Description)];
    description.extend(text_value(
        &detail.editor.description,
        detail.field == DetailField::Description,
    ));
    lines.push(Line::from(description));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        label("Status", detail, DetailField::Status),
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            quest.status.label(),
            Style::default()
                .fg(status_accent(quest.status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(vec![
        label("Difficulty", detail, DetailField::Difficulty),
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            quest.difficulty.label(),
            Style::default()
                .fg(difficulty_color(quest.difficulty))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(due_line(quest, detail));
    lines.push(progress_line(quest, detail));
    lines.push(Line::from(""));

    lines.push(tags_line(quest, detail));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        label("Checklist", detail, DetailField::Checklist),
        Span::styled(
            format!("{}/{}", quest.completed_count(), quest.checklist.len()),
            Style::default().fg(Color::Gray),
        ),
    ]));
    let on_checklist = detail.field == DetailField::Checklist;
    for (i, item) in quest.checklist.iter().enumerate() {
        let pointer = if on_checklist && i == detail.cursor {
            "> "
        } else {
            "  "
        };
        let (mark, style) = if item.completed {
            (
                "[x] ",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            )
        } else {
            ("[ ] ", Style::default().fg(Color::White))
        };
        lines.push(Line::from(vec![
            Span::styled(pointer, Style::default().fg(Color::Magenta)),
            Span::styled(mark, Style::default().fg(Color::Cyan)),
            Span::styled(item.text.as_str(), style),
        ]));
    }
    if on_checklist {
        lines.push(input_line("+ ", &detail.input));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(label("Activity", detail, DetailField::Activity)));
    if detail.field == DetailField::Activity {
        lines.push(input_line("+ ", &detail.input));
    }
    for activity in &quest.activities {
        let (icon, color) = match activity.kind {
            ActivityKind::Note => ("•", Color::Cyan),
            ActivityKind::StatusChange => ("→", Color::Magenta),
            ActivityKind::Completion => ("✓", Color::LightGreen),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", icon), Style::default().fg(color)),
            Span::styled(activity.text.as_str(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}", activity.created_at.format("%b %-d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(status_accent(quest.status)))
        .title(format!(" {} ", quest.title))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn label(name: &str, detail: &DetailState, field: DetailField) -> Span<'static> {
    let style = if detail.field == field {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!("{:<13}", format!("{}:", name)), style)
}

fn text_value(value: &str, focused: bool) -> Vec<Span<'_>> {
    let mut spans = vec![Span::styled(value, Style::default().fg(Color::White))];
    if focused {
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Magenta)));
    }
    spans
}

fn input_line<'a>(prefix: &'a str, input: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Magenta)),
        Span::styled(input, Style::default().fg(Color::White)),
        Span::styled(CURSOR, Style::default().fg(Color::Magenta)),
    ])
}

fn due_line<'a>(quest: &Quest, detail: &'a DetailState) -> Line<'a> {
    let mut spans = vec![label("Due", detail, DetailField::DueDate)];
    match quest.due_date {
        Some(due) => {
            let badge = due_label(due, crate::models::timestamp_now());
            spans.push(Span::styled(
                due.format("%Y-%m-%d").to_string(),
                Style::default().fg(Color::White),
            ));
            spans.push(Span::styled(
                format!(" ({})", badge.text()),
                Style::default().fg(if badge.is_urgent() {
                    Color::LightRed
                } else {
                    Color::DarkGray
                }),
            ));
        }
        None => spans.push(Span::styled("none", Style::default().fg(Color::DarkGray))),
    }
    if detail.field == DetailField::DueDate {
        spans.push(Span::styled("   set: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(detail.input.as_str(), Style::default().fg(Color::White)));
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Magenta)));
    }
    Line::from(spans)
}

fn progress_line(quest: &Quest, detail: &DetailState) -> Line<'static> {
    let mut spans = vec![
        label("Progress", detail, DetailField::Progress),
        Span::styled(progress_bar(quest.progress, 20), Style::default().fg(Color::Magenta)),
        Span::styled(format!(" {}%", quest.progress), Style::default().fg(Color::White)),
    ];
    if quest.checklist_progress().is_some() {
        spans.push(Span::styled(
            "  (from checklist)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn tags_line<'a>(quest: &'a Quest, detail: &'a DetailState) -> Line<'a> {
    let focused = detail.field == DetailField::Tags;
    let mut spans = vec![label("Tags", detail, DetailField::Tags)];
    for (i, tag) in quest.tags.iter().enumerate() {
        let style = if focused && i == detail.cursor {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!("#{}", tag), style));
        spans.push(Span::raw(" "));
    }
    if focused {
        spans.push(Span::styled(" + ", Style::default().fg(Color::Magenta)));
        spans.push(Span::styled(detail.input.as_str(), Style::default().fg(Color::White)));
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Magenta)));
    }
    Line::from(spans)
}
