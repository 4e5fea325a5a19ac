use ratatui::style::Color;

use crate::models::{Difficulty, QuestStatus};

pub fn status_accent(status: QuestStatus) -> Color {
    match status {
        QuestStatus::Backlog => Color::Cyan,
        QuestStatus::Doing => Color::Magenta,
        QuestStatus::Review => Color::LightMagenta,
        QuestStatus::Done => Color::LightGreen,
    }
}

pub fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
        Difficulty::Epic => Color::LightMagenta,
    }
}

/// Fixed-width bar such as `██████░░░░`.
pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress.min(100) as usize * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
