use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current time truncated to millisecond precision, matching what the
/// persisted ISO-8601 timestamps can represent.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Parses `YYYY-MM-DD` as midnight UTC. Blank input means "no due date".
pub fn parse_due_date(input: &str) -> Result<Option<DateTime<Utc>>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(input.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::InvalidDate(input.to_string()))?;
    Ok(Some(midnight.and_utc()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Backlog,
    Doing,
    Review,
    Done,
}

impl QuestStatus {
    pub const ALL: [QuestStatus; 4] = [
        QuestStatus::Backlog,
        QuestStatus::Doing,
        QuestStatus::Review,
        QuestStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Backlog => "backlog",
            QuestStatus::Doing => "doing",
            QuestStatus::Review => "review",
            QuestStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "backlog" | "b" | "todo" => Some(QuestStatus::Backlog),
            "doing" | "d" | "wip" => Some(QuestStatus::Doing),
            "review" | "r" => Some(QuestStatus::Review),
            "done" | "finished" => Some(QuestStatus::Done),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestStatus::Backlog => "Backlog",
            QuestStatus::Doing => "Doing",
            QuestStatus::Review => "Review",
            QuestStatus::Done => "Done",
        }
    }

    /// Column position on the board, left to right.
    pub fn index(&self) -> usize {
        match self {
            QuestStatus::Backlog => 0,
            QuestStatus::Doing => 1,
            QuestStatus::Review => 2,
            QuestStatus::Done => 3,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            QuestStatus::Backlog => QuestStatus::Doing,
            QuestStatus::Doing => QuestStatus::Review,
            QuestStatus::Review => QuestStatus::Done,
            QuestStatus::Done => QuestStatus::Backlog,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            QuestStatus::Backlog => QuestStatus::Done,
            QuestStatus::Doing => QuestStatus::Backlog,
            QuestStatus::Review => QuestStatus::Doing,
            QuestStatus::Done => QuestStatus::Review,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Epic,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Epic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Epic => "epic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "medium" | "m" => Some(Difficulty::Medium),
            "hard" | "h" => Some(Difficulty::Hard),
            "epic" | "x" => Some(Difficulty::Epic),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Epic => "EPIC",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Epic,
            Difficulty::Epic => Difficulty::Easy,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Epic,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Epic => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Note,
    StatusChange,
    Completion,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Note => "note",
            ActivityKind::StatusChange => "status_change",
            ActivityKind::Completion => "completion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: QuestStatus,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub checklist: Vec<ChecklistItem>,
    pub activities: Vec<Activity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quest {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn completed_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.completed).count()
    }

    /// Progress implied by the checklist, or `None` when it is empty.
    pub fn checklist_progress(&self) -> Option<u8> {
        checklist_progress(&self.checklist)
    }

    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle_lower))
    }
}

/// round(100 * completed / total), rounding halves up.
pub fn checklist_progress(checklist: &[ChecklistItem]) -> Option<u8> {
    let total = checklist.len();
    if total == 0 {
        return None;
    }
    let completed = checklist.iter().filter(|item| item.completed).count();
    Some(((200 * completed + total) / (2 * total)) as u8)
}

/// Trims, drops empties, and collapses duplicates keeping the first one.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFilters {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulties: Vec<Difficulty>,
}

impl QuestFilters {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.difficulties.is_empty()
    }

    pub fn matches(&self, quest: &Quest) -> bool {
        let tags_ok = self.tags.is_empty() || quest.tags.iter().any(|t| self.tags.contains(t));
        let difficulty_ok =
            self.difficulties.is_empty() || self.difficulties.contains(&quest.difficulty);
        tags_ok && difficulty_ok
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        if let Some(pos) = self.difficulties.iter().position(|d| *d == difficulty) {
            self.difficulties.remove(pos);
        } else {
            self.difficulties.push(difficulty);
        }
    }
}

/// Everything needed to create a quest; id and timestamps are assigned by
/// the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDraft {
    pub title: String,
    pub description: String,
    pub status: QuestStatus,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub progress: u8,
    pub due_date: Option<DateTime<Utc>>,
    pub checklist: Vec<ChecklistItem>,
    pub activities: Vec<Activity>,
}

impl Default for QuestDraft {
    fn default() -> Self {
        Self {
            title: "New Quest".to_string(),
            description: String::new(),
            status: QuestStatus::Backlog,
            difficulty: Difficulty::Medium,
            tags: Vec::new(),
            progress: 0,
            due_date: Some(timestamp_now() + Duration::days(7)),
            checklist: Vec::new(),
            activities: Vec::new(),
        }
    }
}

/// Partial update: `None` leaves a field untouched. `due_date` uses
/// `Some(None)` to clear the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<QuestStatus>,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Vec<String>>,
    pub progress: Option<u8>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub activities: Option<Vec<Activity>>,
}

impl QuestPatch {
    pub fn status(status: QuestStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Merges the patch into `quest`. Timestamps are the caller's concern.
    pub fn apply(self, quest: &mut Quest) {
        if let Some(title) = self.title {
            quest.title = title;
        }
        if let Some(description) = self.description {
            quest.description = description;
        }
        if let Some(status) = self.status {
            quest.status = status;
        }
        if let Some(difficulty) = self.difficulty {
            quest.difficulty = difficulty;
        }
        if let Some(tags) = self.tags {
            quest.tags = normalize_tags(tags);
        }
        if let Some(progress) = self.progress {
            quest.progress = progress.min(100);
        }
        if let Some(due_date) = self.due_date {
            quest.due_date = due_date;
        }
        if let Some(checklist) = self.checklist {
            quest.checklist = checklist;
        }
        if let Some(activities) = self.activities {
            quest.activities = activities;
        }
    }
}

/// The persisted board, as written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot<'a> {
    pub quests: &'a [Quest],
    pub search_term: &'a str,
    pub filters: &'a QuestFilters,
    pub last_saved: DateTime<Utc>,
}

/// The persisted board, as read back. Missing fields fall back to defaults
/// at load time.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBoard {
    #[serde(default)]
    pub quests: Option<Vec<Quest>>,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub filters: Option<QuestFilters>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
