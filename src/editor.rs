use chrono::{DateTime, Utc};

use crate::board::{generate_id, Board};
use crate::db::Storage;
use crate::error::Result;
use crate::models::{
    checklist_progress, timestamp_now, Activity, ActivityKind, ChecklistItem, Difficulty, Quest,
    QuestPatch, QuestStatus,
};

/// Editing session for one quest.
///
/// Title and description are edited locally and written on `commit_text`
/// (focus leaving the field). Everything else writes through to the board
/// immediately. Methods return `Ok(false)` when nothing was written, either
/// because the quest is gone or the input was rejected.
#[derive(Debug, Clone)]
pub struct QuestEditor {
    quest_id: String,
    pub title: String,
    pub description: String,
}

/// Checklist and activity ids only need to be unique within their quest.
fn fresh_id(taken: &[&str]) -> String {
    loop {
        let id = generate_id();
        if !taken.contains(&id.as_str()) {
            return id;
        }
    }
}

impl QuestEditor {
    pub fn open(quest: &Quest) -> Self {
        Self {
            quest_id: quest.id.clone(),
            title: quest.title.clone(),
            description: quest.description.clone(),
        }
    }

    pub fn quest_id(&self) -> &str {
        &self.quest_id
    }

    pub fn quest<'a, S: Storage>(&self, board: &'a Board<S>) -> Option<&'a Quest> {
        board.get(&self.quest_id)
    }

    fn current<S: Storage>(&self, board: &Board<S>) -> Option<Quest> {
        board.get(&self.quest_id).cloned()
    }

    /// Writes the local title/description if they differ from the board.
    pub fn commit_text<S: Storage>(&self, board: &mut Board<S>) -> Result<bool> {
        let Some(quest) = self.current(board) else {
            return Ok(false);
        };
        if quest.title == self.title && quest.description == self.description {
            return Ok(false);
        }
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                title: Some(self.title.clone()),
                description: Some(self.description.clone()),
                ..Default::default()
            },
        )
    }

    pub fn set_status<S: Storage>(
        &self,
        board: &mut Board<S>,
        status: QuestStatus,
    ) -> Result<bool> {
        board.update_quest(&self.quest_id, QuestPatch::status(status))
    }

    pub fn set_difficulty<S: Storage>(
        &self,
        board: &mut Board<S>,
        difficulty: Difficulty,
    ) -> Result<bool> {
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                difficulty: Some(difficulty),
                ..Default::default()
            },
        )
    }

    pub fn set_due_date<S: Storage>(
        &self,
        board: &mut Board<S>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                due_date: Some(due_date),
                ..Default::default()
            },
        )
    }

    /// Manual progress, only while the checklist is empty.
    pub fn set_progress<S: Storage>(&self, board: &mut Board<S>, progress: u8) -> Result<bool> {
        match self.current(board) {
            Some(quest) if quest.checklist.is_empty() => board.update_quest(
                &self.quest_id,
                QuestPatch {
                    progress: Some(progress.min(100)),
                    ..Default::default()
                },
            ),
            _ => Ok(false),
        }
    }

    pub fn add_tag<S: Storage>(&self, board: &mut Board<S>, tag: &str) -> Result<bool> {
        let tag = tag.trim();
        let Some(quest) = self.current(board) else {
            return Ok(false);
        };
        if tag.is_empty() || quest.has_tag(tag) {
            return Ok(false);
        }
        let mut tags = quest.tags;
        tags.push(tag.to_string());
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                tags: Some(tags),
                ..Default::default()
            },
        )
    }

    pub fn remove_tag<S: Storage>(&self, board: &mut Board<S>, tag: &str) -> Result<bool> {
        let Some(quest) = self.current(board) else {
            return Ok(false);
        };
        if !quest.tags.iter().any(|t| t == tag) {
            return Ok(false);
        }
        let tags: Vec<String> = quest.tags.into_iter().filter(|t| t != tag).collect();
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                tags: Some(tags),
                ..Default::default()
            },
        )
    }

    /// Appends an unchecked item. Progress is left alone until the next
    /// toggle or removal.
    pub fn add_checklist_item<S: Storage>(
        &self,
        board: &mut Board<S>,
        text: &str,
    ) -> Result<Option<String>> {
        let text = text.trim();
        let Some(quest) = self.current(board) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        let taken: Vec<&str> = quest.checklist.iter().map(|i| i.id.as_str()).collect();
        let id = fresh_id(&taken);
        let mut checklist = quest.checklist;
        checklist.push(ChecklistItem {
            id: id.clone(),
            text: text.to_string(),
            completed: false,
            created_at: timestamp_now(),
        });
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                checklist: Some(checklist),
                ..Default::default()
            },
        )?;
        Ok(Some(id))
    }

    pub fn toggle_checklist_item<S: Storage>(
        &self,
        board: &mut Board<S>,
        item_id: &str,
    ) -> Result<bool> {
        let Some(quest) = self.current(board) else {
            return Ok(false);
        };
        let mut checklist = quest.checklist;
        let Some(item) = checklist.iter_mut().find(|i| i.id == item_id) else {
            return Ok(false);
        };
        item.completed = !item.completed;
        let progress = checklist_progress(&checklist).unwrap_or(quest.progress);
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                checklist: Some(checklist),
                progress: Some(progress),
                ..Default::default()
            },
        )
    }

    pub fn remove_checklist_item<S: Storage>(
        &self,
        board: &mut Board<S>,
        item_id: &str,
    ) -> Result<bool> {
        let Some(quest) = self.current(board) else {
            return Ok(false);
        };
        if !quest.checklist.iter().any(|i| i.id == item_id) {
            return Ok(false);
        }
        let checklist: Vec<ChecklistItem> = quest
            .checklist
            .into_iter()
            .filter(|i| i.id != item_id)
            .collect();
        let progress = checklist_progress(&checklist).unwrap_or(quest.progress);
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                checklist: Some(checklist),
                progress: Some(progress),
                ..Default::default()
            },
        )
    }

    /// Prepends a note; activities read newest first.
    pub fn add_activity<S: Storage>(
        &self,
        board: &mut Board<S>,
        text: &str,
    ) -> Result<Option<String>> {
        let text = text.trim();
        let Some(quest) = self.current(board) else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        let taken: Vec<&str> = quest.activities.iter().map(|a| a.id.as_str()).collect();
        let id = fresh_id(&taken);
        let mut activities = Vec::with_capacity(quest.activities.len() + 1);
        activities.push(Activity {
            id: id.clone(),
            text: text.to_string(),
            kind: ActivityKind::Note,
            created_at: timestamp_now(),
        });
        activities.extend(quest.activities);
        board.update_quest(
            &self.quest_id,
            QuestPatch {
                activities: Some(activities),
                ..Default::default()
            },
        )?;
        Ok(Some(id))
    }

    pub fn delete<S: Storage>(self, board: &mut Board<S>) -> Result<bool> {
        board.delete_quest(&self.quest_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use chrono::Duration;

    fn setup() -> (Board<MemoryStorage>, QuestEditor) {
        let board = Board::load(MemoryStorage::default());
        let editor = QuestEditor::open(board.get("1").unwrap());
        (board, editor)
    }

    mod text_tests {
        use super::*;

        #[test]
        fn local_edits_do_not_write_until_commit() {
            let (mut board, mut editor) = setup();
            editor.title = "Neon Kit".to_string();
            assert_eq!(board.get("1").unwrap().title, "Design Neon UI Components");
            assert_eq!(board.storage().writes, 0);

            assert!(editor.commit_text(&mut board).unwrap());
            assert_eq!(board.get("1").unwrap().title, "Neon Kit");
            assert_eq!(board.storage().writes, 1);
        }

        #[test]
        fn unchanged_commit_is_skipped() {
            let (mut board, editor) = setup();
            assert!(!editor.commit_text(&mut board).unwrap());
            assert_eq!(board.storage().writes, 0);
        }
    }

    mod field_tests {
        use super::*;

        #[test]
        fn status_and_difficulty_write_through() {
            let (mut board, editor) = setup();
            editor.set_status(&mut board, QuestStatus::Review).unwrap();
            editor.set_difficulty(&mut board, Difficulty::Epic).unwrap();
            let quest = board.get("1").unwrap();
            assert_eq!(quest.status, QuestStatus::Review);
            assert_eq!(quest.difficulty, Difficulty::Epic);
            assert_eq!(board.storage().writes, 2);
        }

        #[test]
        fn due_date_can_be_set_and_cleared() {
            let (mut board, editor) = setup();
            let due = timestamp_now() + Duration::days(10);
            editor.set_due_date(&mut board, Some(due)).unwrap();
            assert_eq!(board.get("1").unwrap().due_date, Some(due));
            editor.set_due_date(&mut board, None).unwrap();
            assert!(board.get("1").unwrap().due_date.is_none());
        }

        #[test]
        fn manual_progress_only_without_checklist() {
            let (mut board, editor) = setup();
            assert!(!editor.set_progress(&mut board, 10).unwrap());
            assert_eq!(board.get("1").unwrap().progress, 65);

            let empty = QuestEditor::open(board.get("2").unwrap());
            assert!(empty.set_progress(&mut board, 40).unwrap());
            assert_eq!(board.get("2").unwrap().progress, 40);
        }
    }

    mod tag_tests {
        use super::*;

        #[test]
        fn add_tag_trims_and_appends() {
            let (mut board, editor) = setup();
            assert!(editor.add_tag(&mut board, "  glow ").unwrap());
            assert_eq!(board.get("1").unwrap().tags, vec!["design", "ui", "neon", "glow"]);
        }

        #[test]
        fn blank_and_duplicate_tags_are_ignored() {
            let (mut board, editor) = setup();
            assert!(!editor.add_tag(&mut board, "   ").unwrap());
            assert!(!editor.add_tag(&mut board, "ui").unwrap());
            assert_eq!(board.get("1").unwrap().tags.len(), 3);
            assert_eq!(board.storage().writes, 0);
        }

        #[test]
        fn remove_tag() {
            let (mut board, editor) = setup();
            editor.remove_tag(&mut board, "ui").unwrap();
            assert_eq!(board.get("1").unwrap().tags, vec!["design", "neon"]);
        }

        #[test]
        fn remove_missing_tag_does_not_write() {
            let (mut board, editor) = setup();
            let writes = board.storage().writes;
            assert!(!editor.remove_tag(&mut board, "backend").unwrap());
            assert_eq!(board.storage().writes, writes);
            assert_eq!(board.get("1").unwrap().tags, vec!["design", "ui", "neon"]);
        }
    }

    mod checklist_tests {
        use super::*;

        #[test]
        fn toggle_recomputes_progress() {
            let (mut board, editor) = setup();
            assert_eq!(board.get("1").unwrap().progress, 65);

            editor.toggle_checklist_item(&mut board, "c2").unwrap();
            assert_eq!(board.get("1").unwrap().progress, 33);

            editor.toggle_checklist_item(&mut board, "c2").unwrap();
            assert_eq!(board.get("1").unwrap().progress, 67);

            editor.toggle_checklist_item(&mut board, "c3").unwrap();
            assert_eq!(board.get("1").unwrap().progress, 100);
        }

        #[test]
        fn toggle_unknown_item_is_noop() {
            let (mut board, editor) = setup();
            assert!(!editor.toggle_checklist_item(&mut board, "zz").unwrap());
            assert_eq!(board.get("1").unwrap().progress, 65);
        }

        #[test]
        fn remove_recomputes_progress() {
            let (mut board, editor) = setup();
            editor.remove_checklist_item(&mut board, "c3").unwrap();
            let quest = board.get("1").unwrap();
            assert_eq!(quest.checklist.len(), 2);
            assert_eq!(quest.progress, 100);
        }

        #[test]
        fn remove_unknown_item_does_not_write() {
            let (mut board, editor) = setup();
            let before = board.get("1").unwrap().updated_at;
            let writes = board.storage().writes;
            assert!(!editor.remove_checklist_item(&mut board, "zz").unwrap());
            assert_eq!(board.storage().writes, writes);
            let quest = board.get("1").unwrap();
            assert_eq!(quest.checklist.len(), 3);
            assert_eq!(quest.updated_at, before);
        }

        #[test]
        fn removing_last_item_keeps_progress() {
            let (mut board, _) = setup();
            let editor = QuestEditor::open(board.get("2").unwrap());
            let id = editor.add_checklist_item(&mut board, "only").unwrap().unwrap();
            editor.toggle_checklist_item(&mut board, &id).unwrap();
            assert_eq!(board.get("2").unwrap().progress, 100);

            editor.remove_checklist_item(&mut board, &id).unwrap();
            let quest = board.get("2").unwrap();
            assert!(quest.checklist.is_empty());
            assert_eq!(quest.progress, 100);
        }

        #[test]
        fn add_item_appends_unchecked_without_touching_progress() {
            let (mut board, editor) = setup();
            let id = editor
                .add_checklist_item(&mut board, " Polish hover states ")
                .unwrap()
                .unwrap();
            let quest = board.get("1").unwrap();
            let last = quest.checklist.last().unwrap();
            assert_eq!(last.id, id);
            assert_eq!(last.text, "Polish hover states");
            assert!(!last.completed);
            assert_eq!(quest.progress, 65);
        }

        #[test]
        fn blank_item_is_ignored() {
            let (mut board, editor) = setup();
            assert!(editor.add_checklist_item(&mut board, "  ").unwrap().is_none());
            assert_eq!(board.get("1").unwrap().checklist.len(), 3);
        }

        #[test]
        fn progress_always_matches_checklist_after_mutations() {
            let (mut board, editor) = setup();
            let extra = editor.add_checklist_item(&mut board, "extra").unwrap().unwrap();
            for item in ["c1", extra.as_str(), "c3", "c1"] {
                editor.toggle_checklist_item(&mut board, item).unwrap();
                let quest = board.get("1").unwrap();
                assert_eq!(Some(quest.progress), quest.checklist_progress());
            }
            editor.remove_checklist_item(&mut board, "c2").unwrap();
            let quest = board.get("1").unwrap();
            assert_eq!(Some(quest.progress), quest.checklist_progress());
        }
    }

    mod activity_tests {
        use super::*;

        #[test]
        fn add_activity_prepends_note() {
            let (mut board, editor) = setup();
            let id = editor
                .add_activity(&mut board, "Reviewed with team")
                .unwrap()
                .unwrap();
            let quest = board.get("1").unwrap();
            assert_eq!(quest.activities.len(), 3);
            assert_eq!(quest.activities[0].id, id);
            assert_eq!(quest.activities[0].kind, ActivityKind::Note);
            assert_eq!(quest.activities[1].id, "a1");
        }

        #[test]
        fn blank_activity_is_ignored() {
            let (mut board, editor) = setup();
            assert!(editor.add_activity(&mut board, "\t").unwrap().is_none());
            assert_eq!(board.get("1").unwrap().activities.len(), 2);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn delete_removes_quest() {
            let (mut board, editor) = setup();
            assert!(editor.delete(&mut board).unwrap());
            assert!(board.get("1").is_none());
        }

        #[test]
        fn edits_after_delete_are_noops() {
            let (mut board, editor) = setup();
            board.delete_quest("1").unwrap();
            assert!(!editor.add_tag(&mut board, "late").unwrap());
            assert!(!editor.toggle_checklist_item(&mut board, "c1").unwrap());
            assert!(!editor.set_status(&mut board, QuestStatus::Done).unwrap());
            assert!(editor.add_activity(&mut board, "late").unwrap().is_none());
        }
    }
}
