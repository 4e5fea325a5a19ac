use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::db::{Storage, STORAGE_KEY};
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::error::Result;
use crate::models::{
    normalize_tags, timestamp_now, BoardSnapshot, Difficulty, Quest, QuestDraft, QuestFilters,
    QuestPatch, QuestStatus, SavedBoard, TagCount,
};
use crate::seed::sample_quests;

/// Filtered quests partitioned by column, each bucket in board order.
#[derive(Debug, Default)]
pub struct Grouped<'a> {
    pub backlog: Vec<&'a Quest>,
    pub doing: Vec<&'a Quest>,
    pub review: Vec<&'a Quest>,
    pub done: Vec<&'a Quest>,
}

impl<'a> Grouped<'a> {
    pub fn get(&self, status: QuestStatus) -> &[&'a Quest] {
        match status {
            QuestStatus::Backlog => &self.backlog,
            QuestStatus::Doing => &self.doing,
            QuestStatus::Review => &self.review,
            QuestStatus::Done => &self.done,
        }
    }

    fn bucket_mut(&mut self, status: QuestStatus) -> &mut Vec<&'a Quest> {
        match status {
            QuestStatus::Backlog => &mut self.backlog,
            QuestStatus::Doing => &mut self.doing,
            QuestStatus::Review => &mut self.review,
            QuestStatus::Done => &mut self.done,
        }
    }
}

pub fn filter_quests<'a>(
    quests: &'a [Quest],
    search_term: &str,
    filters: &QuestFilters,
) -> Vec<&'a Quest> {
    let needle = search_term.to_lowercase();
    quests
        .iter()
        .filter(|q| q.matches_search(&needle) && filters.matches(q))
        .collect()
}

pub fn group_by_status<'a>(quests: &[&'a Quest]) -> Grouped<'a> {
    let mut grouped = Grouped::default();
    for quest in quests {
        grouped.bucket_mut(quest.status).push(quest);
    }
    grouped
}

/// Every tag on the board with how many quests carry it, sorted by name.
pub fn tag_counts(quests: &[Quest]) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for quest in quests {
        for tag in &quest.tags {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect()
}

pub fn difficulty_counts(quests: &[Quest]) -> [(Difficulty, usize); 4] {
    Difficulty::ALL.map(|d| (d, quests.iter().filter(|q| q.difficulty == d).count()))
}

/// Base-36 millisecond timestamp followed by a random base-36 suffix.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..10)
        .map(|_| std::char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("{}{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(std::char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// A stamp strictly after `prev`, normally just now.
fn next_stamp(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = timestamp_now();
    if now > prev {
        now
    } else {
        prev + Duration::milliseconds(1)
    }
}

/// Brings a persisted quest back within the invariants the store keeps on
/// every write: progress at most 100 and no duplicate tags.
fn normalize_loaded(mut quest: Quest) -> Quest {
    if quest.progress > 100 {
        debug!(id = %quest.id, progress = quest.progress, "clamping loaded progress");
        quest.progress = 100;
    }
    quest.tags = normalize_tags(std::mem::take(&mut quest.tags));
    quest
}

pub struct Board<S: Storage> {
    storage: S,
    quests: Vec<Quest>,
    search_term: String,
    applied_search: String,
    search_debounce: Debouncer<String>,
    filters: QuestFilters,
}

impl<S: Storage> Board<S> {
    /// Restores the saved board, or the sample board when nothing usable is
    /// stored. A corrupt save is logged and replaced, never surfaced.
    pub fn load(storage: S) -> Self {
        let saved = match storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SavedBoard>(&raw) {
                Ok(saved) => {
                    debug!(last_saved = ?saved.last_saved, "restored saved quest board");
                    saved
                }
                Err(e) => {
                    warn!("Failed to parse saved quest board data: {}", e);
                    SavedBoard::default()
                }
            },
            Ok(None) => {
                info!("No saved quest board, starting from sample data");
                SavedBoard::default()
            }
            Err(e) => {
                warn!("Failed to read saved quest board data: {}", e);
                SavedBoard::default()
            }
        };

        let search_term = saved.search_term.unwrap_or_default();
        let quests = match saved.quests {
            Some(quests) => quests.into_iter().map(normalize_loaded).collect(),
            None => sample_quests(),
        };
        Self {
            storage,
            quests,
            applied_search: search_term.clone(),
            search_term,
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            filters: saved.filters.unwrap_or_default(),
        }
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// The term as typed, before debouncing.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The term the derived views currently use.
    #[cfg(test)]
    pub fn applied_search(&self) -> &str {
        &self.applied_search
    }

    pub fn filters(&self) -> &QuestFilters {
        &self.filters
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_quest(&mut self, draft: QuestDraft) -> Result<Quest> {
        let mut id = generate_id();
        while self.get(&id).is_some() {
            id = generate_id();
        }
        let now = timestamp_now();
        let quest = Quest {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            difficulty: draft.difficulty,
            tags: normalize_tags(draft.tags),
            progress: draft.progress.min(100),
            due_date: draft.due_date,
            checklist: draft.checklist,
            activities: draft.activities,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %quest.id, title = %quest.title, "adding quest");
        self.quests.insert(0, quest.clone());
        self.persist()?;
        Ok(quest)
    }

    /// Merges `patch` into the quest with `id`. Returns `false` when there is
    /// no such quest; nothing changes in that case.
    pub fn update_quest(&mut self, id: &str, patch: QuestPatch) -> Result<bool> {
        let Some(quest) = self.quests.iter_mut().find(|q| q.id == id) else {
            debug!(id, "update of unknown quest ignored");
            return Ok(false);
        };
        patch.apply(quest);
        quest.updated_at = next_stamp(quest.updated_at);
        self.persist()?;
        Ok(true)
    }

    pub fn delete_quest(&mut self, id: &str) -> Result<bool> {
        let before = self.quests.len();
        self.quests.retain(|q| q.id != id);
        let removed = self.quests.len() != before;
        if removed {
            debug!(id, "deleted quest");
        }
        self.persist()?;
        Ok(removed)
    }

    pub fn move_quest(&mut self, id: &str, status: QuestStatus) -> Result<bool> {
        self.update_quest(id, QuestPatch::status(status))
    }

    pub fn set_search_term(&mut self, text: &str) -> Result<()> {
        self.set_search_term_at(text, Instant::now())
    }

    pub fn set_search_term_at(&mut self, text: &str, now: Instant) -> Result<()> {
        self.search_term = text.to_string();
        self.search_debounce.push(self.search_term.clone(), now);
        self.persist()
    }

    /// Applies a debounced search term once its quiet period has passed.
    /// Returns whether the derived views changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search_debounce.poll(now) {
            Some(term) if term != self.applied_search => {
                self.applied_search = term;
                true
            }
            _ => false,
        }
    }

    pub fn search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    pub fn set_filters(&mut self, filters: QuestFilters) -> Result<()> {
        self.filters = filters;
        self.persist()
    }

    pub fn toggle_tag_filter(&mut self, tag: &str) -> Result<()> {
        let mut filters = self.filters.clone();
        filters.toggle_tag(tag);
        self.set_filters(filters)
    }

    pub fn toggle_difficulty_filter(&mut self, difficulty: Difficulty) -> Result<()> {
        let mut filters = self.filters.clone();
        filters.toggle_difficulty(difficulty);
        self.set_filters(filters)
    }

    pub fn clear_filters(&mut self) -> Result<()> {
        self.set_filters(QuestFilters::default())
    }

    pub fn filtered(&self) -> Vec<&Quest> {
        filter_quests(&self.quests, &self.applied_search, &self.filters)
    }

    pub fn grouped(&self) -> Grouped<'_> {
        group_by_status(&self.filtered())
    }

    pub fn tag_counts(&self) -> Vec<TagCount> {
        tag_counts(&self.quests)
    }

    pub fn difficulty_counts(&self) -> [(Difficulty, usize); 4] {
        difficulty_counts(&self.quests)
    }

    pub fn snapshot_json(&self) -> Result<String> {
        let snapshot = BoardSnapshot {
            quests: &self.quests,
            search_term: &self.search_term,
            filters: &self.filters,
            last_saved: timestamp_now(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    fn persist(&mut self) -> Result<()> {
        let json = self.snapshot_json()?;
        self.storage.set_item(STORAGE_KEY, &json)
    }
}
