use chrono::{DateTime, Duration, Utc};

use crate::models::{
    timestamp_now, Activity, ActivityKind, ChecklistItem, Difficulty, Quest, QuestStatus,
};

fn check(id: &str, text: &str, completed: bool, at: DateTime<Utc>) -> ChecklistItem {
    ChecklistItem {
        id: id.to_string(),
        text: text.to_string(),
        completed,
        created_at: at,
    }
}

fn log(id: &str, text: &str, kind: ActivityKind, at: DateTime<Utc>) -> Activity {
    Activity {
        id: id.to_string(),
        text: text.to_string(),
        kind,
        created_at: at,
    }
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

/// The built-in board shown on first launch or when the saved board can't
/// be read. Due dates and timestamps are relative to now.
pub fn sample_quests() -> Vec<Quest> {
    let now = timestamp_now();
    let days = Duration::days;

    vec![
        Quest {
            id: "1".to_string(),
            title: "Design Neon UI Components".to_string(),
            description:
                "Create a comprehensive design system with neon glows and glassmorphism effects"
                    .to_string(),
            status: QuestStatus::Doing,
            difficulty: Difficulty::Medium,
            tags: tags(&["design", "ui", "neon"]),
            progress: 65,
            due_date: Some(now + days(3)),
            checklist: vec![
                check("c1", "Define color palette", true, now),
                check("c2", "Create button variants", true, now),
                check("c3", "Design card components", false, now),
            ],
            activities: vec![
                log("a1", "Started working on the design system", ActivityKind::Note, now),
                log("a2", "Completed color palette definition", ActivityKind::Completion, now),
            ],
            created_at: now - days(2),
            updated_at: now,
        },
        Quest {
            id: "2".to_string(),
            title: "Implement Drag & Drop".to_string(),
            description: "Add smooth drag and drop functionality between quest columns".to_string(),
            status: QuestStatus::Backlog,
            difficulty: Difficulty::Hard,
            tags: tags(&["feature", "dnd", "interaction"]),
            progress: 0,
            due_date: Some(now + days(7)),
            checklist: Vec::new(),
            activities: Vec::new(),
            created_at: now - days(1),
            updated_at: now - days(1),
        },
        Quest {
            id: "3".to_string(),
            title: "Add Keyboard Shortcuts".to_string(),
            description: "Implement global keyboard shortcuts for common actions".to_string(),
            status: QuestStatus::Review,
            difficulty: Difficulty::Easy,
            tags: tags(&["feature", "accessibility", "ux"]),
            progress: 90,
            due_date: Some(now + days(1)),
            checklist: vec![
                check("c4", "Define shortcut keys", true, now),
                check("c5", "Implement handlers", true, now),
                check("c6", "Add visual indicators", false, now),
            ],
            activities: vec![log(
                "a3",
                "Implemented basic shortcuts",
                ActivityKind::Completion,
                now,
            )],
            created_at: now - days(3),
            updated_at: now,
        },
        Quest {
            id: "4".to_string(),
            title: "Setup Local Storage".to_string(),
            description: "Persist quest data and user preferences in local storage".to_string(),
            status: QuestStatus::Done,
            difficulty: Difficulty::Medium,
            tags: tags(&["feature", "persistence", "data"]),
            progress: 100,
            due_date: Some(now - days(1)),
            checklist: vec![
                check("c7", "Design storage schema", true, now),
                check("c8", "Implement save/load", true, now),
                check("c9", "Add migration support", true, now),
            ],
            activities: vec![
                log("a4", "Completed storage implementation", ActivityKind::Completion, now),
                log("a5", "Quest moved to done", ActivityKind::StatusChange, now),
            ],
            created_at: now - days(5),
            updated_at: now,
        },
    ]
}
