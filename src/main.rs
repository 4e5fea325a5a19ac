mod board;
mod db;
mod debounce;
mod editor;
mod error;
mod models;
mod seed;
mod tui;
mod week;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use board::{filter_quests, group_by_status, Board};
use db::{Database, STORAGE_KEY};
use editor::QuestEditor;
use error::Error;
use models::{
    parse_due_date, Difficulty, JsonOutput, Quest, QuestDraft, QuestFilters, QuestStatus,
};
use tui::theme::truncate;
use week::{due_label, week_days, week_range_label, MAX_PER_DAY};

const DEFAULT_DB_NAME: &str = "quest-board.db";
const APP_DIR: &str = "quest-board";

#[derive(Parser)]
#[command(name = "quest-board")]
#[command(about = "A neon kanban board for quests, in your terminal")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List quests grouped by status
    List {
        /// Only quests with this tag (repeatable, any match)
        #[arg(long, short)]
        tag: Vec<String>,

        /// Only quests of this difficulty (repeatable)
        #[arg(long, short)]
        difficulty: Vec<String>,

        /// Case-insensitive text in title, description or tags
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Add a new quest
    Add {
        /// Quest title
        title: String,

        /// Quest description
        #[arg(long, short)]
        description: Option<String>,

        /// Initial status: backlog/doing/review/done
        #[arg(long, short)]
        status: Option<String>,

        /// Difficulty: easy/medium/hard/epic
        #[arg(long, short = 'D')]
        difficulty: Option<String>,

        /// Comma-separated tags
        #[arg(long, short)]
        tags: Option<String>,

        /// Due date as YYYY-MM-DD (defaults to a week from now)
        #[arg(long)]
        due: Option<String>,
    },

    /// Show quest details
    Show {
        /// Quest ID
        id: String,
    },

    /// Move a quest to another column
    Move {
        /// Quest ID
        id: String,

        /// Target status: backlog/doing/review/done
        status: String,
    },

    /// Delete a quest
    Delete {
        /// Quest ID
        id: String,
    },

    /// Add a note to a quest's activity log
    Note {
        /// Quest ID
        id: String,

        /// Note text
        text: String,
    },

    /// Add a checklist item to a quest
    Check {
        /// Quest ID
        id: String,

        /// Item text
        text: String,
    },

    /// Toggle a checklist item
    Toggle {
        /// Quest ID
        id: String,

        /// Checklist item ID
        item_id: String,
    },

    /// List all tags with quest counts
    Tags,

    /// Show quests due this week
    Week {
        /// Weeks from the current one (negative for past weeks)
        #[arg(long, short, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },

    /// Forget the saved board; the sample board is shown on next start
    Reset,

    /// Launch interactive terminal UI
    Tui,
}

fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("QUEST_BOARD_DB") {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}

fn get_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("logs")
}

/// Logs go to a file so the TUI owns the terminal.
fn init_logging() -> error::Result<WorkerGuard> {
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "quest-board.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_env("QUEST_BOARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    Ok(guard)
}

fn main() {
    let cli = Cli::parse();

    // Logging is best effort; the board works without it.
    let _guard = init_logging().ok();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_status(s: &str) -> Result<QuestStatus, Error> {
    QuestStatus::from_str(s).ok_or_else(|| Error::InvalidStatus(s.to_string()))
}

fn parse_difficulty(s: &str) -> Result<Difficulty, Error> {
    Difficulty::from_str(s).ok_or_else(|| Error::InvalidDifficulty(s.to_string()))
}

fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

fn print_ok(json: bool, text: String) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn print_not_found(json: bool, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let msg = Error::QuestNotFound(id.to_string()).to_string();
        println!("{}", serde_json::to_string(&JsonOutput::<()>::err(msg))?);
    } else {
        println!("Quest not found.");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_db_path();
    let db = Database::open(&db_path)?;
    db.init()?;
    info!(path = %db_path.display(), "opened board database");

    let mut board = Board::load(db);

    match cli.command {
        Commands::List {
            tag,
            difficulty,
            search,
        } => {
            let filters = QuestFilters {
                tags: tag,
                difficulties: difficulty
                    .iter()
                    .map(|d| parse_difficulty(d))
                    .collect::<Result<_, _>>()?,
            };
            let filtered = filter_quests(board.quests(), search.as_deref().unwrap_or(""), &filters);
            let grouped = group_by_status(&filtered);

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "backlog": grouped.backlog,
                        "doing": grouped.doing,
                        "review": grouped.review,
                        "done": grouped.done
                    })))?
                );
            } else if filtered.is_empty() {
                println!("No quests found.");
            } else {
                for status in QuestStatus::ALL {
                    let quests = grouped.get(status);
                    println!("=== {} ({}) ===", status.label(), quests.len());
                    for quest in quests {
                        print_quest_row(quest);
                    }
                    println!();
                }
            }
        }

        Commands::Add {
            title,
            description,
            status,
            difficulty,
            tags,
            due,
        } => {
            let mut draft = QuestDraft {
                title,
                tags: parse_tags(tags),
                ..Default::default()
            };
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(status) = status {
                draft.status = parse_status(&status)?;
            }
            if let Some(difficulty) = difficulty {
                draft.difficulty = parse_difficulty(&difficulty)?;
            }
            if let Some(due) = due {
                draft.due_date = parse_due_date(&due)?;
            }

            let quest = board.add_quest(draft)?;

            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&quest))?);
            } else {
                println!("Added quest '{}' with ID: {}", quest.title, quest.id);
            }
        }

        Commands::Show { id } => {
            if let Some(quest) = board.get(&id) {
                if cli.json {
                    println!("{}", serde_json::to_string(&JsonOutput::ok(quest))?);
                } else {
                    print_quest_detail(quest);
                }
            } else {
                print_not_found(cli.json, &id)?;
            }
        }

        Commands::Move { id, status } => {
            let status = parse_status(&status)?;
            if board.move_quest(&id, status)? {
                print_ok(cli.json, format!("Moved quest {} to {}.", id, status.as_str()))?;
            } else {
                print_not_found(cli.json, &id)?;
            }
        }

        Commands::Delete { id } => {
            if board.delete_quest(&id)? {
                print_ok(cli.json, format!("Quest {} deleted.", id))?;
            } else {
                print_not_found(cli.json, &id)?;
            }
        }

        Commands::Note { id, text } => {
            let Some(editor) = board.get(&id).map(QuestEditor::open) else {
                return print_not_found(cli.json, &id);
            };
            match editor.add_activity(&mut board, &text)? {
                Some(note_id) => print_ok(
                    cli.json,
                    format!("Added note {} to quest {}.", note_id, id),
                )?,
                None => print_ok(cli.json, "Empty note ignored.".to_string())?,
            }
        }

        Commands::Check { id, text } => {
            let Some(editor) = board.get(&id).map(QuestEditor::open) else {
                return print_not_found(cli.json, &id);
            };
            match editor.add_checklist_item(&mut board, &text)? {
                Some(item_id) => {
                    if cli.json {
                        println!(
                            "{}",
                            serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                                "id": item_id,
                                "text": text.trim()
                            })))?
                        );
                    } else {
                        println!("Added checklist item {} to quest {}.", item_id, id);
                    }
                }
                None => print_ok(cli.json, "Empty checklist item ignored.".to_string())?,
            }
        }

        Commands::Toggle { id, item_id } => {
            let Some(editor) = board.get(&id).map(QuestEditor::open) else {
                return print_not_found(cli.json, &id);
            };
            if editor.toggle_checklist_item(&mut board, &item_id)? {
                let progress = board.get(&id).map(|q| q.progress).unwrap_or_default();
                print_ok(
                    cli.json,
                    format!("Toggled item {}. Progress: {}%", item_id, progress),
                )?;
            } else if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::<()>::err("Checklist item not found"))?
                );
            } else {
                println!("Checklist item not found.");
            }
        }

        Commands::Tags => {
            let tags = board.tag_counts();
            if cli.json {
                println!("{}", serde_json::to_string(&JsonOutput::ok(&tags))?);
            } else if tags.is_empty() {
                println!("No tags found.");
            } else {
                println!("{:<30} QUESTS", "TAG");
                println!("{}", "-".repeat(40));
                for tag in tags {
                    println!("{:<30} {}", tag.tag, tag.count);
                }
            }
        }

        Commands::Week { offset } => {
            let today = Utc::now().date_naive();
            let days = week_days(board.quests(), today, offset)?;

            if cli.json {
                let days: Vec<_> = days
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "date": d.date.to_string(),
                            "isToday": d.is_today,
                            "quests": d.quests.iter().map(|q| &q.id).collect::<Vec<_>>()
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string(&JsonOutput::ok(days))?);
            } else {
                println!("=== Week of {} ===", week_range_label(&days));
                for day in &days {
                    let marker = if day.is_today { "*" } else { " " };
                    let titles: Vec<&str> = day
                        .quests
                        .iter()
                        .take(MAX_PER_DAY)
                        .map(|q| q.title.as_str())
                        .collect();
                    let mut line = titles.join(", ");
                    if day.overflow() > 0 {
                        line.push_str(&format!(" (+{} more)", day.overflow()));
                    }
                    println!("{}{:<8} {}", marker, day.date.format("%a %-d"), line);
                }
            }
        }

        Commands::Tui => {
            tui::run(board)?;
        }

        Commands::Reset => {
            // The loaded board is dropped without another write.
            let db = Database::open(&db_path)?;
            let removed = db.remove(STORAGE_KEY)?;
            print_ok(
                cli.json,
                if removed {
                    "Saved board cleared.".to_string()
                } else {
                    "Nothing saved yet.".to_string()
                },
            )?;
        }
    }

    Ok(())
}

fn print_quest_row(quest: &Quest) {
    let due = quest
        .due_date
        .map(|d| due_label(d, models::timestamp_now()).text())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {:<24} {:<40} {:<7} {:>3}%  {}",
        quest.id,
        truncate(&quest.title, 38),
        quest.difficulty.label(),
        quest.progress,
        due
    );
}

fn print_quest_detail(quest: &Quest) {
    println!("Quest: {}", quest.title);
    println!("ID: {}", quest.id);
    if !quest.description.is_empty() {
        println!("Description: {}", quest.description);
    }
    println!("Status: {}", quest.status.as_str());
    println!("Difficulty: {}", quest.difficulty.as_str());
    println!(
        "Tags: {}",
        if quest.tags.is_empty() {
            "-".to_string()
        } else {
            quest.tags.join(", ")
        }
    );
    println!("Progress: {}%", quest.progress);
    if let Some(due) = quest.due_date {
        println!(
            "Due: {} ({})",
            due.format("%Y-%m-%d"),
            due_label(due, models::timestamp_now()).text()
        );
    }
    println!("Created: {}", quest.created_at.to_rfc3339());
    println!("Updated: {}", quest.updated_at.to_rfc3339());

    if !quest.checklist.is_empty() {
        println!();
        println!(
            "--- Checklist ({}/{}) ---",
            quest.completed_count(),
            quest.checklist.len()
        );
        for item in &quest.checklist {
            let mark = if item.completed { "x" } else { " " };
            println!("[{}] {}  ({})", mark, item.text, item.id);
        }
    }

    if !quest.activities.is_empty() {
        println!();
        println!("--- Activity ---");
        for activity in &quest.activities {
            println!(
                "{}  [{}] {}",
                activity.created_at.format("%Y-%m-%d %H:%M"),
                activity.kind.as_str(),
                activity.text
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn parse_list_defaults() {
            let cli = Cli::try_parse_from(["quest-board", "list"]).unwrap();
            assert!(!cli.json);
            match cli.command {
                Commands::List {
                    tag,
                    difficulty,
                    search,
                } => {
                    assert!(tag.is_empty());
                    assert!(difficulty.is_empty());
                    assert!(search.is_none());
                }
                _ => panic!("Expected List command"),
            }
        }

        #[test]
        fn parse_list_with_repeated_filters() {
            let cli = Cli::try_parse_from([
                "quest-board",
                "list",
                "--tag",
                "feature",
                "-t",
                "ui",
                "--difficulty",
                "easy",
                "--search",
                "neon",
            ])
            .unwrap();
            match cli.command {
                Commands::List {
                    tag,
                    difficulty,
                    search,
                } => {
                    assert_eq!(tag, vec!["feature", "ui"]);
                    assert_eq!(difficulty, vec!["easy"]);
                    assert_eq!(search.as_deref(), Some("neon"));
                }
                _ => panic!("Expected List command"),
            }
        }

        #[test]
        fn parse_add_full() {
            let cli = Cli::try_parse_from([
                "quest-board",
                "add",
                "Slay the dragon",
                "-d",
                "Bring a shield",
                "-s",
                "doing",
                "-D",
                "epic",
                "-t",
                "combat, boss",
                "--due",
                "2024-03-15",
            ])
            .unwrap();
            match cli.command {
                Commands::Add {
                    title,
                    description,
                    status,
                    difficulty,
                    tags,
                    due,
                } => {
                    assert_eq!(title, "Slay the dragon");
                    assert_eq!(description.as_deref(), Some("Bring a shield"));
                    assert_eq!(status.as_deref(), Some("doing"));
                    assert_eq!(difficulty.as_deref(), Some("epic"));
                    assert_eq!(parse_tags(tags), vec!["combat", "boss"]);
                    assert_eq!(due.as_deref(), Some("2024-03-15"));
                }
                _ => panic!("Expected Add command"),
            }
        }

        #[test]
        fn parse_move() {
            let cli = Cli::try_parse_from(["quest-board", "move", "abc", "review"]).unwrap();
            match cli.command {
                Commands::Move { id, status } => {
                    assert_eq!(id, "abc");
                    assert_eq!(parse_status(&status).unwrap(), QuestStatus::Review);
                }
                _ => panic!("Expected Move command"),
            }
        }

        #[test]
        fn parse_toggle() {
            let cli = Cli::try_parse_from(["quest-board", "toggle", "1", "c3"]).unwrap();
            match cli.command {
                Commands::Toggle { id, item_id } => {
                    assert_eq!(id, "1");
                    assert_eq!(item_id, "c3");
                }
                _ => panic!("Expected Toggle command"),
            }
        }

        #[test]
        fn parse_week_negative_offset() {
            let cli = Cli::try_parse_from(["quest-board", "week", "--offset", "-2"]).unwrap();
            match cli.command {
                Commands::Week { offset } => assert_eq!(offset, -2),
                _ => panic!("Expected Week command"),
            }

            let cli = Cli::try_parse_from(["quest-board", "week"]).unwrap();
            assert!(matches!(cli.command, Commands::Week { offset: 0 }));
        }

        #[test]
        fn parse_json_flag_global() {
            let cli1 = Cli::try_parse_from(["quest-board", "--json", "tags"]).unwrap();
            assert!(cli1.json);

            let cli2 = Cli::try_parse_from(["quest-board", "tags", "--json"]).unwrap();
            assert!(cli2.json);
        }

        #[test]
        fn parse_invalid_command_fails() {
            assert!(Cli::try_parse_from(["quest-board", "invalid"]).is_err());
        }

        #[test]
        fn parse_missing_required_arg_fails() {
            assert!(Cli::try_parse_from(["quest-board", "add"]).is_err());
            assert!(Cli::try_parse_from(["quest-board", "move", "1"]).is_err());
            assert!(Cli::try_parse_from(["quest-board", "note", "1"]).is_err());
        }
    }

    mod parse_helper_tests {
        use super::*;

        #[test]
        fn bad_status_is_an_error() {
            let err = parse_status("someday").unwrap_err();
            assert!(err.to_string().contains("someday"));
        }

        #[test]
        fn difficulty_aliases() {
            assert_eq!(parse_difficulty("HARD").unwrap(), Difficulty::Hard);
            assert!(parse_difficulty("legendary").is_err());
        }

        #[test]
        fn tags_split_on_commas() {
            assert_eq!(parse_tags(Some("a, b,c".to_string())), vec!["a", "b", "c"]);
            assert!(parse_tags(None).is_empty());
        }
    }

    mod path_tests {
        use super::*;
        use std::env;

        #[test]
        fn get_db_path_uses_env_var() {
            let test_path = "/tmp/test_quest_board.db";
            env::set_var("QUEST_BOARD_DB", test_path);

            let path = get_db_path();
            assert_eq!(path.to_str().unwrap(), test_path);

            env::remove_var("QUEST_BOARD_DB");
        }

        #[test]
        fn get_db_path_default_includes_db_name() {
            env::remove_var("QUEST_BOARD_DB");

            let path = get_db_path();
            let path_str = path.to_str().unwrap();

            assert!(path_str.ends_with("quest-board.db"));
            assert!(path_str.contains(APP_DIR));
        }

        #[test]
        fn log_dir_is_under_app_dir() {
            let dir = get_log_dir();
            assert!(dir.ends_with("quest-board/logs"));
        }
    }
}
