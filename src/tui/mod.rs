pub mod theme;
mod ui;
mod widgets;

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use crate::board::Board;
use crate::db::Storage;
use crate::editor::QuestEditor;
use crate::models::{parse_due_date, Difficulty, QuestDraft, QuestStatus};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Board,
    Search,
    Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Title,
    Description,
    Status,
    Difficulty,
    DueDate,
    Progress,
    Tags,
    Checklist,
    Activity,
}

impl DetailField {
    fn next(&self) -> Self {
        match self {
            DetailField::Title => DetailField::Description,
            DetailField::Description => DetailField::Status,
            DetailField::Status => DetailField::Difficulty,
            DetailField::Difficulty => DetailField::DueDate,
            DetailField::DueDate => DetailField::Progress,
            DetailField::Progress => DetailField::Tags,
            DetailField::Tags => DetailField::Checklist,
            DetailField::Checklist => DetailField::Activity,
            DetailField::Activity => DetailField::Title,
        }
    }

    fn prev(&self) -> Self {
        match self {
            DetailField::Title => DetailField::Activity,
            DetailField::Description => DetailField::Title,
            DetailField::Status => DetailField::Description,
            DetailField::Difficulty => DetailField::Status,
            DetailField::DueDate => DetailField::Difficulty,
            DetailField::Progress => DetailField::DueDate,
            DetailField::Tags => DetailField::Progress,
            DetailField::Checklist => DetailField::Tags,
            DetailField::Activity => DetailField::Checklist,
        }
    }

    fn is_text(&self) -> bool {
        matches!(self, DetailField::Title | DetailField::Description)
    }
}

/// The open detail modal: the editor plus whatever is half-typed.
pub struct DetailState {
    pub editor: QuestEditor,
    pub field: DetailField,
    pub input: String,
    pub cursor: usize,
}

impl DetailState {
    fn new(editor: QuestEditor) -> Self {
        Self {
            editor,
            field: DetailField::Title,
            input: String::new(),
            cursor: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEntry {
    Tag(String, usize),
    Difficulty(Difficulty, usize),
}

pub struct App<S: Storage> {
    pub board: Board<S>,
    pub focus: Focus,
    pub column: QuestStatus,
    pub selected: [usize; 4],
    /// Id of the quest being dragged, if any.
    pub carrying: Option<String>,
    pub show_filters: bool,
    pub filter_cursor: usize,
    pub week_offset: i64,
    pub detail: Option<DetailState>,
    /// Command palette input while the palette is open.
    pub command: Option<String>,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(board: Board<S>) -> Self {
        Self {
            board,
            focus: Focus::Board,
            column: QuestStatus::Backlog,
            selected: [0; 4],
            carrying: None,
            show_filters: false,
            filter_cursor: 0,
            week_offset: 0,
            detail: None,
            command: None,
            message: None,
            should_quit: false,
        }
    }

    pub fn selected_quest_id(&self) -> Option<String> {
        let grouped = self.board.grouped();
        grouped
            .get(self.column)
            .get(self.selected[self.column.index()])
            .map(|q| q.id.clone())
    }

    pub fn filter_entries(&self) -> Vec<FilterEntry> {
        let mut entries: Vec<FilterEntry> = self
            .board
            .tag_counts()
            .into_iter()
            .map(|tc| FilterEntry::Tag(tc.tag, tc.count))
            .collect();
        entries.extend(
            self.board
                .difficulty_counts()
                .into_iter()
                .map(|(d, n)| FilterEntry::Difficulty(d, n)),
        );
        entries
    }

    fn clamp_selection(&mut self) {
        let grouped = self.board.grouped();
        for status in QuestStatus::ALL {
            let len = grouped.get(status).len();
            let i = status.index();
            self.selected[i] = self.selected[i].min(len.saturating_sub(1));
        }
    }

    fn select_quest(&mut self, id: &str) {
        let grouped = self.board.grouped();
        for status in QuestStatus::ALL {
            if let Some(pos) = grouped.get(status).iter().position(|q| q.id == id) {
                self.column = status;
                self.selected[status.index()] = pos;
                return;
            }
        }
    }

    /// Applies the debounced search once its quiet period has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.board.poll_search(now) {
            self.clamp_selection();
        }
    }

    fn open_detail(&mut self, id: &str) {
        if let Some(quest) = self.board.get(id) {
            self.detail = Some(DetailState::new(QuestEditor::open(quest)));
        }
    }

    /// Closing the modal is a blur: pending title/description edits land.
    fn close_detail(&mut self) -> AppResult<()> {
        if let Some(detail) = self.detail.take() {
            detail.editor.commit_text(&mut self.board)?;
        }
        self.clamp_selection();
        Ok(())
    }

    fn create_quest(&mut self) -> AppResult<()> {
        self.close_detail()?;
        let quest = self.board.add_quest(QuestDraft::default())?;
        info!(id = %quest.id, "created quest from board");
        self.select_quest(&quest.id);
        self.open_detail(&quest.id);
        Ok(())
    }

    fn escape(&mut self) -> AppResult<()> {
        self.close_detail()?;
        self.command = None;
        self.show_filters = false;
        self.carrying = None;
        self.focus = Focus::Board;
        Ok(())
    }

    fn drop_on_column(&mut self, status: QuestStatus) -> AppResult<()> {
        if let Some(id) = self.carrying.take() {
            if self.board.move_quest(&id, status)? {
                self.select_quest(&id);
            }
            self.clamp_selection();
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> AppResult<()> {
        self.message = None;

        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('k') => {
                    self.command = Some(String::new());
                    return Ok(());
                }
                KeyCode::Char('n') => return self.create_quest(),
                KeyCode::Char('f') => {
                    self.close_detail()?;
                    self.command = None;
                    self.focus = Focus::Search;
                    return Ok(());
                }
                KeyCode::Char('c') => {
                    self.close_detail()?;
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('d') => {
                    if let Some(detail) = self.detail.take() {
                        info!(id = %detail.editor.quest_id(), "deleting quest from editor");
                        detail.editor.delete(&mut self.board)?;
                        self.clamp_selection();
                    }
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }

        if key == KeyCode::Esc {
            return self.escape();
        }

        if self.command.is_some() {
            self.handle_command_key(key);
            return Ok(());
        }

        if self.detail.is_some() {
            return self.handle_detail_key(key);
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Filters => self.handle_filters_key(key),
            Focus::Board => self.handle_board_key(key),
        }
    }

    fn handle_command_key(&mut self, key: KeyCode) {
        let Some(input) = self.command.as_mut() else {
            return;
        };
        match key {
            KeyCode::Enter => self.command = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyCode) -> AppResult<()> {
        match key {
            KeyCode::Enter | KeyCode::Tab => self.focus = Focus::Board,
            KeyCode::Backspace => {
                let mut term = self.board.search_term().to_string();
                term.pop();
                self.board.set_search_term(&term)?;
            }
            KeyCode::Char(c) => {
                let mut term = self.board.search_term().to_string();
                term.push(c);
                self.board.set_search_term(&term)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_filters_key(&mut self, key: KeyCode) -> AppResult<()> {
        let entries = self.filter_entries();
        match key {
            KeyCode::Char('j') | KeyCode::Down if !entries.is_empty() => {
                self.filter_cursor = (self.filter_cursor + 1) % entries.len();
            }
            KeyCode::Char('k') | KeyCode::Up if !entries.is_empty() => {
                self.filter_cursor = (self.filter_cursor + entries.len() - 1) % entries.len();
            }
            KeyCode::Char(' ') | KeyCode::Enter => match entries.get(self.filter_cursor) {
                Some(FilterEntry::Tag(tag, _)) => self.board.toggle_tag_filter(tag)?,
                Some(FilterEntry::Difficulty(d, _)) => self.board.toggle_difficulty_filter(*d)?,
                None => {}
            },
            KeyCode::Char('c') => self.board.clear_filters()?,
            KeyCode::Char('f') => {
                self.show_filters = false;
                self.focus = Focus::Board;
            }
            KeyCode::Tab => self.focus = Focus::Board,
            _ => {}
        }
        self.clamp_selection();
        Ok(())
    }

    fn handle_board_key(&mut self, key: KeyCode) -> AppResult<()> {
        let len = self.board.grouped().get(self.column).len();
        let col = self.column.index();
        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('h') | KeyCode::Left if self.column != QuestStatus::Backlog => {
                self.column = self.column.prev();
            }
            KeyCode::Char('l') | KeyCode::Right if self.column != QuestStatus::Done => {
                self.column = self.column.next();
            }

            KeyCode::Char('j') | KeyCode::Down if len > 0 => {
                self.selected[col] = (self.selected[col] + 1) % len;
            }
            KeyCode::Char('k') | KeyCode::Up if len > 0 => {
                self.selected[col] = (self.selected[col] + len - 1) % len;
            }
            KeyCode::Char('g') => self.selected[col] = 0,
            KeyCode::Char('G') => self.selected[col] = len.saturating_sub(1),

            KeyCode::Enter => {
                if let Some(id) = self.selected_quest_id() {
                    self.open_detail(&id);
                }
            }

            // grab / drop
            KeyCode::Char(' ') => {
                if self.carrying.is_some() {
                    self.drop_on_column(self.column)?;
                } else {
                    self.carrying = self.selected_quest_id();
                }
            }

            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('f') => {
                self.show_filters = !self.show_filters;
                self.focus = if self.show_filters {
                    Focus::Filters
                } else {
                    Focus::Board
                };
            }
            KeyCode::Tab if self.show_filters => self.focus = Focus::Filters,

            KeyCode::Char('[') => self.week_offset = self.week_offset.saturating_sub(1),
            KeyCode::Char(']') => self.week_offset = self.week_offset.saturating_add(1),
            KeyCode::Char('t') => self.week_offset = 0,
            _ => {}
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, key: KeyCode) -> AppResult<()> {
        let Some(detail) = self.detail.as_mut() else {
            return Ok(());
        };

        // Up/Down walk fields, except inside the checklist.
        let walks = detail.field != DetailField::Checklist;
        let forward = match key {
            KeyCode::Tab => Some(true),
            KeyCode::BackTab => Some(false),
            KeyCode::Down if walks => Some(true),
            KeyCode::Up if walks => Some(false),
            _ => None,
        };
        if let Some(forward) = forward {
            if detail.field.is_text() {
                detail.editor.commit_text(&mut self.board)?;
            }
            detail.field = if forward {
                detail.field.next()
            } else {
                detail.field.prev()
            };
            detail.input.clear();
            detail.cursor = 0;
            return Ok(());
        }

        let Some(quest) = detail.editor.quest(&self.board).cloned() else {
            self.detail = None;
            return Ok(());
        };

        match detail.field {
            DetailField::Title | DetailField::Description => {
                let buffer = if detail.field == DetailField::Title {
                    &mut detail.editor.title
                } else {
                    &mut detail.editor.description
                };
                match key {
                    KeyCode::Char(c) => buffer.push(c),
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Enter => {
                        detail.editor.commit_text(&mut self.board)?;
                        detail.field = detail.field.next();
                    }
                    _ => {}
                }
            }
            DetailField::Status => match key {
                KeyCode::Left | KeyCode::Char('h') => {
                    detail.editor.set_status(&mut self.board, quest.status.prev())?;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    detail.editor.set_status(&mut self.board, quest.status.next())?;
                }
                _ => {}
            },
            DetailField::Difficulty => match key {
                KeyCode::Left | KeyCode::Char('h') => {
                    detail
                        .editor
                        .set_difficulty(&mut self.board, quest.difficulty.prev())?;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    detail
                        .editor
                        .set_difficulty(&mut self.board, quest.difficulty.next())?;
                }
                _ => {}
            },
            DetailField::DueDate => match key {
                KeyCode::Char(c) => detail.input.push(c),
                KeyCode::Backspace => {
                    detail.input.pop();
                }
                KeyCode::Enter => match parse_due_date(&detail.input) {
                    Ok(due) => {
                        detail.editor.set_due_date(&mut self.board, due)?;
                        detail.input.clear();
                    }
                    Err(e) => self.message = Some(e.to_string()),
                },
                _ => {}
            },
            DetailField::Progress => {
                let step: i16 = match key {
                    KeyCode::Left | KeyCode::Char('h') => -5,
                    KeyCode::Right | KeyCode::Char('l') => 5,
                    _ => 0,
                };
                if step != 0 {
                    let target = (quest.progress as i16 + step).clamp(0, 100) as u8;
                    if !detail.editor.set_progress(&mut self.board, target)? {
                        self.message = Some("Progress follows the checklist".to_string());
                    }
                }
            }
            DetailField::Tags => match key {
                KeyCode::Char(c) => detail.input.push(c),
                KeyCode::Backspace => {
                    detail.input.pop();
                }
                KeyCode::Enter => {
                    detail.editor.add_tag(&mut self.board, &detail.input)?;
                    detail.input.clear();
                }
                KeyCode::Left if !quest.tags.is_empty() => {
                    detail.cursor = detail.cursor.saturating_sub(1);
                }
                KeyCode::Right if !quest.tags.is_empty() => {
                    detail.cursor = (detail.cursor + 1).min(quest.tags.len() - 1);
                }
                KeyCode::Delete => {
                    if let Some(tag) = quest.tags.get(detail.cursor) {
                        detail.editor.remove_tag(&mut self.board, tag)?;
                        detail.cursor = detail.cursor.min(quest.tags.len().saturating_sub(2));
                    }
                }
                _ => {}
            },
            DetailField::Checklist => match key {
                KeyCode::Char(' ') if detail.input.is_empty() => {
                    if let Some(item) = quest.checklist.get(detail.cursor) {
                        detail.editor.toggle_checklist_item(&mut self.board, &item.id)?;
                    }
                }
                KeyCode::Char(c) => detail.input.push(c),
                KeyCode::Backspace => {
                    detail.input.pop();
                }
                KeyCode::Enter => {
                    detail
                        .editor
                        .add_checklist_item(&mut self.board, &detail.input)?;
                    detail.input.clear();
                }
                KeyCode::Down if !quest.checklist.is_empty() => {
                    detail.cursor = (detail.cursor + 1) % quest.checklist.len();
                }
                KeyCode::Up if !quest.checklist.is_empty() => {
                    detail.cursor =
                        (detail.cursor + quest.checklist.len() - 1) % quest.checklist.len();
                }
                KeyCode::Delete => {
                    if let Some(item) = quest.checklist.get(detail.cursor) {
                        detail.editor.remove_checklist_item(&mut self.board, &item.id)?;
                        detail.cursor = detail.cursor.min(quest.checklist.len().saturating_sub(2));
                    }
                }
                _ => {}
            },
            DetailField::Activity => match key {
                KeyCode::Char(c) => detail.input.push(c),
                KeyCode::Backspace => {
                    detail.input.pop();
                }
                KeyCode::Enter => {
                    detail.editor.add_activity(&mut self.board, &detail.input)?;
                    detail.input.clear();
                }
                _ => {}
            },
        }
        Ok(())
    }
}

pub fn run<S: Storage>(board: Board<S>) -> AppResult<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(board);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> AppResult<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = app.handle_key(key.code, key.modifiers) {
                    error!("key handling failed: {}", e);
                    app.message = Some(format!("Error: {}", e));
                }
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;

    fn setup() -> App<MemoryStorage> {
        App::new(Board::load(MemoryStorage::default()))
    }

    fn press(app: &mut App<MemoryStorage>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE).unwrap();
    }

    fn ctrl(app: &mut App<MemoryStorage>, c: char) {
        app.handle_key(KeyCode::Char(c), KeyModifiers::CONTROL).unwrap();
    }

    fn type_text(app: &mut App<MemoryStorage>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    mod shortcut_tests {
        use super::*;

        #[test]
        fn ctrl_k_opens_command_palette() {
            let mut app = setup();
            ctrl(&mut app, 'k');
            assert_eq!(app.command, Some(String::new()));
            type_text(&mut app, "new");
            assert_eq!(app.command.as_deref(), Some("new"));
        }

        #[test]
        fn ctrl_n_creates_and_opens_quest() {
            let mut app = setup();
            ctrl(&mut app, 'n');
            assert_eq!(app.board.quests().len(), 5);
            let new_id = app.board.quests()[0].id.clone();
            let detail = app.detail.as_ref().unwrap();
            assert_eq!(detail.editor.quest_id(), new_id);
            assert_eq!(app.column, QuestStatus::Backlog);
            assert_eq!(app.selected_quest_id(), Some(new_id));
        }

        #[test]
        fn ctrl_f_focuses_search() {
            let mut app = setup();
            ctrl(&mut app, 'f');
            assert_eq!(app.focus, Focus::Search);
            type_text(&mut app, "drag");
            assert_eq!(app.board.search_term(), "drag");
        }

        #[test]
        fn escape_closes_everything() {
            let mut app = setup();
            press(&mut app, KeyCode::Char('f'));
            ctrl(&mut app, 'k');
            press(&mut app, KeyCode::Esc);
            assert!(app.command.is_none());
            assert!(!app.show_filters);
            assert_eq!(app.focus, Focus::Board);
        }
    }

    mod drag_tests {
        use super::*;

        #[test]
        fn grab_and_drop_moves_quest() {
            let mut app = setup();
            // backlog holds quest 2
            press(&mut app, KeyCode::Char(' '));
            assert_eq!(app.carrying.as_deref(), Some("2"));
            press(&mut app, KeyCode::Char('l'));
            press(&mut app, KeyCode::Char('l'));
            press(&mut app, KeyCode::Char(' '));

            assert!(app.carrying.is_none());
            assert_eq!(app.board.get("2").unwrap().status, QuestStatus::Review);
            assert_eq!(app.column, QuestStatus::Review);
            assert_eq!(app.selected_quest_id().as_deref(), Some("2"));
        }

        #[test]
        fn escape_cancels_drag() {
            let mut app = setup();
            press(&mut app, KeyCode::Char(' '));
            press(&mut app, KeyCode::Esc);
            press(&mut app, KeyCode::Char('l'));
            press(&mut app, KeyCode::Char(' '));
            assert_eq!(app.board.get("2").unwrap().status, QuestStatus::Backlog);
            // second space grabbed quest 1 from doing instead
            assert_eq!(app.carrying.as_deref(), Some("1"));
        }
    }

    mod search_tests {
        use super::*;

        #[test]
        fn tick_applies_search_after_debounce() {
            let mut app = setup();
            press(&mut app, KeyCode::Char('/'));
            type_text(&mut app, "keyboard");
            assert_eq!(app.board.filtered().len(), 4);

            app.tick(Instant::now() + Duration::from_millis(350));
            assert_eq!(app.board.filtered().len(), 1);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn filters_panel_toggles_entries() {
            let mut app = setup();
            press(&mut app, KeyCode::Char('f'));
            assert_eq!(app.focus, Focus::Filters);

            let entries = app.filter_entries();
            let pos = entries
                .iter()
                .position(|e| matches!(e, FilterEntry::Difficulty(Difficulty::Easy, _)))
                .unwrap();
            for _ in 0..pos {
                press(&mut app, KeyCode::Down);
            }
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.board.filters().difficulties, vec![Difficulty::Easy]);
            assert_eq!(app.board.filtered().len(), 1);

            press(&mut app, KeyCode::Char('c'));
            assert!(app.board.filters().is_empty());
        }

        #[test]
        fn entries_list_tags_then_difficulties() {
            let app = setup();
            let entries = app.filter_entries();
            assert!(matches!(
                entries.first(),
                Some(FilterEntry::Tag(t, 1)) if t == "accessibility"
            ));
            assert!(matches!(entries.last(), Some(FilterEntry::Difficulty(Difficulty::Epic, 0))));
        }
    }

    mod detail_tests {
        use super::*;

        fn open_quest_one(app: &mut App<MemoryStorage>) {
            press(app, KeyCode::Char('l'));
            press(app, KeyCode::Enter);
            assert_eq!(app.detail.as_ref().unwrap().editor.quest_id(), "1");
        }

        #[test]
        fn title_commits_on_blur() {
            let mut app = setup();
            open_quest_one(&mut app);
            type_text(&mut app, "!");
            assert_eq!(app.board.get("1").unwrap().title, "Design Neon UI Components");
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.board.get("1").unwrap().title, "Design Neon UI Components!");
        }

        #[test]
        fn escape_commits_pending_text() {
            let mut app = setup();
            open_quest_one(&mut app);
            press(&mut app, KeyCode::Backspace);
            press(&mut app, KeyCode::Esc);
            assert!(app.detail.is_none());
            assert_eq!(app.board.get("1").unwrap().title, "Design Neon UI Component");
        }

        #[test]
        fn status_field_moves_quest() {
            let mut app = setup();
            open_quest_one(&mut app);
            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Right);
            assert_eq!(app.board.get("1").unwrap().status, QuestStatus::Review);
        }

        #[test]
        fn checklist_space_toggles_and_recomputes() {
            let mut app = setup();
            open_quest_one(&mut app);
            app.detail.as_mut().unwrap().field = DetailField::Checklist;
            press(&mut app, KeyCode::Up);
            // wrapped to the last item, c3
            press(&mut app, KeyCode::Char(' '));
            assert_eq!(app.board.get("1").unwrap().progress, 100);
        }

        #[test]
        fn tags_field_adds_tag() {
            let mut app = setup();
            open_quest_one(&mut app);
            app.detail.as_mut().unwrap().field = DetailField::Tags;
            type_text(&mut app, "glow");
            press(&mut app, KeyCode::Enter);
            assert!(app.board.get("1").unwrap().has_tag("glow"));
        }

        #[test]
        fn bad_due_date_sets_message() {
            let mut app = setup();
            open_quest_one(&mut app);
            app.detail.as_mut().unwrap().field = DetailField::DueDate;
            type_text(&mut app, "soon");
            press(&mut app, KeyCode::Enter);
            assert!(app.message.as_deref().unwrap().contains("invalid date"));
        }

        #[test]
        fn ctrl_d_deletes_and_closes() {
            let mut app = setup();
            open_quest_one(&mut app);
            ctrl(&mut app, 'd');
            assert!(app.detail.is_none());
            assert!(app.board.get("1").is_none());
        }
    }
}
