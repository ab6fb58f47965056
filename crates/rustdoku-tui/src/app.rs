use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use rustdoku_core::{Difficulty, GameSession, Position, SessionStatus, CELL_COUNT, SIZE};

use crate::theme::Theme;

/// How many ticks a status message stays on screen.
const MESSAGE_TICKS: u32 = 30;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Input mode for digit keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Digit keys place values
    Normal,
    /// Digit keys toggle pencil marks
    Pencil,
}

/// The main application state
pub struct App {
    /// Engine-side game state
    pub session: GameSession,
    /// Currently selected cell
    pub cursor: Position,
    /// Current input mode
    pub mode: InputMode,
    /// Color theme
    pub theme: Theme,
    /// Whether the game ended (solved or revealed)
    pub finished: bool,
    /// Message to display
    pub message: Option<String>,
    message_timer: u32,
    /// Pencil marks, one bitmask per cell (bit `v` = digit `v` marked).
    /// UI-owned: the engine never sees these.
    marks: [u16; CELL_COUNT],
    dark: bool,
    start: Instant,
    banked: Duration,
    timer_running: bool,
}

impl App {
    /// Create the app around a session, resuming `elapsed` play time.
    pub fn new(session: GameSession, elapsed: Duration, theme: Theme, dark: bool) -> Self {
        Self {
            session,
            cursor: Position::new(4, 4),
            mode: InputMode::Normal,
            theme,
            finished: false,
            message: Some(SessionStatus::NewBoardReady.to_string()),
            message_timer: MESSAGE_TICKS,
            marks: [0; CELL_COUNT],
            dark,
            start: Instant::now(),
            banked: elapsed,
            timer_running: true,
        }
    }

    /// Total play time so far.
    pub fn elapsed(&self) -> Duration {
        if self.timer_running {
            self.banked + self.start.elapsed()
        } else {
            self.banked
        }
    }

    /// Play time as MM:SS.
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Pencil-marked digits for a cell, ascending.
    pub fn marks(&self, idx: usize) -> Vec<u8> {
        (1..=9).filter(|v| self.marks[idx] & (1 << v) != 0).collect()
    }

    /// Whether a cell has any pencil marks.
    pub fn has_marks(&self, idx: usize) -> bool {
        self.marks[idx] != 0
    }

    /// Update timers (called every tick).
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Route a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),

            KeyCode::Char(c @ '1'..='9') => self.enter_digit(c as u8 - b'0'),
            KeyCode::Char('0') | KeyCode::Backspace | KeyCode::Delete => self.clear_cell(),

            KeyCode::Char('p') => self.toggle_mode(),
            KeyCode::Char('h') => self.hint(),
            KeyCode::Char('v') => self.validate(),
            KeyCode::Enter => self.check(),
            KeyCode::Char('r') => self.reveal(),
            KeyCode::Char('c') => self.clear_board(),

            KeyCode::Char('n') => self.new_game(self.session.difficulty()),
            KeyCode::Char('e') => self.new_game(Difficulty::Easy),
            KeyCode::Char('m') => self.new_game(Difficulty::Medium),
            KeyCode::Char('d') => self.new_game(Difficulty::Hard),

            KeyCode::Char('t') => self.toggle_theme(),

            _ => {}
        }
        AppAction::Continue
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let row = (self.cursor.row as isize + dr).rem_euclid(SIZE as isize) as usize;
        let col = (self.cursor.col as isize + dc).rem_euclid(SIZE as isize) as usize;
        self.cursor = Position::new(row, col);
    }

    fn enter_digit(&mut self, value: u8) {
        if self.finished {
            return;
        }
        let idx = self.cursor.index();

        if self.mode == InputMode::Pencil {
            if self.session.is_fixed(idx) {
                self.report(SessionStatus::CellFixed);
            } else if self.session.current().get(idx).is_none() {
                self.marks[idx] ^= 1 << value;
            }
            return;
        }

        let status = self.session.place(idx, value);
        if status == SessionStatus::Placed {
            self.marks[idx] = 0;
        } else {
            self.report(status);
        }
    }

    fn clear_cell(&mut self) {
        if self.finished {
            return;
        }
        let idx = self.cursor.index();
        let status = self.session.clear(idx);
        if status == SessionStatus::Cleared {
            self.marks[idx] = 0;
        } else {
            self.report(status);
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            InputMode::Normal => InputMode::Pencil,
            InputMode::Pencil => InputMode::Normal,
        };
    }

    fn hint(&mut self) {
        if self.finished {
            return;
        }
        let idx = self.cursor.index();
        let status = self.session.hint(idx);
        if status == SessionStatus::HintApplied {
            self.marks[idx] = 0;
        }
        self.report(status);
    }

    fn validate(&mut self) {
        self.report(self.session.validate().status());
    }

    fn check(&mut self) {
        let status = self.session.check_completion();
        if status == SessionStatus::SolvedCorrectly {
            self.finish();
        }
        self.report(status);
    }

    fn reveal(&mut self) {
        let status = self.session.reveal_solution();
        self.report(status);
        self.finish();
    }

    fn clear_board(&mut self) {
        if self.finished {
            return;
        }
        self.marks = [0; CELL_COUNT];
        let status = self.session.clear_all_non_fixed();
        self.report(status);
    }

    fn new_game(&mut self, difficulty: Difficulty) {
        let status = self.session.new_game(difficulty);
        self.marks = [0; CELL_COUNT];
        self.finished = false;
        self.banked = Duration::ZERO;
        self.start = Instant::now();
        self.timer_running = true;
        self.report(status);
    }

    fn toggle_theme(&mut self) {
        self.dark = !self.dark;
        self.theme = if self.dark {
            Theme::dark()
        } else {
            Theme::light()
        };
    }

    fn finish(&mut self) {
        self.finished = true;
        self.banked = self.elapsed();
        self.timer_running = false;
    }

    fn report(&mut self, status: SessionStatus) {
        self.message = Some(status.to_string());
        self.message_timer = MESSAGE_TICKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let session = GameSession::with_seed(Difficulty::Easy, 5);
        App::new(session, Duration::ZERO, Theme::dark(), true)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_cursor_wraps_around() {
        let mut app = app();
        app.cursor = Position::new(0, 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor, Position::new(8, 0));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, Position::new(8, 8));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, Position::new(0, 8));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, Position::new(0, 0));
    }

    #[test]
    fn test_pencil_marks_toggle_and_clear_on_place() {
        let mut app = app();
        let idx = (0..CELL_COUNT).find(|&i| !app.session.is_fixed(i)).unwrap();
        app.cursor = Position::from_index(idx);

        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.marks(idx), vec![3, 7]);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.marks(idx), vec![7]);

        // Placing a real digit wipes the cell's marks.
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('5'));
        assert!(!app.has_marks(idx));
        assert_eq!(app.session.current().get(idx), Some(5));
    }

    #[test]
    fn test_fixed_cell_reports_status() {
        let mut app = app();
        let idx = (0..CELL_COUNT).find(|&i| app.session.is_fixed(i)).unwrap();
        app.cursor = Position::from_index(idx);

        press(&mut app, KeyCode::Char('9'));
        assert_eq!(
            app.message.as_deref(),
            Some("Cannot change a fixed cell")
        );
    }

    #[test]
    fn test_reveal_finishes_game() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.finished);
        assert_eq!(app.session.current(), app.session.solution());

        // Digit entry is inert once finished.
        let idx = (0..CELL_COUNT).find(|&i| !app.session.is_fixed(i)).unwrap();
        app.cursor = Position::from_index(idx);
        let before = app.session.current().get(idx);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.session.current().get(idx), before);
    }

    #[test]
    fn test_new_game_resets_state() {
        let mut app = app();
        let idx = (0..CELL_COUNT).find(|&i| !app.session.is_fixed(i)).unwrap();
        app.cursor = Position::from_index(idx);
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('4'));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.session.difficulty(), Difficulty::Hard);
        assert!((0..CELL_COUNT).all(|i| !app.has_marks(i)));
        assert!(!app.finished);
    }
}
