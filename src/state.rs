use std::time::Duration;

use crate::{proc::Board, viewport::Viewport};

/// Step interval when the session starts.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(500);

/// Speeding up stops once the interval is at or below this.
pub const MIN_STEP_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Stepping,
    Editing,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Stepping => "STEPPING",
            Mode::Editing => "EDITING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(delta_row, delta_col)` for a single step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Everything the input side can ask for. `Timeout` is produced when a
/// timed wait expires without a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Confirm,
    ToggleMode,
    ToggleFreeRunning,
    IncreaseSpeed,
    DecreaseSpeed,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Quit,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Interaction state: mode, cursor and auto-step timing.
///
/// The cursor is kept in viewport-local `(row, col)` coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    mode: Mode,
    cursor: (usize, usize),
    free_running: bool,
    step_interval: Duration,
    steps: u64,
}

impl Default for Interaction {
    fn default() -> Self {
        Interaction::new(DEFAULT_STEP_INTERVAL)
    }
}

impl Interaction {

    #[inline]
    pub fn new(step_interval: Duration) -> Self {
        Interaction {
            mode: Mode::Stepping,
            cursor: (0, 0),
            free_running: false,
            step_interval,
            steps: 0,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    #[inline]
    pub fn cursor_visible(&self) -> bool {
        self.mode == Mode::Editing
    }

    #[inline]
    pub fn free_running(&self) -> bool {
        self.free_running
    }

    #[inline]
    pub fn step_interval(&self) -> Duration {
        self.step_interval
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// How long the next input wait may block; `None` waits for a key.
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.free_running.then_some(self.step_interval)
    }

    pub fn cursor_on_board(&self, viewport: &Viewport) -> (usize, usize) {
        viewport.map_to_board(self.cursor.0, self.cursor.1)
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Stepping => Mode::Editing,
            Mode::Editing => Mode::Stepping,
        };
        tracing::debug!(mode = self.mode.label(), "mode changed");
    }

    /// Space bar: advance one generation when stepping, flip the cell under
    /// the cursor when editing.
    pub fn confirm<const W: usize, const H: usize>(&mut self, board: &mut Board<W, H>) {
        match self.mode {
            Mode::Stepping => self.advance(board),
            Mode::Editing => {
                let (row, col) = self.cursor;
                let cell = board.toggle_in_viewport(row, col);
                tracing::debug!(row, col, ?cell, "cell toggled");
            }
        }
    }

    fn advance<const W: usize, const H: usize>(&mut self, board: &mut Board<W, H>) {
        board.tick();
        self.steps += 1;
    }

    /// Moves the cursor one cell, wrapping around the viewport edges. Never
    /// pans the viewport.
    pub fn move_cursor(&mut self, direction: Direction, viewport: &Viewport) {
        let (row, col) = &mut self.cursor;
        let (h, w) = (viewport.height(), viewport.width());
        match direction {
            Direction::Up => *row = (*row + h - 1) % h,
            Direction::Down => *row = (*row + 1) % h,
            Direction::Left => *col = (*col + w - 1) % w,
            Direction::Right => *col = (*col + 1) % w,
        }
    }

    pub fn toggle_free_running(&mut self) {
        self.free_running = !self.free_running;
        tracing::debug!(free_running = self.free_running, interval = ?self.step_interval, "free running toggled");
    }

    /// Halves the interval while it is above [`MIN_STEP_INTERVAL`], never
    /// going under it.
    pub fn increase_speed(&mut self) {
        if self.step_interval > MIN_STEP_INTERVAL {
            self.step_interval = (self.step_interval / 2).max(MIN_STEP_INTERVAL);
            tracing::debug!(interval = ?self.step_interval, "speed increased");
        }
    }

    pub fn decrease_speed(&mut self) {
        self.step_interval = self.step_interval.saturating_mul(2);
        tracing::debug!(interval = ?self.step_interval, "speed decreased");
    }

    /// Applies one input action. A `Timeout` advances a generation while
    /// stepping and is ignored while editing.
    pub fn handle<const W: usize, const H: usize>(&mut self, action: Action, board: &mut Board<W, H>) -> Control {
        match action {
            Action::Confirm => self.confirm(board),
            Action::Timeout => {
                if self.mode == Mode::Stepping {
                    self.advance(board)
                }
            }
            Action::ToggleMode => self.toggle_mode(),
            Action::ToggleFreeRunning => self.toggle_free_running(),
            Action::IncreaseSpeed => self.increase_speed(),
            Action::DecreaseSpeed => self.decrease_speed(),
            Action::PanUp => board.translate_viewport(-1, 0),
            Action::PanDown => board.translate_viewport(1, 0),
            Action::PanLeft => board.translate_viewport(0, -1),
            Action::PanRight => board.translate_viewport(0, 1),
            Action::CursorUp => self.move_cursor(Direction::Up, board.viewport()),
            Action::CursorDown => self.move_cursor(Direction::Down, board.viewport()),
            Action::CursorLeft => self.move_cursor(Direction::Left, board.viewport()),
            Action::CursorRight => self.move_cursor(Direction::Right, board.viewport()),
            Action::Quit => return Control::Quit,
        }
        Control::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::Cell;

    type Small = Board<10, 8>;

    #[test]
    fn starts_stepping_at_origin() {
        let i = Interaction::default();
        assert_eq!(i.mode(), Mode::Stepping);
        assert_eq!(i.cursor(), (0, 0));
        assert!(!i.free_running());
        assert!(!i.cursor_visible());
        assert_eq!(i.step_interval(), DEFAULT_STEP_INTERVAL);
        assert_eq!(i.wait_timeout(), None);
    }

    #[test]
    fn toggle_mode_flips() {
        let mut i = Interaction::default();
        i.toggle_mode();
        assert_eq!(i.mode(), Mode::Editing);
        assert!(i.cursor_visible());
        i.toggle_mode();
        assert_eq!(i.mode(), Mode::Stepping);
    }

    #[test]
    fn confirm_when_stepping_ticks() {
        let mut b = Small::new(5, 5);
        b.set(0, 0, Cell::Alive);
        let mut i = Interaction::default();
        i.confirm(&mut b);
        assert_eq!(i.steps(), 1);
        assert_eq!(b.population(), 0);
    }

    #[test]
    fn confirm_when_editing_toggles_under_cursor() {
        let mut b = Small::new(5, 5);
        b.translate_viewport(2, 3);
        let mut i = Interaction::default();
        i.toggle_mode();
        i.move_cursor(Direction::Down, b.viewport());
        i.confirm(&mut b);
        assert_eq!(b.get(3, 3), Cell::Alive);
        assert_eq!(i.cursor_on_board(b.viewport()), (3, 3));
        i.confirm(&mut b);
        assert_eq!(b.get(3, 3), Cell::Dead);
        assert_eq!(i.steps(), 0);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let b = Small::new(4, 3);
        let v = b.viewport();
        let mut i = Interaction::default();
        i.move_cursor(Direction::Up, v);
        assert_eq!(i.cursor(), (2, 0));
        i.move_cursor(Direction::Down, v);
        assert_eq!(i.cursor(), (0, 0));
        i.move_cursor(Direction::Left, v);
        assert_eq!(i.cursor(), (0, 3));
        i.move_cursor(Direction::Right, v);
        assert_eq!(i.cursor(), (0, 0));
    }

    #[test]
    fn cursor_wrap_does_not_pan() {
        let mut b = Small::new(4, 3);
        let mut i = Interaction::default();
        i.handle(Action::CursorUp, &mut b);
        i.handle(Action::CursorLeft, &mut b);
        assert_eq!((b.viewport().x(), b.viewport().y()), (0, 0));
    }

    #[test]
    fn speed_has_a_floor() {
        let mut i = Interaction::default();
        i.increase_speed();
        assert_eq!(i.step_interval(), Duration::from_millis(250));
        i.increase_speed();
        assert_eq!(i.step_interval(), MIN_STEP_INTERVAL);
        i.increase_speed();
        assert_eq!(i.step_interval(), MIN_STEP_INTERVAL);
    }

    #[test]
    fn slower_doubles_and_updates_timeout() {
        let mut i = Interaction::default();
        i.toggle_free_running();
        i.decrease_speed();
        assert_eq!(i.wait_timeout(), Some(Duration::from_secs(1)));
        i.increase_speed();
        assert_eq!(i.wait_timeout(), Some(DEFAULT_STEP_INTERVAL));
        i.toggle_free_running();
        assert_eq!(i.wait_timeout(), None);
    }

    #[test]
    fn timeout_only_advances_when_stepping() {
        let mut b = Small::new(5, 5);
        let mut i = Interaction::default();
        assert_eq!(i.handle(Action::Timeout, &mut b), Control::Continue);
        assert_eq!(i.steps(), 1);
        i.toggle_mode();
        i.handle(Action::Timeout, &mut b);
        assert_eq!(i.steps(), 1);
        assert_eq!(b.population(), 0);
    }

    #[test]
    fn pan_actions_move_viewport() {
        let mut b = Small::new(5, 5);
        let mut i = Interaction::default();
        i.handle(Action::PanDown, &mut b);
        i.handle(Action::PanRight, &mut b);
        i.handle(Action::PanRight, &mut b);
        i.handle(Action::PanUp, &mut b);
        i.handle(Action::PanLeft, &mut b);
        assert_eq!((b.viewport().y(), b.viewport().x()), (0, 1));
    }

    #[test]
    fn quit_stops() {
        let mut b = Small::new(5, 5);
        let mut i = Interaction::default();
        assert_eq!(i.handle(Action::Quit, &mut b), Control::Quit);
    }
}
