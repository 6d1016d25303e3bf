use std::{
    io::{self, Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, enable_raw_mode, disable_raw_mode, SetTitle, Clear, ClearType},
    cursor::{ MoveTo, Show, Hide },
    tty::IsTty,
    style::{ Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor },
    execute, queue,
    event::{
        self,
        Event,
        KeyEvent,
        KeyModifiers,
        KeyCode, KeyEventKind,
    },
};

use crate::{
    config::{Config, DisplayConfig},
    error::{Error, Result},
    proc::{Board, Cell},
    session::{Frame, Input, Render, Session},
    state::{Action, Interaction},
};

const MARGIN_X: u16 = 2;
const HEADER_LEN: u16 = 3;
const FOOTER_LEN: u16 = 1;

/// Screen geometry: three header lines, the coordinate of the viewport
/// origin, the boxed board and a footer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    cols: u16,
    rows: u16,
    box_x: u16,
    box_y: u16,
    box_w: u16,
    box_h: u16,
}

impl Layout {

    pub fn new(cols: u16, rows: u16) -> Result<Self> {
        let box_y = HEADER_LEN + 1;
        let box_w = cols.saturating_sub(2 * MARGIN_X);
        let box_h = rows.saturating_sub(box_y + FOOTER_LEN);

        // a border on each side plus at least one cell
        if box_w < 3 || box_h < 3 {
            return Err(Error::TerminalTooSmall { cols, rows });
        }

        Ok(Layout {
            cols,
            rows,
            box_x: MARGIN_X,
            box_y,
            box_w,
            box_h,
        })
    }

    pub fn from_terminal() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Self::new(cols, rows)
    }

    /// Cells that fit inside the border, `(width, height)`.
    #[inline]
    pub fn viewport_size(&self) -> (usize, usize) {
        ((self.box_w - 2) as usize, (self.box_h - 2) as usize)
    }

    #[inline]
    fn inner(&self) -> (u16, u16) {
        (self.box_x + 1, self.box_y + 1)
    }
}

/// Owns raw mode and the alternate screen; restores the terminal on drop.
pub struct Terminal<W: Write = Stdout> {
    out: W,
    active: bool,
}

impl Terminal {

    pub fn enter() -> Result<Self> {
        if !io::stdin().is_tty() || !io::stdout().is_tty() {
            return Err(Error::NotATerminal);
        }
        Self::enter_on(io::stdout(), enable_raw_mode)
    }
}

impl<W: Write> Terminal<W> {

    fn enter_on(out: W, raw_mode: impl FnOnce() -> io::Result<()>) -> Result<Self> {
        // dropping the guard on any error below restores the screen
        let mut terminal = Terminal { out, active: true };
        execute!(terminal.out, EnterAlternateScreen, SetTitle("Life a game"), Hide)?;
        raw_mode()?;
        execute!(terminal.out, Clear(ClearType::All))?;
        Ok(terminal)
    }

    pub fn leave(mut self) -> Result<()> {
        self.active = false;
        disable_raw_mode()?;
        execute!(self.out, LeaveAlternateScreen, Show)?;
        Ok(())
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            let _ = execute!(self.out, LeaveAlternateScreen, Show);
        }
    }
}

/// Keyboard input over crossterm events.
pub struct Keyboard;

impl Input for Keyboard {
    fn next_action(&mut self, timeout: Option<Duration>) -> Result<Action> {
        let until = deadline(timeout);
        loop {
            if let Some(until) = until {
                let left = until.saturating_duration_since(Instant::now());
                if !event::poll(left)? {
                    return Ok(Action::Timeout);
                }
            }
            if let Event::Key(key) = event::read()? {
                if let Some(action) = map_key(key) {
                    return Ok(action);
                }
            }
        }
    }
}

/// End of a timed wait. An interval too long to represent as an instant
/// waits for a key instead.
fn deadline(timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|t| Instant::now().checked_add(t))
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char(' ') => Action::Confirm,
        KeyCode::Char('e') => Action::ToggleMode,
        KeyCode::Char('f') => Action::ToggleFreeRunning,
        KeyCode::Char('+') => Action::IncreaseSpeed,
        KeyCode::Char('-') => Action::DecreaseSpeed,
        KeyCode::Char('w') => Action::PanUp,
        KeyCode::Char('s') => Action::PanDown,
        KeyCode::Char('a') => Action::PanLeft,
        KeyCode::Char('d') => Action::PanRight,
        KeyCode::Up => Action::CursorUp,
        KeyCode::Down => Action::CursorDown,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::F(1) | KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Draws frames to any writer; [`Screen::stdout`] for the real terminal.
pub struct Screen<W: Write> {
    out: W,
    layout: Layout,
    alive: char,
    dead: char,
}

impl Screen<Stdout> {
    pub fn stdout(layout: Layout, display: &DisplayConfig) -> Self {
        Screen::new(io::stdout(), layout, display)
    }
}

impl<W: Write> Screen<W> {

    pub fn new(out: W, layout: Layout, display: &DisplayConfig) -> Self {
        Screen {
            out,
            layout,
            alive: display.alive_char,
            dead: display.dead_char,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&mut self, f: &Frame) -> io::Result<()> {
        let cols = self.layout.cols;
        let step_line = if f.steps == 0 {
            "Press <Space> to step.".to_string()
        } else {
            format!("Stepping: {}", f.steps)
        };
        let size = format!("Size: ({:3}, {:3})", self.layout.rows, cols);
        let update = format!("Last Update: {:.6}", f.last_update_time.as_secs_f64());
        let state = format!("Cur state: {} ({}, {})", f.mode.label(), f.cursor.0, f.cursor.1);

        queue!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, 0), Print("Press F1 to exit."),
            MoveTo(right(cols, &size), 0), Print(&size),
            MoveTo(0, 1), Print(step_line),
            MoveTo(right(cols, &update), 1), Print(&update),
            MoveTo(0, 2), Print(state),
        )?;

        if f.free_running {
            let free = format!("FREERUNNING ({:.3})", f.step_interval.as_secs_f64());
            queue!(
                self.out,
                MoveTo(right(cols, &free), 2),
                SetAttribute(Attribute::SlowBlink),
                Print(&free),
                SetAttribute(Attribute::NoBlink),
            )?;
        }

        let top_left = format!("({:3},{:3})", f.viewport_x, f.viewport_y);
        let bottom_right = format!(
            "({:3},{:3})",
            f.viewport_x + f.viewport_width,
            f.viewport_y + f.viewport_height
        );
        queue!(
            self.out,
            MoveTo(0, HEADER_LEN),
            Print(top_left),
            MoveTo(right(cols, &bottom_right), self.layout.rows - 1),
            Print(bottom_right),
        )
    }

    fn border(&mut self) -> io::Result<()> {
        let Layout { box_x, box_y, box_w, box_h, .. } = self.layout;
        let horizontal = "─".repeat((box_w - 2) as usize);

        queue!(self.out, MoveTo(box_x, box_y), Print(format!("┌{horizontal}┐")))?;
        for r in box_y + 1..box_y + box_h - 1 {
            queue!(
                self.out,
                MoveTo(box_x, r), Print('│'),
                MoveTo(box_x + box_w - 1, r), Print('│'),
            )?;
        }
        queue!(self.out, MoveTo(box_x, box_y + box_h - 1), Print(format!("└{horizontal}┘")))
    }

    fn cells(&mut self, f: &Frame) -> io::Result<()> {
        let (x, y) = self.layout.inner();
        queue!(self.out, SetForegroundColor(Color::Red))?;
        for (r, row) in f.cells.iter().enumerate() {
            let line: String = row
                .iter()
                .map(|c| match c {
                    Cell::Alive => self.alive,
                    Cell::Dead => self.dead,
                })
                .collect();
            queue!(self.out, MoveTo(x, y + r as u16), Print(line))?;
        }
        queue!(self.out, ResetColor)
    }

    fn cursor(&mut self, f: &Frame) -> io::Result<()> {
        let (x, y) = self.layout.inner();
        let (r, c) = f.cursor_local;
        queue!(self.out, MoveTo(x + c as u16, y + r as u16))?;
        if f.cursor_visible {
            queue!(self.out, Show)
        } else {
            queue!(self.out, Hide)
        }
    }
}

impl<W: Write> Render for Screen<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.header(frame)?;
        self.border()?;
        self.cells(frame)?;
        self.cursor(frame)?;
        self.out.flush()?;
        Ok(())
    }
}

fn right(cols: u16, s: &str) -> u16 {
    cols.saturating_sub(s.chars().count() as u16)
}

/// Runs an interactive session on the current terminal until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let terminal = Terminal::enter()?;
    let layout = match Layout::from_terminal() {
        Ok(l) => l,
        Err(e) => {
            terminal.leave()?;
            return Err(e);
        }
    };

    let (w, h) = layout.viewport_size();
    let mut session: Session = Session::new(Board::new(w, h), Interaction::new(config.step_interval()));
    let mut screen = Screen::stdout(layout, &config.display);

    let d = session.run(&mut Keyboard, &mut screen);
    terminal.leave()?;
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn layout_leaves_room_for_header_and_border() {
        let l = Layout::new(80, 24).unwrap();
        assert_eq!(l.viewport_size(), (74, 17));
        assert_eq!(l.inner(), (3, 5));
    }

    #[test]
    fn tiny_terminal_is_rejected() {
        assert!(matches!(Layout::new(6, 24), Err(Error::TerminalTooSmall { cols: 6, rows: 24 })));
        assert!(matches!(Layout::new(80, 7), Err(Error::TerminalTooSmall { .. })));
        assert_eq!(Layout::new(7, 8).unwrap().viewport_size(), (1, 1));
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Action::Confirm));
        assert_eq!(map_key(key(KeyCode::Char('e'))), Some(Action::ToggleMode));
        assert_eq!(map_key(key(KeyCode::Char('w'))), Some(Action::PanUp));
        assert_eq!(map_key(key(KeyCode::Left)), Some(Action::CursorLeft));
        assert_eq!(map_key(key(KeyCode::F(1))), Some(Action::Quit));
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn failed_setup_leaves_alternate_screen() {
        let mut out = Vec::new();
        let failed = matches!(
            Terminal::enter_on(&mut out, || Err(io::Error::new(io::ErrorKind::Other, "no tty"))),
            Err(Error::Terminal(_))
        );
        assert!(failed);

        let text = String::from_utf8_lossy(&out);
        let entered = text.find("\x1b[?1049h").unwrap();
        let left = text.find("\x1b[?1049l").unwrap();
        assert!(entered < left);
    }

    #[test]
    fn huge_interval_waits_for_key() {
        let mut i = Interaction::default();
        i.toggle_free_running();
        for _ in 0..70 {
            i.decrease_speed();
        }
        assert_eq!(i.wait_timeout(), Some(Duration::MAX));
        assert_eq!(deadline(i.wait_timeout()), None);
    }

    #[test]
    fn deadline_follows_interval() {
        let before = Instant::now();
        let d = deadline(Some(Duration::from_millis(500))).unwrap();
        assert!(d >= before + Duration::from_millis(500));
        assert_eq!(deadline(None), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut k = key(KeyCode::Char(' '));
        k.kind = KeyEventKind::Release;
        assert_eq!(map_key(k), None);
    }

    #[test]
    fn screen_draws_cells_and_status() {
        let layout = Layout::new(20, 10).unwrap();
        let display = DisplayConfig { alive_char: '@', dead_char: '.' };
        let (w, h) = layout.viewport_size();
        let mut board: Board<30, 30> = Board::new(w, h);
        board.set(0, 1, Cell::Alive);
        let mut i = Interaction::default();
        i.toggle_free_running();
        let frame = Frame::capture(&board, &i);
        assert_eq!(frame.mode, Mode::Stepping);

        let mut screen = Screen::new(Vec::new(), layout, &display);
        screen.render(&frame).unwrap();
        let out = String::from_utf8(screen.into_inner()).unwrap();

        assert!(out.contains(&format!(".@{}", ".".repeat(12))));
        assert!(out.contains("Cur state: STEPPING (0, 0)"));
        assert!(out.contains("FREERUNNING (0.500)"));
        assert!(out.contains("┌"));
    }
}
