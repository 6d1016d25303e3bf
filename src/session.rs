use std::time::Duration;

use crate::{
    error::Result,
    proc::{Board, Cell, BOARD_HEIGHT, BOARD_WIDTH},
    state::{Action, Control, Interaction, Mode},
};

/// Read-only snapshot handed to the renderer once per event.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Visible part of the current generation, `[row][col]`.
    pub cells: Vec<Vec<Cell>>,
    pub viewport_x: usize,
    pub viewport_y: usize,
    pub viewport_width: usize,
    pub viewport_height: usize,
    pub mode: Mode,
    /// Cursor in board coordinates, `(row, col)`.
    pub cursor: (usize, usize),
    /// Cursor relative to the viewport, `(row, col)`.
    pub cursor_local: (usize, usize),
    pub cursor_visible: bool,
    pub steps: u64,
    pub last_update_time: Duration,
    pub free_running: bool,
    pub step_interval: Duration,
}

impl Frame {
    pub fn capture<const W: usize, const H: usize>(board: &Board<W, H>, interaction: &Interaction) -> Self {
        let v = board.viewport();
        Frame {
            cells: board.visible(),
            viewport_x: v.x(),
            viewport_y: v.y(),
            viewport_width: v.width(),
            viewport_height: v.height(),
            mode: interaction.mode(),
            cursor: interaction.cursor_on_board(v),
            cursor_local: interaction.cursor(),
            cursor_visible: interaction.cursor_visible(),
            steps: interaction.steps(),
            last_update_time: board.last_update_time(),
            free_running: interaction.free_running(),
            step_interval: interaction.step_interval(),
        }
    }
}

/// Source of actions. `timeout` of `None` blocks until a key arrives,
/// otherwise [`Action::Timeout`] is returned once it elapses.
pub trait Input {
    fn next_action(&mut self, timeout: Option<Duration>) -> Result<Action>;
}

pub trait Render {
    fn render(&mut self, frame: &Frame) -> Result<()>;
}

pub struct Session<const W: usize = BOARD_WIDTH, const H: usize = BOARD_HEIGHT> {
    board: Board<W, H>,
    interaction: Interaction,
}

impl<const W: usize, const H: usize> Session<W, H> {

    #[inline]
    pub fn new(board: Board<W, H>, interaction: Interaction) -> Self {
        Session { board, interaction }
    }

    #[inline]
    pub fn board(&self) -> &Board<W, H> {
        &self.board
    }

    #[inline]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.board, &self.interaction)
    }

    #[inline]
    pub fn handle(&mut self, action: Action) -> Control {
        self.interaction.handle(action, &mut self.board)
    }

    /// Renders, then dispatches actions until `Quit`, rendering after each.
    pub fn run<I: Input, R: Render>(&mut self, input: &mut I, render: &mut R) -> Result<()> {
        tracing::info!(
            board_width = W,
            board_height = H,
            viewport_width = self.board.viewport().width(),
            viewport_height = self.board.viewport().height(),
            "session started"
        );
        render.render(&self.frame())?;

        loop {
            let action = input.next_action(self.interaction.wait_timeout())?;
            if self.handle(action) == Control::Quit {
                break;
            }
            render.render(&self.frame())?;
        }

        tracing::info!(steps = self.interaction.steps(), "session finished");
        Ok(())
    }
}
