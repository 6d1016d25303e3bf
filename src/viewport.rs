/// Visible window over a board, in board coordinates.
///
/// The window always lies fully inside the board:
/// `x + width <= board_width` and `y + height <= board_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    x: usize, // col
    y: usize, // row
    width: usize,
    height: usize,
    board_width: usize,
    board_height: usize,
}

impl Viewport {

    /// Window at the board origin. The extent is clamped to `1..=board`.
    pub fn new(board_width: usize, board_height: usize, width: usize, height: usize) -> Self {
        Viewport {
            x: 0,
            y: 0,
            width: width.clamp(1, board_width),
            height: height.clamp(1, board_height),
            board_width,
            board_height,
        }
    }

    #[inline]
    pub fn x(&self) -> usize {
        self.x
    }

    #[inline]
    pub fn y(&self) -> usize {
        self.y
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn max_x(&self) -> usize {
        self.board_width - self.width
    }

    #[inline]
    pub fn max_y(&self) -> usize {
        self.board_height - self.height
    }

    /// Moves the window by the given deltas. Each axis is checked on its
    /// own: a move that would leave the board is dropped for that axis only.
    pub fn translate(&mut self, delta_row: isize, delta_col: isize) {
        if let Some(y) = shifted(self.y, delta_row, self.max_y()) {
            self.y = y;
        }
        if let Some(x) = shifted(self.x, delta_col, self.max_x()) {
            self.x = x;
        }
    }

    #[inline]
    pub fn map_to_board(&self, viewport_row: usize, viewport_col: usize) -> (usize, usize) {
        (self.y + viewport_row, self.x + viewport_col)
    }

    /// Inverse of [`Viewport::map_to_board`]; `None` outside the window.
    pub fn map_to_viewport(&self, board_row: usize, board_col: usize) -> Option<(usize, usize)> {
        if self.contains(board_row, board_col) {
            Some((board_row - self.y, board_col - self.x))
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, board_row: usize, board_col: usize) -> bool {
        (self.y..self.y + self.height).contains(&board_row)
            && (self.x..self.x + self.width).contains(&board_col)
    }
}

fn shifted(pos: usize, delta: isize, max: usize) -> Option<usize> {
    pos.checked_add_signed(delta).filter(|p| *p <= max)
}
