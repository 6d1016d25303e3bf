use std::time::{Duration, Instant};

use crate::viewport::Viewport;

pub const BOARD_WIDTH: usize = 200;
pub const BOARD_HEIGHT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    Alive,
    #[default]
    Dead,
}

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Cell::Alive => Cell::Dead,
            Cell::Dead => Cell::Alive,
        }
    }
}

type Grid<const W: usize, const H: usize> = [[Cell; W]; H];

/// Fixed-size board holding two grids: the front one is the current
/// generation, the back one receives the next generation during a tick.
///
/// Grids are indexed `[row][col]`.
pub struct Board<const W: usize = BOARD_WIDTH, const H: usize = BOARD_HEIGHT> {
    grids: [Box<Grid<W, H>>; 2],
    front: usize,
    viewport: Viewport,
    last_update_time: Duration,
}

impl<const W: usize, const H: usize> Board<W, H> {

    /// All cells start dead, viewport at the top-left corner. The viewport
    /// extent is clamped to `1..=W` x `1..=H`.
    pub fn new(viewport_width: usize, viewport_height: usize) -> Self {
        const { assert!(W > 0 && H > 0, "board dimensions must be positive") };

        Board {
            grids: [Box::new([[Cell::Dead; W]; H]), Box::new([[Cell::Dead; W]; H])],
            front: 0,
            viewport: Viewport::new(W, H, viewport_width, viewport_height),
            last_update_time: Duration::ZERO,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        W
    }

    #[inline]
    pub fn height(&self) -> usize {
        H
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn last_update_time(&self) -> Duration {
        self.last_update_time
    }

    #[inline]
    fn front(&self) -> &Grid<W, H> {
        &self.grids[self.front]
    }

    #[inline]
    fn front_mut(&mut self) -> &mut Grid<W, H> {
        &mut self.grids[self.front]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.front()[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.front_mut()[row][col] = cell;
    }

    /// Flips a cell of the current generation and returns its new state.
    pub fn toggle(&mut self, row: usize, col: usize) -> Cell {
        let cell = &mut self.front_mut()[row][col];
        *cell = cell.toggled();
        *cell
    }

    /// Same as [`Board::toggle`] with viewport-local coordinates.
    pub fn toggle_in_viewport(&mut self, viewport_row: usize, viewport_col: usize) -> Cell {
        let (row, col) = self.viewport.map_to_board(viewport_row, viewport_col);
        self.toggle(row, col)
    }

    /// Pans the viewport; see [`Viewport::translate`].
    pub fn translate_viewport(&mut self, delta_row: isize, delta_col: isize) {
        self.viewport.translate(delta_row, delta_col);
    }

    #[inline]
    pub fn neighbor_count(&self, row: usize, col: usize) -> u8 {
        count_neighbors(self.front(), row, col)
    }

    pub fn population(&self) -> usize {
        self.front()
            .iter()
            .flat_map(|r| r.iter())
            .filter(|c| c.is_alive())
            .count()
    }

    /// Copy of the part of the current generation under the viewport.
    pub fn visible(&self) -> Vec<Vec<Cell>> {
        let v = &self.viewport;
        self.front()[v.y()..v.y() + v.height()]
            .iter()
            .map(|r| r[v.x()..v.x() + v.width()].to_vec())
            .collect()
    }

    /// Computes the next generation of the whole board into the back grid,
    /// then makes it the front one.
    pub fn tick(&mut self) {
        let begin = Instant::now();

        let [a, b] = &mut self.grids;
        let (src, dst) = if self.front == 0 {
            (&**a, &mut **b)
        } else {
            (&**b, &mut **a)
        };

        for (r, row) in dst.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = next_state(src[r][c], count_neighbors(src, r, c));
            }
        }

        self.front ^= 1;
        self.last_update_time = begin.elapsed();
        tracing::trace!(elapsed = ?self.last_update_time, "generation computed");
    }
}

/// Live cells among the up to eight neighbours of `(row, col)`. The
/// neighbourhood is cut at the board edges, it does not wrap.
fn count_neighbors<const W: usize, const H: usize>(grid: &Grid<W, H>, row: usize, col: usize) -> u8 {
    let rows = row.saturating_sub(1)..=(row + 1).min(H - 1);
    let cols = col.saturating_sub(1)..=(col + 1).min(W - 1);

    let mut n = 0;
    for r in rows {
        for c in cols.clone() {
            if (r, c) != (row, col) && grid[r][c].is_alive() {
                n += 1;
            }
        }
    }
    n
}

/// Conway's B3/S23 rule.
pub fn next_state(current: Cell, neighbors: u8) -> Cell {
    match (current, neighbors) {
        (Cell::Alive, 2 | 3) => Cell::Alive,
        (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}
