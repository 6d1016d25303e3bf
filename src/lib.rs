//! Conway's Game of Life on a fixed board, viewed through a scrollable
//! window in the terminal, with an editing mode for drawing cells.

pub mod config;
pub mod draw;
pub mod error;
pub mod proc;
pub mod session;
pub mod state;
pub mod viewport;

pub use error::{Error, Result};
