use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the terminal shell and configuration. The board and the
/// interaction state machine never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal i/o failed")]
    Terminal(#[from] io::Error),

    #[error("standard input and output must be a terminal")]
    NotATerminal,

    #[error("terminal of {cols}x{rows} is too small to show the board")]
    TerminalTooSmall { cols: u16, rows: u16 },

    #[error("cannot read config file {}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config syntax")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
