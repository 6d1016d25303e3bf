use std::{fs, io, path::{Path, PathBuf}, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub step_interval_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub alive_char: char,
    pub dead_char: char,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Tracing output goes here; nothing is logged when unset.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { step_interval_ms: 500 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            alive_char: '#',
            dead_char: ' ',
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".into(),
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timing.step_interval_ms == 0 {
            return Err(Error::InvalidConfig("timing.step_interval_ms must be positive".into()));
        }
        if self.display.alive_char.is_control() || self.display.dead_char.is_control() {
            return Err(Error::InvalidConfig("display characters must be printable".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.timing.step_interval_ms)
    }
}
