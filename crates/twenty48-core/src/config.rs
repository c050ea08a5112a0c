use std::path::Path;

use anyhow::{Context, Result};

use crate::error::GameError;

/// Side length used when nothing else is configured.
pub const DEFAULT_BOARD_SIZE: usize = 4;
/// Tiles placed on an empty board by `start`/`reset`.
pub const DEFAULT_INITIAL_TILES: usize = 2;

/// Rules knobs for a session. Every field may be omitted in TOML.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct GameConfig {
    #[serde(default = "defaults::board_size")]
    pub board_size: usize,
    #[serde(default = "defaults::initial_tiles")]
    pub initial_tiles: usize,
    /// Maximum number of undo snapshots kept; `None` keeps them all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undo_limit: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            initial_tiles: defaults::initial_tiles(),
            undo_limit: None,
        }
    }
}

impl GameConfig {
    /// Same defaults, different side length.
    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    /// Reject configurations a session could not honour.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.board_size < 2 {
            return Err(GameError::invalid(format!(
                "board_size must be at least 2, got {}",
                self.board_size
            )));
        }
        let cells = self.board_size * self.board_size;
        if self.initial_tiles == 0 || self.initial_tiles > cells {
            return Err(GameError::invalid(format!(
                "initial_tiles must be in 1..={cells}, got {}",
                self.initial_tiles
            )));
        }
        if self.undo_limit == Some(0) {
            return Err(GameError::invalid("undo_limit must be positive when set"));
        }
        Ok(())
    }

    /// Load a rules file with the fields at top level, then validate it.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: Self =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

mod defaults {
    pub fn board_size() -> usize { super::DEFAULT_BOARD_SIZE }
    pub fn initial_tiles() -> usize { super::DEFAULT_INITIAL_TILES }
}
