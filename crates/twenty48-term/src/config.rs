use std::path::Path;

use anyhow::{Context, Result};
use twenty48_core::GameConfig;

use crate::palette::PaletteConfig;

/// Whole config file: `[game]` rules plus the `[palette]` colours.
#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }
}
