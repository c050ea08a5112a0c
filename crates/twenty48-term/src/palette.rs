use std::collections::BTreeMap;

use anyhow::{Result, bail};
use twenty48_core::Tile;

/// 24-bit colour as `[r, g, b]`.
pub type Rgb = [u8; 3];

/// Palette section as written in the config file.
///
/// Keys are tile values as strings (`"0"` is the empty cell); anything left
/// out keeps the built-in colour.
#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
pub struct PaletteConfig {
    #[serde(default)]
    pub fallback: Option<Rgb>,
    #[serde(default)]
    pub text: Option<Rgb>,
    #[serde(default)]
    pub colors: BTreeMap<String, Rgb>,
}

/// Resolved tile colours handed to the presenter at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: BTreeMap<Tile, Rgb>,
    fallback: Rgb,
    text: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = [
            (0, [205, 193, 180]),
            (2, [238, 228, 218]),
            (4, [237, 224, 200]),
            (8, [242, 177, 121]),
            (16, [245, 149, 99]),
            (32, [246, 124, 95]),
            (64, [246, 94, 59]),
            (128, [237, 207, 114]),
            (256, [237, 204, 97]),
            (512, [237, 200, 80]),
            (1024, [237, 197, 63]),
            (2048, [237, 194, 46]),
        ]
        .into_iter()
        .collect();
        Self {
            colors,
            fallback: [0, 0, 0],
            text: [0, 0, 0],
        }
    }
}

impl Palette {
    /// Built-in colours overlaid with whatever the config sets.
    pub fn from_config(cfg: &PaletteConfig) -> Result<Self> {
        let mut palette = Palette::default();
        for (key, &rgb) in &cfg.colors {
            let tile: Tile = match key.trim().parse() {
                Ok(v) => v,
                Err(_) => bail!("palette key '{key}' is not a tile value"),
            };
            if tile != 0 && (tile < 2 || !tile.is_power_of_two()) {
                bail!("palette key {tile} is not 0 or a power of two");
            }
            palette.colors.insert(tile, rgb);
        }
        if let Some(rgb) = cfg.fallback {
            palette.fallback = rgb;
        }
        if let Some(rgb) = cfg.text {
            palette.text = rgb;
        }
        Ok(palette)
    }

    /// Background for `tile`; values without an entry get the fallback.
    pub fn background(&self, tile: Tile) -> Rgb {
        self.colors.get(&tile).copied().unwrap_or(self.fallback)
    }

    pub fn text(&self) -> Rgb {
        self.text
    }

    /// Empty-cell colour, also used behind the whole board.
    pub fn board(&self) -> Rgb {
        self.background(0)
    }
}
