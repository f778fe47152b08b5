use std::{env, fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::snake::{Direction, Tile, TurnRule};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "SNAKE_CONFIG";

/// Largest board side accepted, far beyond any terminal.
pub const MAX_BOARD_SIDE: i32 = 1024;

/// Game settings. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in tiles
    pub width: i32,
    /// Board height in tiles
    pub height: i32,
    /// Pixel size of a tile, passed through to the renderer
    pub tile_size: u32,
    /// Timer period between ticks
    pub tick_interval_ms: u64,
    /// Score awarded per food eaten
    pub score_per_food: u32,
    /// Where the one-tile snake starts after a game over
    pub restart: Tile,
    pub start_direction: Direction,
    pub turn_rule: TurnRule,
    /// Run an extra tick right after each game key
    pub step_on_input: bool,
    /// Keep food off the snake when relocating it
    pub food_avoids_snake: bool,
    pub snake_color: String,
    pub food_color: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 26,
            height: 26,
            tile_size: 16,
            tick_interval_ms: 50,
            score_per_food: 2,
            restart: Tile::new(0, 0),
            start_direction: Direction::Right,
            turn_rule: TurnRule::BlockReverse,
            step_on_input: true,
            food_avoids_snake: false,
            snake_color: "green".to_owned(),
            food_color: "red".to_owned(),
        }
    }
}

impl GameConfig {
    pub fn new(width: i32, height: i32) -> Self {
        GameConfig { width, height, ..Default::default() }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text).context("Invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Loads the file named by `SNAKE_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.width >= 1 && self.height >= 1,
            "Board must be at least 1x1, got {}x{}", self.width, self.height);
        ensure!(self.width <= MAX_BOARD_SIDE && self.height <= MAX_BOARD_SIDE,
            "Board sides are limited to {}, got {}x{}", MAX_BOARD_SIDE, self.width, self.height);
        ensure!(self.tick_interval_ms >= 1, "Tick interval must be at least 1 ms");
        ensure!(self.contains(self.restart),
            "Restart tile ({}, {}) is outside the {}x{} board",
            self.restart.x, self.restart.y, self.width, self.height);
        Ok(())
    }

    fn contains(&self, tile: Tile) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }
}
