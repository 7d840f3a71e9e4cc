// src/config.rs
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "scope.json";

/// Panel indices the scope starts with; the source is configured from them too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InitialSettings {
    pub zoom: usize,
    pub rate: usize,
    pub range: usize,
    pub mode: usize,
}

impl Default for InitialSettings {
    fn default() -> Self {
        Self {
            zoom: 0,
            rate: 8,
            range: 3,
            mode: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub title: String,
    pub window_size: (u32, u32),
    /// The plot takes at most this much of the window; the panel sits below.
    pub plot_max: (u32, u32),
    pub button_size: (i32, i32),
    pub font_size: f32,
    pub hud_font_size: f32,
    pub frame_interval_ms: u64,
    pub fps_window: u32,
    pub zoom_levels: usize,
    pub initial: InitialSettings,
    pub i2c_path: String,
    pub force_synthetic: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            title: "Bibi rocks!".to_owned(),
            window_size: (1024, 600),
            plot_max: (1024, 470),
            button_size: (155, 30),
            font_size: 20.0,
            hud_font_size: 30.0,
            frame_interval_ms: 1,
            fps_window: 10,
            zoom_levels: 100,
            initial: InitialSettings::default(),
            i2c_path: "/dev/i2c-1".to_owned(),
            force_synthetic: false,
        }
    }
}

impl ScopeConfig {
    /// A missing file means defaults; a file that does not parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        let config = Self::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
        log::info!("loaded {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Plot area for a window of the given size.
    pub fn plot_size(&self, window: (u32, u32)) -> (i32, i32) {
        (
            window.0.min(self.plot_max.0) as i32,
            window.1.min(self.plot_max.1) as i32,
        )
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
