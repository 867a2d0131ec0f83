//! Scene configuration
//!
//! Read from a `hanoi.toml`:
//!
//! ```toml
//! [puzzle]
//! move_duration_ms = 1000.0
//! speedup = 0.75
//! max_disk_height = 0.2
//! palette = ["#F00", "#F80", "#FF0", "#8F0", "#0F0", "#0FF", "#08F", "#00F", "#80F", "#F08"]
//!
//! [display]
//! fps = 60
//! width = 72
//! height = 20
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::draw::Color;
use crate::error::{Result, SceneError};
use crate::puzzle::PuzzleParams;

/// Default config file name
pub const CONFIG_FILE: &str = "hanoi.toml";

/// Top-level scene configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub puzzle: PuzzleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Puzzle timing and look
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PuzzleConfig {
    /// Duration of one move in the first round
    #[serde(default = "default_move_duration")]
    pub move_duration_ms: f64,
    /// Move duration factor applied after every round
    #[serde(default = "default_speedup")]
    pub speedup: f64,
    #[serde(default = "default_max_disk_height")]
    pub max_disk_height: f64,
    /// Disk colors as `#RGB` or `#RRGGBB`
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

fn default_move_duration() -> f64 {
    1000.0
}

fn default_speedup() -> f64 {
    0.75
}

fn default_max_disk_height() -> f64 {
    0.2
}

fn default_palette() -> Vec<String> {
    [
        "#F00", "#F80", "#FF0", "#8F0", "#0F0", "#0FF", "#08F", "#00F", "#80F", "#F08",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            move_duration_ms: default_move_duration(),
            speedup: default_speedup(),
            max_disk_height: default_max_disk_height(),
            palette: default_palette(),
        }
    }
}

/// Output settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Target frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Surface width (characters in the terminal preview)
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_fps() -> u32 {
    60
}

fn default_width() -> u32 {
    72
}

fn default_height() -> u32 {
    20
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let puzzle = &self.puzzle;
        if !(puzzle.move_duration_ms.is_finite() && puzzle.move_duration_ms > 0.0) {
            return Err(SceneError::InvalidConfig(format!(
                "move_duration_ms must be positive, got {}",
                puzzle.move_duration_ms
            )));
        }
        if !(puzzle.speedup.is_finite() && puzzle.speedup > 0.0) {
            return Err(SceneError::InvalidConfig(format!(
                "speedup must be positive, got {}",
                puzzle.speedup
            )));
        }
        if !(puzzle.max_disk_height > 0.0 && puzzle.max_disk_height <= 1.0) {
            return Err(SceneError::InvalidConfig(format!(
                "max_disk_height must be in (0, 1], got {}",
                puzzle.max_disk_height
            )));
        }
        if puzzle.palette.is_empty() {
            return Err(SceneError::InvalidConfig("palette is empty".to_string()));
        }
        if self.display.fps == 0 {
            return Err(SceneError::InvalidConfig("fps must be at least 1".to_string()));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(SceneError::InvalidConfig(format!(
                "display must be at least 1x1, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        self.palette_colors().map(|_| ())
    }

    pub fn palette_colors(&self) -> Result<Vec<Color>> {
        self.puzzle
            .palette
            .iter()
            .map(|s| Color::parse_hex(s).ok_or_else(|| SceneError::InvalidColor(s.clone())))
            .collect()
    }

    /// Puzzle parameters described by this config
    pub fn puzzle_params(&self) -> Result<PuzzleParams> {
        Ok(PuzzleParams {
            move_duration: self.puzzle.move_duration_ms,
            speedup: self.puzzle.speedup,
            max_disk_height: self.puzzle.max_disk_height,
            palette: self.palette_colors()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.puzzle.palette.len(), 10);
        assert_eq!(config.display.fps, 60);
    }

    #[test]
    fn test_partial_override() {
        let config = SceneConfig::from_toml_str(
            r#"
            [puzzle]
            speedup = 0.5

            [display]
            width = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.puzzle.speedup, 0.5);
        assert_eq!(config.puzzle.move_duration_ms, 1000.0);
        assert_eq!(config.display.width, 40);
        assert_eq!(config.display.height, 20);
    }

    #[test]
    fn test_default_params_match_puzzle_defaults() {
        let params = SceneConfig::default().puzzle_params().unwrap();
        assert_eq!(params, PuzzleParams::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = SceneConfig::from_toml_str("[puzzle]\nmove_duration_ms = 0.0").unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig(_)));

        let err = SceneConfig::from_toml_str("[puzzle]\nmax_disk_height = 2.0").unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig(_)));

        let err = SceneConfig::from_toml_str("[puzzle]\npalette = [\"#F00\", \"red\"]").unwrap_err();
        assert!(matches!(err, SceneError::InvalidColor(ref c) if c == "red"));

        let err = SceneConfig::from_toml_str("[display]\nfps = 0").unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig(_)));

        let err = SceneConfig::from_toml_str("[puzzle]\nspeedup = \"fast\"").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = SceneConfig::default();
        config.puzzle.speedup = 0.9;
        let text = config.to_toml().unwrap();
        assert_eq!(SceneConfig::from_toml_str(&text).unwrap(), config);
    }
}
