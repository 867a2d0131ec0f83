//! Error types for hanoi_scene

use thiserror::Error;

/// Errors raised while configuring or running a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// Failed to read or write a config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for a scene
    #[error("Config parsing failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A config value is out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A palette entry is not a `#RGB` or `#RRGGBB` color
    #[error("Invalid color '{0}'")]
    InvalidColor(String),
}

/// Result type for hanoi_scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
