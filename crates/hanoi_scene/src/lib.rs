//! Hanoi Scene
//!
//! An endlessly self-solving Towers of Hanoi, drawn frame by frame.
//!
//! # Features
//!
//! - **Puzzle**: iterative solver that animates each disk move and grows the
//!   tower by one disk after every solved round
//! - **Scene**: maps the puzzle onto a surface and records draw commands
//! - **ASCII Preview**: rasterizes recorded frames for a terminal
//! - **Config**: `hanoi.toml` with per-key defaults

pub mod ascii;
pub mod config;
pub mod draw;
pub mod error;
pub mod puzzle;
pub mod scene;

pub use ascii::AsciiCanvas;
pub use config::{DisplayConfig, PuzzleConfig, SceneConfig, CONFIG_FILE};
pub use draw::{Affine2D, Color, DrawCommand, DrawContext, Point, Rect, RecordingContext, Size};
pub use error::{Result, SceneError};
pub use puzzle::{DiskMove, Peg, Phase, Puzzle, PuzzleEvent, PuzzleParams};
pub use scene::{Scene, Viewport};
