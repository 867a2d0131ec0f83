//! Per-frame scene
//!
//! Ties a [`Puzzle`] to a surface size. Each frame is recorded into a
//! [`RecordingContext`] in device space.

use hanoi_animation::EasingTable;

use crate::config::SceneConfig;
use crate::draw::{Affine2D, DrawCommand, RecordingContext};
use crate::error::Result;
use crate::puzzle::{Puzzle, PuzzleEvent, PuzzleParams};

/// Maps puzzle space onto a `width` x `height` surface
///
/// The first peg sits a quarter of the way across, the floor at 90% of the
/// height; one unit is a quarter of the width horizontally and 80% of the
/// height vertically, with y pointing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Puzzle space to device space
    pub fn transform(&self) -> Affine2D {
        Affine2D::translation(0.25 * self.width, 0.9 * self.height)
            .then(&Affine2D::scale(0.25 * self.width, -0.8 * self.height))
    }
}

/// The screensaver scene
#[derive(Debug)]
pub struct Scene {
    puzzle: Puzzle,
    table: EasingTable,
    viewport: Viewport,
    frames: u64,
}

impl Scene {
    pub fn new(params: PuzzleParams, viewport: Viewport) -> Self {
        Self {
            puzzle: Puzzle::new(params),
            table: EasingTable::new(),
            viewport,
            frames: 0,
        }
    }

    /// Build a scene sized by the config's display section
    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        let viewport = Viewport::new(config.display.width as f64, config.display.height as f64);
        Ok(Self::new(config.puzzle_params()?, viewport))
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        tracing::debug!(width, height, "scene resized");
    }

    /// Record the frame at `now` (milliseconds) into `ctx` and advance
    pub fn frame(&mut self, now: f64, ctx: &mut RecordingContext) {
        ctx.set_transform(self.viewport.transform());
        self.puzzle.frame(now, &self.table, ctx);
        self.frames += 1;
    }

    /// Record a frame into a fresh context and return its commands
    pub fn render(&mut self, now: f64) -> Vec<DrawCommand> {
        let mut ctx = RecordingContext::default();
        self.frame(now, &mut ctx);
        ctx.take_commands()
    }

    /// Drain puzzle events
    pub fn take_events(&mut self) -> Vec<PuzzleEvent> {
        self.puzzle.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Point, Rect};

    #[test]
    fn test_viewport_mapping() {
        let t = Viewport::new(800.0, 600.0).transform();
        assert_eq!(t.transform_point(Point::new(0.0, 0.0)), Point::new(200.0, 540.0));

        let p = t.transform_point(Point::new(2.0, 1.0));
        assert!((p.x - 600.0).abs() < 1e-9);
        assert!((p.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_changes_transform() {
        let mut scene = Scene::new(PuzzleParams::default(), Viewport::new(100.0, 100.0));
        scene.resize(400.0, 200.0);
        assert_eq!(scene.viewport(), Viewport::new(400.0, 200.0));

        let commands = scene.render(0.0);
        // Clear area spans the whole surface and more
        let DrawCommand::Clear(rect) = commands[0] else {
            panic!("expected clear first, got {:?}", commands[0]);
        };
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(399.0, 199.0)));
    }

    #[test]
    fn test_first_frame_draws_disk_on_first_peg() {
        let mut scene = Scene::new(PuzzleParams::default(), Viewport::new(400.0, 100.0));
        let commands = scene.render(0.0);
        assert_eq!(commands.len(), 2);
        assert_eq!(scene.frames(), 1);

        let DrawCommand::FillRect { rect, .. } = commands[1] else {
            panic!("expected a disk, got {:?}", commands[1]);
        };
        // 0.75 units wide centered on x = 0, from the floor up 0.2 units
        let expected = Rect::new(62.5, 74.0, 75.0, 16.0);
        assert!((rect.x() - expected.x()).abs() < 1e-9);
        assert!((rect.y() - expected.y()).abs() < 1e-9);
        assert!((rect.width() - expected.width()).abs() < 1e-9);
        assert!((rect.height() - expected.height()).abs() < 1e-9);

        assert_eq!(
            scene.take_events(),
            vec![PuzzleEvent::MoveStarted { disk: 1, from: 0, to: 2 }]
        );
    }

    #[test]
    fn test_from_config() {
        let config = SceneConfig::default();
        let scene = Scene::from_config(&config).unwrap();
        assert_eq!(scene.viewport(), Viewport::new(72.0, 20.0));
        assert_eq!(scene.puzzle().move_duration(), 1000.0);
    }
}
