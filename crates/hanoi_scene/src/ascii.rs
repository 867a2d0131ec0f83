//! Terminal preview
//!
//! Rasterizes device-space draw commands into a grid of characters, one cell
//! per device unit. A cell is covered when its center lies inside a rect.

use std::fmt;

use crate::draw::{Color, DrawCommand, Point, Rect};

/// Glyph for an empty cell
pub const BACKGROUND: char = ' ';

/// Glyph for colors without a hue
pub const GRAY: char = '#';

/// Glyphs by hue, in degrees
const HUE_GLYPHS: [(f32, char); 10] = [
    (0.0, 'R'),
    (32.0, 'O'),
    (60.0, 'Y'),
    (88.0, 'L'),
    (120.0, 'G'),
    (180.0, 'C'),
    (208.0, 'A'),
    (240.0, 'B'),
    (272.0, 'V'),
    (328.0, 'P'),
];

/// Character closest to a color's hue
pub fn glyph(color: Color) -> char {
    let max = color.r.max(color.g).max(color.b);
    let min = color.r.min(color.g).min(color.b);
    if max - min <= f32::EPSILON {
        return GRAY;
    }
    let hue = color.hue();
    let distance = |h: f32| {
        let d = (hue - h).abs();
        d.min(360.0 - d)
    };
    HUE_GLYPHS
        .iter()
        .min_by(|a, b| distance(a.0).total_cmp(&distance(b.0)))
        .map_or(GRAY, |&(_, c)| c)
}

/// Character grid
#[derive(Clone, Debug, PartialEq)]
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BACKGROUND; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        if col < self.width && row < self.height {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Replay commands in order
    pub fn draw(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::Clear(rect) => self.paint(*rect, BACKGROUND),
                DrawCommand::FillRect { rect, color } => self.paint(*rect, glyph(*color)),
            }
        }
    }

    fn paint(&mut self, rect: Rect, glyph: char) {
        let cols = Self::span(rect.x(), rect.max_x(), self.width);
        let rows = Self::span(rect.y(), rect.max_y(), self.height);
        for row in rows {
            for col in cols.clone() {
                if rect.contains(Point::new(col as f64 + 0.5, row as f64 + 0.5)) {
                    self.cells[row * self.width + col] = glyph;
                }
            }
        }
    }

    /// Cells whose centers may fall in `[lo, hi)`, clipped to `[0, len)`
    fn span(lo: f64, hi: f64, len: usize) -> std::ops::Range<usize> {
        let start = (lo - 0.5).ceil().clamp(0.0, len as f64) as usize;
        let end = (hi - 0.5).ceil().clamp(0.0, len as f64) as usize;
        start..end.max(start)
    }
}

impl fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: String = row.iter().collect();
            f.write_str(line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleParams;
    use crate::scene::{Scene, Viewport};

    #[test]
    fn test_palette_glyphs_are_distinct() {
        let glyphs: Vec<char> = PuzzleParams::default()
            .palette
            .into_iter()
            .map(glyph)
            .collect();
        assert_eq!(glyphs.iter().collect::<String>(), "ROYLGCABVP");
        assert_eq!(glyph(Color::WHITE), GRAY);
    }

    #[test]
    fn test_fill_covers_cell_centers() {
        let mut canvas = AsciiCanvas::new(4, 3);
        canvas.draw(&[DrawCommand::FillRect {
            rect: Rect::new(0.6, 0.0, 2.0, 1.5),
            color: Color::rgb(0.0, 0.0, 1.0),
        }]);
        // Centers 1.5 and 2.5 fall in [0.6, 2.6); rows 0 only (1.5 is excluded)
        assert_eq!(canvas.get(0, 0), Some(BACKGROUND));
        assert_eq!(canvas.get(1, 0), Some('B'));
        assert_eq!(canvas.get(2, 0), Some('B'));
        assert_eq!(canvas.get(3, 0), Some(BACKGROUND));
        assert_eq!(canvas.get(1, 1), Some(BACKGROUND));
        assert_eq!(canvas.get(4, 0), None);
    }

    #[test]
    fn test_out_of_bounds_rect_is_clipped() {
        let mut canvas = AsciiCanvas::new(3, 2);
        canvas.draw(&[DrawCommand::FillRect {
            rect: Rect::new(-10.0, -10.0, 100.0, 100.0),
            color: Color::rgb(1.0, 0.0, 0.0),
        }]);
        assert_eq!(canvas.to_string(), "RRR\nRRR");

        canvas.draw(&[DrawCommand::Clear(Rect::new(-1.0, -1.0, 10.0, 10.0))]);
        assert_eq!(canvas.to_string(), "\n");
    }

    #[test]
    fn test_scene_preview() {
        let mut scene = Scene::new(PuzzleParams::default(), Viewport::new(72.0, 20.0));
        let mut canvas = AsciiCanvas::new(72, 20);
        canvas.draw(&scene.render(0.0));

        // One red disk, cols 11..=24 on rows 15..=17
        let text = canvas.to_string();
        assert_eq!(text.chars().filter(|&c| c == 'R').count(), 14 * 3);
        assert_eq!(canvas.get(11, 15), Some('R'));
        assert_eq!(canvas.get(24, 17), Some('R'));
        assert_eq!(canvas.get(25, 17), Some(BACKGROUND));
        assert_eq!(canvas.get(11, 14), Some(BACKGROUND));
    }
}
