//! The drawing seam between the Stepper and whatever shows pixels.
//!
//! The Stepper only ever clears the surface, fills circles, and strokes
//! lines. Implementations: [`RecordingSurface`] (here, for tests and
//! inspection), the CPU raster in `particle-field-raster`, and the 2D canvas
//! in `particle-field-wasm`.

use crate::color::Srgb;
use glam::DVec2;

/// A 2D drawing target in surface pixel space.
pub trait Surface {
    /// Clears the `width × height` region to fully transparent.
    fn clear(&mut self, width: f64, height: f64);

    /// Fills a circle centered at `center` with `color` at `alpha`.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64);

    /// Strokes a straight line of `width` px from `from` to `to`.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb, alpha: f64);
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Srgb,
        alpha: f64,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Srgb,
        alpha: f64,
    },
}

/// Keeps every draw call in order instead of rasterizing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forgets recorded calls, e.g. between frames.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb, alpha: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut s = RecordingSurface::new();
        s.clear(10.0, 20.0);
        s.fill_circle(DVec2::new(1.0, 2.0), 3.0, Srgb::new(1, 2, 3), 0.5);
        s.stroke_line(DVec2::ZERO, DVec2::ONE, 0.5, Srgb::new(4, 5, 6), 0.1);
        assert_eq!(s.commands().len(), 3);
        assert!(matches!(s.commands()[0], DrawCommand::Clear { width, height } if width == 10.0 && height == 20.0));
        assert_eq!(s.circles().count(), 1);
        assert_eq!(s.lines().count(), 1);
    }

    #[test]
    fn reset_forgets_commands() {
        let mut s = RecordingSurface::new();
        s.clear(1.0, 1.0);
        s.reset();
        assert!(s.commands().is_empty());
    }

    #[test]
    fn surface_is_object_safe() {
        let mut s = RecordingSurface::new();
        let dyn_surface: &mut dyn Surface = &mut s;
        dyn_surface.clear(4.0, 4.0);
        assert_eq!(s.commands().len(), 1);
    }
}
