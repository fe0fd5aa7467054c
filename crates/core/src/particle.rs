//! The single entity of the field.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// One dot in the field.
///
/// `id` is unique within a generation and only orders pairs so each link is
/// considered once. `radius` and `opacity` are fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: usize,
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    /// Creates a particle with the given attributes.
    pub fn new(id: usize, position: DVec2, velocity: DVec2, radius: f64, opacity: f64) -> Self {
        Self {
            id,
            position,
            velocity,
            radius,
            opacity,
        }
    }

    /// Advances one frame's displacement.
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Negates the velocity component of each axis whose position lies
    /// outside `[0, width] × [0, height]`. Position is left untouched.
    pub fn reflect(&mut self, width: f64, height: f64) {
        if self.position.x < 0.0 || self.position.x > width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > height {
            self.velocity.y = -self.velocity.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle::new(0, DVec2::new(x, y), DVec2::new(vx, vy), 2.0, 0.5)
    }

    #[test]
    fn integrate_adds_velocity_once() {
        let mut p = at(50.0, 300.0, -0.3, 0.0);
        p.integrate();
        assert!((p.position.x - 49.7).abs() < 1e-12);
        assert_eq!(p.position.y, 300.0);
    }

    #[test]
    fn reflect_inside_bounds_is_noop() {
        let mut p = at(49.7, 300.0, -0.3, 0.1);
        p.reflect(800.0, 600.0);
        assert_eq!(p.velocity, DVec2::new(-0.3, 0.1));
    }

    #[test]
    fn reflect_on_edge_is_noop() {
        let mut p = at(0.0, 600.0, -0.3, 0.2);
        p.reflect(800.0, 600.0);
        assert_eq!(p.velocity, DVec2::new(-0.3, 0.2));
    }

    #[test]
    fn reflect_flips_only_escaping_axis() {
        let mut p = at(-0.1, 300.0, -0.3, 0.2);
        p.reflect(800.0, 600.0);
        assert_eq!(p.velocity, DVec2::new(0.3, 0.2));

        let mut p = at(400.0, 600.5, 0.1, 0.2);
        p.reflect(800.0, 600.0);
        assert_eq!(p.velocity, DVec2::new(0.1, -0.2));
    }

    #[test]
    fn reflect_does_not_move_particle() {
        let mut p = at(-0.1, 700.0, -0.3, 0.2);
        p.reflect(800.0, 600.0);
        assert_eq!(p.position, DVec2::new(-0.1, 700.0));
        assert_eq!(p.velocity, DVec2::new(0.3, -0.2));
    }
}
