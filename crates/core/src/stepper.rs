//! The Field Stepper: one frame of update and render.
//!
//! Per frame the surface is cleared, then each particle in sequence order is
//! integrated, reflected at the surface edges, nudged toward the pointer,
//! drawn, and linked to every later particle within reach. Link checks use
//! the later particle's position from the previous frame, since it has not
//! advanced yet.
//!
//! Linking is O(n²) per frame. `n` is bounded by the area density, so a
//! 1920×1080 surface costs ~9.5k pair checks; under load the frame rate
//! drops rather than anything failing.

use crate::config::FieldConfig;
use crate::field::FieldState;
use crate::surface::Surface;
use glam::DVec2;
use serde::Serialize;

/// Counters for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub particles_drawn: usize,
    /// Unordered pairs examined: `n * (n - 1) / 2`.
    pub pair_checks: usize,
    pub links_drawn: usize,
}

/// Velocity added to a particle at `position` by the pointer at `pointer`.
///
/// Linear falloff from `pointer_strength` at distance 0 to nothing at
/// `pointer_radius`. A particle exactly under the pointer gets no force.
/// The result accumulates into velocity every frame with no damping.
pub fn pointer_impulse(position: DVec2, pointer: DVec2, config: &FieldConfig) -> DVec2 {
    let delta = pointer - position;
    let dist = delta.length();
    if dist <= 0.0 || dist >= config.pointer_radius {
        return DVec2::ZERO;
    }
    let force = (config.pointer_radius - dist) / config.pointer_radius;
    delta / dist * force * config.pointer_strength
}

/// Alpha of a link between two particles `distance` apart.
///
/// `link_alpha` at 0, falling linearly to 0 at `link_distance` and beyond.
pub fn link_alpha(distance: f64, config: &FieldConfig) -> f64 {
    if distance < config.link_distance {
        config.link_alpha * (1.0 - distance / config.link_distance)
    } else {
        0.0
    }
}

/// Advances the field one frame and draws it onto `surface`.
pub fn step<S: Surface + ?Sized>(
    state: &mut FieldState,
    surface: &mut S,
    config: &FieldConfig,
) -> FrameStats {
    let width = state.width() as f64;
    let height = state.height() as f64;
    let pointer = state.pointer();
    let mut stats = FrameStats::default();

    surface.clear(width, height);

    let particles = state.particles_mut();
    for i in 0..particles.len() {
        let p = &mut particles[i];
        p.integrate();
        p.reflect(width, height);
        p.velocity += pointer_impulse(p.position, pointer, config);
        let p = *p;

        surface.fill_circle(p.position, p.radius, config.particle_color, p.opacity);
        stats.particles_drawn += 1;

        for q in particles.iter().filter(|q| q.id > p.id) {
            stats.pair_checks += 1;
            let distance = p.position.distance(q.position);
            if distance < config.link_distance {
                surface.stroke_line(
                    p.position,
                    q.position,
                    config.link_width,
                    config.link_color,
                    link_alpha(distance, config),
                );
                stats.links_drawn += 1;
            }
        }
    }

    stats
}
