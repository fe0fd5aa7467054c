//! Field State and the Field Initializer.
//!
//! [`FieldState`] owns the current generation of particles, the surface
//! dimensions they were sized for, and the last known pointer position.
//! [`FieldState::populate`] replaces the whole generation whenever the
//! surface size becomes known or changes; there is no incremental resize.

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::prng::Xorshift64;
use glam::DVec2;

/// Number of particles for a surface: `floor(width * height / divisor)`.
///
/// Zero when either dimension is zero.
pub fn particle_count(width: usize, height: usize, divisor: f64) -> usize {
    ((width as f64 * height as f64) / divisor).floor() as usize
}

/// Particles, surface size, and pointer for one mounted field.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    particles: Vec<Particle>,
    width: usize,
    height: usize,
    pointer: DVec2,
    generation: u64,
}

impl FieldState {
    /// An empty field with no surface yet and the pointer at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// A field over a `width × height` surface holding exactly `particles`.
    ///
    /// Ids are taken as given; callers keep them unique.
    pub fn with_particles(width: usize, height: usize, particles: Vec<Particle>) -> Self {
        Self {
            particles,
            width,
            height,
            pointer: DVec2::ZERO,
            generation: 1,
        }
    }

    /// Replaces the particle set with a fresh generation sized to
    /// `width × height`.
    ///
    /// Ids restart at zero. Positions are uniform in `[0, width) × [0, height)`,
    /// velocity components in `[-max_speed, max_speed]`, radius in
    /// `[radius_min, radius_max)`, opacity in `[opacity_min, opacity_max)`.
    pub fn populate(
        &mut self,
        width: usize,
        height: usize,
        rng: &mut Xorshift64,
        config: &FieldConfig,
    ) {
        let count = particle_count(width, height, config.density_divisor);
        let (w, h) = (width as f64, height as f64);

        self.particles = (0..count)
            .map(|id| {
                let position = DVec2::new(rng.uniform(0.0, w), rng.uniform(0.0, h));
                let velocity = DVec2::new(
                    rng.symmetric(config.max_speed),
                    rng.symmetric(config.max_speed),
                );
                let radius = rng.uniform(config.radius_min, config.radius_max);
                let opacity = rng.uniform(config.opacity_min, config.opacity_max);
                Particle::new(id, position, velocity, radius, opacity)
            })
            .collect();
        self.width = width;
        self.height = height;
        self.generation += 1;

        log::debug!(
            "field generation {} populated: {count} particles for {width}x{height}",
            self.generation
        );
    }

    /// Current generation in id order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for the Stepper. The set's length never changes here.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Surface width the current generation was sized for.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Surface height the current generation was sized for.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Last pointer position in surface pixels. Starts at the origin.
    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    /// Records a pointer move. Never triggers drawing.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = DVec2::new(x, y);
    }

    /// How many times the set has been populated (0 before the first size).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops all particles, e.g. when the hosting view goes away.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
