#![deny(unsafe_code)]
//! Core of the ambient particle field drawn behind page content.
//!
//! Provides [`FieldState`] and its Initializer, the per-frame [`step`]
//! algorithm, the [`Surface`] drawing seam, the [`Host`] scheduling seam,
//! and the [`Backdrop`] mount/unmount lifecycle tying them together, plus
//! [`FieldConfig`], [`Srgb`], and the seedable [`Xorshift64`].

pub mod backdrop;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod host;
pub mod particle;
pub mod prng;
pub mod stepper;
pub mod surface;

pub use backdrop::Backdrop;
pub use color::Srgb;
pub use config::FieldConfig;
pub use error::FieldError;
pub use field::{particle_count, FieldState};
pub use host::{FrameHandle, Host, HostEvent, ListenerId, ManualHost};
pub use particle::Particle;
pub use prng::Xorshift64;
pub use stepper::{link_alpha, pointer_impulse, step, FrameStats};
pub use surface::{DrawCommand, RecordingSurface, Surface};
