#![deny(unsafe_code)]
//! CPU-side drawing surface for the particle field.
//!
//! [`Raster`] implements the core [`Surface`](particle_field_core::Surface)
//! trait on an in-memory RGBA buffer so the field can run headless (CLI,
//! tests). PNG output lives behind the `png` feature (default on).

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::Raster;
