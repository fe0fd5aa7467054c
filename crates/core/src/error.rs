//! Error types for the particle field core.

use thiserror::Error;

/// Errors produced around the field: configuration, colors, surfaces, I/O.
///
/// The per-frame simulation itself never fails; these cover the ambient
/// edges (parsing overrides, allocating a raster, writing snapshots).
#[derive(Debug, Error)]
pub enum FieldError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The host had no drawing surface or refused to schedule frames.
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    /// A configuration value was out of range or inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing output (e.g. a PNG snapshot) failed.
    #[error("i/o error: {0}")]
    Io(String),
}
