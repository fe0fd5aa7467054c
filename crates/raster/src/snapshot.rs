//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so the browser build can depend
//! on this crate without pulling in `image`.

use crate::pixel::Raster;
use particle_field_core::{FieldError, Srgb};
use std::path::Path;

/// Writes the raster as a PNG.
///
/// With a `background` the image is opaque, composited over that color;
/// without one it keeps the raster's transparency.
///
/// Returns `FieldError::InvalidDimensions` if the raster size overflows
/// `u32`, or `FieldError::Io` on encode/write failure.
pub fn write_png(raster: &Raster, background: Option<Srgb>, path: &Path) -> Result<(), FieldError> {
    let rgba = match background {
        Some(bg) => raster.composite_over(bg),
        None => raster.to_rgba8(),
    };
    let w = u32::try_from(raster.width()).map_err(|_| FieldError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| FieldError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    log::debug!("wrote {w}x{h} snapshot to {}", path.display());
    Ok(())
}
