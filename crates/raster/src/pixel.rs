//! Anti-aliased circle and line rasterization onto an RGBA buffer.
//!
//! Pixels are stored premultiplied and composited source-over, the way a
//! 2D canvas context blends `fill()` and `stroke()` by default. Coverage is
//! estimated per pixel from the distance between the pixel center and the
//! shape edge, which is plenty for sub-3px dots and half-pixel lines.

use glam::DVec2;
use particle_field_core::{FieldError, Srgb, Surface};
use std::ops::Range;

/// Premultiplied RGBA in `[0, 1]`.
type Premul = [f32; 4];

/// A `width × height` RGBA drawing surface in memory.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Premul>,
}

impl Raster {
    /// A fully transparent raster.
    ///
    /// Returns `FieldError::InvalidDimensions` if either dimension is zero
    /// or `width * height` overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(FieldError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Alpha of the pixel at `(x, y)` in `[0, 1]`, or `None` outside.
    pub fn alpha_at(&self, x: usize, y: usize) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x][3])
    }

    /// Straight (non-premultiplied) RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, a]| {
                if a <= 0.0 {
                    return [0, 0, 0, 0];
                }
                [to_byte(r / a), to_byte(g / a), to_byte(b / a), to_byte(a)]
            })
            .collect()
    }

    /// Opaque RGBA8 bytes with the raster composited over `background`.
    pub fn composite_over(&self, background: Srgb) -> Vec<u8> {
        let bg = [
            f32::from(background.r) / 255.0,
            f32::from(background.g) / 255.0,
            f32::from(background.b) / 255.0,
        ];
        self.pixels
            .iter()
            .flat_map(|&[r, g, b, a]| {
                let keep = 1.0 - a;
                [
                    to_byte(r + bg[0] * keep),
                    to_byte(g + bg[1] * keep),
                    to_byte(b + bg[2] * keep),
                    255,
                ]
            })
            .collect()
    }

    /// Source-over blend of `color` at `alpha` onto one pixel.
    fn blend(&mut self, x: usize, y: usize, color: Srgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let dst = &mut self.pixels[y * self.width + x];
        let keep = 1.0 - alpha;
        dst[0] = f32::from(color.r) / 255.0 * alpha + dst[0] * keep;
        dst[1] = f32::from(color.g) / 255.0 * alpha + dst[1] * keep;
        dst[2] = f32::from(color.b) / 255.0 * alpha + dst[2] * keep;
        dst[3] = alpha + dst[3] * keep;
    }

    /// Pixel index ranges covering `[min, max]`, clipped to the raster.
    ///
    /// `None` when the box is empty, off-raster, or not finite.
    fn clip(&self, min: DVec2, max: DVec2) -> Option<(Range<usize>, Range<usize>)> {
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0..x1, y0..y1))
    }

    /// Calls `cover` with each pixel center in the clipped box and blends the
    /// returned coverage.
    fn shade(
        &mut self,
        min: DVec2,
        max: DVec2,
        color: Srgb,
        alpha: f64,
        cover: impl Fn(DVec2) -> f64,
    ) {
        let Some((xs, ys)) = self.clip(min, max) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = cover(center).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, (alpha * coverage) as f32);
                }
            }
        }
    }
}

impl Surface for Raster {
    fn clear(&mut self, width: f64, height: f64) {
        let Some((xs, ys)) = self.clip(DVec2::ZERO, DVec2::new(width, height)) else {
            return;
        };
        for y in ys {
            let row = y * self.width;
            self.pixels[row + xs.start..row + xs.end].fill([0.0; 4]);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64) {
        let reach = DVec2::splat(radius + 1.0);
        self.shade(center - reach, center + reach, color, alpha, |p| {
            radius + 0.5 - p.distance(center)
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb, alpha: f64) {
        let half = width / 2.0;
        let reach = DVec2::splat(half + 1.0);
        self.shade(from.min(to) - reach, from.max(to) + reach, color, alpha, |p| {
            half + 0.5 - distance_to_segment(p, from, to)
        });
    }
}

/// Shortest distance from `p` to the segment `a`–`b`.
fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
