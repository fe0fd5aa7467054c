//! Tunable constants of the particle field.
//!
//! [`FieldConfig::default`] reproduces the backdrop exactly as the page ships
//! it. Overrides arrive as a JSON object (CLI `--params`, wasm options) and
//! are merged key by key onto the defaults, then validated.

use crate::color::Srgb;
use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Surface area (px²) per particle.
const DEFAULT_DENSITY_DIVISOR: f64 = 15_000.0;
/// Half-width of the initial velocity interval, per axis.
const DEFAULT_MAX_SPEED: f64 = 0.25;
const DEFAULT_RADIUS_MIN: f64 = 1.0;
const DEFAULT_RADIUS_MAX: f64 = 3.0;
const DEFAULT_OPACITY_MIN: f64 = 0.2;
const DEFAULT_OPACITY_MAX: f64 = 0.7;
/// Distance below which the pointer pulls on a particle.
const DEFAULT_POINTER_RADIUS: f64 = 100.0;
/// Velocity nudge at zero distance from the pointer.
const DEFAULT_POINTER_STRENGTH: f64 = 0.01;
/// Distance below which two particles are linked.
const DEFAULT_LINK_DISTANCE: f64 = 80.0;
/// Link alpha at zero separation.
const DEFAULT_LINK_ALPHA: f64 = 0.1;
const DEFAULT_LINK_WIDTH: f64 = 0.5;
const DEFAULT_PARTICLE_COLOR: Srgb = Srgb::new(254, 128, 25);
const DEFAULT_LINK_COLOR: Srgb = Srgb::new(142, 192, 124);

/// All constants that shape initialization, forces, and drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    pub density_divisor: f64,
    pub max_speed: f64,
    pub radius_min: f64,
    pub radius_max: f64,
    pub opacity_min: f64,
    pub opacity_max: f64,
    pub pointer_radius: f64,
    pub pointer_strength: f64,
    pub link_distance: f64,
    pub link_alpha: f64,
    pub link_width: f64,
    pub particle_color: Srgb,
    pub link_color: Srgb,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: DEFAULT_DENSITY_DIVISOR,
            max_speed: DEFAULT_MAX_SPEED,
            radius_min: DEFAULT_RADIUS_MIN,
            radius_max: DEFAULT_RADIUS_MAX,
            opacity_min: DEFAULT_OPACITY_MIN,
            opacity_max: DEFAULT_OPACITY_MAX,
            pointer_radius: DEFAULT_POINTER_RADIUS,
            pointer_strength: DEFAULT_POINTER_STRENGTH,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_alpha: DEFAULT_LINK_ALPHA,
            link_width: DEFAULT_LINK_WIDTH,
            particle_color: DEFAULT_PARTICLE_COLOR,
            link_color: DEFAULT_LINK_COLOR,
        }
    }
}

impl FieldConfig {
    /// Merges a JSON object of overrides onto the defaults and validates.
    ///
    /// Unknown keys are rejected so a typo does not silently fall back.
    pub fn from_json(overrides: &Value) -> Result<Self, FieldError> {
        let config: FieldConfig = serde_json::from_value(overrides.clone())
            .map_err(|e| FieldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        // Every field serializes to a plain number or string.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Checks ranges and ordering of every numeric field.
    pub fn validate(&self) -> Result<(), FieldError> {
        // Below one px² per particle the count outgrows the surface's pixels.
        if !(self.density_divisor.is_finite() && self.density_divisor >= 1.0) {
            return Err(invalid(format!(
                "density_divisor must be at least 1, got {}",
                self.density_divisor
            )));
        }
        let positive = [
            ("radius_min", self.radius_min),
            ("pointer_radius", self.pointer_radius),
            ("link_distance", self.link_distance),
            ("link_width", self.link_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("max_speed", self.max_speed),
            ("pointer_strength", self.pointer_strength),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        let unit = [
            ("opacity_min", self.opacity_min),
            ("opacity_max", self.opacity_max),
            ("link_alpha", self.link_alpha),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        if !(self.radius_max.is_finite() && self.radius_max >= self.radius_min) {
            return Err(invalid(format!(
                "radius_max ({}) must be >= radius_min ({})",
                self.radius_max, self.radius_min
            )));
        }
        if self.opacity_max < self.opacity_min {
            return Err(invalid(format!(
                "opacity_max ({}) must be >= opacity_min ({})",
                self.opacity_max, self.opacity_min
            )));
        }
        Ok(())
    }

    /// Describes every key: type, default, range, and meaning.
    pub fn schema() -> Value {
        json!({
            "density_divisor": {
                "type": "number",
                "default": DEFAULT_DENSITY_DIVISOR,
                "min": 1.0,
                "description": "Surface area in px² per particle: count = floor(w * h / divisor)"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.0,
                "description": "Initial velocity components are drawn from [-max_speed, max_speed]"
            },
            "radius_min": {
                "type": "number",
                "default": DEFAULT_RADIUS_MIN,
                "min": 0.0,
                "description": "Smallest dot radius in px (inclusive)"
            },
            "radius_max": {
                "type": "number",
                "default": DEFAULT_RADIUS_MAX,
                "min": 0.0,
                "description": "Largest dot radius in px (exclusive)"
            },
            "opacity_min": {
                "type": "number",
                "default": DEFAULT_OPACITY_MIN,
                "min": 0.0,
                "max": 1.0,
                "description": "Lowest dot alpha (inclusive)"
            },
            "opacity_max": {
                "type": "number",
                "default": DEFAULT_OPACITY_MAX,
                "min": 0.0,
                "max": 1.0,
                "description": "Highest dot alpha (exclusive)"
            },
            "pointer_radius": {
                "type": "number",
                "default": DEFAULT_POINTER_RADIUS,
                "min": 0.0,
                "description": "Pointer attraction reach in px"
            },
            "pointer_strength": {
                "type": "number",
                "default": DEFAULT_POINTER_STRENGTH,
                "min": 0.0,
                "description": "Velocity added per frame at zero distance from the pointer"
            },
            "link_distance": {
                "type": "number",
                "default": DEFAULT_LINK_DISTANCE,
                "min": 0.0,
                "description": "Particles closer than this are joined by a line"
            },
            "link_alpha": {
                "type": "number",
                "default": DEFAULT_LINK_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Line alpha at zero separation, fading linearly to 0 at link_distance"
            },
            "link_width": {
                "type": "number",
                "default": DEFAULT_LINK_WIDTH,
                "min": 0.0,
                "description": "Line stroke width in px"
            },
            "particle_color": {
                "type": "color",
                "default": DEFAULT_PARTICLE_COLOR.to_hex(),
                "description": "Dot hue as #rrggbb"
            },
            "link_color": {
                "type": "color",
                "default": DEFAULT_LINK_COLOR.to_hex(),
                "description": "Line hue as #rrggbb"
            }
        })
    }
}

fn invalid(msg: String) -> FieldError {
    FieldError::InvalidConfig(msg)
}
