use crate::constants::{DEFAULT_COLOR, DEFAULT_SIZE, SIZE_MAX, SIZE_MIN};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid color {0:?}; expected #rgb or #rrggbb")]
    InvalidColor(String),
    #[error("unknown shape {0:?}")]
    UnknownShape(String),
    #[error("size must be a positive finite number, got {0}")]
    InvalidSize(f32),
}

/// Shape of the product primitive a placement produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    #[default]
    Box,
    Sphere,
    Cylinder,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Sphere => "sphere",
            Shape::Cylinder => "cylinder",
        }
    }
}

impl FromStr for Shape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Shape::Box),
            "sphere" => Ok(Shape::Sphere),
            "cylinder" => Ok(Shape::Cylinder),
            other => Err(ConfigError::UnknownShape(other.to_string())),
        }
    }
}

/// Color, size, and shape the UI controls hold.
///
/// Owned by the UI layer and passed down by value; the viewer never mutates
/// it. Shape only affects objects placed after the change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    pub color: [f32; 3],
    pub size: f32,
    pub shape: Shape,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            size: DEFAULT_SIZE,
            shape: Shape::default(),
        }
    }
}

impl ViewConfig {
    /// Validate raw control values into a config.
    ///
    /// Size is clamped to the slider range after the positivity check, so an
    /// out-of-range but sane value degrades instead of erroring.
    pub fn from_inputs(color: &str, size: f32, shape: &str) -> Result<Self, ConfigError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(ConfigError::InvalidSize(size));
        }
        Ok(Self {
            color: parse_hex_color(color)?,
            size: size.clamp(SIZE_MIN, SIZE_MAX),
            shape: shape.parse()?,
        })
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size.clamp(SIZE_MIN, SIZE_MAX);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }
}

/// Parse `#rgb` or `#rrggbb` into linear-ish normalized RGB.
pub fn parse_hex_color(s: &str) -> Result<[f32; 3], ConfigError> {
    let hex = s
        .strip_prefix('#')
        .ok_or_else(|| ConfigError::InvalidColor(s.to_string()))?;
    let bad = || ConfigError::InvalidColor(s.to_string());
    let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| bad());
    let [r, g, b] = match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                out[i] = v * 17; // 0xf -> 0xff
            }
            out
        }
        6 => [
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ],
        _ => return Err(bad()),
    };
    Ok([
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ])
}
