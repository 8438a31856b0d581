/// Render configuration: scale, marker size, styles and drag sensitivity
use crate::error::{Error, Result};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#ff8800`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style passed explicitly with every draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: Color,
}

impl Style {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

/// How model space maps onto the drawing surface and how drags map to angles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Drawing-surface pixels per model unit
    pub pixels_per_unit: f64,
    /// Radius of the filled marker drawn at each point, in pixels
    pub point_radius: f64,
    pub edge_style: Style,
    pub point_style: Style,
    /// Degrees of rotation per pixel of pointer movement
    pub degrees_per_pixel: f64,
}

impl RenderConfig {
    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f64) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    pub fn with_point_radius(mut self, point_radius: f64) -> Self {
        self.point_radius = point_radius;
        self
    }

    pub fn with_edge_style(mut self, style: Style) -> Self {
        self.edge_style = style;
        self
    }

    pub fn with_point_style(mut self, style: Style) -> Self {
        self.point_style = style;
        self
    }

    pub fn with_degrees_per_pixel(mut self, degrees_per_pixel: f64) -> Self {
        self.degrees_per_pixel = degrees_per_pixel;
        self
    }

    /// Check that every field holds a usable value
    pub fn validate(&self) -> Result<()> {
        if !self.pixels_per_unit.is_finite() || self.pixels_per_unit <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "pixels_per_unit must be positive and finite, got {}",
                self.pixels_per_unit
            )));
        }
        if !self.point_radius.is_finite() || self.point_radius < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "point_radius must be non-negative and finite, got {}",
                self.point_radius
            )));
        }
        if !self.degrees_per_pixel.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "degrees_per_pixel must be finite, got {}",
                self.degrees_per_pixel
            )));
        }
        Ok(())
    }

    /// Rotation in radians produced by `pixels` of pointer travel
    pub fn drag_angle(&self, pixels: f64) -> f64 {
        (pixels * self.degrees_per_pixel).to_radians()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 100.0,
            point_radius: 3.0,
            edge_style: Style::new(Color::BLACK),
            point_style: Style::new(Color::rgb(0xd0, 0x30, 0x30)),
            degrees_per_pixel: 1.0,
        }
    }
}
