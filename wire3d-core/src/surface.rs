/// Drawing-surface abstraction consumed by the core
use nalgebra::Point2;

use crate::config::Style;

/// Primitive drawing operations a front end provides.
///
/// Coordinates are in surface pixels relative to the origin set by
/// `set_origin`.
pub trait DrawSurface {
    /// Draw a filled disc
    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, style: Style);

    /// Stroke a straight line between two points
    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, style: Style);

    /// Clear a rectangular region given by its top-left corner and size
    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Translate the coordinate system so later draws are relative to (x, y)
    fn set_origin(&mut self, x: f64, y: f64);
}

/// A single call made against a `RecordingSurface`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Point2<f64>,
        radius: f64,
        style: Style,
    },
    Line {
        from: Point2<f64>,
        to: Point2<f64>,
        style: Style,
    },
    Clear {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    SetOrigin {
        x: f64,
        y: f64,
    },
}

impl DrawCommand {
    /// Same kind of call with every coordinate within `epsilon`
    pub fn approx_eq(&self, other: &DrawCommand, epsilon: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= epsilon;
        let near = |a: &Point2<f64>, b: &Point2<f64>| close(a.x, b.x) && close(a.y, b.y);
        match (self, other) {
            (
                DrawCommand::Circle { center, radius, style },
                DrawCommand::Circle { center: c, radius: r, style: s },
            ) => near(center, c) && close(*radius, *r) && style == s,
            (
                DrawCommand::Line { from, to, style },
                DrawCommand::Line { from: f, to: t, style: s },
            ) => near(from, f) && near(to, t) && style == s,
            (
                DrawCommand::Clear { x, y, width, height },
                DrawCommand::Clear { x: x2, y: y2, width: w, height: h },
            ) => close(*x, *x2) && close(*y, *y2) && close(*width, *w) && close(*height, *h),
            (DrawCommand::SetOrigin { x, y }, DrawCommand::SetOrigin { x: x2, y: y2 }) => {
                close(*x, *x2) && close(*y, *y2)
            }
            _ => false,
        }
    }
}

/// Surface that only records what it was asked to draw
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, style: Style) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style,
        });
    }

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, style: Style) {
        self.commands.push(DrawCommand::Line { from, to, style });
    }

    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn set_origin(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::SetOrigin { x, y });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;

    const STYLE: Style = Style::new(Color::WHITE);

    #[test]
    fn test_approx_eq_compares_coordinates() {
        let line = |x: f64| DrawCommand::Line {
            from: Point2::new(x, 0.0),
            to: Point2::new(1.0, 1.0),
            style: STYLE,
        };
        assert!(line(0.5).approx_eq(&line(0.5 + 1e-12), 1e-9));
        assert!(!line(0.5).approx_eq(&line(0.6), 1e-9));

        let circle = DrawCommand::Circle {
            center: Point2::new(0.5, 0.0),
            radius: 1.0,
            style: STYLE,
        };
        assert!(!line(0.5).approx_eq(&circle, 1e-9));
    }
}
