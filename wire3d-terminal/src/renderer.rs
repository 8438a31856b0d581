/// Character-cell canvas implementing the core drawing surface
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use wire3d_core::{DrawSurface, Style};

/// Terminal cells are roughly twice as tall as they are wide, so one cell
/// row spans two canvas pixels vertically.
pub const CELL_ASPECT: f64 = 2.0;

const POINT_CHAR: char = '@';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Option<Color>,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: None,
    };
}

/// Grid of character cells addressed in canvas pixels.
///
/// A canvas of `cols` x `rows` cells is `cols` pixels wide and
/// `rows * CELL_ASPECT` pixels tall.
pub struct CharCanvas {
    cols: usize,
    rows: usize,
    origin: (f64, f64),
    cells: Vec<Cell>,
}

impl CharCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            origin: (0.0, 0.0),
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    /// Size in canvas pixels
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.cols as f64, self.rows as f64 * CELL_ASPECT)
    }

    /// Canvas pixel under the centre of a terminal cell
    pub fn cell_to_pixel(column: u16, row: u16) -> (f64, f64) {
        (column as f64 + 0.5, (row as f64 + 0.5) * CELL_ASPECT)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Cell containing a point given relative to the origin
    fn locate(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = (x + self.origin.0).floor();
        let row = ((y + self.origin.1) / CELL_ASPECT).floor();
        if col < 0.0 || row < 0.0 || !col.is_finite() || !row.is_finite() {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    fn plot(&mut self, x: f64, y: f64, ch: char, style: Style) {
        if let Some((col, row)) = self.locate(x, y) {
            self.cells[row * self.cols + col] = Cell {
                ch,
                color: Some(to_terminal_color(style)),
            };
        }
    }

    /// Liang-Barsky clip of a segment (relative to the origin) to the canvas.
    ///
    /// `None` when the segment misses the canvas or has a non-finite endpoint.
    fn clip(&self, from: Point2<f64>, to: Point2<f64>) -> Option<(Point2<f64>, Point2<f64>)> {
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (width, height) = self.pixel_size();
        let (ox, oy) = self.origin;
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let edges = [
            (-dx, from.x + ox),
            (dx, width - ox - from.x),
            (-dy, from.y + oy),
            (dy, height - oy - from.y),
        ];

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| Point2::new(from.x + dx * t, from.y + dy * t);
        Some((at(t0), at(t1)))
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                if let Some(color) = cell.color {
                    writer.queue(SetForegroundColor(color))?;
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_terminal_color(style: Style) -> Color {
    Color::Rgb {
        r: style.color.r,
        g: style.color.g,
        b: style.color.b,
    }
}

/// Glyph following the on-screen slope of a line
fn line_glyph(dx_cells: f64, dy_cells: f64) -> char {
    let (ax, ay) = (dx_cells.abs(), dy_cells.abs());
    if ay < ax * 0.5 {
        '-'
    } else if ax < ay * 0.5 {
        '|'
    } else if (dx_cells > 0.0) == (dy_cells > 0.0) {
        '\\'
    } else {
        '/'
    }
}

impl DrawSurface for CharCanvas {
    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, style: Style) {
        let (ox, oy) = self.origin;
        let min_col = ((center.x + ox - radius).floor().max(0.0)) as usize;
        let max_col = (center.x + ox + radius).ceil().max(0.0) as usize;
        let min_row = (((center.y + oy - radius) / CELL_ASPECT).floor().max(0.0)) as usize;
        let max_row = ((center.y + oy + radius) / CELL_ASPECT).ceil().max(0.0) as usize;

        for row in min_row..=max_row.min(self.rows.saturating_sub(1)) {
            for col in min_col..=max_col.min(self.cols.saturating_sub(1)) {
                let (px, py) = Self::cell_to_pixel(col as u16, row as u16);
                let (dx, dy) = (px - ox - center.x, py - oy - center.y);
                if dx * dx + dy * dy <= radius * radius {
                    self.plot(px - ox, py - oy, POINT_CHAR, style);
                }
            }
        }
        // Small markers still get their centre cell
        self.plot(center.x, center.y, POINT_CHAR, style);
    }

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, style: Style) {
        let glyph = line_glyph(to.x - from.x, (to.y - from.y) / CELL_ASPECT);
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };

        // Clipped to the canvas, so the step count is bounded by its size
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = dx.abs().max((dy / CELL_ASPECT).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(from.x + dx * t, from.y + dy * t, glyph, style);
        }
    }

    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (ox, oy) = self.origin;
        let col0 = (x + ox).floor().max(0.0) as usize;
        let col1 = ((x + ox + width).ceil().max(0.0) as usize).min(self.cols);
        let row0 = ((y + oy) / CELL_ASPECT).floor().max(0.0) as usize;
        let row1 = (((y + oy + height) / CELL_ASPECT).ceil().max(0.0) as usize).min(self.rows);

        for row in row0..row1 {
            for col in col0..col1 {
                self.cells[row * self.cols + col] = Cell::BLANK;
            }
        }
    }

    // Absolute rather than cumulative: a canvas is attached once per size
    fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }
}
