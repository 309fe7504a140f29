//! Terminal rasterization of a [`DrawList`].
//!
//! Each terminal cell holds two square pixels stacked vertically and drawn
//! with half-block glyphs, so a cell of `width_px x height_px` virtual pixels
//! becomes two pixels of `width_px x height_px / 2`.

use antigrav_core::{Point, Rgb};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::canvas::{DrawList, DrawTriangle};

/// Glyph painting the top half of a cell in the foreground color.
const UPPER_HALF: &str = "▀";
/// Glyph painting the bottom half of a cell in the foreground color.
const LOWER_HALF: &str = "▄";

/// Virtual pixels covered by one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub width_px: f32,
    pub height_px: f32,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

/// Pixel grid at half-cell vertical resolution.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixel_width: f32,
    pixel_height: f32,
    pixels: Vec<Option<Rgb>>,
}

impl Raster {
    /// Create a blank raster covering `cols x rows` terminal cells.
    pub fn new(cols: u16, rows: u16, scale: CellScale) -> Self {
        let width = cols as usize;
        let height = rows as usize * 2;
        Self {
            width,
            height,
            pixel_width: scale.width_px,
            pixel_height: scale.height_px / 2.0,
            pixels: vec![None; width * height],
        }
    }

    /// Rasterize every triangle in draw order; later triangles win.
    pub fn paint(&mut self, draw_list: &DrawList) {
        for triangle in draw_list.triangles() {
            self.fill(triangle);
        }
    }

    /// Color of the pixel at column `x`, pixel row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    fn fill(&mut self, triangle: &DrawTriangle) {
        let vertices = triangle.vertices();
        let min_x = vertices.iter().map(|v| v.x).fold(f32::INFINITY, f32::min);
        let max_x = vertices.iter().map(|v| v.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = vertices.iter().map(|v| v.y).fold(f32::INFINITY, f32::min);
        let max_y = vertices.iter().map(|v| v.y).fold(f32::NEG_INFINITY, f32::max);

        let (x_start, x_end) = pixel_span(min_x, max_x, self.pixel_width, self.width);
        let (y_start, y_end) = pixel_span(min_y, max_y, self.pixel_height, self.height);

        let mut painted = false;
        for y in y_start..y_end {
            for x in x_start..x_end {
                let sample = Point::new(
                    (x as f32 + 0.5) * self.pixel_width,
                    (y as f32 + 0.5) * self.pixel_height,
                );
                if contains(&vertices, sample) {
                    self.pixels[y * self.width + x] = Some(triangle.color);
                    painted = true;
                }
            }
        }

        // Triangles smaller than a pixel still show up as a single dot
        if !painted {
            let center = triangle.transform.translation;
            if center.x >= 0.0 && center.y >= 0.0 {
                let x = (center.x / self.pixel_width) as usize;
                let y = (center.y / self.pixel_height) as usize;
                if x < self.width && y < self.height {
                    self.pixels[y * self.width + x] = Some(triangle.color);
                }
            }
        }
    }

    /// Convert the raster into one line of styled half-block spans per row.
    pub fn into_lines(self) -> Vec<Line<'static>> {
        (0..self.height / 2)
            .map(|row| {
                let spans: Vec<Span> = (0..self.width)
                    .map(|col| render_cell(self.pixel(col, row * 2), self.pixel(col, row * 2 + 1)))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Render a draw list into `area` of the frame.
pub fn render(draw_list: &DrawList, frame: &mut Frame, area: Rect, scale: CellScale) {
    let mut raster = Raster::new(area.width, area.height, scale);
    raster.paint(draw_list);
    frame.render_widget(Paragraph::new(raster.into_lines()), area);
}

fn render_cell(top: Option<Rgb>, bottom: Option<Rgb>) -> Span<'static> {
    match (top, bottom) {
        (None, None) => Span::raw(" "),
        (Some(top), None) => Span::styled(UPPER_HALF, Style::new().fg(top.into())),
        (None, Some(bottom)) => Span::styled(LOWER_HALF, Style::new().fg(bottom.into())),
        (Some(top), Some(bottom)) => {
            Span::styled(UPPER_HALF, Style::new().fg(top.into()).bg(bottom.into()))
        }
    }
}

/// Range of pixel indices whose centers may fall inside `[min, max]`.
fn pixel_span(min: f32, max: f32, pixel: f32, limit: usize) -> (usize, usize) {
    if !(min.is_finite() && max.is_finite()) || max < 0.0 {
        return (0, 0);
    }
    let start = (min / pixel).floor().max(0.0) as usize;
    let end = ((max / pixel).ceil() as usize).min(limit);
    (start.min(end), end)
}

fn edge(a: Point, b: Point, p: Point) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Point-in-triangle test that accepts either winding order.
fn contains(vertices: &[Point; 3], p: Point) -> bool {
    let d1 = edge(vertices[0], vertices[1], p);
    let d2 = edge(vertices[1], vertices[2], p);
    let d3 = edge(vertices[2], vertices[0], p);

    let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_negative && has_positive)
}
