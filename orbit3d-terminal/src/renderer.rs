/// Software framebuffer presented with truecolor half-block characters
///
/// Every terminal cell shows two vertically stacked pixels: the upper one as
/// the foreground of `▀`, the lower one as the background. Draw calls arrive
/// in logical canvas coordinates and are resampled to the physical grid.
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point2, Vector2};
use orbit3d_core::{DrawSurface, Rgb, Rgba};
use std::io::Write;

const HALF_BLOCK: char = '▀';

/// Text queued by the frame, drawn over the pixels when presenting
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub column: u16,
    pub row: u16,
    pub text: String,
    pub color: Rgba,
}

pub struct Framebuffer {
    width: usize,
    height: usize,
    logical_width: u32,
    logical_height: u32,
    column_offset: u16,
    pixels: Vec<Rgb>,
    labels: Vec<Label>,
}

impl Framebuffer {
    /// `columns × rows` terminal cells showing a `logical_width × logical_height` canvas.
    pub fn new(columns: u16, rows: u16, logical_width: u32, logical_height: u32) -> Self {
        let width = columns.max(1) as usize;
        let height = rows.max(1) as usize * 2;
        Self {
            width,
            height,
            logical_width,
            logical_height,
            column_offset: 0,
            pixels: vec![Rgb::new(0, 0, 0); width * height],
            labels: Vec::new(),
        }
    }

    /// The largest square pixel grid that fits a `columns × rows` terminal,
    /// centered horizontally.
    pub fn fit(columns: u16, rows: u16, logical_width: u32, logical_height: u32) -> Self {
        let side = columns.min(rows.saturating_mul(2)).max(2);
        let mut framebuffer = Self::new(side, side / 2, logical_width, logical_height);
        framebuffer.column_offset = columns.saturating_sub(side) / 2;
        framebuffer
    }

    /// Physical size in pixels
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Logical units per physical pixel along x and y
    fn scale(&self) -> Vector2<f32> {
        Vector2::new(
            self.logical_width as f32 / self.width as f32,
            self.logical_height as f32 / self.height as f32,
        )
    }

    /// Center of a physical pixel in logical coordinates
    fn sample_point(&self, x: usize, y: usize) -> Point2<f32> {
        let scale = self.scale();
        Point2::new((x as f32 + 0.5) * scale.x, (y as f32 + 0.5) * scale.y)
    }

    /// Physical pixels whose centers may fall inside a logical bounding box
    fn covering(&self, min: Point2<f32>, max: Point2<f32>) -> Option<(usize, usize, usize, usize)> {
        let scale = self.scale();
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let min_x = (min.x / scale.x).floor().max(0.0);
        let min_y = (min.y / scale.y).floor().max(0.0);
        let max_x = (max.x / scale.x).ceil().min(self.width as f32 - 1.0);
        let max_y = (max.y / scale.y).ceil().min(self.height as f32 - 1.0);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some((min_x as usize, max_x as usize, min_y as usize, max_y as usize))
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let idx = y * self.width + x;
        let dst = self.pixels[idx];
        let a = color.a as f32 / 255.0;
        let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        self.pixels[idx] = Rgb::new(mix(color.r, dst.r), mix(color.g, dst.g), mix(color.b, dst.b));
    }

    /// Fill every pixel whose center passes `inside`, within a logical bounding box
    fn fill_where<F>(&mut self, min: Point2<f32>, max: Point2<f32>, color: Rgba, inside: F)
    where
        F: Fn(Point2<f32>) -> bool,
    {
        let Some((min_x, max_x, min_y, max_y)) = self.covering(min, max) else {
            return;
        };
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if inside(self.sample_point(x, y)) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Half the diagonal of a physical pixel in logical units; the thinnest visible stroke
    fn min_half_width(&self) -> f32 {
        self.scale().norm() / 2.0
    }

    /// Write the frame to `writer`, one terminal row per pair of pixel rows.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.height / 2 {
            writer.queue(cursor::MoveTo(self.column_offset, row as u16))?;
            let mut current: Option<(Rgb, Rgb)> = None;
            for x in 0..self.width {
                let top = self.pixel(x, row * 2);
                let bottom = self.pixel(x, row * 2 + 1);
                if current != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(terminal_color(top)))?;
                    writer.queue(SetBackgroundColor(terminal_color(bottom)))?;
                    current = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }

        for label in &self.labels {
            let x = (label.column as usize).min(self.width - 1);
            let y = (label.row as usize * 2).min(self.height - 1);
            let under = self.pixel(x, y);
            let a = label.color.a as f32 / 255.0;
            let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
            let color = Rgb::new(
                mix(label.color.r, under.r),
                mix(label.color.g, under.g),
                mix(label.color.b, under.b),
            );
            writer.queue(cursor::MoveTo(self.column_offset + label.column, label.row))?;
            writer.queue(SetBackgroundColor(terminal_color(under)))?;
            writer.queue(SetForegroundColor(terminal_color(color)))?;
            writer.queue(Print(&label.text))?;
        }

        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawSurface for Framebuffer {
    fn width(&self) -> u32 {
        self.logical_width
    }

    fn height(&self) -> u32 {
        self.logical_height
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
        self.labels.clear();
    }

    fn fill_ellipse(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        let r = radius.max(self.min_half_width());
        let extent = Vector2::new(r, r);
        self.fill_where(center - extent, center + extent, color, |p| {
            (p - center).norm_squared() <= r * r
        });
    }

    fn stroke_line(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba) {
        let half = (width / 2.0).max(self.min_half_width());
        let extent = Vector2::new(half, half);
        let min = Point2::new(from.x.min(to.x), from.y.min(to.y)) - extent;
        let max = Point2::new(from.x.max(to.x), from.y.max(to.y)) + extent;
        self.fill_where(min, max, color, |p| distance_to_segment(p, from, to) <= half);
    }

    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: Rgba, outline_width: f32) {
        let [v0, v1, v2] = points;
        let min = Point2::new(v0.x.min(v1.x).min(v2.x), v0.y.min(v1.y).min(v2.y));
        let max = Point2::new(v0.x.max(v1.x).max(v2.x), v0.y.max(v1.y).max(v2.y));
        self.fill_where(min, max, color, |p| {
            matches!(barycentric(v0, v1, v2, p), Some((w0, w1, w2)) if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
        });

        if outline_width > 0.0 && color.a == 255 {
            for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
                self.stroke_line(a, b, outline_width, color);
            }
        }
    }

    fn draw_text(&mut self, position: Point2<f32>, text: &str, color: Rgba) {
        let scale = self.scale();
        let column = (position.x / scale.x).max(0.0) as usize;
        let row = (position.y / scale.y / 2.0).max(0.0) as usize;
        self.labels.push(Label {
            column: column.min(self.width - 1) as u16,
            row: row.min(self.height / 2 - 1) as u16,
            text: text.to_string(),
            color,
        });
    }
}

fn terminal_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    p: Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

fn distance_to_segment(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let length_squared = ab.norm_squared();
    if length_squared == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / length_squared).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::new(255, 0, 0, 255);
    const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// 80 × 80 pixels over an 800 × 800 canvas: one pixel per 10 logical units
    fn framebuffer() -> Framebuffer {
        let mut fb = Framebuffer::new(80, 40, 800, 800);
        fb.clear(BLACK);
        fb
    }

    #[test]
    fn test_size_and_clear() {
        let mut fb = Framebuffer::new(80, 40, 800, 800);
        assert_eq!(fb.size(), (80, 80));
        fb.clear(Rgb::new(40, 63, 86));
        assert_eq!(fb.pixel(0, 0), Rgb::new(40, 63, 86));
        assert_eq!(fb.pixel(79, 79), Rgb::new(40, 63, 86));
    }

    #[test]
    fn test_fit_keeps_pixels_square_and_centered() {
        let fb = Framebuffer::fit(200, 50, 800, 800);
        assert_eq!(fb.size(), (100, 100));
        assert_eq!(fb.column_offset, 50);

        let narrow = Framebuffer::fit(60, 50, 800, 800);
        assert_eq!(narrow.size(), (60, 60));
        assert_eq!(narrow.column_offset, 0);
    }

    #[test]
    fn test_fill_triangle_either_winding() {
        for points in [
            [Point2::new(100.0, 100.0), Point2::new(700.0, 100.0), Point2::new(100.0, 700.0)],
            [Point2::new(100.0, 100.0), Point2::new(100.0, 700.0), Point2::new(700.0, 100.0)],
        ] {
            let mut fb = framebuffer();
            fb.fill_triangle(points, RED, 0.0);
            assert_eq!(fb.pixel(20, 20), Rgb::new(255, 0, 0));
            assert_eq!(fb.pixel(70, 70), BLACK);
        }
    }

    #[test]
    fn test_offscreen_and_degenerate_triangles() {
        let mut fb = framebuffer();
        fb.fill_triangle(
            [Point2::new(-900.0, -900.0), Point2::new(-800.0, -900.0), Point2::new(-900.0, -800.0)],
            RED,
            1.0,
        );
        fb.fill_triangle(
            [Point2::new(0.0, 0.0), Point2::new(400.0, 400.0), Point2::new(800.0, 800.0)],
            Rgba::new(255, 0, 0, 128),
            0.0,
        );
        fb.fill_triangle(
            [Point2::new(f32::NAN, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 0.0)],
            RED,
            0.0,
        );
        assert!(fb.pixels.iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_alpha_blending() {
        let mut fb = framebuffer();
        fb.fill_ellipse(Point2::new(400.0, 400.0), 50.0, Rgba::new(200, 100, 0, 0));
        assert_eq!(fb.pixel(40, 40), BLACK);

        fb.fill_ellipse(Point2::new(400.0, 400.0), 50.0, Rgba::new(200, 100, 0, 255));
        assert_eq!(fb.pixel(40, 40), Rgb::new(200, 100, 0));

        fb.clear(Rgb::new(0, 0, 0));
        fb.fill_ellipse(Point2::new(400.0, 400.0), 50.0, Rgba::new(200, 100, 0, 51));
        assert_eq!(fb.pixel(40, 40), Rgb::new(40, 20, 0));
    }

    #[test]
    fn test_ellipse_radius() {
        let mut fb = framebuffer();
        fb.fill_ellipse(Point2::new(400.0, 400.0), 100.0, RED);
        assert_eq!(fb.pixel(40, 40), Rgb::new(255, 0, 0));
        assert_eq!(fb.pixel(45, 40), Rgb::new(255, 0, 0));
        assert_eq!(fb.pixel(52, 40), BLACK);
    }

    #[test]
    fn test_thin_line_still_visible() {
        let mut fb = framebuffer();
        fb.stroke_line(Point2::new(5.0, 405.0), Point2::new(795.0, 405.0), 0.1, RED);
        for x in 0..80 {
            assert_eq!(fb.pixel(x, 40), Rgb::new(255, 0, 0), "gap at x = {}", x);
        }
        assert_eq!(fb.pixel(40, 45), BLACK);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert!((distance_to_segment(Point2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(Point2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-6);
        assert!((distance_to_segment(Point2::new(1.0, 1.0), a, a) - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_labels_are_placed_in_cells() {
        let mut fb = framebuffer();
        fb.draw_text(Point2::new(600.0, 50.0), "FPS: 59.94", Rgba::new(17, 204, 255, 102));
        assert_eq!(fb.labels()[0].column, 60);
        assert_eq!(fb.labels()[0].row, 2);
        fb.clear(BLACK);
        assert!(fb.labels().is_empty());
    }

    #[test]
    fn test_draw_emits_half_blocks_and_labels() {
        let mut fb = Framebuffer::new(4, 2, 800, 800);
        fb.clear(Rgb::new(40, 63, 86));
        fb.draw_text(Point2::new(0.0, 0.0), "hi", Rgba::new(255, 255, 255, 255));
        let mut out = Vec::new();
        fb.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 8);
        assert!(text.contains("hi"));
    }
}
