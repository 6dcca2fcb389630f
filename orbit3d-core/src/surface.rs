/// Immediate-mode 2D drawing target
use nalgebra::Point2;

use crate::color::{Rgb, Rgba};

/// The few raster operations a frame needs. Coordinates are logical pixels
/// with the origin in the top-left corner.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn clear(&mut self, color: Rgb);

    fn fill_ellipse(&mut self, center: Point2<f32>, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba);

    /// Fill a triangle. `outline_width` > 0 also strokes its border in the
    /// same color, which hides seams between neighbouring triangles.
    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: Rgba, outline_width: f32);

    fn draw_text(&mut self, position: Point2<f32>, text: &str, color: Rgba);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Ellipse {
        center: Point2<f32>,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Point2<f32>,
        to: Point2<f32>,
        width: f32,
        color: Rgba,
    },
    Triangle {
        points: [Point2<f32>; 3],
        color: Rgba,
        outline_width: f32,
    },
    Text {
        position: Point2<f32>,
        text: String,
        color: Rgba,
    },
}

/// Surface that only records what was drawn. Handy for headless runs and tests.
#[derive(Debug, Clone)]
pub struct DisplayList {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Triangle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn ellipses(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ellipse { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Rgb) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_ellipse(&mut self, center: Point2<f32>, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point2<f32>, to: Point2<f32>, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: Rgba, outline_width: f32) {
        self.commands.push(DrawCommand::Triangle {
            points,
            color,
            outline_width,
        });
    }

    fn draw_text(&mut self, position: Point2<f32>, text: &str, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color,
        });
    }
}
