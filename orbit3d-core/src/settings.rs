/// User-facing render toggles, read by the renderer once per tick
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::color::Rgb;

/// Accent color used when edge drawing is switched on
pub const ACCENT_LINE_COLOR: Rgb = Rgb::new(0x03, 0x92, 0xf7);
/// Point size used when point drawing is switched on
pub const ENABLED_POINT_SIZE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown setting `{0}`")]
    UnknownToggle(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineColor {
    /// Edges are not drawn at all
    Transparent,
    Color(Rgb),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub rotate_enabled: bool,
    pub move_enabled: bool,
    /// 0 disables point drawing
    pub point_size: f32,
    pub line_color: LineColor,
    pub render_backfaces: bool,
    pub render_triangles: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            rotate_enabled: true,
            move_enabled: false,
            point_size: 0.0,
            line_color: LineColor::Transparent,
            render_backfaces: false,
            render_triangles: true,
        }
    }
}

/// The on/off switches a host UI exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Rotate,
    Move,
    Points,
    Edges,
    Backfaces,
    Triangles,
}

impl Toggle {
    pub const ALL: [Toggle; 6] = [
        Toggle::Rotate,
        Toggle::Move,
        Toggle::Points,
        Toggle::Edges,
        Toggle::Backfaces,
        Toggle::Triangles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Toggle::Rotate => "rotate",
            Toggle::Move => "move",
            Toggle::Points => "points",
            Toggle::Edges => "edges",
            Toggle::Backfaces => "backface",
            Toggle::Triangles => "triangles",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Toggle {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rotate" => Ok(Toggle::Rotate),
            "move" => Ok(Toggle::Move),
            "points" => Ok(Toggle::Points),
            "edges" => Ok(Toggle::Edges),
            "backface" | "backfaces" => Ok(Toggle::Backfaces),
            "triangles" => Ok(Toggle::Triangles),
            _ => Err(SettingsError::UnknownToggle(s.to_string())),
        }
    }
}

impl RenderSettings {
    pub fn is_enabled(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Rotate => self.rotate_enabled,
            Toggle::Move => self.move_enabled,
            Toggle::Points => self.point_size > 0.0,
            Toggle::Edges => self.line_color != LineColor::Transparent,
            Toggle::Backfaces => self.render_backfaces,
            Toggle::Triangles => self.render_triangles,
        }
    }

    pub fn set(&mut self, toggle: Toggle, enabled: bool) {
        match toggle {
            Toggle::Rotate => self.rotate_enabled = enabled,
            Toggle::Move => self.move_enabled = enabled,
            Toggle::Points => {
                self.point_size = if enabled { ENABLED_POINT_SIZE } else { 0.0 };
            }
            Toggle::Edges => {
                self.line_color = if enabled {
                    LineColor::Color(ACCENT_LINE_COLOR)
                } else {
                    LineColor::Transparent
                };
            }
            Toggle::Backfaces => self.render_backfaces = enabled,
            Toggle::Triangles => self.render_triangles = enabled,
        }
    }

    pub fn toggle(&mut self, toggle: Toggle) {
        let enabled = self.is_enabled(toggle);
        self.set(toggle, !enabled);
    }
}
