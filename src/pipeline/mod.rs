use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use glam::Vec3;

use crate::core::Color;

pub mod buffer;
pub mod rasterizer;
pub mod terminal_pipeline;

pub use buffer::Grid;
pub use rasterizer::Rasterizer;
pub use terminal_pipeline::TerminalPipeline;

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 100.0);
pub const FOCAL_LENGTH: f32 = 100.0;

/// Separates cells within a row so glyphs come out roughly square.
pub const SPACER_CHAR: char = ' ';
pub const FILL_CHAR: char = '.';
pub const FILL_COLOR: Color = Color::DARK_GRAY;
pub const VISIBLE_COLOR: Color = Color::BRIGHT_GREEN;
pub const WIREFRAME_COLOR: Color = Color::RED;
/// Length debug normals are drawn at, in world units.
pub const NORMAL_SCALE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Every edge of every face, no culling.
    Wireframe,
    /// Edges of camera-facing faces only.
    Culled,
    /// Camera-facing faces filled, then outlined.
    #[default]
    Solid,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [RenderMode::Wireframe, RenderMode::Culled, RenderMode::Solid];

    pub fn next(self) -> Self {
        match self {
            RenderMode::Wireframe => RenderMode::Culled,
            RenderMode::Culled => RenderMode::Solid,
            RenderMode::Solid => RenderMode::Wireframe,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            RenderMode::Wireframe => 0,
            RenderMode::Culled => 1,
            RenderMode::Solid => 2,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => RenderMode::Wireframe,
            1 => RenderMode::Culled,
            _ => RenderMode::Solid,
        }
    }
}

impl Display for RenderMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Wireframe => write!(f, "wireframe"),
            RenderMode::Culled => write!(f, "culled"),
            RenderMode::Solid => write!(f, "solid"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown render mode '{}'", s))
    }
}
