pub mod color;
pub mod geometry;
pub mod pixel;

pub use color::Color;
pub use geometry::{Axis, Direction, Face, GeometryError, Shape, VecExt};
pub use pixel::Pixel;
