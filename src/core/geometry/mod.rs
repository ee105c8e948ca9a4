use std::fmt::{self, Display, Formatter};

mod direction;
mod face;
mod shape;
pub mod vec;

pub use direction::{Axis, Direction};
pub use face::Face;
pub use shape::Shape;
pub use vec::VecExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A face needs at least three vertices to span a plane.
    TooFewVertices { found: usize },
    /// A face refers to a vertex its shape does not have.
    VertexOutOfRange { index: usize, len: usize },
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::TooFewVertices { found } => write!(
                f,
                "a face needs at least {} vertices, got {}",
                Face::MIN_VERTICES,
                found
            ),
            GeometryError::VertexOutOfRange { index, len } => write!(
                f,
                "face vertex index {} is out of range for a shape with {} vertices",
                index, len
            ),
        }
    }
}

impl std::error::Error for GeometryError {}
