use glam::Vec3;

use super::{Direction, GeometryError};

/// A polygon over a shared vertex list.
///
/// Faces only hold indices into their shape's vertices, so rotating the shape
/// in place is seen by every face without any syncing.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    indices: Vec<usize>,
    pub direction: Option<Direction>,
}

impl Face {
    pub const MIN_VERTICES: usize = 3;

    pub fn new(indices: Vec<usize>, direction: Option<Direction>) -> Result<Self, GeometryError> {
        if indices.len() < Self::MIN_VERTICES {
            return Err(GeometryError::TooFewVertices {
                found: indices.len(),
            });
        }
        Ok(Self { indices, direction })
    }

    pub fn quad(indices: [usize; 4], direction: Direction) -> Self {
        Self {
            indices: indices.to_vec(),
            direction: Some(direction),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn points<'a>(&'a self, vertices: &'a [Vec3]) -> impl Iterator<Item = Vec3> + 'a {
        self.indices.iter().map(move |&i| vertices[i])
    }

    /// Mean of the face's vertices.
    pub fn center(&self, vertices: &[Vec3]) -> Vec3 {
        self.points(vertices).sum::<Vec3>() / self.indices.len() as f32
    }

    /// Unit normal from the first two edges leaving vertex 0 (right-hand rule).
    /// Collinear leading vertices give the zero vector.
    pub fn normal(&self, vertices: &[Vec3]) -> Vec3 {
        let v0 = vertices[self.indices[0]];
        let v1 = vertices[self.indices[1]];
        let v2 = vertices[self.indices[2]];
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    /// Back-face test: visible when the normal does not point away from the
    /// camera. Also hands back the normal so callers don't recompute it.
    pub fn is_visible(&self, vertices: &[Vec3], camera: Vec3) -> (bool, Vec3) {
        let normal = self.normal(vertices);
        let line_of_sight = camera - self.center(vertices);
        (normal.dot(line_of_sight) >= 0.0, normal)
    }

    /// Directed adjacent index pairs in winding order, closing back to the
    /// first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| (self.indices[i], self.indices[(i + 1) % n]))
    }

    pub fn edge_points<'a>(
        &'a self,
        vertices: &'a [Vec3],
    ) -> impl Iterator<Item = (Vec3, Vec3)> + 'a {
        self.edges().map(move |(a, b)| (vertices[a], vertices[b]))
    }
}
