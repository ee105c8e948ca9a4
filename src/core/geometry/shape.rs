use glam::Vec3;
use log::debug;

use super::{Axis, Direction, Face, GeometryError, VecExt};

/// A polyhedron: one vertex arena shared by all of its faces.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub center: Vec3,
    pub size: f32,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Shape {
    pub fn new(
        center: Vec3,
        size: f32,
        vertices: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Result<Self, GeometryError> {
        let len = vertices.len();
        for face in &faces {
            if let Some(&index) = face.indices().iter().find(|&&i| i >= len) {
                return Err(GeometryError::VertexOutOfRange { index, len });
            }
        }
        Ok(Self {
            center,
            size,
            vertices,
            faces,
        })
    }

    /// Axis-aligned cube with corners at `center ± size / 2`.
    ///
    /// Faces wind counter-clockwise seen from outside, so every face normal
    /// matches its `Direction`.
    pub fn cube(center: Vec3, size: f32) -> Self {
        let h = size / 2.0;
        #[rustfmt::skip]
        let vertices = vec![
            center + Vec3::new(-h, -h, -h), // 0
            center + Vec3::new( h, -h, -h), // 1
            center + Vec3::new( h,  h, -h), // 2
            center + Vec3::new(-h,  h, -h), // 3
            center + Vec3::new(-h, -h,  h), // 4
            center + Vec3::new( h, -h,  h), // 5
            center + Vec3::new( h,  h,  h), // 6
            center + Vec3::new(-h,  h,  h), // 7
        ];

        let faces = vec![
            Face::quad([0, 3, 2, 1], Direction::North),
            Face::quad([4, 5, 6, 7], Direction::South),
            Face::quad([1, 2, 6, 5], Direction::East),
            Face::quad([0, 4, 7, 3], Direction::West),
            Face::quad([3, 7, 6, 2], Direction::Up),
            Face::quad([0, 1, 5, 4], Direction::Down),
        ];

        debug!("Built cube of size {} at {}", size, center);
        Self {
            center,
            size,
            vertices,
            faces,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn rotate_x(&mut self, theta: f32) {
        self.rotate_axis(Axis::X, theta);
    }

    pub fn rotate_y(&mut self, theta: f32) {
        self.rotate_axis(Axis::Y, theta);
    }

    pub fn rotate_z(&mut self, theta: f32) {
        self.rotate_axis(Axis::Z, theta);
    }

    /// Apply one tick of per-axis rates, x then y then z.
    pub fn rotate(&mut self, rates: Vec3) {
        if rates.x != 0.0 {
            self.rotate_x(rates.x);
        }
        if rates.y != 0.0 {
            self.rotate_y(rates.y);
        }
        if rates.z != 0.0 {
            self.rotate_z(rates.z);
        }
    }

    /// Rotates every vertex in place about the shape's center.
    pub fn rotate_axis(&mut self, axis: Axis, theta: f32) {
        let center = self.center;
        for v in &mut self.vertices {
            let local = *v - center;
            let rotated = match axis {
                Axis::X => local.rotate_x(theta),
                Axis::Y => local.rotate_y(theta),
                Axis::Z => local.rotate_z(theta),
            };
            *v = rotated + center;
        }
    }
}
