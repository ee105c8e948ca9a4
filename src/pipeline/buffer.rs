use glam::IVec2;
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;

use crate::core::Pixel;

/// Character grid addressed with centered coordinates.
///
/// Logical cells span `[-grid_width, grid_width) x [-grid_height, grid_height)`
/// where `grid_width = width / 2` and `grid_height = height / 2`. Row
/// `-grid_height` is the top of the screen.
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub grid_width: i32,
    pub grid_height: i32,
    data: Vec<Pixel>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            grid_width: (width / 2) as i32,
            grid_height: (height / 2) as i32,
            data: Vec::new(),
        }
    }

    /// Allocate every cell as blank. Lookups miss until this has run.
    pub fn populate(&mut self) {
        self.data = vec![Pixel::default(); self.columns() * self.rows()];
    }

    pub fn is_populated(&self) -> bool {
        !self.data.is_empty()
    }

    /// Number of cells per row.
    pub fn columns(&self) -> usize {
        2 * self.grid_width as usize
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        2 * self.grid_height as usize
    }

    /// Blank every cell, glyph and color alike.
    pub fn reset(&mut self) {
        self.data.par_chunks_mut(1024).for_each(|chunk| {
            for pixel in chunk {
                pixel.reset();
            }
        });
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) || !self.is_populated() {
            return None;
        }
        let col = (x + self.grid_width) as usize;
        let row = (y + self.grid_height) as usize;
        Some(col + row * self.columns())
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (-self.grid_width..self.grid_width).contains(&x)
            && (-self.grid_height..self.grid_height).contains(&y)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<&Pixel> {
        self.index(x, y).map(|i| &self.data[i])
    }

    /// Off-grid coordinates give `None`; callers treat that as a no-op.
    pub fn get_pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Pixel> {
        self.index(x, y).map(move |i| &mut self.data[i])
    }

    pub fn pixel_at(&mut self, pos: IVec2) -> Option<&mut Pixel> {
        self.get_pixel_mut(pos.x, pos.y)
    }

    /// The cells of logical row `y`, left to right.
    pub fn row(&self, y: i32) -> Option<&[Pixel]> {
        let start = self.index(-self.grid_width, y)?;
        Some(&self.data[start..start + self.columns()])
    }

    /// Rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Pixel]> {
        // chunks() panics on a zero size, which a 0 or 1 wide grid would give
        self.data.chunks(self.columns().max(1))
    }
}
