use std::collections::BTreeMap;

use glam::IVec2;
use log::trace;

use crate::core::Color;
use crate::pipeline::buffer::Grid;

pub const DEFAULT_SLOPE_THRESHOLD: i32 = 4;

pub const ENDPOINT_CHAR: char = '+';
pub const VERTICAL_CHAR: char = '|';
pub const HORIZONTAL_CHAR: char = '_';
pub const RISING_CHAR: char = '/';
pub const FALLING_CHAR: char = '\\';

/// Turns projected points into glyphs on a `Grid`.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    /// Lines whose horizontal (vertical) extent is below this are drawn
    /// with `|` (`_`).
    pub slope_threshold: i32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_SLOPE_THRESHOLD)
    }
}

impl Rasterizer {
    pub fn new(slope_threshold: i32) -> Self {
        Self { slope_threshold }
    }

    /// Draw a line, picking a glyph for every stepped cell.
    pub fn draw_line(&self, grid: &mut Grid, start: IVec2, end: IVec2, color: Option<Color>) {
        if outside_same_side(grid, start, end) {
            return;
        }
        let delta = (end - start).abs();
        bresenham(start, end, |pos| {
            if let Some(pixel) = grid.pixel_at(pos) {
                pixel.set(self.glyph_for(start, end, delta, pos), color);
            }
        });
    }

    /// Glyph for cell `curr` on the line `start -> end`, where `delta` is the
    /// absolute extent of the whole line.
    pub fn glyph_for(&self, start: IVec2, end: IVec2, delta: IVec2, curr: IVec2) -> char {
        if curr == start || curr == end {
            return ENDPOINT_CHAR;
        }
        // The x check also keeps the slope below from dividing by zero
        if delta.x < self.slope_threshold || end.x == curr.x {
            return VERTICAL_CHAR;
        }
        if delta.y < self.slope_threshold {
            return HORIZONTAL_CHAR;
        }
        let k = (end.y - curr.y) as f32 / (end.x - curr.x) as f32;
        if k < 0.0 {
            RISING_CHAR
        } else {
            FALLING_CHAR
        }
    }

    /// Scanline-fill a closed polygon given in winding order.
    ///
    /// Edges are active on `[y_min, y_max)`, horizontal edges never enter the
    /// table, and an unpaired trailing intersection is dropped.
    pub fn fill_polygon(
        &self,
        grid: &mut Grid,
        points: &[IVec2],
        glyph: char,
        color: Option<Color>,
    ) {
        let n = points.len();
        let mut edge_table: BTreeMap<i32, Vec<Edge>> = BTreeMap::new();
        let mut y_end = i32::MIN;

        for i in 0..n {
            let (a, b) = (points[i], points[(i + 1) % n]);
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            let edge = Edge {
                y_min: lo.y,
                y_max: hi.y,
                x_min: lo.x as f32,
                inv_slope: (hi.x - lo.x) as f32 / (hi.y - lo.y) as f32,
            };
            y_end = y_end.max(edge.y_max);
            edge_table.entry(edge.y_min).or_default().push(edge);
        }

        let Some(&y_first) = edge_table.keys().next() else {
            return;
        };
        let y_start = y_first.max(-grid.grid_height);
        let y_end = y_end.min(grid.grid_height);
        let (x_lo, x_hi) = (-grid.grid_width, grid.grid_width - 1);

        let mut active: Vec<Edge> = Vec::with_capacity(n);
        for y in y_start..y_end {
            while let Some(entry) = edge_table.first_entry() {
                if *entry.key() > y {
                    break;
                }
                active.extend(entry.remove());
            }
            active.retain(|e| y < e.y_max);
            active.sort_by(|a, b| a.x_at(y).total_cmp(&b.x_at(y)));

            for pair in active.chunks_exact(2) {
                let left = (pair[0].x_at(y).round() as i32).max(x_lo);
                let right = (pair[1].x_at(y).round() as i32).min(x_hi);
                for x in left..=right {
                    if let Some(pixel) = grid.get_pixel_mut(x, y) {
                        pixel.set(glyph, color);
                    }
                }
            }
        }
        trace!("Filled polygon of {} points over rows {}..{}", n, y_start, y_end);
    }
}

/// True when both endpoints sit past the same grid border, so no cell of the
/// line can land on the grid.
fn outside_same_side(grid: &Grid, a: IVec2, b: IVec2) -> bool {
    let (w, h) = (grid.grid_width, grid.grid_height);
    (a.x < -w && b.x < -w)
        || (a.x >= w && b.x >= w)
        || (a.y < -h && b.y < -h)
        || (a.y >= h && b.y >= h)
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    y_min: i32,
    y_max: i32,
    x_min: f32,
    inv_slope: f32,
}

impl Edge {
    fn x_at(&self, y: i32) -> f32 {
        self.x_min + (y - self.y_min) as f32 * self.inv_slope
    }
}

/// Integer Bresenham walk from `start` to `end`, both inclusive.
pub fn bresenham<F>(start: IVec2, end: IVec2, mut plot: F)
where
    F: FnMut(IVec2),
{
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx - dy;
    let mut curr = start;

    loop {
        plot(curr);

        if curr == end {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            curr.x += sx;
        }
        if e2 < dx {
            err += dx;
            curr.y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(w: usize, h: usize) -> Grid {
        let mut grid = Grid::new(w, h);
        grid.populate();
        grid
    }

    fn walk(start: IVec2, end: IVec2) -> Vec<IVec2> {
        let mut cells = Vec::new();
        bresenham(start, end, |p| cells.push(p));
        cells
    }

    fn glyph(grid: &Grid, x: i32, y: i32) -> char {
        grid.get_pixel(x, y).unwrap().ch
    }

    #[test]
    fn bresenham_visits_every_cell_once() {
        let cells = walk(IVec2::new(0, 0), IVec2::new(5, 0));
        assert_eq!(cells, (0..=5).map(|x| IVec2::new(x, 0)).collect::<Vec<_>>());

        let diag = walk(IVec2::new(3, 3), IVec2::new(-2, -2));
        assert_eq!(diag.len(), 6);
        assert_eq!(diag.last(), Some(&IVec2::new(-2, -2)));

        assert_eq!(walk(IVec2::new(1, 1), IVec2::new(1, 1)), vec![IVec2::new(1, 1)]);
    }

    #[test]
    fn bresenham_steep_line_steps_every_row() {
        let cells = walk(IVec2::new(0, 0), IVec2::new(2, 7));
        assert_eq!(cells.len(), 8);
        for (i, c) in cells.iter().enumerate() {
            assert_eq!(c.y, i as i32);
        }
    }

    #[test]
    fn horizontal_line_glyphs() {
        let mut g = grid(20, 20);
        Rasterizer::default().draw_line(&mut g, IVec2::new(0, 0), IVec2::new(5, 0), None);
        let row: String = (0..=5).map(|x| glyph(&g, x, 0)).collect();
        assert_eq!(row, "+____+");
        assert_eq!(glyph(&g, 6, 0), ' ');
    }

    #[test]
    fn vertical_line_glyphs() {
        let mut g = grid(20, 20);
        Rasterizer::default().draw_line(&mut g, IVec2::new(2, -3), IVec2::new(2, 3), None);
        let col: String = (-3..=3).map(|y| glyph(&g, 2, y)).collect();
        assert_eq!(col, "+|||||+");
    }

    #[test]
    fn diagonal_glyphs_follow_slope_sign() {
        let mut g = grid(40, 40);
        let r = Rasterizer::default();
        // Screen y grows downward, so this climbs to the right
        r.draw_line(&mut g, IVec2::new(-8, 8), IVec2::new(0, 0), None);
        assert_eq!(glyph(&g, -4, 4), '/');
        r.draw_line(&mut g, IVec2::new(2, 2), IVec2::new(10, 10), None);
        assert_eq!(glyph(&g, 6, 6), '\\');
    }

    #[test]
    fn short_lines_fall_back_to_pipe() {
        // Horizontal extent below the threshold wins over the y check
        let mut g = grid(20, 20);
        Rasterizer::default().draw_line(&mut g, IVec2::new(0, 0), IVec2::new(3, 0), None);
        let row: String = (0..=3).map(|x| glyph(&g, x, 0)).collect();
        assert_eq!(row, "+||+");

        let mut g = grid(20, 20);
        Rasterizer::new(2).draw_line(&mut g, IVec2::new(0, 0), IVec2::new(3, 0), None);
        let row: String = (0..=3).map(|x| glyph(&g, x, 0)).collect();
        assert_eq!(row, "+__+");
    }

    #[test]
    fn off_grid_segments_are_clipped_silently() {
        let mut g = grid(10, 10);
        Rasterizer::default().draw_line(
            &mut g,
            IVec2::new(-100, 0),
            IVec2::new(100, 0),
            Some(Color::RED),
        );
        let row = g.row(0).unwrap();
        assert!(row.iter().all(|p| p.ch == '_' && p.color == Some(Color::RED)));
    }

    #[test]
    fn lines_fully_past_one_border_are_skipped() {
        let mut g = grid(10, 10);
        let r = Rasterizer::default();
        r.draw_line(&mut g, IVec2::new(-50, -9), IVec2::new(50, -6), None);
        r.draw_line(&mut g, IVec2::new(5, -50), IVec2::new(40, 50), None);
        assert!(g.iter_rows().flatten().all(|p| p.ch == ' '));
    }

    #[test]
    fn fill_square_covers_half_open_rows() {
        let mut g = grid(10, 10);
        let square = [
            IVec2::new(-2, -2),
            IVec2::new(2, -2),
            IVec2::new(2, 2),
            IVec2::new(-2, 2),
        ];
        Rasterizer::default().fill_polygon(&mut g, &square, '.', Some(Color::DARK_GRAY));
        for y in -2..2 {
            for x in -2..=2 {
                assert_eq!(glyph(&g, x, y), '.', "({x}, {y})");
            }
            assert_eq!(glyph(&g, -3, y), ' ');
            assert_eq!(glyph(&g, 3, y), ' ');
        }
        assert_eq!(glyph(&g, 0, 2), ' ');
        assert_eq!(glyph(&g, 0, -3), ' ');
    }

    #[test]
    fn fill_triangle_narrows_toward_apex() {
        let mut g = grid(20, 20);
        let tri = [IVec2::new(0, -3), IVec2::new(3, 3), IVec2::new(-3, 3)];
        Rasterizer::default().fill_polygon(&mut g, &tri, '#', None);
        let width = |y: i32| (-9..10).filter(|&x| glyph(&g, x, y) == '#').count();
        assert_eq!(width(-3), 1);
        assert_eq!(width(-1), 3);
        assert!(width(2) > width(0));
        assert_eq!(width(3), 0);
    }

    #[test]
    fn fill_tolerates_degenerate_polygons() {
        let mut g = grid(10, 10);
        let r = Rasterizer::default();
        r.fill_polygon(&mut g, &[], '#', None);
        r.fill_polygon(&mut g, &[IVec2::new(1, 1)], '#', None);
        r.fill_polygon(&mut g, &[IVec2::new(-3, 0), IVec2::new(3, 0)], '#', None);
        assert!(g.iter_rows().flatten().all(|p| p.ch == ' '));

        r.fill_polygon(&mut g, &[IVec2::new(0, 0), IVec2::new(2, 2), IVec2::new(4, 4)], '#', None);
        assert_eq!(glyph(&g, 0, 0), '#');
    }

    #[test]
    fn fill_larger_than_grid_is_clamped() {
        let mut g = grid(6, 6);
        let huge = [
            IVec2::new(-1000, -1000),
            IVec2::new(1000, -1000),
            IVec2::new(1000, 1000),
            IVec2::new(-1000, 1000),
        ];
        Rasterizer::default().fill_polygon(&mut g, &huge, '#', None);
        assert!(g.iter_rows().flatten().all(|p| p.ch == '#'));
    }
}
