use std::io::{self, Write};

use crossterm::{cursor::MoveUp, queue, style::Print};
use glam::{IVec2, Vec3};
use log::trace;

use crate::core::{Color, Direction, Face, Shape, VecExt};
use crate::pipeline::{
    Grid, Rasterizer, RenderMode, CAMERA_POSITION, FILL_CHAR, FILL_COLOR, FOCAL_LENGTH,
    NORMAL_SCALE, SPACER_CHAR, VISIBLE_COLOR, WIREFRAME_COLOR,
};

/// Draws shapes into a `Grid` and presents it to a terminal writer.
///
/// Apart from the grid contents the only state kept between frames is the
/// last frame written, which lets `draw` skip frames that did not change.
pub struct TerminalPipeline<W: Write> {
    grid: Grid,
    rasterizer: Rasterizer,
    pub mode: RenderMode,
    out: W,
    previous_frame: String,
}

impl<W: Write> TerminalPipeline<W> {
    /// Takes ownership of the grid, populating it if that hasn't happened yet.
    pub fn new(mut grid: Grid, rasterizer: Rasterizer, out: W) -> Self {
        if !grid.is_populated() {
            grid.populate();
        }
        Self {
            grid,
            rasterizer,
            mode: RenderMode::default(),
            out,
            previous_frame: String::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn reset(&mut self) {
        self.grid.reset();
    }

    /// Forget the last frame so the next `draw` always writes.
    pub fn invalidate(&mut self) {
        self.previous_frame.clear();
    }

    pub fn draw_shape(&mut self, shape: &Shape, debug: bool) {
        if self.mode == RenderMode::Wireframe {
            self.draw_wireframe(shape);
        }

        let vertices = shape.vertices();
        for face in shape.faces() {
            let (is_visible, normal) = face.is_visible(vertices, CAMERA_POSITION);

            // Backface culling
            if is_visible && self.mode != RenderMode::Wireframe {
                if self.mode == RenderMode::Solid {
                    self.fill_face(face, vertices);
                }
                self.draw_face(face, vertices, Some(VISIBLE_COLOR));
            }

            if debug {
                let color = color_for_direction(face.direction);
                self.draw_normal(face.center(vertices), normal * NORMAL_SCALE, Some(color));
            }
        }
    }

    /// Every face, hidden or not.
    pub fn draw_wireframe(&mut self, shape: &Shape) {
        for face in shape.faces() {
            self.draw_face(face, shape.vertices(), Some(WIREFRAME_COLOR));
        }
    }

    pub fn draw_face(&mut self, face: &Face, vertices: &[Vec3], color: Option<Color>) {
        for (a, b) in face.edge_points(vertices) {
            self.draw_segment(a, b, color);
        }
    }

    pub fn fill_face(&mut self, face: &Face, vertices: &[Vec3]) {
        let projected: Option<Vec<IVec2>> = face
            .points(vertices)
            .map(|p| p.to_screen(FOCAL_LENGTH))
            .collect();
        if let Some(points) = projected {
            self.rasterizer
                .fill_polygon(&mut self.grid, &points, FILL_CHAR, Some(FILL_COLOR));
        }
    }

    /// Draws `normal` as an arrow-less line starting at `origin`.
    pub fn draw_normal(&mut self, origin: Vec3, normal: Vec3, color: Option<Color>) {
        self.draw_segment(origin, origin + normal, color);
    }

    /// Project both ends and draw; a segment touching the focal plane is skipped.
    fn draw_segment(&mut self, a: Vec3, b: Vec3, color: Option<Color>) {
        if let (Some(start), Some(end)) = (a.to_screen(FOCAL_LENGTH), b.to_screen(FOCAL_LENGTH)) {
            self.rasterizer.draw_line(&mut self.grid, start, end, color);
        }
    }

    /// The grid as text: cells joined by a space, rows by a newline.
    pub fn render_frame(&self) -> String {
        let spacer = SPACER_CHAR.to_string();
        self.grid
            .iter_rows()
            .map(|row| {
                row.iter()
                    .map(|pixel| pixel.to_string())
                    .collect::<Vec<_>>()
                    .join(&spacer)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the frame if it differs from the last one written.
    ///
    /// The frame goes out after a line break, with `\r\n` row breaks so it
    /// lays out the same in raw mode, and the cursor is then moved back up
    /// over it. Returns whether anything was written.
    pub fn draw(&mut self) -> io::Result<bool> {
        let frame = self.render_frame();
        if frame == self.previous_frame {
            trace!("Frame unchanged, skipping write");
            return Ok(false);
        }

        queue!(self.out, Print("\r\n"), Print(frame.replace('\n', "\r\n")))?;
        let rows = self.grid.rows() as u16;
        if rows > 0 {
            queue!(self.out, MoveUp(rows))?;
        }
        self.out.flush()?;
        trace!("Wrote frame of {} bytes", frame.len());

        self.previous_frame = frame;
        Ok(true)
    }
}

pub fn color_for_direction(direction: Option<Direction>) -> Color {
    match direction {
        Some(Direction::North) => Color::BRIGHT_RED,
        Some(Direction::South) => Color::BRIGHT_YELLOW,
        Some(Direction::East) => Color::BRIGHT_BLUE,
        Some(Direction::West) => Color::BRIGHT_MAGENTA,
        Some(Direction::Up) => Color::BRIGHT_CYAN,
        Some(Direction::Down) | None => Color::WHITE,
    }
}
