//! Vector helpers layered on top of glam.
//!
//! `Vec3` is a plain `glam::Vec3` and screen coordinates are `glam::IVec2`;
//! the extension trait below adds the per-axis rotations and the pinhole
//! projection the terminal pipeline uses.
//!
//! Rotations are applied incrementally every tick without re-orthonormalizing,
//! so vertices accumulate a little floating-point drift over a long run.

use glam::{IVec2, Vec3};

/// Projected coordinates past this magnitude are treated as unprojectable.
pub const MAX_SCREEN_COORD: f32 = 1_048_576.0;

pub trait VecExt: Sized {
    fn rotate_x(self, theta: f32) -> Self;
    fn rotate_y(self, theta: f32) -> Self;
    fn rotate_z(self, theta: f32) -> Self;

    /// Project onto the screen plane with the given focal length.
    ///
    /// `x' = round(-f * x / (-f + z))`, same for `y`. Returns `None` when the
    /// point sits on the focal plane (`z == f`) or so close to it that the
    /// result leaves `±MAX_SCREEN_COORD`.
    fn to_screen(self, focal_length: f32) -> Option<IVec2>;
}

impl VecExt for Vec3 {
    fn rotate_x(self, theta: f32) -> Self {
        let (sin, cos) = (-theta).sin_cos();
        Vec3::new(
            self.x,
            self.y * cos - self.z * sin,
            self.y * sin + self.z * cos,
        )
    }

    fn rotate_y(self, theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Vec3::new(
            self.x * cos - self.z * sin,
            self.y,
            self.x * sin + self.z * cos,
        )
    }

    fn rotate_z(self, theta: f32) -> Self {
        let (sin, cos) = (-theta).sin_cos();
        Vec3::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    fn to_screen(self, focal_length: f32) -> Option<IVec2> {
        let denom = -focal_length + self.z;
        if denom == 0.0 {
            return None;
        }
        let x = (-focal_length * self.x / denom).round();
        let y = (-focal_length * self.y / denom).round();
        if !(x.abs() <= MAX_SCREEN_COORD && y.abs() <= MAX_SCREEN_COORD) {
            return None;
        }
        Some(IVec2::new(x as i32, y as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, TAU};

    const EPS: f32 = 1e-4;

    #[test]
    fn normalize_is_unit_or_zero() {
        let samples = [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1.0, 2.0, -7.5),
            Vec3::new(0.001, 0.0, 0.0),
            Vec3::new(120.0, -33.0, 8.0),
        ];
        for v in samples {
            assert_relative_eq!(v.normalize_or_zero().length(), 1.0, epsilon = EPS);
        }
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
    }

    #[test]
    fn quarter_turns_follow_the_rotation_formulas() {
        let x = Vec3::X;
        let y = Vec3::Y;
        // rotate_x uses -theta: y -> -z
        assert!(y.rotate_x(FRAC_PI_2).abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        // rotate_y uses +theta: x -> +z
        assert!(x.rotate_y(FRAC_PI_2).abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPS));
        // rotate_z uses -theta: x -> -y
        assert!(x.rotate_z(FRAC_PI_2).abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), EPS));
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vec3::new(15.0, -15.0, 15.0);
        let r = v.rotate_x(0.3).rotate_y(1.1).rotate_z(-2.0);
        assert_relative_eq!(r.length(), v.length(), epsilon = EPS);
    }

    #[test]
    fn full_turn_round_trips() {
        let v = Vec3::new(15.0, -15.0, 15.0);
        assert!(v.rotate_x(TAU).abs_diff_eq(v, 1e-3));
        assert!(v.rotate_y(TAU).abs_diff_eq(v, 1e-3));
        assert!(v.rotate_z(TAU).abs_diff_eq(v, 1e-3));
    }

    #[test]
    fn projects_origin_to_origin() {
        assert_eq!(Vec3::ZERO.to_screen(100.0), Some(IVec2::ZERO));
    }

    #[test]
    fn projection_sign_convention() {
        // -100 * 50 / (-100 + 0) = 50
        assert_eq!(Vec3::new(50.0, 0.0, 0.0).to_screen(100.0), Some(IVec2::new(50, 0)));
        // Closer points grow: -100 * 10 / (-100 + 50) = 20
        assert_eq!(
            Vec3::new(10.0, -10.0, 50.0).to_screen(100.0),
            Some(IVec2::new(20, -20))
        );
        // Further points shrink and round: -100 * 10 / (-100 - 50) = 6.67
        assert_eq!(Vec3::new(10.0, 0.0, -50.0).to_screen(100.0), Some(IVec2::new(7, 0)));
    }

    #[test]
    fn projection_on_focal_plane_is_rejected() {
        assert_eq!(Vec3::new(1.0, 1.0, 100.0).to_screen(100.0), None);
        assert_eq!(Vec3::new(1.0, 1.0, 99.99999).to_screen(100.0), None);
    }
}
