//! Translation / rotation / scale decomposition of entity matrices
//!
//! Entities store a single affine matrix. Editing widgets work on the
//! decomposed components, so every frame the selected matrix goes through
//! `decompose` and back through `recompose`.

use glam::{Mat4, Vec3};

/// Decomposed transform: translation, Euler rotation in degrees, scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trs {
    pub translation: Vec3,
    /// Rotation about X, Y, Z in degrees, applied X first
    pub rotation_deg: Vec3,
    pub scale: Vec3,
}

impl Default for Trs {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_deg: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Trs {
    pub fn new(translation: Vec3, rotation_deg: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation_deg,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        recompose(self)
    }
}

/// Split an affine matrix into translation, rotation and scale.
///
/// Scale is the length of each basis column; rotation is read from the
/// normalized columns as `Rz * Ry * Rx`. A mirrored matrix (negative
/// determinant) carries the reflection in a negative `scale.x`. Shear is
/// discarded.
pub fn decompose(matrix: &Mat4) -> Trs {
    let mut x_axis = matrix.x_axis.truncate();
    let y_axis = matrix.y_axis.truncate();
    let z_axis = matrix.z_axis.truncate();

    let mut scale = Vec3::new(x_axis.length(), y_axis.length(), z_axis.length());
    if matrix.determinant() < 0.0 {
        scale.x = -scale.x;
        x_axis = -x_axis;
    }

    let x = normalize_or(x_axis, Vec3::X);
    let y = normalize_or(y_axis, Vec3::Y);
    let z = normalize_or(z_axis, Vec3::Z);

    let rx = y.z.atan2(z.z);
    let ry = (-x.z).atan2((y.z * y.z + z.z * z.z).sqrt());
    let rz = x.y.atan2(x.x);

    Trs {
        translation: matrix.w_axis.truncate(),
        rotation_deg: Vec3::new(rx.to_degrees(), ry.to_degrees(), rz.to_degrees()),
        scale,
    }
}

/// Build `T * Rz * Ry * Rx * S` from components
pub fn recompose(trs: &Trs) -> Mat4 {
    let r = trs.rotation_deg;
    Mat4::from_translation(trs.translation)
        * Mat4::from_rotation_z(r.z.to_radians())
        * Mat4::from_rotation_y(r.y.to_radians())
        * Mat4::from_rotation_x(r.x.to_radians())
        * Mat4::from_scale(trs.scale)
}

fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO {
        fallback
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_close(a: &Mat4, b: &Mat4, eps: f32) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!(
                (a[i] - b[i]).abs() < eps,
                "element {i} differs: {} vs {}",
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn test_round_trip_reference_matrix() {
        let original = Trs::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 45.0, 0.0),
            Vec3::new(2.0, 1.0, 1.0),
        )
        .to_matrix();

        let rebuilt = recompose(&decompose(&original));
        assert_mat_close(&original, &rebuilt, 1e-4);
    }

    #[test]
    fn test_decompose_recovers_components() {
        let trs = Trs::new(
            Vec3::new(-4.0, 0.5, 9.0),
            Vec3::new(10.0, -30.0, 60.0),
            Vec3::new(0.5, 2.0, 3.0),
        );
        let out = decompose(&trs.to_matrix());
        assert!((out.translation - trs.translation).length() < 1e-4);
        assert!((out.rotation_deg - trs.rotation_deg).length() < 1e-3);
        assert!((out.scale - trs.scale).length() < 1e-4);
    }

    #[test]
    fn test_round_trip_many_rotations() {
        for rx in [-170.0, -45.0, 0.0, 30.0, 120.0] {
            for ry in [-80.0, -10.0, 0.0, 45.0, 85.0] {
                for rz in [-135.0, 0.0, 90.0, 179.0] {
                    let m = Trs::new(
                        Vec3::new(1.0, -2.0, 0.5),
                        Vec3::new(rx, ry, rz),
                        Vec3::new(1.5, 0.3, 2.0),
                    )
                    .to_matrix();
                    assert_mat_close(&m, &recompose(&decompose(&m)), 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_mirrored() {
        let mirrored = Trs::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(-1.0, 1.0, 1.0)).to_matrix();
        assert_mat_close(&mirrored, &recompose(&decompose(&mirrored)), 1e-4);

        let trs = decompose(&mirrored);
        assert!((trs.scale - Vec3::new(-1.0, 1.0, 1.0)).length() < 1e-6);
        assert!(trs.rotation_deg.length() < 1e-4);

        let m = Trs::new(
            Vec3::new(2.0, 0.0, -1.0),
            Vec3::new(20.0, -35.0, 70.0),
            Vec3::new(1.0, -2.0, 0.5),
        )
        .to_matrix();
        assert_mat_close(&m, &recompose(&decompose(&m)), 1e-4);
    }

    #[test]
    fn test_mirrored_survives_component_edit() {
        let m = Trs::new(Vec3::ZERO, Vec3::new(0.0, 30.0, 0.0), Vec3::new(-2.0, 1.0, 1.0))
            .to_matrix();
        let mut trs = decompose(&m);
        trs.translation.x += 1.0;
        let edited = recompose(&trs);
        assert!(edited.determinant() < 0.0);
        assert_mat_close(&(Mat4::from_translation(Vec3::X) * m), &edited, 1e-4);
    }

    #[test]
    fn test_identity() {
        let trs = decompose(&Mat4::IDENTITY);
        assert_eq!(trs, Trs::default());
        assert_eq!(recompose(&Trs::default()), Mat4::IDENTITY);
    }

    #[test]
    fn test_uniform_scale_translation() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.3),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 0.0, -3.0),
        );
        let trs = decompose(&m);
        assert!((trs.scale - Vec3::splat(0.3)).length() < 1e-6);
        assert!(trs.rotation_deg.length() < 1e-4);
        assert_eq!(trs.translation, Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn test_zero_scale_does_not_produce_nan() {
        let m = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let trs = decompose(&m);
        assert!(!trs.rotation_deg.is_nan());
        assert_eq!(trs.scale.x, 0.0);
    }
}
