//! Local transform decomposition (matrix -> translation, rotation, scale)
//!
//! Bind poses are stored as affine matrices; the interchange format wants
//! separate TRS components. Only matrices that are exactly representable as
//! scale-then-rotate-then-translate are accepted.

use glam::{Mat4, Vec4};

/// Basis vectors shorter than this are treated as collapsed
const DEGENERATE_EPSILON: f32 = 1e-8;

/// Largest |cos| between normalized basis vectors before the matrix counts as sheared
const SHEAR_TOLERANCE: f32 = 1e-4;

/// Largest deviation allowed in the projective row
const AFFINE_TOLERANCE: f32 = 1e-6;

/// Decomposed local transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trs {
    pub translation: [f32; 3],
    /// Quaternion [w, x, y, z]
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

/// Why a matrix could not be decomposed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NonTrsTransform {
    #[error("matrix contains non-finite values")]
    NonFinite,

    #[error("matrix is projective (bottom row {0:?})")]
    Projective([f32; 4]),

    #[error("basis axis {axis} is degenerate")]
    Degenerate { axis: usize },

    #[error("basis axes {a} and {b} are sheared (cos = {cos})")]
    Sheared { a: usize, b: usize, cos: f32 },
}

/// Split a column-major local matrix into TRS components.
pub fn decompose(cols: &[[f32; 4]; 4]) -> Result<Trs, NonTrsTransform> {
    let matrix = Mat4::from_cols_array_2d(cols);

    if !matrix.is_finite() {
        return Err(NonTrsTransform::NonFinite);
    }

    let bottom = matrix.row(3);
    if !bottom.abs_diff_eq(Vec4::W, AFFINE_TOLERANCE) {
        return Err(NonTrsTransform::Projective(bottom.to_array()));
    }

    let axes = [
        matrix.x_axis.truncate(),
        matrix.y_axis.truncate(),
        matrix.z_axis.truncate(),
    ];
    for (axis, v) in axes.iter().enumerate() {
        if v.length_squared() < DEGENERATE_EPSILON {
            return Err(NonTrsTransform::Degenerate { axis });
        }
    }

    for (a, b) in [(0, 1), (0, 2), (1, 2)] {
        let cos = axes[a].normalize().dot(axes[b].normalize());
        if cos.abs() > SHEAR_TOLERANCE {
            return Err(NonTrsTransform::Sheared { a, b, cos });
        }
    }

    let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
    let rotation = rotation.normalize();

    Ok(Trs {
        translation: translation.to_array(),
        rotation: [rotation.w, rotation.x, rotation.y, rotation.z],
        scale: scale.to_array(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use proptest::prelude::*;

    impl Trs {
        const IDENTITY: Self = Self {
            translation: [0.0; 3],
            rotation: [1.0, 0.0, 0.0, 0.0],
            scale: [1.0; 3],
        };

        /// Recompose (scale, then rotate, then translate)
        fn to_matrix(&self) -> Mat4 {
            let [w, x, y, z] = self.rotation;
            Mat4::from_scale_rotation_translation(
                Vec3::from(self.scale),
                Quat::from_xyzw(x, y, z, w),
                Vec3::from(self.translation),
            )
        }
    }

    fn assert_matrix_eq(a: Mat4, b: Mat4, tolerance: f32) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!(
                (a[i] - b[i]).abs() <= tolerance,
                "element {} differs: {} vs {}",
                i,
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn test_identity() {
        let trs = decompose(&Mat4::IDENTITY.to_cols_array_2d()).unwrap();
        assert_eq!(trs, Trs::IDENTITY);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let source = Mat4::from_scale_rotation_translation(
            Vec3::new(1.5, 0.5, 2.0),
            Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.4),
            Vec3::new(0.25, -3.0, 7.5),
        );

        let trs = decompose(&source.to_cols_array_2d()).unwrap();
        assert_matrix_eq(trs.to_matrix(), source, 1e-5);
        assert!((trs.scale[0] - 1.5).abs() < 1e-5);
        assert_eq!(trs.translation, [0.25, -3.0, 7.5]);
    }

    #[test]
    fn test_rotation_is_wxyz() {
        let q = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let trs = decompose(&Mat4::from_quat(q).to_cols_array_2d()).unwrap();

        // q and -q are the same rotation
        let [w, x, y, z] = trs.rotation;
        let dot = w * q.w + x * q.x + y * q.y + z * q.z;
        assert!(dot.abs() > 1.0 - 1e-5, "rotation {:?} vs {:?}", trs.rotation, q);
    }

    #[test]
    fn test_mirrored_matrix_round_trips() {
        let source = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
        let trs = decompose(&source.to_cols_array_2d()).unwrap();
        assert_matrix_eq(trs.to_matrix(), source, 1e-6);
    }

    #[test]
    fn test_shear_is_rejected() {
        let mut cols = Mat4::IDENTITY.to_cols_array_2d();
        cols[1][0] = 0.5; // y axis leans into x

        match decompose(&cols) {
            Err(NonTrsTransform::Sheared { a: 0, b: 1, .. }) => {}
            other => panic!("expected shear error, got {:?}", other),
        }
    }

    #[test]
    fn test_projective_is_rejected() {
        let mut cols = Mat4::IDENTITY.to_cols_array_2d();
        cols[2][3] = 0.1;
        assert!(matches!(
            decompose(&cols),
            Err(NonTrsTransform::Projective(_))
        ));
    }

    #[test]
    fn test_degenerate_and_non_finite_are_rejected() {
        let collapsed = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            decompose(&collapsed.to_cols_array_2d()),
            Err(NonTrsTransform::Degenerate { axis: 1 })
        );

        let mut cols = Mat4::IDENTITY.to_cols_array_2d();
        cols[3][0] = f32::NAN;
        assert_eq!(decompose(&cols), Err(NonTrsTransform::NonFinite));
    }

    proptest! {
        #[test]
        fn prop_decompose_recomposes(
            t in prop::array::uniform3(-50.0f32..50.0),
            euler in prop::array::uniform3(-3.1f32..3.1),
            s in prop::array::uniform3(0.1f32..4.0),
            flip in any::<bool>(),
        ) {
            let scale = Vec3::new(if flip { -s[0] } else { s[0] }, s[1], s[2]);
            let rotation = Quat::from_euler(glam::EulerRot::ZYX, euler[0], euler[1], euler[2]);
            let source = Mat4::from_scale_rotation_translation(scale, rotation, Vec3::from(t));

            let trs = decompose(&source.to_cols_array_2d()).unwrap();
            let rebuilt = trs.to_matrix().to_cols_array();
            let original = source.to_cols_array();
            for i in 0..16 {
                let tolerance = 1e-5 * original[i].abs().max(1.0) * 8.0;
                prop_assert!((rebuilt[i] - original[i]).abs() <= tolerance);
            }
        }
    }
}
