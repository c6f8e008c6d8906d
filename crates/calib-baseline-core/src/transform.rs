//! Rigid transform representation and geometric error measures.

use nalgebra::{Matrix3, Matrix4, Vector3};

/// A 4x4 homogeneous transform.
///
/// The upper-left 3x3 block is assumed to be a valid rotation and is not
/// re-validated here; callers that feed in a sheared or scaled matrix get
/// unspecified rotation errors back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    pub matrix: Matrix4<f64>,
}

impl RigidTransform {
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Build from the canonical row-major flattening `m[4*row + col]`.
    ///
    /// Panics if `flat` does not hold exactly 16 elements.
    pub fn from_row_slice(flat: &[f64]) -> Self {
        Self::new(Matrix4::from_row_slice(flat))
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }
}

/// Euclidean distance between the translation components of `a` and `b`,
/// in the document's length unit (typically millimeters).
pub fn translation_error(a: &RigidTransform, b: &RigidTransform) -> f64 {
    (a.translation() - b.translation()).norm()
}

/// Angular magnitude of the relative rotation `R_a^T * R_b`, in degrees.
///
/// The arccos argument is clamped to [-1, 1] so that orthonormal inputs
/// with rounding noise never yield NaN.
pub fn rotation_error_deg(a: &RigidTransform, b: &RigidTransform) -> f64 {
    let relative = a.rotation().transpose() * b.rotation();
    let cos_angle = ((relative.trace() - 1.0) / 2.0).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}
