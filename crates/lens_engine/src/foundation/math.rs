//! Math utilities and types
//!
//! Thin aliases over nalgebra's `f32` types plus the handful of matrix helpers
//! the render dispatch needs. Matrices are column-major throughout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use nalgebra::{Quaternion, Unit, Vector2, Vector3, Vector4, Matrix4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Unit quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color {
    /// Create a color from its channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Uniform grey of the given intensity
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Channels as a packed array, ready for a constant record
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// A matrix that has no inverse
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("matrix is not invertible")]
pub struct SingularMatrix;

/// Compose an affine model matrix as `T * R * S`
pub fn compose_model_matrix(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Transpose of the inverse of `model`.
///
/// Normals multiplied by this matrix stay perpendicular to their surface under
/// non-uniform scale.
pub fn normal_matrix(model: &Mat4) -> Result<Mat4, SingularMatrix> {
    model.try_inverse().map(|inverse| inverse.transpose()).ok_or(SingularMatrix)
}

/// Column-major array view of a matrix (`out[column][row]`)
pub fn to_column_array(matrix: &Mat4) -> [[f32; 4]; 4] {
    let mut out = [[0.0; 4]; 4];
    for (column, slot) in out.iter_mut().enumerate() {
        for (row, value) in slot.iter_mut().enumerate() {
            *value = matrix[(row, column)];
        }
    }
    out
}

/// Rotation about +Y by `angle` radians
pub fn yaw_rotation(angle: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compose_applies_scale_then_rotation_then_translation() {
        let model = compose_model_matrix(
            &Vec3::new(1.0, 2.0, 3.0),
            &yaw_rotation(std::f32::consts::FRAC_PI_2),
            &Vec3::new(2.0, 1.0, 1.0),
        );

        // +X scaled to 2, rotated onto -Z, then translated
        let p = model.transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.coords, Vec3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_identity_is_identity() {
        let normal = normal_matrix(&Mat4::identity()).unwrap();
        assert_relative_eq!(normal, Mat4::identity());
    }

    #[test]
    fn test_normal_matrix_rejects_zero_scale() {
        let model = compose_model_matrix(&Vec3::zeros(), &Quat::identity(), &Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(normal_matrix(&model), Err(SingularMatrix));
    }

    #[test]
    fn test_column_array_keeps_translation_in_last_column() {
        let columns = to_column_array(&Mat4::new_translation(&Vec3::new(4.0, 5.0, 6.0)));
        assert_eq!(columns[3], [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(columns[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
