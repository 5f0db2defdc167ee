//! Stereo view and projection math.
//!
//! Poses follow the usual headset convention: right-handed, the eye looks
//! down -Z, field-of-view angles are signed radians with left and down
//! negative. Projections map depth to [0, 1]; passing `near > far` yields a
//! reversed-Z projection with the near plane at depth 1.

use crate::foundation::math::{Mat4, Quat, Vec3};

/// Views drawn per instanced call; the shaders select the eye by instance id
pub const STEREO_VIEW_COUNT: usize = 2;

/// [`STEREO_VIEW_COUNT`] as the instance count of a draw
pub const STEREO_INSTANCE_COUNT: u32 = 2;

const _: () = assert!(STEREO_INSTANCE_COUNT as usize == STEREO_VIEW_COUNT);

/// Eye position and orientation in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Eye position
    pub position: Vec3,
    /// Eye orientation
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self { position: Vec3::zeros(), orientation: Quat::identity() }
    }
}

/// Asymmetric field of view, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fov {
    /// Left edge, negative
    pub angle_left: f32,
    /// Right edge
    pub angle_right: f32,
    /// Top edge
    pub angle_up: f32,
    /// Bottom edge, negative
    pub angle_down: f32,
}

impl Fov {
    /// Symmetric frustum with the given half-angles
    pub fn symmetric(half_horizontal: f32, half_vertical: f32) -> Self {
        Self {
            angle_left: -half_horizontal,
            angle_right: half_horizontal,
            angle_up: half_vertical,
            angle_down: -half_vertical,
        }
    }
}

/// Clip plane distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearFar {
    /// Distance mapped to the near depth
    pub near: f32,
    /// Distance mapped to the far depth
    pub far: f32,
}

/// Per-eye view description supplied by the host each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProjection {
    /// Eye pose
    pub pose: Pose,
    /// Field of view
    pub fov: Fov,
    /// Clip planes
    pub near_far: NearFar,
}

impl ViewProjection {
    /// World-to-eye transform, the inverse of the pose
    pub fn view_matrix(&self) -> Mat4 {
        self.pose.orientation.inverse().to_homogeneous() * Mat4::new_translation(&-self.pose.position)
    }

    /// Off-axis perspective projection with [0, 1] depth
    #[rustfmt::skip]
    pub fn projection_matrix(&self) -> Mat4 {
        let left = self.fov.angle_left.tan();
        let right = self.fov.angle_right.tan();
        let up = self.fov.angle_up.tan();
        let down = self.fov.angle_down.tan();
        let width = right - left;
        let height = up - down;
        let NearFar { near, far } = self.near_far;
        let depth = near - far;

        Mat4::new(
            2.0 / width, 0.0,          (right + left) / width, 0.0,
            0.0,         2.0 / height, (up + down) / height,   0.0,
            0.0,         0.0,          far / depth,            near * far / depth,
            0.0,         0.0,          -1.0,                   0.0,
        )
    }

    /// Whether the depth range is inverted
    pub fn is_reversed_z(&self) -> bool {
        self.near_far.near > self.near_far.far
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{yaw_rotation, Vec4};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn view(near: f32, far: f32) -> ViewProjection {
        ViewProjection {
            pose: Pose::default(),
            fov: Fov::symmetric(FRAC_PI_4, FRAC_PI_4),
            near_far: NearFar { near, far },
        }
    }

    fn clip_depth(projection: &Mat4, distance: f32) -> f32 {
        let clip = projection * Vec4::new(0.0, 0.0, -distance, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn test_standard_depth_range() {
        let vp = view(0.1, 20.0);
        let projection = vp.projection_matrix();

        assert!(!vp.is_reversed_z());
        assert_relative_eq!(clip_depth(&projection, 0.1), 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip_depth(&projection, 20.0), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_reversed_depth_range() {
        let vp = view(20.0, 0.1);
        let projection = vp.projection_matrix();

        assert!(vp.is_reversed_z());
        assert_relative_eq!(clip_depth(&projection, 0.1), 1.0, epsilon = 1e-5);
        assert_relative_eq!(clip_depth(&projection, 20.0), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_frustum_edge_maps_to_ndc_edge() {
        let projection = view(0.1, 20.0).projection_matrix();
        // tan(45deg) == 1, so x == -z sits on the right edge
        let clip = projection * Vec4::new(2.0, 0.0, -2.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_inverts_pose() {
        let mut vp = view(0.1, 20.0);
        vp.pose = Pose { position: Vec3::new(1.0, 2.0, 3.0), orientation: yaw_rotation(0.7) };
        let pose = Mat4::new_translation(&vp.pose.position) * vp.pose.orientation.to_homogeneous();

        assert_relative_eq!(vp.view_matrix() * pose, Mat4::identity(), epsilon = 1e-5);
    }
}
