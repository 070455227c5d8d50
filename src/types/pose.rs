use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid-body transform sampled from a pose source.
///
/// Stored as a column-major 4x4 affine matrix (glTF / glam convention): the
/// translation lives in the fourth column and the upper-left 3x3 block is
/// expected to be an orthonormal rotation. Serialized as a flat array of 16
/// floats in column-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 16]", into = "[f32; 16]")]
pub struct Pose(Mat4);

impl Pose {
    pub const IDENTITY: Pose = Pose(Mat4::IDENTITY);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self(matrix)
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self(Mat4::from_translation(translation))
    }

    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self(Mat4::from_rotation_translation(rotation, translation))
    }

    pub fn from_cols_array(cols: &[f32; 16]) -> Self {
        Self(Mat4::from_cols_array(cols))
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    pub fn matrix(&self) -> Mat4 {
        self.0
    }

    /// Translation component.
    pub fn position(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// The pose's local "up" direction: the second column of the rotation
    /// block, normalized.
    ///
    /// Linearly blended poses can carry a slightly shrunken basis, so the
    /// column is always re-normalized. A collapsed (zero-length) column falls
    /// back to world +Y.
    pub fn local_up_axis(&self) -> Vec3 {
        self.0.y_axis.truncate().try_normalize().unwrap_or(Vec3::Y)
    }

    /// The direction the pose is looking: the negated third column of the
    /// rotation block, normalized. Falls back to world -Z.
    pub fn forward_axis(&self) -> Vec3 {
        (-self.0.z_axis.truncate())
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Whether every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Whether the matrix is finite and has a non-zero determinant, so that
    /// poses can be expressed relative to it.
    pub fn is_invertible(&self) -> bool {
        let det = self.0.determinant();
        self.is_finite() && det.is_finite() && det != 0.0
    }

    /// Same orientation, translated `distance` units along the forward axis.
    ///
    /// Used to sample a point in front of a camera rather than at the camera.
    pub fn pushed_forward(&self, distance: f32) -> Self {
        let mut matrix = self.0;
        let offset = self.forward_axis() * distance;
        matrix.w_axis += offset.extend(0.0);
        Self(matrix)
    }

    /// Express this (world-space) pose in the local frame of `anchor`.
    pub fn relative_to(&self, anchor: &Pose) -> Self {
        Self(anchor.0.inverse() * self.0)
    }

    /// Whether this pose is exactly the identity transform.
    pub fn is_identity(&self) -> bool {
        self.0 == Mat4::IDENTITY
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for Pose {
    fn from(matrix: Mat4) -> Self {
        Self(matrix)
    }
}

impl From<[f32; 16]> for Pose {
    fn from(cols: [f32; 16]) -> Self {
        Self::from_cols_array(&cols)
    }
}

impl From<Pose> for [f32; 16] {
    fn from(pose: Pose) -> Self {
        pose.to_cols_array()
    }
}
