//! Temporal smoothing applied to each pose before it becomes a cross-section.
//!
//! Every entry of the 4x4 matrix, rotation block included, is blended
//! linearly: `smoothed = factor * current + (1 - factor) * previous`. Blending
//! rotation entries is an approximation of rotation interpolation, not a
//! SLERP; the blended basis can shrink slightly, which is why
//! [`Pose::local_up_axis`] re-normalizes before use.

use crate::types::Pose;

/// Blend `current` toward `previous`. `factor` is the weight of `current`.
pub fn smooth_pose(previous: &Pose, current: &Pose, factor: f32) -> Pose {
    if factor >= 1.0 {
        return *current;
    }
    let blended = current.matrix().mul_scalar(factor) + previous.matrix().mul_scalar(1.0 - factor);
    Pose::from_matrix(blended)
}

/// Number of constant samples needed before the smoothed pose is within
/// `tolerance` (as a fraction of the initial divergence) of its target.
pub fn samples_to_converge(factor: f32, tolerance: f32) -> usize {
    if factor >= 1.0 {
        return 1;
    }
    let retained = (1.0 - factor).ln();
    (tolerance.ln() / retained).ceil().max(1.0) as usize
}
