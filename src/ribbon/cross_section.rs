use glam::Vec3;

use crate::types::Pose;

/// The pair of edge points a single (smoothed) pose contributes to the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    pub top: Vec3,
    pub bottom: Vec3,
    /// Unit normal at the top vertex; the bottom vertex uses its negation.
    pub up: Vec3,
}

impl CrossSection {
    /// Offset the pose position by `±width / 2` along the pose's local up
    /// axis. The offset is in the pose frame, not along world Y, so the
    /// ribbon banks with the pose.
    pub fn from_pose(pose: &Pose, width: f32) -> Self {
        let up = pose.local_up_axis();
        let center = pose.position();
        let half = up * (width * 0.5);
        Self {
            top: center + half,
            bottom: center - half,
            up,
        }
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.top + self.bottom) * 0.5
    }
}
