use crate::config::RibbonConfig;
use crate::error::{Result, RibbonError};
use crate::types::{Pose, RibbonGeometry};

use super::cross_section::CrossSection;
use super::smoothing::smooth_pose;

/// State folded from one accepted pose to the next.
///
/// Both the full rebuild and the incremental append path go through
/// [`StripCursor::advance`], so they cannot drift apart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct StripCursor {
    previous: Option<Pose>,
    cumulative_length: f64,
}

impl StripCursor {
    pub(crate) fn previous(&self) -> Option<&Pose> {
        self.previous.as_ref()
    }

    pub(crate) fn cumulative_length(&self) -> f64 {
        self.cumulative_length
    }

    /// Smooth `pose`, extend the arc length and emit one cross-section.
    ///
    /// The first pose seeds the cursor unsmoothed and contributes no length.
    pub(crate) fn advance(
        &mut self,
        pose: &Pose,
        config: &RibbonConfig,
        geometry: &mut RibbonGeometry,
    ) {
        let smoothed = match &self.previous {
            Some(previous) => {
                let smoothed = smooth_pose(previous, pose, config.smoothing_factor);
                self.cumulative_length += previous
                    .position()
                    .as_dvec3()
                    .distance(smoothed.position().as_dvec3());
                smoothed
            }
            None => *pose,
        };

        let section = CrossSection::from_pose(&smoothed, config.width);
        let u = (self.cumulative_length * f64::from(config.texture_horizontal_scale)) as f32;
        geometry.push_cross_section(section.top, section.bottom, section.up, u);

        self.previous = Some(smoothed);
    }
}

/// Replay `poses` from a fresh cursor. Inputs are assumed validated.
pub(crate) fn replay(poses: &[Pose], config: &RibbonConfig) -> (RibbonGeometry, StripCursor) {
    let mut geometry = RibbonGeometry::with_capacity(poses.len());
    let mut cursor = StripCursor::default();
    for pose in poses {
        cursor.advance(pose, config, &mut geometry);
    }
    (geometry, cursor)
}

pub(crate) fn check_pose(pose: &Pose, index: usize) -> Result<()> {
    if pose.is_finite() {
        Ok(())
    } else {
        Err(RibbonError::InvalidPose {
            index,
            reason: "matrix contains non-finite values".into(),
        })
    }
}

/// Build the complete strip for a pose history in one pass.
///
/// This is the pure form of what [`RibbonBuilder`](super::RibbonBuilder)
/// maintains incrementally: same smoothing, same arc length, same buffers.
pub fn render_from_history(poses: &[Pose], config: &RibbonConfig) -> Result<RibbonGeometry> {
    config.validate()?;
    for (index, pose) in poses.iter().enumerate() {
        check_pose(pose, index)?;
    }
    Ok(replay(poses, config).0)
}
