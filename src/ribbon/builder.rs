use tracing::debug;

use crate::config::RibbonConfig;
use crate::error::Result;
use crate::types::{Pose, RibbonGeometry};

use super::strip::{StripCursor, check_pose, replay};

/// Lifecycle of a ribbon: no cross-sections yet, or at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibbonState {
    Empty,
    Building,
}

/// Incrementally grows a triangle-strip ribbon from a stream of poses.
///
/// The raw (unsmoothed) pose history is retained so that a change to width,
/// texture scale or smoothing can regenerate the mesh from scratch; the
/// regenerated mesh is identical to the one built by repeated [`append`]s.
///
/// The builder is a plain synchronous data structure. Mutation takes
/// `&mut self`, so a consumer on another thread needs either a lock around
/// the builder or an owned [`snapshot`] of the geometry.
///
/// [`append`]: RibbonBuilder::append
/// [`snapshot`]: RibbonBuilder::snapshot
#[derive(Debug, Clone)]
pub struct RibbonBuilder {
    config: RibbonConfig,
    pose_history: Vec<Pose>,
    cursor: StripCursor,
    geometry: RibbonGeometry,
}

impl RibbonBuilder {
    /// Create a ribbon and emit one cross-section per initial pose.
    ///
    /// Fails if the configuration or any initial pose is non-finite.
    pub fn new(config: RibbonConfig, initial_poses: &[Pose]) -> Result<Self> {
        config.validate()?;
        for (index, pose) in initial_poses.iter().enumerate() {
            check_pose(pose, index)?;
        }

        let (geometry, cursor) = replay(initial_poses, &config);
        Ok(Self {
            config,
            pose_history: initial_poses.to_vec(),
            cursor,
            geometry,
        })
    }

    /// An empty ribbon of the given width with default texture scale and
    /// smoothing.
    pub fn with_width(width: f32) -> Result<Self> {
        Self::new(RibbonConfig::with_width(width), &[])
    }

    /// Accept the next pose sample and extend the strip by one cross-section.
    ///
    /// A non-finite pose is rejected and leaves the ribbon untouched.
    pub fn append(&mut self, pose: Pose) -> Result<()> {
        check_pose(&pose, self.pose_history.len())?;
        self.cursor.advance(&pose, &self.config, &mut self.geometry);
        self.pose_history.push(pose);
        Ok(())
    }

    /// Read view of the strip buffers.
    pub fn geometry(&self) -> &RibbonGeometry {
        &self.geometry
    }

    /// Owned copy of the strip buffers, for handing to another thread.
    pub fn snapshot(&self) -> RibbonGeometry {
        self.geometry.clone()
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn texture_horizontal_scale(&self) -> f32 {
        self.config.texture_horizontal_scale
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.config.smoothing_factor
    }

    pub fn set_width(&mut self, width: f32) -> Result<()> {
        self.reconfigure(RibbonConfig {
            width,
            ..self.config
        })
    }

    pub fn set_texture_horizontal_scale(&mut self, scale: f32) -> Result<()> {
        self.reconfigure(RibbonConfig {
            texture_horizontal_scale: scale,
            ..self.config
        })
    }

    pub fn set_smoothing_factor(&mut self, factor: f32) -> Result<()> {
        self.reconfigure(RibbonConfig {
            smoothing_factor: factor,
            ..self.config
        })
    }

    /// Replace the whole configuration and regenerate from history.
    pub fn reconfigure(&mut self, config: RibbonConfig) -> Result<()> {
        config.validate()?;
        if config == self.config {
            return Ok(());
        }
        self.config = config;
        self.regenerate();
        Ok(())
    }

    /// Arc length travelled by the smoothed pose positions so far.
    pub fn cumulative_length(&self) -> f64 {
        self.cursor.cumulative_length()
    }

    /// The last accepted pose after smoothing.
    pub fn previous_pose(&self) -> Option<&Pose> {
        self.cursor.previous()
    }

    /// Raw poses in the order they were accepted.
    pub fn pose_history(&self) -> &[Pose] {
        &self.pose_history
    }

    /// Number of accepted poses.
    pub fn len(&self) -> usize {
        self.pose_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pose_history.is_empty()
    }

    pub fn state(&self) -> RibbonState {
        if self.is_empty() {
            RibbonState::Empty
        } else {
            RibbonState::Building
        }
    }

    fn regenerate(&mut self) {
        debug!(
            poses = self.pose_history.len(),
            width = self.config.width,
            scale = self.config.texture_horizontal_scale,
            smoothing = self.config.smoothing_factor,
            "Regenerating ribbon from history"
        );
        self.geometry.clear();
        self.cursor = StripCursor::default();
        for pose in &self.pose_history {
            self.cursor.advance(pose, &self.config, &mut self.geometry);
        }
    }
}
