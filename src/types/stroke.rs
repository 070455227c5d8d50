use super::{Pose, RibbonGeometry};

/// One recorded "pen down .. pen up" sequence of poses.
#[derive(Debug, Clone, Default)]
pub struct Stroke {
    pub name: String,
    /// Frame the ribbon is built in; poses are given in world space.
    pub anchor: Pose,
    /// Overrides the configured ribbon width for this stroke.
    pub width: Option<f32>,
    pub poses: Vec<Pose>,
}

/// A stroke after it has been run through the ribbon builder.
#[derive(Debug, Clone)]
pub struct BuiltRibbon {
    pub name: String,
    pub anchor: Pose,
    pub geometry: RibbonGeometry,
    pub cumulative_length: f64,
}
