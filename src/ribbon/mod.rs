//! Pose stream to triangle-strip ribbon.
//!
//! Each accepted pose is smoothed against the previous one, turned into a
//! [`CrossSection`] (two edge points offset along the pose's local up axis)
//! and appended to the strip with U set from the running arc length.

pub mod builder;
pub mod cross_section;
pub mod smoothing;
pub mod strip;

pub use builder::{RibbonBuilder, RibbonState};
pub use cross_section::CrossSection;
pub use smoothing::{samples_to_converge, smooth_pose};
pub use strip::render_from_history;
