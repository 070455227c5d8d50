pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod ribbon;
pub mod types;

pub use config::{MaterialConfig, PipelineConfig, RibbonConfig};
pub use error::{Result, RibbonError};
pub use pipeline::Pipeline;
pub use ribbon::{RibbonBuilder, RibbonState, render_from_history};
pub use types::{Pose, RibbonGeometry};
