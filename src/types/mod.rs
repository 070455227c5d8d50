pub mod geometry;
pub mod material;
pub mod pose;
pub mod stroke;

pub use geometry::RibbonGeometry;
pub use material::{RibbonMaterial, TextureData};
pub use pose::Pose;
pub use stroke::{BuiltRibbon, Stroke};
