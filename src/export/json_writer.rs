use serde::Serialize;

use crate::error::{Result, RibbonError};
use crate::types::{BuiltRibbon, RibbonGeometry};

#[derive(Serialize)]
struct GeometryDump<'a> {
    generator: &'static str,
    ribbons: Vec<RibbonDump<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RibbonDump<'a> {
    name: &'a str,
    /// Column-major anchor matrix.
    anchor: [f32; 16],
    cumulative_length: f64,
    vertex_count: usize,
    primitive: &'static str,
    #[serde(flatten)]
    geometry: &'a RibbonGeometry,
}

/// Dump every ribbon's strip buffers as pretty-printed JSON.
///
/// Meant for debugging and for consumers that want the raw buffers without
/// a glTF loader. Empty ribbons are kept so stroke numbering stays intact.
pub fn write_geometry_json(ribbons: &[BuiltRibbon]) -> Result<String> {
    let dump = GeometryDump {
        generator: "ribbon-strip",
        ribbons: ribbons
            .iter()
            .map(|r| RibbonDump {
                name: &r.name,
                anchor: r.anchor.to_cols_array(),
                cumulative_length: r.cumulative_length,
                vertex_count: r.geometry.vertex_count(),
                primitive: "TRIANGLE_STRIP",
                geometry: &r.geometry,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&dump)
        .map_err(|e| RibbonError::Output(format!("Failed to serialize geometry: {e}")))
}
