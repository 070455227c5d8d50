use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RibbonError};
use crate::types::{Pose, Stroke};

use super::default_stroke_name;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrokeFile {
    strokes: Vec<StrokeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StrokeRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    anchor: Option<Pose>,
    #[serde(default)]
    width: Option<f32>,
    poses: Vec<Pose>,
}

/// Parse a `{ "strokes": [...] }` document.
///
/// Each stroke carries its poses as column-major 16-float arrays, plus an
/// optional name, anchor matrix and width override.
pub fn parse_strokes(content: &str) -> Result<Vec<Stroke>> {
    let file: StrokeFile = serde_json::from_str(content)
        .map_err(|e| RibbonError::Input(format!("Failed to parse stroke file: {e}")))?;

    debug!(stroke_count = file.strokes.len(), "Parsed JSON stroke file");

    Ok(file
        .strokes
        .into_iter()
        .enumerate()
        .map(|(i, record)| Stroke {
            name: record.name.unwrap_or_else(|| default_stroke_name(i)),
            anchor: record.anchor.unwrap_or_default(),
            width: record.width,
            poses: record.poses,
        })
        .collect())
}
