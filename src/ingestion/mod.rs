pub mod json_loader;
pub mod jsonl_loader;
pub mod texture;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, RibbonError};
use crate::types::Stroke;

/// Result of the ingestion stage.
#[derive(Debug)]
pub struct IngestionResult {
    pub strokes: Vec<Stroke>,
    pub stats: IngestionStats,
}

/// Statistics about the ingested pose streams.
#[derive(Debug)]
pub struct IngestionStats {
    pub total_strokes: usize,
    pub total_poses: usize,
    pub dropped_strokes: usize,
    pub input_format: String,
}

/// Supported pose stream formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A single document holding every stroke.
    Json,
    /// One pose per line, blank line between strokes.
    JsonLines,
}

impl InputFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(InputFormat::Json),
            "jsonl" | "ndjson" => Ok(InputFormat::JsonLines),
            _ => Err(RibbonError::Input(format!(
                "Unsupported file format: .{ext}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Json => "JSON",
            InputFormat::JsonLines => "JSON Lines",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load every stroke from a recorded pose stream.
///
/// Strokes without poses are dropped with a warning; they would produce no
/// geometry.
pub fn load_strokes(path: &Path) -> Result<IngestionResult> {
    // 1. Validate input exists
    if !path.exists() {
        return Err(RibbonError::Input(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    // 2. Detect format
    let format = InputFormat::from_path(path)?;
    info!(format = %format, path = %path.display(), "Detected input format");

    // 3. Dispatch to loader
    let content = std::fs::read_to_string(path)?;
    let parsed = match format {
        InputFormat::Json => json_loader::parse_strokes(&content)?,
        InputFormat::JsonLines => jsonl_loader::parse_strokes(&content)?,
    };

    // 4. Drop empty strokes
    let before = parsed.len();
    let strokes: Vec<Stroke> = parsed
        .into_iter()
        .filter(|stroke| {
            if stroke.poses.is_empty() {
                warn!(stroke = %stroke.name, "Dropping stroke without poses");
                false
            } else {
                true
            }
        })
        .collect();

    // 5. Compute stats
    let stats = IngestionStats {
        total_strokes: strokes.len(),
        total_poses: strokes.iter().map(|s| s.poses.len()).sum(),
        dropped_strokes: before - strokes.len(),
        input_format: format.to_string(),
    };
    debug!(
        strokes = stats.total_strokes,
        poses = stats.total_poses,
        dropped = stats.dropped_strokes,
        "Ingestion stats"
    );

    Ok(IngestionResult { strokes, stats })
}

/// Name used for strokes the input file leaves unnamed.
pub(crate) fn default_stroke_name(index: usize) -> String {
    format!("stroke_{index:03}")
}
