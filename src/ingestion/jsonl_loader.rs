use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RibbonError};
use crate::types::{Pose, Stroke};

use super::default_stroke_name;

/// One line of a pose stream: a bare matrix or `{ "matrix": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoseLine {
    Bare(Pose),
    Tagged { matrix: Pose },
}

impl PoseLine {
    fn into_pose(self) -> Pose {
        match self {
            PoseLine::Bare(pose) | PoseLine::Tagged { matrix: pose } => pose,
        }
    }
}

/// Parse a JSON Lines pose stream.
///
/// Every non-empty line is one pose sample. A blank line is "pen up": it ends
/// the current stroke. Lines starting with `#` are ignored.
pub fn parse_strokes(content: &str) -> Result<Vec<Stroke>> {
    let mut strokes = Vec::new();
    let mut current: Vec<Pose> = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if !current.is_empty() {
                strokes.push(finish_stroke(strokes.len(), std::mem::take(&mut current)));
            }
            continue;
        }

        let parsed: PoseLine = serde_json::from_str(line).map_err(|e| {
            RibbonError::Input(format!("Invalid pose on line {}: {e}", line_no + 1))
        })?;
        current.push(parsed.into_pose());
    }

    if !current.is_empty() {
        strokes.push(finish_stroke(strokes.len(), current));
    }

    debug!(stroke_count = strokes.len(), "Parsed JSON Lines pose stream");
    Ok(strokes)
}

fn finish_stroke(index: usize, poses: Vec<Pose>) -> Stroke {
    Stroke {
        name: default_stroke_name(index),
        poses,
        ..Default::default()
    }
}
