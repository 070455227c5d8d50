use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, RibbonConfig};
use crate::error::{Result, RibbonError};
use crate::export::{write_geometry_json, write_glb};
use crate::ingestion::{self, IngestionResult, texture};
use crate::ribbon::RibbonBuilder;
use crate::types::{BuiltRibbon, Pose, RibbonMaterial, Stroke, TextureData};

/// Summary of a completed pipeline run.
#[derive(Debug)]
pub struct ProcessingResult {
    pub stroke_count: usize,
    pub vertex_count: usize,
    pub total_length: f64,
    pub glb_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub duration: Duration,
}

/// Pipeline orchestrator -- drives ingestion, ribbon building and export.
pub struct Pipeline;

impl Pipeline {
    /// Run the full replay pipeline.
    pub fn run(config: &PipelineConfig) -> Result<ProcessingResult> {
        let start = Instant::now();
        config.ribbon.validate()?;

        info!(input = %config.input.display(), "Starting pipeline");

        info!("Stage 1/3: Ingestion");
        let ingestion = ingestion::load_strokes(&config.input)?;

        let mut material = RibbonMaterial {
            base_color: config.material.base_color,
            texture: None,
        };
        if let Some(path) = &config.material.texture {
            material.texture = Some(texture::load_texture(path)?);
        }
        let options = StrokeOptions {
            forward_offset: config.forward_offset,
            seed_at_anchor: config.seed_at_anchor,
            fit_texture: material
                .texture
                .as_ref()
                .filter(|_| config.material.fit_texture_aspect),
        };

        if options.fit_texture.is_some() {
            info!("Fitting texture scale to texture aspect ratio per stroke width");
        }

        info!("Stage 2/3: Building ribbons");
        let ribbons = Self::build(&config.ribbon, &options, &ingestion.strokes)?;
        let vertex_count: usize = ribbons.iter().map(|r| r.geometry.vertex_count()).sum();
        let total_length: f64 = ribbons.iter().map(|r| r.cumulative_length).sum();

        if config.dry_run {
            info!("--dry-run: skipping export");
            print_dry_run_summary(&ingestion, &ribbons, &config.ribbon, &options);
            return Ok(ProcessingResult {
                stroke_count: ribbons.len(),
                vertex_count,
                total_length,
                glb_path: None,
                json_path: None,
                duration: start.elapsed(),
            });
        }

        info!("Stage 3/3: Export");
        let (glb_path, json_path) = Self::export(config, &ribbons, &material)?;

        let duration = start.elapsed();
        info!(
            strokes = ribbons.len(),
            vertices = vertex_count,
            elapsed = ?duration,
            "Pipeline complete"
        );

        Ok(ProcessingResult {
            stroke_count: ribbons.len(),
            vertex_count,
            total_length,
            glb_path: Some(glb_path),
            json_path,
            duration,
        })
    }

    fn build(
        ribbon_config: &RibbonConfig,
        options: &StrokeOptions<'_>,
        strokes: &[Stroke],
    ) -> Result<Vec<BuiltRibbon>> {
        strokes
            .par_iter()
            .map(|stroke| {
                let ribbon = build_stroke(stroke, ribbon_config, options)?;
                debug!(
                    stroke = %ribbon.name,
                    poses = stroke.poses.len(),
                    vertices = ribbon.geometry.vertex_count(),
                    length = ribbon.cumulative_length,
                    "Built ribbon"
                );
                Ok(ribbon)
            })
            .collect()
    }

    fn export(
        config: &PipelineConfig,
        ribbons: &[BuiltRibbon],
        material: &RibbonMaterial,
    ) -> Result<(PathBuf, Option<PathBuf>)> {
        ensure_parent_dir(&config.output)?;

        let glb = write_glb(ribbons, material)?;
        std::fs::write(&config.output, &glb)?;
        info!(output = %config.output.display(), bytes = glb.len(), "Wrote GLB");

        let json_path = if config.write_json {
            let path = config.output.with_extension("json");
            let json = write_geometry_json(ribbons)?;
            std::fs::write(&path, json)?;
            info!(output = %path.display(), "Wrote geometry JSON");
            Some(path)
        } else {
            None
        };

        Ok((config.output.clone(), json_path))
    }
}

/// How stroke samples are turned into builder input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrokeOptions<'a> {
    /// Sample this far ahead along each pose's forward axis.
    pub forward_offset: f32,
    /// Start each ribbon with a cross-section at the anchor origin.
    pub seed_at_anchor: bool,
    /// Derive each stroke's texture scale from this texture's aspect ratio
    /// at the stroke's own width.
    pub fit_texture: Option<&'a TextureData>,
}

/// Replay one stroke through a fresh ribbon builder.
///
/// World-space samples are optionally pushed forward along their view
/// direction, then expressed in the stroke anchor's frame so the exported
/// node can carry the anchor as its transform. Pose errors are reported
/// with the index of the sample within the stroke.
pub fn build_stroke(
    stroke: &Stroke,
    base: &RibbonConfig,
    options: &StrokeOptions<'_>,
) -> Result<BuiltRibbon> {
    if !stroke.anchor.is_invertible() {
        return Err(RibbonError::Input(format!(
            "Stroke {}: anchor matrix must be finite and invertible",
            stroke.name
        )));
    }

    let mut config = *base;
    if let Some(width) = stroke.width {
        config.width = width;
    }
    if let Some(tex) = options.fit_texture {
        match texture::fit_horizontal_scale(tex, config.width) {
            Some(scale) => config.texture_horizontal_scale = scale,
            None => warn!(
                stroke = %stroke.name,
                "Cannot fit texture aspect for a zero-width ribbon"
            ),
        }
    }

    let seed: &[Pose] = if options.seed_at_anchor { &[Pose::IDENTITY] } else { &[] };
    let mut builder = RibbonBuilder::new(config, seed)?;

    for (index, pose) in stroke.poses.iter().enumerate() {
        let sample = if options.forward_offset != 0.0 {
            pose.pushed_forward(options.forward_offset)
        } else {
            *pose
        };
        builder
            .append(sample.relative_to(&stroke.anchor))
            .map_err(|e| match e {
                RibbonError::InvalidPose { reason, .. } => RibbonError::InvalidPose {
                    index,
                    reason: format!("stroke {}: {reason}", stroke.name),
                },
                other => other,
            })?;
    }

    Ok(BuiltRibbon {
        name: stroke.name.clone(),
        anchor: stroke.anchor,
        cumulative_length: builder.cumulative_length(),
        geometry: builder.snapshot(),
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Print dry-run summary with per-stroke stats.
fn print_dry_run_summary(
    ingestion: &IngestionResult,
    ribbons: &[BuiltRibbon],
    config: &RibbonConfig,
    options: &StrokeOptions<'_>,
) {
    let stats = &ingestion.stats;
    println!("=== Dry Run Summary ===");
    println!("  Format:    {}", stats.input_format);
    println!("  Strokes:   {}", stats.total_strokes);
    println!("  Poses:     {}", stats.total_poses);
    println!("  Dropped:   {}", stats.dropped_strokes);
    println!("  Width:     {:.3}", config.width);
    println!("  Smoothing: {:.2}", config.smoothing_factor);
    if options.fit_texture.is_some() {
        println!("  Tex scale: fit to texture aspect");
    } else {
        println!("  Tex scale: {:.3}", config.texture_horizontal_scale);
    }
    println!();
    for ribbon in ribbons {
        println!(
            "  {:<16} {:>6} vertices  {:>8.3} m",
            ribbon.name,
            ribbon.geometry.vertex_count(),
            ribbon.cumulative_length
        );
    }
}
