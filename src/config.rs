use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, RibbonError};

/// Default ribbon thickness in world units (metres for AR tracking).
pub const DEFAULT_WIDTH: f32 = 0.2;

/// Default weight of the newest sample in the exponential smoothing blend.
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.3;

/// Parameters that shape the generated strip.
///
/// Any change to these regenerates the whole mesh from the retained history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonConfig {
    /// Ribbon thickness. Zero or negative values give a degenerate strip.
    pub width: f32,
    /// Multiplier from cumulative arc length to the U texture coordinate.
    pub texture_horizontal_scale: f32,
    /// Weight of the current sample, in `(0, 1]`. `1.0` disables smoothing.
    pub smoothing_factor: f32,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            texture_horizontal_scale: 1.0,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl RibbonConfig {
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Reject values that would poison the geometry with NaN.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() {
            return Err(RibbonError::InvalidConfig(format!(
                "width must be finite, got {}",
                self.width
            )));
        }
        if !self.texture_horizontal_scale.is_finite() {
            return Err(RibbonError::InvalidConfig(format!(
                "texture horizontal scale must be finite, got {}",
                self.texture_horizontal_scale
            )));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(RibbonError::InvalidConfig(format!(
                "smoothing factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }
        Ok(())
    }
}

/// Material parameters for exported ribbons.
#[derive(Debug, Clone)]
pub struct MaterialConfig {
    pub base_color: [f32; 4],
    /// Optional PNG/JPEG image streamed along the ribbon.
    pub texture: Option<PathBuf>,
    /// Derive the texture horizontal scale from the texture's aspect ratio.
    pub fit_texture_aspect: bool,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
            fit_texture_aspect: false,
        }
    }
}

/// Fully resolved pipeline configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ribbon: RibbonConfig,
    pub material: MaterialConfig,
    /// Sample each pose this far in front of itself along its forward axis.
    pub forward_offset: f32,
    /// Start every ribbon with a cross-section at its anchor origin.
    pub seed_at_anchor: bool,
    pub write_json: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            ribbon: RibbonConfig::default(),
            material: MaterialConfig::default(),
            forward_offset: 0.0,
            seed_at_anchor: false,
            write_json: false,
            dry_run: false,
            verbose: false,
            threads: None,
        }
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "ribbon-strip",
    about = "Replay recorded pose streams into triangle-strip ribbons and export them as GLB",
    version
)]
pub struct CliArgs {
    /// Input pose stream (.json, .jsonl or .ndjson)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output GLB file
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Ribbon width in world units
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: f32,

    /// Texture U units per world unit of arc length
    #[arg(long, default_value_t = 1.0)]
    pub texture_scale: f32,

    /// Smoothing weight of the newest sample (0, 1]; 1 disables smoothing
    #[arg(long, default_value_t = DEFAULT_SMOOTHING_FACTOR)]
    pub smoothing: f32,

    /// Sample each pose this far ahead along its forward axis
    #[arg(long, default_value_t = 0.0)]
    pub forward_offset: f32,

    /// Start each ribbon with a cross-section at its anchor origin
    #[arg(long)]
    pub seed_anchor: bool,

    /// PNG or JPEG texture to stream along the ribbon
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Derive the texture scale from the texture's aspect ratio
    #[arg(long, requires = "texture")]
    pub fit_texture_aspect: bool,

    /// Base color as r,g,b[,a] in 0..1
    #[arg(long, value_parser = parse_color, default_value = "1,1,1,1")]
    pub color: [f32; 4],

    /// Also write a JSON geometry dump next to the GLB
    #[arg(long)]
    pub json: bool,

    /// Build ribbons and report stats only
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

/// Parse `r,g,b` or `r,g,b,a` with components in `0..=1`.
fn parse_color(s: &str) -> std::result::Result<[f32; 4], String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid color component: {e}"))?;

    let color = match parts.as_slice() {
        [r, g, b] => [*r, *g, *b, 1.0],
        [r, g, b, a] => [*r, *g, *b, *a],
        _ => return Err(format!("expected 3 or 4 components, got {}", parts.len())),
    };

    if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
        return Err("color components must be within 0..1".into());
    }
    Ok(color)
}

impl From<CliArgs> for PipelineConfig {
    fn from(args: CliArgs) -> Self {
        PipelineConfig {
            input: args.input,
            output: args.output,
            ribbon: RibbonConfig {
                width: args.width,
                texture_horizontal_scale: args.texture_scale,
                smoothing_factor: args.smoothing,
            },
            material: MaterialConfig {
                base_color: args.color,
                texture: args.texture,
                fit_texture_aspect: args.fit_texture_aspect,
            },
            forward_offset: args.forward_offset,
            seed_at_anchor: args.seed_anchor,
            write_json: args.json,
            dry_run: args.dry_run,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}
