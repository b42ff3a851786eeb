//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate granularity (finite, > 0)
fn parse_granularity(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("Granularity must be greater than 0, got {}", value));
    }
    Ok(value)
}

/// Turn camera frames and still images into glyph art
#[derive(Parser, Debug)]
#[command(name = "glyphcam")]
#[command(version, about = "Camera and image to glyph-grid converter", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Rendering overrides shared by `render` and `live`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Block coarseness (larger = fewer, bigger cells)
    #[arg(short, long, value_parser = parse_granularity)]
    pub granularity: Option<f64>,

    /// Glyph ramp name (see `ramps`) or a literal glyph string
    #[arg(short, long)]
    pub ramp: Option<String>,

    /// Map bright pixels to the start of the ramp
    #[arg(long)]
    pub invert: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a still image and print its glyph text
    Render {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Run an interactive live session
    Live {
        /// Camera device index (from list-cameras)
        #[arg(long)]
        camera: Option<u32>,

        /// Use a generated test pattern instead of a camera
        #[arg(long)]
        synthetic: bool,

        /// Do not mirror live frames
        #[arg(long)]
        no_mirror: bool,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// List available cameras
    ListCameras,
    /// List built-in glyph ramps
    Ramps,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
