//! Subcommand handlers for render, ramps, list-cameras and config actions.

use std::path::Path;

use super::args::{ConfigAction, RenderArgs};
use glyphcam::ascii::{reduce, to_glyph_grid, GlyphRamp, Granularity, RampKind};
use glyphcam::config::{default_path, Config, DEFAULT_CONFIG_TEMPLATE};
use glyphcam::session::SessionOptions;
use glyphcam::still;

/// Merge settings: CLI args > config file > built-in defaults.
pub fn resolve_options(config: &Config, render: &RenderArgs) -> Result<SessionOptions, String> {
    let mut options = config.session_options().map_err(|e| e.to_string())?;
    if let Some(value) = render.granularity {
        options.granularity = Granularity::new(value).map_err(|e| e.to_string())?;
    }
    if let Some(name) = &render.ramp {
        options.ramp = GlyphRamp::parse(name).map_err(|e| e.to_string())?;
    }
    let invert = render.invert || config.render.invert;
    options.ramp = options.ramp.inverted(invert);
    Ok(options)
}

/// Decode a still image and print its glyph text to stdout.
pub fn render_still(path: &Path, options: &SessionOptions) -> Result<(), String> {
    let frame = still::decode(path, options.max_side).map_err(|e| e.to_string())?;
    let reduced = reduce(&frame, options.granularity.get()).map_err(|e| e.to_string())?;
    let grid = to_glyph_grid(&reduced.blocks, &options.ramp);
    log::info!(
        "Rendered {} as {}x{} glyphs",
        path.display(),
        grid.width(),
        grid.height()
    );
    println!("{}", grid.to_text());
    Ok(())
}

/// Print the built-in ramps.
pub fn list_ramps() {
    println!("Built-in glyph ramps:");
    for kind in RampKind::ALL {
        let glyphs: String = kind.chars().iter().collect();
        let marker = if kind == RampKind::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {:<9} {:>2} levels  [{}]{}",
            kind.name(),
            kind.chars().len(),
            glyphs,
            marker
        );
    }
    println!();
    println!("Any other string passed to --ramp is used as a custom ramp, darkest first.");
}

/// List available cameras and print them to stdout.
#[cfg(feature = "camera")]
pub fn list_cameras() {
    match glyphcam::camera::list_devices() {
        Ok(devices) => {
            if devices.is_empty() {
                println!("No cameras found.");
                println!();
                println!("Make sure your camera is connected and permissions are granted.");
            } else {
                println!("Available cameras:");
                for device in devices {
                    println!("  {}", device);
                }
                println!();
                println!("Use --camera <index> to select a camera.");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "camera"))]
pub fn list_cameras() {
    eprintln!("glyphcam was built without camera support.");
    eprintln!("Rebuild with `--features camera`, or use `live --synthetic`.");
    std::process::exit(1);
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>, config: &Config) {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Camera: {}", config.camera.device);
            println!(
                "  Capture: {}x{} @ {} fps",
                config.camera.width, config.camera.height, config.camera.fps
            );
            println!(
                "  Mirror: {}",
                if config.camera.mirror { "yes" } else { "no" }
            );
            println!("  Granularity: {}", config.render.granularity);
            println!("  Ramp: {}", config.render.ramp);
            println!(
                "  Invert: {}",
                if config.render.invert { "yes" } else { "no" }
            );
            println!(
                "  Hide image: {}",
                if config.render.hide_image { "yes" } else { "no" }
            );
            println!("  Still max side: {} px", config.still.max_side);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'glyphcam config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
