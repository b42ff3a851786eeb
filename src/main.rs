mod cli;

use clap::Parser;
use cli::{Args, Command};
use glyphcam::camera::{CameraSettings, SyntheticSource};
use glyphcam::config::Config;
use glyphcam::session::SessionOptions;

/// Install the logger: `warn` by default, raised by `-v`/`-vv`, `RUST_LOG` wins.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

#[cfg(feature = "camera")]
fn run_camera(settings: CameraSettings, options: SessionOptions) -> Result<(), String> {
    let source = glyphcam::camera::HardwareSource::new(settings).map_err(|e| e.to_string())?;
    cli::run_live(source, options)
}

#[cfg(not(feature = "camera"))]
fn run_camera(_settings: CameraSettings, _options: SessionOptions) -> Result<(), String> {
    Err(concat!(
        "glyphcam was built without camera support; ",
        "rebuild with `--features camera` or pass --synthetic"
    )
    .to_string())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    // If --config is given the file may still be missing; defaults apply then
    let config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {}", e);
            eprintln!("Using default settings.\n");
            Config::default()
        }
    };

    let result = match args.command {
        Command::Render { image, render } => cli::resolve_options(&config, &render)
            .and_then(|options| cli::render_still(&image, &options)),
        Command::Live {
            camera,
            synthetic,
            no_mirror,
            render,
        } => cli::resolve_options(&config, &render).and_then(|options| {
            let mut settings = config.camera_settings();
            if let Some(index) = camera {
                settings.device_index = index;
            }
            if no_mirror {
                settings.mirror = false;
            }
            if synthetic {
                let source =
                    SyntheticSource::new(settings.resolution).with_mirror(settings.mirror);
                cli::run_live(source, options)
            } else {
                run_camera(settings, options)
            }
        }),
        Command::ListCameras => {
            cli::list_cameras();
            Ok(())
        }
        Command::Ramps => {
            cli::list_ramps();
            Ok(())
        }
        Command::Config { action } => {
            cli::handle_config_action(action, args.config.as_deref(), &config);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
