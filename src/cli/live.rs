//! Interactive live session: redraws glyph text in the terminal and takes
//! one-letter commands from stdin.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use glyphcam::ascii::{to_glyph_grid, Frame, GlyphGrid, GlyphRamp, RampKind};
use glyphcam::camera::FrameSource;
use glyphcam::coordinator::Snapshot;
use glyphcam::session::{Session, SessionOptions};

const HELP: &str = "commands: f freeze/unfreeze | u PATH upload | b back to camera | \
g N granularity | r [NAME] ramp | h hide/show image layer | c copy text | q quit";

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run a session on `source` until `q` or Ctrl+C.
pub fn run_live<S: FrameSource>(source: S, options: SessionOptions) -> Result<(), String> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
            eprintln!("\nReceived Ctrl+C, shutting down...");
        })
        .map_err(|e| format!("Failed to install Ctrl+C handler: {}", e))?;
    }

    let interval = Duration::from_secs_f64(1.0 / options.fps.max(1) as f64);
    let mut session = Session::start(source, options).map_err(|e| e.to_string())?;
    let commands = spawn_stdin_reader();

    let mut last_drawn: Option<Arc<Snapshot>> = None;
    let mut dirty = true;
    while running.load(Ordering::SeqCst) {
        while let Ok(line) = commands.try_recv() {
            match apply_command(&mut session, &line) {
                Ok(Flow::Quit) => running.store(false, Ordering::SeqCst),
                Ok(Flow::Continue) => {}
                Err(e) => eprintln!("Error: {}", e),
            }
            dirty = true;
        }

        let current = session.current_snapshot();
        let changed = match (&current, &last_drawn) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        if changed || dirty {
            draw(&session);
            last_drawn = current;
            dirty = false;
        }
        thread::sleep(interval);
    }

    session.stop();
    Ok(())
}

/// Apply one stdin command line to the session.
pub fn apply_command(session: &mut Session, line: &str) -> Result<Flow, String> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "f" | "freeze" => {
            session.freeze().map_err(|e| e.to_string())?;
        }
        "u" | "upload" => {
            if arg.is_empty() {
                return Err("upload needs a file path".to_string());
            }
            session.upload(Path::new(arg)).map_err(|e| e.to_string())?;
        }
        "b" | "back" => session.back_to_camera().map_err(|e| e.to_string())?,
        "g" | "granularity" => {
            let value: f64 = arg
                .parse()
                .map_err(|_| format!("'{}' is not a valid number", arg))?;
            session.set_granularity(value).map_err(|e| e.to_string())?;
        }
        "r" | "ramp" => {
            let invert = session.glyph_ramp().is_inverted();
            let ramp = if arg.is_empty() {
                let next = RampKind::from_name(session.glyph_ramp().name())
                    .map(|kind| kind.next())
                    .unwrap_or_default();
                GlyphRamp::named(next)
            } else {
                GlyphRamp::parse(arg).map_err(|e| e.to_string())?
            };
            session.set_glyph_ramp(ramp.inverted(invert));
        }
        "h" | "hide" => {
            session.toggle_hide_image();
        }
        "c" | "copy" => {
            eprintln!("{}", session.current_glyph_text());
        }
        "q" | "quit" => return Ok(Flow::Quit),
        "?" | "help" => eprintln!("{}", HELP),
        other => return Err(format!("Unknown command '{}'. {}", other, HELP)),
    }
    Ok(Flow::Continue)
}

fn draw(session: &Session) {
    // Glyphs and background come from the same snapshot
    let body = match session.current_snapshot() {
        Some(snapshot) => {
            let grid = to_glyph_grid(&snapshot.blocks, session.glyph_ramp());
            render_layers(&grid, &snapshot.preview, session.hide_image())
        }
        None => String::new(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    // Clear screen, cursor home
    let _ = write!(out, "\x1b[2J\x1b[H");
    let _ = writeln!(out, "{}", body);
    let _ = writeln!(
        out,
        "[{}] granularity {} | ramp {} | image {}",
        session.current_state(),
        session.current_granularity(),
        session.glyph_ramp().name(),
        if session.hide_image() { "hidden" } else { "shown" }
    );
    let _ = writeln!(out, "{}", HELP);
    let _ = out.flush();
}

/// Glyph rows over the preview image.
///
/// Each glyph cell gets the preview shade at its centre as a true-colour
/// background, with black or white ink for contrast. With `hide_image` set
/// only the plain glyph text is returned.
fn render_layers(grid: &GlyphGrid, preview: &Frame, hide_image: bool) -> String {
    if hide_image || preview.is_empty() {
        return grid.to_text();
    }
    let (cols, rows) = (grid.width() as u64, grid.height() as u64);
    let (width, height) = (preview.width() as u64, preview.height() as u64);

    let mut output = String::with_capacity(grid.glyphs().len() * 40);
    for (y, row) in grid.rows().enumerate() {
        if y > 0 {
            output.push('\n');
        }
        let py = ((2 * y as u64 + 1) * height / (2 * rows)) as u32;
        for (x, &glyph) in row.iter().enumerate() {
            let px = ((2 * x as u64 + 1) * width / (2 * cols)) as u32;
            let shade = preview.get(px, py).unwrap_or(0);
            let ink = if shade < 128 { 255 } else { 0 };
            // ANSI true color: ESC[48;2;R;G;Bm background, ESC[38;2;R;G;Bm foreground
            output.push_str(&format!(
                "\x1b[48;2;{s};{s};{s}m\x1b[38;2;{i};{i};{i}m",
                s = shade,
                i = ink
            ));
            output.push(glyph);
        }
        output.push_str("\x1b[0m");
    }
    output
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}
