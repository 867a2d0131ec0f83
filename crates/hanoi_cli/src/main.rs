//! Hanoi CLI
//!
//! Run the Towers of Hanoi screensaver headless and inspect easing curves.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hanoi_animation::{Clock, Easing, EasingTable, FrameLoop, Shape, SystemClock};
use hanoi_scene::{AsciiCanvas, PuzzleEvent, RecordingContext, Scene, SceneConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "hanoi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Towers of Hanoi screensaver", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scene on the system clock
    Run {
        /// Stop after this many seconds (runs forever if omitted)
        #[arg(short, long)]
        seconds: Option<f64>,

        /// Target frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Config file (defaults to ./hanoi.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Surface width
        #[arg(long)]
        width: Option<u32>,

        /// Surface height
        #[arg(long)]
        height: Option<u32>,

        /// Print an ASCII frame every second
        #[arg(short, long)]
        preview: bool,
    },

    /// List the easing curves
    Curves,

    /// Print a normalized easing curve as `progress value` rows
    Sample {
        /// Curve name, e.g. `bounceOut`
        curve: String,

        /// Number of intervals between 0 and 1
        #[arg(short, long, default_value = "10")]
        steps: u32,

        /// Curve shape: one number (steps, period, overshoot) or four bezier
        /// control values
        #[arg(long, num_args = 1..=4, allow_negative_numbers = true)]
        shape: Vec<f64>,
    },

    /// Write a default hanoi.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            seconds,
            fps,
            config,
            width,
            height,
            preview,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(fps) = fps {
                config.display.fps = fps;
            }
            if let Some(width) = width {
                config.display.width = width;
            }
            if let Some(height) = height {
                config.display.height = height;
            }
            config.validate().context("Invalid settings")?;
            let limit_ms = run_limit_ms(seconds)?;
            cmd_run(&config, limit_ms, preview)
        }

        Commands::Curves => cmd_curves(),

        Commands::Sample {
            curve,
            steps,
            shape,
        } => cmd_sample(&curve, steps, &shape),

        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

/// Explicit path, else ./hanoi.toml if present, else defaults
fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    if let Some(path) = path {
        return SceneConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        return SceneConfig::load(local)
            .with_context(|| format!("Failed to load {}", local.display()));
    }

    debug!("no {} found, using defaults", CONFIG_FILE);
    Ok(SceneConfig::default())
}

/// `--seconds` as a millisecond limit
fn run_limit_ms(seconds: Option<f64>) -> Result<Option<f64>> {
    match seconds {
        Some(s) if !s.is_finite() || s < 0.0 => {
            anyhow::bail!("--seconds must be a non-negative number, got {}", s)
        }
        Some(s) => Ok(Some(s * 1000.0)),
        None => Ok(None),
    }
}

fn cmd_run(config: &SceneConfig, limit_ms: Option<f64>, preview: bool) -> Result<()> {
    let mut scene = Scene::from_config(config)?;
    let display_cfg = &config.display;
    let frames = FrameLoop::new(display_cfg.fps);
    let clock = SystemClock::new();

    let mut ctx = RecordingContext::default();
    let mut canvas =
        preview.then(|| AsciiCanvas::new(display_cfg.width as usize, display_cfg.height as usize));
    let mut next_preview = 0.0;

    info!(
        "Running {}x{} at {} fps{}",
        display_cfg.width,
        display_cfg.height,
        display_cfg.fps,
        limit_ms.map_or(String::new(), |ms| format!(" for {:.1}s", ms / 1000.0))
    );

    let count = frames.run(&clock, |now| {
        ctx.clear();
        scene.frame(now, &mut ctx);

        for event in scene.take_events() {
            match event {
                PuzzleEvent::Grew {
                    disks,
                    move_duration,
                } => info!("Solved! Now {} disks, {:.0} ms per move", disks, move_duration),
                PuzzleEvent::MoveStarted { disk, from, to } => {
                    debug!("Disk {} moves from peg {} to peg {}", disk, from, to)
                }
                PuzzleEvent::MoveFinished { .. } => {}
            }
        }

        if let Some(canvas) = canvas.as_mut() {
            if now >= next_preview {
                canvas.draw(ctx.commands());
                println!("{canvas}\n");
                next_preview = now + 1000.0;
            }
        }

        match limit_ms {
            Some(limit) if now >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    });

    info!(
        "Ran {} frames in {:.1}s, {} moves",
        count,
        clock.now_ms() / 1000.0,
        scene.puzzle().moves()
    );

    Ok(())
}

fn cmd_curves() -> Result<()> {
    for easing in Easing::ALL {
        println!("{easing}");
    }
    Ok(())
}

/// Shape from the `--shape` values
fn parse_shape(values: &[f64]) -> Result<Option<Shape>> {
    match *values {
        [] => Ok(None),
        [s] => Ok(Some(Shape::Scalar(s))),
        [x1, y1, x2, y2] => Ok(Some(Shape::Bezier([x1, y1, x2, y2]))),
        _ => anyhow::bail!("Expected 1 or 4 shape values, got {}", values.len()),
    }
}

fn cmd_sample(curve: &str, steps: u32, shape: &[f64]) -> Result<()> {
    let easing = curve
        .parse::<Easing>()
        .with_context(|| format!("Unknown curve '{}'. Run `hanoi curves` to list them", curve))?;
    let shape = parse_shape(shape)?;
    if steps == 0 {
        anyhow::bail!("--steps must be at least 1");
    }

    let table = EasingTable::new();
    for i in 0..=steps {
        let progress = i as f64 / steps as f64;
        let value = table.evaluate(easing, progress, 0.0, 1.0, 1.0, shape);
        println!("{:.4} {:.6}", progress, value);
    }

    Ok(())
}

fn cmd_init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    let content = SceneConfig::default().to_toml()?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape(&[]).unwrap(), None);
        assert_eq!(parse_shape(&[4.0]).unwrap(), Some(Shape::Scalar(4.0)));
        assert_eq!(
            parse_shape(&[0.25, 0.1, 0.25, 1.0]).unwrap(),
            Some(Shape::Bezier([0.25, 0.1, 0.25, 1.0]))
        );
        assert!(parse_shape(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_run_limit_rejects_bad_seconds() {
        assert_eq!(run_limit_ms(None).unwrap(), None);
        assert_eq!(run_limit_ms(Some(2.5)).unwrap(), Some(2500.0));
        assert!(run_limit_ms(Some(f64::NAN)).is_err());
        assert!(run_limit_ms(Some(f64::INFINITY)).is_err());
        assert!(run_limit_ms(Some(-1.0)).is_err());
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let mut config = SceneConfig::default();
        config.display.fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "hanoi", "-v", "run", "--seconds", "2.5", "--fps", "30", "--preview",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                seconds,
                fps,
                preview,
                ..
            } => {
                assert_eq!(seconds, Some(2.5));
                assert_eq!(fps, Some(30));
                assert!(preview);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_cli_parses_negative_shape() {
        let cli = Cli::try_parse_from([
            "hanoi", "sample", "bezier", "--shape", "0.6", "-0.3", "0.7", "1.2",
        ])
        .unwrap();
        match cli.command {
            Commands::Sample { curve, shape, steps } => {
                assert_eq!(curve, "bezier");
                assert_eq!(shape, vec![0.6, -0.3, 0.7, 1.2]);
                assert_eq!(steps, 10);
            }
            _ => panic!("expected sample"),
        }
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("hanoi-init-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        cmd_init(&dir, false).unwrap();
        assert!(cmd_init(&dir, false).is_err());
        cmd_init(&dir, true).unwrap();

        let loaded = SceneConfig::load(&dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded, SceneConfig::default());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
