#![deny(unsafe_code)]
//! Headless CLI for the ambient particle field.
//!
//! Subcommands:
//! - `render`: run the field for N frames, write a PNG
//! - `stats`: run the field for N frames, print per-frame counters
//! - `config`: print the effective config or its schema

mod error;
mod logger;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use particle_field_core::{
    Backdrop, FieldConfig, FieldError, FrameStats, ManualHost, Srgb, Surface, Xorshift64,
};
use particle_field_raster::Raster;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "particle-field", about = "Ambient particle field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (repeat for debug/trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SimArgs {
    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 1280)]
    width: usize,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 720)]
    height: usize,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic particle generation.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Pointer position as "x,y" in surface pixels.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<(f64, f64)>,

    /// Config overrides as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the field and write a PNG of the last frame.
    Render {
        #[command(flatten)]
        sim: SimArgs,

        /// Background color (#rrggbb); transparent when omitted.
        #[arg(long)]
        background: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "field.png")]
        output: PathBuf,
    },
    /// Run the field and print frame counters.
    Stats {
        #[command(flatten)]
        sim: SimArgs,
    },
    /// Print the effective config, or the schema of all keys.
    Config {
        /// Config overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Print the schema instead of values.
        #[arg(long)]
        schema: bool,
    },
}

/// Parses `"x,y"` into a point.
fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| format!("invalid coordinate {v:?}"))
    };
    Ok((coord(x)?, coord(y)?))
}

fn parse_config(params: &str) -> Result<FieldConfig, CliError> {
    let overrides: serde_json::Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    Ok(FieldConfig::from_json(&overrides)?)
}

/// Summary of a headless run.
#[derive(Debug)]
struct RunSummary {
    particles: usize,
    frames: Vec<FrameStats>,
    max_speed: f64,
}

/// Mounts a backdrop on an in-memory host sized to `sim`, delivers up to
/// `sim.frames` frames onto `surface`, then unmounts.
fn simulate<S: Surface>(sim: &SimArgs, surface: &mut S) -> Result<RunSummary, CliError> {
    let config = parse_config(&sim.params)?;
    let host = ManualHost::new(sim.width, sim.height);
    simulate_on(host, sim, config, surface)
}

/// Runs the headless loop on an already-built host.
fn simulate_on<S: Surface>(
    mut host: ManualHost,
    sim: &SimArgs,
    config: FieldConfig,
    surface: &mut S,
) -> Result<RunSummary, CliError> {
    let mut backdrop = Backdrop::new(config, Xorshift64::new(sim.seed));

    if !backdrop.mount(&mut host) {
        return Err(FieldError::SurfaceUnavailable.into());
    }
    if let Some((x, y)) = sim.pointer {
        backdrop.pointer_moved(x, y);
    }

    let mut frames = Vec::with_capacity(sim.frames);
    for _ in 0..sim.frames {
        let Some(handle) = host.take_frame() else {
            break;
        };
        frames.extend(backdrop.frame(handle, &mut host, surface));
    }

    let particles = backdrop.state().particles();
    let summary = RunSummary {
        particles: particles.len(),
        max_speed: particles
            .iter()
            .map(|p| p.velocity.length())
            .fold(0.0, f64::max),
        frames,
    };
    backdrop.unmount(&mut host);
    log::info!(
        "ran {} frames over {} particles",
        summary.frames.len(),
        summary.particles
    );
    Ok(summary)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Render {
            sim,
            background,
            output,
        } => {
            let background = background
                .as_deref()
                .map(Srgb::from_hex)
                .transpose()?;
            let mut raster = Raster::new(sim.width, sim.height)?;
            let summary = simulate(&sim, &mut raster)?;

            particle_field_raster::snapshot::write_png(&raster, background, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": sim.width,
                    "height": sim.height,
                    "frames": summary.frames.len(),
                    "particles": summary.particles,
                    "seed": sim.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} particles ({}x{}, {} frames, seed {}) -> {}",
                    summary.particles,
                    sim.width,
                    sim.height,
                    summary.frames.len(),
                    sim.seed,
                    output.display()
                );
            }
        }
        Command::Stats { sim } => {
            let mut raster = Raster::new(sim.width, sim.height)?;
            let summary = simulate(&sim, &mut raster)?;
            let total_links: usize = summary.frames.iter().map(|f| f.links_drawn).sum();
            let pair_checks = summary.frames.first().map_or(0, |f| f.pair_checks);
            let mean_links = if summary.frames.is_empty() {
                0.0
            } else {
                total_links as f64 / summary.frames.len() as f64
            };

            if cli.json {
                let info = serde_json::json!({
                    "particles": summary.particles,
                    "frames": summary.frames.len(),
                    "pair_checks_per_frame": pair_checks,
                    "mean_links_per_frame": mean_links,
                    "max_speed": summary.max_speed,
                    "per_frame": summary.frames,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("particles:             {}", summary.particles);
                println!("frames:                {}", summary.frames.len());
                println!("pair checks per frame: {pair_checks}");
                println!("mean links per frame:  {mean_links:.1}");
                println!("max speed:             {:.4}", summary.max_speed);
            }
        }
        Command::Config { params, schema } => {
            let value = if schema {
                FieldConfig::schema()
            } else {
                parse_config(&params)?.to_json()
            };
            if cli.json {
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn sim(width: usize, height: usize, frames: usize) -> SimArgs {
        SimArgs {
            width,
            height,
            frames,
            seed: 42,
            pointer: None,
            params: "{}".into(),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_point_accepts_pair_with_spaces() {
        assert_eq!(parse_point("100, 250.5"), Ok((100.0, 250.5)));
    }

    #[test]
    fn parse_point_rejects_missing_comma_and_garbage() {
        assert!(parse_point("100").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,1").is_err());
    }

    #[test]
    fn parse_config_rejects_bad_json_as_input_error() {
        let err = parse_config("{nope").unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn parse_config_rejects_invalid_values_as_input_error() {
        let err = parse_config(r#"{"link_distance": -1}"#).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn simulate_runs_requested_frames() {
        let args = sim(800, 600, 5);
        let mut raster = Raster::new(800, 600).unwrap();
        let summary = simulate(&args, &mut raster).unwrap();
        assert_eq!(summary.particles, 32);
        assert_eq!(summary.frames.len(), 5);
        assert!(summary.frames.iter().all(|f| f.pair_checks == 32 * 31 / 2));
    }

    #[test]
    fn simulate_without_surface_is_field_error() {
        let args = sim(800, 600, 5);
        let mut raster = Raster::new(800, 600).unwrap();
        let err = simulate_on(
            ManualHost::detached(),
            &args,
            FieldConfig::default(),
            &mut raster,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("surface"));
    }

    #[test]
    fn simulate_with_pointer_speeds_up_nearby_particles() {
        let mut args = sim(400, 400, 200);
        let mut raster = Raster::new(400, 400).unwrap();
        let calm = simulate(&args, &mut raster).unwrap();
        args.pointer = Some((200.0, 200.0));
        args.params = r#"{"pointer_radius": 400, "pointer_strength": 0.05}"#.into();
        let stirred = simulate(&args, &mut raster).unwrap();
        assert!(stirred.max_speed > calm.max_speed);
    }

    #[test]
    fn render_args_parse() {
        let cli = Cli::try_parse_from([
            "particle-field",
            "render",
            "-W",
            "320",
            "-H",
            "200",
            "--pointer",
            "10,20",
            "--background",
            "#1d2021",
        ])
        .unwrap();
        match cli.command {
            Command::Render { sim, background, .. } => {
                assert_eq!((sim.width, sim.height), (320, 200));
                assert_eq!(sim.pointer, Some((10.0, 20.0)));
                assert_eq!(background.as_deref(), Some("#1d2021"));
            }
            _ => panic!("expected render"),
        }
    }
}
