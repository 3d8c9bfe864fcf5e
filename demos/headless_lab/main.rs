//! # Headless Lab Host
//!
//! Plays the part of a renderer's frame loop without opening a window: picks an
//! experiment by name, applies numeric overrides, ticks it at a fixed frame
//! rate and logs what a renderer would draw.
//!
//! ## Usage:
//! ```bash
//! cargo run --example headless_lab -- pendulum length=2.0 angle=30
//! cargo run --example headless_lab -- free_fall --seconds 3
//! RUST_LOG=debug cargo run --example headless_lab -- cell seed=7
//! ```
//!
//! A start signal is sent right after setup, so triggered kinds (free fall,
//! the stopwatch) begin immediately.

use anyhow::{bail, Context, Result};
use clap::Parser;
use labsim::prelude::*;

const FPS: f32 = 60.0;

#[derive(Parser)]
#[command(name = "headless_lab")]
#[command(about = "Tick a lab experiment without a renderer and log what it would draw")]
struct Args {
    /// Experiment kind, e.g. pendulum, free_fall, melting_boiling
    #[arg(default_value = "pendulum")]
    kind: String,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,
    /// Numeric parameter overrides as key=value
    overrides: Vec<String>,
}

struct HostOptions {
    kind: ExperimentKind,
    seconds: f32,
    params: ExperimentParams,
}

fn parse_args() -> Result<HostOptions> {
    let args = Args::parse();
    let kind: ExperimentKind = args.kind.parse().context("choosing experiment")?;
    if !(args.seconds.is_finite() && args.seconds > 0.0) {
        bail!("--seconds must be positive, got {}", args.seconds);
    }

    let params = ExperimentParams::parse_pairs(&args.overrides).context("reading overrides")?;
    Ok(HostOptions {
        kind,
        seconds: args.seconds,
        params,
    })
}

fn log_frame(session: &Session) -> Result<()> {
    log::info!("t = {:.2}s", session.elapsed_time());
    for view in session.projection().snapshot()? {
        if !view.enabled {
            continue;
        }
        let p = view.position;
        log::info!(
            "  {:<16} ({:>6.2}, {:>6.2}, {:>6.2})  rgba {:.2?}",
            view.name,
            p.x,
            p.y,
            p.z,
            view.color.to_array()
        );
    }
    for reading in session.readings() {
        log::info!("  {} = {:.3} {}", reading.label, reading.value, reading.unit);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    log::info!(
        "{} ({:?}) for {:.1}s",
        options.kind,
        options.kind.domain(),
        options.seconds
    );

    let settings = SessionSettings::new().with_fixed_timestep(Some(1.0 / FPS));
    let mut session = registry()
        .instantiate_with(options.kind, &options.params, settings)
        .with_context(|| format!("creating {}", options.kind))?;
    session
        .setup()
        .with_context(|| format!("setting up {}", options.kind))?;

    if session.signal(ControlSignal::Start)? {
        log::info!("start signal sent");
    }

    let frames = (options.seconds * FPS).round() as u32;
    for frame in 0..frames {
        session.tick(1.0 / FPS)?;
        // One snapshot per simulated second
        if frame % FPS as u32 == 0 {
            log_frame(&session)?;
        }
    }
    log_frame(&session)?;

    let bytes = session.projection().instance_bytes()?;
    log::info!("{} instance bytes ready for upload", bytes.len());
    session.dispose();
    Ok(())
}
