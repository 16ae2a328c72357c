//! Headless runner: drives one actor through a scripted input sequence
//! against the emulated co-processor and logs state changes.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use stride::{
    create_actor_with_settings, init_logging, procedural_model, ActorId, ActorInput,
    ActorSettings, CoProcessor, InputSteering, IntentClassifier, LocomotionState, Simulation,
    DEFAULT_FRAME_TIME,
};

/// Headless actor locomotion demo
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = DEFAULT_FRAME_TIME)]
    frame_time: f32,

    /// JSON file overriding the default actor tuning
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Camera yaw in degrees
    #[arg(long, default_value_t = 0.0)]
    camera_yaw: f32,

    /// Time the emulated co-processor spends reading each draw
    #[arg(long, default_value_t = 0)]
    render_latency_ms: u64,

    /// Bones in the procedural skeleton
    #[arg(long, default_value_t = 8)]
    bones: usize,
}

/// Scripted stick and jump input: stand, walk, run, sprint, jump, let go.
fn scripted_input(frame: u32, frames: u32, frame_time: f32) -> ActorInput {
    let progress = f64::from(frame) / f64::from(frames.max(1));
    match progress {
        p if p < 0.1 => ActorInput::default(),
        p if p < 0.3 => ActorInput::stick(0.0, 0.4),
        p if p < 0.5 => ActorInput::stick(0.55, 0.55),
        p if p < 0.65 => ActorInput::stick(0.0, 1.0),
        p if p < 0.7 => {
            let jump_start = (f64::from(frames) * 0.65).ceil();
            let held = (f64::from(frame) - jump_start).max(0.0) as f32 * frame_time;
            ActorInput::stick(0.0, 1.0).with_jump_held(held)
        }
        _ => ActorInput::default(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        args.frame_time.is_finite() && args.frame_time > 0.0,
        "frame time must be positive, got {}",
        args.frame_time
    );

    let settings = match &args.settings {
        Some(path) => ActorSettings::from_json_file(path)
            .with_context(|| format!("loading actor settings from {}", path.display()))?,
        None => ActorSettings::default(),
    };
    let model = Arc::new(procedural_model(args.bones).context("building procedural model")?);
    let actor = create_actor_with_settings(ActorId(1), model, settings)
        .context("creating actor")?;

    let mut simulation = Simulation::new(
        actor,
        InputSteering::new(args.camera_yaw),
        IntentClassifier,
        CoProcessor::with_latency(Duration::from_millis(args.render_latency_ms)),
    );

    let mut state = LocomotionState::Empty;
    let mut top_speed = 0.0_f32;
    for frame in 0..args.frames {
        let input = scripted_input(frame, args.frames, args.frame_time);
        let report = simulation.step(input, args.frame_time);
        if report.state != state {
            log::info!(
                "frame {}: {:?} at speed {:.1} (blend {:.2})",
                report.frame,
                report.state,
                report.horizontal_speed,
                report.blend_ratio
            );
            state = report.state;
        }
        top_speed = top_speed.max(report.horizontal_speed);
    }

    let position = simulation.actor().body.position;
    let renderer = simulation.shutdown();
    let stats = renderer.stats();
    log::info!(
        "{} frames, {} draws, top speed {top_speed:.1}, final position ({:.1}, {:.1}, {:.1})",
        stats.frames,
        stats.draws,
        position.x,
        position.y,
        position.z
    );
    Ok(())
}
