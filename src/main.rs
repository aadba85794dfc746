//! Headless tumbler runner
//!
//! Runs one complete spin cycle without a renderer and prints the pick report
//! as JSON. Useful for tuning, soak testing, and as a reference for how a real
//! frontend drives the simulation: build, start, tick, react to events.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use lotto_tumbler::consts::PHYSICS_DT;
use lotto_tumbler::sim::{PickCandidate, SimEvent};
use lotto_tumbler::{Tumbler, TumblerConfig};

#[derive(Parser, Debug)]
#[command(name = "tumbler", about = "Spin a lottery tumbler headless and report the pick")]
struct Args {
    /// Number of balls in the drum
    #[arg(long, default_value_t = 24)]
    balls: u32,

    /// Base container spin rate multiplier
    #[arg(long, default_value_t = 1.0)]
    power: f32,

    /// Full container rotations before the spin auto-stops
    #[arg(long, default_value_t = 3.0)]
    rotations: f32,

    /// RNG seed; omitted means time-based
    #[arg(long)]
    seed: Option<u64>,

    /// Disable spin-rate jitter for reproducible runs
    #[arg(long)]
    no_jitter: bool,

    /// Simulated seconds to keep stepping after the pick, letting the drum settle
    #[arg(long, default_value_t = 2.0)]
    settle: f32,
}

#[derive(Serialize)]
struct PickReport<'a> {
    seed: u64,
    frames_simulated: u64,
    /// Closest candidate to the chute opening at stop time
    picked: Option<&'a PickCandidate>,
    candidates: &'a [PickCandidate],
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let config = TumblerConfig {
        ball_count: args.balls,
        spin_power: args.power,
        auto_rotations: args.rotations,
        spin_jitter: if args.no_jitter {
            0.0
        } else {
            TumblerConfig::default().spin_jitter
        },
        seed,
        ..Default::default()
    };
    let mut tumbler = Tumbler::new(config).context("building tumbler")?;
    log::info!(
        "tumbler ready: {} balls, seed {seed}",
        tumbler.balls().len()
    );

    tumbler
        .start_spin(args.rotations, args.power)
        .context("starting spin")?;

    // Worst case the jittered rate is power - jitter; give it headroom, then cap.
    let jitter = tumbler.config().spin_jitter;
    let max_frames = ((std::f32::consts::TAU * args.rotations
        / (args.power - jitter).max(0.1)
        / PHYSICS_DT)
        .ceil() as u64)
        .saturating_mul(2)
        + 600;

    let mut candidates: Option<Vec<PickCandidate>> = None;
    let mut frames = 0u64;
    while candidates.is_none() && frames < max_frames {
        for event in tumbler.tick(PHYSICS_DT) {
            match event {
                SimEvent::SpinStarted => log::debug!("spin started"),
                SimEvent::SpinComplete { candidates: c } => candidates = Some(c),
                SimEvent::SpinCancelled => log::warn!("spin cancelled"),
            }
        }
        frames += 1;
    }
    let candidates = candidates.context("spin never completed within the frame budget")?;

    // Let the residual rotation and the balls settle before reporting
    for _ in 0..(args.settle / PHYSICS_DT) as u64 {
        tumbler.tick(PHYSICS_DT);
    }

    let report = PickReport {
        seed,
        frames_simulated: tumbler.frames(),
        picked: candidates.first(),
        candidates: &candidates,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing report")?
    );
    Ok(())
}
