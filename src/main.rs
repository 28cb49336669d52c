use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::fs::File;
use std::path::PathBuf;

// Define modules used by main
mod error;
mod forces;
mod gal;
mod integrator;
mod simulation;

use galaxy_common::config::SimulationConfig;
use galaxy_common::Frame;
use simulation::Simulation;

#[derive(Parser, Debug)]
#[command(author, version, about = "Brute-force gravitational N-body engine for .gal files", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the input .gal path from the config
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the output .gal path from the config
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Writes the recorded frames in the configured format for the visualizer.
fn save_frames(config: &SimulationConfig, frames: &[Frame]) -> Result<()> {
    let format = config.output.format.as_deref().unwrap_or("bincode");
    match format {
        "json" => {
            let filename = format!("{}.json", config.output.frames_filename);
            let file = File::create(&filename)
                .with_context(|| format!("Failed to create frame file '{}'", filename))?;
            serde_json::to_writer(file, frames)
                .with_context(|| format!("Failed to serialize frames to '{}'", filename))?;
            info!("{} frames saved to {} (JSON format)", frames.len(), filename);
        }
        _ => {
            // Binary format (much more compact); config validation already
            // restricted the value to bincode or json.
            let filename = format!("{}.bin", config.output.frames_filename);
            let file = File::create(&filename)
                .with_context(|| format!("Failed to create frame file '{}'", filename))?;
            bincode::serialize_into(file, frames)
                .with_context(|| format!("Failed to serialize frames to '{}'", filename))?;
            info!("{} frames saved to {} (binary format)", frames.len(), filename);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Galaxy Engine (CPU parallel)...");

    // --- Load Configuration ---
    let args = Args::parse();
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(input) = args.input {
        config.io.input = input;
    }
    if let Some(output) = args.output {
        config.io.output = output;
    }

    info!("Using {} Rayon threads.", rayon::current_num_threads());

    // --- Decode Initial Configuration ---
    let raw = gal::read(&config.io.input)
        .with_context(|| format!("Failed to read '{}'", config.io.input.display()))?;
    let initial = gal::decode(&raw)?;
    info!(
        "Loaded {} bodies from {}.",
        initial.len(),
        config.io.input.display()
    );

    // --- Initialize Simulation ---
    let mut sim = Simulation::from_config(initial, &config)?;
    debug!(
        "Parameters: dt = {:e}, softening = {:e}, num_steps = {}, G = {:.6}",
        config.timing.dt,
        config.physics.softening,
        config.timing.num_steps,
        sim.gravitational_constant()
    );

    // --- Simulation Loop ---
    // All file I/O happens before and after this; nothing suspends inside.
    sim.run();

    // --- Encode Final State ---
    let encoded = gal::encode(sim.last_state());
    gal::write(&config.io.output, &encoded)
        .with_context(|| format!("Failed to write '{}'", config.io.output.display()))?;
    info!("Final state written to {}.", config.io.output.display());

    // --- Save Recorded Frames ---
    if config.output.save_frames {
        save_frames(&config, &sim.frames())?;
    } else {
        debug!("Skipping frame export as per config (save_frames is false).");
    }

    info!("Simulation Complete.");
    Ok(())
}
