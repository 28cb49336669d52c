use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use galaxy_common::Frame;

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input frame file written by the engine (.bin or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the per-step PNG images are written into
    #[arg(short, long, default_value = "rendered_frames")]
    output_dir: PathBuf,

    /// Width of the output images in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Height of the output images in pixels
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Body dot radius in pixels
    #[arg(long, default_value_t = 3)]
    radius: i32,
}

/// Deserializes the frame file, choosing the codec by file extension.
fn load_frames(path: &Path) -> Result<Vec<Frame>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open frame file '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let frames: Vec<Frame> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON frames from '{}'", path.display()))?,
        _ => bincode::deserialize_from(reader)
            .with_context(|| format!("Failed to parse binary frames from '{}'", path.display()))?,
    };
    Ok(frames)
}

/// Checks the frame-delivery contract: strictly increasing step indices with
/// no gaps, and the same point count in every frame.
fn validate_frames(frames: &[Frame]) -> Result<usize> {
    let first = frames
        .first()
        .ok_or_else(|| anyhow::anyhow!("Frame file contains no frames."))?;
    let points = first.len();

    for (k, frame) in frames.iter().enumerate() {
        if frame.step != k as u32 {
            anyhow::bail!("Frame {} carries step index {}; frames must be contiguous.", k, frame.step);
        }
        if frame.len() != points {
            anyhow::bail!(
                "Frame {} holds {} points, expected {}; body count is fixed per run.",
                k,
                frame.len(),
                points
            );
        }
    }
    Ok(points)
}

/// World-coordinate bounding box over all frames, padded so bodies on the
/// hull are not clipped.
fn world_bounds(frames: &[Frame]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for frame in frames {
        for (&x, &y) in frame.xs.iter().zip(frame.ys.iter()) {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    let pad_x = ((max_x - min_x) * 0.05).max(1e-9);
    let pad_y = ((max_y - min_y) * 0.05).max(1e-9);
    (min_x - pad_x, max_x + pad_x, min_y - pad_y, max_y + pad_y)
}

/// Renders one frame: white dots on black, y axis pointing up.
fn draw_frame(frame: &Frame, args: &Args, bounds: (f64, f64, f64, f64)) -> RgbaImage {
    let (min_x, max_x, min_y, max_y) = bounds;
    let mut image = RgbaImage::from_pixel(args.width, args.height, Rgba([0, 0, 0, 255]));
    let body_color = Rgba([255, 255, 255, 255]);

    let span_x = max_x - min_x;
    let span_y = max_y - min_y;

    for (&x, &y) in frame.xs.iter().zip(frame.ys.iter()) {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let px = ((x - min_x) / span_x * (args.width - 1) as f64) as i32;
        let py = (((max_y - y) / span_y) * (args.height - 1) as f64) as i32;
        draw_filled_circle_mut(&mut image, (px, py), args.radius, body_color);
    }
    image
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let frames = load_frames(&args.input)?;
    let points = validate_frames(&frames)?;
    info!(
        "Loaded {} frames of {} bodies from {}.",
        frames.len(),
        points,
        args.input.display()
    );

    if frames.iter().any(|f| {
        f.xs.iter().chain(f.ys.iter()).any(|v| !v.is_finite())
    }) {
        warn!("Frame data contains non-finite positions; those bodies will be skipped.");
    }

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory '{}'", args.output_dir.display())
    })?;

    let bounds = world_bounds(&frames);
    info!(
        "World bounds: x in [{:.4}, {:.4}], y in [{:.4}, {:.4}].",
        bounds.0, bounds.1, bounds.2, bounds.3
    );

    let progress = ProgressBar::new(frames.len() as u64).with_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} frames ({eta})")?,
    );

    // Frame files are step-indexed, so rendering order does not matter;
    // consumers replay them by index.
    frames
        .par_iter()
        .progress_with(progress)
        .try_for_each(|frame| -> Result<()> {
            let image = draw_frame(frame, &args, bounds);
            let path = args.output_dir.join(format!("frame_{:05}.png", frame.step));
            image
                .save(&path)
                .with_context(|| format!("Failed to save '{}'", path.display()))?;
            Ok(())
        })?;

    info!(
        "Rendered {} frames into {}.",
        frames.len(),
        args.output_dir.display()
    );
    Ok(())
}
