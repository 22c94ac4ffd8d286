mod annotate;
mod display;
mod paths;
mod pipeline;
mod tracker;
mod trajectory;
mod video;

use anyhow::{bail, Context, Result};
use clap::Parser;
use display::{NullView, ViewSurface, WindowDisplay};
use opencv::core::Rect;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracker::{KcfTracker, ObjectTracker};
use video::{FrameSource, VideoSink, VideoSource, OUTPUT_FPS};

#[derive(Parser, Debug)]
#[command(name = "bartrack", about = "Track a barbell plate and overlay its bar path")]
struct Args {
    /// Input video; prompted for when omitted
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,
    /// Directory the annotated video is written to; prompted for when omitted
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Base name of the output video, without extension; prompted for when omitted
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
    /// Initial region to track, skipping interactive selection
    #[arg(long, value_name = "X,Y,W,H")]
    roi: Option<String>,
    /// Run without a display window (requires --roi)
    #[arg(long, requires = "roi")]
    headless: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let input = match args.input {
        Some(path) => path,
        None => PathBuf::from(prompt("Enter filepath of video: ")?),
    };
    paths::validate_input(&input)?;

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => PathBuf::from(prompt("Enter where the video should be saved: ")?),
    };
    let name = match args.name {
        Some(name) => name,
        None => prompt("Enter the name of the new video: ")?,
    };
    let output = paths::output_path(&output_dir, &name);

    let mut source = VideoSource::open(&input)?;
    let first_frame = source
        .next_frame()?
        .context("Input video contains no frames")?;

    let mut window = if args.headless {
        None
    } else {
        Some(WindowDisplay::new()?)
    };
    let region = match &args.roi {
        Some(spec) => parse_roi(spec)?,
        None => window
            .as_mut()
            .context("Interactive region selection needs a display window")?
            .select_region(&first_frame)?,
    };

    let mut tracker = KcfTracker::new()?;
    tracker
        .init(&first_frame, region)
        .context("Tracker initialization failed; nothing to track")?;
    info!(
        "Tracking region {}x{} at ({}, {}) from {}",
        region.width,
        region.height,
        region.x,
        region.y,
        input.display()
    );

    // Create the output only once there is something to track, so a failed
    // setup leaves no zero-frame file behind.
    let mut sink = VideoSink::create(&output, source.frame_size()?, OUTPUT_FPS)?;

    let mut null_view = NullView;
    let view: &mut dyn ViewSurface = match window.as_mut() {
        Some(display) => display,
        None => &mut null_view,
    };
    let report = pipeline::run_tracking(&mut source, &mut tracker, &mut sink, view)?;

    info!(
        "Done: {} frames read, {} written, {} skipped -> {}",
        report.frames_read,
        report.frames_written,
        report.frames_skipped,
        output.display()
    );

    sink.release()?;
    source.release()?;
    if let Some(mut display) = window {
        display.close()?;
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn parse_roi(spec: &str) -> Result<Rect> {
    let parts: Vec<i32> = spec
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("Invalid --roi value: {spec}"))?;
    let [x, y, width, height] = parts[..] else {
        bail!("--roi expects four comma-separated integers, got: {spec}");
    };
    if width <= 0 || height <= 0 {
        bail!("--roi region must have positive width and height");
    }
    Ok(Rect::new(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_roi() {
        let rect = parse_roi("10, 20, 30, 40").unwrap();
        assert_eq!(rect, Rect::new(10, 20, 30, 40));
    }

    #[test]
    fn rejects_malformed_roi() {
        assert!(parse_roi("10,20,30").is_err());
        assert!(parse_roi("a,b,c,d").is_err());
        assert!(parse_roi("10,20,0,40").is_err());
        assert!(parse_roi("10,20,30,-1").is_err());
    }

    #[test]
    fn failed_setup_leaves_no_output_file() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("bartrack-{}-frameless.mp4", std::process::id()));
        {
            // Valid container, zero frames.
            let mut sink =
                VideoSink::create(&input, opencv::core::Size::new(64, 64), OUTPUT_FPS).unwrap();
            sink.release().unwrap();
        }

        let name = format!("bartrack-{}-unwritten", std::process::id());
        let args = Args {
            input: Some(input.clone()),
            output_dir: Some(dir.clone()),
            name: Some(name.clone()),
            roi: Some("10,10,20,20".into()),
            headless: true,
        };

        assert!(run(args).is_err());
        assert!(!paths::output_path(&dir, &name).exists());
        std::fs::remove_file(&input).unwrap();
    }
}
