use crate::annotate::annotate;
use crate::display::ViewSurface;
use crate::tracker::ObjectTracker;
use crate::trajectory::{center_of, Trajectory};
use crate::video::{FrameSink, FrameSource};
use anyhow::Result;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct RunReport {
    pub frames_read: u64,
    pub frames_written: u64,
    pub frames_skipped: u64,
    pub trajectory: Trajectory,
}

/// Main loop: read, track, record, annotate, write, show, poll for quit.
/// Runs until the source is exhausted or the user requests termination.
/// Frames on which the tracker loses the target are skipped entirely; they are
/// neither annotated nor written, so the output may hold fewer frames than the
/// input.
pub fn run_tracking(
    source: &mut dyn FrameSource,
    tracker: &mut dyn ObjectTracker,
    sink: &mut dyn FrameSink,
    view: &mut dyn ViewSurface,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    while let Some(mut frame) = source.next_frame()? {
        report.frames_read += 1;

        let Some(rect) = tracker.update(&frame)? else {
            warn!(
                "Tracker lost the target on frame {}; skipping",
                report.frames_read
            );
            report.frames_skipped += 1;
            continue;
        };

        report.trajectory.push(center_of(rect));
        annotate(&mut frame, rect, &report.trajectory)?;
        sink.write(&frame)?;
        report.frames_written += 1;
        view.show(&frame)?;

        if view.quit_requested()? {
            info!("Quit requested; stopping after frame {}", report.frames_read);
            break;
        }
    }

    Ok(report)
}
