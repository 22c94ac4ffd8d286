use anyhow::{Context, Result};
use opencv::{
    core::{Ptr, Rect},
    prelude::*,
    tracking::{TrackerKCF, TrackerKCF_Params},
};

/// Seam over the external tracking algorithm. Alternate trackers can be
/// substituted without touching the orchestrator.
pub trait ObjectTracker {
    /// Must be called exactly once, with the first frame and the user-selected
    /// region, before any `update`. Failure is fatal to startup.
    fn init(&mut self, frame: &Mat, region: Rect) -> Result<()>;

    /// Returns the updated bounding box, or `None` when the tracker lost the
    /// target on this frame.
    fn update(&mut self, frame: &Mat) -> Result<Option<Rect>>;
}

/// OpenCV KCF (Kernelized Correlation Filter) tracker with default parameters.
pub struct KcfTracker {
    inner: Ptr<TrackerKCF>,
    rect: Rect,
}

impl KcfTracker {
    pub fn new() -> Result<Self> {
        let params = TrackerKCF_Params::default()?;
        let inner = TrackerKCF::create(params).context("Failed to create KCF tracker")?;
        Ok(Self {
            inner,
            rect: Rect::default(),
        })
    }
}

impl ObjectTracker for KcfTracker {
    fn init(&mut self, frame: &Mat, region: Rect) -> Result<()> {
        self.inner
            .init(frame, region)
            .context("KCF tracker rejected the selected region")?;
        self.rect = region;
        Ok(())
    }

    fn update(&mut self, frame: &Mat) -> Result<Option<Rect>> {
        let mut rect = self.rect;
        match self.inner.update(frame, &mut rect) {
            Ok(true) => {
                self.rect = rect;
                Ok(Some(rect))
            }
            // The box is undefined when the target is lost; never use it.
            _ => Ok(None),
        }
    }
}
