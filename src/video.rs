use anyhow::{bail, Context, Result};
use opencv::{
    core::Size,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use std::path::Path;

/// The output container is written at a fixed rate regardless of the source's
/// actual frame rate.
pub const OUTPUT_FPS: f64 = 30.0;

/// Sequential frame producer. `Ok(None)` means the source is exhausted.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Mat>>;
}

/// Sequential frame consumer.
pub trait FrameSink {
    fn write(&mut self, frame: &Mat) -> Result<()>;
}

pub struct VideoSource {
    capture: VideoCapture,
    released: bool,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .with_context(|| format!("Input path is not valid UTF-8: {}", path.display()))?;
        let capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .with_context(|| format!("Failed to open input video: {}", path.display()))?;
        if !capture.is_opened()? {
            bail!("Failed to open input video: {}", path.display());
        }
        Ok(Self {
            capture,
            released: false,
        })
    }

    pub fn frame_size(&self) -> Result<Size> {
        let width = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
        Ok(Size::new(width, height))
    }

    /// Idempotent; also invoked from `Drop` so the handle is returned on every
    /// exit path.
    pub fn release(&mut self) -> Result<()> {
        if !self.released {
            self.capture.release()?;
            self.released = true;
        }
        Ok(())
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

pub struct VideoSink {
    writer: VideoWriter,
    released: bool,
}

impl VideoSink {
    pub fn create(path: &Path, frame_size: Size, fps: f64) -> Result<Self> {
        let path_str = path
            .to_str()
            .with_context(|| format!("Output path is not valid UTF-8: {}", path.display()))?;
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let writer = VideoWriter::new(path_str, fourcc, fps, frame_size, true)
            .with_context(|| format!("Failed to create output video: {}", path.display()))?;
        if !writer.is_opened()? {
            bail!("Failed to create output video: {}", path.display());
        }
        Ok(Self {
            writer,
            released: false,
        })
    }

    pub fn release(&mut self) -> Result<()> {
        if !self.released {
            self.writer.release()?;
            self.released = true;
        }
        Ok(())
    }
}

impl FrameSink for VideoSink {
    fn write(&mut self, frame: &Mat) -> Result<()> {
        self.writer.write(frame)?;
        Ok(())
    }
}

impl Drop for VideoSink {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
