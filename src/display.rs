use anyhow::{bail, Result};
use opencv::{core::Rect, highgui, prelude::*};

const WINDOW_NAME: &str = "bartrack";
const QUIT_KEY: i32 = 113; // 'q'
const POLL_MS: i32 = 5;

/// Display seam so the loop can run headless under test and with `--headless`.
pub trait ViewSurface {
    fn show(&mut self, frame: &Mat) -> Result<()>;
    /// Bounded-wait key poll, once per processed frame.
    fn quit_requested(&mut self) -> Result<bool>;
}

/// A highgui window. Closed exactly once, with `Drop` as the backstop.
pub struct WindowDisplay {
    open: bool,
}

impl WindowDisplay {
    pub fn new() -> Result<Self> {
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self { open: true })
    }

    /// Show the first frame and let the user drag out the region to track.
    pub fn select_region(&mut self, frame: &Mat) -> Result<Rect> {
        highgui::imshow(WINDOW_NAME, frame)?;
        let region = highgui::select_roi_for_window(WINDOW_NAME, frame, true, false)?;
        if region.width <= 0 || region.height <= 0 {
            bail!("No region was selected");
        }
        Ok(region)
    }

    pub fn close(&mut self) -> Result<()> {
        if self.open {
            highgui::destroy_window(WINDOW_NAME)?;
            self.open = false;
        }
        Ok(())
    }
}

impl ViewSurface for WindowDisplay {
    fn show(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(WINDOW_NAME, frame)?;
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        let key = highgui::wait_key(POLL_MS)?;
        Ok(key == QUIT_KEY)
    }
}

impl Drop for WindowDisplay {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Surface that displays nothing and never requests termination.
pub struct NullView;

impl ViewSurface for NullView {
    fn show(&mut self, _frame: &Mat) -> Result<()> {
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        Ok(false)
    }
}
