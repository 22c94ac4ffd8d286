use crate::trajectory::Trajectory;
use anyhow::Result;
use opencv::{
    core::{Rect, Scalar},
    imgproc,
    prelude::*,
};

fn box_color() -> Scalar {
    // Blue in BGR
    Scalar::new(255.0, 0.0, 0.0, 0.0)
}

fn trail_color() -> Scalar {
    // Red in BGR
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// Draw the current bounding box, a filled marker at the newest center point,
/// and the polyline through all recorded centers. Mutates the frame in place.
pub fn annotate(frame: &mut Mat, rect: Rect, trail: &Trajectory) -> Result<()> {
    imgproc::rectangle(frame, rect, box_color(), 2, imgproc::LINE_8, 0)?;
    if let Some(center) = trail.last() {
        imgproc::circle(frame, center, 3, trail_color(), -1, imgproc::LINE_8, 0)?;
    }
    for (from, to) in trail.segments() {
        imgproc::line(frame, from, to, trail_color(), 2, imgproc::LINE_8, 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::center_of;
    use opencv::core::{self, Point, Vec3b};

    fn blank_frame() -> Mat {
        Mat::new_rows_cols_with_default(64, 64, core::CV_8UC3, Scalar::all(0.0)).unwrap()
    }

    fn pixel(frame: &Mat, x: i32, y: i32) -> Vec3b {
        *frame.at_2d::<Vec3b>(y, x).unwrap()
    }

    #[test]
    fn draws_box_edge_and_center_marker() {
        let mut frame = blank_frame();
        let rect = Rect::new(10, 10, 20, 20);
        let mut trail = Trajectory::new();
        trail.push(center_of(rect));

        annotate(&mut frame, rect, &trail).unwrap();

        // Top edge of the rectangle is blue.
        assert_eq!(pixel(&frame, 15, 10), Vec3b::from([255, 0, 0]));
        // Center marker is red.
        assert_eq!(pixel(&frame, 20, 20), Vec3b::from([0, 0, 255]));
    }

    #[test]
    fn single_point_paints_no_line() {
        let mut frame = blank_frame();
        let rect = Rect::new(40, 40, 10, 10);
        let mut trail = Trajectory::new();
        trail.push(center_of(rect));

        annotate(&mut frame, rect, &trail).unwrap();

        // A point far from the box and marker stays black.
        assert_eq!(pixel(&frame, 5, 5), Vec3b::from([0, 0, 0]));
    }

    #[test]
    fn two_points_paint_a_connecting_segment() {
        let mut frame = blank_frame();
        let mut trail = Trajectory::new();
        trail.push(Point::new(10, 30));
        trail.push(Point::new(50, 30));

        annotate(&mut frame, Rect::new(45, 25, 10, 10), &trail).unwrap();

        // Midpoint of the segment between the two centers is red.
        assert_eq!(pixel(&frame, 30, 30), Vec3b::from([0, 0, 255]));
    }
}
