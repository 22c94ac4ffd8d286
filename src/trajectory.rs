use opencv::core::{Point, Rect};

/// Integer center of a bounding box.
pub fn center_of(rect: Rect) -> Point {
    Point::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
}

/// Append-only record of the tracked object's center across frames.
/// Insertion order is temporal order; length equals the number of frames on
/// which tracking succeeded so far.
#[derive(Debug, Default)]
pub struct Trajectory {
    points: Vec<Point>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consecutive point pairs for the polyline overlay. The first point has
    /// no predecessor and the last is never connected back to the first.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
