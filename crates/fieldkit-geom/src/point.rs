use serde::{Deserialize, Serialize};

/// A point in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point midway between `self` and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Shifts the point by the given offsets.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Rotates the point about `centre` by `angle` radians (counter-clockwise).
    pub fn rotate_about(&mut self, centre: &Point, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - centre.x;
        let dy = self.y - centre.y;
        self.x = centre.x + dx * cos - dy * sin;
        self.y = centre.y + dx * sin + dy * cos;
    }

    /// True when the two points coincide within `tol`.
    pub fn coincident(&self, other: &Point, tol: f64) -> bool {
        self.distance_to(other) <= tol
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}
