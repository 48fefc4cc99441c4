//! Open and closed polylines.
//!
//! A `Polyline` is an ordered point chain. Closed curves (area boundaries,
//! holes) carry a final point coincident with their first; [`Polyline::close`]
//! establishes that invariant and ring-only queries require it.

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::error::{GeometryError, Result};
use crate::point::Point;
use crate::EPSILON;

/// Result of a closest-point query against a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// Closest point on the polyline.
    pub point: Point,
    /// Distance from the query point.
    pub distance: f64,
    /// Index of the span `[i, i+1]` holding the closest point.
    pub span: usize,
}

/// An ordered chain of map-space points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Builds a closed ring from a vertex list, closing it if necessary.
    pub fn ring(points: Vec<Point>) -> Self {
        let mut line = Self { points };
        line.close();
        line
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Appends all points of `other`.
    pub fn append(&mut self, other: &Polyline) {
        self.points.extend_from_slice(&other.points);
    }

    /// Appends points `from..=to` of `other`, reversed when `from > to`.
    pub fn append_portion(&mut self, other: &Polyline, from: usize, to: usize) {
        if other.points.is_empty() {
            return;
        }
        let hi = other.points.len() - 1;
        let (from, to) = (from.min(hi), to.min(hi));
        if from <= to {
            self.points.extend_from_slice(&other.points[from..=to]);
        } else {
            self.points
                .extend(other.points[to..=from].iter().rev().copied());
        }
    }

    /// Total arc length.
    pub fn arc_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// True when the chain has fewer than two points or is shorter than `minimum`.
    pub fn is_too_short(&self, minimum: f64) -> bool {
        self.points.len() < 2 || self.arc_length() < minimum
    }

    /// True when the chain forms a ring (last point coincides with first).
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() >= 4 => a.coincident(b, EPSILON),
            _ => false,
        }
    }

    /// Closes the chain by repeating the first point if needed.
    pub fn close(&mut self) {
        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            if !first.coincident(last, EPSILON) {
                let first = *first;
                self.points.push(first);
            }
        }
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Removes consecutive points closer than `tol`.
    pub fn condense(&mut self, tol: f64) {
        if self.points.len() < 2 {
            return;
        }
        let mut kept: Vec<Point> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            match kept.last() {
                Some(prev) if prev.coincident(p, tol) => {}
                _ => kept.push(*p),
            }
        }
        // Preserve ring closure dropped by the dedupe above
        if self.is_closed() {
            if let (Some(&first), Some(last)) = (kept.first(), kept.last()) {
                if !last.coincident(&first, EPSILON) {
                    kept.push(first);
                }
            }
        }
        self.points = kept;
    }

    /// Trims `dist` of arc length off the front of an open chain.
    pub fn truncate_front(&mut self, dist: f64) {
        if dist > 0.0 && self.points.len() >= 3 {
            self.trim_front(dist);
        }
    }

    /// Trims `dist` of arc length off the back of an open chain.
    pub fn truncate_back(&mut self, dist: f64) {
        if dist > 0.0 && self.points.len() >= 3 {
            self.reverse();
            self.trim_front(dist);
            self.reverse();
        }
    }

    fn trim_front(&mut self, dist: f64) {
        let mut walked = 0.0;
        let mut idx = 0;
        while idx + 2 < self.points.len() {
            let step = self.points[idx].distance_to(&self.points[idx + 1]);
            if walked + step >= dist {
                break;
            }
            walked += step;
            idx += 1;
        }
        if idx > 0 {
            self.points.drain(0..idx);
        }
        // Slide the new first point along its span for the remainder
        if self.points.len() >= 2 {
            let remain = dist - walked;
            let step = self.points[0].distance_to(&self.points[1]);
            if step > EPSILON && remain > 0.0 && remain < step {
                let t = remain / step;
                let a = self.points[0];
                let b = self.points[1];
                self.points[0] = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            }
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.translate(dx, dy);
        }
    }

    pub fn rotate_about(&mut self, centre: &Point, angle: f64) {
        for p in &mut self.points {
            p.rotate_about(centre, angle);
        }
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in &self.points {
            b.extend(p);
        }
        b
    }

    /// Vertex at the midpoint of the chain, by index.
    pub fn mid_vertex(&self) -> Option<&Point> {
        self.points.get(self.points.len() / 2)
    }

    /// Closest point on the chain to `p`.
    pub fn nearest_point(&self, p: &Point) -> Option<NearestPoint> {
        if self.points.is_empty() {
            return None;
        }
        if self.points.len() == 1 {
            return Some(NearestPoint {
                point: self.points[0],
                distance: self.points[0].distance_to(p),
                span: 0,
            });
        }
        let mut best: Option<NearestPoint> = None;
        for (i, w) in self.points.windows(2).enumerate() {
            let cand = project_to_segment(p, &w[0], &w[1]);
            let dist = cand.distance_to(p);
            if best.map(|b| dist < b.distance).unwrap_or(true) {
                best = Some(NearestPoint {
                    point: cand,
                    distance: dist,
                    span: i,
                });
            }
        }
        best
    }

    /// Closest vertex of the chain to `p`, with its index.
    pub fn nearest_vertex(&self, p: &Point) -> Option<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, v)| (i, v.distance_to(p)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Even-odd point-in-polygon test. The chain must be closed.
    pub fn contains(&self, p: &Point) -> bool {
        if !self.is_closed() {
            return false;
        }
        let mut inside = false;
        for w in self.points.windows(2) {
            let (a, b) = (&w[0], &w[1]);
            if (a.y > p.y) != (b.y > p.y) {
                let t = (p.y - a.y) / (b.y - a.y);
                let x = a.x + t * (b.x - a.x);
                if x > p.x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Shoelace signed area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for w in self.points.windows(2) {
            sum += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Polygon centroid for a closed chain; vertex average otherwise.
    pub fn centroid(&self) -> Result<Point> {
        if self.points.is_empty() {
            return Err(GeometryError::Empty);
        }
        let a = self.signed_area();
        if self.is_closed() && a.abs() > EPSILON {
            let mut cx = 0.0;
            let mut cy = 0.0;
            for w in self.points.windows(2) {
                let cross = w[0].x * w[1].y - w[1].x * w[0].y;
                cx += (w[0].x + w[1].x) * cross;
                cy += (w[0].y + w[1].y) * cross;
            }
            return Ok(Point::new(cx / (6.0 * a), cy / (6.0 * a)));
        }
        let n = self.points.len() as f64;
        let sx: f64 = self.points.iter().map(|p| p.x).sum();
        let sy: f64 = self.points.iter().map(|p| p.y).sum();
        Ok(Point::new(sx / n, sy / n))
    }

    /// A point guaranteed to lie inside a closed ring.
    ///
    /// Tries the centroid first, then probes midpoints of rays through the
    /// ring interior. Fails only on degenerate rings.
    pub fn interior_point(&self) -> Result<Point> {
        if !self.is_closed() {
            return Err(GeometryError::NotClosed);
        }
        let c = self.centroid()?;
        if self.contains(&c) {
            return Ok(c);
        }
        // Concave ring: probe along each edge's inward offset midpoint
        for w in self.points.windows(2) {
            let mid = w[0].midpoint(&w[1]);
            let probe = mid.midpoint(&c);
            if self.contains(&probe) {
                return Ok(probe);
            }
        }
        Err(GeometryError::DegenerateRing {
            points: self.points.len(),
        })
    }
}

/// Projects `p` onto the segment `a..b`.
fn project_to_segment(p: &Point, a: &Point, b: &Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 <= EPSILON * EPSILON {
        return *a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    Point::new(a.x + t * dx, a.y + t * dy)
}
