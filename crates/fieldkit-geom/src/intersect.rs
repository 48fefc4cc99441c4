//! Segment and polyline intersection scans.

use smallvec::SmallVec;

use crate::point::Point;
use crate::polyline::Polyline;
use crate::EPSILON;

/// A self-intersection found while walking a polyline from its start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfCrossing {
    /// Crossing location.
    pub point: Point,
    /// Earlier span involved in the crossing.
    pub span_a: usize,
    /// Later span involved in the crossing.
    pub span_b: usize,
}

/// Intersection of segments `a0..a1` and `b0..b1`, if any.
///
/// Collinear overlaps report the first endpoint of the overlap.
pub fn segment_intersection(a0: &Point, a1: &Point, b0: &Point, b1: &Point) -> Option<Point> {
    let d1x = a1.x - a0.x;
    let d1y = a1.y - a0.y;
    let d2x = b1.x - b0.x;
    let d2y = b1.y - b0.y;
    let denom = d1x * d2y - d1y * d2x;

    if denom.abs() <= EPSILON {
        // Parallel; check collinear overlap
        let cross = (b0.x - a0.x) * d1y - (b0.y - a0.y) * d1x;
        if cross.abs() > EPSILON {
            return None;
        }
        let len2 = d1x * d1x + d1y * d1y;
        if len2 <= EPSILON * EPSILON {
            return None;
        }
        for candidate in [b0, b1] {
            let t = ((candidate.x - a0.x) * d1x + (candidate.y - a0.y) * d1y) / len2;
            if (0.0..=1.0).contains(&t) {
                return Some(*candidate);
            }
        }
        return None;
    }

    let t = ((b0.x - a0.x) * d2y - (b0.y - a0.y) * d2x) / denom;
    let u = ((b0.x - a0.x) * d1y - (b0.y - a0.y) * d1x) / denom;
    if (-EPSILON..=1.0 + EPSILON).contains(&t) && (-EPSILON..=1.0 + EPSILON).contains(&u) {
        Some(Point::new(a0.x + t * d1x, a0.y + t * d1y))
    } else {
        None
    }
}

/// First self-intersection of `line`, scanning spans from the start.
///
/// Adjacent spans sharing a vertex are not treated as crossings. Returns
/// `None` for simple chains.
pub fn first_self_crossing(line: &Polyline) -> Option<SelfCrossing> {
    let pts = line.points();
    if pts.len() < 4 {
        return None;
    }
    let spans = pts.len() - 1;
    for i in 0..spans {
        for j in (i + 2)..spans {
            // Skip span pairs that share the chain's wrap vertex
            if i == 0 && j == spans - 1 && pts[0].coincident(&pts[spans], EPSILON) {
                continue;
            }
            if let Some(p) = segment_intersection(&pts[i], &pts[i + 1], &pts[j], &pts[j + 1]) {
                return Some(SelfCrossing {
                    point: p,
                    span_a: i,
                    span_b: j,
                });
            }
        }
    }
    None
}

/// All crossings of `line` against the spans of `ring`, ordered along `line`.
///
/// Each entry is (crossing point, span index on `line`).
pub fn crossings_with_ring(line: &Polyline, ring: &Polyline) -> Vec<(Point, usize)> {
    let mut found = Vec::new();
    let lp = line.points();
    let rp = ring.points();
    if lp.len() < 2 || rp.len() < 2 {
        return found;
    }
    for i in 0..lp.len() - 1 {
        let mut on_span: SmallVec<[Point; 4]> = SmallVec::new();
        for j in 0..rp.len() - 1 {
            if let Some(p) = segment_intersection(&lp[i], &lp[i + 1], &rp[j], &rp[j + 1]) {
                if !on_span.iter().any(|q| q.coincident(&p, EPSILON)) {
                    on_span.push(p);
                }
            }
        }
        // Order multiple crossings on one span by distance from the span start
        on_span.sort_by(|a, b| lp[i].distance_to(a).total_cmp(&lp[i].distance_to(b)));
        found.extend(on_span.into_iter().map(|p| (p, i)));
    }
    found
}
