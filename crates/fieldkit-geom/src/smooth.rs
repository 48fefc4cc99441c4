//! Corner-cutting smoothing for drawn curves.
//!
//! Freehand input comes in jagged; when the smoothing factor is above 1.0
//! the joins between a drawn segment and the retained pieces of the
//! original curve get their facing ends trimmed and the corner rounded.

use crate::point::Point;
use crate::polyline::Polyline;
use crate::EPSILON;

/// Fraction of `resolution * factor` trimmed off each joining end before
/// rounding, matching the drawn-segment join behaviour of the edit tools.
pub const JOIN_TRIM_SCALE: f64 = 0.02;

/// Chaikin corner cutting. Endpoints are preserved; closed chains stay
/// closed. `iterations` of 0 returns the input unchanged.
pub fn chaikin(line: &Polyline, iterations: usize) -> Polyline {
    let mut current = line.clone();
    for _ in 0..iterations {
        if current.len() < 3 {
            break;
        }
        let closed = current.is_closed();
        let pts = current.points();
        let mut out: Vec<Point> = Vec::with_capacity(pts.len() * 2);
        if !closed {
            out.push(pts[0]);
        }
        for w in pts.windows(2) {
            let (a, b) = (w[0], w[1]);
            out.push(Point::new(
                0.75 * a.x + 0.25 * b.x,
                0.75 * a.y + 0.25 * b.y,
            ));
            out.push(Point::new(
                0.25 * a.x + 0.75 * b.x,
                0.25 * a.y + 0.75 * b.y,
            ));
        }
        if !closed {
            out.push(pts[pts.len() - 1]);
        }
        current = Polyline::from_points(out);
        if closed {
            current.close();
        }
    }
    current
}

/// Joins `head` onto `tail`, optionally rounding the junction.
///
/// With `factor > 1.0` both facing ends are trimmed by
/// `resolution * factor * JOIN_TRIM_SCALE` and the corner is rounded; at or
/// below 1.0 the chains are concatenated as-is.
pub fn smooth_join(head: &Polyline, tail: &Polyline, factor: f64, resolution: f64) -> Polyline {
    let mut a = head.clone();
    let mut b = tail.clone();
    if factor > 1.0 {
        let trim = resolution * factor * JOIN_TRIM_SCALE;
        a.truncate_back(trim);
        b.truncate_front(trim);
    }
    let mut joined = a;
    joined.append(&b);
    joined.condense(EPSILON * 10.0);
    if factor > 1.0 {
        chaikin(&joined, 1)
    } else {
        joined
    }
}
