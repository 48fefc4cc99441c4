//! Curve replacement machinery: reconnection of a drawn segment onto an
//! existing curve, complementary ring pieces, and clipping to a region.
//!
//! These are the primitives behind boundary/divide-line/hole reshaping:
//! a freshly drawn open segment reconnects to the original curve at two
//! points, the original splits there into two complementary pieces, and
//! each piece joined with the segment yields one candidate replacement.

use tracing::debug;

use crate::error::{ClipFailure, GeometryError, Result};
use crate::intersect::crossings_with_ring;
use crate::point::Point;
use crate::polyline::Polyline;
use crate::EPSILON;

/// Where one endpoint of a drawn segment reattaches to the original curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconnection {
    /// Reattachment point on the original curve.
    pub point: Point,
    /// Span of the original curve holding that point.
    pub span: usize,
    /// True when the junction sits close enough that the segment's own
    /// terminal point should be skipped when joining.
    pub skip_junction: bool,
}

/// The two complementary pieces of a split ring, both running from the end
/// reconnection to the start reconnection.
#[derive(Debug, Clone)]
pub struct RingPieces {
    pub piece_a: Polyline,
    pub piece_b: Polyline,
}

/// Resolves where `endpoint` reattaches to `curve`.
///
/// Snaps to an existing vertex within `vertex_tol`; otherwise takes the
/// closest point on the curve, marking the junction skippable when it lies
/// within `junction_tol`.
pub fn resolve_reconnection(
    curve: &Polyline,
    endpoint: &Point,
    vertex_tol: f64,
    junction_tol: f64,
) -> Option<Reconnection> {
    if let Some((idx, dist)) = curve.nearest_vertex(endpoint) {
        if dist <= vertex_tol {
            let span = idx.min(curve.len().saturating_sub(2));
            return Some(Reconnection {
                point: curve.points()[idx],
                span,
                skip_junction: true,
            });
        }
    }
    let near = curve.nearest_point(endpoint)?;
    Some(Reconnection {
        point: near.point,
        span: near.span,
        skip_junction: near.distance < junction_tol,
    })
}

/// Splits a closed ring at two reconnection points into two complementary
/// pieces, both oriented from `end` to `start`.
pub fn split_ring(ring: &Polyline, start: &Reconnection, end: &Reconnection) -> Result<RingPieces> {
    if !ring.is_closed() {
        return Err(GeometryError::NotClosed);
    }
    let hi = ring.len() - 1;
    let ips = start.span;
    let ipe = end.span;

    let mut piece_a = Polyline::new();
    let mut piece_b = Polyline::new();
    piece_a.push(end.point);
    piece_b.push(end.point);

    if ips == ipe {
        // Both junctions on the same span: one piece carries the whole
        // ring, the other is the direct jump between the junctions
        let base = ring.points()[ips];
        if start.point.distance_to(&base) <= end.point.distance_to(&base) {
            piece_a.append_portion(ring, ipe + 1, hi - 1);
            piece_a.append_portion(ring, 0, ips);
        } else {
            piece_a.append_portion(ring, ipe, 0);
            piece_a.append_portion(ring, hi - 1, ips + 1);
        }
    } else if ips < ipe {
        piece_a.append_portion(ring, ipe + 1, hi - 1);
        piece_a.append_portion(ring, 0, ips);
        piece_b.append_portion(ring, ipe, ips + 1);
    } else {
        piece_a.append_portion(ring, ipe, 0);
        piece_a.append_portion(ring, hi - 1, ips + 1);
        piece_b.append_portion(ring, ipe + 1, ips);
    }

    piece_a.push(start.point);
    piece_b.push(start.point);
    piece_a.condense(EPSILON * 10.0);
    piece_b.condense(EPSILON * 10.0);
    debug!(
        piece_a = piece_a.len(),
        piece_b = piece_b.len(),
        "split ring at spans {ips}/{ipe}"
    );
    Ok(RingPieces { piece_a, piece_b })
}

/// Joins a drawn segment with one ring piece to form a candidate ring.
///
/// `skip_start`/`skip_end` drop the segment's terminal points when the
/// junctions are close enough to the original curve (the piece already
/// carries the junction points themselves).
pub fn join_ring_candidate(
    segment: &Polyline,
    piece: &Polyline,
    skip_start: bool,
    skip_end: bool,
) -> Result<Polyline> {
    if segment.is_empty() || piece.is_empty() {
        return Err(GeometryError::Empty);
    }
    let hi = segment.len() - 1;
    let from = usize::from(skip_start);
    let to = if skip_end && hi > 0 { hi - 1 } else { hi };

    let mut ring = Polyline::new();
    if from <= to {
        ring.append_portion(segment, from, to);
    }
    ring.append(piece);
    ring.condense(EPSILON * 10.0);
    ring.close();
    if ring.len() < 4 {
        return Err(GeometryError::DegenerateRing { points: ring.len() });
    }
    Ok(ring)
}

/// Replaces the span of an open curve between the segment's reconnection
/// points with the segment itself.
///
/// The segment is reversed if it was drawn against the original direction.
pub fn replace_open_span(original: &Polyline, segment: &Polyline) -> Result<Polyline> {
    if original.len() < 2 || segment.len() < 2 {
        return Err(GeometryError::Empty);
    }
    let (first, last) = match (segment.first(), segment.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(GeometryError::Empty),
    };
    let ns = original.nearest_point(first).ok_or(GeometryError::Empty)?;
    let ne = original.nearest_point(last).ok_or(GeometryError::Empty)?;

    let mut seg = segment.clone();
    let (head, tail) = if (ns.span, position_on(original, &ns)) <= (ne.span, position_on(original, &ne))
    {
        (ns, ne)
    } else {
        seg.reverse();
        (ne, ns)
    };

    let mut out = Polyline::new();
    out.append_portion(original, 0, head.span);
    out.push(head.point);
    out.append(&seg);
    out.push(tail.point);
    out.append_portion(original, tail.span + 1, original.len() - 1);
    out.condense(EPSILON * 10.0);
    Ok(out)
}

/// Distance along the owning span, used to order two points on one span.
fn position_on(line: &Polyline, near: &crate::polyline::NearestPoint) -> u64 {
    let base = line.points()[near.span];
    (base.distance_to(&near.point) / EPSILON) as u64
}

/// Clips an open curve to the interior of a closed ring.
///
/// The curve must cross the ring at least twice; the portion between the
/// first and last crossings is kept, endpoints snapped onto the ring.
pub fn clip_to_ring(
    ring: &Polyline,
    curve: &Polyline,
    min_length: f64,
) -> std::result::Result<Polyline, ClipFailure> {
    let hits = crossings_with_ring(curve, ring);
    if hits.len() < 2 {
        let all_outside = curve.points().iter().all(|p| !ring.contains(p));
        return Err(if all_outside {
            ClipFailure::Outside
        } else {
            ClipFailure::EndpointUnplaced
        });
    }
    let (first_pt, first_span) = hits[0];
    let (last_pt, last_span) = hits[hits.len() - 1];

    let mut out = Polyline::new();
    out.push(first_pt);
    for (i, p) in curve.points().iter().enumerate() {
        if i > first_span && i <= last_span {
            out.push(*p);
        }
    }
    out.push(last_pt);
    out.condense(EPSILON * 10.0);

    if out.is_too_short(min_length) {
        return Err(ClipFailure::TooShort);
    }
    // The kept portion must actually run through the interior
    if let Some(mid) = out.mid_vertex() {
        let probe = if out.len() == 2 {
            out.points()[0].midpoint(&out.points()[1])
        } else {
            *mid
        };
        if !ring.contains(&probe) && ring.nearest_point(&probe).map(|n| n.distance).unwrap_or(0.0) > min_length {
            return Err(ClipFailure::Outside);
        }
    }
    Ok(out)
}
