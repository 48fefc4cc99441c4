//! Structural edits: dividing, rejoining, holing and boundary replacement.
//!
//! These functions mutate an [`Area`] while keeping its derived partition
//! replayable. Anything that silently drops dependent structure reports
//! what it dropped so the editor can surface it.

use tracing::{debug, info, warn};

use fieldkit_geom::{
    clip_to_ring, crossings_with_ring, join_ring_candidate, resolve_reconnection, split_ring,
    ClipFailure, Point, Polyline,
};

use crate::area::{Area, DivideLine, Hole};
use crate::attributes::AttributeSet;
use crate::error::{EditError, Result};

/// Finds the outline whose ring the line spans: both endpoints on the ring
/// within `tolerance` and the line's midpoint inside it.
pub fn find_spanned_outline(
    outlines: &[Polyline],
    line: &Polyline,
    tolerance: f64,
) -> Option<usize> {
    let first = line.first()?;
    let last = line.last()?;
    let mid = line.mid_vertex()?;
    outlines.iter().position(|ring| {
        let near_first = ring.nearest_point(first).map(|n| n.distance);
        let near_last = ring.nearest_point(last).map(|n| n.distance);
        matches!((near_first, near_last), (Some(a), Some(b)) if a <= tolerance && b <= tolerance)
            && (ring.contains(mid) || ring.nearest_point(mid).map(|n| n.distance <= tolerance).unwrap_or(false))
    })
}

/// Splits a closed outline along a spanning line.
///
/// Returns the piece left of the line's direction first, then the right
/// piece. Both are closed rings sharing the line.
pub fn split_outline(ring: &Polyline, line: &Polyline, tolerance: f64) -> Result<(Polyline, Polyline)> {
    let first = line
        .first()
        .ok_or(fieldkit_geom::GeometryError::Empty)?;
    let last = line.last().ok_or(fieldkit_geom::GeometryError::Empty)?;
    let start = resolve_reconnection(ring, first, tolerance, tolerance)
        .ok_or(fieldkit_geom::GeometryError::Empty)?;
    let end = resolve_reconnection(ring, last, tolerance, tolerance)
        .ok_or(fieldkit_geom::GeometryError::Empty)?;
    let pieces = split_ring(ring, &start, &end)?;

    // The pieces run from the line's end back to its start, so appending
    // one to the line closes a ring
    let ring_a = join_ring_candidate(line, &pieces.piece_a, false, false)?;
    let ring_b = join_ring_candidate(line, &pieces.piece_b, false, false)?;

    let a_left = is_left_of(line, &ring_a)?;
    if a_left {
        Ok((ring_a, ring_b))
    } else {
        Ok((ring_b, ring_a))
    }
}

/// True when the candidate ring lies on the left of the line's direction.
fn is_left_of(line: &Polyline, candidate: &Polyline) -> Result<bool> {
    let interior = candidate.interior_point()?;
    let near = line
        .nearest_point(&interior)
        .ok_or(fieldkit_geom::GeometryError::Empty)?;
    let pts = line.points();
    let span = near.span.min(pts.len().saturating_sub(2));
    let a = pts[span];
    let b = pts[span + 1];
    let cross = (b.x - a.x) * (interior.y - a.y) - (b.y - a.y) * (interior.x - a.x);
    Ok(cross > 0.0)
}

/// Clips a drawn dividing line to a partition member's outline.
///
/// Maps clip failures onto the refusal reasons shown to the user.
pub fn prepare_divide_line(
    outline: &Polyline,
    drawn: &Polyline,
    min_length: f64,
) -> Result<Polyline> {
    match clip_to_ring(outline, drawn, min_length) {
        Ok(clipped) => Ok(clipped),
        Err(ClipFailure::Outside) | Err(ClipFailure::EndpointUnplaced) => Err(EditError::rejected(
            "dividing line does not cross the picked area",
        )),
        Err(ClipFailure::TooShort) => {
            Err(EditError::rejected("dividing line too short inside the area"))
        }
    }
}

/// Applies a prepared dividing line to the partition member at
/// `subarea_index`.
///
/// The member's slot splits into two: the left child keeps the parent's
/// attributes in place, the right child gets a copy in the slot after it.
/// The first divide also resets the whole-area attributes, since the
/// sub-areas carry the meaning from then on.
pub fn divide(area: &mut Area, subarea_index: usize, line: Polyline, tolerance: f64) -> Result<()> {
    let part = area.partition(tolerance)?;
    let outline = part
        .subareas
        .get(subarea_index)
        .map(|s| &s.outline)
        .ok_or_else(|| EditError::rejected("no such sub-area"))?;
    if find_spanned_outline(std::slice::from_ref(outline), &line, tolerance).is_none() {
        return Err(EditError::rejected(
            "dividing line does not span the picked sub-area",
        ));
    }
    let parent_attrs = area
        .subarea_attributes
        .get(subarea_index)
        .cloned()
        .unwrap_or_default();
    area.subarea_attributes
        .insert(subarea_index + 1, parent_attrs);
    if !area.is_divided() {
        area.attributes = AttributeSet::new();
    }
    area.divide_lines.push(DivideLine::new(line));
    info!(area = %area.id, subarea = subarea_index, lines = area.divide_lines.len(), "divided sub-area");
    Ok(())
}

/// Removes the most recent dividing line, merging its two children.
///
/// The surviving slot keeps the lower child's attributes. Returns the
/// removed line so the editor can offer it back for redrawing.
pub fn rejoin(area: &mut Area, tolerance: f64) -> Result<DivideLine> {
    let part = area.partition(tolerance)?;
    let (lo, _hi) = part
        .last_children
        .ok_or_else(|| EditError::rejected("area has no dividing lines"))?;
    let removed = area
        .divide_lines
        .pop()
        .ok_or_else(|| EditError::rejected("area has no dividing lines"))?;
    if lo + 1 < area.subarea_attributes.len() {
        area.subarea_attributes.remove(lo + 1);
    }
    info!(area = %area.id, line = %removed.id, "rejoined last divide");
    Ok(removed)
}

/// Punches a hole through an area.
///
/// The ring must be closed, lie inside the boundary without crossing it,
/// and stay clear of existing holes.
pub fn add_hole(area: &mut Area, ring: Polyline) -> Result<()> {
    if !ring.is_closed() {
        return Err(fieldkit_geom::GeometryError::NotClosed.into());
    }
    let probe = ring.interior_point()?;
    if !area.boundary.contains(&probe) {
        return Err(EditError::rejected("hole lies outside the area"));
    }
    if !crossings_with_ring(&ring, &area.boundary).is_empty() {
        return Err(EditError::rejected("hole crosses the area boundary"));
    }
    for existing in &area.holes {
        // Checked both ways: either ring swallowing the other produces no
        // crossings
        let swallowed = existing
            .ring
            .interior_point()
            .map(|p| ring.contains(&p))
            .unwrap_or(false);
        if !crossings_with_ring(&ring, &existing.ring).is_empty()
            || existing.ring.contains(&probe)
            || swallowed
        {
            return Err(EditError::rejected("hole overlaps an existing hole"));
        }
    }
    area.holes.push(Hole::new(ring));
    debug!(area = %area.id, holes = area.holes.len(), "added hole");
    Ok(())
}

/// Deletes the hole with the given index. Out-of-range indexes are refused.
pub fn remove_hole(area: &mut Area, index: usize) -> Result<Hole> {
    if index >= area.holes.len() {
        return Err(EditError::rejected("no such hole"));
    }
    Ok(area.holes.remove(index))
}

/// Replaces a hole's ring in place, re-validating it against the boundary.
pub fn replace_hole(area: &mut Area, index: usize, ring: Polyline) -> Result<()> {
    let old = remove_hole(area, index)?;
    match add_hole(area, ring) {
        Ok(()) => {
            // Keep the hole's identity and position in the list
            if let Some(mut hole) = area.holes.pop() {
                hole.id = old.id;
                area.holes.insert(index, hole);
            }
            Ok(())
        }
        Err(e) => {
            area.holes.insert(index, old);
            Err(e)
        }
    }
}

/// Swaps in a new boundary ring, dropping dependent structure it orphans.
///
/// Holes that fall outside the new boundary and dividing lines that no
/// longer span any partition member are removed; each drop is returned as a
/// [`EditError::TopologyLoss`]-style description for the caller to report.
pub fn replace_boundary(area: &mut Area, boundary: Polyline, tolerance: f64) -> Result<Vec<String>> {
    if !boundary.is_closed() {
        return Err(fieldkit_geom::GeometryError::NotClosed.into());
    }
    let mut dropped = Vec::new();
    area.boundary = boundary;

    area.holes.retain(|h| {
        let keep = h
            .ring
            .interior_point()
            .map(|p| area.boundary.contains(&p))
            .unwrap_or(false)
            && crossings_with_ring(&h.ring, &area.boundary).is_empty();
        if !keep {
            dropped.push(format!("hole {} no longer fits the boundary", h.id));
        }
        keep
    });

    // Dividing lines must still span a partition member when replayed
    loop {
        let mut orphan = None;
        {
            let mut outlines: Vec<Polyline> = vec![area.boundary.clone()];
            for (i, dl) in area.divide_lines.iter().enumerate() {
                match find_spanned_outline(&outlines, &dl.line, tolerance) {
                    Some(parent) => {
                        if let Ok((left, right)) = split_outline(&outlines[parent], &dl.line, tolerance) {
                            outlines[parent] = left;
                            outlines.insert(parent + 1, right);
                        } else {
                            orphan = Some(i);
                            break;
                        }
                    }
                    None => {
                        orphan = Some(i);
                        break;
                    }
                }
            }
        }
        match orphan {
            Some(i) => {
                let dl = area.divide_lines.remove(i);
                if i + 1 < area.subarea_attributes.len() {
                    area.subarea_attributes.remove(i + 1);
                }
                warn!(area = %area.id, line = %dl.id, "dividing line dropped by boundary edit");
                dropped.push(format!("dividing line {} dropped by boundary edit", dl.id));
            }
            None => break,
        }
    }
    if area.divide_lines.is_empty() {
        area.subarea_attributes.truncate(1);
    }
    Ok(dropped)
}

/// Replaces the dividing line at `index`, keeping its identity.
///
/// The new line must still span the same pair of partition members, which
/// is checked by replaying the partition with the replacement in place.
pub fn replace_divide_line(
    area: &mut Area,
    index: usize,
    line: Polyline,
    tolerance: f64,
) -> Result<()> {
    let old = area
        .divide_lines
        .get(index)
        .cloned()
        .ok_or_else(|| EditError::rejected("no such dividing line"))?;
    area.divide_lines[index].line = line;
    match area.partition(tolerance) {
        Ok(part) if part.subareas.len() == area.subarea_attributes.len() => Ok(()),
        _ => {
            area.divide_lines[index] = old;
            Err(EditError::rejected(
                "replacement line does not span the divided area",
            ))
        }
    }
}

/// Picks the partition member nearest `p`, inside-first.
pub fn nearest_subarea(area: &Area, p: &Point, tolerance: f64) -> Result<Option<usize>> {
    if let Some(idx) = area.subarea_at(p, tolerance)? {
        return Ok(Some(idx));
    }
    let part = area.partition(tolerance)?;
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in part.subareas.iter().enumerate() {
        if let Some(near) = s.outline.nearest_point(p) {
            if near.distance <= tolerance && best.map(|(_, d)| near.distance < d).unwrap_or(true) {
                best = Some((i, near.distance));
            }
        }
    }
    Ok(best.map(|(i, _)| i))
}
