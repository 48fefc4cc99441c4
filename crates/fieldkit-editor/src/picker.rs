//! Selection resolver: pointer coordinate to picked feature.

use uuid::Uuid;

use fieldkit_core::{topology, EditorConfig, EditSet};
use fieldkit_geom::Point;

use crate::error::Result;

/// Which part of an area a pick landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Boundary,
    DivideLine(usize),
    Hole(usize),
    SubArea(usize),
}

/// A resolved pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// Owning area.
    pub area: Uuid,
    pub target: PickTarget,
    /// Distance from the pointer to the picked feature (zero for a
    /// containing sub-area).
    pub distance: f64,
}

/// Resolves a pointer coordinate against the edit set.
///
/// Areas are scanned topmost first. Within pick tolerance of an area's
/// curves, dividing lines and holes win over the boundary; otherwise a
/// containing sub-area is picked; otherwise a boundary within tolerance.
/// Pure query: the edit set is untouched.
pub fn pick(set: &EditSet, p: &Point, cfg: &EditorConfig) -> Result<Option<PickResult>> {
    let tol = cfg.pick_tolerance;
    for area in set.areas() {
        let mut member: Option<(PickTarget, f64)> = None;
        for (i, dl) in area.divide_lines.iter().enumerate() {
            if let Some(near) = dl.line.nearest_point(p) {
                if near.distance <= tol
                    && member.map(|(_, d)| near.distance < d).unwrap_or(true)
                {
                    member = Some((PickTarget::DivideLine(i), near.distance));
                }
            }
        }
        for (i, hole) in area.holes.iter().enumerate() {
            if let Some(near) = hole.ring.nearest_point(p) {
                if near.distance <= tol
                    && member.map(|(_, d)| near.distance < d).unwrap_or(true)
                {
                    member = Some((PickTarget::Hole(i), near.distance));
                }
            }
        }
        if let Some((target, distance)) = member {
            return Ok(Some(PickResult {
                area: area.id,
                target,
                distance,
            }));
        }

        let boundary_near = area.boundary.nearest_point(p);
        if let Some(near) = boundary_near {
            if near.distance <= tol {
                return Ok(Some(PickResult {
                    area: area.id,
                    target: PickTarget::Boundary,
                    distance: near.distance,
                }));
            }
        }

        if area.contains(p) {
            let idx = topology::nearest_subarea(area, p, tol)?.unwrap_or(0);
            return Ok(Some(PickResult {
                area: area.id,
                target: PickTarget::SubArea(idx),
                distance: 0.0,
            }));
        }
    }
    Ok(None)
}
