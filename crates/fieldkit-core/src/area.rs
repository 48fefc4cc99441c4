//! Areas: closed boundaries with holes, dividing lines and a derived
//! sub-area partition.
//!
//! Dividing lines are stored in the order they were applied. The partition
//! is never stored; it is replayed from the boundary and the dividing lines
//! whenever needed, so boundary edits can never leave a stale partition
//! behind.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use fieldkit_geom::{Bounds, Point, Polyline};

use crate::attributes::AttributeSet;
use crate::error::{EditError, Result};
use crate::topology;

/// A hole punched through an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub id: Uuid,
    /// Closed ring lying inside the owning area's boundary.
    pub ring: Polyline,
}

impl Hole {
    pub fn new(ring: Polyline) -> Self {
        Self {
            id: Uuid::new_v4(),
            ring,
        }
    }
}

/// An open curve dividing an area (or one of its sub-areas) in two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivideLine {
    pub id: Uuid,
    /// Open curve whose endpoints lie on the enclosing outline.
    pub line: Polyline,
}

impl DivideLine {
    pub fn new(line: Polyline) -> Self {
        Self {
            id: Uuid::new_v4(),
            line,
        }
    }
}

/// One member of an area's derived partition.
#[derive(Debug, Clone, PartialEq)]
pub struct SubArea {
    /// Closed outline of this partition member.
    pub outline: Polyline,
    /// Attributes of this member.
    pub attributes: AttributeSet,
}

/// The replayed partition of an area.
#[derive(Debug, Clone)]
pub struct Partition {
    pub subareas: Vec<SubArea>,
    /// Indexes of the two sub-areas created by the most recent divide,
    /// when the area is divided at all.
    pub last_children: Option<(usize, usize)>,
}

/// A closed-boundary map feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    /// Closed outer boundary.
    pub boundary: Polyline,
    pub holes: Vec<Hole>,
    /// Dividing lines in application order.
    pub divide_lines: Vec<DivideLine>,
    /// Per-sub-area attributes; always `divide_lines.len() + 1` entries.
    pub subarea_attributes: Vec<AttributeSet>,
    /// Whole-area attributes. Reset to the default set the first time the
    /// area is divided, since the sub-areas carry the meaning from then on.
    pub attributes: AttributeSet,
}

impl Area {
    /// Builds an undivided area from a closed boundary.
    pub fn new(boundary: Polyline, attributes: AttributeSet) -> Result<Self> {
        if !boundary.is_closed() {
            return Err(fieldkit_geom::GeometryError::NotClosed.into());
        }
        if boundary.len() < 4 {
            return Err(fieldkit_geom::GeometryError::DegenerateRing {
                points: boundary.len(),
            }
            .into());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            boundary,
            holes: Vec::new(),
            divide_lines: Vec::new(),
            subarea_attributes: vec![attributes.clone()],
            attributes,
        })
    }

    pub fn is_divided(&self) -> bool {
        !self.divide_lines.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.boundary.bounds()
    }

    /// True when `p` lies inside the boundary and outside every hole.
    pub fn contains(&self, p: &Point) -> bool {
        self.boundary.contains(p) && !self.holes.iter().any(|h| h.ring.contains(p))
    }

    /// Replays the dividing lines over the boundary to produce the current
    /// partition.
    ///
    /// Each dividing line splits the partition member it spans, the two
    /// children taking the parent's slot and the one after it. A dividing
    /// line that no longer lands on any member (after a boundary edit that
    /// slipped past validation) is reported and skipped.
    pub fn partition(&self, tolerance: f64) -> Result<Partition> {
        let mut outlines: Vec<Polyline> = vec![self.boundary.clone()];
        let mut last_children = None;
        for dl in &self.divide_lines {
            let Some(parent) = topology::find_spanned_outline(&outlines, &dl.line, tolerance)
            else {
                warn!(divide_line = %dl.id, area = %self.id, "dividing line spans no partition member; skipped");
                continue;
            };
            let (left, right) =
                topology::split_outline(&outlines[parent], &dl.line, tolerance)?;
            outlines[parent] = left;
            outlines.insert(parent + 1, right);
            last_children = Some((parent, parent + 1));
        }
        let subareas = outlines
            .into_iter()
            .enumerate()
            .map(|(i, outline)| SubArea {
                outline,
                attributes: self
                    .subarea_attributes
                    .get(i)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();
        Ok(Partition {
            subareas,
            last_children,
        })
    }

    /// Convenience wrapper over [`Area::partition`].
    pub fn subareas(&self, tolerance: f64) -> Result<Vec<SubArea>> {
        Ok(self.partition(tolerance)?.subareas)
    }

    /// Index of the partition member containing `p`, if any.
    pub fn subarea_at(&self, p: &Point, tolerance: f64) -> Result<Option<usize>> {
        if !self.contains(p) {
            return Ok(None);
        }
        if !self.is_divided() {
            return Ok(Some(0));
        }
        let part = self.partition(tolerance)?;
        Ok(part
            .subareas
            .iter()
            .position(|s| s.outline.contains(p)))
    }

    /// Attributes shown for the whole feature: the single member's set when
    /// undivided, the area-level set otherwise.
    pub fn display_attributes(&self) -> &AttributeSet {
        if self.is_divided() {
            &self.attributes
        } else {
            &self.subarea_attributes[0]
        }
    }

    /// Rigid translation of the boundary, holes and dividing lines.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.boundary.translate(dx, dy);
        for h in &mut self.holes {
            h.ring.translate(dx, dy);
        }
        for d in &mut self.divide_lines {
            d.line.translate(dx, dy);
        }
    }

    /// Rigid rotation of the boundary, holes and dividing lines.
    pub fn rotate_about(&mut self, centre: &Point, angle: f64) {
        self.boundary.rotate_about(centre, angle);
        for h in &mut self.holes {
            h.ring.rotate_about(centre, angle);
        }
        for d in &mut self.divide_lines {
            d.line.rotate_about(centre, angle);
        }
    }

    /// A representative point inside the area, clear of holes when possible.
    pub fn interior_point(&self) -> Result<Point> {
        let p = self.boundary.interior_point()?;
        if !self.holes.iter().any(|h| h.ring.contains(&p)) {
            return Ok(p);
        }
        // Centroid landed in a hole; probe boundary-vertex midpoints
        for v in self.boundary.points() {
            let probe = v.midpoint(&p);
            if self.contains(&probe) {
                return Ok(probe);
            }
        }
        Err(EditError::rejected("area interior is entirely holed out"))
    }
}
