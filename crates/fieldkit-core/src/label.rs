//! Attributed labels anchored to areas and sub-areas.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use fieldkit_geom::Point;

use crate::area::Area;
use crate::attributes::AttributeSet;
use crate::error::Result;

/// What a label is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Owning area.
    pub area: Uuid,
    /// Partition member under the anchor at the time of attachment.
    pub subarea: usize,
}

/// A text label on the map.
///
/// Attached labels follow their area through moves and merges and are
/// re-pinned (or dropped) when edits change the geometry under them. Free
/// labels just sit at their anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: Uuid,
    pub anchor: Point,
    pub attributes: AttributeSet,
    pub attachment: Option<Attachment>,
}

impl Label {
    pub fn new(anchor: Point, attributes: AttributeSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            attributes,
            attachment: None,
        }
    }

    pub fn attached_to(mut self, area: Uuid, subarea: usize) -> Self {
        self.attachment = Some(Attachment { area, subarea });
        self
    }

    pub fn is_attached_to(&self, area: Uuid) -> bool {
        self.attachment.map(|a| a.area == area).unwrap_or(false)
    }
}

/// Re-pins attached labels after a geometry edit.
///
/// A label whose area vanished, or whose anchor no longer sits inside the
/// area, is dropped. Surviving labels get their sub-area index refreshed.
/// Returns descriptions of the dropped labels for reporting.
pub fn resync_labels(labels: &mut Vec<Label>, areas: &[Area], tolerance: f64) -> Result<Vec<String>> {
    let mut dropped = Vec::new();
    let mut keep = Vec::with_capacity(labels.len());
    for mut label in labels.drain(..) {
        let Some(att) = label.attachment else {
            keep.push(label);
            continue;
        };
        let Some(area) = areas.iter().find(|a| a.id == att.area) else {
            dropped.push(format!("label {} lost its area", label.id));
            continue;
        };
        match area.subarea_at(&label.anchor, tolerance)? {
            Some(idx) => {
                if idx != att.subarea {
                    debug!(label = %label.id, from = att.subarea, to = idx, "label re-pinned");
                }
                label.attachment = Some(Attachment {
                    area: att.area,
                    subarea: idx,
                });
                keep.push(label);
            }
            None => {
                dropped.push(format!("label {} fell outside its area", label.id));
            }
        }
    }
    *labels = keep;
    Ok(dropped)
}
