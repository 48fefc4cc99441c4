//! The working collection of areas and labels, in stacking order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fieldkit_geom::{Bounds, Point};

use crate::area::Area;
use crate::config::StackMode;
use crate::label::Label;

/// Everything the editor is currently working on.
///
/// Areas are kept in stacking order: index 0 draws on top, the last entry
/// sits at the bottom of the pile. Picks scan from the top down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditSet {
    areas: Vec<Area>,
    pub labels: Vec<Label>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Inserts an area per the stacking mode and returns its position.
    pub fn insert_area(&mut self, area: Area, mode: StackMode) -> usize {
        match mode {
            StackMode::Top => {
                self.areas.insert(0, area);
                0
            }
            StackMode::Bottom => {
                self.areas.push(area);
                self.areas.len() - 1
            }
        }
    }

    pub fn remove_area(&mut self, id: Uuid) -> Option<Area> {
        let idx = self.position(id)?;
        Some(self.areas.remove(idx))
    }

    pub fn area(&self, id: Uuid) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn area_mut(&mut self, id: Uuid) -> Option<&mut Area> {
        self.areas.iter_mut().find(|a| a.id == id)
    }

    /// Stacking position of an area; 0 is the top of the pile.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.areas.iter().position(|a| a.id == id)
    }

    /// Areas under `p`, topmost first.
    pub fn areas_at<'a>(&'a self, p: &'a Point) -> impl Iterator<Item = &'a Area> + 'a {
        self.areas.iter().filter(move |a| a.contains(p))
    }

    /// The topmost area under `p`, if any.
    pub fn top_area_at<'a>(&'a self, p: &'a Point) -> Option<&'a Area> {
        self.areas_at(p).next()
    }

    /// Moves the area one slot toward the top (or bottom) of the pile.
    /// Returns the new position, or `None` when it cannot move further.
    pub fn restack(&mut self, id: Uuid, toward_top: bool) -> Option<usize> {
        let idx = self.position(id)?;
        let target = if toward_top {
            idx.checked_sub(1)?
        } else {
            if idx + 1 >= self.areas.len() {
                return None;
            }
            idx + 1
        };
        self.areas.swap(idx, target);
        Some(target)
    }

    /// Indexes of labels riding with the given area.
    pub fn labels_of(&self, area: Uuid) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_attached_to(area))
            .map(|(i, _)| i)
            .collect()
    }

    /// Extent of the whole set.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for a in &self.areas {
            b = b.union(&a.bounds());
        }
        for l in &self.labels {
            b.extend(&l.anchor);
        }
        b
    }

    /// Re-pins attached labels after a geometry edit; see
    /// [`crate::label::resync_labels`].
    pub fn resync_labels(&mut self, tolerance: f64) -> crate::error::Result<Vec<String>> {
        crate::label::resync_labels(&mut self.labels, &self.areas, tolerance)
    }

    /// Sorts a pick list into stacking order, topmost first, dropping
    /// duplicates and unknown ids.
    pub fn in_stacking_order(&self, ids: &mut Vec<Uuid>) {
        ids.retain(|id| self.position(*id).is_some());
        ids.sort_by_key(|id| self.position(*id).unwrap_or(usize::MAX));
        ids.dedup();
    }
}
