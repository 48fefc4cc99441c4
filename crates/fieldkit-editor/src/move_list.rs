//! The pick list for move and merge: working copies of picked areas and
//! the labels riding with them.

use smallvec::SmallVec;
use uuid::Uuid;

use fieldkit_core::{Area, EditSet, Label};
use fieldkit_geom::{Point, Polyline};

/// Working copy of a label picked along with its area.
#[derive(Debug, Clone)]
pub struct LabelItem {
    /// Identity of the label in the edit set.
    pub original: Uuid,
    pub copy: Label,
}

/// Working copy of one picked area.
#[derive(Debug, Clone)]
pub struct MoveItem {
    /// Identity of the area in the edit set; `None` for merge candidates
    /// that do not live in the edit set yet.
    pub original: Option<Uuid>,
    pub copy: Area,
    pub labels: SmallVec<[LabelItem; 2]>,
}

/// Ordered list of picked areas, kept in stacking order.
#[derive(Debug, Clone, Default)]
pub struct MoveList {
    items: Vec<MoveItem>,
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[MoveItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<MoveItem> {
        self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, area: Uuid) -> bool {
        self.items.iter().any(|i| i.original == Some(area))
    }

    /// Adds or removes the area; returns true when it was added.
    ///
    /// Labels attached to the area ride along when `with_labels` is set.
    /// Inserts keep the list in stacking order.
    pub fn toggle(&mut self, set: &EditSet, area: Uuid, with_labels: bool) -> bool {
        if let Some(pos) = self.items.iter().position(|i| i.original == Some(area)) {
            self.items.remove(pos);
            return false;
        }
        let Some(source) = set.area(area) else {
            return false;
        };
        let labels = if with_labels {
            set.labels_of(area)
                .into_iter()
                .map(|i| LabelItem {
                    original: set.labels[i].id,
                    copy: set.labels[i].clone(),
                })
                .collect()
        } else {
            SmallVec::new()
        };
        let item = MoveItem {
            original: Some(area),
            copy: source.clone(),
            labels,
        };
        let at = self
            .items
            .iter()
            .position(|i| {
                let a = i.original.and_then(|id| set.position(id)).unwrap_or(usize::MAX);
                let b = set.position(area).unwrap_or(usize::MAX);
                a > b
            })
            .unwrap_or(self.items.len());
        self.items.insert(at, item);
        true
    }

    /// Picks every area in the set, in stacking order.
    pub fn select_all(&mut self, set: &EditSet, with_labels: bool) {
        self.items.clear();
        let ids: Vec<Uuid> = set.areas().iter().map(|a| a.id).collect();
        for id in ids {
            self.toggle(set, id, with_labels);
        }
    }

    /// Picks every area whose interior lies within the drawn outline.
    pub fn pick_by_outline(&mut self, set: &EditSet, outline: &Polyline, with_labels: bool) -> usize {
        let mut added = 0;
        for area in set.areas() {
            if self.contains(area.id) {
                continue;
            }
            let enclosed = outline.bounds().encloses(&area.bounds())
                && area
                    .interior_point()
                    .map(|p| outline.contains(&p))
                    .unwrap_or(false);
            if enclosed && self.toggle(set, area.id, with_labels) {
                added += 1;
            }
        }
        added
    }

    /// Rigid translation of every working copy.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for item in &mut self.items {
            item.copy.translate(dx, dy);
            for label in &mut item.labels {
                label.copy.anchor.translate(dx, dy);
            }
        }
    }

    /// Rigid rotation of every working copy.
    pub fn rotate_about(&mut self, centre: &Point, angle: f64) {
        for item in &mut self.items {
            item.copy.rotate_about(centre, angle);
            for label in &mut item.labels {
                label.copy.anchor.rotate_about(centre, angle);
            }
        }
    }
}
