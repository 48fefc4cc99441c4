//! Merging areas in from another field.
//!
//! Fetched candidates are shown read-only; nothing touches the edit set
//! until the merge commits. Cancelling anywhere leaves the edit set
//! untouched.

use tracing::info;
use uuid::Uuid;

use fieldkit_core::EditSet;
use fieldkit_geom::Point;

use crate::error::{rejected, Result};
use crate::field_store::{FieldDescriptor, FieldStore};
use crate::input::Button;
use crate::machines::{report_losses, Ctx};
use crate::move_list::{MoveItem, MoveList};
use crate::picker;

#[derive(Debug)]
enum MergeState {
    /// Nothing fetched yet.
    Wait,
    /// Candidates on display; toggling picks against the fetched set.
    Pick,
    /// Committing with a translation; two points wanted.
    Translate { items: Vec<MoveItem>, anchor: Option<Point> },
    /// Committing with a rotation; three points wanted.
    Rotate {
        items: Vec<MoveItem>,
        centre: Option<Point>,
        reference: Option<Point>,
    },
}

/// The merge machine.
#[derive(Debug)]
pub struct MergeMachine {
    state: MergeState,
    fetched: Option<EditSet>,
    list: MoveList,
}

impl MergeMachine {
    pub fn new() -> Self {
        Self {
            state: MergeState::Wait,
            fetched: None,
            list: MoveList::new(),
        }
    }

    /// Drops picks and any in-progress transform; keeps the fetched set.
    pub fn cancel(&mut self) {
        self.list.clear();
        if !matches!(self.state, MergeState::Wait) {
            self.state = MergeState::Pick;
        }
    }

    /// Drops everything, fetched set included.
    pub fn cancel_all(&mut self) {
        self.list.clear();
        self.fetched = None;
        self.state = MergeState::Wait;
    }

    pub fn clear_picks(&mut self) {
        self.list.clear();
    }

    /// Loads a candidate set from the store.
    ///
    /// Refused while earlier picks are still unresolved; resolve them by
    /// merging or clearing first.
    pub fn fetch(
        &mut self,
        ctx: &mut Ctx,
        store: &dyn FieldStore,
        desc: &FieldDescriptor,
    ) -> Result<bool> {
        if !self.list.is_empty() {
            return rejected("resolve the current picks before fetching again");
        }
        let fetched = store.fetch(desc)?;
        ctx.presenter.status(&format!(
            "{} candidate area(s) fetched from {}",
            fetched.len(),
            desc.source
        ));
        self.fetched = Some(fetched);
        self.state = MergeState::Pick;
        Ok(false)
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<bool> {
        loop {
            match &mut self.state {
                MergeState::Wait => {
                    ctx.presenter.status("fetch a field to merge from");
                    return Ok(false);
                }
                MergeState::Pick => {
                    let Some((p, button)) = ctx.input.next_point() else {
                        ctx.presenter.status("pick candidate areas to merge");
                        return Ok(false);
                    };
                    if button != Button::Primary {
                        ctx.presenter.status("pick with the primary button");
                        continue;
                    }
                    let Some(fetched) = self.fetched.as_ref() else {
                        self.state = MergeState::Wait;
                        continue;
                    };
                    match picker::pick(fetched, &p, ctx.cfg)? {
                        Some(pick) => {
                            self.list.toggle(fetched, pick.area, ctx.cfg.move_labels);
                            ctx.presenter.status(&format!(
                                "{} candidate(s) picked",
                                self.list.len()
                            ));
                        }
                        None => ctx.presenter.status("no candidate there"),
                    }
                }
                MergeState::Translate { items, anchor } => match anchor {
                    None => {
                        let Some((p, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the reference point");
                            return Ok(false);
                        };
                        *anchor = Some(p);
                    }
                    Some(from) => {
                        let Some((to, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the destination point");
                            return Ok(false);
                        };
                        let (dx, dy) = (to.x - from.x, to.y - from.y);
                        let mut items = std::mem::take(items);
                        for item in &mut items {
                            item.copy.translate(dx, dy);
                            for label in &mut item.labels {
                                label.copy.anchor.translate(dx, dy);
                            }
                        }
                        return self.commit(ctx, items);
                    }
                },
                MergeState::Rotate {
                    items,
                    centre,
                    reference,
                } => match (*centre, *reference) {
                    (None, _) => {
                        let Some((p, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the centre of rotation");
                            return Ok(false);
                        };
                        *centre = Some(p);
                    }
                    (Some(c), None) => {
                        let Some((p, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the reference point");
                            return Ok(false);
                        };
                        if p.coincident(&c, ctx.cfg.pick_tolerance) {
                            ctx.presenter.status("reference too close to the centre");
                            continue;
                        }
                        *reference = Some(p);
                    }
                    (Some(c), Some(r)) => {
                        let Some((to, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick where the reference should land");
                            return Ok(false);
                        };
                        let angle =
                            (to.y - c.y).atan2(to.x - c.x) - (r.y - c.y).atan2(r.x - c.x);
                        let mut items = std::mem::take(items);
                        for item in &mut items {
                            item.copy.rotate_about(&c, angle);
                            for label in &mut item.labels {
                                label.copy.anchor.rotate_about(&c, angle);
                            }
                        }
                        return self.commit(ctx, items);
                    }
                },
            }
        }
    }

    /// Commits the picked candidates in place.
    pub fn merge_now(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to merge");
        }
        let items = std::mem::take(&mut self.list).into_items();
        self.commit(ctx, items)
    }

    /// Commits with a translation; the points may already be queued.
    pub fn translate(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to merge");
        }
        let items = std::mem::take(&mut self.list).into_items();
        self.state = MergeState::Translate {
            items,
            anchor: None,
        };
        self.run(ctx)
    }

    /// Commits with a rotation; the points may already be queued.
    pub fn rotate(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to merge");
        }
        let items = std::mem::take(&mut self.list).into_items();
        self.state = MergeState::Rotate {
            items,
            centre: None,
            reference: None,
        };
        self.run(ctx)
    }

    fn commit(&mut self, ctx: &mut Ctx, items: Vec<MoveItem>) -> Result<bool> {
        ctx.undo.freeze(ctx.set)?;
        let mut count = 0;
        for item in items {
            let mut area = item.copy;
            area.id = Uuid::new_v4();
            for label in item.labels {
                let mut copy = label.copy;
                copy.id = Uuid::new_v4();
                let subarea = copy.attachment.map(|a| a.subarea).unwrap_or(0);
                ctx.set.labels.push(copy.attached_to(area.id, subarea));
            }
            ctx.set.insert_area(area, ctx.cfg.stack_mode);
            count += 1;
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("merge areas")?;
        info!(count, "candidate areas merged in");
        ctx.presenter.status(&format!("{count} area(s) merged in"));
        // Stay on the fetched set for further merging
        self.state = MergeState::Pick;
        Ok(true)
    }
}

impl Default for MergeMachine {
    fn default() -> Self {
        Self::new()
    }
}
