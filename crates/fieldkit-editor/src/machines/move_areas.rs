//! Moving, copying, pasting, transforming and restacking picked areas.

use tracing::{debug, info};
use uuid::Uuid;

use fieldkit_geom::{Point, Polyline};

use crate::error::{rejected, Result};
use crate::input::Button;
use crate::machines::{close_drawn, report_losses, Ctx};
use crate::mode::StackMove;
use crate::move_list::{MoveItem, MoveList};
use crate::picker;

#[derive(Debug, Clone, Copy)]
enum MvState {
    /// Toggling picks.
    Pick,
    /// Waiting for an enclosing outline to pick by.
    DrawOutline,
    /// Translation: waiting for the anchor, then the destination.
    Translate { anchor: Option<Point> },
    /// Rotation: centre, then reference point, then destination.
    Rotate {
        centre: Option<Point>,
        reference: Option<Point>,
    },
}

/// The move/copy/paste machine.
#[derive(Debug)]
pub struct MoveMachine {
    state: MvState,
    list: MoveList,
    clipboard: Vec<MoveItem>,
    /// One-time warning latch for label-mode toggles mid-transform.
    pub label_warned: bool,
}

impl MoveMachine {
    pub fn new() -> Self {
        Self {
            state: MvState::Pick,
            list: MoveList::new(),
            clipboard: Vec::new(),
            label_warned: false,
        }
    }

    pub fn picked(&self) -> usize {
        self.list.len()
    }

    /// True when label co-movement may still be toggled.
    pub fn at_pick(&self) -> bool {
        matches!(self.state, MvState::Pick)
    }

    /// Drops in-progress transform state; keeps picks and clipboard.
    pub fn cancel(&mut self) {
        self.state = MvState::Pick;
    }

    /// Drops everything, clipboard included.
    pub fn cancel_all(&mut self) {
        self.state = MvState::Pick;
        self.list.clear();
        self.clipboard.clear();
    }

    pub fn clear_picks(&mut self) {
        self.list.clear();
        self.state = MvState::Pick;
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<bool> {
        loop {
            match self.state {
                MvState::Pick => {
                    let Some((p, button)) = ctx.input.next_point() else {
                        ctx.presenter.status("pick areas to move");
                        return Ok(false);
                    };
                    if button != Button::Primary {
                        ctx.presenter.status("pick with the primary button");
                        continue;
                    }
                    match picker::pick(ctx.set, &p, ctx.cfg)? {
                        Some(pick) => {
                            let added =
                                self.list
                                    .toggle(ctx.set, pick.area, ctx.cfg.move_labels);
                            debug!(area = %pick.area, added, picked = self.list.len(), "pick toggled");
                            ctx.presenter.status(&format!(
                                "{} area(s) picked",
                                self.list.len()
                            ));
                        }
                        None => ctx.presenter.status("no area there"),
                    }
                }
                MvState::DrawOutline => {
                    let Some(curve) = ctx.input.next_curve() else {
                        ctx.presenter.status("draw an outline around the areas to pick");
                        return Ok(false);
                    };
                    match close_drawn(&curve, ctx.cfg) {
                        Ok(outline) => {
                            let added =
                                self.list
                                    .pick_by_outline(ctx.set, &outline, ctx.cfg.move_labels);
                            ctx.presenter
                                .status(&format!("{added} area(s) picked by outline"));
                            self.state = MvState::Pick;
                        }
                        Err(e) => ctx.presenter.status(&format!("outline refused: {e}")),
                    }
                }
                MvState::Translate { anchor } => match anchor {
                    None => {
                        let Some((p, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the reference point");
                            return Ok(false);
                        };
                        self.state = MvState::Translate { anchor: Some(p) };
                    }
                    Some(from) => {
                        let Some((to, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the destination point");
                            return Ok(false);
                        };
                        let (dx, dy) = (to.x - from.x, to.y - from.y);
                        return self.commit_translate(ctx, dx, dy);
                    }
                },
                MvState::Rotate { centre, reference } => match (centre, reference) {
                    (None, _) => {
                        let Some((p, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick the centre of rotation");
                            return Ok(false);
                        };
                        self.state = MvState::Rotate {
                            centre: Some(p),
                            reference: None,
                        };
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
                        self.state = MvState::Rotate {
                            centre: Some(c),
                            reference: Some(p),
                        };
                    }
                    (Some(c), Some(r)) => {
                        let Some((to, _)) = ctx.input.next_point() else {
                            ctx.presenter.status("pick where the reference should land");
                            return Ok(false);
                        };
                        let angle = (to.y - c.y).atan2(to.x - c.x)
                            - (r.y - c.y).atan2(r.x - c.x);
                        return self.commit_rotate(ctx, &c, angle);
                    }
                },
            }
        }
    }

    /// Enters outline-pick mode.
    pub fn draw_outline(&mut self, ctx: &mut Ctx) -> Result<bool> {
        self.state = MvState::DrawOutline;
        self.run(ctx)
    }

    /// Picks by a prepared outline.
    pub fn preset_outline(&mut self, ctx: &mut Ctx, outline: &Polyline) -> Result<bool> {
        if !outline.is_closed() {
            return rejected("preset outline is not closed");
        }
        let added = self
            .list
            .pick_by_outline(ctx.set, outline, ctx.cfg.move_labels);
        ctx.presenter
            .status(&format!("{added} area(s) picked by outline"));
        Ok(false)
    }

    pub fn select_all(&mut self, ctx: &mut Ctx) -> Result<bool> {
        self.list.select_all(ctx.set, ctx.cfg.move_labels);
        ctx.presenter
            .status(&format!("{} area(s) picked", self.list.len()));
        Ok(false)
    }

    /// Starts a translate; the two points may already be queued.
    pub fn translate(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to move");
        }
        self.state = MvState::Translate { anchor: None };
        self.run(ctx)
    }

    /// Starts a rotate; centre, reference and destination may be queued.
    pub fn rotate(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to rotate");
        }
        self.state = MvState::Rotate {
            centre: None,
            reference: None,
        };
        self.run(ctx)
    }

    /// Moves the picked areas (and their labels) into the copy buffer.
    pub fn cut(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to cut");
        }
        ctx.undo.freeze(ctx.set)?;
        let items = std::mem::take(&mut self.list).into_items();
        for item in &items {
            if let Some(id) = item.original {
                ctx.set.remove_area(id);
                ctx.set.labels.retain(|l| !l.is_attached_to(id));
            }
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("cut areas")?;
        info!(count = items.len(), "areas cut to buffer");
        ctx.presenter.status(&format!("{} area(s) cut", items.len()));
        self.clipboard = items;
        self.state = MvState::Pick;
        Ok(true)
    }

    /// Duplicates the picked areas into the copy buffer. No edit results.
    pub fn copy(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to copy");
        }
        self.clipboard = self.list.items().to_vec();
        ctx.presenter
            .status(&format!("{} area(s) copied", self.clipboard.len()));
        Ok(false)
    }

    /// Inserts the copy buffer into the edit set.
    ///
    /// A copy pasted over its own unmoved source is nudged by the
    /// configured offset so the two never coincide exactly.
    pub fn paste(&mut self, ctx: &mut Ctx) -> Result<bool> {
        if self.clipboard.is_empty() {
            return rejected("copy buffer is empty");
        }
        ctx.undo.freeze(ctx.set)?;
        let mut pasted = Vec::new();
        for item in &self.clipboard {
            let mut area = item.copy.clone();
            let over_self = item
                .original
                .and_then(|id| ctx.set.area(id))
                .map(|a| a.boundary == area.boundary)
                .unwrap_or(false);
            if over_self {
                let d = ctx.cfg.paste_offset;
                area.translate(d, -d);
            }
            area.id = Uuid::new_v4();
            for label in &item.labels {
                let mut copy = label.copy.clone();
                copy.id = Uuid::new_v4();
                if over_self {
                    let d = ctx.cfg.paste_offset;
                    copy.anchor.translate(d, -d);
                }
                ctx.set
                    .labels
                    .push(copy.attached_to(area.id, label.copy.attachment.map(|a| a.subarea).unwrap_or(0)));
            }
            pasted.push(area.id);
            ctx.set.insert_area(area, ctx.cfg.stack_mode);
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("paste areas")?;
        info!(count = pasted.len(), "areas pasted");
        ctx.presenter
            .status(&format!("{} area(s) pasted", pasted.len()));
        // The pasted copies become the current picks
        self.list.clear();
        for id in pasted {
            self.list.toggle(ctx.set, id, ctx.cfg.move_labels);
        }
        self.state = MvState::Pick;
        Ok(true)
    }

    /// Reorders the picked areas in the stacking pile.
    pub fn stack(&mut self, ctx: &mut Ctx, dir: StackMove) -> Result<bool> {
        if self.list.is_empty() {
            return rejected("nothing picked to restack");
        }
        ctx.undo.freeze(ctx.set)?;
        let mut moved = false;
        let mut ids: Vec<Uuid> = self
            .list
            .items()
            .iter()
            .filter_map(|i| i.original)
            .collect();
        ctx.set.in_stacking_order(&mut ids);
        for id in ids {
            moved |= match dir {
                StackMove::Up => ctx.set.restack(id, true).is_some(),
                StackMove::Down => ctx.set.restack(id, false).is_some(),
                StackMove::Top => {
                    let mut any = false;
                    while ctx.set.restack(id, true).is_some() {
                        any = true;
                    }
                    any
                }
                StackMove::Bottom => {
                    let mut any = false;
                    while ctx.set.restack(id, false).is_some() {
                        any = true;
                    }
                    any
                }
            };
        }
        if moved {
            ctx.undo.accept("restack areas")?;
            ctx.presenter.status("stacking order changed");
            Ok(true)
        } else {
            ctx.undo.reject(ctx.set)?;
            ctx.presenter.status("already at the limit");
            Ok(false)
        }
    }

    fn commit_translate(&mut self, ctx: &mut Ctx, dx: f64, dy: f64) -> Result<bool> {
        ctx.undo.freeze(ctx.set)?;
        for item in self.list.items() {
            let Some(id) = item.original else { continue };
            if let Some(area) = ctx.set.area_mut(id) {
                area.translate(dx, dy);
            }
            for label in &item.labels {
                if let Some(live) = ctx.set.labels.iter_mut().find(|l| l.id == label.original) {
                    live.anchor.translate(dx, dy);
                }
            }
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("move areas")?;
        self.list.translate(dx, dy);
        info!(dx, dy, count = self.list.len(), "areas moved");
        ctx.presenter.status("areas moved");
        self.state = MvState::Pick;
        Ok(true)
    }

    fn commit_rotate(&mut self, ctx: &mut Ctx, centre: &Point, angle: f64) -> Result<bool> {
        ctx.undo.freeze(ctx.set)?;
        for item in self.list.items() {
            let Some(id) = item.original else { continue };
            if let Some(area) = ctx.set.area_mut(id) {
                area.rotate_about(centre, angle);
            }
            for label in &item.labels {
                if let Some(live) = ctx.set.labels.iter_mut().find(|l| l.id == label.original) {
                    live.anchor.rotate_about(centre, angle);
                }
            }
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("rotate areas")?;
        self.list.rotate_about(centre, angle);
        info!(angle, count = self.list.len(), "areas rotated");
        ctx.presenter.status("areas rotated");
        self.state = MvState::Pick;
        Ok(true)
    }
}

impl Default for MoveMachine {
    fn default() -> Self {
        Self::new()
    }
}
