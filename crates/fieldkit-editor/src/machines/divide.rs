//! Dividing areas into attributed sub-areas, and rejoining them.
//!
//! One undo group brackets the whole divide: the group opens when the
//! clipped line is applied and closes after both children have their
//! attributes (or when the embedder commits with the inherited ones).
//! Cancelling anywhere in between restores the pre-divide state.

use tracing::info;

use fieldkit_core::{topology, AttributeSet, EditError};
use fieldkit_geom::chaikin;

use crate::error::{rejected, Result};
use crate::input::Button;
use crate::machines::{prepare_drawn, report_losses, Ctx};
use crate::picker::{self, PickTarget};

#[derive(Debug, Clone, Copy)]
enum DivState {
    Pick,
    Draw { area: uuid::Uuid, subarea: usize },
    /// Divide applied under an open undo group; awaiting attributes for
    /// the first child.
    SetFirst { area: uuid::Uuid, child: usize },
    /// Awaiting attributes for the second child.
    SetSecond { area: uuid::Uuid, child: usize },
}

/// The divide/rejoin machine.
#[derive(Debug)]
pub struct DivideMachine {
    state: DivState,
}

impl DivideMachine {
    pub fn new() -> Self {
        Self {
            state: DivState::Pick,
        }
    }

    pub fn reset(&mut self) {
        self.state = DivState::Pick;
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<bool> {
        loop {
            match self.state {
                DivState::Pick => {
                    let Some((p, button)) = ctx.input.next_point() else {
                        ctx.presenter.status("pick the area to divide");
                        return Ok(false);
                    };
                    if button != Button::Primary {
                        ctx.presenter.status("pick with the primary button");
                        continue;
                    }
                    match picker::pick(ctx.set, &p, ctx.cfg)? {
                        Some(pick) => {
                            let subarea = match pick.target {
                                PickTarget::SubArea(i) => i,
                                PickTarget::Boundary => 0,
                                _ => {
                                    ctx.presenter.status("pick inside the area to divide");
                                    continue;
                                }
                            };
                            self.state = DivState::Draw {
                                area: pick.area,
                                subarea,
                            };
                            ctx.presenter.status("draw the dividing line");
                        }
                        None => ctx.presenter.status("no area there"),
                    }
                }
                DivState::Draw { area, subarea } => {
                    let Some(curve) = ctx.input.next_curve() else {
                        ctx.presenter.status("draw the dividing line");
                        return Ok(false);
                    };
                    let drawn = match prepare_drawn(&curve, ctx.cfg) {
                        Ok(line) if ctx.cfg.smoothing_active() => chaikin(&line, 1),
                        Ok(line) => line,
                        Err(e) => {
                            ctx.presenter.status(&format!("line refused: {e}"));
                            continue;
                        }
                    };
                    let source = ctx
                        .set
                        .area(area)
                        .ok_or_else(|| EditError::rejected("picked area vanished"))?;
                    let part = source.partition(ctx.cfg.pick_tolerance)?;
                    let Some(target) = part.subareas.get(subarea) else {
                        self.state = DivState::Pick;
                        continue;
                    };
                    let clipped = match topology::prepare_divide_line(
                        &target.outline,
                        &drawn,
                        ctx.cfg.spline_resolution,
                    ) {
                        Ok(line) => line,
                        Err(e) => {
                            ctx.presenter.status(&format!("line refused: {e}"));
                            continue;
                        }
                    };
                    let mut copy = source.clone();
                    if let Err(e) =
                        topology::divide(&mut copy, subarea, clipped, ctx.cfg.pick_tolerance)
                    {
                        ctx.presenter.status(&format!("divide refused: {e}"));
                        continue;
                    }
                    ctx.undo.freeze(ctx.set)?;
                    if let Some(live) = ctx.set.area_mut(area) {
                        *live = copy;
                    }
                    let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
                    report_losses(ctx.presenter, dropped);
                    self.state = DivState::SetFirst {
                        area,
                        child: subarea,
                    };
                    ctx.presenter
                        .status("set attributes for the first piece, or confirm to inherit");
                }
                DivState::SetFirst { .. } => {
                    ctx.presenter
                        .status("set attributes for the first piece, or confirm to inherit");
                    return Ok(false);
                }
                DivState::SetSecond { .. } => {
                    ctx.presenter
                        .status("set attributes for the second piece, or confirm to inherit");
                    return Ok(false);
                }
            }
        }
    }

    /// Applies the attribute payload to the pending child, advancing the
    /// commit. `None` inherits the parent's attributes.
    pub fn set_attrs(&mut self, ctx: &mut Ctx, attrs: Option<&AttributeSet>) -> Result<bool> {
        match self.state {
            DivState::SetFirst { area, child } => {
                if let Some(attrs) = attrs {
                    apply_child_attrs(ctx, area, child, attrs)?;
                }
                self.state = DivState::SetSecond { area, child };
                ctx.presenter
                    .status("set attributes for the second piece, or confirm to inherit");
                Ok(false)
            }
            DivState::SetSecond { area, child } => {
                if let Some(attrs) = attrs {
                    apply_child_attrs(ctx, area, child + 1, attrs)?;
                }
                ctx.undo.accept("divide area")?;
                info!(area = %area, child, "area divided");
                ctx.presenter.status("area divided");
                self.state = DivState::Pick;
                Ok(true)
            }
            _ => rejected("no divide in progress"),
        }
    }

    /// Removes the most recent dividing line of the picked area.
    ///
    /// Only offered when the picked piece sits beside that line.
    pub fn rejoin(&mut self, ctx: &mut Ctx) -> Result<bool> {
        let DivState::Draw { area, subarea } = self.state else {
            return rejected("pick a piece of a divided area first");
        };
        let source = ctx
            .set
            .area(area)
            .ok_or_else(|| EditError::rejected("picked area vanished"))?;
        let part = source.partition(ctx.cfg.pick_tolerance)?;
        let Some((lo, hi)) = part.last_children else {
            return rejected("area has no dividing lines");
        };
        if subarea != lo && subarea != hi {
            return rejected("picked piece is not beside the last dividing line");
        }
        let mut copy = source.clone();
        topology::rejoin(&mut copy, ctx.cfg.pick_tolerance)?;
        ctx.undo.freeze(ctx.set)?;
        if let Some(live) = ctx.set.area_mut(area) {
            *live = copy;
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("rejoin area")?;
        info!(area = %area, "last divide rejoined");
        ctx.presenter.status("pieces rejoined");
        self.state = DivState::Pick;
        Ok(true)
    }
}

impl Default for DivideMachine {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_child_attrs(
    ctx: &mut Ctx,
    area: uuid::Uuid,
    index: usize,
    attrs: &AttributeSet,
) -> Result<()> {
    let live = ctx
        .set
        .area_mut(area)
        .ok_or_else(|| EditError::rejected("picked area vanished"))?;
    if index >= live.subarea_attributes.len() {
        return rejected("no such piece");
    }
    live.subarea_attributes[index] = attrs.clone();
    Ok(())
}
