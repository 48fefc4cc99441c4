//! Punching holes through areas.

use tracing::debug;
use uuid::Uuid;

use fieldkit_core::{topology, EditError};
use fieldkit_geom::chaikin;

use crate::error::Result;
use crate::input::Button;
use crate::machines::{close_drawn, report_losses, Ctx};
use crate::picker;

#[derive(Debug, Clone, Copy)]
enum HoleState {
    /// Waiting for a pick on the area to hole.
    Pick,
    /// Waiting for the hole outline.
    Draw { area: Uuid },
}

/// Pick an area, draw a closed hole inside it.
#[derive(Debug)]
pub struct HoleMachine {
    state: HoleState,
}

impl HoleMachine {
    pub fn new() -> Self {
        Self {
            state: HoleState::Pick,
        }
    }

    pub fn reset(&mut self) {
        self.state = HoleState::Pick;
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<bool> {
        loop {
            match self.state {
                HoleState::Pick => {
                    let Some((p, button)) = ctx.input.next_point() else {
                        ctx.presenter.status("pick the area to cut a hole in");
                        return Ok(false);
                    };
                    if button != Button::Primary {
                        ctx.presenter.status("pick with the primary button");
                        continue;
                    }
                    match picker::pick(ctx.set, &p, ctx.cfg)? {
                        Some(pick) => {
                            self.state = HoleState::Draw { area: pick.area };
                            ctx.presenter.status("draw the hole outline");
                        }
                        None => ctx.presenter.status("no area there"),
                    }
                }
                HoleState::Draw { area } => {
                    let Some(curve) = ctx.input.next_curve() else {
                        ctx.presenter.status("draw the hole outline");
                        return Ok(false);
                    };
                    let ring = match close_drawn(&curve, ctx.cfg) {
                        Ok(ring) if ctx.cfg.smoothing_active() => chaikin(&ring, 1),
                        Ok(ring) => ring,
                        Err(e) => {
                            ctx.presenter.status(&format!("hole refused: {e}"));
                            continue;
                        }
                    };
                    // Validate on a working copy before opening the group
                    let source = ctx
                        .set
                        .area(area)
                        .ok_or_else(|| EditError::rejected("picked area vanished"))?;
                    let mut copy = source.clone();
                    if let Err(e) = topology::add_hole(&mut copy, ring) {
                        ctx.presenter.status(&format!("hole refused: {e}"));
                        continue;
                    }
                    ctx.undo.freeze(ctx.set)?;
                    if let Some(live) = ctx.set.area_mut(area) {
                        *live = copy;
                    }
                    let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
                    report_losses(ctx.presenter, dropped);
                    ctx.undo.accept("add hole")?;
                    debug!(area = %area, "hole added");
                    ctx.presenter.status("hole added");
                    self.state = HoleState::Pick;
                    return Ok(true);
                }
            }
        }
    }
}

impl Default for HoleMachine {
    fn default() -> Self {
        Self::new()
    }
}
