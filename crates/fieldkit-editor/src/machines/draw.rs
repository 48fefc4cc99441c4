//! Drawing new areas.

use tracing::debug;

use fieldkit_core::{Area, AttributeSet};
use fieldkit_geom::{chaikin, Polyline};

use crate::error::Result;
use crate::machines::{close_drawn, Ctx};

/// Draws closed outlines and registers them as new areas.
///
/// Stays active after each commit so the user can keep drawing.
#[derive(Debug)]
pub struct DrawMachine {
    /// Attributes stamped onto each new area.
    pub attrs: AttributeSet,
}

impl DrawMachine {
    pub fn new(attrs: AttributeSet) -> Self {
        Self { attrs }
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<bool> {
        loop {
            let Some(curve) = ctx.input.next_curve() else {
                ctx.presenter.status("draw the outline of the new area");
                return Ok(false);
            };
            let ring = match close_drawn(&curve, ctx.cfg) {
                Ok(ring) => ring,
                Err(e) => {
                    ctx.presenter.status(&format!("outline refused: {e}"));
                    continue;
                }
            };
            return self.place(ctx, ring);
        }
    }

    /// Registers a prepared ring as a new area (also the preset-outline
    /// path).
    pub fn place(&self, ctx: &mut Ctx, ring: Polyline) -> Result<bool> {
        let ring = if ctx.cfg.smoothing_active() {
            chaikin(&ring, 1)
        } else {
            ring
        };
        let area = Area::new(ring, self.attrs.clone())?;
        let id = area.id;
        ctx.undo.freeze(ctx.set)?;
        let pos = ctx.set.insert_area(area, ctx.cfg.stack_mode);
        ctx.undo.accept("draw area")?;
        debug!(area = %id, stack = pos, "new area drawn");
        ctx.presenter.status("area drawn");
        Ok(true)
    }
}
