//! The verb state machines.
//!
//! Each machine owns its working state and advances inside `run` until it
//! either registers an edit (`Ok(true)`), runs out of queued input and
//! parks (`Ok(false)`), or refuses the input. All edit-set mutation happens
//! between `Ctx::undo.freeze` and `accept`/`reject`.

pub mod divide;
pub mod draw;
pub mod hole;
pub mod merge;
pub mod modify;
pub mod move_areas;

use tracing::warn;

use fieldkit_core::{EditError, EditorConfig, EditSet};
use fieldkit_geom::{chaikin, first_self_crossing, GeometryError, Polyline};

use crate::error::Result;
use crate::input::InputSource;
use crate::presenter::Presenter;
use crate::undo::UndoLedger;

/// Everything a machine touches while running.
pub(crate) struct Ctx<'a> {
    pub set: &'a mut EditSet,
    pub cfg: &'a EditorConfig,
    pub undo: &'a mut UndoLedger,
    pub input: &'a mut dyn InputSource,
    pub presenter: &'a mut dyn Presenter,
}

/// Surfaces structure silently dropped by an edit (stranded dividing
/// lines, orphaned holes, unpinned labels) as topology-loss notices.
pub(crate) fn report_losses(presenter: &mut dyn Presenter, dropped: Vec<String>) {
    for what in dropped {
        let notice = EditError::TopologyLoss { what };
        warn!(%notice);
        presenter.warn(&notice.to_string());
    }
}

/// Cleans up a freshly drawn curve: dedupe, length check, self-crossing
/// repair.
///
/// A self-crossing curve is truncated at its first crossing from both ends
/// and rejoined there; the repair is smoothed when the smoothing factor is
/// active. Repeats until the curve is simple.
pub(crate) fn prepare_drawn(curve: &Polyline, cfg: &EditorConfig) -> Result<Polyline> {
    let mut line = curve.clone();
    line.condense(fieldkit_geom::EPSILON * 10.0);
    if line.is_too_short(cfg.spline_resolution) {
        return Err(GeometryError::TooShort {
            length: line.arc_length(),
            minimum: cfg.spline_resolution,
        }
        .into());
    }
    while let Some(x) = first_self_crossing(&line) {
        let pts = line.points();
        let mut repaired = Polyline::new();
        repaired.append_portion(&line, 0, x.span_a);
        repaired.push(x.point);
        repaired.append_portion(&line, x.span_b + 1, pts.len() - 1);
        repaired.condense(fieldkit_geom::EPSILON * 10.0);
        if cfg.smoothing_active() {
            repaired = chaikin(&repaired, 1);
        }
        if repaired.len() >= line.len() || repaired.len() < 2 {
            return Err(GeometryError::DegenerateRing {
                points: repaired.len(),
            }
            .into());
        }
        line = repaired;
    }
    if line.is_too_short(cfg.spline_resolution) {
        return Err(GeometryError::TooShort {
            length: line.arc_length(),
            minimum: cfg.spline_resolution,
        }
        .into());
    }
    Ok(line)
}

/// Prepares a drawn curve and closes it into a ring.
pub(crate) fn close_drawn(curve: &Polyline, cfg: &EditorConfig) -> Result<Polyline> {
    let mut ring = prepare_drawn(curve, cfg)?;
    ring.close();
    if ring.len() < 4 {
        return Err(GeometryError::DegenerateRing { points: ring.len() }.into());
    }
    Ok(ring)
}
