//! Reshaping boundaries, holes and dividing lines, plus the pick-and-act
//! operations that share its pick state (set attributes, delete, delete
//! hole).
//!
//! The curve-replacement flow: pick a target curve, draw an open segment,
//! reconnect its endpoints to the original, split the original into two
//! complementary pieces, join each with the segment, keep one candidate.
//! The default keep is the candidate built from the piece farther from the
//! drawn segment's midpoint; a pick nearest the other candidate overrides,
//! and a pick nearest the segment itself re-selects the unmodified
//! original.

use tracing::{debug, info};

use fieldkit_core::{topology, AttributeSet, EditError};
use fieldkit_geom::{
    join_ring_candidate, replace_open_span, resolve_reconnection, smooth_join, split_ring, Point,
    Polyline,
};

use crate::error::{rejected, Result};
use crate::input::Button;
use crate::machines::{prepare_drawn, report_losses, Ctx};
use crate::mode::StackMove;
use crate::picker::{self, PickResult, PickTarget};

#[derive(Debug)]
enum ModState {
    Pick,
    Draw {
        pick: PickResult,
        original: Polyline,
    },
    Discard {
        pick: PickResult,
        segment: Polyline,
        piece_a: Polyline,
        piece_b: Polyline,
        cand_a: Polyline,
        cand_b: Polyline,
        keep_a: bool,
    },
}

/// The modify machine.
#[derive(Debug)]
pub struct ModifyMachine {
    state: ModState,
}

impl ModifyMachine {
    pub fn new() -> Self {
        Self {
            state: ModState::Pick,
        }
    }

    pub fn reset(&mut self) {
        self.state = ModState::Pick;
    }

    pub fn run(&mut self, ctx: &mut Ctx) -> Result<bool> {
        loop {
            match &self.state {
                ModState::Pick => {
                    let Some((p, button)) = ctx.input.next_point() else {
                        ctx.presenter.status("pick the boundary, hole or line to reshape");
                        return Ok(false);
                    };
                    if button != Button::Primary {
                        ctx.presenter.status("pick with the primary button");
                        continue;
                    }
                    let Some(pick) = picker::pick(ctx.set, &p, ctx.cfg)? else {
                        ctx.presenter.status("nothing there");
                        continue;
                    };
                    let Some(original) = target_curve(ctx, &pick)? else {
                        ctx.presenter.status("pick a boundary, hole or dividing line");
                        continue;
                    };
                    ctx.presenter.preview(&original);
                    ctx.presenter.status("draw the replacement segment");
                    self.state = ModState::Draw { pick, original };
                }
                ModState::Draw { pick, original } => {
                    let Some(curve) = ctx.input.next_curve() else {
                        ctx.presenter.status("draw the replacement segment");
                        return Ok(false);
                    };
                    let segment = match prepare_drawn(&curve, ctx.cfg) {
                        Ok(seg) => seg,
                        Err(e) => {
                            ctx.presenter.status(&format!("segment refused: {e}"));
                            continue;
                        }
                    };
                    let pick = *pick;
                    let original = original.clone();
                    if let PickTarget::DivideLine(index) = pick.target {
                        // A dividing line has one valid replacement; no
                        // discard step
                        match self.replace_divline(ctx, &pick, index, &original, &segment)? {
                            Some(done) => return Ok(done),
                            None => continue,
                        }
                    }
                    match build_candidates(&original, &segment, ctx) {
                        Ok(built) => {
                            ctx.presenter.preview(&built.cand_a);
                            ctx.presenter.preview(&built.cand_b);
                            ctx.presenter
                                .status("pick the piece to keep, or confirm the highlighted one");
                            self.state = ModState::Discard {
                                pick,
                                segment,
                                piece_a: built.piece_a,
                                piece_b: built.piece_b,
                                cand_a: built.cand_a,
                                cand_b: built.cand_b,
                                keep_a: built.keep_a,
                            };
                        }
                        Err(e) => {
                            ctx.presenter.status(&format!("segment refused: {e}"));
                        }
                    }
                }
                ModState::Discard {
                    pick,
                    segment,
                    piece_a,
                    piece_b,
                    cand_a,
                    cand_b,
                    ..
                } => {
                    let Some((p, _button)) = ctx.input.next_point() else {
                        ctx.presenter
                            .status("pick the piece to keep, or confirm the highlighted one");
                        return Ok(false);
                    };
                    // Distances against the donor pieces, not the joined
                    // candidates; both candidates share the drawn segment
                    let d_seg = distance_to(segment, &p);
                    let d_a = distance_to(piece_a, &p);
                    let d_b = distance_to(piece_b, &p);
                    if d_seg < d_a && d_seg < d_b {
                        // Nearest the drawn segment: keep the unmodified
                        // original
                        info!("modification discarded; original kept");
                        ctx.presenter.status("modification discarded");
                        ctx.presenter.clear();
                        self.state = ModState::Pick;
                        continue;
                    }
                    let keep = if d_a <= d_b { cand_a } else { cand_b }.clone();
                    let pick = *pick;
                    return self.commit_keep(ctx, &pick, keep);
                }
            }
        }
    }

    /// Confirms the default candidate while waiting in the discard step.
    pub fn confirm(&mut self, ctx: &mut Ctx) -> Result<bool> {
        let ModState::Discard {
            pick,
            cand_a,
            cand_b,
            keep_a,
            ..
        } = &self.state
        else {
            return rejected("nothing to confirm");
        };
        let keep = if *keep_a { cand_a } else { cand_b }.clone();
        let pick = *pick;
        self.commit_keep(ctx, &pick, keep)
    }

    /// Applies the attribute payload to the picked sub-area.
    pub fn set_attributes(&mut self, ctx: &mut Ctx, attrs: &AttributeSet) -> Result<bool> {
        let Some((p, _)) = ctx.input.next_point() else {
            ctx.presenter.status("pick the piece to relabel");
            return Ok(false);
        };
        let Some(pick) = picker::pick(ctx.set, &p, ctx.cfg)? else {
            return rejected("nothing there");
        };
        let index = match pick.target {
            PickTarget::SubArea(i) => i,
            PickTarget::Boundary => 0,
            _ => return rejected("pick inside the area to relabel"),
        };
        ctx.undo.freeze(ctx.set)?;
        let applied = match ctx.set.area_mut(pick.area) {
            Some(area) if index < area.subarea_attributes.len() => {
                area.subarea_attributes[index] = attrs.clone();
                true
            }
            _ => false,
        };
        if !applied {
            ctx.undo.reject(ctx.set)?;
            return rejected("no such piece");
        }
        ctx.undo.accept("set attributes")?;
        ctx.presenter.status("attributes set");
        Ok(true)
    }

    /// Deletes the picked area.
    pub fn delete(&mut self, ctx: &mut Ctx) -> Result<bool> {
        let Some((p, _)) = ctx.input.next_point() else {
            ctx.presenter.status("pick the area to delete");
            return Ok(false);
        };
        let Some(pick) = picker::pick(ctx.set, &p, ctx.cfg)? else {
            return rejected("nothing there");
        };
        ctx.undo.freeze(ctx.set)?;
        ctx.set.remove_area(pick.area);
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("delete area")?;
        info!(area = %pick.area, "area deleted");
        ctx.presenter.status("area deleted");
        self.state = ModState::Pick;
        Ok(true)
    }

    /// Deletes the picked hole.
    pub fn delete_hole(&mut self, ctx: &mut Ctx) -> Result<bool> {
        let Some((p, _)) = ctx.input.next_point() else {
            ctx.presenter.status("pick the hole to remove");
            return Ok(false);
        };
        let Some(pick) = picker::pick(ctx.set, &p, ctx.cfg)? else {
            return rejected("nothing there");
        };
        let PickTarget::Hole(index) = pick.target else {
            return rejected("that is not a hole");
        };
        ctx.undo.freeze(ctx.set)?;
        let area = ctx
            .set
            .area_mut(pick.area)
            .ok_or_else(|| EditError::rejected("picked area vanished"))?;
        match topology::remove_hole(area, index) {
            Ok(_) => {
                let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
                report_losses(ctx.presenter, dropped);
                ctx.undo.accept("delete hole")?;
                ctx.presenter.status("hole removed");
                self.state = ModState::Pick;
                Ok(true)
            }
            Err(e) => {
                ctx.undo.reject(ctx.set)?;
                Err(e.into())
            }
        }
    }

    /// Restacks the picked area in the pile.
    pub fn stack(&mut self, ctx: &mut Ctx, dir: StackMove) -> Result<bool> {
        let Some((p, _)) = ctx.input.next_point() else {
            ctx.presenter.status("pick the area to restack");
            return Ok(false);
        };
        let Some(pick) = picker::pick(ctx.set, &p, ctx.cfg)? else {
            return rejected("nothing there");
        };
        ctx.undo.freeze(ctx.set)?;
        let moved = match dir {
            StackMove::Up => ctx.set.restack(pick.area, true).is_some(),
            StackMove::Down => ctx.set.restack(pick.area, false).is_some(),
            StackMove::Top => {
                let mut any = false;
                while ctx.set.restack(pick.area, true).is_some() {
                    any = true;
                }
                any
            }
            StackMove::Bottom => {
                let mut any = false;
                while ctx.set.restack(pick.area, false).is_some() {
                    any = true;
                }
                any
            }
        };
        self.state = ModState::Pick;
        if moved {
            ctx.undo.accept("restack area")?;
            ctx.presenter.status("stacking order changed");
            Ok(true)
        } else {
            ctx.undo.reject(ctx.set)?;
            ctx.presenter.status("already at the limit");
            Ok(false)
        }
    }

    fn replace_divline(
        &mut self,
        ctx: &mut Ctx,
        pick: &PickResult,
        index: usize,
        original: &Polyline,
        segment: &Polyline,
    ) -> Result<Option<bool>> {
        let replacement = match replace_open_span(original, segment) {
            Ok(line) => line,
            Err(e) => {
                ctx.presenter.status(&format!("segment refused: {e}"));
                return Ok(None);
            }
        };
        let source = ctx
            .set
            .area(pick.area)
            .ok_or_else(|| EditError::rejected("picked area vanished"))?;
        let mut copy = source.clone();
        if let Err(e) =
            topology::replace_divide_line(&mut copy, index, replacement, ctx.cfg.pick_tolerance)
        {
            ctx.presenter
                .status(&format!("replacement leaves the divided area: {e}"));
            return Ok(None);
        }
        ctx.undo.freeze(ctx.set)?;
        if let Some(live) = ctx.set.area_mut(pick.area) {
            *live = copy;
        }
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept("modify divide line")?;
        debug!(area = %pick.area, line = index, "dividing line reshaped");
        ctx.presenter.status("dividing line reshaped");
        self.state = ModState::Pick;
        Ok(Some(true))
    }

    fn commit_keep(&mut self, ctx: &mut Ctx, pick: &PickResult, keep: Polyline) -> Result<bool> {
        let source = ctx
            .set
            .area(pick.area)
            .ok_or_else(|| EditError::rejected("picked area vanished"))?;
        let mut copy = source.clone();
        let collapsed = keep.area() < ctx.cfg.spline_resolution * ctx.cfg.spline_resolution;
        let tag;
        let mut warnings = Vec::new();
        match pick.target {
            PickTarget::Hole(index) => {
                if collapsed {
                    // The hole shrank to nothing: remove it
                    ctx.undo.freeze(ctx.set)?;
                    let area = ctx
                        .set
                        .area_mut(pick.area)
                        .ok_or_else(|| EditError::rejected("picked area vanished"))?;
                    match topology::remove_hole(area, index) {
                        Ok(hole) => {
                            report_losses(
                                ctx.presenter,
                                vec![format!("hole {} collapsed and was removed", hole.id)],
                            );
                            let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
                            report_losses(ctx.presenter, dropped);
                            ctx.undo.accept("delete hole")?;
                            self.state = ModState::Pick;
                            return Ok(true);
                        }
                        Err(e) => {
                            ctx.undo.reject(ctx.set)?;
                            return Err(e.into());
                        }
                    }
                }
                if let Err(e) = topology::replace_hole(&mut copy, index, keep) {
                    ctx.presenter.status(&format!("replacement refused: {e}"));
                    self.state = ModState::Pick;
                    return Ok(false);
                }
                tag = "modify hole";
            }
            _ => {
                if collapsed {
                    // Boundary collapsed: the area goes with it
                    ctx.undo.freeze(ctx.set)?;
                    ctx.set.remove_area(pick.area);
                    let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
                    report_losses(ctx.presenter, dropped);
                    ctx.undo.accept("delete area")?;
                    ctx.presenter.warn("area collapsed and was removed");
                    self.state = ModState::Pick;
                    return Ok(true);
                }
                warnings = topology::replace_boundary(&mut copy, keep, ctx.cfg.pick_tolerance)?;
                tag = "modify boundary";
            }
        }
        ctx.undo.freeze(ctx.set)?;
        if let Some(live) = ctx.set.area_mut(pick.area) {
            *live = copy;
        }
        report_losses(ctx.presenter, warnings);
        let dropped = ctx.set.resync_labels(ctx.cfg.pick_tolerance)?;
        report_losses(ctx.presenter, dropped);
        ctx.undo.accept(tag)?;
        info!(area = %pick.area, tag, "curve replaced");
        ctx.presenter.status("done");
        ctx.presenter.clear();
        self.state = ModState::Pick;
        Ok(true)
    }
}

impl Default for ModifyMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the curve a pick refers to. `None` means the pick was usable
/// for other verbs but not for reshaping; a status line explains it.
fn target_curve(ctx: &Ctx, pick: &PickResult) -> Result<Option<Polyline>> {
    let area = ctx
        .set
        .area(pick.area)
        .ok_or_else(|| EditError::rejected("picked area vanished"))?;
    let curve = match pick.target {
        PickTarget::Boundary | PickTarget::SubArea(_) => area.boundary.clone(),
        PickTarget::Hole(i) => match area.holes.get(i) {
            Some(h) => h.ring.clone(),
            None => return Ok(None),
        },
        PickTarget::DivideLine(i) => match area.divide_lines.get(i) {
            Some(d) => d.line.clone(),
            None => return Ok(None),
        },
    };
    Ok(Some(curve))
}

struct Candidates {
    piece_a: Polyline,
    piece_b: Polyline,
    cand_a: Polyline,
    cand_b: Polyline,
    keep_a: bool,
}

/// Builds the two candidate rings and the default keep flag.
fn build_candidates(
    original: &Polyline,
    segment: &Polyline,
    ctx: &Ctx,
) -> fieldkit_geom::Result<Candidates> {
    let vertex_tol = ctx.cfg.pick_tolerance;
    let junction_tol = ctx.cfg.spline_resolution;
    let (first, last) = match (segment.first(), segment.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(fieldkit_geom::GeometryError::Empty),
    };
    let start = resolve_reconnection(original, first, vertex_tol, junction_tol)
        .ok_or(fieldkit_geom::GeometryError::Empty)?;
    let end = resolve_reconnection(original, last, vertex_tol, junction_tol)
        .ok_or(fieldkit_geom::GeometryError::Empty)?;
    let pieces = split_ring(original, &start, &end)?;

    let cand_a = candidate(segment, &pieces.piece_a, &start, &end, ctx)?;
    let cand_b = candidate(segment, &pieces.piece_b, &start, &end, ctx)?;

    // Default keep: the candidate whose donor piece is farther from the
    // drawn segment's midpoint
    let mid = segment
        .mid_vertex()
        .copied()
        .unwrap_or_else(|| start.point.midpoint(&end.point));
    let d_a = distance_to(&pieces.piece_a, &mid);
    let d_b = distance_to(&pieces.piece_b, &mid);
    Ok(Candidates {
        keep_a: d_a >= d_b,
        piece_a: pieces.piece_a,
        piece_b: pieces.piece_b,
        cand_a,
        cand_b,
    })
}

fn candidate(
    segment: &Polyline,
    piece: &Polyline,
    start: &fieldkit_geom::Reconnection,
    end: &fieldkit_geom::Reconnection,
    ctx: &Ctx,
) -> fieldkit_geom::Result<Polyline> {
    if ctx.cfg.smoothing_active() {
        let mut ring = smooth_join(segment, piece, ctx.cfg.smoothing, ctx.cfg.spline_resolution);
        ring.close();
        if ring.len() < 4 {
            return Err(fieldkit_geom::GeometryError::DegenerateRing { points: ring.len() });
        }
        Ok(ring)
    } else {
        join_ring_candidate(segment, piece, start.skip_junction, end.skip_junction)
    }
}

fn distance_to(line: &Polyline, p: &Point) -> f64 {
    line.nearest_point(p).map(|n| n.distance).unwrap_or(f64::MAX)
}
