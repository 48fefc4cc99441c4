//! Reshaping boundaries, holes and dividing lines.

use fieldkit_core::AttributeSet;
use fieldkit_editor::Mode;
use fieldkit_geom::Point;

use crate::util::{assert_invariants, draw_square, harness, rain, snow, square, Harness};

/// Square 0..20 with the modify verb parked in the draw step, boundary
/// picked on the right edge.
fn picked_square(h: &mut Harness) {
    draw_square(h, 0.0, 0.0, 20.0, &rain());
    h.input.push_point(20.0, 10.0);
    let registered = h.editor.modify(Mode::Begin, None).unwrap();
    assert!(!registered);
}

#[test]
fn test_bulge_kept_by_default() {
    let mut h = harness();
    picked_square(&mut h);

    // Bulge out the right edge, then confirm the default keep
    h.input.push_curve(vec![(20.0, 5.0), (30.0, 10.0), (20.0, 15.0)]);
    assert!(!h.editor.modify(Mode::Resume, None).unwrap());
    let registered = h.editor.modify(Mode::Set, None).unwrap();
    assert!(registered);

    let area = &h.editor.edit_set().areas()[0];
    assert!(area.contains(&Point::new(25.0, 10.0)), "bulge became part of the area");
    assert!(area.contains(&Point::new(5.0, 10.0)));
    assert!(area.boundary.area() > 400.0);
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_discard_pick_selects_other_candidate() {
    let mut h = harness();
    picked_square(&mut h);

    h.input.push_curve(vec![(20.0, 5.0), (30.0, 10.0), (20.0, 15.0)]);
    assert!(!h.editor.modify(Mode::Resume, None).unwrap());

    // Pick right on the short piece of the old edge: keep the small
    // candidate instead
    h.input.push_point(20.0, 10.0);
    let registered = h.editor.modify(Mode::Resume, None).unwrap();
    assert!(registered);
    let area = &h.editor.edit_set().areas()[0];
    assert!(area.boundary.area() < 400.0, "small candidate kept");
    assert!(!area.contains(&Point::new(5.0, 10.0)));
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_pick_near_segment_discards_modification() {
    let mut h = harness();
    picked_square(&mut h);

    h.input.push_curve(vec![(20.0, 5.0), (30.0, 10.0), (20.0, 15.0)]);
    assert!(!h.editor.modify(Mode::Resume, None).unwrap());

    // Pick nearest the drawn segment itself: original survives untouched
    h.input.push_point(29.0, 10.0);
    let registered = h.editor.modify(Mode::Resume, None).unwrap();
    assert!(!registered);
    let area = &h.editor.edit_set().areas()[0];
    assert!((area.boundary.area() - 400.0).abs() < 1e-6);
    assert_eq!(h.editor.undo_depth(), 1);
}

#[test]
fn test_modify_undo_restores_boundary() {
    let mut h = harness();
    picked_square(&mut h);
    h.input.push_curve(vec![(20.0, 5.0), (30.0, 10.0), (20.0, 15.0)]);
    h.editor.modify(Mode::Resume, None).unwrap();
    assert!(h.editor.modify(Mode::Set, None).unwrap());

    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("modify boundary"));
    let area = &h.editor.edit_set().areas()[0];
    assert!((area.boundary.area() - 400.0).abs() < 1e-6);
}

#[test]
fn test_boundary_replacement_drops_stranded_divide_line() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 20.0, &rain());

    // Divide at x=14, committed with inherited attributes
    h.input.push_point(7.0, 10.0);
    h.editor.divide(Mode::Begin, None).unwrap();
    h.input.push_curve(vec![(14.0, -3.0), (14.0, 23.0)]);
    h.editor.divide(Mode::Resume, None).unwrap();
    h.editor.divide(Mode::Set, None).unwrap();
    assert!(h.editor.divide(Mode::Set, None).unwrap());
    assert!(h.editor.edit_set().areas()[0].is_divided());

    // Cut the right side off past the divide line; the line is stranded
    h.input.push_point(20.0, 10.0);
    h.editor.modify(Mode::Begin, None).unwrap();
    h.input.push_curve(vec![(10.0, 0.0), (10.0, 20.0)]);
    h.editor.modify(Mode::Resume, None).unwrap();
    // Keep the left piece
    h.input.push_point(2.0, 10.0);
    let registered = h.editor.modify(Mode::Resume, None).unwrap();
    assert!(registered);

    let area = &h.editor.edit_set().areas()[0];
    assert!(!area.is_divided(), "stranded divide line dropped");
    assert!(
        h.presenter
            .warnings()
            .iter()
            .any(|w| w.starts_with("Topology lost")),
        "loss was reported"
    );
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_modify_hole_ring() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 30.0, &rain());
    h.input.push_point(15.0, 15.0);
    h.input.push_curve(square(10.0, 10.0, 8.0));
    assert!(h.editor.add_hole(Mode::Begin).unwrap());

    // Reshape the hole's bottom edge downward
    h.input.push_point(14.0, 10.0);
    h.editor.modify(Mode::Begin, None).unwrap();
    h.input.push_curve(vec![(11.0, 10.0), (14.0, 6.0), (17.0, 10.0)]);
    h.editor.modify(Mode::Resume, None).unwrap();
    let registered = h.editor.modify(Mode::Set, None).unwrap();
    assert!(registered);

    let area = &h.editor.edit_set().areas()[0];
    assert_eq!(area.holes.len(), 1);
    assert!(!area.contains(&Point::new(14.0, 8.0)), "hole grew downward");
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_hole_collapse_removes_hole() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 30.0, &rain());
    h.input.push_point(15.0, 15.0);
    h.input.push_curve(square(10.0, 10.0, 8.0));
    assert!(h.editor.add_hole(Mode::Begin).unwrap());

    // Redraw the hole's top edge as a sliver hugging it, then keep the
    // small candidate: the hole collapses and is removed
    h.input.push_point(14.0, 10.0);
    h.editor.modify(Mode::Begin, None).unwrap();
    h.input.push_curve(vec![(10.0, 10.0), (14.0, 9.0), (18.0, 10.0)]);
    h.editor.modify(Mode::Resume, None).unwrap();
    h.input.push_point(14.0, 10.0);
    let registered = h.editor.modify(Mode::Resume, None).unwrap();
    assert!(registered);

    let area = &h.editor.edit_set().areas()[0];
    assert!(area.holes.is_empty(), "collapsed hole removed");
    assert!(area.contains(&Point::new(14.0, 14.0)));
    assert!(
        h.presenter
            .warnings()
            .iter()
            .any(|w| w.starts_with("Topology lost")),
        "removal was reported"
    );
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("delete hole"));
    assert_eq!(h.editor.edit_set().areas()[0].holes.len(), 1);
}

#[test]
fn test_restack_picked_area_to_top() {
    let mut h = harness();
    // Three overlapping squares; the first drawn ends up at the bottom
    draw_square(&mut h, 0.0, 0.0, 20.0, &rain());
    draw_square(&mut h, 5.0, 5.0, 20.0, &rain());
    draw_square(&mut h, 10.0, 10.0, 20.0, &rain());
    let bottom = h.editor.edit_set().areas()[2].id;

    h.editor.modify(Mode::Begin, None).unwrap();
    // Only the bottom square covers this corner
    h.input.push_point(2.0, 2.0);
    let registered = h
        .editor
        .modify(Mode::Stack(fieldkit_editor::StackMove::Top), None)
        .unwrap();
    assert!(registered);
    assert_eq!(h.editor.edit_set().position(bottom), Some(0));

    // Already on top: a further raise registers nothing
    h.input.push_point(2.0, 2.0);
    let registered = h
        .editor
        .modify(Mode::Stack(fieldkit_editor::StackMove::Up), None)
        .unwrap();
    assert!(!registered);
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("restack area"));
    assert_eq!(h.editor.edit_set().position(bottom), Some(2));
}

#[test]
fn test_delete_area() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 20.0, &rain());
    h.editor.modify(Mode::Begin, None).unwrap();
    h.input.push_point(10.0, 10.0);
    let registered = h.editor.modify(Mode::Delete, None).unwrap();
    assert!(registered);
    assert!(h.editor.edit_set().is_empty());
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("delete area"));
    assert_eq!(h.editor.edit_set().len(), 1);
}

#[test]
fn test_delete_hole() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 30.0, &rain());
    h.input.push_point(15.0, 15.0);
    h.input.push_curve(square(10.0, 10.0, 8.0));
    assert!(h.editor.add_hole(Mode::Begin).unwrap());

    h.editor.modify(Mode::Begin, None).unwrap();
    h.input.push_point(10.0, 14.0);
    let registered = h.editor.modify(Mode::DeleteHole, None).unwrap();
    assert!(registered);
    assert!(h.editor.edit_set().areas()[0].holes.is_empty());
}

#[test]
fn test_set_attributes_on_subarea() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 20.0, &rain());
    h.editor.modify(Mode::Begin, None).unwrap();
    h.input.push_point(10.0, 10.0);
    let registered = h.editor.modify(Mode::Set, Some(&snow())).unwrap();
    assert!(registered);
    assert_eq!(
        h.editor.edit_set().areas()[0].subarea_attributes[0].category(),
        Some("snow")
    );
}

#[test]
fn test_wrong_mode_refused() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 20.0, &rain());
    let err = h.editor.modify(Mode::Paste, None).unwrap_err();
    assert!(err.is_rejection());
    let attrs: Option<&AttributeSet> = None;
    let err = h.editor.draw(Mode::Rejoin, attrs).unwrap_err();
    assert!(err.is_rejection());
}
