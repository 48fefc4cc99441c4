//! Dividing areas into attributed pieces, and rejoining them.

use fieldkit_editor::Mode;
use fieldkit_geom::Point;

use crate::util::{assert_invariants, draw_square, harness, rain, snow, Harness};

/// Square 0..20 with the divide verb parked in the draw step, the single
/// piece picked.
fn picked_square(h: &mut Harness) {
    draw_square(h, 0.0, 0.0, 20.0, &rain());
    h.input.push_point(7.0, 10.0);
    let registered = h.editor.divide(Mode::Begin, None).unwrap();
    assert!(!registered);
}

/// Runs the drawn line through the machine and commits both children with
/// the given payloads.
fn commit_divide(
    h: &mut Harness,
    line: Vec<(f64, f64)>,
    first: Option<&fieldkit_core::AttributeSet>,
    second: Option<&fieldkit_core::AttributeSet>,
) {
    h.input.push_curve(line);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    assert!(!h.editor.divide(Mode::Set, first).unwrap());
    assert!(h.editor.divide(Mode::Set, second).unwrap());
}

#[test]
fn test_divide_creates_two_attributed_pieces() {
    let mut h = harness();
    picked_square(&mut h);
    commit_divide(&mut h, vec![(10.0, -3.0), (10.0, 23.0)], Some(&snow()), None);

    let area = &h.editor.edit_set().areas()[0];
    assert!(area.is_divided());
    assert_eq!(area.subarea_attributes.len(), 2);

    let part = area.partition(1.0).unwrap();
    assert_eq!(part.subareas.len(), 2);
    for sub in &part.subareas {
        assert!((sub.outline.area() - 200.0).abs() < 1.0);
    }
    let cats: Vec<_> = part
        .subareas
        .iter()
        .map(|s| s.attributes.category().unwrap().to_string())
        .collect();
    assert!(cats.contains(&"snow".to_string()));
    assert!(cats.contains(&"rain".to_string()));

    // The whole-area attributes stop carrying meaning once divided
    assert_eq!(area.display_attributes().category(), None);
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_divide_is_one_undo_group() {
    let mut h = harness();
    picked_square(&mut h);
    commit_divide(&mut h, vec![(10.0, -3.0), (10.0, 23.0)], Some(&snow()), Some(&snow()));
    assert_eq!(h.editor.undo_depth(), 2);

    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("divide area"));
    let area = &h.editor.edit_set().areas()[0];
    assert!(!area.is_divided());
    assert_eq!(area.display_attributes().category(), Some("rain"));
}

#[test]
fn test_line_missing_the_area_refused_then_retried() {
    let mut h = harness();
    picked_square(&mut h);

    h.input.push_curve(vec![(30.0, -5.0), (30.0, 25.0)]);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    assert!(!h.editor.edit_set().areas()[0].is_divided());
    assert!(h
        .presenter
        .statuses()
        .iter()
        .any(|s| s.contains("refused")));

    commit_divide(&mut h, vec![(10.0, -3.0), (10.0, 23.0)], None, None);
    assert!(h.editor.edit_set().areas()[0].is_divided());
}

#[test]
fn test_too_short_clip_refused() {
    let mut h = harness();
    picked_square(&mut h);

    // Cuts the corner; the clipped stub is shorter than the spline
    // resolution
    h.input.push_curve(vec![(-2.0, 17.0), (3.0, 22.0)]);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    assert!(!h.editor.edit_set().areas()[0].is_divided());
}

#[test]
fn test_cancel_mid_commit_restores() {
    let mut h = harness();
    picked_square(&mut h);
    h.input.push_curve(vec![(10.0, -3.0), (10.0, 23.0)]);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    assert!(h.editor.edit_set().areas()[0].is_divided());

    // Attributes never confirmed; the whole divide unwinds
    h.editor.divide(Mode::Cancel, None).unwrap();
    let area = &h.editor.edit_set().areas()[0];
    assert!(!area.is_divided());
    assert_eq!(area.display_attributes().category(), Some("rain"));
    assert_eq!(h.editor.undo_depth(), 1);
}

#[test]
fn test_rejoin_last_divide() {
    let mut h = harness();
    picked_square(&mut h);
    commit_divide(&mut h, vec![(10.0, -3.0), (10.0, 23.0)], Some(&snow()), None);

    // Pick either child, then rejoin
    h.input.push_point(15.0, 10.0);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    let registered = h.editor.divide(Mode::Rejoin, None).unwrap();
    assert!(registered);

    let area = &h.editor.edit_set().areas()[0];
    assert!(!area.is_divided());
    assert_eq!(area.subarea_attributes.len(), 1);
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("rejoin area"));
    assert!(h.editor.edit_set().areas()[0].is_divided());
}

#[test]
fn test_rejoin_refused_away_from_last_divide() {
    let mut h = harness();
    picked_square(&mut h);
    commit_divide(&mut h, vec![(10.0, -3.0), (10.0, 23.0)], None, None);

    // Divide the east half again; the west half is no longer beside the
    // last dividing line
    h.input.push_point(15.0, 5.0);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    commit_divide(&mut h, vec![(8.0, 10.0), (23.0, 10.0)], None, None);
    let area = &h.editor.edit_set().areas()[0];
    assert_eq!(area.divide_lines.len(), 2);
    assert_eq!(area.subarea_attributes.len(), 3);

    h.input.push_point(5.0, 10.0);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    let err = h.editor.divide(Mode::Rejoin, None).unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(h.editor.edit_set().areas()[0].divide_lines.len(), 2);
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_rejoin_on_undivided_area_refused() {
    let mut h = harness();
    picked_square(&mut h);
    let before = h.editor.edit_set().clone();

    let err = h.editor.divide(Mode::Rejoin, None).unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(h.editor.edit_set(), &before, "refusal leaves the set alone");
    assert_eq!(h.editor.undo_depth(), 1);
}
