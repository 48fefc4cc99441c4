//! One editing session end to end: draw, hole, divide, modify, move,
//! commit, merge, then unwind the whole thing.

use chrono::{TimeZone, Utc};
use fieldkit_editor::{FieldDescriptor, Mode};
use fieldkit_geom::Point;

use crate::util::{assert_invariants, draw_square, harness, rain, snow};

fn descriptor() -> FieldDescriptor {
    FieldDescriptor::new(
        "precip_type",
        "surface",
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        "analysis",
    )
}

#[test]
fn test_full_session_and_unwind() {
    let mut h = harness();

    // Two areas
    draw_square(&mut h, 0.0, 0.0, 40.0, &rain());
    draw_square(&mut h, 60.0, 0.0, 20.0, &snow());
    assert_invariants(h.editor.edit_set());

    // Hole in the first
    h.input.push_point(20.0, 30.0);
    h.input.push_curve(crate::util::square(5.0, 5.0, 10.0));
    assert!(h.editor.add_hole(Mode::Begin).unwrap());
    assert_invariants(h.editor.edit_set());

    // Divide the first; second child turns to snow
    h.input.push_point(30.0, 20.0);
    assert!(!h.editor.divide(Mode::Begin, None).unwrap());
    h.input.push_curve(vec![(25.0, -5.0), (25.0, 45.0)]);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());
    assert!(!h.editor.divide(Mode::Set, None).unwrap());
    assert!(h.editor.divide(Mode::Set, Some(&snow())).unwrap());
    assert_invariants(h.editor.edit_set());

    // Bulge the second area's right edge
    h.input.push_point(80.0, 10.0);
    assert!(!h.editor.modify(Mode::Begin, None).unwrap());
    h.input.push_curve(vec![(80.0, 5.0), (90.0, 10.0), (80.0, 15.0)]);
    assert!(!h.editor.modify(Mode::Resume, None).unwrap());
    assert!(h.editor.modify(Mode::Set, None).unwrap());
    assert_invariants(h.editor.edit_set());

    // Move the second area out of the way
    h.input.push_point(70.0, 10.0);
    assert!(!h.editor.move_areas(Mode::Begin).unwrap());
    h.input.push_point(0.0, 0.0);
    h.input.push_point(0.0, 60.0);
    assert!(h.editor.move_areas(Mode::Translate).unwrap());
    assert_invariants(h.editor.edit_set());

    assert_eq!(h.editor.undo_depth(), 6);
    assert!(h.editor.is_dirty());

    // Commit, then merge the committed field back in
    let desc = descriptor();
    h.editor.commit_field(&desc, "session test").unwrap();
    assert!(!h.editor.is_dirty());

    assert!(!h.editor.merge(Mode::Begin).unwrap());
    assert!(!h.editor.merge(Mode::Fetch(desc)).unwrap());
    h.input.push_point(10.0, 30.0);
    assert!(!h.editor.merge(Mode::Resume).unwrap());
    assert!(h.editor.merge(Mode::Merge).unwrap());
    assert_eq!(h.editor.edit_set().len(), 3);
    assert!(h.editor.is_dirty());
    assert_invariants(h.editor.edit_set());

    // Unwind the whole session
    let mut tags = Vec::new();
    while let Some(tag) = h.editor.undo().unwrap() {
        tags.push(tag);
    }
    assert_eq!(
        tags,
        vec![
            "merge areas",
            "move areas",
            "modify boundary",
            "divide area",
            "add hole",
            "draw area",
            "draw area",
        ]
    );
    assert!(h.editor.edit_set().is_empty());
    assert_eq!(h.editor.undo_depth(), 0);
}

#[test]
fn test_divided_area_survives_commit_roundtrip() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 40.0, &rain());
    h.input.push_point(10.0, 20.0);
    h.editor.divide(Mode::Begin, None).unwrap();
    h.input.push_curve(vec![(20.0, -5.0), (20.0, 45.0)]);
    h.editor.divide(Mode::Resume, None).unwrap();
    h.editor.divide(Mode::Set, Some(&snow())).unwrap();
    assert!(h.editor.divide(Mode::Set, None).unwrap());

    let desc = descriptor();
    h.editor.commit_field(&desc, "roundtrip").unwrap();

    h.editor.merge(Mode::Begin).unwrap();
    h.editor.merge(Mode::Fetch(desc)).unwrap();
    h.input.push_point(10.0, 20.0);
    h.editor.merge(Mode::Resume).unwrap();
    assert!(h.editor.merge(Mode::Merge).unwrap());

    // The merged copy carries the dividing line and both attribute slots
    let set = h.editor.edit_set();
    assert_eq!(set.len(), 2);
    for area in set.areas() {
        assert!(area.is_divided());
        assert_eq!(area.subarea_attributes.len(), 2);
    }
    assert_invariants(set);
}

#[test]
fn test_undo_refused_mid_divide() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 20.0, &rain());
    h.input.push_point(7.0, 10.0);
    h.editor.divide(Mode::Begin, None).unwrap();
    h.input.push_curve(vec![(10.0, -3.0), (10.0, 23.0)]);
    assert!(!h.editor.divide(Mode::Resume, None).unwrap());

    // The divide's undo group is still open
    assert!(h.editor.undo().unwrap_err().is_rejection());
    assert!(!h.editor.divide(Mode::Set, None).unwrap());
    assert!(h.editor.divide(Mode::Set, None).unwrap());
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("divide area"));
}
