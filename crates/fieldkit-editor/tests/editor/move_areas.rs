//! Moving, copying, pasting, transforming and restacking areas.

use fieldkit_core::{Area, EditSet, Label, StackMode};
use fieldkit_editor::{Mode, StackMove};
use fieldkit_geom::{Point, Polyline};

use crate::util::{assert_invariants, harness, rain, snow, square, Harness};

fn ring_area(x: f64, y: f64, size: f64) -> Area {
    let ring = Polyline::ring(square(x, y, size).into_iter().map(Point::from).collect());
    Area::new(ring, rain()).unwrap()
}

/// One square 0..20 with a label pinned at its centre, move verb active.
fn labelled_square(h: &mut Harness) -> uuid::Uuid {
    let area = ring_area(0.0, 0.0, 20.0);
    let id = area.id;
    let mut set = EditSet::new();
    set.insert_area(area, StackMode::Top);
    set.labels
        .push(Label::new(Point::new(10.0, 10.0), snow()).attached_to(id, 0));
    h.editor.load(set);
    assert!(!h.editor.move_areas(Mode::Begin).unwrap());
    id
}

#[test]
fn test_translate_carries_labels() {
    let mut h = harness();
    labelled_square(&mut h);

    h.input.push_point(10.0, 10.0);
    assert!(!h.editor.move_areas(Mode::Resume).unwrap());

    h.input.push_point(0.0, 0.0);
    h.input.push_point(30.0, 0.0);
    let registered = h.editor.move_areas(Mode::Translate).unwrap();
    assert!(registered);

    let set = h.editor.edit_set();
    assert!(set.areas()[0].contains(&Point::new(35.0, 10.0)));
    assert_eq!(set.labels.len(), 1);
    assert!((set.labels[0].anchor.x - 40.0).abs() < 1e-9);
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("move areas"));
    assert!(h.editor.edit_set().areas()[0].contains(&Point::new(5.0, 10.0)));
}

#[test]
fn test_labels_left_behind_are_dropped() {
    let mut h = harness();
    labelled_square(&mut h);
    h.editor.set_move_labels(false).unwrap();

    h.input.push_point(10.0, 10.0);
    h.editor.move_areas(Mode::Resume).unwrap();
    h.input.push_point(0.0, 0.0);
    h.input.push_point(100.0, 0.0);
    assert!(h.editor.move_areas(Mode::Translate).unwrap());

    // The stationary label no longer sits inside its area
    assert!(h.editor.edit_set().labels.is_empty());
    assert!(!h.presenter.warnings().is_empty());
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_label_toggle_refused_mid_transform_warns_once() {
    let mut h = harness();
    labelled_square(&mut h);
    h.input.push_point(10.0, 10.0);
    h.editor.move_areas(Mode::Resume).unwrap();

    // Anchor placed, destination pending: the transform is underway
    h.input.push_point(0.0, 0.0);
    assert!(!h.editor.move_areas(Mode::Translate).unwrap());

    assert!(h.editor.set_move_labels(false).unwrap_err().is_rejection());
    assert_eq!(h.presenter.warnings().len(), 1);
    assert!(h.editor.set_move_labels(false).unwrap_err().is_rejection());
    assert_eq!(h.presenter.warnings().len(), 1, "warned once per session");
}

#[test]
fn test_copy_paste_over_self_nudges() {
    let mut h = harness();
    labelled_square(&mut h);

    h.input.push_point(10.0, 10.0);
    h.editor.move_areas(Mode::Resume).unwrap();
    assert!(!h.editor.move_areas(Mode::Copy).unwrap());
    let registered = h.editor.move_areas(Mode::Paste).unwrap();
    assert!(registered);

    let set = h.editor.edit_set();
    assert_eq!(set.len(), 2);
    let offset = h.editor.config().paste_offset;
    let pasted = &set.areas()[0];
    assert!(pasted.contains(&Point::new(10.0 + offset, 10.0 - offset)));
    assert!(!pasted.boundary.contains(&Point::new(2.0, 18.0)));
    assert_eq!(set.labels.len(), 2);
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("paste areas"));
    assert_eq!(h.editor.edit_set().len(), 1);
}

#[test]
fn test_cut_then_paste_restores_elsewhere() {
    let mut h = harness();
    let id = labelled_square(&mut h);

    h.input.push_point(10.0, 10.0);
    h.editor.move_areas(Mode::Resume).unwrap();
    assert!(h.editor.move_areas(Mode::Cut).unwrap());
    assert!(h.editor.edit_set().is_empty());

    assert!(h.editor.move_areas(Mode::Paste).unwrap());
    let set = h.editor.edit_set();
    assert_eq!(set.len(), 1);
    assert_ne!(set.areas()[0].id, id, "pasted copy gets a fresh identity");
    assert!(set.areas()[0].contains(&Point::new(10.0, 10.0)));
    assert_eq!(set.labels.len(), 1);
    assert_invariants(set);
}

#[test]
fn test_restack_to_top() {
    let mut h = harness();
    let mut set = EditSet::new();
    let a = ring_area(0.0, 0.0, 20.0);
    let b = ring_area(5.0, 5.0, 20.0);
    let c = ring_area(10.0, 10.0, 20.0);
    let bottom = a.id;
    set.insert_area(a, StackMode::Bottom);
    set.insert_area(b, StackMode::Bottom);
    set.insert_area(c, StackMode::Bottom);
    h.editor.load(set);

    h.editor.move_areas(Mode::Begin).unwrap();
    h.input.push_point(2.0, 12.0);
    h.editor.move_areas(Mode::Resume).unwrap();
    let registered = h.editor.move_areas(Mode::Stack(StackMove::Top)).unwrap();
    assert!(registered);
    assert_eq!(h.editor.edit_set().position(bottom), Some(0));

    // Already on top; a further raise registers nothing
    assert!(!h.editor.move_areas(Mode::Stack(StackMove::Up)).unwrap());
    assert_eq!(h.editor.undo_depth(), 1);
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("restack areas"));
    assert_eq!(h.editor.edit_set().position(bottom), Some(2));
}

#[test]
fn test_outline_pick_then_translate() {
    let mut h = harness();
    let mut set = EditSet::new();
    set.insert_area(ring_area(0.0, 0.0, 10.0), StackMode::Bottom);
    set.insert_area(ring_area(20.0, 0.0, 10.0), StackMode::Bottom);
    set.insert_area(ring_area(100.0, 0.0, 10.0), StackMode::Bottom);
    h.editor.load(set);

    h.editor.move_areas(Mode::Begin).unwrap();
    let outline = Polyline::ring(
        square(-5.0, -5.0, 45.0).into_iter().map(Point::from).collect(),
    );
    assert!(!h.editor.move_areas(Mode::PresetOutline(outline)).unwrap());

    h.input.push_point(0.0, 0.0);
    h.input.push_point(0.0, 50.0);
    assert!(h.editor.move_areas(Mode::Translate).unwrap());
    let set = h.editor.edit_set();
    assert!(set.areas()[0].contains(&Point::new(5.0, 55.0)));
    assert!(set.areas()[1].contains(&Point::new(25.0, 55.0)));
    assert!(set.areas()[2].contains(&Point::new(105.0, 5.0)), "unpicked area stays put");
}

#[test]
fn test_rotate_about_corner() {
    let mut h = harness();
    labelled_square(&mut h);
    h.input.push_point(10.0, 10.0);
    h.editor.move_areas(Mode::Resume).unwrap();

    // Quarter turn about the origin
    h.input.push_point(0.0, 0.0);
    h.input.push_point(10.0, 0.0);
    h.input.push_point(0.0, 10.0);
    let registered = h.editor.move_areas(Mode::Rotate).unwrap();
    assert!(registered);

    let set = h.editor.edit_set();
    assert!(set.areas()[0].contains(&Point::new(-10.0, 10.0)));
    assert!((set.labels[0].anchor.x + 10.0).abs() < 1e-6);
    assert!((set.labels[0].anchor.y - 10.0).abs() < 1e-6);
    assert_eq!(h.editor.undo().unwrap().as_deref(), Some("rotate areas"));
}

#[test]
fn test_select_all_then_cancel_all_clears() {
    let mut h = harness();
    let mut set = EditSet::new();
    set.insert_area(ring_area(0.0, 0.0, 10.0), StackMode::Bottom);
    set.insert_area(ring_area(20.0, 0.0, 10.0), StackMode::Bottom);
    h.editor.load(set);

    h.editor.move_areas(Mode::Begin).unwrap();
    assert!(!h.editor.move_areas(Mode::SelectAll).unwrap());
    h.editor.move_areas(Mode::CancelAll).unwrap();

    // Nothing picked any more; a transform has nothing to act on
    let err = h.editor.move_areas(Mode::Translate).unwrap_err();
    assert!(err.is_rejection());
}
