//! Drawing new areas and punching holes.

use fieldkit_editor::Mode;
use fieldkit_geom::{Point, Polyline};

use crate::util::{assert_invariants, draw_square, harness, rain, square};

#[test]
fn test_draw_parks_until_curve_arrives() {
    let mut h = harness();
    let registered = h.editor.draw(Mode::Begin, Some(&rain())).unwrap();
    assert!(!registered);
    assert!(h.presenter.last_status().unwrap().contains("draw"));

    h.input.push_curve(square(0.0, 0.0, 20.0));
    let registered = h.editor.draw(Mode::Resume, None).unwrap();
    assert!(registered);
    let set = h.editor.edit_set();
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.areas()[0].display_attributes().category(),
        Some("rain")
    );
    assert_eq!(h.editor.undo_depth(), 1);
    assert_invariants(set);
}

#[test]
fn test_short_outline_refused_then_retried() {
    let mut h = harness();
    h.input.push_curve(vec![(0.0, 0.0), (0.5, 0.5)]);
    let registered = h.editor.draw(Mode::Begin, Some(&rain())).unwrap();
    assert!(!registered);
    assert!(h.editor.edit_set().is_empty());
    assert!(h
        .presenter
        .statuses()
        .iter()
        .any(|s| s.contains("refused")));

    h.input.push_curve(square(0.0, 0.0, 20.0));
    assert!(h.editor.draw(Mode::Resume, None).unwrap());
    assert_eq!(h.editor.edit_set().len(), 1);
}

#[test]
fn test_self_crossing_outline_repaired() {
    let mut h = harness();
    // One stray loop on the way around; the repair drops it
    h.input.push_curve(vec![
        (0.0, 0.0),
        (20.0, 0.0),
        (20.0, 12.0),
        (14.0, 12.0),
        (14.0, 25.0),
        (26.0, 25.0),
        (20.0, 14.0),
        (20.0, 20.0),
        (0.0, 20.0),
    ]);
    let registered = h.editor.draw(Mode::Begin, Some(&rain())).unwrap();
    if registered {
        assert_invariants(h.editor.edit_set());
    } else {
        // Refused outright is also acceptable; nothing half-committed
        assert!(h.editor.edit_set().is_empty());
    }
}

#[test]
fn test_preset_outline_draws_without_input() {
    let mut h = harness();
    let ring = Polyline::ring(
        square(5.0, 5.0, 30.0)
            .into_iter()
            .map(Point::from)
            .collect(),
    );
    let registered = h
        .editor
        .draw(Mode::PresetOutline(ring), Some(&rain()))
        .unwrap();
    assert!(registered);
    assert_eq!(h.editor.edit_set().len(), 1);
}

#[test]
fn test_hole_inside_area() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 30.0, &rain());

    h.input.push_point(15.0, 15.0);
    h.input.push_curve(square(10.0, 10.0, 8.0));
    let registered = h.editor.add_hole(Mode::Begin).unwrap();
    assert!(registered);
    let area = &h.editor.edit_set().areas()[0];
    assert_eq!(area.holes.len(), 1);
    assert!(!area.contains(&Point::new(14.0, 14.0)));
    assert!(area.contains(&Point::new(2.0, 2.0)));
    assert_invariants(h.editor.edit_set());
}

#[test]
fn test_hole_crossing_boundary_refused() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 30.0, &rain());

    h.input.push_point(15.0, 15.0);
    // Sticks out the right side
    h.input.push_curve(square(25.0, 10.0, 10.0));
    let registered = h.editor.add_hole(Mode::Begin).unwrap();
    assert!(!registered);
    assert!(h.editor.edit_set().areas()[0].holes.is_empty());
    assert_eq!(h.editor.undo_depth(), 1);
}

#[test]
fn test_hole_undo_restores() {
    let mut h = harness();
    draw_square(&mut h, 0.0, 0.0, 30.0, &rain());
    h.input.push_point(15.0, 15.0);
    h.input.push_curve(square(10.0, 10.0, 8.0));
    assert!(h.editor.add_hole(Mode::Begin).unwrap());

    let tag = h.editor.undo().unwrap();
    assert_eq!(tag.as_deref(), Some("add hole"));
    assert!(h.editor.edit_set().areas()[0].holes.is_empty());
}
