//! Shared harness for the editor integration tests.

use fieldkit_core::{AttributeSet, EditorConfig, EditSet};
use fieldkit_editor::{
    AreaEditor, MemoryFieldStore, Mode, RecordingPresenter, ScriptedInput,
};
use fieldkit_geom::Polyline;

pub struct Harness {
    pub editor: AreaEditor,
    pub input: ScriptedInput,
    pub presenter: RecordingPresenter,
}

pub fn harness() -> Harness {
    harness_with_store(MemoryFieldStore::new())
}

pub fn harness_with_store(store: MemoryFieldStore) -> Harness {
    let input = ScriptedInput::new();
    let presenter = RecordingPresenter::new();
    let editor = AreaEditor::new(
        EditorConfig::default(),
        Box::new(input.clone()),
        Box::new(presenter.clone()),
        Box::new(store),
    );
    Harness {
        editor,
        input,
        presenter,
    }
}

/// Open square outline; the engine closes it.
pub fn square(x: f64, y: f64, size: f64) -> Vec<(f64, f64)> {
    vec![
        (x, y),
        (x + size, y),
        (x + size, y + size),
        (x, y + size),
    ]
}

pub fn rain() -> AttributeSet {
    AttributeSet::with_category("rain")
}

pub fn snow() -> AttributeSet {
    AttributeSet::with_category("snow")
}

/// Draws one square area and returns control with the draw verb active.
pub fn draw_square(h: &mut Harness, x: f64, y: f64, size: f64, attrs: &AttributeSet) {
    h.input.push_curve(square(x, y, size));
    let registered = h.editor.draw(Mode::Begin, Some(attrs)).unwrap();
    assert!(registered, "square draw should register an edit");
}

/// Invariants that must hold after every committed edit.
pub fn assert_invariants(set: &EditSet) {
    for area in set.areas() {
        assert!(area.boundary.is_closed(), "boundary must stay closed");
        assert!(
            fieldkit_geom::first_self_crossing(&area.boundary).is_none(),
            "boundary must stay simple"
        );
        for hole in &area.holes {
            assert!(hole.ring.is_closed(), "holes must stay closed");
            let p = hole.ring.interior_point().unwrap();
            assert!(
                area.boundary.contains(&p),
                "holes must stay inside the boundary"
            );
        }
        let part = area.partition(1.0).unwrap();
        assert_eq!(
            part.subareas.len(),
            area.divide_lines.len() + 1,
            "partition size must track dividing lines"
        );
        assert_eq!(
            area.subarea_attributes.len(),
            area.divide_lines.len() + 1,
            "attribute slots must track dividing lines"
        );
    }
    for label in &set.labels {
        if let Some(att) = label.attachment {
            let area = set
                .areas()
                .iter()
                .find(|a| a.id == att.area)
                .expect("attached label must have its area");
            assert!(
                area.contains(&label.anchor),
                "attached label must sit inside its area"
            );
        }
    }
}
