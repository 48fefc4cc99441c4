use chrono::{TimeZone, Utc};
use tracing::info;

use fieldkit::{
    init_logging, AreaEditor, AttributeSet, EditorConfig, FieldDescriptor, JsonFieldStore, Mode,
    NullPresenter, ScriptedInput, BUILD_DATE, VERSION,
};

/// Scripted smoke run: draws a field of areas, divides one, and commits
/// the result as JSON into the directory given on the command line
/// (default "fields").
fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!(version = VERSION, built = BUILD_DATE, "fieldkit demo");

    let dir = std::env::args().nth(1).unwrap_or_else(|| "fields".into());
    std::fs::create_dir_all(&dir)?;

    let input = ScriptedInput::new();
    let mut editor = AreaEditor::new(
        EditorConfig::default(),
        Box::new(input.clone()),
        Box::new(NullPresenter),
        Box::new(JsonFieldStore::new(&dir)),
    );

    // A rain area with a dry pocket
    input.push_curve(vec![
        (10.0, 10.0),
        (90.0, 10.0),
        (90.0, 60.0),
        (10.0, 60.0),
    ]);
    editor.draw(Mode::Begin, Some(&AttributeSet::with_category("rain")))?;
    input.push_point(20.0, 50.0);
    input.push_curve(vec![
        (30.0, 25.0),
        (45.0, 25.0),
        (45.0, 40.0),
        (30.0, 40.0),
    ]);
    editor.add_hole(Mode::Begin)?;

    // Divide it; the eastern piece turns to snow
    input.push_point(80.0, 30.0);
    editor.divide(Mode::Begin, None)?;
    input.push_curve(vec![(60.0, 5.0), (60.0, 65.0)]);
    editor.divide(Mode::Resume, None)?;
    editor.divide(Mode::Set, None)?;
    editor.divide(Mode::Set, Some(&AttributeSet::with_category("snow")))?;

    let valid_time = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("bad valid time"))?;
    let desc = FieldDescriptor::new("precip_type", "surface", valid_time, "demo");
    editor.commit_field(&desc, "scripted demo")?;

    info!(
        areas = editor.edit_set().len(),
        edits = editor.undo_depth(),
        dir,
        "field committed"
    );
    Ok(())
}
