//! # FieldKit
//!
//! An interactive editing engine for the composite polygonal features of
//! forecast graphics: weather areas with holes, dividing lines, derived
//! sub-area partitions, and attached labels.
//!
//! ## Architecture
//!
//! FieldKit is organized as a workspace with multiple crates:
//!
//! 1. **fieldkit-geom** - Points, polylines, intersection, ring surgery
//! 2. **fieldkit-core** - Areas, labels, attributes, the edit set, topology
//! 3. **fieldkit-editor** - Verb state machines, picking, undo, field store
//! 4. **fieldkit** - Facade crate and the scripted demo binary
//!
//! ## Features
//!
//! - **Freehand drawing**: self-crossing repair, optional corner smoothing
//! - **Topology editing**: holes, boundary reshaping, dividing and rejoining
//! - **Transactional undo**: every verb commits one undo group or nothing
//! - **Cooperative input**: machines park when the input queue drains and
//!   resume where they left off
//! - **Field store**: JSON persistence and merging between fields

pub use fieldkit_core::{
    Area, AttributeSet, DivideLine, EditError, EditorConfig, EditSet, Hole, Label, StackMode,
    SubArea,
};
pub use fieldkit_editor::{
    pick, AreaEditor, Button, Error, FieldDescriptor, FieldStore, InputSource, JsonFieldStore,
    MemoryFieldStore, Mode, MoveList, NullPresenter, PickResult, PickTarget, Presenter,
    RecordingPresenter, Result, ScriptedInput, StackMove, UndoLedger,
};
pub use fieldkit_geom::{Bounds, GeometryError, Point, Polyline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
