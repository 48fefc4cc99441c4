//! # FieldKit Editor
//!
//! The interactive state-machine engine for area editing: one verb active
//! at a time (draw, hole, modify, divide, move, merge), cooperative input
//! through the [`InputSource`] seam, feedback through [`Presenter`],
//! persistence through [`FieldStore`], and every structural edit wrapped in
//! the freeze/accept/reject bracket of the [`UndoLedger`].

pub mod editor;
pub mod error;
pub mod field_store;
pub mod input;
pub(crate) mod machines;
pub mod mode;
pub mod move_list;
pub mod picker;
pub mod presenter;
pub mod undo;

pub use editor::AreaEditor;
pub use error::{Error, Result};
pub use field_store::{FieldDescriptor, FieldStore, JsonFieldStore, MemoryFieldStore};
pub use input::{Button, InputSource, ScriptedInput};
pub use mode::{Mode, StackMove};
pub use move_list::{LabelItem, MoveItem, MoveList};
pub use picker::{pick, PickResult, PickTarget};
pub use presenter::{NullPresenter, Presenter, RecordingPresenter};
pub use undo::UndoLedger;
