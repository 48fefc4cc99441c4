//! # FieldKit Core
//!
//! The area model behind the interactive editor: closed-boundary areas with
//! holes and dividing lines, the derived sub-area partition, attributed
//! labels, and the edit set that holds them in stacking order.
//!
//! Everything here is pure data and topology; interactive state machines
//! live in `fieldkit-editor`.

pub mod area;
pub mod attributes;
pub mod config;
pub mod edit_set;
pub mod error;
pub mod label;
pub mod topology;

pub use area::{Area, DivideLine, Hole, SubArea};
pub use attributes::AttributeSet;
pub use config::{EditorConfig, StackMode};
pub use edit_set::EditSet;
pub use error::{EditError, Result};
pub use label::Label;
