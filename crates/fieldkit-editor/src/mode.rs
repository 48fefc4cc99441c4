//! Mode tokens driving the verb entry points.

use fieldkit_geom::Polyline;

use crate::field_store::FieldDescriptor;

/// Stacking reorder direction for picked areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackMove {
    Top,
    Up,
    Down,
    Bottom,
}

/// What a verb call should do.
///
/// `Begin` starts (or restarts) the verb's state machine; `Resume` pumps it
/// with whatever input is queued; the rest are verb-specific actions. A verb
/// refuses tokens it has no use for.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Start the verb, cancelling any other active verb.
    Begin,
    /// Drop in-progress working state; keep copy/move buffers.
    Cancel,
    /// Drop working state and all copy/move buffers.
    CancelAll,
    /// Clear the current pick list without leaving the verb.
    Clear,
    /// Advance the parked state machine with queued input.
    Resume,
    /// Apply the attribute payload to the current target.
    Set,
    /// Delete the picked feature.
    Delete,
    /// Delete the picked hole.
    DeleteHole,
    /// Reorder the picked areas in the stacking pile.
    Stack(StackMove),
    /// Translate the picked areas by two picked points.
    Translate,
    /// Rotate the picked areas about a picked centre.
    Rotate,
    /// Pick every area in the edit set.
    SelectAll,
    /// Move the picked areas to the copy buffer.
    Cut,
    /// Duplicate the picked areas into the copy buffer.
    Copy,
    /// Insert the copy buffer into the edit set.
    Paste,
    /// Pick areas by drawing an enclosing outline.
    DrawOutline,
    /// Pick areas by a prepared outline.
    PresetOutline(Polyline),
    /// Remove the most recent dividing line of the picked area.
    Rejoin,
    /// Load a merge candidate set from the field store.
    Fetch(FieldDescriptor),
    /// Commit the picked merge candidates in place.
    Merge,
}
