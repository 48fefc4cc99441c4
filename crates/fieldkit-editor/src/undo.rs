//! Transactional bracket around edit-set mutation.
//!
//! Every structural edit runs inside freeze → mutate → accept/reject.
//! `freeze` banks the current state; `accept` closes the group under a tag
//! and pushes it on the undo stack; `reject` restores the banked state
//! byte-for-byte. Nothing outside this bracket may mutate the edit set.

use tracing::debug;

use fieldkit_core::{EditError, EditSet};

use crate::error::Result;

/// One accepted edit group.
#[derive(Debug, Clone)]
struct Group {
    tag: String,
    /// Edit set as it was before the group's mutations.
    before: EditSet,
}

/// The undo/commit ledger.
#[derive(Debug, Default)]
pub struct UndoLedger {
    frozen: Option<EditSet>,
    stack: Vec<Group>,
    dirty: bool,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a group is open.
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// True once any group has been accepted since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Number of undoable groups.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Opens a group by banking the current edit set.
    pub fn freeze(&mut self, current: &EditSet) -> Result<()> {
        if self.frozen.is_some() {
            return Err(EditError::CommitFailure("edit group already open".into()).into());
        }
        self.frozen = Some(current.clone());
        Ok(())
    }

    /// Closes the open group under `tag`.
    pub fn accept(&mut self, tag: impl Into<String>) -> Result<()> {
        let before = self
            .frozen
            .take()
            .ok_or_else(|| EditError::CommitFailure("no open edit group".into()))?;
        let tag = tag.into();
        debug!(tag, depth = self.stack.len() + 1, "edit group accepted");
        self.stack.push(Group { tag, before });
        self.dirty = true;
        Ok(())
    }

    /// Abandons the open group, restoring the banked edit set.
    pub fn reject(&mut self, current: &mut EditSet) -> Result<()> {
        let before = self
            .frozen
            .take()
            .ok_or_else(|| EditError::CommitFailure("no open edit group".into()))?;
        debug!("edit group rejected");
        *current = before;
        Ok(())
    }

    /// Rolls back the most recent accepted group. Returns its tag.
    pub fn undo(&mut self, current: &mut EditSet) -> Option<String> {
        let group = self.stack.pop()?;
        *current = group.before;
        self.dirty = true;
        debug!(tag = %group.tag, "edit group undone");
        Some(group.tag)
    }

    /// Drops all undo history, e.g. after loading a new field.
    pub fn clear(&mut self) {
        self.frozen = None;
        self.stack.clear();
        self.dirty = false;
    }
}
