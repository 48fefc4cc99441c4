//! Editing error taxonomy.
//!
//! Four families: input the tools refuse outright, geometry that cannot be
//! built, topology silently lost as a side effect of an edit (reported,
//! never fatal), and commit failures from the backing store.

use thiserror::Error;

use fieldkit_geom::GeometryError;

/// Errors raised by model and topology operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// The supplied input cannot start or continue the requested edit.
    #[error("Input rejected: {reason}")]
    InputRejected {
        /// Human-readable refusal reason, shown in the status line.
        reason: String,
    },

    /// The edit would produce invalid geometry.
    #[error(transparent)]
    GeometryInvalid(#[from] GeometryError),

    /// An edit dropped dependent structure (dividing lines, holes, labels).
    #[error("Topology lost: {what}")]
    TopologyLoss {
        /// Description of the dropped structure.
        what: String,
    },

    /// The backing field store refused the commit.
    #[error("Commit failed: {0}")]
    CommitFailure(String),
}

impl EditError {
    /// Shorthand for an [`EditError::InputRejected`] with a formatted reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        EditError::InputRejected {
            reason: reason.into(),
        }
    }
}

/// Result type using [`EditError`].
pub type Result<T> = std::result::Result<T, EditError>;
