//! Editor error type, flattening the model and geometry domains.

use thiserror::Error;

/// Top-level editor error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Edit(#[from] fieldkit_core::EditError),

    #[error(transparent)]
    Geometry(#[from] fieldkit_geom::GeometryError),
}

impl Error {
    /// True for refusals that leave the engine state unchanged.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::Edit(fieldkit_core::EditError::InputRejected { .. })
        )
    }
}

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for an input refusal.
pub(crate) fn rejected<T>(reason: impl Into<String>) -> Result<T> {
    Err(fieldkit_core::EditError::rejected(reason).into())
}
