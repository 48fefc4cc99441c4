//! Error types for geometry operations.
//!
//! Every operation returns success/failure plus an explicit reason; callers
//! in the editor interpret the reason to choose their next state.

use thiserror::Error;

/// Geometry error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Curve has too few points or is shorter than the working resolution.
    #[error("Curve too short: {length:.3} < {minimum:.3}")]
    TooShort {
        /// Arc length of the offending curve.
        length: f64,
        /// Minimum acceptable arc length.
        minimum: f64,
    },

    /// A ring operation was attempted on an open polyline.
    #[error("Curve is not closed")]
    NotClosed,

    /// A ring collapsed below three distinct vertices.
    #[error("Ring is degenerate ({points} points)")]
    DegenerateRing {
        /// Number of distinct points remaining.
        points: usize,
    },

    /// An operand polyline was empty.
    #[error("Empty polyline")]
    Empty,

    /// A curve could not be clipped to the target region.
    #[error("Clip failed: {0}")]
    Clip(#[from] ClipFailure),
}

/// Reasons a curve cannot be clipped to a ring.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipFailure {
    /// The curve lies entirely outside the ring.
    #[error("curve entirely outside region")]
    Outside,

    /// The curve never crosses the ring on one end.
    #[error("curve endpoint cannot be placed on the region boundary")]
    EndpointUnplaced,

    /// The portion inside the ring is below the working resolution.
    #[error("clipped curve too short")]
    TooShort,
}

/// Result type using [`GeometryError`].
pub type Result<T> = std::result::Result<T, GeometryError>;
