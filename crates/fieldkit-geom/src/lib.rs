//! # FieldKit Geometry
//!
//! Planar geometry primitives for the area editor: points, open and closed
//! polylines, containment and closest-feature queries, curve splitting and
//! joining with optional smoothing, intersection scans, and rigid
//! transforms.
//!
//! Coordinates are map-space `f64` pairs. Closed curves ("rings") are
//! polylines whose last point coincides with their first; ring-only
//! operations check this and fail with [`GeometryError::NotClosed`] rather
//! than guessing.

pub mod bounds;
pub mod error;
pub mod intersect;
pub mod point;
pub mod polyline;
pub mod smooth;
pub mod split;

pub use bounds::Bounds;
pub use error::{ClipFailure, GeometryError, Result};
pub use intersect::{crossings_with_ring, first_self_crossing, segment_intersection, SelfCrossing};
pub use point::Point;
pub use polyline::{NearestPoint, Polyline};
pub use smooth::{chaikin, smooth_join};
pub use split::{
    clip_to_ring, join_ring_candidate, replace_open_span, resolve_reconnection, split_ring,
    Reconnection, RingPieces,
};

/// Default coincidence tolerance used when comparing coordinates.
pub const EPSILON: f64 = 1e-9;
