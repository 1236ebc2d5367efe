//! Geometry kernel: primitives and exact-ish predicates.
//!
//! Purpose
//! - One home for the orientation test and the segment/line intersection
//!   helpers that every later stage relies on.
//! - Orientation is sign-tested after scaling and truncation
//!   (`cfg::COLIN_SCALE`), so classification is deterministic rather than
//!   epsilon-fuzzy.
//!
//! Conventions
//! - Coordinates are `Vec2` (nalgebra). `Ccw` means a left turn in y-up terms.
//! - Intersections return exact endpoint coordinates when a query point is an
//!   endpoint of the edge; later stages compare points with `==`.

mod predicates;
mod types;

pub use predicates::{
    angle, angle2, distance, edge_cross_point, edge_intersect, intersect_point, on_segment,
    orientation, point_edge_distance, polygon_crossing, proper_cross, unit_vector,
};
pub use types::{Orientation, PointKey, Segment};
