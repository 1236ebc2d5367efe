//! Visibility structure over planar obstacles and online gap tracking.
//!
//! Pipeline
//! - `graph`: polygons → obstacle graph with normalized edge direction.
//! - `sweep`: rotational sweep for mutually visible, tangent vertex pairs.
//! - `curves`: convex chains and the three critical curve families
//!   (bitangent complements, inflection lines, extension lines).
//! - `sensor`: crossings of a path segment with those curves, ordered by distance.
//! - `tracker` + `robot`: gap inventory and identity automaton driven by events.
//!
//! `visgraph::VisGraph` ties the static part together; `robot::Robot` owns the
//! per-agent mutable state.

pub mod cfg;
pub mod curves;
pub mod error;
pub mod geom;
pub mod graph;
pub mod robot;
pub mod scene;
pub mod sensor;
pub mod sweep;
pub mod tracker;
pub mod visgraph;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};

/// Planar coordinate used across the crate.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::BuildCfg;
    pub use crate::curves::{CurveEdge, CurveFamily, CurveId, CurveSet};
    pub use crate::geom::{orientation, Orientation, Segment};
    pub use crate::graph::{ChainId, PolygonGraph, PolygonId, VertexId};
    pub use crate::robot::{Gap, GapId, Robot};
    pub use crate::sensor::{GapEvent, GapEventKind};
    pub use crate::visgraph::{Snapshot, VisGraph};
    pub use crate::{Error, Result, Vec2};
}
