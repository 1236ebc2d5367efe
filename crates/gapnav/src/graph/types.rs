//! Arena ids and records of the obstacle graph.

use serde::Serialize;

use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VertexId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

/// Polygon id; `PolygonId(0)` is the bounding wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PolygonId(pub usize);

impl PolygonId {
    pub const WALL: PolygonId = PolygonId(0);

    #[inline]
    pub fn is_wall(self) -> bool {
        self == Self::WALL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChainId(pub usize);

/// Obstacle vertex. Isolated point obstacles have no polygon.
#[derive(Clone, Debug, Serialize)]
pub struct Vertex {
    pub pos: Vec2,
    pub polygon: Option<PolygonId>,
    pub chain: Option<ChainId>,
}

/// Directed polygon edge after winding normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PolyEdge {
    pub from: VertexId,
    pub to: VertexId,
    pub polygon: PolygonId,
}

impl PolyEdge {
    /// Endpoint opposite to `v`.
    #[inline]
    pub fn other(&self, v: VertexId) -> VertexId {
        if v == self.from {
            self.to
        } else {
            self.from
        }
    }

    #[inline]
    pub fn touches(&self, v: VertexId) -> bool {
        self.from == v || self.to == v
    }
}

/// Vertex cycle of one polygon in normalized edge order: `edges[i]` runs from
/// `vertices[i]` to `vertices[(i + 1) % n]`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PolygonRec {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
}

/// Maximal run of locally convex vertices on one polygon cycle.
#[derive(Clone, Debug, Serialize)]
pub struct Chain {
    pub id: ChainId,
    pub polygon: PolygonId,
    /// Members in cycle order (from `start` when present).
    pub vertices: Vec<VertexId>,
    /// Polygon edges joining consecutive members.
    pub edges: Vec<EdgeId>,
    /// `None` when the chain covers the whole polygon.
    pub start: Option<VertexId>,
    pub end: Option<VertexId>,
}

impl Chain {
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.start.is_none()
    }
}
