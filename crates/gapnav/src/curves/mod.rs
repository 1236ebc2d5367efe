//! Critical curves: bitangent complements, inflection lines, extension lines.
//!
//! Purpose
//! - Each curve is a directed segment from an obstacle vertex to the first
//!   obstacle edge hit by a ray, tagged with a side. An agent crossing a curve
//!   sees a topological change of its gaps; the family and the crossing
//!   direction decide which one.
//!
//! Families
//! - `Complement`: continuation of a bitangent past each endpoint. The two
//!   complements of one bitangent are each other's `dual`.
//! - `Inflection`: continuation of the polygon edge entering a chain's start
//!   (side CW) and of the edge leaving its end (side CCW).
//! - `Extension`: continuation of each chain edge past both endpoints
//!   (side CW past the head, CCW past the tail).

mod complement;
mod rays;

use std::collections::HashMap;

use serde::Serialize;

use crate::geom::{Orientation, Segment};
use crate::graph::VertexId;
use crate::Vec2;

pub use complement::bitangent_complements;
pub use rays::{extension_lines, forward_hit, inflection_lines};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CurveFamily {
    Complement,
    Inflection,
    Extension,
}

/// Index into one `CurveSet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CurveId(pub usize);

#[derive(Clone, Copy, Debug, Serialize)]
pub struct CurveEdge {
    /// Obstacle vertex the curve leaves from; `p1` is its position.
    pub origin: VertexId,
    pub p1: Vec2,
    /// First obstacle hit.
    pub p2: Vec2,
    pub side: Orientation,
    /// Complement of the other bitangent endpoint (same set).
    pub dual: Option<CurveId>,
}

impl CurveEdge {
    #[inline]
    pub fn segment(&self) -> Segment {
        Segment::new(self.p1, self.p2)
    }
}

/// Curves of one family with a per-origin index.
#[derive(Clone, Debug, Serialize)]
pub struct CurveSet {
    pub family: CurveFamily,
    edges: Vec<CurveEdge>,
    #[serde(skip)]
    by_origin: HashMap<VertexId, Vec<CurveId>>,
}

impl CurveSet {
    pub fn new(family: CurveFamily) -> Self {
        Self {
            family,
            edges: Vec::new(),
            by_origin: HashMap::new(),
        }
    }

    pub fn push(&mut self, edge: CurveEdge) -> CurveId {
        let id = CurveId(self.edges.len());
        self.by_origin.entry(edge.origin).or_default().push(id);
        self.edges.push(edge);
        id
    }

    #[inline]
    pub fn get(&self, id: CurveId) -> &CurveEdge {
        &self.edges[id.0]
    }

    pub(crate) fn set_dual(&mut self, id: CurveId, dual: CurveId) {
        self.edges[id.0].dual = Some(dual);
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &CurveEdge)> + '_ {
        self.edges.iter().enumerate().map(|(i, e)| (CurveId(i), e))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Curves leaving from `v`.
    pub fn at_vertex(&self, v: VertexId) -> &[CurveId] {
        self.by_origin.get(&v).map_or(&[], Vec::as_slice)
    }
}
