//! Obstacle graph: polygons, incidence and winding normalization.
//!
//! Purpose
//! - Ingest the raw polygon list (wall first) into an arena of vertices and
//!   directed edges with per-vertex incidence.
//! - Normalize winding so that, in y-up terms, obstacle interiors lie to the
//!   left of each directed edge and the wall interior lies to the right of
//!   each wall edge. Equivalently: walking an edge, infeasible space is on
//!   the right (screen coordinates).
//!
//! Policy
//! - A repeated closing vertex is dropped silently.
//! - 2-vertex polygons are skipped with a warning.
//! - 1-vertex polygons become isolated point obstacles (no edges, no polygon id).
//! - Polygon ids count only polygons with three or more vertices.

mod chain;
mod types;

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::cfg::{RAY_MARGIN, WINDING_PROBE};
use crate::error::{xy, Error, Result};
use crate::geom::{polygon_crossing, proper_cross, unit_vector, PointKey, Segment};
use crate::Vec2;

pub use chain::convex_chains;
pub use types::{Chain, ChainId, EdgeId, PolyEdge, PolygonId, PolygonRec, Vertex, VertexId};

/// Arena of obstacle vertices and directed polygon edges.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PolygonGraph {
    vertices: Vec<Vertex>,
    edges: Vec<PolyEdge>,
    #[serde(skip)]
    incident: Vec<Vec<EdgeId>>,
    polygons: Vec<PolygonRec>,
    #[serde(skip)]
    index: HashMap<PointKey, VertexId>,
    /// Largest vertex x coordinate (0 for an empty graph).
    #[serde(skip)]
    max_x: f64,
}

impl PolygonGraph {
    /// Build from a polygon list whose first entry is the bounding wall.
    pub fn new(polygons: &[Vec<Vec2>]) -> Self {
        let mut g = PolygonGraph::default();
        for (input_idx, raw) in polygons.iter().enumerate() {
            let mut pts: Vec<Vec2> = raw.clone();
            while pts.len() > 1 && pts.first() == pts.last() {
                pts.pop();
            }
            match pts.len() {
                0 => warn!(polygon = input_idx, "empty polygon skipped"),
                1 => {
                    g.push_vertex(pts[0], None);
                }
                2 => warn!(
                    polygon = input_idx,
                    "polygon with two vertices is not a polygon; skipped"
                ),
                _ => g.push_polygon(pts),
            }
        }
        g
    }

    fn push_vertex(&mut self, pos: Vec2, polygon: Option<PolygonId>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            pos,
            polygon,
            chain: None,
        });
        self.incident.push(Vec::new());
        self.max_x = self.max_x.max(pos.x);
        if self.index.insert(PointKey::of(pos), id).is_some() {
            warn!(x = pos.x, y = pos.y, "duplicate vertex coordinates");
        }
        id
    }

    fn push_polygon(&mut self, mut pts: Vec<Vec2>) {
        let pid = PolygonId(self.polygons.len());
        if needs_reversal(&pts, pid) {
            // keep the first vertex in place, walk the cycle the other way
            pts[1..].reverse();
        }
        let n = pts.len();
        let vids: Vec<VertexId> = pts.iter().map(|&p| self.push_vertex(p, Some(pid))).collect();
        let mut eids = Vec::with_capacity(n);
        for i in 0..n {
            let e = EdgeId(self.edges.len());
            let (from, to) = (vids[i], vids[(i + 1) % n]);
            self.edges.push(PolyEdge {
                from,
                to,
                polygon: pid,
            });
            self.incident[from.0].push(e);
            self.incident[to.0].push(e);
            eids.push(e);
        }
        self.polygons.push(PolygonRec {
            vertices: vids,
            edges: eids,
        });
    }

    // ---- arena access ----

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.0]
    }

    #[inline]
    pub fn pos(&self, v: VertexId) -> Vec2 {
        self.vertices[v.0].pos
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &PolyEdge {
        &self.edges[e.0]
    }

    #[inline]
    pub fn segment(&self, e: EdgeId) -> Segment {
        let pe = &self.edges[e.0];
        Segment::new(self.pos(pe.from), self.pos(pe.to))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    /// All directed obstacle edges as segments.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.edge_ids().map(|e| self.segment(e))
    }

    /// Edges incident to `v` (0 for point obstacles, otherwise 2).
    #[inline]
    pub fn incident(&self, v: VertexId) -> &[EdgeId] {
        &self.incident[v.0]
    }

    pub fn adjacent(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incident[v.0].iter().map(move |&e| self.edges[e.0].other(v))
    }

    /// End of the "+X" half line from `from`: right of every vertex and of
    /// `from` itself.
    #[inline]
    pub fn ray_end(&self, from: Vec2) -> Vec2 {
        Vec2::new(self.max_x.max(from.x) + RAY_MARGIN, from.y)
    }

    /// Exact-coordinate lookup.
    #[inline]
    pub fn vertex_at(&self, p: Vec2) -> Option<VertexId> {
        self.index.get(&PointKey::of(p)).copied()
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygon_ids(&self) -> impl Iterator<Item = PolygonId> {
        (0..self.polygons.len()).map(PolygonId)
    }

    #[inline]
    pub fn polygon(&self, pid: PolygonId) -> &PolygonRec {
        &self.polygons[pid.0]
    }

    pub fn polygon_segments(&self, pid: PolygonId) -> impl Iterator<Item = Segment> + '_ {
        self.polygons[pid.0].edges.iter().map(|&e| self.segment(e))
    }

    pub(crate) fn set_chain(&mut self, v: VertexId, chain: ChainId) {
        self.vertices[v.0].chain = Some(chain);
    }

    // ---- cycle navigation ----

    /// Successor of `v` along its normalized polygon cycle.
    pub fn next_point(&self, v: VertexId) -> Option<VertexId> {
        self.incident[v.0]
            .iter()
            .map(|&e| self.edges[e.0])
            .find(|pe| pe.from == v)
            .map(|pe| pe.to)
    }

    /// Predecessor of `v` along its normalized polygon cycle.
    pub fn prev_point(&self, v: VertexId) -> Option<VertexId> {
        self.incident[v.0]
            .iter()
            .map(|&e| self.edges[e.0])
            .find(|pe| pe.to == v)
            .map(|pe| pe.from)
    }

    pub fn require_next(&self, v: VertexId) -> Result<VertexId> {
        self.next_point(v).ok_or(Error::MissingNeighbor {
            vertex: xy(self.pos(v)),
            which: "next",
        })
    }

    pub fn require_prev(&self, v: VertexId) -> Result<VertexId> {
        self.prev_point(v).ok_or(Error::MissingNeighbor {
            vertex: xy(self.pos(v)),
            which: "previous",
        })
    }

    // ---- free-space queries ----

    /// True if the midpoint of `a b` lies in the infeasible part of polygon
    /// `pid` (interior for obstacles, exterior for the wall).
    pub fn chord_infeasible(&self, pid: PolygonId, a: Vec2, b: Vec2) -> bool {
        let inside = polygon_crossing((a + b) * 0.5, self.polygon_segments(pid));
        inside != pid.is_wall()
    }

    /// First polygon (wall included) whose interior contains `p`.
    pub fn point_in_polygon(&self, p: Vec2) -> Option<PolygonId> {
        self.polygon_ids()
            .find(|&pid| polygon_crossing(p, self.polygon_segments(pid)))
    }

    pub fn point_in_wall(&self, p: Vec2) -> bool {
        self.polygon_count() > 0 && polygon_crossing(p, self.polygon_segments(PolygonId::WALL))
    }

    /// Inside the wall and outside every obstacle.
    pub fn point_valid(&self, p: Vec2) -> bool {
        self.polygon_ids().all(|pid| {
            let inside = polygon_crossing(p, self.polygon_segments(pid));
            inside == pid.is_wall()
        })
    }

    /// Closest point to `p` that lies `length` beyond the boundary of `pid`.
    ///
    /// Meant for points inside the polygon: the nearest boundary point is found
    /// by clamped projection onto each edge, then pushed outward. At a corner
    /// the push follows the bisector of the two incident edges.
    pub fn closest_point(&self, p: Vec2, pid: PolygonId, length: f64) -> Option<Vec2> {
        let rec = self.polygons.get(pid.0)?;
        let mut best: Option<(f64, Vec2, EdgeId)> = None;
        for &e in &rec.edges {
            let s = self.segment(e);
            let d = s.p2 - s.p1;
            let u = (p - s.p1).dot(&d) / d.norm_squared();
            let pc = if u < 0.0 {
                s.p1
            } else if u > 1.0 {
                s.p2
            } else {
                s.p1 + d * u
            };
            let dist = (p - pc).norm();
            if best.map_or(true, |(bd, _, _)| dist < bd) {
                best = Some((dist, pc, e));
            }
        }
        let (_, close, e) = best?;
        let pe = self.edges[e.0];
        let corner = [pe.from, pe.to].into_iter().find(|&v| self.pos(v) == close);
        match corner {
            Some(c) => {
                let cpos = self.pos(c);
                let mut dirs = self.adjacent(c).map(|w| unit_vector(cpos, self.pos(w)));
                let (v1, v2) = (dirs.next()?, dirs.next()?);
                let bisector = (v1 + v2).normalize();
                let out1 = cpos + bisector * length;
                let out2 = cpos - bisector * length;
                let outside = |q: Vec2| {
                    polygon_crossing(q, self.polygon_segments(pid)) == pid.is_wall()
                };
                Some(if outside(out1) { out1 } else { out2 })
            }
            None => Some(close + unit_vector(p, close) * length),
        }
    }

    /// True if `seg` properly crosses an obstacle or wall edge, or its
    /// midpoint is not in free space.
    pub fn segment_blocked(&self, seg: Segment) -> bool {
        self.segments().any(|e| proper_cross(seg.p1, seg.p2, e))
            || !self.point_valid(seg.midpoint())
    }
}

/// Reversal decision for a raw cycle: probe just right (y-up) of the first
/// edge; an interior probe means the cycle must be walked the other way. The
/// wall is flipped once more.
fn needs_reversal(pts: &[Vec2], pid: PolygonId) -> bool {
    let n = pts.len();
    let (a, b) = (pts[0], pts[1]);
    let d = (b - a) / (b - a).norm() * WINDING_PROBE;
    let probe = (a + b) * 0.5 + Vec2::new(d.y, -d.x);
    let edges = (0..n).map(|i| Segment::new(pts[i], pts[(i + 1) % n]));
    polygon_crossing(probe, edges) != pid.is_wall()
}

#[cfg(test)]
mod tests;
