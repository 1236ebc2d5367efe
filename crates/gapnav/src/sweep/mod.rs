//! Rotational visibility sweep.
//!
//! Purpose
//! - From a source point, report the obstacle vertices (and optional extra
//!   query points) that are visible AND tangent: at each end the sightline
//!   has both incident polygon edges on the same side.
//!
//! Algorithm
//! - Sort candidates by (polar angle, distance) around the source.
//! - Seed `OpenEdges` with the edges cut by the +X half line.
//! - Per candidate: drop CW incident edges, test the nearest open edge, reject
//!   chords through infeasible space and non-tangent ends, add CCW edges.
//!
//! Policy
//! - A candidate collinear with, and farther than, the previous candidate is
//!   never visible.
//! - `Scan::Half` stops once the angle passes π; running it from every vertex
//!   yields each unordered bitangent once.

mod open_edges;

use crate::geom::{angle, distance, edge_intersect, on_segment, orientation, Orientation};
use crate::graph::{PolygonGraph, PolygonId, VertexId};
use crate::Vec2;

pub use open_edges::OpenEdges;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scan {
    Full,
    Half,
}

/// A sweep candidate: obstacle vertex or free query point.
#[derive(Clone, Copy, Debug)]
struct Site {
    pos: Vec2,
    vid: Option<VertexId>,
}

impl Site {
    fn polygon(&self, graph: &PolygonGraph) -> Option<PolygonId> {
        self.vid.and_then(|v| graph.vertex(v).polygon)
    }
}

/// Points visible from `source` under the tangency rule.
///
/// `source` may be an obstacle vertex (matched by exact coordinates) or any
/// free point. `extra` points take part in the sweep as edge-less candidates.
pub fn visible_from(graph: &PolygonGraph, source: Vec2, extra: &[Vec2], scan: Scan) -> Vec<Vec2> {
    let src = Site {
        pos: source,
        vid: graph.vertex_at(source),
    };

    let mut sites: Vec<Site> = graph
        .vertex_ids()
        .map(|v| Site {
            pos: graph.pos(v),
            vid: Some(v),
        })
        .chain(extra.iter().map(|&pos| Site { pos, vid: None }))
        .collect();
    sites.sort_by(|a, b| {
        angle(source, a.pos)
            .total_cmp(&angle(source, b.pos))
            .then(distance(source, a.pos).total_cmp(&distance(source, b.pos)))
    });

    let far = graph.ray_end(source);
    let mut open = OpenEdges::new();
    for e in graph.edge_ids() {
        let seg = graph.segment(e);
        if seg.has_endpoint(source) || !edge_intersect(source, far, seg) {
            continue;
        }
        if on_segment(source, seg.p1, far) || on_segment(source, seg.p2, far) {
            continue;
        }
        open.insert(source, far, e, seg);
    }

    let mut visible = Vec::new();
    let mut prev: Option<Vec2> = None;
    for p in sites {
        if p.pos == source {
            continue;
        }
        if scan == Scan::Half && angle(source, p.pos) > std::f64::consts::PI {
            break;
        }
        let incident = p.vid.map_or(&[][..], |v| graph.incident(v));

        if !open.is_empty() {
            for &e in incident {
                let seg = graph.segment(e);
                if orientation(source, p.pos, seg.other(p.pos)) == Orientation::Cw {
                    open.delete(source, p.pos, e, seg);
                }
            }
        }

        let collinear_with_prev = prev.is_some_and(|q| {
            orientation(source, q, p.pos) == Orientation::Collinear && on_segment(source, q, p.pos)
        });
        let mut is_visible = !collinear_with_prev
            && open
                .smallest()
                .map_or(true, |nearest| !edge_intersect(source, p.pos, nearest));

        if is_visible && !adjacent(graph, &src, &p) {
            is_visible = !chord_infeasible(graph, &src, &p);
        }
        if is_visible {
            is_visible = tangent_at(graph, source, &p) && tangent_at(graph, p.pos, &src);
        }
        if is_visible {
            visible.push(p.pos);
        }

        for &e in incident {
            let seg = graph.segment(e);
            if !seg.has_endpoint(source)
                && orientation(source, p.pos, seg.other(p.pos)) == Orientation::Ccw
            {
                open.insert(source, p.pos, e, seg);
            }
        }
        prev = Some(p.pos);
    }
    visible
}

fn adjacent(graph: &PolygonGraph, a: &Site, b: &Site) -> bool {
    match (a.vid, b.vid) {
        (Some(x), Some(y)) => graph.adjacent(x).any(|w| w == y),
        _ => false,
    }
}

/// Chord between two vertices of the same polygon through its infeasible side.
fn chord_infeasible(graph: &PolygonGraph, a: &Site, b: &Site) -> bool {
    match (a.polygon(graph), b.polygon(graph)) {
        (Some(pa), Some(pb)) if pa == pb => graph.chord_infeasible(pa, a.pos, b.pos),
        _ => false,
    }
}

/// Both polygon edges at `at` lie on the same side of the line `from -> at`.
/// Sites without edges always pass.
fn tangent_at(graph: &PolygonGraph, from: Vec2, at: &Site) -> bool {
    let Some(v) = at.vid else {
        return true;
    };
    let mut sides = graph
        .adjacent(v)
        .map(|w| orientation(from, at.pos, graph.pos(w)));
    match (sides.next(), sides.next()) {
        (Some(s1), Some(s2)) => s1 == s2,
        _ => true,
    }
}
