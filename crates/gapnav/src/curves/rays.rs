//! Forward ray casting plus the inflection and extension families.

use super::{CurveEdge, CurveFamily, CurveSet};
use crate::error::{xy, Error, Result};
use crate::geom::{distance, intersect_point, on_segment, Orientation};
use crate::graph::{Chain, PolygonGraph, VertexId};
use crate::Vec2;

/// Nearest point where the ray leaving `through`, in direction
/// `through - from`, meets an obstacle edge.
///
/// Hits at `from` or `through` themselves are ignored.
pub fn forward_hit(graph: &PolygonGraph, from: Vec2, through: Vec2) -> Result<Vec2> {
    let dir = through - from;
    let mut best: Option<(f64, Vec2)> = None;
    for e in graph.segments() {
        let Some(p) = intersect_point(from, through, e) else {
            continue;
        };
        if p == from || p == through || !on_segment(e.p1, p, e.p2) {
            continue;
        }
        if (p - through).dot(&dir) <= 0.0 {
            continue;
        }
        let d = distance(p, through);
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, p));
        }
    }
    best.map(|(_, p)| p).ok_or(Error::NoForwardHit {
        from: xy(from),
        through: xy(through),
    })
}

fn cast(
    graph: &PolygonGraph,
    from: VertexId,
    through: VertexId,
    side: Orientation,
) -> Result<CurveEdge> {
    let p1 = graph.pos(through);
    let p2 = forward_hit(graph, graph.pos(from), p1)?;
    Ok(CurveEdge {
        origin: through,
        p1,
        p2,
        side,
        dual: None,
    })
}

/// Rays continuing the edge into each open chain's start and out of its end.
pub fn inflection_lines(graph: &PolygonGraph, chains: &[Chain]) -> Result<CurveSet> {
    let mut set = CurveSet::new(CurveFamily::Inflection);
    for chain in chains {
        let (Some(start), Some(end)) = (chain.start, chain.end) else {
            continue;
        };
        let before = graph.require_prev(start)?;
        set.push(cast(graph, before, start, Orientation::Cw)?);
        let after = graph.require_next(end)?;
        set.push(cast(graph, after, end, Orientation::Ccw)?);
    }
    Ok(set)
}

/// Rays continuing every chain edge past both of its endpoints.
pub fn extension_lines(graph: &PolygonGraph, chains: &[Chain]) -> Result<CurveSet> {
    let mut set = CurveSet::new(CurveFamily::Extension);
    for chain in chains {
        for &e in &chain.edges {
            let pe = graph.edge(e);
            set.push(cast(graph, pe.from, pe.to, Orientation::Cw)?);
            set.push(cast(graph, pe.to, pe.from, Orientation::Ccw)?);
        }
    }
    Ok(set)
}
