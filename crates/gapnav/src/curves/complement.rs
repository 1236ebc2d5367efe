//! Bitangent complements.

use super::{CurveEdge, CurveFamily, CurveId, CurveSet};
use crate::error::{xy, Error, Result};
use crate::geom::{distance, intersect_point, on_segment, orientation, Orientation};
use crate::graph::{PolygonGraph, VertexId};
use crate::Vec2;

/// Extend each bitangent past both endpoints to the nearest obstacle edge.
///
/// The side of a complement is `orientation(hit, endpoint, next(endpoint))`.
/// A point obstacle has no cycle; its complement is tagged `Collinear` (it
/// occludes nothing, so crossing it changes no gap) but is still linked as the
/// dual of the other end, where it names the point for Split/Merge.
pub fn bitangent_complements(
    graph: &PolygonGraph,
    bitangents: &[(VertexId, VertexId)],
) -> Result<CurveSet> {
    let mut set = CurveSet::new(CurveFamily::Complement);
    for &(a, b) in bitangents {
        let (pa, pb) = (graph.pos(a), graph.pos(b));
        let (hit_a, hit_b) = backward_hits(graph, pa, pb);
        let hit_a = hit_a.ok_or(Error::NoForwardHit {
            from: xy(pb),
            through: xy(pa),
        })?;
        let hit_b = hit_b.ok_or(Error::NoForwardHit {
            from: xy(pa),
            through: xy(pb),
        })?;

        let ca = set.push(complement_at(graph, a, hit_a)?);
        let cb = set.push(complement_at(graph, b, hit_b)?);
        link(&mut set, ca, cb);
    }
    Ok(set)
}

fn link(set: &mut CurveSet, a: CurveId, b: CurveId) {
    set.set_dual(a, b);
    set.set_dual(b, a);
}

/// Nearest hits behind `pa` (away from `pb`) and behind `pb` (away from `pa`).
fn backward_hits(graph: &PolygonGraph, pa: Vec2, pb: Vec2) -> (Option<Vec2>, Option<Vec2>) {
    let dir = pb - pa;
    let mut best_a: Option<(f64, Vec2)> = None;
    let mut best_b: Option<(f64, Vec2)> = None;
    for e in graph.segments() {
        let Some(p) = intersect_point(pa, pb, e) else {
            continue;
        };
        if p == pa || p == pb || !on_segment(e.p1, p, e.p2) {
            continue;
        }
        if (p - pa).dot(&dir) < 0.0 {
            let d = distance(p, pa);
            if best_a.map_or(true, |(bd, _)| d < bd) {
                best_a = Some((d, p));
            }
        }
        if (p - pb).dot(&-dir) < 0.0 {
            let d = distance(p, pb);
            if best_b.map_or(true, |(bd, _)| d < bd) {
                best_b = Some((d, p));
            }
        }
    }
    (best_a.map(|(_, p)| p), best_b.map(|(_, p)| p))
}

fn complement_at(graph: &PolygonGraph, v: VertexId, hit: Vec2) -> Result<CurveEdge> {
    let p1 = graph.pos(v);
    let side = match graph.next_point(v) {
        None => Orientation::Collinear,
        Some(next) => {
            let side = orientation(hit, p1, graph.pos(next));
            if side == Orientation::Collinear {
                return Err(Error::CollinearComplement {
                    vertex: xy(p1),
                    hit: xy(hit),
                });
            }
            side
        }
    };
    Ok(CurveEdge {
        origin: v,
        p1,
        p2: hit,
        side,
        dual: None,
    })
}
