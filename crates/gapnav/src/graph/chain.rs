//! Convex-chain extraction.

use super::{Chain, ChainId, PolygonGraph, PolygonId};
use crate::error::Result;
use crate::geom::{orientation, Orientation};

/// Split every polygon cycle into maximal runs of locally convex vertices
/// and tag each member vertex with its chain id.
///
/// A vertex is convex iff `orientation(prev, v, next)` is CCW in the
/// normalized cycle. Runs are enumerated starting right after the first
/// reflex vertex of each cycle, so no run wraps. Chain ids are dense and
/// increase in polygon order.
pub fn convex_chains(graph: &mut PolygonGraph) -> Result<Vec<Chain>> {
    let mut chains = Vec::new();
    for pid in graph.polygon_ids().collect::<Vec<_>>() {
        for mut chain in polygon_chains(graph, pid)? {
            chain.id = ChainId(chains.len());
            for &v in &chain.vertices {
                graph.set_chain(v, chain.id);
            }
            chains.push(chain);
        }
    }
    Ok(chains)
}

fn polygon_chains(graph: &PolygonGraph, pid: PolygonId) -> Result<Vec<Chain>> {
    let rec = graph.polygon(pid);
    let n = rec.vertices.len();
    let mut convex = Vec::with_capacity(n);
    for &v in &rec.vertices {
        let prev = graph.require_prev(v)?;
        let next = graph.require_next(v)?;
        let o = orientation(graph.pos(prev), graph.pos(v), graph.pos(next));
        convex.push(o == Orientation::Ccw);
    }

    let Some(k) = convex.iter().position(|c| !c) else {
        return Ok(vec![Chain {
            id: ChainId(0),
            polygon: pid,
            vertices: rec.vertices.clone(),
            edges: rec.edges.clone(),
            start: None,
            end: None,
        }]);
    };

    let mut out = Vec::new();
    let mut run: Vec<usize> = Vec::new();
    for j in 1..=n {
        let i = (k + j) % n;
        if convex[i] {
            run.push(i);
            continue;
        }
        if run.is_empty() {
            continue;
        }
        let vertices: Vec<_> = run.iter().map(|&r| rec.vertices[r]).collect();
        // edges[r] joins member r to its successor, which is the next member
        let edges = run[..run.len() - 1].iter().map(|&r| rec.edges[r]).collect();
        out.push(Chain {
            id: ChainId(0),
            polygon: pid,
            start: vertices.first().copied(),
            end: vertices.last().copied(),
            vertices,
            edges,
        });
        run.clear();
    }
    Ok(out)
}
