//! Static visibility structure of a scene.
//!
//! `VisGraph::build` runs the whole static pipeline once:
//! polygons → obstacle graph → bitangents (half sweeps, optionally on a rayon
//! pool) → convex chains → complement, inflection and extension curves.
//! Everything is immutable afterwards; robots borrow it.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::cfg::BuildCfg;
use crate::curves::{
    bitangent_complements, extension_lines, inflection_lines, CurveFamily, CurveSet,
};
use crate::error::Result;
use crate::geom::Segment;
use crate::graph::{convex_chains, Chain, PolygonGraph, PolygonId, VertexId};
use crate::sweep::{visible_from, Scan};
use crate::Vec2;

#[derive(Clone, Debug)]
pub struct VisGraph {
    input: Vec<Vec<Vec2>>,
    graph: PolygonGraph,
    bitangents: Vec<(VertexId, VertexId)>,
    chains: Vec<Chain>,
    complements: CurveSet,
    inflections: CurveSet,
    extensions: CurveSet,
}

/// Serializable view of the static structure.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub version: &'static str,
    pub input: &'a [Vec<Vec2>],
    pub graph: &'a PolygonGraph,
    pub bitangents: Vec<[Vec2; 2]>,
    pub chains: &'a [Chain],
    pub complements: &'a CurveSet,
}

impl VisGraph {
    /// Build from polygons (wall first).
    pub fn build(polygons: &[Vec<Vec2>], cfg: &BuildCfg) -> Result<Self> {
        let mut graph = PolygonGraph::new(polygons);
        let bitangents = bitangent_pairs(&graph, cfg)?;
        let chains = convex_chains(&mut graph)?;
        let complements = bitangent_complements(&graph, &bitangents)?;
        let inflections = inflection_lines(&graph, &chains)?;
        let extensions = extension_lines(&graph, &chains)?;
        info!(
            vertices = graph.vertex_count(),
            polygons = graph.polygon_count(),
            bitangents = bitangents.len(),
            chains = chains.len(),
            complements = complements.len(),
            inflections = inflections.len(),
            extensions = extensions.len(),
            "visibility graph built"
        );
        Ok(Self {
            input: polygons.to_vec(),
            graph,
            bitangents,
            chains,
            complements,
            inflections,
            extensions,
        })
    }

    #[inline]
    pub fn graph(&self) -> &PolygonGraph {
        &self.graph
    }

    /// Unordered bitangent pairs, sorted, each once with the smaller id first.
    #[inline]
    pub fn bitangents(&self) -> &[(VertexId, VertexId)] {
        &self.bitangents
    }

    pub fn bitangent_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.bitangents
            .iter()
            .map(|&(a, b)| Segment::new(self.graph.pos(a), self.graph.pos(b)))
    }

    #[inline]
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn curves(&self, family: CurveFamily) -> &CurveSet {
        match family {
            CurveFamily::Complement => &self.complements,
            CurveFamily::Inflection => &self.inflections,
            CurveFamily::Extension => &self.extensions,
        }
    }

    /// Obstacle vertices tangent-visible from `point` (full sweep).
    pub fn find_bitangent(&self, point: Vec2) -> Vec<Vec2> {
        visible_from(&self.graph, point, &[], Scan::Full)
    }

    /// Like `find_bitangent`, also testing the given free points.
    pub fn find_bitangent_with(&self, point: Vec2, extra: &[Vec2]) -> Vec<Vec2> {
        visible_from(&self.graph, point, extra, Scan::Full)
    }

    /// Vertex ids of the points `find_bitangent` reports.
    pub fn gap_vertices(&self, point: Vec2) -> Vec<VertexId> {
        self.find_bitangent(point)
            .into_iter()
            .filter_map(|p| self.graph.vertex_at(p))
            .collect()
    }

    pub fn point_in_polygon(&self, p: Vec2) -> Option<PolygonId> {
        self.graph.point_in_polygon(p)
    }

    pub fn point_in_wall(&self, p: Vec2) -> bool {
        self.graph.point_in_wall(p)
    }

    pub fn point_valid(&self, p: Vec2) -> bool {
        self.graph.point_valid(p)
    }

    pub fn closest_point(&self, p: Vec2, polygon: PolygonId, length: f64) -> Option<Vec2> {
        self.graph.closest_point(p, polygon, length)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            version: crate::VERSION,
            input: &self.input,
            graph: &self.graph,
            bitangents: self.bitangent_segments().map(|s| [s.p1, s.p2]).collect(),
            chains: &self.chains,
            complements: &self.complements,
        }
    }

    /// One line per complement leaving a chain vertex:
    /// `chain_id,side,dual_chain_id,dual_side` (`-1` when the dual's origin is
    /// on no chain, e.g. a point obstacle).
    pub fn chain_adjacency_csv(&self) -> String {
        let mut out = String::new();
        for chain in &self.chains {
            for &v in &chain.vertices {
                for &cid in self.complements.at_vertex(v) {
                    let c = self.complements.get(cid);
                    let Some(dual) = c.dual.map(|d| self.complements.get(d)) else {
                        continue;
                    };
                    let dual_chain = self
                        .graph
                        .vertex(dual.origin)
                        .chain
                        .map_or(-1, |ch| ch.0 as i64);
                    // writing into a String cannot fail
                    let _ = writeln!(
                        out,
                        "{},{},{},{}",
                        chain.id.0,
                        c.side.sign(),
                        dual_chain,
                        dual.side.sign()
                    );
                }
            }
        }
        out
    }
}

/// Half sweeps from every vertex, in batches; merged into a sorted set so the
/// result does not depend on scheduling.
fn bitangent_pairs(graph: &PolygonGraph, cfg: &BuildCfg) -> Result<Vec<(VertexId, VertexId)>> {
    let ids: Vec<VertexId> = graph.vertex_ids().collect();
    let batches: Vec<&[VertexId]> = ids.chunks(cfg.batch_size.max(1)).collect();
    let sweep_batch = |batch: &&[VertexId]| -> Vec<(VertexId, VertexId)> {
        let mut pairs = Vec::new();
        for &v in batch.iter() {
            for w in visible_from(graph, graph.pos(v), &[], Scan::Half) {
                if let Some(w) = graph.vertex_at(w) {
                    pairs.push(if v < w { (v, w) } else { (w, v) });
                }
            }
        }
        pairs
    };

    let results: Vec<Vec<(VertexId, VertexId)>> = if cfg.workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cfg.workers)
            .build()?;
        debug!(workers = cfg.workers, batches = batches.len(), "parallel sweep");
        pool.install(|| batches.par_iter().map(sweep_batch).collect())
    } else {
        batches.iter().map(sweep_batch).collect()
    };
    let set: BTreeSet<_> = results.into_iter().flatten().collect();
    Ok(set.into_iter().collect())
}
