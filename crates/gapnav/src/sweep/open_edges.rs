//! Edges currently cut by the sweep ray, nearest first.
//!
//! Kept as a sorted `Vec` with binary-search insert/delete. The order is only
//! valid relative to the ray the comparison was made with; callers insert and
//! delete against the current ray.

use crate::geom::{angle2, edge_intersect, point_edge_distance, Segment};
use crate::graph::EdgeId;
use crate::Vec2;

#[derive(Clone, Debug, Default)]
pub struct OpenEdges {
    items: Vec<(EdgeId, Segment)>,
}

impl OpenEdges {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nearest open edge along the current ray.
    #[inline]
    pub fn smallest(&self) -> Option<Segment> {
        self.items.first().map(|&(_, s)| s)
    }

    pub fn insert(&mut self, from: Vec2, through: Vec2, id: EdgeId, seg: Segment) {
        let i = self.index(from, through, id, seg);
        self.items.insert(i, (id, seg));
    }

    /// Remove `id` if it sits just before its own insertion index.
    pub fn delete(&mut self, from: Vec2, through: Vec2, id: EdgeId, seg: Segment) {
        let i = self.index(from, through, id, seg);
        if i > 0 && self.items[i - 1].0 == id {
            self.items.remove(i - 1);
        }
    }

    fn index(&self, from: Vec2, through: Vec2, id: EdgeId, seg: Segment) -> usize {
        let (mut lo, mut hi) = (0, self.items.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            let (mid_id, mid_seg) = self.items[mid];
            if less_than(from, through, (id, seg), (mid_id, mid_seg)) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }
}

/// Is `e1` nearer than `e2` along the ray `from -> through`?
///
/// An `e2` the ray does not reach counts as farther. Equal distances happen
/// at a shared endpoint; the smaller angle at `through` wins.
fn less_than(from: Vec2, through: Vec2, e1: (EdgeId, Segment), e2: (EdgeId, Segment)) -> bool {
    let ((id1, s1), (id2, s2)) = (e1, e2);
    if id1 == id2 {
        return false;
    }
    if !edge_intersect(from, through, s2) {
        return true;
    }
    let d1 = point_edge_distance(from, through, s1);
    let d2 = point_edge_distance(from, through, s2);
    if d1 != d2 {
        return d1 < d2;
    }
    let shared = if s2.has_endpoint(s1.p1) { s1.p1 } else { s1.p2 };
    angle2(from, through, s1.other(shared)) < angle2(from, through, s2.other(shared))
}
