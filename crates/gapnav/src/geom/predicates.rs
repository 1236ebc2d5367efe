//! Orientation, intersection and angle predicates.

use std::f64::consts::PI;

use super::types::{Orientation, Segment};
use crate::cfg::{COLIN_SCALE, RAY_MARGIN};
use crate::Vec2;

/// Orientation of the triple `(a, b, c)`.
///
/// The cross product is scaled by `COLIN_SCALE` and truncated toward zero
/// before the sign test.
#[inline]
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> Orientation {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let area = (cross * COLIN_SCALE).trunc();
    if area > 0.0 {
        Orientation::Ccw
    } else if area < 0.0 {
        Orientation::Cw
    } else {
        Orientation::Collinear
    }
}

/// Bounding-box test: does `q` lie within the box spanned by `p` and `r`?
///
/// Only meaningful for (near-)collinear triples.
#[inline]
pub fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Closed segment intersection test of `p1 q1` against `edge`, collinear
/// overlaps included.
pub fn edge_intersect(p1: Vec2, q1: Vec2, edge: Segment) -> bool {
    let (p2, q2) = (edge.p1, edge.p2);
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// Strict crossing: both segments straddle each other's line.
///
/// Shared endpoints and touching do not count.
pub fn proper_cross(a: Vec2, b: Vec2, edge: Segment) -> bool {
    let o1 = orientation(a, b, edge.p1).sign();
    let o2 = orientation(a, b, edge.p2).sign();
    let o3 = orientation(edge.p1, edge.p2, a).sign();
    let o4 = orientation(edge.p1, edge.p2, b).sign();
    o1 * o2 < 0 && o3 * o4 < 0
}

/// Intersection of the infinite line through `p1, p2` with the line of `edge`.
///
/// Returns `p1` (resp. `p2`) exactly when it is an endpoint of `edge`, and
/// `None` for parallel lines. An axis-parallel line contributes its constant
/// coordinate unchanged, so the bounding-box tests in `edge_cross_point`
/// accept crossings of horizontal and vertical segments.
pub fn intersect_point(p1: Vec2, p2: Vec2, edge: Segment) -> Option<Vec2> {
    if edge.has_endpoint(p1) {
        return Some(p1);
    }
    if edge.has_endpoint(p2) {
        return Some(p2);
    }
    let (e1, e2) = (edge.p1, edge.p2);
    if e1.x == e2.x {
        if p1.x == p2.x {
            return None;
        }
        let pslope = (p1.y - p2.y) / (p1.x - p2.x);
        let x = e1.x;
        return Some(Vec2::new(x, pslope * (x - p1.x) + p1.y));
    }
    if p1.x == p2.x {
        let eslope = (e1.y - e2.y) / (e1.x - e2.x);
        let x = p1.x;
        return Some(Vec2::new(x, eslope * (x - e1.x) + e1.y));
    }

    let pslope = (p1.y - p2.y) / (p1.x - p2.x);
    let eslope = (e1.y - e2.y) / (e1.x - e2.x);
    if eslope == pslope {
        return None;
    }
    let x = (eslope * e1.x - pslope * p1.x + p1.y - e1.y) / (eslope - pslope);
    // a horizontal query line keeps its own y exactly
    let y = if pslope == 0.0 {
        p1.y
    } else {
        eslope * (x - e1.x) + e1.y
    };
    Some(Vec2::new(x, y))
}

/// Intersection point of two segments, if it lies within both.
pub fn edge_cross_point(a: Segment, b: Segment) -> Option<Vec2> {
    intersect_point(a.p1, a.p2, b)
        .filter(|&p| on_segment(a.p1, p, a.p2) && on_segment(b.p1, p, b.p2))
}

/// Distance from `p1` to where the line `p1 p2` meets `edge` (0 if parallel).
#[inline]
pub fn point_edge_distance(p1: Vec2, p2: Vec2, edge: Segment) -> f64 {
    intersect_point(p1, p2, edge).map_or(0.0, |ip| distance(p1, ip))
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (b - a).norm()
}

/// Unit vector from `c` towards `p`.
#[inline]
pub fn unit_vector(c: Vec2, p: Vec2) -> Vec2 {
    (p - c) / distance(c, p)
}

/// Polar angle of `p` around `center`, in `[0, 2π)`.
///
/// Axis-aligned directions return exact multiples of π/2.
pub fn angle(center: Vec2, p: Vec2) -> f64 {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    if dx == 0.0 {
        return if dy < 0.0 { PI * 1.5 } else { PI / 2.0 };
    }
    if dy == 0.0 {
        return if dx < 0.0 { PI } else { 0.0 };
    }
    let t = (dy / dx).atan();
    if dx < 0.0 {
        PI + t
    } else if dy < 0.0 {
        2.0 * PI + t
    } else {
        t
    }
}

/// Interior angle at `b` of the triangle `a b c`; the cosine is truncated the
/// same way as in `orientation`.
pub fn angle2(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let la = (c - b).norm_squared();
    let lb = (c - a).norm_squared();
    let lc = (b - a).norm_squared();
    let cos = (la + lc - lb) / (2.0 * la.sqrt() * lc.sqrt());
    ((cos * COLIN_SCALE).trunc() / COLIN_SCALE).clamp(-1.0, 1.0).acos()
}

/// Crossing-number containment test of `p` against a closed edge loop.
///
/// Casts a ray from `p` to just past the rightmost edge endpoint. An edge with
/// exactly one vertex on the ray counts when that vertex is to the right of
/// `p` and the edge's other end is above the ray; edges lying on the ray are
/// ignored.
pub fn polygon_crossing<I>(p: Vec2, edges: I) -> bool
where
    I: IntoIterator<Item = Segment>,
{
    let edges: Vec<Segment> = edges.into_iter().collect();
    let max_x = edges
        .iter()
        .fold(p.x, |m, e| m.max(e.p1.x).max(e.p2.x));
    let far = Vec2::new(max_x + RAY_MARGIN, p.y);
    let mut count = 0usize;
    for e in edges {
        if p.y < e.p1.y && p.y < e.p2.y {
            continue;
        }
        if p.y > e.p1.y && p.y > e.p2.y {
            continue;
        }
        if p.x > e.p1.x && p.x > e.p2.x {
            continue;
        }
        let c1 = orientation(p, e.p1, far) == Orientation::Collinear;
        let c2 = orientation(p, e.p2, far) == Orientation::Collinear;
        match (c1, c2) {
            (true, true) => {}
            (true, false) | (false, true) => {
                let (on_ray, other) = if c1 { (e.p1, e.p2) } else { (e.p2, e.p1) };
                if on_ray.x > p.x && other.y > p.y {
                    count += 1;
                }
            }
            (false, false) => {
                if edge_intersect(p, far, e) {
                    count += 1;
                }
            }
        }
    }
    count % 2 == 1
}
