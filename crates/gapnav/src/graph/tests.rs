use super::*;
use crate::geom::{orientation, polygon_crossing, Orientation};

fn v(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

fn wall() -> Vec<Vec2> {
    vec![v(0.0, 0.0), v(100.0, 0.0), v(100.0, 100.0), v(0.0, 100.0)]
}

fn chevron() -> Vec<Vec2> {
    vec![v(40.0, 40.0), v(60.0, 50.0), v(40.0, 60.0), v(45.0, 50.0)]
}

fn right_probe(s: Segment) -> Vec2 {
    let d = (s.p2 - s.p1).normalize() * 1e-3;
    s.midpoint() + Vec2::new(d.y, -d.x)
}

#[test]
fn winding_is_normalized_for_both_input_orientations() {
    let cw_triangle = vec![v(50.0, 80.0), v(60.0, 60.0), v(40.0, 60.0)];
    let ccw_triangle = vec![v(20.0, 20.0), v(30.0, 20.0), v(25.0, 30.0)];
    // wall given clockwise this time
    let mut cw_wall = wall();
    cw_wall.reverse();
    for w in [wall(), cw_wall] {
        let g = PolygonGraph::new(&[w, cw_triangle.clone(), ccw_triangle.clone(), chevron()]);
        assert_eq!(g.polygon_count(), 4);
        for pid in g.polygon_ids() {
            for s in g.polygon_segments(pid) {
                let inside = polygon_crossing(right_probe(s), g.polygon_segments(pid));
                assert_eq!(inside, pid.is_wall(), "polygon {pid:?} edge {s:?}");
            }
        }
    }
}

#[test]
fn closing_vertex_dropped_and_degenerate_polygons_handled() {
    let mut closed = wall();
    closed.push(v(0.0, 0.0));
    let g = PolygonGraph::new(&[
        closed,
        vec![v(10.0, 10.0), v(20.0, 10.0)],
        vec![v(70.0, 70.0)],
        vec![v(40.0, 60.0), v(60.0, 60.0), v(50.0, 80.0), v(40.0, 60.0)],
    ]);
    // wall + triangle; the segment is skipped and the point carries no polygon
    assert_eq!(g.polygon_count(), 2);
    assert_eq!(g.polygon(PolygonId::WALL).vertices.len(), 4);
    assert_eq!(g.polygon(PolygonId(1)).vertices.len(), 3);
    assert_eq!(g.vertex_count(), 8);
    let point = g.vertex_at(v(70.0, 70.0)).unwrap();
    assert!(g.vertex(point).polygon.is_none());
    assert!(g.incident(point).is_empty());
    assert!(g.next_point(point).is_none());
    assert!(matches!(
        g.require_next(point),
        Err(crate::Error::MissingNeighbor { which: "next", vertex }) if vertex == (70.0, 70.0)
    ));
    assert!(matches!(
        g.require_prev(point),
        Err(crate::Error::MissingNeighbor { which: "previous", .. })
    ));
    assert!(g.vertex_at(v(10.0, 10.0)).is_none());
}

#[test]
fn next_and_prev_follow_normalized_cycle() {
    let g = PolygonGraph::new(&[wall(), chevron()]);
    for v_id in g.vertex_ids() {
        let n = g.next_point(v_id).unwrap();
        let p = g.prev_point(v_id).unwrap();
        assert_eq!(g.prev_point(n), Some(v_id));
        assert_eq!(g.next_point(p), Some(v_id));
        assert_eq!(g.incident(v_id).len(), 2);
        let mut adj: Vec<_> = g.adjacent(v_id).collect();
        adj.sort();
        let mut expect = vec![n, p];
        expect.sort();
        assert_eq!(adj, expect);
    }
    // the chevron is counter-clockwise on input and stays that way
    let a = g.vertex_at(v(40.0, 40.0)).unwrap();
    assert_eq!(g.pos(g.next_point(a).unwrap()), v(60.0, 50.0));
    // the wall is walked clockwise
    let origin = g.vertex_at(v(0.0, 0.0)).unwrap();
    assert_eq!(g.pos(g.next_point(origin).unwrap()), v(0.0, 100.0));
}

#[test]
fn chevron_has_one_open_chain_and_wall_none() {
    let mut g = PolygonGraph::new(&[wall(), chevron()]);
    let chains = convex_chains(&mut g).unwrap();
    assert_eq!(chains.len(), 1);
    let c = &chains[0];
    let pts: Vec<_> = c.vertices.iter().map(|&x| g.pos(x)).collect();
    assert_eq!(pts, vec![v(40.0, 40.0), v(60.0, 50.0), v(40.0, 60.0)]);
    assert_eq!(c.start.map(|x| g.pos(x)), Some(v(40.0, 40.0)));
    assert_eq!(c.end.map(|x| g.pos(x)), Some(v(40.0, 60.0)));
    assert_eq!(c.edges.len(), 2);
    assert!(!c.is_closed());
    let reflex = g.vertex_at(v(45.0, 50.0)).unwrap();
    assert!(g.vertex(reflex).chain.is_none());
    for &m in &c.vertices {
        assert_eq!(g.vertex(m).chain, Some(c.id));
        let o = orientation(
            g.pos(g.prev_point(m).unwrap()),
            g.pos(m),
            g.pos(g.next_point(m).unwrap()),
        );
        assert_eq!(o, Orientation::Ccw);
    }
}

#[test]
fn convex_polygon_is_one_closed_chain() {
    let tri = vec![v(40.0, 60.0), v(60.0, 60.0), v(50.0, 80.0)];
    let mut g = PolygonGraph::new(&[wall(), tri]);
    let chains = convex_chains(&mut g).unwrap();
    assert_eq!(chains.len(), 1);
    assert!(chains[0].is_closed());
    assert_eq!(chains[0].vertices.len(), 3);
    assert_eq!(chains[0].edges.len(), 3);
}

#[test]
fn free_space_queries() {
    let tri = vec![v(40.0, 60.0), v(60.0, 60.0), v(50.0, 80.0)];
    let g = PolygonGraph::new(&[wall(), tri]);
    assert_eq!(g.point_in_polygon(v(50.0, 65.0)), Some(PolygonId::WALL));
    assert!(g.point_in_wall(v(50.0, 50.0)));
    assert!(!g.point_in_wall(v(150.0, 50.0)));
    assert!(g.point_valid(v(50.0, 50.0)));
    assert!(!g.point_valid(v(50.0, 65.0)));
    assert!(!g.point_valid(v(-5.0, 50.0)));

    let out = g.closest_point(v(50.0, 62.0), PolygonId(1), 0.5).unwrap();
    assert!((out - v(50.0, 59.5)).norm() < 1e-9);
    assert!(g.point_valid(out));

    assert!(g.segment_blocked(Segment::new(v(50.0, 50.0), v(50.0, 90.0))));
    assert!(!g.segment_blocked(Segment::new(v(20.0, 20.0), v(80.0, 20.0))));
    assert!(g.segment_blocked(Segment::new(v(50.0, 50.0), v(150.0, 50.0))));
}

#[test]
fn chord_infeasible_uses_wall_exterior() {
    let g = PolygonGraph::new(&[wall()]);
    assert!(!g.chord_infeasible(PolygonId::WALL, v(0.0, 0.0), v(100.0, 100.0)));
    let concave = vec![
        v(0.0, 0.0),
        v(100.0, 0.0),
        v(100.0, 100.0),
        v(50.0, 40.0),
        v(0.0, 100.0),
    ];
    let g = PolygonGraph::new(&[concave]);
    assert!(g.chord_infeasible(PolygonId::WALL, v(100.0, 100.0), v(0.0, 100.0)));
}
