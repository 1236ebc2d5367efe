//! Agent state: gap inventory driven by sensor events.
//!
//! Purpose
//! - Hold the gaps seen from the agent's position and update them from the
//!   events of each path segment instead of re-running the visibility sweep.
//! - Forward every topology change to a `GapTracker` so identities survive
//!   Split/Merge round trips.
//!
//! Policy
//! - Nominal ids come from a counter and are never reused, also not after a
//!   gap disappears. `reset` starts a fresh counter and tracker.
//! - Directions are recomputed after every event and once more at the segment
//!   end; each must be a unit vector up to `cfg::UNIT_TOL`.
//! - Each event runs its lookups, its direction and the tracker transition
//!   before touching the inventory, so a failing event changes nothing. The
//!   move stops there; events already applied on that segment stay applied.

use serde::Serialize;
use tracing::debug;

use crate::cfg::UNIT_TOL;
use crate::curves::{CurveEdge, CurveFamily};
use crate::error::{xy, Error, Result};
use crate::geom::{orientation, Orientation, Segment};
use crate::graph::VertexId;
use crate::sensor::{gap_events, GapEvent};
use crate::tracker::{GapTracker, Transition};
use crate::visgraph::VisGraph;
use crate::Vec2;

pub use crate::tracker::GapId;

/// A gap the robot keeps track of.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Gap {
    pub id: GapId,
    pub vertex: VertexId,
    /// `+1`/`-1` for the side the occluded region lies on, `0` for point
    /// obstacles.
    pub side: i8,
    /// Unit vector from the robot towards `vertex`.
    pub dir: Vec2,
}

/// A gap as seen by a fresh visibility sweep (no id).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sighting {
    pub vertex: VertexId,
    pub side: i8,
    pub dir: Vec2,
}

#[derive(Clone, Debug)]
pub struct Robot<'a> {
    vg: &'a VisGraph,
    pos: Vec2,
    gaps: Vec<Gap>,
    next_id: u64,
    tracker: GapTracker,
}

impl<'a> Robot<'a> {
    /// Place a robot at `start` and seed its gaps from a full sweep.
    pub fn new(vg: &'a VisGraph, start: Vec2) -> Result<Self> {
        let mut robot = Self {
            vg,
            pos: start,
            gaps: Vec::new(),
            next_id: 0,
            tracker: GapTracker::default(),
        };
        robot.reset(start)?;
        Ok(robot)
    }

    /// Move to `start`, forget all ids and identities, re-detect.
    pub fn reset(&mut self, start: Vec2) -> Result<()> {
        self.pos = start;
        self.next_id = 0;
        let sightings = self.detect_gaps()?;
        let mut gaps = Vec::with_capacity(sightings.len());
        for s in sightings {
            gaps.push(Gap {
                id: self.fresh_id(),
                vertex: s.vertex,
                side: s.side,
                dir: s.dir,
            });
        }
        self.gaps = gaps;
        self.tracker = GapTracker::new(self.gaps.iter().map(|g| g.id))?;
        debug!(
            x = start.x,
            y = start.y,
            gaps = self.gaps.len(),
            "robot placed"
        );
        Ok(())
    }

    /// Gaps visible from the current position, by sweep. Does not touch the
    /// tracked inventory.
    pub fn detect_gaps(&self) -> Result<Vec<Sighting>> {
        let graph = self.vg.graph();
        self.vg
            .gap_vertices(self.pos)
            .into_iter()
            .map(|v| {
                let at = graph.pos(v);
                let side = graph
                    .next_point(v)
                    .map_or(0, |n| orientation(self.pos, at, graph.pos(n)).sign());
                Ok(Sighting {
                    vertex: v,
                    side,
                    dir: unit_towards(self.pos, at)?,
                })
            })
            .collect()
    }

    /// Walk `path` (which should start at the current position) and apply
    /// every crossing on the way. Returns the events in the order applied.
    pub fn move_along(&mut self, path: Segment) -> Result<Vec<GapEvent>> {
        let events = gap_events(self.vg, path)?;
        for ev in &events {
            self.apply(ev)?;
            self.pos = ev.pos();
            self.update_dirs()?;
        }
        self.pos = path.p2;
        self.update_dirs()?;
        Ok(events)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// Number of nominal ids handed out since the last reset.
    #[inline]
    pub fn ids_issued(&self) -> u64 {
        self.next_id
    }

    #[inline]
    pub fn tracker(&self) -> &GapTracker {
        &self.tracker
    }

    /// Identity carrying the nominal id `id`.
    pub fn identity_of(&self, id: GapId) -> GapId {
        self.tracker.resolve(id)
    }

    fn fresh_id(&mut self) -> GapId {
        let id = GapId(self.next_id);
        self.next_id += 1;
        id
    }

    fn apply(&mut self, ev: &GapEvent) -> Result<()> {
        let graph = self.vg.graph();
        debug!(kind = ?ev.kind(), x = ev.pos().x, y = ev.pos().y, "gap event");
        match *ev {
            GapEvent::Proceed(c) => {
                let v = c.curve.origin;
                let (from, to) = match c.curve.side {
                    Orientation::Ccw => (v, graph.require_next(v)?),
                    Orientation::Cw => (graph.require_prev(v)?, v),
                    Orientation::Collinear => return Err(sideless(&c.curve)),
                };
                let i = self.find_gap(from)?;
                self.gaps[i].vertex = to;
            }
            GapEvent::Retreat(c) => {
                let v = c.curve.origin;
                let (from, to) = match c.curve.side {
                    Orientation::Cw => (v, graph.require_prev(v)?),
                    Orientation::Ccw => (graph.require_next(v)?, v),
                    Orientation::Collinear => return Err(sideless(&c.curve)),
                };
                let i = self.find_gap(from)?;
                self.gaps[i].vertex = to;
            }
            GapEvent::Appear(c) => {
                let dir = unit_towards(c.curve.p2, c.curve.p1)?;
                let id = self.fresh_id();
                self.tracker.apply(Transition::Appear(id))?;
                self.gaps.push(Gap {
                    id,
                    vertex: c.curve.origin,
                    side: c.curve.side.sign(),
                    dir,
                });
            }
            GapEvent::Disappear(c) => {
                let i = self.find_gap(c.curve.origin)?;
                self.tracker.apply(Transition::Disappear(self.gaps[i].id))?;
                self.gaps.remove(i);
            }
            GapEvent::Split { at, dual } => {
                let i = self.find_gap(at.curve.origin)?;
                let parent = self.gaps[i].id;
                let dir = unit_towards(at.curve.p2, at.curve.p1)?;
                let id = self.fresh_id();
                self.tracker.apply(Transition::Split { gap: parent, new: id })?;
                self.gaps.push(Gap {
                    id,
                    vertex: dual.origin,
                    side: -dual.side.sign(),
                    dir,
                });
            }
            GapEvent::Merge { at, dual } => {
                let i = self.find_gap(at.curve.origin)?;
                let j = self.find_gap(dual.origin)?;
                self.tracker.apply(Transition::Merge {
                    gap: self.gaps[i].id,
                    merged: self.gaps[j].id,
                })?;
                self.gaps.remove(j);
            }
        }
        Ok(())
    }

    fn find_gap(&self, v: VertexId) -> Result<usize> {
        self.gaps
            .iter()
            .position(|g| g.vertex == v)
            .ok_or(Error::GapNotFound {
                vertex: xy(self.vg.graph().pos(v)),
            })
    }

    fn update_dirs(&mut self) -> Result<()> {
        let graph = self.vg.graph();
        for gap in &mut self.gaps {
            gap.dir = unit_towards(self.pos, graph.pos(gap.vertex))?;
        }
        Ok(())
    }
}

/// Normalized `to - from`; fails on coincident points.
fn unit_towards(from: Vec2, to: Vec2) -> Result<Vec2> {
    let d = to - from;
    let u = d / d.norm();
    let norm = u.norm();
    if (norm - 1.0).abs() < UNIT_TOL {
        Ok(u)
    } else {
        Err(Error::NonUnitDirection {
            vertex: xy(to),
            norm,
        })
    }
}

fn sideless(curve: &CurveEdge) -> Error {
    Error::SideProduct {
        family: CurveFamily::Extension,
        origin: xy(curve.p1),
        hit: xy(curve.p2),
        product: 0,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::cfg::BuildCfg;
    use crate::scene::{random_corridor_walk, random_scene, SceneCfg};
    use crate::sensor::GapEventKind;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    fn wall() -> Vec<Vec2> {
        vec![v(0.0, 0.0), v(100.0, 0.0), v(100.0, 100.0), v(0.0, 100.0)]
    }

    fn chevron() -> VisGraph {
        VisGraph::build(
            &[
                wall(),
                vec![v(40.0, 40.0), v(60.0, 50.0), v(40.0, 60.0), v(45.0, 50.0)],
            ],
            &BuildCfg::default(),
        )
        .unwrap()
    }

    /// (vertex, side) pairs, sorted.
    fn tracked(r: &Robot<'_>) -> Vec<(VertexId, i8)> {
        let mut out: Vec<_> = r.gaps().iter().map(|g| (g.vertex, g.side)).collect();
        out.sort();
        out
    }

    fn sighted(r: &Robot<'_>) -> Vec<(VertexId, i8)> {
        let mut out: Vec<_> = r
            .detect_gaps()
            .unwrap()
            .iter()
            .map(|s| (s.vertex, s.side))
            .collect();
        out.sort();
        out
    }

    fn ids(r: &Robot<'_>) -> Vec<GapId> {
        r.gaps().iter().map(|g| g.id).collect()
    }

    #[test]
    fn triangle_above_gives_two_opposite_gaps() {
        let vg = VisGraph::build(
            &[wall(), vec![v(40.0, 60.0), v(60.0, 60.0), v(50.0, 80.0)]],
            &BuildCfg::default(),
        )
        .unwrap();
        let r = Robot::new(&vg, v(50.0, 50.0)).unwrap();
        assert_eq!(r.gaps().len(), 2);
        assert_eq!(r.gaps()[0].side, -r.gaps()[1].side);
        assert_ne!(r.gaps()[0].side, 0);
        for g in r.gaps() {
            assert!((g.dir.norm() - 1.0).abs() < UNIT_TOL);
        }
        assert_eq!(ids(&r), vec![GapId(0), GapId(1)]);
        assert_eq!(r.tracker().live(), &[GapId(0), GapId(1)]);
    }

    #[test]
    fn inflection_crossing_adds_one_gap() {
        let vg = chevron();
        let mut r = Robot::new(&vg, v(20.0, 20.0)).unwrap();
        assert_eq!(r.gaps().len(), 2);
        let ev = r.move_along(Segment::new(v(20.0, 20.0), v(35.0, 20.0))).unwrap();
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].kind(), GapEventKind::Appear);
        assert_eq!(r.gaps().len(), 3);
        assert_eq!(r.gaps()[2].id, GapId(2));
        assert_eq!(r.pos(), v(35.0, 20.0));
        assert_eq!(tracked(&r), sighted(&r));
        assert_eq!(r.tracker().ring(GapId(2)).unwrap().to_string(), "(*) ||");
    }

    #[test]
    fn complement_crossing_splits_and_keeps_parent() {
        let vg = chevron();
        let mut r = Robot::new(&vg, v(45.0, 20.0)).unwrap();
        let before = ids(&r);
        let ev = r.move_along(Segment::new(v(45.0, 20.0), v(35.0, 20.0))).unwrap();
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].kind(), GapEventKind::Split);
        assert_eq!(r.gaps().len(), 3);
        for id in before {
            assert!(ids(&r).contains(&id));
        }
        assert_eq!(tracked(&r), sighted(&r));
    }

    #[test]
    fn split_then_reverse_merge_restores_gaps() {
        let vg = chevron();
        let mut r = Robot::new(&vg, v(45.0, 20.0)).unwrap();
        let before: Vec<_> = r.gaps().iter().map(|g| (g.id, g.vertex)).collect();
        r.move_along(Segment::new(v(45.0, 20.0), v(35.0, 20.0))).unwrap();
        let ev = r.move_along(Segment::new(v(35.0, 20.0), v(45.0, 20.0))).unwrap();
        assert_eq!(ev[0].kind(), GapEventKind::Merge);
        let after: Vec<_> = r.gaps().iter().map(|g| (g.id, g.vertex)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn resplit_recovers_merged_identity() {
        let vg = chevron();
        let mut r = Robot::new(&vg, v(45.0, 20.0)).unwrap();
        let out = Segment::new(v(45.0, 20.0), v(35.0, 20.0));
        let back = Segment::new(v(35.0, 20.0), v(45.0, 20.0));
        r.move_along(out).unwrap();
        r.move_along(back).unwrap();
        r.move_along(out).unwrap();
        // the third gap carries a new nominal id but the old identity
        let newest = r.gaps()[2].id;
        assert_eq!(newest, GapId(3));
        assert_eq!(r.identity_of(newest), GapId(2));
        assert_eq!(r.ids_issued(), 4);
    }

    #[test]
    fn walk_past_inflection_and_complement() {
        let vg = chevron();
        let mut stepwise = Robot::new(&vg, v(20.0, 20.0)).unwrap();
        stepwise
            .move_along(Segment::new(v(20.0, 20.0), v(35.0, 20.0)))
            .unwrap();
        stepwise
            .move_along(Segment::new(v(35.0, 20.0), v(45.0, 20.0)))
            .unwrap();
        assert_eq!(stepwise.gaps().len(), 2);
        assert_eq!(tracked(&stepwise), sighted(&stepwise));

        let mut direct = Robot::new(&vg, v(20.0, 20.0)).unwrap();
        let ev = direct
            .move_along(Segment::new(v(20.0, 20.0), v(45.0, 20.0)))
            .unwrap();
        let kinds: Vec<_> = ev.iter().map(GapEvent::kind).collect();
        assert_eq!(kinds, vec![GapEventKind::Appear, GapEventKind::Merge]);
        assert_eq!(tracked(&direct), tracked(&stepwise));
    }

    #[test]
    fn extension_crossing_slides_gap() {
        let vg = chevron();
        let mut r = Robot::new(&vg, v(80.0, 50.0)).unwrap();
        let before = ids(&r);
        let ev = r.move_along(Segment::new(v(80.0, 50.0), v(80.0, 70.0))).unwrap();
        assert!(ev.iter().all(GapEvent::is_tracking));
        assert_eq!(ids(&r), before);
        assert_eq!(tracked(&r), sighted(&r));

        r.move_along(Segment::new(v(80.0, 70.0), v(80.0, 50.0))).unwrap();
        assert_eq!(tracked(&r), sighted(&r));
    }

    #[test]
    fn horizontal_walk_matches_fresh_sweeps() {
        let vg = VisGraph::build(
            &[
                wall(),
                vec![v(40.0, 40.0), v(60.0, 40.0), v(50.0, 55.0)],
                vec![v(20.0, 70.0), v(30.0, 70.0), v(25.0, 80.0)],
            ],
            &BuildCfg::default(),
        )
        .unwrap();
        let mut r = Robot::new(&vg, v(90.0, 10.0)).unwrap();
        let ev = r.move_along(Segment::new(v(90.0, 10.0), v(10.0, 10.0))).unwrap();
        assert!(!ev.is_empty());
        assert_eq!(tracked(&r), sighted(&r));
    }

    #[test]
    fn point_obstacle_splits_off_and_merges_back() {
        let vg = VisGraph::build(
            &[
                wall(),
                vec![v(40.0, 40.0), v(60.0, 40.0), v(50.0, 55.0)],
                vec![v(50.0, 75.0)],
            ],
            &BuildCfg::default(),
        )
        .unwrap();
        let point = vg.graph().vertex_at(v(50.0, 75.0)).unwrap();
        let mut r = Robot::new(&vg, v(22.0, 10.0)).unwrap();
        assert!(tracked(&r).contains(&(point, 0)));

        let ev = r.move_along(Segment::new(v(22.0, 10.0), v(35.0, 10.0))).unwrap();
        let kinds: Vec<_> = ev.iter().map(GapEvent::kind).collect();
        assert_eq!(kinds, vec![GapEventKind::Merge]);
        assert!(r.gaps().iter().all(|g| g.vertex != point));
        assert_eq!(tracked(&r), sighted(&r));

        let ev = r.move_along(Segment::new(v(35.0, 10.0), v(22.0, 10.0))).unwrap();
        let kinds: Vec<_> = ev.iter().map(GapEvent::kind).collect();
        assert_eq!(kinds, vec![GapEventKind::Split]);
        assert!(tracked(&r).contains(&(point, 0)));
        assert_eq!(tracked(&r), sighted(&r));
    }

    #[test]
    fn failed_event_leaves_inventory_untouched() {
        let vg = chevron();
        // placed where the gap at (40,60) is hidden, then handed a merge with it
        let mut r = Robot::new(&vg, v(45.0, 20.0)).unwrap();
        let gaps = r.gaps().to_vec();
        let live = r.tracker().live().to_vec();
        let err = r
            .move_along(Segment::new(v(35.0, 20.0), v(45.0, 20.0)))
            .unwrap_err();
        assert!(matches!(err, Error::GapNotFound { vertex } if vertex == (40.0, 60.0)));
        assert_eq!(r.gaps(), gaps.as_slice());
        assert_eq!(r.tracker().live(), live.as_slice());
        assert_eq!(r.pos(), v(45.0, 20.0));
        assert_eq!(r.ids_issued(), 2);
    }

    #[test]
    fn sideless_extension_is_a_side_product_error() {
        let vg = chevron();
        let curve = CurveEdge {
            origin: vg.graph().vertex_at(v(60.0, 50.0)).unwrap(),
            p1: v(60.0, 50.0),
            p2: v(100.0, 70.0),
            side: Orientation::Collinear,
            dual: None,
        };
        let mut r = Robot::new(&vg, v(80.0, 50.0)).unwrap();
        let ev = GapEvent::Proceed(crate::sensor::Crossing {
            pos: v(80.0, 60.0),
            curve,
        });
        assert!(matches!(
            r.apply(&ev),
            Err(Error::SideProduct { product: 0, family: CurveFamily::Extension, .. })
        ));
    }

    #[test]
    fn reset_restarts_ids() {
        let vg = chevron();
        let mut r = Robot::new(&vg, v(20.0, 20.0)).unwrap();
        r.move_along(Segment::new(v(20.0, 20.0), v(35.0, 20.0))).unwrap();
        assert_eq!(r.ids_issued(), 3);
        r.reset(v(45.0, 20.0)).unwrap();
        assert_eq!(ids(&r), vec![GapId(0), GapId(1)]);
        assert_eq!(r.tracker().live(), &[GapId(0), GapId(1)]);
    }

    #[test]
    fn unit_towards_rejects_coincident_points() {
        assert!(unit_towards(v(1.0, 1.0), v(1.0, 4.0)).is_ok());
        assert!(matches!(
            unit_towards(v(1.0, 1.0), v(1.0, 1.0)),
            Err(Error::NonUnitDirection { .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn nominal_ids_stay_unique(seed in 0u64..10_000) {
            let cfg = SceneCfg::default();
            let vg = VisGraph::build(&random_scene(&cfg, seed), &BuildCfg::default()).unwrap();
            let walk = random_corridor_walk(&cfg, seed, 10);
            let mut r = Robot::new(&vg, walk[0]).unwrap();
            let mut seen: HashSet<GapId> = ids(&r).into_iter().collect();
            for w in walk.windows(2) {
                let issued = r.ids_issued();
                let prev: HashSet<GapId> = ids(&r).into_iter().collect();
                if r.move_along(Segment::new(w[0], w[1])).is_err() {
                    break;
                }
                let now = ids(&r);
                let distinct: HashSet<GapId> = now.iter().copied().collect();
                prop_assert_eq!(distinct.len(), now.len());
                for id in now {
                    prop_assert!(id.0 < r.ids_issued());
                    if !prev.contains(&id) {
                        prop_assert!(id.0 >= issued);
                        prop_assert!(!seen.contains(&id));
                    }
                    seen.insert(id);
                }
            }
        }
    }
}
