//! Gap sensor: crossings of a path segment with the critical curves.
//!
//! Classification by the side `s` of the segment start relative to the curve
//! (see `crossing_sign`):
//! - complement: `s · side = +1` Merge, `-1` Split;
//! - inflection: `s · side = +1` Appear, `-1` Disappear;
//! - extension: `s = -1` Proceed, `s = +1` Retreat.
//! Anything else is an error. Crossings exactly at the segment end are left
//! for the next segment. A complement hanging off a point obstacle (side 0)
//! hides nothing behind the point and is never reported.

use serde::Serialize;

use crate::curves::{CurveEdge, CurveFamily, CurveSet};
use crate::error::{xy, Error, Result};
use crate::geom::{distance, edge_cross_point, orientation, Orientation, Segment};
use crate::visgraph::VisGraph;
use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GapEventKind {
    Appear,
    Disappear,
    Split,
    Merge,
    Proceed,
    Retreat,
}

/// Where a path segment meets a curve.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Crossing {
    pub pos: Vec2,
    pub curve: CurveEdge,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub enum GapEvent {
    Appear(Crossing),
    Disappear(Crossing),
    /// `dual` is the complement at the other end of the bitangent.
    Split { at: Crossing, dual: CurveEdge },
    Merge { at: Crossing, dual: CurveEdge },
    Proceed(Crossing),
    Retreat(Crossing),
}

impl GapEvent {
    pub fn kind(&self) -> GapEventKind {
        match self {
            GapEvent::Appear(_) => GapEventKind::Appear,
            GapEvent::Disappear(_) => GapEventKind::Disappear,
            GapEvent::Split { .. } => GapEventKind::Split,
            GapEvent::Merge { .. } => GapEventKind::Merge,
            GapEvent::Proceed(_) => GapEventKind::Proceed,
            GapEvent::Retreat(_) => GapEventKind::Retreat,
        }
    }

    pub fn crossing(&self) -> &Crossing {
        match self {
            GapEvent::Appear(c)
            | GapEvent::Disappear(c)
            | GapEvent::Proceed(c)
            | GapEvent::Retreat(c) => c,
            GapEvent::Split { at, .. } | GapEvent::Merge { at, .. } => at,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.crossing().pos
    }

    /// Proceed/Retreat only slide a gap along its polygon.
    #[inline]
    pub fn is_tracking(&self) -> bool {
        matches!(self, GapEvent::Proceed(_) | GapEvent::Retreat(_))
    }
}

/// Side of the path relative to a directed curve: the orientation of the
/// segment start, or, when the start lies on the curve's line, the negated
/// orientation of the segment end.
pub fn crossing_sign(curve: Segment, path: Segment) -> i8 {
    let s = orientation(curve.p1, curve.p2, path.p1).sign();
    if s != 0 {
        return s;
    }
    -orientation(curve.p1, curve.p2, path.p2).sign()
}

/// All curve crossings of `path`, ordered (stably) by distance from its start.
pub fn gap_events(vg: &VisGraph, path: Segment) -> Result<Vec<GapEvent>> {
    let mut events = Vec::new();
    for family in [
        CurveFamily::Complement,
        CurveFamily::Inflection,
        CurveFamily::Extension,
    ] {
        collect(vg.curves(family), path, &mut events)?;
    }
    events.sort_by(|a, b| distance(a.pos(), path.p1).total_cmp(&distance(b.pos(), path.p1)));
    Ok(events)
}

fn collect(set: &CurveSet, path: Segment, out: &mut Vec<GapEvent>) -> Result<()> {
    for (_, curve) in set.iter() {
        if set.family == CurveFamily::Complement && curve.side == Orientation::Collinear {
            continue;
        }
        let Some(pos) = edge_cross_point(path, curve.segment()) else {
            continue;
        };
        if pos == path.p2 {
            continue;
        }
        let s = crossing_sign(curve.segment(), path);
        let at = Crossing { pos, curve: *curve };
        let product = match set.family {
            CurveFamily::Extension => s,
            _ => s * curve.side.sign(),
        };
        let event = match (set.family, product) {
            (CurveFamily::Complement, 1 | -1) => {
                let dual = curve
                    .dual
                    .map(|d| *set.get(d))
                    .ok_or(Error::MissingDual { origin: xy(curve.p1) })?;
                if product == 1 {
                    GapEvent::Merge { at, dual }
                } else {
                    GapEvent::Split { at, dual }
                }
            }
            (CurveFamily::Inflection, 1) => GapEvent::Appear(at),
            (CurveFamily::Inflection, -1) => GapEvent::Disappear(at),
            (CurveFamily::Extension, -1) => GapEvent::Proceed(at),
            (CurveFamily::Extension, 1) => GapEvent::Retreat(at),
            (family, product) => {
                return Err(Error::SideProduct {
                    family,
                    origin: xy(curve.p1),
                    hit: xy(curve.p2),
                    product,
                })
            }
        };
        out.push(event);
    }
    Ok(())
}
