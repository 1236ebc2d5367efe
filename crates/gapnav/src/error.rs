//! Crate error type.
//!
//! Every variant is fatal for the operation that raised it: geometry in
//! non-general position or a broken tracking invariant. Nothing is retried.

use thiserror::Error;

use crate::curves::CurveFamily;
use crate::tracker::GapId;
use crate::Vec2;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("vertex {vertex:?} has no {which} neighbour on its polygon cycle")]
    MissingNeighbor {
        vertex: (f64, f64),
        which: &'static str,
    },

    #[error("ray from {from:?} through {through:?} hits no obstacle edge")]
    NoForwardHit {
        from: (f64, f64),
        through: (f64, f64),
    },

    #[error("bitangent complement from {vertex:?} to {hit:?} is collinear with a boundary edge")]
    CollinearComplement { vertex: (f64, f64), hit: (f64, f64) },

    #[error("{family:?} curve {origin:?}->{hit:?}: side product must be +1 or -1, got {product}")]
    SideProduct {
        family: CurveFamily,
        origin: (f64, f64),
        hit: (f64, f64),
        product: i8,
    },

    #[error("complement curve from {origin:?} has no dual")]
    MissingDual { origin: (f64, f64) },

    #[error("no gap at vertex {vertex:?}")]
    GapNotFound { vertex: (f64, f64) },

    #[error("direction towards {vertex:?} has norm {norm}, expected 1")]
    NonUnitDirection { vertex: (f64, f64), norm: f64 },

    #[error("gap identity {0} is unknown to the tracker")]
    UnknownIdentity(GapId),

    #[error("gap identity {0} already exists")]
    DuplicateIdentity(GapId),

    #[error("gap identity {0} is not live")]
    NotLive(GapId),

    #[error("ring of {ring} has no cursor named {name}")]
    MissingCursor { ring: GapId, name: GapId },

    #[error("building worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Plain tuple for error payloads (readable `Debug`).
#[inline]
pub(crate) fn xy(p: Vec2) -> (f64, f64) {
    (p.x, p.y)
}
