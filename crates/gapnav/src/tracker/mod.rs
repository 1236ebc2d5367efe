//! Gap identity automaton.
//!
//! Purpose
//! - Keep a stable identity per gap across Appear/Disappear/Split/Merge, so a
//!   gap that merged away and later splits off again is recognized.
//!
//! Model
//! - One `Ring` per identity. The star marks the identity's current position
//!   among the gaps it absorbed or emitted; named cursors remember where a
//!   merged identity left, keyed by the identity it merged into.
//! - Robots hand in nominal ids (fresh per gap creation, never reused). The
//!   `remap` table sends a nominal id to the identity that now carries it;
//!   lookup is a single step.
//!
//! Policy
//! - Split inspects the star's NEXT slot, Merge its PREV slot.

mod ring;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

pub use ring::{Cursor, Ring, SlotContent, SlotId};

/// Gap identifier (nominal or identity; both share one id space).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GapId(pub u64);

impl fmt::Display for GapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Topology change reported by the robot, in nominal ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Appear(GapId),
    Disappear(GapId),
    /// `gap` emits the new gap `new`.
    Split { gap: GapId, new: GapId },
    /// `merged` is absorbed by `gap`.
    Merge { gap: GapId, merged: GapId },
}

#[derive(Clone, Debug, Default)]
pub struct GapTracker {
    rings: BTreeMap<GapId, Ring>,
    live: Vec<GapId>,
    remap: HashMap<GapId, GapId>,
}

impl GapTracker {
    /// Identities for gaps present at start (rings without an END marker).
    pub fn new<I: IntoIterator<Item = GapId>>(initial: I) -> Result<Self> {
        let mut t = Self::default();
        for g in initial {
            t.open(g)?;
        }
        Ok(t)
    }

    /// Identity currently carrying nominal id `nominal`.
    #[inline]
    pub fn resolve(&self, nominal: GapId) -> GapId {
        self.remap.get(&nominal).copied().unwrap_or(nominal)
    }

    #[inline]
    pub fn live(&self) -> &[GapId] {
        &self.live
    }

    pub fn is_live(&self, identity: GapId) -> bool {
        self.live.contains(&identity)
    }

    pub fn ring(&self, identity: GapId) -> Option<&Ring> {
        self.rings.get(&identity)
    }

    pub fn apply(&mut self, t: Transition) -> Result<()> {
        match t {
            Transition::Appear(g) => {
                self.open(g)?;
                self.ring_mut(g)?.insert_prev(SlotContent::End);
            }
            Transition::Disappear(g) => {
                let id = self.live_identity(g)?;
                let ring = self.ring_mut(id)?;
                if ring.star_next() == Some(SlotContent::Open) {
                    ring.insert_prev(SlotContent::End);
                }
                self.retire(id)?;
            }
            Transition::Split { gap, new } => {
                let id = self.live_identity(gap)?;
                let next = self.ring_mut(id)?.star_next();
                match next {
                    Some(SlotContent::Gap(h)) if !self.is_live(h) => {
                        self.ring_mut(id)?.move_next();
                        if !self.ring_mut(h)?.restore_star(id) {
                            return Err(Error::MissingCursor { ring: h, name: id });
                        }
                        self.live.push(h);
                        self.remap.insert(new, h);
                    }
                    _ => {
                        if self.rings.contains_key(&new) {
                            return Err(Error::DuplicateIdentity(new));
                        }
                        self.ring_mut(id)?.insert_next(SlotContent::Gap(new));
                        self.open(new)?;
                        self.ring_mut(new)?.name_star(id);
                    }
                }
            }
            Transition::Merge { gap, merged } => {
                let id = self.live_identity(gap)?;
                let gone = self.live_identity(merged)?;
                let ring = self.ring_mut(id)?;
                if ring.star_prev() == Some(SlotContent::Gap(gone)) {
                    ring.move_prev();
                } else {
                    ring.insert_prev(SlotContent::Gap(gone));
                }
                self.ring_mut(gone)?.name_star(id);
                self.retire(gone)?;
                self.remap.insert(merged, id);
            }
        }
        debug!(transition = ?t, state = %self, "gap tracker");
        Ok(())
    }

    fn open(&mut self, g: GapId) -> Result<()> {
        if self.rings.contains_key(&g) {
            return Err(Error::DuplicateIdentity(g));
        }
        self.rings.insert(g, Ring::new());
        self.live.push(g);
        Ok(())
    }

    fn retire(&mut self, identity: GapId) -> Result<()> {
        let pos = self
            .live
            .iter()
            .position(|&g| g == identity)
            .ok_or(Error::NotLive(identity))?;
        self.live.remove(pos);
        self.ring_mut(identity)?.clear_star();
        Ok(())
    }

    fn live_identity(&self, nominal: GapId) -> Result<GapId> {
        let id = self.resolve(nominal);
        if !self.rings.contains_key(&id) {
            return Err(Error::UnknownIdentity(id));
        }
        if !self.is_live(id) {
            return Err(Error::NotLive(id));
        }
        Ok(id)
    }

    fn ring_mut(&mut self, identity: GapId) -> Result<&mut Ring> {
        self.rings
            .get_mut(&identity)
            .ok_or(Error::UnknownIdentity(identity))
    }
}

impl fmt::Display for GapTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, ring) in &self.rings {
            writeln!(f, "{}: {}", id.0, ring)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
