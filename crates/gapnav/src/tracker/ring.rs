//! Circular slot list with a star cursor and named cursors.
//!
//! Slots live in an arena (`Vec`) and are linked by index. The ring always
//! contains exactly two adjacent `Open` slots (the seam); reading the ring
//! linearly starts right after the seam. Filling an `Open` slot next to the
//! star spawns a fresh `Open` so the seam survives.

use std::collections::BTreeMap;
use std::fmt;

use super::GapId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotContent {
    /// Open frontier.
    Open,
    End,
    Gap(GapId),
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    content: SlotContent,
    prev: SlotId,
    next: SlotId,
}

/// Position between two slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub prev: SlotId,
    pub next: SlotId,
}

#[derive(Clone, Debug)]
pub struct Ring {
    slots: Vec<Slot>,
    star: Option<Cursor>,
    named: BTreeMap<GapId, Cursor>,
}

impl Default for Ring {
    fn default() -> Self {
        Self::new()
    }
}

impl Ring {
    /// Two open slots, star between them.
    pub fn new() -> Self {
        let slots = vec![
            Slot {
                content: SlotContent::Open,
                prev: SlotId(1),
                next: SlotId(1),
            },
            Slot {
                content: SlotContent::Open,
                prev: SlotId(0),
                next: SlotId(0),
            },
        ];
        Self {
            slots,
            star: Some(Cursor {
                prev: SlotId(0),
                next: SlotId(1),
            }),
            named: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn star(&self) -> Option<Cursor> {
        self.star
    }

    #[inline]
    pub fn content(&self, s: SlotId) -> SlotContent {
        self.slots[s.0].content
    }

    /// Content right after the star.
    pub fn star_next(&self) -> Option<SlotContent> {
        self.star.map(|c| self.content(c.next))
    }

    /// Content right before the star.
    pub fn star_prev(&self) -> Option<SlotContent> {
        self.star.map(|c| self.content(c.prev))
    }

    pub fn named(&self, name: GapId) -> Option<Cursor> {
        self.named.get(&name).copied()
    }

    /// Gap ids in linear order (the seam excluded).
    pub fn gaps(&self) -> Vec<GapId> {
        self.linear()
            .into_iter()
            .filter_map(|s| match self.content(s) {
                SlotContent::Gap(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    fn alloc(&mut self, content: SlotContent, prev: SlotId, next: SlotId) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(Slot {
            content,
            prev,
            next,
        });
        self.slots[prev.0].next = id;
        self.slots[next.0].prev = id;
        id
    }

    /// Put `content` right after the star and step over it.
    ///
    /// Returns `false` if the ring has no star.
    pub fn insert_next(&mut self, content: SlotContent) -> bool {
        let Some(c) = self.star else {
            return false;
        };
        let filled = if self.content(c.next) == SlotContent::Open {
            self.slots[c.next.0].content = content;
            let after = self.slots[c.next.0].next;
            self.alloc(SlotContent::Open, c.next, after);
            c.next
        } else {
            self.alloc(content, c.prev, c.next)
        };
        self.star = Some(Cursor {
            prev: filled,
            next: self.slots[filled.0].next,
        });
        true
    }

    /// Put `content` right before the star; the star stays in front of it.
    pub fn insert_prev(&mut self, content: SlotContent) -> bool {
        let Some(c) = self.star else {
            return false;
        };
        let filled = if self.content(c.prev) == SlotContent::Open {
            self.slots[c.prev.0].content = content;
            let before = self.slots[c.prev.0].prev;
            self.alloc(SlotContent::Open, before, c.prev);
            c.prev
        } else {
            self.alloc(content, c.prev, c.next)
        };
        self.star = Some(Cursor {
            prev: self.slots[filled.0].prev,
            next: filled,
        });
        true
    }

    pub fn move_next(&mut self) -> bool {
        let Some(c) = self.star else {
            return false;
        };
        self.star = Some(Cursor {
            prev: c.next,
            next: self.slots[c.next.0].next,
        });
        true
    }

    pub fn move_prev(&mut self) -> bool {
        let Some(c) = self.star else {
            return false;
        };
        self.star = Some(Cursor {
            prev: self.slots[c.prev.0].prev,
            next: c.prev,
        });
        true
    }

    /// Record the star's position under `name`.
    pub fn name_star(&mut self, name: GapId) -> bool {
        let Some(c) = self.star else {
            return false;
        };
        self.named.insert(name, c);
        true
    }

    /// Put the star back where cursor `name` was recorded, re-seated after
    /// the recorded `prev` slot.
    pub fn restore_star(&mut self, name: GapId) -> bool {
        let Some(c) = self.named.get(&name).copied() else {
            return false;
        };
        self.star = Some(Cursor {
            prev: c.prev,
            next: self.slots[c.prev.0].next,
        });
        true
    }

    pub fn clear_star(&mut self) {
        self.star = None;
    }

    /// Slots between the seam, in order.
    fn linear(&self) -> Vec<SlotId> {
        let Some(seam_end) = self.seam_end() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut s = self.slots[seam_end.0].next;
        while self.content(s) != SlotContent::Open {
            out.push(s);
            s = self.slots[s.0].next;
        }
        out
    }

    /// Second slot of the seam (an `Open` whose predecessor is `Open`).
    fn seam_end(&self) -> Option<SlotId> {
        (0..self.slots.len()).map(SlotId).find(|&s| {
            self.content(s) == SlotContent::Open
                && self.content(self.slots[s.0].prev) == SlotContent::Open
        })
    }

    fn cursor_marks(&self, after: SlotId) -> Vec<String> {
        let mut marks = Vec::new();
        if self.star.is_some_and(|c| c.prev == after) {
            marks.push("(*)".to_string());
        }
        for (name, c) in &self.named {
            if c.prev == after {
                marks.push(format!("({})", name.0));
            }
        }
        marks
    }
}

impl fmt::Display for Ring {
    /// `[n]` gap, `||` end, `(*)` star, `(n)` named cursor.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(start) = self.seam_end() else {
            return Ok(());
        };
        let mut tokens = self.cursor_marks(start);
        for s in self.linear() {
            tokens.push(match self.content(s) {
                SlotContent::Gap(g) => format!("[{}]", g.0),
                SlotContent::End => "||".to_string(),
                SlotContent::Open => String::new(),
            });
            tokens.extend(self.cursor_marks(s));
        }
        // a cursor parked inside the seam reads as "at the far end"
        let seam_start = self.slots[start.0].prev;
        if seam_start != start {
            tokens.extend(self.cursor_marks(seam_start));
        }
        write!(f, "{}", tokens.join(" "))
    }
}
