//! Tablets and the tablet collection.
//!
//! Tablets live in a slotmap arena and link to their neighbors by handle,
//! so a removed tablet's handle goes stale instead of dangling. The link
//! structure is a chain with real ends, or a ring (every link `Some`, a
//! lone tablet linking to itself) when the reel is circular.

use super::error::ReelError;
use crate::core::geom::{Pos, Rect};
use crate::core::style::Style;
use crate::surface::{RegionId, Surface, SurfaceError};
use slotmap::{new_key_type, SlotMap};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

new_key_type! {
    pub struct TabletId;
}

/// Which part of a partially visible tablet's content is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clip {
    None,
    /// Clipped at the viewport bottom; the head of the content shows.
    Head,
    /// Clipped at the viewport top; the tail of the content shows.
    Tail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    /// First content row to draw (non-zero when the tail shows).
    pub first_row: u16,
    /// Rows available in the frame interior.
    pub rows: u16,
    /// Columns available in the frame interior.
    pub cols: u16,
    pub clip: Clip,
}

/// Content capability implemented per content type. The reel depends only
/// on this interface, never on what a tablet actually holds.
pub trait TabletContent {
    /// Content height in rows. `max_hint` is the row budget the reel can
    /// still use in its current scan; implementations may stop counting
    /// once they reach it, or ignore it entirely.
    fn content_rows(&self, max_hint: u16) -> u16;

    fn render(
        &mut self,
        frame: &mut TabletFrame<'_>,
        req: RenderRequest,
    ) -> Result<(), SurfaceError>;
}

/// Writable window over exactly one tablet's interior. Writes are clipped
/// to the interior, so content can never touch the tablet's own frame.
pub struct TabletFrame<'a> {
    surface: &'a mut dyn Surface,
    region: RegionId,
    interior: Rect,
}

impl<'a> TabletFrame<'a> {
    pub(crate) fn new(surface: &'a mut dyn Surface, region: RegionId, interior: Rect) -> Self {
        Self {
            surface,
            region,
            interior,
        }
    }

    pub fn cols(&self) -> u16 {
        self.interior.w
    }

    pub fn rows(&self) -> u16 {
        self.interior.h
    }

    pub fn put_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: Style,
    ) -> Result<(), SurfaceError> {
        if y >= self.interior.h || x >= self.interior.w {
            return Ok(());
        }
        let budget = (self.interior.w - x) as usize;
        let mut used = 0usize;
        let mut end = 0usize;
        for (idx, g) in text.grapheme_indices(true) {
            let w = UnicodeWidthStr::width(g);
            if used + w > budget {
                break;
            }
            used += w;
            end = idx + g.len();
        }
        self.surface.put_str(
            self.region,
            Pos::new(self.interior.x + x, self.interior.y + y),
            &text[..end],
            style,
        )
    }

    pub fn put_run(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        len: u16,
        style: Style,
    ) -> Result<(), SurfaceError> {
        if y >= self.interior.h || x >= self.interior.w {
            return Ok(());
        }
        let len = len.min(self.interior.w - x);
        self.surface.put_run(
            self.region,
            Pos::new(self.interior.x + x, self.interior.y + y),
            ch,
            len,
            style,
        )
    }

    pub fn fill_row(&mut self, y: u16, ch: char, style: Style) -> Result<(), SurfaceError> {
        self.put_run(0, y, ch, self.interior.w, style)
    }
}

pub(crate) struct Tablet {
    pub content: Box<dyn TabletContent>,
    pub prev: Option<TabletId>,
    pub next: Option<TabletId>,
    /// Realized lazily by the apply phase, destroyed on removal.
    pub region: Option<RegionId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

pub(crate) struct TabletStore {
    slots: SlotMap<TabletId, Tablet>,
    focus: Option<TabletId>,
    circular: bool,
}

impl TabletStore {
    pub fn new(circular: bool) -> Self {
        Self {
            slots: SlotMap::with_key(),
            focus: None,
            circular,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn focus(&self) -> Option<TabletId> {
        self.focus
    }

    pub fn set_focus(&mut self, id: TabletId) {
        debug_assert!(self.slots.contains_key(id));
        self.focus = Some(id);
    }

    pub fn contains(&self, id: TabletId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn next_of(&self, id: TabletId) -> Option<TabletId> {
        self.slots.get(id).and_then(|t| t.next)
    }

    pub fn prev_of(&self, id: TabletId) -> Option<TabletId> {
        self.slots.get(id).and_then(|t| t.prev)
    }

    pub fn get(&self, id: TabletId) -> Option<&Tablet> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: TabletId) -> Option<&mut Tablet> {
        self.slots.get_mut(id)
    }

    pub fn content_rows(&self, id: TabletId, max_hint: u16) -> u16 {
        self.slots
            .get(id)
            .map(|t| t.content.content_rows(max_hint))
            .unwrap_or(0)
    }

    pub fn render(
        &mut self,
        id: TabletId,
        frame: &mut TabletFrame<'_>,
        req: RenderRequest,
    ) -> Result<(), SurfaceError> {
        match self.slots.get_mut(id) {
            Some(t) => t.content.render(frame, req),
            None => Ok(()),
        }
    }

    pub fn ids(&self) -> Vec<TabletId> {
        self.slots.keys().collect()
    }

    /// Insert between the resolved anchors. With no anchors the new tablet
    /// goes immediately before the focus; the first insertion becomes the
    /// sole element and takes the focus.
    pub fn insert(
        &mut self,
        content: Box<dyn TabletContent>,
        after: Option<TabletId>,
        before: Option<TabletId>,
    ) -> Result<TabletId, ReelError> {
        if let Some(a) = after {
            if !self.contains(a) {
                return Err(ReelError::NotFound);
            }
        }
        if let Some(b) = before {
            if !self.contains(b) {
                return Err(ReelError::NotFound);
            }
        }

        let (after, before) = match (after, before) {
            (Some(a), Some(b)) => {
                if self.next_of(a) != Some(b) || self.prev_of(b) != Some(a) {
                    return Err(ReelError::Rejected);
                }
                (Some(a), Some(b))
            }
            (Some(a), None) => (Some(a), self.next_of(a)),
            (None, Some(b)) => (self.prev_of(b), Some(b)),
            (None, None) => match self.focus {
                Some(f) => (self.prev_of(f), Some(f)),
                None => (None, None),
            },
        };

        let id = self.slots.insert(Tablet {
            content,
            prev: after,
            next: before,
            region: None,
        });

        match (after, before) {
            (None, None) => {
                // First tablet. A circular reel's lone tablet links to itself.
                if self.circular {
                    let t = &mut self.slots[id];
                    t.prev = Some(id);
                    t.next = Some(id);
                }
                self.focus = Some(id);
            }
            _ => {
                if let Some(a) = after {
                    self.slots[a].next = Some(id);
                }
                if let Some(b) = before {
                    self.slots[b].prev = Some(id);
                }
            }
        }
        Ok(id)
    }

    /// Unlink and drop the tablet, returning its realized region (if any)
    /// for the caller to release. Focus moves to the successor, falling
    /// back to the predecessor, and clears when the collection empties.
    pub fn remove(&mut self, id: TabletId) -> Result<Option<RegionId>, ReelError> {
        if !self.contains(id) {
            return Err(ReelError::NotFound);
        }

        // Self-links (a lone ring tablet) drop out here, leaving no
        // neighbors to relink. In a two-tablet ring prev == next, so the
        // survivor ends up linking to itself.
        let prev = self.prev_of(id).filter(|p| *p != id);
        let next = self.next_of(id).filter(|n| *n != id);

        if let Some(p) = prev {
            self.slots[p].next = next;
        }
        if let Some(n) = next {
            self.slots[n].prev = prev;
        }

        if self.focus == Some(id) {
            self.focus = next.or(prev);
        }

        let removed = self.slots.remove(id).map(|t| t.region);
        if self.slots.is_empty() {
            self.focus = None;
        }
        removed.ok_or(ReelError::NotFound)
    }

    /// Move `amount` steps from `id` along the links. Wraps in a ring,
    /// saturates at a chain end.
    pub fn advance(&self, id: TabletId, dir: Direction, amount: usize) -> TabletId {
        let amount = if self.circular && self.len() > 0 {
            amount % self.len().max(1)
        } else {
            amount
        };
        let mut cur = id;
        for _ in 0..amount {
            let step = match dir {
                Direction::Next => self.next_of(cur),
                Direction::Prev => self.prev_of(cur),
            };
            match step {
                Some(n) => cur = n,
                None => break,
            }
        }
        cur
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reel/tablet.rs"]
mod tests;
