//! Pure arrangement planning.
//!
//! Decides which tablets are visible, where, and how clipped, with no side
//! effects: the plan is applied to the surface in a separate phase, so this
//! module is testable without any terminal collaborator.
//!
//! The model is a one-dimensional virtual space with the focused tablet's
//! top edge at 0. Successors extend downward, predecessors upward, each walk
//! bounded by one viewport of rows and by a shared visited set (so a ring
//! shorter than the viewport terminates and nothing is placed twice). The
//! viewport is then a window into that space: its start preserves the
//! focus's previous row when content allows, pulls up to the content top
//! when everything fits (slack accumulates at the bottom), and aligns with
//! the content bottom when the end of a chain is reached.

use super::tablet::{Clip, TabletId, TabletStore};
use crate::core::geom::Rect;
use rustc_hash::FxHashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub tablet: TabletId,
    /// Stage-relative rectangle (x is always 0, w the full stage width).
    pub rect: Rect,
    pub clip: Clip,
    /// Rows hidden beyond the clipped edge; 0 when unclipped.
    pub cut: u16,
}

/// Where to put the focused tablet's top edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    Top,
    Bottom,
    Row(u16),
}

pub(crate) struct LayoutParams {
    pub rows: u16,
    pub cols: u16,
    /// Rows a tablet's own frame adds to its content (0..=2).
    pub frame_rows: u16,
}

/// A tablet's heights: the placed height (clamped to one viewport) and the
/// natural height (content plus frame, at least one row so empty tablets
/// stay reachable). A natural height above the placed one means the tablet
/// is bottom-clipped even when the window does not cut it.
fn heights(store: &TabletStore, id: TabletId, budget: u16, params: &LayoutParams) -> (u16, u16) {
    let natural = store
        .content_rows(id, budget)
        .saturating_add(params.frame_rows)
        .max(1);
    (natural.min(params.rows), natural)
}

pub(crate) fn arrange(store: &TabletStore, params: &LayoutParams, anchor: Anchor) -> Vec<Placement> {
    let Some(focus) = store.focus() else {
        return Vec::new();
    };
    if params.rows == 0 || params.cols == 0 {
        return Vec::new();
    }
    let rows = params.rows;
    let count = store.len();

    let (f_h, f_nat) = heights(store, focus, rows, params);
    let anchor_row = match anchor {
        Anchor::Top => 0,
        Anchor::Bottom => rows.saturating_sub(f_h),
        Anchor::Row(r) => r.min(rows.saturating_sub(f_h)),
    };

    let mut visited: FxHashSet<TabletId> = FxHashSet::default();
    visited.insert(focus);

    // Successors, downward from the focus. One viewport of rows is the most
    // that can ever be visible below the focus's top edge.
    let mut below: Vec<(TabletId, u16, u16)> = Vec::new();
    let mut below_total = f_h;
    let mut cur = focus;
    while below_total < rows && visited.len() < count {
        let Some(next) = store.next_of(cur) else {
            break;
        };
        if !visited.insert(next) {
            break;
        }
        let (h, nat) = heights(store, next, rows - below_total, params);
        below.push((next, h, nat));
        below_total = below_total.saturating_add(h);
        cur = next;
    }

    // Predecessors, upward.
    let mut above: Vec<(TabletId, u16, u16)> = Vec::new();
    let mut above_total: u16 = 0;
    cur = focus;
    while above_total < rows && visited.len() < count {
        let Some(prev) = store.prev_of(cur) else {
            break;
        };
        if !visited.insert(prev) {
            break;
        }
        let (h, nat) = heights(store, prev, rows - above_total, params);
        above.push((prev, h, nat));
        above_total = above_total.saturating_add(h);
        cur = prev;
    }

    // Window start in virtual space: keep the anchor when possible, bottom-
    // align when the chain's tail is inside the window, and never open a gap
    // above the first tablet.
    let rows_i = i32::from(rows);
    let ws = (-i32::from(above_total)).max((-i32::from(anchor_row)).min(i32::from(below_total) - rows_i));
    let w_end = ws + rows_i;

    let mut placements = Vec::with_capacity(1 + above.len() + below.len());
    let mut emit = |id: TabletId, v0: i32, h: u16, nat: u16| {
        let v1 = v0 + i32::from(h);
        let y0 = v0.max(ws);
        let y1 = v1.min(w_end);
        if y1 <= y0 {
            return;
        }
        // Rows the viewport clamp shaved off count as clipped too.
        let over = nat - h;
        let (clip, cut) = if v0 < ws {
            (Clip::Tail, (ws - v0) as u16 + over)
        } else if v1 > w_end {
            (Clip::Head, (v1 - w_end) as u16 + over)
        } else if over > 0 {
            (Clip::Head, over)
        } else {
            (Clip::None, 0)
        };
        placements.push(Placement {
            tablet: id,
            rect: Rect::new(0, (y0 - ws) as u16, params.cols, (y1 - y0) as u16),
            clip,
            cut,
        });
    };

    let mut v = -i32::from(above_total);
    for (id, h, nat) in above.iter().rev() {
        emit(*id, v, *h, *nat);
        v += i32::from(*h);
    }
    debug_assert_eq!(v, 0);
    emit(focus, 0, f_h, f_nat);
    v = i32::from(f_h);
    for (id, h, nat) in &below {
        emit(*id, v, *h, *nat);
        v += i32::from(*h);
    }

    placements
}

#[cfg(test)]
#[path = "../../tests/unit/reel/layout.rs"]
mod tests;
