//! The reel widget: an ordered or circular collection of tablets laid out
//! inside a bounded viewport, with focus navigation and configurable
//! framing.
//!
//! Structural operations mutate the collection, re-run the pure layout
//! pass, then an apply phase realizes, repositions and reclaims surface
//! regions from the plan and invokes each visible tablet's render
//! capability. The apply phase is best-effort: a failure partway through
//! can leave a partially updated frame, which the next successful redraw
//! repairs.

pub mod border;
pub mod error;
pub mod layout;
pub mod tablet;

use crate::core::geom::{Insets, Pos, Rect};
use crate::core::style::Style;
use crate::surface::{RegionId, Surface, SurfaceError};
use border::Edges;
use error::ReelError;
use layout::{Anchor, LayoutParams, Placement};
use tablet::{Clip, Direction, RenderRequest, TabletContent, TabletFrame, TabletId, TabletStore};

#[derive(Clone, Copy, Debug)]
pub struct ReelOptions {
    /// Rows reserved above/below and columns left/right of the viewport.
    pub header_rows: u16,
    pub footer_rows: u16,
    pub left_cols: u16,
    pub right_cols: u16,
    /// Below either minimum, redraw silently skips frame drawing.
    pub min_rows: u16,
    pub min_cols: u16,
    pub infinite_scroll: bool,
    /// Ring instead of chain; requires `infinite_scroll`.
    pub circular: bool,
    /// Suppression masks: a set bit omits that edge.
    pub reel_border_mask: Edges,
    pub tablet_border_mask: Edges,
    pub reel_border_style: Style,
    pub tablet_border_style: Style,
    /// Overlaid on `tablet_border_style` for the focused tablet's frame.
    pub focused_border_style: Style,
}

impl Default for ReelOptions {
    fn default() -> Self {
        Self {
            header_rows: 0,
            footer_rows: 0,
            left_cols: 0,
            right_cols: 0,
            min_rows: 0,
            min_cols: 0,
            infinite_scroll: false,
            circular: false,
            reel_border_mask: Edges::NONE,
            tablet_border_mask: Edges::NONE,
            reel_border_style: Style::default(),
            tablet_border_style: Style::default(),
            focused_border_style: Style::default(),
        }
    }
}

impl ReelOptions {
    pub fn validate(&self) -> Result<(), ReelError> {
        if self.circular && !self.infinite_scroll {
            return Err(ReelError::InvalidOptions(
                "circular requires infinite_scroll",
            ));
        }
        if !self.reel_border_mask.is_valid() {
            return Err(ReelError::InvalidOptions(
                "reel border mask has bits outside the four edges",
            ));
        }
        if !self.tablet_border_mask.is_valid() {
            return Err(ReelError::InvalidOptions(
                "tablet border mask has bits outside the four edges",
            ));
        }
        Ok(())
    }
}

/// The navigation motion behind a redraw; decides where a focus entering
/// from off-screen gets anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Motion {
    None,
    Next,
    Prev,
}

pub struct Reel {
    opts: ReelOptions,
    viewport: RegionId,
    store: TabletStore,
    /// Last applied plan, stage-relative. Drives anchor preservation,
    /// page-size navigation and region reclamation.
    plan: Vec<Placement>,
}

impl Reel {
    /// Bind a new reel to a caller-owned parent region. The viewport is the
    /// parent's rectangle shrunk by the configured insets; the parent region
    /// itself is never drawn to or released by the reel.
    pub fn create(
        surface: &mut dyn Surface,
        parent: RegionId,
        opts: ReelOptions,
    ) -> Result<Self, ReelError> {
        opts.validate()?;
        let outer = surface.region_bounds(parent)?;
        let viewport_rect = outer.inset(Insets {
            left: opts.left_cols,
            right: opts.right_cols,
            top: opts.header_rows,
            bottom: opts.footer_rows,
        });
        if viewport_rect.is_empty() {
            return Err(ReelError::InsufficientArea);
        }
        let viewport = surface.create_region(viewport_rect)?;
        let mut reel = Self {
            opts,
            viewport,
            store: TabletStore::new(opts.circular),
            plan: Vec::new(),
        };
        if let Err(e) = reel.redraw(surface) {
            let _ = surface.destroy_region(viewport);
            return Err(e);
        }
        tracing::debug!(
            w = viewport_rect.w,
            h = viewport_rect.h,
            circular = opts.circular,
            "reel created"
        );
        Ok(reel)
    }

    /// Release every tablet's region and the reel's own viewport region.
    /// Consumes the reel, so a second destroy cannot be expressed. Every
    /// region is released even when one fails; the first failure is
    /// reported after the rest have been freed.
    pub fn destroy(self, surface: &mut dyn Surface) -> Result<(), ReelError> {
        let mut first_err: Option<SurfaceError> = None;
        for id in self.store.ids() {
            if let Some(region) = self.store.get(id).and_then(|t| t.region) {
                if let Err(e) = surface.destroy_region(region) {
                    first_err.get_or_insert(e);
                }
            }
        }
        if let Err(e) = surface.destroy_region(self.viewport) {
            first_err.get_or_insert(e);
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn tablet_count(&self) -> usize {
        self.store.len()
    }

    pub fn focused(&self) -> Option<TabletId> {
        self.store.focus()
    }

    /// Insert a tablet and redraw.
    ///
    /// Anchors: both given must be adjacent (`after.next == before`), else
    /// `Rejected`; one given inserts on that side of it; none inserts
    /// immediately above the focus, and the first insertion becomes the
    /// sole focus.
    ///
    /// A structurally valid insertion is committed before the redraw runs:
    /// on `Err(ReelError::Surface(_))` the tablet is in the collection and
    /// only the draw failed, while `Rejected`/`NotFound` mean nothing was
    /// inserted.
    pub fn insert_tablet(
        &mut self,
        surface: &mut dyn Surface,
        content: Box<dyn TabletContent>,
        after: Option<TabletId>,
        before: Option<TabletId>,
    ) -> Result<TabletId, ReelError> {
        let id = self.store.insert(content, after, before)?;
        tracing::debug!(count = self.store.len(), "tablet inserted");
        self.redraw(surface)?;
        Ok(id)
    }

    /// Remove a tablet, releasing its region. Focus moves to the successor,
    /// then the predecessor, and clears when the reel empties.
    pub fn remove_tablet(
        &mut self,
        surface: &mut dyn Surface,
        id: TabletId,
    ) -> Result<(), ReelError> {
        let region = self.store.remove(id)?;
        self.plan.retain(|p| p.tablet != id);
        if let Some(region) = region {
            surface.destroy_region(region)?;
        }
        tracing::debug!(count = self.store.len(), "tablet removed");
        self.redraw(surface)
    }

    pub fn remove_focused(&mut self, surface: &mut dyn Surface) -> Result<(), ReelError> {
        let focus = self.store.focus().ok_or(ReelError::Empty)?;
        self.remove_tablet(surface, focus)
    }

    /// Move the focus `amount` tablets along the link order and redraw.
    /// Wraps in a circular reel, saturates at a chain end. A reel with
    /// fewer than two tablets reports success with no visible change.
    pub fn navigate(
        &mut self,
        surface: &mut dyn Surface,
        dir: Direction,
        amount: usize,
    ) -> Result<(), ReelError> {
        if self.store.len() <= 1 || amount == 0 {
            return Ok(());
        }
        let focus = self.store.focus().ok_or(ReelError::Empty)?;
        let next = self.store.advance(focus, dir, amount);
        self.store.set_focus(next);
        let motion = match dir {
            Direction::Next => Motion::Next,
            Direction::Prev => Motion::Prev,
        };
        self.redraw_with(surface, motion)
    }

    /// Advance by one page: the number of fully visible tablets in the
    /// current layout, at least one.
    pub fn navigate_page(
        &mut self,
        surface: &mut dyn Surface,
        dir: Direction,
    ) -> Result<(), ReelError> {
        let page = self
            .plan
            .iter()
            .filter(|p| p.clip == Clip::None)
            .count()
            .max(1);
        self.navigate(surface, dir, page)
    }

    /// Relocate the viewport's top-left corner, erasing the old footprint
    /// first. On failure the previous position is restored and redrawn.
    pub fn move_to(
        &mut self,
        surface: &mut dyn Surface,
        col: u16,
        row: u16,
    ) -> Result<(), ReelError> {
        let old = surface.region_bounds(self.viewport)?;
        surface.erase(self.viewport)?;
        for id in self.store.ids() {
            if let Some(region) = self.store.get(id).and_then(|t| t.region) {
                surface.hide_region(region)?;
            }
        }
        surface.composite()?;
        if let Err(e) = surface.move_region(self.viewport, Pos::new(col, row)) {
            let _ = surface.move_region(self.viewport, Pos::new(old.x, old.y));
            self.redraw(surface)?;
            return Err(e.into());
        }
        self.redraw(surface)
    }

    /// Full layout-and-draw pass. A viewport below the configured minimums
    /// draws nothing and still reports success.
    pub fn redraw(&mut self, surface: &mut dyn Surface) -> Result<(), ReelError> {
        self.redraw_with(surface, Motion::None)
    }

    fn redraw_with(&mut self, surface: &mut dyn Surface, motion: Motion) -> Result<(), ReelError> {
        let vp = surface.region_bounds(self.viewport)?;
        surface.erase(self.viewport)?;

        let usable = vp.w >= self.opts.min_cols && vp.h >= self.opts.min_rows;
        let plan = if usable {
            border::draw_frame(
                &mut *surface,
                self.viewport,
                self.opts.reel_border_mask,
                self.opts.reel_border_style,
            )?;
            let stage = self.stage(vp);
            let params = LayoutParams {
                rows: stage.h,
                cols: stage.w,
                frame_rows: self.tablet_frame_rows(),
            };
            let plan = layout::arrange(&self.store, &params, self.anchor_for(motion));
            self.apply(surface, stage, &plan)?;
            plan
        } else {
            self.hide_all(surface)?;
            Vec::new()
        };
        self.plan = plan;

        surface.composite()?;
        surface.flush()?;
        Ok(())
    }

    /// Area available to tablets: the viewport minus the drawn reel frame.
    fn stage(&self, vp: Rect) -> Rect {
        let m = self.opts.reel_border_mask;
        let edge = |e: Edges| if m.contains(e) { 0 } else { 1 };
        vp.inset(Insets {
            left: edge(Edges::LEFT),
            right: edge(Edges::RIGHT),
            top: edge(Edges::TOP),
            bottom: edge(Edges::BOTTOM),
        })
    }

    fn tablet_frame_rows(&self) -> u16 {
        let m = self.opts.tablet_border_mask;
        let edge = |e: Edges| if m.contains(e) { 0 } else { 1 };
        edge(Edges::TOP) + edge(Edges::BOTTOM)
    }

    /// Anchor rule: the focus keeps its row from the previous plan; a focus
    /// entering from off-screen lands bottom-flush on a Next motion and at
    /// the top otherwise; the very first layout starts at the top.
    fn anchor_for(&self, motion: Motion) -> Anchor {
        let Some(focus) = self.store.focus() else {
            return Anchor::Top;
        };
        if let Some(p) = self.plan.iter().find(|p| p.tablet == focus) {
            return Anchor::Row(p.rect.y);
        }
        match motion {
            Motion::Next => Anchor::Bottom,
            Motion::Prev | Motion::None => Anchor::Top,
        }
    }

    fn hide_all(&mut self, surface: &mut dyn Surface) -> Result<(), ReelError> {
        for id in self.store.ids() {
            if let Some(region) = self.store.get(id).and_then(|t| t.region) {
                surface.hide_region(region)?;
            }
        }
        Ok(())
    }

    /// Realize the plan: create/reposition/show a region per placement,
    /// hide regions of tablets that fell out, frame each tablet and invoke
    /// its render capability on the interior.
    fn apply(
        &mut self,
        surface: &mut dyn Surface,
        stage: Rect,
        plan: &[Placement],
    ) -> Result<(), ReelError> {
        for old in &self.plan {
            if plan.iter().any(|p| p.tablet == old.tablet) {
                continue;
            }
            if let Some(region) = self.store.get(old.tablet).and_then(|t| t.region) {
                surface.hide_region(region)?;
            }
        }

        for p in plan {
            let abs = Rect::new(
                stage.x.saturating_add(p.rect.x),
                stage.y.saturating_add(p.rect.y),
                p.rect.w,
                p.rect.h,
            );
            let region = match self.store.get(p.tablet).and_then(|t| t.region) {
                Some(region) => {
                    surface.resize_region(region, abs.w, abs.h)?;
                    surface.move_region(region, Pos::new(abs.x, abs.y))?;
                    surface.show_region(region)?;
                    region
                }
                None => {
                    let region = surface.create_region(abs)?;
                    if let Some(t) = self.store.get_mut(p.tablet) {
                        t.region = Some(region);
                    }
                    region
                }
            };
            surface.erase(region)?;

            // The frame edge on a clipped side is cut off with the content.
            let mut suppress = self.opts.tablet_border_mask;
            match p.clip {
                Clip::Tail => suppress |= Edges::TOP,
                Clip::Head => suppress |= Edges::BOTTOM,
                Clip::None => {}
            }
            let style = if self.store.focus() == Some(p.tablet) {
                self.opts
                    .tablet_border_style
                    .patch(self.opts.focused_border_style)
            } else {
                self.opts.tablet_border_style
            };
            border::draw_frame(&mut *surface, region, suppress, style)?;

            let edge = |e: Edges| if suppress.contains(e) { 0 } else { 1 };
            let interior = Rect::new(
                edge(Edges::LEFT),
                edge(Edges::TOP),
                abs.w.saturating_sub(edge(Edges::LEFT) + edge(Edges::RIGHT)),
                abs.h.saturating_sub(edge(Edges::TOP) + edge(Edges::BOTTOM)),
            );
            if interior.is_empty() {
                continue;
            }

            // When the tail shows, the rows cut at the top are the hidden
            // top frame row (if configured) plus skipped content rows.
            let first_row = match p.clip {
                Clip::Tail => {
                    let top_frame = if self.opts.tablet_border_mask.contains(Edges::TOP) {
                        0
                    } else {
                        1
                    };
                    p.cut.saturating_sub(top_frame)
                }
                _ => 0,
            };
            let req = RenderRequest {
                first_row,
                rows: interior.h,
                cols: interior.w,
                clip: p.clip,
            };
            let mut frame = TabletFrame::new(&mut *surface, region, interior);
            self.store.render(p.tablet, &mut frame, req)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reel/reel.rs"]
mod tests;
