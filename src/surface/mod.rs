//! Retained compositing surface.
//!
//! The reel never talks to a terminal directly; it goes through the
//! [`Surface`] trait, which manages rectangular regions on a bounded
//! character grid. Regions are composited in creation order (later regions
//! sit above earlier ones) and flushed to the device in one step. The trait
//! keeps the concrete backend out of the rest of the crate: `term` is the
//! crossterm-backed device, `test` is a headless spy for tests.

use crate::core::geom::{Pos, Rect};
use crate::core::style::Style;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::io;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[cfg(feature = "term")]
pub mod term;

new_key_type! {
    /// Generation-checked handle to a surface region. A destroyed region's
    /// handle goes stale instead of dangling.
    pub struct RegionId;
}

#[derive(Debug)]
pub enum SurfaceError {
    /// The region handle is stale or was never issued by this surface.
    UnknownRegion,
    Io(io::Error),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::UnknownRegion => write!(f, "unknown or stale region handle"),
            SurfaceError::Io(e) => write!(f, "surface io failure: {e}"),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceError::Io(e) => Some(e),
            SurfaceError::UnknownRegion => None,
        }
    }
}

impl From<io::Error> for SurfaceError {
    fn from(e: io::Error) -> Self {
        SurfaceError::Io(e)
    }
}

/// A bounded character grid with movable, hideable regions.
///
/// Write positions are region-relative; writes falling outside the region
/// are clipped silently. `composite` folds visible regions into the screen
/// buffer, `flush` pushes the result to the device.
pub trait Surface {
    fn create_region(&mut self, bounds: Rect) -> Result<RegionId, SurfaceError>;
    fn destroy_region(&mut self, region: RegionId) -> Result<(), SurfaceError>;
    fn move_region(&mut self, region: RegionId, to: Pos) -> Result<(), SurfaceError>;
    fn resize_region(&mut self, region: RegionId, w: u16, h: u16) -> Result<(), SurfaceError>;
    fn show_region(&mut self, region: RegionId) -> Result<(), SurfaceError>;
    fn hide_region(&mut self, region: RegionId) -> Result<(), SurfaceError>;
    fn region_bounds(&self, region: RegionId) -> Result<Rect, SurfaceError>;

    /// Reset every cell of the region to a blank.
    fn erase(&mut self, region: RegionId) -> Result<(), SurfaceError>;
    /// Write one styled glyph.
    fn put(&mut self, region: RegionId, pos: Pos, ch: char, style: Style)
        -> Result<(), SurfaceError>;
    /// Write `len` copies of a glyph as a horizontal run.
    fn put_run(
        &mut self,
        region: RegionId,
        pos: Pos,
        ch: char,
        len: u16,
        style: Style,
    ) -> Result<(), SurfaceError>;
    /// Write a string, grapheme by grapheme, clipped at the region edge.
    fn put_str(
        &mut self,
        region: RegionId,
        pos: Pos,
        text: &str,
        style: Style,
    ) -> Result<(), SurfaceError>;

    fn composite(&mut self) -> Result<(), SurfaceError>;
    fn flush(&mut self) -> Result<(), SurfaceError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: String,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: " ".to_string(),
            style: Style::default(),
        }
    }
}

/// Owned rectangular cell buffer, shared by regions and screen buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    w: u16,
    h: u16,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(w: u16, h: u16) -> Self {
        let len = w as usize * h as usize;
        Self {
            w,
            h,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.w
    }

    pub fn height(&self) -> u16 {
        self.h
    }

    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.w || y >= self.h {
            return None;
        }
        Some(y as usize * self.w as usize + x as usize)
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        let idx = self.idx(x, y)?;
        self.cells.get(idx)
    }

    pub fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        let idx = self.idx(x, y)?;
        self.cells.get_mut(idx)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }

    /// Resize in place, preserving the overlapping top-left content.
    pub fn resize(&mut self, w: u16, h: u16) {
        if w == self.w && h == self.h {
            return;
        }
        let mut next = CellGrid::new(w, h);
        for y in 0..h.min(self.h) {
            for x in 0..w.min(self.w) {
                if let (Some(dst), Some(src)) = (next.cell_mut(x, y), self.cell(x, y)) {
                    *dst = src.clone();
                }
            }
        }
        *self = next;
    }

    pub fn put(&mut self, pos: Pos, ch: char, style: Style) {
        if let Some(cell) = self.cell_mut(pos.x, pos.y) {
            cell.symbol = ch.to_string();
            cell.style = style;
        }
    }

    pub fn put_run(&mut self, pos: Pos, ch: char, len: u16, style: Style) {
        for i in 0..len {
            let x = pos.x.saturating_add(i);
            if x >= self.w {
                break;
            }
            self.put(Pos::new(x, pos.y), ch, style);
        }
    }

    pub fn put_str(&mut self, pos: Pos, text: &str, style: Style) {
        if pos.y >= self.h {
            return;
        }
        let mut x = pos.x;
        for g in text.graphemes(true) {
            let w = UnicodeWidthStr::width(g) as u16;
            if w == 0 {
                continue;
            }
            if x >= self.w {
                break;
            }
            // Do not partially render wide glyphs.
            if w > 1 && x.saturating_add(w).saturating_sub(1) >= self.w {
                break;
            }
            let Some(cell) = self.cell_mut(x, pos.y) else {
                break;
            };
            cell.symbol = g.to_string();
            cell.style = style;

            // Wide glyphs occupy their trailing cells as spaces.
            for dx in 1..w {
                let Some(cell) = self.cell_mut(x.saturating_add(dx), pos.y) else {
                    break;
                };
                cell.symbol = " ".to_string();
                cell.style = style;
            }

            x = x.saturating_add(w);
        }
    }

    /// Copy this grid onto `dst` with its top-left at `origin`, clipped to
    /// `dst`'s bounds.
    pub fn blit(&self, dst: &mut CellGrid, origin: Pos) {
        for y in 0..self.h {
            let dy = origin.y.saturating_add(y);
            if dy >= dst.h {
                break;
            }
            for x in 0..self.w {
                let dx = origin.x.saturating_add(x);
                if dx >= dst.w {
                    break;
                }
                if let (Some(dst_cell), Some(src_cell)) = (dst.cell_mut(dx, dy), self.cell(x, y)) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }

    /// Concatenated symbols of one row, for assertions and debugging.
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::new();
        for x in 0..self.w {
            if let Some(cell) = self.cell(x, y) {
                out.push_str(&cell.symbol);
            }
        }
        out
    }
}

pub(crate) struct Region {
    pub origin: Pos,
    pub grid: CellGrid,
    pub visible: bool,
}

/// Region storage shared by the concrete surfaces: slotmap arena plus a
/// z-order list (creation order, later on top).
#[derive(Default)]
pub(crate) struct RegionTable {
    slots: SlotMap<RegionId, Region>,
    order: Vec<RegionId>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, bounds: Rect) -> RegionId {
        let id = self.slots.insert(Region {
            origin: Pos::new(bounds.x, bounds.y),
            grid: CellGrid::new(bounds.w, bounds.h),
            visible: true,
        });
        self.order.push(id);
        id
    }

    pub fn destroy(&mut self, id: RegionId) -> Result<(), SurfaceError> {
        self.slots.remove(id).ok_or(SurfaceError::UnknownRegion)?;
        self.order.retain(|r| *r != id);
        Ok(())
    }

    pub fn get(&self, id: RegionId) -> Result<&Region, SurfaceError> {
        self.slots.get(id).ok_or(SurfaceError::UnknownRegion)
    }

    pub fn get_mut(&mut self, id: RegionId) -> Result<&mut Region, SurfaceError> {
        self.slots.get_mut(id).ok_or(SurfaceError::UnknownRegion)
    }

    pub fn bounds(&self, id: RegionId) -> Result<Rect, SurfaceError> {
        let region = self.get(id)?;
        Ok(Rect::new(
            region.origin.x,
            region.origin.y,
            region.grid.width(),
            region.grid.height(),
        ))
    }

    pub fn composite(&self, screen: &mut CellGrid) {
        screen.clear();
        for id in &self.order {
            let Some(region) = self.slots.get(*id) else {
                continue;
            };
            if !region.visible {
                continue;
            }
            region.grid.blit(screen, region.origin);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/grid.rs"]
mod tests;
