//! Crossterm-backed surface.
//!
//! Regions keep their own cell grids; `composite` folds them into a screen
//! buffer in z order and `flush` repaints only the rows that changed since
//! the previous flush. The writer is caller-supplied so session setup and
//! teardown (raw mode, alternate screen) stay with the host application.

use super::{CellGrid, RegionId, RegionTable, Surface, SurfaceError};
use crate::core::geom::{Pos, Rect};
use crate::core::style::{Color, Mod, Style};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, PrintStyledContent, StyledContent,
};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

fn term_style(style: Style) -> ContentStyle {
    let mut out = ContentStyle::new();
    out.foreground_color = Some(style.fg.map(term_color).unwrap_or(TermColor::Reset));
    out.background_color = Some(style.bg.map(term_color).unwrap_or(TermColor::Reset));
    if style.mods.contains(Mod::BOLD) {
        out.attributes.set(Attribute::Bold);
    }
    if style.mods.contains(Mod::DIM) {
        out.attributes.set(Attribute::Dim);
    }
    if style.mods.contains(Mod::UNDERLINE) {
        out.attributes.set(Attribute::Underlined);
    }
    if style.mods.contains(Mod::REVERSE) {
        out.attributes.set(Attribute::Reverse);
    }
    if style.mods.contains(Mod::ITALIC) {
        out.attributes.set(Attribute::Italic);
    }
    out
}

pub struct TermSurface<W: Write> {
    out: W,
    table: RegionTable,
    screen: CellGrid,
    prev: CellGrid,
    repaint_all: bool,
}

impl<W: Write> TermSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            table: RegionTable::new(),
            screen: CellGrid::new(cols, rows),
            prev: CellGrid::new(cols, rows),
            repaint_all: true,
        }
    }

    /// Adopt a new device size (e.g. on a terminal resize event) and force a
    /// full repaint on the next flush.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen = CellGrid::new(cols, rows);
        self.prev = CellGrid::new(cols, rows);
        self.repaint_all = true;
    }

    fn row_changed(&self, y: u16) -> bool {
        for x in 0..self.screen.width() {
            if self.screen.cell(x, y) != self.prev.cell(x, y) {
                return true;
            }
        }
        false
    }

    fn repaint_row(&mut self, y: u16) -> Result<(), SurfaceError> {
        queue!(self.out, MoveTo(0, y))?;
        let mut x = 0;
        while x < self.screen.width() {
            let Some(cell) = self.screen.cell(x, y) else {
                break;
            };
            let styled = StyledContent::new(term_style(cell.style), cell.symbol.clone());
            queue!(self.out, PrintStyledContent(styled))?;
            // Wide glyphs already cover their trailing cells.
            let w = UnicodeWidthStr::width(cell.symbol.as_str()).max(1) as u16;
            x = x.saturating_add(w);
        }
        Ok(())
    }
}

impl<W: Write> Surface for TermSurface<W> {
    fn create_region(&mut self, bounds: Rect) -> Result<RegionId, SurfaceError> {
        Ok(self.table.create(bounds))
    }

    fn destroy_region(&mut self, region: RegionId) -> Result<(), SurfaceError> {
        self.table.destroy(region)
    }

    fn move_region(&mut self, region: RegionId, to: Pos) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.origin = to;
        Ok(())
    }

    fn resize_region(&mut self, region: RegionId, w: u16, h: u16) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.grid.resize(w, h);
        Ok(())
    }

    fn show_region(&mut self, region: RegionId) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.visible = true;
        Ok(())
    }

    fn hide_region(&mut self, region: RegionId) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.visible = false;
        Ok(())
    }

    fn region_bounds(&self, region: RegionId) -> Result<Rect, SurfaceError> {
        self.table.bounds(region)
    }

    fn erase(&mut self, region: RegionId) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.grid.clear();
        Ok(())
    }

    fn put(
        &mut self,
        region: RegionId,
        pos: Pos,
        ch: char,
        style: Style,
    ) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.grid.put(pos, ch, style);
        Ok(())
    }

    fn put_run(
        &mut self,
        region: RegionId,
        pos: Pos,
        ch: char,
        len: u16,
        style: Style,
    ) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.grid.put_run(pos, ch, len, style);
        Ok(())
    }

    fn put_str(
        &mut self,
        region: RegionId,
        pos: Pos,
        text: &str,
        style: Style,
    ) -> Result<(), SurfaceError> {
        self.table.get_mut(region)?.grid.put_str(pos, text, style);
        Ok(())
    }

    fn composite(&mut self) -> Result<(), SurfaceError> {
        self.table.composite(&mut self.screen);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        for y in 0..self.screen.height() {
            if self.repaint_all || self.row_changed(y) {
                self.repaint_row(y)?;
            }
        }
        self.prev = self.screen.clone();
        self.repaint_all = false;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/term.rs"]
mod tests;
