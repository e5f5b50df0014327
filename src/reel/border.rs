//! Edge-suppression mask and the four-edge frame primitive.

use crate::core::geom::Pos;
use crate::core::style::Style;
use crate::surface::{RegionId, Surface, SurfaceError};
use std::ops::{BitOr, BitOrAssign};

/// Bitset over the four rectangle edges. Used as a suppression mask: a set
/// bit means that edge is *not* drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Edges(u8);

impl Edges {
    pub const NONE: Self = Self(0);
    pub const TOP: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const BOTTOM: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);
    pub const ALL: Self = Self(0b1111);

    /// Keeps whatever bits it is given; `is_valid` reports whether they all
    /// fall inside the four-edge domain.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 & !Self::ALL.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Edges {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Edges {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

const UL: char = '╭';
const UR: char = '╮';
const LL: char = '╰';
const LR: char = '╯';
const HLINE: char = '─';
const VLINE: char = '│';

/// Draw the non-suppressed edges of `region`'s rectangle.
///
/// A corner glyph appears only where both meeting edges are drawn; where
/// exactly one is, that edge's own line glyph fills the corner cell. A
/// region too small to hold a frame draws nothing and reports success.
pub fn draw_frame(
    surface: &mut dyn Surface,
    region: RegionId,
    suppress: Edges,
    style: Style,
) -> Result<(), SurfaceError> {
    let bounds = surface.region_bounds(region)?;
    if bounds.w < 2 || bounds.h < 2 {
        return Ok(());
    }
    let right = bounds.w - 1;
    let bottom = bounds.h - 1;
    let top_on = !suppress.contains(Edges::TOP);
    let bottom_on = !suppress.contains(Edges::BOTTOM);
    let left_on = !suppress.contains(Edges::LEFT);
    let right_on = !suppress.contains(Edges::RIGHT);

    if top_on {
        let tl = if left_on { UL } else { HLINE };
        let tr = if right_on { UR } else { HLINE };
        surface.put(region, Pos::new(0, 0), tl, style)?;
        surface.put_run(region, Pos::new(1, 0), HLINE, right.saturating_sub(1), style)?;
        surface.put(region, Pos::new(right, 0), tr, style)?;
    } else {
        if left_on {
            surface.put(region, Pos::new(0, 0), VLINE, style)?;
        }
        if right_on {
            surface.put(region, Pos::new(right, 0), VLINE, style)?;
        }
    }

    for y in 1..bottom {
        if left_on {
            surface.put(region, Pos::new(0, y), VLINE, style)?;
        }
        if right_on {
            surface.put(region, Pos::new(right, y), VLINE, style)?;
        }
    }

    if bottom_on {
        let bl = if left_on { LL } else { HLINE };
        let br = if right_on { LR } else { HLINE };
        surface.put(region, Pos::new(0, bottom), bl, style)?;
        surface.put_run(
            region,
            Pos::new(1, bottom),
            HLINE,
            right.saturating_sub(1),
            style,
        )?;
        surface.put(region, Pos::new(right, bottom), br, style)?;
    } else {
        if left_on {
            surface.put(region, Pos::new(0, bottom), VLINE, style)?;
        }
        if right_on {
            surface.put(region, Pos::new(right, bottom), VLINE, style)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/reel/border.rs"]
mod tests;
