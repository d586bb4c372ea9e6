//! 3-D tile coordinate.
//!
//! `i16` per axis keeps the struct at 5 bytes (packed to 6) — maps up to
//! 32k × 32k tiles, far beyond any practical world size, while halving
//! route-vector memory vs. `i32`.

use std::fmt;

use crate::Ribi;

/// A tile position: map column `x`, map row `y`, height level `z`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub x: i16,
    pub y: i16,
    pub z: i8,
}

impl Tile {
    pub const INVALID: Tile = Tile {
        x: i16::MIN,
        y: i16::MIN,
        z: 0,
    };

    #[inline]
    pub fn new(x: i16, y: i16, z: i8) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Tile::INVALID
    }

    /// 2-D delta `(dx, dy)` from `self` to `other` (height ignored).
    #[inline]
    pub fn delta_to(self, other: Tile) -> (i32, i32) {
        (other.x as i32 - self.x as i32, other.y as i32 - self.y as i32)
    }

    /// Travel direction from `self` to `other`.
    #[inline]
    pub fn direction_to(self, other: Tile) -> Ribi {
        let (dx, dy) = self.delta_to(other);
        Ribi::from_delta(dx, dy)
    }

    /// The adjacent tile in direction `dir`, at the same height level.
    pub fn neighbour(self, dir: Ribi) -> Tile {
        let (dx, dy) = dir.to_delta();
        Tile {
            x: (self.x as i32 + dx) as i16,
            y: (self.y as i32 + dy) as i16,
            z: self.z,
        }
    }

    /// The same column/row at a different height level.
    #[inline]
    pub fn at_height(self, z: i8) -> Tile {
        Tile { z, ..self }
    }

    /// Chebyshev distance in tiles — the number of king moves between the
    /// two positions, which is also the tile count of a shortest grid path.
    pub fn chebyshev(self, other: Tile) -> u32 {
        let (dx, dy) = self.delta_to(other);
        dx.unsigned_abs().max(dy.unsigned_abs())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}
