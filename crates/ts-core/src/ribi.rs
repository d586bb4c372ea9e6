//! 8-point compass direction bitmask.
//!
//! A `Ribi` describes either a **travel direction** (one cardinal bit, or two
//! adjacent bits for diagonal travel) or a **connection mask** on a way tile
//! (any combination of the four bits).  The same representation serves both
//! uses; which one applies is clear from context.
//!
//! Screen/tile axes: north is `(0, -1)`, east `(1, 0)`, south `(0, 1)`,
//! west `(-1, 0)`.

use std::fmt;

/// Direction bitmask: N=1, E=2, S=4, W=8.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ribi(pub u8);

impl Ribi {
    pub const NONE: Ribi = Ribi(0);
    pub const NORTH: Ribi = Ribi(1);
    pub const EAST: Ribi = Ribi(2);
    pub const SOUTH: Ribi = Ribi(4);
    pub const WEST: Ribi = Ribi(8);
    pub const ALL: Ribi = Ribi(15);

    pub const NORTH_EAST: Ribi = Ribi(1 | 2);
    pub const SOUTH_EAST: Ribi = Ribi(4 | 2);
    pub const SOUTH_WEST: Ribi = Ribi(4 | 8);
    pub const NORTH_WEST: Ribi = Ribi(1 | 8);

    /// Travel direction from a tile delta.  Both components are reduced to
    /// their sign, so any span along a straight or exact diagonal yields the
    /// same direction.  A zero delta gives `NONE`.
    pub fn from_delta(dx: i32, dy: i32) -> Ribi {
        let mut r = 0u8;
        match dy.signum() {
            -1 => r |= Ribi::NORTH.0,
            1 => r |= Ribi::SOUTH.0,
            _ => {}
        }
        match dx.signum() {
            1 => r |= Ribi::EAST.0,
            -1 => r |= Ribi::WEST.0,
            _ => {}
        }
        Ribi(r)
    }

    /// Unit tile delta `(dx, dy)` for this travel direction.
    pub fn to_delta(self) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.contains(Ribi::NORTH) {
            dy -= 1;
        }
        if self.contains(Ribi::SOUTH) {
            dy += 1;
        }
        if self.contains(Ribi::EAST) {
            dx += 1;
        }
        if self.contains(Ribi::WEST) {
            dx -= 1;
        }
        (dx, dy)
    }

    /// The opposite direction (N↔S, E↔W), bit-rotated by two places.
    #[inline]
    pub fn backward(self) -> Ribi {
        Ribi(((self.0 << 2) | (self.0 >> 2)) & 0x0f)
    }

    #[inline]
    pub fn contains(self, other: Ribi) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: Ribi) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Exactly one cardinal bit — straight travel.
    #[inline]
    pub fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }

    /// Two adjacent bits — diagonal travel (NE, SE, SW, NW).
    /// Opposite pairs (N|S, E|W) are connection masks, never travel.
    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.0.count_ones() == 2 && self.0 != 0b0101 && self.0 != 0b1010
    }

    /// Number of set connection bits (3+ marks a junction tile).
    #[inline]
    pub fn branch_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Index 0..8 in N, NE, E, SE, S, SW, W, NW order, used for image and
    /// screen-offset tables.  Returns `None` for masks that are not a valid
    /// travel direction.
    pub fn direction_index(self) -> Option<usize> {
        match self {
            Ribi::NORTH => Some(0),
            Ribi::NORTH_EAST => Some(1),
            Ribi::EAST => Some(2),
            Ribi::SOUTH_EAST => Some(3),
            Ribi::SOUTH => Some(4),
            Ribi::SOUTH_WEST => Some(5),
            Ribi::WEST => Some(6),
            Ribi::NORTH_WEST => Some(7),
            _ => None,
        }
    }

    /// Compass bearing in degrees, with north = 360 (not 0) so that a value
    /// of zero can mean "no direction" in packed storage.
    pub fn direction_degrees(self) -> Option<i16> {
        self.direction_index().map(|i| match i {
            0 => 360,
            i => (i as i16) * 45,
        })
    }
}

/// Minimal angular difference between two bearings in degrees, in `0..=180`.
///
/// Inputs use the `direction_degrees` convention (north = 360).
pub fn compare_directions(first: i16, second: i16) -> i16 {
    let d = (first - second).rem_euclid(360);
    if d > 180 { 360 - d } else { d }
}

impl std::ops::BitOr for Ribi {
    type Output = Ribi;
    #[inline]
    fn bitor(self, rhs: Ribi) -> Ribi {
        Ribi(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for Ribi {
    type Output = Ribi;
    #[inline]
    fn bitand(self, rhs: Ribi) -> Ribi {
        Ribi(self.0 & rhs.0)
    }
}

impl fmt::Display for Ribi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("-");
        }
        for (bit, ch) in [
            (Ribi::NORTH, 'N'),
            (Ribi::EAST, 'E'),
            (Ribi::SOUTH, 'S'),
            (Ribi::WEST, 'W'),
        ] {
            if self.contains(bit) {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}
