//! Fixed-point speed unit.
//!
//! # Design
//!
//! Speeds are stored as `i32` in internal units of **1/32 km/h**.  Integer
//! fixed point keeps per-tick kinematics exact and overflow-safe
//! (`i32::MAX / 32` ≈ 67 million km/h of headroom) with no floating-point
//! drift across long runs.  The sentinel [`Speed::UNLIMITED`] compares
//! greater than every real speed, so `min`-folding a set of limits needs no
//! special casing.

use std::fmt;

/// Fixed-point speed: 32 internal units = 1 km/h.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speed(pub i32);

impl Speed {
    pub const ZERO: Speed = Speed(0);

    /// "No limit" sentinel — greater than any representable speed.
    pub const UNLIMITED: Speed = Speed(i32::MAX);

    const UNITS_PER_KMH: i32 = 32;

    #[inline]
    pub fn from_kmh(kmh: u32) -> Speed {
        Speed((kmh as i32).saturating_mul(Self::UNITS_PER_KMH))
    }

    #[inline]
    pub fn to_kmh(self) -> i32 {
        if self == Speed::UNLIMITED {
            i32::MAX
        } else {
            self.0 / Self::UNITS_PER_KMH
        }
    }

    #[inline]
    pub fn is_unlimited(self) -> bool {
        self == Speed::UNLIMITED
    }

    /// Scale by `num/den`, saturating.  The `UNLIMITED` sentinel is preserved
    /// unchanged so a curvature factor never turns "no limit" into a limit.
    pub fn scale(self, num: i32, den: i32) -> Speed {
        if self.is_unlimited() {
            return self;
        }
        debug_assert!(den > 0);
        Speed(((self.0 as i64 * num as i64) / den as i64).clamp(0, i32::MAX as i64) as i32)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            f.write_str("unlimited")
        } else {
            write!(f, "{} km/h", self.to_kmh())
        }
    }
}
