//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into external arena tables via `id.0 as usize`, but
//! callers should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a table index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a single vehicle in the owning convoy table.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Index of a convoy (train/road train/fleet unit) in the external
    /// convoy table.
    pub struct ConvoyId(u32);
}

typed_id! {
    /// Index of a halt (station/stop) in the external halt registry.
    /// `u16` keeps cargo destination records compact.
    pub struct HaltId(u16);
}

typed_id! {
    /// Index of a cargo class in the external goods registry.
    pub struct GoodsId(u16);
}

typed_id! {
    /// Renderer image handle.  The core only caches and hands these out;
    /// resolution to pixels happens in the (external) display code.
    pub struct ImageId(u32);
}

// ── ConvoyHandle ──────────────────────────────────────────────────────────────

/// Weak back-reference from a vehicle (or a way reservation) to its convoy.
///
/// The convoy table is owned by the external orchestrator; entries are reused,
/// so a bare index could dangle.  The generation counter is bumped whenever a
/// table slot is recycled — a stale handle then compares unequal to the live
/// one and every reservation check against it fails closed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvoyHandle {
    pub id: ConvoyId,
    pub generation: u32,
}

impl ConvoyHandle {
    /// Handle that matches no live convoy.
    pub const NONE: ConvoyHandle = ConvoyHandle {
        id: ConvoyId::INVALID,
        generation: 0,
    };

    #[inline]
    pub fn new(id: ConvoyId, generation: u32) -> Self {
        Self { id, generation }
    }

    /// `true` if this handle refers to some convoy slot (possibly stale).
    #[inline]
    pub fn is_some(self) -> bool {
        self.id != ConvoyId::INVALID
    }
}

impl Default for ConvoyHandle {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for ConvoyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@g{}", self.id, self.generation)
    }
}
