//! Way-type enum shared across all movement-related crates.
//!
//! The three non-standard rail systems (monorail, maglev, narrow gauge) are
//! distinct infrastructure — a maglev cannot run on plain track — but their
//! movement rules are identical to rail.  `is_rail_family` is the dispatch
//! predicate the movement policies use.

/// The infrastructure medium a vehicle runs on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum WayKind {
    Road,
    Rail,
    Monorail,
    Maglev,
    NarrowGauge,
    /// Shipping channel or marked open-water lane.
    Water,
    /// Runway or taxiway.
    Air,
}

impl WayKind {
    /// `true` for rail and its behaviourally identical variants.
    #[inline]
    pub fn is_rail_family(self) -> bool {
        matches!(
            self,
            WayKind::Rail | WayKind::Monorail | WayKind::Maglev | WayKind::NarrowGauge
        )
    }

    /// Human-readable label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            WayKind::Road => "road",
            WayKind::Rail => "rail",
            WayKind::Monorail => "monorail",
            WayKind::Maglev => "maglev",
            WayKind::NarrowGauge => "narrowgauge",
            WayKind::Water => "water",
            WayKind::Air => "air",
        }
    }
}

impl std::fmt::Display for WayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
