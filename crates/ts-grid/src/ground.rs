//! Per-tile ground state: slope, climate, ways, and vehicle occupancy.

use smallvec::SmallVec;
use ts_core::{ConvoyHandle, Ribi, VehicleId, WayKind};

use crate::way::Way;

// ── Slope ─────────────────────────────────────────────────────────────────────

/// Tile slope.  One height level of rise toward a single cardinal direction;
/// everything steeper is modelled as stacked tiles by the (external) terrain
/// code, so the movement core never sees it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slope {
    #[default]
    Flat,
    /// Ground rises toward this cardinal direction.
    Rising(Ribi),
}

impl Slope {
    #[inline]
    pub fn is_flat(self) -> bool {
        self == Slope::Flat
    }

    /// Height change experienced travelling in `dir` across this tile:
    /// `+1` climbing, `-1` descending, `0` flat or traversing along the
    /// contour line.
    pub fn rise_along(self, dir: Ribi) -> i8 {
        match self {
            Slope::Flat => 0,
            Slope::Rising(up) => {
                if dir.intersects(up) {
                    1
                } else if dir.intersects(up.backward()) {
                    -1
                } else {
                    0
                }
            }
        }
    }
}

// ── Climate ───────────────────────────────────────────────────────────────────

/// Coarse climate band of a tile, consumed by the (external) image selection.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Climate {
    #[default]
    Temperate,
    Tropic,
    Desert,
    Tundra,
    Arctic,
}

// ── Occupant ──────────────────────────────────────────────────────────────────

/// One vehicle's occupancy record on a tile.
///
/// Written by [`Ground::enter`], removed by [`Ground::leave`].  Road and ship
/// policies read these to decide dynamic legality; rail uses way reservation
/// instead and only records occupancy for display.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupant {
    pub vehicle: VehicleId,
    pub convoy: ConvoyHandle,
    /// Travel direction the vehicle entered with.
    pub direction: Ribi,
    pub kind: WayKind,
}

// ── Ground ────────────────────────────────────────────────────────────────────

/// Everything the movement core knows about one tile.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ground {
    pub slope: Slope,
    pub climate: Climate,

    /// Ways on this tile.  Two at most in practice (e.g. a road/rail
    /// crossing); inline storage avoids a heap hit per tile.
    ways: SmallVec<[Way; 2]>,

    /// Vehicles currently on this tile.
    occupants: SmallVec<[Occupant; 4]>,
}

impl Ground {
    pub fn new(slope: Slope) -> Self {
        Self {
            slope,
            ..Self::default()
        }
    }

    // ── Ways ──────────────────────────────────────────────────────────────

    /// Add a way, replacing any existing way of the same kind.
    pub fn add_way(&mut self, way: Way) {
        if let Some(existing) = self.ways.iter_mut().find(|w| w.kind == way.kind) {
            *existing = way;
        } else {
            self.ways.push(way);
        }
    }

    pub fn way(&self, kind: WayKind) -> Option<&Way> {
        self.ways.iter().find(|w| w.kind == kind)
    }

    pub fn way_mut(&mut self, kind: WayKind) -> Option<&mut Way> {
        self.ways.iter_mut().find(|w| w.kind == kind)
    }

    /// Connection mask of the way of `kind`, or `NONE` if there is none.
    #[inline]
    pub fn way_ribi(&self, kind: WayKind) -> Ribi {
        self.way(kind).map_or(Ribi::NONE, |w| w.ribi)
    }

    pub fn has_way(&self, kind: WayKind) -> bool {
        self.way(kind).is_some()
    }

    /// The rail-family way on this tile, if any (all four rail kinds share
    /// movement rules, but a vehicle only matches its own infrastructure).
    pub fn rail_way(&self, kind: WayKind) -> Option<&Way> {
        debug_assert!(kind.is_rail_family());
        self.way(kind)
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// Occupancy-claim half of a tile transition.
    ///
    /// Duplicate claims by the same vehicle are collapsed (the direction is
    /// refreshed instead), so the claim/release pair stays balanced even if
    /// a caller retries after a partial failure.
    pub fn enter(&mut self, occ: Occupant) {
        if let Some(existing) = self
            .occupants
            .iter_mut()
            .find(|o| o.vehicle == occ.vehicle)
        {
            *existing = occ;
        } else {
            self.occupants.push(occ);
        }
    }

    /// Occupancy-release half of a tile transition.  Idempotent.
    pub fn leave(&mut self, vehicle: VehicleId) {
        self.occupants.retain(|o| o.vehicle != vehicle);
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    /// Occupants travelling on ways of `kind`, ignoring e.g. road traffic
    /// when a ship inspects a crossing tile.
    pub fn occupants_of(&self, kind: WayKind) -> impl Iterator<Item = &Occupant> {
        self.occupants.iter().filter(move |o| o.kind == kind)
    }

    pub fn is_occupied_by_other(&self, kind: WayKind, vehicle: VehicleId) -> bool {
        self.occupants_of(kind).any(|o| o.vehicle != vehicle)
    }
}
