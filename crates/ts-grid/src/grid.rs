//! The tile table: coordinate → ground lookup.
//!
//! # Data layout
//!
//! A flat `FxHashMap<Tile, Ground>` rather than a dense 2-D array: transport
//! maps are sparse in practice (most tiles carry no way and never enter the
//! movement core), and hashing a 6-byte key with FxHash is cheaper than the
//! cache misses of a mostly-empty array at 32k × 32k scale.

use rustc_hash::FxHashMap;
use ts_core::{Ribi, Tile, WayKind};

use crate::ground::{Climate, Ground};
use crate::way::Way;

/// World tile storage plus the global height bands the movement core reads.
#[derive(Debug, Default)]
pub struct TileGrid {
    tiles: FxHashMap<Tile, Ground>,

    /// Sea level; tiles at or below it count as open water.
    pub water_height: i8,

    /// Height level above which tiles render as snow — image selection only,
    /// no movement effect.
    pub snowline: i8,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn lookup(&self, tile: Tile) -> Option<&Ground> {
        self.tiles.get(&tile)
    }

    #[inline]
    pub fn lookup_mut(&mut self, tile: Tile) -> Option<&mut Ground> {
        self.tiles.get_mut(&tile)
    }

    /// Connection mask of the `kind` way at `tile`; `NONE` when the tile or
    /// way is missing.
    #[inline]
    pub fn way_ribi(&self, tile: Tile, kind: WayKind) -> Ribi {
        self.lookup(tile).map_or(Ribi::NONE, |g| g.way_ribi(kind))
    }

    pub fn get_climate(&self, tile: Tile) -> Climate {
        self.lookup(tile).map_or(Climate::Temperate, |g| g.climate)
    }

    #[inline]
    pub fn is_water(&self, tile: Tile) -> bool {
        tile.z <= self.water_height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Insert (or replace) the ground at `tile`.
    pub fn insert(&mut self, tile: Tile, ground: Ground) {
        self.tiles.insert(tile, ground);
    }

    /// Ensure a ground exists at `tile` and lay `way` on it.  Convenience
    /// used by world loading and test fixtures.
    pub fn lay_way(&mut self, tile: Tile, way: Way) {
        self.tiles.entry(tile).or_default().add_way(way);
    }

    /// Force-release every reservation held by any convoy on the listed
    /// tiles.  Used when infrastructure is demolished under a reservation.
    pub fn clear_reservations(&mut self, tiles: &[Tile], kind: WayKind) {
        for &t in tiles {
            if let Some(way) = self.lookup_mut(t).and_then(|g| g.way_mut(kind)) {
                if let Some(holder) = way.reserved_by() {
                    log::debug!("force-releasing {} claim at {}", holder, t);
                }
                way.unreserve_any();
            }
        }
    }
}
