//! Mode-specific movement policies.
//!
//! One variant per transport medium, dispatched by a plain `match` — the
//! per-tick probe sits on the hottest path in the simulation, and a tagged
//! enum keeps it free of virtual calls without giving up extensibility.
//!
//! Every policy answers the same two questions:
//!
//! - **static legality** (`is_tile_traversable`): does a usable way of my
//!   kind exist on that tile, connected toward me?
//! - **dynamic legality** (`check_way_free`): is it free of conflicting
//!   occupants or reservations *right now*?  This is a read-only probe,
//!   except where the medium's protocol requires a best-effort claim (rail
//!   block reservation, runway/lock claims) — and any partial claim is fully
//!   unwound before a negative answer is returned.

pub mod air;
pub mod rail;
pub mod road;
pub mod ship;

pub use air::{AirPolicy, FlightState};
pub use rail::{BlockReservation, RailPolicy, ReserveMode, block_reserver};
pub use road::RoadPolicy;
pub use ship::ShipPolicy;

use ts_core::{ConvoyHandle, Ribi, Tile, VehicleId, WayKind, WorldParams};
use ts_grid::TileGrid;
use ts_route::{Route, Router};

use crate::desc::VehicleDesc;

// ── WayCheck ──────────────────────────────────────────────────────────────────

/// Outcome of probing the next route tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WayCheck {
    /// The vehicle may enter the next tile.
    Free,

    /// Transient blockage: another occupant holds the resource.  Retry after
    /// the suggested delay — never an error, just a zero-progress tick.
    Blocked { retry_ticks: u32 },

    /// Structural impossibility: no legal way connects to the next tile.
    /// The caller must recalculate the route.
    RouteInvalid,

    /// Permanent failure for this route: the runway is shorter than this
    /// aircraft's required run.  Not retried; surfaced as a standing
    /// condition.
    RunwayTooShort,

    /// Aircraft holding pattern: rewind the route cursor by `rewind` tiles
    /// and keep flying the loop until landing clearance arrives.
    HoldingPattern { rewind: usize },
}

impl WayCheck {
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, WayCheck::Free)
    }
}

// ── MoveQuery ─────────────────────────────────────────────────────────────────

/// Everything a policy needs to answer a probe, borrowed from the vehicle
/// and the world for the duration of one check.
pub struct MoveQuery<'a> {
    pub grid: &'a mut TileGrid,
    pub params: &'a WorldParams,

    /// External path-cost oracle for choose decisions (road junctions,
    /// choose signals).
    pub router: &'a dyn Router,

    /// Mutable so a choose decision can splice a new tail onto the route.
    pub route: &'a mut Route,

    /// Route position of the tile being probed — the vehicle's next tile.
    pub index: usize,

    pub vehicle: VehicleId,
    pub convoy: ConvoyHandle,
    pub desc: &'a VehicleDesc,

    /// Current travel direction.
    pub direction: Ribi,

    /// Only the lead vehicle of a convoy performs dynamic checks and holds
    /// reservations; followers trail it through already-cleared tiles.
    pub is_lead: bool,

    /// Alternative goal tiles (free platforms of the target halt) for
    /// choose-signal path decisions.  Empty when no choice is available.
    pub alt_targets: &'a [Tile],
}

impl MoveQuery<'_> {
    /// The probed tile, when the route still has one at `index`.
    #[inline]
    pub fn next_tile(&self) -> Option<Tile> {
        self.route.at(self.index)
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

/// Per-vehicle movement policy state, tagged by medium.
#[derive(Clone, Debug)]
pub enum Policy {
    Road(RoadPolicy),
    Rail(RailPolicy),
    Ship(ShipPolicy),
    Air(AirPolicy),
}

impl Policy {
    /// Fresh policy state for a vehicle running on `kind` infrastructure.
    /// All rail-family kinds share the rail protocol.
    pub fn for_kind(kind: WayKind) -> Policy {
        match kind {
            WayKind::Road => Policy::Road(RoadPolicy::default()),
            k if k.is_rail_family() => Policy::Rail(RailPolicy::default()),
            WayKind::Water => Policy::Ship(ShipPolicy::default()),
            WayKind::Air => Policy::Air(AirPolicy::default()),
            _ => unreachable!("all WayKind variants are covered"),
        }
    }

    /// Static legality: a usable way of `kind` on `tile`, opening toward the
    /// approaching vehicle.  Airborne aircraft traverse anything.
    pub fn is_tile_traversable(
        &self,
        grid: &TileGrid,
        tile: Tile,
        kind: WayKind,
        travel_dir: Ribi,
    ) -> bool {
        match self {
            Policy::Road(p) => p.is_tile_traversable(grid, tile, travel_dir),
            Policy::Rail(p) => p.is_tile_traversable(grid, tile, kind, travel_dir),
            Policy::Ship(p) => p.is_tile_traversable(grid, tile, travel_dir),
            Policy::Air(p) => p.is_tile_traversable(grid, tile, travel_dir),
        }
    }

    /// Dynamic legality for the lead vehicle; see [`WayCheck`].
    pub fn check_way_free(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        match self {
            Policy::Road(p) => p.check_way_free(q),
            Policy::Rail(p) => p.check_way_free(q),
            Policy::Ship(p) => p.check_way_free(q),
            Policy::Air(p) => p.check_way_free(q),
        }
    }

    /// Medium-specific side of entering a tile (after the occupancy claim).
    pub fn on_enter_tile(&mut self, grid: &mut TileGrid, tile: Tile, q: PolicyEvent) {
        match self {
            Policy::Air(p) => p.on_enter_tile(grid, tile, q),
            Policy::Road(_) | Policy::Rail(_) | Policy::Ship(_) => {
                let _ = (grid, tile, q);
            }
        }
    }

    /// Medium-specific side of leaving a tile (before the occupancy release):
    /// the rail tail frees each block tile behind it; a ship releases a lock
    /// chamber.
    pub fn on_leave_tile(&mut self, grid: &mut TileGrid, tile: Tile, q: PolicyEvent) {
        match self {
            Policy::Rail(p) => p.on_leave_tile(grid, tile, q),
            Policy::Ship(p) => p.on_leave_tile(grid, tile, q),
            Policy::Air(p) => p.on_leave_tile(grid, tile, q),
            Policy::Road(_) => {
                let _ = (grid, tile, q);
            }
        }
    }

    /// Release every resource this vehicle's convoy holds along `route`.
    /// Called before adopting a new route — a stale reservation would
    /// deadlock the block forever.
    pub fn release_route(
        &mut self,
        grid: &mut TileGrid,
        route: &Route,
        convoy: ConvoyHandle,
        kind: WayKind,
    ) {
        match self {
            Policy::Rail(p) => p.release_route(grid, route, convoy, kind),
            Policy::Air(p) => p.release_route(grid, route, convoy),
            Policy::Ship(p) => p.release_route(grid, route, convoy),
            Policy::Road(_) => {}
        }
    }
}

/// Slim event context for enter/leave hooks — unlike [`MoveQuery`] this
/// never needs the route or router.
#[derive(Copy, Clone, Debug)]
pub struct PolicyEvent {
    pub vehicle: VehicleId,
    pub convoy: ConvoyHandle,
    pub kind: WayKind,
    /// Route index of the tile the event concerns.
    pub index: usize,
    pub is_lead: bool,
    pub is_tail: bool,
}
