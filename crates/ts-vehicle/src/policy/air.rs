//! Aircraft movement: flight-phase state machine over a three-part route.
//!
//! An aircraft route is planned in three segments — taxi to the runway,
//! flight, and rollout/taxi to the stand — with three marker indices:
//! `takeoff_index` (liftoff at the runway end), `touchdown_index` (wheels
//! down) and `search_index` (rollout complete, stand search begins).
//!
//! The phase machine only ever moves forward:
//!
//! ```text
//! Taxiing → Departing → Flying ⇄ Circling
//!                          ↓        ↓
//!                        Landing ←──┘
//!                          ↓
//!                 LookingForParking ⟲ → TaxiingToHalt
//! ```
//!
//! Runways are claimed like rail blocks: the whole departure or landing run
//! is taken atomically before the aircraft commits to it, and freed tile by
//! tile as the aircraft rolls off.  Denied landing clearance sends the
//! aircraft around a holding pattern by rewinding the route cursor — the
//! route itself is never modified.

use ts_core::{ConvoyHandle, Ribi, Tile, WayKind};
use ts_grid::TileGrid;
use ts_route::Route;

use super::{MoveQuery, PolicyEvent, WayCheck};

/// Tiles flown per lap of the holding pattern.
pub const HOLDING_PATTERN_LENGTH: usize = 16;
/// Landing clearance is requested this many tiles before touchdown.
pub const HOLDING_PATTERN_OFFSET: usize = 3;

/// Suggested retry delay while taxiing behind other ground traffic.
const TAXI_RETRY_TICKS: u32 = 2;

/// Height units gained per tile while climbing.
const CLIMB_PER_TILE: i16 = 8;
/// Height units held per tile remaining on the glide slope.
const SINK_PER_TILE: i16 = 12;

// ── FlightState ───────────────────────────────────────────────────────────────

/// Phase of an aircraft's journey.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightState {
    /// Rolling from the stand toward the departure runway.
    Taxiing,
    /// Takeoff run and initial climb; holds the departure runway.
    Departing,
    /// Cruising toward the destination airport.
    Flying,
    /// Landing clearance denied; flying the holding pattern.
    Circling,
    /// Cleared to land; descent, touchdown and rollout.
    Landing,
    /// Rolled out but the stand is busy; waiting for one to clear.
    LookingForParking,
    /// Final taxi to a confirmed stand.  Terminal.
    TaxiingToHalt,
}

impl FlightState {
    /// Legal next phases.  Self-loops (`Circling`, `LookingForParking`) model
    /// repeated denied clearance.
    pub fn successors(self) -> &'static [FlightState] {
        use FlightState::*;
        match self {
            Taxiing => &[Departing],
            Departing => &[Flying],
            Flying => &[Landing, Circling],
            Circling => &[Landing, Circling],
            Landing => &[LookingForParking, TaxiingToHalt],
            LookingForParking => &[LookingForParking, TaxiingToHalt],
            TaxiingToHalt => &[],
        }
    }

    /// Airborne phases ignore ground infrastructure entirely.
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            FlightState::Departing | FlightState::Flying | FlightState::Circling | FlightState::Landing
        )
    }
}

// ── AirPolicy ─────────────────────────────────────────────────────────────────

/// Per-aircraft flight plan and phase state.
#[derive(Clone, Debug)]
pub struct AirPolicy {
    state: FlightState,

    /// Current height above ground, in slope height units.
    flight_height: i16,
    /// Cruise height for this leg.
    target_height: i16,

    /// Route index of the liftoff tile (end of the departure runway run).
    takeoff_index: usize,
    /// Route index where the wheels touch the arrival runway.
    touchdown_index: usize,
    /// Route index where rollout ends and the stand search begins.
    search_index: usize,

    /// The departure runway cannot fit this aircraft's takeoff run.  Sticks
    /// until a new route is planned; the aircraft never leaves the stand.
    runway_too_short: bool,
}

impl Default for AirPolicy {
    fn default() -> Self {
        Self {
            state: FlightState::Taxiing,
            flight_height: 0,
            target_height: 64,
            takeoff_index: 0,
            touchdown_index: 0,
            search_index: 0,
            runway_too_short: false,
        }
    }
}

impl AirPolicy {
    #[inline]
    pub fn state(&self) -> FlightState {
        self.state
    }

    #[inline]
    pub fn flight_height(&self) -> i16 {
        self.flight_height
    }

    #[inline]
    pub fn runway_too_short(&self) -> bool {
        self.runway_too_short
    }

    /// Install the flight plan markers for a freshly calculated route.
    pub fn plan(&mut self, takeoff_index: usize, touchdown_index: usize, search_index: usize) {
        debug_assert!(takeoff_index <= touchdown_index && touchdown_index <= search_index);
        self.takeoff_index = takeoff_index;
        self.touchdown_index = touchdown_index;
        self.search_index = search_index;
    }

    fn set_state(&mut self, next: FlightState) {
        debug_assert!(
            self.state.successors().contains(&next),
            "illegal flight transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("flight phase {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub fn is_tile_traversable(&self, grid: &TileGrid, tile: Tile, travel_dir: Ribi) -> bool {
        if self.state.is_airborne() {
            return true;
        }
        let ribi = grid.way_ribi(tile, WayKind::Air);
        !ribi.is_none() && ribi.intersects(travel_dir.backward())
    }

    pub fn check_way_free(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        match self.state {
            FlightState::Taxiing => self.check_taxi_out(q),
            FlightState::Departing | FlightState::Landing => WayCheck::Free,
            FlightState::Flying | FlightState::Circling => self.check_cruise(q),
            FlightState::LookingForParking => self.check_stand(q),
            FlightState::TaxiingToHalt => check_taxiway(q),
        }
    }

    /// Taxi phase: ordinary taxiway occupancy until the runway threshold,
    /// then runway length validation and an atomic claim of the whole
    /// takeoff run.
    fn check_taxi_out(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        if self.runway_too_short {
            return WayCheck::RunwayTooShort;
        }
        let Some(next) = q.next_tile() else {
            return WayCheck::Free;
        };
        let Some(ground) = q.grid.lookup(next) else {
            return WayCheck::RouteInvalid;
        };

        let entering_runway = ground.way(WayKind::Air).is_some_and(|w| w.runway);
        if !entering_runway {
            return check_taxiway(q);
        }

        let available = runway_run_len(q.grid, q.route, q.index);
        if available < q.desc.required_runway_len as usize {
            log::warn!(
                "runway at {} is {} tiles, {} needs {}",
                next,
                available,
                q.vehicle,
                q.desc.required_runway_len
            );
            self.runway_too_short = true;
            return WayCheck::RunwayTooShort;
        }

        if !reserve_range(q.grid, q.route, q.index, self.takeoff_index, q.convoy) {
            return WayCheck::Blocked {
                retry_ticks: TAXI_RETRY_TICKS,
            };
        }
        self.set_state(FlightState::Departing);
        WayCheck::Free
    }

    /// Cruise phase: free flight until the clearance point short of
    /// touchdown, where the arrival runway must be claimed or the aircraft
    /// goes around.
    fn check_cruise(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        if q.index + HOLDING_PATTERN_OFFSET < self.touchdown_index {
            return WayCheck::Free;
        }
        if reserve_range(
            q.grid,
            q.route,
            self.touchdown_index,
            self.search_index,
            q.convoy,
        ) {
            self.set_state(FlightState::Landing);
            WayCheck::Free
        } else {
            self.set_state(FlightState::Circling);
            WayCheck::HoldingPattern {
                rewind: HOLDING_PATTERN_LENGTH,
            }
        }
    }

    /// Stand search: loop until the destination stand clears, then commit.
    fn check_stand(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let stand_busy = q
            .route
            .last()
            .and_then(|t| q.grid.lookup(t))
            .is_some_and(|g| g.is_occupied_by_other(WayKind::Air, q.vehicle));
        if stand_busy {
            self.set_state(FlightState::LookingForParking);
            return WayCheck::Blocked {
                retry_ticks: TAXI_RETRY_TICKS,
            };
        }
        self.set_state(FlightState::TaxiingToHalt);
        check_taxiway(q)
    }

    /// Height stepping and forward phase transitions, driven by the route
    /// index of the tile just entered.
    pub fn on_enter_tile(&mut self, _grid: &mut TileGrid, _tile: Tile, ev: PolicyEvent) {
        if !ev.is_lead {
            return;
        }
        match self.state {
            FlightState::Departing => {
                if ev.index >= self.takeoff_index {
                    self.set_state(FlightState::Flying);
                }
                self.climb();
            }
            FlightState::Flying | FlightState::Circling => self.climb(),
            FlightState::Landing => {
                if ev.index >= self.touchdown_index {
                    self.flight_height = 0;
                } else {
                    let remaining = (self.touchdown_index - ev.index) as i16;
                    self.flight_height = self.flight_height.min(SINK_PER_TILE * remaining);
                }
                if ev.index >= self.search_index {
                    self.set_state(FlightState::LookingForParking);
                }
            }
            _ => {}
        }
    }

    fn climb(&mut self) {
        self.flight_height = (self.flight_height + CLIMB_PER_TILE).min(self.target_height);
    }

    /// Runway tiles are freed one by one as the aircraft rolls off them.
    pub fn on_leave_tile(&mut self, grid: &mut TileGrid, tile: Tile, ev: PolicyEvent) {
        if let Some(way) = grid.lookup_mut(tile).and_then(|g| g.way_mut(WayKind::Air))
            && way.runway
        {
            way.unreserve(ev.convoy);
        }
    }

    /// Abandon the current flight plan: drop runway claims and return to the
    /// ground state so a new route can be planned.
    pub fn release_route(&mut self, grid: &mut TileGrid, route: &Route, convoy: ConvoyHandle) {
        for &tile in route.tiles() {
            if let Some(way) = grid.lookup_mut(tile).and_then(|g| g.way_mut(WayKind::Air))
                && way.runway
            {
                way.unreserve(convoy);
            }
        }
        self.state = FlightState::Taxiing;
        self.flight_height = 0;
        self.runway_too_short = false;
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Plain taxiway probe: one aircraft per tile.
fn check_taxiway(q: &mut MoveQuery<'_>) -> WayCheck {
    let Some(next) = q.next_tile() else {
        return WayCheck::Free;
    };
    let Some(ground) = q.grid.lookup(next) else {
        return WayCheck::RouteInvalid;
    };
    if ground.is_occupied_by_other(WayKind::Air, q.vehicle) {
        return WayCheck::Blocked {
            retry_ticks: TAXI_RETRY_TICKS,
        };
    }
    WayCheck::Free
}

/// Consecutive runway tiles along the route starting at `from`.
fn runway_run_len(grid: &TileGrid, route: &Route, from: usize) -> usize {
    let mut len = 0;
    let mut i = from;
    while let Some(tile) = route.at(i) {
        let is_runway = grid
            .lookup(tile)
            .and_then(|g| g.way(WayKind::Air))
            .is_some_and(|w| w.runway);
        if !is_runway {
            break;
        }
        len += 1;
        i += 1;
    }
    len
}

/// Claim route indices `from..=to` atomically; on conflict every tile taken
/// so far is released before reporting failure.
fn reserve_range(
    grid: &mut TileGrid,
    route: &Route,
    from: usize,
    to: usize,
    convoy: ConvoyHandle,
) -> bool {
    for i in from..=to {
        let Some(tile) = route.at(i) else {
            break;
        };
        let claimed = grid
            .lookup_mut(tile)
            .and_then(|g| g.way_mut(WayKind::Air))
            .is_some_and(|w| w.reserve(convoy));
        if !claimed {
            for j in from..i {
                if let Some(t) = route.at(j)
                    && let Some(way) = grid.lookup_mut(t).and_then(|g| g.way_mut(WayKind::Air))
                {
                    way.unreserve(convoy);
                }
            }
            log::debug!("{} denied runway range {}..={} at {}", convoy, from, to, tile);
            return false;
        }
    }
    true
}
