//! The vehicle proper: route following, tile transitions, pose.
//!
//! # Movement loop
//!
//! [`Vehicle::advance`] spends a step budget against the current tile.
//! Whenever the budget reaches a tile boundary the *next* tile is probed
//! first — statically (does a connected way exist?) and, for the convoy
//! lead, dynamically through the movement policy.  Only a `Free` answer
//! consumes the crossing step and commits the transition; a blocked probe
//! parks the vehicle at the tile edge with zero side effects, so the same
//! probe can be retried any number of ticks later.
//!
//! # Transition ordering
//!
//! A tile transition is strictly ordered: release the old tile, advance the
//! route cursor, claim the new tile, then recompute direction, traversal
//! length, slope state and speed limit.  Release-before-claim means a
//! vehicle never holds two occupancy records, and cursor-before-claim means
//! every policy hook sees a consistent route index.

use ts_core::{
    ConvoyHandle, HaltId, ImageId, Ribi, Speed, Tick, Tile, VehicleId, WayKind, WorldParams,
};
use ts_grid::{Occupant, TileGrid};
use ts_route::{Route, Router};

use crate::cargo::{CargoHold, CargoPacket};
use crate::corner::{DirectionHistory, calc_speed_limit};
use crate::desc::VehicleDesc;
use crate::error::{VehicleError, VehicleResult};
use crate::policy::{MoveQuery, Policy, PolicyEvent, WayCheck};
use crate::stepper::StepPos;

/// Ticks without forward progress before a vehicle reports itself stuck.
const STUCK_AFTER_TICKS: u64 = 32;

/// Wait applied when a holding pattern cannot rewind any further.
const HOLDING_RETRY_TICKS: u32 = 4;

// ── Outcome types ─────────────────────────────────────────────────────────────

/// Why an advance stopped short of its budget, beyond a transient block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveFailure {
    /// The route no longer matches the infrastructure; recalculate it.
    RouteInvalid,
    /// Aircraft only: the planned departure runway is too short.  Permanent
    /// for this route.
    RunwayTooShort,
}

/// Accounting for one [`Vehicle::advance`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Steps actually travelled (≤ the requested distance).
    pub consumed: u32,
    /// Tile boundaries crossed.
    pub tiles_crossed: u32,
    /// The route's last tile has been reached.
    pub arrived: bool,
    /// Transient blockage: suggested ticks to wait before retrying.
    pub blocked: Option<u32>,
    /// Non-transient stop; retrying without intervention is pointless.
    pub failure: Option<MoveFailure>,
}

/// Render-facing snapshot: everything a drawing pass needs, copied out so it
/// never holds a borrow into the simulation state.
#[derive(Copy, Clone, Debug)]
pub struct VehiclePose {
    pub tile: Tile,
    pub direction: Ribi,
    pub image: ImageId,
    /// Screen-pixel offset from the tile anchor at the requested raster.
    pub x_off: i16,
    pub y_off: i16,
}

/// Role and progress flags.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleFlags {
    /// First vehicle of its convoy: performs dynamic checks, holds claims.
    pub is_lead: bool,
    /// Last vehicle of its convoy: releases claims behind it.
    pub is_tail: bool,
    /// The route cursor has passed the final tile.
    pub at_route_end: bool,
    /// Has ever moved since the route was set (drives image freshness).
    pub has_moved: bool,
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

pub struct Vehicle {
    id: VehicleId,
    convoy: ConvoyHandle,
    desc: VehicleDesc,

    tile: Tile,
    tile_prev: Tile,
    tile_next: Tile,

    pos: StepPos,
    route: Route,
    /// Index of the next route tile to enter.
    route_index: usize,

    speed_limit: Speed,
    /// Running resistance on the current tile: the type's base plus slope
    /// and curve terms.  The convoy physics read this each tick.
    friction: i32,
    history: DirectionHistory,
    cargo: CargoHold,
    flags: VehicleFlags,
    policy: Policy,
    image: ImageId,

    /// Last tick with forward progress; drives [`is_stuck`](Self::is_stuck).
    last_progress: Tick,
}

impl Vehicle {
    /// A parked vehicle at `start` with an empty route.
    pub fn new(
        id: VehicleId,
        convoy: ConvoyHandle,
        desc: VehicleDesc,
        start: Tile,
        now: Tick,
    ) -> Self {
        let policy = Policy::for_kind(desc.kind);
        let image = desc.image_for(Ribi::SOUTH);
        let max_speed = desc.max_speed;
        let friction = desc.friction;
        Self {
            id,
            convoy,
            desc,
            tile: start,
            tile_prev: start,
            tile_next: Tile::INVALID,
            pos: StepPos::default(),
            route: Route::default(),
            route_index: 0,
            speed_limit: max_speed,
            friction,
            history: DirectionHistory::new(),
            cargo: CargoHold::new(),
            flags: VehicleFlags {
                is_lead: true,
                is_tail: true,
                at_route_end: true,
                has_moved: false,
            },
            policy,
            image,
            last_progress: now,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn convoy(&self) -> ConvoyHandle {
        self.convoy
    }

    #[inline]
    pub fn desc(&self) -> &VehicleDesc {
        &self.desc
    }

    #[inline]
    pub fn tile(&self) -> Tile {
        self.tile
    }

    #[inline]
    pub fn direction(&self) -> Ribi {
        self.pos.direction()
    }

    #[inline]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[inline]
    pub fn route_index(&self) -> usize {
        self.route_index
    }

    #[inline]
    pub fn step_pos(&self) -> &StepPos {
        &self.pos
    }

    #[inline]
    pub fn speed_limit(&self) -> Speed {
        self.speed_limit
    }

    #[inline]
    pub fn friction(&self) -> i32 {
        self.friction
    }

    #[inline]
    pub fn flags(&self) -> VehicleFlags {
        self.flags
    }

    #[inline]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Convoy role.  The lead performs way checks; the tail releases claims.
    pub fn set_role(&mut self, is_lead: bool, is_tail: bool) {
        self.flags.is_lead = is_lead;
        self.flags.is_tail = is_tail;
    }

    /// Gross weight: empty weight plus loaded freight.
    pub fn weight_kg(&self) -> u32 {
        self.desc.weight_kg + self.cargo.total() as u32 * self.desc.freight_unit_kg
    }

    #[inline]
    pub fn cargo(&self) -> &CargoHold {
        &self.cargo
    }

    pub fn load(&mut self, packet: CargoPacket) -> u16 {
        self.cargo.load(packet, self.desc.capacity)
    }

    pub fn unload_for(&mut self, halt: HaltId) -> u16 {
        self.cargo.unload_for(halt)
    }

    /// Drop cargo whose destination a schedule change made unreachable.
    pub fn discard_stale_cargo(&mut self, still_reachable: impl Fn(HaltId) -> bool) -> u16 {
        self.cargo.discard_stale(still_reachable)
    }

    /// Aircraft flight plan markers; see `AirPolicy::plan`.
    pub fn set_flight_plan(&mut self, takeoff: usize, touchdown: usize, search: usize) {
        if let Policy::Air(p) = &mut self.policy {
            p.plan(takeoff, touchdown, search);
        } else {
            debug_assert!(false, "flight plan on a non-aircraft");
        }
    }

    // ── route ─────────────────────────────────────────────────────────────

    /// Adopt a freshly calculated route starting on the current tile.
    ///
    /// Releases every claim held along the old route first — a reservation
    /// surviving a reroute would block its track segment forever.
    pub fn set_route(
        &mut self,
        grid: &mut TileGrid,
        params: &WorldParams,
        route: Route,
        now: Tick,
    ) -> VehicleResult<()> {
        let Some(first) = route.first() else {
            return Err(VehicleError::EmptyRoute);
        };
        if first != self.tile {
            return Err(VehicleError::RouteStart {
                expected: self.tile,
                got: first,
            });
        }

        self.policy
            .release_route(grid, &self.route, self.convoy, self.desc.kind);

        self.route = route;
        self.route_index = 1;
        self.flags.at_route_end = self.route.len() <= 1;
        self.flags.has_moved = false;
        self.history.clear();
        self.tile_prev = self.tile;
        self.tile_next = self.route.at(1).unwrap_or(Tile::INVALID);

        let dir = if self.tile_next != Tile::INVALID {
            self.tile.direction_to(self.tile_next)
        } else {
            self.pos.direction()
        };
        self.pos.begin_tile();
        self.pos.set_direction(dir, params);
        self.image = self.desc.image_for(dir);
        self.last_progress = now;

        let ground = grid
            .lookup_mut(self.tile)
            .ok_or(VehicleError::NoGround(self.tile))?;
        self.pos.recalc_height(ground.slope);
        ground.enter(Occupant {
            vehicle: self.id,
            convoy: self.convoy,
            direction: dir,
            kind: self.desc.kind,
        });
        Ok(())
    }

    /// Drop the current route: release every claim along it and come to rest
    /// on the current tile.  The vehicle keeps its occupancy record.
    pub fn abort_route(&mut self, grid: &mut TileGrid) {
        self.policy
            .release_route(grid, &self.route, self.convoy, self.desc.kind);
        self.route = Route::new(vec![self.tile]);
        self.route_index = 1;
        self.tile_next = Tile::INVALID;
        self.flags.at_route_end = true;
    }

    // ── probing ───────────────────────────────────────────────────────────

    /// Probe the next route tile without moving.
    ///
    /// Static legality applies to every vehicle; the dynamic check (and any
    /// claims it takes) is the lead's alone — followers inherit cleared
    /// tiles.
    pub fn check_next_tile(
        &mut self,
        grid: &mut TileGrid,
        params: &WorldParams,
        router: &dyn Router,
        alt_targets: &[Tile],
    ) -> WayCheck {
        let Some(next) = self.route.at(self.route_index) else {
            return WayCheck::Free;
        };

        if !self
            .policy
            .is_tile_traversable(grid, next, self.desc.kind, self.pos.direction())
        {
            return WayCheck::RouteInvalid;
        }
        if !self.flags.is_lead {
            return WayCheck::Free;
        }

        let mut q = MoveQuery {
            grid,
            params,
            router,
            route: &mut self.route,
            index: self.route_index,
            vehicle: self.id,
            convoy: self.convoy,
            desc: &self.desc,
            direction: self.pos.direction(),
            is_lead: self.flags.is_lead,
            alt_targets,
        };
        self.policy.check_way_free(&mut q)
    }

    // ── movement ──────────────────────────────────────────────────────────

    /// Travel up to `dist` steps, crossing tile boundaries as probes allow.
    pub fn advance(
        &mut self,
        grid: &mut TileGrid,
        params: &WorldParams,
        router: &dyn Router,
        now: Tick,
        dist: u32,
        alt_targets: &[Tile],
    ) -> AdvanceOutcome {
        let mut outcome = AdvanceOutcome::default();
        let mut remaining = dist;

        loop {
            if self.flags.at_route_end {
                outcome.arrived = true;
                break;
            }
            if remaining == 0 {
                break;
            }

            let room = self.pos.to_boundary();
            if remaining < room {
                let adv = self.pos.advance(remaining);
                outcome.consumed += adv.consumed;
                break;
            }

            // The budget reaches the boundary: probe before spending the
            // crossing step so a refusal leaves no trace.
            match self.check_next_tile(grid, params, router, alt_targets) {
                WayCheck::Free => {
                    let adv = self.pos.advance(room);
                    outcome.consumed += adv.consumed;
                    remaining -= adv.consumed;
                    match self.commit_tile_transition(grid, params) {
                        Ok(()) => {
                            outcome.tiles_crossed += 1;
                            self.last_progress = now;
                        }
                        Err(e) => {
                            log::warn!("{}: transition failed: {}", self.id, e);
                            outcome.failure = Some(MoveFailure::RouteInvalid);
                            break;
                        }
                    }
                }
                WayCheck::Blocked { retry_ticks } => {
                    outcome.consumed += self.pos.stop_at_edge();
                    outcome.blocked = Some(retry_ticks);
                    break;
                }
                WayCheck::HoldingPattern { rewind } => {
                    // Go around: rewind the cursor and keep flying the loop.
                    // A route too short to absorb the rewind degrades to a
                    // plain wait, or the loop would never consume steps.
                    let new_index = self.route_index.saturating_sub(rewind).max(1);
                    if new_index == self.route_index {
                        outcome.consumed += self.pos.stop_at_edge();
                        outcome.blocked = Some(HOLDING_RETRY_TICKS);
                        break;
                    }
                    self.rewind_route(grid, params, rewind);
                }
                WayCheck::RouteInvalid => {
                    outcome.failure = Some(MoveFailure::RouteInvalid);
                    break;
                }
                WayCheck::RunwayTooShort => {
                    outcome.failure = Some(MoveFailure::RunwayTooShort);
                    break;
                }
            }
        }

        if outcome.consumed > 0 {
            self.flags.has_moved = true;
        }
        outcome
    }

    /// Cross onto the next route tile.  See the module docs for the strict
    /// ordering this maintains.
    fn commit_tile_transition(
        &mut self,
        grid: &mut TileGrid,
        params: &WorldParams,
    ) -> VehicleResult<()> {
        let next = self
            .route
            .at(self.route_index)
            .ok_or(VehicleError::NoGround(Tile::INVALID))?;
        let old = self.tile;
        let leaving = PolicyEvent {
            vehicle: self.id,
            convoy: self.convoy,
            kind: self.desc.kind,
            index: self.route_index.saturating_sub(1),
            is_lead: self.flags.is_lead,
            is_tail: self.flags.is_tail,
        };

        // 1. Release the old tile.
        if let Some(g) = grid.lookup_mut(old) {
            g.leave(self.id);
        }
        self.policy.on_leave_tile(grid, old, leaving);

        // 2. Advance the route cursor.
        self.tile_prev = old;
        self.tile = next;
        self.route_index += 1;
        self.flags.at_route_end = self.route_index >= self.route.len();
        self.tile_next = self.route.at(self.route_index).unwrap_or(Tile::INVALID);

        // 3. Claim the new tile.  The bearing over a 4-connected route comes
        //    from the prev→next chord, which is what makes zig-zag sequences
        //    read as diagonal travel.
        let dir = if self.tile_next != Tile::INVALID {
            self.tile_prev.direction_to(self.tile_next)
        } else {
            self.tile_prev.direction_to(self.tile)
        };
        let ground = grid.lookup_mut(next).ok_or(VehicleError::NoGround(next))?;
        ground.enter(Occupant {
            vehicle: self.id,
            convoy: self.convoy,
            direction: dir,
            kind: self.desc.kind,
        });
        let slope = ground.slope;
        let way_speed = ground
            .way(self.desc.kind)
            .map_or(Speed::UNLIMITED, |w| w.max_speed);

        let entered = PolicyEvent {
            index: self.route_index - 1,
            ..leaving
        };
        self.policy.on_enter_tile(grid, next, entered);

        // 4. Recompute kinematic state for the new tile.
        if let Some(deg) = dir.direction_degrees() {
            self.history.push(deg);
        }
        self.pos.begin_tile();
        self.pos.set_direction(dir, params);
        self.pos.recalc_height(slope);
        let rise = slope.rise_along(dir);
        self.speed_limit = calc_speed_limit(
            way_speed,
            self.desc.max_speed,
            &self.history,
            dir.direction_degrees(),
            rise,
        );
        self.friction = self.desc.friction
            + if rise > 0 { 5 } else { 0 }
            + if dir.is_diagonal() { 1 } else { 0 };
        self.image = self.desc.image_for(dir);
        Ok(())
    }

    /// Holding pattern: move the route cursor back `rewind` tiles and
    /// relocate there.  The route itself is untouched, so the same tiles are
    /// flown again.
    fn rewind_route(&mut self, grid: &mut TileGrid, params: &WorldParams, rewind: usize) {
        let new_index = self.route_index.saturating_sub(rewind).max(1);
        log::debug!(
            "{}: holding pattern, route cursor {} -> {}",
            self.id,
            self.route_index,
            new_index
        );
        if let Some(g) = grid.lookup_mut(self.tile) {
            g.leave(self.id);
        }

        self.route_index = new_index;
        self.tile = self.route.at(new_index - 1).unwrap_or(self.tile);
        self.tile_prev = if new_index >= 2 {
            self.route.at(new_index - 2).unwrap_or(self.tile)
        } else {
            self.tile
        };
        self.tile_next = self.route.at(new_index).unwrap_or(Tile::INVALID);

        let dir = if self.tile_next != Tile::INVALID {
            self.tile_prev.direction_to(self.tile_next)
        } else {
            self.pos.direction()
        };
        self.pos.begin_tile();
        self.pos.set_direction(dir, params);
        if let Some(g) = grid.lookup_mut(self.tile) {
            self.pos.recalc_height(g.slope);
            g.enter(Occupant {
                vehicle: self.id,
                convoy: self.convoy,
                direction: dir,
                kind: self.desc.kind,
            });
        }
        self.image = self.desc.image_for(dir);
    }

    // ── status & rendering ────────────────────────────────────────────────

    /// No forward progress for longer than the patience window.
    pub fn is_stuck(&self, now: Tick) -> bool {
        !self.flags.at_route_end && now.since(self.last_progress) > STUCK_AFTER_TICKS
    }

    /// Snapshot for the drawing pass, scaled to `raster_width`.  Road
    /// vehicles ride offset toward their driving side, mirrored when the
    /// world drives on the left.
    pub fn pose(&self, params: &WorldParams, raster_width: i16) -> VehiclePose {
        let (mut x_off, mut y_off) = self.pos.screen_offset(raster_width);
        if self.desc.kind == WayKind::Road {
            let (lx, ly) = self.pos.lane_offset(raster_width, params.drives_on_left);
            x_off += lx;
            y_off += ly;
        }
        VehiclePose {
            tile: self.tile,
            direction: self.pos.direction(),
            image: self.image,
            x_off,
            y_off,
        }
    }
}
