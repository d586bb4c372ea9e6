//! Rail movement: signal-governed block reservation.
//!
//! # The block protocol
//!
//! A *block* is a maximal run of track tiles between two block boundaries —
//! signals, level crossings, or the route end.  At most one convoy holds a
//! block at any time; the claim lives on the way objects, not on the train.
//!
//! [`block_reserver`] walks the route from a start index, claiming tile by
//! tile until it passes the next boundary or runs out of route.  If it meets a
//! tile held by another convoy it stops and reports the partial count —
//! **the caller must unwind that partial range before returning control**.
//! A block is an atomic unit: two trains each holding half of one is a
//! deadlock no retry can resolve.
//!
//! Release is the tail's job: as the last vehicle of the convoy leaves a
//! tile, that tile is freed.  Releasing a tile the convoy does not hold is
//! a no-op everywhere, so rollback, tail release, and route-abort release
//! can overlap without double-free accounting.

use ts_core::{ConvoyHandle, Ribi, Tile, WayKind};
use ts_grid::{SignalKind, TileGrid};
use ts_route::Route;

use super::{MoveQuery, PolicyEvent, WayCheck};

/// Suggested retry delay when a block is held by another convoy.
const RAIL_RETRY_TICKS: u32 = 4;

// ── block_reserver ────────────────────────────────────────────────────────────

/// What a [`block_reserver`] call should do to the walked tiles.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ReserveMode {
    /// Claim tiles for the convoy; stop after the next signal.
    Reserve,
    /// Release the convoy's own claims through to the route end (walks
    /// through signals so multi-block rollback and route abort work).
    Unreserve,
    /// Release anyone's claims — route recalculation after infrastructure
    /// changes must clear stale holders or the block deadlocks.
    ForceUnreserve,
}

/// Result of one [`block_reserver`] walk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockReservation {
    /// `false` iff a `Reserve` walk hit a tile held by another convoy.
    pub success: bool,
    /// Tiles claimed (or released) before the walk stopped.
    pub tiles: usize,
    /// Route index of the signal tile that terminated a `Reserve` walk.
    pub next_signal: Option<usize>,
}

/// Walk `route` from `start_index`, reserving or releasing way tiles of
/// `kind` for `convoy`.
///
/// A `Reserve` walk claims up to and including the next signal or level
/// crossing tile (both mark a block boundary; the tile under it belongs to
/// this block).  Reaching the route end, or a tile without a matching way,
/// ends the walk successfully.  On conflict the partial claim is reported, not
/// unwound — the caller owns the rollback.
pub fn block_reserver(
    grid: &mut TileGrid,
    route: &Route,
    start_index: usize,
    convoy: ConvoyHandle,
    kind: WayKind,
    mode: ReserveMode,
) -> BlockReservation {
    debug_assert!(kind.is_rail_family() || kind == WayKind::Air);

    let mut tiles = 0;
    let mut next_signal = None;
    let mut i = start_index;

    while let Some(tile) = route.at(i) {
        let Some(way) = grid.lookup_mut(tile).and_then(|g| g.way_mut(kind)) else {
            break; // end of rail on this route
        };

        match mode {
            ReserveMode::Reserve => {
                if !way.reserve(convoy) {
                    log::debug!(
                        "block_reserver: {} conflicts at {} (held by {:?}), {} tiles partial",
                        convoy,
                        tile,
                        way.reserved_by(),
                        tiles
                    );
                    return BlockReservation {
                        success: false,
                        tiles,
                        next_signal,
                    };
                }
                tiles += 1;
                if (way.signal.is_some() || way.crossing) && i > start_index {
                    if way.signal.is_some() {
                        next_signal = Some(i);
                    }
                    break;
                }
            }
            ReserveMode::Unreserve => {
                way.unreserve(convoy);
                tiles += 1;
            }
            ReserveMode::ForceUnreserve => {
                way.unreserve_any();
                tiles += 1;
            }
        }
        i += 1;
    }

    BlockReservation {
        success: true,
        tiles,
        next_signal,
    }
}

/// Read-only variant: is the block starting at `start_index` entirely free
/// for `convoy`?  Used by pre-signals to look one block further without
/// claiming it.
fn block_is_free(
    grid: &TileGrid,
    route: &Route,
    start_index: usize,
    convoy: ConvoyHandle,
    kind: WayKind,
) -> bool {
    let mut i = start_index;
    while let Some(tile) = route.at(i) {
        let Some(way) = grid.lookup(tile).and_then(|g| g.way(kind)) else {
            break;
        };
        if !way.is_free_for(convoy) {
            return false;
        }
        if (way.signal.is_some() || way.crossing) && i > start_index {
            break;
        }
        i += 1;
    }
    true
}

// ── RailPolicy ────────────────────────────────────────────────────────────────

/// Per-train reservation cursor.  `reserved_to` is one past the last route
/// index the lead vehicle has cleared; probes below it ride on the existing
/// claim.
#[derive(Clone, Debug, Default)]
pub struct RailPolicy {
    reserved_to: usize,
}

impl RailPolicy {
    pub fn is_tile_traversable(
        &self,
        grid: &TileGrid,
        tile: Tile,
        kind: WayKind,
        travel_dir: Ribi,
    ) -> bool {
        let ribi = grid.way_ribi(tile, kind);
        !ribi.is_none() && ribi.intersects(travel_dir.backward())
    }

    pub fn check_way_free(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let Some(next) = q.next_tile() else {
            return WayCheck::Free;
        };
        if q.index < self.reserved_to {
            return WayCheck::Free; // riding an existing claim
        }

        let kind = q.desc.kind;
        let signal = q
            .grid
            .lookup(next)
            .and_then(|g| g.way(kind))
            .and_then(|w| w.signal)
            .map(|s| s.kind);

        match signal {
            None | Some(SignalKind::Block) => self.reserve_block(q),
            Some(SignalKind::Pre) => self.reserve_pre(q),
            Some(SignalKind::LongBlock) => self.reserve_long_block(q),
            Some(SignalKind::Choose) => self.reserve_choose(q),
        }
    }

    /// Plain block signal (or mid-block start): claim through to the next
    /// signal; on conflict, unwind the partial claim and report blocked.
    fn reserve_block(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let from = q.index;
        let kind = q.desc.kind;
        let r = block_reserver(q.grid, q.route, from, q.convoy, kind, ReserveMode::Reserve);
        if !r.success {
            block_reserver(q.grid, q.route, from, q.convoy, kind, ReserveMode::Unreserve);
            return WayCheck::Blocked {
                retry_ticks: RAIL_RETRY_TICKS,
            };
        }
        self.granted(q, from + r.tiles, r.next_signal);
        WayCheck::Free
    }

    /// Pre-signal: this block must be claimable *and* the block beyond the
    /// next signal must currently be free.
    fn reserve_pre(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let from = q.index;
        let kind = q.desc.kind;
        let r = block_reserver(q.grid, q.route, from, q.convoy, kind, ReserveMode::Reserve);
        let beyond_free = r.success
            && r.next_signal
                .is_none_or(|ns| block_is_free(q.grid, q.route, ns + 1, q.convoy, kind));
        if !beyond_free {
            block_reserver(q.grid, q.route, from, q.convoy, kind, ReserveMode::Unreserve);
            return WayCheck::Blocked {
                retry_ticks: RAIL_RETRY_TICKS,
            };
        }
        self.granted(q, from + r.tiles, r.next_signal);
        WayCheck::Free
    }

    /// Long-block signal: claim every block from here to the route end in
    /// one atomic attempt (single-track lines with passing loops).
    fn reserve_long_block(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let from = q.index;
        let kind = q.desc.kind;
        let mut total = 0;
        let mut idx = from;
        loop {
            let r = block_reserver(q.grid, q.route, idx, q.convoy, kind, ReserveMode::Reserve);
            if !r.success {
                block_reserver(q.grid, q.route, from, q.convoy, kind, ReserveMode::Unreserve);
                return WayCheck::Blocked {
                    retry_ticks: RAIL_RETRY_TICKS,
                };
            }
            total += r.tiles;
            match r.next_signal {
                Some(ns) if ns + 1 < q.route.len() => idx = ns + 1,
                _ => break,
            }
        }
        self.granted(q, from + total, None);
        WayCheck::Free
    }

    /// Choose signal: try the scheduled platform first; if its block is
    /// taken, route to an alternative platform and claim along the new tail.
    fn reserve_choose(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        if self.reserve_block(q).is_free() {
            return WayCheck::Free;
        }
        let from = q.index;
        let kind = q.desc.kind;
        let Some(branch_tile) = q.route.at(from) else {
            return WayCheck::Free;
        };
        let orig_tail: Vec<Tile> = q.route.tiles()[from..].to_vec();

        for &alt in q.alt_targets {
            let Ok(alt_route) =
                q.router
                    .calc_route(q.grid, branch_tile, alt, kind, q.desc.max_speed)
            else {
                continue;
            };
            q.route.splice_tail(from, alt_route.tiles().to_vec());
            if self.reserve_block(q).is_free() {
                log::debug!("choose signal: {} diverted to platform {}", q.convoy, alt);
                return WayCheck::Free;
            }
        }

        // Every branch failed; restore the scheduled route untouched.
        q.route.splice_tail(from, orig_tail);
        WayCheck::Blocked {
            retry_ticks: RAIL_RETRY_TICKS,
        }
    }

    /// Record a granted claim and open the signal that ended the walk.
    fn granted(&mut self, q: &mut MoveQuery<'_>, reserved_to: usize, next_signal: Option<usize>) {
        self.reserved_to = reserved_to;
        if let Some(ns) = next_signal
            && let Some(sig) = q
                .route
                .at(ns)
                .and_then(|t| q.grid.lookup_mut(t))
                .and_then(|g| g.way_mut(q.desc.kind))
                .and_then(|w| w.signal.as_mut())
        {
            sig.open = true;
        }
        log::trace!("{} reserved through route index {}", q.convoy, reserved_to);
    }

    /// Tail release: free the tile just left; a signal there falls back to
    /// closed.
    pub fn on_leave_tile(&mut self, grid: &mut TileGrid, tile: Tile, ev: PolicyEvent) {
        if !ev.is_tail {
            return;
        }
        if let Some(way) = grid.lookup_mut(tile).and_then(|g| g.way_mut(ev.kind)) {
            way.unreserve(ev.convoy);
            if let Some(sig) = way.signal.as_mut() {
                sig.open = false;
            }
        }
    }

    /// Route abort/recalculation: drop every claim along the old route.
    pub fn release_route(
        &mut self,
        grid: &mut TileGrid,
        route: &Route,
        convoy: ConvoyHandle,
        kind: WayKind,
    ) {
        block_reserver(grid, route, 0, convoy, kind, ReserveMode::Unreserve);
        self.reserved_to = 0;
        log::debug!("{} released all block reservations", convoy);
    }
}
