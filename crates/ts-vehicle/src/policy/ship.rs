//! Ship movement: open-water occupancy plus lock chambers.
//!
//! Water tiles behave like road tiles — one vessel at a time, probe and
//! retry, no standing reservations.  The exception is a lock chamber, which
//! is claimed like a rail block tile: the claim is taken on entry approval
//! and dropped when the vessel's tail clears the chamber, so an opposing
//! ship can never meet it halfway through.

use ts_core::{ConvoyHandle, Ribi, Tile, WayKind};
use ts_grid::TileGrid;
use ts_route::Route;

use super::{MoveQuery, PolicyEvent, WayCheck};

/// Suggested retry delay when the water ahead is occupied.
const SHIP_RETRY_TICKS: u32 = 4;

#[derive(Clone, Debug, Default)]
pub struct ShipPolicy;

impl ShipPolicy {
    pub fn is_tile_traversable(&self, grid: &TileGrid, tile: Tile, travel_dir: Ribi) -> bool {
        // Open water is traversable from any side; canals restrict by ribi.
        if grid.is_water(tile) {
            return true;
        }
        let ribi = grid.way_ribi(tile, WayKind::Water);
        !ribi.is_none() && ribi.intersects(travel_dir.backward())
    }

    pub fn check_way_free(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let Some(next) = q.next_tile() else {
            return WayCheck::Free;
        };
        let Some(ground) = q.grid.lookup(next) else {
            return WayCheck::RouteInvalid;
        };

        if ground.is_occupied_by_other(WayKind::Water, q.vehicle) {
            return WayCheck::Blocked {
                retry_ticks: SHIP_RETRY_TICKS,
            };
        }

        // Lock chambers are exclusive: claim before entering, like a one-tile
        // block.  `reserve` succeeding for the current holder makes re-probes
        // after a blocked tick harmless.
        let is_lock = ground.way(WayKind::Water).is_some_and(|w| w.lock);
        if is_lock {
            let claimed = q
                .grid
                .lookup_mut(next)
                .and_then(|g| g.way_mut(WayKind::Water))
                .is_some_and(|w| w.reserve(q.convoy));
            if !claimed {
                return WayCheck::Blocked {
                    retry_ticks: SHIP_RETRY_TICKS,
                };
            }
            log::trace!("{} claimed lock chamber at {}", q.convoy, next);
        }

        WayCheck::Free
    }

    /// The tail leaving a lock chamber frees it for opposing traffic.
    pub fn on_leave_tile(&mut self, grid: &mut TileGrid, tile: Tile, ev: PolicyEvent) {
        if !ev.is_tail {
            return;
        }
        if let Some(way) = grid.lookup_mut(tile).and_then(|g| g.way_mut(WayKind::Water))
            && way.lock
        {
            way.unreserve(ev.convoy);
        }
    }

    /// Drop any lock claims along an abandoned route.
    pub fn release_route(&mut self, grid: &mut TileGrid, route: &Route, convoy: ConvoyHandle) {
        for &tile in route.tiles() {
            if let Some(way) = grid.lookup_mut(tile).and_then(|g| g.way_mut(WayKind::Water))
                && way.lock
            {
                way.unreserve(convoy);
            }
        }
    }
}
