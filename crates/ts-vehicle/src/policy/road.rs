//! Road movement: optimistic single-occupant tiles, junction lookahead.
//!
//! Road traffic takes no reservations.  Every probe re-checks the target
//! tile (and, at junctions, one tile beyond) against the live occupancy
//! records; a negative answer has no side effects and is simply retried a
//! few ticks later.  First-come-first-served emerges from scheduler order.

use ts_core::{Ribi, Tile, WayKind};
use ts_grid::TileGrid;

use super::{MoveQuery, WayCheck};

/// Suggested retry delay when stuck behind another road vehicle.
const ROAD_RETRY_TICKS: u32 = 2;

#[derive(Clone, Debug, Default)]
pub struct RoadPolicy;

impl RoadPolicy {
    pub fn is_tile_traversable(&self, grid: &TileGrid, tile: Tile, travel_dir: Ribi) -> bool {
        let ribi = grid.way_ribi(tile, WayKind::Road);
        // The tile must open toward where we come from.
        !ribi.is_none() && ribi.intersects(travel_dir.backward())
    }

    pub fn check_way_free(&mut self, q: &mut MoveQuery<'_>) -> WayCheck {
        let Some(next) = q.next_tile() else {
            return WayCheck::Free; // route end — arrival, nothing to clear
        };
        let Some(ground) = q.grid.lookup(next) else {
            return WayCheck::RouteInvalid;
        };

        if ground.is_occupied_by_other(WayKind::Road, q.vehicle) {
            return WayCheck::Blocked {
                retry_ticks: ROAD_RETRY_TICKS,
            };
        }

        // Junction: don't enter unless the exit tile can be cleared too,
        // otherwise we gridlock the crossing.
        let is_junction = ground.way_ribi(WayKind::Road).branch_count() >= 3;
        if is_junction {
            if let Some(exit) = q.route.at(q.index + 1) {
                let exit_blocked = q
                    .grid
                    .lookup(exit)
                    .is_some_and(|g| g.is_occupied_by_other(WayKind::Road, q.vehicle));
                if exit_blocked && !self.choose_exit(q, next, exit) {
                    return WayCheck::Blocked {
                        retry_ticks: ROAD_RETRY_TICKS,
                    };
                }
            }
        }

        WayCheck::Free
    }

    /// Junction path decision: ask the external router for another way from
    /// the junction to the destination and take it if its first hop is both
    /// different from the blocked exit and currently free.
    fn choose_exit(&self, q: &mut MoveQuery<'_>, junction: Tile, blocked_exit: Tile) -> bool {
        let Some(goal) = q.route.last() else {
            return false;
        };
        let Ok(alt) = q
            .router
            .calc_route(q.grid, junction, goal, WayKind::Road, q.desc.max_speed)
        else {
            return false;
        };
        let Some(first_hop) = alt.at(1) else {
            return false;
        };
        if first_hop == blocked_exit {
            return false;
        }
        let free = q
            .grid
            .lookup(first_hop)
            .is_some_and(|g| !g.is_occupied_by_other(WayKind::Road, q.vehicle));
        if !free {
            return false;
        }

        log::debug!(
            "road vehicle {} rerouting around blocked exit {} at junction {}",
            q.vehicle,
            blocked_exit,
            junction
        );
        let tail: Vec<Tile> = alt.tiles()[1..].to_vec();
        q.route.splice_tail(q.index + 1, tail);
        true
    }
}
