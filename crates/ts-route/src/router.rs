//! Routing trait and default Dijkstra implementation.
//!
//! # Cost model
//!
//! Edge cost is the straight-tile traversal step count scaled by the
//! slower of the way's static limit and the vehicle's maximum — a time
//! proxy, so fast track is preferred over short-but-slow shortcuts.
//! All costs are integral; ties break on tile order for determinism.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use ts_core::params::STEPS_PER_TILE;
use ts_core::{Ribi, Speed, Tile, WayKind};
use ts_grid::TileGrid;

use crate::route::Route;
use crate::RouteError;

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable pathfinder.
///
/// The movement core treats routing as an external collaborator: it asks for
/// an ordered tile sequence and never looks inside the algorithm.  Choose
/// signals and road junctions also route through this trait, so the path-cost
/// function stays outside the vehicle code.
pub trait Router {
    /// Compute a route from `start` to `goal` over ways of `kind`.
    ///
    /// `max_speed` caps the per-edge speed assumption (a slow vehicle gains
    /// nothing from fast track).  `start == goal` yields a single-tile route.
    fn calc_route(
        &self,
        grid: &TileGrid,
        start: Tile,
        goal: Tile,
        kind: WayKind,
        max_speed: Speed,
    ) -> Result<Route, RouteError>;
}

// ── TileRouter ────────────────────────────────────────────────────────────────

/// Deterministic Dijkstra over 4-connected way tiles.
///
/// An edge `a → b` exists when `a`'s way opens toward `b` **and** `b`'s way
/// opens back toward `a`.  One-way infrastructure is expressed by asymmetric
/// connection masks.
pub struct TileRouter;

impl Router for TileRouter {
    fn calc_route(
        &self,
        grid: &TileGrid,
        start: Tile,
        goal: Tile,
        kind: WayKind,
        max_speed: Speed,
    ) -> Result<Route, RouteError> {
        dijkstra(grid, start, goal, kind, max_speed)
    }
}

const CARDINALS: [Ribi; 4] = [Ribi::NORTH, Ribi::EAST, Ribi::SOUTH, Ribi::WEST];

/// Cost of crossing one tile: steps × 1024 / speed-in-kmh, saturating.
#[inline]
fn tile_cost(way_speed: Speed, max_speed: Speed) -> u32 {
    let kmh = way_speed.min(max_speed).to_kmh().clamp(1, i32::MAX) as u32;
    (STEPS_PER_TILE as u32 * 1024) / kmh
}

fn dijkstra(
    grid: &TileGrid,
    start: Tile,
    goal: Tile,
    kind: WayKind,
    max_speed: Speed,
) -> Result<Route, RouteError> {
    if grid.way_ribi(start, kind).is_none() {
        return Err(RouteError::BadStart(start));
    }
    if start == goal {
        return Ok(Route::new(vec![start]));
    }

    // dist[t] = best known cost to reach t; prev[t] = predecessor tile.
    let mut dist: FxHashMap<Tile, u32> = FxHashMap::default();
    let mut prev: FxHashMap<Tile, Tile> = FxHashMap::default();
    dist.insert(start, 0);

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key Tile ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, Tile)>> = BinaryHeap::new();
    heap.push(Reverse((0, start)));

    while let Some(Reverse((cost, tile))) = heap.pop() {
        if tile == goal {
            return Ok(reconstruct(&prev, start, goal));
        }
        // Skip stale heap entries.
        if dist.get(&tile).is_some_and(|&d| cost > d) {
            continue;
        }

        let here = grid.way_ribi(tile, kind);
        for dir in CARDINALS {
            if !here.contains(dir) {
                continue;
            }
            let next = tile.neighbour(dir);
            let Some(way) = grid.lookup(next).and_then(|g| g.way(kind)) else {
                continue;
            };
            if !way.ribi.contains(dir.backward()) {
                continue;
            }
            let new_cost = cost.saturating_add(tile_cost(way.max_speed, max_speed));
            if dist.get(&next).is_none_or(|&d| new_cost < d) {
                dist.insert(next, new_cost);
                prev.insert(next, tile);
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(RouteError::NoRoute { from: start, to: goal })
}

fn reconstruct(prev: &FxHashMap<Tile, Tile>, start: Tile, goal: Tile) -> Route {
    let mut tiles = vec![goal];
    let mut cur = goal;
    while cur != start {
        cur = prev[&cur];
        tiles.push(cur);
    }
    tiles.reverse();
    Route::new(tiles)
}
