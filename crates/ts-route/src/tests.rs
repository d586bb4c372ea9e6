//! Unit tests for ts-route.

use ts_core::{Ribi, Speed, Tile, WayKind};
use ts_grid::{TileGrid, Way};

use crate::{Route, RouteError, Router, TileRouter};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t(x: i16, y: i16) -> Tile {
    Tile::new(x, y, 0)
}

/// Straight east-west rail line over `0..len` at y = 0.
fn rail_line(len: i16, kmh: u32) -> TileGrid {
    let mut grid = TileGrid::new();
    for x in 0..len {
        let mut ribi = Ribi::NONE;
        if x > 0 {
            ribi = ribi | Ribi::WEST;
        }
        if x < len - 1 {
            ribi = ribi | Ribi::EAST;
        }
        grid.lay_way(t(x, 0), Way::new(WayKind::Rail, ribi, Speed::from_kmh(kmh)));
    }
    grid
}

#[cfg(test)]
mod route {
    use super::*;

    #[test]
    fn cursor_helpers() {
        let r = Route::new(vec![t(0, 0), t(1, 0), t(2, 0)]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.at(1), Some(t(1, 0)));
        assert_eq!(r.at(3), None);
        assert_eq!(r.last(), Some(t(2, 0)));
        assert_eq!(r.find_from(t(2, 0), 1), Some(2));
        assert_eq!(r.find_from(t(0, 0), 1), None);
    }

    #[test]
    fn splice_tail_keeps_head() {
        let mut r = Route::new(vec![t(0, 0), t(1, 0), t(2, 0), t(3, 0)]);
        r.splice_tail(2, vec![t(2, 1), t(2, 2)]);
        assert_eq!(r.tiles(), &[t(0, 0), t(1, 0), t(2, 1), t(2, 2)]);
    }
}

#[cfg(test)]
mod router {
    use super::*;

    #[test]
    fn straight_line_route() {
        let grid = rail_line(5, 120);
        let r = TileRouter
            .calc_route(&grid, t(0, 0), t(4, 0), WayKind::Rail, Speed::UNLIMITED)
            .unwrap();
        assert_eq!(r.tiles(), &[t(0, 0), t(1, 0), t(2, 0), t(3, 0), t(4, 0)]);
    }

    #[test]
    fn trivial_route_is_single_tile() {
        let grid = rail_line(2, 120);
        let r = TileRouter
            .calc_route(&grid, t(0, 0), t(0, 0), WayKind::Rail, Speed::UNLIMITED)
            .unwrap();
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn disconnected_goal_is_no_route() {
        let mut grid = rail_line(3, 120);
        // Island tile with no connection back.
        grid.lay_way(t(9, 9), Way::new(WayKind::Rail, Ribi::NONE, Speed::from_kmh(80)));
        let err = TileRouter
            .calc_route(&grid, t(0, 0), t(9, 9), WayKind::Rail, Speed::UNLIMITED)
            .unwrap_err();
        assert!(matches!(err, RouteError::NoRoute { .. }));
    }

    #[test]
    fn start_without_way_is_bad_start() {
        let grid = rail_line(3, 120);
        let err = TileRouter
            .calc_route(&grid, t(7, 7), t(2, 0), WayKind::Rail, Speed::UNLIMITED)
            .unwrap_err();
        assert!(matches!(err, RouteError::BadStart(_)));
    }

    #[test]
    fn wrong_way_kind_does_not_connect() {
        let grid = rail_line(3, 120);
        let err = TileRouter
            .calc_route(&grid, t(0, 0), t(2, 0), WayKind::Road, Speed::UNLIMITED)
            .unwrap_err();
        assert!(matches!(err, RouteError::BadStart(_)));
    }

    #[test]
    fn prefers_faster_detour() {
        // Two parallel east-west lines: y=0 slow (30 km/h), y=2 fast
        // (200 km/h), joined by 100 km/h links at both ends.
        let mut grid = TileGrid::new();
        for x in 0..6 {
            let mut ribi = Ribi::NONE;
            if x > 0 {
                ribi = ribi | Ribi::WEST;
            }
            if x < 5 {
                ribi = ribi | Ribi::EAST;
            }
            let end_link = x == 0 || x == 5;
            grid.lay_way(
                t(x, 0),
                Way::new(
                    WayKind::Rail,
                    if end_link { ribi | Ribi::SOUTH } else { ribi },
                    Speed::from_kmh(30),
                ),
            );
            grid.lay_way(
                t(x, 2),
                Way::new(
                    WayKind::Rail,
                    if end_link { ribi | Ribi::NORTH } else { ribi },
                    Speed::from_kmh(200),
                ),
            );
        }
        for x in [0, 5] {
            grid.lay_way(
                t(x, 1),
                Way::new(WayKind::Rail, Ribi::NORTH | Ribi::SOUTH, Speed::from_kmh(100)),
            );
        }

        let r = TileRouter
            .calc_route(&grid, t(0, 0), t(5, 0), WayKind::Rail, Speed::UNLIMITED)
            .unwrap();
        // The time-optimal path dips down to the fast line.
        assert!(r.tiles().contains(&t(2, 2)), "route was {:?}", r.tiles());
    }

    #[test]
    fn slow_vehicle_ignores_fast_detour() {
        // Same world as above, but a 30 km/h vehicle gains nothing from the
        // fast line, so the direct path wins on distance.
        let mut grid = TileGrid::new();
        for x in 0..6 {
            let mut ribi = Ribi::NONE;
            if x > 0 {
                ribi = ribi | Ribi::WEST;
            }
            if x < 5 {
                ribi = ribi | Ribi::EAST;
            }
            let end_link = x == 0 || x == 5;
            grid.lay_way(
                t(x, 0),
                Way::new(
                    WayKind::Rail,
                    if end_link { ribi | Ribi::SOUTH } else { ribi },
                    Speed::from_kmh(30),
                ),
            );
            grid.lay_way(
                t(x, 2),
                Way::new(
                    WayKind::Rail,
                    if end_link { ribi | Ribi::NORTH } else { ribi },
                    Speed::from_kmh(200),
                ),
            );
        }
        for x in [0, 5] {
            grid.lay_way(
                t(x, 1),
                Way::new(WayKind::Rail, Ribi::NORTH | Ribi::SOUTH, Speed::from_kmh(100)),
            );
        }

        let r = TileRouter
            .calc_route(&grid, t(0, 0), t(5, 0), WayKind::Rail, Speed::from_kmh(30))
            .unwrap();
        assert_eq!(r.len(), 6, "route was {:?}", r.tiles());
    }
}
