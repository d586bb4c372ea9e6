//! Unit tests for ts-grid.

use ts_core::{ConvoyHandle, ConvoyId, Ribi, Speed, Tile, VehicleId, WayKind};

use crate::{Ground, Occupant, Slope, TileGrid, Way};

fn convoy(n: u32) -> ConvoyHandle {
    ConvoyHandle::new(ConvoyId(n), 1)
}

fn rail_way(ribi: Ribi) -> Way {
    Way::new(WayKind::Rail, ribi, Speed::from_kmh(160))
}

#[cfg(test)]
mod reservation {
    use super::*;

    #[test]
    fn reserve_then_conflict() {
        let mut way = rail_way(Ribi::NORTH | Ribi::SOUTH);
        assert!(way.reserve(convoy(1)));
        assert!(way.is_reserved());
        assert!(!way.reserve(convoy(2)));
        // Failed attempt leaves the holder unchanged.
        assert_eq!(way.reserved_by(), Some(convoy(1)));
    }

    #[test]
    fn re_reserve_by_holder_is_noop_success() {
        let mut way = rail_way(Ribi::NORTH | Ribi::SOUTH);
        assert!(way.reserve(convoy(1)));
        assert!(way.reserve(convoy(1)));
        way.unreserve(convoy(1));
        assert!(!way.is_reserved()); // single release suffices — no nesting
    }

    #[test]
    fn unreserve_is_idempotent_and_holder_checked() {
        let mut way = rail_way(Ribi::NORTH | Ribi::SOUTH);
        way.unreserve(convoy(1)); // never reserved: no-op
        assert!(!way.is_reserved());

        assert!(way.reserve(convoy(1)));
        way.unreserve(convoy(2)); // not the holder: no-op
        assert_eq!(way.reserved_by(), Some(convoy(1)));
        way.unreserve(convoy(1));
        way.unreserve(convoy(1)); // double release: no-op
        assert!(!way.is_reserved());
    }

    #[test]
    fn stale_generation_cannot_release() {
        let mut way = rail_way(Ribi::NORTH | Ribi::SOUTH);
        let live = ConvoyHandle::new(ConvoyId(1), 2);
        let stale = ConvoyHandle::new(ConvoyId(1), 1);
        assert!(way.reserve(live));
        way.unreserve(stale);
        assert!(way.is_reserved());
        assert!(!way.is_free_for(stale));
        assert!(way.is_free_for(live));
    }

    #[test]
    fn force_release_clears_any_holder() {
        let mut way = rail_way(Ribi::NORTH | Ribi::SOUTH);
        assert!(way.reserve(convoy(7)));
        way.unreserve_any();
        assert!(!way.is_reserved());
    }
}

#[cfg(test)]
mod occupancy {
    use super::*;

    fn occ(vehicle: u32, dir: Ribi) -> Occupant {
        Occupant {
            vehicle: VehicleId(vehicle),
            convoy: convoy(vehicle),
            direction: dir,
            kind: WayKind::Road,
        }
    }

    #[test]
    fn enter_leave_roundtrip() {
        let mut g = Ground::default();
        g.enter(occ(1, Ribi::EAST));
        assert!(g.is_occupied_by_other(WayKind::Road, VehicleId(2)));
        assert!(!g.is_occupied_by_other(WayKind::Road, VehicleId(1)));
        g.leave(VehicleId(1));
        assert!(g.occupants().is_empty());
        g.leave(VehicleId(1)); // idempotent
    }

    #[test]
    fn duplicate_enter_collapses() {
        let mut g = Ground::default();
        g.enter(occ(1, Ribi::EAST));
        g.enter(occ(1, Ribi::SOUTH));
        assert_eq!(g.occupants().len(), 1);
        assert_eq!(g.occupants()[0].direction, Ribi::SOUTH);
    }

    #[test]
    fn occupants_filtered_by_kind() {
        let mut g = Ground::default();
        g.enter(occ(1, Ribi::EAST));
        g.enter(Occupant {
            kind: WayKind::Rail,
            ..occ(2, Ribi::NORTH)
        });
        assert_eq!(g.occupants_of(WayKind::Road).count(), 1);
        assert_eq!(g.occupants_of(WayKind::Rail).count(), 1);
    }
}

#[cfg(test)]
mod slope {
    use super::*;

    #[test]
    fn rise_along_directions() {
        let s = Slope::Rising(Ribi::NORTH);
        assert_eq!(s.rise_along(Ribi::NORTH), 1);
        assert_eq!(s.rise_along(Ribi::SOUTH), -1);
        assert_eq!(s.rise_along(Ribi::EAST), 0);
        // Diagonal travel with a northern component still climbs.
        assert_eq!(s.rise_along(Ribi::NORTH_EAST), 1);
        assert_eq!(Slope::Flat.rise_along(Ribi::NORTH), 0);
    }
}

#[cfg(test)]
mod grid {
    use super::*;

    #[test]
    fn lookup_missing_tile_is_none() {
        let grid = TileGrid::new();
        assert!(grid.lookup(Tile::new(0, 0, 0)).is_none());
        assert_eq!(grid.way_ribi(Tile::new(0, 0, 0), WayKind::Road), Ribi::NONE);
    }

    #[test]
    fn lay_way_creates_ground() {
        let mut grid = TileGrid::new();
        let t = Tile::new(3, 4, 0);
        grid.lay_way(t, rail_way(Ribi::EAST | Ribi::WEST));
        assert_eq!(grid.way_ribi(t, WayKind::Rail), Ribi::EAST | Ribi::WEST);
        assert_eq!(grid.way_ribi(t, WayKind::Road), Ribi::NONE);
    }

    #[test]
    fn water_height_classifies_tiles() {
        let mut grid = TileGrid::new();
        grid.water_height = 0;
        assert!(grid.is_water(Tile::new(0, 0, 0)));
        assert!(!grid.is_water(Tile::new(0, 0, 1)));
    }

    #[test]
    fn clear_reservations_force_releases() {
        let mut grid = TileGrid::new();
        let t = Tile::new(1, 1, 0);
        grid.lay_way(t, rail_way(Ribi::EAST | Ribi::WEST));
        grid.lookup_mut(t)
            .unwrap()
            .way_mut(WayKind::Rail)
            .unwrap()
            .reserve(convoy(9));
        grid.clear_reservations(&[t], WayKind::Rail);
        assert!(!grid.lookup(t).unwrap().way(WayKind::Rail).unwrap().is_reserved());
    }
}
