//! Unit tests for ts-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ConvoyHandle, ConvoyId, HaltId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = VehicleId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(VehicleId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(VehicleId::INVALID.0, u32::MAX);
        assert_eq!(HaltId::INVALID.0, u16::MAX);
    }

    #[test]
    fn stale_handle_differs_from_live() {
        let live = ConvoyHandle::new(ConvoyId(3), 2);
        let stale = ConvoyHandle::new(ConvoyId(3), 1);
        assert_ne!(live, stale);
        assert!(live.is_some());
        assert!(!ConvoyHandle::NONE.is_some());
    }
}

#[cfg(test)]
mod ribi {
    use crate::Ribi;
    use crate::ribi::compare_directions;

    #[test]
    fn delta_roundtrip() {
        for dir in [
            Ribi::NORTH,
            Ribi::NORTH_EAST,
            Ribi::EAST,
            Ribi::SOUTH_EAST,
            Ribi::SOUTH,
            Ribi::SOUTH_WEST,
            Ribi::WEST,
            Ribi::NORTH_WEST,
        ] {
            let (dx, dy) = dir.to_delta();
            assert_eq!(Ribi::from_delta(dx, dy), dir, "dir {dir}");
        }
    }

    #[test]
    fn long_delta_reduces_to_sign() {
        assert_eq!(Ribi::from_delta(7, 0), Ribi::EAST);
        assert_eq!(Ribi::from_delta(-3, 3), Ribi::SOUTH_WEST);
        assert_eq!(Ribi::from_delta(0, 0), Ribi::NONE);
    }

    #[test]
    fn backward_is_involution() {
        assert_eq!(Ribi::NORTH.backward(), Ribi::SOUTH);
        assert_eq!(Ribi::NORTH_EAST.backward(), Ribi::SOUTH_WEST);
        for bits in 0..16u8 {
            let r = Ribi(bits);
            assert_eq!(r.backward().backward(), r);
        }
    }

    #[test]
    fn diagonal_classification() {
        assert!(Ribi::NORTH.is_single());
        assert!(!Ribi::NORTH.is_diagonal());
        assert!(Ribi::NORTH_EAST.is_diagonal());
        // Opposite pairs are connection masks, not travel directions.
        assert!(!Ribi(0b0101).is_diagonal());
        assert!(!Ribi(0b1010).is_diagonal());
    }

    #[test]
    fn degrees_match_compass() {
        assert_eq!(Ribi::NORTH.direction_degrees(), Some(360));
        assert_eq!(Ribi::EAST.direction_degrees(), Some(90));
        assert_eq!(Ribi::SOUTH_WEST.direction_degrees(), Some(225));
        assert_eq!(Ribi::ALL.direction_degrees(), None);
    }

    #[test]
    fn angular_difference() {
        assert_eq!(compare_directions(90, 90), 0);
        assert_eq!(compare_directions(90, 135), 45);
        assert_eq!(compare_directions(360, 45), 45); // north wraps
        assert_eq!(compare_directions(45, 225), 180);
        assert_eq!(compare_directions(315, 45), 90);
    }
}

#[cfg(test)]
mod tile {
    use crate::{Ribi, Tile};

    #[test]
    fn neighbour_and_direction_agree() {
        let t = Tile::new(5, 5, 0);
        let n = t.neighbour(Ribi::SOUTH_EAST);
        assert_eq!(n, Tile::new(6, 6, 0));
        assert_eq!(t.direction_to(n), Ribi::SOUTH_EAST);
    }

    #[test]
    fn chebyshev_counts_king_moves() {
        let a = Tile::new(0, 0, 0);
        let b = Tile::new(3, -2, 0);
        assert_eq!(a.chebyshev(b), 3);
    }
}

#[cfg(test)]
mod speed {
    use crate::Speed;

    #[test]
    fn kmh_roundtrip() {
        assert_eq!(Speed::from_kmh(120).to_kmh(), 120);
    }

    #[test]
    fn unlimited_survives_scaling() {
        assert_eq!(Speed::UNLIMITED.scale(1, 2), Speed::UNLIMITED);
        assert!(Speed::from_kmh(999_999) < Speed::UNLIMITED);
    }

    #[test]
    fn scale_halves() {
        assert_eq!(Speed::from_kmh(100).scale(1, 2).to_kmh(), 50);
    }
}

#[cfg(test)]
mod params {
    use crate::WorldParams;
    use crate::params::STEPS_PER_TILE;

    #[test]
    fn default_diagonal_is_shorter_than_straight() {
        let p = WorldParams::default();
        let d = p.diagonal_steps_per_tile();
        assert!(d < STEPS_PER_TILE);
        assert_eq!(d, 181); // 256 * 724 / 1024
    }

    #[test]
    fn degenerate_multiplier_clamps_to_one() {
        let p = WorldParams {
            diagonal_multiplier: 0,
            drives_on_left: false,
        };
        assert_eq!(p.diagonal_steps_per_tile(), 1);
    }
}
