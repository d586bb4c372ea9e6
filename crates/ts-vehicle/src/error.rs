//! Movement-core error type.
//!
//! Only *structural* problems are errors (corrupt route, wrong starting
//! tile).  Transient blockage is not an error — it is a zero-progress
//! outcome carried in [`WayCheck`][crate::policy::WayCheck].

use thiserror::Error;

use ts_core::Tile;

#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("route is empty")]
    EmptyRoute,

    #[error("route starts at {got}, vehicle is at {expected}")]
    RouteStart { expected: Tile, got: Tile },

    #[error("no ground at tile {0}")]
    NoGround(Tile),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
