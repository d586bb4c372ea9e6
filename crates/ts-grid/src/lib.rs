//! `ts-grid` — the grid/ground accessor: tiles, ways, occupancy, reservations.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`grid`]   | `TileGrid` — coordinate hash table over `Ground`           |
//! | [`ground`] | `Ground`, `Slope`, `Climate`, `Occupant`                   |
//! | [`way`]    | `Way`, `Signal`, `SignalKind`, reservation cell            |
//!
//! # Resource model
//!
//! Every shared movement resource — a rail block tile, a road tile, a runway
//! tile, a lock chamber — is recorded **here**, on the way or ground object,
//! never on a vehicle.  Vehicles mutate it exclusively through
//! [`Way::reserve`]/[`Way::unreserve`] and [`Ground::enter`]/[`Ground::leave`].
//! Release is idempotent throughout: releasing something you do not hold is a
//! no-op, not an error.

pub mod grid;
pub mod ground;
pub mod way;

#[cfg(test)]
mod tests;

pub use grid::TileGrid;
pub use ground::{Climate, Ground, Occupant, Slope};
pub use way::{Signal, SignalKind, Way};
