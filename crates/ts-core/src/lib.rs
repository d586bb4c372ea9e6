//! `ts-core` — foundational types for the `tilesim` transport framework.
//!
//! This crate is a dependency of every other `ts-*` crate.  It intentionally
//! has no `ts-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `VehicleId`, `ConvoyId`, `HaltId`, `GoodsId`, `ImageId` |
//! | [`tile`]     | `Tile` — 3-D tile coordinate                            |
//! | [`ribi`]     | `Ribi` — 8-point compass direction bitmask              |
//! | [`speed`]    | `Speed` — fixed-point speed with `UNLIMITED` sentinel   |
//! | [`time`]     | `Tick` — simulation tick counter                        |
//! | [`params`]   | `WorldParams` — per-world movement constants            |
//! | [`waykind`]  | `WayKind` enum                                          |
//! | [`error`]    | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod params;
pub mod ribi;
pub mod speed;
pub mod tile;
pub mod time;
pub mod waykind;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{ConvoyHandle, ConvoyId, GoodsId, HaltId, ImageId, VehicleId};
pub use params::WorldParams;
pub use ribi::Ribi;
pub use speed::Speed;
pub use tile::Tile;
pub use time::Tick;
pub use waykind::WayKind;
