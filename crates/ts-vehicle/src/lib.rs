//! `ts-vehicle` — the vehicle movement and path-reservation core.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`stepper`] | `StepPos` — sub-tile stepping, slope height, screen offsets    |
//! | [`corner`]  | `DirectionHistory` + curvature/gradient speed limits           |
//! | [`vehicle`] | `Vehicle` — route cursor, probe/commit protocol, advance loop  |
//! | [`policy`]  | per-medium legality and reservation (road/rail/ship/air)       |
//! | [`desc`]    | `VehicleDesc` — static per-type data                           |
//! | [`cargo`]   | `CargoHold`, `CargoPacket`                                     |
//! | [`error`]   | `VehicleError`, `VehicleResult<T>`                             |
//!
//! # Movement model
//!
//! A vehicle advances in **sub-tile steps** (256 per straight tile, fewer per
//! diagonal).  Each tick the external convoy orchestrator grants it a step
//! budget; [`Vehicle::advance`] consumes it tile by tile:
//!
//! 1. step within the current tile until the boundary,
//! 2. **probe** the next route tile (static legality, then the medium's
//!    dynamic rules — occupancy, block reservation, flight clearance),
//! 3. on a green answer **commit** the transition: release the old tile,
//!    advance the route cursor, claim the new tile, recompute direction,
//!    traversal length, slope height, and speed limit — in exactly that
//!    order, so no tile is ever observed with zero or two owners.
//!
//! A blocked probe costs no shared-state change and returns a suggested retry
//! delay; the orchestrator re-invokes after that many ticks (cooperative
//! backoff, never a blocking wait).
//!
//! # Render safety
//!
//! The simulation thread mutates vehicles; a renderer may read concurrently.
//! [`Vehicle::pose`] returns a self-contained [`VehiclePose`] copy — take it
//! at the tick boundary and hand *that* to the render thread, never a live
//! `&Vehicle`.

pub mod cargo;
pub mod corner;
pub mod desc;
pub mod error;
pub mod policy;
pub mod stepper;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cargo::{CargoHold, CargoPacket};
pub use corner::DirectionHistory;
pub use desc::VehicleDesc;
pub use error::{VehicleError, VehicleResult};
pub use policy::{FlightState, MoveQuery, Policy, WayCheck};
pub use stepper::{StepAdvance, StepPos};
pub use vehicle::{AdvanceOutcome, MoveFailure, Vehicle, VehicleFlags, VehiclePose};
