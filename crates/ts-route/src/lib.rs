//! `ts-route` — route representation and tile-graph routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                         |
//! |------------|--------------------------------------------------|
//! | [`route`]  | `Route` — ordered tile sequence                  |
//! | [`router`] | `Router` trait, default Dijkstra `TileRouter`    |
//! | [`error`]  | `RouteError`, `RouteResult<T>`                   |
//!
//! # Pluggability
//!
//! The movement core calls routing via the [`Router`] trait, so applications
//! can swap in custom implementations (A*, hierarchical search, congestion
//! models) without touching the vehicle code.  The default [`TileRouter`]
//! is a deterministic Dijkstra over way connectivity.

pub mod error;
pub mod route;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{RouteError, RouteResult};
pub use route::Route;
pub use router::{Router, TileRouter};
