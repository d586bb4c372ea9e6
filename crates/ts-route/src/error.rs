//! Routing-subsystem error type.

use thiserror::Error;

use ts_core::Tile;

/// Errors produced by `ts-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: Tile, to: Tile },

    #[error("start tile {0} has no usable way")]
    BadStart(Tile),
}

pub type RouteResult<T> = Result<T, RouteError>;
