//! Ordered tile sequence produced by pathfinding.
//!
//! The route is consumed step-by-step by the routed vehicle through its
//! `route_index` cursor.  Routes are 4-connected: consecutive tiles are
//! cardinal neighbours.  Diagonal *travel* still occurs — a vehicle crossing
//! a corner tile derives its direction from the tiles before and after it.

use ts_core::Tile;

/// An ordered sequence of tile coordinates from start to destination,
/// inclusive of both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    tiles: Vec<Tile>,
}

impl Route {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at route position `i`, or `None` past the end.
    #[inline]
    pub fn at(&self, i: usize) -> Option<Tile> {
        self.tiles.get(i).copied()
    }

    pub fn first(&self) -> Option<Tile> {
        self.tiles.first().copied()
    }

    pub fn last(&self) -> Option<Tile> {
        self.tiles.last().copied()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Position of `tile` at or after `from`, for re-synchronising a cursor
    /// after a reroute.
    pub fn find_from(&self, tile: Tile, from: usize) -> Option<usize> {
        self.tiles[from.min(self.tiles.len())..]
            .iter()
            .position(|&t| t == tile)
            .map(|p| p + from)
    }

    /// Replace everything from position `at` onward with `tail`.
    /// Used by choose signals and junction re-decisions: the travelled head
    /// of the route stays untouched, only the future is rewritten.
    pub fn splice_tail(&mut self, at: usize, tail: Vec<Tile>) {
        self.tiles.truncate(at);
        self.tiles.extend(tail);
    }
}
