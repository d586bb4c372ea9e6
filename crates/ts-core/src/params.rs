//! Per-world movement parameters.
//!
//! The original engine kept these as file-static globals set once at world
//! load.  Here they are an explicit context value passed into every movement
//! call, which keeps the core free of hidden state and lets tests run worlds
//! with different diagonal geometry side by side.

/// Sub-tile steps needed to traverse one straight tile.
pub const STEPS_PER_TILE: u16 = 256;

/// Movement constants fixed at world-load time.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldParams {
    /// Diagonal length as a /1024 fraction of the straight tile length.
    /// 724/1024 ≈ √2/2, the visually correct value for isometric tiles.
    pub diagonal_multiplier: u16,

    /// Mirrors road vehicle screen offsets for left-hand-traffic worlds.
    pub drives_on_left: bool,
}

impl WorldParams {
    /// Steps needed to traverse one diagonal tile, derived from the
    /// multiplier.  Always at least 1 so `steps_next` never underflows.
    #[inline]
    pub fn diagonal_steps_per_tile(&self) -> u16 {
        ((STEPS_PER_TILE as u32 * self.diagonal_multiplier as u32) >> 10).max(1) as u16
    }
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            diagonal_multiplier: 724,
            drives_on_left: false,
        }
    }
}
