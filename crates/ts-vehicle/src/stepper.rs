//! Sub-tile position stepping.
//!
//! # Step geometry
//!
//! A straight tile is 256 steps long ([`STEPS_PER_TILE`]); a diagonal tile is
//! shorter by the world's diagonal multiplier (181 steps at the default
//! 724/1024).  `steps` counts progress on the current tile and always
//! satisfies `0 <= steps <= steps_next`, where `steps_next` is the traversal
//! length minus one.  Crossing onto the next tile costs exactly
//! `steps_next - steps + 1` further steps.
//!
//! Screen offsets and slope height are **pure functions** of
//! (direction, steps, slope) — no hidden state, so a renderer reading a
//! copied `StepPos` always gets a consistent picture.

use ts_core::params::STEPS_PER_TILE;
use ts_core::{Ribi, WorldParams};
use ts_grid::Slope;

/// Vertical screen span of one height level at the base raster width of 64.
const TILE_HEIGHT_OFFSET: i32 = 16;
const BASE_RASTER: i32 = 64;

/// Result of [`StepPos::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepAdvance {
    /// Steps actually consumed (≤ requested distance).
    pub consumed: u32,
    /// `true` if the requested distance reached the tile boundary; the
    /// overshoot (`requested - consumed`) belongs to the next tile.
    pub crossed: bool,
}

/// Sub-tile position: step counter, traversal length, direction, slope state.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepPos {
    steps: u16,
    steps_next: u16,
    direction: Ribi,

    /// Height change along the travel direction: +1 climbing, -1 descending,
    /// 0 flat or along the contour.
    rise: i8,
    /// Fast path: tile is flat, skip height interpolation entirely.
    on_flat: bool,
}

impl Default for StepPos {
    fn default() -> Self {
        Self {
            steps: 0,
            steps_next: STEPS_PER_TILE - 1,
            direction: Ribi::SOUTH,
            rise: 0,
            on_flat: true,
        }
    }
}

impl StepPos {
    #[inline]
    pub fn steps(&self) -> u16 {
        self.steps
    }

    #[inline]
    pub fn steps_next(&self) -> u16 {
        self.steps_next
    }

    #[inline]
    pub fn direction(&self) -> Ribi {
        self.direction
    }

    /// Steps remaining until the vehicle is on the next tile.
    #[inline]
    pub fn to_boundary(&self) -> u32 {
        (self.steps_next - self.steps) as u32 + 1
    }

    /// Set the travel direction and the matching traversal length.
    ///
    /// Diagonal directions use the world's shortened step count.  A running
    /// step counter is clamped so the `steps <= steps_next` invariant holds
    /// even when the new tile is shorter.
    pub fn set_direction(&mut self, direction: Ribi, params: &WorldParams) {
        self.direction = direction;
        self.steps_next = if direction.is_diagonal() {
            params.diagonal_steps_per_tile() - 1
        } else {
            STEPS_PER_TILE - 1
        };
        self.steps = self.steps.min(self.steps_next);
    }

    /// Advance by up to `dist` steps within the current tile.
    ///
    /// Zero distance is a no-op.  If the distance reaches the boundary, the
    /// counter stops *at* `steps_next`, `consumed` includes the crossing
    /// step, and the caller commits the tile transition (then
    /// [`begin_tile`](Self::begin_tile)) before spending the overshoot.
    pub fn advance(&mut self, dist: u32) -> StepAdvance {
        if dist == 0 {
            return StepAdvance {
                consumed: 0,
                crossed: false,
            };
        }
        let room = self.to_boundary();
        if dist < room {
            self.steps += dist as u16;
            StepAdvance {
                consumed: dist,
                crossed: false,
            }
        } else {
            self.steps = self.steps_next;
            StepAdvance {
                consumed: room,
                crossed: true,
            }
        }
    }

    /// Move to the tile edge without crossing — where a vehicle waits while
    /// the next tile is blocked.
    pub fn stop_at_edge(&mut self) -> u32 {
        let walked = (self.steps_next - self.steps) as u32;
        self.steps = self.steps_next;
        walked
    }

    /// Restart the step counter on a freshly entered tile.
    pub fn begin_tile(&mut self) {
        self.steps = 0;
    }

    /// Refresh slope interpolation state from the occupied tile.
    pub fn recalc_height(&mut self, slope: Slope) {
        self.on_flat = slope.is_flat();
        self.rise = slope.rise_along(self.direction);
    }

    /// Current height offset in screen pixels at the base raster width.
    /// Negative values draw the vehicle higher (uphill).
    pub fn height_off(&self) -> i16 {
        if self.on_flat {
            return 0;
        }
        let span = self.steps_next as i32 + 1;
        let h = match self.rise {
            1 => TILE_HEIGHT_OFFSET * self.steps as i32 / span,
            -1 => TILE_HEIGHT_OFFSET * (span - self.steps as i32) / span,
            // Crossing a slope along its contour line: constant half height.
            _ => TILE_HEIGHT_OFFSET / 2,
        };
        (-h) as i16
    }

    /// Screen-pixel offset from the current tile's anchor, scaled to
    /// `raster_width`.  Pure function of (direction, steps, height).
    ///
    /// Isometric projection: one tile east is half a raster right and a
    /// quarter raster down; one tile south mirrors it left.  The fraction
    /// travelled is `steps / (steps_next + 1)`.
    pub fn screen_offset(&self, raster_width: i16) -> (i16, i16) {
        let raster = raster_width as i32;
        let h = self.height_off() as i32 * raster / BASE_RASTER;

        let (dx, dy) = self.direction.to_delta();
        let span = self.steps_next as i32 + 1;
        let target_x = (dx - dy) * raster / 2;
        let target_y = (dx + dy) * raster / 4;

        let xoff = target_x * self.steps as i32 / span;
        let yoff = target_y * self.steps as i32 / span + h;
        (xoff as i16, yoff as i16)
    }

    /// Lateral displacement keeping a road vehicle on its driving side: a
    /// quarter tile toward the right-hand verge, mirrored for left-hand
    /// traffic.  Rail-bound media stay centred and never apply this.
    pub fn lane_offset(&self, raster_width: i16, drives_on_left: bool) -> (i16, i16) {
        let raster = raster_width as i32;
        let (dx, dy) = self.direction.to_delta();
        // Clockwise perpendicular of the travel delta points at the
        // right-hand verge (screen y grows southward).
        let (px, py) = if drives_on_left { (dy, -dx) } else { (-dy, dx) };
        // Same isometric projection as the anchor offset, at a quarter of
        // the tile span.
        (
            ((px - py) * raster / 8) as i16,
            ((px + py) * raster / 16) as i16,
        )
    }
}
