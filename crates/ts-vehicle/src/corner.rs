//! Curvature and gradient speed limits.
//!
//! A vehicle keeps a short rolling history of the bearings it travelled over
//! the last few tiles.  The largest deviation between the current bearing and
//! any recorded one measures how sharply the path has curved; the speed limit
//! shrinks with that angle.  The history has fixed capacity — oldest entries
//! are evicted ring-buffer style, so a long-past corner stops mattering.

use ts_core::Speed;
use ts_core::ribi::compare_directions;

/// Number of bearings remembered — roughly the tile span of one train.
pub const HISTORY_CAP: usize = 16;

/// Fixed-capacity ring buffer of direction bearings (degrees, north = 360).
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionHistory {
    buf: [i16; HISTORY_CAP],
    head: usize,
    len: usize,
}

impl Default for DirectionHistory {
    fn default() -> Self {
        Self {
            buf: [0; HISTORY_CAP],
            head: 0,
            len: 0,
        }
    }
}

impl DirectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record a bearing, evicting the oldest entry once full.
    pub fn push(&mut self, degrees: i16) {
        self.buf[self.head] = degrees;
        self.head = (self.head + 1) % HISTORY_CAP;
        self.len = (self.len + 1).min(HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.head = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = i16> + '_ {
        (0..self.len).map(move |i| {
            let idx = (self.head + HISTORY_CAP - self.len + i) % HISTORY_CAP;
            self.buf[idx]
        })
    }

    /// Largest angular difference between `current` and any recorded bearing,
    /// in degrees `0..=180`.  Zero when the history is empty.
    pub fn max_deviation_from(&self, current: i16) -> i16 {
        self.iter()
            .map(|d| compare_directions(current, d))
            .max()
            .unwrap_or(0)
    }
}

// ── Speed limit composition ───────────────────────────────────────────────────

/// Curvature penalty: the sharper the recent bend, the lower the cap.
/// Up to half a compass point (22°) costs nothing.
pub fn corner_limited(base: Speed, deviation_deg: i16) -> Speed {
    match deviation_deg {
        0..=22 => base,
        23..=45 => base.scale(13, 16),
        46..=90 => base.scale(1, 2),
        91..=135 => base.scale(5, 16),
        _ => base.scale(1, 4),
    }
}

/// Gradient penalty: climbing costs a quarter of the limit.  Descents keep
/// the full limit — braking physics belong to the convoy, not the way.
pub fn gradient_limited(base: Speed, rise: i8) -> Speed {
    if rise > 0 { base.scale(3, 4) } else { base }
}

/// Combined per-tile speed limit: the way's static limit, curved and graded,
/// capped by the vehicle's own maximum.
pub fn calc_speed_limit(
    way_speed: Speed,
    vehicle_max: Speed,
    history: &DirectionHistory,
    current_bearing: Option<i16>,
    rise: i8,
) -> Speed {
    let deviation = current_bearing.map_or(0, |b| history.max_deviation_from(b));
    gradient_limited(corner_limited(way_speed, deviation), rise).min(vehicle_max)
}
