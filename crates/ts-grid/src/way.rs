//! Way objects: the track/road/channel/runway occupying a tile.

use ts_core::{ConvoyHandle, Ribi, Speed, WayKind};

// ── Signals ───────────────────────────────────────────────────────────────────

/// Rail signal categories, in increasing order of lookahead.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalKind {
    /// Grants passage iff the block up to the next signal is free.
    Block,
    /// Additionally requires the block beyond the next signal to be free.
    Pre,
    /// Holds a train until the whole multi-block span to the route end can
    /// be reserved — for single-track lines with passing loops.
    LongBlock,
    /// Block signal that also picks between diverging routes toward a free
    /// platform.
    Choose,
}

/// A signal mounted on a way tile.  `open` is display state, derived from the
/// reservation outcome; the reservation itself is authoritative.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub kind: SignalKind,
    pub open: bool,
}

impl Signal {
    pub fn new(kind: SignalKind) -> Self {
        Self { kind, open: false }
    }
}

// ── Way ───────────────────────────────────────────────────────────────────────

/// The infrastructure strip on one tile for one transport medium.
///
/// The `reserved_by` cell is the single source of truth for block/runway/lock
/// ownership.  At most one convoy holds it; all mutation goes through
/// [`reserve`](Way::reserve) and [`unreserve`](Way::unreserve).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    pub kind: WayKind,

    /// Connection mask: which tile edges this way links to.
    pub ribi: Ribi,

    /// Static speed limit of the infrastructure.
    pub max_speed: Speed,

    /// Air only: this tile is runway (reservable), not taxiway.
    pub runway: bool,

    /// Water only: lock or narrow-channel chamber, mutually exclusive.
    pub lock: bool,

    /// Level crossing with another way type; released on leave like a block.
    pub crossing: bool,

    pub signal: Option<Signal>,

    reserved_by: Option<ConvoyHandle>,
}

impl Way {
    pub fn new(kind: WayKind, ribi: Ribi, max_speed: Speed) -> Self {
        Self {
            kind,
            ribi,
            max_speed,
            runway: false,
            lock: false,
            crossing: false,
            signal: None,
            reserved_by: None,
        }
    }

    pub fn with_signal(mut self, kind: SignalKind) -> Self {
        self.signal = Some(Signal::new(kind));
        self
    }

    pub fn as_runway(mut self) -> Self {
        self.runway = true;
        self
    }

    pub fn as_lock(mut self) -> Self {
        self.lock = true;
        self
    }

    pub fn as_crossing(mut self) -> Self {
        self.crossing = true;
        self
    }

    // ── Reservation cell ──────────────────────────────────────────────────

    #[inline]
    pub fn is_reserved(&self) -> bool {
        self.reserved_by.is_some()
    }

    #[inline]
    pub fn reserved_by(&self) -> Option<ConvoyHandle> {
        self.reserved_by
    }

    /// Try to claim this way for `convoy`.
    ///
    /// Succeeds if free or already held by the same convoy (re-reserving is
    /// not nesting — there is still exactly one release).  Fails with no side
    /// effect if another convoy holds it.
    pub fn reserve(&mut self, convoy: ConvoyHandle) -> bool {
        match self.reserved_by {
            None => {
                self.reserved_by = Some(convoy);
                true
            }
            Some(holder) => holder == convoy,
        }
    }

    /// Release the claim held by `convoy`.  Idempotent: if `convoy` does not
    /// hold this way (or nobody does), nothing changes.
    pub fn unreserve(&mut self, convoy: ConvoyHandle) {
        if self.reserved_by == Some(convoy) {
            self.reserved_by = None;
        }
    }

    /// Force release regardless of holder — route recalculation must clear
    /// stale claims or the block deadlocks permanently.
    pub fn unreserve_any(&mut self) {
        self.reserved_by = None;
    }

    /// `true` if a train of `convoy` may run onto this way: free or own.
    #[inline]
    pub fn is_free_for(&self, convoy: ConvoyHandle) -> bool {
        match self.reserved_by {
            None => true,
            Some(holder) => holder == convoy,
        }
    }
}
