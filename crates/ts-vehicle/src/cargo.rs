//! Cargo carried by a vehicle.
//!
//! Load and unload are invoked by the external halt logic when a convoy
//! stands at a stop; the movement core only carries the hold along and
//! exposes its weight to the kinematics.

use ts_core::{GoodsId, HaltId};

/// One batch of identical cargo bound for one destination halt.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CargoPacket {
    pub goods: GoodsId,
    pub amount: u16,
    pub destination: HaltId,
}

/// The cargo list of one vehicle, with a cached total since the sum is
/// needed every weight recalculation.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CargoHold {
    packets: Vec<CargoPacket>,
    total: u16,
}

impl CargoHold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total cargo units on board.
    #[inline]
    pub fn total(&self) -> u16 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn packets(&self) -> &[CargoPacket] {
        &self.packets
    }

    /// Load up to `capacity - total` units of `packet`, merging with an
    /// existing batch of the same goods and destination.  Returns the amount
    /// actually taken; the remainder stays at the halt.
    pub fn load(&mut self, packet: CargoPacket, capacity: u16) -> u16 {
        let room = capacity.saturating_sub(self.total);
        let taken = packet.amount.min(room);
        if taken == 0 {
            return 0;
        }
        if let Some(existing) = self
            .packets
            .iter_mut()
            .find(|p| p.goods == packet.goods && p.destination == packet.destination)
        {
            existing.amount += taken;
        } else {
            self.packets.push(CargoPacket {
                amount: taken,
                ..packet
            });
        }
        self.total += taken;
        taken
    }

    /// Unload every packet destined for `halt`.  Returns the unloaded amount.
    pub fn unload_for(&mut self, halt: HaltId) -> u16 {
        let mut unloaded = 0;
        self.packets.retain(|p| {
            if p.destination == halt {
                unloaded += p.amount;
                false
            } else {
                true
            }
        });
        self.total -= unloaded;
        unloaded
    }

    /// Remove cargo whose destination no longer passes `still_reachable`
    /// (schedule change).  Returns the discarded amount.
    pub fn discard_stale(&mut self, still_reachable: impl Fn(HaltId) -> bool) -> u16 {
        let mut dropped = 0;
        self.packets.retain(|p| {
            if still_reachable(p.destination) {
                true
            } else {
                dropped += p.amount;
                false
            }
        });
        self.total -= dropped;
        dropped
    }
}
