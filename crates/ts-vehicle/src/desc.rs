//! Static per-vehicle-type description.
//!
//! Owned by the (external) asset registry in the full game; the movement
//! core only reads it.  The constructors cover the fields each medium
//! actually needs and double as test fixtures.

use ts_core::{GoodsId, ImageId, Ribi, Speed, WayKind};

/// Immutable description of one vehicle type.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleDesc {
    pub name: String,
    pub kind: WayKind,

    /// Cargo units this vehicle can carry.
    pub capacity: u16,
    pub goods: GoodsId,

    /// Empty weight in kg.
    pub weight_kg: u32,
    /// Added weight per loaded cargo unit, kg.
    pub freight_unit_kg: u32,

    pub max_speed: Speed,

    /// Base rolling resistance; the running friction adds slope and
    /// curve terms on top.
    pub friction: i32,

    /// One image per travel direction, N, NE, E, SE, S, SW, W, NW.
    pub images: [ImageId; 8],

    /// Air only: runway tiles needed for takeoff and landing.
    pub required_runway_len: u16,
}

impl VehicleDesc {
    pub fn new(name: impl Into<String>, kind: WayKind, max_speed_kmh: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity: 0,
            goods: GoodsId::INVALID,
            weight_kg: 1_000,
            freight_unit_kg: 10,
            max_speed: Speed::from_kmh(max_speed_kmh),
            friction: 1,
            images: [ImageId::INVALID; 8],
            required_runway_len: 0,
        }
    }

    pub fn with_capacity(mut self, capacity: u16, goods: GoodsId) -> Self {
        self.capacity = capacity;
        self.goods = goods;
        self
    }

    pub fn with_runway_len(mut self, tiles: u16) -> Self {
        debug_assert_eq!(self.kind, WayKind::Air);
        self.required_runway_len = tiles;
        self
    }

    pub fn with_friction(mut self, friction: i32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_images(mut self, images: [ImageId; 8]) -> Self {
        self.images = images;
        self
    }

    /// Image for a travel direction; `INVALID` for masks that are not a
    /// travel direction (the caller keeps the previous image then).
    pub fn image_for(&self, dir: Ribi) -> ImageId {
        dir.direction_index()
            .map_or(ImageId::INVALID, |i| self.images[i])
    }
}
