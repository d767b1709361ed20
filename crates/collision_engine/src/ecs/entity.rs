//! Entity implementation

use bitflags::bitflags;

slotmap::new_key_type! {
    /// Generational handle of an entity registered with a collision world
    pub struct EntityId;
}

bitflags! {
    /// Optional behaviour flags of a collidable entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BodyFlags: u8 {
        /// Never moved by collision resolution
        const IMMOBILE = 1 << 0;
        /// Motion is sub-stepped so fast movers cannot tunnel
        const BULLET = 1 << 1;
        /// One-way platform: blocks from above only
        const JUMP_THROUGH = 1 << 2;
        /// Never culled by the broad-phase
        const ALWAYS_ON = 1 << 3;
    }
}

impl BodyFlags {
    /// Build flags from individual switches
    pub fn from_switches(immobile: bool, bullet: bool, jump_through: bool, always_on: bool) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::IMMOBILE, immobile);
        flags.set(Self::BULLET, bullet);
        flags.set(Self::JUMP_THROUGH, jump_through);
        flags.set(Self::ALWAYS_ON, always_on);
        flags
    }
}
