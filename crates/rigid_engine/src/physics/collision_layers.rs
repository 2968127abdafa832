//! Collision layer and mask filtering
//!
//! Bodies carry a layer set (what they are) and a mask (what they collide
//! with). The broadphase filters pairs before they ever reach the
//! narrowphase, so mutually-ignoring bodies cost nothing past the endpoint
//! sort.

use bitflags::bitflags;

bitflags! {
    /// Named collision layers packed into a 32-bit set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player-controlled bodies
        const PLAYER = 1 << 0;
        /// Hostile bodies
        const ENEMY = 1 << 1;
        /// Fast-moving projectiles (usually swept)
        const PROJECTILE = 1 << 2;
        /// Static level geometry
        const ENVIRONMENT = 1 << 3;
        /// Non-solid overlap volumes
        const TRIGGER = 1 << 4;
        /// Cosmetic debris
        const DEBRIS = 1 << 5;
        /// Vehicles
        const VEHICLE = 1 << 6;
        /// Collectible items
        const PICKUP = 1 << 7;

        /// Everything
        const ALL = u32::MAX;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

/// Whether two bodies' layer/mask assignments allow them to collide
///
/// Filtering is mutual: each body's layer must be in the other's mask.
pub fn should_collide(
    layer_a: CollisionLayers,
    mask_a: CollisionLayers,
    layer_b: CollisionLayers,
    mask_b: CollisionLayers,
) -> bool {
    layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutual_masks_collide() {
        assert!(should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_one_sided_mask_does_not_collide() {
        // Debris notices the environment, but the environment ignores debris.
        assert!(!should_collide(
            CollisionLayers::DEBRIS,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::PLAYER | CollisionLayers::ENEMY,
        ));
    }

    #[test]
    fn test_default_collides_with_everything() {
        let all = CollisionLayers::default();
        assert!(should_collide(
            CollisionLayers::PICKUP,
            all,
            CollisionLayers::VEHICLE,
            all
        ));
    }
}
