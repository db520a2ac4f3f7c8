//! Collision Layers Constants
//!
//! Centralised битовые маски для всего проекта.
//!
//! ## Layers:
//! - bit 0 (1): Default: environment, static geometry
//! - bit 1 (2): Player: коллайдеры vehicle игрока
//! - bit 2 (4): Actors: остальные vehicles/killables
//! - bit 3 (8): Sensors: триггеры, не участвуют в view/aim raycasts
//! - bit 4 (16): Corpses: части ragdoll
//!
//! Raycasts принимают **exclusion** mask: коллайдер пропускается,
//! если его layer пересекается с маской.

use bevy::prelude::*;

/// Layer 1: Default (environment)
pub const LAYER_DEFAULT: u32 = 0b1;

/// Layer 2: Player vehicle
pub const LAYER_PLAYER: u32 = 0b10;

/// Layer 3: Actors (non-player vehicles, targets)
pub const LAYER_ACTORS: u32 = 0b100;

/// Layer 4: Sensors (triggers)
pub const LAYER_SENSORS: u32 = 0b1000;

/// Layer 5: Corpses (ragdoll parts)
pub const LAYER_CORPSES: u32 = 0b1_0000;

/// Exclusion для camera view/ground probe и aim raycasts
pub const MASK_IGNORE_PLAYER_VIEW: u32 = LAYER_PLAYER | LAYER_SENSORS;

/// Layer коллайдера (один или несколько бит)
///
/// Коллайдер без этого компонента считается `LAYER_DEFAULT`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CollisionLayer(pub u32);

impl Default for CollisionLayer {
    fn default() -> Self {
        Self(LAYER_DEFAULT)
    }
}

impl CollisionLayer {
    /// true если layer попадает в exclusion mask
    pub fn is_excluded_by(&self, exclude_mask: u32) -> bool {
        self.0 & exclude_mask != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mask_skips_player_and_sensors() {
        assert!(CollisionLayer(LAYER_PLAYER).is_excluded_by(MASK_IGNORE_PLAYER_VIEW));
        assert!(CollisionLayer(LAYER_SENSORS).is_excluded_by(MASK_IGNORE_PLAYER_VIEW));
        assert!(!CollisionLayer::default().is_excluded_by(MASK_IGNORE_PLAYER_VIEW));
        assert!(!CollisionLayer(LAYER_ACTORS).is_excluded_by(MASK_IGNORE_PLAYER_VIEW));
    }
}
