//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Killable health, gun clip/cooldown/reload
//! - Combat rules: damage application, killing blow detection
//! - Events: DamageRequest → Damaged / Died, ShotFired, ReloadFinished
//!
//! Host ответственность: полёт снаряда, попадание → `DamageRequest`.

use bevy::prelude::*;

use crate::MechSet;

pub mod damage;
pub mod killable;
pub mod systems;
pub mod weapon;
pub mod weapon_stats;

// Re-export основных типов
pub use damage::{DamagePayload, DamageRequest, Damaged, Died, Missile};
pub use killable::Killable;
pub use weapon::{PendingShot, ReloadFinished, ShotFired, VehicleGun, WeaponOwner};
pub use weapon_stats::GunBlueprint;

/// Combat Plugin
///
/// Порядок (Update, внутри MechSet chain):
/// 1. Weapons: tick_vehicle_guns: таймеры, ShotFired, ReloadFinished
/// 2. Damage: apply_damage_requests: generic killables (vehicles в VehiclePlugin)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Killable>()
            .register_type::<VehicleGun>()
            .register_type::<WeaponOwner>()
            .add_event::<DamageRequest>()
            .add_event::<Damaged>()
            .add_event::<Died>()
            .add_event::<ShotFired>()
            .add_event::<ReloadFinished>();

        app.add_systems(
            Update,
            (
                systems::tick_vehicle_guns.in_set(MechSet::Weapons),
                systems::apply_damage_requests.in_set(MechSet::Damage),
            ),
        );
    }
}
