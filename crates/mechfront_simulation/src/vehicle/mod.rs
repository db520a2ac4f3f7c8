//! Vehicle domain
//!
//! Vehicle = player-controlled аватар (Soldier | Walker):
//! - blueprint: static описание (скелет, pivots, corpse, оружие)
//! - components: `Vehicle` state machine + `Locomotion` вариант
//! - spawn: initialize (скелет + единственный primary weapon)
//! - locomotion: live update вариантов
//! - pose: pose transfer live → corpse
//! - death: death pipeline (ragdoll handoff)
//! - systems: ECS glue

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::combat::systems::tick_vehicle_guns;
use crate::MechSet;

pub mod blueprint;
pub mod components;
pub mod death;
pub mod locomotion;
pub mod pose;
pub mod spawn;
pub mod systems;

#[cfg(test)]
mod systems_tests;

pub use blueprint::{
    BoneBlueprint, CorpseBlueprint, CorpsePartBlueprint, LocomotionKind, PartShape, VehicleBlueprint, VehicleSoundSet,
};
pub use components::{
    AnimatorParameters, AnimatorValue, DamageOutcome, HeadBone, KillImpulse, Locomotion, SoldierGait, Vehicle,
    VehicleLifecycle, VehiclePart, WalkerGait, CRITICAL_DAMAGE_MULTIPLIER,
};
pub use death::{
    die, Corpse, CorpseContainer, DeathReport, DeathSink, ImpulseMode, SpawnedCorpse, VehicleLifecycleEvent,
};
pub use pose::PoseTransferMap;
pub use spawn::{pivot_world_position, spawn_vehicle, VehicleHandles};

/// Vehicle Plugin
///
/// Update (внутри MechSet chain):
/// 1. Locomotion: drive_vehicles
/// 2. Weapons: refill_clip_on_reload (после tick_vehicle_guns)
/// 3. Damage: damage_vehicles
/// 4. Death: handle_vehicle_deaths
///
/// PostUpdate: apply_head_yaw до transform propagation.
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<VehiclePart>()
            .register_type::<HeadBone>()
            .register_type::<CorpseContainer>()
            .register_type::<Corpse>()
            .add_event::<VehicleLifecycleEvent>();

        app.add_systems(Startup, death::spawn_corpse_container);

        app.add_systems(
            Update,
            (
                systems::drive_vehicles.in_set(MechSet::Locomotion),
                systems::refill_clip_on_reload
                    .in_set(MechSet::Weapons)
                    .after(tick_vehicle_guns),
                systems::damage_vehicles.in_set(MechSet::Damage),
                death::handle_vehicle_deaths.in_set(MechSet::Death),
            ),
        );

        app.add_systems(
            PostUpdate,
            systems::apply_head_yaw.before(TransformSystem::TransformPropagate),
        );
    }
}
