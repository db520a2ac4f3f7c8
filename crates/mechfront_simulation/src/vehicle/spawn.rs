//! Vehicle spawn (initialize)
//!
//! Иерархия:
//! ```text
//! Vehicle root (Vehicle, Killable, CharacterMotor, AnimatorParameters)
//! ├── <skeleton_root>          live root
//! │   └── bones…               Collider + CollisionLayer + VehiclePart
//! ├── DefaultPivot / ZoomPivot camera pivots
//! └── <weapon>                 VehicleGun + WeaponOwner (ровно один)
//! ```

use bevy::prelude::*;

use crate::combat::{GunBlueprint, Killable, VehicleGun, WeaponOwner};
use crate::physics::{CharacterMotor, CollisionLayer, LAYER_SENSORS};
use crate::sounds::{SoldierSounds, WalkerStepSound};

use super::blueprint::{LocomotionKind, VehicleBlueprint};
use super::components::{AnimatorParameters, HeadBone, Locomotion, Vehicle, VehiclePart};
use super::pose::PoseTransferMap;

/// Entities созданного vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleHandles {
    pub vehicle: Entity,
    pub weapon: Entity,
    pub skeleton_root: Entity,
    pub default_pivot: Entity,
    pub zoom_pivot: Entity,
    pub critical_collider: Option<Entity>,
    pub head_bone: Option<Entity>,
    pub colliders: Vec<Entity>,
}

/// Spawn vehicle + его единственного primary weapon.
///
/// `gun` обычно `blueprint.weapon`; player controller может подменить.
/// `layer`: collision layer всех коллайдеров vehicle (player / actors).
/// Clip оружия сразу заполняется до `gun.initial_clip`.
pub fn spawn_vehicle(
    commands: &mut Commands,
    blueprint: &VehicleBlueprint,
    gun: &GunBlueprint,
    transform: Transform,
    layer: u32,
) -> VehicleHandles {
    let vehicle = commands
        .spawn((
            Name::new(blueprint.name.clone()),
            transform,
            Killable::new(blueprint.max_health),
            CharacterMotor::with_exclusion(layer | LAYER_SENSORS),
            AnimatorParameters::default(),
        ))
        .id();

    // Live skeleton
    let skeleton_root = commands
        .spawn((Name::new(blueprint.skeleton_root.clone()), Transform::default(), ChildOf(vehicle)))
        .id();

    let mut bones = Vec::with_capacity(blueprint.bones.len());
    let mut colliders = Vec::new();
    let mut critical_collider = None;
    let mut head_bone = None;

    for bone in &blueprint.bones {
        let local = Transform::from_translation(bone.translation).with_rotation(bone.rotation);
        let mut entity = commands.spawn((Name::new(bone.name.clone()), local, ChildOf(skeleton_root)));

        if let Some(shape) = &bone.collider {
            entity.insert((shape.to_collider(), CollisionLayer(layer), VehiclePart(vehicle)));
            colliders.push(entity.id());
            if bone.critical {
                critical_collider = Some(entity.id());
            }
        }

        if blueprint.head_bone.as_deref() == Some(bone.name.as_str()) {
            entity.insert(HeadBone {
                vehicle,
                rest: bone.rotation,
            });
            head_bone = Some(entity.id());
        }

        bones.push((bone.name.clone(), entity.id()));
    }

    // Camera pivots
    let default_pivot = commands
        .spawn((
            Name::new("DefaultPivot"),
            Transform::from_translation(blueprint.default_pivot),
            ChildOf(vehicle),
        ))
        .id();
    let zoom_pivot = commands
        .spawn((
            Name::new("ZoomPivot"),
            Transform::from_translation(blueprint.zoom_pivot),
            ChildOf(vehicle),
        ))
        .id();

    // Primary weapon (shoot points в local space vehicle → weapon в origin vehicle)
    let mut primary = VehicleGun::from_blueprint(gun, blueprint.shoot_points.clone());
    primary.set_clip_remaining(gun.initial_clip);
    let weapon = commands
        .spawn((
            Name::new(gun.name.clone()),
            primary,
            WeaponOwner(vehicle),
            Transform::default(),
            ChildOf(vehicle),
        ))
        .id();

    let pose_transfer = match blueprint.kind {
        LocomotionKind::Walker => Some(PoseTransferMap::build(&bones, &blueprint.corpse)),
        LocomotionKind::Soldier => None,
    };

    let mut state = Vehicle::new(blueprint, Locomotion::from_blueprint(blueprint, head_bone));
    state.set_primary_weapon(Some(weapon));
    state.default_pivot = Some(default_pivot);
    state.zoom_pivot = Some(zoom_pivot);
    state.critical_collider = critical_collider;
    state.colliders = colliders.clone();
    state.pose_transfer = pose_transfer;

    let mut root = commands.entity(vehicle);
    root.insert(state);

    let sounds = &blueprint.sounds;
    match blueprint.kind {
        LocomotionKind::Soldier => {
            root.insert(SoldierSounds {
                left_steps: sounds.left_steps.clone(),
                right_steps: sounds.right_steps.clone(),
                hurt_cries: sounds.hurt_cries.clone(),
            });
        }
        LocomotionKind::Walker => {
            if let Some(step) = &sounds.step {
                root.insert(WalkerStepSound { clip: step.clone() });
            }
        }
    }

    crate::log(&format!(
        "Spawned {} {:?} (weapon {:?}, {} colliders)",
        blueprint.name,
        vehicle,
        weapon,
        colliders.len()
    ));

    VehicleHandles {
        vehicle,
        weapon,
        skeleton_root,
        default_pivot,
        zoom_pivot,
        critical_collider,
        head_bone,
        colliders,
    }
}

/// Мировая позиция pivot (прямой потомок vehicle root) без transform propagation
pub fn pivot_world_position(vehicle: &Transform, pivot_local: &Transform) -> Vec3 {
    vehicle.transform_point(pivot_local.translation)
}
