//! Vehicle ECS systems
//!
//! Update (MechSet chain):
//! - Locomotion: drive_vehicles: gravity, displacement, поворот, animator params
//! - Weapons: refill_clip_on_reload: ReloadFinished → clip = capacity
//! - Damage: damage_vehicles: DamageRequest по vehicle/части → Damaged / Died
//! - Death: handle_vehicle_deaths (см. `death`)
//!
//! PostUpdate: apply_head_yaw: до transform propagation.

use bevy::prelude::*;

use crate::combat::{DamageRequest, Damaged, Died, Killable, ReloadFinished, VehicleGun, WeaponOwner};
use crate::physics::{CharacterMotor, SceneQuery};

use super::components::{AnimatorParameters, HeadBone, Locomotion, Vehicle, VehiclePart};

/// System: DamageRequest → Vehicle::damage
///
/// Target может быть сам vehicle или его коллайдер (`VehiclePart`);
/// во втором случае часть считается hit collider, если он не задан.
pub fn damage_vehicles(
    mut requests: EventReader<DamageRequest>,
    parts: Query<&VehiclePart>,
    mut vehicles: Query<(&mut Vehicle, &mut Killable)>,
    mut damaged_events: EventWriter<Damaged>,
    mut died_events: EventWriter<Died>,
) {
    for request in requests.read() {
        let (target, hit_collider) = match parts.get(request.target) {
            Ok(part) => (part.0, request.hit_collider.or(Some(request.target))),
            Err(_) => (request.target, request.hit_collider),
        };

        let Ok((mut vehicle, mut killable)) = vehicles.get_mut(target) else {
            continue;
        };

        let resolved = DamageRequest {
            target,
            hit_collider,
            ..request.clone()
        };
        let Some(outcome) = vehicle.damage(&mut killable, &resolved) else {
            continue;
        };

        damaged_events.write(Damaged {
            target,
            hit_collider,
            position: request.position,
            direction: request.direction,
            power: request.payload.power(),
            amount: outcome.amount,
            attacker: outcome.attacker,
        });

        if outcome.killed {
            died_events.write(Died {
                entity: target,
                attacker: outcome.attacker,
            });
        }
    }
}

/// System: завершённый reload primary weapon → полный clip
pub fn refill_clip_on_reload(
    mut reload_events: EventReader<ReloadFinished>,
    mut guns: Query<(&mut VehicleGun, &WeaponOwner)>,
    vehicles: Query<&Vehicle>,
) {
    for event in reload_events.read() {
        let Ok((mut gun, owner)) = guns.get_mut(event.weapon) else {
            continue;
        };
        let Ok(vehicle) = vehicles.get(owner.0) else {
            continue;
        };
        if vehicle.primary_weapon() != Some(event.weapon) {
            continue;
        }

        let capacity = gun.capacity;
        gun.set_clip_remaining(capacity);
    }
}

/// System: live update всех живых vehicles
pub fn drive_vehicles(
    time: Res<Time>,
    world: SceneQuery,
    heads: Query<&GlobalTransform, With<HeadBone>>,
    mut vehicles: Query<(&mut Vehicle, &mut CharacterMotor, &mut Transform, &mut AnimatorParameters)>,
) {
    let delta = time.delta_secs();

    for (mut vehicle, mut motor, mut transform, mut params) in vehicles.iter_mut() {
        if !vehicle.is_alive() {
            continue;
        }

        let intent = vehicle.move_intent();
        let (_, yaw_target) = vehicle.pitch_yaw();

        match &mut vehicle.locomotion {
            Locomotion::Soldier(gait) => {
                gait.step(intent, yaw_target, &mut motor, &mut transform, &mut params, delta, &world);
            }
            Locomotion::Walker(gait) => {
                let head_frame = gait
                    .head_bone
                    .and_then(|head| heads.get(head).ok())
                    .map(|head| head.rotation())
                    .unwrap_or(transform.rotation);
                gait.step(
                    intent,
                    yaw_target,
                    head_frame,
                    &mut motor,
                    &mut transform,
                    &mut params,
                    delta,
                    &world,
                );
            }
        }
    }
}

/// System (late phase): head yaw walker → local rotation кости головы
pub fn apply_head_yaw(vehicles: Query<&Vehicle>, mut heads: Query<(&HeadBone, &mut Transform)>) {
    for (head, mut transform) in heads.iter_mut() {
        let Ok(vehicle) = vehicles.get(head.vehicle) else {
            continue;
        };
        if let Locomotion::Walker(gait) = &vehicle.locomotion {
            transform.rotation = gait.head_rotation(head.rest);
        }
    }
}
