//! Player systems
//!
//! Control loop (MechSet::Control): порядок внутри tick:
//! a. pitch/yaw камеры от look input (делённые на zoom)
//! b. run + move intent vehicle
//! c. aim: look-at центра экрана + sphere cast от shoot points → target in sight
//! d. aim_at vehicle = look-at камеры (в любом режиме)
//! e. zoom → Aim (zoom pivot), иначе Chase (default pivot)
//! f. fire (не на бегу) → trigger, иначе release
//! g. heading + force kill
//!
//! Lifecycle: setup новых players, damage flash, смерть vehicle.

use bevy::prelude::*;

use crate::camera::{spawn_camera_rig, CameraMode, CameraRig, RigConfig};
use crate::combat::{DamagePayload, DamageRequest, Damaged, GunBlueprint, Killable, VehicleGun};
use crate::physics::{CollisionWorld, SceneQuery, LAYER_PLAYER, MASK_IGNORE_PLAYER_VIEW};
use crate::vehicle::{pivot_world_position, spawn_vehicle, Vehicle, VehicleBlueprint, VehicleHandles, VehicleLifecycleEvent};

use super::components::{PlayerController, PlayerInput, PlayerSession, Team};
use super::hud::HeadsUpDisplay;
use super::targeting::Targeting;

/// Дистанция камеры при фокусе на corpse
pub const CORPSE_FOCUS_DISTANCE: f32 = 30.0;

/// Урон force kill (debug клавиша)
pub const FORCE_KILL_DAMAGE: f32 = 1000.0;

/// Длительность fade crosshair после смерти
pub const DEATH_CROSSHAIR_FADE: f32 = 1.0;

/// Spawn player + его vehicle на `LAYER_PLAYER`.
///
/// `gun` подменяет оружие blueprint (None: оружие blueprint).
/// Камера/targeting/HUD настраиваются в `setup_spawned_players`.
pub fn spawn_player(
    commands: &mut Commands,
    team: Team,
    blueprint: &VehicleBlueprint,
    gun: Option<&GunBlueprint>,
    transform: Transform,
) -> (Entity, VehicleHandles) {
    let gun = gun.unwrap_or(&blueprint.weapon);
    let handles = spawn_vehicle(commands, blueprint, gun, transform, LAYER_PLAYER);

    let player = commands
        .spawn((Name::new("Player"), PlayerController::new(team, handles.vehicle), team))
        .id();

    crate::log_info(&format!(
        "Player {:?} (team {}) took {} {:?}",
        player, team.0, blueprint.name, handles.vehicle
    ));

    (player, handles)
}

/// Startup: camera сессии (если host не создал свою)
pub fn ensure_session_camera(
    mut commands: Commands,
    session: Option<Res<PlayerSession>>,
    config: Option<Res<RigConfig>>,
) {
    if session.is_some() {
        return;
    }

    let config = config.map(|config| *config).unwrap_or_default();
    let camera = spawn_camera_rig(&mut commands, config);
    commands.insert_resource(PlayerSession { camera, player: None });
}

/// System: новый player → targeting, камера на default pivot, crosshair
#[allow(clippy::too_many_arguments)]
pub fn setup_spawned_players(
    mut session: Option<ResMut<PlayerSession>>,
    world: SceneQuery,
    players: Query<(Entity, &PlayerController), Added<PlayerController>>,
    vehicles: Query<(&Vehicle, &Transform)>,
    pivots: Query<&Transform, Without<Vehicle>>,
    guns: Query<&VehicleGun>,
    mut rigs: Query<&mut CameraRig>,
    mut targeting: ResMut<Targeting>,
    mut hud: ResMut<HeadsUpDisplay>,
) {
    for (player, controller) in players.iter() {
        let Some(vehicle_entity) = controller.vehicle else {
            continue;
        };
        let Ok((vehicle, transform)) = vehicles.get(vehicle_entity) else {
            continue;
        };

        targeting.add_targetable(controller.team, vehicle_entity);

        if let Some(session) = session.as_mut() {
            session.player = Some(player);

            if let Ok(mut rig) = rigs.get_mut(session.camera) {
                if let Some((pivot, position)) = resolve_pivot(vehicle.default_pivot, transform, &pivots) {
                    rig.set_pivot(pivot, position, vehicle.camera_offset, vehicle.camera_distance, &world);
                }
                rig.set_zoom(1.0);
            }
        }

        if let Some(gun) = vehicle.primary_weapon().and_then(|weapon| guns.get(weapon).ok()) {
            hud.set_crosshair(&gun.crosshair);
        }
    }
}

/// Мировая позиция pivot (прямой потомок vehicle root)
fn resolve_pivot(
    pivot: Option<Entity>,
    vehicle: &Transform,
    pivots: &Query<&Transform, Without<Vehicle>>,
) -> Option<(Entity, Vec3)> {
    let pivot = pivot?;
    let local = pivots.get(pivot).ok()?;
    Some((pivot, pivot_world_position(vehicle, local)))
}

/// Коллайдер или любой его предок: `Killable`
fn is_killable_hit(collider: Entity, killables: &Query<(), With<Killable>>, parents: &Query<&ChildOf>) -> bool {
    let mut current = Some(collider);
    while let Some(entity) = current {
        if killables.contains(entity) {
            return true;
        }
        current = parents.get(entity).ok().map(|parent| parent.parent());
    }
    false
}

/// System: per-tick control loop
#[allow(clippy::too_many_arguments)]
pub fn control_player(
    mut input: ResMut<PlayerInput>,
    session: Option<Res<PlayerSession>>,
    world: SceneQuery,
    mut rigs: Query<&mut CameraRig>,
    mut players: Query<&mut PlayerController>,
    mut vehicles: Query<(&mut Vehicle, &Transform)>,
    pivots: Query<&Transform, Without<Vehicle>>,
    mut guns: Query<(&mut VehicleGun, &GlobalTransform)>,
    killables: Query<(), With<Killable>>,
    parents: Query<&ChildOf>,
    mut hud: ResMut<HeadsUpDisplay>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    let force_kill = std::mem::take(&mut input.force_kill);

    let Some(session) = session else {
        return;
    };
    let Ok(mut rig) = rigs.get_mut(session.camera) else {
        return;
    };

    // a. Look
    let zoom = rig.zoom();
    rig.add_pitch_yaw(input.look.y / zoom, input.look.x / zoom);

    let mut controller = session.player.and_then(|player| players.get_mut(player).ok());
    let bound = controller
        .as_ref()
        .and_then(|controller| controller.vehicle)
        .and_then(|entity| vehicles.get_mut(entity).ok().map(|vehicle| (entity, vehicle)));

    let Some((vehicle_entity, (mut vehicle, transform))) = bound else {
        rig.set_mode(CameraMode::Chase);
        rig.set_zoom(1.0);
        return;
    };

    // b. Movement
    vehicle.set_run(input.run);
    vehicle.set_move(input.movement.y, input.movement.x);

    // c. Aim
    let aim_at = rig.look_at_position(&world);
    let mut gun = vehicle.primary_weapon().and_then(|weapon| guns.get_mut(weapon).ok());

    let target_in_sight = gun.as_ref().is_some_and(|(gun, global)| {
        let origin = gun.shoot_points_centre(global);
        world
            .sphere_cast(
                origin,
                aim_at - origin,
                gun.missile_radius,
                gun.max_aim_distance,
                MASK_IGNORE_PLAYER_VIEW,
            )
            .is_some_and(|hit| is_killable_hit(hit.collider, &killables, &parents))
    });

    // d. Look-at камеры и в Chase mode
    vehicle.set_aim_at(aim_at);
    hud.set_target_in_sight(target_in_sight);
    if let Some(controller) = controller.as_mut() {
        controller.aim_at = aim_at;
    }

    // e. Camera mode
    if input.zoom {
        rig.set_mode(CameraMode::Aim);
        if let Some((pivot, position)) = resolve_pivot(vehicle.zoom_pivot, transform, &pivots) {
            rig.set_pivot(pivot, position, Vec3::ZERO, 0.0, &world);
        }
        rig.set_zoom(gun.as_ref().map(|(gun, _)| gun.zoom).unwrap_or(1.0));
    } else {
        rig.set_mode(CameraMode::Chase);
        if let Some((pivot, position)) = resolve_pivot(vehicle.default_pivot, transform, &pivots) {
            rig.set_pivot(pivot, position, vehicle.camera_offset, vehicle.camera_distance, &world);
        }
        rig.set_zoom(1.0);
    }

    // f. Shooting
    if let Some((gun, _)) = gun.as_mut() {
        if input.fire && !vehicle.is_run() {
            vehicle.trigger_primary_weapon(gun);
        } else {
            vehicle.release_primary_weapon(gun);
        }
    }

    // g. Heading + force kill
    if let Some(controller) = controller.as_mut() {
        controller.heading = transform.rotation * Vec3::NEG_Z;
    }
    if force_kill {
        damage_requests.write(DamageRequest {
            target: vehicle_entity,
            hit_collider: None,
            position: Vec3::ZERO,
            direction: Vec3::Y,
            payload: DamagePayload::Raw {
                power: 0.0,
                damage: FORCE_KILL_DAMAGE,
            },
            attacker: None,
        });
    }
}

/// System: попадание по vehicle игрока → damage flash
pub fn flash_player_damage(
    mut damaged_events: EventReader<Damaged>,
    players: Query<&PlayerController>,
    mut hud: ResMut<HeadsUpDisplay>,
) {
    for event in damaged_events.read() {
        if players.iter().any(|controller| controller.vehicle == Some(event.target)) {
            hud.flash_damage();
        }
    }
}

/// System: смерть vehicle игрока
///
/// CorpseSpawned с focal point → камера на corpse (без reorientation).
/// VehicleDestroyed → targeting, fade crosshair, controller без vehicle.
pub fn handle_player_vehicle_lifecycle(
    mut lifecycle_events: EventReader<VehicleLifecycleEvent>,
    session: Option<Res<PlayerSession>>,
    mut players: Query<&mut PlayerController>,
    mut rigs: Query<&mut CameraRig>,
    mut targeting: ResMut<Targeting>,
    mut hud: ResMut<HeadsUpDisplay>,
) {
    for event in lifecycle_events.read() {
        match *event {
            VehicleLifecycleEvent::CorpseSpawned {
                vehicle,
                focal_point: Some(focal_point),
                ..
            } => {
                if !players.iter().any(|controller| controller.vehicle == Some(vehicle)) {
                    continue;
                }
                let Some(session) = session.as_ref() else {
                    continue;
                };
                if let Ok(mut rig) = rigs.get_mut(session.camera) {
                    rig.bind_pivot(focal_point, Vec3::ZERO, CORPSE_FOCUS_DISTANCE);
                }
            }
            VehicleLifecycleEvent::VehicleDestroyed { vehicle, .. } => {
                for mut controller in players.iter_mut() {
                    if controller.vehicle != Some(vehicle) {
                        continue;
                    }
                    crate::log_info("YOU DIED.");
                    targeting.remove_targetable(controller.team, vehicle);
                    hud.fade_out_crosshair(DEATH_CROSSHAIR_FADE);
                    controller.vehicle = None;
                }
            }
            _ => {}
        }
    }
}

/// System: HUD таймеры
pub fn tick_hud(time: Res<Time>, mut hud: ResMut<HeadsUpDisplay>) {
    hud.tick(time.delta_secs());
}
