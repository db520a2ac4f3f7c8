//! Death pipeline: vehicle → ragdoll corpse
//!
//! Порядок (строго):
//! 1. Alive → Dying (повторный вызов: no-op)
//! 2. Уничтожить primary weapon
//! 3. Отключить все коллайдеры vehicle
//! 4. Спавн corpse под `CorpseContainer` с live позой (pose transfer)
//! 5. Kill impulse в ближайшую часть corpse, которую пересекает kill ray
//! 6. Despawn vehicle → Destroyed
//!
//! Side effects идут через `DeathSink`: в игре: Commands, в тестах: запись.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, ExternalImpulse, RigidBody};

use crate::combat::Died;
use crate::physics::{CollisionLayer, LAYER_CORPSES};

use super::blueprint::{CorpseBlueprint, LocomotionKind};
use super::components::{KillImpulse, Vehicle};

/// Kill ray стартует на 5m "до" точки попадания
pub const KILL_RAY_BACKOFF: f32 = 5.0;

/// Длина kill ray
pub const KILL_RAY_LENGTH: f32 = 10.0;

/// Шаг физики, за который действует force (walker)
pub const PHYSICS_STEP: f32 = 1.0 / 60.0;

/// Scene entity, под которым живут все corpses
#[derive(Component, Debug, Default, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CorpseContainer;

/// Corpse root
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Corpse {
    /// Vehicle, из которого получился (уже despawned)
    pub source: Entity,
}

/// Event: шаги death pipeline (в порядке выполнения)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum VehicleLifecycleEvent {
    WeaponDestroyed {
        vehicle: Entity,
        weapon: Entity,
    },
    CorpseSpawned {
        vehicle: Entity,
        corpse: Entity,
        kind: LocomotionKind,
        focal_point: Option<Entity>,
    },
    VehicleDestroyed {
        vehicle: Entity,
        attacker: Option<Entity>,
    },
}

/// Созданный corpse
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedCorpse {
    pub root: Entity,
    /// Entities частей, по индексам `CorpseBlueprint::parts`
    pub parts: Vec<Entity>,
    pub focal_point: Option<Entity>,
}

/// Как kill impulse передаётся ragdoll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseMode {
    /// Мгновенный импульс (soldier)
    Impulse,
    /// Сила на один шаг физики (walker)
    Force,
}

impl ImpulseMode {
    pub fn for_kind(kind: LocomotionKind) -> Self {
        match kind {
            LocomotionKind::Soldier => ImpulseMode::Impulse,
            LocomotionKind::Walker => ImpulseMode::Force,
        }
    }

    fn scale(&self) -> f32 {
        match self {
            ImpulseMode::Impulse => 1.0,
            ImpulseMode::Force => PHYSICS_STEP,
        }
    }
}

/// Side effects death pipeline
pub trait DeathSink {
    fn destroy_weapon(&mut self, vehicle: Entity, weapon: Entity);
    fn disable_collider(&mut self, collider: Entity);
    /// `parts`: local transforms частей (по индексам blueprint)
    fn spawn_corpse(
        &mut self,
        vehicle: Entity,
        kind: LocomotionKind,
        blueprint: &CorpseBlueprint,
        transform: Transform,
        parts: &[Transform],
    ) -> SpawnedCorpse;
    fn apply_impulse(&mut self, part: Entity, impulse: Vec3, torque_impulse: Vec3);
    fn destroy_vehicle(&mut self, vehicle: Entity, attacker: Option<Entity>);
}

/// Итог смерти
#[derive(Debug, Clone, PartialEq)]
pub struct DeathReport {
    pub corpse: SpawnedCorpse,
    /// Часть, получившая kill impulse (None: kill ray никого не задел)
    pub impulse_part: Option<Entity>,
}

/// Попадание kill ray в часть corpse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillRayHit {
    pub part_index: usize,
    pub point: Vec3,
    pub part_centre: Vec3,
}

/// Ближайшая часть corpse на kill ray.
///
/// Ray: `position - 5 * dir`, длина 10. Части без shape не участвуют.
pub fn nearest_kill_hit(
    blueprint: &CorpseBlueprint,
    corpse_transform: &Transform,
    parts: &[Transform],
    kill: &KillImpulse,
) -> Option<KillRayHit> {
    let dir = kill.direction.try_normalize()?;
    let origin = kill.position - KILL_RAY_BACKOFF * dir;

    let mut best: Option<(f32, KillRayHit)> = None;
    for (index, (part, local)) in blueprint.parts.iter().zip(parts).enumerate() {
        let Some(shape) = &part.shape else {
            continue;
        };

        let world = corpse_transform.mul_transform(*local);
        let Some(hit) = shape.to_collider().cast_ray_and_get_normal(
            world.translation,
            world.rotation,
            origin,
            dir,
            KILL_RAY_LENGTH,
            true,
        ) else {
            continue;
        };

        let distance = (hit.point - origin).length();
        if best.as_ref().is_none_or(|(nearest, _)| distance < *nearest) {
            best = Some((
                distance,
                KillRayHit {
                    part_index: index,
                    point: hit.point,
                    part_centre: world.translation,
                },
            ));
        }
    }

    best.map(|(_, hit)| hit)
}

/// Смерть vehicle. `None`, если смерть уже началась (idempotent).
///
/// `transform`: мировой transform vehicle (root entity),
/// `live_pose`: local transform live кости по entity.
pub fn die(
    entity: Entity,
    vehicle: &mut Vehicle,
    transform: &Transform,
    attacker: Option<Entity>,
    live_pose: impl Fn(Entity) -> Option<Transform>,
    sink: &mut impl DeathSink,
) -> Option<DeathReport> {
    if !vehicle.begin_dying() {
        return None;
    }

    if let Some(weapon) = vehicle.primary_weapon() {
        sink.destroy_weapon(entity, weapon);
        vehicle.set_primary_weapon(None);
    }

    for &collider in &vehicle.colliders {
        sink.disable_collider(collider);
    }

    let parts = match &vehicle.pose_transfer {
        Some(map) => map.posed_parts(&vehicle.corpse, live_pose),
        None => vehicle.corpse.parts.iter().map(|part| part.rest_transform()).collect(),
    };

    let kind = vehicle.locomotion.kind();
    let corpse_transform = Transform::from_translation(transform.translation).with_rotation(transform.rotation);
    let corpse = sink.spawn_corpse(entity, kind, &vehicle.corpse, corpse_transform, &parts);

    let kill = vehicle.kill_impulse();
    let mut impulse_part = None;
    if let Some(hit) = nearest_kill_hit(&vehicle.corpse, &corpse_transform, &parts, &kill) {
        if let Some(&part) = corpse.parts.get(hit.part_index) {
            let impulse = kill.direction.normalize_or_zero() * kill.power * ImpulseMode::for_kind(kind).scale();
            let torque_impulse = (hit.point - hit.part_centre).cross(impulse);
            sink.apply_impulse(part, impulse, torque_impulse);
            impulse_part = Some(part);
        }
    }

    sink.destroy_vehicle(entity, attacker);
    vehicle.finish_dying();

    Some(DeathReport { corpse, impulse_part })
}

// ============================================================================
// ECS sink
// ============================================================================

/// `DeathSink` поверх Commands. Lifecycle события копятся в `events`.
pub struct CommandsDeathSink<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    container: Option<Entity>,
    pub events: Vec<VehicleLifecycleEvent>,
}

impl<'a, 'w, 's> CommandsDeathSink<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, container: Option<Entity>) -> Self {
        Self {
            commands,
            container,
            events: Vec::new(),
        }
    }
}

impl DeathSink for CommandsDeathSink<'_, '_, '_> {
    fn destroy_weapon(&mut self, vehicle: Entity, weapon: Entity) {
        self.commands.entity(weapon).despawn();
        self.events.push(VehicleLifecycleEvent::WeaponDestroyed { vehicle, weapon });
    }

    fn disable_collider(&mut self, collider: Entity) {
        self.commands.entity(collider).try_insert(ColliderDisabled);
    }

    fn spawn_corpse(
        &mut self,
        vehicle: Entity,
        kind: LocomotionKind,
        blueprint: &CorpseBlueprint,
        transform: Transform,
        parts: &[Transform],
    ) -> SpawnedCorpse {
        let mut root = self
            .commands
            .spawn((Name::new(blueprint.name.clone()), transform, Corpse { source: vehicle }));
        if let Some(container) = self.container {
            root.insert(ChildOf(container));
        }
        let root = root.id();

        let skeleton = self
            .commands
            .spawn((Name::new(blueprint.skeleton_root.clone()), Transform::default(), ChildOf(root)))
            .id();

        let parts = blueprint
            .parts
            .iter()
            .zip(parts)
            .map(|(part, local)| {
                let mut entity = self.commands.spawn((Name::new(part.name.clone()), *local, ChildOf(skeleton)));
                if let Some(shape) = &part.shape {
                    entity.insert((RigidBody::Dynamic, shape.to_collider(), CollisionLayer(LAYER_CORPSES)));
                }
                entity.id()
            })
            .collect();

        let focal_point = blueprint.focal_point.map(|offset| {
            self.commands
                .spawn((Name::new("FocalPoint"), Transform::from_translation(offset), ChildOf(root)))
                .id()
        });

        self.events.push(VehicleLifecycleEvent::CorpseSpawned {
            vehicle,
            corpse: root,
            kind,
            focal_point,
        });

        SpawnedCorpse {
            root,
            parts,
            focal_point,
        }
    }

    fn apply_impulse(&mut self, part: Entity, impulse: Vec3, torque_impulse: Vec3) {
        self.commands.entity(part).insert(ExternalImpulse {
            impulse,
            torque_impulse,
        });
    }

    fn destroy_vehicle(&mut self, vehicle: Entity, attacker: Option<Entity>) {
        self.commands.entity(vehicle).despawn();
        self.events.push(VehicleLifecycleEvent::VehicleDestroyed { vehicle, attacker });
    }
}

/// System: `Died` по vehicle → death pipeline
pub fn handle_vehicle_deaths(
    mut commands: Commands,
    mut died_events: EventReader<Died>,
    mut vehicles: Query<(&mut Vehicle, &Transform)>,
    bones: Query<&Transform, Without<Vehicle>>,
    containers: Query<Entity, With<CorpseContainer>>,
    mut lifecycle_events: EventWriter<VehicleLifecycleEvent>,
) {
    let container = containers.iter().next();

    for event in died_events.read() {
        let Ok((mut vehicle, transform)) = vehicles.get_mut(event.entity) else {
            continue;
        };

        let mut sink = CommandsDeathSink::new(&mut commands, container);
        let report = die(
            event.entity,
            &mut vehicle,
            transform,
            event.attacker,
            |bone| bones.get(bone).ok().copied(),
            &mut sink,
        );
        let events = std::mem::take(&mut sink.events);
        lifecycle_events.write_batch(events);

        if let Some(report) = report {
            crate::log_info(&format!(
                "Vehicle {:?} died (attacker {:?}) → corpse {:?}, impulse part {:?}",
                event.entity, event.attacker, report.corpse.root, report.impulse_part
            ));
        }
    }
}

/// Startup: corpse container сцены
pub fn spawn_corpse_container(mut commands: Commands, containers: Query<(), With<CorpseContainer>>) {
    if containers.is_empty() {
        commands.spawn((Name::new("Corpses"), CorpseContainer, Transform::default()));
    }
}
