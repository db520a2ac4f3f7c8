//! Tests for vehicle systems (headless App + CombatPlugin + VehiclePlugin).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy_rapier3d::prelude::{ColliderDisabled, ExternalImpulse, RigidBody};

    use crate::combat::{CombatPlugin, DamagePayload, DamageRequest, Damaged, Died, GunBlueprint, Killable, VehicleGun};
    use crate::physics::{CollisionLayer, LAYER_ACTORS, LAYER_CORPSES};
    use crate::vehicle::{
        spawn_vehicle, Corpse, CorpseContainer, HeadBone, Locomotion, Vehicle, VehicleBlueprint, VehicleHandles,
        VehicleLifecycleEvent, VehiclePlugin,
    };
    use crate::{create_headless_app, MechSet};

    fn vehicle_app() -> App {
        let mut app = create_headless_app(42);
        app.configure_sets(
            Update,
            (
                MechSet::Control,
                MechSet::Locomotion,
                MechSet::Weapons,
                MechSet::Damage,
                MechSet::Death,
            )
                .chain(),
        );
        app.add_plugins((CombatPlugin, VehiclePlugin));
        app
    }

    fn spawn(app: &mut App, blueprint: &VehicleBlueprint, transform: Transform) -> VehicleHandles {
        let mut commands = app.world_mut().commands();
        let handles = spawn_vehicle(&mut commands, blueprint, &blueprint.weapon, transform, LAYER_ACTORS);
        app.world_mut().flush();
        handles
    }

    fn hit(target: Entity, damage: f32) -> DamageRequest {
        DamageRequest {
            target,
            hit_collider: None,
            position: Vec3::new(0.0, 1.5, 0.0),
            direction: Vec3::NEG_Z,
            payload: DamagePayload::Raw { power: 10.0, damage },
            attacker: None,
        }
    }

    #[test]
    fn test_spawn_creates_single_loaded_weapon() {
        let mut app = vehicle_app();
        let blueprint = VehicleBlueprint::soldier();
        let handles = spawn(&mut app, &blueprint, Transform::default());

        let vehicle = app.world().get::<Vehicle>(handles.vehicle).unwrap();
        assert_eq!(vehicle.primary_weapon(), Some(handles.weapon));
        assert_eq!(vehicle.critical_collider, handles.critical_collider);
        assert!(vehicle.critical_collider.is_some());
        assert_eq!(vehicle.colliders.len(), 3);

        let guns = app.world_mut().query::<&VehicleGun>().iter(app.world()).count();
        assert_eq!(guns, 1);
        let gun = app.world().get::<VehicleGun>(handles.weapon).unwrap();
        assert_eq!(gun.clip_remaining(), blueprint.weapon.initial_clip);

        for collider in &handles.colliders {
            assert_eq!(app.world().get::<CollisionLayer>(*collider), Some(&CollisionLayer(LAYER_ACTORS)));
        }
    }

    #[test]
    fn test_reload_finished_refills_clip_to_capacity() {
        let mut app = vehicle_app();
        let blueprint = VehicleBlueprint::soldier();
        let handles = spawn(&mut app, &blueprint, Transform::default());

        {
            let mut gun = app.world_mut().get_mut::<VehicleGun>(handles.weapon).unwrap();
            gun.set_clip_remaining(1);
            gun.reload_time = 0.05;
        }
        {
            let world = app.world_mut();
            let vehicle = world.get::<Vehicle>(handles.vehicle).unwrap().clone();
            let mut gun = world.get_mut::<VehicleGun>(handles.weapon).unwrap();
            vehicle.trigger_primary_weapon(&mut gun);
            assert_eq!(gun.clip_remaining(), 0);
            assert!(gun.is_reloading());
        }

        for _ in 0..10 {
            app.update();
        }

        let gun = app.world().get::<VehicleGun>(handles.weapon).unwrap();
        assert!(!gun.is_reloading());
        assert_eq!(gun.clip_remaining(), gun.capacity);
    }

    #[test]
    fn test_part_hit_routes_to_vehicle_with_critical_multiplier() {
        let mut app = vehicle_app();
        let handles = spawn(&mut app, &VehicleBlueprint::soldier(), Transform::default());
        let head = handles.critical_collider.unwrap();
        let chest = handles.colliders[1];
        let mut damaged = app.world().resource::<Events<Damaged>>().get_cursor();

        app.world_mut().send_event(hit(head, 2.0));
        app.world_mut().send_event(hit(chest, 2.0));
        app.update();

        let events: Vec<Damaged> = damaged.read(app.world().resource::<Events<Damaged>>()).cloned().collect();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.target == handles.vehicle));
        assert_eq!(events[0].amount, 20.0);
        assert_eq!(events[0].hit_collider, Some(head));
        assert_eq!(events[1].amount, 2.0);

        let killable = app.world().get::<Killable>(handles.vehicle).unwrap();
        assert_eq!(killable.health, 78.0);
    }

    #[test]
    fn test_lethal_damage_runs_death_pipeline_once() {
        let mut app = vehicle_app();
        // Первый update: Startup (corpse container)
        app.update();
        let handles = spawn(&mut app, &VehicleBlueprint::soldier(), Transform::default());
        let mut died = app.world().resource::<Events<Died>>().get_cursor();
        let mut lifecycle = app.world().resource::<Events<VehicleLifecycleEvent>>().get_cursor();

        app.world_mut().send_event(hit(handles.vehicle, 500.0));
        app.world_mut().send_event(hit(handles.vehicle, 500.0));
        app.update();
        app.update();

        assert_eq!(died.read(app.world().resource::<Events<Died>>()).count(), 1);

        let events: Vec<VehicleLifecycleEvent> = lifecycle
            .read(app.world().resource::<Events<VehicleLifecycleEvent>>())
            .cloned()
            .collect();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            VehicleLifecycleEvent::WeaponDestroyed {
                vehicle: handles.vehicle,
                weapon: handles.weapon
            }
        );
        let VehicleLifecycleEvent::CorpseSpawned { corpse, focal_point, .. } = events[1] else {
            panic!("expected CorpseSpawned, got {:?}", events[1]);
        };
        assert_eq!(focal_point, None);
        assert!(matches!(events[2], VehicleLifecycleEvent::VehicleDestroyed { vehicle, .. } if vehicle == handles.vehicle));

        // Vehicle и weapon удалены, corpse под container
        assert!(app.world().get_entity(handles.vehicle).is_err());
        assert!(app.world().get_entity(handles.weapon).is_err());
        let container = app
            .world_mut()
            .query_filtered::<Entity, With<CorpseContainer>>()
            .single(app.world())
            .unwrap();
        assert_eq!(app.world().get::<ChildOf>(corpse).map(|parent| parent.parent()), Some(container));
        assert_eq!(app.world_mut().query::<&Corpse>().iter(app.world()).count(), 1);
    }

    #[test]
    fn test_corpse_parts_are_dynamic_and_chest_gets_impulse() {
        let mut app = vehicle_app();
        app.update();
        let handles = spawn(&mut app, &VehicleBlueprint::soldier(), Transform::default());

        app.world_mut().send_event(hit(handles.vehicle, 500.0));
        app.update();

        let mut parts = app
            .world_mut()
            .query_filtered::<(&Name, &CollisionLayer, Option<&ExternalImpulse>), With<RigidBody>>();
        let parts: Vec<(String, u32, Option<Vec3>)> = parts
            .iter(app.world())
            .map(|(name, layer, impulse)| (name.to_string(), layer.0, impulse.map(|impulse| impulse.impulse)))
            .collect();

        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|(_, layer, _)| *layer == LAYER_CORPSES));
        let pushed: Vec<_> = parts.iter().filter(|(_, _, impulse)| impulse.is_some()).collect();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0, "Chest");
        assert!((pushed[0].2.unwrap() - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn test_death_disables_colliders_of_surviving_parts() {
        let mut app = vehicle_app();
        let handles = spawn(&mut app, &VehicleBlueprint::soldier(), Transform::default());
        // Detach одного коллайдера: он переживает despawn vehicle
        app.world_mut().entity_mut(handles.colliders[0]).remove::<ChildOf>();

        app.world_mut().send_event(hit(handles.vehicle, 500.0));
        app.update();

        assert!(app.world().get::<ColliderDisabled>(handles.colliders[0]).is_some());
    }

    #[test]
    fn test_soldier_drives_forward_in_body_frame() {
        let mut app = vehicle_app();
        let handles = spawn(&mut app, &VehicleBlueprint::soldier(), Transform::default());
        {
            let mut vehicle = app.world_mut().get_mut::<Vehicle>(handles.vehicle).unwrap();
            vehicle.set_move(1.0, 0.0);
        }

        // Первый update: нулевой delta
        for _ in 0..31 {
            app.update();
        }

        let transform = app.world().get::<Transform>(handles.vehicle).unwrap();
        // 0.5 s × 5 m/s вдоль -Z (без земли ещё и падает)
        assert!((transform.translation.z + 2.5).abs() < 1e-2, "z = {}", transform.translation.z);
        assert!(transform.translation.y < 0.0);
    }

    #[test]
    fn test_walker_head_bone_follows_head_yaw() {
        let mut app = vehicle_app();
        let blueprint = VehicleBlueprint::walker();
        let handles = spawn(&mut app, &blueprint, Transform::default());
        let head = handles.head_bone.unwrap();
        assert!(app.world().get::<HeadBone>(head).is_some());
        {
            let mut vehicle = app.world_mut().get_mut::<Vehicle>(handles.vehicle).unwrap();
            // yaw target +45 (вправо)
            vehicle.set_pitch_yaw(0.0, 45.0);
        }

        for _ in 0..120 {
            app.update();
        }

        let vehicle = app.world().get::<Vehicle>(handles.vehicle).unwrap();
        let Locomotion::Walker(gait) = vehicle.locomotion else {
            panic!("walker expected");
        };
        assert!((gait.head_yaw - 45.0).abs() < 1.0, "head_yaw = {}", gait.head_yaw);

        // Local forward головы повернут вправо
        let head_rotation = app.world().get::<Transform>(head).unwrap().rotation;
        let forward = head_rotation * Vec3::NEG_Z;
        assert!(forward.x > 0.6 && forward.z < -0.6, "forward = {forward}");
    }

    #[test]
    fn test_player_gun_override_is_used() {
        let mut app = vehicle_app();
        let blueprint = VehicleBlueprint::soldier();
        let cannon = GunBlueprint::walker_cannon();
        let mut commands = app.world_mut().commands();
        let handles = spawn_vehicle(&mut commands, &blueprint, &cannon, Transform::default(), LAYER_ACTORS);
        app.world_mut().flush();

        let gun = app.world().get::<VehicleGun>(handles.weapon).unwrap();
        assert_eq!(gun.crosshair, cannon.crosshair);
        assert_eq!(gun.missile_power, cannon.missile_power);
    }
}
