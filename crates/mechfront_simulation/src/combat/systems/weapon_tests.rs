//! Tests for weapon systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::{CombatPlugin, GunBlueprint, ReloadFinished, ShotFired, VehicleGun, WeaponOwner};
    use crate::create_headless_app;

    fn gun_app() -> App {
        let mut app = create_headless_app(42);
        app.add_plugins(CombatPlugin);
        app
    }

    #[test]
    fn test_shot_published_with_world_origin() {
        let mut app = gun_app();
        let owner = app.world_mut().spawn_empty().id();

        let mut gun = VehicleGun::from_blueprint(&GunBlueprint::assault_rifle(), vec![Vec3::new(0.0, 1.0, 0.0)]);
        gun.set_clip_remaining(10);
        gun.trigger_shoot(Vec3::new(0.0, 0.0, -50.0), 0.0);
        gun.release_trigger_shoot();

        let weapon = app
            .world_mut()
            .spawn((
                gun,
                WeaponOwner(owner),
                Transform::from_xyz(5.0, 0.0, 0.0),
                GlobalTransform::from_translation(Vec3::new(5.0, 0.0, 0.0)),
            ))
            .id();
        let mut shots = app.world().resource::<Events<ShotFired>>().get_cursor();

        app.update();

        let events: Vec<ShotFired> = shots.read(app.world().resource::<Events<ShotFired>>()).cloned().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].weapon, weapon);
        assert_eq!(events[0].owner, Some(owner));
        assert_eq!(events[0].origin, Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(events[0].missile.owner, Some(owner));
    }

    #[test]
    fn test_reload_finished_event_after_reload_time() {
        let mut app = gun_app();

        let mut gun = VehicleGun::from_blueprint(&GunBlueprint::assault_rifle(), Vec::new());
        gun.reload_time = 0.1;
        assert!(gun.trigger_reload(gun.capacity));
        let weapon = app.world_mut().spawn((gun, Transform::default())).id();
        let mut reloads = app.world().resource::<Events<ReloadFinished>>().get_cursor();

        // 1/60 за update (первый update: нулевой delta)
        for _ in 0..12 {
            app.update();
        }

        let events: Vec<ReloadFinished> = reloads
            .read(app.world().resource::<Events<ReloadFinished>>())
            .cloned()
            .collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].weapon, weapon);
        assert!(!app.world().get::<VehicleGun>(weapon).unwrap().is_reloading());
    }
}
