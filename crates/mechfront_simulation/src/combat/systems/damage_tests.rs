//! Tests for damage systems.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::{CombatPlugin, DamagePayload, DamageRequest, Damaged, Died, Killable, Missile};
    use crate::create_headless_app;

    fn combat_app() -> App {
        let mut app = create_headless_app(42);
        app.add_plugins(CombatPlugin);
        app
    }

    fn raw_hit(target: Entity, damage: f32) -> DamageRequest {
        DamageRequest {
            target,
            hit_collider: None,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            payload: DamagePayload::Raw { power: 1.0, damage },
            attacker: None,
        }
    }

    #[test]
    fn test_damage_request_reduces_health() {
        let mut app = combat_app();
        let target = app.world_mut().spawn(Killable::new(100.0)).id();
        let mut damaged = app.world().resource::<Events<Damaged>>().get_cursor();

        app.world_mut().send_event(raw_hit(target, 30.0));
        app.update();

        let killable = app.world().get::<Killable>(target).unwrap();
        assert_eq!(killable.health, 70.0);
        assert!(killable.is_alive());

        let events: Vec<Damaged> = damaged
            .read(app.world().resource::<Events<Damaged>>())
            .cloned()
            .collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, 30.0);
    }

    #[test]
    fn test_killing_blow_emits_single_died() {
        let mut app = combat_app();
        let shooter = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn(Killable::new(20.0)).id();
        let mut died = app.world().resource::<Events<Died>>().get_cursor();

        let missile = Missile {
            power: 10.0,
            damage: 15.0,
            owner: Some(shooter),
        };
        for _ in 0..3 {
            app.world_mut().send_event(DamageRequest {
                payload: DamagePayload::Missile(missile),
                ..raw_hit(target, 0.0)
            });
        }
        app.update();
        app.update();

        let events: Vec<Died> = died.read(app.world().resource::<Events<Died>>()).cloned().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity, target);
        // Attacker снаряда = owner
        assert_eq!(events[0].attacker, Some(shooter));
    }

    #[test]
    fn test_request_for_missing_target_ignored() {
        let mut app = combat_app();
        let ghost = app.world_mut().spawn_empty().id();
        let mut damaged = app.world().resource::<Events<Damaged>>().get_cursor();

        app.world_mut().send_event(raw_hit(ghost, 30.0));
        app.update();

        assert_eq!(damaged.read(app.world().resource::<Events<Damaged>>()).count(), 0);
    }
}
