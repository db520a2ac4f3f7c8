//! Kinematic character motor для vehicles
//!
//! Архитектура:
//! - Gravity накапливается в `fall_speed` (m/s), не через rapier forces
//! - Горизонтальную скорость даёт locomotion варианта (Soldier/Walker)
//! - Ground probe через `CollisionWorld`: если после шага мы ниже земли -
//!   snap на поверхность и сброс fall_speed

use bevy::prelude::*;

use super::query::CollisionWorld;

/// Высота, с которой probe начинает луч вниз (над новой позицией)
const STEP_HEIGHT: f32 = 0.5;

/// Запас глубины probe под ногами
const GROUND_SNAP_DEPTH: f32 = 0.1;

/// Kinematic motor компонент
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterMotor {
    /// Гравитация (m/s²), отрицательная
    pub gravity: f32,
    /// Текущая вертикальная скорость (m/s)
    pub fall_speed: f32,
    /// Стоит ли на земле после последнего шага
    pub grounded: bool,
    /// Layers, которые ground probe игнорирует (свои коллайдеры)
    pub probe_exclude_mask: u32,
}

impl Default for CharacterMotor {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            fall_speed: 0.0,
            grounded: false,
            probe_exclude_mask: 0,
        }
    }
}

impl CharacterMotor {
    pub fn with_exclusion(probe_exclude_mask: u32) -> Self {
        Self {
            probe_exclude_mask,
            ..default()
        }
    }

    /// fall_speed += gravity * dt
    pub fn accumulate_gravity(&mut self, delta: f32) {
        self.fall_speed += self.gravity * delta;
    }

    /// Смещает позицию на `(horizontal + up * fall_speed) * dt` с ground snap.
    ///
    /// Возвращает новую позицию.
    pub fn displace(
        &mut self,
        position: Vec3,
        horizontal_velocity: Vec3,
        delta: f32,
        world: &dyn CollisionWorld,
    ) -> Vec3 {
        let velocity = Vec3::new(horizontal_velocity.x, self.fall_speed, horizontal_velocity.z);
        let mut next = position + velocity * delta;

        let probe_top = position.y.max(next.y) + STEP_HEIGHT;
        let probe_origin = Vec3::new(next.x, probe_top, next.z);
        let probe_length = probe_top - next.y + GROUND_SNAP_DEPTH;

        self.grounded = false;
        if let Some(ground) = world.raycast(probe_origin, Vec3::NEG_Y, probe_length, self.probe_exclude_mask) {
            if ground.point.y >= next.y - GROUND_SNAP_DEPTH {
                next.y = ground.point.y;
                self.fall_speed = 0.0;
                self.grounded = true;
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::query::doubles::PlaneWorld;
    use crate::physics::query::EmptyWorld;

    #[test]
    fn test_gravity_accumulates_without_ground() {
        let mut motor = CharacterMotor::default();
        let delta = 1.0 / 60.0;

        let mut position = Vec3::new(0.0, 10.0, 0.0);
        for _ in 0..60 {
            motor.accumulate_gravity(delta);
            position = motor.displace(position, Vec3::ZERO, delta, &EmptyWorld);
        }

        // После 1 sec: fall_speed ≈ -9.81
        assert!((motor.fall_speed + 9.81).abs() < 0.01, "fall_speed = {}", motor.fall_speed);
        assert!(position.y < 10.0 - 4.5);
        assert!(!motor.grounded);
    }

    #[test]
    fn test_ground_snap_resets_fall_speed() {
        let world = PlaneWorld::ground_at(0.0);
        let mut motor = CharacterMotor {
            fall_speed: -20.0,
            ..default()
        };

        let position = motor.displace(Vec3::new(0.0, 0.2, 0.0), Vec3::ZERO, 0.1, &world);

        assert_eq!(position.y, 0.0);
        assert_eq!(motor.fall_speed, 0.0);
        assert!(motor.grounded);
    }

    #[test]
    fn test_horizontal_velocity_applied() {
        let world = PlaneWorld::ground_at(0.0);
        let mut motor = CharacterMotor::default();

        let position = motor.displace(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 0.5, &world);

        assert!((position.x - 2.5).abs() < 1e-5);
        assert_eq!(position.y, 0.0);
    }
}
