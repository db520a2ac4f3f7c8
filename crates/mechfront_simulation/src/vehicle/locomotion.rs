//! Live update вариантов: gravity + displacement + поворот + animation params
//!
//! Soldier: движение в осях тела, корпус быстро (25/s) доворачивается к yaw target.
//! Walker: движение в осях головы, корпус поворачивается со скоростью
//! `2 * speed` к `yaw target + strafe angle`, голова компенсирует разницу
//! (5/s, по кратчайшей дуге) и применяется к кости в late phase.

use bevy::prelude::*;

use crate::physics::{CharacterMotor, CollisionWorld};
use crate::shared::{lerp_angle, yaw_of, yaw_rotation};

use super::components::{AnimatorParameters, SoldierGait, WalkerGait};

/// Горизонтальная скорость в заданном frame (x = strafe, y = forward intent)
fn planar_velocity(frame: Quat, intent: Vec2, forward_speed: f32, strafe_speed: f32) -> Vec3 {
    let right = (frame * Vec3::X).with_y(0.0).normalize_or_zero();
    let forward = (frame * Vec3::NEG_Z).with_y(0.0).normalize_or_zero();
    right * intent.x * strafe_speed + forward * intent.y * forward_speed
}

impl SoldierGait {
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &self,
        intent: Vec2,
        yaw_target: f32,
        motor: &mut CharacterMotor,
        transform: &mut Transform,
        params: &mut AnimatorParameters,
        delta: f32,
        world: &dyn CollisionWorld,
    ) {
        motor.accumulate_gravity(delta);

        let velocity = planar_velocity(transform.rotation, intent, self.forward_speed, self.strafe_speed);
        transform.translation = motor.displace(transform.translation, velocity, delta, world);

        let t = (self.turn_rate * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.lerp(yaw_rotation(yaw_target), t);

        params.set_bool("IsAim", true);
        params.set_float("Speed", intent.y);
        params.set_float("VerticalSpeed", intent.y);
        params.set_float("HorizontalSpeed", intent.x);
    }
}

impl WalkerGait {
    /// `head_frame`: мировой поворот головы (корпус, если головы нет)
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        intent: Vec2,
        yaw_target: f32,
        head_frame: Quat,
        motor: &mut CharacterMotor,
        transform: &mut Transform,
        params: &mut AnimatorParameters,
        delta: f32,
        world: &dyn CollisionWorld,
    ) {
        motor.accumulate_gravity(delta);

        let velocity = planar_velocity(head_frame, intent, self.forward_speed, self.strafe_speed);
        transform.translation = motor.displace(transform.translation, velocity, delta, world);

        let speed = (intent.y.abs() + intent.x.abs()).clamp(0.0, 1.0);
        let turn_speed = 2.0 * speed;
        let strafe_angle = intent.x.atan2(intent.y).to_degrees();
        let t = (turn_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.lerp(yaw_rotation(yaw_target + strafe_angle), t);

        let body_yaw = yaw_of(transform.rotation);
        self.head_yaw = lerp_angle(self.head_yaw, yaw_target - body_yaw, self.head_rate * delta);

        params.set_float("Speed", speed);
    }

    /// Local поворот головы: rest pose + head yaw вокруг вертикали кости
    pub fn head_rotation(&self, rest: Quat) -> Quat {
        rest * yaw_rotation(self.head_yaw)
    }
}
