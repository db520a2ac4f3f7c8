//! Vehicle components
//!
//! Один `Vehicle` компонент с общими полями + tagged `Locomotion` вариант.
//! Общие операции (move/aim/trigger/damage) одинаковы для всех вариантов,
//! различается только live update и поведение при смерти.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::combat::{DamageRequest, Killable, VehicleGun};

use super::blueprint::{CorpseBlueprint, LocomotionKind, VehicleBlueprint};
use super::pose::PoseTransferMap;

/// Множитель урона по critical коллайдеру
pub const CRITICAL_DAMAGE_MULTIPLIER: f32 = 10.0;

/// Lifecycle vehicle (только вперёд)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum VehicleLifecycle {
    #[default]
    Alive,
    Dying,
    Destroyed,
}

/// Кэш последнего попадания: откуда и как сильно толкнуть corpse
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct KillImpulse {
    pub position: Vec3,
    pub direction: Vec3,
    pub power: f32,
}

// ============================================================================
// Locomotion variants
// ============================================================================

/// Soldier: тело доворачивается к yaw target, движение в осях тела
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SoldierGait {
    pub forward_speed: f32,
    pub strafe_speed: f32,
    /// Скорость доворота корпуса (1/s)
    pub turn_rate: f32,
}

/// Walker: корпус поворачивается медленно и только на ходу,
/// голова отслеживает yaw target отдельно; движение в осях головы
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WalkerGait {
    pub forward_speed: f32,
    pub strafe_speed: f32,
    pub head_bone: Option<Entity>,
    /// Yaw головы относительно корпуса (градусы)
    pub head_yaw: f32,
    /// Скорость доворота головы (1/s)
    pub head_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum Locomotion {
    Soldier(SoldierGait),
    Walker(WalkerGait),
}

impl Locomotion {
    pub fn from_blueprint(blueprint: &VehicleBlueprint, head_bone: Option<Entity>) -> Self {
        match blueprint.kind {
            LocomotionKind::Soldier => Locomotion::Soldier(SoldierGait {
                forward_speed: blueprint.forward_speed,
                strafe_speed: blueprint.strafe_speed,
                turn_rate: 25.0,
            }),
            LocomotionKind::Walker => Locomotion::Walker(WalkerGait {
                forward_speed: blueprint.forward_speed,
                strafe_speed: blueprint.strafe_speed,
                head_bone,
                head_yaw: 0.0,
                head_rate: 5.0,
            }),
        }
    }

    pub fn kind(&self) -> LocomotionKind {
        match self {
            Locomotion::Soldier(_) => LocomotionKind::Soldier,
            Locomotion::Walker(_) => LocomotionKind::Walker,
        }
    }
}

// ============================================================================
// Vehicle
// ============================================================================

/// Результат `Vehicle::damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub amount: f32,
    pub killed: bool,
    pub attacker: Option<Entity>,
}

/// Vehicle state machine (root entity, не child player controller)
#[derive(Component, Debug, Clone)]
pub struct Vehicle {
    pub locomotion: Locomotion,
    lifecycle: VehicleLifecycle,

    // === Intent ===
    move_intent: Vec2,
    run: bool,
    pitch_target: f32,
    yaw_target: f32,
    aim_at: Vec3,

    // === Parts ===
    primary_weapon: Option<Entity>,
    pub default_pivot: Option<Entity>,
    pub zoom_pivot: Option<Entity>,
    pub critical_collider: Option<Entity>,
    /// Все коллайдеры vehicle (отключаются при смерти)
    pub colliders: Vec<Entity>,
    pub camera_distance: f32,
    pub camera_offset: Vec3,

    // === Death ===
    kill: KillImpulse,
    pub corpse: CorpseBlueprint,
    pub pose_transfer: Option<PoseTransferMap>,
}

impl Vehicle {
    pub fn new(blueprint: &VehicleBlueprint, locomotion: Locomotion) -> Self {
        Self {
            locomotion,
            lifecycle: VehicleLifecycle::Alive,
            move_intent: Vec2::ZERO,
            run: false,
            pitch_target: 0.0,
            yaw_target: 0.0,
            aim_at: Vec3::ZERO,
            primary_weapon: None,
            default_pivot: None,
            zoom_pivot: None,
            critical_collider: None,
            colliders: Vec::new(),
            camera_distance: blueprint.camera_distance,
            camera_offset: blueprint.camera_offset,
            kill: KillImpulse::default(),
            corpse: blueprint.corpse.clone(),
            pose_transfer: None,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn lifecycle(&self) -> VehicleLifecycle {
        self.lifecycle
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == VehicleLifecycle::Alive
    }

    /// Alive → Dying. `false`, если смерть уже началась.
    pub(crate) fn begin_dying(&mut self) -> bool {
        if self.lifecycle != VehicleLifecycle::Alive {
            return false;
        }
        self.lifecycle = VehicleLifecycle::Dying;
        true
    }

    pub(crate) fn finish_dying(&mut self) {
        self.lifecycle = VehicleLifecycle::Destroyed;
    }

    // ------------------------------------------------------------------
    // Movement / aim intent
    // ------------------------------------------------------------------

    /// Сохраняет нормализованный intent (x = strafe, y = forward)
    pub fn set_move(&mut self, forward: f32, strafe: f32) {
        self.move_intent = Vec2::new(strafe, forward).normalize_or_zero();
    }

    pub fn move_intent(&self) -> Vec2 {
        self.move_intent
    }

    /// pitch -= delta_pitch, yaw += delta_yaw
    pub fn set_pitch_yaw(&mut self, delta_pitch: f32, delta_yaw: f32) {
        self.pitch_target -= delta_pitch;
        self.yaw_target += delta_yaw;
    }

    pub fn pitch_yaw(&self) -> (f32, f32) {
        (self.pitch_target, self.yaw_target)
    }

    pub fn set_aim_at(&mut self, position: Vec3) {
        self.aim_at = position;
    }

    pub fn aim_at(&self) -> Vec3 {
        self.aim_at
    }

    pub fn set_run(&mut self, value: bool) {
        self.run = value;
    }

    pub fn is_run(&self) -> bool {
        self.run
    }

    // ------------------------------------------------------------------
    // Weapon
    // ------------------------------------------------------------------

    pub fn primary_weapon(&self) -> Option<Entity> {
        self.primary_weapon
    }

    pub(crate) fn set_primary_weapon(&mut self, weapon: Option<Entity>) {
        self.primary_weapon = weapon;
    }

    /// Стреляет в `aim_at`; опустевший clip → release + auto reload
    pub fn trigger_primary_weapon(&self, gun: &mut VehicleGun) {
        gun.trigger_shoot(self.aim_at, 0.0);
        if gun.clip_remaining() == 0 {
            gun.release_trigger_shoot();
            gun.trigger_reload(gun.capacity);
        }
    }

    pub fn release_primary_weapon(&self, gun: &mut VehicleGun) {
        gun.release_trigger_shoot();
    }

    // ------------------------------------------------------------------
    // Damage
    // ------------------------------------------------------------------

    /// Урон по vehicle: кэширует kill impulse, critical ×10, передаёт в `Killable`.
    ///
    /// `None`, если vehicle уже умирает.
    pub fn damage(&mut self, killable: &mut Killable, request: &DamageRequest) -> Option<DamageOutcome> {
        if !self.is_alive() || killable.is_dead() {
            return None;
        }

        self.kill = KillImpulse {
            position: request.position,
            direction: request.direction,
            power: request.payload.power(),
        };

        let mut amount = request.payload.damage();
        if request.hit_collider.is_some() && request.hit_collider == self.critical_collider {
            amount *= CRITICAL_DAMAGE_MULTIPLIER;
        }

        let killed = killable.apply_damage(amount);
        Some(DamageOutcome {
            amount,
            killed,
            attacker: request.resolved_attacker(),
        })
    }

    pub fn kill_impulse(&self) -> KillImpulse {
        self.kill
    }
}

// ============================================================================
// Auxiliary components
// ============================================================================

/// Коллайдер-часть vehicle (попадание по части → урон vehicle)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct VehiclePart(pub Entity);

/// Голова walker (late-phase доворот поверх rest pose)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HeadBone {
    pub vehicle: Entity,
    pub rest: Quat,
}

/// Значение параметра animation graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatorValue {
    Bool(bool),
    Float(f32),
}

/// Именованные параметры для animation host
#[derive(Component, Debug, Clone, Default)]
pub struct AnimatorParameters {
    values: HashMap<String, AnimatorValue>,
}

impl AnimatorParameters {
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), AnimatorValue::Bool(value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), AnimatorValue::Float(value));
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(AnimatorValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(AnimatorValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AnimatorValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
