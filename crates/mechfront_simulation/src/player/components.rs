//! Player components & resources
//!
//! - `PlayerController`: кто управляет каким vehicle (entity без скелета)
//! - `PlayerInput`: pre-sampled input на текущий tick (host пишет каждый frame)
//! - `PlayerSession`: camera + player текущей сессии

use bevy::prelude::*;

/// Команда (ключ в `Targeting`)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub struct Team(pub u32);

/// Player controller
///
/// Vehicle: отдельный root entity (не child), связь через `vehicle`.
/// `None`: vehicle уничтожен, control loop работает только с камерой.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerController {
    pub team: Team,
    pub vehicle: Option<Entity>,
    /// Последняя aim точка (центр экрана)
    pub aim_at: Vec3,
    /// Forward vehicle на последнем tick
    pub heading: Vec3,
}

impl PlayerController {
    pub fn new(team: Team, vehicle: Entity) -> Self {
        Self {
            team,
            vehicle: Some(vehicle),
            aim_at: Vec3::ZERO,
            heading: Vec3::NEG_Z,
        }
    }
}

/// Input текущего tick
///
/// `look`: (mouse x, mouse y), `movement`: (strafe, forward).
/// `force_kill`: one-shot: control loop сбрасывает после обработки.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    pub look: Vec2,
    pub movement: Vec2,
    pub fire: bool,
    pub zoom: bool,
    pub run: bool,
    pub force_kill: bool,
}

/// Сессия: одна камера на всё время, текущий player (если есть)
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerSession {
    pub camera: Entity,
    pub player: Option<Entity>,
}
