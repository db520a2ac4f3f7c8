//! Sound events: ECS ↔ audio host
//!
//! Host (animation graph) шлёт `FootstepCue` на кадрах шага,
//! ECS отвечает `WorldSoundRequest` (one-shot clip в точке мира).

use bevy::prelude::*;

/// Нога, на которую пришёлся шаг
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Foot {
    Left,
    Right,
}

impl Foot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Foot::Left => "LEFT",
            Foot::Right => "RIGHT",
        }
    }
}

/// Animation event шага vehicle
#[derive(Event, Debug, Clone, Copy)]
pub struct FootstepCue {
    pub vehicle: Entity,
    pub foot: Foot,
}

/// Запрос на проигрывание clip в точке мира
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WorldSoundRequest {
    pub clip: String,
    pub position: Vec3,
    /// Кто издал звук (None: мир)
    pub source: Option<Entity>,
}
