//! Damage events
//!
//! Поток:
//! 1. Кто угодно (projectile host, AI, debug key) пишет `DamageRequest`
//! 2. Damage системы (MechSet::Damage) применяют урон к `Killable`
//!    (vehicles: со своим critical multiplier и kill impulse cache)
//! 3. Выход: `Damaged` на каждое попадание, `Died` на убивающее

use bevy::prelude::*;

/// Снаряд, который нанёс урон
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Missile {
    pub power: f32,
    pub damage: f32,
    /// Кто выпустил (attacker)
    pub owner: Option<Entity>,
}

/// Источник урона: "сырой" удар или снаряд
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamagePayload {
    Raw { power: f32, damage: f32 },
    Missile(Missile),
}

impl DamagePayload {
    pub fn power(&self) -> f32 {
        match self {
            DamagePayload::Raw { power, .. } => *power,
            DamagePayload::Missile(missile) => missile.power,
        }
    }

    pub fn damage(&self) -> f32 {
        match self {
            DamagePayload::Raw { damage, .. } => *damage,
            DamagePayload::Missile(missile) => missile.damage,
        }
    }
}

/// Event: запрос урона по `target`
#[derive(Event, Debug, Clone)]
pub struct DamageRequest {
    /// Entity с `Killable`
    pub target: Entity,
    /// Конкретный коллайдер, в который попали (None = без попадания, напр. debug kill)
    pub hit_collider: Option<Entity>,
    pub position: Vec3,
    pub direction: Vec3,
    pub payload: DamagePayload,
    /// Для `Raw`; у `Missile` attacker = owner снаряда
    pub attacker: Option<Entity>,
}

impl DamageRequest {
    /// Attacker с учётом владельца снаряда
    pub fn resolved_attacker(&self) -> Option<Entity> {
        match self.payload {
            DamagePayload::Raw { .. } => self.attacker,
            DamagePayload::Missile(missile) => missile.owner,
        }
    }
}

/// Event: урон применён
#[derive(Event, Debug, Clone)]
pub struct Damaged {
    pub target: Entity,
    pub hit_collider: Option<Entity>,
    pub position: Vec3,
    pub direction: Vec3,
    pub power: f32,
    /// Итоговый урон (после multipliers)
    pub amount: f32,
    pub attacker: Option<Entity>,
}

/// Event: killing blow
#[derive(Event, Debug, Clone)]
pub struct Died {
    pub entity: Entity,
    pub attacker: Option<Entity>,
}
