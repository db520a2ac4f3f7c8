//! Vehicle gun: trigger / reload state machine
//!
//! Architecture:
//! - ECS владеет clip, cooldown, reload timer (game state)
//! - Полёт снаряда: внешний host: ECS только эмитит `ShotFired`
//! - Refill после reload делает владелец (vehicle) по `ReloadFinished`
//!
//! Инварианты: clip никогда не < 0 (u32 + guard), reload стартует только
//! из пустого clip.

use bevy::prelude::*;

use super::damage::Missile;
use super::weapon_stats::GunBlueprint;

/// Ссылка weapon → vehicle-владелец
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct WeaponOwner(pub Entity);

/// Event: выстрел (ECS → projectile host)
#[derive(Event, Debug, Clone)]
pub struct ShotFired {
    pub weapon: Entity,
    pub owner: Option<Entity>,
    /// Мировая позиция shoot point
    pub origin: Vec3,
    /// Куда целились
    pub target: Vec3,
    pub missile: Missile,
    pub missile_radius: f32,
}

/// Event: reload завершён (clip ещё не пополнен: это делает владелец)
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadFinished {
    pub weapon: Entity,
}

/// Выстрел, ожидающий публикации системой (shoot point index + aim)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PendingShot {
    pub shoot_point: usize,
    pub target: Vec3,
}

/// Gun component
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct VehicleGun {
    /// Размер магазина
    pub capacity: u32,
    /// Пауза между выстрелами (секунды)
    pub fire_interval: f32,
    /// Длительность reload (секунды)
    pub reload_time: f32,
    /// Zoom factor в aim mode
    pub zoom: f32,
    /// Дальность aim sphere cast
    pub max_aim_distance: f32,
    pub missile_radius: f32,
    pub missile_damage: f32,
    pub missile_power: f32,
    /// Shoot points в local space оружия
    pub shoot_points: Vec<Vec3>,
    /// Crosshair id для HUD
    pub crosshair: String,

    clip_remaining: u32,
    trigger_held: bool,
    aim_at: Vec3,
    cooldown: f32,
    reloading: bool,
    reload_timer: f32,
    next_shoot_point: usize,
    pending: Vec<PendingShot>,
}

impl VehicleGun {
    /// Новый gun из blueprint; clip пустой до `set_clip_remaining`
    pub fn from_blueprint(blueprint: &GunBlueprint, shoot_points: Vec<Vec3>) -> Self {
        Self {
            capacity: blueprint.capacity,
            fire_interval: blueprint.fire_interval,
            reload_time: blueprint.reload_time,
            zoom: blueprint.zoom,
            max_aim_distance: blueprint.max_aim_distance,
            missile_radius: blueprint.missile_radius,
            missile_damage: blueprint.missile_damage,
            missile_power: blueprint.missile_power,
            shoot_points,
            crosshair: blueprint.crosshair.clone(),
            clip_remaining: 0,
            trigger_held: false,
            aim_at: Vec3::ZERO,
            cooldown: 0.0,
            reloading: false,
            reload_timer: 0.0,
            next_shoot_point: 0,
            pending: Vec::new(),
        }
    }

    // ========================================================================
    // Trigger
    // ========================================================================

    /// Зажимает спуск. Если оружие готово: выстрел сразу (clip уменьшается
    /// в этом же вызове). `delay` откладывает первый выстрел.
    pub fn trigger_shoot(&mut self, aim_at: Vec3, delay: f32) {
        if !self.trigger_held {
            self.cooldown = self.cooldown.max(delay);
        }
        self.trigger_held = true;
        self.aim_at = aim_at;
        self.try_fire();
    }

    pub fn release_trigger_shoot(&mut self) {
        self.trigger_held = false;
    }

    pub fn is_trigger_held(&self) -> bool {
        self.trigger_held
    }

    fn try_fire(&mut self) -> bool {
        if self.reloading || self.clip_remaining == 0 || self.cooldown > 0.0 {
            return false;
        }

        self.clip_remaining -= 1;
        self.cooldown = self.fire_interval;

        let shoot_point = self.next_shoot_point;
        if !self.shoot_points.is_empty() {
            self.next_shoot_point = (self.next_shoot_point + 1) % self.shoot_points.len();
        }
        self.pending.push(PendingShot {
            shoot_point,
            target: self.aim_at,
        });
        true
    }

    // ========================================================================
    // Clip / reload
    // ========================================================================

    pub fn clip_remaining(&self) -> u32 {
        self.clip_remaining
    }

    /// Clamp в `0..=capacity`
    pub fn set_clip_remaining(&mut self, amount: u32) {
        self.clip_remaining = amount.min(self.capacity);
    }

    /// Старт reload. Только из пустого clip и не во время reload.
    ///
    /// `amount`: сколько патронов ожидает владелец; сам refill
    /// делает владелец по `ReloadFinished`.
    pub fn trigger_reload(&mut self, amount: u32) -> bool {
        if self.clip_remaining != 0 || self.reloading || amount == 0 {
            return false;
        }
        self.reloading = true;
        self.reload_timer = self.reload_time;
        true
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Tick таймеров. Возвращает `true`, если reload закончился в этом tick.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.cooldown = (self.cooldown - delta).max(0.0);

        let mut reload_finished = false;
        if self.reloading {
            self.reload_timer -= delta;
            if self.reload_timer <= 0.0 {
                self.reloading = false;
                self.reload_timer = 0.0;
                reload_finished = true;
            }
        }

        if self.trigger_held {
            self.try_fire();
        }

        reload_finished
    }

    /// Забирает накопленные выстрелы
    pub fn drain_shots(&mut self) -> Vec<PendingShot> {
        std::mem::take(&mut self.pending)
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Мировая позиция shoot point
    pub fn shoot_point_world(&self, index: usize, global: &GlobalTransform) -> Vec3 {
        self.shoot_points
            .get(index)
            .map(|local| global.transform_point(*local))
            .unwrap_or(global.translation())
    }

    /// Центр всех shoot points (origin aim sphere cast)
    pub fn shoot_points_centre(&self, global: &GlobalTransform) -> Vec3 {
        if self.shoot_points.is_empty() {
            return global.translation();
        }
        let sum: Vec3 = self
            .shoot_points
            .iter()
            .map(|local| global.transform_point(*local))
            .sum();
        sum / self.shoot_points.len() as f32
    }

    pub fn missile(&self, owner: Option<Entity>) -> Missile {
        Missile {
            power: self.missile_power,
            damage: self.missile_damage,
            owner,
        }
    }
}
