//! Gun blueprints (static weapon data)
//!
//! Immutable данные для создания `VehicleGun`. Hardcoded presets или JSON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Static gun definition
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct GunBlueprint {
    pub name: String,
    /// Размер магазина
    pub capacity: u32,
    /// Clip при спавне (полный магазин)
    pub initial_clip: u32,
    /// Секунды между выстрелами
    pub fire_interval: f32,
    /// Секунды reload
    pub reload_time: f32,
    /// Zoom factor в aim mode (делит look input)
    pub zoom: f32,
    /// Дальность aim проверки "target in sight"
    pub max_aim_distance: f32,
    pub missile_radius: f32,
    pub missile_damage: f32,
    pub missile_power: f32,
    pub crosshair: String,
}

impl Default for GunBlueprint {
    fn default() -> Self {
        Self::assault_rifle()
    }
}

impl GunBlueprint {
    /// Soldier primary
    pub fn assault_rifle() -> Self {
        Self {
            name: "assault_rifle".into(),
            capacity: 100,
            initial_clip: 100,
            fire_interval: 0.1,
            reload_time: 2.0,
            zoom: 2.0,
            max_aim_distance: 500.0,
            missile_radius: 0.1,
            missile_damage: 10.0,
            missile_power: 5.0,
            crosshair: "crosshair_rifle".into(),
        }
    }

    /// Walker primary: медленный, тяжёлый снаряд
    pub fn walker_cannon() -> Self {
        Self {
            name: "walker_cannon".into(),
            capacity: 100,
            initial_clip: 100,
            fire_interval: 0.5,
            reload_time: 4.0,
            zoom: 3.0,
            max_aim_distance: 1000.0,
            missile_radius: 0.5,
            missile_damage: 80.0,
            missile_power: 2000.0,
            crosshair: "crosshair_cannon".into(),
        }
    }
}
