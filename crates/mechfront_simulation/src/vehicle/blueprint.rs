//! Vehicle / corpse blueprints (static data)
//!
//! Blueprint = immutable описание: скелет, коллайдеры, pivots, corpse,
//! оружие по умолчанию. Presets `soldier()` / `walker()` или JSON через
//! `from_json_str` (serde). Glam типы сериализуются через bevy `serialize`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use serde::{Deserialize, Serialize};

use crate::combat::GunBlueprint;

// ============================================================================
// Shapes
// ============================================================================

/// Форма коллайдера части (rapier primitive)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    CapsuleY { half_height: f32, radius: f32 },
}

impl PartShape {
    pub fn to_collider(&self) -> Collider {
        match *self {
            PartShape::Ball { radius } => Collider::ball(radius),
            PartShape::Cuboid { half_extents } => Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            PartShape::CapsuleY { half_height, radius } => Collider::capsule_y(half_height, radius),
        }
    }
}

// ============================================================================
// Skeleton
// ============================================================================

/// Кость live скелета (прямой потомок skeleton root)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneBlueprint {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub collider: Option<PartShape>,
    /// Попадание сюда ×10 (голова soldier)
    pub critical: bool,
}

impl Default for BoneBlueprint {
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            collider: None,
            critical: false,
        }
    }
}

impl BoneBlueprint {
    fn part(name: &str, translation: Vec3, collider: PartShape) -> Self {
        Self {
            name: name.into(),
            translation,
            collider: Some(collider),
            ..default()
        }
    }
}

/// Часть ragdoll
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpsePartBlueprint {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: Option<PartShape>,
}

impl Default for CorpsePartBlueprint {
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            shape: None,
        }
    }
}

impl CorpsePartBlueprint {
    fn part(name: &str, translation: Vec3, shape: PartShape) -> Self {
        Self {
            name: name.into(),
            translation,
            shape: Some(shape),
            ..default()
        }
    }

    /// Rest pose (local относительно dead root)
    pub fn rest_transform(&self) -> Transform {
        Transform::from_translation(self.translation).with_rotation(self.rotation)
    }
}

/// Corpse (ragdoll), который заменяет vehicle после смерти
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpseBlueprint {
    pub name: String,
    /// Dead root: части: его прямые потомки
    pub skeleton_root: String,
    pub parts: Vec<CorpsePartBlueprint>,
    /// Точка фокуса камеры (только у walker corpse)
    pub focal_point: Option<Vec3>,
}

impl Default for CorpseBlueprint {
    fn default() -> Self {
        Self {
            name: "Corpse".into(),
            skeleton_root: "Ragdoll".into(),
            parts: Vec::new(),
            focal_point: None,
        }
    }
}

// ============================================================================
// Sounds
// ============================================================================

/// Клипы vehicle (id для audio host)
#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSoundSet {
    pub left_steps: Vec<String>,
    pub right_steps: Vec<String>,
    pub hurt_cries: Vec<String>,
    /// Единственный клип шага (walker)
    pub step: Option<String>,
}

// ============================================================================
// Vehicle
// ============================================================================

/// Вариант locomotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionKind {
    #[default]
    Soldier,
    Walker,
}

/// Static vehicle definition
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleBlueprint {
    pub name: String,
    pub kind: LocomotionKind,
    pub max_health: f32,
    pub forward_speed: f32,
    pub strafe_speed: f32,

    // === Camera ===
    pub camera_distance: f32,
    pub camera_offset: Vec3,
    /// Local позиция default (chase) pivot
    pub default_pivot: Vec3,
    /// Local позиция zoom (aim) pivot
    pub zoom_pivot: Vec3,

    // === Skeleton ===
    /// Live root: кости: его прямые потомки
    pub skeleton_root: String,
    pub bones: Vec<BoneBlueprint>,
    /// Кость, которая доворачивается к yaw target (walker)
    pub head_bone: Option<String>,

    // === Weapon ===
    /// Shoot points primary weapon (local space vehicle)
    pub shoot_points: Vec<Vec3>,
    pub weapon: GunBlueprint,

    pub corpse: CorpseBlueprint,
    pub sounds: VehicleSoundSet,
}

impl Default for VehicleBlueprint {
    fn default() -> Self {
        Self::soldier()
    }
}

impl VehicleBlueprint {
    /// Пехотинец: быстрый, уязвимая голова
    pub fn soldier() -> Self {
        Self {
            name: "Soldier".into(),
            kind: LocomotionKind::Soldier,
            max_health: 100.0,
            forward_speed: 5.0,
            strafe_speed: 5.0,
            camera_distance: 5.0,
            camera_offset: Vec3::new(0.0, 2.0, 0.0),
            default_pivot: Vec3::ZERO,
            zoom_pivot: Vec3::new(0.3, 1.7, 0.0),
            skeleton_root: "Skeleton".into(),
            bones: vec![
                BoneBlueprint::part(
                    "Hips",
                    Vec3::new(0.0, 0.9, 0.0),
                    PartShape::CapsuleY {
                        half_height: 0.3,
                        radius: 0.25,
                    },
                ),
                BoneBlueprint::part(
                    "Chest",
                    Vec3::new(0.0, 1.35, 0.0),
                    PartShape::Cuboid {
                        half_extents: Vec3::new(0.25, 0.2, 0.15),
                    },
                ),
                BoneBlueprint {
                    critical: true,
                    ..BoneBlueprint::part("Head", Vec3::new(0.0, 1.7, 0.0), PartShape::Ball { radius: 0.15 })
                },
            ],
            head_bone: None,
            shoot_points: vec![Vec3::new(0.3, 1.4, -0.6)],
            weapon: GunBlueprint::assault_rifle(),
            corpse: CorpseBlueprint {
                name: "SoldierCorpse".into(),
                skeleton_root: "Ragdoll".into(),
                parts: vec![
                    CorpsePartBlueprint::part(
                        "Hips",
                        Vec3::new(0.0, 0.9, 0.0),
                        PartShape::CapsuleY {
                            half_height: 0.3,
                            radius: 0.25,
                        },
                    ),
                    CorpsePartBlueprint::part(
                        "Chest",
                        Vec3::new(0.0, 1.35, 0.0),
                        PartShape::Cuboid {
                            half_extents: Vec3::new(0.25, 0.2, 0.15),
                        },
                    ),
                    CorpsePartBlueprint::part("Head", Vec3::new(0.0, 1.7, 0.0), PartShape::Ball { radius: 0.15 }),
                ],
                focal_point: None,
            },
            sounds: VehicleSoundSet {
                left_steps: vec!["step_left_01".into(), "step_left_02".into()],
                right_steps: vec!["step_right_01".into(), "step_right_02".into()],
                hurt_cries: vec!["hurt_01".into(), "hurt_02".into(), "hurt_03".into()],
                step: None,
            },
        }
    }

    /// Шагающий мех: медленный, камера далеко, голова крутится отдельно от корпуса
    pub fn walker() -> Self {
        let leg = PartShape::CapsuleY {
            half_height: 1.0,
            radius: 0.4,
        };
        let pelvis = PartShape::Cuboid {
            half_extents: Vec3::new(1.2, 0.6, 1.0),
        };
        let head = PartShape::Cuboid {
            half_extents: Vec3::new(1.5, 0.8, 1.8),
        };

        Self {
            name: "Walker".into(),
            kind: LocomotionKind::Walker,
            max_health: 1000.0,
            forward_speed: 3.0,
            strafe_speed: 2.0,
            camera_distance: 14.0,
            camera_offset: Vec3::new(0.0, 6.0, 0.0),
            default_pivot: Vec3::ZERO,
            zoom_pivot: Vec3::new(0.0, 5.5, -1.0),
            skeleton_root: "Ground".into(),
            bones: vec![
                BoneBlueprint::part("LegL", Vec3::new(-1.0, 1.5, 0.0), leg),
                BoneBlueprint::part("LegR", Vec3::new(1.0, 1.5, 0.0), leg),
                BoneBlueprint::part("Pelvis", Vec3::new(0.0, 3.0, 0.0), pelvis),
                BoneBlueprint::part("Head", Vec3::new(0.0, 4.5, 0.0), head),
            ],
            head_bone: Some("Head".into()),
            shoot_points: vec![Vec3::new(-1.2, 4.5, -1.8), Vec3::new(1.2, 4.5, -1.8)],
            weapon: GunBlueprint::walker_cannon(),
            corpse: CorpseBlueprint {
                name: "WalkerCorpse".into(),
                skeleton_root: "Walker".into(),
                parts: vec![
                    CorpsePartBlueprint::part("LegL", Vec3::new(-1.0, 1.5, 0.0), leg),
                    CorpsePartBlueprint::part("LegR", Vec3::new(1.0, 1.5, 0.0), leg),
                    CorpsePartBlueprint::part("Pelvis", Vec3::new(0.0, 3.0, 0.0), pelvis),
                    CorpsePartBlueprint::part("Head", Vec3::new(0.0, 4.5, 0.0), head),
                ],
                focal_point: Some(Vec3::new(0.0, 3.0, 0.0)),
            },
            sounds: VehicleSoundSet {
                step: Some("walker_stomp".into()),
                ..default()
            },
        }
    }

    /// Загрузка из JSON (единственный fallible API)
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
