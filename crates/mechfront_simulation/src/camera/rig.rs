//! Third-person camera rig
//!
//! Один rig на сессию. Следует за pivot entity (weak: despawned pivot →
//! поза замораживается), крутится вокруг него по pitch/yaw на `distance`.
//!
//! # Modes
//! - **Chase**: distance → target distance, ground probe не даёт уйти под землю
//! - **Aim**: distance → 0 (first-person-like), без ground probe
//!
//! # Reorientation
//! При смене pivot rig сохраняет точку, на которую смотрел центр экрана,
//! и подбирает pitch/yaw так, чтобы с новой позиции смотреть туда же
//! (нет рывка при входе/выходе из aim).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::{CollisionWorld, MASK_IGNORE_PLAYER_VIEW};
use crate::shared::{clamp_min_first, forward_from_pitch_yaw, pitch_yaw_towards, rotation_from_pitch_yaw};

use super::shake::CameraShake;

/// Нижняя граница zoom (gun blueprint может прийти с 0)
pub const MIN_ZOOM: f32 = 0.01;

/// Алгоритм разрешения позы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CameraMode {
    /// Over-the-shoulder follow
    #[default]
    Chase,
    /// Zero-distance aim
    Aim,
}

/// Настройки rig (resource: override для камеры сессии)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Скорость догоняния distance (1/s)
    pub catchup_speed: f32,
    /// Дальность viewport-center луча
    pub look_range: f32,
    /// Дальность ground probe вниз
    pub ground_probe_range: f32,
    /// Минимальный зазор над землёй
    pub ground_clearance: f32,
    /// Потолок высоты камеры
    pub ceiling: f32,
    /// Layers, игнорируемые view/ground лучами
    pub view_exclude_mask: u32,
    /// Стартовая target distance
    pub initial_distance: f32,
    /// Стартовый offset pivot
    pub initial_offset: Vec3,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            catchup_speed: 15.0,
            look_range: 1000.0,
            ground_probe_range: 100.0,
            ground_clearance: 0.5,
            ceiling: 100.0,
            view_exclude_mask: MASK_IGNORE_PLAYER_VIEW,
            initial_distance: 5.0,
            initial_offset: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

/// Camera rig state
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub config: RigConfig,
    pivot: Option<Entity>,
    offset: Vec3,
    pivot_position: Vec3,
    distance: f32,
    target_distance: f32,
    pitch: f32,
    yaw: f32,
    mode: CameraMode,
    zoom: f32,
    position: Vec3,
    rotation: Quat,
    shake: CameraShake,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(RigConfig::default())
    }
}

impl CameraRig {
    pub fn new(config: RigConfig) -> Self {
        let distance = config.initial_distance.max(0.0);
        Self {
            config,
            pivot: None,
            offset: config.initial_offset,
            pivot_position: Vec3::ZERO,
            distance,
            target_distance: distance,
            pitch: 0.0,
            yaw: 0.0,
            mode: CameraMode::Chase,
            zoom: 1.0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            shake: CameraShake::default(),
        }
    }

    // ------------------------------------------------------------------
    // Orientation
    // ------------------------------------------------------------------

    /// pitch -= delta_pitch, yaw += delta_yaw (без clamp)
    pub fn add_pitch_yaw(&mut self, delta_pitch: f32, delta_yaw: f32) {
        self.pitch -= delta_pitch;
        self.yaw += delta_yaw;
    }

    pub fn pitch_yaw(&self) -> (f32, f32) {
        (self.pitch, self.yaw)
    }

    pub fn set_pitch_yaw(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Forward по текущим pitch/yaw (не по последней позе)
    pub fn forward(&self) -> Vec3 {
        forward_from_pitch_yaw(self.pitch, self.yaw)
    }

    // ------------------------------------------------------------------
    // Mode / zoom
    // ------------------------------------------------------------------

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    /// Zoom factor (делит look input)
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Zoom делит look input: держим его конечным и > 0
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() { zoom.max(MIN_ZOOM) } else { 1.0 };
    }

    // ------------------------------------------------------------------
    // Pivot
    // ------------------------------------------------------------------

    pub fn pivot(&self) -> Option<Entity> {
        self.pivot
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    /// Перепривязка pivot.
    ///
    /// Offset/distance обновляются всегда. Если target другой: reorientation:
    /// look-at точка центра экрана сохраняется, pitch/yaw пересчитываются
    /// с позиции, которую rig займёт у нового pivot при текущих углах.
    ///
    /// Возвращает `true`, если была reorientation.
    pub fn set_pivot(
        &mut self,
        target: Entity,
        target_position: Vec3,
        offset: Vec3,
        distance: f32,
        world: &dyn CollisionWorld,
    ) -> bool {
        self.offset = offset;
        self.target_distance = distance.max(0.0);

        if self.pivot == Some(target) {
            return false;
        }

        let look_at = self.look_at_position(world);
        let from = target_position + self.offset - self.forward() * self.distance;
        if let Some((pitch, yaw)) = pitch_yaw_towards(look_at - from) {
            self.pitch = pitch;
            self.yaw = yaw;
        }

        self.pivot = Some(target);
        true
    }

    /// Перепривязка без reorientation (например фокус на corpse)
    pub fn bind_pivot(&mut self, target: Entity, offset: Vec3, distance: f32) {
        self.pivot = Some(target);
        self.offset = offset;
        self.target_distance = distance.max(0.0);
    }

    // ------------------------------------------------------------------
    // Pose
    // ------------------------------------------------------------------

    /// Позиция rig (без shake)
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Мировая позиция lens (rig + shake offset в local space)
    pub fn lens_position(&self) -> Vec3 {
        self.position + self.rotation * self.shake.offset()
    }

    /// Transform камеры для renderer
    pub fn lens_transform(&self) -> Transform {
        Transform::from_translation(self.lens_position()).with_rotation(self.rotation)
    }

    /// Точка, куда смотрит центр экрана (hit или конец луча)
    pub fn look_at_position(&self, world: &dyn CollisionWorld) -> Vec3 {
        let origin = self.lens_position();
        let direction = self.rotation * Vec3::NEG_Z;

        world
            .raycast(origin, direction, self.config.look_range, self.config.view_exclude_mask)
            .map(|hit| hit.point)
            .unwrap_or(origin + direction * self.config.look_range)
    }

    /// Late-phase update.
    ///
    /// `pivot_position`: мировая позиция привязанного pivot; `None`, если
    /// pivot не привязан или уже despawned → поза не меняется.
    pub fn update(&mut self, delta: f32, pivot_position: Option<Vec3>, world: &dyn CollisionWorld) {
        let (Some(_), Some(pivot_position)) = (self.pivot, pivot_position) else {
            return;
        };
        self.pivot_position = pivot_position + self.offset;

        let t = (self.config.catchup_speed * delta).clamp(0.0, 1.0);
        let forward = self.forward();

        match self.mode {
            CameraMode::Chase => {
                self.distance += (self.target_distance - self.distance) * t;
                let chase = self.pivot_position - forward * self.distance;

                let mut min_y = self.config.ground_clearance;
                if let Some(ground) = world.raycast(
                    chase,
                    Vec3::NEG_Y,
                    self.config.ground_probe_range,
                    self.config.view_exclude_mask,
                ) {
                    min_y = ground.point.y + self.config.ground_clearance;
                }

                self.position = Vec3::new(
                    chase.x,
                    clamp_min_first(chase.y, min_y, self.config.ceiling),
                    chase.z,
                );
            }
            CameraMode::Aim => {
                self.distance += (0.0 - self.distance) * t;
                self.position = self.pivot_position - forward * self.distance;
            }
        }

        self.distance = self.distance.max(0.0);
        self.rotation = rotation_from_pitch_yaw(self.pitch, self.yaw);
    }

    // ------------------------------------------------------------------
    // Shake
    // ------------------------------------------------------------------

    pub fn shake_state(&self) -> &CameraShake {
        &self.shake
    }

    /// Запускает shake (latest wins)
    #[allow(clippy::too_many_arguments)]
    pub fn shake(
        &mut self,
        at: Vec3,
        min_distance: f32,
        max_distance: f32,
        duration: f32,
        amplitude: f32,
        frequency: f32,
        rng: &mut impl rand::Rng,
    ) {
        let listener = self.lens_position();
        self.shake
            .start(at, min_distance, max_distance, duration, amplitude, frequency, listener, rng);
    }

    /// Tick shake (каждый frame, не зависит от mode)
    pub fn tick_shake(&mut self, delta: f32, rng: &mut impl rand::Rng) {
        let listener = self.lens_position();
        self.shake.tick(delta, listener, rng);
    }
}
