//! Procedural screen shake (distance-attenuated, decaying)
//!
//! Каждые `frequency` секунд семплируем новый random impulse:
//! `amplitude / clamp(d² - min², 1, max²) * remaining/total * unit_sphere`.
//! Между семплами lens offset идёт к impulse через slerp с весом
//! прогресса до следующего семпла. Новый `start` перезаписывает текущий
//! shake (latest wins, без очереди).

use bevy::prelude::*;
use rand::Rng;

use crate::shared::{random_unit_vector, slerp_vec3};

/// Остаток (секунды), ниже которого shake считается завершённым.
/// Покрывает накопленную ошибку f32 при суммировании шагов `delta`.
const SHAKE_EXPIRY_EPSILON: f32 = 1e-4;

/// Shake state (часть `CameraRig`)
///
/// Инвариант: `offset == ZERO`, когда `remaining <= 0`.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct CameraShake {
    origin: Vec3,
    min_distance: f32,
    max_distance: f32,
    total_time: f32,
    remaining: f32,
    amplitude: f32,
    frequency: f32,
    interval: f32,
    target: Vec3,
    offset: Vec3,
}

impl Default for CameraShake {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            min_distance: 0.0,
            max_distance: 0.0,
            total_time: 0.0,
            remaining: 0.0,
            amplitude: 0.0,
            frequency: 0.5,
            interval: 0.0,
            target: Vec3::ZERO,
            offset: Vec3::ZERO,
        }
    }
}

impl CameraShake {
    /// Запускает shake (перезаписывает текущий).
    ///
    /// `listener`: текущая мировая позиция lens, для начальной амплитуды.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        &mut self,
        at: Vec3,
        min_distance: f32,
        max_distance: f32,
        duration: f32,
        amplitude: f32,
        frequency: f32,
        listener: Vec3,
        rng: &mut impl Rng,
    ) {
        self.origin = at;
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self.total_time = duration;
        self.remaining = duration;
        self.amplitude = amplitude;
        self.frequency = frequency;
        self.interval = frequency;
        self.target = self.amplitude_at(listener) * random_unit_vector(rng);
    }

    /// Амплитуда для слушателя в `listener`; 0 за пределами `max_distance`
    pub fn amplitude_at(&self, listener: Vec3) -> f32 {
        let dist_sq = (self.origin - listener).length_squared();
        let max_sq = self.max_distance * self.max_distance;
        if dist_sq >= max_sq {
            return 0.0;
        }

        let min_sq = self.min_distance * self.min_distance;
        // max_sq > dist_sq >= 0; нижняя граница 1 может быть выше max_sq при max < 1
        let attenuation = (dist_sq - min_sq).max(1.0).min(max_sq.max(1.0));
        self.amplitude / attenuation
    }

    /// Tick каждый frame (независимо от camera mode)
    pub fn tick(&mut self, delta: f32, listener: Vec3, rng: &mut impl Rng) {
        if self.remaining > 0.0 {
            let fraction = if self.total_time > 0.0 {
                self.remaining / self.total_time
            } else {
                0.0
            };

            self.remaining -= delta;
            if self.remaining <= SHAKE_EXPIRY_EPSILON {
                self.remaining = 0.0;
            }
            self.interval -= delta;
            if self.interval < 0.0 {
                self.target = self.amplitude_at(listener) * fraction * random_unit_vector(rng);
                self.interval = self.frequency;
            }
        }

        if self.remaining <= 0.0 {
            self.target = Vec3::ZERO;
            self.offset = Vec3::ZERO;
            return;
        }

        let progress = if self.frequency > 0.0 {
            (1.0 - self.interval / self.frequency).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.offset = slerp_vec3(self.offset, self.target, progress);
    }

    /// Текущий local offset lens
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Последний семплированный impulse
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}
