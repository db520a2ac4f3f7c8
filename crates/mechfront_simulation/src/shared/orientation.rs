//! Pitch/yaw helpers (градусы): общая конвенция для camera rig и vehicles
//!
//! Конвенция:
//! - pitch > 0 → смотрим вниз
//! - yaw > 0 → поворот вправо (по часовой стрелке, вид сверху)
//! - forward при (0, 0) = `-Z` (Bevy)
//!
//! Yaw не нормализуется: накопление unbounded, wrap делают sin/cos.

use bevy::prelude::*;
use rand::Rng;

/// Forward direction для заданных pitch/yaw (градусы)
pub fn forward_from_pitch_yaw(pitch: f32, yaw: f32) -> Vec3 {
    let (sp, cp) = pitch.to_radians().sin_cos();
    let (sy, cy) = yaw.to_radians().sin_cos();
    Vec3::new(sy * cp, -sp, -cy * cp)
}

/// Rotation из pitch/yaw, roll = 0 (yaw снаружи, pitch внутри)
pub fn rotation_from_pitch_yaw(pitch: f32, yaw: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, -yaw.to_radians(), -pitch.to_radians(), 0.0)
}

/// Rotation только вокруг вертикали
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(-yaw.to_radians())
}

/// Обратная операция: pitch/yaw (градусы), при которых forward смотрит вдоль `direction`.
///
/// `None` для вырожденного (нулевого) направления.
pub fn pitch_yaw_towards(direction: Vec3) -> Option<(f32, f32)> {
    let dir = direction.try_normalize()?;
    let pitch = (-dir.y).clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = dir.x.atan2(-dir.z).to_degrees();
    Some((pitch, yaw))
}

/// Yaw (градусы) горизонтальной проекции forward для rotation
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::NEG_Z;
    forward.x.atan2(-forward.z).to_degrees()
}

/// Разница углов, приведённая к [-180, 180)
pub fn delta_angle(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Lerp по кратчайшей дуге, t clamp в [0, 1]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + delta_angle(from, to) * t.clamp(0.0, 1.0)
}

/// Clamp где нижняя граница выигрывает, если `min > max`.
///
/// `f32::clamp` паникует на `min > max`: здесь это допустимо
/// (например ground probe выше потолка камеры).
pub fn clamp_min_first(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Spherical interpolation двух векторов (не обязательно unit).
///
/// Направление вращается по дуге, длина интерполируется линейно.
/// Если один из векторов нулевой: обычный lerp.
pub fn slerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let (Some(from_dir), Some(to_dir)) = (from.try_normalize(), to.try_normalize()) else {
        return from.lerp(to, t);
    };

    let arc = Quat::IDENTITY.slerp(Quat::from_rotation_arc(from_dir, to_dir), t);
    let length = from.length() + (to.length() - from.length()) * t;
    arc * from_dir * length
}

/// Случайный unit вектор, равномерно по сфере
pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_forward_matches_rotation() {
        for (pitch, yaw) in [(0.0, 0.0), (30.0, 45.0), (-60.0, 200.0), (89.0, -720.0)] {
            let from_rotation = rotation_from_pitch_yaw(pitch, yaw) * Vec3::NEG_Z;
            assert!(
                approx(from_rotation, forward_from_pitch_yaw(pitch, yaw)),
                "pitch={} yaw={}",
                pitch,
                yaw
            );
        }
    }

    #[test]
    fn test_positive_yaw_turns_right_positive_pitch_looks_down() {
        assert!(approx(forward_from_pitch_yaw(0.0, 90.0), Vec3::X));
        assert!(approx(forward_from_pitch_yaw(90.0, 0.0), Vec3::NEG_Y));
    }

    #[test]
    fn test_pitch_yaw_towards_inverts_forward() {
        let (pitch, yaw) = pitch_yaw_towards(Vec3::new(1.0, -1.0, -1.0)).unwrap();
        let forward = forward_from_pitch_yaw(pitch, yaw);
        assert!(approx(forward, Vec3::new(1.0, -1.0, -1.0).normalize()));
        assert!(pitch_yaw_towards(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_lerp_angle_takes_short_arc() {
        assert!((lerp_angle(170.0, -170.0, 0.5) - 180.0).abs() < 1e-4);
        assert!((lerp_angle(10.0, 30.0, 2.0) - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_min_first_prefers_min() {
        assert_eq!(clamp_min_first(5.0, 120.0, 100.0), 120.0);
        assert_eq!(clamp_min_first(150.0, 0.5, 100.0), 100.0);
        assert_eq!(clamp_min_first(3.0, 0.5, 100.0), 3.0);
    }

    #[test]
    fn test_slerp_vec3_endpoints_and_length() {
        let a = Vec3::X * 2.0;
        let b = Vec3::Y * 4.0;
        assert!(approx(slerp_vec3(a, b, 0.0), a));
        assert!(approx(slerp_vec3(a, b, 1.0), b));
        assert!((slerp_vec3(a, b, 0.5).length() - 3.0).abs() < 1e-4);
        assert!(approx(slerp_vec3(a, Vec3::ZERO, 1.0), Vec3::ZERO));
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-4);
        }
    }
}
