//! Collision queries (black-box сервис для camera/aim/death)
//!
//! Core логика принимает `&dyn CollisionWorld` и не знает о backend.
//! ECS backend: `SceneQuery`: перебирает rapier `Collider` + `GlobalTransform`,
//! пропуская `ColliderDisabled` и исключённые layers.
//!
//! Ray: `Collider::cast_ray_and_get_normal` (rapier shapes).
//! Sphere cast: точный shape cast parry (`cast_shapes`, `Ball` против `Collider::raw`).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::geometry::ShapeCastHit;
use bevy_rapier3d::parry::math::{Isometry, Real, Vector};
use bevy_rapier3d::parry::query::{cast_shapes, ShapeCastOptions};
use bevy_rapier3d::parry::shape::Ball;
use bevy_rapier3d::prelude::{Collider, ColliderDisabled};

use super::layers::CollisionLayer;

/// Результат raycast / sphere cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Точка попадания (для sphere cast: точка на поверхности коллайдера)
    pub point: Vec3,
    /// Нормаль поверхности
    pub normal: Vec3,
    /// Дистанция вдоль луча (для sphere cast: путь центра сферы)
    pub distance: f32,
    /// Entity коллайдера
    pub collider: Entity,
}

/// Collision-query сервис
///
/// `exclude_mask`: layers, которые игнорируются (см. `physics::layers`).
/// Direction нормализуется внутри; нулевое направление → `None`.
pub trait CollisionWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude_mask: u32,
    ) -> Option<RayHit>;

    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
        exclude_mask: u32,
    ) -> Option<RayHit>;
}

/// Пустой мир: ничего не пересекается
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyWorld;

impl CollisionWorld for EmptyWorld {
    fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: u32) -> Option<RayHit> {
        None
    }

    fn sphere_cast(&self, _: Vec3, _: Vec3, _: f32, _: f32, _: u32) -> Option<RayHit> {
        None
    }
}

/// ECS backend collision queries
#[derive(SystemParam)]
pub struct SceneQuery<'w, 's> {
    colliders: Query<
        'w,
        's,
        (
            Entity,
            &'static Collider,
            &'static GlobalTransform,
            Option<&'static CollisionLayer>,
        ),
        Without<ColliderDisabled>,
    >,
}

impl SceneQuery<'_, '_> {
    fn candidates(
        &self,
        exclude_mask: u32,
    ) -> impl Iterator<Item = (Entity, &Collider, Vec3, Quat)> + '_ {
        self.colliders
            .iter()
            .filter(move |(_, _, _, layer)| {
                !layer.copied().unwrap_or_default().is_excluded_by(exclude_mask)
            })
            .map(|(entity, collider, global, _)| {
                let (_, rotation, translation) = global.to_scale_rotation_translation();
                (entity, collider, translation, rotation)
            })
    }
}

impl CollisionWorld for SceneQuery<'_, '_> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude_mask: u32,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let mut nearest: Option<RayHit> = None;

        for (entity, collider, translation, rotation) in self.candidates(exclude_mask) {
            let Some(hit) =
                collider.cast_ray_and_get_normal(translation, rotation, origin, dir, max_distance, true)
            else {
                continue;
            };

            let distance = (hit.point - origin).length();
            if nearest.is_none_or(|best| distance < best.distance) {
                nearest = Some(RayHit {
                    point: hit.point,
                    normal: hit.normal,
                    distance,
                    collider: entity,
                });
            }
        }

        nearest
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
        exclude_mask: u32,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let mut nearest: Option<RayHit> = None;

        for (entity, collider, translation, rotation) in self.candidates(exclude_mask) {
            let Some(hit) = cast_sphere(collider, translation, rotation, origin, dir, radius, max_distance) else {
                continue;
            };

            if nearest.is_none_or(|best| hit.distance < best.distance) {
                nearest = Some(RayHit {
                    collider: entity,
                    ..hit
                });
            }
        }

        nearest
    }
}

/// Sphere cast против одного коллайдера (`dir` нормализован).
///
/// Сфера, уже пересекающая коллайдер в `origin`, даёт hit с `distance = 0`.
/// Возвращает hit с `collider = Entity::PLACEHOLDER` (заполняет caller).
pub fn cast_sphere(
    collider: &Collider,
    translation: Vec3,
    rotation: Quat,
    origin: Vec3,
    dir: Vec3,
    radius: f32,
    max_distance: f32,
) -> Option<RayHit> {
    let ball = Ball::new(radius);
    let ball_pos: Isometry<Real> = origin.into();
    let shape_pos: Isometry<Real> = (translation, rotation).into();

    let mut options = ShapeCastOptions::with_max_time_of_impact(max_distance);
    options.compute_impact_geometry_on_penetration = true;

    let hit = cast_shapes(
        &ball_pos,
        &Vector::from(dir),
        &ball,
        &shape_pos,
        &Vector::zeros(),
        &*collider.raw,
        options,
    )
    .ok()??;

    // Failed → details = None
    let hit = ShapeCastHit::from_rapier(hit, true);
    let details = hit.details?;
    Some(RayHit {
        point: translation + rotation * details.witness2,
        normal: (rotation * details.normal2).try_normalize().unwrap_or(-dir),
        distance: hit.time_of_impact,
        collider: Entity::PLACEHOLDER,
    })
}

#[cfg(test)]
pub(crate) mod doubles {
    //! Аналитические миры для unit тестов (без ECS)

    use super::*;

    /// Бесконечная горизонтальная плоскость + опциональные сферы
    #[derive(Debug, Clone, Default)]
    pub struct PlaneWorld {
        pub ground: Option<(f32, Entity)>,
        pub spheres: Vec<(Vec3, f32, Entity, u32)>,
    }

    impl PlaneWorld {
        pub fn ground_at(height: f32) -> Self {
            Self {
                ground: Some((height, Entity::from_raw(900))),
                spheres: Vec::new(),
            }
        }

        pub fn with_sphere(mut self, centre: Vec3, radius: f32, entity: Entity, layer: u32) -> Self {
            self.spheres.push((centre, radius, entity, layer));
            self
        }
    }

    fn ray_sphere(origin: Vec3, dir: Vec3, centre: Vec3, radius: f32) -> Option<f32> {
        let oc = origin - centre;
        let b = oc.dot(dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        if t >= 0.0 {
            Some(t)
        } else if c <= 0.0 {
            Some(0.0)
        } else {
            None
        }
    }

    impl CollisionWorld for PlaneWorld {
        fn raycast(&self, origin: Vec3, direction: Vec3, max: f32, exclude: u32) -> Option<RayHit> {
            self.sphere_cast(origin, direction, 0.0, max, exclude)
        }

        fn sphere_cast(
            &self,
            origin: Vec3,
            direction: Vec3,
            radius: f32,
            max: f32,
            exclude: u32,
        ) -> Option<RayHit> {
            let dir = direction.try_normalize()?;
            let mut best: Option<RayHit> = None;

            if let Some((height, entity)) = self.ground {
                if dir.y < 0.0 {
                    let t = (origin.y - radius - height) / -dir.y;
                    if (0.0..=max).contains(&t) {
                        let centre = origin + dir * t;
                        best = Some(RayHit {
                            point: Vec3::new(centre.x, height, centre.z),
                            normal: Vec3::Y,
                            distance: t,
                            collider: entity,
                        });
                    }
                }
            }

            for &(centre, r, entity, layer) in &self.spheres {
                if layer & exclude != 0 {
                    continue;
                }
                let Some(t) = ray_sphere(origin, dir, centre, r + radius) else {
                    continue;
                };
                if t > max || best.is_some_and(|b| b.distance <= t) {
                    continue;
                }
                let normal = (origin + dir * t - centre).normalize_or_zero();
                best = Some(RayHit {
                    point: centre + normal * r,
                    normal,
                    distance: t,
                    collider: entity,
                });
            }

            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::doubles::PlaneWorld;
    use super::*;

    #[test]
    fn test_cast_sphere_against_ball() {
        let collider = Collider::ball(0.5);
        let centre = Vec3::new(0.0, 0.0, -10.0);
        let hit = cast_sphere(&collider, centre, Quat::IDENTITY, Vec3::ZERO, Vec3::NEG_Z, 0.5, 100.0).unwrap();

        assert!((hit.distance - 9.0).abs() < 1e-3, "distance = {}", hit.distance);
        assert!((hit.point - Vec3::new(0.0, 0.0, -9.5)).length() < 1e-3, "point = {}", hit.point);
        assert!((hit.normal - Vec3::Z).length() < 1e-3, "normal = {}", hit.normal);
    }

    #[test]
    fn test_cast_sphere_misses_beyond_max_distance() {
        let collider = Collider::ball(0.5);
        let centre = Vec3::new(0.0, 0.0, -10.0);
        assert!(cast_sphere(&collider, centre, Quat::IDENTITY, Vec3::ZERO, Vec3::NEG_Z, 0.5, 5.0).is_none());
    }

    #[test]
    fn test_cast_sphere_side_pass_by() {
        // Луч проходит в 2m от центра, суммарный радиус 1 → промах
        let collider = Collider::ball(0.5);
        let centre = Vec3::new(2.0, 0.0, -10.0);
        assert!(cast_sphere(&collider, centre, Quat::IDENTITY, Vec3::ZERO, Vec3::NEG_Z, 0.5, 20.0).is_none());
    }

    #[test]
    fn test_cast_sphere_grazing_ground_hit() {
        // Пологий луч (5% вниз) над полупространством y <= 0
        let ground = Collider::halfspace(Vec3::Y).unwrap();
        let dir = Vec3::new(1.0, -0.05, 0.0).normalize();
        let origin = Vec3::new(0.0, 2.0, 0.0);

        let hit = cast_sphere(&ground, Vec3::ZERO, Quat::IDENTITY, origin, dir, 0.25, 100.0).unwrap();

        // Центр сферы опускается на 1.75m: t = 1.75 / sin(угла)
        let expected = 1.75 / -dir.y;
        assert!((hit.distance - expected).abs() < 1e-2, "distance = {}, expected {}", hit.distance, expected);
        assert!(hit.point.y.abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_plane_world_respects_exclusion() {
        let target = Entity::from_raw(5);
        let world = PlaneWorld::default().with_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, target, 0b10);

        assert!(world.raycast(Vec3::ZERO, Vec3::NEG_Z, 100.0, 0b10).is_none());
        let hit = world.raycast(Vec3::ZERO, Vec3::NEG_Z, 100.0, 0).unwrap();
        assert_eq!(hit.collider, target);
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }
}
