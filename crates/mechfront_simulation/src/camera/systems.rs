//! Camera ECS systems
//!
//! - Update: shake tick (вне MechSet chain) + обработка `CameraShakeRequest`
//! - PostUpdate: resolve позы после `TransformPropagate`, чтобы pivot
//!   (кость/точка vehicle) уже имел финальный GlobalTransform этого frame

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::physics::SceneQuery;
use crate::DeterministicRng;

use super::rig::{CameraRig, RigConfig};

/// Event: запрос screen shake (взрывы, попадания, шаги walker)
#[derive(Event, Debug, Clone, Copy)]
pub struct CameraShakeRequest {
    pub at: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub duration: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

/// Spawn camera entity с rig (один раз на сессию)
pub fn spawn_camera_rig(commands: &mut Commands, config: RigConfig) -> Entity {
    commands
        .spawn((Name::new("CameraRig"), CameraRig::new(config), Transform::default()))
        .id()
}

/// System: новые shake запросы (latest wins)
pub fn apply_shake_requests(
    mut requests: EventReader<CameraShakeRequest>,
    mut rng: ResMut<DeterministicRng>,
    mut rigs: Query<&mut CameraRig>,
) {
    for request in requests.read() {
        for mut rig in rigs.iter_mut() {
            rig.shake(
                request.at,
                request.min_distance,
                request.max_distance,
                request.duration,
                request.amplitude,
                request.frequency,
                &mut rng.rng,
            );
        }
    }
}

/// System: shake tick каждый frame
pub fn tick_camera_shake(time: Res<Time>, mut rng: ResMut<DeterministicRng>, mut rigs: Query<&mut CameraRig>) {
    let delta = time.delta_secs();
    for mut rig in rigs.iter_mut() {
        rig.tick_shake(delta, &mut rng.rng);
    }
}

/// System: late-phase резолв позы камеры
///
/// Despawned pivot → `None` → rig держит прошлую позу.
/// Transform и GlobalTransform пишутся оба: propagate этого frame уже прошёл.
pub fn resolve_camera_pose(
    time: Res<Time>,
    world: SceneQuery,
    pivots: Query<&GlobalTransform, Without<CameraRig>>,
    mut rigs: Query<(&mut CameraRig, &mut Transform, &mut GlobalTransform), Without<Collider>>,
) {
    let delta = time.delta_secs();

    for (mut rig, mut transform, mut global) in rigs.iter_mut() {
        let pivot_position = rig
            .pivot()
            .and_then(|pivot| pivots.get(pivot).ok())
            .map(|pivot| pivot.translation());

        rig.update(delta, pivot_position, &world);

        *transform = rig.lens_transform();
        *global = GlobalTransform::from(*transform);
    }
}
