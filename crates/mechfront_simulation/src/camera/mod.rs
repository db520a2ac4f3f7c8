//! Camera domain
//!
//! Third-person rig игрока: follow pivot, viewport look-at, chase/aim,
//! procedural shake. Core логика в `CameraRig` (чистая, тестируется без ECS),
//! системы только достают pivot из мира и пишут Transform.

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::MechSet;

pub mod rig;
pub mod shake;
pub mod systems;


pub use rig::{CameraMode, CameraRig, RigConfig};
pub use shake::CameraShake;
pub use systems::{spawn_camera_rig, CameraShakeRequest};

/// Camera Plugin
///
/// Update (после MechSet::Death): shake запросы → shake tick.
/// PostUpdate: resolve pose после transform propagation.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraRig>()
            .add_event::<CameraShakeRequest>()
            .add_systems(
                Update,
                (systems::apply_shake_requests, systems::tick_camera_shake)
                    .chain()
                    .after(MechSet::Death),
            )
            .add_systems(
                PostUpdate,
                systems::resolve_camera_pose.after(TransformSystem::TransformPropagate),
            );
    }
}
