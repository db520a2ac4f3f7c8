//! Sounds module: vehicle audio cues
//!
//! ECS не проигрывает звук: только решает какой clip и где,
//! audio host подписан на `WorldSoundRequest`.

use bevy::prelude::*;

use crate::MechSet;

pub mod events;
pub mod systems;

// Re-exports
pub use events::*;
pub use systems::*;

/// Sounds plugin
///
/// Footsteps: до MechSet::Control (cues host пришли до tick).
/// Hurt cries читают `Damaged` после MechSet::Damage и до MechSet::Death
/// (vehicle ещё не despawned).
/// Оба тянут `DeterministicRng`, поэтому порядок фиксирован.
pub struct SoundsPlugin;

impl Plugin for SoundsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SoldierSounds>()
            .register_type::<WalkerStepSound>()
            .add_event::<FootstepCue>()
            .add_event::<WorldSoundRequest>()
            .add_systems(
                Update,
                (
                    play_hurt_cries.after(MechSet::Damage).before(MechSet::Death),
                    play_footsteps.before(MechSet::Control),
                ),
            );
    }
}
