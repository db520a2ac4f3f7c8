//! Player domain
//!
//! Player controller = мост input → camera rig + vehicle.
//! ECS ответственность: control loop, HUD state, targeting registry,
//! реакция на смерть vehicle игрока.
//! Host ответственность: заполнить `PlayerInput` до Update, отрисовать HUD.

use bevy::prelude::*;

use crate::MechSet;

pub mod components;
pub mod hud;
pub mod systems;
pub mod targeting;


pub use components::{PlayerController, PlayerInput, PlayerSession, Team};
pub use hud::HeadsUpDisplay;
pub use systems::{spawn_player, CORPSE_FOCUS_DISTANCE, FORCE_KILL_DAMAGE};
pub use targeting::Targeting;

/// Player Plugin
///
/// - Startup: ensure_session_camera
/// - Control: setup_spawned_players → control_player
/// - после Damage: flash_player_damage
/// - после Death: handle_player_vehicle_lifecycle
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerController>()
            .register_type::<Team>()
            .init_resource::<PlayerInput>()
            .init_resource::<HeadsUpDisplay>()
            .init_resource::<Targeting>();

        app.add_systems(Startup, systems::ensure_session_camera);

        app.add_systems(
            Update,
            (
                (systems::setup_spawned_players, systems::control_player)
                    .chain()
                    .in_set(MechSet::Control),
                systems::flash_player_damage.after(MechSet::Damage),
                systems::handle_player_vehicle_lifecycle.after(MechSet::Death),
                systems::tick_hud.before(MechSet::Control),
            ),
        );
    }
}
