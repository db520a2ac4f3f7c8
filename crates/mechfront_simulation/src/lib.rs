//! MECHFRONT Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (headless): third-person camera rig +
//! vehicle combat/locomotion state machine (Soldier / Walker).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state (camera rig, vehicles, weapons, damage → death → corpse)
//! - Host = rendering, animation playback, audio, physics step ragdoll
//!
//! Schedules:
//! - Update (live phase): MechSet::Control → Locomotion → Weapons → Damage → Death
//! - PostUpdate (late phase): head bone → TransformPropagate → camera pose

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod camera;
pub mod combat;
pub mod logger;
pub mod physics;
pub mod player;
pub mod shared;
pub mod sounds;
pub mod vehicle;

// Re-export основных типов для удобства
pub use camera::{CameraMode, CameraPlugin, CameraRig, CameraShakeRequest, RigConfig};
pub use combat::{CombatPlugin, DamagePayload, DamageRequest, Damaged, Died, GunBlueprint, Killable, VehicleGun};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use player::{HeadsUpDisplay, PlayerController, PlayerInput, PlayerPlugin, PlayerSession, Targeting, Team};
pub use sounds::{SoundsPlugin, WorldSoundRequest};
pub use vehicle::{Vehicle, VehicleBlueprint, VehicleLifecycleEvent, VehiclePlugin};

/// Шаг симуляции (60 Hz)
pub const SIMULATION_STEP: Duration = Duration::from_nanos(16_666_667);

/// Фазы live update (Update schedule, строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MechSet {
    /// Input → camera rig + vehicle intent
    Control,
    /// Gravity, displacement, поворот vehicles
    Locomotion,
    /// Gun таймеры, выстрелы, reload
    Weapons,
    /// DamageRequest → Damaged / Died
    Damage,
    /// Died → corpse handoff
    Death,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                MechSet::Control,
                MechSet::Locomotion,
                MechSet::Weapons,
                MechSet::Damage,
                MechSet::Death,
            )
                .chain(),
        );

        // Детерминистичный RNG (seed по умолчанию, если host не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((CameraPlugin, CombatPlugin, VehiclePlugin, PlayerPlugin, SoundsPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается ровно на `SIMULATION_STEP` за `app.update()`
/// (первый update: нулевой delta). Подсистемы добавляет caller
/// (`SimulationPlugin` или отдельные plugins в тестах).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(SIMULATION_STEP));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
