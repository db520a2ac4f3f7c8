//! Headless симуляция MECHFRONT
//!
//! Player на walker против soldier цели: крутит камеру, идёт вперёд,
//! стреляет. Host-сторона (полёт снарядов) заменена прямым DamageRequest.

use bevy::prelude::*;
use mechfront_simulation::combat::{DamagePayload, DamageRequest, ShotFired};
use mechfront_simulation::physics::LAYER_ACTORS;
use mechfront_simulation::player::spawn_player;
use mechfront_simulation::vehicle::spawn_vehicle;
use mechfront_simulation::{
    create_headless_app, log, CameraRig, PlayerInput, PlayerSession, SimulationPlugin, Team, Vehicle,
    VehicleBlueprint, VehicleLifecycleEvent,
};

fn main() {
    let seed = 42;
    log(&format!("Starting MECHFRONT headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let walker = VehicleBlueprint::walker();
    let soldier = VehicleBlueprint::soldier();
    let (_, player) = {
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, Team(1), &walker, None, Transform::default())
    };
    let target = {
        let mut commands = app.world_mut().commands();
        let transform = Transform::from_xyz(0.0, 0.0, -40.0);
        spawn_vehicle(&mut commands, &soldier, &soldier.weapon, transform, LAYER_ACTORS)
    };
    app.world_mut().flush();

    let mut shots = app.world().resource::<Events<ShotFired>>().get_cursor();
    let mut lifecycle = app.world().resource::<Events<VehicleLifecycleEvent>>().get_cursor();

    for tick in 0..600 {
        {
            let mut input = app.world_mut().resource_mut::<PlayerInput>();
            input.movement = Vec2::new(0.0, 1.0);
            input.look = if tick < 60 { Vec2::new(0.5, 0.0) } else { Vec2::ZERO };
            input.fire = tick >= 120;
        }

        app.update();

        // Host: каждый выстрел попадает в цель
        let hits: Vec<DamageRequest> = shots
            .read(app.world().resource::<Events<ShotFired>>())
            .map(|shot| DamageRequest {
                target: target.vehicle,
                hit_collider: None,
                position: shot.target,
                direction: (shot.target - shot.origin).normalize_or_zero(),
                payload: DamagePayload::Missile(shot.missile),
                attacker: None,
            })
            .collect();
        if app.world().get_entity(target.vehicle).is_ok() {
            for hit in hits {
                app.world_mut().send_event(hit);
            }
        }

        for event in lifecycle.read(app.world().resource::<Events<VehicleLifecycleEvent>>()) {
            log(&format!("Tick {}: {:?}", tick, event));
        }

        if tick % 100 == 0 {
            let camera = app.world().resource::<PlayerSession>().camera;
            let rig = app.world().get::<CameraRig>(camera).map(|rig| rig.position());
            let position = app.world().get::<Transform>(player.vehicle).map(|t| t.translation);
            let alive = app.world().get::<Vehicle>(player.vehicle).is_some_and(Vehicle::is_alive);
            log(&format!(
                "Tick {}: {} entities, walker {:?} (alive: {}), camera {:?}",
                tick,
                app.world().entities().len(),
                position,
                alive,
                rig
            ));
        }
    }

    log("Simulation complete!");
}
