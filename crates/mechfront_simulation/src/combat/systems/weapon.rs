//! Weapon systems (timers + shot publication).

use bevy::prelude::*;

use crate::combat::{ReloadFinished, ShotFired, VehicleGun, WeaponOwner};

/// System: tick gun timers, публикация выстрелов и завершённых reload
pub fn tick_vehicle_guns(
    time: Res<Time>,
    mut guns: Query<(Entity, &mut VehicleGun, Option<&WeaponOwner>, &GlobalTransform)>,
    mut shot_events: EventWriter<ShotFired>,
    mut reload_events: EventWriter<ReloadFinished>,
) {
    let delta = time.delta_secs();

    for (weapon, mut gun, owner, global) in guns.iter_mut() {
        if gun.tick(delta) {
            reload_events.write(ReloadFinished { weapon });
        }

        let owner = owner.map(|owner| owner.0);
        for shot in gun.drain_shots() {
            shot_events.write(ShotFired {
                weapon,
                owner,
                origin: gun.shoot_point_world(shot.shoot_point, global),
                target: shot.target,
                missile: gun.missile(owner),
                missile_radius: gun.missile_radius,
            });
        }
    }
}
