//! Damage systems (generic killables).
//!
//! Vehicles обрабатываются в `vehicle::systems` (critical collider + kill cache),
//! здесь: всё остальное с `Killable`.

use bevy::prelude::*;

use crate::combat::{DamageRequest, Damaged, Died, Killable};
use crate::vehicle::Vehicle;

/// System: DamageRequest → Killable (без Vehicle)
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut killables: Query<&mut Killable, Without<Vehicle>>,
    mut damaged_events: EventWriter<Damaged>,
    mut died_events: EventWriter<Died>,
) {
    for request in requests.read() {
        let Ok(mut killable) = killables.get_mut(request.target) else {
            continue;
        };
        if killable.is_dead() {
            continue;
        }

        let amount = request.payload.damage();
        let attacker = request.resolved_attacker();
        let killed = killable.apply_damage(amount);

        damaged_events.write(Damaged {
            target: request.target,
            hit_collider: request.hit_collider,
            position: request.position,
            direction: request.direction,
            power: request.payload.power(),
            amount,
            attacker,
        });

        if killed {
            died_events.write(Died {
                entity: request.target,
                attacker,
            });
            crate::log_info(&format!("Entity {:?} destroyed by {:?}", request.target, attacker));
        }
    }
}
