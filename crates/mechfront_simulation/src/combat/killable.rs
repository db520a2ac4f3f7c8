//! Killable capability (health pool + one-way death flag)

use bevy::prelude::*;

/// Damageable entity
///
/// Vehicle, турели, разрушаемые цели. `dead` ставится ровно один раз -
/// повторные попадания по трупу не порождают второй `Died`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Killable {
    pub health: f32,
    pub max_health: f32,
    dead: bool,
}

impl Default for Killable {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Killable {
    pub fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            dead: false,
        }
    }

    /// Применяет урон. Возвращает `true`, если этот удар убил.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }

        self.health -= amount;
        if self.health <= 0.0 {
            self.dead = true;
            return true;
        }
        false
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }
}
