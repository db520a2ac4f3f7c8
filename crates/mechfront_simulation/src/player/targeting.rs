//! Targeting registry: team → targetable vehicles

use std::collections::HashMap;

use bevy::prelude::*;

use super::components::Team;

#[derive(Resource, Debug, Clone, Default)]
pub struct Targeting {
    targetables: HashMap<Team, Vec<Entity>>,
}

impl Targeting {
    /// Повторная регистрация игнорируется
    pub fn add_targetable(&mut self, team: Team, entity: Entity) {
        let entities = self.targetables.entry(team).or_default();
        if !entities.contains(&entity) {
            entities.push(entity);
        }
    }

    pub fn remove_targetable(&mut self, team: Team, entity: Entity) {
        if let Some(entities) = self.targetables.get_mut(&team) {
            entities.retain(|registered| *registered != entity);
        }
    }

    pub fn targetables(&self, team: Team) -> &[Entity] {
        self.targetables.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, team: Team, entity: Entity) -> bool {
        self.targetables(team).contains(&entity)
    }

    /// Цели всех команд, кроме `team`
    pub fn hostile_to(&self, team: Team) -> impl Iterator<Item = Entity> + '_ {
        self.targetables
            .iter()
            .filter(move |(other, _)| **other != team)
            .flat_map(|(_, entities)| entities.iter().copied())
    }
}
