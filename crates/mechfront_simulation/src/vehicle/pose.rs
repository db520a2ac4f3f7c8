//! Pose transfer live skeleton → corpse
//!
//! Таблица строится один раз при спавне: части corpse blueprint
//! сопоставляются по имени с костями live скелета. При смерти local
//! transform каждой найденной кости копируется в соответствующую часть.
//! Части без пары остаются в rest pose, лишние кости игнорируются.

use bevy::prelude::*;

use super::blueprint::CorpseBlueprint;

/// Пары (индекс части corpse, live кость)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseTransferMap {
    pairs: Vec<(usize, Entity)>,
}

impl PoseTransferMap {
    /// `bones`: (имя, entity) прямых потомков live root
    pub fn build(bones: &[(String, Entity)], corpse: &CorpseBlueprint) -> Self {
        let pairs = corpse
            .parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| {
                bones
                    .iter()
                    .find(|(name, _)| *name == part.name)
                    .map(|(_, bone)| (index, *bone))
            })
            .collect();

        Self { pairs }
    }

    pub fn pairs(&self) -> &[(usize, Entity)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Local transforms частей corpse: rest pose, перекрытая live позой.
    ///
    /// `live_pose` возвращает текущий local transform кости (None: кость пропала).
    pub fn posed_parts(&self, corpse: &CorpseBlueprint, live_pose: impl Fn(Entity) -> Option<Transform>) -> Vec<Transform> {
        let mut parts: Vec<Transform> = corpse.parts.iter().map(|part| part.rest_transform()).collect();

        for &(index, bone) in &self.pairs {
            let (Some(slot), Some(pose)) = (parts.get_mut(index), live_pose(bone)) else {
                continue;
            };
            slot.translation = pose.translation;
            slot.rotation = pose.rotation;
        }

        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::blueprint::VehicleBlueprint;

    #[test]
    fn test_matches_by_name_and_skips_unmatched() {
        let corpse = VehicleBlueprint::walker().corpse;
        let head = Entity::from_raw(1);
        let antenna = Entity::from_raw(2);
        let bones = vec![("Head".to_string(), head), ("Antenna".to_string(), antenna)];

        let map = PoseTransferMap::build(&bones, &corpse);

        let head_index = corpse.parts.iter().position(|part| part.name == "Head").unwrap();
        assert_eq!(map.pairs(), &[(head_index, head)]);
    }

    #[test]
    fn test_posed_parts_copy_live_local_transform() {
        let corpse = VehicleBlueprint::walker().corpse;
        let head = Entity::from_raw(1);
        let map = PoseTransferMap::build(&[("Head".to_string(), head)], &corpse);

        let live = Transform::from_xyz(0.5, 4.0, 0.2).with_rotation(Quat::from_rotation_y(0.7));
        let parts = map.posed_parts(&corpse, |bone| (bone == head).then_some(live));

        let head_index = corpse.parts.iter().position(|part| part.name == "Head").unwrap();
        assert_eq!(parts[head_index].translation, live.translation);
        assert_eq!(parts[head_index].rotation, live.rotation);
        // Остальные: rest pose
        let pelvis_index = corpse.parts.iter().position(|part| part.name == "Pelvis").unwrap();
        assert_eq!(parts[pelvis_index], corpse.parts[pelvis_index].rest_transform());
    }

    #[test]
    fn test_missing_live_bone_keeps_rest_pose() {
        let corpse = VehicleBlueprint::walker().corpse;
        let map = PoseTransferMap::build(&[("Head".to_string(), Entity::from_raw(1))], &corpse);

        let parts = map.posed_parts(&corpse, |_| None);

        let rest: Vec<Transform> = corpse.parts.iter().map(|part| part.rest_transform()).collect();
        assert_eq!(parts, rest);
    }
}
