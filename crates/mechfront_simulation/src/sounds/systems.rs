//! Sound systems: hurt cries + footsteps.
//!
//! Выбор clip: `SliceRandom::choose` через `DeterministicRng`
//! (одинаковый seed → одинаковая последовательность звуков).

use bevy::prelude::*;
use rand::seq::SliceRandom;

use crate::combat::Damaged;
use crate::DeterministicRng;

use super::events::{Foot, FootstepCue, WorldSoundRequest};

/// Звуки soldier (id клипов для audio host)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SoldierSounds {
    pub left_steps: Vec<String>,
    pub right_steps: Vec<String>,
    pub hurt_cries: Vec<String>,
}

/// Единственный звук шага walker
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WalkerStepSound {
    pub clip: String,
}

/// System: Damaged по soldier → hurt cry над позицией
pub fn play_hurt_cries(
    mut damaged_events: EventReader<Damaged>,
    soldiers: Query<(&SoldierSounds, &Transform)>,
    mut rng: ResMut<DeterministicRng>,
    mut sound_events: EventWriter<WorldSoundRequest>,
) {
    for event in damaged_events.read() {
        let Ok((sounds, transform)) = soldiers.get(event.target) else {
            continue;
        };
        let Some(clip) = sounds.hurt_cries.choose(&mut rng.rng) else {
            continue;
        };

        sound_events.write(WorldSoundRequest {
            clip: clip.clone(),
            position: transform.translation + Vec3::Y,
            source: Some(event.target),
        });
    }
}

/// System: FootstepCue → step clip (soldier: случайный по ноге, walker: единственный)
pub fn play_footsteps(
    mut cues: EventReader<FootstepCue>,
    soldiers: Query<(&SoldierSounds, &Transform)>,
    walkers: Query<(&WalkerStepSound, &Transform)>,
    mut rng: ResMut<DeterministicRng>,
    mut sound_events: EventWriter<WorldSoundRequest>,
) {
    for cue in cues.read() {
        if let Ok((sounds, transform)) = soldiers.get(cue.vehicle) {
            let clips = match cue.foot {
                Foot::Left => &sounds.left_steps,
                Foot::Right => &sounds.right_steps,
            };
            if let Some(clip) = clips.choose(&mut rng.rng) {
                sound_events.write(WorldSoundRequest {
                    clip: clip.clone(),
                    position: transform.translation,
                    source: Some(cue.vehicle),
                });
            }
            continue;
        }

        if let Ok((step, transform)) = walkers.get(cue.vehicle) {
            sound_events.write(WorldSoundRequest {
                clip: step.clip.clone(),
                position: transform.translation,
                source: Some(cue.vehicle),
            });
            crate::log(cue.foot.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_headless_app;
    use crate::sounds::SoundsPlugin;

    fn sound_app(seed: u64) -> App {
        let mut app = create_headless_app(seed);
        app.add_event::<Damaged>().add_plugins(SoundsPlugin);
        app
    }

    fn soldier_sounds() -> SoldierSounds {
        SoldierSounds {
            left_steps: vec!["l1".into(), "l2".into()],
            right_steps: vec!["r1".into(), "r2".into()],
            hurt_cries: vec!["hurt_a".into(), "hurt_b".into(), "hurt_c".into()],
        }
    }

    fn damaged(target: Entity) -> Damaged {
        Damaged {
            target,
            hit_collider: None,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            power: 1.0,
            amount: 5.0,
            attacker: None,
        }
    }

    fn drain(app: &App, cursor: &mut bevy::ecs::event::EventCursor<WorldSoundRequest>) -> Vec<WorldSoundRequest> {
        cursor
            .read(app.world().resource::<Events<WorldSoundRequest>>())
            .cloned()
            .collect()
    }

    #[test]
    fn test_hurt_cry_above_damaged_soldier() {
        let mut app = sound_app(42);
        let soldier = app
            .world_mut()
            .spawn((soldier_sounds(), Transform::from_xyz(3.0, 0.0, -2.0)))
            .id();
        let mut cursor = app.world().resource::<Events<WorldSoundRequest>>().get_cursor();

        app.world_mut().send_event(damaged(soldier));
        app.update();

        let sounds = drain(&app, &mut cursor);
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].position, Vec3::new(3.0, 1.0, -2.0));
        assert!(soldier_sounds().hurt_cries.contains(&sounds[0].clip));
    }

    #[test]
    fn test_soldier_footstep_uses_foot_list() {
        let mut app = sound_app(42);
        let soldier = app.world_mut().spawn((soldier_sounds(), Transform::default())).id();
        let mut cursor = app.world().resource::<Events<WorldSoundRequest>>().get_cursor();

        app.world_mut().send_event(FootstepCue {
            vehicle: soldier,
            foot: Foot::Left,
        });
        app.world_mut().send_event(FootstepCue {
            vehicle: soldier,
            foot: Foot::Right,
        });
        app.update();

        let sounds = drain(&app, &mut cursor);
        assert_eq!(sounds.len(), 2);
        assert!(sounds[0].clip.starts_with('l'));
        assert!(sounds[1].clip.starts_with('r'));
    }

    #[test]
    fn test_walker_step_plays_single_clip() {
        let mut app = sound_app(42);
        let walker = app
            .world_mut()
            .spawn((
                WalkerStepSound {
                    clip: "stomp".into(),
                },
                Transform::from_xyz(0.0, 0.0, 5.0),
            ))
            .id();
        let mut cursor = app.world().resource::<Events<WorldSoundRequest>>().get_cursor();

        for foot in [Foot::Left, Foot::Right] {
            app.world_mut().send_event(FootstepCue { vehicle: walker, foot });
        }
        app.update();

        let sounds = drain(&app, &mut cursor);
        assert_eq!(sounds.len(), 2);
        assert!(sounds.iter().all(|sound| sound.clip == "stomp" && sound.source == Some(walker)));
    }

    #[test]
    fn test_clip_choice_is_deterministic_per_seed() {
        let run = |seed: u64| {
            let mut app = sound_app(seed);
            let soldier = app.world_mut().spawn((soldier_sounds(), Transform::default())).id();
            let mut cursor = app.world().resource::<Events<WorldSoundRequest>>().get_cursor();
            let mut clips = Vec::new();
            for _ in 0..10 {
                app.world_mut().send_event(damaged(soldier));
                app.update();
                clips.extend(drain(&app, &mut cursor).into_iter().map(|sound| sound.clip));
            }
            clips
        };

        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_unknown_vehicle_is_silent() {
        let mut app = sound_app(42);
        let ghost = app.world_mut().spawn(Transform::default()).id();
        let mut cursor = app.world().resource::<Events<WorldSoundRequest>>().get_cursor();

        app.world_mut().send_event(damaged(ghost));
        app.world_mut().send_event(FootstepCue {
            vehicle: ghost,
            foot: Foot::Left,
        });
        app.update();

        assert!(drain(&app, &mut cursor).is_empty());
    }
}
