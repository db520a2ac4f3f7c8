//! HUD state (sink для UI host)

use bevy::prelude::*;

/// Длительность damage flash
pub const DAMAGE_FLASH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CrosshairFade {
    remaining: f32,
    duration: f32,
}

/// Что показывает HUD. ECS пишет, UI host читает.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HeadsUpDisplay {
    pub crosshair: Option<String>,
    pub crosshair_alpha: f32,
    /// > 0: экран мигает после попадания по player
    pub damage_cooldown: f32,
    pub target_in_sight: bool,
    fade: Option<CrosshairFade>,
}

impl Default for HeadsUpDisplay {
    fn default() -> Self {
        Self {
            crosshair: None,
            crosshair_alpha: 1.0,
            damage_cooldown: 0.0,
            target_in_sight: false,
            fade: None,
        }
    }
}

impl HeadsUpDisplay {
    /// Новый crosshair полностью видим (fade отменяется)
    pub fn set_crosshair(&mut self, crosshair: &str) {
        self.crosshair = Some(crosshair.to_string());
        self.crosshair_alpha = 1.0;
        self.fade = None;
    }

    pub fn set_target_in_sight(&mut self, value: bool) {
        self.target_in_sight = value;
    }

    pub fn flash_damage(&mut self) {
        self.damage_cooldown = DAMAGE_FLASH;
    }

    pub fn fade_out_crosshair(&mut self, duration: f32) {
        if duration <= 0.0 {
            self.crosshair_alpha = 0.0;
            self.fade = None;
            return;
        }
        self.fade = Some(CrosshairFade {
            remaining: duration,
            duration,
        });
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn tick(&mut self, delta: f32) {
        self.damage_cooldown = (self.damage_cooldown - delta).max(0.0);

        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        fade.remaining -= delta;
        self.crosshair_alpha = (fade.remaining / fade.duration).clamp(0.0, 1.0);
        if fade.remaining <= 0.0 {
            self.fade = None;
        }
    }
}
