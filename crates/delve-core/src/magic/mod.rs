//! Spell and effect resolution.
//!
//! Directed spells share one ray-walking primitive; area spells share one
//! disc resolver. Every entry point reports through [`EffectOutcome`]
//! rather than printing: presentation belongs to the caller.

mod area;
mod effect;
mod line;
mod local;
mod ray;

pub use area::{breath, fire_ball, fire_bolt};
pub use effect::EffectKind;
pub use line::{
    build_wall_line, clone_line, confuse_line, destroy_doors_line, disarm_line, drain_life,
    hp_line, light_line, polymorph_line, sleep_line, speed_line, starlite, teleport_line,
    wall_to_mud,
};
pub use local::{destroy_adjacent, door_creation, light_area, trap_creation, unlight_area};
pub use ray::{RayControl, cast_ray};

/// Aggregated result of one spell resolution.
#[derive(Debug, Clone, Default)]
pub struct EffectOutcome {
    /// Player-facing messages, in order.
    pub messages: Vec<String>,
    /// Creatures the effect reached.
    pub hits: u32,
    /// Creatures it killed.
    pub kills: u32,
    /// Experience earned from those kills. Breath kills earn none.
    pub experience: u32,
    /// Damage dealt to the player, if standing in the area.
    pub player_damage: i32,
    /// Whether the spell changed anything at all.
    pub affected: bool,
}

impl EffectOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}
