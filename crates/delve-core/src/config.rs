//! Generation tuning knobs.
//!
//! Every probability and count the generator draws against lives here, so
//! that callers can tune difficulty without recompiling. The defaults
//! reproduce the classic feel: sprawling multi-screen levels, roughly
//! thirty rooms, door-happy tunnels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_HEIGHT, MAX_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Room archetypes the assembler can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomArchetype {
    /// Single walled rectangle.
    Plain,
    /// Union of 2-3 jittered rectangles.
    Overlapping,
    /// Outer room with a decorated inner chamber.
    InnerRoom,
    /// Two rectangles crossed at the anchor.
    CrossShaped,
}

/// Invalid generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("map dimensions {width}x{height} are smaller than the viewport")]
    MapTooSmall { width: i32, height: i32 },

    #[error("{field} must be nonzero")]
    ZeroField { field: &'static str },

    #[error("no unusual room archetypes registered")]
    EmptyArchetypeRegistry,
}

/// All tunable generation and spell-range parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// Dungeon map dimensions.
    pub dungeon_height: i32,
    pub dungeon_width: i32,

    /// Town map dimensions.
    pub town_height: i32,
    pub town_width: i32,

    /// Mean number of coarse cells seeded with a room (stddev 2).
    pub room_mean: u32,
    /// A room goes unusual when `depth > rnd(unusual_room_level)`.
    pub unusual_room_level: u32,
    /// Registry of unusual archetypes, drawn uniformly.
    pub unusual_archetypes: Vec<RoomArchetype>,

    /// Percent chance per step that the tunneler keeps its heading.
    pub tunnel_keep_heading: u32,
    /// When re-aiming, 1-in-n chance of a random wander instead.
    pub tunnel_wander_one_in: u32,
    /// Percent threshold for the early-stop check on corridor contact.
    pub tunnel_stop_threshold: u32,
    /// Percent chance a pierced room wall becomes a door.
    pub tunnel_door_chance: u32,
    /// Percent threshold for doors at recorded tunnel junctions.
    pub junction_door_threshold: u32,
    /// Hard iteration cap; the tunnel is abandoned where it stands.
    pub tunnel_step_cap: u32,

    /// Mineral streamers: counts and 1-in-n embedded treasure chances.
    pub magma_streamers: u32,
    pub magma_treasure_one_in: u32,
    pub quartz_streamers: u32,
    pub quartz_treasure_one_in: u32,
    /// Cells converted per streamer step, and jitter radius.
    pub streamer_density: u32,
    pub streamer_spread: i32,

    /// Starting adjacent-wall requirement for staircases.
    pub stair_walls: u32,

    /// How far bolts and line spells travel.
    pub bolt_range: i32,
    /// Blast radius of balls and breaths.
    pub ball_radius: i32,

    /// Base number of monsters per dungeon level (plus depth scaling).
    pub min_monsters: u32,
    /// Town monster counts by time of day.
    pub town_monsters_day: u32,
    pub town_monsters_night: u32,

    /// Treasure allocation means (stddev 3).
    pub treasure_room_mean: u32,
    pub treasure_any_mean: u32,
    pub gold_mean: u32,

    /// Fixed seed for the surface layout, so the town is stable across
    /// visits while its population stays on the live stream.
    pub town_seed: u64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            dungeon_height: MAX_HEIGHT,
            dungeon_width: MAX_WIDTH,
            town_height: SCREEN_HEIGHT,
            town_width: SCREEN_WIDTH,
            room_mean: 32,
            unusual_room_level: 300,
            unusual_archetypes: vec![
                RoomArchetype::Overlapping,
                RoomArchetype::InnerRoom,
                RoomArchetype::CrossShaped,
            ],
            tunnel_keep_heading: 70,
            tunnel_wander_one_in: 9,
            tunnel_stop_threshold: 15,
            tunnel_door_chance: 25,
            junction_door_threshold: 15,
            tunnel_step_cap: 2000,
            magma_streamers: 3,
            magma_treasure_one_in: 90,
            quartz_streamers: 2,
            quartz_treasure_one_in: 40,
            streamer_density: 5,
            streamer_spread: 2,
            stair_walls: 3,
            bolt_range: 18,
            ball_radius: 2,
            min_monsters: 14,
            town_monsters_day: 4,
            town_monsters_night: 8,
            treasure_room_mean: 7,
            treasure_any_mean: 2,
            gold_mean: 2,
            town_seed: 0x5EED_0F_7085,
        }
    }
}

impl GenConfig {
    /// Reject configurations the generator cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dungeon_height < SCREEN_HEIGHT || self.dungeon_width < SCREEN_WIDTH {
            return Err(ConfigError::MapTooSmall {
                width: self.dungeon_width,
                height: self.dungeon_height,
            });
        }
        if self.town_height < SCREEN_HEIGHT || self.town_width < SCREEN_WIDTH {
            return Err(ConfigError::MapTooSmall {
                width: self.town_width,
                height: self.town_height,
            });
        }
        for (value, field) in [
            (self.tunnel_wander_one_in, "tunnel_wander_one_in"),
            (self.tunnel_step_cap, "tunnel_step_cap"),
            (self.magma_treasure_one_in, "magma_treasure_one_in"),
            (self.quartz_treasure_one_in, "quartz_treasure_one_in"),
            (self.streamer_density, "streamer_density"),
            (self.unusual_room_level, "unusual_room_level"),
            (self.bolt_range as u32, "bolt_range"),
            (self.ball_radius as u32, "ball_radius"),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroField { field });
            }
        }
        if self.unusual_archetypes.is_empty() {
            return Err(ConfigError::EmptyArchetypeRegistry);
        }
        Ok(())
    }
}
