//! Dungeon system
//!
//! Grid, tiles, the live level, and everything that generates them.

mod feature;
mod generate;
mod grid;
mod level;
mod room;
mod tile;
mod tunnel;

pub use feature::{
    place_broken_door, place_closed_door, place_door, place_locked_door, place_open_door,
    place_secret_door, place_stairs, place_streamer, place_stuck_door, place_trap, vault_monster,
    vault_trap,
};
pub use generate::{AllocKind, AllocRegion, alloc_monsters, alloc_objects, generate_level};
pub use grid::{Grid, distance};
pub use level::Level;
pub use room::{
    build_archetype, build_cross_room, build_inner_room, build_overlapping_room, build_plain_room,
};
pub use tile::{DoorState, Occupant, Tile, TileFlags, TileKind};
pub use tunnel::build_tunnel;
