//! delve-core: the level-generation and effect-resolution core of a
//! turn-based dungeon crawler.
//!
//! The crate owns two things: synthesizing a traversable dungeon or town
//! from a seed (rooms, corridors, doors, staircases, treasure), and
//! resolving area-effect magic (bolts, balls, breaths, line effects)
//! against the resulting grid. It has no I/O: callers feed it a seeded
//! [`GameRng`] and read back [`magic::EffectOutcome`] messages.
//!
//! Everything mutable is passed explicitly - the grid, the monster table
//! and the RNG travel through every call, so a fixed seed reproduces a
//! level or a ray trace exactly.

pub mod config;
pub mod dungeon;
pub mod magic;
pub mod monster;
pub mod object;
pub mod pos;

mod consts;
mod rng;

pub use consts::*;
pub use pos::{Dir, Pos};
pub use rng::GameRng;
