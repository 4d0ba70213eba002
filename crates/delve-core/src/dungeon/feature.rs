//! Placement primitives for doors, staircases, traps and mineral streamers.

use super::level::Level;
use super::tile::{DoorState, TileKind};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::object::{ObjectKind, TrapKind};
use crate::pos::{Dir, Pos};
use crate::rng::GameRng;

pub fn place_open_door(level: &mut Level, pos: Pos) {
    level.grid[pos].kind = TileKind::Corridor;
    level.place_object(pos, ObjectKind::Door(DoorState::Open));
}

pub fn place_broken_door(level: &mut Level, pos: Pos) {
    level.grid[pos].kind = TileKind::Corridor;
    level.place_object(pos, ObjectKind::Door(DoorState::Broken));
}

pub fn place_closed_door(level: &mut Level, pos: Pos) {
    level.grid[pos].kind = TileKind::BlockedFloor;
    level.place_object(pos, ObjectKind::Door(DoorState::Closed));
}

pub fn place_locked_door(level: &mut Level, rng: &mut GameRng, pos: Pos) {
    level.grid[pos].kind = TileKind::BlockedFloor;
    let strength = (rng.rnd(10) + 10) as u8;
    level.place_object(pos, ObjectKind::Door(DoorState::Locked(strength)));
}

pub fn place_stuck_door(level: &mut Level, rng: &mut GameRng, pos: Pos) {
    level.grid[pos].kind = TileKind::BlockedFloor;
    let strength = (rng.rnd(10) + 10) as u8;
    level.place_object(pos, ObjectKind::Door(DoorState::Stuck(strength)));
}

pub fn place_secret_door(level: &mut Level, pos: Pos) {
    level.grid[pos].kind = TileKind::BlockedFloor;
    level.place_object(pos, ObjectKind::Door(DoorState::Secret));
}

/// Random door: a third each open-class, closed-class, secret.
pub fn place_door(level: &mut Level, rng: &mut GameRng, pos: Pos) {
    match rng.rnd(3) {
        1 => {
            if rng.one_in(4) {
                place_broken_door(level, pos);
            } else {
                place_open_door(level, pos);
            }
        }
        2 => {
            // Mostly plain closed; the tail of the roll jams or locks it.
            let roll = rng.rnd(12);
            if roll > 3 {
                place_closed_door(level, pos);
            } else if roll == 3 {
                place_stuck_door(level, rng, pos);
            } else {
                place_locked_door(level, rng, pos);
            }
        }
        _ => place_secret_door(level, pos),
    }
}

pub fn place_trap(level: &mut Level, pos: Pos, kind: TrapKind) {
    level.place_object(pos, ObjectKind::Trap(kind));
}

/// Scatter `count` random traps around a center, within the given
/// displacement box. A few tries per trap, then that trap is skipped.
pub fn vault_trap(
    level: &mut Level,
    rng: &mut GameRng,
    center: Pos,
    xd: i32,
    yd: i32,
    count: u32,
) {
    for _ in 0..count {
        for _ in 0..6 {
            let pos = Pos::new(
                center.x - xd - 1 + rng.rnd(2 * xd as u32 + 1) as i32,
                center.y - yd - 1 + rng.rnd(2 * yd as u32 + 1) as i32,
            );
            if !level.grid.in_bounds(pos) {
                continue;
            }
            let tile = &level.grid[pos];
            if tile.kind.is_floor() && tile.object.is_none() {
                let kind = TrapKind::random(rng);
                place_trap(level, pos, kind);
                break;
            }
        }
    }
}

/// Guard a spot with `count` monsters summoned next to it.
pub fn vault_monster(level: &mut Level, rng: &mut GameRng, pos: Pos, count: u32) {
    for _ in 0..count {
        level.summon_near(rng, pos, true);
    }
}

/// Place staircases of one direction.
///
/// Each staircase scans a 12x12 window from a random corner, row-major,
/// for an open, object-free tile with at least `walls` adjacent solid
/// walls. After each round of 30 failed windows the wall requirement
/// relaxes by one; once it is exhausted a final full-grid scan runs, and
/// failing even that, the staircase is dropped rather than looping
/// forever.
pub fn place_stairs(level: &mut Level, rng: &mut GameRng, up: bool, count: u32, walls: u32) {
    let kind = if up {
        ObjectKind::UpStaircase
    } else {
        ObjectKind::DownStaircase
    };

    for _ in 0..count {
        let mut walls = walls as i32;
        let mut placed = false;

        while !placed {
            for _ in 0..=30 {
                if let Some(pos) = scan_stair_window(level, rng, walls) {
                    level.place_object(pos, kind);
                    placed = true;
                    break;
                }
            }
            if placed {
                break;
            }
            if walls < 0 {
                if let Some(pos) = scan_whole_grid(level) {
                    level.place_object(pos, kind);
                }
                break;
            }
            walls -= 1;
        }
    }
}

fn stair_site_ok(level: &Level, pos: Pos, walls: i32) -> bool {
    let tile = &level.grid[pos];
    tile.kind.is_open()
        && tile.object.is_none()
        && tile.occupant.is_none()
        && level.grid.next_to_walls(pos) as i32 >= walls
}

fn scan_stair_window(level: &Level, rng: &mut GameRng, walls: i32) -> Option<Pos> {
    let span = 12;
    let y0 = rng.rnd((level.grid.height() - span - 2).max(1) as u32) as i32;
    let x0 = rng.rnd((level.grid.width() - span - 2).max(1) as u32) as i32;
    for y in y0..(y0 + span) {
        for x in x0..(x0 + span) {
            let pos = Pos::new(x, y);
            if level.grid.in_bounds(pos) && stair_site_ok(level, pos, walls) {
                return Some(pos);
            }
        }
    }
    None
}

fn scan_whole_grid(level: &Level) -> Option<Pos> {
    level
        .grid
        .positions()
        .find(|&pos| level.grid.in_bounds(pos) && stair_site_ok(level, pos, 0))
}

/// Carve a mineral streamer: a random walk from a jittered center in one
/// of the eight directions, converting granite to vein material and
/// sometimes burying treasure, until it walks off the map.
pub fn place_streamer(
    level: &mut Level,
    rng: &mut GameRng,
    kind: TileKind,
    treasure_one_in: u32,
    density: u32,
    spread: i32,
) {
    debug_assert!(kind.is_vein());

    let mut pos = Pos::new(
        level.grid.width() / 2 + SCREEN_WIDTH / 4 - rng.rnd(SCREEN_WIDTH as u32 / 2) as i32,
        level.grid.height() / 2 + SCREEN_HEIGHT / 2 - rng.rnd(SCREEN_HEIGHT as u32 + 1) as i32,
    );
    let dir = Dir::random(rng);

    loop {
        for _ in 0..density {
            let spot = Pos::new(
                pos.x + rng.rnd(2 * spread as u32 + 1) as i32 - (spread + 1),
                pos.y + rng.rnd(2 * spread as u32 + 1) as i32 - (spread + 1),
            );
            if level.grid.in_bounds(spot) && level.grid[spot].kind == TileKind::Granite {
                level.grid[spot].kind = kind;
                if rng.one_in(treasure_one_in) {
                    level.place_gold(rng, spot);
                }
            }
        }
        match level.grid.step(pos, dir) {
            Some(next) => pos = next,
            None => break,
        }
    }
}
