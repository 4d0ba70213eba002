//! Spells that work on the player's immediate surroundings.

use super::EffectOutcome;
use crate::dungeon::{DoorState, Level, TileFlags, TileKind};
use crate::object::{ObjectKind, TrapKind};
use crate::pos::Pos;
use crate::rng::GameRng;

/// Light the room around the player, or at minimum the adjacent cells.
///
/// Always reports success; the caller cannot tell a room from a corridor
/// and the glow itself never fails.
pub fn light_area(level: &mut Level, center: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();
    outcome.say("You are surrounded by a white light.");

    if level.grid[center].flags.contains(TileFlags::IN_ROOM) && level.depth > 0 {
        level.light_room(center);
    }

    // Always light the immediate area: the player might be standing on a
    // room edge or next to a blasted-out section.
    for y in (center.y - 1)..=(center.y + 1) {
        for x in (center.x - 1)..=(center.x + 1) {
            let pos = Pos::new(x, y);
            if level.grid.on_map(pos) {
                level.grid[pos].flags |= TileFlags::PERM_LIT;
            }
        }
    }

    outcome.affected = true;
    outcome
}

/// Darken the room around the player, or the adjacent corridor cells.
pub fn unlight_area(level: &mut Level, center: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();
    let mut darkened = false;

    if level.grid[center].flags.contains(TileFlags::IN_ROOM) && level.depth > 0 {
        level.darken_room(center);
        darkened = true;
    } else {
        for y in (center.y - 1)..=(center.y + 1) {
            for x in (center.x - 1)..=(center.x + 1) {
                let pos = Pos::new(x, y);
                if !level.grid.on_map(pos) {
                    continue;
                }
                let tile = &mut level.grid[pos];
                if tile.kind == TileKind::Corridor && tile.flags.contains(TileFlags::PERM_LIT) {
                    tile.flags.remove(TileFlags::PERM_LIT);
                    darkened = true;
                }
            }
        }
    }

    if darkened {
        outcome.say("Darkness surrounds you.");
    }
    outcome.affected = darkened;
    outcome
}

/// Surround the player with traps.
///
/// Never under the player: falling through a trap door while resting, or
/// setting off a rock fall on your own square, leads nowhere good.
/// Always reports success regardless of how many traps landed.
pub fn trap_creation(level: &mut Level, rng: &mut GameRng, center: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    for y in (center.y - 1)..=(center.y + 1) {
        for x in (center.x - 1)..=(center.x + 1) {
            let pos = Pos::new(x, y);
            if pos == center || !level.grid.in_bounds(pos) {
                continue;
            }
            if level.grid[pos].kind.is_floor() {
                level.delete_object_at(pos);
                let kind = TrapKind::random(rng);
                level.place_object(pos, ObjectKind::Trap(kind));
            }
        }
    }

    outcome.affected = true;
    outcome
}

/// Surround the player with closed doors.
pub fn door_creation(level: &mut Level, center: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    for y in (center.y - 1)..=(center.y + 1) {
        for x in (center.x - 1)..=(center.x + 1) {
            let pos = Pos::new(x, y);
            if pos == center || !level.grid.in_bounds(pos) {
                continue;
            }
            if level.grid[pos].kind.is_floor() {
                level.delete_object_at(pos);
                level.grid[pos].kind = TileKind::BlockedFloor;
                level.place_object(pos, ObjectKind::Door(DoorState::Closed));
                outcome.affected = true;
            }
        }
    }

    outcome
}

/// Destroy any doors and traps next to the player.
pub fn destroy_adjacent(level: &mut Level, center: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    for y in (center.y - 1)..=(center.y + 1) {
        for x in (center.x - 1)..=(center.x + 1) {
            let pos = Pos::new(x, y);
            if !level.grid.in_bounds(pos) {
                continue;
            }
            let removable = level
                .object_at(pos)
                .is_some_and(|(_, o)| o.kind.is_trap() || o.kind.is_door());
            if removable && level.delete_object_at(pos) {
                outcome.affected = true;
            }
        }
    }

    outcome
}
