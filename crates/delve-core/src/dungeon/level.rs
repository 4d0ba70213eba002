//! The live level: grid plus monster and object tables.

use serde::{Deserialize, Serialize};

use super::grid::{Grid, distance};
use super::tile::{Occupant, TileFlags, TileKind};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::monster::{Monster, MonsterId, MonsterTable};
use crate::object::{Object, ObjectId, ObjectKind, ObjectTable};
use crate::pos::Pos;
use crate::rng::GameRng;

/// Everything that exists on the current level. Rebuilt wholesale on every
/// level transition and discarded when the player leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub depth: u16,
    pub grid: Grid,
    pub monsters: MonsterTable,
    pub objects: ObjectTable,
    pub player: Pos,
}

impl Level {
    /// Blank level of the given dimensions.
    pub fn new(depth: u16, width: i32, height: i32) -> Self {
        Self {
            depth,
            grid: Grid::new(width, height),
            monsters: MonsterTable::new(),
            objects: ObjectTable::new(),
            player: Pos::new(1, 1),
        }
    }

    // ---- occupants ------------------------------------------------------

    /// The monster standing at `pos`, if any.
    pub fn monster_at(&self, pos: Pos) -> Option<MonsterId> {
        self.grid.get(pos)?.monster()
    }

    /// Put the player on a tile, clearing the previous spot.
    pub fn place_player(&mut self, pos: Pos) {
        if self.grid[self.player].occupant == Some(Occupant::Player) {
            self.grid[self.player].occupant = None;
        }
        self.player = pos;
        self.grid[pos].occupant = Some(Occupant::Player);
    }

    /// Add a monster on its tile. Fails when the tile is closed or taken.
    pub fn add_monster(&mut self, monster: Monster) -> Option<MonsterId> {
        let pos = monster.pos;
        if !self.grid.in_bounds(pos) {
            return None;
        }
        let tile = &self.grid[pos];
        if !tile.kind.is_open() || tile.occupant.is_some() {
            return None;
        }
        let id = self.monsters.add(monster);
        self.grid[pos].occupant = Some(Occupant::Monster(id));
        Some(id)
    }

    /// Remove a monster immediately. The table compacts by moving its last
    /// entry into the freed slot, so the moved monster's grid reference is
    /// refreshed here.
    pub fn remove_monster(&mut self, id: MonsterId) -> Monster {
        let (removed, moved) = self.monsters.swap_remove(id);
        if self.grid[removed.pos].occupant == Some(Occupant::Monster(id)) {
            self.grid[removed.pos].occupant = None;
        }
        if let Some(new_id) = moved {
            let pos = self.monsters.get(new_id).map(|m| m.pos);
            if let Some(pos) = pos {
                self.grid[pos].occupant = Some(Occupant::Monster(new_id));
            }
        }
        removed
    }

    /// Mark a monster dead without compacting the table. Used when an
    /// earlier slot is still being iterated; [`Level::sweep_dead`] finishes
    /// the job.
    pub fn defer_remove_monster(&mut self, id: MonsterId) {
        if let Some(monster) = self.monsters.get_mut(id) {
            monster.dead = true;
            let pos = monster.pos;
            if self.grid[pos].occupant == Some(Occupant::Monster(id)) {
                self.grid[pos].occupant = None;
            }
        }
    }

    /// Remove every monster marked dead. Walks downward so compaction never
    /// moves an unvisited slot.
    pub fn sweep_dead(&mut self) {
        for slot in (0..self.monsters.len()).rev() {
            let id = MonsterId(slot);
            if self.monsters.get(id).is_some_and(|m| m.dead) {
                self.remove_monster(id);
            }
        }
    }

    /// Apply damage; the hit always wakes the monster. Returns the
    /// experience value when the monster dies (and is removed).
    pub fn monster_take_hit(&mut self, id: MonsterId, damage: i32) -> Option<u32> {
        let monster = self.monsters.get_mut(id)?;
        monster.hp -= damage;
        monster.sleep = 0;
        if monster.hp < 0 {
            let exp = monster.exp_value();
            self.remove_monster(id);
            Some(exp)
        } else {
            None
        }
    }

    /// Move a monster to a new tile, updating both grid references.
    pub fn move_monster(&mut self, id: MonsterId, to: Pos) {
        let Some(monster) = self.monsters.get_mut(id) else {
            return;
        };
        let from = monster.pos;
        monster.pos = to;
        monster.visible = false;
        if self.grid[from].occupant == Some(Occupant::Monster(id)) {
            self.grid[from].occupant = None;
        }
        self.grid[to].occupant = Some(Occupant::Monster(id));
    }

    /// Displace a monster to a random open tile roughly `dis` away. The
    /// search box widens every ten failures, so this always lands.
    pub fn teleport_away(&mut self, rng: &mut GameRng, id: MonsterId, dis: i32) {
        let Some(from) = self.monsters.get(id).map(|m| m.pos) else {
            return;
        };
        let mut dis = dis;
        let mut tries = 0;
        let target = loop {
            let span = (2 * dis + 1) as u32;
            let pos = Pos::new(
                from.x + rng.rnd(span) as i32 - (dis + 1),
                from.y + rng.rnd(span) as i32 - (dis + 1),
            );
            if self.grid.in_bounds(pos) {
                let tile = &self.grid[pos];
                if tile.kind.is_open() && tile.occupant.is_none() {
                    break pos;
                }
            }
            tries += 1;
            if tries > 9 {
                tries = 0;
                dis += 5;
            }
        };
        self.move_monster(id, target);
    }

    /// Place a depth-scaled monster adjacent to `pos`. Ten tries, then
    /// gives up.
    pub fn summon_near(&mut self, rng: &mut GameRng, pos: Pos, sleeping: bool) -> bool {
        for _ in 0..10 {
            let spot = Pos::new(
                pos.x - 2 + rng.rnd(3) as i32,
                pos.y - 2 + rng.rnd(3) as i32,
            );
            if !self.grid.in_bounds(spot) {
                continue;
            }
            let tile = &self.grid[spot];
            if tile.kind.is_open() && tile.occupant.is_none() {
                let monster = Monster::spawn(rng, self.depth, spot, sleeping);
                return self.add_monster(monster).is_some();
            }
        }
        false
    }

    /// Clone an existing monster onto an adjacent tile.
    pub fn multiply_monster(&mut self, rng: &mut GameRng, id: MonsterId) -> bool {
        let Some(template) = self.monsters.get(id).cloned() else {
            return false;
        };
        for _ in 0..18 {
            let spot = Pos::new(
                template.pos.x - 2 + rng.rnd(3) as i32,
                template.pos.y - 2 + rng.rnd(3) as i32,
            );
            if !self.grid.in_bounds(spot) {
                continue;
            }
            let tile = &self.grid[spot];
            if tile.kind.is_open() && tile.occupant.is_none() {
                let mut copy = template.clone();
                copy.pos = spot;
                copy.hp = copy.max_hp;
                copy.dead = false;
                return self.add_monster(copy).is_some();
            }
        }
        false
    }

    // ---- objects --------------------------------------------------------

    /// The object on a tile, if any.
    pub fn object_at(&self, pos: Pos) -> Option<(ObjectId, &Object)> {
        let id = self.grid.get(pos)?.object?;
        Some((id, self.objects.get(id)?))
    }

    /// Place an object, replacing whatever was there.
    pub fn place_object(&mut self, pos: Pos, kind: ObjectKind) -> ObjectId {
        self.delete_object_at(pos);
        let id = self.objects.insert(Object::new(kind));
        self.grid[pos].object = Some(id);
        id
    }

    /// Delete the object on a tile. A blocked floor reverts to plain
    /// corridor once its door or rubble is gone. Returns whether an object
    /// existed.
    pub fn delete_object_at(&mut self, pos: Pos) -> bool {
        if let Some(id) = self.grid[pos].object.take() {
            self.objects.remove(id);
            let tile = &mut self.grid[pos];
            if tile.kind == TileKind::BlockedFloor {
                tile.kind = TileKind::Corridor;
            }
            tile.flags.remove(TileFlags::FIELD_MARK);
            true
        } else {
            false
        }
    }

    /// Drop a depth-scaled pile of gold.
    pub fn place_gold(&mut self, rng: &mut GameRng, pos: Pos) {
        let amount = (rng.dice(2, 8) + rng.rnd(8 * self.depth.max(1) as u32)) as u32;
        self.place_object(pos, ObjectKind::Gold(amount));
    }

    /// Drop a random item; `allow_great` opens the vault-quality table.
    pub fn place_random_treasure(&mut self, rng: &mut GameRng, pos: Pos, allow_great: bool) {
        let great = allow_great && rng.one_in(10);
        self.place_object(pos, ObjectKind::Treasure { great });
    }

    /// Scatter `count` drops near a center, favoring items over gold.
    pub fn scatter_treasure(&mut self, rng: &mut GameRng, center: Pos, count: u32) {
        for _ in 0..count {
            for _ in 0..10 {
                let spot = Pos::new(
                    center.x - 4 + rng.rnd(7) as i32,
                    center.y - 3 + rng.rnd(5) as i32,
                );
                if !self.grid.in_bounds(spot) {
                    continue;
                }
                let tile = &self.grid[spot];
                if tile.kind.is_floor() && tile.object.is_none() {
                    if rng.percent(75) {
                        self.place_random_treasure(rng, spot, false);
                    } else {
                        self.place_gold(rng, spot);
                    }
                    break;
                }
            }
        }
    }

    // ---- queries and lighting -------------------------------------------

    /// Corridor tiles in the 3x3 neighbourhood (the center included) that
    /// do not already carry a door.
    pub fn next_to_corridor(&self, pos: Pos) -> u32 {
        let mut count = 0;
        for y in (pos.y - 1)..=(pos.y + 1) {
            for x in (pos.x - 1)..=(pos.x + 1) {
                let p = Pos::new(x, y);
                if !self.grid.in_bounds(p) {
                    continue;
                }
                let tile = &self.grid[p];
                let doored = tile
                    .object
                    .and_then(|id| self.objects.get(id))
                    .is_some_and(|o| o.kind.is_door());
                if tile.kind == TileKind::Corridor && !doored {
                    count += 1;
                }
            }
        }
        count
    }

    /// A random open, unoccupied, object-free tile. Bounded rejection
    /// sampling with a row-major scan as the fallback.
    pub fn random_open_spot(&self, rng: &mut GameRng) -> Pos {
        for _ in 0..10_000 {
            let pos = Pos::new(
                rng.rnd(self.grid.width() as u32 - 2) as i32,
                rng.rnd(self.grid.height() as u32 - 2) as i32,
            );
            let tile = &self.grid[pos];
            if tile.kind.is_open() && tile.occupant.is_none() && tile.object.is_none() {
                return pos;
            }
        }
        self.grid
            .positions()
            .find(|&p| {
                self.grid.in_bounds(p) && {
                    let tile = &self.grid[p];
                    tile.kind.is_open() && tile.occupant.is_none() && tile.object.is_none()
                }
            })
            .unwrap_or(Pos::new(1, 1))
    }

    /// Permanently light the room block containing `pos`. Blocks are
    /// half-viewport quadrants; only tiles stamped by a room builder light
    /// up.
    pub fn light_room(&mut self, pos: Pos) {
        self.for_room_block(pos, |tile| {
            tile.flags |= TileFlags::PERM_LIT;
        });
    }

    /// Darken the room block containing `pos`, reverting floors to dark.
    pub fn darken_room(&mut self, pos: Pos) {
        self.for_room_block(pos, |tile| {
            tile.flags.remove(TileFlags::PERM_LIT);
            if tile.kind == TileKind::LitFloor {
                tile.kind = TileKind::DarkFloor;
            }
        });
    }

    fn for_room_block(&mut self, pos: Pos, mut apply: impl FnMut(&mut super::tile::Tile)) {
        let block_h = SCREEN_HEIGHT / 2;
        let block_w = SCREEN_WIDTH / 2;
        let start_y = (pos.y / block_h) * block_h + 1;
        let start_x = (pos.x / block_w) * block_w + 1;
        for y in start_y..(start_y + block_h) {
            for x in start_x..(start_x + block_w) {
                let p = Pos::new(x, y);
                if self.grid.on_map(p) && self.grid[p].flags.contains(TileFlags::IN_ROOM) {
                    apply(&mut self.grid[p]);
                }
            }
        }
    }

    /// Distance from the player, in the game metric.
    pub fn player_distance(&self, pos: Pos) -> i32 {
        distance(self.player, pos)
    }
}
