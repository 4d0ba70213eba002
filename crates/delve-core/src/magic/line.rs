//! Line effects: every "walk in a direction until something happens"
//! spell, built on the shared ray primitive.

use super::EffectOutcome;
use super::ray::{RayControl, cast_ray};
use crate::config::GenConfig;
use crate::consts::{MAX_MONSTER_LEVEL, MAX_SIGHT};
use crate::dungeon::{DoorState, Level, TileFlags, TileKind};
use crate::monster::{Monster, MonsterFlags, MonsterId, Vulnerability};
use crate::object::ObjectKind;
use crate::pos::{Dir, Pos};
use crate::rng::GameRng;

fn label_of(level: &Level, id: MonsterId) -> String {
    level
        .monsters
        .get(id)
        .map(|m| m.label())
        .unwrap_or_default()
}

/// Light one cell the way the light line does: permanently, spilling into
/// the whole room when the cell is naturally lit floor.
fn light_cell(level: &mut Level, pos: Pos) {
    if level.grid[pos].kind == TileKind::LitFloor && !level.grid[pos].is_lit() {
        level.light_room(pos);
    }
    level.grid[pos].flags |= TileFlags::PERM_LIT;
}

/// Leave a line of light; the glare sears light-hating creatures.
pub fn light_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    // The caster's own cell lights up too.
    if level.grid.on_map(origin) && !level.grid[origin].kind.blocks_sight() {
        light_cell(level, origin);
        light_hits_monster(level, rng, origin, &mut outcome);
    }

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        light_cell(level, pos);
        light_hits_monster(level, rng, pos, &mut outcome);
        RayControl::Continue
    });

    outcome
}

fn light_hits_monster(
    level: &mut Level,
    rng: &mut GameRng,
    pos: Pos,
    outcome: &mut EffectOutcome,
) {
    let Some(id) = level.monster_at(pos) else {
        return;
    };
    let vulnerable = level
        .monsters
        .get(id)
        .is_some_and(|m| m.vulnerabilities.contains(Vulnerability::LIGHT));
    if !vulnerable {
        return;
    }
    let label = label_of(level, id);
    outcome.hits += 1;
    outcome.affected = true;
    if let Some(exp) = level.monster_take_hit(id, rng.dice(2, 8) as i32) {
        outcome.say(format!("{} shrivels away in the light!", label));
        outcome.kills += 1;
        outcome.experience += exp;
    } else {
        outcome.say(format!("{} cringes from the light!", label));
    }
}

/// Light lines in all eight directions.
pub fn starlite(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();
    outcome.say("The end of the staff bursts into a blue shimmering light.");
    for dir in Dir::ALL {
        let sub = light_line(level, rng, config, dir, origin);
        outcome.hits += sub.hits;
        outcome.kills += sub.kills;
        outcome.experience += sub.experience;
        outcome.affected |= sub.affected;
        outcome.messages.extend(sub.messages);
    }
    outcome
}

/// Disarm traps, unlock doors and reveal secret ones along a line. Runs
/// through the first closed cell, which is where a secret door would be.
pub fn disarm_line(
    level: &mut Level,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if let Some((_, object)) = level.object_at(pos) {
            match object.kind {
                ObjectKind::Trap(_) => {
                    if level.delete_object_at(pos) {
                        outcome.affected = true;
                    }
                }
                ObjectKind::Door(DoorState::Locked(_)) | ObjectKind::Door(DoorState::Stuck(_)) => {
                    // Locked or jammed doors become merely closed.
                    level.place_object(pos, ObjectKind::Door(DoorState::Closed));
                    level.grid[pos].kind = TileKind::BlockedFloor;
                }
                ObjectKind::Door(DoorState::Secret) => {
                    level.place_object(pos, ObjectKind::Door(DoorState::Closed));
                    level.grid[pos].kind = TileKind::BlockedFloor;
                    level.grid[pos].flags |= TileFlags::FIELD_MARK;
                    outcome.affected = true;
                }
                _ => {}
            }
        }
        if level.grid[pos].kind.blocks_sight() {
            RayControl::Stop
        } else {
            RayControl::Continue
        }
    });

    outcome
}

/// Plain damage to the first creature in the line.
pub fn hp_line(
    level: &mut Level,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
    damage: i32,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            let label = label_of(level, id);
            outcome.hits += 1;
            outcome.affected = true;
            if let Some(exp) = level.monster_take_hit(id, damage) {
                outcome.say(format!("{} dies in a fit of agony.", label));
                outcome.kills += 1;
                outcome.experience += exp;
            } else if damage > 0 {
                outcome.say(format!("{} screams in agony.", label));
            }
            return RayControl::Stop;
        }
        RayControl::Continue
    });

    outcome
}

/// Drain the life of the first living creature; the undead have none.
pub fn drain_life(level: &mut Level, config: &GenConfig, dir: Dir, origin: Pos) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            let undead = level
                .monsters
                .get(id)
                .is_some_and(|m| m.flags.contains(MonsterFlags::UNDEAD));
            if !undead {
                let label = label_of(level, id);
                outcome.hits += 1;
                outcome.affected = true;
                if let Some(exp) = level.monster_take_hit(id, 75) {
                    outcome.say(format!("{} dies in a fit of agony.", label));
                    outcome.kills += 1;
                    outcome.experience += exp;
                } else {
                    outcome.say(format!("{} screams in agony.", label));
                }
            }
            return RayControl::Stop;
        }
        RayControl::Continue
    });

    outcome
}

/// Speed up or slow down the first creature in the line. Slowing is
/// resisted by high-level monsters.
pub fn speed_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
    amount: i8,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            let label = label_of(level, id);
            let resists = {
                let monster = level.monsters.get(id);
                amount <= 0
                    && monster
                        .is_some_and(|m| rng.rnd(MAX_MONSTER_LEVEL) as u8 <= m.level)
            };
            if let Some(monster) = level.monsters.get_mut(id) {
                monster.sleep = 0;
                if !resists {
                    monster.speed += amount;
                    outcome.affected = true;
                    if amount > 0 {
                        outcome.say(format!("{} starts moving faster.", label));
                    } else {
                        outcome.say(format!("{} starts moving slower.", label));
                    }
                } else {
                    outcome.say(format!("{} is unaffected.", label));
                }
            }
            return RayControl::Stop;
        }
        RayControl::Continue
    });

    outcome
}

/// Confusion check shared with sleep: high level or a sleepless mind
/// shrugs it off.
fn resists_mind(rng: &mut GameRng, monster: &Monster) -> bool {
    (rng.rnd(MAX_MONSTER_LEVEL) as u8) < monster.level
        || monster.flags.contains(MonsterFlags::NO_SLEEP)
}

/// Confuse the first creature in the line.
pub fn confuse_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            let label = label_of(level, id);
            let roll = rng.rnd(MAX_MONSTER_LEVEL) as u8;
            let extra = 2 + rng.rnd(16) as u8;
            if let Some(monster) = level.monsters.get_mut(id) {
                if roll < monster.level || monster.flags.contains(MonsterFlags::NO_SLEEP) {
                    // Resisters wake; the innately immune never even notice.
                    if !monster.flags.contains(MonsterFlags::NO_SLEEP) {
                        monster.sleep = 0;
                    }
                    outcome.say(format!("{} is unaffected.", label));
                } else {
                    monster.confused = if monster.confused > 0 {
                        monster.confused.saturating_add(3)
                    } else {
                        extra
                    };
                    monster.sleep = 0;
                    outcome.affected = true;
                    outcome.say(format!("{} appears confused.", label));
                }
            }
            return RayControl::Stop;
        }
        RayControl::Continue
    });

    outcome
}

/// Put the first creature in the line to sleep.
pub fn sleep_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            let label = label_of(level, id);
            let resisted = level
                .monsters
                .get(id)
                .is_some_and(|m| resists_mind(rng, m));
            if let Some(monster) = level.monsters.get_mut(id) {
                if resisted {
                    outcome.say(format!("{} is unaffected.", label));
                } else {
                    monster.sleep = 500;
                    outcome.affected = true;
                    outcome.say(format!("{} falls asleep.", label));
                }
            }
            return RayControl::Stop;
        }
        RayControl::Continue
    });

    outcome
}

/// Transform creatures along the line. Resisters are passed through, not
/// stopped at.
pub fn polymorph_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            let level_roll = rng.rnd(MAX_MONSTER_LEVEL) as u8;
            let target_level = level.monsters.get(id).map(|m| m.level).unwrap_or(0);
            if level_roll > target_level {
                level.remove_monster(id);
                let depth = rng.rnd(MAX_MONSTER_LEVEL) as u16;
                let replacement = Monster::spawn(rng, depth, pos, false);
                outcome.affected = level.add_monster(replacement).is_some();
                return RayControl::Stop;
            } else {
                let label = label_of(level, id);
                outcome.say(format!("{} is unaffected.", label));
            }
        }
        RayControl::Continue
    });

    outcome
}

/// Teleport away every creature along the line.
pub fn teleport_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            if let Some(monster) = level.monsters.get_mut(id) {
                monster.sleep = 0;
            }
            level.teleport_away(rng, id, MAX_SIGHT);
            outcome.affected = true;
        }
        RayControl::Continue
    });

    outcome
}

/// Turn stone to mud: consumes the first non-boundary wall it meets,
/// destroys doors and rubble, and dissolves creatures of living stone.
pub fn wall_to_mud(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        let mut finished = false;
        let kind = level.grid[pos].kind;

        if kind.is_wall() && kind != TileKind::Boundary {
            finished = true;
            level.grid[pos].kind = TileKind::Corridor;
            if level.grid[pos].is_lit() {
                outcome.affected = true;
                outcome.say("The wall turns into mud.");
            }
        } else if level.grid[pos].object.is_some() && kind.blocks_sight() {
            // A door or rubble in the way melts too.
            finished = true;
            let was_rubble = level
                .object_at(pos)
                .is_some_and(|(_, o)| o.kind == ObjectKind::Rubble);
            if level.grid[pos].is_lit() {
                outcome.affected = true;
                outcome.say("It turns into mud.");
            }
            level.delete_object_at(pos);
            if was_rubble && rng.one_in(10) {
                level.place_random_treasure(rng, pos, false);
                outcome.say("You have found something!");
            }
        }

        if let Some(id) = level.monster_at(pos) {
            let stone = level
                .monsters
                .get(id)
                .is_some_and(|m| m.vulnerabilities.contains(Vulnerability::STONE));
            if stone {
                let label = label_of(level, id);
                outcome.hits += 1;
                outcome.affected = true;
                if let Some(exp) = level.monster_take_hit(id, 100) {
                    outcome.say(format!("{} dissolves!", label));
                    outcome.kills += 1;
                    outcome.experience += exp;
                } else {
                    outcome.say(format!("{} grunts in pain!", label));
                }
                finished = true;
            }
        }

        if finished {
            RayControl::Stop
        } else {
            RayControl::Continue
        }
    });

    outcome
}

/// Destroy doors and traps along the line. Within range the flash pierces
/// even walls; past it, it dies at the first closed cell.
pub fn destroy_doors_line(
    level: &mut Level,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();
    let hard_cap = level.grid.width() + level.grid.height();
    let range = config.bolt_range;

    cast_ray(level, origin, dir, hard_cap, |level, pos, dist| {
        if let Some((_, object)) = level.object_at(pos) {
            if object.kind.is_trap() || object.kind.is_door() {
                if level.delete_object_at(pos) {
                    outcome.affected = true;
                    outcome.say("There is a bright flash of light!");
                }
            }
        }
        if dist > range && level.grid[pos].kind.blocks_sight() {
            RayControl::Stop
        } else {
            RayControl::Continue
        }
    });

    outcome
}

/// Raise a wall along the line, crushing whatever cannot get out of it.
pub fn build_wall_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }

        level.delete_object_at(pos);

        let mut finished = false;
        if let Some(id) = level.monster_at(pos) {
            finished = true;
            let (phases, sessile, eats_rock) = level
                .monsters
                .get(id)
                .map(|m| {
                    (
                        m.flags.contains(MonsterFlags::PHASES),
                        m.flags.contains(MonsterFlags::SESSILE),
                        m.flags.contains(MonsterFlags::EATS_ROCK),
                    )
                })
                .unwrap_or((false, false, false));

            if !phases {
                // Rooted creatures cannot escape the wall at all.
                let damage = if sessile { 3000 } else { rng.dice(4, 8) as i32 };
                let label = label_of(level, id);
                outcome.hits += 1;
                outcome.say(format!("{} wails out in pain!", label));
                if let Some(exp) = level.monster_take_hit(id, damage) {
                    outcome.say(format!("{} is embedded in the rock.", label));
                    outcome.kills += 1;
                    outcome.experience += exp;
                }
            } else if eats_rock {
                let heal = rng.dice(4, 8) as i32;
                if let Some(monster) = level.monsters.get_mut(id) {
                    monster.hp += heal;
                }
            }
        }

        let tile = &mut level.grid[pos];
        tile.kind = TileKind::Magma;
        tile.flags.remove(TileFlags::FIELD_MARK);
        if tile.flags.contains(TileFlags::TEMP_LIT) {
            tile.flags |= TileFlags::PERM_LIT;
        }
        outcome.affected = true;

        if finished {
            RayControl::Stop
        } else {
            RayControl::Continue
        }
    });

    outcome
}

/// Duplicate the first creature in the line.
pub fn clone_line(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    dir: Dir,
    origin: Pos,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(level, origin, dir, config.bolt_range, |level, pos, _| {
        if level.grid[pos].kind.blocks_sight() {
            return RayControl::Stop;
        }
        if let Some(id) = level.monster_at(pos) {
            if let Some(monster) = level.monsters.get_mut(id) {
                monster.sleep = 0;
            }
            outcome.affected = level.multiply_monster(rng, id);
            return RayControl::Stop;
        }
        RayControl::Continue
    });

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::BreathAffinity;

    fn open_level() -> Level {
        let mut level = Level::new(5, 40, 30);
        for pos in level.grid.positions().collect::<Vec<_>>() {
            level.grid[pos].kind = TileKind::LitFloor;
        }
        level.grid.seal_border();
        level
    }

    fn low_level_monster(pos: Pos) -> Monster {
        // Level 0 never wins the resistance roll against rnd(40) >= 1.
        Monster::new("rat", pos, 10, 0)
    }

    #[test]
    fn test_light_line_lights_cells_permanently() {
        let mut level = open_level();
        let mut rng = GameRng::new(1);
        let config = GenConfig::default();

        // Use dark floor so the room spill path stays quiet.
        for x in 5..25 {
            level.grid[Pos::new(x, 10)].kind = TileKind::DarkFloor;
        }
        light_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));

        for x in 5..=23 {
            assert!(
                level.grid[Pos::new(x, 10)].flags.contains(TileFlags::PERM_LIT),
                "cell {} should be lit",
                x
            );
        }
    }

    #[test]
    fn test_light_line_sears_light_haters() {
        let mut level = open_level();
        let mut rng = GameRng::new(1);
        let config = GenConfig::default();

        let mut ghoul = Monster::new("ghoul", Pos::new(10, 10), 200, 5);
        ghoul.vulnerabilities = Vulnerability::LIGHT;
        let id = level.add_monster(ghoul).unwrap();
        level
            .add_monster(Monster::new("orc", Pos::new(12, 10), 200, 3))
            .unwrap();

        let outcome = light_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert_eq!(outcome.hits, 1, "only the light-hater is hurt");
        assert!(level.monsters.get(id).unwrap().hp < 200);
    }

    #[test]
    fn test_disarm_line_clears_trap_and_unlocks_door() {
        let mut level = open_level();
        let config = GenConfig::default();

        level.place_object(Pos::new(8, 10), ObjectKind::Trap(crate::object::TrapKind::Dart));
        level.place_object(
            Pos::new(11, 10),
            ObjectKind::Door(DoorState::Locked(14)),
        );
        level.grid[Pos::new(11, 10)].kind = TileKind::BlockedFloor;

        let outcome = disarm_line(&mut level, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert!(level.object_at(Pos::new(8, 10)).is_none());
        // The locked door is now merely closed, and the ray stopped there.
        assert_eq!(
            level.object_at(Pos::new(11, 10)).unwrap().1.kind,
            ObjectKind::Door(DoorState::Closed)
        );
    }

    #[test]
    fn test_disarm_line_reveals_secret_door() {
        let mut level = open_level();
        let config = GenConfig::default();

        level.place_object(Pos::new(9, 10), ObjectKind::Door(DoorState::Secret));
        level.grid[Pos::new(9, 10)].kind = TileKind::BlockedFloor;

        disarm_line(&mut level, &config, Dir::East, Pos::new(5, 10));
        assert_eq!(
            level.object_at(Pos::new(9, 10)).unwrap().1.kind,
            ObjectKind::Door(DoorState::Closed)
        );
        assert!(
            level.grid[Pos::new(9, 10)]
                .flags
                .contains(TileFlags::FIELD_MARK)
        );
    }

    #[test]
    fn test_sleep_line_puts_weak_monster_to_sleep() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        let id = level.add_monster(low_level_monster(Pos::new(10, 10))).unwrap();

        let outcome = sleep_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert_eq!(level.monsters.get(id).unwrap().sleep, 500);
    }

    #[test]
    fn test_sleep_line_respects_sleepless() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        let mut golem = low_level_monster(Pos::new(10, 10));
        golem.flags = MonsterFlags::NO_SLEEP;
        let id = level.add_monster(golem).unwrap();

        let outcome = sleep_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(!outcome.affected);
        assert_eq!(level.monsters.get(id).unwrap().sleep, 0);
        assert!(outcome.messages.iter().any(|m| m.contains("unaffected")));
    }

    #[test]
    fn test_confuse_line_stacks() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        let id = level.add_monster(low_level_monster(Pos::new(10, 10))).unwrap();

        confuse_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        let first = level.monsters.get(id).unwrap().confused;
        assert!(first >= 3, "initial confusion is 2 + rnd(16)");

        confuse_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert_eq!(level.monsters.get(id).unwrap().confused, first + 3);
    }

    #[test]
    fn test_speed_line_slows_and_wakes() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        let mut rat = low_level_monster(Pos::new(10, 10));
        rat.sleep = 200;
        let id = level.add_monster(rat).unwrap();

        let outcome = speed_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10), -1);
        assert!(outcome.affected);
        let rat = level.monsters.get(id).unwrap();
        assert_eq!(rat.speed, -1);
        assert_eq!(rat.sleep, 0);
    }

    #[test]
    fn test_polymorph_replaces_weak_monster() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        level.add_monster(low_level_monster(Pos::new(10, 10))).unwrap();

        let outcome = polymorph_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert_eq!(level.monsters.len(), 1);
        let id = level.monster_at(Pos::new(10, 10)).unwrap();
        assert_ne!(level.monsters.get(id).unwrap().level, 0);
    }

    #[test]
    fn test_teleport_line_moves_every_monster_in_path() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        level.add_monster(low_level_monster(Pos::new(10, 10))).unwrap();
        level.add_monster(low_level_monster(Pos::new(13, 10))).unwrap();

        let outcome = teleport_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert_eq!(level.monster_at(Pos::new(10, 10)), None);
        assert_eq!(level.monster_at(Pos::new(13, 10)), None);
        assert_eq!(level.monsters.len(), 2);
    }

    #[test]
    fn test_wall_to_mud_consumes_one_wall() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        level.grid[Pos::new(9, 10)].kind = TileKind::Granite;
        level.grid[Pos::new(10, 10)].kind = TileKind::Granite;
        level.grid[Pos::new(9, 10)].flags |= TileFlags::PERM_LIT;

        let outcome = wall_to_mud(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert_eq!(level.grid[Pos::new(9, 10)].kind, TileKind::Corridor);
        // The second wall is untouched: the ray stops at the first.
        assert_eq!(level.grid[Pos::new(10, 10)].kind, TileKind::Granite);
    }

    #[test]
    fn test_wall_to_mud_never_breaches_boundary() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();

        wall_to_mud(&mut level, &mut rng, &config, Dir::East, Pos::new(37, 10));
        assert_eq!(level.grid[Pos::new(39, 10)].kind, TileKind::Boundary);
    }

    #[test]
    fn test_wall_to_mud_dissolves_stone_creatures() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        let mut golem = Monster::new("stone golem", Pos::new(10, 10), 50, 10);
        golem.vulnerabilities = Vulnerability::STONE;
        level.add_monster(golem).unwrap();

        let outcome = wall_to_mud(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert_eq!(outcome.kills, 1);
        assert!(outcome.messages.iter().any(|m| m.contains("dissolves")));
    }

    #[test]
    fn test_destroy_doors_line_flashes_per_object() {
        let mut level = open_level();
        let config = GenConfig::default();
        level.place_object(Pos::new(7, 10), ObjectKind::Door(DoorState::Closed));
        level.grid[Pos::new(7, 10)].kind = TileKind::BlockedFloor;
        level.place_object(Pos::new(9, 10), ObjectKind::Trap(crate::object::TrapKind::Teleport));

        let outcome = destroy_doors_line(&mut level, &config, Dir::East, Pos::new(5, 10));
        assert_eq!(outcome.messages.len(), 2);
        assert!(level.object_at(Pos::new(7, 10)).is_none());
        assert!(level.object_at(Pos::new(9, 10)).is_none());
        // The melted door tile reverts to corridor.
        assert_eq!(level.grid[Pos::new(7, 10)].kind, TileKind::Corridor);
    }

    #[test]
    fn test_build_wall_crushes_and_heals() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();

        let victim = level
            .add_monster(Monster::new("orc", Pos::new(8, 10), 500, 3))
            .unwrap();
        let mut xorn = Monster::new("xorn", Pos::new(12, 10), 60, 8);
        xorn.flags = MonsterFlags::PHASES | MonsterFlags::EATS_ROCK;
        level.add_monster(xorn).unwrap();

        let outcome = build_wall_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        // The wall stops at the first non-phasing victim...
        assert_eq!(level.grid[Pos::new(6, 10)].kind, TileKind::Magma);
        assert_eq!(level.grid[Pos::new(8, 10)].kind, TileKind::Magma);
        assert_eq!(level.grid[Pos::new(9, 10)].kind, TileKind::LitFloor);
        assert!(level.monsters.get(victim).unwrap().hp < 500);
        // ...and the rock-eater behind was never reached.
        let xorn_id = level.monster_at(Pos::new(12, 10)).unwrap();
        assert_eq!(level.monsters.get(xorn_id).unwrap().hp, 60);
    }

    #[test]
    fn test_build_wall_kills_sessile_outright() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        let mut mold = Monster::new("mold", Pos::new(8, 10), 900, 10);
        mold.flags = MonsterFlags::SESSILE;
        level.add_monster(mold).unwrap();

        let outcome = build_wall_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert_eq!(outcome.kills, 1);
        assert!(
            outcome
                .messages
                .iter()
                .any(|m| m.contains("embedded in the rock"))
        );
    }

    #[test]
    fn test_clone_line_duplicates_first_monster() {
        let mut level = open_level();
        let mut rng = GameRng::new(3);
        let config = GenConfig::default();
        level
            .add_monster(Monster::new("orc", Pos::new(10, 10), 30, 3))
            .unwrap();

        let outcome = clone_line(&mut level, &mut rng, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert_eq!(level.monsters.len(), 2);
        let twins: Vec<_> = level.monsters.iter().filter(|(_, m)| m.name == "orc").collect();
        assert_eq!(twins.len(), 2);
    }

    #[test]
    fn test_drain_life_spares_undead() {
        let mut level = open_level();
        let config = GenConfig::default();
        let mut skeleton = Monster::new("skeleton", Pos::new(10, 10), 40, 6);
        skeleton.flags = MonsterFlags::UNDEAD;
        let id = level.add_monster(skeleton).unwrap();

        let outcome = drain_life(&mut level, &config, Dir::East, Pos::new(5, 10));
        assert!(!outcome.affected);
        assert_eq!(level.monsters.get(id).unwrap().hp, 40);

        // A living target takes the full 75.
        let mut level = open_level();
        let mut fire_drake = Monster::new("fire drake", Pos::new(10, 10), 100, 12);
        fire_drake.breaths = BreathAffinity::FIRE;
        let id = level.add_monster(fire_drake).unwrap();
        let outcome = drain_life(&mut level, &config, Dir::East, Pos::new(5, 10));
        assert!(outcome.affected);
        assert_eq!(level.monsters.get(id).unwrap().hp, 25);
    }
}
