//! Bolts, balls and breath weapons.

use super::effect::EffectKind;
use super::ray::{RayControl, cast_ray};
use super::EffectOutcome;
use crate::config::GenConfig;
use crate::dungeon::{Level, Occupant, distance};
use crate::monster::MonsterId;
use crate::pos::{Dir, Pos};

/// Double for vulnerability, quarter for an innate breath of the same
/// kind; attenuation is the caller's business.
fn scaled_damage(level: &Level, id: MonsterId, kind: EffectKind, base: i32) -> i32 {
    let Some(monster) = level.monsters.get(id) else {
        return base;
    };
    if monster.vulnerabilities.intersects(kind.harm_bit()) {
        base * 2
    } else if monster.breaths.intersects(kind.breath_bit()) {
        base / 4
    } else {
        base
    }
}

/// Shoot a bolt: the ray stops at the first monster or closed tile, and
/// the full damage lands on that one target. Damage dice are the
/// caller's; resolution itself draws nothing.
pub fn fire_bolt(
    level: &mut Level,
    config: &GenConfig,
    kind: EffectKind,
    dir: Dir,
    origin: Pos,
    damage: i32,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    cast_ray(
        level,
        origin,
        dir,
        config.bolt_range,
        |level, pos, _dist| {
            if level.grid[pos].kind.blocks_sight() {
                return RayControl::Stop;
            }
            if let Some(id) = level.monster_at(pos) {
                let label = level.monsters.get(id).map(|m| m.label()).unwrap_or_default();
                outcome.say(format!("The {} strikes {}.", kind.name(), label));
                let dam = scaled_damage(level, id, kind, damage);
                outcome.hits += 1;
                outcome.affected = true;
                if let Some(exp) = level.monster_take_hit(id, dam) {
                    outcome.say(format!("{} dies in a fit of agony.", label));
                    outcome.kills += 1;
                    outcome.experience += exp;
                } else if dam > 0 {
                    outcome.say(format!("{} screams in agony.", label));
                }
                return RayControl::Stop;
            }
            RayControl::Continue
        },
    );

    outcome
}

/// Resolve the disc of a ball or breath around `center`: every cell
/// within the radius that also has line of sight to the center.
///
/// Damage attenuates by `1 / (distance + 1)` after the vulnerability
/// scaling. `source` carries the breathing monster's slot for the
/// deferred-deletion rule; `None` means the player (or nobody iterating)
/// is responsible and immediate removal is always safe.
#[allow(clippy::too_many_arguments)]
fn explode(
    level: &mut Level,
    kind: EffectKind,
    center: Pos,
    radius: i32,
    damage: i32,
    affect_player: bool,
    grant_exp: bool,
    source: Option<MonsterId>,
    outcome: &mut EffectOutcome,
) {
    for y in (center.y - radius)..=(center.y + radius) {
        for x in (center.x - radius)..=(center.x + radius) {
            let pos = Pos::new(x, y);
            if !level.grid.in_bounds(pos)
                || distance(center, pos) > radius
                || !level.grid.line_of_sight(center, pos)
            {
                continue;
            }

            if let Some((_, object)) = level.object_at(pos) {
                if kind.destroys(&object.kind) {
                    level.delete_object_at(pos);
                }
            }

            if !level.grid[pos].kind.is_open() {
                continue;
            }

            match level.grid[pos].occupant {
                Some(Occupant::Monster(id)) => {
                    let dam =
                        scaled_damage(level, id, kind, damage) / (distance(center, pos) + 1);
                    outcome.hits += 1;
                    outcome.affected = true;

                    if grant_exp {
                        if let Some(exp) = level.monster_take_hit(id, dam) {
                            outcome.kills += 1;
                            outcome.experience += exp;
                        }
                    } else {
                        // Breath path: no experience, and a victim in a
                        // slot the external monster loop has not reached
                        // yet must only be marked, not compacted away.
                        let mut killed = false;
                        if let Some(monster) = level.monsters.get_mut(id) {
                            monster.hp -= dam;
                            monster.sleep = 0;
                            killed = monster.hp < 0;
                        }
                        if killed {
                            outcome.kills += 1;
                            match source {
                                Some(src) if id <= src => level.defer_remove_monster(id),
                                _ => {
                                    level.remove_monster(id);
                                }
                            }
                        }
                    }
                }
                Some(Occupant::Player) if affect_player => {
                    let mut dam = damage / (distance(center, pos) + 1);
                    if dam == 0 {
                        // At least one point; gas in the face is never free.
                        dam = 1;
                    }
                    outcome.player_damage += dam;
                    outcome.say(kind.breath_hits_you());
                    outcome.affected = true;
                }
                _ => {}
            }
        }
    }
}

/// Shoot a ball: travels like a bolt, then explodes with the configured
/// radius where it lands. The explosion center backs off a closed tile.
pub fn fire_ball(
    level: &mut Level,
    config: &GenConfig,
    kind: EffectKind,
    dir: Dir,
    origin: Pos,
    damage: i32,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();

    let mut prev = origin;
    let mut burst: Option<Pos> = None;
    cast_ray(
        level,
        origin,
        dir,
        config.bolt_range,
        |level, pos, _dist| {
            if level.grid[pos].kind.blocks_sight() {
                burst = Some(prev);
                return RayControl::Stop;
            }
            if level.grid[pos].has_monster() {
                burst = Some(pos);
                return RayControl::Stop;
            }
            prev = pos;
            RayControl::Continue
        },
    );

    // Out of range without hitting anything: the ball fizzles.
    let Some(center) = burst else {
        return outcome;
    };

    explode(
        level,
        kind,
        center,
        config.ball_radius,
        damage,
        false,
        true,
        None,
        &mut outcome,
    );

    match outcome.hits {
        0 => {}
        1 => outcome.say(format!("The {} envelops a creature!", kind.name())),
        _ => outcome.say(format!("The {} envelops several creatures!", kind.name())),
    }
    match outcome.kills {
        0 => {}
        1 => outcome.say("There is a scream of agony!"),
        _ => outcome.say("There are several screams of agony!"),
    }

    outcome
}

/// A breath weapon: an explosion centered on the target with no travel,
/// washing over the player too. Kills grant no experience, and a victim
/// whose slot the breathing monster's turn loop has already passed is
/// removed immediately while later slots are only marked dead.
pub fn breath(
    level: &mut Level,
    config: &GenConfig,
    kind: EffectKind,
    center: Pos,
    damage: i32,
    source: Option<MonsterId>,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::new();
    explode(
        level,
        kind,
        center,
        config.ball_radius,
        damage,
        true,
        false,
        source,
        &mut outcome,
    );
    outcome
}
