//! Corridor carving between room anchors.
//!
//! The tunneler random-walks from one anchor toward the next, re-aiming
//! most steps but sometimes wandering, chewing through granite and
//! recording where it pierced room walls so doorways can grow there.

use super::feature::place_door;
use super::level::Level;
use super::tile::TileKind;
use crate::config::GenConfig;
use crate::pos::Pos;
use crate::rng::GameRng;

/// Direction step as (dx, dy), axis-aligned.
fn aim_dir(rng: &mut GameRng, from: Pos, to: Pos) -> (i32, i32) {
    let mut dy = (to.y - from.y).signum();
    let mut dx = (to.x - from.x).signum();
    // Tunnels only move on one axis per step; break diagonal aims randomly.
    if dy != 0 && dx != 0 {
        if rng.rnd(2) == 1 {
            dy = 0;
        } else {
            dx = 0;
        }
    }
    (dx, dy)
}

fn wander_dir(rng: &mut GameRng) -> (i32, i32) {
    match rng.rnd(4) {
        1 => (0, -1),
        2 => (0, 1),
        3 => (-1, 0),
        _ => (1, 0),
    }
}

/// Carve a corridor from `from` to `to`.
///
/// Wall cells the walk pierces become doors or corridor in a post-pass;
/// contact points with existing corridors are appended to `door_sites`
/// for the assembler's junction-door pass. The walk gives up where it
/// stands once the step cap is reached; overall level connectivity comes
/// from tunneling the full room cycle, not from any single call.
pub fn build_tunnel(
    level: &mut Level,
    rng: &mut GameRng,
    config: &GenConfig,
    from: Pos,
    to: Pos,
    door_sites: &mut Vec<Pos>,
) {
    let mut tunnel_cells: Vec<Pos> = Vec::new();
    let mut wall_cells: Vec<Pos> = Vec::new();

    let mut cur = from;
    let mut door_flag = false;
    let mut stop_flag = false;
    let mut steps = 0u32;
    let (mut dx, mut dy) = aim_dir(rng, cur, to);

    loop {
        steps += 1;
        if steps > config.tunnel_step_cap {
            stop_flag = true;
        }

        if rng.rnd(100) > config.tunnel_keep_heading {
            if rng.one_in(config.tunnel_wander_one_in) {
                (dx, dy) = wander_dir(rng);
            } else {
                (dx, dy) = aim_dir(rng, cur, to);
            }
        }

        let mut next = cur.shift(dx, dy);
        let mut redirects = 0;
        while !level.grid.in_bounds(next) {
            if redirects < 100 && rng.one_in(config.tunnel_wander_one_in) {
                (dx, dy) = wander_dir(rng);
            } else {
                (dx, dy) = aim_dir(rng, cur, to);
            }
            redirects += 1;
            next = cur.shift(dx, dy);
        }

        match level.grid[next].kind {
            TileKind::Empty => {
                cur = next;
                tunnel_cells.push(cur);
                door_flag = false;
            }
            // Already marked by an earlier wall piercing; don't advance.
            TileKind::PendingWall => {}
            TileKind::Granite => {
                cur = next;
                wall_cells.push(cur);
                // Mark the pierced cell and its granite neighbours so the
                // post-pass can turn the piercing into a doorway.
                for y in (cur.y - 1)..=(cur.y + 1) {
                    for x in (cur.x - 1)..=(cur.x + 1) {
                        let p = Pos::new(x, y);
                        if level.grid.in_bounds(p) && level.grid[p].kind == TileKind::Granite {
                            level.grid[p].kind = TileKind::PendingWall;
                        }
                    }
                }
            }
            TileKind::Corridor | TileKind::BlockedFloor => {
                cur = next;
                if !door_flag {
                    door_sites.push(cur);
                    door_flag = true;
                }
                if rng.rnd(100) > config.tunnel_stop_threshold {
                    // Only stop on corridor contact once the tunnel has
                    // come a reasonable way; stopping early strands rooms.
                    let dy = (cur.y - from.y).abs();
                    let dx = (cur.x - from.x).abs();
                    if dy > 10 || dx > 10 {
                        stop_flag = true;
                    }
                }
            }
            // Room floor, inner-wall markers, veins: walk straight through.
            _ => {
                cur = next;
            }
        }

        if (cur == to) || stop_flag {
            break;
        }
    }

    for pos in tunnel_cells {
        level.grid[pos].kind = TileKind::Corridor;
    }

    for pos in wall_cells {
        if level.grid[pos].kind == TileKind::PendingWall {
            if rng.rnd(100) < config.tunnel_door_chance {
                place_door(level, rng, pos);
            } else {
                // These have to be doorways into rooms.
                level.grid[pos].kind = TileKind::Corridor;
            }
        }
    }
}
