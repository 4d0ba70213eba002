//! The shared ray-walking primitive behind every directed spell.

use crate::dungeon::Level;
use crate::pos::{Dir, Pos};

/// What a ray visitor wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayControl {
    Continue,
    Stop,
}

/// Step a ray cell by cell from `origin` (exclusive) in `dir`.
///
/// The visitor receives each visited position and its step distance and
/// decides whether to keep going; the walk also ends past `range` or at
/// the map edge. Stopping rules differ per spell - a bolt stops before a
/// wall, stone-to-mud consumes it - so they live in the visitor, not
/// here.
pub fn cast_ray<F>(level: &mut Level, origin: Pos, dir: Dir, range: i32, mut visitor: F)
where
    F: FnMut(&mut Level, Pos, i32) -> RayControl,
{
    let mut pos = origin;
    let mut dist = 0;
    loop {
        let Some(next) = level.grid.step(pos, dir) else {
            break;
        };
        pos = next;
        dist += 1;
        if dist > range {
            break;
        }
        if visitor(level, pos, dist) == RayControl::Stop {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::TileKind;

    fn open_level() -> Level {
        let mut level = Level::new(3, 40, 20);
        for pos in level.grid.positions().collect::<Vec<_>>() {
            level.grid[pos].kind = TileKind::LitFloor;
        }
        level.grid.seal_border();
        level
    }

    #[test]
    fn test_ray_visits_cells_in_order() {
        let mut level = open_level();
        let mut visited = Vec::new();
        cast_ray(
            &mut level,
            Pos::new(5, 10),
            Dir::East,
            4,
            |_, pos, dist| {
                visited.push((pos, dist));
                RayControl::Continue
            },
        );
        assert_eq!(
            visited,
            vec![
                (Pos::new(6, 10), 1),
                (Pos::new(7, 10), 2),
                (Pos::new(8, 10), 3),
                (Pos::new(9, 10), 4),
            ]
        );
    }

    #[test]
    fn test_ray_stops_when_told() {
        let mut level = open_level();
        let mut count = 0;
        cast_ray(
            &mut level,
            Pos::new(5, 10),
            Dir::SouthEast,
            100,
            |level, pos, _| {
                count += 1;
                if level.grid[pos].kind.blocks_sight() {
                    RayControl::Stop
                } else {
                    RayControl::Continue
                }
            },
        );
        // From (5,10) going south-east the border is reached after 9
        // diagonal steps; the boundary tile itself is visited, then stops.
        assert_eq!(count, 9);
    }

    #[test]
    fn test_ray_is_deterministic() {
        let collect = || {
            let mut level = open_level();
            let mut visited = Vec::new();
            cast_ray(
                &mut level,
                Pos::new(3, 3),
                Dir::SouthEast,
                8,
                |_, pos, _| {
                    visited.push(pos);
                    RayControl::Continue
                },
            );
            visited
        };
        assert_eq!(collect(), collect());
    }
}
