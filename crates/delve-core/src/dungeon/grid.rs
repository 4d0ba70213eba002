//! The level grid: bounds, distance and line-of-sight queries.

use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::tile::{Tile, TileKind};
use crate::pos::{Dir, Pos};

/// Distance metric used for sight ranges and blast radii: the larger axis
/// delta plus half the smaller, so a pure diagonal step costs 1.
pub fn distance(a: Pos, b: Pos) -> i32 {
    let dy = (a.y - b.y).abs();
    let dx = (a.x - b.x).abs();
    ((dy + dx) * 2 - dy.min(dx)) / 2
}

/// A 2D grid of tiles. Exactly one grid is live at a time; it is rebuilt
/// from scratch on every level transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a blank grid of undecided rock.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width >= 3 && height >= 3, "grid too small to seal");
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Anywhere on the map, border included.
    pub fn on_map(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Strictly inside the sealed border.
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x > 0 && pos.x < self.width - 1 && pos.y > 0 && pos.y < self.height - 1
    }

    /// One step in a direction; `None` when the step would leave the map.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let next = pos.shift(dx, dy);
        self.on_map(next).then_some(next)
    }

    /// Get a tile without panicking on bad coordinates.
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        self.on_map(pos)
            .then(|| &self.tiles[(pos.y * self.width + pos.x) as usize])
    }

    /// Count of solid walls among the four orthogonal neighbours.
    pub fn next_to_walls(&self, pos: Pos) -> u32 {
        pos.neighbors_4()
            .iter()
            .filter(|&&n| self.on_map(n) && self[n].kind.is_wall())
            .count() as u32
    }

    /// Symmetric line-of-sight test: a→b and b→a always agree.
    ///
    /// Walks the line oriented along its longer axis, tracking the minor
    /// coordinate as a fraction scaled by `2 * |dx * dy|` so only integer
    /// arithmetic is needed. When the fraction crosses a tile boundary the
    /// extra corner cell is tested too, which is what keeps the test
    /// symmetric.
    pub fn line_of_sight(&self, from: Pos, to: Pos) -> bool {
        let delta_x = to.x - from.x;
        let delta_y = to.y - from.y;

        // Adjacent tiles (and the tile itself) are always visible.
        if delta_x.abs() < 2 && delta_y.abs() < 2 {
            return true;
        }

        if delta_x == 0 {
            let (lo, hi) = if delta_y < 0 {
                (to.y, from.y)
            } else {
                (from.y, to.y)
            };
            return ((lo + 1)..hi).all(|y| !self[Pos::new(from.x, y)].kind.blocks_sight());
        }

        if delta_y == 0 {
            let (lo, hi) = if delta_x < 0 {
                (to.x, from.x)
            } else {
                (from.x, to.x)
            };
            return ((lo + 1)..hi).all(|x| !self[Pos::new(x, from.y)].kind.blocks_sight());
        }

        let half_scale = (delta_x * delta_y).abs();
        let scale = half_scale * 2;
        let x_sign = if delta_x < 0 { -1 } else { 1 };
        let y_sign = if delta_y < 0 { -1 } else { 1 };

        if delta_x.abs() >= delta_y.abs() {
            // The fractional y offset starts at the first column boundary,
            // half a slope step in.
            let mut frac = delta_y * delta_y;
            let slope = frac * 2;
            let mut x = from.x + x_sign;
            let mut y = from.y;
            if frac == half_scale {
                y += y_sign;
                frac -= scale;
            }

            while x != to.x {
                if self[Pos::new(x, y)].kind.blocks_sight() {
                    return false;
                }
                frac += slope;
                match frac.cmp(&half_scale) {
                    Ordering::Less => x += x_sign,
                    Ordering::Greater => {
                        y += y_sign;
                        if self[Pos::new(x, y)].kind.blocks_sight() {
                            return false;
                        }
                        x += x_sign;
                        frac -= scale;
                    }
                    // The line meets a tile corner exactly.
                    Ordering::Equal => {
                        x += x_sign;
                        y += y_sign;
                        frac -= scale;
                    }
                }
            }
        } else {
            let mut frac = delta_x * delta_x;
            let slope = frac * 2;
            let mut y = from.y + y_sign;
            let mut x = from.x;
            if frac == half_scale {
                x += x_sign;
                frac -= scale;
            }

            while y != to.y {
                if self[Pos::new(x, y)].kind.blocks_sight() {
                    return false;
                }
                frac += slope;
                match frac.cmp(&half_scale) {
                    Ordering::Less => y += y_sign,
                    Ordering::Greater => {
                        x += x_sign;
                        if self[Pos::new(x, y)].kind.blocks_sight() {
                            return false;
                        }
                        y += y_sign;
                        frac -= scale;
                    }
                    Ordering::Equal => {
                        x += x_sign;
                        y += y_sign;
                        frac -= scale;
                    }
                }
            }
        }

        true
    }

    /// Iterate every position on the map, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    /// Replace every not-yet-decided tile (undecided rock and the two
    /// generation markers) with the given kind.
    pub fn fill_empty(&mut self, kind: TileKind) {
        for tile in &mut self.tiles {
            if matches!(
                tile.kind,
                TileKind::Empty | TileKind::TmpWall | TileKind::PendingWall
            ) {
                tile.kind = kind;
            }
        }
    }

    /// Seal the outer border with boundary wall.
    pub fn seal_border(&mut self) {
        let width = self.width;
        let height = self.height;
        for x in 0..width {
            self[Pos::new(x, 0)].kind = TileKind::Boundary;
            self[Pos::new(x, height - 1)].kind = TileKind::Boundary;
        }
        for y in 0..height {
            self[Pos::new(0, y)].kind = TileKind::Boundary;
            self[Pos::new(width - 1, y)].kind = TileKind::Boundary;
        }
    }
}

impl Index<Pos> for Grid {
    type Output = Tile;

    fn index(&self, pos: Pos) -> &Tile {
        debug_assert!(self.on_map(pos), "grid access out of bounds: {pos}");
        &self.tiles[(pos.y * self.width + pos.x) as usize]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Tile {
        debug_assert!(self.on_map(pos), "grid access out of bounds: {pos}");
        &mut self.tiles[(pos.y * self.width + pos.x) as usize]
    }
}
