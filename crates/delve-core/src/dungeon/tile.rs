//! Map tile types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::monster::MonsterId;
use crate::object::ObjectId;

/// Terrain kind of one grid cell.
///
/// `Empty`, `TmpWall` and `PendingWall` only exist while a level is being
/// generated; the fill pass converts them before the level goes live.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TileKind {
    /// Undecided rock, generation only.
    #[default]
    Empty = 0,
    /// Room floor, naturally dark.
    DarkFloor = 1,
    /// Room floor, naturally lit.
    LitFloor = 2,
    /// Corridor floor.
    Corridor = 3,
    /// Floor carrying a closed, locked, stuck or secret door object.
    BlockedFloor = 4,
    /// Room-builder inner-wall marker, generation only.
    TmpWall = 8,
    /// Tunneler wall marker, generation only.
    PendingWall = 9,
    /// Plain rock.
    Granite = 12,
    /// Magma vein.
    Magma = 13,
    /// Quartz vein.
    Quartz = 14,
    /// Sealed map edge; immutable once placed.
    Boundary = 15,
}

impl TileKind {
    /// Room floor (lit or dark).
    pub const fn is_room_floor(&self) -> bool {
        matches!(self, TileKind::DarkFloor | TileKind::LitFloor)
    }

    /// Any floor a creature can occupy.
    pub const fn is_floor(&self) -> bool {
        matches!(
            self,
            TileKind::DarkFloor | TileKind::LitFloor | TileKind::Corridor | TileKind::BlockedFloor
        )
    }

    /// Open space: walkable floors plus not-yet-filled rock during
    /// generation. A blocked floor is closed space until its door goes.
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            TileKind::Empty | TileKind::DarkFloor | TileKind::LitFloor | TileKind::Corridor
        )
    }

    /// Closed space occludes sight lines and stops rays.
    pub const fn blocks_sight(&self) -> bool {
        !self.is_open()
    }

    /// Finished rock. The temporary generation markers do not count.
    pub const fn is_wall(&self) -> bool {
        matches!(
            self,
            TileKind::Granite | TileKind::Magma | TileKind::Quartz | TileKind::Boundary
        )
    }

    /// Mineral vein carved by a streamer.
    pub const fn is_vein(&self) -> bool {
        matches!(self, TileKind::Magma | TileKind::Quartz)
    }

    /// Display character.
    pub const fn symbol(&self) -> char {
        match self {
            TileKind::Empty => ' ',
            TileKind::DarkFloor | TileKind::LitFloor => '.',
            TileKind::Corridor => '#',
            TileKind::BlockedFloor => '+',
            TileKind::TmpWall | TileKind::PendingWall => '%',
            TileKind::Granite | TileKind::Boundary => '#',
            TileKind::Magma => '*',
            TileKind::Quartz => '*',
        }
    }
}

bitflags! {
    /// Per-tile state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        /// Tile was stamped by a room builder; room-block lighting and
        /// terrain edits consult this.
        const IN_ROOM = 0x01;
        /// Permanently lit.
        const PERM_LIT = 0x02;
        /// Temporarily lit (light source).
        const TEMP_LIT = 0x04;
        /// Player has seen an object here.
        const FIELD_MARK = 0x08;
    }
}

// Manual serde impl for TileFlags
impl Serialize for TileFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(TileFlags::from_bits_truncate(bits))
    }
}

/// Door state, carried by a door object sitting on its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Open,
    /// Open and can never be closed again.
    Broken,
    Closed,
    /// Closed with a lock of the given pick difficulty.
    Locked(u8),
    /// Jammed shut; the value is the bash difficulty.
    Stuck(u8),
    /// Indistinguishable from wall until discovered.
    Secret,
}

impl DoorState {
    /// Whether a creature can walk through without opening anything.
    pub const fn is_passable(&self) -> bool {
        matches!(self, DoorState::Open | DoorState::Broken)
    }
}

/// Who is standing on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    Player,
    Monster(MonsterId),
}

/// A single map cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain kind.
    pub kind: TileKind,

    /// State bits.
    pub flags: TileFlags,

    /// Object occupying the tile, if any. At most one.
    pub object: Option<ObjectId>,

    /// Creature standing here, if any. At most one.
    pub occupant: Option<Occupant>,
}

impl Tile {
    pub const fn of(kind: TileKind) -> Self {
        Self {
            kind,
            flags: TileFlags::empty(),
            object: None,
            occupant: None,
        }
    }

    /// Whether the tile is currently lit by any source.
    pub fn is_lit(&self) -> bool {
        self.flags
            .intersects(TileFlags::PERM_LIT | TileFlags::TEMP_LIT)
    }

    /// True if a monster (not the player) stands here.
    pub fn has_monster(&self) -> bool {
        matches!(self.occupant, Some(Occupant::Monster(_)))
    }

    /// The monster standing here, if any.
    pub fn monster(&self) -> Option<MonsterId> {
        match self.occupant {
            Some(Occupant::Monster(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(TileKind::LitFloor.is_room_floor());
        assert!(TileKind::DarkFloor.is_room_floor());
        assert!(!TileKind::Corridor.is_room_floor());

        assert!(TileKind::BlockedFloor.is_floor());
        assert!(!TileKind::BlockedFloor.is_open());
        assert!(TileKind::BlockedFloor.blocks_sight());
        assert!(!TileKind::Empty.is_floor());
        assert!(TileKind::Empty.is_open());

        assert!(TileKind::Granite.is_wall());
        assert!(TileKind::Boundary.is_wall());
        assert!(!TileKind::TmpWall.is_wall());
        assert!(TileKind::TmpWall.blocks_sight());

        assert!(TileKind::Magma.is_vein());
        assert!(!TileKind::Granite.is_vein());
    }

    #[test]
    fn test_door_passability() {
        assert!(DoorState::Open.is_passable());
        assert!(DoorState::Broken.is_passable());
        assert!(!DoorState::Closed.is_passable());
        assert!(!DoorState::Locked(12).is_passable());
        assert!(!DoorState::Stuck(14).is_passable());
        assert!(!DoorState::Secret.is_passable());
    }

    #[test]
    fn test_tile_lighting() {
        let mut tile = Tile::of(TileKind::DarkFloor);
        assert!(!tile.is_lit());
        tile.flags |= TileFlags::TEMP_LIT;
        assert!(tile.is_lit());
        tile.flags = TileFlags::PERM_LIT;
        assert!(tile.is_lit());
    }

    #[test]
    fn test_tile_flags_serde_roundtrip() {
        let flags = TileFlags::IN_ROOM | TileFlags::PERM_LIT;
        let json = serde_json::to_string(&flags).unwrap();
        let back: TileFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(flags, back);
    }
}
