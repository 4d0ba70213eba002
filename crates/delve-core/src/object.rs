//! Objects anchored to tiles: staircases, doors, traps, treasure.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::DoorState;
use crate::rng::GameRng;

/// Slot index into the [`ObjectTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Trap kinds, uniformly drawn at placement time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum TrapKind {
    OpenPit,
    Arrow,
    CoveredPit,
    TrapDoor,
    SleepGas,
    LooseRock,
    Dart,
    ConfuseGas,
    PoisonGas,
    BlindGas,
    DaggerPit,
    Teleport,
    RockFall,
    CorrodeGas,
    Summon,
    FallingFloor,
    Alarm,
}

impl TrapKind {
    pub const ALL: [TrapKind; 17] = [
        TrapKind::OpenPit,
        TrapKind::Arrow,
        TrapKind::CoveredPit,
        TrapKind::TrapDoor,
        TrapKind::SleepGas,
        TrapKind::LooseRock,
        TrapKind::Dart,
        TrapKind::ConfuseGas,
        TrapKind::PoisonGas,
        TrapKind::BlindGas,
        TrapKind::DaggerPit,
        TrapKind::Teleport,
        TrapKind::RockFall,
        TrapKind::CorrodeGas,
        TrapKind::Summon,
        TrapKind::FallingFloor,
        TrapKind::Alarm,
    ];

    /// Uniform random trap kind.
    pub fn random(rng: &mut GameRng) -> TrapKind {
        Self::ALL[rng.rn2(Self::ALL.len() as u32) as usize]
    }
}

/// What an object is. Identity is fixed at placement; only door states
/// transition afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    UpStaircase,
    DownStaircase,
    Door(DoorState),
    Trap(TrapKind),
    /// Collapsed rock left by terrain destruction.
    Rubble,
    Gold(u32),
    /// An item drop; `great` marks vault-quality treasure.
    Treasure { great: bool },
    /// Entrance to one of the town shop fronts.
    StoreEntrance(u8),
}

impl ObjectKind {
    pub const fn is_door(&self) -> bool {
        matches!(self, ObjectKind::Door(_))
    }

    pub const fn is_trap(&self) -> bool {
        matches!(self, ObjectKind::Trap(_))
    }

    pub const fn is_staircase(&self) -> bool {
        matches!(self, ObjectKind::UpStaircase | ObjectKind::DownStaircase)
    }
}

/// One placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub kind: ObjectKind,
}

impl Object {
    pub const fn new(kind: ObjectKind) -> Self {
        Self { kind }
    }
}

/// Slot-addressed object storage. Removal leaves a free slot that later
/// placements reuse, so tile references stay stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectTable {
    slots: Vec<Option<Object>>,
    free: Vec<u32>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: Object) -> ObjectId {
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(object);
            ObjectId(slot)
        } else {
            self.slots.push(Some(object));
            ObjectId(self.slots.len() as u32 - 1)
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Object> {
        let object = self.slots.get_mut(id.0 as usize)?.take();
        if object.is_some() {
            self.free.push(id.0);
        }
        object
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (ObjectId(i as u32), o)))
    }
}
