//! Monster instances and the per-level monster table.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::pos::Pos;
use crate::rng::GameRng;

/// Slot index into the [`MonsterTable`].
///
/// Removal compacts the table, so an id is only stable until the next
/// removal; anything holding one across mutations must re-resolve through
/// the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub usize);

bitflags! {
    /// Damage kinds a monster is especially susceptible to. A matching
    /// harm bit doubles incoming elemental damage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Vulnerability: u16 {
        const FIRE = 0x0001;
        const FROST = 0x0002;
        const POISON = 0x0004;
        const ACID = 0x0008;
        const LIGHTNING = 0x0010;
        const LIGHT = 0x0020;
        const STONE = 0x0040;
        const EVIL = 0x0080;
    }
}

bitflags! {
    /// Breath weapons a monster innately wields. Matching damage is
    /// quartered: a fire-breather shrugs off fire.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BreathAffinity: u8 {
        const FIRE = 0x01;
        const FROST = 0x02;
        const GAS = 0x04;
        const ACID = 0x08;
        const LIGHTNING = 0x10;
    }
}

bitflags! {
    /// Classification and movement bits consulted by effect resolution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MonsterFlags: u8 {
        /// Immune to life drain and sleep.
        const UNDEAD = 0x01;
        /// Never sleeps or gets confused.
        const NO_SLEEP = 0x02;
        /// Passes through walls.
        const PHASES = 0x04;
        /// Rooted in place; walls raised over it are always fatal.
        const SESSILE = 0x08;
        /// Rock creature; heals when encased in stone.
        const EATS_ROCK = 0x10;
    }
}

macro_rules! bitflags_serde {
    ($name:ident, $repr:ty) => {
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.bits().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bits = <$repr>::deserialize(deserializer)?;
                Ok(<$name>::from_bits_truncate(bits))
            }
        }
    };
}

bitflags_serde!(Vulnerability, u16);
bitflags_serde!(BreathAffinity, u8);
bitflags_serde!(MonsterFlags, u8);

/// Names handed to depth-scaled spawns. Real stat tables are the host
/// game's concern; the core only needs enough identity for messages.
const SPAWN_NAMES: [&str; 12] = [
    "giant rat",
    "kobold",
    "cave spider",
    "orc",
    "skeleton",
    "ghoul",
    "wolf",
    "ogre",
    "wight",
    "troll",
    "wyvern",
    "balor",
];

/// A monster on the current level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub level: u8,
    /// Turns of sleep remaining; 0 = awake. Damage always wakes.
    pub sleep: i32,
    /// Confusion counter.
    pub confused: u8,
    /// Speed modifier relative to normal.
    pub speed: i8,
    /// Visible to the player right now.
    pub visible: bool,
    pub vulnerabilities: Vulnerability,
    pub breaths: BreathAffinity,
    pub flags: MonsterFlags,
    /// Marked for deferred removal; see [`MonsterTable::sweep`] callers.
    pub dead: bool,
}

impl Monster {
    pub fn new(name: impl Into<String>, pos: Pos, hp: i32, level: u8) -> Self {
        Self {
            name: name.into(),
            pos,
            hp,
            max_hp: hp,
            level,
            sleep: 0,
            confused: 0,
            speed: 0,
            visible: false,
            vulnerabilities: Vulnerability::empty(),
            breaths: BreathAffinity::empty(),
            flags: MonsterFlags::empty(),
            dead: false,
        }
    }

    /// Depth-scaled generic spawn.
    pub fn spawn(rng: &mut GameRng, depth: u16, pos: Pos, sleeping: bool) -> Self {
        let level = (depth as i32 + rng.rnd(3) as i32 - 2).clamp(1, u8::MAX as i32) as u8;
        let tier = (level as usize / 4).min(SPAWN_NAMES.len() - 1);
        let name = SPAWN_NAMES[rng.rn2(tier as u32 + 1) as usize];
        let hp = rng.dice(level as u32, 8) as i32;
        let mut monster = Monster::new(name, pos, hp.max(1), level);
        if sleeping {
            monster.sleep = rng.rnd(100) as i32 + 50;
        }
        monster
    }

    /// Experience awarded for the kill.
    pub fn exp_value(&self) -> u32 {
        self.level as u32 * 5
    }

    /// Message subject: named when visible, "it" otherwise.
    pub fn label(&self) -> String {
        if self.visible {
            format!("The {}", self.name)
        } else {
            "It".to_string()
        }
    }
}

/// All monsters on the current level, addressed by slot.
///
/// Removal swaps the last entry into the freed slot; callers iterating by
/// index must either walk downward or use the deferred-removal mark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterTable {
    monsters: Vec<Monster>,
}

impl MonsterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, monster: Monster) -> MonsterId {
        self.monsters.push(monster);
        MonsterId(self.monsters.len() - 1)
    }

    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(id.0)
    }

    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(id.0)
    }

    /// Remove by swap-compaction. Returns the removed monster and, when
    /// another monster was moved into the freed slot, its new id (the
    /// caller must refresh that monster's grid reference).
    pub fn swap_remove(&mut self, id: MonsterId) -> (Monster, Option<MonsterId>) {
        let removed = self.monsters.swap_remove(id.0);
        let moved = (id.0 < self.monsters.len()).then_some(id);
        (removed, moved)
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = MonsterId> {
        (0..self.monsters.len()).map(MonsterId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonsterId, &Monster)> {
        self.monsters
            .iter()
            .enumerate()
            .map(|(i, m)| (MonsterId(i), m))
    }
}
