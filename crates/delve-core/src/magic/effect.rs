//! Elemental effect kinds and their per-kind rules.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::monster::{BreathAffinity, Vulnerability};
use crate::object::ObjectKind;

/// Damage kinds carried by bolts, balls and breaths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum EffectKind {
    MagicMissile,
    Lightning,
    PoisonGas,
    Acid,
    Frost,
    Fire,
    HolyOrb,
}

impl EffectKind {
    /// Display name used in strike messages.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectKind::MagicMissile => "magic missile",
            EffectKind::Lightning => "lightning bolt",
            EffectKind::PoisonGas => "poison gas",
            EffectKind::Acid => "acid",
            EffectKind::Frost => "frost",
            EffectKind::Fire => "fire",
            EffectKind::HolyOrb => "holy orb",
        }
    }

    /// Vulnerability bit that doubles the damage.
    pub const fn harm_bit(&self) -> Vulnerability {
        match self {
            EffectKind::MagicMissile => Vulnerability::empty(),
            EffectKind::Lightning => Vulnerability::LIGHTNING,
            EffectKind::PoisonGas => Vulnerability::POISON,
            EffectKind::Acid => Vulnerability::ACID,
            EffectKind::Frost => Vulnerability::FROST,
            EffectKind::Fire => Vulnerability::FIRE,
            EffectKind::HolyOrb => Vulnerability::EVIL,
        }
    }

    /// Breath-affinity bit that quarters the damage.
    pub const fn breath_bit(&self) -> BreathAffinity {
        match self {
            EffectKind::MagicMissile => BreathAffinity::empty(),
            EffectKind::Lightning => BreathAffinity::LIGHTNING,
            EffectKind::PoisonGas => BreathAffinity::GAS,
            EffectKind::Acid => BreathAffinity::ACID,
            EffectKind::Frost => BreathAffinity::FROST,
            EffectKind::Fire => BreathAffinity::FIRE,
            EffectKind::HolyOrb => BreathAffinity::empty(),
        }
    }

    /// Whether this kind destroys a fragile object caught in the blast.
    pub fn destroys(&self, object: &ObjectKind) -> bool {
        match self {
            EffectKind::Fire | EffectKind::Frost | EffectKind::Acid | EffectKind::Lightning => {
                matches!(object, ObjectKind::Treasure { .. })
            }
            EffectKind::MagicMissile | EffectKind::PoisonGas | EffectKind::HolyOrb => false,
        }
    }

    /// The message spoken when the breath washes over the player.
    pub const fn breath_hits_you(&self) -> &'static str {
        match self {
            EffectKind::MagicMissile => "You are hit by magic missiles!",
            EffectKind::Lightning => "Lightning shoots through you!",
            EffectKind::PoisonGas => "You breathe in clouds of poison!",
            EffectKind::Acid => "You are covered in acid!",
            EffectKind::Frost => "Freezing air bites at your skin!",
            EffectKind::Fire => "You are enveloped in flames!",
            EffectKind::HolyOrb => "A holy force washes over you!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harm_and_breath_bits_pair_up() {
        assert_eq!(EffectKind::Fire.harm_bit(), Vulnerability::FIRE);
        assert_eq!(EffectKind::Fire.breath_bit(), BreathAffinity::FIRE);
        assert_eq!(EffectKind::Frost.harm_bit(), Vulnerability::FROST);
        assert_eq!(EffectKind::MagicMissile.harm_bit(), Vulnerability::empty());
        assert_eq!(EffectKind::HolyOrb.harm_bit(), Vulnerability::EVIL);
        assert_eq!(EffectKind::HolyOrb.breath_bit(), BreathAffinity::empty());
    }

    #[test]
    fn test_destructibility() {
        let loot = ObjectKind::Treasure { great: false };
        assert!(EffectKind::Fire.destroys(&loot));
        assert!(EffectKind::Acid.destroys(&loot));
        assert!(!EffectKind::MagicMissile.destroys(&loot));
        assert!(!EffectKind::Fire.destroys(&ObjectKind::Gold(10)));
        assert!(!EffectKind::Fire.destroys(&ObjectKind::UpStaircase));
    }
}
