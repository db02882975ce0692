//! Skill kind and rarity identifiers

use serde::{Deserialize, Serialize};

use crate::skills::catalog::{SkillDefinition, SKILL_CATALOG};

/// Rarity tier of a skill, 1 (Common) through 4 (Legendary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rarity {
    Common = 1,
    Uncommon = 2,
    Rare = 3,
    Legendary = 4,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
    ];

    /// Numeric tier (1-based)
    pub fn tier(self) -> u8 {
        self as u8
    }

    pub fn from_tier(tier: u8) -> Option<Rarity> {
        match tier {
            1 => Some(Rarity::Common),
            2 => Some(Rarity::Uncommon),
            3 => Some(Rarity::Rare),
            4 => Some(Rarity::Legendary),
            _ => None,
        }
    }

    /// Zero-based index into per-tier tables
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Display colour hint for the host UI
    pub fn color(self) -> &'static str {
        match self {
            Rarity::Common => "#FFFFFF",
            Rarity::Uncommon => "#00FF00",
            Rarity::Rare => "#0080FF",
            Rarity::Legendary => "#FF8000",
        }
    }
}

/// Gameplay area a skill touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    Scoring,
    Movement,
    Survival,
    Food,
    Size,
    Time,
    World,
    System,
}

/// Every skill the catalog defines
///
/// Declaration order is catalog order; draws and eligibility scans follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    // Common
    DoubleScore,
    SlowMovement,
    BasicShield,

    // Uncommon
    WallPasser,
    SteelBody,
    FoodMagnet,

    // Rare
    BodySplit,
    BodyGrowth,
    TimeRewind,

    // Legendary
    LuckyStar,
    GhostMode,
    ScoreFrenzy,
    WorldShrink,
    SecondChance,

    // System
    SkillSlotExpand,
}

impl SkillKind {
    pub const ALL: [SkillKind; 15] = [
        SkillKind::DoubleScore,
        SkillKind::SlowMovement,
        SkillKind::BasicShield,
        SkillKind::WallPasser,
        SkillKind::SteelBody,
        SkillKind::FoodMagnet,
        SkillKind::BodySplit,
        SkillKind::BodyGrowth,
        SkillKind::TimeRewind,
        SkillKind::LuckyStar,
        SkillKind::GhostMode,
        SkillKind::ScoreFrenzy,
        SkillKind::WorldShrink,
        SkillKind::SecondChance,
        SkillKind::SkillSlotExpand,
    ];

    /// Static catalog entry for this kind
    pub fn definition(self) -> &'static SkillDefinition {
        &SKILL_CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn rarity(self) -> Rarity {
        self.definition().rarity
    }

    pub fn max_activations(self) -> u32 {
        self.definition().max_activations
    }

    /// Duration in milliseconds, `PERMANENT` (-1) for permanent or instant skills
    pub fn duration_ms(self) -> i64 {
        self.definition().duration_ms
    }

    pub fn is_timed(self) -> bool {
        self.duration_ms() > 0
    }
}

impl std::fmt::Display for SkillKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.definition().icon, self.name())
    }
}
