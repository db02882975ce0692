//! Static skill definitions - the catalog every run draws from

use crate::core::types::PERMANENT;
use crate::skills::{EffectCategory, Rarity, SkillKind};

/// Definition of a skill kind
#[derive(Debug, Clone)]
pub struct SkillDefinition {
    pub kind: SkillKind,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub category: EffectCategory,
    /// Activations available on a fresh instance
    pub max_activations: u32,
    /// Milliseconds active once activated; `PERMANENT` never expires
    pub duration_ms: i64,
}

/// Global skill catalog, indexed by `SkillKind` declaration order
pub static SKILL_CATALOG: &[SkillDefinition] = &[
    // Common
    SkillDefinition {
        kind: SkillKind::DoubleScore,
        name: "Double Score",
        description: "Food score +100%",
        icon: "✖",
        rarity: Rarity::Common,
        category: EffectCategory::Scoring,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::SlowMovement,
        name: "Slow Movement",
        description: "Snake speed -50%",
        icon: "🐌",
        rarity: Rarity::Common,
        category: EffectCategory::Movement,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::BasicShield,
        name: "Basic Shield",
        description: "Immunity to 1 collision",
        icon: "🛡",
        rarity: Rarity::Common,
        category: EffectCategory::Survival,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    // Uncommon
    SkillDefinition {
        kind: SkillKind::WallPasser,
        name: "Wall Passer",
        description: "Can pass through boundaries",
        icon: "🚪",
        rarity: Rarity::Uncommon,
        category: EffectCategory::Movement,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::SteelBody,
        name: "Steel Body",
        description: "Complete immunity to self-collision",
        icon: "⚔",
        rarity: Rarity::Uncommon,
        category: EffectCategory::Survival,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::FoodMagnet,
        name: "Food Magnet",
        description: "Food moves toward snake head",
        icon: "🧲",
        rarity: Rarity::Uncommon,
        category: EffectCategory::Food,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    // Rare
    SkillDefinition {
        kind: SkillKind::BodySplit,
        name: "Body Split",
        description: "Snake body length halved",
        icon: "✂",
        rarity: Rarity::Rare,
        category: EffectCategory::Size,
        max_activations: 1,
        duration_ms: PERMANENT, // instant
    },
    SkillDefinition {
        kind: SkillKind::BodyGrowth,
        name: "Body Growth",
        description: "Snake body length doubled",
        icon: "📈",
        rarity: Rarity::Rare,
        category: EffectCategory::Size,
        max_activations: 1,
        duration_ms: PERMANENT, // instant
    },
    SkillDefinition {
        kind: SkillKind::TimeRewind,
        name: "Time Rewind",
        description: "Rewind 3 seconds every 5 food items",
        icon: "⏪",
        rarity: Rarity::Rare,
        category: EffectCategory::Time,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    // Legendary
    SkillDefinition {
        kind: SkillKind::LuckyStar,
        name: "Lucky Star",
        description: "25% chance to spawn double food",
        icon: "⭐",
        rarity: Rarity::Legendary,
        category: EffectCategory::Food,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::GhostMode,
        name: "Ghost Mode",
        description: "Collision volume reduced by 50%",
        icon: "👻",
        rarity: Rarity::Legendary,
        category: EffectCategory::Survival,
        max_activations: 1,
        duration_ms: 30_000,
    },
    SkillDefinition {
        kind: SkillKind::ScoreFrenzy,
        name: "Score Frenzy",
        description: "Consecutive food eating increases score",
        icon: "🔥",
        rarity: Rarity::Legendary,
        category: EffectCategory::Scoring,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::WorldShrink,
        name: "World Shrink",
        description: "Game area shrinks by 30%",
        icon: "🔄",
        rarity: Rarity::Legendary,
        category: EffectCategory::World,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    SkillDefinition {
        kind: SkillKind::SecondChance,
        name: "Second Chance",
        description: "Revive on first death",
        icon: "❤",
        rarity: Rarity::Legendary,
        category: EffectCategory::Survival,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
    // System
    SkillDefinition {
        kind: SkillKind::SkillSlotExpand,
        name: "Skill Slot Expand",
        description: "Adds one additional skill activation slot",
        icon: "📦",
        rarity: Rarity::Rare,
        category: EffectCategory::System,
        max_activations: 1,
        duration_ms: PERMANENT,
    },
];

/// Kinds that `kind` displaces when both would be active
///
/// Stored directionally: steel body displaces the basic shield but not the
/// other way round. Slow movement lists itself, which never matches because
/// an instance cannot be activated twice.
pub fn conflicts_with(kind: SkillKind) -> &'static [SkillKind] {
    match kind {
        SkillKind::SlowMovement => &[SkillKind::SlowMovement],
        SkillKind::BodyGrowth | SkillKind::BodySplit => {
            &[SkillKind::BodyGrowth, SkillKind::BodySplit]
        }
        SkillKind::SteelBody => &[SkillKind::BasicShield],
        _ => &[],
    }
}

/// All catalog kinds of one rarity, in catalog order
pub fn kinds_by_rarity(rarity: Rarity) -> Vec<SkillKind> {
    SKILL_CATALOG
        .iter()
        .filter(|def| def.rarity == rarity)
        .map(|def| def.kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_kind_order() {
        assert_eq!(SKILL_CATALOG.len(), SkillKind::ALL.len());
        for (i, kind) in SkillKind::ALL.iter().enumerate() {
            assert_eq!(SKILL_CATALOG[i].kind, *kind, "catalog entry {} out of order", i);
        }
    }

    #[test]
    fn test_every_skill_single_use() {
        for def in SKILL_CATALOG {
            assert_eq!(def.max_activations, 1, "{} should be single-use", def.name);
        }
    }

    #[test]
    fn test_rarity_counts() {
        assert_eq!(kinds_by_rarity(Rarity::Common).len(), 3);
        assert_eq!(kinds_by_rarity(Rarity::Uncommon).len(), 3);
        assert_eq!(kinds_by_rarity(Rarity::Rare).len(), 4);
        assert_eq!(kinds_by_rarity(Rarity::Legendary).len(), 5);
    }

    #[test]
    fn test_body_size_conflicts_are_mutual() {
        assert!(conflicts_with(SkillKind::BodyGrowth).contains(&SkillKind::BodySplit));
        assert!(conflicts_with(SkillKind::BodySplit).contains(&SkillKind::BodyGrowth));
    }

    #[test]
    fn test_shield_conflict_is_directional() {
        assert!(conflicts_with(SkillKind::SteelBody).contains(&SkillKind::BasicShield));
        assert!(conflicts_with(SkillKind::BasicShield).is_empty());
    }
}
