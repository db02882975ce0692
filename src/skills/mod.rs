//! Skill catalog and earned skill instances
//!
//! The catalog is fixed game data: fifteen skills across four rarity tiers.
//! Instances are the player's copies of catalog entries and carry activation
//! state for the duration of a run.

pub mod catalog;
pub mod instance;
pub mod kind;

pub use catalog::{conflicts_with, kinds_by_rarity, SkillDefinition, SKILL_CATALOG};
pub use instance::SkillInstance;
pub use kind::{EffectCategory, Rarity, SkillKind};
