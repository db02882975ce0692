//! Skill manager: generation, duplicate/conflict resolution, effect dispatch
//!
//! All algorithms operate on a borrowed `ProgressionState`. The only state
//! the manager keeps between calls is the per-run draw record and the
//! dynamic-balance checkpoint.

pub mod effects;
pub mod generation;
pub mod resolution;

pub use effects::{apply_effect, apply_instant_effect, apply_skill_effects, SkillEffects};
pub use generation::{rarity_weights_for_score, select_rarity_tier, RarityBracket, SkillManager, RARITY_BRACKETS};
pub use resolution::{
    check_conflict, conflict_compensation, convert_duplicate_to_bonus, is_duplicate,
    resolve_conflict, ConflictCheck, CONFLICT_COMPENSATION, DUPLICATE_BONUS,
};
