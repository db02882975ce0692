//! Duplicate conversion and conflict resolution
//!
//! Conflicts are checked when a skill is activated, never when it is drawn or
//! awarded: a conflicting skill can sit in the earned list indefinitely.

use crate::core::types::InstanceId;
use crate::progression::ProgressionState;
use crate::skills::{conflicts_with, Rarity, SkillKind};

/// Bonus score for a drawn duplicate, by rarity index
pub const DUPLICATE_BONUS: [u32; 4] = [30, 50, 80, 120];

/// Compensation for a skill displaced by a conflict, by rarity index
pub const CONFLICT_COMPENSATION: [u32; 4] = [15, 25, 40, 60];

/// Outcome of a conflict check
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictCheck {
    /// No active skill conflicts with the candidate
    Clear,
    /// An active skill must be displaced first
    Conflict {
        instance: InstanceId,
        kind: SkillKind,
        /// Player-facing explanation
        message: String,
    },
}

impl ConflictCheck {
    pub fn has_conflict(&self) -> bool {
        matches!(self, ConflictCheck::Conflict { .. })
    }

    pub fn conflicting_instance(&self) -> Option<InstanceId> {
        match self {
            ConflictCheck::Conflict { instance, .. } => Some(*instance),
            ConflictCheck::Clear => None,
        }
    }
}

/// Whether the player already owns an instance of `kind`
pub fn is_duplicate<P: Clone>(kind: SkillKind, state: &ProgressionState<P>) -> bool {
    state.earned_skills().iter().any(|skill| skill.kind == kind)
}

/// Bonus score granted instead of a duplicate skill
///
/// The caller adds it with `add_score` and must not award the duplicate.
pub fn convert_duplicate_to_bonus(kind: SkillKind) -> u32 {
    DUPLICATE_BONUS[kind.rarity().index()]
}

/// Compensation paid for displacing a skill of `rarity`
pub fn conflict_compensation(rarity: Rarity) -> u32 {
    CONFLICT_COMPENSATION[rarity.index()]
}

/// Find the first active skill (activation order) that `candidate` displaces
pub fn check_conflict<P: Clone>(candidate: SkillKind, state: &ProgressionState<P>) -> ConflictCheck {
    let conflicts = conflicts_with(candidate);
    if conflicts.is_empty() {
        return ConflictCheck::Clear;
    }

    state
        .active_skills()
        .find(|active| conflicts.contains(&active.kind))
        .map(|active| ConflictCheck::Conflict {
            instance: active.id,
            kind: active.kind,
            message: format!(
                "{} conflicts with {}. The old skill will be deactivated.",
                candidate.name(),
                active.kind.name()
            ),
        })
        .unwrap_or(ConflictCheck::Clear)
}

/// Deactivate a conflicting skill and return its compensation
///
/// Compensation follows the displaced skill's rarity. Returns `None` if the
/// instance was not active.
pub fn resolve_conflict<P: Clone>(state: &mut ProgressionState<P>, conflicting: InstanceId) -> Option<u32> {
    let rarity = state.skill(conflicting)?.rarity();
    if !state.force_deactivate(conflicting) {
        return None;
    }

    let compensation = conflict_compensation(rarity);
    tracing::debug!(
        "Resolved conflict with {:?}, compensation {}",
        conflicting,
        compensation
    );
    Some(compensation)
}
