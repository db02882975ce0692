//! Earned skill instances

use serde::{Deserialize, Serialize};

use crate::core::types::{InstanceId, Millis};
use crate::skills::{Rarity, SkillKind};

/// A player's stateful copy of a catalog skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillInstance {
    pub id: InstanceId,
    pub kind: SkillKind,
    remaining_activations: u32,
    is_active: bool,
    /// Host time of the last activation, 0 while inactive
    activated_at_ms: Millis,
}

impl SkillInstance {
    pub fn new(kind: SkillKind) -> Self {
        Self {
            id: InstanceId::new(),
            kind,
            remaining_activations: kind.max_activations(),
            is_active: false,
            activated_at_ms: 0,
        }
    }

    pub fn rarity(&self) -> Rarity {
        self.kind.rarity()
    }

    pub fn remaining_activations(&self) -> u32 {
        self.remaining_activations
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn activated_at_ms(&self) -> Millis {
        self.activated_at_ms
    }

    pub fn can_activate(&self) -> bool {
        self.remaining_activations > 0 && !self.is_active
    }

    /// Spend one activation (returns false if none left or already active)
    pub(crate) fn activate(&mut self, now: Millis) -> bool {
        if !self.can_activate() {
            return false;
        }
        self.is_active = true;
        self.activated_at_ms = now;
        self.remaining_activations -= 1;
        true
    }

    /// Clear the active flag; spent activations are not refunded
    pub(crate) fn deactivate(&mut self) {
        self.is_active = false;
        self.activated_at_ms = 0;
    }

    /// Whether a timed activation has run its course at `now`
    pub fn has_expired(&self, now: Millis) -> bool {
        let duration = self.kind.duration_ms();
        if !self.is_active || duration <= 0 {
            return false;
        }
        now.saturating_sub(self.activated_at_ms) >= duration as u64
    }

    /// Whole seconds left on a timed activation, `None` if not counting down
    pub fn remaining_secs(&self, now: Millis) -> Option<u64> {
        let duration = self.kind.duration_ms();
        if !self.is_active || duration <= 0 {
            return None;
        }
        let elapsed = now.saturating_sub(self.activated_at_ms);
        Some((duration as u64).saturating_sub(elapsed) / 1000)
    }
}
