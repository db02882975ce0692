//! Bounded notification backlog for skill events

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::types::Millis;
use crate::skills::SkillKind;

/// Default number of notifications kept for display
pub const DEFAULT_BACKLOG: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    SkillUnlocked,
    SkillActivated,
    SkillConflict,
    GameEvent,
}

impl NotificationKind {
    /// Unlocks and conflicts are worth interrupting the player for
    pub fn is_important(self) -> bool {
        matches!(
            self,
            NotificationKind::SkillUnlocked | NotificationKind::SkillConflict
        )
    }
}

/// A single announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Display colour hint
    pub color: String,
    pub at_ms: Millis,
}

/// Fire-and-forget notification queue keeping the most recent entries
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BACKLOG)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn skill_unlocked(&mut self, kind: SkillKind, now: Millis) {
        let def = kind.definition();
        let message = format!(
            "NEW SKILL UNLOCKED: {} {} - {}",
            def.icon, def.name, def.description
        );
        self.push(
            NotificationKind::SkillUnlocked,
            message,
            def.rarity.color(),
            now,
        );
    }

    pub fn skill_activated(&mut self, kind: SkillKind, now: Millis) {
        let def = kind.definition();
        let message = format!("SKILL ACTIVATED: {} {}", def.icon, def.name);
        self.push(NotificationKind::SkillActivated, message, "#27ae60", now);
    }

    pub fn skill_conflict(&mut self, conflict_message: &str, now: Millis) {
        let message = format!("SKILL CONFLICT: {}", conflict_message);
        self.push(NotificationKind::SkillConflict, message, "#e67e22", now);
    }

    pub fn game_event(&mut self, title: &str, message: &str, icon: &str, now: Millis) {
        let message = format!("{} {}: {}", icon, title, message);
        self.push(NotificationKind::GameEvent, message, "#3498db", now);
    }

    fn push(&mut self, kind: NotificationKind, message: String, color: &str, now: Millis) {
        if kind.is_important() {
            tracing::info!("{}", message);
        } else {
            tracing::debug!("{}", message);
        }

        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            kind,
            message,
            color: color.to_string(),
            at_ms: now,
        });
    }

    /// Retained notifications, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &Notification> + '_ {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
