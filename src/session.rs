//! Game session: the per-food and per-tick control flow around the engine
//!
//! A session wires `ProgressionState`, `SkillManager` and `NotificationLog`
//! together the way the host game loop drives them:
//!
//! 1. On each food item: frenzy-scaled score, counters, win check, then the
//!    unlock check (draw, duplicate conversion or a pending offer).
//! 2. On player choice: accept or decline the pending offer.
//! 3. On activation: conflict resolution with compensation, then activation.
//! 4. Per tick: expirations first, then effect dispatch.

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{InstanceId, Millis};
use crate::manager::{
    apply_instant_effect, apply_skill_effects, check_conflict, convert_duplicate_to_bonus,
    is_duplicate, resolve_conflict, ConflictCheck, SkillEffects, SkillManager,
};
use crate::progression::{ProgressionState, RunPhase};
use crate::skills::{SkillInstance, SkillKind};
use crate::ui::NotificationLog;

/// What an unlock check produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// No unlock due (or an offer is already pending)
    Nothing,
    /// A new skill awaits the player's decision
    Offered(SkillKind),
    /// The draw was already owned and paid out as score
    DuplicateConverted { kind: SkillKind, bonus: u32 },
    /// Every catalog kind has been drawn this run
    CatalogExhausted,
}

/// Result of a food event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodOutcome {
    /// Points credited after the frenzy multiplier
    pub points: u32,
    pub won: bool,
    pub award: AwardOutcome,
    /// Time Rewind is active and a rewind is due
    pub rewind_due: bool,
}

impl FoodOutcome {
    fn rejected() -> Self {
        Self {
            points: 0,
            won: false,
            award: AwardOutcome::Nothing,
            rewind_due: false,
        }
    }
}

/// Result of an activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivationOutcome {
    pub activated: bool,
    /// Active skill displaced by a conflict, if any
    pub displaced: Option<InstanceId>,
    /// Score paid for the displaced skill
    pub compensation: u32,
    /// The compensation pushed the score over the win threshold
    pub won: bool,
}

/// One run of the game, from start to win or loss
#[derive(Debug, Clone)]
pub struct GameSession<P = ()> {
    state: ProgressionState<P>,
    manager: SkillManager,
    notifications: NotificationLog,
    pending_offer: Option<SkillKind>,
}

impl<P: Clone> GameSession<P> {
    /// Session with an entropy-seeded skill manager
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let manager = SkillManager::new(&config);
        Ok(Self::assemble(config, manager))
    }

    /// Session whose draws are reproducible from `seed`
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let manager = SkillManager::with_seed(&config, seed);
        Ok(Self::assemble(config, manager))
    }

    fn assemble(config: EngineConfig, manager: SkillManager) -> Self {
        let notifications = NotificationLog::with_capacity(config.notification_backlog);
        Self {
            state: ProgressionState::new(config),
            manager,
            notifications,
            pending_offer: None,
        }
    }

    pub fn start(&mut self, now: Millis) {
        self.state.start(now);
    }

    /// Fresh run: state, draws, offer and notifications all cleared
    pub fn reset(&mut self) {
        self.state.reset();
        self.manager.reset();
        self.notifications.clear();
        self.pending_offer = None;
    }

    /// Handle a food item worth `base_points`
    ///
    /// `base_points` already carries host-side multipliers such as Double
    /// Score; the session applies only the frenzy multiplier.
    pub fn on_food_eaten(&mut self, base_points: u32, now: Millis) -> FoodOutcome {
        if !self.state.is_running() {
            return FoodOutcome::rejected();
        }

        let points = (base_points as f64 * self.state.frenzy_multiplier()).floor() as u32;
        self.state.increment_food_counter();

        if self.state.add_score(points) {
            self.pending_offer = None;
            self.notifications
                .game_event("Victory", &format!("Reached {} points", self.state.score()), "🏆", now);
            return FoodOutcome {
                points,
                won: true,
                award: AwardOutcome::Nothing,
                rewind_due: false,
            };
        }

        let award = self.check_award(now);
        let won = self.state.phase() == RunPhase::Won;
        let rewind_due = !won
            && self.state.is_skill_active(SkillKind::TimeRewind)
            && self.state.should_rewind();

        FoodOutcome {
            points,
            won,
            award,
            rewind_due,
        }
    }

    fn check_award(&mut self, now: Millis) -> AwardOutcome {
        if self.pending_offer.is_some() || !self.state.should_award_skill() {
            return AwardOutcome::Nothing;
        }

        let Some(kind) = self.manager.generate_skill(&self.state) else {
            return AwardOutcome::CatalogExhausted;
        };

        if is_duplicate(kind, &self.state) {
            let bonus = convert_duplicate_to_bonus(kind);
            self.state.add_score(bonus);
            self.notifications.game_event(
                "Duplicate Skill",
                &format!("{} converted to {} bonus points", kind.name(), bonus),
                "💰",
                now,
            );
            return AwardOutcome::DuplicateConverted { kind, bonus };
        }

        self.pending_offer = Some(kind);
        AwardOutcome::Offered(kind)
    }

    pub fn pending_offer(&self) -> Option<SkillKind> {
        self.pending_offer
    }

    /// Record the pending offer as earned
    pub fn accept_offer(&mut self, now: Millis) -> Option<InstanceId> {
        let kind = self.pending_offer.take()?;
        let id = self.state.award_skill(SkillInstance::new(kind))?;
        self.notifications.skill_unlocked(kind, now);
        Some(id)
    }

    /// Drop the pending offer; the kind stays drawn for this run
    pub fn decline_offer(&mut self) -> Option<SkillKind> {
        let kind = self.pending_offer.take();
        if let Some(kind) = kind {
            tracing::debug!("Declined {}", kind.name());
        }
        kind
    }

    /// Activate an earned skill, displacing a conflicting one first
    ///
    /// Conflicts are only resolved when the skill itself could activate, so
    /// a refused activation never costs the player an active skill.
    pub fn activate(
        &mut self,
        id: InstanceId,
        now: Millis,
        effects: &mut impl SkillEffects,
    ) -> ActivationOutcome {
        let mut outcome = ActivationOutcome::default();

        let Some(kind) = self
            .state
            .skill(id)
            .filter(|skill| skill.can_activate())
            .map(|skill| skill.kind)
        else {
            return outcome;
        };
        if !self.state.is_running() {
            return outcome;
        }

        let mut conflict_message = None;
        if let ConflictCheck::Conflict {
            instance, message, ..
        } = check_conflict(kind, &self.state)
        {
            if let Some(compensation) = resolve_conflict(&mut self.state, instance) {
                outcome.displaced = Some(instance);
                outcome.compensation = compensation;
                conflict_message = Some(message);
            }
        }

        outcome.activated = self.state.activate(id, now);
        if outcome.activated {
            apply_instant_effect(kind, effects);
            self.notifications.skill_activated(kind, now);
            if kind == SkillKind::SkillSlotExpand {
                self.notifications
                    .game_event("Skill Slots", "Additional slot unlocked!", "📦", now);
            }
        }

        // Compensation is credited only after the activation attempt
        if let Some(message) = conflict_message {
            self.notifications.skill_conflict(
                &format!("{} (+{} compensation points)", message, outcome.compensation),
                now,
            );
            outcome.won = self.state.add_score(outcome.compensation);
            if outcome.won {
                self.pending_offer = None;
            }
        }

        outcome
    }

    /// Per-tick update: expire timed skills, then signal active effects
    pub fn tick(&mut self, now: Millis, effects: &mut impl SkillEffects) -> Vec<InstanceId> {
        let expired = self.state.tick_expirations(now);
        for id in &expired {
            if let Some(skill) = self.state.skill(*id) {
                let name = skill.kind.name();
                self.notifications
                    .game_event(name, "Effect expired", skill.kind.definition().icon, now);
            }
        }

        apply_skill_effects(&self.state, effects);
        expired
    }

    /// Store a rewind checkpoint with the host's payload
    pub fn take_snapshot(&mut self, payload: P, now: Millis) {
        self.state.snapshot(payload, now);
    }

    /// Rewind if one is due, returning the payload the host must restore
    pub fn try_rewind(&mut self, now: Millis) -> Option<P> {
        if !self.state.is_running() || !self.state.should_rewind() {
            return None;
        }
        let payload = self.state.rewind(now)?;
        self.notifications
            .game_event("Time Rewind", "Rewound to an earlier moment", "⏪", now);
        Some(payload)
    }

    pub fn end_with_loss(&mut self, now: Millis) {
        if !self.state.is_running() {
            return;
        }
        self.state.end_with_loss();
        self.pending_offer = None;
        self.notifications.game_event(
            "Game Over",
            &format!("Final score {}", self.state.score()),
            "💀",
            now,
        );
    }

    pub fn state(&self) -> &ProgressionState<P> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ProgressionState<P> {
        &mut self.state
    }

    pub fn manager(&self) -> &SkillManager {
        &self.manager
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }
}
