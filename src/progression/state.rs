//! Authoritative run state: score, phase and skill bookkeeping

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{InstanceId, Millis};
use crate::progression::history::{Snapshot, SnapshotHistory};
use crate::skills::{SkillInstance, SkillKind};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl RunPhase {
    /// Won and Lost accept no further score or skill changes
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::Won | RunPhase::Lost)
    }
}

/// Serializable read model for HUDs and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub phase: RunPhase,
    pub score: u32,
    pub skills_earned: u32,
    pub active_skills: Vec<SkillKind>,
    pub used_slots: usize,
    pub max_slots: usize,
    pub points_to_next_skill: u32,
    pub points_to_win: u32,
    pub frenzy_multiplier: f64,
    pub snapshots: usize,
}

impl ProgressSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Game-run state owned by the host
///
/// `P` is the host's snapshot payload; the engine never inspects it.
#[derive(Debug, Clone)]
pub struct ProgressionState<P = ()> {
    config: EngineConfig,
    score: u32,
    phase: RunPhase,
    started_at_ms: Option<Millis>,
    skills_earned: u32,
    /// Award order
    earned_skills: Vec<SkillInstance>,
    /// Subset of `earned_skills`, activation order
    active_skills: Vec<InstanceId>,
    max_activation_slots: usize,
    combo_steps: u32,
    frenzy_active: bool,
    history: SnapshotHistory<P>,
    foods_since_snapshot: u32,
}

impl<P: Clone> Default for ProgressionState<P> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<P: Clone> ProgressionState<P> {
    pub fn new(config: EngineConfig) -> Self {
        let history = SnapshotHistory::with_capacity(config.history_capacity);
        let max_activation_slots = config.initial_activation_slots;
        Self {
            config,
            score: 0,
            phase: RunPhase::NotStarted,
            started_at_ms: None,
            skills_earned: 0,
            earned_skills: Vec::new(),
            active_skills: Vec::new(),
            max_activation_slots,
            combo_steps: 0,
            frenzy_active: false,
            history,
            foods_since_snapshot: 0,
        }
    }

    /// Return to `NotStarted` with all counters zeroed and history cleared
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Begin the run. Ignored unless the run has not started yet.
    pub fn start(&mut self, now: Millis) {
        if self.phase != RunPhase::NotStarted {
            return;
        }
        self.phase = RunPhase::Running;
        self.started_at_ms = Some(now);
        tracing::info!("Run started at {}ms", now);
    }

    /// Add points, returning true if this addition won the run
    ///
    /// Rejected without mutation unless the run is in progress. The stored
    /// score is not clamped to the win threshold.
    pub fn add_score(&mut self, points: u32) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }

        self.score = self.score.saturating_add(points);

        if self.score >= self.config.win_score {
            self.phase = RunPhase::Won;
            tracing::info!("Run won with score {}", self.score);
            return true;
        }

        false
    }

    /// End the run as a loss. Only a running run can be lost.
    pub fn end_with_loss(&mut self) {
        if self.phase != RunPhase::Running {
            return;
        }
        self.phase = RunPhase::Lost;
        tracing::info!("Run lost with score {}", self.score);
    }

    /// Whether the score has crossed the next unlock threshold
    pub fn should_award_skill(&self) -> bool {
        self.phase == RunPhase::Running
            && self.skills_earned < self.config.max_skills
            && self.score / self.config.points_per_skill > self.skills_earned
    }

    /// Record an earned skill, returning its id
    ///
    /// No-op once the cap is reached or the run has finished.
    pub fn award_skill(&mut self, instance: SkillInstance) -> Option<InstanceId> {
        if self.phase.is_terminal() || self.skills_earned >= self.config.max_skills {
            return None;
        }

        let id = instance.id;
        tracing::debug!(
            "Awarded skill {} ({}/{})",
            instance.kind.name(),
            self.skills_earned + 1,
            self.config.max_skills
        );
        self.earned_skills.push(instance);
        self.skills_earned += 1;
        Some(id)
    }

    /// Activate an earned skill if a slot is free
    ///
    /// Rejected without side effects when the run is not in progress, the
    /// instance is unknown, all slots are used, or the instance is spent or
    /// already active.
    pub fn activate(&mut self, id: InstanceId, now: Millis) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }

        if self.active_skills.len() >= self.max_activation_slots {
            return false;
        }

        let Some(skill) = self.earned_skills.iter_mut().find(|s| s.id == id) else {
            return false;
        };

        if !skill.activate(now) {
            return false;
        }
        let kind = skill.kind;
        self.active_skills.push(id);

        match kind {
            SkillKind::SkillSlotExpand => {
                self.max_activation_slots += 1;
            }
            SkillKind::ScoreFrenzy => {
                self.enable_score_frenzy();
            }
            _ => {}
        }

        tracing::debug!(
            "Activated {} ({}/{} slots)",
            kind.name(),
            self.active_skills.len(),
            self.max_activation_slots
        );
        true
    }

    /// Deactivate timed skills whose duration has elapsed
    ///
    /// Call once per host tick, before any activation attempts for that tick.
    pub fn tick_expirations(&mut self, now: Millis) -> Vec<InstanceId> {
        let mut expired = Vec::new();
        let earned = &mut self.earned_skills;

        self.active_skills.retain(|id| {
            match earned.iter_mut().find(|s| s.id == *id) {
                Some(skill) if skill.has_expired(now) => {
                    skill.deactivate();
                    expired.push(*id);
                    false
                }
                _ => true,
            }
        });

        for id in &expired {
            tracing::debug!("Skill {:?} expired at {}ms", id, now);
        }
        expired
    }

    /// Clear an instance's active flag and free its slot
    ///
    /// Spent activations are not restored. Returns true if a slot was freed.
    pub fn force_deactivate(&mut self, id: InstanceId) -> bool {
        if let Some(skill) = self.earned_skills.iter_mut().find(|s| s.id == id) {
            skill.deactivate();
        }

        let before = self.active_skills.len();
        self.active_skills.retain(|active| *active != id);
        self.active_skills.len() < before
    }

    /// Count a food item toward rewind and frenzy
    pub fn increment_food_counter(&mut self) {
        self.foods_since_snapshot += 1;
        if self.frenzy_active {
            self.combo_steps += 1;
        }
    }

    /// Switch score frenzy on with a fresh combo
    pub fn enable_score_frenzy(&mut self) {
        self.frenzy_active = true;
        self.combo_steps = 0;
    }

    pub fn reset_frenzy_combo(&mut self) {
        self.combo_steps = 0;
    }

    /// Score multiplier from the frenzy combo
    ///
    /// Grows by `frenzy_step` per food item with no ceiling.
    pub fn frenzy_multiplier(&self) -> f64 {
        if !self.frenzy_active {
            return 1.0;
        }
        1.0 + self.combo_steps as f64 * self.config.frenzy_step
    }

    // === REWIND ===

    /// Capture score and skill state alongside the host payload
    pub fn snapshot(&mut self, payload: P, now: Millis) {
        let snapshot = Snapshot {
            score: self.score,
            earned_skills: self.earned_skills.clone(),
            active_skills: self.active_skills.clone(),
            timestamp_ms: now,
            payload,
        };

        if self.history.push(snapshot).is_some() {
            tracing::debug!("Snapshot history full, evicted oldest");
        }
        self.foods_since_snapshot = 0;
    }

    pub fn should_rewind(&self) -> bool {
        self.foods_since_snapshot >= self.config.rewind_food_threshold && !self.history.is_empty()
    }

    /// Pick the snapshot to rewind to
    ///
    /// Newest first, the first one at least `rewind_min_age_ms` old; if none
    /// is old enough, the oldest snapshot.
    pub fn select_rewind_target(&self, now: Millis) -> Option<&Snapshot<P>> {
        self.history
            .iter()
            .rev()
            .find(|s| s.age_ms(now) >= self.config.rewind_min_age_ms)
            .or_else(|| self.history.oldest())
    }

    /// Restore score and skills from a snapshot
    ///
    /// Slot capacity, phase and the history itself are left as they are.
    /// Rejected once the run has finished.
    pub fn apply_rewind(&mut self, snapshot: &Snapshot<P>) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.score = snapshot.score;
        self.earned_skills = snapshot.earned_skills.clone();
        self.active_skills = snapshot.active_skills.clone();
        self.foods_since_snapshot = 0;
        tracing::info!(
            "Rewound to snapshot at {}ms (score {})",
            snapshot.timestamp_ms,
            snapshot.score
        );
        true
    }

    /// Select and apply a rewind target, handing back its payload
    pub fn rewind(&mut self, now: Millis) -> Option<P> {
        if self.phase.is_terminal() {
            return None;
        }
        let snapshot = self.select_rewind_target(now)?.clone();
        self.apply_rewind(&snapshot).then_some(snapshot.payload)
    }

    // === QUERIES ===

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn skills_earned(&self) -> u32 {
        self.skills_earned
    }

    pub fn earned_skills(&self) -> &[SkillInstance] {
        &self.earned_skills
    }

    pub fn skill(&self, id: InstanceId) -> Option<&SkillInstance> {
        self.earned_skills.iter().find(|s| s.id == id)
    }

    /// Active instances in activation order
    pub fn active_skills(&self) -> impl Iterator<Item = &SkillInstance> + '_ {
        self.active_skills.iter().filter_map(move |id| self.skill(*id))
    }

    pub fn active_ids(&self) -> &[InstanceId] {
        &self.active_skills
    }

    pub fn is_skill_active(&self, kind: SkillKind) -> bool {
        self.active_instance(kind).is_some()
    }

    pub fn active_instance(&self, kind: SkillKind) -> Option<&SkillInstance> {
        self.active_skills()
            .find(|s| s.kind == kind && s.is_active())
    }

    pub fn max_activation_slots(&self) -> usize {
        self.max_activation_slots
    }

    pub fn used_activation_slots(&self) -> usize {
        self.active_skills.len()
    }

    pub fn available_slots(&self) -> usize {
        self.max_activation_slots
            .saturating_sub(self.active_skills.len())
    }

    pub fn combo_steps(&self) -> u32 {
        self.combo_steps
    }

    pub fn is_frenzy_active(&self) -> bool {
        self.frenzy_active
    }

    pub fn history(&self) -> &SnapshotHistory<P> {
        &self.history
    }

    pub fn foods_since_snapshot(&self) -> u32 {
        self.foods_since_snapshot
    }

    /// Milliseconds since `start`, 0 before the run starts
    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        self.started_at_ms
            .map(|start| now.saturating_sub(start))
            .unwrap_or(0)
    }

    /// Points still needed for the next unlock, 0 while one is already due
    pub fn points_to_next_skill(&self) -> u32 {
        if self.skills_earned >= self.config.max_skills {
            return 0;
        }
        ((self.skills_earned + 1) * self.config.points_per_skill).saturating_sub(self.score)
    }

    pub fn points_to_win(&self) -> u32 {
        self.config.win_score.saturating_sub(self.score)
    }

    /// Progress toward the next unlock (0.0 to 1.0)
    pub fn skill_progress(&self) -> f64 {
        if self.skills_earned >= self.config.max_skills {
            return 1.0;
        }
        let banked = self.skills_earned * self.config.points_per_skill;
        let progress = self.score.saturating_sub(banked) as f64;
        (progress / self.config.points_per_skill as f64).min(1.0)
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            phase: self.phase,
            score: self.score,
            skills_earned: self.skills_earned,
            active_skills: self.active_skills().map(|s| s.kind).collect(),
            used_slots: self.used_activation_slots(),
            max_slots: self.max_activation_slots,
            points_to_next_skill: self.points_to_next_skill(),
            points_to_win: self.points_to_win(),
            frenzy_multiplier: self.frenzy_multiplier(),
            snapshots: self.history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> ProgressionState {
        let mut state = ProgressionState::default();
        state.start(0);
        state
    }

    fn earn(state: &mut ProgressionState, kind: SkillKind) -> InstanceId {
        state
            .award_skill(SkillInstance::new(kind))
            .expect("Award should be recorded")
    }

    #[test]
    fn test_start_only_from_not_started() {
        let mut state = running();
        assert_eq!(state.phase(), RunPhase::Running);
        assert_eq!(state.elapsed_ms(2500), 2500);

        state.end_with_loss();
        state.start(100);
        assert_eq!(state.phase(), RunPhase::Lost);
    }

    #[test]
    fn test_score_rejected_before_start() {
        let mut state: ProgressionState = ProgressionState::default();
        assert!(!state.add_score(50));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_award_thresholds() {
        let mut state = running();

        state.add_score(59);
        assert!(!state.should_award_skill());

        state.add_score(1);
        assert!(state.should_award_skill());
        earn(&mut state, SkillKind::DoubleScore);
        assert!(!state.should_award_skill());

        state.add_score(59); // 119
        assert!(!state.should_award_skill());

        state.add_score(1); // 120
        assert!(state.should_award_skill());
    }

    #[test]
    fn test_award_cap() {
        // At the default win score the run ends before a 15th award is due
        let mut state: ProgressionState = ProgressionState::new(EngineConfig {
            win_score: 2000,
            ..EngineConfig::default()
        });
        state.start(0);
        state.add_score(960);

        for kind in SkillKind::ALL {
            assert!(state.should_award_skill());
            earn(&mut state, kind);
        }
        assert_eq!(state.skills_earned(), 15);
        assert!(!state.should_award_skill());
        assert!(state.award_skill(SkillInstance::new(SkillKind::DoubleScore)).is_none());
        assert_eq!(state.earned_skills().len(), 15);
        assert_eq!(state.points_to_next_skill(), 0);
        assert_eq!(state.skill_progress(), 1.0);
    }

    #[test]
    fn test_win_not_clamped() {
        let mut state = running();
        assert!(!state.add_score(890));
        assert!(state.add_score(20));
        assert_eq!(state.phase(), RunPhase::Won);
        assert_eq!(state.score(), 910);
    }

    #[test]
    fn test_terminal_rejects_score() {
        let mut state = running();
        state.add_score(100);
        state.end_with_loss();

        assert!(!state.add_score(10));
        assert!(!state.add_score(10));
        assert_eq!(state.score(), 100);
        assert!(!state.should_award_skill());
    }

    #[test]
    fn test_activation_respects_slots() {
        let mut state = running();
        let ids: Vec<_> = [
            SkillKind::DoubleScore,
            SkillKind::WallPasser,
            SkillKind::FoodMagnet,
            SkillKind::LuckyStar,
        ]
        .into_iter()
        .map(|k| earn(&mut state, k))
        .collect();

        for id in &ids[..3] {
            assert!(state.activate(*id, 10));
        }
        assert_eq!(state.available_slots(), 0);

        assert!(!state.activate(ids[3], 10));
        assert_eq!(state.used_activation_slots(), 3);
        assert!(state.skill(ids[3]).map(|s| s.can_activate()).unwrap_or(false));
    }

    #[test]
    fn test_activation_rejections() {
        let mut state = running();
        let id = earn(&mut state, SkillKind::BasicShield);

        // Unknown instance
        assert!(!state.activate(InstanceId::new(), 0));

        assert!(state.activate(id, 0));
        // Already active
        assert!(!state.activate(id, 0));

        // Spent after forced deactivation
        assert!(state.force_deactivate(id));
        assert!(!state.activate(id, 0));
        assert_eq!(state.used_activation_slots(), 0);
    }

    #[test]
    fn test_slot_expansion() {
        let mut state = running();
        let id = earn(&mut state, SkillKind::SkillSlotExpand);
        assert!(state.activate(id, 0));
        assert_eq!(state.max_activation_slots(), 4);
        assert_eq!(state.available_slots(), 3);
    }

    #[test]
    fn test_ghost_mode_expires() {
        let mut state = running();
        let ghost = earn(&mut state, SkillKind::GhostMode);
        let shield = earn(&mut state, SkillKind::BasicShield);
        state.activate(ghost, 1000);
        state.activate(shield, 1000);

        assert!(state.tick_expirations(30_999).is_empty());
        assert_eq!(state.tick_expirations(31_000), vec![ghost]);
        assert!(!state.is_skill_active(SkillKind::GhostMode));
        assert!(state.is_skill_active(SkillKind::BasicShield));
        assert_eq!(state.used_activation_slots(), 1);

        // Permanent skills stay active
        assert!(state.tick_expirations(10_000_000).is_empty());
    }

    #[test]
    fn test_frenzy_multiplier_grows_without_cap() {
        let mut state = running();
        state.increment_food_counter();
        assert_eq!(state.frenzy_multiplier(), 1.0);
        assert_eq!(state.combo_steps(), 0);

        let frenzy = earn(&mut state, SkillKind::ScoreFrenzy);
        assert!(state.activate(frenzy, 0));
        assert!(state.is_frenzy_active());

        for step in 1..=50 {
            state.increment_food_counter();
            let expected = 1.0 + 0.1 * step as f64;
            assert!((state.frenzy_multiplier() - expected).abs() < 1e-9);
        }
        assert!(state.frenzy_multiplier() > 5.9);

        state.reset_frenzy_combo();
        assert_eq!(state.frenzy_multiplier(), 1.0);
    }

    #[test]
    fn test_rewind_needs_foods_and_history() {
        let mut state = running();
        for _ in 0..5 {
            state.increment_food_counter();
        }
        assert!(!state.should_rewind());

        state.snapshot((), 0);
        assert_eq!(state.foods_since_snapshot(), 0);
        for _ in 0..4 {
            state.increment_food_counter();
        }
        assert!(!state.should_rewind());
        state.increment_food_counter();
        assert!(state.should_rewind());
    }

    #[test]
    fn test_apply_rewind_restores_skills() {
        let mut state = running();
        state.add_score(60);
        let shield = earn(&mut state, SkillKind::BasicShield);
        state.snapshot((), 1000);

        state.add_score(100);
        let slots = earn(&mut state, SkillKind::SkillSlotExpand);
        state.activate(shield, 2000);
        state.activate(slots, 2000);
        state.increment_food_counter();

        let payload = state.rewind(5000);
        assert_eq!(payload, Some(()));
        assert_eq!(state.score(), 60);
        assert_eq!(state.earned_skills().len(), 1);
        assert_eq!(state.used_activation_slots(), 0);
        assert_eq!(state.foods_since_snapshot(), 0);
        // Slot growth survives the rewind
        assert_eq!(state.max_activation_slots(), 4);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = running();
        state.add_score(300);
        earn(&mut state, SkillKind::DoubleScore);
        state.snapshot((), 0);
        state.enable_score_frenzy();

        state.reset();
        assert_eq!(state.phase(), RunPhase::NotStarted);
        assert_eq!(state.score(), 0);
        assert_eq!(state.skills_earned(), 0);
        assert!(state.history().is_empty());
        assert!(!state.is_frenzy_active());
        assert_eq!(state.max_activation_slots(), 3);
        assert_eq!(state.elapsed_ms(1000), 0);
    }

    #[test]
    fn test_summary_serializes() {
        let mut state = running();
        state.add_score(50);
        assert_eq!(state.summary().points_to_next_skill, 10);

        state.add_score(20);
        let summary = state.summary();
        // First unlock is due but not yet awarded
        assert_eq!(summary.points_to_next_skill, 0);
        assert_eq!(summary.points_to_win, 830);

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"score\":70"));
    }
}
