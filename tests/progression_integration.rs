//! Integration tests for score cadence, activation slots, conflicts and rewind

use serpent_skills::core::EngineConfig;
use serpent_skills::manager::{
    check_conflict, convert_duplicate_to_bonus, is_duplicate, resolve_conflict,
};
use serpent_skills::progression::{ProgressionState, RunPhase};
use serpent_skills::skills::{SkillInstance, SkillKind};

fn running<P: Clone>() -> ProgressionState<P> {
    let mut state = ProgressionState::default();
    state.start(0);
    state
}

/// Test 1: unlock cadence at the 60-point boundaries
#[test]
fn test_unlock_thresholds() {
    let mut state: ProgressionState = running();
    let expectations = [(59, false), (60, true), (119, false), (120, true)];

    for (score, expected) in expectations {
        let delta = score - state.score();
        state.add_score(delta);
        assert_eq!(
            state.should_award_skill(),
            expected,
            "score {} with {} earned",
            score,
            state.skills_earned()
        );
        if expected {
            state.award_skill(SkillInstance::new(SkillKind::ALL[state.skills_earned() as usize]));
        }
    }
}

/// Test 2: the 15th award is the last one
#[test]
fn test_fifteenth_award_boundary() {
    let mut state: ProgressionState = ProgressionState::new(EngineConfig {
        win_score: 5000,
        ..EngineConfig::default()
    });
    state.start(0);

    for (i, kind) in SkillKind::ALL.iter().enumerate() {
        state.add_score(60);
        assert!(state.should_award_skill(), "award {} should be due", i + 1);
        state.award_skill(SkillInstance::new(*kind));
    }

    state.add_score(600);
    assert_eq!(state.skills_earned(), 15);
    assert!(!state.should_award_skill());
}

/// Test 3: terminal phases reject score idempotently
#[test]
fn test_terminal_score_rejection() {
    let mut won: ProgressionState = running();
    won.add_score(900);
    assert_eq!(won.phase(), RunPhase::Won);
    for _ in 0..3 {
        assert!(!won.add_score(50));
        assert_eq!(won.score(), 900);
    }

    let mut lost: ProgressionState = running();
    lost.add_score(40);
    lost.end_with_loss();
    assert!(!lost.add_score(50));
    assert_eq!(lost.score(), 40);
    assert_eq!(lost.phase(), RunPhase::Lost);
}

/// Test 3b: finished runs accept no new skills and no rewinds
#[test]
fn test_terminal_skill_and_rewind_rejection() {
    let mut won: ProgressionState<u8> = running();
    won.snapshot(1, 0);
    won.add_score(900);
    assert_eq!(won.phase(), RunPhase::Won);

    assert!(won.award_skill(SkillInstance::new(SkillKind::LuckyStar)).is_none());
    assert_eq!(won.skills_earned(), 0);

    assert_eq!(won.rewind(10_000), None);
    let snapshot = won.history().oldest().cloned().unwrap();
    assert!(!won.apply_rewind(&snapshot));
    assert_eq!(won.score(), 900);
    assert_eq!(won.phase(), RunPhase::Won);

    let mut lost: ProgressionState<u8> = running();
    lost.add_score(30);
    lost.snapshot(2, 0);
    lost.end_with_loss();
    assert!(lost.award_skill(SkillInstance::new(SkillKind::LuckyStar)).is_none());
    assert_eq!(lost.rewind(10_000), None);
    assert_eq!(lost.score(), 30);
}

/// Test 4: crossing the win threshold keeps the full score
#[test]
fn test_win_overshoot() {
    let mut state: ProgressionState = running();
    assert!(!state.add_score(890));
    assert!(state.add_score(20));
    assert_eq!(state.phase(), RunPhase::Won);
    assert_eq!(state.score(), 910);
}

/// Test 5: duplicates convert to score and are never recorded
#[test]
fn test_duplicate_conversion() {
    let mut state: ProgressionState = running();
    state.add_score(60);
    state.award_skill(SkillInstance::new(SkillKind::GhostMode));

    let drawn = SkillKind::GhostMode;
    assert!(is_duplicate(drawn, &state));

    let bonus = convert_duplicate_to_bonus(drawn);
    assert_eq!(bonus, 120);
    state.add_score(bonus);

    assert_eq!(state.earned_skills().len(), 1);
    assert_eq!(state.score(), 180);
}

/// Test 6: conflict resolution frees one slot and pays by the displaced rarity
#[test]
fn test_conflict_resolution_compensation() {
    let mut state: ProgressionState = running();
    let shield = state.award_skill(SkillInstance::new(SkillKind::BasicShield)).unwrap();
    let magnet = state.award_skill(SkillInstance::new(SkillKind::FoodMagnet)).unwrap();
    let steel = state.award_skill(SkillInstance::new(SkillKind::SteelBody)).unwrap();
    assert!(state.activate(shield, 0));
    assert!(state.activate(magnet, 0));

    let check = check_conflict(SkillKind::SteelBody, &state);
    let conflicting = check.conflicting_instance().expect("Shield should conflict");
    assert_eq!(conflicting, shield);

    let before = state.used_activation_slots();
    let compensation = resolve_conflict(&mut state, conflicting).unwrap();
    assert_eq!(state.used_activation_slots(), before - 1);

    // Basic Shield is Common (15); Steel Body would have been Uncommon (25)
    assert_eq!(compensation, 15);
    state.add_score(compensation);

    assert!(state.activate(steel, 10));
    assert!(!state.is_skill_active(SkillKind::BasicShield));
    assert!(state.is_skill_active(SkillKind::SteelBody));
}

/// Test 7: the slot budget holds, and a rejection changes nothing
#[test]
fn test_slot_budget_rejection_has_no_side_effects() {
    let mut state: ProgressionState = running();
    let ids: Vec<_> = SkillKind::ALL[..5]
        .iter()
        .map(|kind| state.award_skill(SkillInstance::new(*kind)).unwrap())
        .collect();

    for id in &ids[..3] {
        assert!(state.activate(*id, 0));
    }

    let before = state.skill(ids[3]).cloned();
    assert!(!state.activate(ids[3], 0));
    assert_eq!(state.skill(ids[3]).cloned(), before);
    assert_eq!(state.used_activation_slots(), 3);
    assert_eq!(state.max_activation_slots(), 3);
}

/// Test 8: rewind target fixture - newest snapshot at least 3s old
#[test]
fn test_rewind_target_selection() {
    let mut state: ProgressionState<&'static str> = running();
    for (ts, label) in [(0, "t0"), (1000, "t1000"), (2000, "t2000"), (4000, "t4000")] {
        state.snapshot(label, ts);
    }

    let target = state.select_rewind_target(5000).expect("History is not empty");
    assert_eq!(target.timestamp_ms, 2000);
    assert_eq!(target.payload, "t2000");
}

/// Test 9: with nothing old enough the oldest snapshot is chosen
#[test]
fn test_rewind_falls_back_to_oldest() {
    let mut state: ProgressionState<u8> = running();
    state.snapshot(1, 4000);
    state.snapshot(2, 4500);

    let target = state.select_rewind_target(5000).unwrap();
    assert_eq!(target.payload, 1);

    let empty: ProgressionState<u8> = running();
    assert!(empty.select_rewind_target(5000).is_none());
}

/// Test 10: eleventh snapshot evicts the first
#[test]
fn test_history_bounded_at_ten() {
    let mut state: ProgressionState<u32> = running();
    for i in 0..11 {
        state.snapshot(i, i as u64 * 100);
        assert!(state.history().len() <= 10);
    }

    assert_eq!(state.history().len(), 10);
    assert_eq!(state.history().oldest().map(|s| s.payload), Some(1));
    assert_eq!(state.history().newest().map(|s| s.payload), Some(10));
}

/// Test 11: rewind restores score and skills but not slot capacity or phase
#[test]
fn test_rewind_restores_selected_fields() {
    let mut state: ProgressionState<&'static str> = running();
    state.add_score(120);
    let shield = state.award_skill(SkillInstance::new(SkillKind::BasicShield)).unwrap();
    assert!(state.activate(shield, 100));
    state.snapshot("early", 100);

    let slots = state.award_skill(SkillInstance::new(SkillKind::SkillSlotExpand)).unwrap();
    assert!(state.activate(slots, 2000));
    state.add_score(200);
    for _ in 0..5 {
        state.increment_food_counter();
    }
    assert!(state.should_rewind());

    let payload = state.rewind(4000);
    assert_eq!(payload, Some("early"));
    assert_eq!(state.score(), 120);
    assert_eq!(state.earned_skills().len(), 1);
    assert_eq!(state.used_activation_slots(), 1);
    assert!(state.is_skill_active(SkillKind::BasicShield));
    assert_eq!(state.max_activation_slots(), 4);
    assert_eq!(state.phase(), RunPhase::Running);
    assert_eq!(state.history().len(), 1);
    assert!(!state.should_rewind());
}

/// Test 12: frenzy grows by exactly 0.1 per food with no ceiling
#[test]
fn test_frenzy_multiplier_unbounded() {
    let mut state: ProgressionState = running();
    assert_eq!(state.frenzy_multiplier(), 1.0);

    state.enable_score_frenzy();
    for step in 1..=100u32 {
        state.increment_food_counter();
        let expected = 1.0 + f64::from(step) * 0.1;
        assert!((state.frenzy_multiplier() - expected).abs() < 1e-9);
    }
    assert!(state.frenzy_multiplier() > 10.9);
}
