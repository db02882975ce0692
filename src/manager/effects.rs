//! Translation of active skills into host effect toggles

use crate::progression::ProgressionState;
use crate::skills::SkillKind;

/// Score multiplier granted by Double Score
pub const DOUBLE_SCORE_MULTIPLIER: f64 = 2.0;

/// Speed multiplier granted by Slow Movement
pub const SLOW_MOVEMENT_MULTIPLIER: f64 = 0.5;

/// Food magnet pull radius in grid cells
pub const FOOD_MAGNET_RADIUS: u32 = 3;

/// Game-side effects a skill can switch on
///
/// Implemented once by the host. The engine calls one method per active
/// skill per tick and never learns how the effect is rendered. Effects no
/// catalog skill currently triggers have empty default bodies.
///
/// Calls are level-triggered: a host should reset its toggles before each
/// tick and rebuild them from the calls it receives. Body Split and Body
/// Growth are permanent, so `shrink_snake` and `grow_snake` arrive once at
/// activation through `apply_instant_effect` and then again on every tick
/// while the skill stays active. Hosts that want a single resize must
/// ignore the per-tick size requests.
pub trait SkillEffects {
    // Movement
    fn apply_speed_multiplier(&mut self, multiplier: f64);
    fn enable_wall_phasing(&mut self);
    fn teleport_snake(&mut self) {}

    // Food
    fn enable_food_magnet(&mut self, radius: u32);
    fn enable_lucky_star(&mut self);
    fn enable_double_food(&mut self) {}

    // Scoring
    fn apply_score_multiplier(&mut self, multiplier: f64);
    fn enable_score_frenzy(&mut self);

    // Survival
    fn enable_basic_shield(&mut self);
    fn enable_steel_body(&mut self);
    fn enable_ghost_mode(&mut self);
    fn enable_second_chance(&mut self);
    fn enable_invincibility(&mut self) {}

    // Size
    fn shrink_snake(&mut self);
    fn grow_snake(&mut self);

    // Time
    fn enable_time_rewind(&mut self);
    fn enable_time_freeze(&mut self) {}

    // World
    fn enable_world_shrink(&mut self);

    // System
    fn expand_skill_slots(&mut self);
}

/// Signal the effect of a single skill kind
pub fn apply_effect(kind: SkillKind, effects: &mut impl SkillEffects) {
    match kind {
        SkillKind::DoubleScore => effects.apply_score_multiplier(DOUBLE_SCORE_MULTIPLIER),
        SkillKind::SlowMovement => effects.apply_speed_multiplier(SLOW_MOVEMENT_MULTIPLIER),
        SkillKind::BasicShield => effects.enable_basic_shield(),
        SkillKind::WallPasser => effects.enable_wall_phasing(),
        SkillKind::SteelBody => effects.enable_steel_body(),
        SkillKind::FoodMagnet => effects.enable_food_magnet(FOOD_MAGNET_RADIUS),
        SkillKind::BodySplit => effects.shrink_snake(),
        SkillKind::BodyGrowth => effects.grow_snake(),
        SkillKind::TimeRewind => effects.enable_time_rewind(),
        SkillKind::LuckyStar => effects.enable_lucky_star(),
        SkillKind::GhostMode => effects.enable_ghost_mode(),
        SkillKind::ScoreFrenzy => effects.enable_score_frenzy(),
        SkillKind::WorldShrink => effects.enable_world_shrink(),
        SkillKind::SecondChance => effects.enable_second_chance(),
        SkillKind::SkillSlotExpand => effects.expand_skill_slots(),
    }
}

/// Signal every active skill exactly once, in activation order
pub fn apply_skill_effects<P: Clone>(state: &ProgressionState<P>, effects: &mut impl SkillEffects) {
    for skill in state.active_skills().filter(|s| s.is_active()) {
        apply_effect(skill.kind, effects);
    }
}

/// One-shot effect fired at activation time (body split and growth)
///
/// Returns true if the kind has an instant effect.
pub fn apply_instant_effect(kind: SkillKind, effects: &mut impl SkillEffects) -> bool {
    match kind {
        SkillKind::BodySplit => {
            effects.shrink_snake();
            true
        }
        SkillKind::BodyGrowth => {
            effects.grow_snake();
            true
        }
        _ => false,
    }
}
