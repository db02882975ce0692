//! Rarity-weighted skill generation with dynamic balance
//!
//! Each run owns one `SkillManager`. Every catalog kind can be drawn once per
//! run; the rarity tier of a draw is sampled from a score-dependent weight
//! table, then a kind is picked uniformly within that tier.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::progression::ProgressionState;
use crate::skills::{kinds_by_rarity, Rarity, SkillKind};

/// Tier weights for one score bracket
#[derive(Debug, Clone, Copy)]
pub struct RarityBracket {
    /// Inclusive upper score bound, `None` for the open-ended top bracket
    pub max_score: Option<u32>,
    /// Weights for Common, Uncommon, Rare, Legendary (sum to 1.0)
    pub weights: [f64; 4],
}

/// Score brackets, lowest first
pub static RARITY_BRACKETS: [RarityBracket; 4] = [
    RarityBracket {
        max_score: Some(200),
        weights: [0.50, 0.35, 0.15, 0.00],
    },
    RarityBracket {
        max_score: Some(500),
        weights: [0.45, 0.35, 0.18, 0.02],
    },
    RarityBracket {
        max_score: Some(1000),
        weights: [0.40, 0.35, 0.20, 0.05],
    },
    RarityBracket {
        max_score: None,
        weights: [0.35, 0.35, 0.22, 0.08],
    },
];

/// Tier weights for the bracket containing `score`
pub fn rarity_weights_for_score(score: u32) -> [f64; 4] {
    RARITY_BRACKETS
        .iter()
        .find(|bracket| bracket.max_score.map_or(true, |max| score <= max))
        .map(|bracket| bracket.weights)
        .unwrap_or(RARITY_BRACKETS[RARITY_BRACKETS.len() - 1].weights)
}

/// Pick a tier by cumulative weight
///
/// `roll` is a uniform sample in `[0, 1)` scaled by the total weight; the
/// first tier whose cumulative weight reaches it wins. Falls back to Common.
pub fn select_rarity_tier(weights: &[f64; 4], roll: f64) -> Rarity {
    let total: f64 = weights.iter().sum();
    let target = roll * total;

    let mut cumulative = 0.0;
    for (rarity, weight) in Rarity::ALL.iter().zip(weights.iter()) {
        cumulative += weight;
        if target <= cumulative {
            return *rarity;
        }
    }

    Rarity::Common
}

/// Per-run skill generator
#[derive(Debug, Clone)]
pub struct SkillManager {
    rng: ChaCha8Rng,
    /// Times each kind has been drawn this run
    draw_counts: AHashMap<SkillKind, u32>,
    probability_reduction: f64,
    last_decay_reset_score: u32,
    reduction_per_active: f64,
    max_reduction: f64,
    reset_interval: u32,
}

impl SkillManager {
    /// Manager seeded from OS entropy
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Deterministic manager for replays and tests
    pub fn with_seed(config: &EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: &EngineConfig, rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            draw_counts: AHashMap::new(),
            probability_reduction: 0.0,
            last_decay_reset_score: 0,
            reduction_per_active: config.balance_reduction_per_active,
            max_reduction: config.balance_max_reduction,
            reset_interval: config.balance_reset_interval,
        }
    }

    /// Forget all draws and balance state for a new run
    pub fn reset(&mut self) {
        self.draw_counts.clear();
        self.probability_reduction = 0.0;
        self.last_decay_reset_score = 0;
    }

    /// Draw a new skill kind, `None` once every kind has been drawn
    ///
    /// The balance reduction scales all tier weights equally, so it does not
    /// change which tier is sampled.
    pub fn generate_skill<P: Clone>(&mut self, state: &ProgressionState<P>) -> Option<SkillKind> {
        let eligible = self.eligible_kinds();
        if eligible.is_empty() {
            tracing::debug!("Skill catalog exhausted");
            return None;
        }

        self.update_dynamic_balance(state);

        let mut weights = rarity_weights_for_score(state.score());
        for weight in &mut weights {
            *weight *= 1.0 - self.probability_reduction;
        }

        let roll: f64 = self.rng.gen();
        let rarity = select_rarity_tier(&weights, roll);

        let in_tier: Vec<SkillKind> = eligible
            .iter()
            .copied()
            .filter(|kind| kind.rarity() == rarity)
            .collect();
        let candidates = if in_tier.is_empty() { eligible } else { in_tier };

        let kind = candidates[self.rng.gen_range(0..candidates.len())];
        *self.draw_counts.entry(kind).or_insert(0) += 1;

        tracing::debug!(
            "Drew {} (rolled {}, reduction {:.2})",
            kind.name(),
            rarity.name(),
            self.probability_reduction
        );
        Some(kind)
    }

    /// Kinds not yet drawn this run, in catalog order
    pub fn eligible_kinds(&self) -> Vec<SkillKind> {
        SkillKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.draw_count(*kind) == 0)
            .collect()
    }

    pub fn draw_count(&self, kind: SkillKind) -> u32 {
        self.draw_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Whether every kind of a tier has been drawn
    pub fn is_rarity_completed(&self, rarity: Rarity) -> bool {
        kinds_by_rarity(rarity)
            .iter()
            .all(|kind| self.draw_count(*kind) > 0)
    }

    /// Earned skills per tier, indexed by `Rarity::index`
    pub fn rarity_distribution<P: Clone>(&self, state: &ProgressionState<P>) -> [u32; 4] {
        let mut counts = [0; 4];
        for skill in state.earned_skills() {
            counts[skill.rarity().index()] += 1;
        }
        counts
    }

    pub fn probability_reduction(&self) -> f64 {
        self.probability_reduction
    }

    fn update_dynamic_balance<P: Clone>(&mut self, state: &ProgressionState<P>) {
        let active = state.used_activation_slots() as f64;
        self.probability_reduction = (active * self.reduction_per_active).min(self.max_reduction);

        let score = state.score();
        if score.saturating_sub(self.last_decay_reset_score) >= self.reset_interval {
            self.probability_reduction = 0.0;
            self.last_decay_reset_score = score;
        }
    }
}
