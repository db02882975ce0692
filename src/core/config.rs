//! Engine configuration with documented constants
//!
//! The pacing numbers of a run live here. Rarity brackets and reward tables
//! are static game data and stay next to the catalog.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Configuration for a progression run
///
/// Defaults reproduce the shipped game balance. Changing them affects how
/// quickly skills unlock and how long a run lasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === PROGRESSION ===
    /// Score needed per skill unlock
    ///
    /// The n-th skill becomes available once `score / points_per_skill > n`.
    pub points_per_skill: u32,

    /// Score at which the run is won
    ///
    /// At 900 with 60 points per skill, a winning run sees all 15 unlocks.
    pub win_score: u32,

    /// Hard cap on skills earned in one run
    pub max_skills: u32,

    /// Activation slots available at the start of a run
    ///
    /// The slot-expansion skill adds one more each time it activates.
    pub initial_activation_slots: usize,

    // === REWIND ===
    /// Number of snapshots kept for rewind
    pub history_capacity: usize,

    /// Food items eaten since the last snapshot before a rewind is due
    pub rewind_food_threshold: u32,

    /// Minimum snapshot age for it to be chosen as a rewind target (ms)
    pub rewind_min_age_ms: u64,

    // === FRENZY ===
    /// Multiplier gained per food item while score frenzy is active
    ///
    /// No ceiling is applied: after 20 combo steps the multiplier is 3.0.
    pub frenzy_step: f64,

    // === DYNAMIC BALANCE ===
    /// Probability reduction per active skill
    pub balance_reduction_per_active: f64,

    /// Upper bound on the probability reduction
    pub balance_max_reduction: f64,

    /// Score advance that clears the accumulated reduction
    pub balance_reset_interval: u32,

    // === NOTIFICATIONS ===
    /// Notifications retained for display
    pub notification_backlog: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            points_per_skill: 60,
            win_score: 900,
            max_skills: 15,
            initial_activation_slots: 3,

            history_capacity: 10,
            rewind_food_threshold: 5,
            rewind_min_age_ms: 3000,

            frenzy_step: 0.1,

            balance_reduction_per_active: 0.1,
            balance_max_reduction: 0.5,
            balance_reset_interval: 100,

            notification_backlog: 10,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.points_per_skill == 0 {
            return Err(EngineError::InvalidConfig(
                "points_per_skill must be positive".into(),
            ));
        }

        if self.history_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }

        if !(0.0..1.0).contains(&self.balance_max_reduction) {
            return Err(EngineError::InvalidConfig(format!(
                "balance_max_reduction ({}) must be in [0, 1)",
                self.balance_max_reduction
            )));
        }

        if self.balance_reduction_per_active < 0.0 || self.frenzy_step < 0.0 {
            return Err(EngineError::InvalidConfig(
                "balance and frenzy rates must not be negative".into(),
            ));
        }

        Ok(())
    }
}

/// Load and validate a config from a TOML file
///
/// Missing keys fall back to their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: EngineConfig = toml::from_str(&contents)?;
    config.validate()?;

    tracing::debug!("Loaded engine config from {:?}", path);
    Ok(config)
}
