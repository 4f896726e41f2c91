//! Environment configuration.
//!
//! Environment variables read by [`EnvConfig::from_env`]:
//! - `CAT_PROFILE`: student profile name (default `Average`)
//! - `CAT_MAX_STEPS`: episode length (default 20)
//! - `CAT_SEED`: base seed; unset means seeded from the clock

use serde::{Deserialize, Serialize};

use crate::error::{CatError, Result};
use crate::reward::RewardWeights;
use crate::types::{StudentProfile, MAX_STEPS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub profile: StudentProfile,
    pub max_steps: usize,
    pub seed: Option<u64>,
    pub reward: RewardWeights,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            profile: StudentProfile::default(),
            max_steps: MAX_STEPS,
            seed: None,
            reward: RewardWeights::default(),
        }
    }
}

impl EnvConfig {
    pub fn new(profile: StudentProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparsable numbers fall back to
    /// defaults; an unknown profile name is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match lookup("CAT_PROFILE") {
            Some(name) => name.parse()?,
            None => StudentProfile::default(),
        };

        let max_steps = lookup("CAT_MAX_STEPS")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(MAX_STEPS);

        let seed = lookup("CAT_SEED").and_then(|value| value.parse::<u64>().ok());

        let config = Self {
            profile,
            max_steps,
            seed,
            reward: RewardWeights::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(CatError::InvalidConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        if !self.reward.is_finite() {
            return Err(CatError::InvalidConfig(
                "reward weights must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
