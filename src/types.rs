//! Common Types and Constants
//!
//! Shared data structures used across the simulator modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatError;
use crate::reward::RewardComponents;

// ==================== Constants ====================

/// Episode length (number of actions, duplicates included)
pub const MAX_STEPS: usize = 20;

/// Observation vector length
pub const OBSERVATION_DIM: usize = 13;

/// Number of trailing answers exposed in the observation
pub const HISTORY_WINDOW: usize = 5;

/// Neutral ability prior used before any correct answer
pub const THETA_PRIOR: f64 = 0.5;

/// Slope of the logistic response curve
pub const LOGISTIC_SLOPE: f64 = 8.0;

/// Base response time (seconds)
pub const BASE_RESPONSE_TIME: f64 = 2.0;

/// Extra seconds per unit of difficulty above ability
pub const RESPONSE_TIME_PENALTY: f64 = 8.0;

/// Standard deviation of response-time noise (seconds)
pub const RESPONSE_TIME_NOISE_STD: f64 = 0.5;

/// Response-time floor (seconds)
pub const MIN_RESPONSE_TIME: f64 = 0.5;

/// Upper bound declared for time features (seconds)
pub const MAX_OBSERVED_TIME: f64 = 60.0;

/// Synthetic response time attached to a duplicate selection
pub const DUPLICATE_RESPONSE_TIME: f64 = 5.0;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

// ==================== Student Profiles ====================

/// Ability band of a simulated examinee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentProfile {
    Novice,
    Emerging,
    Average,
    #[serde(rename = "Above Average")]
    AboveAverage,
    Expert,
}

impl StudentProfile {
    pub const ALL: [StudentProfile; 5] = [
        StudentProfile::Novice,
        StudentProfile::Emerging,
        StudentProfile::Average,
        StudentProfile::AboveAverage,
        StudentProfile::Expert,
    ];

    /// `(low, high)` of the true-theta draw. High is exclusive except for Expert.
    pub fn theta_range(&self) -> (f64, f64) {
        match self {
            StudentProfile::Novice => (0.1, 0.3),
            StudentProfile::Emerging => (0.3, 0.45),
            StudentProfile::Average => (0.45, 0.55),
            StudentProfile::AboveAverage => (0.55, 0.7),
            StudentProfile::Expert => (0.7, 1.0),
        }
    }

    pub fn upper_inclusive(&self) -> bool {
        matches!(self, StudentProfile::Expert)
    }

    /// Whether `theta` lies inside this profile's declared range
    pub fn contains(&self, theta: f64) -> bool {
        let (low, high) = self.theta_range();
        if self.upper_inclusive() {
            theta >= low && theta <= high
        } else {
            theta >= low && theta < high
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StudentProfile::Novice => "Novice",
            StudentProfile::Emerging => "Emerging",
            StudentProfile::Average => "Average",
            StudentProfile::AboveAverage => "Above Average",
            StudentProfile::Expert => "Expert",
        }
    }
}

impl Default for StudentProfile {
    fn default() -> Self {
        StudentProfile::Average
    }
}

impl fmt::Display for StudentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StudentProfile {
    type Err = CatError;

    /// Exact, case-sensitive match on the five profile names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudentProfile::ALL
            .into_iter()
            .find(|profile| profile.name() == s)
            .ok_or_else(|| CatError::InvalidProfile(s.to_string()))
    }
}

// ==================== Episode Types ====================

/// Lifecycle of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    Ready,
    InProgress,
    Done,
}

impl EpisodePhase {
    pub fn from_step_count(step_count: usize, max_steps: usize) -> Self {
        if step_count >= max_steps {
            EpisodePhase::Done
        } else if step_count == 0 {
            EpisodePhase::Ready
        } else {
            EpisodePhase::InProgress
        }
    }
}

/// One simulated answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamineeResponse {
    /// 1 if answered correctly, else 0
    pub correct: u8,
    /// Seconds, never below `MIN_RESPONSE_TIME`
    pub response_time: f64,
}

impl ExamineeResponse {
    pub fn is_correct(&self) -> bool {
        self.correct == 1
    }
}

/// Auxiliary per-step information returned alongside the observation.
///
/// `true_theta` is exposed for analysis only and never enters the observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Step number after this action (1-based)
    pub step: usize,
    pub action: usize,
    pub difficulty: f64,
    pub duplicate: bool,
    /// Correctness used for this step (synthetic 0 on duplicates)
    pub correct: u8,
    /// Response time used for this step (synthetic on duplicates)
    pub response_time: f64,
    pub theta_estimate: f64,
    pub true_theta: f64,
    pub reward_components: RewardComponents,
}

impl StepInfo {
    /// Render as a JSON object map with the same keys as the serde form.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("step".into(), self.step.into());
        map.insert("action".into(), self.action.into());
        map.insert("difficulty".into(), self.difficulty.into());
        map.insert("duplicate".into(), self.duplicate.into());
        map.insert("correct".into(), self.correct.into());
        map.insert("response_time".into(), self.response_time.into());
        map.insert("theta_estimate".into(), self.theta_estimate.into());
        map.insert("true_theta".into(), self.true_theta.into());

        let components = &self.reward_components;
        let mut reward = serde_json::Map::new();
        reward.insert("estimation_error".into(), components.estimation_error.into());
        reward.insert("time_cost".into(), components.time_cost.into());
        reward.insert("duplicate_penalty".into(), components.duplicate_penalty.into());
        reward.insert("total".into(), components.total.into());
        map.insert("reward_components".into(), reward.into());

        map
    }
}
