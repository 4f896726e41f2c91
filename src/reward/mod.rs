//! Reward Function
//!
//! Stateless scoring of one transition:
//! - duplicate selection: fixed penalty (-2.0)
//! - novel selection: -|theta_estimate - true_theta| - 0.1 * response_time

use serde::{Deserialize, Serialize};

/// Reward weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Reward for re-selecting an already asked item
    pub duplicate_penalty: f64,
    /// Weight on |theta_estimate - true_theta|
    pub estimation_error_weight: f64,
    /// Weight on response time (seconds)
    pub response_time_weight: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            duplicate_penalty: -2.0,
            estimation_error_weight: 1.0,
            response_time_weight: 0.1,
        }
    }
}

impl RewardWeights {
    pub fn is_finite(&self) -> bool {
        self.duplicate_penalty.is_finite()
            && self.estimation_error_weight.is_finite()
            && self.response_time_weight.is_finite()
    }
}

/// What happened on one step, as far as the reward is concerned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Duplicate,
    Answered {
        theta_estimate: f64,
        true_theta: f64,
        response_time: f64,
    },
}

/// Per-term breakdown; `total` is what the environment returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    pub estimation_error: f64,
    pub time_cost: f64,
    pub duplicate_penalty: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardFunction {
    weights: RewardWeights,
}

impl RewardFunction {
    pub fn new(weights: RewardWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }

    pub fn components(&self, transition: &Transition) -> RewardComponents {
        match *transition {
            Transition::Duplicate => RewardComponents {
                estimation_error: 0.0,
                time_cost: 0.0,
                duplicate_penalty: self.weights.duplicate_penalty,
                total: self.weights.duplicate_penalty,
            },
            Transition::Answered {
                theta_estimate,
                true_theta,
                response_time,
            } => {
                let estimation_error =
                    -self.weights.estimation_error_weight * (theta_estimate - true_theta).abs();
                let time_cost = -self.weights.response_time_weight * response_time;
                RewardComponents {
                    estimation_error,
                    time_cost,
                    duplicate_penalty: 0.0,
                    total: estimation_error + time_cost,
                }
            }
        }
    }

    pub fn evaluate(&self, transition: &Transition) -> f64 {
        self.components(transition).total
    }
}
