//! Adaptive Test Environment
//!
//! Gym-style episode state machine: `reset()` draws a fresh examinee and
//! clears the state, `step(action)` asks one item and scores the transition.
//!
//! Lifecycle: `Ready` (step 0) -> `InProgress` -> `Done` (step >= max_steps).
//! Stepping a finished episode or passing an out-of-range item index is an
//! error and leaves the environment untouched.

use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::bank::QuestionBank;
use crate::config::EnvConfig;
use crate::error::{CatError, Result};
use crate::examinee::SimulatedExaminee;
use crate::observation::{Observation, ObservationBounds};
use crate::reward::{RewardFunction, Transition};
use crate::state::AdaptiveTestState;
use crate::types::{EpisodePhase, StepInfo, StudentProfile, DUPLICATE_RESPONSE_TIME};

/// Capability set a training driver needs from an environment
pub trait Environment {
    fn reset(&mut self) -> Observation;
    fn step(&mut self, action: usize) -> Result<StepResult>;
    fn observation_bounds(&self) -> ObservationBounds;
    fn action_space_size(&self) -> usize;
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone)]
pub struct AdaptiveTestEnv {
    bank: Arc<QuestionBank>,
    config: EnvConfig,
    reward_fn: RewardFunction,
    /// Source of per-episode examinee seeds
    rng: ChaCha8Rng,
    examinee: SimulatedExaminee,
    state: AdaptiveTestState,
    episode_seed: u64,
}

impl AdaptiveTestEnv {
    /// Create an environment; the first episode is already reset.
    pub fn new(bank: Arc<QuestionBank>, config: EnvConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let episode_seed: u64 = rng.gen();
        let examinee = SimulatedExaminee::with_seed(config.profile, episode_seed);

        Ok(Self {
            bank,
            reward_fn: RewardFunction::new(config.reward),
            config,
            rng,
            examinee,
            state: AdaptiveTestState::new(),
            episode_seed,
        })
    }

    /// Create an environment from a profile name, failing on unknown names.
    pub fn with_profile_name(bank: Arc<QuestionBank>, profile: &str, seed: Option<u64>) -> Result<Self> {
        let config = EnvConfig {
            profile: profile.parse()?,
            seed,
            ..EnvConfig::default()
        };
        Self::new(bank, config)
    }

    /// Reseed the environment generator, then reset.
    pub fn reset_with_seed(&mut self, seed: u64) -> Observation {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.reset_episode()
    }

    fn reset_episode(&mut self) -> Observation {
        self.episode_seed = self.rng.gen();
        self.examinee = SimulatedExaminee::with_seed(self.config.profile, self.episode_seed);
        self.state = AdaptiveTestState::new();

        debug!(
            profile = %self.config.profile,
            episode_seed = self.episode_seed,
            true_theta = self.examinee.true_theta(),
            "episode reset"
        );

        self.observation()
    }

    fn step_episode(&mut self, action: usize) -> Result<StepResult> {
        if self.is_done() {
            warn!(action, step = self.state.step_count(), "step after episode end");
            return Err(CatError::EpisodeFinished {
                max_steps: self.config.max_steps,
            });
        }

        let difficulty = self.bank.difficulty_at(action).map_err(|err| {
            warn!(action, n_items = self.bank.n_items(), "action out of range");
            err
        })?;

        let true_theta = self.examinee.true_theta();
        let duplicate = self.state.is_asked(action);

        let (correct, response_time, transition) = if duplicate {
            (0, DUPLICATE_RESPONSE_TIME, Transition::Duplicate)
        } else {
            let response = self.examinee.answer(difficulty);
            self.state.record_answer(action, difficulty, response);
            (
                response.correct,
                response.response_time,
                Transition::Answered {
                    theta_estimate: self.state.theta_estimate(),
                    true_theta,
                    response_time: response.response_time,
                },
            )
        };

        self.state.advance_step();

        let reward_components = self.reward_fn.components(&transition);
        let done = self.is_done();
        let info = StepInfo {
            step: self.state.step_count(),
            action,
            difficulty,
            duplicate,
            correct,
            response_time,
            theta_estimate: self.state.theta_estimate(),
            true_theta,
            reward_components,
        };

        trace!(
            step = info.step,
            action,
            difficulty,
            duplicate,
            correct,
            reward = reward_components.total,
            "step"
        );
        if done {
            debug!(
                theta_estimate = self.state.theta_estimate(),
                true_theta,
                answered = self.state.n_answered(),
                "episode finished"
            );
        }

        Ok(StepResult {
            observation: self.observation(),
            reward: reward_components.total,
            done,
            info,
        })
    }

    pub fn observation(&self) -> Observation {
        Observation::from_state(&self.state)
    }

    pub fn phase(&self) -> EpisodePhase {
        EpisodePhase::from_step_count(self.state.step_count(), self.config.max_steps)
    }

    pub fn is_done(&self) -> bool {
        self.phase() == EpisodePhase::Done
    }

    pub fn state(&self) -> &AdaptiveTestState {
        &self.state
    }

    /// Hidden ability of the current examinee, for analysis only
    pub fn true_theta(&self) -> f64 {
        self.examinee.true_theta()
    }

    pub fn theta_estimate(&self) -> f64 {
        self.state.theta_estimate()
    }

    pub fn profile(&self) -> StudentProfile {
        self.config.profile
    }

    pub fn episode_seed(&self) -> u64 {
        self.episode_seed
    }

    pub fn max_steps(&self) -> usize {
        self.config.max_steps
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }
}

impl Environment for AdaptiveTestEnv {
    fn reset(&mut self) -> Observation {
        self.reset_episode()
    }

    fn step(&mut self, action: usize) -> Result<StepResult> {
        self.step_episode(action)
    }

    fn observation_bounds(&self) -> ObservationBounds {
        ObservationBounds::default()
    }

    fn action_space_size(&self) -> usize {
        self.bank.n_items()
    }
}
