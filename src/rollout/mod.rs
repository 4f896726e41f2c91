//! Episode Rollouts
//!
//! Drives environments with a caller-supplied policy and records what an
//! evaluation run needs: per-step estimate, hidden ability, response time
//! and the difficulty of the chosen item.
//!
//! Batches run one independent environment per seed on the rayon pool, so
//! results depend only on the seed and not on scheduling.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bank::QuestionBank;
use crate::config::EnvConfig;
use crate::env::{AdaptiveTestEnv, Environment};
use crate::error::Result;
use crate::observation::Observation;
use crate::types::StudentProfile;

/// One recorded step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub action: usize,
    pub difficulty: f64,
    pub duplicate: bool,
    /// `None` on duplicate steps
    pub correct: Option<u8>,
    /// `None` on duplicate steps
    pub response_time: Option<f64>,
    pub theta_estimate: f64,
    pub true_theta: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeTrace {
    pub profile: StudentProfile,
    pub seed: u64,
    pub true_theta: f64,
    pub steps: Vec<StepRecord>,
}

impl EpisodeTrace {
    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|s| s.reward).sum()
    }

    pub fn final_theta_estimate(&self) -> Option<f64> {
        self.steps.last().map(|s| s.theta_estimate)
    }

    /// |final estimate - true ability|
    pub fn final_error(&self) -> Option<f64> {
        self.final_theta_estimate()
            .map(|estimate| (estimate - self.true_theta).abs())
    }

    pub fn duplicate_count(&self) -> usize {
        self.steps.iter().filter(|s| s.duplicate).count()
    }
}

/// Run one full episode from a fresh reset.
pub fn run_episode<P>(env: &mut AdaptiveTestEnv, mut policy: P) -> Result<EpisodeTrace>
where
    P: FnMut(&Observation) -> usize,
{
    let mut obs = env.reset();
    let mut steps = Vec::with_capacity(env.max_steps());

    loop {
        let action = policy(&obs);
        let result = env.step(action)?;
        let info = &result.info;

        steps.push(StepRecord {
            step: info.step,
            action,
            difficulty: info.difficulty,
            duplicate: info.duplicate,
            correct: (!info.duplicate).then_some(info.correct),
            response_time: (!info.duplicate).then_some(info.response_time),
            theta_estimate: info.theta_estimate,
            true_theta: info.true_theta,
            reward: result.reward,
        });

        obs = result.observation;
        if result.done {
            break;
        }
    }

    Ok(EpisodeTrace {
        profile: env.profile(),
        seed: env.episode_seed(),
        true_theta: env.true_theta(),
        steps,
    })
}

/// Run one episode per seed in parallel. Output order follows `seeds`.
///
/// `make_policy` is called once per episode so policies may keep their own state.
pub fn run_episodes_parallel<F, P>(
    bank: Arc<QuestionBank>,
    config: &EnvConfig,
    seeds: &[u64],
    make_policy: F,
) -> Result<Vec<EpisodeTrace>>
where
    F: Fn() -> P + Sync,
    P: FnMut(&Observation) -> usize,
{
    config.validate()?;

    let traces = seeds
        .par_iter()
        .map(|&seed| {
            let mut env = AdaptiveTestEnv::new(Arc::clone(&bank), config.clone().with_seed(seed))?;
            run_episode(&mut env, make_policy())
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        profile = %config.profile,
        episodes = traces.len(),
        "parallel rollout finished"
    );

    Ok(traces)
}

/// Per-step averages over a set of episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub episodes: usize,
    pub mean_theta_estimate: Vec<f64>,
    pub mean_true_theta: Vec<f64>,
    /// Averaged over answered (non-duplicate) steps only; 0.0 where none
    pub mean_response_time: Vec<f64>,
    pub mean_difficulty: Vec<f64>,
    pub mean_final_error: f64,
    pub mean_total_reward: f64,
    pub duplicate_rate: f64,
}

impl EvaluationSummary {
    pub fn from_traces(traces: &[EpisodeTrace]) -> Self {
        let n_steps = traces.iter().map(|t| t.steps.len()).max().unwrap_or(0);

        let mut theta_sum = vec![0.0; n_steps];
        let mut true_sum = vec![0.0; n_steps];
        let mut diff_sum = vec![0.0; n_steps];
        let mut step_counts = vec![0usize; n_steps];
        let mut time_sum = vec![0.0; n_steps];
        let mut time_counts = vec![0usize; n_steps];

        for trace in traces {
            for (i, step) in trace.steps.iter().enumerate() {
                theta_sum[i] += step.theta_estimate;
                true_sum[i] += step.true_theta;
                diff_sum[i] += step.difficulty;
                step_counts[i] += 1;
                if let Some(rt) = step.response_time {
                    time_sum[i] += rt;
                    time_counts[i] += 1;
                }
            }
        }

        let average = |sums: &[f64], counts: &[usize]| -> Vec<f64> {
            sums.iter()
                .zip(counts)
                .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
                .collect()
        };

        let errors: Vec<f64> = traces.iter().filter_map(|t| t.final_error()).collect();
        let total_steps: usize = traces.iter().map(|t| t.steps.len()).sum();
        let duplicates: usize = traces.iter().map(|t| t.duplicate_count()).sum();

        Self {
            episodes: traces.len(),
            mean_theta_estimate: average(&theta_sum, &step_counts),
            mean_true_theta: average(&true_sum, &step_counts),
            mean_response_time: average(&time_sum, &time_counts),
            mean_difficulty: average(&diff_sum, &step_counts),
            mean_final_error: mean_or_zero(&errors),
            mean_total_reward: mean_or_zero(
                &traces.iter().map(|t| t.total_reward()).collect::<Vec<_>>(),
            ),
            duplicate_rate: if total_steps > 0 {
                duplicates as f64 / total_steps as f64
            } else {
                0.0
            },
        }
    }
}

fn mean_or_zero(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}
