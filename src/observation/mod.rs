//! Observation Builder
//!
//! Projects the episode state into a fixed 13-element feature vector:
//!
//! | index  | feature                                         |
//! |--------|-------------------------------------------------|
//! | 0      | theta estimate                                  |
//! | 1      | mean response time                              |
//! | 2      | population std of response times                |
//! | 3..8   | last 5 correctness values, left-padded with 0   |
//! | 8..13  | last 5 response times, left-padded with 0.0     |
//!
//! Bounds are published for consumers; the builder itself never clips.

use serde::{Deserialize, Serialize};

use crate::state::AdaptiveTestState;
use crate::types::{HISTORY_WINDOW, MAX_OBSERVED_TIME, OBSERVATION_DIM};

const CORRECTNESS_OFFSET: usize = 3;
const TIME_OFFSET: usize = CORRECTNESS_OFFSET + HISTORY_WINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    values: [f64; OBSERVATION_DIM],
}

impl Observation {
    pub fn from_state(state: &AdaptiveTestState) -> Self {
        let times = state.response_time_history();
        let mut values = [0.0; OBSERVATION_DIM];

        values[0] = state.theta_estimate();
        values[1] = mean(times);
        values[2] = population_std(times);

        let correctness: Vec<f64> = state
            .correctness_history()
            .iter()
            .map(|&c| f64::from(c))
            .collect();
        fill_window(&mut values[CORRECTNESS_OFFSET..TIME_OFFSET], &correctness);
        fill_window(&mut values[TIME_OFFSET..], times);

        Self { values }
    }

    pub fn theta_estimate(&self) -> f64 {
        self.values[0]
    }

    pub fn mean_response_time(&self) -> f64 {
        self.values[1]
    }

    pub fn std_response_time(&self) -> f64 {
        self.values[2]
    }

    pub fn recent_correctness(&self) -> &[f64] {
        &self.values[CORRECTNESS_OFFSET..TIME_OFFSET]
    }

    pub fn recent_response_times(&self) -> &[f64] {
        &self.values[TIME_OFFSET..]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    /// Single-precision copy, the layout most policy networks consume
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

impl From<Observation> for Vec<f64> {
    fn from(obs: Observation) -> Self {
        obs.to_vec()
    }
}

/// Declared per-element bounds of the observation space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationBounds {
    pub low: [f64; OBSERVATION_DIM],
    pub high: [f64; OBSERVATION_DIM],
}

impl Default for ObservationBounds {
    fn default() -> Self {
        let mut high = [MAX_OBSERVED_TIME; OBSERVATION_DIM];
        high[0] = 1.0;
        for slot in &mut high[CORRECTNESS_OFFSET..TIME_OFFSET] {
            *slot = 1.0;
        }
        Self {
            low: [0.0; OBSERVATION_DIM],
            high,
        }
    }
}

impl ObservationBounds {
    pub fn contains(&self, obs: &Observation) -> bool {
        obs.as_slice()
            .iter()
            .zip(self.low.iter().zip(self.high.iter()))
            .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn population_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
    var.sqrt()
}

/// Copy the tail of `history` into `window`, oldest first, zero-padding the front.
fn fill_window(window: &mut [f64], history: &[f64]) {
    let take = history.len().min(window.len());
    let pad = window.len() - take;
    window[..pad].fill(0.0);
    window[pad..].copy_from_slice(&history[history.len() - take..]);
}
