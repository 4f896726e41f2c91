//! Adaptive Test State
//!
//! Per-episode record of what has been asked and how the examinee answered.
//! Only accepted (novel) selections touch the histories; duplicates only
//! advance the step counter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{ExamineeResponse, THETA_PRIOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveTestState {
    asked: HashSet<usize>,
    /// Accepted item indices in selection order
    asked_order: Vec<usize>,
    correctness_history: Vec<u8>,
    response_time_history: Vec<f64>,
    correct_difficulties: Vec<f64>,
    theta_estimate: f64,
    step_count: usize,
}

impl Default for AdaptiveTestState {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveTestState {
    pub fn new() -> Self {
        Self {
            asked: HashSet::new(),
            asked_order: Vec::new(),
            correctness_history: Vec::new(),
            response_time_history: Vec::new(),
            correct_difficulties: Vec::new(),
            theta_estimate: THETA_PRIOR,
            step_count: 0,
        }
    }

    pub fn is_asked(&self, item: usize) -> bool {
        self.asked.contains(&item)
    }

    /// Record an answer to a not-yet-asked item and refresh the estimate.
    ///
    /// Returns `false` without touching anything if `item` was already asked.
    pub fn record_answer(&mut self, item: usize, difficulty: f64, response: ExamineeResponse) -> bool {
        if !self.asked.insert(item) {
            return false;
        }
        self.asked_order.push(item);
        self.correctness_history.push(response.correct);
        self.response_time_history.push(response.response_time);
        if response.is_correct() {
            self.correct_difficulties.push(difficulty);
        }
        self.theta_estimate = estimate_theta(&self.correct_difficulties);
        true
    }

    pub fn advance_step(&mut self) {
        self.step_count += 1;
    }

    pub fn asked(&self) -> &HashSet<usize> {
        &self.asked
    }

    pub fn asked_order(&self) -> &[usize] {
        &self.asked_order
    }

    pub fn correctness_history(&self) -> &[u8] {
        &self.correctness_history
    }

    pub fn response_time_history(&self) -> &[f64] {
        &self.response_time_history
    }

    pub fn correct_difficulties(&self) -> &[f64] {
        &self.correct_difficulties
    }

    pub fn theta_estimate(&self) -> f64 {
        self.theta_estimate
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn n_answered(&self) -> usize {
        self.asked.len()
    }
}

/// Mean difficulty of correctly answered items, or the neutral prior when none.
pub fn estimate_theta(correct_difficulties: &[f64]) -> f64 {
    if correct_difficulties.is_empty() {
        THETA_PRIOR
    } else {
        correct_difficulties.iter().sum::<f64>() / correct_difficulties.len() as f64
    }
}
