//! Simulated Examinee
//!
//! Item-response-style answer generator for one hidden examinee.
//!
//! Core principles:
//! - True ability is drawn once, uniformly from the profile's band, and never changes
//! - P(correct) = 1 / (1 + exp(-8 * (theta - difficulty)))
//! - Response time = 2 + 8 * max(0, difficulty - theta) + N(0, 0.5), floored at 0.5s
//!
//! Every examinee owns its generator, so episodes are reproducible from a seed
//! and independent examinees can run on separate threads.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::types::{
    ExamineeResponse, StudentProfile, BASE_RESPONSE_TIME, EPSILON, LOGISTIC_SLOPE,
    MIN_RESPONSE_TIME, RESPONSE_TIME_NOISE_STD, RESPONSE_TIME_PENALTY,
};

/// Probability that an examinee of ability `theta` answers an item of `difficulty` correctly
pub fn correct_probability(theta: f64, difficulty: f64) -> f64 {
    1.0 / (1.0 + (-LOGISTIC_SLOPE * (theta - difficulty)).exp())
}

/// Noise-free response time
pub fn expected_response_time(theta: f64, difficulty: f64) -> f64 {
    BASE_RESPONSE_TIME + RESPONSE_TIME_PENALTY * (difficulty - theta).max(0.0)
}

#[derive(Debug, Clone)]
pub struct SimulatedExaminee {
    profile: StudentProfile,
    true_theta: f64,
    rng: ChaCha8Rng,
}

impl SimulatedExaminee {
    /// Create an examinee from a profile name; unknown names fail with `InvalidProfile`.
    pub fn from_profile_name(name: &str, seed: u64) -> Result<Self> {
        Ok(Self::with_seed(name.parse()?, seed))
    }

    pub fn with_seed(profile: StudentProfile, seed: u64) -> Self {
        Self::from_rng(profile, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Take ownership of `rng` and draw the true ability from it
    pub fn from_rng(profile: StudentProfile, mut rng: ChaCha8Rng) -> Self {
        let (low, high) = profile.theta_range();
        let true_theta = if profile.upper_inclusive() {
            rng.gen_range(low..=high)
        } else {
            rng.gen_range(low..high)
        };

        Self {
            profile,
            true_theta,
            rng,
        }
    }

    pub fn profile(&self) -> StudentProfile {
        self.profile
    }

    pub fn true_theta(&self) -> f64 {
        self.true_theta
    }

    /// Answer one item
    pub fn answer(&mut self, difficulty: f64) -> ExamineeResponse {
        let p = correct_probability(self.true_theta, difficulty);
        let correct = self.rng.gen::<f64>() < p;

        let noise = self.sample_normal() * RESPONSE_TIME_NOISE_STD;
        let response_time =
            (expected_response_time(self.true_theta, difficulty) + noise).max(MIN_RESPONSE_TIME);

        ExamineeResponse {
            correct: u8::from(correct),
            response_time,
        }
    }

    /// Standard normal via Box-Muller
    fn sample_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.gen::<f64>().max(EPSILON);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
