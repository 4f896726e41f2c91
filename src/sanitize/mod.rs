//! Data Sanitization
//!
//! Consumer-side helpers for observation vectors. The environment publishes
//! bounds but never clips its own output; policies that need a bounded input
//! apply these before feeding a network.

use crate::observation::{Observation, ObservationBounds};
use crate::types::OBSERVATION_DIM;

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Whether every element lies inside the declared bounds
pub fn observation_in_bounds(obs: &Observation, bounds: &ObservationBounds) -> bool {
    !has_invalid_values(obs.as_slice()) && bounds.contains(obs)
}

/// 将观测向量裁剪到声明的范围内；NaN 置为下界
pub fn clip_observation(obs: &Observation, bounds: &ObservationBounds) -> [f64; OBSERVATION_DIM] {
    let mut out = [0.0; OBSERVATION_DIM];
    for (i, (&val, slot)) in obs.as_slice().iter().zip(out.iter_mut()).enumerate() {
        let (lo, hi) = (bounds.low[i], bounds.high[i]);
        *slot = if val.is_nan() {
            lo
        } else if val > hi {
            hi
        } else if val < lo {
            lo
        } else {
            val
        };
    }
    out
}
