//! Error taxonomy for the adaptive testing simulator.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatError {
    #[error("unknown student profile: {0}")]
    InvalidProfile(String),
    #[error("action {action} out of range: question bank has {n_items} items")]
    InvalidAction { action: usize, n_items: usize },
    #[error("episode already finished after {max_steps} steps; call reset() first")]
    EpisodeFinished { max_steps: usize },
    #[error("question bank is empty")]
    EmptyQuestionBank,
    #[error("item {index} has non-finite difficulty {value}")]
    InvalidDifficulty { index: usize, value: f64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CatError>;
