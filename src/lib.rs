//! # cat-sim - 自适应测试仿真库
//!
//! 本 crate 提供计算机化自适应测试 (CAT) 的仿真环境，供出题策略的训练与评估使用:
//!
//! - **Simulated Examinee** - 逻辑斯蒂作答模型 (正确率 + 作答时间)
//! - **Adaptive Test Environment** - 回合状态机 (reset / step / 终止)
//! - **Observation / Reward** - 固定长度观测向量与奖励函数
//! - **Rollouts** - 并行回合采样与评估汇总
//!
//! ## 模块结构
//!
//! - [`examinee`] - 模拟考生 (真实能力、作答采样)
//! - [`state`] - 单回合状态 (已出题目、作答历史、能力估计)
//! - [`observation`] - 观测向量构建与取值范围
//! - [`reward`] - 奖励函数与权重
//! - [`env`] - 环境状态机与 [`Environment`] 接口
//! - [`bank`] - 题库 (只读、带边界检查)
//! - [`rollout`] - 回合驱动、并行采样、评估汇总
//! - [`config`] - 环境配置
//! - [`sanitize`] - 观测向量校验与裁剪
//! - [`logging`] - tracing 初始化
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use cat_sim::{AdaptiveTestEnv, EnvConfig, Environment, QuestionBank, StudentProfile};
//!
//! let bank = Arc::new(QuestionBank::from_difficulties(&[0.1, 0.3, 0.5, 0.7, 0.9]).unwrap());
//! let config = EnvConfig::new(StudentProfile::Expert).with_seed(7);
//! let mut env = AdaptiveTestEnv::new(bank, config).unwrap();
//!
//! let obs = env.reset();
//! assert_eq!(obs.len(), 13);
//!
//! let result = env.step(0).unwrap();
//! assert!(!result.done);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod bank;
pub mod config;
pub mod env;
pub mod error;
pub mod examinee;
pub mod logging;
pub mod observation;
pub mod reward;
pub mod rollout;
pub mod sanitize;
pub mod state;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use error::{CatError, Result};

/// 重新导出题库
pub use bank::{Item, QuestionBank};

/// 重新导出模拟考生
pub use examinee::{correct_probability, SimulatedExaminee};

/// 重新导出环境
pub use config::EnvConfig;
pub use env::{AdaptiveTestEnv, Environment, StepResult};
pub use observation::{Observation, ObservationBounds};
pub use reward::{RewardComponents, RewardFunction, RewardWeights, Transition};
pub use state::AdaptiveTestState;

/// 重新导出回合采样
pub use rollout::{run_episode, run_episodes_parallel, EpisodeTrace, EvaluationSummary, StepRecord};
