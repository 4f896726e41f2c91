//! Benchmark suite for cat-sim
//!
//! Run with: cargo bench

use std::sync::Arc;

use cat_sim::{
    run_episode, run_episodes_parallel, AdaptiveTestEnv, AdaptiveTestState, EnvConfig,
    ExamineeResponse, Observation, QuestionBank, StudentProfile,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_bank() -> Arc<QuestionBank> {
    let difficulties: Vec<f64> = (0..500).map(|i| i as f64 / 499.0).collect();
    Arc::new(QuestionBank::from_difficulties(&difficulties).expect("bank"))
}

fn stride_policy() -> impl FnMut(&Observation) -> usize {
    let mut next = 0;
    move |_obs: &Observation| {
        next = (next + 37) % 500;
        next
    }
}

fn bench_full_episode(c: &mut Criterion) {
    let mut env =
        AdaptiveTestEnv::new(make_bank(), EnvConfig::new(StudentProfile::Average).with_seed(1))
            .expect("env");
    c.bench_function("episode/20_steps", |b| {
        b.iter(|| run_episode(&mut env, stride_policy()).expect("episode"))
    });
}

fn bench_observation(c: &mut Criterion) {
    let mut state = AdaptiveTestState::new();
    for i in 0..20 {
        state.record_answer(
            i,
            0.5,
            ExamineeResponse {
                correct: (i % 2) as u8,
                response_time: 2.0 + i as f64 * 0.1,
            },
        );
    }
    c.bench_function("observation/from_state", |b| {
        b.iter(|| Observation::from_state(black_box(&state)))
    });
}

fn bench_parallel_batch(c: &mut Criterion) {
    let bank = make_bank();
    let config = EnvConfig::new(StudentProfile::Expert);
    let seeds: Vec<u64> = (0..256).collect();
    c.bench_function("rollout/parallel_256", |b| {
        b.iter(|| {
            run_episodes_parallel(Arc::clone(&bank), &config, &seeds, stride_policy)
                .expect("batch")
        })
    });
}

criterion_group!(benches, bench_full_episode, bench_observation, bench_parallel_batch);
criterion_main!(benches);
