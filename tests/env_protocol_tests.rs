//! Integration tests for the adaptive test environment protocol.
//!
//! Covers reset/step behaviour, duplicate handling, episode length and the
//! error taxonomy as seen by an external training driver.

use std::sync::Arc;

use cat_sim::{
    AdaptiveTestEnv, CatError, EnvConfig, Environment, EpisodePhase, QuestionBank,
    StudentProfile, MAX_STEPS, OBSERVATION_DIM, THETA_PRIOR,
};

fn uniform_bank(n: usize) -> Arc<QuestionBank> {
    let difficulties: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
    Arc::new(QuestionBank::from_difficulties(&difficulties).unwrap())
}

fn make_env(profile: StudentProfile, seed: u64) -> AdaptiveTestEnv {
    AdaptiveTestEnv::new(uniform_bank(50), EnvConfig::new(profile).with_seed(seed)).unwrap()
}

#[test]
fn expert_answers_easy_item_and_estimate_tracks_it() {
    let bank = Arc::new(QuestionBank::from_difficulties(&[0.2, 0.5, 0.8]).unwrap());
    let trials = 200;
    let mut hits = 0;

    for seed in 0..trials {
        let mut env =
            AdaptiveTestEnv::new(Arc::clone(&bank), EnvConfig::new(StudentProfile::Expert).with_seed(seed))
                .unwrap();
        env.reset();
        let result = env.step(0).unwrap();
        if result.info.correct == 1 {
            hits += 1;
            assert!((result.observation.theta_estimate() - 0.2).abs() < 1e-12);
        } else {
            assert_eq!(result.observation.theta_estimate(), THETA_PRIOR);
        }
    }

    // P(correct) >= 0.98 for every expert
    assert!(hits >= 185, "only {} of {} correct", hits, trials);
}

#[test]
fn repeated_action_is_pure_penalty() {
    for profile in StudentProfile::ALL {
        let mut env = make_env(profile, 17);
        env.reset();

        let first = env.step(12).unwrap();
        let expected = -(first.info.theta_estimate - env.true_theta()).abs()
            - 0.1 * first.info.response_time;
        assert!((first.reward - expected).abs() < 1e-12);

        let state_before = env.state().clone();
        let second = env.step(12).unwrap();

        assert_eq!(second.reward, -2.0);
        assert_eq!(
            second.observation.recent_correctness(),
            first.observation.recent_correctness()
        );
        assert_eq!(
            second.observation.recent_response_times(),
            first.observation.recent_response_times()
        );
        assert_eq!(env.state().correctness_history(), state_before.correctness_history());
        assert_eq!(env.state().response_time_history(), state_before.response_time_history());
        assert_eq!(env.state().correct_difficulties(), state_before.correct_difficulties());
        assert_eq!(env.state().theta_estimate(), state_before.theta_estimate());
        assert_eq!(env.state().step_count(), state_before.step_count() + 1);
    }
}

#[test]
fn twenty_distinct_actions_finish_the_episode() {
    let mut env = make_env(StudentProfile::Average, 3);
    env.reset();

    for action in 0..MAX_STEPS {
        let result = env.step(action * 2).unwrap();
        assert_eq!(result.done, action + 1 == MAX_STEPS);
        assert_eq!(env.state().correctness_history().len(), env.state().step_count());
    }

    assert_eq!(env.phase(), EpisodePhase::Done);
    assert_eq!(
        env.step(49).unwrap_err(),
        CatError::EpisodeFinished { max_steps: MAX_STEPS }
    );
}

#[test]
fn duplicates_count_toward_episode_length() {
    let mut env = make_env(StudentProfile::Novice, 4);
    env.reset();

    for i in 0..MAX_STEPS {
        let result = env.step(0).unwrap();
        assert_eq!(result.done, i + 1 == MAX_STEPS);
    }
    assert_eq!(env.state().n_answered(), 1);
    assert_eq!(env.state().step_count(), MAX_STEPS);
}

#[test]
fn out_of_range_action_is_rejected() {
    let mut env = make_env(StudentProfile::Emerging, 5);
    env.reset();

    let err = env.step(50).unwrap_err();
    assert_eq!(err, CatError::InvalidAction { action: 50, n_items: 50 });
    assert_eq!(env.state().step_count(), 0);
    assert_eq!(env.phase(), EpisodePhase::Ready);
}

#[test]
fn unknown_profile_is_a_configuration_error() {
    let err = AdaptiveTestEnv::with_profile_name(uniform_bank(5), "Grandmaster", None)
        .err()
        .unwrap();
    assert!(matches!(err, CatError::InvalidProfile(_)));
}

#[test]
fn observation_has_fixed_length_throughout() {
    let mut env = make_env(StudentProfile::AboveAverage, 6);
    let obs = env.reset();
    assert_eq!(obs.len(), OBSERVATION_DIM);

    for action in [1, 2, 2, 3, 4, 5, 6, 7] {
        let result = env.step(action).unwrap();
        assert_eq!(result.observation.len(), OBSERVATION_DIM);
        assert!((0.0..=1.0).contains(&result.observation.theta_estimate()));
    }
}

#[test]
fn protocol_surface() {
    let env = make_env(StudentProfile::Average, 7);
    assert_eq!(env.action_space_size(), 50);

    let bounds = env.observation_bounds();
    assert_eq!(bounds.low.len(), OBSERVATION_DIM);
    assert_eq!(bounds.high[0], 1.0);
    assert_eq!(bounds.high[1], 60.0);
}

#[test]
fn step_info_exposes_analysis_fields() {
    let mut env = make_env(StudentProfile::Expert, 8);
    env.reset();
    let result = env.step(10).unwrap();

    let map = result.info.to_map();
    for key in ["step", "action", "difficulty", "duplicate", "theta_estimate", "true_theta"] {
        assert!(map.contains_key(key), "missing {}", key);
    }
    assert_eq!(map["action"], serde_json::json!(10));
    assert!((result.info.difficulty - 10.0 / 49.0).abs() < 1e-12);
}

#[test]
fn reset_draws_a_new_examinee() {
    let mut env = make_env(StudentProfile::Expert, 9);
    let thetas: Vec<f64> = (0..10)
        .map(|_| {
            env.reset();
            env.true_theta()
        })
        .collect();

    assert!(thetas.iter().all(|&t| StudentProfile::Expert.contains(t)));
    assert!(thetas.windows(2).any(|w| w[0] != w[1]));
}
