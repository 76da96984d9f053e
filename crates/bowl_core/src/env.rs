//! Bowling environment
//!
//! Owns the match state for one innings and orchestrates the step
//! pipeline: action -> delivery physics -> batsman shot -> reward,
//! counters, observation, termination. This is the sole integration
//! point; nothing else calls back into the environment.
//!
//! Determinism contract: each instance owns a `ChaCha8Rng`. Resetting
//! with the same seed and replaying the same action sequence reproduces
//! the entire trajectory bit for bit.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batsman::{Batsman, ShotPlayed, ShotType, Weakness};
use crate::config::EnvConfig;
use crate::error::{EnvError, Result};
use crate::physics::{simulate_delivery, Action, DeliveryParams};

// ============================================================
// Match State
// ============================================================

/// Mutable innings counters, owned exclusively by the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub balls_bowled: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
    /// Balls into the current over (wraps at the over boundary).
    pub current_over_balls: u32,
    /// Runs conceded in the running over (zeroed at the over boundary).
    pub runs_last_over: u32,
}

// ============================================================
// Observation
// ============================================================

/// Fixed-layout observation returned to the agent each ball.
///
/// ## Flat Vector Layout (8 floats)
/// ```text
/// [0] Batsman skill                  [0, 1]
/// [1] Batsman confidence             [0, 1]
/// [2] Success rate, last 3 shots     [0, 1]
/// [3] Short-ball weakness one-hot    {0, 1}
/// [4] Spin weakness one-hot          {0, 1}
/// [5] Balls remaining                [0, 60]
/// [6] Runs in the running over       [0, 36]
/// [7] Balls into the running over    [0, 6]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub skill: f32,
    pub confidence: f32,
    pub recent_success: f32,
    pub weak_short_balls: f32,
    pub weak_spin: f32,
    pub balls_remaining: f32,
    pub runs_last_over: f32,
    pub current_over_balls: f32,
}

impl Observation {
    /// Total size of flat vector output.
    pub const DIM: usize = 8;

    /// Per-dimension lower bounds.
    pub const LOW: [f32; Self::DIM] = [0.0; Self::DIM];
    /// Per-dimension upper bounds for the [`EnvConfig::default`] innings
    /// shape. The last three dims scale with `balls_per_innings` and
    /// `balls_per_over`; a caller running a non-default shape must size
    /// its own bounds from the config.
    pub const HIGH: [f32; Self::DIM] = [1.0, 1.0, 1.0, 1.0, 1.0, 60.0, 36.0, 6.0];

    /// Convert to a flat f32 vector for ML pipelines.
    pub fn to_vector(&self) -> [f32; Self::DIM] {
        [
            self.skill,
            self.confidence,
            self.recent_success,
            self.weak_short_balls,
            self.weak_spin,
            self.balls_remaining,
            self.runs_last_over,
            self.current_over_balls,
        ]
    }
}

// ============================================================
// Step Output
// ============================================================

/// Diagnostic payload attached to every step. Never used for control
/// flow by the environment itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub delivery: DeliveryParams,
    pub shot: ShotType,
    pub successful: bool,
    /// Runs off this ball (0 on a failed shot).
    pub runs_scored: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
}

/// Everything one `step` returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    /// Always false: the innings has no wall-clock limit.
    pub truncated: bool,
    pub info: StepInfo,
}

// ============================================================
// Runs and Reward Tables
// ============================================================

/// Runs scored off a cleanly executed shot.
fn runs_scored(shot: ShotType, timing: f32) -> u32 {
    let base = match shot {
        ShotType::Drive => 4,
        ShotType::CoverDrive => 4,
        ShotType::OnDrive => 3,
        ShotType::Cut => 4,
        ShotType::Pull => 6,
        ShotType::Defense => 0,
        ShotType::Leave => 0,
    };
    if timing > 0.8 && base > 0 {
        base + 1
    } else {
        base
    }
}

/// Base reward for one ball, before the wicket bonus.
///
/// Shaped to favour beating the bat and containment: beaten bat pays,
/// conceded runs cost double, the good-length band pays a flat bonus,
/// and the running economy rate nudges the total either way. Evaluated
/// against the counters as they stood *before* this ball.
fn base_reward(
    delivery: &DeliveryParams,
    played: &ShotPlayed,
    runs: u32,
    state: &MatchState,
) -> f32 {
    let mut reward = 0.0;

    if !played.successful {
        reward += 10.0;
        if played.timing < 0.3 {
            // Clearly beaten.
            reward += 5.0;
        }
    } else {
        reward -= runs as f32 * 2.0;
    }

    if 7.5 < delivery.length_m && delivery.length_m < 9.5 {
        reward += 2.0;
    }

    if state.balls_bowled > 0 {
        let economy = state.runs_conceded as f32 / (state.balls_bowled as f32 / 6.0);
        if economy < 6.0 {
            reward += 1.0;
        } else if economy > 9.0 {
            reward -= 1.0;
        }
    }

    reward
}

// ============================================================
// Environment
// ============================================================

struct Episode {
    batsman: Batsman,
    state: MatchState,
}

/// Single-agent bowling environment.
///
/// Call [`BowlingEnv::reset`] to start an episode before the first
/// [`BowlingEnv::step`]; stepping a never-reset environment is a
/// programming error and fails with [`EnvError::NotStarted`].
pub struct BowlingEnv {
    config: EnvConfig,
    rng: ChaCha8Rng,
    episode: Option<Episode>,
}

impl BowlingEnv {
    pub fn new(config: EnvConfig) -> Self {
        Self { config, rng: ChaCha8Rng::from_entropy(), episode: None }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Current innings counters, if an episode is running.
    pub fn match_state(&self) -> Option<&MatchState> {
        self.episode.as_ref().map(|e| &e.state)
    }

    /// Start a fresh episode: zero the counters and draw a new batsman.
    ///
    /// A given seed reseeds the instance RNG so the whole trajectory is
    /// reproducible; without one the episode continues from the current
    /// RNG stream.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        let skill = self.rng.gen_range(self.config.skill_min..=self.config.skill_max);
        let weakness = Weakness::ALL[self.rng.gen_range(0..Weakness::ALL.len())];
        debug!(skill, ?weakness, ?seed, "episode reset");

        let batsman = Batsman::new(
            skill,
            weakness,
            self.config.baseline_confidence,
            self.config.timing_sigma,
        );
        let episode = Episode { batsman, state: MatchState::default() };
        let observation = Self::observe(&episode, &self.config);
        self.episode = Some(episode);
        observation
    }

    /// Bowl one ball.
    ///
    /// All fallible work (action validation happened at `Action`
    /// construction; delivery simulation here) runs before any state
    /// mutation, so a failed step leaves the episode untouched.
    pub fn step(&mut self, action: &Action) -> Result<StepResult> {
        let episode = self.episode.as_mut().ok_or(EnvError::NotStarted)?;
        let delivery = simulate_delivery(action)?;

        let played = episode.batsman.play_shot(&delivery, &mut self.rng);

        // Reward sees the pre-ball counters; the economy term in
        // particular is silent on the very first ball.
        let runs = if played.successful { runs_scored(played.shot, played.timing) } else { 0 };
        let mut reward = base_reward(&delivery, &played, runs, &episode.state);

        let state = &mut episode.state;
        state.balls_bowled += 1;
        state.current_over_balls += 1;

        if played.successful {
            state.runs_conceded += runs;
            if state.current_over_balls <= self.config.balls_per_over {
                state.runs_last_over += runs;
            }
        } else if played.timing < self.config.wicket_timing_threshold
            && self.rng.gen::<f32>() < self.config.wicket_probability
        {
            // Independent draw from the timing sample.
            state.wickets_taken += 1;
            reward += self.config.wicket_bonus;
            debug!(
                ball = state.balls_bowled,
                wickets = state.wickets_taken,
                "wicket"
            );
        }

        // Over boundary: the running-over counters reset together, so a
        // boundary ball's runs are visible in info but not in the next
        // observation.
        if state.current_over_balls >= self.config.balls_per_over {
            state.current_over_balls = 0;
            state.runs_last_over = 0;
        }

        let terminated = state.balls_bowled >= self.config.balls_per_innings
            || state.wickets_taken >= self.config.max_wickets;

        let info = StepInfo {
            delivery,
            shot: played.shot,
            successful: played.successful,
            runs_scored: runs,
            runs_conceded: state.runs_conceded,
            wickets_taken: state.wickets_taken,
        };

        Ok(StepResult {
            observation: Self::observe(episode, &self.config),
            reward,
            terminated,
            truncated: false,
            info,
        })
    }

    fn observe(episode: &Episode, config: &EnvConfig) -> Observation {
        let [skill, confidence, recent_success, weak_short_balls, weak_spin] =
            episode.batsman.state_features();
        let state = &episode.state;
        Observation {
            skill,
            confidence,
            recent_success,
            weak_short_balls,
            weak_spin,
            balls_remaining: config.balls_per_innings.saturating_sub(state.balls_bowled) as f32,
            runs_last_over: state.runs_last_over as f32,
            current_over_balls: state.current_over_balls as f32,
        }
    }
}

// ============================================================
// Tests
// ============================================================
