//! Environment configuration

use serde::{Deserialize, Serialize};

/// Tunable parameters for one bowling environment instance.
///
/// Defaults give a 10-over innings with 3 wickets in hand and a batsman
/// drawn from the 0.5-0.9 skill band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    // === Innings Shape ===
    /// Balls in the innings before termination (default: 60)
    pub balls_per_innings: u32,
    /// Balls per over (default: 6)
    pub balls_per_over: u32,
    /// Wickets that end the innings (default: 3)
    pub max_wickets: u32,

    // === Batsman Draw ===
    /// Lower bound of the per-episode skill draw (default: 0.5)
    pub skill_min: f32,
    /// Upper bound of the per-episode skill draw (default: 0.9)
    pub skill_max: f32,
    /// Confidence every fresh batsman starts at (default: 0.5)
    pub baseline_confidence: f32,
    /// Std deviation of the per-shot timing draw around skill (default: 0.2)
    pub timing_sigma: f32,

    // === Dismissals ===
    /// Chance of a wicket when the batsman is clearly beaten (default: 0.3)
    pub wicket_probability: f32,
    /// Timing quality below which a failed shot risks a wicket (default: 0.3)
    pub wicket_timing_threshold: f32,
    /// Reward added on top of the base reward for a wicket (default: 20.0)
    pub wicket_bonus: f32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            balls_per_innings: 60,
            balls_per_over: 6,
            max_wickets: 3,

            skill_min: 0.5,
            skill_max: 0.9,
            baseline_confidence: 0.5,
            timing_sigma: 0.2,

            wicket_probability: 0.3,
            wicket_timing_threshold: 0.3,
            wicket_bonus: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_innings_shape() {
        let cfg = EnvConfig::default();
        assert_eq!(cfg.balls_per_innings, 60);
        assert_eq!(cfg.balls_per_over, 6);
        assert_eq!(cfg.max_wickets, 3);
        assert_eq!(cfg.skill_min, 0.5);
        assert_eq!(cfg.skill_max, 0.9);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = EnvConfig { balls_per_innings: 12, ..Default::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.balls_per_innings, 12);
        assert_eq!(back.wicket_bonus, cfg.wicket_bonus);
    }
}
