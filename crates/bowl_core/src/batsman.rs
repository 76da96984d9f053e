//! Batsman decision model
//!
//! Scripted opponent for the bowling environment. Given one delivery it
//! picks a shot from a line/length decision table, scores the shot's
//! chance of success from a base-probability table plus weakness, speed,
//! and confidence modifiers, samples a timing quality around its skill,
//! and commits the outcome to a rolling shot history that feeds back
//! into confidence.
//!
//! The timing draw is the model's only randomness; the wicket draw on a
//! failed shot belongs to the environment, not to the batsman.

use std::collections::VecDeque;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::physics::DeliveryParams;

/// Rolling shot history capacity.
const HISTORY_CAP: usize = 10;
/// Shots considered by the confidence window.
const CONFIDENCE_WINDOW: usize = 5;
/// Shots considered by the observation's recent-success feature.
const RECENT_WINDOW: usize = 3;

// ============================================================
// Shot and Weakness Taxonomy
// ============================================================

/// Shots the batsman can attempt.
///
/// Closed set: the decision, probability, and runs tables match on it
/// exhaustively, so an unmapped shot cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    Drive,
    CoverDrive,
    OnDrive,
    Cut,
    Pull,
    Defense,
    Leave,
}

impl ShotType {
    /// Base probability of executing the shot cleanly, before modifiers.
    pub fn base_success_probability(&self) -> f32 {
        match self {
            ShotType::Drive => 0.7,
            ShotType::CoverDrive => 0.6,
            ShotType::OnDrive => 0.6,
            ShotType::Cut => 0.8,
            ShotType::Pull => 0.5,
            ShotType::Defense => 0.9,
            ShotType::Leave => 1.0,
        }
    }
}

/// Per-episode batsman weakness.
///
/// `Pace` carries no dedicated modifier: every batsman already takes the
/// flat penalty against deliveries above 45 m/s, so a pace weakness adds
/// nothing on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weakness {
    ShortBalls,
    Spin,
    Pace,
}

impl Weakness {
    /// All draws available at episode start, in draw order.
    pub const ALL: [Weakness; 3] = [Weakness::ShortBalls, Weakness::Spin, Weakness::Pace];
}

// ============================================================
// Shot Selection
// ============================================================

/// Shot decision table keyed on length band and line at the batsman.
pub fn select_shot(final_line: f32, length_m: f32) -> ShotType {
    if length_m < 6.0 {
        // Yorker band: dig it out or let it go.
        if final_line.abs() < 0.3 {
            ShotType::Defense
        } else {
            ShotType::Leave
        }
    } else if length_m < 9.0 {
        // Full band: drive, with the wide variants split by side.
        if final_line.abs() < 0.2 {
            ShotType::Drive
        } else if final_line > 0.0 {
            ShotType::CoverDrive
        } else {
            ShotType::OnDrive
        }
    } else if length_m < 12.0 {
        // Good length: defend the straight ball, cut or pull the wide one.
        if final_line.abs() < 0.3 {
            ShotType::Defense
        } else if final_line > 0.2 {
            ShotType::Cut
        } else {
            ShotType::Pull
        }
    } else {
        // Short band.
        if final_line.abs() < 0.4 {
            ShotType::Pull
        } else {
            ShotType::Leave
        }
    }
}

// ============================================================
// Batsman
// ============================================================

/// Outcome of one shot attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotPlayed {
    pub shot: ShotType,
    /// How well the bat met the ball, clamped to [0.1, 1.0].
    pub timing: f32,
    pub successful: bool,
}

/// Scripted batsman. One instance lives for exactly one episode.
#[derive(Debug, Clone)]
pub struct Batsman {
    skill: f32,
    weakness: Weakness,
    confidence: f32,
    timing_sigma: f32,
    shot_history: VecDeque<(ShotType, bool)>,
}

impl Batsman {
    pub fn new(skill: f32, weakness: Weakness, baseline_confidence: f32, timing_sigma: f32) -> Self {
        Self {
            skill,
            weakness,
            confidence: baseline_confidence,
            timing_sigma,
            shot_history: VecDeque::with_capacity(HISTORY_CAP),
        }
    }

    pub fn skill(&self) -> f32 {
        self.skill
    }

    pub fn weakness(&self) -> Weakness {
        self.weakness
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn shots_played(&self) -> usize {
        self.shot_history.len()
    }

    /// Chance of executing `shot` cleanly against `delivery`.
    ///
    /// Every factor is <= 1, so the product stays in [0, 1].
    pub fn success_probability(&self, shot: ShotType, delivery: &DeliveryParams) -> f32 {
        let mut prob = shot.base_success_probability();

        match self.weakness {
            Weakness::ShortBalls if delivery.length_m > 10.0 => prob *= 0.7,
            Weakness::Spin if delivery.spin_magnitude > 25.0 => prob *= 0.8,
            _ => {}
        }

        // Express pace troubles everyone.
        if delivery.speed_mps > 45.0 {
            prob *= 0.9;
        }

        prob * self.confidence
    }

    /// Face one delivery: pick a shot, decide the outcome, update history
    /// and confidence.
    pub fn play_shot(&mut self, delivery: &DeliveryParams, rng: &mut impl Rng) -> ShotPlayed {
        let shot = select_shot(delivery.final_line, delivery.length_m);
        let success_prob = self.success_probability(shot, delivery);

        // Sigma is validated positive by construction, so Normal::new
        // cannot fail here; fall back to raw skill just in case.
        let timing = Normal::new(self.skill, self.timing_sigma)
            .map(|n| n.sample(rng))
            .unwrap_or(self.skill)
            .clamp(0.1, 1.0);

        let successful = timing * success_prob > 0.5;

        self.shot_history.push_back((shot, successful));
        if self.shot_history.len() > HISTORY_CAP {
            self.shot_history.pop_front();
        }
        self.update_confidence();

        ShotPlayed { shot, timing, successful }
    }

    /// Confidence from the last five outcomes. The divisor is always 5:
    /// a batsman early in the innings reads missing shots as failures,
    /// so confidence climbs from the floor as real successes arrive.
    fn update_confidence(&mut self) {
        if self.shot_history.is_empty() {
            return;
        }
        let successes = self
            .shot_history
            .iter()
            .rev()
            .take(CONFIDENCE_WINDOW)
            .filter(|(_, ok)| *ok)
            .count();
        self.confidence = 0.3 + 0.7 * successes as f32 / CONFIDENCE_WINDOW as f32;
    }

    /// Feature view for the observation vector:
    /// [skill, confidence, recent success rate, short-ball one-hot, spin one-hot].
    pub fn state_features(&self) -> [f32; 5] {
        let recent_success = if self.shot_history.is_empty() {
            0.5
        } else {
            let successes = self
                .shot_history
                .iter()
                .rev()
                .take(RECENT_WINDOW)
                .filter(|(_, ok)| *ok)
                .count();
            successes as f32 / RECENT_WINDOW as f32
        };

        [
            self.skill,
            self.confidence,
            recent_success,
            if self.weakness == Weakness::ShortBalls { 1.0 } else { 0.0 },
            if self.weakness == Weakness::Spin { 1.0 } else { 0.0 },
        ]
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{simulate_delivery, Action};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn delivery(speed: f32, line: f32, length: f32, spin_type: f32, spin_mag: f32) -> DeliveryParams {
        simulate_delivery(&Action::new(speed, line, length, spin_type, spin_mag)).unwrap()
    }

    fn steady_batsman(weakness: Weakness) -> Batsman {
        Batsman::new(0.7, weakness, 0.5, 0.2)
    }

    #[test]
    fn test_shot_table_yorker_band() {
        assert_eq!(select_shot(0.0, 5.0), ShotType::Defense);
        assert_eq!(select_shot(0.4, 5.0), ShotType::Leave);
        assert_eq!(select_shot(-0.35, 4.0), ShotType::Leave);
    }

    #[test]
    fn test_shot_table_full_band() {
        assert_eq!(select_shot(0.1, 7.0), ShotType::Drive);
        assert_eq!(select_shot(0.3, 7.0), ShotType::CoverDrive);
        assert_eq!(select_shot(-0.3, 7.0), ShotType::OnDrive);
    }

    #[test]
    fn test_shot_table_good_length_band() {
        assert_eq!(select_shot(0.0, 10.0), ShotType::Defense);
        assert_eq!(select_shot(0.3, 10.0), ShotType::Cut);
        // Wide but not past the cut threshold on the leg side: pull.
        assert_eq!(select_shot(-0.35, 10.0), ShotType::Pull);
    }

    #[test]
    fn test_shot_table_short_band() {
        assert_eq!(select_shot(0.0, 13.0), ShotType::Pull);
        assert_eq!(select_shot(0.45, 13.0), ShotType::Leave);
    }

    #[test]
    fn test_mid_action_resolves_to_defense() {
        // Mid speed, line ~0, length 9.0, offspin at 25 rpm.
        let d = delivery(0.5, 0.5, 0.5, 0.0, 0.5);
        assert_eq!(select_shot(d.final_line, d.length_m), ShotType::Defense);
    }

    #[test]
    fn test_base_probability_table() {
        assert_eq!(ShotType::Drive.base_success_probability(), 0.7);
        assert_eq!(ShotType::Cut.base_success_probability(), 0.8);
        assert_eq!(ShotType::Pull.base_success_probability(), 0.5);
        assert_eq!(ShotType::Leave.base_success_probability(), 1.0);
    }

    #[test]
    fn test_short_ball_weakness_lowers_probability() {
        let short = delivery(0.5, 0.5, 0.8, 0.0, 0.0); // length 12.0
        let vulnerable = steady_batsman(Weakness::ShortBalls);
        let solid = steady_batsman(Weakness::Pace);

        let shot = select_shot(short.final_line, short.length_m);
        let p_vulnerable = vulnerable.success_probability(shot, &short);
        let p_solid = solid.success_probability(shot, &short);
        assert!(
            p_vulnerable < p_solid,
            "short-ball weakness should lower probability: {} vs {}",
            p_vulnerable,
            p_solid
        );
        assert!((p_vulnerable - p_solid * 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_spin_weakness_only_bites_on_big_turn() {
        let big_spin = delivery(0.5, 0.5, 0.5, 0.0, 0.8); // 40 rpm
        let small_spin = delivery(0.5, 0.5, 0.5, 0.0, 0.3); // 15 rpm
        let batsman = steady_batsman(Weakness::Spin);

        let shot = ShotType::Defense;
        let p_big = batsman.success_probability(shot, &big_spin);
        let p_small = batsman.success_probability(shot, &small_spin);
        assert!(p_big < p_small);
        assert!((p_big - p_small * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_express_pace_penalty_applies_to_everyone() {
        let fast = delivery(0.7, 0.5, 0.5, 0.0, 0.0); // 48 m/s
        let medium = delivery(0.5, 0.5, 0.5, 0.0, 0.0); // 40 m/s
        for weakness in Weakness::ALL {
            let batsman = steady_batsman(weakness);
            let p_fast = batsman.success_probability(ShotType::Defense, &fast);
            let p_medium = batsman.success_probability(ShotType::Defense, &medium);
            assert!((p_fast - p_medium * 0.9).abs() < 1e-6, "weakness {:?}", weakness);
        }
    }

    #[test]
    fn test_timing_clamped_to_band() {
        let mut rng = test_rng();
        let d = delivery(0.5, 0.5, 0.5, 0.0, 0.5);
        let mut batsman = Batsman::new(0.9, Weakness::Pace, 0.5, 0.4);
        for _ in 0..500 {
            let played = batsman.play_shot(&d, &mut rng);
            assert!(
                (0.1..=1.0).contains(&played.timing),
                "timing out of band: {}",
                played.timing
            );
        }
    }

    #[test]
    fn test_history_capped_at_ten() {
        let mut rng = test_rng();
        let d = delivery(0.5, 0.5, 0.5, 0.0, 0.5);
        let mut batsman = steady_batsman(Weakness::Spin);
        for _ in 0..50 {
            batsman.play_shot(&d, &mut rng);
            assert!(batsman.shots_played() <= 10);
        }
        assert_eq!(batsman.shots_played(), 10);
    }

    #[test]
    fn test_confidence_stays_in_band() {
        let mut rng = test_rng();
        let d = delivery(0.5, 0.5, 0.5, 0.0, 0.5);
        let mut batsman = steady_batsman(Weakness::ShortBalls);
        for _ in 0..200 {
            batsman.play_shot(&d, &mut rng);
            let c = batsman.confidence();
            assert!((0.3..=1.0).contains(&c), "confidence out of band: {}", c);
        }
    }

    #[test]
    fn test_confidence_divisor_counts_missing_shots_as_failures() {
        let mut batsman = steady_batsman(Weakness::Pace);
        // Seed the history with a single success directly.
        batsman.shot_history.push_back((ShotType::Leave, true));
        batsman.update_confidence();
        // 1 success over a fixed divisor of 5.
        assert!((batsman.confidence() - (0.3 + 0.7 / 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_state_features_layout() {
        let batsman = Batsman::new(0.8, Weakness::Spin, 0.5, 0.2);
        let f = batsman.state_features();
        assert_eq!(f[0], 0.8);
        assert_eq!(f[1], 0.5);
        assert_eq!(f[2], 0.5, "empty history defaults recent success to 0.5");
        assert_eq!(f[3], 0.0);
        assert_eq!(f[4], 1.0);
    }

    #[test]
    fn test_higher_skill_times_the_ball_better() {
        let d = delivery(0.5, 0.5, 0.5, 0.0, 0.5);
        let mut rng = test_rng();

        let trials = 2000;
        let mut sum_low = 0.0;
        let mut sum_high = 0.0;
        for _ in 0..trials {
            let mut low = Batsman::new(0.5, Weakness::Pace, 0.5, 0.2);
            let mut high = Batsman::new(0.9, Weakness::Pace, 0.5, 0.2);
            sum_low += low.play_shot(&d, &mut rng).timing;
            sum_high += high.play_shot(&d, &mut rng).timing;
        }
        assert!(
            sum_high / trials as f32 > sum_low / trials as f32 + 0.1,
            "skill should shift mean timing: low={} high={}",
            sum_low / trials as f32,
            sum_high / trials as f32
        );
    }
}
