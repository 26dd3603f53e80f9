use serde::{Deserialize, Serialize};

/// Points lost per hour outside the comfort band
pub const HOURLY_PENALTY: f64 = 3.0;
/// Extra points lost per hour deviating more than [`SEVERE_DEVIATION_C`]
pub const SEVERE_PENALTY: f64 = 5.0;
pub const SEVERE_DEVIATION_C: f64 = 2.0;
/// Points lost per °C of mean deviation across the whole trajectory
pub const MEAN_DEVIATION_PENALTY: f64 = 10.0;

/// Outcome of scoring one temperature trajectory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortScore {
    /// 100 = always inside the band, 0 = unacceptable
    pub score: f64,
    pub hours_outside: usize,
}

/// Converts a predicted indoor temperature trajectory into a bounded score
#[derive(Debug, Clone, Copy, Default)]
pub struct ComfortScorer;

impl ComfortScorer {
    /// Degrees outside the band for one hour (0 when inside)
    pub fn violation(temp_c: f64, comfort_min: f64, comfort_max: f64) -> f64 {
        if temp_c < comfort_min {
            comfort_min - temp_c
        } else if temp_c > comfort_max {
            temp_c - comfort_max
        } else {
            0.0
        }
    }

    pub fn score(&self, trajectory: &[f64], comfort_min: f64, comfort_max: f64) -> ComfortScore {
        let violations: Vec<f64> = trajectory
            .iter()
            .map(|&t| Self::violation(t, comfort_min, comfort_max))
            .collect();

        let hours_outside = trajectory
            .iter()
            .filter(|&&t| t < comfort_min || t > comfort_max)
            .count();
        let severe = violations.iter().filter(|&&v| v > SEVERE_DEVIATION_C).count();
        let mean_violation = if violations.is_empty() {
            0.0
        } else {
            violations.iter().sum::<f64>() / violations.len() as f64
        };

        let score = 100.0
            - HOURLY_PENALTY * hours_outside as f64
            - SEVERE_PENALTY * severe as f64
            - MEAN_DEVIATION_PENALTY * mean_violation;

        ComfortScore {
            score: score.clamp(0.0, 100.0),
            hours_outside,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_perfect_comfort() {
        let scorer = ComfortScorer;
        let result = scorer.score(&[18.0, 20.5, 24.0], 18.0, 24.0);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.hours_outside, 0);
    }

    #[test]
    fn test_empty_trajectory() {
        let result = ComfortScorer.score(&[], 18.0, 24.0);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.hours_outside, 0);
    }

    #[test]
    fn test_penalties() {
        // 4 hours: one 1°C too cold, one 3°C too hot, two inside
        let result = ComfortScorer.score(&[17.0, 27.0, 20.0, 21.0], 18.0, 24.0);
        assert_eq!(result.hours_outside, 2);
        // 100 - 2*3 - 1*5 - 10 * (4/4)
        assert!((result.score - 79.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_floor() {
        let trajectory = vec![5.0; 24];
        let result = ComfortScorer.score(&trajectory, 18.0, 24.0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.hours_outside, 24);
    }

    #[test]
    fn test_violation_boundaries() {
        assert_eq!(ComfortScorer::violation(18.0, 18.0, 24.0), 0.0);
        assert_eq!(ComfortScorer::violation(24.0, 18.0, 24.0), 0.0);
        assert!((ComfortScorer::violation(16.5, 18.0, 24.0) - 1.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(trajectory in prop::collection::vec(-40.0f64..60.0, 0..48)) {
            let result = ComfortScorer.score(&trajectory, 18.0, 24.0);
            prop_assert!((0.0..=100.0).contains(&result.score));
            prop_assert!(result.hours_outside <= trajectory.len());
        }

        #[test]
        fn prop_inside_band_scores_full(trajectory in prop::collection::vec(18.0f64..=24.0, 1..48)) {
            prop_assert_eq!(ComfortScorer.score(&trajectory, 18.0, 24.0).score, 100.0);
        }
    }

    #[test]
    fn test_more_hours_outside_never_scores_higher() {
        // Average violation fixed at 0.5 °C over 4 hours
        let one_hour = ComfortScorer.score(&[16.0, 20.0, 20.0, 20.0], 18.0, 24.0);
        let two_hours = ComfortScorer.score(&[17.0, 17.0, 20.0, 20.0], 18.0, 24.0);
        let four_hours = ComfortScorer.score(&[17.5, 17.5, 17.5, 17.5], 18.0, 24.0);
        assert!(two_hours.score <= one_hour.score);
        assert!(four_hours.score <= two_hours.score);
    }
}
