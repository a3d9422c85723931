use crate::error::Error;
use crate::models::day_score::{ScoreBreakdown, ScoreWeights, SubScore};
use serde::{Deserialize, Serialize};

/// Journal entries are normalized against one entry per day over this
/// window unless the caller scores a different period.
pub const DEFAULT_PERIOD_DAYS: u32 = 7;

/// Piecewise-linear duration sub-score with the optimal band at 7-9h.
/// Exactly 4h and exactly 11h both score 0.
pub fn duration_sub_score(hours: f64) -> f64 {
    let raw = if (7.0..=9.0).contains(&hours) {
        100.0
    } else if hours < 4.0 || hours > 11.0 {
        0.0
    } else if hours < 7.0 {
        (hours - 4.0) / 3.0 * 100.0
    } else {
        (11.0 - hours) / 2.0 * 100.0
    };

    raw.clamp(0.0, 100.0)
}

/// The bedroom percentage passes through, clamped to [0, 100].
pub fn bedroom_sub_score(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}

/// One entry per period day is full credit; extra entries saturate rather
/// than score beyond 100. A zero-day period is scored as one day.
pub fn journal_sub_score(entries: u32, period_days: u32) -> f64 {
    let target = period_days.max(1) as f64;
    (entries as f64 / target * 100.0).clamp(0.0, 100.0)
}

/// Weighted composite with full per-component detail. The composite is
/// rounded half away from zero to an integer in [0, 100].
///
/// `bedroom_percent` is on the 0-100 scale; callers holding a 0-1 ratio
/// convert before this boundary.
pub fn score_breakdown(
    duration_hours: f64,
    bedroom_percent: f64,
    journal_entries: u32,
    period_days: u32,
    weights: ScoreWeights,
) -> crate::Result<ScoreBreakdown> {
    if !duration_hours.is_finite() || duration_hours < 0.0 {
        return Err(Error::InvalidInput(format!(
            "sleep duration must be a non-negative number of hours, got {duration_hours}"
        )));
    }
    if !bedroom_percent.is_finite() {
        return Err(Error::InvalidInput(format!(
            "bedroom score must be a finite percentage, got {bedroom_percent}"
        )));
    }

    let w = weights.normalized();
    let duration = SubScore::new(duration_sub_score(duration_hours), w.duration);
    let bedroom = SubScore::new(bedroom_sub_score(bedroom_percent), w.bedroom);
    let journal = SubScore::new(journal_sub_score(journal_entries, period_days), w.journal);

    let composite =
        (duration.contribution + bedroom.contribution + journal.contribution).round() as u8;

    Ok(ScoreBreakdown {
        duration,
        bedroom,
        journal,
        composite,
    })
}

/// The composite sleep score with the default 0.4/0.4/0.2 weights.
pub fn calculate_sleep_score(
    duration_hours: f64,
    bedroom_percent: f64,
    journal_entries: u32,
    period_days: u32,
) -> crate::Result<u8> {
    score_breakdown(
        duration_hours,
        bedroom_percent,
        journal_entries,
        period_days,
        ScoreWeights::default(),
    )
    .map(|b| b.composite)
}

/// Textual range shown next to the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

pub fn score_category(score: u8) -> ScoreCategory {
    match score {
        85..=u8::MAX => ScoreCategory::Excellent,
        70..=84 => ScoreCategory::Good,
        50..=69 => ScoreCategory::Fair,
        _ => ScoreCategory::Poor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_band_scores_a_full_hundred() {
        assert_eq!(duration_sub_score(7.0), 100.0);
        assert_eq!(duration_sub_score(8.0), 100.0);
        assert_eq!(duration_sub_score(9.0), 100.0);
    }

    #[test]
    fn band_edges_score_zero() {
        assert_eq!(duration_sub_score(4.0), 0.0);
        assert_eq!(duration_sub_score(11.0), 0.0);
        assert_eq!(duration_sub_score(2.0), 0.0);
        assert_eq!(duration_sub_score(14.0), 0.0);
    }

    #[test]
    fn short_sleep_interpolates_up_to_the_optimal_band() {
        assert!((duration_sub_score(5.5) - 50.0).abs() < 1e-9);
        assert!((duration_sub_score(6.25) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn oversleep_interpolates_back_down() {
        assert!((duration_sub_score(10.0) - 50.0).abs() < 1e-9);
        assert!((duration_sub_score(10.5) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn journal_credit_saturates_at_one_entry_per_day() {
        assert_eq!(journal_sub_score(7, 7), 100.0);
        assert_eq!(journal_sub_score(20, 7), 100.0);
        assert_eq!(journal_sub_score(0, 7), 0.0);
    }

    #[test]
    fn zero_day_period_is_scored_as_one_day() {
        assert_eq!(journal_sub_score(1, 0), 100.0);
    }

    #[test]
    fn saturated_inputs_score_exactly_one_hundred() {
        assert_eq!(calculate_sleep_score(8.0, 100.0, 7, 7).unwrap(), 100);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(calculate_sleep_score(0.0, 0.0, 0, 7).unwrap(), 0);
    }

    #[test]
    fn mixed_inputs_round_to_the_nearest_integer() {
        // duration 50, bedroom 50, journal 3/7 of 100; weighted 48.57.
        assert_eq!(calculate_sleep_score(5.5, 50.0, 3, 7).unwrap(), 49);
    }

    #[test]
    fn score_is_monotonic_in_bedroom_percentage() {
        let mut last = 0;
        for percent in 0..=100 {
            let score = calculate_sleep_score(6.0, percent as f64, 2, 7).unwrap();
            assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn out_of_range_bedroom_percentages_clamp() {
        assert_eq!(
            calculate_sleep_score(8.0, 150.0, 7, 7).unwrap(),
            calculate_sleep_score(8.0, 100.0, 7, 7).unwrap()
        );
        assert_eq!(
            calculate_sleep_score(0.0, -20.0, 0, 7).unwrap(),
            calculate_sleep_score(0.0, 0.0, 0, 7).unwrap()
        );
    }

    #[test]
    fn non_finite_and_negative_inputs_are_rejected() {
        assert!(calculate_sleep_score(f64::NAN, 50.0, 0, 7).is_err());
        assert!(calculate_sleep_score(-1.0, 50.0, 0, 7).is_err());
        assert!(calculate_sleep_score(8.0, f64::INFINITY, 0, 7).is_err());
    }

    #[test]
    fn categories_cover_the_full_range() {
        assert_eq!(score_category(100), ScoreCategory::Excellent);
        assert_eq!(score_category(85), ScoreCategory::Excellent);
        assert_eq!(score_category(84), ScoreCategory::Good);
        assert_eq!(score_category(70), ScoreCategory::Good);
        assert_eq!(score_category(69), ScoreCategory::Fair);
        assert_eq!(score_category(50), ScoreCategory::Fair);
        assert_eq!(score_category(49), ScoreCategory::Poor);
        assert_eq!(score_category(0), ScoreCategory::Poor);
    }
}
