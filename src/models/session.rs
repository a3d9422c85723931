use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One contiguous recorded interval of sleep. A session without an
/// `end_time` is an open timer and is excluded from scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepSession {
    pub id: Uuid,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
}

impl SleepSession {
    /// Hours slept: the stored duration when present, otherwise derived
    /// from the timestamps. `None` for open sessions.
    pub fn effective_duration_hours(&self) -> Option<f64> {
        let end = self.end_time?;
        match self.duration_hours {
            Some(hours) => Some(hours),
            None => Some((end - self.start_time).num_seconds() as f64 / 3600.0),
        }
    }

    /// Calendar date the session ended on; the grouping key for scoring.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_time.map(|t| t.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn derives_duration_from_timestamps_when_not_stored() {
        let session = SleepSession {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            start_time: utc(2025, 3, 1, 23, 0),
            end_time: Some(utc(2025, 3, 2, 7, 30)),
            duration_hours: None,
        };

        assert!((session.effective_duration_hours().unwrap() - 8.5).abs() < 1e-9);
        assert_eq!(
            session.end_date(),
            Some(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap())
        );
    }

    #[test]
    fn stored_duration_wins_over_derived() {
        let session = SleepSession {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            start_time: utc(2025, 3, 1, 23, 0),
            end_time: Some(utc(2025, 3, 2, 7, 0)),
            duration_hours: Some(7.5),
        };

        assert_eq!(session.effective_duration_hours(), Some(7.5));
    }

    #[test]
    fn open_sessions_have_no_duration_or_end_date() {
        let session = SleepSession {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            start_time: utc(2025, 3, 1, 23, 0),
            end_time: None,
            duration_hours: None,
        };

        assert_eq!(session.effective_duration_hours(), None);
        assert_eq!(session.end_date(), None);
    }
}
