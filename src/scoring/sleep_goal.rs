use crate::error::Error;
use chrono::{Datelike, NaiveDate, Utc};

/// Recommended nightly sleep for one age band, in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepGoal {
    pub min_hours: u32,
    pub max_hours: u32,
}

impl SleepGoal {
    pub fn label(&self) -> String {
        format!("{}–{} hours", self.min_hours, self.max_hours)
    }
}

/// Ordered half-open age bands: ages strictly below the bound get the goal.
const BANDS: [(i32, SleepGoal); 6] = [
    (1, SleepGoal { min_hours: 14, max_hours: 17 }),
    (2, SleepGoal { min_hours: 11, max_hours: 14 }),
    (6, SleepGoal { min_hours: 10, max_hours: 13 }),
    (14, SleepGoal { min_hours: 9, max_hours: 11 }),
    (18, SleepGoal { min_hours: 8, max_hours: 10 }),
    (65, SleepGoal { min_hours: 7, max_hours: 9 }),
];

const BAND_65_PLUS: SleepGoal = SleepGoal { min_hours: 7, max_hours: 8 };

/// Age in whole years as of `today`, one less if the birthday has not
/// occurred yet this year.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

/// Every age maps to a band: negative and zero ages land in the infant
/// band, everything from 65 up takes the final arm.
pub fn goal_for_age(age: i32) -> SleepGoal {
    for (max_age, goal) in BANDS {
        if age < max_age {
            return goal;
        }
    }
    BAND_65_PLUS
}

pub fn sleep_goal_on(birthdate: NaiveDate, today: NaiveDate) -> SleepGoal {
    goal_for_age(age_on(birthdate, today))
}

/// Band lookup against today's date (UTC).
pub fn sleep_goal_from_birthdate(birthdate: NaiveDate) -> SleepGoal {
    sleep_goal_on(birthdate, Utc::now().date_naive())
}

/// Display label for a profile birthdate; missing dates read "Unknown".
pub fn goal_label(birthdate: Option<NaiveDate>) -> String {
    match birthdate {
        Some(date) => sleep_goal_from_birthdate(date).label(),
        None => "Unknown".to_string(),
    }
}

/// Validate an ISO `YYYY-MM-DD` birth date at the boundary where external
/// data enters the core.
pub fn parse_birthdate(s: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("malformed birth date: {s}")))
}

/// String-in, label-out convenience for callers holding a raw ISO date.
pub fn goal_label_from_iso(birthdate: &str) -> crate::Result<String> {
    Ok(sleep_goal_from_birthdate(parse_birthdate(birthdate)?).label())
}
