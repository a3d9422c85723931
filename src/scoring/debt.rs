use crate::models::session::SleepSession;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Total hours slept per end-date, summing every completed session that
/// day. Naps count here; the calendar aggregator instead scores only the
/// latest-ending session. The two policies serve different views and stay
/// separate.
pub fn daily_sleep_totals(sessions: &[SleepSession]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for session in sessions {
        let (Some(date), Some(hours)) = (session.end_date(), session.effective_duration_hours())
        else {
            continue;
        };
        *totals.entry(date).or_insert(0.0) += hours.max(0.0);
    }
    totals
}

/// Accumulated shortfall against a nightly goal over the inclusive range.
/// Days without sessions owe the full goal; surplus sleep never pays down
/// other days' debt.
pub fn sleep_debt_hours(
    sessions: &[SleepSession],
    goal_hours: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    let totals = daily_sleep_totals(sessions);

    let mut debt = 0.0;
    let mut date = start;
    while date <= end {
        let slept = totals.get(&date).copied().unwrap_or(0.0);
        debt += (goal_hours - slept).max(0.0);

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    debt
}
