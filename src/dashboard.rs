use crate::models::day_score::{DashboardSummary, DayScore, ScoreCache};
use crate::scoring::{calendar, debt, sleep_goal};
use crate::store::db;
use crate::store::settings::ScoringSettings;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Load the three record collections for the range, score every day,
/// persist the results, and refresh the in-memory cache.
pub fn refresh_dashboard(
    conn: &Connection,
    cache: &Arc<Mutex<ScoreCache>>,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    settings: &ScoringSettings,
) -> crate::Result<DashboardSummary> {
    let sessions = db::sessions_in_range(conn, user_id, start, end)?;
    let checklist = db::checklist_in_range(conn, user_id, start, end)?;
    let journal = db::journal_in_range(conn, user_id, start, end)?;

    let days = calendar::build_day_scores_with(&sessions, &checklist, &journal, settings.weights)?;
    let summary = build_summary(days, settings.low_score_threshold);

    db::upsert_day_scores(conn, user_id, &summary.days)?;
    update_cache(cache, user_id, summary.clone());

    log::debug!(
        "scored {} days for {user_id} ({} below threshold)",
        summary.day_count,
        summary.low_day_count
    );
    Ok(summary)
}

/// Recompute a single day after an edit (checklist toggle, journal entry,
/// finished session) and patch it into the cache and the persisted scores.
/// A day with no data yields the consumer default: all-zero ratios.
pub fn rescore_day(
    conn: &Connection,
    cache: &Arc<Mutex<ScoreCache>>,
    user_id: &str,
    date: NaiveDate,
    settings: &ScoringSettings,
) -> crate::Result<DayScore> {
    let sessions = db::sessions_in_range(conn, user_id, date, date)?;
    let checklist = db::checklist_in_range(conn, user_id, date, date)?;
    let journal = db::journal_in_range(conn, user_id, date, date)?;

    let days = calendar::build_day_scores_with(&sessions, &checklist, &journal, settings.weights)?;
    let day = days.get(&date).cloned().unwrap_or(DayScore {
        date,
        sleep_score: 0.0,
        bedroom_score: 0.0,
        journal_presence: 0.0,
        composite: 0,
    });

    db::upsert_day_score(conn, user_id, &day)?;
    patch_cached_day(cache, user_id, day.clone(), settings.low_score_threshold);

    Ok(day)
}

/// The home header's recommended-sleep label; "Unknown" without a
/// birthdate on file.
pub fn sleep_goal_label(conn: &Connection, user_id: &str) -> crate::Result<String> {
    let profile = db::load_profile(conn, user_id)?;
    Ok(sleep_goal::goal_label(
        profile.and_then(|p| p.birthdate),
    ))
}

/// Accumulated shortfall against the low edge of the user's recommended
/// band. Unlike the calendar scores this sums same-day sessions.
pub fn sleep_debt(
    conn: &Connection,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> crate::Result<f64> {
    let sessions = db::sessions_in_range(conn, user_id, start, end)?;

    let goal = db::load_profile(conn, user_id)?
        .and_then(|p| p.birthdate)
        .map(sleep_goal::sleep_goal_from_birthdate)
        .unwrap_or_else(|| sleep_goal::goal_for_age(30));

    Ok(debt::sleep_debt_hours(
        &sessions,
        goal.min_hours as f64,
        start,
        end,
    ))
}

fn build_summary(days: BTreeMap<NaiveDate, DayScore>, low_score_threshold: u8) -> DashboardSummary {
    let day_count = days.len();
    let total: f64 = days.values().map(|d| d.composite as f64).sum();
    let low_day_count = days
        .values()
        .filter(|d| d.composite < low_score_threshold)
        .count();

    DashboardSummary {
        average_score: if day_count == 0 {
            0.0
        } else {
            total / day_count as f64
        },
        day_count,
        low_day_count,
        days,
    }
}

fn update_cache(cache: &Arc<Mutex<ScoreCache>>, user_id: &str, summary: DashboardSummary) {
    if let Ok(mut lock) = cache.lock() {
        lock.user_id = Some(user_id.to_string());
        lock.summary = Some(summary);
    }
}

fn patch_cached_day(
    cache: &Arc<Mutex<ScoreCache>>,
    user_id: &str,
    day: DayScore,
    low_score_threshold: u8,
) {
    if let Ok(mut lock) = cache.lock() {
        if lock.user_id.as_deref() != Some(user_id) {
            lock.user_id = Some(user_id.to_string());
            lock.summary = Some(build_summary(
                BTreeMap::from([(day.date, day)]),
                low_score_threshold,
            ));
            return;
        }

        let mut days = lock
            .summary
            .take()
            .map(|summary| summary.days)
            .unwrap_or_default();
        days.insert(day.date, day);
        lock.summary = Some(build_summary(days, low_score_threshold));
    }
}
