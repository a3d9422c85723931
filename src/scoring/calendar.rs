use crate::models::checklist::ChecklistItem;
use crate::models::day_score::{DayScore, RingDay, ScoreWeights};
use crate::models::journal::JournalEntry;
use crate::models::session::SleepSession;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{bedroom, composite};

/// Build the per-day score map the calendar consumes: one record for every
/// date that has at least one session, checklist item, or journal entry.
///
/// Sessions group by the calendar date of their `end_time`; checklist items
/// and journal entries group by their stored date. When several sessions
/// end on the same day only the latest-ending one scores; same-day sessions
/// are summed by the sleep-debt computation instead, never here.
pub fn build_day_scores(
    sessions: &[SleepSession],
    checklist: &[ChecklistItem],
    journal: &[JournalEntry],
) -> crate::Result<BTreeMap<NaiveDate, DayScore>> {
    build_day_scores_with(sessions, checklist, journal, ScoreWeights::default())
}

pub fn build_day_scores_with(
    sessions: &[SleepSession],
    checklist: &[ChecklistItem],
    journal: &[JournalEntry],
    weights: ScoreWeights,
) -> crate::Result<BTreeMap<NaiveDate, DayScore>> {
    let mut sessions_by_day: HashMap<NaiveDate, Vec<&SleepSession>> = HashMap::new();
    for session in sessions {
        if let Some(date) = session.end_date() {
            sessions_by_day.entry(date).or_default().push(session);
        }
    }

    let mut checklist_by_day: HashMap<NaiveDate, Vec<ChecklistItem>> = HashMap::new();
    for item in checklist {
        checklist_by_day
            .entry(item.date)
            .or_default()
            .push(item.clone());
    }

    let mut journal_by_day: HashMap<NaiveDate, u32> = HashMap::new();
    for entry in journal {
        *journal_by_day.entry(entry.date).or_insert(0) += 1;
    }

    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    dates.extend(sessions_by_day.keys());
    dates.extend(checklist_by_day.keys());
    dates.extend(journal_by_day.keys());

    let mut days = BTreeMap::new();
    for date in dates {
        let latest = sessions_by_day
            .get(&date)
            .and_then(|group| group.iter().max_by_key(|s| s.end_time));
        let duration = latest
            .and_then(|s| s.effective_duration_hours())
            .unwrap_or(0.0)
            .max(0.0);

        let bedroom_ratio = checklist_by_day
            .get(&date)
            .map(|items| bedroom::completion_ratio(items))
            .unwrap_or(0.0);

        let presence: u32 = journal_by_day
            .get(&date)
            .map(|count| u32::from(*count > 0))
            .unwrap_or(0);

        // Single-day scoring; the 0-1 ratio scales to 0-100 only at this
        // boundary and the composite is stored back as a 0-1 ratio.
        let breakdown =
            composite::score_breakdown(duration, bedroom_ratio * 100.0, presence, 1, weights)?;

        days.insert(
            date,
            DayScore {
                date,
                sleep_score: breakdown.composite as f64 / 100.0,
                bedroom_score: bedroom_ratio,
                journal_presence: presence as f64,
                composite: breakdown.composite,
            },
        );
    }

    Ok(days)
}

/// Materialize the consumer-side default: one ring record per day of the
/// inclusive range, all-zero where the map has no entry.
pub fn fill_ring_days(
    start: NaiveDate,
    end: NaiveDate,
    days: &BTreeMap<NaiveDate, DayScore>,
) -> Vec<RingDay> {
    let mut out = Vec::new();
    let mut date = start;
    while date <= end {
        let ring = match days.get(&date) {
            Some(day) => RingDay {
                date,
                sleep: day.sleep_score,
                bedroom: day.bedroom_score,
                journal: day.journal_presence,
            },
            None => RingDay {
                date,
                sleep: 0.0,
                bedroom: 0.0,
                journal: 0.0,
            },
        };
        out.push(ring);

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(end: Option<DateTime<Utc>>, hours_before: i64) -> SleepSession {
        let end_or_now = end.unwrap_or_else(|| utc(2025, 3, 2, 7, 0));
        SleepSession {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            start_time: end_or_now - chrono::Duration::hours(hours_before),
            end_time: end,
            duration_hours: None,
        }
    }

    fn checklist_item(day: NaiveDate, checked: bool) -> ChecklistItem {
        ChecklistItem {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            rule_name: "Room is dark".to_string(),
            checked,
            date: day,
        }
    }

    fn journal_entry(day: NaiveDate) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            date: day,
            content: "slept well".to_string(),
        }
    }

    #[test]
    fn latest_ending_session_wins_over_earlier_naps() {
        let day = date(2025, 3, 2);
        let nap = session(Some(utc(2025, 3, 2, 15, 0)), 2);
        let night = session(Some(utc(2025, 3, 2, 7, 0)), 8);

        let days = build_day_scores(&[night, nap], &[], &[]).unwrap();
        let record = &days[&day];

        // A 2h nap ends latest, so it scores the day: duration sub-score 0,
        // everything else 0 as well.
        assert_eq!(record.composite, 0);

        let reversed = build_day_scores(
            &[
                session(Some(utc(2025, 3, 2, 7, 0)), 2),
                session(Some(utc(2025, 3, 2, 15, 0)), 8),
            ],
            &[],
            &[],
        )
        .unwrap();
        // Now the 8h session ends latest: duration sub-score 100 at weight 0.4.
        assert_eq!(reversed[&day].composite, 40);
    }

    #[test]
    fn open_sessions_never_create_a_day() {
        let days = build_day_scores(&[session(None, 8)], &[], &[]).unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn union_of_collections_drives_the_key_set() {
        let d1 = date(2025, 3, 1);
        let d2 = date(2025, 3, 2);
        let d3 = date(2025, 3, 3);

        let days = build_day_scores(
            &[session(Some(utc(2025, 3, 1, 7, 0)), 8)],
            &[checklist_item(d2, true)],
            &[journal_entry(d3)],
        )
        .unwrap();

        assert_eq!(days.len(), 3);
        assert!(days.contains_key(&d1));
        assert!(days.contains_key(&d2));
        assert!(days.contains_key(&d3));
    }

    #[test]
    fn day_with_all_inputs_saturated_scores_one() {
        let day = date(2025, 3, 2);
        let days = build_day_scores(
            &[session(Some(utc(2025, 3, 2, 7, 0)), 8)],
            &[checklist_item(day, true), checklist_item(day, true)],
            &[journal_entry(day)],
        )
        .unwrap();

        let record = &days[&day];
        assert_eq!(record.composite, 100);
        assert!((record.sleep_score - 1.0).abs() < 1e-9);
        assert_eq!(record.bedroom_score, 1.0);
        assert_eq!(record.journal_presence, 1.0);
    }

    #[test]
    fn journal_presence_is_binary_not_a_count() {
        let day = date(2025, 3, 2);
        let days = build_day_scores(
            &[],
            &[],
            &[journal_entry(day), journal_entry(day), journal_entry(day)],
        )
        .unwrap();

        assert_eq!(days[&day].journal_presence, 1.0);
    }

    #[test]
    fn per_day_output_round_trips_through_the_composite_score() {
        let day = date(2025, 3, 2);
        let days = build_day_scores(
            &[session(Some(utc(2025, 3, 2, 6, 0)), 6)],
            &[checklist_item(day, true), checklist_item(day, false)],
            &[journal_entry(day)],
        )
        .unwrap();

        let record = &days[&day];
        let rescored = composite::calculate_sleep_score(
            6.0,
            record.bedroom_score * 100.0,
            record.journal_presence as u32,
            1,
        )
        .unwrap();

        assert_eq!(rescored, record.composite);
        assert!((record.sleep_score * 100.0 - record.composite as f64).abs() < 1e-9);
    }

    #[test]
    fn ring_days_cover_the_range_with_zero_defaults() {
        let day = date(2025, 3, 2);
        let days = build_day_scores(&[], &[checklist_item(day, true)], &[]).unwrap();

        let rings = fill_ring_days(date(2025, 3, 1), date(2025, 3, 3), &days);
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[0].bedroom, 0.0);
        assert_eq!(rings[1].bedroom, 1.0);
        assert_eq!(rings[2].sleep, 0.0);
    }
}
