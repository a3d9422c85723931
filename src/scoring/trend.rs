use crate::models::journal::JournalEntry;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Raw journal counts per day for the trend chart. This is the third
/// journal policy next to the composite's proportional credit and the
/// calendar's binary presence; the three are distinct on purpose.
pub fn journal_counts_by_day(entries: &[JournalEntry]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.date).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(date: NaiveDate) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            date,
            content: "note".to_string(),
        }
    }

    #[test]
    fn counts_are_raw_not_capped() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();

        let counts = journal_counts_by_day(&[entry(day), entry(day), entry(day), entry(other)]);
        assert_eq!(counts[&day], 3);
        assert_eq!(counts[&other], 1);
    }
}
