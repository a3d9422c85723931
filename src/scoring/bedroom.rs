use crate::models::checklist::ChecklistItem;

/// Completion ratio over one day's checklist, 0-1. An empty checklist is
/// 0.0, never NaN.
pub fn completion_ratio(items: &[ChecklistItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let checked = items.iter().filter(|item| item.checked).count();
    checked as f64 / items.len() as f64
}

/// 0-100 percentage for the composite-score boundary.
pub fn completion_percent(items: &[ChecklistItem]) -> f64 {
    completion_ratio(items) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn item(checked: bool) -> ChecklistItem {
        ChecklistItem {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            rule_name: "Room is dark".to_string(),
            checked,
            date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        }
    }

    #[test]
    fn empty_checklist_is_zero_not_nan() {
        assert_eq!(completion_ratio(&[]), 0.0);
    }

    #[test]
    fn counts_checked_items_over_total() {
        let items = vec![item(true), item(true), item(true), item(false)];
        assert!((completion_ratio(&items) - 0.75).abs() < 1e-9);
        assert!((completion_percent(&items) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn fully_checked_day_is_one() {
        let items = vec![item(true), item(true)];
        assert_eq!(completion_ratio(&items), 1.0);
    }
}
