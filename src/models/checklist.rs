use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One boolean bedroom rule tracked per user per day. The grouping key is
/// the stored calendar date, never re-derived from a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub user_id: String,
    pub rule_name: String,
    pub checked: bool,
    pub date: NaiveDate,
}

/// Rules seeded for each new day; custom rules append after these.
pub const DEFAULT_RULES: [&str; 5] = [
    "Room is dark",
    "Room is cool",
    "No screens in bed",
    "Phone on silent",
    "Fresh air before bed",
];
