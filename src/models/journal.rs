use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-text journal entry. Scoring only ever consumes per-day counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub content: String,
}
