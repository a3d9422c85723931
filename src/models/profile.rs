use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user profile. A missing birthdate maps to the "Unknown" goal label
/// at the display boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub birthdate: Option<NaiveDate>,
}
