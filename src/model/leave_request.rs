use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Lifecycle of a leave request. `Pending` moves to exactly one of the
/// other two and never back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Text stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn from_decision(approve: bool) -> Self {
        if approve {
            LeaveStatus::Approved
        } else {
            LeaveStatus::Rejected
        }
    }
}

/// Longest description the `description` columns hold, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Inclusive number of calendar days between `start` and `end`.
///
/// `None` when `end` precedes `start`.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> Option<i32> {
    if end < start {
        return None;
    }
    i32::try_from(end.signed_duration_since(start).num_days() + 1).ok()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    /// leave application id
    pub id: u64,
    #[schema(example = 1000)]
    /// employee id for whom the leave is applied
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub description: String,
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn days(&self) -> Option<i32> {
        leave_days(self.start_date, self.end_date)
    }
}

/// A validated submission, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}
