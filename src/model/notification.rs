use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::leave_request::LeaveRequest;

/// Manager alert raised when a leave request is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    #[schema(example = "5b0c3c7e-2f8a-4a53-9a4e-0f1f2d7c9b10", value_type = String)]
    pub id: Uuid,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub leave_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub description: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn for_leave(leave: &LeaveRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: leave.employee_id,
            leave_id: leave.id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            description: leave.description.clone(),
            created_at: Utc::now(),
            read: false,
        }
    }
}
