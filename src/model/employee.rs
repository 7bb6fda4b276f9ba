use serde::{Deserialize, Serialize};

/// The slice of the employee record the leave workflow reads and debits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: u64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Remaining leave days
    pub leave_balance: i32,
}
