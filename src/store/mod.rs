//! Persistence for employees' leave balances, leave requests and manager
//! notifications.
//!
//! Handlers only talk to [`LeaveStore`]; the MySQL backend is the durable
//! one, the memory backend backs local runs and tests.

mod memory;
mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    employee::Employee,
    leave_request::{LeaveRequest, LeaveStatus, NewLeave},
    notification::Notification,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee {0} not found")]
    EmployeeNotFound(u64),

    #[error("leave request {0} not found")]
    LeaveNotFound(u64),

    #[error("notification {0} not found")]
    NotificationNotFound(Uuid),

    #[error("leave request {id} already {status}")]
    AlreadyProcessed { id: u64, status: LeaveStatus },

    #[error("insufficient leave balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i32, available: i32 },

    #[error("invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Filters for the paginated leave listing.
#[derive(Debug, Clone, Default)]
pub struct LeaveQuery {
    pub employee_id: Option<u64>,
    pub status: Option<LeaveStatus>,
    pub limit: u64,
    pub offset: u64,
}

/// Outcome of a decision that was applied.
#[derive(Debug, Clone)]
pub struct Decision {
    pub leave: LeaveRequest,
    /// Days taken off the balance; zero for rejections.
    pub debited_days: i32,
    pub remaining_balance: i32,
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn employee(&self, id: u64) -> Result<Option<Employee>, StoreError>;

    async fn leave(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;

    /// Newest first. Returns the page and the total matching count.
    async fn list_leaves(&self, query: &LeaveQuery)
    -> Result<(Vec<LeaveRequest>, i64), StoreError>;

    /// Stores a pending request together with its manager notification.
    async fn submit_leave(
        &self,
        leave: NewLeave,
    ) -> Result<(LeaveRequest, Notification), StoreError>;

    /// Moves a pending request to approved or rejected. Approval debits the
    /// employee's balance in the same atomic step and fails without side
    /// effects when the balance no longer covers the request.
    async fn decide_leave(&self, id: u64, approve: bool) -> Result<Decision, StoreError>;

    /// Unread notifications, oldest first.
    async fn unread_notifications(&self) -> Result<Vec<Notification>, StoreError>;

    async fn mark_notification_read(&self, id: Uuid) -> Result<(), StoreError>;
}
