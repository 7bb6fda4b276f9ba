use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::debug;
use uuid::Uuid;

use super::{Decision, LeaveQuery, LeaveStore, StoreError};
use crate::model::{
    employee::Employee,
    leave_request::{LeaveRequest, LeaveStatus, NewLeave},
    notification::Notification,
};

const LEAVE_COLUMNS: &str =
    "id, employee_id, start_date, end_date, description, status, created_at, decided_at";

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<LeaveStatus>().map_err(|_| {
            StoreError::InvalidRecord(format!(
                "leave request {} has unknown status `{}`",
                row.id, row.status
            ))
        })?;

        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
            status,
            created_at: row.created_at,
            decided_at: row.decided_at,
        })
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    employee_id: u64,
    leave_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: String,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id).map_err(|e| {
            StoreError::InvalidRecord(format!("notification id `{}`: {}", row.id, e))
        })?;

        Ok(Notification {
            id,
            employee_id: row.employee_id,
            leave_id: row.leave_id,
            start_date: row.start_date,
            end_date: row.end_date,
            description: row.description,
            created_at: row.created_at,
            read: row.is_read,
        })
    }
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn employee(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_code, first_name, last_name, email, leave_balance
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn leave(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {} FROM leave_requests WHERE id = ?", LEAVE_COLUMNS);
        sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(LeaveRequest::try_from)
            .transpose()
    }

    async fn list_leaves(
        &self,
        query: &LeaveQuery,
    ) -> Result<(Vec<LeaveRequest>, i64), StoreError> {
        // -------------------------
        // WHERE clause
        // -------------------------
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(emp_id) = query.employee_id {
            where_sql.push_str(" AND employee_id = ?");
            args.push(FilterValue::U64(emp_id));
        }

        if let Some(status) = query.status {
            where_sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.as_str()));
        }

        // -------------------------
        // COUNT query
        // -------------------------
        let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);
        debug!(sql = %count_sql, "Counting leave requests");

        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_q = match arg {
                FilterValue::U64(v) => count_q.bind(*v),
                FilterValue::Str(s) => count_q.bind(*s),
            };
        }
        let total = count_q.fetch_one(&self.pool).await?;

        // -------------------------
        // DATA query
        // -------------------------
        let data_sql = format!(
            "SELECT {} FROM leave_requests{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            LEAVE_COLUMNS, where_sql
        );
        debug!(sql = %data_sql, limit = query.limit, offset = query.offset, "Fetching leave requests");

        let mut data_q = sqlx::query_as::<_, LeaveRow>(&data_sql);
        for arg in args {
            data_q = match arg {
                FilterValue::U64(v) => data_q.bind(v),
                FilterValue::Str(s) => data_q.bind(s),
            };
        }

        let leaves = data_q
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(LeaveRequest::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((leaves, total))
    }

    async fn submit_leave(
        &self,
        leave: NewLeave,
    ) -> Result<(LeaveRequest, Notification), StoreError> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, start_date, end_date, description, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(leave.employee_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.description)
        .bind(LeaveStatus::Pending.as_str())
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            // employee row removed between the handler's lookup and this insert
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::EmployeeNotFound(leave.employee_id)
            }
            other => StoreError::from(other),
        })?;

        let record = LeaveRequest {
            id: result.last_insert_id(),
            employee_id: leave.employee_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            description: leave.description,
            status: LeaveStatus::Pending,
            created_at,
            decided_at: None,
        };
        let notification = Notification::for_leave(&record);

        sqlx::query(
            r#"
            INSERT INTO leave_notifications
                (id, employee_id, leave_id, start_date, end_date, description, created_at, is_read)
            VALUES (?, ?, ?, ?, ?, ?, ?, FALSE)
            "#,
        )
        .bind(notification.id.to_string())
        .bind(notification.employee_id)
        .bind(notification.leave_id)
        .bind(notification.start_date)
        .bind(notification.end_date)
        .bind(&notification.description)
        .bind(notification.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((record, notification))
    }

    async fn decide_leave(&self, id: u64, approve: bool) -> Result<Decision, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock holds off a concurrent decision on the same request.
        let sql = format!(
            "SELECT {} FROM leave_requests WHERE id = ? FOR UPDATE",
            LEAVE_COLUMNS
        );
        let mut leave: LeaveRequest = sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::LeaveNotFound(id))?
            .try_into()?;

        if leave.status != LeaveStatus::Pending {
            return Err(StoreError::AlreadyProcessed {
                id,
                status: leave.status,
            });
        }

        let debited_days = if approve {
            let days = leave.days().ok_or_else(|| {
                StoreError::InvalidRecord(format!("leave request {} ends before it starts", id))
            })?;

            let debit = sqlx::query(
                r#"
                UPDATE employees
                SET leave_balance = leave_balance - ?
                WHERE id = ?
                AND leave_balance >= ?
                "#,
            )
            .bind(days)
            .bind(leave.employee_id)
            .bind(days)
            .execute(&mut *tx)
            .await?;

            if debit.rows_affected() == 0 {
                let available = sqlx::query_scalar::<_, i32>(
                    "SELECT leave_balance FROM employees WHERE id = ?",
                )
                .bind(leave.employee_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::EmployeeNotFound(leave.employee_id))?;

                return Err(StoreError::InsufficientBalance {
                    requested: days,
                    available,
                });
            }
            days
        } else {
            0
        };

        let status = LeaveStatus::from_decision(approve);
        let decided_at = Utc::now();
        sqlx::query("UPDATE leave_requests SET status = ?, decided_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(decided_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let remaining_balance = sqlx::query_scalar::<_, i32>(
            "SELECT leave_balance FROM employees WHERE id = ?",
        )
        .bind(leave.employee_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        leave.status = status;
        leave.decided_at = Some(decided_at);

        Ok(Decision {
            leave,
            debited_days,
            remaining_balance,
        })
    }

    async fn unread_notifications(&self) -> Result<Vec<Notification>, StoreError> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, employee_id, leave_id, start_date, end_date, description, created_at, is_read
            FROM leave_notifications
            WHERE is_read = FALSE
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Notification::try_from)
        .collect()
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<(), StoreError> {
        let id_text = id.to_string();

        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leave_notifications WHERE id = ?",
        )
        .bind(&id_text)
        .fetch_one(&self.pool)
        .await?;

        if found == 0 {
            return Err(StoreError::NotificationNotFound(id));
        }

        sqlx::query("UPDATE leave_notifications SET is_read = TRUE WHERE id = ?")
            .bind(&id_text)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
