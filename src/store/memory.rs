use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{Decision, LeaveQuery, LeaveStore, StoreError};
use crate::model::{
    employee::Employee,
    leave_request::{LeaveRequest, LeaveStatus, NewLeave},
    notification::Notification,
};

#[derive(Default)]
struct State {
    employees: BTreeMap<u64, Employee>,
    leaves: BTreeMap<u64, LeaveRequest>,
    next_leave_id: u64,
    /// Insertion order is creation order.
    notifications: Vec<Notification>,
}

/// Process-local store. Every operation runs under one lock, so a
/// decision's balance check and debit cannot interleave with another.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap_or_else(|e| e.into_inner());
            for employee in employees {
                state.employees.insert(employee.id, employee);
            }
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn employee(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        Ok(self.lock()?.employees.get(&id).cloned())
    }

    async fn leave(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.lock()?.leaves.get(&id).cloned())
    }

    async fn list_leaves(
        &self,
        query: &LeaveQuery,
    ) -> Result<(Vec<LeaveRequest>, i64), StoreError> {
        let state = self.lock()?;
        let matching: Vec<&LeaveRequest> = state
            .leaves
            .values()
            .rev()
            .filter(|l| query.employee_id.is_none_or(|id| l.employee_id == id))
            .filter(|l| query.status.is_none_or(|s| l.status == s))
            .collect();

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn submit_leave(
        &self,
        leave: NewLeave,
    ) -> Result<(LeaveRequest, Notification), StoreError> {
        let mut state = self.lock()?;
        if !state.employees.contains_key(&leave.employee_id) {
            return Err(StoreError::EmployeeNotFound(leave.employee_id));
        }

        state.next_leave_id += 1;
        let record = LeaveRequest {
            id: state.next_leave_id,
            employee_id: leave.employee_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            description: leave.description,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };
        let notification = Notification::for_leave(&record);

        state.leaves.insert(record.id, record.clone());
        state.notifications.push(notification.clone());

        Ok((record, notification))
    }

    async fn decide_leave(&self, id: u64, approve: bool) -> Result<Decision, StoreError> {
        let mut state = self.lock()?;
        let state = &mut *state;

        let leave = state
            .leaves
            .get_mut(&id)
            .ok_or(StoreError::LeaveNotFound(id))?;
        if leave.status != LeaveStatus::Pending {
            return Err(StoreError::AlreadyProcessed {
                id,
                status: leave.status,
            });
        }

        let employee = state
            .employees
            .get_mut(&leave.employee_id)
            .ok_or(StoreError::EmployeeNotFound(leave.employee_id))?;

        let debited_days = if approve {
            let days = leave.days().ok_or_else(|| {
                StoreError::InvalidRecord(format!("leave request {} ends before it starts", id))
            })?;
            if employee.leave_balance < days {
                return Err(StoreError::InsufficientBalance {
                    requested: days,
                    available: employee.leave_balance,
                });
            }
            employee.leave_balance -= days;
            days
        } else {
            0
        };

        leave.status = LeaveStatus::from_decision(approve);
        leave.decided_at = Some(Utc::now());

        Ok(Decision {
            leave: leave.clone(),
            debited_days,
            remaining_balance: employee.leave_balance,
        })
    }

    async fn unread_notifications(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(self
            .lock()?
            .notifications
            .iter()
            .filter(|n| !n.read)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotificationNotFound(id))?;
        notification.read = true;
        Ok(())
    }
}
