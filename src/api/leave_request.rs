use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::leave_request::{LeaveRequest, LeaveStatus, MAX_DESCRIPTION_CHARS, NewLeave, leave_days},
    store::{LeaveQuery, LeaveStore},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LeaveDecision {
    /// true approves, false rejects
    #[schema(example = true)]
    pub approve: bool,
}

#[derive(Serialize, ToSchema)]
pub struct SubmitLeaveResponse {
    #[schema(example = "Leave request submitted successfully and is pending approval")]
    pub message: String,
    pub leave: LeaveRequest,
    #[schema(value_type = String)]
    pub notification_id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct DecisionResponse {
    #[schema(example = "Leave approved successfully")]
    pub message: String,
    pub leave: LeaveRequest,
    /// Days taken off the employee's balance
    #[schema(example = 3)]
    pub debited_days: i32,
    #[schema(example = 17)]
    pub remaining_balance: i32,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[param(example = 123)]
    pub employee_id: Option<u64>,
    /// Filter by leave status
    #[param(value_type = Option<String>, example = "pending")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[param(example = 1)]
    pub page: Option<u64>, // 1-based
    /// Items per page, at most 100
    #[param(example = 10)]
    pub per_page: Option<u64>,
}

/* =========================
Apply for leave
========================= */
/// Submit a leave request for an employee
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = ApplyLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted and pending approval", body = SubmitLeaveResponse),
        (status = 400, description = "Invalid dates, over-long description or not enough leave balance", body = Object, example = json!({
            "message": "Not enough leave balance"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee with ID 1000 not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(
    name = "apply_leave",
    skip(auth, store, payload),
    fields(user_id = auth.user_id, employee_id = payload.employee_id)
)]
pub async fn apply_leave(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    payload: web::Json<ApplyLeave>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    info!(
        start_date = %payload.start_date,
        end_date = %payload.end_date,
        "Leave application received"
    );

    auth.require_self_or_manager(payload.employee_id)?;

    // 1️⃣ inclusive day span
    let requested = leave_days(payload.start_date, payload.end_date)
        .ok_or_else(|| ApiError::Validation("start_date cannot be after end_date".to_string()))?;
    debug!(leave_days = requested, "Calculated leave days");

    if payload.description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ApiError::Validation(format!(
            "description cannot exceed {} characters",
            MAX_DESCRIPTION_CHARS
        )));
    }

    // 2️⃣ employee + balance
    let employee = store.employee(payload.employee_id).await?.ok_or_else(|| {
        warn!("Employee not found");
        ApiError::NotFound(format!(
            "Employee with ID {} not found",
            payload.employee_id
        ))
    })?;

    if employee.leave_balance < requested {
        warn!(
            balance = employee.leave_balance,
            requested, "Not enough leave balance"
        );
        return Err(ApiError::Validation("Not enough leave balance".to_string()));
    }

    // 3️⃣ store as pending, notification goes with it
    let (leave, notification) = store
        .submit_leave(NewLeave {
            employee_id: payload.employee_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            description: payload.description,
        })
        .await?;

    info!(
        leave_id = leave.id,
        notification_id = %notification.id,
        "Leave request pending approval, manager notified"
    );

    Ok(HttpResponse::Created().json(SubmitLeaveResponse {
        message: "Leave request submitted successfully and is pending approval".to_string(),
        leave,
        notification_id: notification.id,
    }))
}

/* =========================
Decide leave (HR/Admin)
========================= */
async fn record_decision(
    auth: &AuthUser,
    store: &dyn LeaveStore,
    leave_id: u64,
    approve: bool,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let decision = store.decide_leave(leave_id, approve).await.map_err(|e| {
        warn!(error = %e, leave_id, approve, "Leave decision refused");
        ApiError::from(e)
    })?;

    let status = decision.leave.status;
    info!(
        leave_id,
        %status,
        decided_by = %auth.username,
        employee_id = decision.leave.employee_id,
        debited_days = decision.debited_days,
        remaining_balance = decision.remaining_balance,
        "Leave decision recorded"
    );

    Ok(HttpResponse::Ok().json(DecisionResponse {
        message: format!("Leave {} successfully", status),
        leave: decision.leave,
        debited_days: decision.debited_days,
        remaining_balance: decision.remaining_balance,
    }))
}

/// Approve or reject a pending leave request
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/decision",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to decide")
    ),
    request_body = LeaveDecision,
    responses(
        (status = 200, description = "Decision recorded", body = DecisionResponse),
        (status = 400, description = "Already processed or balance no longer covers the request", body = Object, example = json!({
            "message": "Leave with ID 1 is already approved"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave with ID 1 not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(name = "decide_leave", skip(auth, store, path, payload), fields(user_id = auth.user_id))]
pub async fn decide_leave(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    path: web::Path<u64>,
    payload: web::Json<LeaveDecision>,
) -> Result<HttpResponse, ApiError> {
    record_decision(&auth, store.get_ref(), path.into_inner(), payload.approve).await
}

/// Approve a pending leave request
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = DecisionResponse),
        (status = 400, description = "Already processed or not enough leave balance"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(name = "approve_leave", skip(auth, store, path), fields(user_id = auth.user_id))]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    record_decision(&auth, store.get_ref(), path.into_inner(), true).await
}

/// Reject a pending leave request
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected successfully", body = DecisionResponse),
        (status = 400, description = "Leave request already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(name = "reject_leave", skip(auth, store, path), fields(user_id = auth.user_id))]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    record_decision(&auth, store.get_ref(), path.into_inner(), false).await
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave with ID 1 not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    match store.leave(leave_id).await? {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Err(ApiError::NotFound(format!("Leave with ID {} not found", leave_id))),
    }
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1).saturating_mul(per_page);

    let (leaves, total) = store
        .list_leaves(&LeaveQuery {
            employee_id: query.employee_id,
            status: query.status,
            limit: per_page,
            offset,
        })
        .await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page,
        per_page,
        total,
    }))
}
