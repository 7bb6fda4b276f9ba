use crate::{auth::auth::AuthUser, error::ApiError, store::LeaveStore};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct LeaveBalanceResponse {
    #[schema(example = "Remaining Leaves: 17")]
    pub message: String,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 17)]
    pub total_leaves: i32,
}

/// Remaining leave balance of an employee
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/leave-balance",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Remaining leave balance", body = LeaveBalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee with ID 1000 not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "leave_balance", skip(auth, store, path), fields(user_id = auth.user_id))]
pub async fn get_leave_balance(
    auth: AuthUser,
    store: web::Data<dyn LeaveStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id: u64 = path.into_inner();
    auth.require_self_or_manager(employee_id)?;

    let employee = store.employee(employee_id).await?.ok_or_else(|| {
        warn!(employee_id, "Employee not found");
        ApiError::NotFound(format!("Employee with ID {} not found", employee_id))
    })?;

    info!(employee_id, balance = employee.leave_balance, "Leave balance read");

    Ok(HttpResponse::Ok().json(LeaveBalanceResponse {
        message: format!("Remaining Leaves: {}", employee.leave_balance),
        employee_id,
        total_leaves: employee.leave_balance,
    }))
}
