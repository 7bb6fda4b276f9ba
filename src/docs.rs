use crate::api::employee::LeaveBalanceResponse;
use crate::api::leave_request::{
    ApplyLeave, DecisionResponse, LeaveDecision, LeaveListResponse, SubmitLeaveResponse,
};
use crate::api::notification::MessageResponse;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::notification::Notification;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Leave API",
        version = "1.0.0",
        description = r#"
## Leave Management

Leave-request approval workflow of the HRM system.

### 🔹 Key Features
- **Apply** for leave; the inclusive day span must fit the remaining balance
- **Approve / reject** pending requests; approval debits the balance once
- **Balance** lookup per employee
- **Notifications** for managers whenever a request is submitted

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Decisions, listings and the notification inbox are limited to **HR** and **Admin**.

### 📦 Response Format
- JSON-based RESTful responses
- Errors are `{ "message": "..." }`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::apply_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::decide_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::employee::get_leave_balance,

        crate::api::notification::list_notifications,
        crate::api::notification::mark_notification_read
    ),
    components(
        schemas(
            ApplyLeave,
            LeaveDecision,
            LeaveRequest,
            LeaveStatus,
            SubmitLeaveResponse,
            DecisionResponse,
            LeaveListResponse,
            LeaveBalanceResponse,
            Notification,
            MessageResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "Employee", description = "Leave balance APIs"),
        (name = "Notification", description = "Manager notification APIs"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/leave",
            "/api/leave/{leave_id}",
            "/api/leave/{leave_id}/decision",
            "/api/leave/{leave_id}/approve",
            "/api/leave/{leave_id}/reject",
            "/api/employee/{employee_id}/leave-balance",
            "/api/notifications",
            "/api/notifications/{notification_id}/read",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
