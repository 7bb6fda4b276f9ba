use crate::{
    api::{employee, leave_request, notification},
    auth::middleware::auth_middleware,
    config::Config,
    error::{json_error_handler, path_error_handler, query_error_handler},
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub type RateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min`, bursting up to the same amount.
pub fn build_limiter(requests_per_min: u32) -> Option<RateLimit> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, rate_limit: &RateLimit) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(rate_limit)) // rate limiting
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::apply_leave)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/decision
                    .service(
                        web::resource("/{id}/decision")
                            .route(web::put().to(leave_request::decide_leave)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/employee")
                    // /employee/{id}/leave-balance
                    .service(
                        web::resource("/{id}/leave-balance")
                            .route(web::get().to(employee::get_leave_balance)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    // /notifications
                    .service(
                        web::resource("").route(web::get().to(notification::list_notifications)),
                    )
                    // /notifications/{id}/read
                    .service(
                        web::resource("/{id}/read")
                            .route(web::put().to(notification::mark_notification_read)),
                    ),
            ),
    );
}

// API REQUEST
//  └─ Authorization: Bearer access_token (issued by the identity service)

// APPLY ──► Pending ──► approve ──► Approved (balance debited)
//                  └──► reject  ──► Rejected
