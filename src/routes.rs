use crate::{api::vacation, error::VacationError};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::anyhow;

/// Per-IP limiter allowing `requests_per_min` requests with the same burst.
pub fn build_limiter(
    requests_per_min: u32,
) -> anyhow::Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {} requests per minute", requests_per_min))?;

    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // malformed bodies and queries get the same error shape as rule violations
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| VacationError::invalid_request(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| VacationError::invalid_filter(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| VacationError::not_found(err.to_string()).into()),
    );

    cfg.service(
        web::scope("/vacations")
            // /vacations/requests
            .service(
                web::resource("/requests")
                    .route(web::get().to(vacation::list_all_vacation_requests))
                    .route(web::post().to(vacation::submit_vacation_request)),
            )
            // /vacations/requests/{id}
            .service(
                web::resource("/requests/{id}")
                    .route(web::get().to(vacation::get_vacation_request)),
            )
            // /vacations/overlaps
            .service(
                web::resource("/overlaps")
                    .route(web::get().to(vacation::overlapping_vacation_requests)),
            )
            // /vacations/{user_id}/requests
            .service(
                web::resource("/{user_id}/requests")
                    .route(web::get().to(vacation::list_user_vacation_requests)),
            )
            // /vacations/{user_id}/remaining
            .service(
                web::resource("/{user_id}/remaining")
                    .route(web::get().to(vacation::remaining_vacation_days)),
            )
            // /vacations/{id}/approve
            .service(
                web::resource("/{id}/approve")
                    .route(web::put().to(vacation::approve_vacation_request)),
            )
            // /vacations/{id}/reject
            .service(
                web::resource("/{id}/reject")
                    .route(web::put().to(vacation::reject_vacation_request)),
            ),
    );
}
