use crate::{
    error::VacationError,
    model::vacation::{Vacation, VacationRequest, VacationStatus},
    service::VacationService,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VacationRemainingResponse {
    #[schema(example = 20)]
    pub remaining_days: u32,
}

/// Status filter, documented for Swagger. Handlers read the raw query pairs
/// so the parameter can repeat.
#[allow(dead_code)] // only feeds the OpenAPI document
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusFilter {
    /// Repeat or comma separate: `status=PENDING&status=APPROVED`
    #[param(example = json!(["PENDING"]))]
    pub status: Option<Vec<VacationStatus>>,
}

fn status_filter(query: &[(String, String)]) -> Result<Vec<VacationStatus>, VacationError> {
    VacationStatus::parse_filter(
        query
            .iter()
            .filter(|(key, _)| key == "status")
            .map(|(_, value)| value.as_str()),
    )
}

/* =========================
Submit vacation request
========================= */
#[utoipa::path(
    post,
    path = "/vacations/requests",
    request_body(
        content = VacationRequest,
        description = "Vacation request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Vacation request created", body = Vacation),
        (status = 400, description = "Yearly limit reached or start date after end date", body = Object, example = json!({
            "error": "invalid_request",
            "message": "Vacation start date cannot be greater than end date"
        }))
    ),
    tag = "Vacation"
)]
pub async fn submit_vacation_request(
    service: web::Data<VacationService>,
    payload: web::Json<VacationRequest>,
) -> actix_web::Result<impl Responder> {
    let vacation = service.submit(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(vacation))
}

/* =========================
Vacation requests of a user
========================= */
#[utoipa::path(
    get,
    path = "/vacations/{user_id}/requests",
    params(
        ("user_id" = u64, Path, description = "Author of the vacation requests"),
        StatusFilter
    ),
    responses(
        (status = 200, description = "Vacation requests of the user", body = [Vacation]),
        (status = 400, description = "Unknown status in filter")
    ),
    tag = "Vacation"
)]
pub async fn list_user_vacation_requests(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
    query: web::Query<Vec<(String, String)>>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let statuses = status_filter(&query)?;

    let vacations = service.list_for_user(user_id, &statuses).await?;

    Ok(HttpResponse::Ok().json(vacations))
}

#[utoipa::path(
    get,
    path = "/vacations/{user_id}/remaining",
    params(
        ("user_id" = u64, Path, description = "User to compute the remaining days for")
    ),
    responses(
        (status = 200, description = "Remaining vacation days this year", body = VacationRemainingResponse)
    ),
    tag = "Vacation"
)]
pub async fn remaining_vacation_days(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let remaining_days = service.remaining_days(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(VacationRemainingResponse { remaining_days }))
}

#[utoipa::path(
    get,
    path = "/vacations/requests",
    params(StatusFilter),
    responses(
        (status = 200, description = "Vacation requests of every user", body = [Vacation]),
        (status = 400, description = "Unknown status in filter")
    ),
    tag = "Vacation"
)]
pub async fn list_all_vacation_requests(
    service: web::Data<VacationService>,
    query: web::Query<Vec<(String, String)>>,
) -> actix_web::Result<impl Responder> {
    let statuses = status_filter(&query)?;

    let vacations = service.list_all(&statuses).await?;

    Ok(HttpResponse::Ok().json(vacations))
}

#[utoipa::path(
    get,
    path = "/vacations/requests/{id}",
    params(
        ("id" = u64, Path, description = "ID of the vacation request")
    ),
    responses(
        (status = 200, description = "Vacation request found", body = Vacation),
        (status = 404, description = "Vacation request not found")
    ),
    tag = "Vacation"
)]
pub async fn get_vacation_request(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let vacation = service.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(vacation))
}

/* =========================
Overlap report (managers)
========================= */
#[utoipa::path(
    get,
    path = "/vacations/overlaps",
    responses(
        (status = 200, description = "Pending requests overlapping another pending request", body = [Vacation])
    ),
    tag = "Vacation"
)]
pub async fn overlapping_vacation_requests(
    service: web::Data<VacationService>,
) -> actix_web::Result<impl Responder> {
    let vacations = service.find_overlapping().await?;

    Ok(HttpResponse::Ok().json(vacations))
}

/* =========================
Approve / reject (managers)
========================= */
#[utoipa::path(
    put,
    path = "/vacations/{id}/approve",
    params(
        ("id" = u64, Path, description = "ID of the vacation request to approve")
    ),
    responses(
        (status = 202, description = "Vacation request approved"),
        (status = 404, description = "Vacation request not found"),
        (status = 409, description = "Vacation request already resolved")
    ),
    tag = "Vacation"
)]
pub async fn approve_vacation_request(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    service
        .resolve(path.into_inner(), Some(VacationStatus::Approved))
        .await?;

    Ok(HttpResponse::Accepted().finish())
}

#[utoipa::path(
    put,
    path = "/vacations/{id}/reject",
    params(
        ("id" = u64, Path, description = "ID of the vacation request to reject")
    ),
    responses(
        (status = 202, description = "Vacation request rejected"),
        (status = 404, description = "Vacation request not found"),
        (status = 409, description = "Vacation request already resolved")
    ),
    tag = "Vacation"
)]
pub async fn reject_vacation_request(
    service: web::Data<VacationService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    service
        .resolve(path.into_inner(), Some(VacationStatus::Rejected))
        .await?;

    Ok(HttpResponse::Accepted().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::model::vacation::{Vacation, VacationStatus};
    use crate::repository::InMemoryVacationStore;
    use crate::routes;
    use crate::service::VacationService;

    use super::VacationRemainingResponse;

    fn service(limit: u32) -> web::Data<VacationService> {
        web::Data::new(VacationService::new(
            Arc::new(InMemoryVacationStore::new()),
            limit,
            1,
        ))
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data($service.clone())
                    .configure(routes::configure),
            )
            .await
        };
    }

    fn submit(author_id: u64, start: &str, end: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/vacations/requests")
            .set_json(json!({
                "authorId": author_id,
                "startDate": start,
                "endDate": end
            }))
    }

    #[actix_web::test]
    async fn submit_returns_created_request() {
        let service = service(30);
        let app = app!(service);

        let resp = test::call_service(
            &app,
            submit(7, "2024-01-05T00:00:00", "2024-01-09T00:00:00").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["authorId"], 7);
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["startDate"], "2024-01-05T00:00:00");
        assert_eq!(body["endDate"], "2024-01-09T00:00:00");
        assert_eq!(body["resolvedBy"], Value::Null);
    }

    #[actix_web::test]
    async fn submit_with_reversed_dates_is_bad_request() {
        let service = service(30);
        let app = app!(service);

        let resp = test::call_service(
            &app,
            submit(7, "2024-01-09T00:00:00", "2024-01-05T00:00:00").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_request");
    }

    #[actix_web::test]
    async fn submit_with_missing_field_is_bad_request() {
        let service = service(30);
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/vacations/requests")
            .set_json(json!({ "authorId": 7, "startDate": "2024-01-05T00:00:00" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_request");
    }

    #[actix_web::test]
    async fn user_requests_honour_status_filter() {
        let service = service(30);
        let app = app!(service);

        let first: Vacation = test::call_and_read_body_json(
            &app,
            submit(7, "2024-02-01T00:00:00", "2024-02-02T00:00:00").to_request(),
        )
        .await;
        test::call_service(
            &app,
            submit(7, "2024-03-01T00:00:00", "2024-03-02T00:00:00").to_request(),
        )
        .await;
        test::call_service(
            &app,
            submit(8, "2024-03-01T00:00:00", "2024-03-02T00:00:00").to_request(),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/vacations/{}/reject", first.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::ACCEPTED);

        let req = test::TestRequest::get()
            .uri("/vacations/7/requests")
            .to_request();
        let all: Vec<Vacation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 2);

        let req = test::TestRequest::get()
            .uri("/vacations/7/requests?status=REJECTED")
            .to_request();
        let rejected: Vec<Vacation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].status, VacationStatus::Rejected);
        assert_eq!(rejected[0].resolved_by, Some(1));

        let req = test::TestRequest::get()
            .uri("/vacations/requests?status=PENDING&status=REJECTED")
            .to_request();
        let everyone: Vec<Vacation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(everyone.len(), 3);

        let req = test::TestRequest::get()
            .uri("/vacations/requests?status=approved")
            .to_request();
        let approved: Vec<Vacation> = test::call_and_read_body_json(&app, req).await;
        assert!(approved.is_empty());
    }

    #[actix_web::test]
    async fn unknown_status_filter_is_bad_request() {
        let service = service(30);
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/vacations/requests?status=PENDING,ON_HOLD")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_filter");
    }

    #[actix_web::test]
    async fn remaining_days_reflects_approvals() {
        let service = service(30);
        let app = app!(service);

        let year = chrono::Datelike::year(&chrono::Local::now());
        let created: Vacation = test::call_and_read_body_json(
            &app,
            submit(
                7,
                &format!("{year}-06-01T00:00:00"),
                &format!("{year}-06-03T00:00:00"),
            )
            .to_request(),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/vacations/{}/approve", created.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::ACCEPTED);

        let req = test::TestRequest::get()
            .uri("/vacations/7/remaining")
            .to_request();
        let body: VacationRemainingResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.remaining_days, 29);
    }

    #[actix_web::test]
    async fn approve_unknown_request_is_not_found() {
        let service = service(30);
        let app = app!(service);

        let req = test::TestRequest::put()
            .uri("/vacations/404/approve")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn resolving_twice_is_conflict() {
        let service = service(30);
        let app = app!(service);

        let created: Vacation = test::call_and_read_body_json(
            &app,
            submit(7, "2024-02-01T00:00:00", "2024-02-02T00:00:00").to_request(),
        )
        .await;

        let approve = format!("/vacations/{}/approve", created.id);
        let reject = format!("/vacations/{}/reject", created.id);

        let resp = test::call_service(&app, test::TestRequest::put().uri(&approve).to_request()).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);

        let resp = test::call_service(&app, test::TestRequest::put().uri(&reject).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get()
            .uri(&format!("/vacations/requests/{}", created.id))
            .to_request();
        let stored: Vacation = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stored.status, VacationStatus::Approved);
    }

    #[actix_web::test]
    async fn non_numeric_path_id_uses_the_error_body() {
        let service = service(30);
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/vacations/abc/requests")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not_found");
    }

    #[actix_web::test]
    async fn get_unknown_request_is_not_found() {
        let service = service(30);
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/vacations/requests/12")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not_found");
    }

    #[actix_web::test]
    async fn overlaps_lists_intersecting_pending_requests() {
        let service = service(30);
        let app = app!(service);

        let intervals = [
            ("2024-01-01", "2024-01-05"),
            ("2024-01-03", "2024-01-07"),
            ("2024-02-02", "2024-02-05"),
            ("2024-01-25", "2024-02-02"),
            ("2023-12-28", "2024-01-03"),
            ("2024-05-01", "2024-05-03"),
        ];
        for (i, (start, end)) in intervals.iter().enumerate() {
            let req = submit(
                i as u64 + 1,
                &format!("{start}T00:00:00"),
                &format!("{end}T00:00:00"),
            )
            .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/vacations/overlaps").to_request();
        let overlapping: Vec<Vacation> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(overlapping.len(), 5);
        assert!(overlapping.iter().all(|v| v.author_id != 6));
    }
}
