use crate::api::vacation::VacationRemainingResponse;
use crate::model::vacation::{Vacation, VacationRequest, VacationStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vacation Management API",
        version = "1.0.0",
        description = r#"
## Vacation Management

Employees submit vacation requests; managers approve, reject and review them.

### Key Features
- **Submit** a request for an inclusive date interval
- **Annual limit** of approved vacations per user, counted from January 1
- **Review** requests per user or across everyone, filtered by status
- **Overlap report** of pending requests whose intervals intersect
- **Approve / reject** pending requests; resolved requests are final

### Response Format
- JSON, camelCase fields, ISO-8601 local date-times
- Errors: `{"error": "<kind>", "message": "<detail>"}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::vacation::submit_vacation_request,
        crate::api::vacation::list_user_vacation_requests,
        crate::api::vacation::remaining_vacation_days,
        crate::api::vacation::list_all_vacation_requests,
        crate::api::vacation::get_vacation_request,
        crate::api::vacation::overlapping_vacation_requests,
        crate::api::vacation::approve_vacation_request,
        crate::api::vacation::reject_vacation_request
    ),
    components(
        schemas(
            Vacation,
            VacationRequest,
            VacationStatus,
            VacationRemainingResponse
        )
    ),
    tags(
        (name = "Vacation", description = "Vacation request management APIs"),
    )
)]
pub struct ApiDoc;
