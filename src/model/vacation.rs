use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::VacationError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VacationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacationStatus::Pending => "PENDING",
            VacationStatus::Approved => "APPROVED",
            VacationStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, VacationStatus::Pending)
    }

    /// Pending may move to Approved or Rejected; both are final.
    pub fn transition_to(self, next: VacationStatus) -> Result<VacationStatus, VacationError> {
        match (self, next) {
            (VacationStatus::Pending, VacationStatus::Approved | VacationStatus::Rejected) => {
                Ok(next)
            }
            (VacationStatus::Pending, VacationStatus::Pending) => Err(
                VacationError::invalid_request("Vacation status must be APPROVED or REJECTED"),
            ),
            (from, to) => Err(VacationError::conflict(format!(
                "Vacation request is already {from} and cannot be {to}"
            ))),
        }
    }

    /// Parses raw `status` query values. Each value may hold several
    /// comma separated tokens; blanks are skipped and duplicates dropped.
    pub fn parse_filter<'a, I>(values: I) -> Result<Vec<VacationStatus>, VacationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut statuses = Vec::new();

        for token in values.into_iter().flat_map(|v| v.split(',')) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let status: VacationStatus = token.parse().map_err(|_| {
                let allowed = VacationStatus::iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                VacationError::invalid_filter(format!(
                    "Unknown vacation status '{token}'. Allowed: {allowed}"
                ))
            })?;

            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }

        Ok(statuses)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "authorId": 1000,
    "requestDate": "2024-01-02T09:30:00",
    "status": "PENDING",
    "resolvedBy": null,
    "startDate": "2024-01-05T00:00:00",
    "endDate": "2024-01-09T00:00:00"
}))]
pub struct Vacation {
    #[schema(example = 1)]
    pub id: u64,
    /// user who asked for the vacation
    #[schema(example = 1000)]
    pub author_id: u64,
    #[schema(example = "2024-01-02T09:30:00", format = "date-time", value_type = String)]
    pub request_date: NaiveDateTime,
    pub status: VacationStatus,
    /// user who approved or rejected the request
    #[schema(example = 1, nullable = true)]
    pub resolved_by: Option<u64>,
    #[schema(example = "2024-01-05T00:00:00", format = "date-time", value_type = String)]
    pub start_date: NaiveDateTime,
    #[schema(example = "2024-01-09T00:00:00", format = "date-time", value_type = String)]
    pub end_date: NaiveDateTime,
}

/// A request about to be stored; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewVacation {
    pub author_id: u64,
    pub request_date: NaiveDateTime,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    #[schema(example = 1000)]
    pub author_id: u64,
    #[schema(example = "2024-01-05T00:00:00", format = "date-time", value_type = String)]
    pub start_date: NaiveDateTime,
    #[schema(example = "2024-01-09T00:00:00", format = "date-time", value_type = String)]
    pub end_date: NaiveDateTime,
}
