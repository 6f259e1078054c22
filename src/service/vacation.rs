use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, error, info, instrument, warn};

use crate::error::VacationError;
use crate::model::vacation::{NewVacation, Vacation, VacationRequest, VacationStatus};
use crate::repository::VacationStore;
use crate::service::overlap;

/// Business rules for vacation requests: the annual per-user limit,
/// interval validity, status transitions and the overlap report.
#[derive(Clone)]
pub struct VacationService {
    store: Arc<dyn VacationStore>,
    limit_per_user: u32,
    resolver_id: u64,
}

/// Jan 1 00:00 of the year `now` falls in.
fn start_of_year(now: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_yo_opt(now.year(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// DATETIME columns keep whole seconds; drop the rest so the returned
/// request matches what is read back later.
fn whole_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.with_nanosecond(0).unwrap_or(at)
}

impl VacationService {
    pub fn new(store: Arc<dyn VacationStore>, limit_per_user: u32, resolver_id: u64) -> Self {
        Self {
            store,
            limit_per_user,
            resolver_id,
        }
    }

    /// Creates a Pending request unless the author already used up the
    /// annual limit or the interval is reversed.
    #[instrument(
        name = "vacation_submit",
        skip(self, request),
        fields(author_id = request.author_id)
    )]
    pub async fn submit(&self, request: VacationRequest) -> Result<Vacation, VacationError> {
        if request.author_id == 0 {
            warn!("Rejected vacation request without a valid author");
            return Err(VacationError::invalid_request(
                "Vacation author must be a positive id",
            ));
        }

        let approved = self.approved_since_start_of_year(request.author_id).await?;
        if approved >= self.limit_per_user {
            error!(
                approved,
                limit = self.limit_per_user,
                "Unable to create vacation request, yearly limit reached"
            );
            return Err(VacationError::invalid_request(
                "User has reached the maximum allowed vacations per year",
            ));
        }

        if request.start_date > request.end_date {
            error!(
                start_date = %request.start_date,
                end_date = %request.end_date,
                "Vacation start date is after end date"
            );
            return Err(VacationError::invalid_request(
                "Vacation start date cannot be greater than end date",
            ));
        }

        let vacation = self
            .store
            .insert(NewVacation {
                author_id: request.author_id,
                request_date: whole_seconds(Local::now().naive_local()),
                start_date: whole_seconds(request.start_date),
                end_date: whole_seconds(request.end_date),
            })
            .await?;

        info!(vacation_id = vacation.id, "Vacation request created");
        Ok(vacation)
    }

    /// Requests of one user, optionally narrowed to a set of statuses.
    pub async fn list_for_user(
        &self,
        user_id: u64,
        statuses: &[VacationStatus],
    ) -> Result<Vec<Vacation>, VacationError> {
        debug!(user_id, ?statuses, "Retrieving vacation requests for user");
        self.store.find_by_author(user_id, statuses).await
    }

    pub async fn remaining_days(&self, user_id: u64) -> Result<u32, VacationError> {
        let approved = self.approved_since_start_of_year(user_id).await?;
        Ok(self.limit_per_user.saturating_sub(approved))
    }

    pub async fn list_all(&self, statuses: &[VacationStatus]) -> Result<Vec<Vacation>, VacationError> {
        debug!(?statuses, "Retrieving all vacation requests");
        self.store.find_all(statuses).await
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Vacation, VacationError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| VacationError::not_found("Vacation request does not exist"))
    }

    /// Pending requests whose intervals intersect another pending request.
    pub async fn find_overlapping(&self) -> Result<Vec<Vacation>, VacationError> {
        let pending = self.store.find_all(&[VacationStatus::Pending]).await?;
        let overlapping = overlap::find_overlapping(&pending);

        debug!(
            pending = pending.len(),
            overlapping = overlapping.len(),
            "Computed overlapping vacation requests"
        );
        Ok(overlapping)
    }

    /// Approves or rejects a pending request on behalf of the configured
    /// resolver. Already resolved requests are left untouched.
    #[instrument(name = "vacation_resolve", skip(self))]
    pub async fn resolve(
        &self,
        id: u64,
        decision: Option<VacationStatus>,
    ) -> Result<(), VacationError> {
        let decision = match decision {
            Some(status) if status.is_terminal() => status,
            Some(status) => {
                error!(%status, "Unable to update vacation request, decision is not final");
                return Err(VacationError::invalid_request(
                    "Vacation status must be APPROVED or REJECTED",
                ));
            }
            None => {
                error!("Unable to update vacation request, no decision provided");
                return Err(VacationError::invalid_request(
                    "Vacation status is required but not provided",
                ));
            }
        };

        let current = self.find_by_id(id).await?;
        current.status.transition_to(decision)?;

        let updated = self
            .store
            .update_status(id, current.status, decision, self.resolver_id)
            .await?;

        if !updated {
            // someone else resolved or removed it between the read and the write
            let latest = self.find_by_id(id).await?;
            warn!(status = %latest.status, "Vacation request changed while resolving");
            latest.status.transition_to(decision)?;
            return Err(VacationError::conflict("Vacation request was modified concurrently"));
        }

        info!(status = %decision, resolved_by = self.resolver_id, "Vacation request resolved");
        Ok(())
    }

    async fn approved_since_start_of_year(&self, user_id: u64) -> Result<u32, VacationError> {
        let since = start_of_year(Local::now().naive_local());
        self.store
            .count_by_author_and_status_since(user_id, VacationStatus::Approved, since)
            .await
    }
}
