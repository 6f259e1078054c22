// Storage port for vacation requests.
//
// The rules engine only talks to `VacationStore`; `mysql` backs the running
// service and `in_memory` backs tests and local runs without a database.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::VacationError;
use crate::model::vacation::{NewVacation, Vacation, VacationStatus};

pub mod in_memory;
pub mod mysql;

pub use in_memory::InMemoryVacationStore;
pub use mysql::MySqlVacationStore;

#[async_trait]
pub trait VacationStore: Send + Sync {
    /// Stores a new request as Pending and returns it with its id.
    async fn insert(&self, vacation: NewVacation) -> Result<Vacation, VacationError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Vacation>, VacationError>;

    /// Requests of one author. An empty `statuses` slice matches every status.
    async fn find_by_author(
        &self,
        author_id: u64,
        statuses: &[VacationStatus],
    ) -> Result<Vec<Vacation>, VacationError>;

    /// Requests of every author. An empty `statuses` slice matches every status.
    async fn find_all(&self, statuses: &[VacationStatus]) -> Result<Vec<Vacation>, VacationError>;

    async fn count_by_author_and_status_since(
        &self,
        author_id: u64,
        status: VacationStatus,
        since: NaiveDateTime,
    ) -> Result<u32, VacationError>;

    /// Sets status and resolver only while the stored status is still
    /// `expected`. Returns false when no row matched.
    async fn update_status(
        &self,
        id: u64,
        expected: VacationStatus,
        status: VacationStatus,
        resolved_by: u64,
    ) -> Result<bool, VacationError>;
}
