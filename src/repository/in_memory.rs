use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::VacationError;
use crate::model::vacation::{NewVacation, Vacation, VacationStatus};
use crate::repository::VacationStore;

#[derive(Default)]
struct Table {
    rows: Vec<Vacation>,
    last_id: u64,
}

/// Vector backed store with auto-increment ids, ordered by id.
#[derive(Default)]
pub struct InMemoryVacationStore {
    table: Mutex<Table>,
}

impl InMemoryVacationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn matching<F>(&self, statuses: &[VacationStatus], keep: F) -> Vec<Vacation>
    where
        F: Fn(&Vacation) -> bool,
    {
        self.table()
            .rows
            .iter()
            .filter(|v| statuses.is_empty() || statuses.contains(&v.status))
            .filter(|&v| keep(v))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VacationStore for InMemoryVacationStore {
    async fn insert(&self, vacation: NewVacation) -> Result<Vacation, VacationError> {
        let mut table = self.table();
        table.last_id += 1;

        let stored = Vacation {
            id: table.last_id,
            author_id: vacation.author_id,
            request_date: vacation.request_date,
            status: VacationStatus::Pending,
            resolved_by: None,
            start_date: vacation.start_date,
            end_date: vacation.end_date,
        };
        table.rows.push(stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Vacation>, VacationError> {
        Ok(self.table().rows.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_author(
        &self,
        author_id: u64,
        statuses: &[VacationStatus],
    ) -> Result<Vec<Vacation>, VacationError> {
        Ok(self.matching(statuses, |v| v.author_id == author_id))
    }

    async fn find_all(&self, statuses: &[VacationStatus]) -> Result<Vec<Vacation>, VacationError> {
        Ok(self.matching(statuses, |_| true))
    }

    async fn count_by_author_and_status_since(
        &self,
        author_id: u64,
        status: VacationStatus,
        since: NaiveDateTime,
    ) -> Result<u32, VacationError> {
        let count = self
            .table()
            .rows
            .iter()
            .filter(|v| v.author_id == author_id && v.status == status && v.start_date >= since)
            .count();

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn update_status(
        &self,
        id: u64,
        expected: VacationStatus,
        status: VacationStatus,
        resolved_by: u64,
    ) -> Result<bool, VacationError> {
        let mut table = self.table();

        match table
            .rows
            .iter_mut()
            .find(|v| v.id == id && v.status == expected)
        {
            Some(row) => {
                row.status = status;
                row.resolved_by = Some(resolved_by);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
