use crate::deposits::{delete_deposit, upsert_deposit};
use crate::error::AppError;
use crate::schemas::{DepositStatus, Document, Month, VoteStatus};
use crate::store::Store;
use crate::votes::{delete_vote, upsert_vote};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// A record that is unique per natural key inside its array.
pub trait Keyed {
    fn same_key(&self, other: &Self) -> bool;
}

// Replaces the record with the same key where it sits, otherwise appends.
pub fn upsert_by_key<T: Keyed>(records: &mut Vec<T>, record: T) {
    match records.iter().position(|r| r.same_key(&record)) {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
}

/// Rejects empty and whitespace-only names.
pub fn require_name(name: &str) -> Result<&str, AppError> {
    if name.trim().is_empty() {
        Err(AppError::missing("name is"))
    } else {
        Ok(name)
    }
}

pub type Clock = fn() -> i64;

fn wall_clock() -> i64 {
    Utc::now().timestamp_millis()
}

/// Runs each mutation as a full load, modify, save cycle against a store.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
    clock: Clock,
}

impl Ledger {
    pub fn new(store: Arc<dyn Store>) -> Ledger {
        Ledger {
            store,
            clock: wall_clock,
        }
    }

    #[cfg(test)]
    pub fn with_clock(store: Arc<dyn Store>, clock: Clock) -> Ledger {
        Ledger { store, clock }
    }

    pub fn status(&self) -> Result<Document, AppError> {
        Ok(self.store.load()?)
    }

    pub fn cast_vote(&self, name: &str, status: VoteStatus) -> Result<Document, AppError> {
        self.mutate(|document, now| upsert_vote(document, name, status, now))
            .inspect(|_| info!(player = %name, ?status, "vote recorded"))
    }

    pub fn withdraw_vote(&self, name: &str) -> Result<Document, AppError> {
        self.mutate(|document, _| {
            delete_vote(document, name);
            Ok(())
        })
        .inspect(|_| info!(player = %name, "vote removed"))
    }

    pub fn record_deposit(
        &self,
        name: &str,
        status: DepositStatus,
        month: &Month,
    ) -> Result<Document, AppError> {
        self.mutate(|document, now| upsert_deposit(document, name, status, month, now))
            .inspect(|_| info!(player = %name, %month, ?status, "deposit recorded"))
    }

    pub fn remove_deposit(&self, name: &str, month: &Month) -> Result<Document, AppError> {
        self.mutate(|document, _| {
            delete_deposit(document, name, month);
            Ok(())
        })
        .inspect(|_| info!(player = %name, %month, "deposit removed"))
    }

    // Validation runs before save, so a rejected request never writes.
    fn mutate<F>(&self, change: F) -> Result<Document, AppError>
    where
        F: FnOnce(&mut Document, i64) -> Result<(), AppError>,
    {
        let mut document = self.store.load()?;
        change(&mut document, (self.clock)())?;
        self.store.save(&document)?;
        Ok(document)
    }
}
