//! Reservation: the serialized commit step behind the advisory ledger.
//!
//! The ledger alone is a read. Two callers can both read "2 available" and
//! both commit 2 units. Reserving closes that gap: the availability check
//! and the write happen inside one `IMMEDIATE` transaction, which takes the
//! book's write lock up front, so check-and-commit runs one caller at a time.

use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{Booking, ClaimCheck, Ledger};
use crate::model::{Job, Rental};

use super::{Result, Storage, Table, book::read_snapshot, put};

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Admission {
    /// The booking was written.
    Committed,

    /// Nothing was written: at least one item would be over-allocated.
    Rejected { shortfalls: Vec<ClaimCheck> },
}

impl Storage {
    /// Creates or updates a job, refusing it if its gear doesn't fit.
    pub fn reserve_job(&self, job: &Job) -> Result<Admission> {
        self.reserve(&Booking::from_job(job), Table::Jobs, job.id, job)
    }

    /// Creates or updates a rental, refusing it if its gear doesn't fit.
    pub fn reserve_rental(&self, rental: &Rental) -> Result<Admission> {
        self.reserve(&Booking::from_rental(rental), Table::Rentals, rental.id, rental)
    }

    fn reserve<T: Serialize>(
        &self,
        booking: &Booking,
        table: Table,
        id: Uuid,
        record: &T,
    ) -> Result<Admission> {
        let mut conn = self.open_db()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Inactive bookings release gear; they never need room.
        if booking.active {
            let snapshot = read_snapshot(&tx)?;
            let ledger = Ledger::from_snapshot(&snapshot);
            let shortfalls: Vec<ClaimCheck> = ledger
                .check_booking(booking)
                .into_iter()
                .filter(|c| c.shortfall > 0)
                .collect();
            if !shortfalls.is_empty() {
                tracing::warn!(
                    booking = %booking.label,
                    items = shortfalls.len(),
                    "reservation rejected"
                );
                return Ok(Admission::Rejected { shortfalls });
            }
        }

        put(&tx, table, id, record)?;
        tx.commit()?;
        tracing::info!(booking = %booking.label, kind = ?booking.kind, "reservation committed");
        Ok(Admission::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    use jiff::civil::date;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use crate::interval::Interval;
    use crate::model::*;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("book.sqlite")).unwrap();
        (dir, storage)
    }

    fn stock(storage: &Storage, total_owned: u32) -> InventoryItem {
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: "Truss section".into(),
            category: "rigging".into(),
            total_owned,
        };
        storage
            .import(&Snapshot {
                inventory: vec![item.clone()],
                ..Snapshot::default()
            })
            .unwrap();
        item
    }

    fn job(name: &str, item_id: Uuid, quantity: u32) -> Job {
        Job {
            id: Uuid::new_v4(),
            name: name.into(),
            location: String::new(),
            fee_zone: None,
            interval: Interval::new(date(2025, 9, 1), date(2025, 9, 3)),
            status: JobStatus::Confirmed,
            crew: vec![],
            materials: vec![MaterialLine {
                item_id: Some(item_id),
                name: String::new(),
                quantity,
                unit_cost: Decimal::ZERO,
                source: MaterialSource::Internal,
            }],
            vehicles: vec![],
            revenue: Decimal::ZERO,
            requires_travel: false,
            per_diem_rate: None,
        }
    }

    #[test]
    fn fitting_job_is_committed() {
        let (_dir, storage) = test_storage();
        let item = stock(&storage, 6);

        let outcome = storage.reserve_job(&job("Expo", item.id, 4)).unwrap();
        assert_eq!(outcome, Admission::Committed);
        assert_eq!(storage.load_snapshot().unwrap().jobs.len(), 1);
    }

    #[test]
    fn oversubscribing_job_is_rejected_and_not_written() {
        let (_dir, storage) = test_storage();
        let item = stock(&storage, 6);
        storage.reserve_job(&job("Expo", item.id, 4)).unwrap();

        let outcome = storage.reserve_job(&job("Wedding", item.id, 3)).unwrap();
        let Admission::Rejected { shortfalls } = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].shortfall, 1);
        assert_eq!(shortfalls[0].availability.conflicts[0].label, "Expo");
        assert_eq!(storage.load_snapshot().unwrap().jobs.len(), 1);
    }

    #[test]
    fn editing_a_job_does_not_compete_with_itself() {
        let (_dir, storage) = test_storage();
        let item = stock(&storage, 6);
        let mut expo = job("Expo", item.id, 4);
        storage.reserve_job(&expo).unwrap();

        expo.materials[0].quantity = 6;
        assert_eq!(storage.reserve_job(&expo).unwrap(), Admission::Committed);

        let jobs = storage.load_snapshot().unwrap().jobs;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].materials[0].quantity, 6);
    }

    #[test]
    fn cancelling_always_goes_through() {
        let (_dir, storage) = test_storage();
        let item = stock(&storage, 2);
        let mut big = job("Too big", item.id, 5);
        big.status = JobStatus::Cancelled;

        assert_eq!(storage.reserve_job(&big).unwrap(), Admission::Committed);
    }

    #[test]
    fn rentals_are_checked_against_jobs() {
        let (_dir, storage) = test_storage();
        let item = stock(&storage, 5);
        storage.reserve_job(&job("Expo", item.id, 4)).unwrap();

        let rental = Rental {
            id: Uuid::new_v4(),
            client: "Drama school".into(),
            interval: Interval::new(date(2025, 9, 3), date(2025, 9, 10)),
            status: RentalStatus::Reserved,
            items: vec![RentalLine {
                item_id: item.id,
                quantity: 2,
            }],
        };
        let outcome = storage.reserve_rental(&rental).unwrap();
        assert!(matches!(outcome, Admission::Rejected { .. }));
    }

    #[test]
    fn concurrent_reservations_cannot_both_take_the_last_units() {
        let (_dir, storage) = test_storage();
        let item = stock(&storage, 4);

        let handles: Vec<_> = (0..2)
            .map(|n| {
                let storage = storage.clone();
                let job = job(&format!("Job {n}"), item.id, 3);
                thread::spawn(move || storage.reserve_job(&job).unwrap())
            })
            .collect();
        let outcomes: Vec<Admission> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let committed = outcomes
            .iter()
            .filter(|o| **o == Admission::Committed)
            .count();
        assert_eq!(committed, 1);
        assert_eq!(storage.load_snapshot().unwrap().jobs.len(), 1);
    }
}
