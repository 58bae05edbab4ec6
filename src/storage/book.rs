//! Book storage: bulk import and whole-snapshot reads.

use rusqlite::Connection;

use crate::model::Snapshot;

use super::{Result, Storage, Table, load_all, put};

impl Storage {
    /// Upserts every record in the snapshot in one transaction.
    ///
    /// Returns the number of records written.
    pub fn import(&self, snapshot: &Snapshot) -> Result<usize> {
        let mut conn = self.open_db()?;
        let tx = conn.transaction()?;
        let mut written = 0;

        for i in &snapshot.inventory {
            put(&tx, Table::Inventory, i.id, i)?;
            written += 1;
        }
        for j in &snapshot.jobs {
            put(&tx, Table::Jobs, j.id, j)?;
            written += 1;
        }
        for r in &snapshot.rentals {
            put(&tx, Table::Rentals, r.id, r)?;
            written += 1;
        }
        for c in &snapshot.crew {
            put(&tx, Table::Crew, c.id, c)?;
            written += 1;
        }
        for e in &snapshot.company_expenses {
            put(&tx, Table::CompanyExpenses, e.id, e)?;
            written += 1;
        }
        for p in &snapshot.recurring_payments {
            put(&tx, Table::RecurringPayments, p.id, p)?;
            written += 1;
        }
        for p in &snapshot.personnel_costs {
            put(&tx, Table::PersonnelCosts, p.id, p)?;
            written += 1;
        }

        tx.commit()?;
        tracing::info!(records = written, "snapshot imported");
        Ok(written)
    }

    /// Reads the whole book as one snapshot.
    pub fn load_snapshot(&self) -> Result<Snapshot> {
        let conn = self.open_db()?;
        read_snapshot(&conn)
    }
}

/// Reads every table through an open connection or transaction.
pub(super) fn read_snapshot(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        inventory: load_all(conn, Table::Inventory)?,
        jobs: load_all(conn, Table::Jobs)?,
        rentals: load_all(conn, Table::Rentals)?,
        crew: load_all(conn, Table::Crew)?,
        company_expenses: load_all(conn, Table::CompanyExpenses)?,
        recurring_payments: load_all(conn, Table::RecurringPayments)?,
        personnel_costs: load_all(conn, Table::PersonnelCosts)?,
    })
}
