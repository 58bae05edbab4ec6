//! Local persistence for the production book.
//!
//! The book is a single `SQLite` file. Each record kind has its own table
//! holding the record as JSON, keyed by id:
//!
//! ```text
//! <root>/book.sqlite
//!   inventory, jobs, rentals, crew,
//!   company_expenses, recurring_payments, personnel_costs
//!     (id TEXT PRIMARY KEY, body TEXT NOT NULL)
//! ```
//!
//! Rows are read back in insertion order, which is the order the ledger
//! enumerates bookings in. Every operation opens its own connection, so
//! separate processes can share one book.

mod book;
mod reserve;

use std::{fs, io, path::PathBuf, time::Duration};

use rusqlite::Connection;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

pub use reserve::Admission;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// One table per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Inventory,
    Jobs,
    Rentals,
    Crew,
    CompanyExpenses,
    RecurringPayments,
    PersonnelCosts,
}

impl Table {
    const ALL: [Self; 7] = [
        Self::Inventory,
        Self::Jobs,
        Self::Rentals,
        Self::Crew,
        Self::CompanyExpenses,
        Self::RecurringPayments,
        Self::PersonnelCosts,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Jobs => "jobs",
            Self::Rentals => "rentals",
            Self::Crew => "crew",
            Self::CompanyExpenses => "company_expenses",
            Self::RecurringPayments => "recurring_payments",
            Self::PersonnelCosts => "personnel_costs",
        }
    }
}

/// File-backed production book.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Opens the book at `path`, creating the file and its tables if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let storage = Self { path };
        let conn = storage.open_db()?;
        for table in Table::ALL {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, body TEXT NOT NULL);",
                table.name()
            ))?;
        }
        Ok(storage)
    }

    /// Returns the default book location: `~/.callsheet/book.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".callsheet").join("book.sqlite"))
    }

    fn open_db(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

/// Inserts or replaces one record. Replacing keeps the row's original position.
fn put<T: Serialize>(conn: &Connection, table: Table, id: Uuid, record: &T) -> Result<()> {
    let body = serde_json::to_string(record)?;
    conn.execute(
        &format!(
            "INSERT INTO {} (id, body) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET body = excluded.body",
            table.name()
        ),
        rusqlite::params![id.to_string(), body],
    )?;
    Ok(())
}

/// Reads every record of a table in insertion order.
fn load_all<T: DeserializeOwned>(conn: &Connection, table: Table) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(&format!("SELECT body FROM {} ORDER BY rowid", table.name()))?;
    let bodies = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<core::result::Result<Vec<_>, _>>()?;
    let mut records = Vec::with_capacity(bodies.len());
    for body in bodies {
        records.push(serde_json::from_str(&body)?);
    }
    Ok(records)
}
