//! Snapshot data model.
//!
//! These are the plain records the collaborators hand to the core:
//! jobs, rentals, the inventory catalog, the crew roster, and company money.
//! The core reads them and never mutates or stores them.

mod crew;
mod finance;
mod inventory;
mod job;
mod rental;

use serde::{Deserialize, Serialize};

pub use crew::{ApprovalStatus, CrewExpense, CrewMember, Employment};
pub use finance::{CompanyExpense, PaymentFrequency, PersonnelCost, RecurringPayment};
pub use inventory::InventoryItem;
pub use job::{Job, JobStatus, MaterialLine, MaterialSource, VehicleLine, VehicleSource};
pub use rental::{Rental, RentalLine, RentalStatus};

/// Everything the core may need for one pass, as of one fetch.
///
/// Missing arrays deserialize as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub inventory: Vec<InventoryItem>,
    pub jobs: Vec<Job>,
    pub rentals: Vec<Rental>,
    pub crew: Vec<CrewMember>,
    pub company_expenses: Vec<CompanyExpense>,
    pub recurring_payments: Vec<RecurringPayment>,
    pub personnel_costs: Vec<PersonnelCost>,
}
