//! Company-level money that is not tied to a single job.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::deserialize_day;

/// A one-off overhead cost (rent top-up, insurance claim, new tooling).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyExpense {
    pub id: Uuid,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: Date,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

/// A dated personnel cost such as statutory contributions or payroll tax.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelCost {
    pub id: Uuid,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: Date,
    pub amount: Decimal,
    #[serde(default)]
    pub crew_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
}

/// A standing payment: subscriptions, leases, insurance premiums.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPayment {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub frequency: PaymentFrequency,

    /// When the next installment falls due. Only used for yearly payments.
    #[serde(deserialize_with = "deserialize_day")]
    pub next_due: Date,

    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentFrequency {
    Monthly,
    Yearly,
}

fn default_active() -> bool {
    true
}
