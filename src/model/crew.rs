//! Crew roster: who can be assigned to jobs and what they cost.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::deserialize_day;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: Uuid,
    pub name: String,
    pub employment: Employment,

    /// Day rate billed by freelancers. Ignored for internal staff.
    #[serde(default)]
    pub daily_rate: Decimal,

    #[serde(default)]
    pub expenses: Vec<CrewExpense>,
}

/// How a crew member is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Employment {
    /// Salaried staff. Paid per-diem on travel jobs.
    Internal,
    /// Freelancer. Paid a day rate per job day.
    External,
}

/// An expense a crew member filed, optionally against a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewExpense {
    pub id: Uuid,
    #[serde(default)]
    pub job_id: Option<Uuid>,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: Date,
    pub amount: Decimal,
    pub status: ApprovalStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    /// Approved and reimbursed.
    Completed,
    Rejected,
}

impl ApprovalStatus {
    /// Whether an expense in this state is a real cost.
    pub fn counts_as_cost(self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }
}
