//! Jobs: productions with crew, gear, vehicles, and an invoice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::Interval;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,

    /// Human name, shown as the booking label in conflict lists.
    pub name: String,

    /// Free-text venue description, shown in cost summaries.
    #[serde(default)]
    pub location: String,

    /// Fee zone the venue sits in (e.g. a restricted-traffic area).
    /// Looked up by exact key in the configured zone fee table.
    #[serde(default)]
    pub fee_zone: Option<String>,

    pub interval: Interval,
    pub status: JobStatus,

    /// Assigned crew member ids.
    #[serde(default)]
    pub crew: Vec<Uuid>,

    #[serde(default)]
    pub materials: Vec<MaterialLine>,

    #[serde(default)]
    pub vehicles: Vec<VehicleLine>,

    /// Invoiced revenue, net of VAT.
    #[serde(default)]
    pub revenue: Decimal,

    /// Away job: internal staff are owed per-diem.
    #[serde(default)]
    pub requires_travel: bool,

    /// Per-diem rate for this job. Falls back to the configured default.
    #[serde(default)]
    pub per_diem_rate: Option<Decimal>,
}

/// Where a job stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    /// Quoted to the client, not yet confirmed. Still holds gear.
    Quote,
    Confirmed,
    Completed,
    Cancelled,
}

/// One line of the job's gear list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    /// Catalog item, when the line refers to owned stock.
    #[serde(default)]
    pub item_id: Option<Uuid>,

    #[serde(default)]
    pub name: String,

    pub quantity: u32,

    #[serde(default)]
    pub unit_cost: Decimal,

    pub source: MaterialSource,
}

/// Where a gear line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialSource {
    /// Pulled from the company's own inventory.
    Internal,
    /// Hired or bought from a third party for this job.
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLine {
    #[serde(default)]
    pub name: String,
    pub source: VehicleSource,
    #[serde(default)]
    pub cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleSource {
    Owned,
    Rented,
}

impl Job {
    /// Whether the job still holds gear and crew.
    pub fn is_active(&self) -> bool {
        self.status != JobStatus::Cancelled
    }

    /// Whether the job counts toward company revenue.
    pub fn is_billable(&self) -> bool {
        matches!(self.status, JobStatus::Confirmed | JobStatus::Completed)
    }

    pub fn has_crew(&self, crew_id: Uuid) -> bool {
        self.crew.contains(&crew_id)
    }
}
